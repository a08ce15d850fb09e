//! Shot analysis orchestrator.
//!
//! Drives one shot through `Scanning → EventSelection → AngleComputation →
//! Classification → Done`. Any stage may end the run early; the outcome is
//! always a [`ShotReport`], never an error.

use shotform_common::clock::FrameClock;
use shotform_pose_model::{
    AnalysisFailure, AnalysisSettings, AnalysisStage, AngleMeasurement, BoundaryPolicy,
    FrameRecord, Observation, SettingsError, ShotReport, ShotStatus, UndetectedReason,
};

use crate::adapter::{LandmarkAdapter, PoseEstimator};
use crate::angle::arm_angle;
use crate::cancel::CancellationToken;
use crate::classifier::FeedbackClassifier;
use crate::overlay;
use crate::release::{ReleaseConfig, ReleaseDetector, ReleaseError};

/// Per-call inputs that are not analysis settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisInput {
    /// Declared frame rate. Only used to report the release time.
    pub fps: f64,
    /// Attach per-frame overlay annotations to the report.
    pub render_overlay: bool,
}

impl AnalysisInput {
    pub fn new(fps: f64) -> Self {
        Self {
            fps,
            render_overlay: false,
        }
    }

    pub fn with_overlay(mut self, render_overlay: bool) -> Self {
        self.render_overlay = render_overlay;
        self
    }
}

/// Analyzes one shot at a time. Holds no per-shot state, so one analyzer
/// can be reused across shots and runs are idempotent.
pub struct ShotAnalyzer {
    settings: AnalysisSettings,
    detector: ReleaseDetector,
    classifier: FeedbackClassifier,
}

impl ShotAnalyzer {
    /// Build an analyzer after validating `settings`.
    pub fn new(settings: AnalysisSettings) -> Result<Self, SettingsError> {
        settings.validate()?;
        let detector = ReleaseDetector::new(ReleaseConfig::from_settings(&settings));
        let classifier = FeedbackClassifier::new(settings.feedback_bands.clone());
        Ok(Self {
            settings,
            detector,
            classifier,
        })
    }

    pub fn settings(&self) -> &AnalysisSettings {
        &self.settings
    }

    /// Run the full pipeline over a frame sequence.
    ///
    /// Frames are indexed by their position in `frames`. The token is
    /// checked before every frame.
    pub fn analyze<E, I>(
        &self,
        estimator: &E,
        frames: I,
        input: &AnalysisInput,
        cancel: &CancellationToken,
    ) -> ShotReport
    where
        E: PoseEstimator,
        I: IntoIterator<Item = E::Frame>,
    {
        if cancel.is_cancelled() {
            return self.fail(AnalysisFailure::Cancelled, AnalysisStage::Idle, 0, 0, input.fps);
        }

        tracing::debug!(
            stage = %AnalysisStage::Scanning,
            estimator = %estimator.name(),
            side = %self.settings.shooting_side,
            "Scanning frames"
        );

        let adapter = self.adapter(estimator);
        let scanned = frames.into_iter().enumerate().try_fold(
            Vec::new(),
            |mut records: Vec<FrameRecord>, (index, frame)| {
                if cancel.is_cancelled() {
                    return Err(AnalysisFailure::Cancelled);
                }
                records.push(FrameRecord {
                    index,
                    observation: adapter.detect(&frame),
                });
                Ok(records)
            },
        );

        match scanned {
            Ok(records) => self.analyze_records(&records, input),
            Err(failure) => self.fail(failure, AnalysisStage::Scanning, 0, 0, input.fps),
        }
    }

    /// Parallel variant of [`ShotAnalyzer::analyze`] over an in-memory frame slice.
    ///
    /// Detection runs on the rayon pool; records are collected in frame
    /// order before event selection, so the report matches the sequential path.
    #[cfg(feature = "rayon")]
    pub fn analyze_parallel<E>(
        &self,
        estimator: &E,
        frames: &[E::Frame],
        input: &AnalysisInput,
        cancel: &CancellationToken,
    ) -> ShotReport
    where
        E: PoseEstimator + Sync,
        E::Frame: Sync,
    {
        use rayon::prelude::*;

        if cancel.is_cancelled() {
            return self.fail(AnalysisFailure::Cancelled, AnalysisStage::Idle, 0, 0, input.fps);
        }

        tracing::debug!(
            stage = %AnalysisStage::Scanning,
            estimator = %estimator.name(),
            frames = frames.len(),
            threads = rayon::current_num_threads(),
            "Scanning frames in parallel"
        );

        let adapter = self.adapter(estimator);
        let records: Option<Vec<FrameRecord>> = frames
            .par_iter()
            .enumerate()
            .map(|(index, frame)| {
                if cancel.is_cancelled() {
                    return None;
                }
                Some(FrameRecord {
                    index,
                    observation: adapter.detect(frame),
                })
            })
            .collect();

        match records {
            Some(records) if !cancel.is_cancelled() => self.analyze_records(&records, input),
            _ => self.fail(
                AnalysisFailure::Cancelled,
                AnalysisStage::Scanning,
                0,
                0,
                input.fps,
            ),
        }
    }

    /// Run event selection, angle computation and classification over an
    /// already scanned record sequence.
    pub fn analyze_records(&self, records: &[FrameRecord], input: &AnalysisInput) -> ShotReport {
        let side = self.settings.shooting_side;
        let total = records.len();
        let valid = self.detector.count_valid(records);

        if records.iter().all(is_undecodable) {
            return self.fail(
                AnalysisFailure::NoFramesDecodable,
                AnalysisStage::Scanning,
                total,
                valid,
                input.fps,
            );
        }

        tracing::debug!(
            stage = %AnalysisStage::EventSelection,
            total_frames = total,
            valid_frames = valid,
            "Selecting release event"
        );
        let release = match self.detector.detect(records) {
            Ok(release) => release,
            Err(ReleaseError::InsufficientData { valid, required }) => {
                return self.fail(
                    AnalysisFailure::InsufficientData { valid, required },
                    AnalysisStage::EventSelection,
                    total,
                    valid,
                    input.fps,
                );
            }
        };

        if release.at_boundary && self.settings.boundary_policy == BoundaryPolicy::Reject {
            return self.fail(
                AnalysisFailure::BoundaryRelease {
                    frame_index: release.frame_index,
                },
                AnalysisStage::EventSelection,
                total,
                valid,
                input.fps,
            );
        }

        tracing::debug!(
            stage = %AnalysisStage::AngleComputation,
            frame_index = release.frame_index,
            "Computing release angle"
        );
        let degrees = match arm_angle(&release.arm) {
            Ok(degrees) => degrees,
            Err(e) => {
                tracing::debug!(error = %e, "Release arm is degenerate");
                return self.fail(
                    AnalysisFailure::DegenerateGeometry {
                        frame_index: release.frame_index,
                    },
                    AnalysisStage::AngleComputation,
                    total,
                    valid,
                    input.fps,
                );
            }
        };

        tracing::debug!(stage = %AnalysisStage::Classification, degrees, "Classifying angle");
        let feedback = match self.classifier.classify(degrees) {
            Ok(feedback) => feedback,
            Err(e) => {
                tracing::debug!(error = %e, "Angle could not be classified");
                return self.fail(
                    AnalysisFailure::DegenerateGeometry {
                        frame_index: release.frame_index,
                    },
                    AnalysisStage::Classification,
                    total,
                    valid,
                    input.fps,
                );
            }
        };

        let (status, reason) = if release.at_boundary {
            tracing::warn!(
                frame_index = release.frame_index,
                confidence = release.confidence,
                "Release found at sequence boundary; result may be unreliable"
            );
            (
                ShotStatus::Degraded,
                Some(format!(
                    "release found at sequence boundary (frame {}); the apex may lie outside the clip",
                    release.frame_index
                )),
            )
        } else {
            (ShotStatus::Success, None)
        };

        let annotations = input
            .render_overlay
            .then(|| overlay::annotate(records, side, Some(&release)));

        let release_time_secs =
            FrameClock::new(input.fps).map(|clock| clock.frame_to_secs(release.frame_index));

        tracing::info!(
            stage = %AnalysisStage::Done,
            status = %status,
            release_frame = release.frame_index,
            degrees,
            label = %feedback.label,
            "Shot analysis complete"
        );

        ShotReport {
            status,
            reason,
            failure: None,
            failed_at: None,
            shooting_side: side,
            total_frames: total,
            valid_frames: valid,
            fps: input.fps,
            angle: Some(AngleMeasurement {
                degrees,
                joints: side.arm(),
                frame_index: release.frame_index,
            }),
            release_time_secs,
            release: Some(release),
            feedback: Some(feedback),
            annotations,
        }
    }

    fn adapter<'a, E: PoseEstimator>(&self, estimator: &'a E) -> LandmarkAdapter<'a, E> {
        LandmarkAdapter::new(
            estimator,
            self.settings.shooting_side,
            self.settings.confidence_threshold,
        )
    }

    fn fail(
        &self,
        failure: AnalysisFailure,
        stage: AnalysisStage,
        total: usize,
        valid: usize,
        fps: f64,
    ) -> ShotReport {
        tracing::warn!(
            stage = %stage,
            code = failure.code(),
            total_frames = total,
            valid_frames = valid,
            "Shot analysis failed: {}",
            failure
        );
        ShotReport::failed(
            failure,
            stage,
            self.settings.shooting_side,
            total,
            valid,
            fps,
        )
    }
}

fn is_undecodable(record: &FrameRecord) -> bool {
    matches!(
        record.observation,
        Observation::Undetected {
            reason: UndetectedReason::Undecodable
        }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use shotform_pose_model::{JointSet, Landmark, ShootingSide};

    fn arm_record(index: usize, wrist: (f64, f64)) -> FrameRecord {
        let arm = ShootingSide::Right.arm();
        FrameRecord::detected(
            index,
            JointSet::new()
                .with(arm.shoulder, Landmark::new(100.0, 100.0, 0.9))
                .with(arm.elbow, Landmark::new(100.0, 150.0, 0.9))
                .with(arm.wrist, Landmark::new(wrist.0, wrist.1, 0.9)),
        )
    }

    fn analyzer() -> ShotAnalyzer {
        ShotAnalyzer::new(AnalysisSettings::default()).unwrap()
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let settings = AnalysisSettings {
            min_valid_frames: 0,
            ..AnalysisSettings::default()
        };
        assert!(ShotAnalyzer::new(settings).is_err());
    }

    #[test]
    fn test_empty_sequence_has_no_decodable_frames() {
        let report = analyzer().analyze_records(&[], &AnalysisInput::new(30.0));
        assert_eq!(report.failure, Some(AnalysisFailure::NoFramesDecodable));
        assert_eq!(report.failed_at, Some(AnalysisStage::Scanning));
    }

    #[test]
    fn test_all_undecodable_frames() {
        let records: Vec<FrameRecord> = (0..3)
            .map(|i| FrameRecord::undetected(i, UndetectedReason::Undecodable))
            .collect();
        let report = analyzer().analyze_records(&records, &AnalysisInput::new(30.0));
        assert_eq!(report.failure, Some(AnalysisFailure::NoFramesDecodable));
        assert_eq!(report.total_frames, 3);
    }

    #[test]
    fn test_degenerate_release_arm() {
        // Wrist on the elbow at the highest point.
        let records = vec![
            arm_record(0, (120.0, 160.0)),
            arm_record(1, (100.0, 150.0)),
            arm_record(2, (120.0, 170.0)),
        ];
        let report = analyzer().analyze_records(&records, &AnalysisInput::new(30.0));
        assert_eq!(
            report.failure,
            Some(AnalysisFailure::DegenerateGeometry { frame_index: 1 })
        );
        assert_eq!(report.failed_at, Some(AnalysisStage::AngleComputation));
        assert!(report.angle.is_none());
    }

    #[test]
    fn test_reject_policy_fails_boundary_release() {
        let settings = AnalysisSettings {
            boundary_policy: BoundaryPolicy::Reject,
            ..AnalysisSettings::default()
        };
        let records = vec![arm_record(0, (150.0, 80.0)), arm_record(1, (150.0, 120.0))];
        let report = ShotAnalyzer::new(settings)
            .unwrap()
            .analyze_records(&records, &AnalysisInput::new(30.0));
        assert_eq!(
            report.failure,
            Some(AnalysisFailure::BoundaryRelease { frame_index: 0 })
        );
    }

    #[test]
    fn test_release_time_uses_fps() {
        let records = vec![
            arm_record(0, (150.0, 140.0)),
            arm_record(1, (150.0, 120.0)),
            arm_record(2, (150.0, 130.0)),
        ];
        let report = analyzer().analyze_records(&records, &AnalysisInput::new(10.0));
        assert_eq!(report.status, ShotStatus::Success);
        assert!((report.release_time_secs.unwrap() - 0.1).abs() < 1e-12);

        let report = analyzer().analyze_records(&records, &AnalysisInput::new(0.0));
        assert!(report.release_time_secs.is_none());
        assert!(report.angle.is_some());
    }

    #[test]
    fn test_overlay_only_when_requested() {
        let records = vec![
            arm_record(0, (150.0, 140.0)),
            arm_record(1, (150.0, 120.0)),
            arm_record(2, (150.0, 130.0)),
        ];
        let analyzer = analyzer();
        let plain = analyzer.analyze_records(&records, &AnalysisInput::new(30.0));
        assert!(plain.annotations.is_none());

        let overlaid =
            analyzer.analyze_records(&records, &AnalysisInput::new(30.0).with_overlay(true));
        let annotations = overlaid.annotations.unwrap();
        assert_eq!(annotations.len(), 3);
        assert!(annotations[1].is_release);
    }
}
