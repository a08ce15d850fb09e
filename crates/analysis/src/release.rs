//! Release event detection.
//!
//! The release is approximated by the highest wrist position of the
//! shot. In image coordinates "highest" is the *smallest* `y`.
//!
//! # Algorithm
//!
//! 1. **Track**: collect `(frame_index, wrist_y)` for every frame whose
//!    arm triple is present. Undetected frames are skipped; their indices
//!    are simply absent, so the remaining samples keep their positions on
//!    the video timeline.
//! 2. **Smooth** (optional): filter the heights of the valid samples.
//! 3. **Scan**: one left-to-right pass keeping the running minimum. Only a
//!    strictly smaller value replaces it, so the earliest frame wins ties
//!    and a follow-through that returns to the same height is ignored.
//! 4. **Qualify**: a minimum at the first or last valid sample is flagged
//!    as a boundary release with reduced confidence.

use shotform_pose_model::{
    AnalysisSettings, ArmPose, FrameIndex, FrameRecord, ReleaseEvent, ShootingSide,
    WristSmoothing,
};

use crate::smoothing::TrackSmoother;

/// Release detection failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ReleaseError {
    #[error("insufficient data: {valid} valid frame(s), {required} required")]
    InsufficientData { valid: usize, required: usize },
}

/// Detector configuration, usually derived from [`AnalysisSettings`].
#[derive(Debug, Clone)]
pub struct ReleaseConfig {
    pub side: ShootingSide,
    pub min_valid_frames: usize,
    /// Confidence multiplier applied to boundary releases.
    pub boundary_penalty: f64,
    pub smoothing: WristSmoothing,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        Self::from_settings(&AnalysisSettings::default())
    }
}

impl ReleaseConfig {
    pub fn from_settings(settings: &AnalysisSettings) -> Self {
        Self {
            side: settings.shooting_side,
            min_valid_frames: settings.min_valid_frames,
            boundary_penalty: settings.boundary_penalty,
            smoothing: settings.wrist_smoothing,
        }
    }
}

/// Pure release detector over a complete frame sequence.
pub struct ReleaseDetector {
    config: ReleaseConfig,
    smoother: TrackSmoother,
}

impl ReleaseDetector {
    pub fn new(config: ReleaseConfig) -> Self {
        let smoother = TrackSmoother::new(config.smoothing);
        Self { config, smoother }
    }

    pub fn with_defaults() -> Self {
        Self::new(ReleaseConfig::default())
    }

    pub fn config(&self) -> &ReleaseConfig {
        &self.config
    }

    /// Frames that carry the full arm triple for the configured side.
    pub fn valid_arms<'a>(
        &self,
        records: &'a [FrameRecord],
    ) -> impl Iterator<Item = (FrameIndex, ArmPose)> + 'a {
        let joints = self.config.side.arm();
        records
            .iter()
            .filter_map(move |record| Some((record.index, record.joints()?.arm(joints)?)))
    }

    /// Number of frames usable for detection.
    pub fn count_valid(&self, records: &[FrameRecord]) -> usize {
        self.valid_arms(records).count()
    }

    /// Detect the release event in a temporally ordered record sequence.
    pub fn detect(&self, records: &[FrameRecord]) -> Result<ReleaseEvent, ReleaseError> {
        let arms: Vec<(FrameIndex, ArmPose)> = self.valid_arms(records).collect();

        if arms.len() < self.config.min_valid_frames || arms.is_empty() {
            return Err(ReleaseError::InsufficientData {
                valid: arms.len(),
                required: self.config.min_valid_frames,
            });
        }

        let raw_track: Vec<(FrameIndex, f64)> =
            arms.iter().map(|(index, arm)| (*index, arm.wrist.y)).collect();
        let track = self.smoother.smooth(&raw_track);

        let position = earliest_minimum(&track).ok_or(ReleaseError::InsufficientData {
            valid: 0,
            required: self.config.min_valid_frames,
        })?;

        let (frame_index, arm) = arms[position];
        let at_boundary = position == 0 || position == arms.len() - 1;
        let penalty = if at_boundary {
            self.config.boundary_penalty
        } else {
            1.0
        };

        tracing::debug!(
            frame_index,
            wrist_y = track[position].1,
            valid_frames = arms.len(),
            at_boundary,
            "Release candidate selected"
        );

        Ok(ReleaseEvent {
            frame_index,
            confidence: (arm.min_confidence() * penalty).clamp(0.0, 1.0),
            at_boundary,
            arm,
        })
    }
}

/// Position of the first sample holding the minimum height.
///
/// Non-finite heights are skipped. Returns `None` when no finite sample exists.
pub fn earliest_minimum(track: &[(FrameIndex, f64)]) -> Option<usize> {
    track
        .iter()
        .enumerate()
        .filter(|(_, (_, y))| y.is_finite())
        .fold(None, |best: Option<(usize, f64)>, (position, (_, y))| match best {
            Some((_, best_y)) if *y >= best_y => best,
            _ => Some((position, *y)),
        })
        .map(|(position, _)| position)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use shotform_pose_model::{Joint, JointSet, Landmark, UndetectedReason};

    fn arm_frame(index: FrameIndex, wrist_y: f64, side: ShootingSide) -> FrameRecord {
        let arm = side.arm();
        let joints = JointSet::new()
            .with(arm.shoulder, Landmark::new(100.0, 120.0, 0.9))
            .with(arm.elbow, Landmark::new(130.0, 170.0, 0.8))
            .with(arm.wrist, Landmark::new(120.0, wrist_y, 0.7));
        FrameRecord::detected(index, joints)
    }

    fn sequence(heights: &[Option<f64>]) -> Vec<FrameRecord> {
        heights
            .iter()
            .enumerate()
            .map(|(i, h)| match h {
                Some(y) => arm_frame(i, *y, ShootingSide::Right),
                None => FrameRecord::undetected(i, UndetectedReason::NoPose),
            })
            .collect()
    }

    fn all_valid(heights: &[f64]) -> Vec<FrameRecord> {
        sequence(&heights.iter().map(|h| Some(*h)).collect::<Vec<_>>())
    }

    #[test]
    fn test_detects_highest_wrist() {
        let records = all_valid(&[50.0, 45.0, 40.0, 10.0, 42.0, 44.0, 46.0, 48.0, 49.0, 50.0]);
        let event = ReleaseDetector::with_defaults().detect(&records).unwrap();
        assert_eq!(event.frame_index, 3);
        assert!(!event.at_boundary);
        assert!((event.confidence - 0.7).abs() < 1e-12);
        assert_eq!(event.arm.wrist.y, 10.0);
    }

    #[test]
    fn test_tie_prefers_earliest_frame() {
        let records = all_valid(&[50.0, 20.0, 30.0, 20.0, 40.0]);
        let event = ReleaseDetector::with_defaults().detect(&records).unwrap();
        assert_eq!(event.frame_index, 1);
    }

    #[test]
    fn test_gaps_keep_original_indices() {
        let records = sequence(&[Some(50.0), None, None, Some(30.0), None, Some(5.0), Some(40.0)]);
        let event = ReleaseDetector::with_defaults().detect(&records).unwrap();
        assert_eq!(event.frame_index, 5);
        assert!(!event.at_boundary);
    }

    #[test]
    fn test_gap_does_not_reset_minimum() {
        // The early low value must survive the undetected run.
        let records = sequence(&[Some(40.0), Some(10.0), None, None, None, Some(20.0), Some(30.0)]);
        let event = ReleaseDetector::with_defaults().detect(&records).unwrap();
        assert_eq!(event.frame_index, 1);
    }

    #[test]
    fn test_boundary_minimum_is_flagged() {
        let detector = ReleaseDetector::with_defaults();

        let first = detector.detect(&all_valid(&[5.0, 20.0, 30.0])).unwrap();
        assert!(first.at_boundary);
        assert_eq!(first.frame_index, 0);
        assert!((first.confidence - 0.35).abs() < 1e-12);

        let last = detector
            .detect(&sequence(&[Some(30.0), Some(20.0), Some(5.0), None]))
            .unwrap();
        assert!(last.at_boundary);
        assert_eq!(last.frame_index, 2);
    }

    #[test]
    fn test_insufficient_data() {
        let detector = ReleaseDetector::with_defaults();
        let err = detector
            .detect(&sequence(&[None, Some(10.0), None]))
            .unwrap_err();
        assert_eq!(
            err,
            ReleaseError::InsufficientData {
                valid: 1,
                required: 2
            }
        );
        assert!(detector.detect(&[]).is_err());
    }

    #[test]
    fn test_wrong_side_frames_are_not_valid() {
        let records: Vec<FrameRecord> = (0..4)
            .map(|i| arm_frame(i, 10.0 * i as f64, ShootingSide::Left))
            .collect();
        let right = ReleaseDetector::with_defaults();
        assert_eq!(right.count_valid(&records), 0);

        let left = ReleaseDetector::new(ReleaseConfig {
            side: ShootingSide::Left,
            ..ReleaseConfig::default()
        });
        assert_eq!(left.count_valid(&records), 4);
        assert_eq!(left.detect(&records).unwrap().frame_index, 0);
    }

    #[test]
    fn test_partial_arm_is_not_valid() {
        let mut records = all_valid(&[30.0, 20.0, 25.0]);
        records.push(FrameRecord::detected(
            3,
            JointSet::new().with(Joint::RightWrist, Landmark::new(0.0, 1.0, 1.0)),
        ));
        let event = ReleaseDetector::with_defaults().detect(&records).unwrap();
        assert_eq!(event.frame_index, 1);
        assert!(!event.at_boundary);
    }

    #[test]
    fn test_smoothing_ignores_single_frame_glitch() {
        // A one-frame spike at index 1 versus a broad apex around index 5.
        let heights = [50.0, 5.0, 50.0, 30.0, 20.0, 12.0, 20.0, 30.0, 45.0];
        let raw = ReleaseDetector::with_defaults()
            .detect(&all_valid(&heights))
            .unwrap();
        assert_eq!(raw.frame_index, 1);

        let smoothed = ReleaseDetector::new(ReleaseConfig {
            smoothing: WristSmoothing::Gaussian { sigma: 1.0 },
            ..ReleaseConfig::default()
        })
        .detect(&all_valid(&heights))
        .unwrap();
        assert_eq!(smoothed.frame_index, 5);
        assert_eq!(smoothed.arm.wrist.y, 12.0);
    }

    #[test]
    fn test_earliest_minimum_skips_nan() {
        let track = [(0, f64::NAN), (1, 3.0), (2, 1.0), (3, 1.0)];
        assert_eq!(earliest_minimum(&track), Some(2));
        assert_eq!(earliest_minimum(&[(0, f64::NAN)]), None);
        assert_eq!(earliest_minimum(&[]), None);
    }

    proptest! {
        #[test]
        fn prop_release_is_earliest_valid_minimum(
            heights in proptest::collection::vec(
                proptest::option::weighted(0.7, 0u32..500), 0..60
            )
        ) {
            let heights: Vec<Option<f64>> =
                heights.into_iter().map(|h| h.map(f64::from)).collect();
            let records = sequence(&heights);
            let valid: Vec<(usize, f64)> = heights
                .iter()
                .enumerate()
                .filter_map(|(i, h)| h.map(|y| (i, y)))
                .collect();

            match ReleaseDetector::with_defaults().detect(&records) {
                Ok(event) => {
                    prop_assert!(valid.len() >= 2);
                    let min = valid.iter().map(|(_, y)| *y).fold(f64::INFINITY, f64::min);
                    let expected = valid.iter().find(|(_, y)| *y == min).map(|(i, _)| *i);
                    prop_assert_eq!(Some(event.frame_index), expected);
                    prop_assert!(records[event.frame_index].observation.is_detected());

                    let first = valid.first().map(|(i, _)| *i);
                    let last = valid.last().map(|(i, _)| *i);
                    let boundary = Some(event.frame_index) == first
                        || Some(event.frame_index) == last;
                    prop_assert_eq!(event.at_boundary, boundary);
                }
                Err(ReleaseError::InsufficientData { valid: n, required }) => {
                    prop_assert!(n < required);
                    prop_assert_eq!(n, valid.len());
                }
            }
        }
    }
}
