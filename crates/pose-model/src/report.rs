//! Shot analysis results.

use serde::{Deserialize, Serialize};

use crate::feedback::Rating;
use crate::frame::FrameIndex;
use crate::joint::{ArmJoints, ShootingSide};
use crate::landmark::ArmPose;

/// The frame selected as the moment the ball leaves the hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseEvent {
    pub frame_index: FrameIndex,

    /// Confidence in `[0.0, 1.0]` that this frame is the true release.
    pub confidence: f64,

    /// The minimum was at the first or last valid frame.
    pub at_boundary: bool,

    /// Raw arm joints at the release frame.
    pub arm: ArmPose,
}

/// Elbow angle at the release frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AngleMeasurement {
    /// Degrees in `[0, 180]`.
    pub degrees: f64,
    pub joints: ArmJoints,
    pub frame_index: FrameIndex,
}

/// Classifier output for one angle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    pub label: String,
    pub rating: Rating,
    pub recommendation: String,
    /// Range of the matched band, e.g. `[90, 120)`.
    pub range: String,
}

/// Overall outcome of an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShotStatus {
    Success,
    /// A result is available but the release sits at a sequence boundary.
    Degraded,
    Failed,
}

impl std::fmt::Display for ShotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Success => f.write_str("success"),
            Self::Degraded => f.write_str("degraded"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Stages of the shot analysis state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisStage {
    Idle,
    Scanning,
    EventSelection,
    AngleComputation,
    Classification,
    Done,
}

impl std::fmt::Display for AnalysisStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Scanning => "scanning",
            Self::EventSelection => "event_selection",
            Self::AngleComputation => "angle_computation",
            Self::Classification => "classification",
            Self::Done => "done",
        };
        f.write_str(name)
    }
}

/// Terminal reasons for a failed analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum AnalysisFailure {
    #[error("no decodable frames in the source")]
    NoFramesDecodable,

    #[error("only {valid} valid frame(s), at least {required} required")]
    InsufficientData { valid: usize, required: usize },

    #[error("shoulder, elbow and wrist coincide at frame {frame_index}")]
    DegenerateGeometry { frame_index: FrameIndex },

    #[error("release found at sequence boundary (frame {frame_index})")]
    BoundaryRelease { frame_index: FrameIndex },

    #[error("analysis cancelled")]
    Cancelled,
}

impl AnalysisFailure {
    /// Stable machine-readable reason code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoFramesDecodable => "no_frames_decodable",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::DegenerateGeometry { .. } => "degenerate_geometry",
            Self::BoundaryRelease { .. } => "boundary_release",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Presentational annotation for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameAnnotation {
    pub frame_index: FrameIndex,
    pub detected: bool,
    /// Elbow angle at this frame, when the arm is present and non-degenerate.
    pub elbow_angle: Option<f64>,
    pub is_release: bool,
}

/// Final report of one shot analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShotReport {
    pub status: ShotStatus,

    /// Set when `status` is not `success`: failure reason or degradation note.
    pub reason: Option<String>,

    pub failure: Option<AnalysisFailure>,

    /// Stage that was running when the analysis failed.
    pub failed_at: Option<AnalysisStage>,

    pub shooting_side: ShootingSide,

    pub total_frames: usize,
    pub valid_frames: usize,

    /// Declared frame rate of the source.
    pub fps: f64,

    pub release: Option<ReleaseEvent>,

    /// Release time in seconds, derived from the declared frame rate.
    pub release_time_secs: Option<f64>,

    pub angle: Option<AngleMeasurement>,

    pub feedback: Option<Feedback>,

    /// Present only when overlay rendering was requested.
    pub annotations: Option<Vec<FrameAnnotation>>,
}

impl ShotReport {
    /// A failed report carrying whatever frame counts were gathered.
    pub fn failed(
        failure: AnalysisFailure,
        stage: AnalysisStage,
        shooting_side: ShootingSide,
        total_frames: usize,
        valid_frames: usize,
        fps: f64,
    ) -> Self {
        Self {
            status: ShotStatus::Failed,
            reason: Some(failure.to_string()),
            failure: Some(failure),
            failed_at: Some(stage),
            shooting_side,
            total_frames,
            valid_frames,
            fps,
            release: None,
            release_time_secs: None,
            angle: None,
            feedback: None,
            annotations: None,
        }
    }

    pub fn release_frame(&self) -> Option<FrameIndex> {
        self.release.as_ref().map(|r| r.frame_index)
    }

    pub fn release_degrees(&self) -> Option<f64> {
        self.angle.as_ref().map(|a| a.degrees)
    }

    pub fn is_failed(&self) -> bool {
        self.status == ShotStatus::Failed
    }
}
