//! Analysis settings passed to the shot analyzer at construction.

use serde::{Deserialize, Serialize};

use crate::feedback::FeedbackBands;
use crate::joint::ShootingSide;

/// What to do when the highest wrist position is at the first or last valid frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Keep the event with reduced confidence; the report is `degraded`.
    #[default]
    Degrade,
    /// Treat a boundary release as a failed analysis.
    Reject,
}

impl std::str::FromStr for BoundaryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(Self::Degrade),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown boundary policy '{other}' (expected degrade|reject)"
            )),
        }
    }
}

/// Optional smoothing of the wrist height track before the extremum scan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "algorithm", rename_all = "snake_case")]
pub enum WristSmoothing {
    /// Use raw wrist heights.
    #[default]
    None,
    /// Centered moving average over `window` valid samples.
    MovingAverage { window: usize },
    /// 1-D Gaussian filter with standard deviation `sigma` (in samples).
    Gaussian { sigma: f64 },
}

impl std::str::FromStr for WristSmoothing {
    type Err = String;

    /// Parses `none`, `moving_average:<window>` or `gaussian:<sigma>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        let (name, arg) = match s.split_once(':') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s.as_str(), None),
        };
        match (name, arg) {
            ("none", None) => Ok(Self::None),
            ("moving_average" | "ma", Some(arg)) => arg
                .parse()
                .map(|window| Self::MovingAverage { window })
                .map_err(|e| format!("invalid moving average window '{arg}': {e}")),
            ("gaussian", Some(arg)) => arg
                .parse()
                .map(|sigma| Self::Gaussian { sigma })
                .map_err(|e| format!("invalid gaussian sigma '{arg}': {e}")),
            ("gaussian", None) => Ok(Self::Gaussian { sigma: 1.0 }),
            _ => Err(format!(
                "unknown smoothing '{s}' (expected none|moving_average:<n>|gaussian:<sigma>)"
            )),
        }
    }
}

/// All tunables of one shot analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Which arm releases the ball.
    pub shooting_side: ShootingSide,

    /// Minimum landmark confidence in `[0.0, 1.0]`.
    pub confidence_threshold: f64,

    /// Fewer valid frames than this fails with insufficient data.
    pub min_valid_frames: usize,

    /// Handling of a release found at the first or last valid frame.
    pub boundary_policy: BoundaryPolicy,

    /// Multiplier in `[0.0, 1.0]` applied to a boundary release's confidence.
    pub boundary_penalty: f64,

    pub wrist_smoothing: WristSmoothing,

    pub feedback_bands: FeedbackBands,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            shooting_side: ShootingSide::Right,
            confidence_threshold: 0.5,
            min_valid_frames: 2,
            boundary_policy: BoundaryPolicy::Degrade,
            boundary_penalty: 0.5,
            wrist_smoothing: WristSmoothing::None,
            feedback_bands: FeedbackBands::standard(),
        }
    }
}

/// Settings that cannot drive an analysis.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SettingsError {
    #[error("confidence threshold {0} is outside [0, 1]")]
    ConfidenceThreshold(f64),

    #[error("min_valid_frames must be at least 1")]
    MinValidFrames,

    #[error("boundary penalty {0} is outside [0, 1]")]
    BoundaryPenalty(f64),

    #[error("moving average window must be at least 1")]
    SmoothingWindow,

    #[error("gaussian sigma {0} must be finite and positive")]
    SmoothingSigma(f64),
}

impl AnalysisSettings {
    /// Check ranges that serde cannot enforce.
    pub fn validate(&self) -> Result<(), SettingsError> {
        if !(0.0..=1.0).contains(&self.confidence_threshold) {
            return Err(SettingsError::ConfidenceThreshold(
                self.confidence_threshold,
            ));
        }
        if self.min_valid_frames == 0 {
            return Err(SettingsError::MinValidFrames);
        }
        if !(0.0..=1.0).contains(&self.boundary_penalty) {
            return Err(SettingsError::BoundaryPenalty(self.boundary_penalty));
        }
        match self.wrist_smoothing {
            WristSmoothing::MovingAverage { window: 0 } => Err(SettingsError::SmoothingWindow),
            WristSmoothing::Gaussian { sigma } if !(sigma.is_finite() && sigma > 0.0) => {
                Err(SettingsError::SmoothingSigma(sigma))
            }
            _ => Ok(()),
        }
    }
}
