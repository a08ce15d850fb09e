//! Pose estimation adapter.
//!
//! Wraps an external pose estimator behind a narrow interface and turns
//! its raw output into per-frame observations. Confidence gating happens
//! here: joints below the threshold are dropped, and a frame that loses
//! any joint of the shooting arm becomes undetected.

use shotform_common::error::ShotformResult;
use shotform_pose_model::{JointSet, Observation, ShootingSide, UndetectedReason};

/// A frame as handed to a pose estimator.
pub trait PoseFrame {
    /// Whether the frame can be fed to the estimator at all.
    fn is_decodable(&self) -> bool {
        true
    }
}

/// Trait for pose estimation backends.
pub trait PoseEstimator {
    type Frame: PoseFrame;

    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Estimate landmarks for one frame.
    ///
    /// Returns `Ok(None)` when no person is found. Coordinates must be in
    /// pixels of the frame.
    fn estimate(&self, frame: &Self::Frame) -> ShotformResult<Option<JointSet>>;
}

/// A decoded raster frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl FrameImage {
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    /// Expected buffer length, or `None` on overflow.
    pub fn expected_len(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.channels as usize)
    }
}

impl PoseFrame for FrameImage {
    fn is_decodable(&self) -> bool {
        self.width > 0
            && self.height > 0
            && (1..=4).contains(&self.channels)
            && self.expected_len() == Some(self.pixels.len())
    }
}

/// Applies confidence gating on top of a pose estimator.
pub struct LandmarkAdapter<'a, E: PoseEstimator> {
    estimator: &'a E,
    side: ShootingSide,
    confidence_threshold: f64,
}

impl<'a, E: PoseEstimator> LandmarkAdapter<'a, E> {
    pub fn new(estimator: &'a E, side: ShootingSide, confidence_threshold: f64) -> Self {
        Self {
            estimator,
            side,
            confidence_threshold,
        }
    }

    pub fn estimator_name(&self) -> &str {
        self.estimator.name()
    }

    /// Observe one frame. Never fails: every problem maps to an undetected reason.
    pub fn detect(&self, frame: &E::Frame) -> Observation {
        if !frame.is_decodable() {
            return Observation::undetected(UndetectedReason::Undecodable);
        }

        let joints = match self.estimator.estimate(frame) {
            Ok(Some(joints)) => joints,
            Ok(None) => return Observation::undetected(UndetectedReason::NoPose),
            Err(e) => {
                tracing::debug!(
                    estimator = %self.estimator.name(),
                    error = %e,
                    "Pose estimation failed"
                );
                return Observation::undetected(UndetectedReason::EstimatorError);
            }
        };

        let confident = joints.retain_confident(self.confidence_threshold);
        if confident.arm(self.side.arm()).is_none() {
            return Observation::undetected(UndetectedReason::LowConfidence);
        }

        Observation::Detected { joints: confident }
    }
}
