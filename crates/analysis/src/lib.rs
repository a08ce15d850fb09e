//! Shotform Analysis: the release-angle pipeline
//!
//! Turns a per-frame stream of body landmarks into a shot report:
//! - **Adapter:** Confidence gating over a pluggable pose estimator
//! - **Release detection:** Earliest highest wrist position over the shot
//! - **Angle geometry:** Elbow angle at the release frame
//! - **Classification:** Angle-to-feedback band lookup
//!
//! This crate is pure computation. Frames come in through the
//! [`PoseEstimator`] trait; reports come out as plain data.

pub mod adapter;
pub mod angle;
pub mod cancel;
pub mod classifier;
pub mod overlay;
pub mod pipeline;
pub mod recorded;
pub mod release;
pub mod smoothing;

pub use adapter::{FrameImage, LandmarkAdapter, PoseEstimator, PoseFrame};
pub use cancel::CancellationToken;
pub use classifier::FeedbackClassifier;
pub use pipeline::{AnalysisInput, ShotAnalyzer};
pub use recorded::RecordedPoseStream;
pub use release::ReleaseDetector;
pub use smoothing::TrackSmoother;
