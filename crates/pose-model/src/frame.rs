//! Per-frame observations and the recorded landmark stream format.
//!
//! A landmark stream is JSONL: the first line is a `#`-prefixed JSON
//! header, every following line is one frame. Frames without a pose
//! carry `"landmarks": null`.
//!
//! ```text
//! # {"schema_version":"1.0","width":1920,"height":1080,"fps":30.0,"coordinate_space":"pixel"}
//! {"frame":0,"landmarks":{"right_wrist":{"x":812.0,"y":402.5,"confidence":0.93}}}
//! {"frame":1,"landmarks":null}
//! ```

use serde::{Deserialize, Serialize};

use crate::landmark::JointSet;

/// Zero-based position of a frame in the source video.
pub type FrameIndex = usize;

/// Why a frame produced no usable pose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndetectedReason {
    /// The estimator found no person.
    NoPose,
    /// The frame could not be decoded (empty or malformed buffer).
    Undecodable,
    /// A joint required for analysis fell below the confidence threshold.
    LowConfidence,
    /// The estimator reported an error for this frame.
    EstimatorError,
}

/// What the pose estimator produced for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    Detected { joints: JointSet },
    Undetected { reason: UndetectedReason },
}

impl Observation {
    pub fn undetected(reason: UndetectedReason) -> Self {
        Self::Undetected { reason }
    }

    pub fn joints(&self) -> Option<&JointSet> {
        match self {
            Self::Detected { joints } => Some(joints),
            Self::Undetected { .. } => None,
        }
    }

    pub fn is_detected(&self) -> bool {
        matches!(self, Self::Detected { .. })
    }
}

/// One entry of the per-shot observation sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameRecord {
    pub index: FrameIndex,
    pub observation: Observation,
}

impl FrameRecord {
    pub fn detected(index: FrameIndex, joints: JointSet) -> Self {
        Self {
            index,
            observation: Observation::Detected { joints },
        }
    }

    pub fn undetected(index: FrameIndex, reason: UndetectedReason) -> Self {
        Self {
            index,
            observation: Observation::undetected(reason),
        }
    }

    pub fn joints(&self) -> Option<&JointSet> {
        self.observation.joints()
    }
}

/// Coordinate space of landmark positions in a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CoordinateSpace {
    /// Image pixels, origin top-left.
    #[default]
    Pixel,
    /// Normalized `[0, 1]` relative to frame width/height, origin top-left.
    Normalized,
}

/// Header line of a landmark stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandmarkStreamHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Source frame dimensions in pixels.
    pub width: u32,
    pub height: u32,

    /// Declared frame rate. Only used for human-readable timing.
    pub fps: f64,

    #[serde(default)]
    pub coordinate_space: CoordinateSpace,

    /// Free-form identifier of the producing pose model.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl LandmarkStreamHeader {
    pub const SCHEMA_VERSION: &'static str = "1.0";

    pub fn new(width: u32, height: u32, fps: f64) -> Self {
        Self {
            schema_version: Self::SCHEMA_VERSION.to_string(),
            width,
            height,
            fps,
            coordinate_space: CoordinateSpace::Pixel,
            source: None,
        }
    }
}

/// One frame line of a landmark stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamFrame {
    pub frame: FrameIndex,
    #[serde(default)]
    pub landmarks: Option<JointSet>,
}

/// A parsed landmark stream.
#[derive(Debug, Clone, PartialEq)]
pub struct LandmarkStream {
    pub header: LandmarkStreamHeader,
    pub frames: Vec<StreamFrame>,
}

impl LandmarkStream {
    /// Number of frames that carry landmarks.
    pub fn detected_count(&self) -> usize {
        self.frames.iter().filter(|f| f.landmarks.is_some()).count()
    }
}

/// Longest run of missing frame indices a stream may contain.
///
/// Gaps are filled with empty frames on playback, so this bounds the
/// work per recorded line.
pub const MAX_FRAME_GAP: usize = 10_000;

/// Landmark stream parse failures.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    #[error("landmark stream has no '#' header line")]
    MissingHeader,

    #[error("invalid stream header: {source}")]
    InvalidHeader { source: serde_json::Error },

    #[error("invalid frame on line {line}: {source}")]
    InvalidFrame {
        line: usize,
        source: serde_json::Error,
    },

    #[error("frame index {found} on line {line} does not follow {previous}")]
    NonMonotonic {
        line: usize,
        previous: FrameIndex,
        found: FrameIndex,
    },

    #[error(
        "frame index {found} on line {line} leaves a gap of {gap} frames (max {max})",
        max = MAX_FRAME_GAP
    )]
    FrameGap {
        line: usize,
        found: FrameIndex,
        gap: usize,
    },
}

/// Parse a landmark stream from JSONL content.
pub fn parse_landmark_stream(jsonl: &str) -> Result<LandmarkStream, StreamError> {
    let mut header = None;
    let mut frames: Vec<StreamFrame> = Vec::new();

    for (number, raw) in jsonl.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(comment) = line.strip_prefix('#') {
            // Only the first comment is the header; later ones are notes.
            if header.is_none() && frames.is_empty() {
                let parsed = serde_json::from_str(comment.trim())
                    .map_err(|source| StreamError::InvalidHeader { source })?;
                header = Some(parsed);
            }
            continue;
        }

        let frame: StreamFrame =
            serde_json::from_str(line).map_err(|source| StreamError::InvalidFrame {
                line: number + 1,
                source,
            })?;

        let next = match frames.last().map(|f| f.frame) {
            Some(previous) if frame.frame <= previous => {
                return Err(StreamError::NonMonotonic {
                    line: number + 1,
                    previous,
                    found: frame.frame,
                });
            }
            Some(previous) => previous + 1,
            None => 0,
        };

        let gap = frame.frame - next;
        if gap > MAX_FRAME_GAP {
            return Err(StreamError::FrameGap {
                line: number + 1,
                found: frame.frame,
                gap,
            });
        }

        frames.push(frame);
    }

    let header = header.ok_or(StreamError::MissingHeader)?;
    Ok(LandmarkStream { header, frames })
}
