//! Playback of recorded landmark streams.
//!
//! A recorded stream stands in for a live pose estimator: each stream
//! frame already carries its landmarks, and "estimation" only converts
//! them to pixel coordinates.

use std::path::Path;

use shotform_common::error::{ShotformError, ShotformResult};
use shotform_pose_model::{
    parse_landmark_stream, CoordinateSpace, JointSet, LandmarkStream, LandmarkStreamHeader,
    StreamFrame,
};

use crate::adapter::{PoseEstimator, PoseFrame};

impl PoseFrame for StreamFrame {}

/// A landmark stream replayed as a pose estimator.
#[derive(Debug, Clone)]
pub struct RecordedPoseStream {
    stream: LandmarkStream,
}

impl RecordedPoseStream {
    pub fn new(stream: LandmarkStream) -> Self {
        Self { stream }
    }

    /// Parse a stream from JSONL content.
    pub fn parse(jsonl: &str) -> ShotformResult<Self> {
        Ok(Self::new(parse_landmark_stream(jsonl)?))
    }

    /// Load a stream from a `.jsonl` file.
    pub fn from_path(path: &Path) -> ShotformResult<Self> {
        if !path.exists() {
            return Err(ShotformError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let recorded = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            frames = recorded.stream.frames.len(),
            detected = recorded.stream.detected_count(),
            "Loaded landmark stream"
        );
        Ok(recorded)
    }

    pub fn header(&self) -> &LandmarkStreamHeader {
        &self.stream.header
    }

    pub fn stream(&self) -> &LandmarkStream {
        &self.stream
    }

    /// Frames `0..=last`, with indices missing from the stream filled in as empty frames.
    ///
    /// Parsing bounds every gap by `MAX_FRAME_GAP`, so the result stays
    /// proportional to the recorded lines.
    pub fn dense_frames(&self) -> Vec<StreamFrame> {
        let Some(last) = self.stream.frames.last().map(|f| f.frame) else {
            return Vec::new();
        };

        let mut recorded = self.stream.frames.iter().peekable();
        (0..=last)
            .map(|index| match recorded.next_if(|f| f.frame == index) {
                Some(frame) => frame.clone(),
                None => StreamFrame {
                    frame: index,
                    landmarks: None,
                },
            })
            .collect()
    }
}

impl PoseEstimator for RecordedPoseStream {
    type Frame = StreamFrame;

    fn name(&self) -> &str {
        self.stream.header.source.as_deref().unwrap_or("recorded")
    }

    fn estimate(&self, frame: &StreamFrame) -> ShotformResult<Option<JointSet>> {
        let header = &self.stream.header;
        Ok(frame.landmarks.as_ref().map(|joints| match header.coordinate_space {
            CoordinateSpace::Pixel => joints.clone(),
            CoordinateSpace::Normalized => {
                let (width, height) = (f64::from(header.width), f64::from(header.height));
                joints.map_landmarks(|lm| lm.scaled(width, height))
            }
        }))
    }
}
