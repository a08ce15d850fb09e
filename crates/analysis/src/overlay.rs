//! Per-frame overlay annotations.
//!
//! Presentation data only: the elbow angle at every frame where the arm
//! is visible, plus a marker on the release frame.

use shotform_pose_model::{FrameAnnotation, FrameRecord, ReleaseEvent, ShootingSide};

use crate::angle::arm_angle;

/// Build one annotation per record, in input order.
pub fn annotate(
    records: &[FrameRecord],
    side: ShootingSide,
    release: Option<&ReleaseEvent>,
) -> Vec<FrameAnnotation> {
    let joints = side.arm();
    let release_frame = release.map(|r| r.frame_index);

    records
        .iter()
        .map(|record| FrameAnnotation {
            frame_index: record.index,
            detected: record.observation.is_detected(),
            elbow_angle: record
                .joints()
                .and_then(|set| set.arm(joints))
                .and_then(|arm| arm_angle(&arm).ok()),
            is_release: release_frame == Some(record.index),
        })
        .collect()
}
