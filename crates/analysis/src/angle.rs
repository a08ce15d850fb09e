//! Joint angle geometry.
//!
//! The elbow angle is the angle between the upper arm (elbow → shoulder)
//! and the forearm (elbow → wrist), measured in the image plane:
//!
//! ```text
//! cos(θ) = (v1 · v2) / (|v1| |v2|),  θ ∈ [0°, 180°]
//! ```
//!
//! 180° is a fully straight arm; 90° is a right-angle bend.

use shotform_pose_model::{ArmPose, Point2D};

/// Segments shorter than this (in coordinate units) make the angle undefined.
pub const MIN_SEGMENT_LENGTH: f64 = 1e-6;

/// The joint triple does not define an angle.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GeometryError {
    #[error("degenerate geometry: {segment} segment has length {length:.3e}")]
    Degenerate { segment: Segment, length: f64 },
}

/// Which arm segment collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    UpperArm,
    Forearm,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UpperArm => f.write_str("upper arm"),
            Self::Forearm => f.write_str("forearm"),
        }
    }
}

/// Angle at `elbow` between `shoulder` and `wrist`, in degrees.
pub fn angle_at(shoulder: Point2D, elbow: Point2D, wrist: Point2D) -> Result<f64, GeometryError> {
    let (ux, uy) = elbow.vector_to(&shoulder);
    let (fx, fy) = elbow.vector_to(&wrist);

    let upper = ux.hypot(uy);
    let fore = fx.hypot(fy);

    // Also catches NaN lengths, which fail every comparison.
    if !(upper >= MIN_SEGMENT_LENGTH && upper.is_finite()) {
        return Err(GeometryError::Degenerate {
            segment: Segment::UpperArm,
            length: upper,
        });
    }
    if !(fore >= MIN_SEGMENT_LENGTH && fore.is_finite()) {
        return Err(GeometryError::Degenerate {
            segment: Segment::Forearm,
            length: fore,
        });
    }

    let cosine = ((ux * fx + uy * fy) / (upper * fore)).clamp(-1.0, 1.0);
    Ok(cosine.acos().to_degrees())
}

/// Elbow angle of an arm pose.
pub fn arm_angle(arm: &ArmPose) -> Result<f64, GeometryError> {
    angle_at(arm.shoulder.point(), arm.elbow.point(), arm.wrist.point())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(x: f64, y: f64) -> Point2D {
        Point2D::new(x, y)
    }

    #[test]
    fn test_right_angle() {
        let angle = angle_at(p(0.0, -1.0), p(0.0, 0.0), p(1.0, 0.0)).unwrap();
        assert!((angle - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_straight_arm() {
        let angle = angle_at(p(0.0, 0.0), p(50.0, 0.0), p(100.0, 0.0)).unwrap();
        assert!((angle - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_folded_arm_is_zero() {
        // Wrist back on the shoulder side of the elbow.
        let angle = angle_at(p(0.0, 0.0), p(10.0, 0.0), p(2.0, 0.0)).unwrap();
        assert!(angle.abs() < 1e-9);
    }

    #[test]
    fn test_coincident_joints_are_degenerate() {
        let err = angle_at(p(5.0, 5.0), p(5.0, 5.0), p(9.0, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Degenerate {
                segment: Segment::UpperArm,
                ..
            }
        ));

        let err = angle_at(p(0.0, 0.0), p(5.0, 5.0), p(5.0, 5.0)).unwrap_err();
        assert!(matches!(
            err,
            GeometryError::Degenerate {
                segment: Segment::Forearm,
                ..
            }
        ));
    }

    #[test]
    fn test_nan_input_is_degenerate_not_nan() {
        assert!(angle_at(p(f64::NAN, 0.0), p(0.0, 0.0), p(1.0, 0.0)).is_err());
    }

    #[test]
    fn test_angle_is_side_symmetric() {
        // Mirroring the triple horizontally must not change the angle.
        let right = angle_at(p(100.0, 100.0), p(130.0, 160.0), p(110.0, 60.0)).unwrap();
        let left = angle_at(p(-100.0, 100.0), p(-130.0, 160.0), p(-110.0, 60.0)).unwrap();
        assert!((right - left).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn prop_angle_in_range(
            sx in -1e4f64..1e4, sy in -1e4f64..1e4,
            ex in -1e4f64..1e4, ey in -1e4f64..1e4,
            wx in -1e4f64..1e4, wy in -1e4f64..1e4,
        ) {
            match angle_at(p(sx, sy), p(ex, ey), p(wx, wy)) {
                Ok(angle) => prop_assert!((0.0..=180.0).contains(&angle)),
                Err(GeometryError::Degenerate { length, .. }) => {
                    prop_assert!(length < MIN_SEGMENT_LENGTH)
                }
            }
        }

        #[test]
        fn prop_constructed_angle_is_recovered(
            degrees in 1.0f64..179.0,
            rotation in 0.0f64..360.0,
            upper in 1.0f64..500.0,
            fore in 1.0f64..500.0,
        ) {
            let elbow = p(320.0, 240.0);
            let base = rotation.to_radians();
            let target = base + degrees.to_radians();
            let shoulder = p(elbow.x + upper * base.cos(), elbow.y + upper * base.sin());
            let wrist = p(elbow.x + fore * target.cos(), elbow.y + fore * target.sin());
            let angle = angle_at(shoulder, elbow, wrist).unwrap();
            prop_assert!((angle - degrees).abs() < 1e-6);
        }
    }
}
