//! Landmark positions and per-frame joint sets.
//!
//! Coordinates use image-pixel convention: `(0, 0)` is the top-left
//! corner and `y` grows downward, so a *smaller* `y` is a physically
//! *higher* position.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::joint::{ArmJoints, Joint};

/// A 2D point in image space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Vector from `self` to `other`.
    pub fn vector_to(&self, other: &Point2D) -> (f64, f64) {
        (other.x - self.x, other.y - self.y)
    }
}

/// One estimated joint position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,

    /// Relative depth, when the estimator provides one. Not used for angles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,

    /// Estimator confidence in `[0.0, 1.0]`.
    pub confidence: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, confidence: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            confidence,
        }
    }

    pub fn with_depth(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    pub fn point(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    /// Whether this landmark's confidence exceeds `threshold` and its coordinates are finite.
    pub fn is_valid(&self, threshold: f64) -> bool {
        self.confidence > threshold && self.x.is_finite() && self.y.is_finite()
    }

    /// Scale normalized `[0, 1]` coordinates to pixels.
    pub fn scaled(&self, width: f64, height: f64) -> Landmark {
        Landmark {
            x: self.x * width,
            y: self.y * height,
            z: self.z,
            confidence: self.confidence,
        }
    }
}

/// All landmarks detected in a single frame.
///
/// Backed by an ordered map so serialization is deterministic.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JointSet {
    landmarks: BTreeMap<Joint, Landmark>,
}

impl JointSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, joint: Joint, landmark: Landmark) -> Self {
        self.landmarks.insert(joint, landmark);
        self
    }

    pub fn insert(&mut self, joint: Joint, landmark: Landmark) {
        self.landmarks.insert(joint, landmark);
    }

    pub fn get(&self, joint: Joint) -> Option<&Landmark> {
        self.landmarks.get(&joint)
    }

    pub fn len(&self) -> usize {
        self.landmarks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.landmarks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Joint, &Landmark)> {
        self.landmarks.iter().map(|(joint, lm)| (*joint, lm))
    }

    /// Keep only landmarks that pass `threshold`.
    pub fn retain_confident(&self, threshold: f64) -> JointSet {
        JointSet {
            landmarks: self
                .landmarks
                .iter()
                .filter(|(_, lm)| lm.is_valid(threshold))
                .map(|(joint, lm)| (*joint, *lm))
                .collect(),
        }
    }

    /// Apply a coordinate transform to every landmark.
    pub fn map_landmarks(&self, f: impl Fn(&Landmark) -> Landmark) -> JointSet {
        JointSet {
            landmarks: self
                .landmarks
                .iter()
                .map(|(joint, lm)| (*joint, f(lm)))
                .collect(),
        }
    }

    /// Shoulder, elbow and wrist for one arm, if all three are present.
    pub fn arm(&self, joints: ArmJoints) -> Option<ArmPose> {
        Some(ArmPose {
            shoulder: *self.get(joints.shoulder)?,
            elbow: *self.get(joints.elbow)?,
            wrist: *self.get(joints.wrist)?,
        })
    }
}

impl FromIterator<(Joint, Landmark)> for JointSet {
    fn from_iter<I: IntoIterator<Item = (Joint, Landmark)>>(iter: I) -> Self {
        Self {
            landmarks: iter.into_iter().collect(),
        }
    }
}

/// The joint triple that defines an elbow angle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArmPose {
    pub shoulder: Landmark,
    pub elbow: Landmark,
    pub wrist: Landmark,
}

impl ArmPose {
    /// Weakest confidence of the three joints.
    pub fn min_confidence(&self) -> f64 {
        self.shoulder
            .confidence
            .min(self.elbow.confidence)
            .min(self.wrist.confidence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::ShootingSide;

    fn arm_set(confidence: f64) -> JointSet {
        JointSet::new()
            .with(Joint::RightShoulder, Landmark::new(100.0, 100.0, 0.9))
            .with(Joint::RightElbow, Landmark::new(120.0, 150.0, confidence))
            .with(Joint::RightWrist, Landmark::new(110.0, 60.0, 0.8))
    }

    #[test]
    fn test_arm_extraction() {
        let set = arm_set(0.7);
        let arm = set.arm(ShootingSide::Right.arm()).unwrap();
        assert_eq!(arm.elbow.x, 120.0);
        assert!((arm.min_confidence() - 0.7).abs() < 1e-12);
        assert!(set.arm(ShootingSide::Left.arm()).is_none());
    }

    #[test]
    fn test_retain_confident_drops_weak_joints() {
        let set = arm_set(0.2).retain_confident(0.5);
        assert_eq!(set.len(), 2);
        assert!(set.get(Joint::RightElbow).is_none());
    }

    #[test]
    fn test_confidence_must_exceed_threshold() {
        assert!(!Landmark::new(1.0, 1.0, 0.5).is_valid(0.5));
        assert!(Landmark::new(1.0, 1.0, 0.51).is_valid(0.5));
        assert!(!Landmark::new(1.0, 1.0, 0.0).is_valid(0.0));
    }

    #[test]
    fn test_non_finite_landmark_is_invalid() {
        let lm = Landmark::new(f64::NAN, 1.0, 0.99);
        assert!(!lm.is_valid(0.5));
    }

    #[test]
    fn test_scaled_keeps_confidence_and_depth() {
        let lm = Landmark::new(0.5, 0.25, 0.6).with_depth(-0.1);
        let px = lm.scaled(1920.0, 1080.0);
        assert_eq!(px.x, 960.0);
        assert_eq!(px.y, 270.0);
        assert_eq!(px.z, Some(-0.1));
        assert_eq!(px.confidence, 0.6);
    }

    #[test]
    fn test_joint_set_json_uses_joint_names() {
        let json = serde_json::to_string(&arm_set(0.7)).unwrap();
        assert!(json.contains("\"right_wrist\""));
        let parsed: JointSet = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, arm_set(0.7));
    }

    #[test]
    fn test_point_vector() {
        let a = Point2D::new(0.0, 0.0);
        let b = Point2D::new(3.0, 4.0);
        assert_eq!(a.vector_to(&b), (3.0, 4.0));
    }
}
