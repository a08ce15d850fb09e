//! Named body joints and shooting-side selection.

use serde::{Deserialize, Serialize};

/// An anatomical landmark reported by the pose estimator.
///
/// Names follow the 17-point COCO layout used by most single-person
/// pose models. Serialized as `snake_case` (e.g. `"right_wrist"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftEye,
    RightEye,
    LeftEar,
    RightEar,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    pub const COUNT: usize = 17;

    /// All joints in index order.
    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::Nose,
        Joint::LeftEye,
        Joint::RightEye,
        Joint::LeftEar,
        Joint::RightEar,
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
        Joint::LeftKnee,
        Joint::RightKnee,
        Joint::LeftAnkle,
        Joint::RightAnkle,
    ];

    /// Stable snake_case name, identical to the serialized form.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "left_eye",
            Self::RightEye => "right_eye",
            Self::LeftEar => "left_ear",
            Self::RightEar => "right_ear",
            Self::LeftShoulder => "left_shoulder",
            Self::RightShoulder => "right_shoulder",
            Self::LeftElbow => "left_elbow",
            Self::RightElbow => "right_elbow",
            Self::LeftWrist => "left_wrist",
            Self::RightWrist => "right_wrist",
            Self::LeftHip => "left_hip",
            Self::RightHip => "right_hip",
            Self::LeftKnee => "left_knee",
            Self::RightKnee => "right_knee",
            Self::LeftAnkle => "left_ankle",
            Self::RightAnkle => "right_ankle",
        }
    }

    /// The same joint on the other side of the body. Midline joints map to themselves.
    pub fn mirrored(&self) -> Joint {
        match self {
            Self::Nose => Self::Nose,
            Self::LeftEye => Self::RightEye,
            Self::RightEye => Self::LeftEye,
            Self::LeftEar => Self::RightEar,
            Self::RightEar => Self::LeftEar,
            Self::LeftShoulder => Self::RightShoulder,
            Self::RightShoulder => Self::LeftShoulder,
            Self::LeftElbow => Self::RightElbow,
            Self::RightElbow => Self::LeftElbow,
            Self::LeftWrist => Self::RightWrist,
            Self::RightWrist => Self::LeftWrist,
            Self::LeftHip => Self::RightHip,
            Self::RightHip => Self::LeftHip,
            Self::LeftKnee => Self::RightKnee,
            Self::RightKnee => Self::LeftKnee,
            Self::LeftAnkle => Self::RightAnkle,
            Self::RightAnkle => Self::LeftAnkle,
        }
    }
}

impl std::fmt::Display for Joint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which arm releases the ball.
///
/// Consumed by landmark gating, the release detector (which wrist to
/// track) and the angle computation (which shoulder/elbow/wrist triple).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShootingSide {
    #[default]
    Right,
    Left,
}

/// The three joints that define the elbow angle for one side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArmJoints {
    pub shoulder: Joint,
    pub elbow: Joint,
    pub wrist: Joint,
}

impl ShootingSide {
    /// Shoulder, elbow and wrist for this side.
    pub fn arm(&self) -> ArmJoints {
        let right = ArmJoints {
            shoulder: Joint::RightShoulder,
            elbow: Joint::RightElbow,
            wrist: Joint::RightWrist,
        };
        match self {
            Self::Right => right,
            Self::Left => ArmJoints {
                shoulder: right.shoulder.mirrored(),
                elbow: right.elbow.mirrored(),
                wrist: right.wrist.mirrored(),
            },
        }
    }

}

impl std::str::FromStr for ShootingSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "right" | "r" => Ok(Self::Right),
            "left" | "l" => Ok(Self::Left),
            other => Err(format!("unknown shooting side '{other}' (expected right|left)")),
        }
    }
}

impl std::fmt::Display for ShootingSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Right => f.write_str("right"),
            Self::Left => f.write_str("left"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joint_name_matches_serde() {
        for joint in Joint::ALL {
            let json = serde_json::to_string(&joint).unwrap();
            assert_eq!(json, format!("\"{}\"", joint.name()));
        }
    }

    #[test]
    fn test_mirror_is_involution() {
        for joint in Joint::ALL {
            assert_eq!(joint.mirrored().mirrored(), joint);
        }
    }

    #[test]
    fn test_side_selects_arm() {
        let right = ShootingSide::Right.arm();
        assert_eq!(right.wrist, Joint::RightWrist);
        assert_eq!(right.elbow, Joint::RightElbow);

        let left = ShootingSide::Left.arm();
        assert_eq!(
            [left.shoulder, left.elbow, left.wrist],
            [Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist]
        );
    }

    #[test]
    fn test_side_from_str() {
        assert_eq!("Left".parse::<ShootingSide>().unwrap(), ShootingSide::Left);
        assert_eq!("r".parse::<ShootingSide>().unwrap(), ShootingSide::Right);
        assert!("both".parse::<ShootingSide>().is_err());
    }
}
