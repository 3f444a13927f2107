use crate::{decode::Point, error::Error};
use num_traits::{FromPrimitive, ToPrimitive};
use serde::ser::{Serialize, SerializeStruct, Serializer};

#[derive(
    Debug, Copy, Clone, PartialEq, Eq, Hash, num_derive::FromPrimitive, num_derive::ToPrimitive,
)]
pub enum KeypointKind {
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

impl KeypointKind {
    pub fn idx(self) -> Result<usize, Error> {
        self.to_usize().ok_or(Error::KeypointVariantToUSize(self))
    }

    pub fn from_idx(id: usize) -> Result<Self, Error> {
        Self::from_usize(id).ok_or(Error::ConvertUSizeToKeypointKind(id))
    }

    /// The part name BodyPix uses for this keypoint.
    pub fn name(self) -> &'static str {
        match self {
            Self::Nose => "nose",
            Self::LeftEye => "leftEye",
            Self::RightEye => "rightEye",
            Self::LeftEar => "leftEar",
            Self::RightEar => "rightEar",
            Self::LeftShoulder => "leftShoulder",
            Self::RightShoulder => "rightShoulder",
            Self::LeftElbow => "leftElbow",
            Self::RightElbow => "rightElbow",
            Self::LeftWrist => "leftWrist",
            Self::RightWrist => "rightWrist",
            Self::LeftHip => "leftHip",
            Self::RightHip => "rightHip",
            Self::LeftKnee => "leftKnee",
            Self::RightKnee => "rightKnee",
            Self::LeftAnkle => "leftAnkle",
            Self::RightAnkle => "rightAnkle",
        }
    }
}

pub const NUM_KEYPOINTS: usize = 17;

#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Keypoint {
    pub id: usize,
    pub position: Point,
    pub score: f32,
}

impl Keypoint {
    /// The standard keypoint kind, if `id` belongs to the 17-point enumeration.
    pub fn kind(&self) -> Option<KeypointKind> {
        KeypointKind::from_usize(self.id)
    }
}

impl Serialize for Keypoint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("Keypoint", 4)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("part", &self.kind().map(KeypointKind::name))?;
        state.serialize_field("position", &self.position)?;
        state.serialize_field("score", &self.score)?;
        state.end()
    }
}

/// A decoded person instance.
///
/// `keypoints[i].id == i` for every keypoint type of the skeleton used to
/// decode it.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Pose {
    pub keypoints: Vec<Keypoint>,
    pub score: f32,
}

impl Pose {
    pub fn keypoint(&self, kind: KeypointKind) -> Result<Option<&Keypoint>, Error> {
        Ok(self.keypoints.get(kind.idx()?))
    }
}

pub mod constants {
    use crate::pose::KeypointKind::{self, *};

    pub const LOCAL_MAXIMUM_RADIUS: usize = 1;

    /// Parent/child pairs of the tree used to propagate a pose outward from
    /// its root. Edge `i` owns displacement channels `i` and `i + 16`.
    pub const POSE_CHAIN: [(KeypointKind, KeypointKind); 16] = [
        (Nose, LeftEye),
        (LeftEye, LeftEar),
        (Nose, RightEye),
        (RightEye, RightEar),
        (Nose, LeftShoulder),
        (LeftShoulder, LeftElbow),
        (LeftElbow, LeftWrist),
        (LeftShoulder, LeftHip),
        (LeftHip, LeftKnee),
        (LeftKnee, LeftAnkle),
        (Nose, RightShoulder),
        (RightShoulder, RightElbow),
        (RightElbow, RightWrist),
        (RightShoulder, RightHip),
        (RightHip, RightKnee),
        (RightKnee, RightAnkle),
    ];
}
