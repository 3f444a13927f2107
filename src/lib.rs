//! Multi-person pose decoding for BodyPix/PoseNet style network outputs.
//!
//! The network produces, on a grid `output_stride` times coarser than the
//! input image, a heatmap per keypoint type, a short-range offset field that
//! refines each cell to a sub-cell position, and forward/backward displacement
//! fields along the edges of a keypoint tree. [`Decoder`] turns those into
//! [`Pose`]s by greedily seeding instances at heatmap local maxima and
//! following the displacements outward from each seed.

pub mod decode;
pub mod error;
pub mod pose;
pub mod tensor;

pub use decode::{decode_multiple_poses, Decoder, Part, PartPriorityQueue, Point, Skeleton};
pub use error::Error;
pub use pose::{Keypoint, KeypointKind, Pose};
pub use tensor::{OutputTensors, OutputTensorsView};
