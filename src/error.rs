#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to convert value to f32")]
    ConvertToF32,

    #[error("failed to convert value to usize")]
    ConvertToUSize,

    #[error("failed to construct NotNan from f32: {1}")]
    ConstructNotNan(#[source] ordered_float::FloatIsNan, f32),

    #[error("failed to convert usize value to keypoint kind: {0}")]
    ConvertUSizeToKeypointKind(usize),

    #[error("failed to convert keypoint variant to usize: {0:?}")]
    KeypointVariantToUSize(crate::pose::KeypointKind),

    #[error("{name} tensor has shape {actual:?}, expected {expected:?}")]
    TensorShapeMismatch {
        name: &'static str,
        expected: [usize; 3],
        actual: [usize; 3],
    },

    #[error("{name} tensor holds non-finite value {value} at {index:?}")]
    NonFiniteTensorValue {
        name: &'static str,
        index: [usize; 3],
        value: f32,
    },

    #[error("failed to construct {0} array from tensor data")]
    ConstructTensorArray(&'static str, #[source] ndarray::ShapeError),

    #[error("index {0:?} is out of bounds for tensor with shape {1:?}")]
    TensorIndexOutOfBounds([usize; 3], [usize; 3]),

    #[error("heatmap grid is empty: {0}x{1}")]
    EmptyHeatmapGrid(usize, usize),

    #[error("failed to open tensor file: {1:?}")]
    OpenTensorFile(#[source] std::io::Error, std::path::PathBuf),

    #[error("failed to parse tensor file: {1:?}")]
    ParseTensorFile(#[source] serde_json::Error, std::path::PathBuf),

    #[error("output stride must be non-zero")]
    InvalidOutputStride,

    #[error("{0} must be a non-negative number, got {1}")]
    InvalidParameter(&'static str, f32),

    #[error("skeleton must have at least one edge")]
    EmptySkeleton,

    #[error("skeleton edge {edge} references keypoint {keypoint_id}, but there are only {num_keypoints} keypoints")]
    SkeletonKeypointOutOfRange {
        edge: usize,
        keypoint_id: usize,
        num_keypoints: usize,
    },

    #[error("skeleton edge {0} starts from keypoint {1}, which no earlier edge reaches")]
    SkeletonParentNotReached(usize, usize),

    #[error("skeleton edge {0} reaches keypoint {1} a second time")]
    SkeletonChildReachedTwice(usize, usize),

    #[error("skeleton does not reach keypoint {0}")]
    SkeletonKeypointUnreached(usize),

    #[error("keypoint {0} was not decoded")]
    UndecodedKeypoint(usize),
}
