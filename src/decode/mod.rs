use crate::{
    error::Error,
    pose::{self, Keypoint, Pose},
    tensor::OutputTensorsView,
};
use ndarray::ArrayView3;
use num_traits::cast::ToPrimitive;
use tracing::{debug, debug_span, trace};

mod part;
mod part_priority_queue;
mod point;
mod single_pose;
mod skeleton;
pub(crate) mod util;

pub use part::{Part, PartWithScore};
pub use part_priority_queue::PartPriorityQueue;
pub use point::Point;
pub use skeleton::Skeleton;

/// Greedy multi-person decoder with part-based non-maximum suppression.
#[derive(Debug, Clone, structopt::StructOpt)]
pub struct Decoder {
    /// Downsampling factor between the input image and the heatmap grid.
    #[structopt(short = "s", long, default_value = "16")]
    pub output_stride: usize,

    /// Maximum number of poses to return.
    #[structopt(short = "d", long, default_value = "10")]
    pub max_pose_detections: usize,

    /// Minimum heatmap score of a root candidate.
    #[structopt(short = "t", long, default_value = "0.5")]
    pub score_threshold: f32,

    /// Radius in pixels within which a keypoint is claimed by an earlier pose.
    #[structopt(short = "n", long, default_value = "20")]
    pub nms_radius: f32,

    /// Number of short-offset refinements after each displacement step.
    #[structopt(short = "r", long, default_value = "2")]
    pub offset_refine_steps: usize,

    #[structopt(skip)]
    pub skeleton: Skeleton,
}

impl Default for Decoder {
    fn default() -> Self {
        Self {
            output_stride: 16,
            max_pose_detections: 10,
            score_threshold: 0.5,
            nms_radius: 20.0,
            offset_refine_steps: 2,
            skeleton: Skeleton::default(),
        }
    }
}

impl Decoder {
    pub fn with_skeleton(self, skeleton: Skeleton) -> Self {
        Self { skeleton, ..self }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.output_stride == 0 {
            return Err(Error::InvalidOutputStride);
        }
        if !self.nms_radius.is_finite() || self.nms_radius < 0.0 {
            return Err(Error::InvalidParameter("nms_radius", self.nms_radius));
        }
        if self.score_threshold.is_nan() || self.score_threshold < 0.0 {
            return Err(Error::InvalidParameter(
                "score_threshold",
                self.score_threshold,
            ));
        }
        Ok(())
    }

    /// Decode up to `max_pose_detections` poses, in decreasing root score order.
    pub fn decode_multiple_poses(&self, tensors: &OutputTensorsView) -> Result<Vec<Pose>, Error> {
        self.validate()?;
        tensors.validate(&self.skeleton)?;

        let span = debug_span!(
            "decode_multiple_poses",
            output_stride = self.output_stride,
            max_pose_detections = self.max_pose_detections,
            score_threshold = self.score_threshold,
            nms_radius = self.nms_radius
        );
        let _entered = span.enter();

        let mut queue = PartPriorityQueue::build(
            self.score_threshold,
            pose::constants::LOCAL_MAXIMUM_RADIUS,
            tensors.heatmaps,
        )?;
        debug!(candidates = queue.len(), "built root candidate queue");

        let squared_nms_radius = self.nms_radius * self.nms_radius;
        let mut poses = Vec::new();

        while poses.len() < self.max_pose_detections {
            let root = match queue.pop() {
                Some(root) => root,
                None => break,
            };

            let root_image_coords =
                util::get_image_coords(&root.part, self.output_stride, tensors.short_offsets)?;

            if within_nms_radius_of_corresponding_point(
                &poses,
                squared_nms_radius,
                root_image_coords,
                root.part.keypoint_id,
            ) {
                trace!(
                    keypoint_id = root.part.keypoint_id,
                    heatmap_y = root.part.heatmap_y,
                    heatmap_x = root.part.heatmap_x,
                    score = root.score.into_inner(),
                    "suppressed root candidate"
                );
                continue;
            }

            let keypoints = single_pose::decode_pose(
                &root,
                tensors,
                self.output_stride,
                self.offset_refine_steps,
                &self.skeleton,
            )?;
            let score = get_instance_score(&poses, squared_nms_radius, &keypoints)?;

            debug!(
                pose = poses.len(),
                root_keypoint_id = root.part.keypoint_id,
                root_score = root.score.into_inner(),
                score,
                "accepted pose"
            );
            poses.push(Pose { keypoints, score });
        }

        Ok(poses)
    }
}

/// Decode poses with the standard 17-keypoint skeleton.
#[allow(clippy::too_many_arguments)]
pub fn decode_multiple_poses<'a>(
    scores: ArrayView3<'a, f32>,
    offsets: ArrayView3<'a, f32>,
    displacements_fwd: ArrayView3<'a, f32>,
    displacements_bwd: ArrayView3<'a, f32>,
    output_stride: usize,
    max_pose_detections: usize,
    score_threshold: f32,
    nms_radius: f32,
) -> Result<Vec<Pose>, Error> {
    let decoder = Decoder {
        output_stride,
        max_pose_detections,
        score_threshold,
        nms_radius,
        ..Decoder::default()
    };
    decoder.decode_multiple_poses(&OutputTensorsView {
        heatmaps: scores,
        short_offsets: offsets,
        displacement_fwd: displacements_fwd,
        displacement_bwd: displacements_bwd,
    })
}

fn within_nms_radius_of_corresponding_point(
    poses: &[Pose],
    squared_nms_radius: f32,
    point: Point,
    keypoint_id: usize,
) -> bool {
    poses.iter().any(|pose| {
        point.squared_distance(pose.keypoints[keypoint_id].position) <= squared_nms_radius
    })
}

/// Mean keypoint score, where keypoints claimed by an earlier pose count as zero.
fn get_instance_score(
    existing_poses: &[Pose],
    squared_nms_radius: f32,
    instance_keypoints: &[Keypoint],
) -> Result<f32, Error> {
    let not_overlapped_keypoint_scores = instance_keypoints
        .iter()
        .filter(|keypoint| {
            !within_nms_radius_of_corresponding_point(
                existing_poses,
                squared_nms_radius,
                keypoint.position,
                keypoint.id,
            )
        })
        .map(|keypoint| keypoint.score)
        .sum::<f32>();

    Ok(not_overlapped_keypoint_scores
        / instance_keypoints
            .len()
            .to_f32()
            .ok_or(Error::ConvertToF32)?)
}
