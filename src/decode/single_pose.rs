use crate::{
    decode::{
        part::{Part, PartWithScore},
        point::Point,
        skeleton::Skeleton,
        util::{get, get_image_coords, get_strided_index_near_point},
    },
    error::Error,
    pose::Keypoint,
    tensor::OutputTensorsView,
};
use bitvec::bitvec;
use ndarray::ArrayView3;

/// Follows displacement fields from one decoded keypoint to a neighbour.
pub(crate) struct Traversal<'a> {
    pub(crate) scores: ArrayView3<'a, f32>,
    pub(crate) offsets: ArrayView3<'a, f32>,
    pub(crate) output_stride: usize,
    pub(crate) offset_refine_steps: usize,
}

impl<'a> Traversal<'a> {
    pub(crate) fn traverse_to_target_keypoint(
        &self,
        edge_id: usize,
        source_keypoint: &Keypoint,
        target_keypoint_id: usize,
        displacements: ArrayView3<f32>,
    ) -> Result<Keypoint, Error> {
        let (height, width, _) = self.scores.dim();
        let num_edges = displacements.dim().2 / 2;

        let (source_y, source_x) = get_strided_index_near_point(
            source_keypoint.position,
            self.output_stride,
            height,
            width,
        )?;
        let displacement = Point::new(
            get(displacements, [source_y, source_x, edge_id])?,
            get(displacements, [source_y, source_x, num_edges + edge_id])?,
        )?;

        let mut target_keypoint = source_keypoint.position + displacement;
        for _ in 0..self.offset_refine_steps {
            let (heatmap_y, heatmap_x) =
                get_strided_index_near_point(target_keypoint, self.output_stride, height, width)?;
            target_keypoint = get_image_coords(
                &Part {
                    heatmap_y,
                    heatmap_x,
                    keypoint_id: target_keypoint_id,
                },
                self.output_stride,
                self.offsets,
            )?;
        }

        let (target_y, target_x) =
            get_strided_index_near_point(target_keypoint, self.output_stride, height, width)?;
        let score = get(self.scores, [target_y, target_x, target_keypoint_id])?;

        Ok(Keypoint {
            id: target_keypoint_id,
            position: target_keypoint,
            score,
        })
    }
}

/// Decode one full pose outward from `root`.
///
/// Parents are decoded first by walking the edges backward, then children by
/// walking them forward. Every keypoint of `skeleton` ends up with a position
/// and a score.
pub(crate) fn decode_pose(
    root: &PartWithScore,
    tensors: &OutputTensorsView,
    output_stride: usize,
    offset_refine_steps: usize,
    skeleton: &Skeleton,
) -> Result<Vec<Keypoint>, Error> {
    let num_keypoints = skeleton.num_keypoints();
    let num_edges = skeleton.num_edges();

    let traversal = Traversal {
        scores: tensors.heatmaps,
        offsets: tensors.short_offsets,
        output_stride,
        offset_refine_steps,
    };

    let mut instance_keypoints = vec![Keypoint::default(); num_keypoints];
    let mut keypoint_decoded = bitvec![0; num_keypoints];

    let root_id = root.part.keypoint_id;
    instance_keypoints[root_id] = Keypoint {
        id: root_id,
        position: get_image_coords(&root.part, output_stride, tensors.short_offsets)?,
        score: root.score.into_inner(),
    };
    keypoint_decoded.set(root_id, true);

    for edge in (0..num_edges).rev() {
        let source_keypoint_id = skeleton.parent_to_child_edges[edge];
        let target_keypoint_id = skeleton.child_to_parent_edges[edge];
        if keypoint_decoded[source_keypoint_id] && !keypoint_decoded[target_keypoint_id] {
            instance_keypoints[target_keypoint_id] = traversal.traverse_to_target_keypoint(
                edge,
                &instance_keypoints[source_keypoint_id],
                target_keypoint_id,
                tensors.displacement_bwd,
            )?;
            keypoint_decoded.set(target_keypoint_id, true);
        }
    }

    for edge in 0..num_edges {
        let source_keypoint_id = skeleton.child_to_parent_edges[edge];
        let target_keypoint_id = skeleton.parent_to_child_edges[edge];
        if keypoint_decoded[source_keypoint_id] && !keypoint_decoded[target_keypoint_id] {
            instance_keypoints[target_keypoint_id] = traversal.traverse_to_target_keypoint(
                edge,
                &instance_keypoints[source_keypoint_id],
                target_keypoint_id,
                tensors.displacement_fwd,
            )?;
            keypoint_decoded.set(target_keypoint_id, true);
        }
    }

    if let Some(id) = (0..num_keypoints).find(|&id| !keypoint_decoded[id]) {
        return Err(Error::UndecodedKeypoint(id));
    }

    Ok(instance_keypoints)
}
