use crate::{
    decode::part::{Part, PartWithScore},
    error::Error,
};
use ndarray::{s, ArrayView2, ArrayView3, Axis};
use ordered_float::NotNan;
use std::collections::BinaryHeap;

/// Root candidates, popped highest score first.
#[derive(Debug, Default)]
pub struct PartPriorityQueue(BinaryHeap<PartWithScore>);

impl PartPriorityQueue {
    pub fn new() -> Self {
        Self(Default::default())
    }

    /// Collect every local maximum of `scores` whose score is at least
    /// `score_threshold`, for every keypoint type.
    pub fn build(
        score_threshold: f32,
        local_maximum_radius: usize,
        scores: ArrayView3<f32>,
    ) -> Result<Self, Error> {
        let mut queue = Self::new();

        for ((heatmap_y, heatmap_x, keypoint_id), &score) in scores.indexed_iter() {
            let score = NotNan::new(score).map_err(|e| Error::ConstructNotNan(e, score))?;
            if score.into_inner() < score_threshold {
                continue;
            }

            if score_is_max_in_local_window(
                score.into_inner(),
                heatmap_y,
                heatmap_x,
                local_maximum_radius,
                scores.index_axis(Axis(2), keypoint_id),
            ) {
                queue.push(PartWithScore {
                    part: Part {
                        heatmap_y,
                        heatmap_x,
                        keypoint_id,
                    },
                    score,
                });
            }
        }

        Ok(queue)
    }

    pub fn push(&mut self, item: PartWithScore) {
        self.0.push(item);
    }

    pub fn pop(&mut self) -> Option<PartWithScore> {
        self.0.pop()
    }

    pub fn peek(&self) -> Option<&PartWithScore> {
        self.0.peek()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn score_is_max_in_local_window(
    score: f32,
    y: usize,
    x: usize,
    local_maximum_radius: usize,
    scores: ArrayView2<f32>,
) -> bool {
    let (height, width) = scores.dim();
    let y_start = y.saturating_sub(local_maximum_radius);
    let y_end = height.min(y + local_maximum_radius + 1);
    let x_start = x.saturating_sub(local_maximum_radius);
    let x_end = width.min(x + local_maximum_radius + 1);
    scores
        .slice(s![y_start..y_end, x_start..x_end])
        .iter()
        .all(|&value| value <= score)
}
