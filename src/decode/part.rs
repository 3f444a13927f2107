use ordered_float::NotNan;
use std::cmp::{Ordering, Reverse};

/// A heatmap cell for one keypoint type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Part {
    pub heatmap_y: usize,
    pub heatmap_x: usize,
    pub keypoint_id: usize,
}

/// A root candidate: a part together with its heatmap score.
///
/// Orders by score; equal scores order so that the part seen first in
/// row-major `(y, x, keypoint_id)` order is the greater one.
#[derive(Debug, Clone, Copy)]
pub struct PartWithScore {
    pub part: Part,
    pub score: NotNan<f32>,
}

impl PartWithScore {
    fn key(&self) -> (NotNan<f32>, Reverse<(usize, usize, usize)>) {
        let Part {
            heatmap_y,
            heatmap_x,
            keypoint_id,
        } = self.part;
        (self.score, Reverse((heatmap_y, heatmap_x, keypoint_id)))
    }
}

impl Eq for PartWithScore {}

impl PartialEq for PartWithScore {
    fn eq(&self, other: &Self) -> bool {
        self.key().eq(&other.key())
    }
}

impl Ord for PartWithScore {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for PartWithScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::{Part, PartWithScore};
    use ordered_float::NotNan;

    fn candidate(
        heatmap_y: usize,
        heatmap_x: usize,
        keypoint_id: usize,
        score: f32,
    ) -> PartWithScore {
        PartWithScore {
            part: Part {
                heatmap_y,
                heatmap_x,
                keypoint_id,
            },
            score: NotNan::new(score).unwrap(),
        }
    }

    #[test]
    fn higher_score_is_greater() {
        assert!(candidate(5, 5, 0, 0.9) > candidate(0, 0, 0, 0.8));
    }

    #[test]
    fn ties_prefer_scan_order() {
        assert!(candidate(0, 1, 0, 0.7) > candidate(1, 0, 0, 0.7));
        assert!(candidate(1, 0, 2, 0.7) > candidate(1, 0, 3, 0.7));
        assert_eq!(candidate(1, 0, 2, 0.7), candidate(1, 0, 2, 0.7));
    }
}
