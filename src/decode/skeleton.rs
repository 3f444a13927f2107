use crate::{
    error::Error,
    pose::{self, KeypointKind},
};
use bitvec::bitvec;

/// Directed edge table used to propagate a pose from its root.
///
/// Edge `e` connects `parent_to_child_edges[e]`'s parent to its child and reads
/// displacement channels `e` (y) and `num_edges + e` (x).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skeleton {
    num_keypoints: usize,
    /// Target of each edge when following it forward.
    pub(crate) parent_to_child_edges: Vec<usize>,
    /// Target of each edge when following it backward.
    pub(crate) child_to_parent_edges: Vec<usize>,
}

impl Skeleton {
    /// Build a skeleton from `(parent, child)` pairs.
    ///
    /// The pairs must form a tree listed parents first: the first edge's parent is
    /// the tree root and every other edge starts from a keypoint an earlier edge
    /// already reached. Under that ordering one backward sweep followed by one
    /// forward sweep reaches every keypoint from any root.
    pub fn new(num_keypoints: usize, edges: &[(usize, usize)]) -> Result<Self, Error> {
        let &(root, _) = edges.first().ok_or(Error::EmptySkeleton)?;
        let mut reached = bitvec![0; num_keypoints];

        let check_range = |edge: usize, keypoint_id: usize| {
            if keypoint_id < num_keypoints {
                Ok(())
            } else {
                Err(Error::SkeletonKeypointOutOfRange {
                    edge,
                    keypoint_id,
                    num_keypoints,
                })
            }
        };

        check_range(0, root)?;
        reached.set(root, true);

        for (edge, &(parent, child)) in edges.iter().enumerate() {
            check_range(edge, parent)?;
            check_range(edge, child)?;
            if !reached[parent] {
                return Err(Error::SkeletonParentNotReached(edge, parent));
            }
            if reached[child] {
                return Err(Error::SkeletonChildReachedTwice(edge, child));
            }
            reached.set(child, true);
        }

        if let Some(unreached) = (0..num_keypoints).find(|&id| !reached[id]) {
            return Err(Error::SkeletonKeypointUnreached(unreached));
        }

        Ok(Self {
            num_keypoints,
            parent_to_child_edges: edges.iter().map(|&(_, child)| child).collect(),
            child_to_parent_edges: edges.iter().map(|&(parent, _)| parent).collect(),
        })
    }

    /// Build a skeleton from the standard keypoint enumeration.
    pub fn from_kinds(edges: &[(KeypointKind, KeypointKind)]) -> Result<Self, Error> {
        let edges = edges
            .iter()
            .map(|&(parent, child)| Ok((parent.idx()?, child.idx()?)))
            .collect::<Result<Vec<_>, Error>>()?;
        Self::new(pose::NUM_KEYPOINTS, &edges)
    }

    #[inline]
    pub fn num_keypoints(&self) -> usize {
        self.num_keypoints
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.parent_to_child_edges.len()
    }
}

impl Default for Skeleton {
    /// The 16-edge PoseNet chain over the 17 COCO keypoints.
    fn default() -> Self {
        let edges = pose::constants::POSE_CHAIN
            .iter()
            .map(|&(parent, child)| (parent as usize, child as usize))
            .collect::<Vec<_>>();
        Self {
            num_keypoints: pose::NUM_KEYPOINTS,
            parent_to_child_edges: edges.iter().map(|&(_, child)| child).collect(),
            child_to_parent_edges: edges.iter().map(|&(parent, _)| parent).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Skeleton;
    use crate::{error::Error, pose};

    #[test]
    fn default_is_valid() {
        let skeleton = Skeleton::default();
        assert_eq!(
            skeleton.parent_to_child_edges,
            vec![1, 3, 2, 4, 5, 7, 9, 11, 13, 15, 6, 8, 10, 12, 14, 16]
        );
        assert_eq!(
            skeleton.child_to_parent_edges,
            vec![0, 1, 0, 2, 0, 5, 7, 5, 11, 13, 0, 6, 8, 6, 12, 14]
        );
        assert_eq!(skeleton.num_keypoints(), 17);
        assert_eq!(skeleton.num_edges(), 16);
    }

    #[test]
    fn default_matches_validated_chain() {
        let validated = Skeleton::from_kinds(&pose::constants::POSE_CHAIN).unwrap();
        assert_eq!(validated, Skeleton::default());
    }

    #[test]
    fn empty_is_rejected() {
        assert!(matches!(Skeleton::new(3, &[]), Err(Error::EmptySkeleton)));
    }

    #[test]
    fn out_of_range_is_rejected() {
        assert!(matches!(
            Skeleton::new(3, &[(0, 1), (1, 3)]),
            Err(Error::SkeletonKeypointOutOfRange {
                edge: 1,
                keypoint_id: 3,
                ..
            })
        ));
    }

    #[test]
    fn parent_must_be_reached_first() {
        assert!(matches!(
            Skeleton::new(3, &[(0, 1), (2, 0)]),
            Err(Error::SkeletonParentNotReached(1, 2))
        ));
    }

    #[test]
    fn cycles_are_rejected() {
        assert!(matches!(
            Skeleton::new(3, &[(0, 1), (1, 2), (2, 0)]),
            Err(Error::SkeletonChildReachedTwice(2, 0))
        ));
    }

    #[test]
    fn disconnected_keypoints_are_rejected() {
        assert!(matches!(
            Skeleton::new(4, &[(0, 1), (1, 2)]),
            Err(Error::SkeletonKeypointUnreached(3))
        ));
    }
}
