//! R-tree based hit index using the rstar crate.
//!
//! Indexes the rectangle each positioned skill occupies on the canvas and
//! answers pointer queries:
//! - Node under the pointer
//! - Nearest node
//! - Rectangle intersection (marquee selection, viewport culling)

use rstar::{RTree, RTreeObject, AABB, PointDistance};

use crate::layout::LayoutResult;

/// A node's box in world space, keyed by its index in `LayoutResult::positioned`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeBox {
    /// Index into the positioned list.
    pub index: usize,
    pub min: [f32; 2],
    pub max: [f32; 2],
}

impl NodeBox {
    /// A box of `width` x `height` centered on (x, y).
    pub fn centered(index: usize, x: f32, y: f32, width: f32, height: f32) -> Self {
        let (hw, hh) = (width / 2.0, height / 2.0);
        Self {
            index,
            min: [x - hw, y - hh],
            max: [x + hw, y + hh],
        }
    }
}

impl RTreeObject for NodeBox {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(self.min, self.max)
    }
}

impl PointDistance for NodeBox {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = (self.min[0] - point[0]).max(0.0).max(point[0] - self.max[0]);
        let dy = (self.min[1] - point[1]).max(0.0).max(point[1] - self.max[1]);
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        point[0] >= self.min[0]
            && point[0] <= self.max[0]
            && point[1] >= self.min[1]
            && point[1] <= self.max[1]
    }
}

/// Hit index over a layout result.
///
/// Uses an R*-tree for efficient spatial queries. Indices returned by every
/// query refer to `LayoutResult::positioned`.
pub struct HitIndex {
    tree: RTree<NodeBox>,
}

impl HitIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Bulk load the boxes of every positioned node.
    pub fn build(layout: &LayoutResult, node_width: f32, node_height: f32) -> Self {
        let boxes: Vec<NodeBox> = layout
            .positioned
            .iter()
            .enumerate()
            .map(|(index, p)| NodeBox::centered(index, p.x, p.y, node_width, node_height))
            .collect();

        Self {
            tree: RTree::bulk_load(boxes),
        }
    }

    /// The node under a point.
    ///
    /// When boxes overlap, the one drawn last (highest index) wins.
    pub fn node_at(&self, x: f32, y: f32) -> Option<usize> {
        self.tree
            .locate_all_at_point(&[x, y])
            .map(|b| b.index)
            .max()
    }

    /// The node whose box is closest to a point.
    pub fn nearest(&self, x: f32, y: f32) -> Option<usize> {
        self.tree.nearest_neighbor(&[x, y]).map(|b| b.index)
    }

    /// The closest node within `max_distance` of its box edge.
    pub fn nearest_within(&self, x: f32, y: f32, max_distance: f32) -> Option<usize> {
        let max_distance_sq = max_distance * max_distance;
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|b| b.distance_2(&[x, y]) <= max_distance_sq)
            .map(|b| b.index)
    }

    /// All nodes whose boxes intersect a rectangle, sorted by index.
    pub fn in_rect(&self, min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Vec<usize> {
        let envelope = AABB::from_corners([min_x, min_y], [max_x, max_y]);
        let mut hits: Vec<usize> = self
            .tree
            .locate_in_envelope_intersecting(&envelope)
            .map(|b| b.index)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl Default for HitIndex {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{Level, SkillNode};
    use crate::layout::{LayoutConfig, SkillTreeLayout, TrunkCurve};

    fn sample_layout() -> LayoutResult {
        let skills = vec![
            SkillNode::new("root", Level::Foundation, &[]),
            SkillNode::new("mid", Level::Intermediate, &["root"]),
            SkillNode::new("top", Level::Advanced, &["mid"]),
        ];
        SkillTreeLayout::new(LayoutConfig::default().with_trunk(TrunkCurve::straight()))
            .compute(&skills)
    }

    fn index_of(layout: &LayoutResult, id: &str) -> usize {
        layout.positioned.iter().position(|p| p.id() == id).unwrap()
    }

    #[test]
    fn test_node_at_center_and_edge() {
        let layout = sample_layout();
        let index = HitIndex::build(&layout, 128.0, 32.0);
        assert_eq!(index.len(), 3);

        let (x, y) = layout.position_of("mid").unwrap();
        assert_eq!(index.node_at(x, y), Some(index_of(&layout, "mid")));
        assert_eq!(index.node_at(x + 63.0, y - 15.0), Some(index_of(&layout, "mid")));
        assert_eq!(index.node_at(x + 70.0, y), None);
    }

    #[test]
    fn test_nearest() {
        let layout = sample_layout();
        let index = HitIndex::build(&layout, 128.0, 32.0);

        // Just above the bottom band, far from the others.
        let (x, y) = layout.position_of("root").unwrap();
        assert_eq!(index.nearest(x, y - 40.0), Some(index_of(&layout, "root")));
        assert_eq!(index.nearest_within(x, y - 40.0, 30.0), Some(index_of(&layout, "root")));
        assert_eq!(index.nearest_within(x, y - 40.0, 10.0), None);
    }

    #[test]
    fn test_in_rect() {
        let layout = sample_layout();
        let index = HitIndex::build(&layout, 128.0, 32.0);

        // Lower half of the canvas holds level 1 and level 2.
        let hits = index.in_rect(0.0, 400.0, 1400.0, 900.0);
        let mut expected = vec![index_of(&layout, "root"), index_of(&layout, "mid")];
        expected.sort_unstable();
        assert_eq!(hits, expected);
    }

    #[test]
    fn test_overlap_prefers_last_drawn() {
        let mut layout = sample_layout();
        let (x, y) = layout.position_of("root").unwrap();
        let top = index_of(&layout, "top");
        layout.positioned[top].x = x + 10.0;
        layout.positioned[top].y = y;

        let index = HitIndex::build(&layout, 128.0, 32.0);
        assert_eq!(index.node_at(x + 5.0, y), Some(top.max(index_of(&layout, "root"))));
    }

    #[test]
    fn test_empty() {
        let index = HitIndex::default();
        assert!(index.is_empty());
        assert_eq!(index.node_at(0.0, 0.0), None);
        assert_eq!(index.nearest(0.0, 0.0), None);
    }
}
