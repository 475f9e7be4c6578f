//! Bottom-up skill tree layout.
//!
//! Converts a skill snapshot into canvas coordinates.
//!
//! # Algorithm Overview
//!
//! 1. **Topological sort:** order skills so prerequisites come first
//!    (input order when the graph has a cycle).
//! 2. **Banding:** partition the ordered skills by level. Level 1 sits in
//!    the bottom zone, level 3 in the top zone.
//! 3. **Rows:** split crowded bands into rows stacked around the zone y.
//! 4. **Center-out spread:** fill each row's evenly spaced slots left to
//!    right in center-out order.
//! 5. **Trunk nudge:** blend each x toward the sinusoidal trunk curve.
//!
//! Skills with a manual position keep it and take no slot.

use serde::Serialize;

use super::bands::{center_out_order, row_offsets, slot_positions, split_rows};
use super::config::LayoutConfig;
use crate::graph::{BranchKind, Level, PositionedNode, Prerequisite, SkillGraph, SkillNode};

/// Result of a layout computation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    /// One entry per input skill, grouped by level (bottom band first).
    pub positioned: Vec<PositionedNode>,
    pub world_width: f32,
    pub world_height: f32,
    /// Initial camera center, just above the root band.
    pub focus_x: f32,
    pub focus_y: f32,
    /// Resolved prerequisite edges, as indices into `positioned`.
    #[serde(skip)]
    pub prerequisites: Vec<Prerequisite>,
}

/// A prerequisite edge between two positioned nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedEdge {
    /// Index of the prerequisite in `LayoutResult::positioned`.
    pub from: usize,
    /// Index of the dependent in `LayoutResult::positioned`.
    pub to: usize,
    pub branch: BranchKind,
    pub from_x: f32,
    pub from_y: f32,
    pub to_x: f32,
    pub to_y: f32,
}

impl LayoutResult {
    /// Number of positioned nodes.
    pub fn len(&self) -> usize {
        self.positioned.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positioned.is_empty()
    }

    /// Position of the skill with this id.
    ///
    /// With duplicate ids, the copy that came first in the input wins.
    pub fn position_of(&self, id: &str) -> Option<(f32, f32)> {
        self.positioned
            .iter()
            .filter(|p| p.id() == id)
            .min_by_key(|p| p.slot)
            .map(|p| (p.x, p.y))
    }

    /// Where the camera starts.
    pub fn focus_point(&self) -> (f32, f32) {
        (self.focus_x, self.focus_y)
    }

    /// Interleaved positions `[x0, y0, x1, y1, …]` in `positioned` order.
    pub fn positions_interleaved(&self) -> Vec<f32> {
        let mut positions = Vec::with_capacity(self.positioned.len() * 2);
        for p in &self.positioned {
            positions.push(p.x);
            positions.push(p.y);
        }
        positions
    }

    /// Prerequisite edges with their current endpoint coordinates.
    pub fn edges(&self) -> Vec<PositionedEdge> {
        self.prerequisites
            .iter()
            .map(|edge| {
                let source = &self.positioned[edge.from];
                let target = &self.positioned[edge.to];
                PositionedEdge {
                    from: edge.from,
                    to: edge.to,
                    branch: edge.branch,
                    from_x: source.x,
                    from_y: source.y,
                    to_x: target.x,
                    to_y: target.y,
                }
            })
            .collect()
    }
}

/// The skill tree layout engine.
///
/// Stateless apart from its configuration; `compute` is a pure function of
/// its input and may be called repeatedly (e.g. on every resize).
pub struct SkillTreeLayout {
    config: LayoutConfig,
}

impl SkillTreeLayout {
    /// Create a layout engine with the given configuration.
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Create a layout engine with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(LayoutConfig::default())
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute positions for every skill in `skills`.
    ///
    /// Never fails: empty input yields an empty result, dangling
    /// prerequisites are ignored and cyclic input keeps its input order.
    pub fn compute(&self, skills: &[SkillNode]) -> LayoutResult {
        let graph = SkillGraph::new(skills);
        let order = graph.topological_order();

        // Bands hold input slots in topological order. Pinned skills are
        // kept aside so they don't consume a slot.
        let mut bands: [Vec<usize>; 3] = Default::default();
        let mut pinned: [Vec<usize>; 3] = Default::default();
        for slot in order {
            let skill = &skills[slot];
            if skill.manual_position().is_some() {
                pinned[skill.level.index()].push(slot);
            } else {
                bands[skill.level.index()].push(slot);
            }
        }

        let center_x = self.config.center_x();
        let mut positioned = Vec::with_capacity(skills.len());

        for level in Level::ALL {
            let band = &bands[level.index()];
            let rows = split_rows(band.as_slice(), self.config.row_count(band.len()));
            let offsets = row_offsets(rows.len(), self.config.row_gap);
            let zone_y = self.config.zone_y(level);
            let spread = self.config.spread(level);

            log::debug!(
                "band {level}: {} skill(s) in {} row(s), {} pinned",
                band.len(),
                rows.len(),
                pinned[level.index()].len()
            );

            for (row, offset) in rows.iter().zip(offsets) {
                let y = zone_y + offset;
                let xs = slot_positions(row.len(), center_x, spread);

                for (raw_x, item) in xs.into_iter().zip(center_out_order(row.len())) {
                    let x = self.config.trunk.nudge(raw_x, center_x, level);
                    let slot = row[item];
                    positioned.push(PositionedNode::placed(&skills[slot], slot, x, y, false));
                }
            }

            for &slot in &pinned[level.index()] {
                let skill = &skills[slot];
                if let Some((x, y)) = skill.manual_position() {
                    positioned.push(PositionedNode::placed(skill, slot, x, y, true));
                }
            }
        }

        // Every slot is positioned exactly once.
        let mut positioned_index = vec![0; skills.len()];
        for (index, p) in positioned.iter().enumerate() {
            positioned_index[p.slot] = index;
        }
        let prerequisites = graph
            .prerequisite_edges()
            .into_iter()
            .map(|edge| Prerequisite {
                from: positioned_index[edge.from],
                to: positioned_index[edge.to],
                branch: edge.branch,
            })
            .collect();

        let (focus_x, focus_y) = self.config.focus_point();
        LayoutResult {
            positioned,
            world_width: self.config.world_width,
            world_height: self.config.world_height,
            focus_x,
            focus_y,
            prerequisites,
        }
    }
}

/// Lay out a skill snapshot with the given configuration.
pub fn layout_bottom_up(skills: &[SkillNode], config: &LayoutConfig) -> LayoutResult {
    SkillTreeLayout::new(config.clone()).compute(skills)
}
