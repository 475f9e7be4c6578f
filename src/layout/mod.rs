//! Layout algorithms for the skill tree.
//!
//! This module computes world-space positions for skill nodes: a bottom-up
//! banded layout with center-out rows and a trunk-curve nudge. Positions are
//! consumed by the canvas renderer and the hit-test index.

pub mod bands;
pub mod config;
pub mod skill_tree;
pub mod trunk;

pub use config::LayoutConfig;
pub use skill_tree::{layout_bottom_up, LayoutResult, PositionedEdge, SkillTreeLayout};
pub use trunk::TrunkCurve;
