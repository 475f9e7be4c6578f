//! Spatial indexing for O(log n) hit testing.
//!
//! This module provides an R-tree index over the boxes of laid-out skill
//! nodes, so pointer events can be mapped back to skills.

mod rtree;

pub use rtree::{HitIndex, NodeBox};
