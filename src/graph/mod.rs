//! Skill graph data structures and operations.
//!
//! This module provides the skill node model and the prerequisite graph,
//! built on petgraph's StableGraph, that derives the topological order and
//! the edge list consumed by renderers.

mod edge;
mod engine;
mod node;

pub use edge::{BranchKind, Prerequisite};
pub use engine::{topological_sort, SkillGraph};
pub use node::{Level, PositionedNode, SkillNode};
