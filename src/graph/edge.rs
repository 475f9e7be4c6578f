//! Prerequisite edge types.
//!
//! Edges point from a prerequisite to the skill that depends on it. Each
//! edge carries a branch kind, picked from the prerequisite's level, which
//! renderers use for stroke thickness (thick trunk near the roots, thin
//! twigs in the canopy).

use std::fmt;

use serde::Serialize;

use super::node::Level;

/// Visual weight of a prerequisite edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BranchKind {
    /// Edge leaving a level-1 skill.
    Trunk,
    /// Edge leaving a level-2 skill.
    Branch,
    /// Edge leaving a level-3 skill.
    Twig,
}

impl BranchKind {
    /// Branch kind for an edge whose prerequisite sits at `level`.
    #[inline]
    pub fn for_level(level: Level) -> Self {
        match level {
            Level::Foundation => Self::Trunk,
            Level::Intermediate => Self::Branch,
            Level::Advanced => Self::Twig,
        }
    }

    /// Stroke width in world pixels.
    #[inline]
    pub fn width(self) -> f32 {
        match self {
            Self::Trunk => 8.0,
            Self::Branch => 5.0,
            Self::Twig => 3.0,
        }
    }
}

impl fmt::Display for BranchKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trunk => "trunk",
            Self::Branch => "branch",
            Self::Twig => "twig",
        };
        f.write_str(name)
    }
}

/// A resolved prerequisite edge between two input slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prerequisite {
    /// Slot of the prerequisite skill.
    pub from: usize,
    /// Slot of the dependent skill.
    pub to: usize,
    pub branch: BranchKind,
}
