//! Skill node types.
//!
//! A skill node is a vertex of the prerequisite graph. Each node has:
//! - A stable string identifier
//! - A mastery level (1 = foundational, 3 = advanced)
//! - Prerequisite ids (edges point prerequisite → dependent)
//! - Descriptive fields that layout passes through untouched
//! - An optional manual position override

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SkillTreeError;

/// Mastery level of a skill.
///
/// Level 1 sits at the bottom of the tree, level 3 at the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    /// Foundational skills (the roots).
    Foundation = 1,
    /// Intermediate skills.
    Intermediate = 2,
    /// Advanced skills (the canopy).
    Advanced = 3,
}

impl Level {
    /// All levels, bottom to top.
    pub const ALL: [Level; 3] = [Level::Foundation, Level::Intermediate, Level::Advanced];

    /// Zero-based index, used to address per-level configuration arrays.
    #[inline]
    pub fn index(self) -> usize {
        self as usize - 1
    }

    /// The numeric rank (1..=3).
    #[inline]
    pub fn rank(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Level {
    type Error = SkillTreeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Foundation),
            2 => Ok(Self::Intermediate),
            3 => Ok(Self::Advanced),
            other => Err(SkillTreeError::InvalidLevel(other)),
        }
    }
}

impl From<Level> for u8 {
    #[inline]
    fn from(level: Level) -> Self {
        level.rank()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.rank())
    }
}

/// A skill in the prerequisite graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillNode {
    /// Unique, stable identifier.
    pub id: String,
    /// Mastery level.
    pub level: Level,
    /// Ids of prerequisite skills. Ids missing from the working set are ignored.
    #[serde(default)]
    pub prereq: Vec<String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub desc: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Manual x override. Only honored together with `y`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Manual y override. Only honored together with `x`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
}

impl SkillNode {
    /// Create a node with no descriptive fields.
    pub fn new(id: impl Into<String>, level: Level, prereq: &[&str]) -> Self {
        Self {
            id: id.into(),
            level,
            prereq: prereq.iter().map(|p| p.to_string()).collect(),
            name: String::new(),
            domain_id: String::new(),
            desc: String::new(),
            tags: Vec::new(),
            x: None,
            y: None,
        }
    }

    /// Attach a manual position override.
    pub fn pinned_at(mut self, x: f32, y: f32) -> Self {
        self.x = Some(x);
        self.y = Some(y);
        self
    }

    /// The manual position, if both coordinates are present.
    #[inline]
    pub fn manual_position(&self) -> Option<(f32, f32)> {
        self.x.zip(self.y)
    }
}

/// A skill node with its computed canvas position.
///
/// `x`/`y` are the node's center in world pixels. The embedded node is a
/// copy of the input with its manual override cleared; `pinned` records
/// whether that override supplied the position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionedNode {
    #[serde(flatten)]
    pub node: SkillNode,
    pub x: f32,
    pub y: f32,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub pinned: bool,
    /// Index of the node in the input slice.
    #[serde(skip)]
    pub slot: usize,
}

impl PositionedNode {
    pub(crate) fn placed(node: &SkillNode, slot: usize, x: f32, y: f32, pinned: bool) -> Self {
        let mut node = node.clone();
        node.x = None;
        node.y = None;
        Self {
            node,
            x,
            y,
            pinned,
            slot,
        }
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.node.id
    }

    #[inline]
    pub fn level(&self) -> Level {
        self.node.level
    }
}
