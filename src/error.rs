//! Error types for the data boundary.
//!
//! The layout engine itself never fails. Errors only arise when skill data
//! or progress snapshots are decoded from JSON / JavaScript values, or when a
//! caller names a skill that is not loaded.

use thiserror::Error;

/// Errors raised while loading or querying skill-tree data.
#[derive(Debug, Error)]
pub enum SkillTreeError {
    /// Malformed JSON input (dataset, skills or progress snapshot).
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A skill level outside the supported 1..=3 range.
    #[error("invalid skill level {0}: expected 1, 2 or 3")]
    InvalidLevel(u8),

    /// A skill id that is not part of the loaded set.
    #[error("unknown skill '{0}'")]
    UnknownSkill(String),
}
