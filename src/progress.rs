//! Client-side learning progress.
//!
//! Progress is a flat map from skill id to status, persisted by the front
//! end as JSON under [`STORAGE_KEY`]. Layout never reads it; renderers
//! combine it with the positioned nodes to pick fills and lock badges.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SkillTreeError;
use crate::graph::SkillNode;

/// Storage key of the persisted progress map.
pub const STORAGE_KEY: &str = "frontend-skill-tree:progress:v1";

/// Learning status of one skill. Skills without an entry are `Todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    #[default]
    Todo,
    Learning,
    Done,
}

impl SkillStatus {
    /// The status a tap moves to: todo → learning → done → todo.
    pub fn next(self) -> Self {
        match self {
            Self::Todo => Self::Learning,
            Self::Learning => Self::Done,
            Self::Done => Self::Todo,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Learning => "learning",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a renderer needs to draw one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NodeVisual {
    pub status: SkillStatus,
    /// Some prerequisite is not done yet.
    pub locked: bool,
}

impl NodeVisual {
    /// Locked and not already done: drawn with the fog overlay.
    pub fn is_dimmed(self) -> bool {
        self.locked && self.status != SkillStatus::Done
    }
}

/// Summary counts for the sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressStats {
    pub total: usize,
    pub done: usize,
    pub learning: usize,
    /// Rounded percentage of done skills; 0 for an empty tree.
    pub percent: u32,
}

/// Status per skill id.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressMap {
    entries: BTreeMap<String, SkillStatus>,
}

impl ProgressMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a persisted snapshot.
    pub fn from_json(json: &str) -> Result<Self, SkillTreeError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Parse a persisted snapshot, starting fresh if it is missing or corrupt.
    pub fn load_or_default(json: Option<&str>) -> Self {
        match json.map(str::trim) {
            None | Some("") => Self::default(),
            Some(raw) => Self::from_json(raw).unwrap_or_else(|err| {
                log::warn!("discarding unreadable progress snapshot: {err}");
                Self::default()
            }),
        }
    }

    /// Serialize for persistence.
    pub fn to_json(&self) -> String {
        // A string-keyed map of unit enums always serializes.
        serde_json::to_string(&self.entries).unwrap_or_else(|_| "{}".to_string())
    }

    /// Status of a skill; `Todo` when unknown.
    pub fn status(&self, id: &str) -> SkillStatus {
        self.entries.get(id).copied().unwrap_or_default()
    }

    pub fn set(&mut self, id: impl Into<String>, status: SkillStatus) {
        self.entries.insert(id.into(), status);
    }

    /// Advance a skill to its next status and return it.
    pub fn cycle(&mut self, id: &str) -> SkillStatus {
        let next = self.status(id).next();
        self.entries.insert(id.to_string(), next);
        next
    }

    /// Forget every entry.
    pub fn reset(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A skill is locked while any listed prerequisite is not done.
    ///
    /// Prerequisites missing from the tree count as not done.
    pub fn is_locked(&self, skill: &SkillNode) -> bool {
        skill
            .prereq
            .iter()
            .any(|id| self.status(id) != SkillStatus::Done)
    }

    pub fn visual(&self, skill: &SkillNode) -> NodeVisual {
        NodeVisual {
            status: self.status(&skill.id),
            locked: self.is_locked(skill),
        }
    }

    /// Counts over the given skills. Entries for other ids are ignored.
    pub fn stats<'a>(&self, skills: impl IntoIterator<Item = &'a SkillNode>) -> ProgressStats {
        let mut total = 0;
        let mut done = 0;
        let mut learning = 0;
        for skill in skills {
            total += 1;
            match self.status(&skill.id) {
                SkillStatus::Done => done += 1,
                SkillStatus::Learning => learning += 1,
                SkillStatus::Todo => {}
            }
        }

        let percent = if total == 0 {
            0
        } else {
            (done as f64 / total as f64 * 100.0).round() as u32
        };

        ProgressStats {
            total,
            done,
            learning,
            percent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Level;

    #[test]
    fn test_status_cycle() {
        assert_eq!(SkillStatus::Todo.next(), SkillStatus::Learning);
        assert_eq!(SkillStatus::Learning.next(), SkillStatus::Done);
        assert_eq!(SkillStatus::Done.next(), SkillStatus::Todo);
        assert_eq!(SkillStatus::default(), SkillStatus::Todo);
    }

    #[test]
    fn test_cycle_unknown_starts_at_learning() {
        let mut progress = ProgressMap::new();
        assert_eq!(progress.status("js-basics"), SkillStatus::Todo);
        assert_eq!(progress.cycle("js-basics"), SkillStatus::Learning);
        assert_eq!(progress.cycle("js-basics"), SkillStatus::Done);
        assert_eq!(progress.cycle("js-basics"), SkillStatus::Todo);
        assert_eq!(progress.len(), 1);
    }

    #[test]
    fn test_json_round_trip_format() {
        let mut progress = ProgressMap::new();
        progress.set("a", SkillStatus::Done);
        progress.set("b", SkillStatus::Learning);

        assert_eq!(progress.to_json(), r#"{"a":"done","b":"learning"}"#);
        assert_eq!(ProgressMap::from_json(&progress.to_json()).unwrap(), progress);
    }

    #[test]
    fn test_load_or_default_is_lenient() {
        assert!(ProgressMap::load_or_default(None).is_empty());
        assert!(ProgressMap::load_or_default(Some("  ")).is_empty());
        assert!(ProgressMap::load_or_default(Some("{not json")).is_empty());
        assert!(ProgressMap::load_or_default(Some(r#"{"a":"mastered"}"#)).is_empty());

        let loaded = ProgressMap::load_or_default(Some(r#"{"a":"done"}"#));
        assert_eq!(loaded.status("a"), SkillStatus::Done);
    }

    #[test]
    fn test_from_json_is_strict() {
        assert!(matches!(
            ProgressMap::from_json("[1, 2]"),
            Err(SkillTreeError::Json(_))
        ));
    }

    #[test]
    fn test_locking() {
        let skill = SkillNode::new("c", Level::Advanced, &["a", "b"]);
        let mut progress = ProgressMap::new();
        assert!(progress.is_locked(&skill));

        progress.set("a", SkillStatus::Done);
        progress.set("b", SkillStatus::Learning);
        assert!(progress.is_locked(&skill));

        progress.set("b", SkillStatus::Done);
        assert!(!progress.is_locked(&skill));

        let root = SkillNode::new("a", Level::Foundation, &[]);
        assert!(!progress.is_locked(&root));

        let dangling = SkillNode::new("d", Level::Intermediate, &["ghost"]);
        assert!(progress.is_locked(&dangling));
    }

    #[test]
    fn test_visual_dimming() {
        let skill = SkillNode::new("b", Level::Intermediate, &["a"]);
        let mut progress = ProgressMap::new();

        let visual = progress.visual(&skill);
        assert!(visual.locked);
        assert!(visual.is_dimmed());

        progress.set("b", SkillStatus::Done);
        let visual = progress.visual(&skill);
        assert!(visual.locked);
        assert!(!visual.is_dimmed());
    }

    #[test]
    fn test_stats() {
        let skills = vec![
            SkillNode::new("a", Level::Foundation, &[]),
            SkillNode::new("b", Level::Foundation, &[]),
            SkillNode::new("c", Level::Intermediate, &[]),
        ];
        let mut progress = ProgressMap::new();
        progress.set("a", SkillStatus::Done);
        progress.set("b", SkillStatus::Learning);
        progress.set("not-in-tree", SkillStatus::Done);

        let stats = progress.stats(&skills);
        assert_eq!(
            stats,
            ProgressStats {
                total: 3,
                done: 1,
                learning: 1,
                percent: 33
            }
        );

        assert_eq!(ProgressMap::new().stats(&[]).percent, 0);
    }
}
