//! Skill catalog: domains plus the skills that belong to them.
//!
//! The crate bundles the frontend engineering tree so the demo page can start
//! without a fetch. Other trees are loaded from JSON of the same shape:
//!
//! ```json
//! { "version": "0.1.0",
//!   "domains": [{ "id": "js", "name": "JavaScript", "color": 4906624 }],
//!   "skills":  [{ "id": "js-basics", "domainId": "js", "level": 1, "prereq": [] }] }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::SkillTreeError;
use crate::graph::SkillNode;

const FRONTEND_TREE: &str = include_str!("../data/frontend_skill_tree.json");

/// Fill used for skills whose domain is not in the catalog (slate-400).
pub const FALLBACK_COLOR: u32 = 0x94a3b8;

/// A group of related skills sharing a color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Domain {
    pub id: String,
    pub name: String,
    /// 0xRRGGBB.
    pub color: u32,
}

/// A complete skill tree dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTree {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub domains: Vec<Domain>,
    pub skills: Vec<SkillNode>,
}

impl SkillTree {
    pub fn from_json(json: &str) -> Result<Self, SkillTreeError> {
        let tree: Self = serde_json::from_str(json)?;
        log::debug!(
            "loaded skill tree v{}: {} domain(s), {} skill(s)",
            tree.version,
            tree.domains.len(),
            tree.skills.len()
        );
        Ok(tree)
    }

    /// The bundled frontend engineering tree.
    pub fn frontend() -> Result<Self, SkillTreeError> {
        Self::from_json(FRONTEND_TREE)
    }

    pub fn domain(&self, id: &str) -> Option<&Domain> {
        self.domains.iter().find(|d| d.id == id)
    }

    pub fn skill(&self, id: &str) -> Option<&SkillNode> {
        self.skills.iter().find(|s| s.id == id)
    }

    /// Like [`SkillTree::skill`], but a missing id is an error.
    pub fn require_skill(&self, id: &str) -> Result<&SkillNode, SkillTreeError> {
        self.skill(id)
            .ok_or_else(|| SkillTreeError::UnknownSkill(id.to_string()))
    }

    /// Color of a skill's domain, [`FALLBACK_COLOR`] if it has none.
    pub fn domain_color(&self, skill: &SkillNode) -> u32 {
        self.domain(&skill.domain_id)
            .map_or(FALLBACK_COLOR, |d| d.color)
    }

    /// Skills in a domain, in dataset order.
    pub fn skills_in<'a>(
        &'a self,
        domain_id: &'a str,
    ) -> impl Iterator<Item = &'a SkillNode> + 'a {
        self.skills.iter().filter(move |s| s.domain_id == domain_id)
    }

    /// `(skill id, missing prerequisite id)` for every reference that points
    /// outside the tree.
    pub fn dangling_prerequisites(&self) -> Vec<(&str, &str)> {
        self.skills
            .iter()
            .flat_map(|skill| {
                skill
                    .prereq
                    .iter()
                    .filter(|p| self.skill(p).is_none())
                    .map(move |p| (skill.id.as_str(), p.as_str()))
            })
            .collect()
    }
}
