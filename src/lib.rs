//! Skill Tree - WASM Module
//!
//! This module provides the layout engine and progress model behind the
//! frontend skill tree page. It is compiled to WebAssembly and exposes a
//! JavaScript-friendly API via wasm-bindgen; the canvas drawing itself stays
//! in the front end.
//!
//! # Architecture
//!
//! - `graph`: Prerequisite graph over a skill snapshot using petgraph's StableGraph
//! - `layout`: Bottom-up banded layout with the trunk-curve nudge
//! - `spatial`: R-tree hit index over the laid-out node boxes
//! - `progress`: Per-skill learning status and lock state
//! - `catalog`: Domains, datasets and the bundled frontend tree

use js_sys::Float32Array;
use serde::Serialize;
use wasm_bindgen::prelude::*;

pub mod catalog;
mod console;
pub mod error;
pub mod graph;
pub mod layout;
pub mod progress;
pub mod spatial;

use catalog::SkillTree;
use error::SkillTreeError;
use graph::SkillNode;
use layout::{LayoutConfig, LayoutResult, SkillTreeLayout};
use progress::{NodeVisual, ProgressMap, SkillStatus};
use spatial::HitIndex;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    console::init(log::LevelFilter::Info);
}

/// Change the console log level ("off", "error", "warn", "info", "debug", "trace").
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsError> {
    let filter: log::LevelFilter = level
        .parse()
        .map_err(|_| JsError::new(&format!("Unknown log level: {level}")))?;
    console::init(filter);
    Ok(())
}

/// Lay out a skill array without keeping any state.
///
/// `config` may be `undefined` or any subset of the layout configuration.
#[wasm_bindgen(js_name = layoutBottomUp)]
pub fn layout_bottom_up(skills: JsValue, config: JsValue) -> Result<JsValue, JsError> {
    let skills: Vec<SkillNode> = serde_wasm_bindgen::from_value(skills)
        .map_err(|e| JsError::new(&format!("Invalid skills: {e}")))?;
    let config = config_from_js(config)?;
    to_js(&layout::layout_bottom_up(&skills, &config))
}

/// Storage key the front end persists progress under.
#[wasm_bindgen(js_name = progressStorageKey)]
pub fn progress_storage_key() -> String {
    progress::STORAGE_KEY.to_string()
}

fn config_from_js(config: JsValue) -> Result<LayoutConfig, JsError> {
    if config.is_undefined() || config.is_null() {
        return Ok(LayoutConfig::default());
    }
    serde_wasm_bindgen::from_value(config)
        .map_err(|e| JsError::new(&format!("Invalid layout config: {e}")))
}

/// Plain JS objects rather than Maps, so results can go straight to JSON.
fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    Ok(value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())?)
}

/// A computed layout and the hit index built from it.
struct LaidOut {
    result: LayoutResult,
    hits: HitIndex,
}

/// Main entry point for the skill tree.
///
/// Owns the loaded tree, the layout configuration and the learner's progress.
/// The layout is computed lazily and cached until the tree is replaced.
#[wasm_bindgen]
pub struct SkillTreeWasm {
    tree: SkillTree,
    config: LayoutConfig,
    progress: ProgressMap,
    laid_out: Option<LaidOut>,
}

#[wasm_bindgen]
impl SkillTreeWasm {
    /// Create an empty skill tree with the default layout configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::with_layout_config(LayoutConfig::default())
    }

    /// Create an empty skill tree with a custom layout configuration.
    ///
    /// Missing fields fall back to their defaults.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<SkillTreeWasm, JsError> {
        Ok(Self::with_layout_config(config_from_js(config)?))
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Replace the tree with a bare skill array (no domains).
    #[wasm_bindgen(js_name = loadSkills)]
    pub fn load_skills(&mut self, skills: JsValue) -> Result<(), JsError> {
        let skills: Vec<SkillNode> = serde_wasm_bindgen::from_value(skills)
            .map_err(|e| JsError::new(&format!("Invalid skills: {e}")))?;
        self.load_tree(SkillTree {
            version: String::new(),
            domains: Vec::new(),
            skills,
        });
        Ok(())
    }

    /// Replace the tree with a dataset in JSON form.
    #[wasm_bindgen(js_name = loadSkillTreeJson)]
    pub fn load_skill_tree_json(&mut self, json: &str) -> Result<(), JsError> {
        self.load_tree(SkillTree::from_json(json)?);
        Ok(())
    }

    /// Replace the tree with the bundled frontend engineering tree.
    #[wasm_bindgen(js_name = loadFrontendTree)]
    pub fn load_frontend_tree(&mut self) -> Result<(), JsError> {
        self.load_tree(SkillTree::frontend()?);
        Ok(())
    }

    /// The loaded dataset as a plain object.
    #[wasm_bindgen(js_name = skillTree)]
    pub fn skill_tree(&self) -> Result<JsValue, JsError> {
        to_js(&self.tree)
    }

    /// Number of loaded skills.
    #[wasm_bindgen(js_name = skillCount)]
    pub fn skill_count(&self) -> u32 {
        self.tree.skills.len() as u32
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// The full layout result (`positioned`, world size and camera focus).
    pub fn layout(&mut self) -> Result<JsValue, JsError> {
        to_js(self.layout_result())
    }

    /// Node positions as a Float32Array `[x0, y0, x1, y1, ...]`.
    ///
    /// Order matches `layout().positioned`.
    pub fn positions(&mut self) -> Float32Array {
        Float32Array::from(&self.layout_result().positions_interleaved()[..])
    }

    /// Prerequisite edges as `[from0, to0, from1, to1, ...]` positioned indices.
    #[wasm_bindgen(js_name = prerequisiteEdges)]
    pub fn prerequisite_edges(&mut self) -> Vec<u32> {
        self.edge_pairs()
    }

    /// Positioned edges with endpoints and branch kind, ready to stroke.
    #[wasm_bindgen(js_name = edgeSegments)]
    pub fn edge_segments(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.layout_result().edges())
    }

    // =========================================================================
    // Hit Testing
    // =========================================================================

    /// Id of the skill under a world-space point, if any.
    #[wasm_bindgen(js_name = nodeAt)]
    pub fn node_at(&mut self, x: f32, y: f32) -> Option<String> {
        self.skill_id_at(x, y).map(str::to_string)
    }

    /// Ids of the skills intersecting a world-space rectangle.
    #[wasm_bindgen(js_name = nodesInRect)]
    pub fn nodes_in_rect(
        &mut self,
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
    ) -> Vec<String> {
        let laid_out = self.laid_out();
        laid_out
            .hits
            .in_rect(min_x, min_y, max_x, max_y)
            .into_iter()
            .map(|index| laid_out.result.positioned[index].id().to_string())
            .collect()
    }

    /// Id of the skill whose box is closest to a point.
    ///
    /// With `maxDistance`, skills farther than that from the point are ignored.
    #[wasm_bindgen(js_name = nearestNode)]
    pub fn nearest_node(&mut self, x: f32, y: f32, max_distance: Option<f32>) -> Option<String> {
        self.nearest_skill_id(x, y, max_distance).map(str::to_string)
    }

    /// Ids of the skills in a domain, in dataset order.
    #[wasm_bindgen(js_name = domainSkills)]
    pub fn domain_skills(&self, domain_id: &str) -> Vec<String> {
        self.tree
            .skills_in(domain_id)
            .map(|s| s.id.clone())
            .collect()
    }

    // =========================================================================
    // Progress
    // =========================================================================

    /// Advance a skill's status and return the new one.
    #[wasm_bindgen(js_name = cycleStatus)]
    pub fn cycle_status(&mut self, id: &str) -> Result<String, JsError> {
        Ok(self.cycle(id)?.to_string())
    }

    /// Current status of a skill ("todo", "learning" or "done").
    #[wasm_bindgen(js_name = statusOf)]
    pub fn status_of(&self, id: &str) -> String {
        self.progress.status(id).to_string()
    }

    /// Whether a skill still has prerequisites that are not done.
    #[wasm_bindgen(js_name = isLocked)]
    pub fn is_locked(&self, id: &str) -> Result<bool, JsError> {
        Ok(self.locked(id)?)
    }

    /// Whether a skill is drawn fogged: locked and not yet done.
    #[wasm_bindgen(js_name = isDimmed)]
    pub fn is_dimmed(&self, id: &str) -> Result<bool, JsError> {
        Ok(self.dimmed(id)?)
    }

    /// Status and lock flag for every positioned node, in positioned order.
    #[wasm_bindgen(js_name = nodeVisuals)]
    pub fn node_visuals(&mut self) -> Result<JsValue, JsError> {
        to_js(&self.visuals())
    }

    /// Restore persisted progress. Unreadable snapshots start fresh.
    #[wasm_bindgen(js_name = loadProgress)]
    pub fn load_progress(&mut self, json: Option<String>) {
        self.progress = ProgressMap::load_or_default(json.as_deref());
    }

    /// Progress snapshot to persist.
    #[wasm_bindgen(js_name = progressJson)]
    pub fn progress_json(&self) -> String {
        self.progress.to_json()
    }

    /// Forget all progress.
    #[wasm_bindgen(js_name = resetProgress)]
    pub fn reset_progress(&mut self) {
        self.progress.reset();
    }

    /// `{ total, done, learning, percent }` over the loaded skills.
    pub fn stats(&self) -> Result<JsValue, JsError> {
        to_js(&self.progress.stats(&self.tree.skills))
    }
}

impl SkillTreeWasm {
    pub fn with_layout_config(config: LayoutConfig) -> Self {
        Self {
            tree: SkillTree {
                version: String::new(),
                domains: Vec::new(),
                skills: Vec::new(),
            },
            config,
            progress: ProgressMap::new(),
            laid_out: None,
        }
    }

    /// Replace the tree. Progress is kept, the cached layout is not.
    pub fn load_tree(&mut self, tree: SkillTree) {
        let dangling = tree.dangling_prerequisites().len();
        if dangling > 0 {
            log::warn!("{dangling} prerequisite reference(s) point outside the tree");
        }
        self.tree = tree;
        self.laid_out = None;
    }

    pub fn tree(&self) -> &SkillTree {
        &self.tree
    }

    pub fn progress(&self) -> &ProgressMap {
        &self.progress
    }

    pub fn layout_result(&mut self) -> &LayoutResult {
        &self.laid_out().result
    }

    pub fn edge_pairs(&mut self) -> Vec<u32> {
        self.layout_result()
            .edges()
            .iter()
            .flat_map(|edge| [edge.from as u32, edge.to as u32])
            .collect()
    }

    pub fn skill_id_at(&mut self, x: f32, y: f32) -> Option<&str> {
        let laid_out = self.laid_out();
        laid_out
            .hits
            .node_at(x, y)
            .map(|index| laid_out.result.positioned[index].id())
    }

    pub fn nearest_skill_id(&mut self, x: f32, y: f32, max_distance: Option<f32>) -> Option<&str> {
        let laid_out = self.laid_out();
        let index = match max_distance {
            Some(distance) => laid_out.hits.nearest_within(x, y, distance),
            None => laid_out.hits.nearest(x, y),
        };
        index.map(|index| laid_out.result.positioned[index].id())
    }

    pub fn visuals(&mut self) -> Vec<NodeVisual> {
        self.laid_out();
        let Some(laid_out) = &self.laid_out else {
            return Vec::new();
        };
        laid_out
            .result
            .positioned
            .iter()
            .map(|p| self.progress.visual(&p.node))
            .collect()
    }

    /// Advance a loaded skill's status.
    pub fn cycle(&mut self, id: &str) -> Result<SkillStatus, SkillTreeError> {
        self.tree.require_skill(id)?;
        Ok(self.progress.cycle(id))
    }

    pub fn locked(&self, id: &str) -> Result<bool, SkillTreeError> {
        let skill = self.tree.require_skill(id)?;
        Ok(self.progress.is_locked(skill))
    }

    pub fn dimmed(&self, id: &str) -> Result<bool, SkillTreeError> {
        let skill = self.tree.require_skill(id)?;
        Ok(self.progress.visual(skill).is_dimmed())
    }

    fn laid_out(&mut self) -> &LaidOut {
        let Self {
            tree,
            config,
            laid_out,
            ..
        } = self;
        laid_out.get_or_insert_with(|| {
            let result = SkillTreeLayout::new(config.clone()).compute(&tree.skills);
            let hits = HitIndex::build(&result, config.node_width, config.node_height);
            LaidOut { result, hits }
        })
    }
}

impl Default for SkillTreeWasm {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod integration_tests {
    use super::*;

    fn frontend() -> SkillTreeWasm {
        let mut wasm = SkillTreeWasm::default();
        wasm.load_tree(SkillTree::frontend().unwrap());
        wasm
    }

    /// Full pipeline: dataset → layout → hit index → id under the pointer.
    #[test]
    fn test_hit_test_finds_every_node() {
        let mut wasm = frontend();
        let positions: Vec<(String, f32, f32)> = wasm
            .layout_result()
            .positioned
            .iter()
            .map(|p| (p.id().to_string(), p.x, p.y))
            .collect();
        assert_eq!(positions.len(), 39);

        for (id, x, y) in positions {
            assert_eq!(wasm.skill_id_at(x, y), Some(id.as_str()), "hit test at {id}");
        }
        assert_eq!(wasm.skill_id_at(-500.0, -500.0), None);
    }

    #[test]
    fn test_edge_pairs_cover_every_prerequisite() {
        let mut wasm = frontend();
        let expected: usize = wasm.tree().skills.iter().map(|s| s.prereq.len()).sum();

        let pairs = wasm.edge_pairs();
        assert_eq!(pairs.len(), expected * 2);

        let result = wasm.layout_result();
        for pair in pairs.chunks(2) {
            let from = &result.positioned[pair[0] as usize];
            let to = &result.positioned[pair[1] as usize];
            let listed = to.node.prereq.iter().any(|p| p == from.id());
            assert!(listed, "{} → {}", from.id(), to.id());
        }
    }

    #[test]
    fn test_progress_unlocks_dependents() {
        let mut wasm = frontend();
        assert!(!wasm.locked("js-basics").unwrap());
        assert!(wasm.locked("js-scope").unwrap());

        assert_eq!(wasm.cycle("js-basics").unwrap(), SkillStatus::Learning);
        assert!(wasm.locked("js-scope").unwrap());
        assert_eq!(wasm.cycle("js-basics").unwrap(), SkillStatus::Done);
        assert!(!wasm.locked("js-scope").unwrap());

        let stats = wasm.progress().stats(&wasm.tree().skills);
        assert_eq!((stats.total, stats.done, stats.percent), (39, 1, 3));

        let visuals = wasm.visuals();
        let result = wasm.layout_result();
        let scope = result.positioned.iter().position(|p| p.id() == "js-scope").unwrap();
        assert!(!visuals[scope].locked);
        assert_eq!(visuals[scope].status, SkillStatus::Todo);
    }

    #[test]
    fn test_nearest_skill() {
        let mut wasm = frontend();
        let (x, y) = wasm.layout_result().position_of("js-basics").unwrap();

        // 40px below the box center is 24px outside its bottom edge.
        assert_eq!(wasm.nearest_skill_id(x, y + 40.0, None), Some("js-basics"));
        assert_eq!(wasm.nearest_skill_id(x, y + 40.0, Some(30.0)), Some("js-basics"));
        assert_eq!(wasm.nearest_skill_id(x, y + 40.0, Some(10.0)), None);
        assert_eq!(SkillTreeWasm::default().nearest_skill_id(0.0, 0.0, None), None);
    }

    #[test]
    fn test_dimmed_follows_progress() {
        let mut wasm = frontend();
        assert!(!wasm.dimmed("js-basics").unwrap());
        assert!(wasm.dimmed("js-scope").unwrap());

        // Done skills are never fogged, even while locked.
        wasm.cycle("js-scope").unwrap();
        wasm.cycle("js-scope").unwrap();
        assert!(wasm.locked("js-scope").unwrap());
        assert!(!wasm.dimmed("js-scope").unwrap());

        assert!(wasm.dimmed("cobol").is_err());
    }

    #[test]
    fn test_domain_skills() {
        let wasm = frontend();
        let js = wasm.domain_skills("js");
        assert_eq!(js.len(), 6);
        assert_eq!(js[0], "js-basics");
        assert!(wasm.domain_skills("cobol").is_empty());
    }

    #[test]
    fn test_unknown_skill_rejected() {
        let mut wasm = frontend();
        assert!(matches!(
            wasm.cycle("cobol"),
            Err(SkillTreeError::UnknownSkill(id)) if id == "cobol"
        ));
        assert!(wasm.progress().is_empty());
        assert!(wasm.locked("cobol").is_err());
    }

    /// Reloading must drop the cached layout but keep progress.
    #[test]
    fn test_reload_invalidates_layout() {
        let mut wasm = frontend();
        assert_eq!(wasm.layout_result().len(), 39);
        wasm.cycle("js-basics").unwrap();

        wasm.load_tree(SkillTree {
            version: "test".into(),
            domains: Vec::new(),
            skills: vec![graph::SkillNode::new("js-basics", graph::Level::Foundation, &[])],
        });
        assert_eq!(wasm.layout_result().len(), 1);
        assert_eq!(wasm.progress().status("js-basics"), SkillStatus::Learning);
    }

    #[test]
    fn test_empty_tree() {
        let mut wasm = SkillTreeWasm::default();
        assert!(wasm.layout_result().is_empty());
        assert!(wasm.edge_pairs().is_empty());
        assert_eq!(wasm.skill_id_at(700.0, 765.0), None);
    }

    #[test]
    fn test_custom_config_reaches_layout() {
        let config = LayoutConfig::default().with_world_size(800.0, 600.0);
        let mut wasm = SkillTreeWasm::with_layout_config(config);
        wasm.load_tree(SkillTree::frontend().unwrap());

        let result = wasm.layout_result();
        assert_eq!(result.world_width, 800.0);
        assert_eq!(result.focus_point(), (400.0, 480.0));
    }
}
