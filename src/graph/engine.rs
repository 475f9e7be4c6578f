//! SkillGraph - prerequisite graph over a skill snapshot.
//!
//! The graph borrows the caller's skill slice and stores its topology in
//! petgraph's StableGraph. Node weights are input slots, so every result is
//! expressed as indices into the original slice and the input is never
//! copied or mutated.

use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::{EdgeRef, IntoEdgeReferences};
use petgraph::Direction;
use std::collections::{HashMap, VecDeque};

use super::edge::{BranchKind, Prerequisite};
use super::node::SkillNode;

/// Prerequisite graph for one skill snapshot.
///
/// This struct manages:
/// - Graph topology via petgraph (prerequisite → dependent)
/// - Mapping from skill id to graph index
/// - Bookkeeping of degenerate input (duplicate ids, dangling prerequisites)
pub struct SkillGraph<'a> {
    /// The borrowed snapshot.
    skills: &'a [SkillNode],

    /// Topology. Node weights are input slots, edges carry the branch kind.
    graph: StableDiGraph<usize, BranchKind>,

    /// First occurrence of each id.
    id_to_index: HashMap<&'a str, NodeIndex>,

    /// Ids seen more than once.
    duplicate_ids: Vec<&'a str>,

    /// (dependent slot, missing prerequisite id) pairs.
    dangling: Vec<(usize, &'a str)>,
}

impl<'a> SkillGraph<'a> {
    /// Build the graph for a snapshot.
    ///
    /// Prerequisite ids that are not in the snapshot produce no edge.
    pub fn new(skills: &'a [SkillNode]) -> Self {
        let mut graph = StableDiGraph::with_capacity(skills.len(), skills.len() * 2);
        let mut id_to_index = HashMap::with_capacity(skills.len());
        let mut duplicate_ids = Vec::new();

        // Nodes are added in input order so NodeIndex(i) holds slot i.
        for (slot, skill) in skills.iter().enumerate() {
            let index = graph.add_node(slot);
            if id_to_index.contains_key(skill.id.as_str()) {
                duplicate_ids.push(skill.id.as_str());
            } else {
                id_to_index.insert(skill.id.as_str(), index);
            }
        }

        let mut dangling = Vec::new();
        for (slot, skill) in skills.iter().enumerate() {
            for prereq in &skill.prereq {
                match id_to_index.get(prereq.as_str()) {
                    Some(&from) => {
                        let branch = BranchKind::for_level(skills[graph[from]].level);
                        graph.add_edge(from, NodeIndex::new(slot), branch);
                    }
                    None => dangling.push((slot, prereq.as_str())),
                }
            }
        }

        if !duplicate_ids.is_empty() {
            log::warn!("skill graph has duplicate ids: {:?}", duplicate_ids);
        }
        if !dangling.is_empty() {
            log::debug!("ignoring {} dangling prerequisite reference(s)", dangling.len());
        }

        Self {
            skills,
            graph,
            id_to_index,
            duplicate_ids,
            dangling,
        }
    }

    /// Number of skills in the snapshot.
    pub fn len(&self) -> usize {
        self.skills.len()
    }

    pub fn is_empty(&self) -> bool {
        self.skills.is_empty()
    }

    /// Number of resolved prerequisite edges.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// The snapshot this graph was built from.
    pub fn skills(&self) -> &'a [SkillNode] {
        self.skills
    }

    /// Slot of the first skill with this id.
    pub fn slot_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).map(|&index| self.graph[index])
    }

    /// Ids that appear more than once in the snapshot.
    pub fn duplicate_ids(&self) -> &[&'a str] {
        &self.duplicate_ids
    }

    /// Prerequisite references that point outside the snapshot.
    pub fn dangling(&self) -> &[(usize, &'a str)] {
        &self.dangling
    }

    /// Slots of the resolved prerequisites of `slot`.
    pub fn prerequisites_of(&self, slot: usize) -> Vec<usize> {
        self.neighbor_slots(slot, Direction::Incoming)
    }

    /// Slots of the skills that list `slot` as a prerequisite.
    pub fn dependents_of(&self, slot: usize) -> Vec<usize> {
        self.neighbor_slots(slot, Direction::Outgoing)
    }

    fn neighbor_slots(&self, slot: usize, direction: Direction) -> Vec<usize> {
        if slot >= self.skills.len() {
            return Vec::new();
        }
        let mut slots: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(slot), direction)
            .map(|n| self.graph[n])
            .collect();
        slots.sort_unstable();
        slots
    }

    /// All resolved prerequisite edges, in input order of the dependents.
    pub fn prerequisite_edges(&self) -> Vec<Prerequisite> {
        self.graph
            .edge_references()
            .map(|edge| Prerequisite {
                from: self.graph[edge.source()],
                to: self.graph[edge.target()],
                branch: *edge.weight(),
            })
            .collect()
    }

    /// Topological order of the snapshot, as input slots.
    ///
    /// Kahn's algorithm. The initial queue holds every in-degree-0 skill in
    /// input order, and the dependents of each dequeued skill are visited in
    /// their input order, so ties always resolve by input position.
    ///
    /// If the sort cannot place every skill (a cycle, or duplicate ids that
    /// make the snapshot ambiguous) the partial result is discarded and the
    /// input order is returned unchanged.
    pub fn topological_order(&self) -> Vec<usize> {
        let count = self.skills.len();
        let input_order = || (0..count).collect::<Vec<_>>();

        if !self.duplicate_ids.is_empty() {
            log::warn!("duplicate skill ids, keeping input order");
            return input_order();
        }

        let mut in_degree: Vec<usize> = vec![0; count];
        for edge in self.graph.edge_references() {
            in_degree[edge.target().index()] += 1;
        }

        let mut queue: VecDeque<NodeIndex> = self
            .graph
            .node_indices()
            .filter(|n| in_degree[n.index()] == 0)
            .collect();

        let mut order = Vec::with_capacity(count);
        while let Some(node) = queue.pop_front() {
            order.push(self.graph[node]);

            // petgraph lists outgoing edges newest first; restore input order.
            // Parallel edges (a repeated prereq entry) stay as repeats.
            let mut dependents: Vec<NodeIndex> = self
                .graph
                .neighbors_directed(node, Direction::Outgoing)
                .collect();
            dependents.sort_unstable();

            for dependent in dependents {
                let degree = &mut in_degree[dependent.index()];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(dependent);
                }
            }
        }

        if order.len() < count {
            log::warn!(
                "prerequisite cycle left {} of {} skills unresolved, keeping input order",
                count - order.len(),
                count
            );
            return input_order();
        }

        order
    }
}

/// Topologically sort a skill slice, falling back to input order on cycles.
pub fn topological_sort(skills: &[SkillNode]) -> Vec<&SkillNode> {
    SkillGraph::new(skills)
        .topological_order()
        .into_iter()
        .map(|slot| &skills[slot])
        .collect()
}
