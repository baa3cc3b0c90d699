//! Read-only topology queries over a `SkillGraph`.
//!
//! All orderings are deterministic: whenever several skills are equally
//! eligible, the lexicographically smallest id goes first.

use std::collections::{BTreeSet, HashMap};

use petgraph::graph::NodeIndex;
use petgraph::visit::{Dfs, Reversed};
use petgraph::Direction;

use skillgenome_types::error::GenomeError;
use skillgenome_types::skill::{Progress, SkillView};

use super::SkillGraph;

impl SkillGraph {
    /// Direct prerequisites of `id`. Empty when `id` is unknown.
    pub fn get_prerequisites(&self, id: &str) -> BTreeSet<String> {
        let Some(&idx) = self.index.get(id) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|pred| self.graph[pred].id.clone())
            .collect()
    }

    /// Skills that list `id` as a direct prerequisite. Empty when unknown.
    pub fn get_dependents(&self, id: &str) -> BTreeSet<String> {
        let Some(&idx) = self.index.get(id) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Outgoing)
            .map(|succ| self.graph[succ].id.clone())
            .collect()
    }

    /// Every direct and indirect prerequisite of `id`, each exactly once.
    pub fn get_all_ancestors(&self, id: &str) -> BTreeSet<String> {
        let Some(&start) = self.index.get(id) else {
            return BTreeSet::new();
        };

        let reversed = Reversed(&self.graph);
        let mut dfs = Dfs::new(reversed, start);
        let mut ancestors = BTreeSet::new();
        while let Some(idx) = dfs.next(reversed) {
            if idx != start {
                ancestors.insert(self.graph[idx].id.clone());
            }
        }
        ancestors
    }

    /// Direct prerequisites of `id` that are not yet completed.
    ///
    /// `id` is unlocked exactly when this is empty.
    pub fn get_blockers(&self, id: &str) -> BTreeSet<String> {
        let Some(&idx) = self.index.get(id) else {
            return BTreeSet::new();
        };
        self.graph
            .neighbors_directed(idx, Direction::Incoming)
            .filter(|&pred| !self.graph[pred].is_completed())
            .map(|pred| self.graph[pred].id.clone())
            .collect()
    }

    /// Every skill in a valid learning order: prerequisites first, ties
    /// broken by id.
    pub fn topological_order(&self) -> Vec<String> {
        self.topo_indices()
            .into_iter()
            .map(|idx| self.graph[idx].id.clone())
            .collect()
    }

    /// The longest prerequisite chain, by edge count.
    ///
    /// Among equally long chains, the one whose last skill appears first in
    /// `topological_order` wins. A graph without edges yields its smallest
    /// id; an empty graph yields an empty path.
    pub fn get_critical_path(&self) -> Vec<String> {
        let order = self.topo_indices();
        let mut length: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut end: Option<(NodeIndex, usize)> = None;

        for &node in &order {
            let here = length.get(&node).copied().unwrap_or(0);
            if end.is_none_or(|(_, best)| here > best) {
                end = Some((node, here));
            }
            for succ in self.sorted_neighbors(node, Direction::Outgoing) {
                let candidate = here + 1;
                if candidate > length.get(&succ).copied().unwrap_or(0) {
                    length.insert(succ, candidate);
                    parent.insert(succ, node);
                }
            }
        }

        let Some((mut cursor, _)) = end else {
            return Vec::new();
        };
        let mut path = vec![self.graph[cursor].id.clone()];
        while let Some(&prev) = parent.get(&cursor) {
            path.push(self.graph[prev].id.clone());
            cursor = prev;
        }
        path.reverse();
        path
    }

    /// Group skills into stages by prerequisite depth.
    ///
    /// Stage 0 holds skills without prerequisites. Every prerequisite of a
    /// skill in stage `k` sits in an earlier stage, so a whole stage can be
    /// studied in parallel. Ids are sorted within a stage.
    pub fn learning_stages(&self) -> Vec<Vec<String>> {
        let order = self.topo_indices();
        let mut depth: HashMap<NodeIndex, usize> = HashMap::with_capacity(order.len());

        for &node in &order {
            let d = self
                .graph
                .neighbors_directed(node, Direction::Incoming)
                .map(|pred| depth.get(&pred).copied().unwrap_or(0) + 1)
                .max()
                .unwrap_or(0);
            depth.insert(node, d);
        }

        let stage_count = depth.values().copied().max().map_or(0, |d| d + 1);
        let mut stages: Vec<Vec<String>> = vec![Vec::new(); stage_count];
        for &node in &order {
            stages[depth[&node]].push(self.graph[node].id.clone());
        }
        for stage in &mut stages {
            stage.sort();
        }
        stages
    }

    /// Presentation view of a skill, derived from current statuses.
    pub fn view(&self, id: &str) -> Result<SkillView, GenomeError> {
        let skill = self
            .skill(id)
            .ok_or_else(|| GenomeError::UnknownSkill(id.to_string()))?;
        if skill.is_completed() {
            Ok(SkillView::Completed)
        } else if self.get_blockers(id).is_empty() {
            Ok(SkillView::Current)
        } else {
            Ok(SkillView::Blocked)
        }
    }

    /// Pending skills whose prerequisites are all completed, in learning order.
    pub fn frontier(&self) -> Vec<String> {
        self.topo_indices()
            .into_iter()
            .filter(|&idx| !self.graph[idx].is_completed())
            .filter(|&idx| {
                self.graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .all(|pred| self.graph[pred].is_completed())
            })
            .map(|idx| self.graph[idx].id.clone())
            .collect()
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.skills().filter(|s| s.is_completed()).count(),
            total: self.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Kahn's algorithm with an id-ordered ready set.
    fn topo_indices(&self) -> Vec<NodeIndex> {
        let mut in_degree: HashMap<NodeIndex, usize> = self
            .graph
            .node_indices()
            .map(|idx| {
                let deg = self
                    .graph
                    .neighbors_directed(idx, Direction::Incoming)
                    .count();
                (idx, deg)
            })
            .collect();

        let mut ready: BTreeSet<(&str, NodeIndex)> = in_degree
            .iter()
            .filter(|&(_, &deg)| deg == 0)
            .map(|(&idx, _)| (self.graph[idx].id.as_str(), idx))
            .collect();

        let mut order = Vec::with_capacity(self.graph.node_count());
        while let Some((_, node)) = ready.pop_first() {
            order.push(node);
            for succ in self.graph.neighbors_directed(node, Direction::Outgoing) {
                if let Some(deg) = in_degree.get_mut(&succ) {
                    *deg -= 1;
                    if *deg == 0 {
                        ready.insert((self.graph[succ].id.as_str(), succ));
                    }
                }
            }
        }

        debug_assert_eq!(
            order.len(),
            self.graph.node_count(),
            "skill graph contains a cycle"
        );
        order
    }

    fn sorted_neighbors(&self, node: NodeIndex, dir: Direction) -> Vec<NodeIndex> {
        let mut neighbors: Vec<NodeIndex> = self.graph.neighbors_directed(node, dir).collect();
        neighbors.sort_by(|a, b| self.graph[*a].id.cmp(&self.graph[*b].id));
        neighbors
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
