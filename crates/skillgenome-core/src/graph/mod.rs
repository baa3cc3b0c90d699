//! The skill dependency graph engine.
//!
//! `SkillGraph` owns a `petgraph` directed graph of skills. Edges point from a
//! prerequisite to the skill that depends on it. Every write path keeps the
//! graph acyclic and every edge anchored to existing skills, so the query
//! side never has to cope with an invalid graph:
//!
//! - `mod` -- node/edge storage, mutations, gating
//! - `build` -- wholesale rebuild from a generation payload
//! - `query` -- prerequisites, ancestors, blockers, orderings, critical path
//! - `snapshot` -- lossless round trip through `GraphSnapshot`
//!
//! The engine is plain in-memory state with no interior locking. Each learning
//! session owns its own instance.

pub mod build;
pub mod query;
pub mod snapshot;

use std::collections::HashMap;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::debug;

use skillgenome_types::config::RebuildPolicy;
use skillgenome_types::error::GenomeError;
use skillgenome_types::quiz::QuizEvaluation;
use skillgenome_types::skill::{Dependency, Skill, SkillStatus};

/// Lifecycle state of an engine instance.
///
/// A failed build always lands in `Empty`; an invalid graph is never left
/// resident.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Empty,
    Built,
}

/// A directed acyclic graph of skills keyed by skill id.
#[derive(Debug, Clone, Default)]
pub struct SkillGraph {
    graph: DiGraph<Skill, String>,
    index: HashMap<String, NodeIndex>,
    rebuild_policy: RebuildPolicy,
}

impl SkillGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty graph that applies `policy` on every rebuild.
    pub fn with_rebuild_policy(policy: RebuildPolicy) -> Self {
        Self {
            rebuild_policy: policy,
            ..Self::default()
        }
    }

    pub fn rebuild_policy(&self) -> RebuildPolicy {
        self.rebuild_policy
    }

    pub fn set_rebuild_policy(&mut self, policy: RebuildPolicy) {
        self.rebuild_policy = policy;
    }

    pub fn state(&self) -> EngineState {
        if self.is_empty() {
            EngineState::Empty
        } else {
            EngineState::Built
        }
    }

    /// Number of skills.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.index.get(id).map(|&idx| &self.graph[idx])
    }

    /// All skills in insertion order.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.graph.node_indices().map(move |idx| &self.graph[idx])
    }

    /// All dependency edges in insertion order.
    pub fn dependencies(&self) -> impl Iterator<Item = Dependency> + '_ {
        self.graph.edge_references().map(move |edge| Dependency {
            from: self.graph[edge.source()].id.clone(),
            to: self.graph[edge.target()].id.clone(),
            reason: edge.weight().clone(),
        })
    }

    /// Look up the edge `from -> to`.
    pub fn dependency(&self, from: &str, to: &str) -> Option<Dependency> {
        let (&a, &b) = (self.index.get(from)?, self.index.get(to)?);
        let edge = self.graph.find_edge(a, b)?;
        Some(Dependency {
            from: from.to_string(),
            to: to.to_string(),
            reason: self.graph[edge].clone(),
        })
    }

    /// Drop every skill and edge. The rebuild policy is kept.
    pub fn clear(&mut self) {
        self.graph.clear();
        self.index.clear();
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// Insert a skill, or overwrite the attributes of an existing one.
    ///
    /// An overwrite keeps the node in place: its status and every incident
    /// edge survive.
    pub fn add_skill(
        &mut self,
        id: impl Into<String>,
        description: impl Into<String>,
        resources: Vec<String>,
    ) {
        let id = id.into();
        let description = description.into();

        if let Some(&idx) = self.index.get(&id) {
            let skill = &mut self.graph[idx];
            skill.description = description;
            skill.resources = resources;
            debug!(skill = %id, "skill updated");
            return;
        }

        let idx = self
            .graph
            .add_node(Skill::new(id.clone(), description, resources));
        self.index.insert(id.clone(), idx);
        debug!(skill = %id, "skill added");
    }

    /// Insert the edge `from -> to` (`from` is a prerequisite of `to`).
    ///
    /// Fails with `UnknownSkill` if either endpoint is missing and with
    /// `Cycle` if the edge would close a directed cycle. On failure the graph
    /// is untouched. Re-adding an existing edge replaces its reason.
    pub fn add_dependency(
        &mut self,
        from: &str,
        to: &str,
        reason: impl Into<String>,
    ) -> Result<(), GenomeError> {
        let a = self.node(from)?;
        let b = self.node(to)?;
        let reason = reason.into();

        if let Some(edge) = self.graph.find_edge(a, b) {
            self.graph[edge] = reason;
            debug!(from, to, "dependency reason updated");
            return Ok(());
        }

        if let Some(path) = self.path_between(b, a) {
            let mut cycle = Vec::with_capacity(path.len() + 1);
            cycle.push(from.to_string());
            cycle.extend(path.into_iter().map(|idx| self.graph[idx].id.clone()));
            return Err(GenomeError::Cycle { cycle });
        }

        self.graph.add_edge(a, b, reason);
        debug!(from, to, "dependency added");
        Ok(())
    }

    /// Mark a skill as mastered. Completion never cascades to dependents.
    pub fn mark_completed(&mut self, id: &str) -> Result<(), GenomeError> {
        let idx = self.node(id)?;
        self.graph[idx].status = SkillStatus::Completed;
        debug!(skill = %id, "skill completed");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Gating
    // -----------------------------------------------------------------------

    /// Fail with `Blocked` unless every prerequisite of `id` is completed.
    pub fn ensure_unlocked(&self, id: &str) -> Result<(), GenomeError> {
        self.node(id)?;
        let blockers = self.get_blockers(id);
        if blockers.is_empty() {
            Ok(())
        } else {
            Err(GenomeError::Blocked {
                skill: id.to_string(),
                blockers: blockers.into_iter().collect(),
            })
        }
    }

    /// Apply a graded quiz to `id`: a pass marks the skill completed.
    ///
    /// A pass on a skill with unfinished prerequisites fails with `Blocked`
    /// and leaves it pending. Returns `true` when the skill's status changed.
    pub fn record_assessment(
        &mut self,
        id: &str,
        evaluation: &QuizEvaluation,
    ) -> Result<bool, GenomeError> {
        let idx = self.node(id)?;
        if !evaluation.passed || self.graph[idx].is_completed() {
            return Ok(false);
        }
        self.ensure_unlocked(id)?;
        self.mark_completed(id)?;
        Ok(true)
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn node(&self, id: &str) -> Result<NodeIndex, GenomeError> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| GenomeError::UnknownSkill(id.to_string()))
    }

    /// Shortest directed path `start ..= goal`, if `goal` is reachable.
    fn path_between(&self, start: NodeIndex, goal: NodeIndex) -> Option<Vec<NodeIndex>> {
        astar(&self.graph, start, |n| n == goal, |_| 1usize, |_| 0)
            .map(|(_, path)| path)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: graph with the given skill ids, no edges.
    fn graph_with(ids: &[&str]) -> SkillGraph {
        let mut graph = SkillGraph::new();
        for id in ids {
            graph.add_skill(*id, format!("about {id}"), vec![]);
        }
        graph
    }

    fn passed(passed: bool) -> QuizEvaluation {
        QuizEvaluation {
            score: if passed { 3 } else { 0 },
            total: 3,
            passed,
            failed_concepts: vec![],
            feedback: String::new(),
        }
    }

    #[test]
    fn test_new_graph_is_empty() {
        let graph = SkillGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.state(), EngineState::Empty);
        assert_eq!(graph.rebuild_policy(), RebuildPolicy::Fresh);
    }

    #[test]
    fn test_add_skill_defaults_to_pending() {
        let graph = graph_with(&["A"]);
        let skill = graph.skill("A").unwrap();
        assert_eq!(skill.status, SkillStatus::Pending);
        assert_eq!(skill.description, "about A");
        assert_eq!(graph.state(), EngineState::Built);
    }

    #[test]
    fn test_overwrite_keeps_status_and_edges() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_dependency("A", "B", "A first").unwrap();
        graph.mark_completed("A").unwrap();

        graph.add_skill("A", "new text", vec!["https://docs".to_string()]);

        assert_eq!(graph.len(), 2, "overwrite must not add a node");
        let skill = graph.skill("A").unwrap();
        assert_eq!(skill.description, "new text");
        assert_eq!(skill.resources, vec!["https://docs".to_string()]);
        assert_eq!(skill.status, SkillStatus::Completed);
        assert!(graph.dependency("A", "B").is_some(), "incident edge must survive");
    }

    #[test]
    fn test_add_dependency_unknown_endpoint() {
        let mut graph = graph_with(&["A"]);
        let err = graph.add_dependency("A", "Z", "").unwrap_err();
        assert!(matches!(err, GenomeError::UnknownSkill(ref id) if id == "Z"), "got: {err}");
        let err = graph.add_dependency("Y", "A", "").unwrap_err();
        assert!(matches!(err, GenomeError::UnknownSkill(ref id) if id == "Y"), "got: {err}");
        assert_eq!(graph.dependency_count(), 0);
    }

    #[test]
    fn test_cycle_rejected_and_graph_unchanged() {
        let mut graph = graph_with(&["A", "B", "C"]);
        graph.add_dependency("A", "B", "").unwrap();
        graph.add_dependency("B", "C", "").unwrap();

        let err = graph.add_dependency("C", "A", "").unwrap_err();
        match err {
            GenomeError::Cycle { cycle } => assert_eq!(cycle, vec!["C", "A", "B", "C"]),
            other => panic!("expected cycle, got {other}"),
        }
        assert_eq!(graph.dependency_count(), 2);
        assert!(graph.dependency("C", "A").is_none());
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let mut graph = graph_with(&["A"]);
        let err = graph.add_dependency("A", "A", "").unwrap_err();
        match err {
            GenomeError::Cycle { cycle } => assert_eq!(cycle, vec!["A", "A"]),
            other => panic!("expected cycle, got {other}"),
        }
        assert_eq!(graph.dependency_count(), 0);
    }

    #[test]
    fn test_duplicate_edge_updates_reason() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_dependency("A", "B", "old").unwrap();
        graph.add_dependency("A", "B", "new").unwrap();
        assert_eq!(graph.dependency_count(), 1);
        assert_eq!(graph.dependency("A", "B").unwrap().reason, "new");
    }

    #[test]
    fn test_mark_completed_unknown_skill() {
        let mut graph = graph_with(&["B"]);
        let err = graph.mark_completed("A").unwrap_err();
        assert!(matches!(err, GenomeError::UnknownSkill(ref id) if id == "A"));
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.skill("B").unwrap().status, SkillStatus::Pending);
    }

    #[test]
    fn test_mark_completed_does_not_cascade() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_dependency("A", "B", "").unwrap();
        graph.mark_completed("A").unwrap();
        assert!(graph.skill("A").unwrap().is_completed());
        assert!(!graph.skill("B").unwrap().is_completed());
    }

    #[test]
    fn test_ensure_unlocked() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_dependency("A", "B", "").unwrap();

        let err = graph.ensure_unlocked("B").unwrap_err();
        match err {
            GenomeError::Blocked { skill, blockers } => {
                assert_eq!(skill, "B");
                assert_eq!(blockers, vec!["A"]);
            }
            other => panic!("expected blocked, got {other}"),
        }

        graph.mark_completed("A").unwrap();
        assert!(graph.ensure_unlocked("B").is_ok());
        assert!(matches!(
            graph.ensure_unlocked("missing"),
            Err(GenomeError::UnknownSkill(_))
        ));
    }

    #[test]
    fn test_record_assessment() {
        let mut graph = graph_with(&["A"]);
        assert!(!graph.record_assessment("A", &passed(false)).unwrap());
        assert!(!graph.skill("A").unwrap().is_completed());

        assert!(graph.record_assessment("A", &passed(true)).unwrap());
        assert!(graph.skill("A").unwrap().is_completed());

        assert!(
            !graph.record_assessment("A", &passed(true)).unwrap(),
            "already completed -> no change"
        );
        assert!(graph.record_assessment("Z", &passed(true)).is_err());
    }

    #[test]
    fn test_record_assessment_respects_gate() {
        let mut graph = graph_with(&["A", "B"]);
        graph.add_dependency("A", "B", "").unwrap();

        let err = graph.record_assessment("B", &passed(true)).unwrap_err();
        assert!(matches!(err, GenomeError::Blocked { ref skill, .. } if skill == "B"), "got: {err}");
        assert!(!graph.skill("B").unwrap().is_completed(), "blocked skill stays pending");

        // A failed attempt on a blocked skill is simply not a change.
        assert!(!graph.record_assessment("B", &passed(false)).unwrap());

        graph.mark_completed("A").unwrap();
        assert!(graph.record_assessment("B", &passed(true)).unwrap());
        assert!(graph.skill("B").unwrap().is_completed());
    }

    #[test]
    fn test_cycle_reports_shortest_loop() {
        let mut graph = graph_with(&["A", "B", "C", "D"]);
        graph.add_dependency("A", "B", "").unwrap();
        graph.add_dependency("B", "C", "").unwrap();
        graph.add_dependency("C", "D", "").unwrap();
        graph.add_dependency("A", "D", "").unwrap();

        match graph.add_dependency("D", "A", "").unwrap_err() {
            GenomeError::Cycle { cycle } => assert_eq!(cycle, vec!["D", "A", "D"]),
            other => panic!("expected cycle, got {other}"),
        }
    }

    #[test]
    fn test_clear_keeps_policy() {
        let mut graph = SkillGraph::with_rebuild_policy(RebuildPolicy::PreserveProgress);
        graph.add_skill("A", "", vec![]);
        graph.clear();
        assert!(graph.is_empty());
        assert!(!graph.contains("A"));
        assert_eq!(graph.rebuild_policy(), RebuildPolicy::PreserveProgress);
    }
}
