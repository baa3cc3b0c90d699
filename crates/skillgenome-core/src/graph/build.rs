//! Wholesale graph construction from a generation payload.
//!
//! A build stages the new graph on the side, adds every node, then every
//! edge, and collects each structural problem instead of stopping at the
//! first one. Only a problem-free staging graph replaces the resident one;
//! otherwise the engine is reset to empty.

use std::collections::HashSet;

use tracing::{info, warn};

use skillgenome_types::config::RebuildPolicy;
use skillgenome_types::error::{BuildProblem, BuildReport, GenomeError};
use skillgenome_types::payload::{GenerationPayload, GraphDescription};
use skillgenome_types::skill::{Dependency, Skill, SkillStatus};

use super::SkillGraph;

impl SkillGraph {
    /// Replace the graph with the one described by `payload`.
    ///
    /// - A `Failure` payload is refused with `UpstreamGeneration` before
    ///   anything is touched; the resident graph stays as it was.
    /// - A `Graph` payload with missing endpoints or cycles fails with
    ///   `Build`, listing every problem, and leaves the engine empty.
    /// - On success, progress is discarded or carried over according to the
    ///   rebuild policy.
    pub fn build_from_graph_description(
        &mut self,
        payload: impl Into<GenerationPayload>,
    ) -> Result<(), GenomeError> {
        let description = match payload.into() {
            GenerationPayload::Graph(description) => description,
            GenerationPayload::Failure(failure) => {
                warn!(error = %failure.error, "refusing to build from failed generation");
                return Err(GenomeError::UpstreamGeneration {
                    error: failure.error,
                    raw: failure.raw,
                });
            }
        };

        let GraphDescription { nodes, edges } = description;
        let skills = nodes
            .into_iter()
            .map(|node| Skill::new(node.id, node.desc, node.resources));
        let dependencies = edges
            .into_iter()
            .map(|edge| Dependency::new(edge.source, edge.target, edge.reason));

        let mut staged = SkillGraph::with_rebuild_policy(self.rebuild_policy);
        let report = staged.populate(skills, dependencies);

        if !report.is_empty() {
            self.clear();
            warn!(problems = report.problems.len(), "graph build rejected");
            return Err(GenomeError::Build(report));
        }

        if self.rebuild_policy == RebuildPolicy::PreserveProgress {
            let carried = staged.carry_progress_from(self);
            info!(carried, "completion progress carried over");
        }

        *self = staged;
        info!(
            skills = self.len(),
            dependencies = self.dependency_count(),
            "skill graph built"
        );
        Ok(())
    }

    /// Add `skills` then `dependencies` to this graph, recording every
    /// structural problem. Completed input skills keep their status.
    pub(crate) fn populate(
        &mut self,
        skills: impl IntoIterator<Item = Skill>,
        dependencies: impl IntoIterator<Item = Dependency>,
    ) -> BuildReport {
        for skill in skills {
            let completed = skill.is_completed();
            self.add_skill(skill.id.clone(), skill.description, skill.resources);
            if completed {
                if let Some(&idx) = self.index.get(&skill.id) {
                    self.graph[idx].status = SkillStatus::Completed;
                }
            }
        }

        let mut report = BuildReport::default();
        for dep in dependencies {
            let mut missing: Vec<String> = Vec::new();
            for id in [&dep.from, &dep.to] {
                if !self.contains(id) && !missing.contains(id) {
                    missing.push(id.clone());
                }
            }
            if !missing.is_empty() {
                report.push(BuildProblem::MissingEndpoint {
                    source: dep.from,
                    target: dep.to,
                    missing,
                });
                continue;
            }

            match self.add_dependency(&dep.from, &dep.to, dep.reason) {
                Ok(()) => {}
                Err(GenomeError::Cycle { cycle }) => report.push(BuildProblem::Cycle { cycle }),
                Err(GenomeError::UnknownSkill(id)) => report.push(BuildProblem::MissingEndpoint {
                    source: dep.from,
                    target: dep.to,
                    missing: vec![id],
                }),
                Err(other) => unreachable!("add_dependency only fails with UnknownSkill or Cycle: {other}"),
            }
        }

        report
    }

    /// Mark completed every skill that is completed in `previous`.
    fn carry_progress_from(&mut self, previous: &SkillGraph) -> usize {
        let completed: HashSet<&str> = previous
            .skills()
            .filter(|s| s.is_completed())
            .map(|s| s.id.as_str())
            .collect();

        let mut carried = 0;
        for idx in self.graph.node_indices() {
            let skill = &mut self.graph[idx];
            if completed.contains(skill.id.as_str()) && !skill.is_completed() {
                skill.status = SkillStatus::Completed;
                carried += 1;
            }
        }
        carried
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
