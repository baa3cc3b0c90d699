//! Lossless conversion between `SkillGraph` and `GraphSnapshot`.
//!
//! Restoring a snapshot goes through the same validation as a build, so a
//! tampered or truncated snapshot cannot smuggle in dangling edges or cycles.

use skillgenome_types::config::RebuildPolicy;
use skillgenome_types::error::GenomeError;
use skillgenome_types::snapshot::{GraphSnapshot, SnapshotLink};

use super::SkillGraph;

impl SkillGraph {
    /// Capture every skill, edge, and status.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        GraphSnapshot {
            nodes: self.skills().cloned().collect(),
            links: self.dependencies().map(SnapshotLink::from).collect(),
        }
    }

    /// Rebuild a graph from a snapshot, restoring statuses.
    ///
    /// Fails with `Build` listing every dangling link and cycle.
    pub fn from_snapshot(snapshot: GraphSnapshot) -> Result<Self, GenomeError> {
        Self::from_snapshot_with_policy(snapshot, RebuildPolicy::default())
    }

    pub fn from_snapshot_with_policy(
        snapshot: GraphSnapshot,
        policy: RebuildPolicy,
    ) -> Result<Self, GenomeError> {
        let mut graph = SkillGraph::with_rebuild_policy(policy);
        let report = graph.populate(snapshot.nodes, snapshot.links.into_iter().map(Into::into));
        if report.is_empty() {
            Ok(graph)
        } else {
            Err(GenomeError::Build(report))
        }
    }

    /// Serialize to the JSON snapshot format.
    pub fn serialize(&self) -> Result<String, GenomeError> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| GenomeError::MalformedPayload(e.to_string()))
    }

    /// Parse a JSON snapshot produced by `serialize`.
    pub fn deserialize(blob: &str) -> Result<Self, GenomeError> {
        let snapshot: GraphSnapshot = serde_json::from_str(blob)
            .map_err(|e| GenomeError::MalformedPayload(format!("invalid snapshot: {e}")))?;
        Self::from_snapshot(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skillgenome_types::skill::{Skill, SkillStatus};

    fn sample() -> SkillGraph {
        let mut g = SkillGraph::new();
        g.add_skill("HTML", "Markup", vec!["https://developer.mozilla.org".to_string()]);
        g.add_skill("CSS", "Styling", vec![]);
        g.add_skill("JavaScript", "", vec!["a".to_string(), "b".to_string()]);
        g.add_dependency("HTML", "CSS", "style what you mark up").unwrap();
        g.add_dependency("HTML", "JavaScript", "").unwrap();
        g.mark_completed("HTML").unwrap();
        g
    }

    #[test]
    fn test_round_trip_preserves_everything() {
        let g = sample();
        let restored = SkillGraph::deserialize(&g.serialize().unwrap()).unwrap();

        assert_eq!(restored.len(), g.len());
        for skill in g.skills() {
            assert_eq!(restored.skill(&skill.id), Some(skill), "skill {} differs", skill.id);
        }
        let mut before: Vec<_> = g.dependencies().map(|d| (d.from, d.to, d.reason)).collect();
        let mut after: Vec<_> = restored
            .dependencies()
            .map(|d| (d.from, d.to, d.reason))
            .collect();
        before.sort();
        after.sort();
        assert_eq!(before, after);
    }

    #[test]
    fn test_snapshot_shape() {
        let snapshot = sample().to_snapshot();
        assert_eq!(snapshot.nodes.len(), 3);
        assert_eq!(snapshot.links.len(), 2);
        assert_eq!(snapshot.nodes[0].status, SkillStatus::Completed);
        assert_eq!(snapshot.links[0].reason, "style what you mark up");
    }

    #[test]
    fn test_empty_round_trip() {
        let g = SkillGraph::new();
        let restored = SkillGraph::deserialize(&g.serialize().unwrap()).unwrap();
        assert!(restored.is_empty());
    }

    #[test]
    fn test_restore_rejects_dangling_link() {
        let snapshot = GraphSnapshot {
            nodes: vec![Skill::new("A", "", vec![])],
            links: vec![SnapshotLink {
                source: "A".into(),
                target: "B".into(),
                reason: String::new(),
            }],
        };
        let err = SkillGraph::from_snapshot(snapshot).unwrap_err();
        assert_eq!(err.kind(), "build");
        assert!(err.to_string().contains("unknown skill(s): B"), "got: {err}");
    }

    #[test]
    fn test_deserialize_invalid_json() {
        let err = SkillGraph::deserialize("{not json").unwrap_err();
        assert_eq!(err.kind(), "malformed_payload");
    }

    #[test]
    fn test_from_snapshot_with_policy() {
        let g = SkillGraph::from_snapshot_with_policy(
            sample().to_snapshot(),
            RebuildPolicy::PreserveProgress,
        )
        .unwrap();
        assert_eq!(g.rebuild_policy(), RebuildPolicy::PreserveProgress);
        assert!(g.skill("HTML").unwrap().is_completed());
    }
}
