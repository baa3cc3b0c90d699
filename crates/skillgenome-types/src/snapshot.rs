//! Serialized graph snapshot exchanged with UI and persistence collaborators.
//!
//! ```json
//! { "nodes": [{ "id": "...", "description": "...", "resources": [], "status": "pending" }],
//!   "links": [{ "source": "...", "target": "...", "reason": "..." }] }
//! ```

use serde::{Deserialize, Serialize};

use crate::quiz::ActiveQuiz;
use crate::skill::{Dependency, Skill};

/// Full node/edge/status state of a skill graph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub nodes: Vec<Skill>,
    /// Node-link documents from older writers call this list `edges`.
    #[serde(default, alias = "edges")]
    pub links: Vec<SnapshotLink>,
}

impl GraphSnapshot {
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// A prerequisite edge in snapshot form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotLink {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub reason: String,
}

impl From<Dependency> for SnapshotLink {
    fn from(dep: Dependency) -> Self {
        Self {
            source: dep.from,
            target: dep.to,
            reason: dep.reason,
        }
    }
}

impl From<SnapshotLink> for Dependency {
    fn from(link: SnapshotLink) -> Self {
        Dependency {
            from: link.source,
            to: link.target,
            reason: link.reason,
        }
    }
}

/// A persisted learning session: the target role, its graph, and any quiz
/// still in progress.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub snapshot: GraphSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_quiz: Option<ActiveQuiz>,
}
