//! Graph-construction payloads produced by the generation collaborator.
//!
//! The collaborator answers with exactly one of two shapes:
//!
//! ```json
//! { "nodes": [{ "id": "...", "desc": "...", "resources": ["..."] }],
//!   "edges": [{ "source": "...", "target": "...", "reason": "..." }] }
//! ```
//!
//! or, when it could not produce structured output:
//!
//! ```json
//! { "error": "...", "raw": "..." }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A successful graph description: skills plus prerequisite edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GraphDescription {
    /// Skills, added in order. A repeated id overwrites the earlier entry.
    pub nodes: Vec<NodeSpec>,
    /// Prerequisite edges, added in order after all nodes.
    #[serde(default)]
    pub edges: Vec<EdgeSpec>,
}

/// One skill in a graph description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NodeSpec {
    /// Unique skill name (e.g. "Python Basics").
    pub id: String,
    /// Why the skill is needed for the role.
    #[serde(default, alias = "description")]
    pub desc: String,
    /// Learning resource URLs.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl NodeSpec {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            desc: String::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn with_resources(mut self, resources: Vec<String>) -> Self {
        self.resources = resources;
        self
    }
}

/// One prerequisite edge in a graph description: `source` before `target`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EdgeSpec {
    /// The prerequisite skill id.
    pub source: String,
    /// The dependent skill id.
    pub target: String,
    /// Why `source` must come first.
    #[serde(default)]
    pub reason: String,
}

impl EdgeSpec {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            reason: String::new(),
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = reason.into();
        self
    }
}

/// The collaborator reported a failure instead of a graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationFailure {
    pub error: String,
    /// Unparsed upstream text, kept for diagnosis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// The two recognized payload shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationPayload {
    Graph(GraphDescription),
    Failure(GenerationFailure),
}

impl From<GraphDescription> for GenerationPayload {
    fn from(description: GraphDescription) -> Self {
        GenerationPayload::Graph(description)
    }
}

impl From<GenerationFailure> for GenerationPayload {
    fn from(failure: GenerationFailure) -> Self {
        GenerationPayload::Failure(failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_optional_fields_default() {
        let json = r#"{"nodes": [{"id": "A"}], "edges": [{"source": "A", "target": "B"}]}"#;
        let desc: GraphDescription = serde_json::from_str(json).unwrap();
        assert_eq!(desc.nodes[0], NodeSpec::new("A"));
        assert_eq!(desc.edges[0], EdgeSpec::new("A", "B"));
    }

    #[test]
    fn test_description_edges_default_empty() {
        let desc: GraphDescription = serde_json::from_str(r#"{"nodes": []}"#).unwrap();
        assert!(desc.edges.is_empty());
    }

    #[test]
    fn test_node_accepts_description_alias() {
        let node: NodeSpec =
            serde_json::from_str(r#"{"id": "SQL", "description": "Query data"}"#).unwrap();
        assert_eq!(node.desc, "Query data");
    }

    #[test]
    fn test_failure_omits_missing_raw() {
        let failure = GenerationFailure {
            error: "quota exceeded".to_string(),
            raw: None,
        };
        let json = serde_json::to_string(&failure).unwrap();
        assert_eq!(json, r#"{"error":"quota exceeded"}"#);
    }
}
