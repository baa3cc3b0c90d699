//! Skill graph node and edge types.
//!
//! A `Skill` is keyed by its `id` (the skill name). A `Dependency` is keyed by
//! its endpoint ids, so overwriting a skill never disturbs its edges.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// A single node of the skill graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skill {
    /// Unique skill name, stable for the lifetime of the graph.
    pub id: String,
    /// Why the skill matters for the target role. May be empty.
    #[serde(default)]
    pub description: String,
    /// Learning resources (URLs or references), in the order given.
    #[serde(default)]
    pub resources: Vec<String>,
    /// Persisted mastery state.
    #[serde(default)]
    pub status: SkillStatus,
}

impl Skill {
    /// Create a pending skill.
    pub fn new(id: impl Into<String>, description: impl Into<String>, resources: Vec<String>) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            resources,
            status: SkillStatus::Pending,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == SkillStatus::Completed
    }
}

/// Persisted mastery state of a skill.
///
/// Transitions only move forward: `Pending -> Completed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillStatus {
    #[default]
    Pending,
    Completed,
}

impl fmt::Display for SkillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillStatus::Pending => write!(f, "pending"),
            SkillStatus::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for SkillStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(SkillStatus::Pending),
            "completed" => Ok(SkillStatus::Completed),
            other => Err(format!("invalid skill status: '{other}'")),
        }
    }
}

/// Presentation view of a skill, derived on demand from the graph.
///
/// Never persisted: `Current` and `Blocked` are recomputed from prerequisite
/// statuses every time they are asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillView {
    /// Mastered.
    Completed,
    /// Pending with every prerequisite completed; may be attempted now.
    Current,
    /// Pending with at least one unfinished prerequisite.
    Blocked,
}

impl fmt::Display for SkillView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkillView::Completed => write!(f, "completed"),
            SkillView::Current => write!(f, "current"),
            SkillView::Blocked => write!(f, "blocked"),
        }
    }
}

/// A directed prerequisite edge: `from` must be mastered before `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub from: String,
    pub to: String,
    /// Free-text explanation of the dependency. May be empty.
    #[serde(default)]
    pub reason: String,
}

impl Dependency {
    pub fn new(from: impl Into<String>, to: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            reason: reason.into(),
        }
    }
}

/// Completion counts across the whole graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Fraction of skills completed, `0.0` for an empty graph.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }
}
