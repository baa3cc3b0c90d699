use std::fmt;

use thiserror::Error;

/// Errors raised by the skill graph engine, payload interpretation, and
/// assessment flow.
#[derive(Debug, Error)]
pub enum GenomeError {
    /// The upstream payload is not one of the recognized shapes.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),

    /// An operation referenced a skill id that does not exist.
    #[error("unknown skill: '{0}'")]
    UnknownSkill(String),

    /// Adding an edge would close a directed cycle.
    #[error("dependency would create a cycle: {}", .cycle.join(" -> "))]
    Cycle { cycle: Vec<String> },

    /// The generation collaborator reported an error instead of a payload.
    #[error("upstream generation failed: {error}")]
    UpstreamGeneration { error: String, raw: Option<String> },

    /// A build found structural problems; the engine was reset to empty.
    #[error("{0}")]
    Build(BuildReport),

    /// The skill still has unfinished prerequisites.
    #[error("skill '{skill}' is blocked by: {}", .blockers.join(", "))]
    Blocked { skill: String, blockers: Vec<String> },

    /// An answer was submitted while no quiz was in progress.
    #[error("no quiz in progress")]
    NoActiveQuiz,

    /// The number of submitted answers does not match the quiz.
    #[error("expected {expected} answers, got {actual}")]
    AnswerCountMismatch { expected: usize, actual: usize },
}

impl GenomeError {
    /// Stable machine-readable label for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            GenomeError::MalformedPayload(_) => "malformed_payload",
            GenomeError::UnknownSkill(_) => "unknown_skill",
            GenomeError::Cycle { .. } => "cycle",
            GenomeError::UpstreamGeneration { .. } => "upstream_generation",
            GenomeError::Build(_) => "build",
            GenomeError::Blocked { .. } => "blocked",
            GenomeError::NoActiveQuiz => "no_active_quiz",
            GenomeError::AnswerCountMismatch { .. } => "answer_count_mismatch",
        }
    }

    /// Raw upstream text preserved for diagnosis, if any.
    pub fn raw(&self) -> Option<&str> {
        match self {
            GenomeError::UpstreamGeneration { raw, .. } => raw.as_deref(),
            _ => None,
        }
    }
}

/// Every structural problem found while building a graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub problems: Vec<BuildProblem>,
}

impl BuildReport {
    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }

    pub fn push(&mut self, problem: BuildProblem) {
        self.problems.push(problem);
    }

    pub fn has_cycle(&self) -> bool {
        self.problems
            .iter()
            .any(|p| matches!(p, BuildProblem::Cycle { .. }))
    }

    pub fn missing_ids(&self) -> Vec<&str> {
        self.problems
            .iter()
            .flat_map(|p| match p {
                BuildProblem::MissingEndpoint { missing, .. } => {
                    missing.iter().map(String::as_str).collect::<Vec<_>>()
                }
                BuildProblem::Cycle { .. } => Vec::new(),
            })
            .collect()
    }
}

impl fmt::Display for BuildReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "graph build failed with {} problem(s)", self.problems.len())?;
        for problem in &self.problems {
            write!(f, "\n  - {problem}")?;
        }
        Ok(())
    }
}

/// A single structural problem in a build payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildProblem {
    /// An edge references one or both endpoints that are not skills.
    MissingEndpoint {
        source: String,
        target: String,
        missing: Vec<String>,
    },
    /// An edge would close this cycle (first and last element are equal).
    Cycle { cycle: Vec<String> },
}

impl fmt::Display for BuildProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildProblem::MissingEndpoint {
                source,
                target,
                missing,
            } => write!(
                f,
                "edge '{source}' -> '{target}' references unknown skill(s): {}",
                missing.join(", ")
            ),
            BuildProblem::Cycle { cycle } => write!(f, "cycle: {}", cycle.join(" -> ")),
        }
    }
}

/// Errors from snapshot repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("invalid session name: '{0}'")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(String),
}
