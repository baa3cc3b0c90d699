//! A learner's session: one target role, one skill graph, at most one quiz.
//!
//! The host owns one `LearningSession` per learner and passes it to each
//! request handler. Nothing here is global or shared; hosts that serve several
//! learners keep one session per learner and serialize access themselves.

use tracing::{info, warn};

use skillgenome_types::config::GenomeConfig;
use skillgenome_types::error::GenomeError;
use skillgenome_types::payload::GenerationPayload;
use skillgenome_types::quiz::{ActiveQuiz, QuizEvaluation, QuizQuestion};
use skillgenome_types::snapshot::SessionRecord;

use crate::graph::SkillGraph;
use crate::quiz::{evaluate_quiz, grade_answers};

#[derive(Debug, Clone)]
pub struct LearningSession {
    role: String,
    graph: SkillGraph,
    config: GenomeConfig,
    active_quiz: Option<ActiveQuiz>,
}

impl LearningSession {
    pub fn new(role: impl Into<String>, config: GenomeConfig) -> Self {
        Self {
            role: role.into(),
            graph: SkillGraph::with_rebuild_policy(config.graph.rebuild_policy),
            config,
            active_quiz: None,
        }
    }

    pub fn role(&self) -> &str {
        &self.role
    }

    pub fn set_role(&mut self, role: impl Into<String>) {
        self.role = role.into();
    }

    pub fn graph(&self) -> &SkillGraph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut SkillGraph {
        &mut self.graph
    }

    pub fn config(&self) -> &GenomeConfig {
        &self.config
    }

    pub fn active_quiz(&self) -> Option<&ActiveQuiz> {
        self.active_quiz.as_ref()
    }

    /// Rebuild the graph from a fresh generation payload.
    ///
    /// An upstream failure leaves the session untouched. Any other outcome
    /// replaces the graph (possibly with an empty one) and drops the quiz.
    pub fn regenerate(&mut self, payload: impl Into<GenerationPayload>) -> Result<(), GenomeError> {
        let result = self.graph.build_from_graph_description(payload);
        if !matches!(result, Err(GenomeError::UpstreamGeneration { .. })) {
            self.active_quiz = None;
        }
        result
    }

    /// Hand a quiz for `skill` to the learner.
    ///
    /// The skill must exist and be unlocked, and the quiz must have at least
    /// one question. Replaces any quiz already in progress.
    pub fn start_quiz(
        &mut self,
        skill: &str,
        questions: Vec<QuizQuestion>,
    ) -> Result<&ActiveQuiz, GenomeError> {
        self.graph.ensure_unlocked(skill)?;
        if questions.is_empty() {
            return Err(GenomeError::MalformedPayload(format!(
                "quiz for '{skill}' has no questions"
            )));
        }
        info!(skill, questions = questions.len(), "quiz started");
        Ok(self.active_quiz.insert(ActiveQuiz {
            skill: skill.to_string(),
            questions,
        }))
    }

    /// Grade the learner's answers to the active quiz.
    ///
    /// A pass completes the skill and closes the quiz; a fail keeps the quiz
    /// open for another attempt.
    pub fn submit_answers(&mut self, answers: &[String]) -> Result<QuizEvaluation, GenomeError> {
        let quiz = self.active_quiz.as_ref().ok_or(GenomeError::NoActiveQuiz)?;
        let results = grade_answers(&quiz.questions, answers)?;
        let evaluation = evaluate_quiz(&results, &self.config.grading);
        let skill = quiz.skill.clone();

        self.graph.record_assessment(&skill, &evaluation)?;
        info!(
            skill = %skill,
            score = evaluation.score,
            total = evaluation.total,
            passed = evaluation.passed,
            "quiz graded"
        );
        if evaluation.passed {
            self.active_quiz = None;
        }
        Ok(evaluation)
    }

    pub fn abandon_quiz(&mut self) -> Option<ActiveQuiz> {
        self.active_quiz.take()
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            role: self.role.clone(),
            snapshot: self.graph.to_snapshot(),
            active_quiz: self.active_quiz.clone(),
        }
    }

    /// Restore a session from a record, validating its graph.
    ///
    /// A quiz for a skill that no longer exists is dropped.
    pub fn restore(record: SessionRecord, config: GenomeConfig) -> Result<Self, GenomeError> {
        let graph =
            SkillGraph::from_snapshot_with_policy(record.snapshot, config.graph.rebuild_policy)?;
        let active_quiz = match record.active_quiz {
            Some(quiz) if graph.contains(&quiz.skill) => Some(quiz),
            Some(quiz) => {
                warn!(skill = %quiz.skill, "dropping quiz for unknown skill");
                None
            }
            None => None,
        };
        Ok(Self {
            role: record.role,
            graph,
            config,
            active_quiz,
        })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use skillgenome_types::config::RebuildPolicy;
    use skillgenome_types::payload::{EdgeSpec, GenerationFailure, GraphDescription, NodeSpec};

    fn chain() -> GraphDescription {
        GraphDescription {
            nodes: vec![NodeSpec::new("A"), NodeSpec::new("B")],
            edges: vec![EdgeSpec::new("A", "B")],
        }
    }

    fn questions(n: usize) -> Vec<QuizQuestion> {
        (0..n)
            .map(|i| QuizQuestion {
                question: format!("Q{i}"),
                options: vec!["right".into(), "wrong".into()],
                correct_answer: "right".into(),
                explanation: None,
            })
            .collect()
    }

    fn answers(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    fn session() -> LearningSession {
        let mut session = LearningSession::new("Backend Engineer", GenomeConfig::default());
        session.regenerate(chain()).unwrap();
        session
    }

    #[test]
    fn test_quiz_pass_completes_skill() {
        let mut s = session();
        s.start_quiz("A", questions(3)).unwrap();
        let eval = s.submit_answers(&answers(&["right", "right", "right"])).unwrap();
        assert!(eval.passed);
        assert!(s.graph().skill("A").unwrap().is_completed());
        assert!(s.active_quiz().is_none(), "passed quiz is closed");
    }

    #[test]
    fn test_quiz_fail_keeps_quiz_open() {
        let mut s = session();
        s.start_quiz("A", questions(3)).unwrap();
        let eval = s.submit_answers(&answers(&["right", "wrong", "right"])).unwrap();
        assert!(!eval.passed);
        assert_eq!(eval.failed_concepts, vec!["Q1"]);
        assert!(!s.graph().skill("A").unwrap().is_completed());
        assert!(s.active_quiz().is_some(), "failed quiz stays open for retry");
    }

    #[test]
    fn test_quiz_blocked_skill_rejected() {
        let mut s = session();
        let err = s.start_quiz("B", questions(1)).unwrap_err();
        assert_eq!(err.kind(), "blocked");
        assert!(s.active_quiz().is_none());
    }

    #[test]
    fn test_quiz_requires_questions() {
        let mut s = session();
        assert!(s.start_quiz("A", vec![]).is_err());
        assert!(s.start_quiz("Z", questions(1)).is_err());
    }

    #[test]
    fn test_submit_without_quiz() {
        let mut s = session();
        let err = s.submit_answers(&answers(&["right"])).unwrap_err();
        assert!(matches!(err, GenomeError::NoActiveQuiz));
    }

    #[test]
    fn test_submit_wrong_answer_count() {
        let mut s = session();
        s.start_quiz("A", questions(2)).unwrap();
        let err = s.submit_answers(&answers(&["right"])).unwrap_err();
        assert!(matches!(
            err,
            GenomeError::AnswerCountMismatch {
                expected: 2,
                actual: 1
            }
        ));
        assert!(s.active_quiz().is_some());
    }

    #[test]
    fn test_regenerate_drops_quiz_unless_upstream_failure() {
        let mut s = session();
        s.start_quiz("A", questions(1)).unwrap();

        let err = s
            .regenerate(GenerationFailure {
                error: "quota".into(),
                raw: None,
            })
            .unwrap_err();
        assert_eq!(err.kind(), "upstream_generation");
        assert!(s.active_quiz().is_some());
        assert_eq!(s.graph().len(), 2);

        s.regenerate(chain()).unwrap();
        assert!(s.active_quiz().is_none());
    }

    #[test]
    fn test_record_restore_round_trip() {
        let mut s = session();
        s.graph_mut().mark_completed("A").unwrap();
        s.start_quiz("B", questions(2)).unwrap();

        let restored = LearningSession::restore(s.record(), GenomeConfig::default()).unwrap();
        assert_eq!(restored.role(), "Backend Engineer");
        assert!(restored.graph().skill("A").unwrap().is_completed());
        assert_eq!(restored.active_quiz().unwrap().skill, "B");
    }

    #[test]
    fn test_restore_drops_orphan_quiz() {
        let mut record = session().record();
        record.active_quiz = Some(ActiveQuiz {
            skill: "Gone".into(),
            questions: questions(1),
        });
        let restored = LearningSession::restore(record, GenomeConfig::default()).unwrap();
        assert!(restored.active_quiz().is_none());
    }

    #[test]
    fn test_session_uses_configured_policy() {
        let mut config = GenomeConfig::default();
        config.graph.rebuild_policy = RebuildPolicy::PreserveProgress;
        let mut s = LearningSession::new("Data Engineer", config);
        s.regenerate(chain()).unwrap();
        s.graph_mut().mark_completed("A").unwrap();
        s.regenerate(chain()).unwrap();
        assert!(s.graph().skill("A").unwrap().is_completed());
    }
}
