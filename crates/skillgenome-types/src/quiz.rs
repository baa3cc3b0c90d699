//! Mastery-check (quiz) types.

use serde::{Deserialize, Serialize};

/// A multiple-choice question generated for one skill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    #[serde(default)]
    pub options: Vec<String>,
    /// Exact text of the correct option.
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A quiz handed to the learner and not yet passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveQuiz {
    /// The skill being assessed.
    pub skill: String,
    pub questions: Vec<QuizQuestion>,
}

/// One graded answer, as handed over by the quiz collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionResult {
    pub question: String,
    pub user_answer: String,
    pub correct_answer: String,
}

impl QuestionResult {
    pub fn new(
        question: impl Into<String>,
        user_answer: impl Into<String>,
        correct_answer: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            user_answer: user_answer.into(),
            correct_answer: correct_answer.into(),
        }
    }

    /// Answers must match exactly.
    pub fn is_correct(&self) -> bool {
        self.user_answer == self.correct_answer
    }
}

/// Outcome of grading a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizEvaluation {
    pub score: u32,
    pub total: u32,
    pub passed: bool,
    /// Question texts that were answered incorrectly, in quiz order.
    pub failed_concepts: Vec<String>,
    pub feedback: String,
}
