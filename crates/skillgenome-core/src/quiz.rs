//! Mastery-check grading and quiz payload interpretation.

use serde_json::Value;

use skillgenome_types::config::GradingConfig;
use skillgenome_types::error::GenomeError;
use skillgenome_types::quiz::{QuestionResult, QuizEvaluation, QuizQuestion};

use crate::payload::json_type_name;

/// Grade a list of answered questions.
///
/// A quiz passes when `score / total >= pass_threshold`; an empty quiz never
/// passes.
pub fn evaluate_quiz(results: &[QuestionResult], config: &GradingConfig) -> QuizEvaluation {
    let total = results.len() as u32;
    let failed_concepts: Vec<String> = results
        .iter()
        .filter(|r| !r.is_correct())
        .map(|r| r.question.clone())
        .collect();
    let score = total - failed_concepts.len() as u32;

    let passed = total > 0 && f64::from(score) / f64::from(total) >= config.pass_threshold;
    let feedback = if passed {
        config.pass_feedback.clone()
    } else {
        config.fail_feedback.clone()
    };

    QuizEvaluation {
        score,
        total,
        passed,
        failed_concepts,
        feedback,
    }
}

/// Pair generated questions with the learner's answers, in order.
pub fn grade_answers(
    questions: &[QuizQuestion],
    answers: &[String],
) -> Result<Vec<QuestionResult>, GenomeError> {
    if questions.len() != answers.len() {
        return Err(GenomeError::AnswerCountMismatch {
            expected: questions.len(),
            actual: answers.len(),
        });
    }
    Ok(questions
        .iter()
        .zip(answers)
        .map(|(q, a)| QuestionResult::new(q.question.clone(), a.clone(), q.correct_answer.clone()))
        .collect())
}

/// Interpret a generated quiz.
///
/// Accepts a list of questions or an object holding one under `questions`.
/// An `error` object is an upstream failure; every other shape is malformed.
pub fn parse_quiz_payload(value: Value) -> Result<Vec<QuizQuestion>, GenomeError> {
    let list = match value {
        Value::Array(items) => Value::Array(items),
        Value::Object(mut map) => {
            if let Some(error) = map.remove("error") {
                let raw = map.remove("raw").and_then(|r| r.as_str().map(String::from));
                let error = error
                    .as_str()
                    .map(String::from)
                    .unwrap_or_else(|| error.to_string());
                return Err(GenomeError::UpstreamGeneration { error, raw });
            }
            match map.remove("questions") {
                Some(questions @ Value::Array(_)) => questions,
                _ => {
                    return Err(GenomeError::MalformedPayload(
                        "expected a question list or a 'questions' key".to_string(),
                    ));
                }
            }
        }
        other => {
            return Err(GenomeError::MalformedPayload(format!(
                "expected a question list, got {}",
                json_type_name(&other)
            )));
        }
    };

    serde_json::from_value(list)
        .map_err(|e| GenomeError::MalformedPayload(format!("invalid quiz question: {e}")))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
