//! Mastery quiz subcommands and standalone grading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;

use skillgenome_core::quiz::{evaluate_quiz, parse_quiz_payload};
use skillgenome_core::payload::strip_code_fences;
use skillgenome_types::quiz::{ActiveQuiz, QuestionResult, QuizEvaluation};

use super::{engine_error, print_json, read_input};
use crate::state::AppState;

#[derive(Subcommand)]
pub enum QuizCommand {
    /// Start a quiz for an unlocked skill from generated questions.
    Start {
        /// Skill to assess.
        skill: String,

        /// JSON file with the generated questions (`-` for stdin).
        file: PathBuf,
    },

    /// Submit one answer per question, in order.
    Answer {
        /// Exact text of each chosen option.
        #[arg(required = true)]
        answers: Vec<String>,
    },

    /// Show the quiz in progress.
    Show,

    /// Drop the quiz in progress.
    Abandon,
}

pub async fn handle_quiz_command(cmd: QuizCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        QuizCommand::Start { skill, file } => start(state, &skill, &file, json).await,
        QuizCommand::Answer { answers } => answer(state, &answers, json).await,
        QuizCommand::Show => show(state, json).await,
        QuizCommand::Abandon => abandon(state, json).await,
    }
}

// ---------------------------------------------------------------------------
// Start / show
// ---------------------------------------------------------------------------

async fn start(state: &AppState, skill: &str, file: &Path, json: bool) -> Result<()> {
    let text = read_input(file).await?;
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(&text))
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    let questions = parse_quiz_payload(value).map_err(engine_error)?;

    let mut session = state.load_session().await?;
    let quiz = session.start_quiz(skill, questions).map_err(engine_error)?.clone();
    state.save_session(&session).await?;

    print_quiz(&quiz, json)
}

async fn show(state: &AppState, json: bool) -> Result<()> {
    let session = state.load_session().await?;
    match session.active_quiz() {
        Some(quiz) => print_quiz(quiz, json),
        None if json => print_json(&serde_json::Value::Null),
        None => {
            println!();
            println!("  No quiz in progress.");
            println!(
                "  Start one with: {}",
                style("sgen quiz start <skill> <questions.json>").dim()
            );
            println!();
            Ok(())
        }
    }
}

/// Print a quiz without revealing answers.
fn print_quiz(quiz: &ActiveQuiz, json: bool) -> Result<()> {
    if json {
        let questions: Vec<_> = quiz
            .questions
            .iter()
            .map(|q| serde_json::json!({ "question": q.question, "options": q.options }))
            .collect();
        let out = serde_json::json!({ "skill": quiz.skill, "questions": questions });
        return print_json(&out);
    }

    println!();
    println!(
        "  {} Quiz: {} ({} questions)",
        style("?").yellow().bold(),
        style(&quiz.skill).cyan(),
        quiz.questions.len()
    );
    for (i, q) in quiz.questions.iter().enumerate() {
        println!();
        println!("  {}. {}", i + 1, style(&q.question).bold());
        for option in &q.options {
            println!("     - {option}");
        }
    }
    println!();
    println!(
        "  Answer with: {}",
        style("sgen quiz answer \"<option 1>\" \"<option 2>\" ...").dim()
    );
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Answer / abandon
// ---------------------------------------------------------------------------

async fn answer(state: &AppState, answers: &[String], json: bool) -> Result<()> {
    let mut session = state.load_session().await?;
    let skill = session
        .active_quiz()
        .map(|q| q.skill.clone())
        .unwrap_or_default();
    let evaluation = session.submit_answers(answers).map_err(engine_error)?;
    state.save_session(&session).await?;

    if json {
        let out = serde_json::json!({
            "skill": skill,
            "evaluation": evaluation,
            "frontier": session.graph().frontier(),
        });
        return print_json(&out);
    }

    print_evaluation(&evaluation);
    if evaluation.passed {
        println!(
            "  {} '{}' completed",
            style("*").green().bold(),
            style(&skill).cyan()
        );
        let frontier = session.graph().frontier();
        if !frontier.is_empty() {
            println!("  Next up: {}", style(frontier.join(", ")).yellow());
        }
    } else {
        println!(
            "  The quiz stays open; retry with {}",
            style("sgen quiz answer ...").dim()
        );
    }
    println!();
    Ok(())
}

async fn abandon(state: &AppState, json: bool) -> Result<()> {
    let mut session = state.load_session().await?;
    let dropped = session.abandon_quiz();
    state.save_session(&session).await?;

    let skill = dropped.map(|q| q.skill);
    if json {
        return print_json(&serde_json::json!({ "abandoned": skill }));
    }
    println!();
    match skill {
        Some(skill) => println!("  Abandoned quiz for '{}'", style(skill).cyan()),
        None => println!("  No quiz in progress."),
    }
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Grade
// ---------------------------------------------------------------------------

/// Grade a file of already-answered questions, optionally recording the
/// outcome against a skill.
pub async fn grade(state: &AppState, file: &Path, skill: Option<&str>, json: bool) -> Result<()> {
    let text = read_input(file).await?;
    let results: Vec<QuestionResult> = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a list of graded answers", file.display()))?;
    let evaluation = evaluate_quiz(&results, &state.config.grading);

    let mut recorded = false;
    if let Some(skill) = skill {
        let mut session = state.load_session().await?;
        recorded = session
            .graph_mut()
            .record_assessment(skill, &evaluation)
            .map_err(engine_error)?;
        if recorded {
            state.save_session(&session).await?;
        }
    }

    if json {
        let out = serde_json::json!({
            "evaluation": evaluation,
            "skill": skill,
            "completed": recorded,
        });
        return print_json(&out);
    }

    print_evaluation(&evaluation);
    if recorded {
        if let Some(skill) = skill {
            println!("  {} '{}' completed", style("*").green().bold(), style(skill).cyan());
            println!();
        }
    }
    Ok(())
}

fn print_evaluation(evaluation: &QuizEvaluation) {
    let verdict = if evaluation.passed {
        style("PASS").green().bold()
    } else {
        style("FAIL").red().bold()
    };
    println!();
    println!(
        "  {verdict}  {}/{}  {}",
        evaluation.score, evaluation.total, evaluation.feedback
    );
    if !evaluation.failed_concepts.is_empty() {
        println!();
        println!("  {}", style("Review:").bold());
        for concept in &evaluation.failed_concepts {
            println!("  - {concept}");
        }
    }
    println!();
}
