//! CLI command definitions and dispatch for the `sgen` binary.
//!
//! Every command operates on one named learning session (`--session`,
//! default `default`) stored under the data directory.

pub mod graph;
pub mod quiz;
pub mod session;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use console::style;

use skillgenome_types::error::GenomeError;
use skillgenome_types::skill::SkillView;

use crate::state::AppState;

/// Map the skills a role needs, in order, and prove mastery one quiz at a time.
#[derive(Parser)]
#[command(name = "sgen", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Learning session to operate on.
    #[arg(long, global = true, env = "SKILLGENOME_SESSION", default_value = "default")]
    pub session: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the skill graph from generated output (a JSON file, `-` for stdin).
    Build {
        /// Path to the generation output.
        file: PathBuf,

        /// Target role the graph was generated for.
        #[arg(long)]
        role: Option<String>,
    },

    /// Show every skill with its status and prerequisites.
    Show,

    /// List the direct prerequisites of a skill.
    Prereqs {
        skill: String,
    },

    /// List every transitive prerequisite of a skill.
    Ancestors {
        skill: String,
    },

    /// List the unfinished direct prerequisites of a skill.
    Blockers {
        skill: String,
    },

    /// Show the longest prerequisite chain.
    Path,

    /// Show skills grouped into learning stages.
    Stages,

    /// Mark a skill as completed without a quiz.
    Complete {
        skill: String,

        /// Complete even if prerequisites are unfinished.
        #[arg(long)]
        force: bool,
    },

    /// Take a mastery quiz (start, answer, show, abandon).
    Quiz {
        #[command(subcommand)]
        action: quiz::QuizCommand,
    },

    /// Grade a file of answered questions.
    Grade {
        /// JSON list of `{question, user_answer, correct_answer}`.
        file: PathBuf,

        /// Record the outcome against this skill.
        #[arg(long)]
        skill: Option<String>,
    },

    /// Print the graph snapshot as JSON.
    Export {
        /// Write to a file instead of stdout.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Replace the graph with a snapshot file.
    Import {
        file: PathBuf,
    },

    /// Print the JSON Schema for generation output.
    Schema,

    /// Manage stored sessions (list, delete).
    Sessions {
        #[command(subcommand)]
        action: Option<session::SessionCommand>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Route a parsed command to its handler.
pub async fn dispatch(command: Commands, state: &AppState, json: bool) -> anyhow::Result<()> {
    match command {
        Commands::Build { file, role } => graph::build(state, &file, role, json).await,
        Commands::Show => graph::show(state, json).await,
        Commands::Prereqs { skill } => graph::prereqs(state, &skill, json).await,
        Commands::Ancestors { skill } => graph::ancestors(state, &skill, json).await,
        Commands::Blockers { skill } => graph::blockers(state, &skill, json).await,
        Commands::Path => graph::critical_path(state, json).await,
        Commands::Stages => graph::stages(state, json).await,
        Commands::Complete { skill, force } => graph::complete(state, &skill, force, json).await,
        Commands::Quiz { action } => quiz::handle_quiz_command(action, state, json).await,
        Commands::Grade { file, skill } => quiz::grade(state, &file, skill.as_deref(), json).await,
        Commands::Export { output } => graph::export(state, output.as_deref()).await,
        Commands::Import { file } => graph::import(state, &file, json).await,
        Commands::Schema => graph::schema(),
        Commands::Sessions { action } => session::handle_session_command(action, state, json).await,
        Commands::Completions { .. } => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Read an input file, or stdin when the path is `-`.
pub async fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.as_os_str() == "-" {
        use tokio::io::AsyncReadExt;
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read stdin")?;
        return Ok(buf);
    }
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))
}

/// Convert an engine error, appending any raw upstream text.
pub fn engine_error(err: GenomeError) -> anyhow::Error {
    match err.raw() {
        Some(raw) => anyhow::anyhow!("{err}\n\nRaw output:\n{raw}"),
        None => anyhow::Error::new(err),
    }
}

pub fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn styled_view(view: SkillView) -> String {
    match view {
        SkillView::Completed => format!("{}", style("completed").green()),
        SkillView::Current => format!("{}", style("current").yellow().bold()),
        SkillView::Blocked => format!("{}", style("blocked").dim()),
    }
}

pub fn print_list(title: &str, items: &[String]) {
    println!();
    println!("  {}", style(title).bold());
    if items.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for item in items {
        println!("  - {}", style(item).cyan());
    }
    println!();
}
