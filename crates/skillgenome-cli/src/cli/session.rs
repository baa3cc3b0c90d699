//! Stored session management.

use anyhow::{Result, bail};
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde::Serialize;

use skillgenome_core::repository::SnapshotRepository;
use skillgenome_types::skill::{Progress, SkillStatus};

use super::print_json;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum SessionCommand {
    /// List stored sessions (default).
    List,

    /// Delete a stored session.
    Delete {
        name: String,
    },
}

#[derive(Debug, Serialize)]
struct SessionSummary {
    name: String,
    role: String,
    progress: Progress,
    quiz: Option<String>,
}

pub async fn handle_session_command(
    cmd: Option<SessionCommand>,
    state: &AppState,
    json: bool,
) -> Result<()> {
    match cmd.unwrap_or(SessionCommand::List) {
        SessionCommand::List => list(state, json).await,
        SessionCommand::Delete { name } => delete(state, &name, json).await,
    }
}

async fn list(state: &AppState, json: bool) -> Result<()> {
    let mut summaries = Vec::new();
    for name in state.repo.list().await? {
        // Reads the raw record so a session that no longer validates still lists.
        let Some(record) = state.repo.load(&name).await? else {
            continue;
        };
        let nodes = &record.snapshot.nodes;
        summaries.push(SessionSummary {
            progress: Progress {
                completed: nodes
                    .iter()
                    .filter(|n| n.status == SkillStatus::Completed)
                    .count(),
                total: nodes.len(),
            },
            role: record.role,
            quiz: record.active_quiz.map(|q| q.skill),
            name,
        });
    }

    if json {
        return print_json(&summaries);
    }

    if summaries.is_empty() {
        println!();
        println!("  No sessions stored in {}", state.data_dir.display());
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Session").fg(Color::Cyan),
            Cell::new("Role"),
            Cell::new("Progress"),
            Cell::new("Quiz"),
        ]);
    for s in &summaries {
        let name = if s.name == state.session_name {
            Cell::new(format!("{} *", s.name)).fg(Color::Green)
        } else {
            Cell::new(&s.name)
        };
        table.add_row(vec![
            name,
            Cell::new(&s.role),
            Cell::new(format!("{}/{}", s.progress.completed, s.progress.total)),
            Cell::new(s.quiz.as_deref().unwrap_or("-")),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

async fn delete(state: &AppState, name: &str, json: bool) -> Result<()> {
    if !state.repo.delete(name).await? {
        bail!("Session '{name}' not found");
    }

    if json {
        return print_json(&serde_json::json!({ "deleted": name }));
    }
    println!();
    println!("  {} Deleted session '{}'", style("*").green().bold(), style(name).cyan());
    println!();
    Ok(())
}
