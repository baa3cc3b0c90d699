//! Graph commands: build, inspect, complete, export and import.

use std::path::Path;

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use skillgenome_core::payload::{graph_description_schema, parse_generation_text};
use skillgenome_core::{LearningSession, SkillGraph};
use skillgenome_types::error::GenomeError;
use skillgenome_types::skill::SkillView;
use skillgenome_types::snapshot::{GraphSnapshot, SessionRecord};

use super::{engine_error, print_json, print_list, read_input, styled_view};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

pub async fn build(state: &AppState, file: &Path, role: Option<String>, json: bool) -> Result<()> {
    let text = read_input(file).await?;
    let mut session = state.load_session().await?;
    if let Some(role) = role {
        session.set_role(role);
    }

    let payload = parse_generation_text(&text).map_err(engine_error)?;
    match session.regenerate(payload) {
        Ok(()) => {}
        // The previous graph is untouched; nothing to save.
        Err(err @ GenomeError::UpstreamGeneration { .. }) => return Err(engine_error(err)),
        Err(err) => {
            state.save_session(&session).await?;
            return Err(engine_error(err));
        }
    }
    state.save_session(&session).await?;

    let graph = session.graph();
    let path = graph.get_critical_path();
    let frontier = graph.frontier();

    if json {
        let out = serde_json::json!({
            "session": state.session_name,
            "role": session.role(),
            "skills": graph.len(),
            "dependencies": graph.dependency_count(),
            "critical_path": path,
            "frontier": frontier,
        });
        return print_json(&out);
    }

    println!();
    println!(
        "  {} Built skill graph for '{}'",
        style("*").green().bold(),
        style(display_role(&session)).cyan()
    );
    println!("  Skills: {}", graph.len());
    println!("  Dependencies: {}", graph.dependency_count());
    println!("  Critical path: {}", path.join(" -> "));
    println!("  Start with: {}", style(frontier.join(", ")).yellow());
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Show
// ---------------------------------------------------------------------------

pub async fn show(state: &AppState, json: bool) -> Result<()> {
    let session = state.load_session().await?;
    let graph = session.graph();
    let progress = graph.progress();

    if json {
        let skills: Vec<_> = graph
            .topological_order()
            .iter()
            .filter_map(|id| graph.skill(id))
            .map(|skill| {
                serde_json::json!({
                    "id": skill.id,
                    "description": skill.description,
                    "resources": skill.resources,
                    "status": skill.status,
                    "view": graph.view(&skill.id).ok(),
                    "prerequisites": graph.get_prerequisites(&skill.id),
                })
            })
            .collect();
        let out = serde_json::json!({
            "session": state.session_name,
            "role": session.role(),
            "progress": progress,
            "skills": skills,
            "active_quiz": session.active_quiz().map(|q| &q.skill),
        });
        return print_json(&out);
    }

    if graph.is_empty() {
        println!();
        println!("  No skill graph in session '{}'.", state.session_name);
        println!(
            "  Build one with: {}",
            style("sgen build <output.json> --role <role>").dim()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Skill").fg(Color::Cyan),
            Cell::new("Status"),
            Cell::new("Prerequisites"),
            Cell::new("Description"),
        ]);

    for id in graph.topological_order() {
        let Some(skill) = graph.skill(&id) else {
            continue;
        };
        let view = graph.view(&id).map_err(engine_error)?;
        let prereqs: Vec<String> = graph.get_prerequisites(&id).into_iter().collect();
        table.add_row(vec![
            Cell::new(&skill.id),
            view_cell(view),
            Cell::new(prereqs.join(", ")),
            Cell::new(&skill.description),
        ]);
    }

    println!();
    println!("  Role: {}", style(display_role(&session)).cyan());
    println!();
    println!("{table}");
    println!();
    println!(
        "  Progress: {}/{} ({:.0}%)",
        progress.completed,
        progress.total,
        progress.ratio() * 100.0
    );
    if let Some(quiz) = session.active_quiz() {
        println!("  Quiz in progress: {}", style(&quiz.skill).yellow());
    }
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Single-skill queries
// ---------------------------------------------------------------------------

pub async fn prereqs(state: &AppState, skill: &str, json: bool) -> Result<()> {
    let session = state.load_session().await?;
    let graph = session.graph();
    require_skill(graph, skill)?;

    let rows: Vec<(String, String)> = graph
        .get_prerequisites(skill)
        .into_iter()
        .map(|from| {
            let reason = graph
                .dependency(&from, skill)
                .map(|d| d.reason)
                .unwrap_or_default();
            (from, reason)
        })
        .collect();

    if json {
        let out: Vec<_> = rows
            .iter()
            .map(|(id, reason)| serde_json::json!({ "id": id, "reason": reason }))
            .collect();
        return print_json(&out);
    }

    println!();
    println!("  {} {}", style("Prerequisites of").bold(), style(skill).cyan());
    if rows.is_empty() {
        println!("  {}", style("(none)").dim());
    }
    for (id, reason) in &rows {
        if reason.is_empty() {
            println!("  - {}", style(id).cyan());
        } else {
            println!("  - {}  {}", style(id).cyan(), style(reason).dim());
        }
    }
    println!();
    Ok(())
}

pub async fn ancestors(state: &AppState, skill: &str, json: bool) -> Result<()> {
    let session = state.load_session().await?;
    require_skill(session.graph(), skill)?;
    let ids: Vec<String> = session.graph().get_all_ancestors(skill).into_iter().collect();

    if json {
        return print_json(&ids);
    }
    print_list(&format!("Everything before {skill}"), &ids);
    Ok(())
}

pub async fn blockers(state: &AppState, skill: &str, json: bool) -> Result<()> {
    let session = state.load_session().await?;
    require_skill(session.graph(), skill)?;
    let ids: Vec<String> = session.graph().get_blockers(skill).into_iter().collect();

    if json {
        return print_json(&ids);
    }
    print_list(&format!("Unfinished prerequisites of {skill}"), &ids);
    Ok(())
}

// ---------------------------------------------------------------------------
// Orderings
// ---------------------------------------------------------------------------

pub async fn critical_path(state: &AppState, json: bool) -> Result<()> {
    let session = state.load_session().await?;
    let path = session.graph().get_critical_path();

    if json {
        return print_json(&path);
    }

    println!();
    println!("  {} ({} skills)", style("Critical path").bold(), path.len());
    for (i, id) in path.iter().enumerate() {
        let view = session.graph().view(id).map_err(engine_error)?;
        println!("  {:>3}. {}  {}", i + 1, style(id).cyan(), styled_view(view));
    }
    println!();
    Ok(())
}

pub async fn stages(state: &AppState, json: bool) -> Result<()> {
    let session = state.load_session().await?;
    let stages = session.graph().learning_stages();

    if json {
        return print_json(&stages);
    }

    if stages.is_empty() {
        println!();
        println!("  No skills yet.");
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Stage").fg(Color::Cyan),
            Cell::new("Skills"),
        ]);
    for (i, stage) in stages.iter().enumerate() {
        table.add_row(vec![Cell::new(i + 1), Cell::new(stage.join(", "))]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Complete
// ---------------------------------------------------------------------------

pub async fn complete(state: &AppState, skill: &str, force: bool, json: bool) -> Result<()> {
    let mut session = state.load_session().await?;
    if !force {
        session.graph().ensure_unlocked(skill).map_err(engine_error)?;
    }
    session.graph_mut().mark_completed(skill).map_err(engine_error)?;
    state.save_session(&session).await?;

    let frontier = session.graph().frontier();
    if json {
        let out = serde_json::json!({
            "completed": skill,
            "progress": session.graph().progress(),
            "frontier": frontier,
        });
        return print_json(&out);
    }

    println!();
    println!(
        "  {} Completed '{}'",
        style("*").green().bold(),
        style(skill).cyan()
    );
    if !frontier.is_empty() {
        println!("  Next up: {}", style(frontier.join(", ")).yellow());
    }
    println!();
    Ok(())
}

// ---------------------------------------------------------------------------
// Export / import / schema
// ---------------------------------------------------------------------------

pub async fn export(state: &AppState, output: Option<&Path>) -> Result<()> {
    let session = state.load_session().await?;
    let blob = session.graph().serialize().map_err(engine_error)?;

    match output {
        Some(path) => {
            tokio::fs::write(path, &blob)
                .await
                .with_context(|| format!("Failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), "snapshot exported");
        }
        None => println!("{blob}"),
    }
    Ok(())
}

pub async fn import(state: &AppState, file: &Path, json: bool) -> Result<()> {
    let text = read_input(file).await?;
    let snapshot: GraphSnapshot = serde_json::from_str(&text)
        .with_context(|| format!("{} is not a graph snapshot", file.display()))?;

    let current = state.load_session().await?;
    let record = SessionRecord {
        role: current.role().to_string(),
        snapshot,
        active_quiz: current.active_quiz().cloned(),
    };
    let session = LearningSession::restore(record, state.config.clone()).map_err(engine_error)?;
    state.save_session(&session).await?;

    let progress = session.graph().progress();
    if json {
        let out = serde_json::json!({
            "session": state.session_name,
            "progress": progress,
            "dependencies": session.graph().dependency_count(),
        });
        return print_json(&out);
    }

    println!();
    println!(
        "  {} Imported {} skills ({} completed) into session '{}'",
        style("*").green().bold(),
        progress.total,
        progress.completed,
        style(&state.session_name).cyan()
    );
    println!();
    Ok(())
}

pub fn schema() -> Result<()> {
    print_json(&graph_description_schema())
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn require_skill(graph: &SkillGraph, skill: &str) -> Result<()> {
    if !graph.contains(skill) {
        bail!("Skill '{skill}' not found");
    }
    Ok(())
}

fn view_cell(view: SkillView) -> Cell {
    let color = match view {
        SkillView::Completed => Color::Green,
        SkillView::Current => Color::Yellow,
        SkillView::Blocked => Color::DarkGrey,
    };
    Cell::new(view).fg(color)
}

fn display_role(session: &LearningSession) -> &str {
    if session.role().is_empty() {
        "(no role)"
    } else {
        session.role()
    }
}
