//! `voxroute history`: print the stored turns of a session.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use uuid::Uuid;

use crate::state::AppState;

/// Show a session's chat log as a table (or JSON).
///
/// # Examples
///
/// ```bash
/// voxroute history 0192f5a4-... --limit 20
/// voxroute history 0192f5a4-... --json
/// ```
pub async fn show_history(
    state: &AppState,
    session_id: Uuid,
    limit: Option<i64>,
    json: bool,
) -> Result<()> {
    if let Some(limit) = limit {
        anyhow::ensure!(limit >= 0, "--limit must not be negative");
    }

    let entries = state
        .chat_service
        .history(&session_id, limit)
        .await
        .with_context(|| format!("failed to read chat log for session {session_id}"))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No turns stored for session {}",
            style("i").blue().bold(),
            style(session_id).cyan()
        );
        println!();
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Input").fg(Color::White),
        Cell::new("Agent").fg(Color::White),
        Cell::new("Intent").fg(Color::White),
        Cell::new("Response").fg(Color::White),
    ]);

    for entry in &entries {
        let agent_cell = match entry.agent {
            Some(agent) => Cell::new(agent.as_str()).fg(Color::Green),
            None => Cell::new("-").fg(Color::DarkGrey),
        };

        table.add_row(vec![
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()).fg(Color::DarkGrey),
            Cell::new(&entry.user_input).fg(Color::Cyan),
            agent_cell,
            Cell::new(&entry.intent).fg(Color::White),
            Cell::new(&entry.response).fg(Color::White),
        ]);
    }

    println!();
    println!("  Session {}", style(session_id).cyan().bold());
    println!();
    println!("{table}");
    println!();
    println!(
        "  {} turn{}",
        style(entries.len()).bold(),
        if entries.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}
