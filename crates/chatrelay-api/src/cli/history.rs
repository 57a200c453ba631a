//! `chatrelay history`: print a session transcript.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;

use chatrelay_types::chat::{HistoryEntry, TurnRole};

/// Print the transcript as a table, or as JSON with `--json`.
///
/// # Examples
///
/// ```bash
/// chatrelay history abc
/// chatrelay history abc --json
/// ```
pub fn print_history(session_id: &str, entries: &[HistoryEntry], json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No messages for session '{}'.",
            style("i").blue().bold(),
            style(session_id).cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("  Session '{}'", style(session_id).cyan().bold());
    println!();
    println!("{}", render_table(entries));
    println!();
    println!(
        "  {} message{}",
        style(entries.len()).bold(),
        if entries.len() == 1 { "" } else { "s" }
    );
    println!();

    Ok(())
}

fn render_table(entries: &[HistoryEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(vec![
        Cell::new("Time").fg(Color::White),
        Cell::new("Role").fg(Color::White),
        Cell::new("Content").fg(Color::White),
    ]);

    for entry in entries {
        let role_cell = match entry.role {
            TurnRole::User => Cell::new("user").fg(Color::Green),
            TurnRole::Assistant => Cell::new("assistant").fg(Color::Cyan),
        };

        table.add_row(vec![
            Cell::new(entry.timestamp.format("%Y-%m-%d %H:%M:%S").to_string())
                .fg(Color::DarkGrey),
            role_cell,
            Cell::new(&entry.content),
        ]);
    }

    table
}
