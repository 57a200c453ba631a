//! `chatrelay send`: one relay turn from the terminal.

use anyhow::Result;
use console::style;

use chatrelay_core::store::repository::MessageStore;

use crate::state::AppState;

/// Relay `message` into `session_id` and print the reply.
///
/// Behaves exactly like `POST /chat`: completion failures print the failure
/// reply, store failures are returned as errors.
pub async fn send_message(
    state: &AppState,
    session_id: &str,
    message: &str,
    json: bool,
) -> Result<()> {
    let exchange = state.relay.handle_chat(session_id, message).await?;

    if json {
        let out = serde_json::json!({ "reply": exchange.reply() });
        println!("{}", serde_json::to_string_pretty(&out)?);
        return Ok(());
    }

    println!();
    if exchange.completion_failed {
        println!("  {} {}", style("!").yellow().bold(), style(exchange.reply()).yellow());
    } else {
        println!("  {} {}", style("assistant").cyan().bold(), exchange.reply());
    }
    println!();

    let total = state.relay.store().count_turns(session_id).await?;
    println!(
        "  {} turns in session '{}'",
        style(total).bold(),
        style(session_id).cyan()
    );
    println!();

    Ok(())
}
