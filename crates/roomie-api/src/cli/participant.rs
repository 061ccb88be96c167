//! CLI participant subcommands.

use anyhow::{Context, Result};
use clap::Subcommand;
use console::style;

use roomie_infra::rest::HttpMessageStore;

/// Participant subcommands.
#[derive(Subcommand)]
pub enum ParticipantCommand {
    /// Register a participant and print its id.
    Add {
        /// Display name.
        name: String,
    },
}

pub async fn handle_participant_command(
    cmd: ParticipantCommand,
    client: &HttpMessageStore,
    json: bool,
) -> Result<()> {
    match cmd {
        ParticipantCommand::Add { name } => {
            let participant = client
                .register_participant(&name)
                .await
                .with_context(|| format!("Failed to register '{name}'"))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&participant)?);
            } else {
                println!();
                println!(
                    "  {} Registered '{}' as participant {}",
                    style("*").green().bold(),
                    style(&participant.name).cyan(),
                    style(participant.id).yellow()
                );
                println!();
            }
            Ok(())
        }
    }
}
