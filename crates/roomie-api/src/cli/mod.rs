//! CLI command definitions for the `roomie` binary.
//!
//! `serve` runs the message store API and the relay. Every other command is
//! a thin client talking to a running server over REST.

pub mod message;
pub mod participant;

use clap::{Parser, Subcommand};

use roomie_types::participant::ParticipantId;

/// Roommate messaging: store, relay and command-line client.
#[derive(Parser)]
#[command(name = "roomie", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true)]
    pub otel: bool,

    /// Server base URL for client commands (overrides `[client] base_url`).
    #[arg(long, env = "ROOMIE_URL", global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API and WebSocket relay.
    Serve {
        /// Port to listen on (overrides `[server] port`).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (overrides `[server] host`).
        #[arg(long)]
        host: Option<String>,
    },

    /// Manage participants.
    Participant {
        #[command(subcommand)]
        command: participant::ParticipantCommand,
    },

    /// Send a message from one participant to another.
    Send {
        /// Sender participant id.
        #[arg(long)]
        from: ParticipantId,

        /// Receiver participant id.
        #[arg(long)]
        to: ParticipantId,

        /// Message text.
        content: String,
    },

    /// Show the conversation between two participants, oldest first.
    History {
        /// Participant whose point of view is shown.
        viewer: ParticipantId,

        /// The other participant.
        counterpart: ParticipantId,
    },

    /// List a participant's conversations, most recent first.
    #[command(alias = "ls")]
    Conversations {
        /// Participant id.
        user: ParticipantId,
    },

    /// Mark a message as read by its receiver.
    Read {
        /// Message id.
        id: i64,

        /// Receiver marking it read.
        #[arg(long)]
        reader: ParticipantId,
    },
}
