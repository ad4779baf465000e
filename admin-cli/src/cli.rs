use admin_core::{SessionField, SettingsTab};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "session-admin")]
#[command(about = "Inline editing for sessions and admin settings")]
pub struct Cli {
    /// Use local in-memory data instead of the API
    #[arg(long, global = true)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show or edit one session
    Session {
        /// Session id
        id: String,
        #[command(subcommand)]
        action: SessionAction,
    },
    /// Show or edit settings
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Print config path and create default file if missing
    ConfigPath,
}

#[derive(Debug, Subcommand)]
pub enum SessionAction {
    /// Print every field
    Show,
    /// Edit one field and save it
    Set {
        /// Field name, e.g. technology, maxAttendees, currentStatus
        field: SessionField,
        /// New value; statuses accept "In Progress" or "In_Progress"
        value: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Print one tab (profile, team, notifications, api, advanced)
    Show {
        #[arg(long)]
        tab: Option<String>,
    },
    /// Edit one field of a settings group and save the group
    Set {
        tab: SettingsTab,
        field: String,
        value: String,
    },
    /// Add an API key to the local list and print it
    CreateApiKey {
        name: String,
        key: String,
    },
}
