//! Command-line argument definitions.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use evd_core::{Category, Role, SortKey};

/// Event desk.
///
/// Browse events, register for them, and check attendees in at the door by
/// the code printed on their registration.
#[derive(Debug, Parser)]
#[command(name = "evd", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start a session as the given role.
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        /// organiser, attendant or volunteer (alternate spellings accepted).
        #[arg(long)]
        role: Role,
    },

    /// End the current session.
    Logout,

    /// Show the current session role.
    Whoami,

    /// Check in the holder of a registration code.
    CheckIn {
        /// The code presented at the door.
        code: String,
    },

    /// Inspect and manage the attendance log.
    #[command(subcommand)]
    Attendance(AttendanceAction),

    /// Browse and manage events.
    #[command(subcommand)]
    Events(EventsAction),

    /// Register a new user for an event.
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        role: Role,

        #[arg(long)]
        password: String,

        #[arg(long)]
        confirm_password: String,

        /// Id of the event to register for.
        #[arg(long)]
        event: String,
    },

    /// Show the dashboard for the current session.
    Dashboard {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show storage and session status.
    Status,
}

#[derive(Debug, Subcommand)]
pub enum AttendanceAction {
    /// List check-ins, newest first.
    List {
        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete the record at a position in the list (organisers only).
    Delete {
        /// Zero-based position, as shown by `evd attendance list`.
        index: usize,
    },

    /// Delete every record (organisers only).
    Clear,
}

#[derive(Debug, Subcommand)]
pub enum EventsAction {
    /// List events with catalog totals.
    List {
        /// Case-insensitive title search.
        #[arg(long)]
        search: Option<String>,

        #[arg(long, value_enum, default_value_t = SortArg::Date)]
        sort: SortArg,

        /// Earliest date to include (YYYY-MM-DD).
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest date to include (YYYY-MM-DD).
        #[arg(long)]
        to: Option<NaiveDate>,

        #[arg(long)]
        category: Option<Category>,

        /// Output as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show one event.
    Show { id: String },

    /// Sign up for an event as the current session.
    Participate { id: String },

    /// Create an event (organisers only).
    Create {
        #[arg(long)]
        title: String,

        /// Event date (YYYY-MM-DD).
        #[arg(long)]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        description: String,

        /// Poster URL or data URI.
        #[arg(long)]
        poster: Option<String>,

        #[arg(long)]
        category: Option<Category>,

        #[arg(long)]
        capacity: Option<u32>,
    },
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Date,
    Registrations,
    Capacity,
}

impl From<SortArg> for SortKey {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Date => Self::Date,
            SortArg::Registrations => Self::Registrations,
            SortArg::Capacity => Self::Capacity,
        }
    }
}
