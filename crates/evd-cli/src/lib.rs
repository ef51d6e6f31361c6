//! Event desk CLI library.
//!
//! This crate provides the `evd` command-line interface over the event desk
//! core and its storage layer.

mod cli;
pub mod commands;
mod config;

pub use cli::{AttendanceAction, Cli, Commands, EventsAction, SortArg};
pub use config::Config;
