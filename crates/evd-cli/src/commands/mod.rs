//! CLI subcommand implementations.

pub mod attendance;
pub mod check_in;
pub mod dashboard;
pub mod events;
pub mod register;
pub mod session;
pub mod status;
pub mod util;
