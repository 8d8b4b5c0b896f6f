//! Subcommand implementations.

pub mod check;
pub mod edges;
pub mod init;
pub mod list_checks;
pub mod output;
