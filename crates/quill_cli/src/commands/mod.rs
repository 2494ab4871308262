//! Subcommand implementations

pub mod init;
pub mod walk;
