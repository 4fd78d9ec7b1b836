//! Subcommand implementations.

pub mod create_admin;
pub mod seed;
pub mod stats;

use anyhow::Result;

use crate::cli::{Cli, Commands};

/// Dispatch a parsed command line to its implementation.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::CreateAdmin {
            db_path,
            email,
            username,
            password,
        } => create_admin::run(&db_path, &email, &username, &password),
        Commands::Seed { db_path, fresh } => seed::run(&db_path, fresh),
        Commands::Stats { db_path } => stats::run(&db_path),
    }
}
