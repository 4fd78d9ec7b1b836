//! Command-line argument surface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Top-level argument parser.
#[derive(Parser)]
#[command(name = "bloggle-cli", version, about = "Bloggle database CLI")]
pub struct Cli {
    /// Selected subcommand.
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Create the admin account if none exists.
    CreateAdmin {
        /// Database file path.
        #[arg(long, default_value = "./data/bloggle.db")]
        db_path: PathBuf,
        /// Admin email address.
        #[arg(long, default_value = "admin@bloggle.com")]
        email: String,
        /// Admin username.
        #[arg(long, default_value = "admin")]
        username: String,
        /// Admin password.
        #[arg(long, default_value = "admin123")]
        password: String,
    },
    /// Populate the database with sample users and blogs.
    Seed {
        /// Database file path.
        #[arg(long, default_value = "./data/bloggle.db")]
        db_path: PathBuf,
        /// Delete the database file first and start from an empty one.
        #[arg(long)]
        fresh: bool,
    },
    /// Print user and blog counts.
    Stats {
        /// Database file path.
        #[arg(long, default_value = "./data/bloggle.db")]
        db_path: PathBuf,
    },
}
