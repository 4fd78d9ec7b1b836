//! Operator CLI for the Bloggle database: admin bootstrap, sample data
//! seeding, and quick stats.

pub mod cli;
pub mod commands;
