//! Command-line interface for habitrack, built on clap derive.
//!
//! The same binary runs the API server (`habitrack serve`) and acts as
//! a client for it (register/login/habit/progress commands).

mod commands;

pub use commands::*;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// habitrack - habit tracker with a local API server
#[derive(Parser)]
#[command(name = "habitrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the API server
    #[command(alias = "daemon")]
    Serve,

    /// Create default config file
    Init,

    /// Drop every table and rebuild the schema
    ResetDb,

    /// Create a new account on the server
    Register {
        username: String,
        email: String,
        password: String,
    },

    /// Log in and store the bearer token locally
    Login { username: String, password: String },

    /// Forget the stored bearer token
    Logout,

    /// Manage habits
    #[command(alias = "h")]
    Habit {
        #[command(subcommand)]
        command: HabitCommands,
    },

    /// Record and inspect daily progress
    #[command(alias = "p")]
    Progress {
        #[command(subcommand)]
        command: ProgressCommands,
    },
}

#[derive(Subcommand)]
pub enum HabitCommands {
    /// Create a habit
    #[command(alias = "a")]
    Add {
        name: String,

        /// Optional grouping label, e.g. "Fitness"
        #[arg(long)]
        category: Option<String>,

        /// How many times per day you aim to do this
        #[arg(long, default_value = "1")]
        target: i32,
    },

    /// List your habits
    #[command(alias = "ls", alias = "l")]
    List,

    /// Show one habit together with its progress entries
    Show { id: i32 },

    /// Change name, category or daily target; omitted fields keep
    /// their current values
    Update {
        id: i32,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        category: Option<String>,

        #[arg(long)]
        target: Option<i32>,
    },

    /// Delete a habit and all its progress entries
    #[command(alias = "rm", alias = "r")]
    Remove { id: i32 },
}

#[derive(Subcommand)]
pub enum ProgressCommands {
    /// Log an amount against a habit
    Log {
        habit_id: i32,

        amount: i32,

        /// Calendar date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// List progress entries
    #[command(alias = "ls")]
    List {
        /// Restrict to one habit
        #[arg(long)]
        habit: Option<i32>,
    },
}
