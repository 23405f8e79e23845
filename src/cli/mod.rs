//! CLI module - Command-line interface for the planning API
//!
//! Serving is the default; the remaining commands seed reference data.

mod commands;

use clap::{Parser, Subcommand};

/// Planning API - role-scoped shift schedules for stores
#[derive(Parser)]
#[command(name = "planning-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP API server
    #[command(alias = "daemon", alias = "web")]
    Serve,

    /// Create default config file
    #[command(alias = "--init")]
    Init,

    /// Manage stores
    Magasin {
        #[command(subcommand)]
        command: MagasinCommands,
    },

    /// Manage user accounts
    User {
        #[command(subcommand)]
        command: UserCommands,
    },
}

#[derive(Subcommand)]
pub enum MagasinCommands {
    /// Register a store
    Add {
        /// Store name
        nom: String,
        /// Postal address
        #[arg(long)]
        adresse: Option<String>,
    },
    /// List stores
    #[command(alias = "ls")]
    List,
}

#[derive(Subcommand)]
pub enum UserCommands {
    /// Create an account and print its API key
    Add {
        #[arg(long)]
        email: String,
        #[arg(long)]
        nom: String,
        #[arg(long)]
        prenom: String,
        /// admin, manager or employe
        #[arg(long)]
        role: String,
        /// Store the account is attached to
        #[arg(long)]
        magasin: Option<i32>,
        #[arg(long)]
        password: String,
    },
}

pub use commands::*;
