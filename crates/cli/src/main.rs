//! Orchard CLI - Operator tools for the storefront.
//!
//! # Usage
//!
//! ```bash
//! # Hash a password for ORCHARD_ADMIN_PASSWORD_HASH / ORCHARD_USER_ACCOUNTS
//! echo -n 'password' | orchard-cli hash-password
//!
//! # Generate a value for ORCHARD_TOKEN_SECRET
//! orchard-cli gen-secret
//!
//! # Check how the request gate treats a path
//! orchard-cli route /cart/checkout
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::io;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "orchard-cli")]
#[command(author, version, about = "Orchard CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Hash a password read from stdin (argon2id PHC string)
    HashPassword,
    /// Generate a random credential token secret
    GenSecret,
    /// Print the access classification of a request path
    Route {
        /// Request path, e.g. `/admin/orders`
        path: String,
    },
}

fn main() {
    // Logs go to stderr; stdout carries only command output
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CliError> {
    let stdout = io::stdout().lock();
    match cli.command {
        Commands::HashPassword => commands::password::run(io::stdin().lock(), stdout),
        Commands::GenSecret => commands::secret::run(stdout),
        Commands::Route { path } => commands::route::run(&path, stdout),
    }
}
