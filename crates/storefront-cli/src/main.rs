//! Storefront CLI - command-line client for the storefront session toolkit.

mod commands;
mod output;

use clap::{Parser, Subcommand};

/// Storefront CLI - manage your storefront account and session.
#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Storefront CLI for accounts and sessions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Login with email and password
    Login,

    /// Create an account and log in
    Register,

    /// Logout and clear the stored credential pair
    Logout,

    /// Show session status
    Status,

    /// Check where a navigation to a path would land
    Route {
        /// Path to check (e.g. /admin/products)
        path: String,
    },

    /// Manage password resets
    PasswordReset {
        #[command(subcommand)]
        command: PasswordResetCommands,
    },
}

#[derive(Subcommand)]
enum PasswordResetCommands {
    /// Request a reset message for an email address
    Request {
        /// Account email address
        email: String,
    },
    /// Submit a new password for a reset link
    Confirm {
        /// One-time code from the reset link
        otp: String,
        /// Encoded user id from the reset link
        uidb64: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    storefront_config::init_logging(&cli.log_level);

    let result = match cli.command {
        Commands::Login => commands::login(&cli.format).await,
        Commands::Register => commands::register(&cli.format).await,
        Commands::Logout => commands::logout(&cli.format).await,
        Commands::Status => commands::status(&cli.format).await,
        Commands::Route { path } => commands::route_check(&path, &cli.format).await,
        Commands::PasswordReset { command } => match command {
            PasswordResetCommands::Request { email } => {
                commands::reset_request(&email, &cli.format).await
            }
            PasswordResetCommands::Confirm { otp, uidb64 } => {
                commands::reset_confirm(&otp, &uidb64, &cli.format).await
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
