//! CLI command definitions and dispatch.

pub mod auth;
pub mod medication;
pub mod user;

use clap::{Parser, Subcommand};

use medtrack_core::AppResult;

use crate::context::AppContext;
use crate::output::OutputFormat;

/// MedTrack — medication tracking client
#[derive(Debug, Parser)]
#[command(name = "medtrack", version, about, long_about = None)]
pub struct Cli {
    /// Configuration environment (selects config/<env>.toml)
    #[arg(short, long, default_value = "default")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out, and account management
    Auth(auth::AuthArgs),
    /// Medication management
    Medication(medication::MedicationArgs),
    /// User administration
    User(user::UserArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> AppResult<()> {
        let mut ctx = AppContext::init(&self.env).await?;
        let result = match &self.command {
            Commands::Auth(args) => auth::execute(args, &ctx, self.format).await,
            Commands::Medication(args) => medication::execute(args, &ctx, self.format).await,
            Commands::User(args) => user::execute(args, &ctx, self.format).await,
        };
        ctx.report_session_events();
        result
    }
}
