//! Sign-in, sign-out, and account commands.

use clap::{Args, Subcommand};

use medtrack_core::{AppError, AppResult};
use medtrack_entity::auth::{LoginRequest, RegisterRequest};
use medtrack_entity::user::Role;

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for auth commands
#[derive(Debug, Args)]
pub struct AuthArgs {
    /// Auth subcommand
    #[command(subcommand)]
    pub command: AuthCommand,
}

/// Auth subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Sign in with email and password
    Login {
        /// Email address (prompted when omitted)
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Create an account and sign in
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,
        /// Email address
        #[arg(short, long)]
        email: String,
        /// Requested role (defaults to patient server-side)
        #[arg(short, long)]
        role: Option<Role>,
    },
    /// Sign out and clear stored credentials
    Logout,
    /// Show the signed-in profile
    Whoami,
}

/// Execute auth commands
pub async fn execute(args: &AuthArgs, ctx: &AppContext, _format: OutputFormat) -> AppResult<()> {
    match &args.command {
        AuthCommand::Login { email } => {
            let email = match email {
                Some(e) => e.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Email")
                    .interact_text()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?,
            };
            let password = prompt_password("Password")?;

            let user = ctx.auth.login(&LoginRequest { email, password }).await?;
            output::print_success(&format!("Signed in as {} ({})", user.name, user.role));
        }
        AuthCommand::Register { name, email, role } => {
            let password = prompt_password("Password")?;
            let user = ctx
                .auth
                .register(&RegisterRequest {
                    name: name.clone(),
                    email: email.clone(),
                    password,
                    role: *role,
                })
                .await?;
            output::print_success(&format!("Account created for {} ({})", user.name, user.role));
        }
        AuthCommand::Logout => {
            ctx.auth.logout().await?;
            output::print_success("Signed out");
        }
        AuthCommand::Whoami => {
            ctx.authorize("/profile").await?;
            let user = ctx.auth.profile().await?;
            output::print_kv("Name", &user.name);
            output::print_kv("Email", &user.email);
            output::print_kv("Role", user.role.as_str());
            output::print_kv("Active", if user.is_active { "yes" } else { "no" });
        }
    }

    Ok(())
}

fn prompt_password(prompt: &str) -> AppResult<String> {
    dialoguer::Password::new()
        .with_prompt(prompt)
        .interact()
        .map_err(|e| AppError::internal(format!("Input error: {}", e)))
}
