//! User administration commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use medtrack_core::AppResult;
use medtrack_entity::user::{Role, User};

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// List all users (admins)
    List,
    /// Show a single user (admins)
    Show {
        /// User id
        id: String,
    },
    /// Change a user's role (admins)
    SetRole {
        /// User id
        id: String,
        /// New role
        role: Role,
    },
    /// Enable a user account (admins)
    Enable {
        /// User id
        id: String,
    },
    /// Disable a user account (admins)
    Disable {
        /// User id
        id: String,
    },
    /// List patients (doctors, nurses, admins)
    Patients,
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    /// User ID
    id: String,
    /// Name
    name: String,
    /// Email
    email: String,
    /// Role
    role: String,
    /// Status
    status: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.as_str().to_string(),
            status: if u.is_active { "active" } else { "disabled" }.to_string(),
        }
    }
}

/// Execute user commands
pub async fn execute(args: &UserArgs, ctx: &AppContext, format: OutputFormat) -> AppResult<()> {
    match &args.command {
        UserCommand::List => {
            ctx.authorize("/users").await?;
            let users = ctx.users.list().await?;
            let rows: Vec<UserRow> = users.iter().map(Into::into).collect();
            output::print_list(&rows, format);
        }
        UserCommand::Show { id } => {
            ctx.authorize("/users").await?;
            let user = ctx.users.get(id).await?;
            output::print_item(&UserRow::from(&user), format);
        }
        UserCommand::SetRole { id, role } => {
            ctx.authorize("/users").await?;
            let user = ctx.users.update_role(id, *role).await?;
            output::print_success(&format!("{} is now a {}", user.name, user.role));
        }
        UserCommand::Enable { id } => {
            ctx.authorize("/users").await?;
            let user = ctx.users.set_active(id, true).await?;
            output::print_success(&format!("User '{}' enabled", user.name));
        }
        UserCommand::Disable { id } => {
            ctx.authorize("/users").await?;
            let user = ctx.users.set_active(id, false).await?;
            output::print_success(&format!("User '{}' disabled", user.name));
        }
        UserCommand::Patients => {
            ctx.authorize("/medications/new").await?;
            let patients = ctx.users.patients().await?;
            let rows: Vec<UserRow> = patients.iter().map(Into::into).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
