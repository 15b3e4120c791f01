//! Medication management commands.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use medtrack_client::services::MedicationFilter;
use medtrack_core::{AppError, AppResult};
use medtrack_entity::medication::{
    CreateMedication, IntakeLog, IntakeStatus, LogIntake, Medication, UpdateMedication,
};

use crate::context::AppContext;
use crate::output::{self, OutputFormat};

/// Arguments for medication commands
#[derive(Debug, Args)]
pub struct MedicationArgs {
    /// Medication subcommand
    #[command(subcommand)]
    pub command: MedicationCommand,
}

/// Medication subcommands
#[derive(Debug, Subcommand)]
pub enum MedicationCommand {
    /// List medications
    List {
        /// Filter by patient id
        #[arg(long)]
        patient: Option<String>,
        /// Only active (or only inactive) medications
        #[arg(long)]
        active: Option<bool>,
        /// Page to fetch
        #[arg(long)]
        page: Option<u32>,
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Show a single medication
    Show {
        /// Medication id
        id: String,
    },
    /// Prescribe a new medication (doctors and admins)
    Create {
        /// Medication name
        #[arg(long)]
        name: String,
        /// Dosage description, e.g. "200mg"
        #[arg(long)]
        dosage: String,
        /// Intake frequency, e.g. "twice daily"
        #[arg(long)]
        frequency: String,
        /// Intake instructions
        #[arg(long)]
        instructions: Option<String>,
        /// Start date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        start: Option<String>,
        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Patient id the medication is prescribed to
        #[arg(long)]
        patient: String,
    },
    /// Edit an existing medication (doctors and admins)
    Update {
        /// Medication id
        id: String,
        /// New medication name
        #[arg(long)]
        name: Option<String>,
        /// New dosage
        #[arg(long)]
        dosage: Option<String>,
        /// New frequency
        #[arg(long)]
        frequency: Option<String>,
        /// New instructions
        #[arg(long)]
        instructions: Option<String>,
        /// New end date (YYYY-MM-DD)
        #[arg(long)]
        end: Option<String>,
        /// Activate or deactivate the prescription
        #[arg(long)]
        active: Option<bool>,
    },
    /// Delete a medication (doctors and admins)
    Delete {
        /// Medication id
        id: String,
    },
    /// Record an intake event
    Log {
        /// Medication id
        id: String,
        /// Intake outcome: taken, missed, or postponed
        #[arg(long, default_value = "taken")]
        status: String,
        /// Free-form notes
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the intake history of a medication
    History {
        /// Medication id
        id: String,
    },
}

/// Medication display row for table output
#[derive(Debug, Serialize, Tabled)]
struct MedicationRow {
    /// Medication ID
    id: String,
    /// Name
    name: String,
    /// Dosage
    dosage: String,
    /// Frequency
    frequency: String,
    /// Patient
    patient: String,
    /// Active flag
    active: bool,
    /// Start date
    starts: String,
}

impl From<&Medication> for MedicationRow {
    fn from(m: &Medication) -> Self {
        Self {
            id: m.id.clone(),
            name: m.name.clone(),
            dosage: m.dosage.clone(),
            frequency: m.frequency.clone(),
            patient: m.patient.clone(),
            active: m.is_active,
            starts: m.start_date.format("%Y-%m-%d").to_string(),
        }
    }
}

/// Intake log display row for table output
#[derive(Debug, Serialize, Tabled)]
struct LogRow {
    /// Log ID
    id: String,
    /// Outcome
    status: String,
    /// Notes
    notes: String,
    /// Taken at
    taken_at: String,
}

impl From<&IntakeLog> for LogRow {
    fn from(l: &IntakeLog) -> Self {
        Self {
            id: l.id.clone(),
            status: l.status.as_str().to_string(),
            notes: l.notes.clone().unwrap_or_default(),
            taken_at: l.taken_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

/// Execute medication commands
pub async fn execute(
    args: &MedicationArgs,
    ctx: &AppContext,
    format: OutputFormat,
) -> AppResult<()> {
    match &args.command {
        MedicationCommand::List {
            patient,
            active,
            page,
            limit,
        } => {
            ctx.authorize("/medications").await?;
            let filter = MedicationFilter {
                patient: patient.clone(),
                active: *active,
                page: *page,
                limit: *limit,
            };
            let fetched = ctx.medications.list(&filter).await?;
            let rows: Vec<MedicationRow> = fetched.medications.iter().map(Into::into).collect();
            output::print_list(&rows, format);
            if fetched.total_pages > 1 {
                println!(
                    "Page {} of {} ({} total)",
                    fetched.current_page, fetched.total_pages, fetched.total
                );
            }
        }
        MedicationCommand::Show { id } => {
            ctx.authorize(&format!("/medications/{id}")).await?;
            let medication = ctx.medications.get(id).await?;
            output::print_item(&MedicationRow::from(&medication), format);
            if let Some(instructions) = &medication.instructions {
                output::print_kv("Instructions", instructions);
            }
        }
        MedicationCommand::Create {
            name,
            dosage,
            frequency,
            instructions,
            start,
            end,
            patient,
        } => {
            ctx.authorize("/medications/new").await?;
            let medication = ctx
                .medications
                .create(&CreateMedication {
                    name: name.clone(),
                    dosage: dosage.clone(),
                    frequency: frequency.clone(),
                    instructions: instructions.clone(),
                    start_date: match start {
                        Some(date) => parse_date(date)?,
                        None => Utc::now(),
                    },
                    end_date: end.as_deref().map(parse_date).transpose()?,
                    patient: patient.clone(),
                })
                .await?;
            output::print_success(&format!("Prescribed '{}' ({})", medication.name, medication.id));
        }
        MedicationCommand::Update {
            id,
            name,
            dosage,
            frequency,
            instructions,
            end,
            active,
        } => {
            ctx.authorize(&format!("/medications/{id}/edit")).await?;
            let medication = ctx
                .medications
                .update(
                    id,
                    &UpdateMedication {
                        name: name.clone(),
                        dosage: dosage.clone(),
                        frequency: frequency.clone(),
                        instructions: instructions.clone(),
                        start_date: None,
                        end_date: end.as_deref().map(parse_date).transpose()?,
                        is_active: *active,
                    },
                )
                .await?;
            output::print_success(&format!("Updated '{}'", medication.name));
        }
        MedicationCommand::Delete { id } => {
            ctx.authorize(&format!("/medications/{id}/edit")).await?;
            ctx.medications.delete(id).await?;
            output::print_success(&format!("Deleted medication {id}"));
        }
        MedicationCommand::Log { id, status, notes } => {
            ctx.authorize(&format!("/medications/{id}")).await?;
            let entry = LogIntake {
                status: parse_status(status)?,
                notes: notes.clone(),
                taken_at: Utc::now(),
            };
            let log = ctx.medications.log_intake(id, &entry).await?;
            output::print_success(&format!("Recorded intake as {}", log.status.as_str()));
        }
        MedicationCommand::History { id } => {
            ctx.authorize(&format!("/medications/{id}")).await?;
            let logs = ctx.medications.logs(id).await?;
            let rows: Vec<LogRow> = logs.iter().map(Into::into).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}

fn parse_date(date: &str) -> AppResult<DateTime<Utc>> {
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|e| AppError::validation(format!("Invalid date '{}': {}", date, e)))?;
    match day.and_hms_opt(0, 0, 0) {
        Some(naive) => Ok(naive.and_utc()),
        None => Err(AppError::validation(format!("Invalid date '{}'", date))),
    }
}

fn parse_status(status: &str) -> AppResult<IntakeStatus> {
    match status {
        "taken" => Ok(IntakeStatus::Taken),
        "missed" => Ok(IntakeStatus::Missed),
        "postponed" => Ok(IntakeStatus::Postponed),
        other => Err(AppError::validation(format!(
            "Unknown intake status '{}' (expected taken, missed, or postponed)",
            other
        ))),
    }
}
