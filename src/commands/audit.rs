//! Audit log CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use cardvault_core::config::AppConfig;
use cardvault_core::error::AppError;
use cardvault_entity::audit::AuditLogEntry;

/// Arguments for audit commands
#[derive(Debug, Args)]
pub struct AuditArgs {
    /// Audit subcommand
    #[command(subcommand)]
    pub command: AuditCommand,
}

/// Audit subcommands
#[derive(Debug, Subcommand)]
pub enum AuditCommand {
    /// List recent audit entries
    List {
        /// Only entries about this resource, as `<kind>:<uuid>`
        #[arg(short, long)]
        resource: Option<String>,
        /// Number of results
        #[arg(short, long, default_value = "50")]
        limit: i64,
    },
}

/// Audit display row
#[derive(Debug, Serialize, Tabled)]
struct AuditRow {
    /// Time
    time: String,
    /// Actor ID
    actor: String,
    /// Action
    action: String,
    /// Resource
    resource: String,
}

impl From<&AuditLogEntry> for AuditRow {
    fn from(e: &AuditLogEntry) -> Self {
        Self {
            time: e.created_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            actor: e.actor_id.to_string(),
            action: e.action.clone(),
            resource: format!("{}:{}", e.resource_type, e.resource_id),
        }
    }
}

/// Execute audit commands
pub async fn execute(
    args: &AuditArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let repos = super::create_repositories(config).await?;

    match &args.command {
        AuditCommand::List { resource, limit } => {
            if *limit <= 0 {
                return Err(AppError::validation("--limit must be positive"));
            }

            let entries = match resource {
                Some(raw) => {
                    let resource = super::parse_resource_ref(raw)?;
                    let mut entries = repos.audit_log.list_for_resource(resource).await?;
                    entries.reverse();
                    entries.truncate(*limit as usize);
                    entries
                }
                None => repos.audit_log.list_recent(*limit).await?,
            };

            let rows: Vec<AuditRow> = entries.iter().map(AuditRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
