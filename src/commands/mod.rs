//! CLI command definitions and dispatch.

pub mod audit;
pub mod config;
pub mod ledger;
pub mod migrate;

use clap::{Parser, Subcommand};

use crate::output::OutputFormat;
use cardvault_core::config::AppConfig;
use cardvault_core::error::AppError;
use cardvault_core::types::{GiftCardId, ResourceKind, ResourceRef};
use cardvault_database::Repositories;

/// Card Vault administration
#[derive(Debug, Parser)]
#[command(name = "cardvault", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

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
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// Configuration inspection
    Config(config::ConfigArgs),
    /// Gift card ledger read-outs
    Ledger(ledger::LedgerArgs),
    /// Audit log
    Audit(audit::AuditArgs),
}

impl Cli {
    /// Execute the CLI command against an already loaded configuration.
    pub async fn execute(&self, app_config: &AppConfig) -> Result<(), AppError> {
        match &self.command {
            Commands::Migrate(args) => migrate::execute(args, app_config).await,
            Commands::Config(args) => {
                config::execute(args, &self.config, app_config, self.format)
            }
            Commands::Ledger(args) => ledger::execute(args, app_config, self.format).await,
            Commands::Audit(args) => audit::execute(args, app_config, self.format).await,
        }
    }
}

/// Helper: load configuration from file
pub fn load_config(config_path: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path)
}

/// Helper: build repositories for the configured backend
pub async fn create_repositories(config: &AppConfig) -> Result<Repositories, AppError> {
    Repositories::from_config(config).await
}

/// Parse a UUID argument into a gift card id.
pub fn parse_gift_card_id(raw: &str) -> Result<GiftCardId, AppError> {
    uuid::Uuid::parse_str(raw)
        .map(GiftCardId)
        .map_err(|e| AppError::validation(format!("Invalid gift card id '{raw}': {e}")))
}

/// Parse a `kind:uuid` argument into a resource reference.
pub fn parse_resource_ref(raw: &str) -> Result<ResourceRef, AppError> {
    let (kind, id) = raw
        .split_once(':')
        .ok_or_else(|| AppError::validation(format!("Expected <kind>:<uuid>, got '{raw}'")))?;
    let kind: ResourceKind = kind.parse()?;
    let id = uuid::Uuid::parse_str(id)
        .map_err(|e| AppError::validation(format!("Invalid resource id '{id}': {e}")))?;
    Ok(ResourceRef::from_parts(kind, id))
}
