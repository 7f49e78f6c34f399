//! Database migration management commands.

use clap::{Args, Subcommand};

use crate::output;
use cardvault_core::config::{AppConfig, StorageBackend};
use cardvault_core::error::AppError;
use cardvault_database::connection::DatabasePool;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config: &AppConfig) -> Result<(), AppError> {
    match &args.command {
        MigrateCommand::Run => {
            if config.storage.backend == StorageBackend::Memory {
                output::print_warning("Storage backend is 'memory'; nothing to migrate.");
                return Ok(());
            }

            println!("Running database migrations...");
            let db = DatabasePool::connect(&config.database).await?;
            db.migrate().await?;
            db.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
