//! Gift card ledger read-outs.
//!
//! These bypass per-user access control; they are operator tools.

use clap::{Args, Subcommand};
use serde::Serialize;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use cardvault_core::config::AppConfig;
use cardvault_core::error::AppError;
use cardvault_entity::ledger::GiftCardTransaction;

/// Arguments for ledger commands
#[derive(Debug, Args)]
pub struct LedgerArgs {
    /// Ledger subcommand
    #[command(subcommand)]
    pub command: LedgerCommand,
}

/// Ledger subcommands
#[derive(Debug, Subcommand)]
pub enum LedgerCommand {
    /// Show a gift card's initial, spent and current balance
    Balance {
        /// Gift card ID
        gift_card_id: String,
    },
    /// List a gift card's transactions
    Transactions {
        /// Gift card ID
        gift_card_id: String,
        /// Include soft-deleted transactions
        #[arg(long)]
        include_deleted: bool,
    },
}

/// Balance display row
#[derive(Debug, Serialize, Tabled)]
struct BalanceRow {
    /// Gift card
    gift_card: String,
    /// Initial
    initial: String,
    /// Spent
    spent: String,
    /// Current
    current: String,
}

/// Transaction display row
#[derive(Debug, Serialize, Tabled)]
struct TransactionRow {
    /// ID
    id: String,
    /// Date
    date: String,
    /// Amount
    amount: String,
    /// Description
    description: String,
    /// State
    state: String,
}

impl From<&GiftCardTransaction> for TransactionRow {
    fn from(tx: &GiftCardTransaction) -> Self {
        Self {
            id: tx.id.to_string(),
            date: tx.transaction_date.to_string(),
            amount: format!("{:.2}", tx.amount),
            description: tx.description.clone(),
            state: if tx.is_active() { "active" } else { "deleted" }.to_string(),
        }
    }
}

/// Execute ledger commands
pub async fn execute(
    args: &LedgerArgs,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let repos = super::create_repositories(config).await?;

    match &args.command {
        LedgerCommand::Balance { gift_card_id } => {
            let id = super::parse_gift_card_id(gift_card_id)?;
            let balance = repos
                .ledger
                .balance(id)
                .await?
                .ok_or_else(|| AppError::not_found(format!("Gift card {id} not found")))?;

            let row = BalanceRow {
                gift_card: id.to_string(),
                initial: format!("{:.2}", balance.initial_balance),
                spent: format!("{:.2}", balance.spent),
                current: format!("{:.2}", balance.current),
            };
            output::print_list(&[row], format);
        }
        LedgerCommand::Transactions {
            gift_card_id,
            include_deleted,
        } => {
            let id = super::parse_gift_card_id(gift_card_id)?;
            let transactions = repos.ledger.list_transactions(id, *include_deleted).await?;
            let rows: Vec<TransactionRow> = transactions.iter().map(TransactionRow::from).collect();
            output::print_list(&rows, format);
        }
    }

    Ok(())
}
