//! Escrow wallet state machine.
//!
//! Every mutating operation runs as one sqlx transaction: wallet rows are
//! locked with FOR UPDATE before any balance check, so two concurrent
//! withdrawals against the same account serialize instead of racing the
//! available-balance check. Activity-log emission happens after commit and
//! never rolls a financial mutation back.

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::clients::Catalog;
use crate::config::Config;
use crate::db::audit::{self, AuditRecord, ENTITY_TRANSACTION, ENTITY_WALLET};
use crate::db::models::{
    TransactionPage, TransactionStatus, TransactionType, WalletTransaction,
};
use crate::db::queries;
use crate::error::AppError;
use crate::services::activity_log::{ActivityEntry, ActivityLog};
use crate::validation;

pub const MAX_PAGE_SIZE: i64 = 100;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Operational knobs for the wallet, injected from configuration.
/// The admin bank account was a compiled constant upstream; here it is
/// plain config so deployments can rotate it.
#[derive(Debug, Clone)]
pub struct WalletSettings {
    pub admin_account_number: String,
    pub admin_account_name: String,
    pub admin_bank_name: String,
    pub admin_bank_code: String,
    pub holdback_days: i64,
    pub deposit_code_prefix: String,
}

impl WalletSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            admin_account_number: config.admin_account_number.clone(),
            admin_account_name: config.admin_account_name.clone(),
            admin_bank_name: config.admin_bank_name.clone(),
            admin_bank_code: config.admin_bank_code.clone(),
            holdback_days: config.holdback_days,
            deposit_code_prefix: config.deposit_code_prefix.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WalletBalance {
    pub balance: BigDecimal,
    pub pending_balance: BigDecimal,
    pub available_balance: BigDecimal,
}

/// Bank-transfer instructions shown to a depositing user: where to send
/// money and which memo correlates the transfer back to their wallet.
#[derive(Debug, Serialize, Deserialize)]
pub struct DepositInfo {
    pub deposit_code: String,
    pub account_number: String,
    pub account_name: String,
    pub bank_name: String,
    pub bank_code: String,
}

#[derive(Clone)]
pub struct WalletService {
    pool: PgPool,
    settings: WalletSettings,
    catalog: Arc<dyn Catalog>,
    activity_log: Arc<dyn ActivityLog>,
}

impl WalletService {
    pub fn new(
        pool: PgPool,
        settings: WalletSettings,
        catalog: Arc<dyn Catalog>,
        activity_log: Arc<dyn ActivityLog>,
    ) -> Self {
        Self {
            pool,
            settings,
            catalog,
            activity_log,
        }
    }

    pub async fn get_balance(&self, user_id: Uuid) -> Result<WalletBalance, AppError> {
        let mut db_tx = self.pool.begin().await?;
        let wallet =
            queries::get_or_create_wallet(&mut db_tx, user_id, &self.settings.deposit_code_prefix)
                .await?;
        db_tx.commit().await?;

        Ok(WalletBalance {
            available_balance: wallet.available_balance(),
            balance: wallet.balance,
            pending_balance: wallet.pending_balance,
        })
    }

    pub async fn deposit_info(&self, user_id: Uuid) -> Result<DepositInfo, AppError> {
        let mut db_tx = self.pool.begin().await?;
        let wallet =
            queries::get_or_create_wallet(&mut db_tx, user_id, &self.settings.deposit_code_prefix)
                .await?;
        db_tx.commit().await?;

        Ok(DepositInfo {
            deposit_code: wallet.deposit_code,
            account_number: self.settings.admin_account_number.clone(),
            account_name: self.settings.admin_account_name.clone(),
            bank_name: self.settings.admin_bank_name.clone(),
            bank_code: self.settings.admin_bank_code.clone(),
        })
    }

    /// Records a deposit request. No balance effect until an admin approves
    /// the matching bank transfer.
    pub async fn request_deposit(
        &self,
        user_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
        proof_image_url: Option<String>,
    ) -> Result<WalletTransaction, AppError> {
        validation::validate_positive_amount(&amount)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        if let Some(desc) = &description {
            validation::validate_max_len("description", desc, validation::DESCRIPTION_MAX_LEN)
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        }
        if let Some(url) = &proof_image_url {
            validation::validate_max_len("proof_image_url", url, validation::PROOF_IMAGE_URL_MAX_LEN)
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        }

        let mut db_tx = self.pool.begin().await?;
        queries::get_or_create_wallet(&mut db_tx, user_id, &self.settings.deposit_code_prefix)
            .await?;

        let mut tx =
            WalletTransaction::new_deposit(user_id, amount.clone(), description, proof_image_url);
        tx.admin_account_number = Some(self.settings.admin_account_number.clone());
        tx.admin_account_name = Some(self.settings.admin_account_name.clone());
        tx.admin_bank_name = Some(self.settings.admin_bank_name.clone());

        let saved = queries::insert_transaction(&mut db_tx, &tx).await?;
        db_tx.commit().await?;

        tracing::info!(user_id = %user_id, tx_id = %saved.id, amount = %amount, "deposit requested");
        self.log_activity(ActivityEntry {
            user_id,
            action: "Deposit".to_string(),
            operation: "request_deposit".to_string(),
            description: format!("Deposit request of {}", amount),
            metadata: json!({ "transaction_id": saved.id, "amount": amount.to_string() }),
        })
        .await;

        Ok(saved)
    }

    /// Admin approval: credits the wallet and completes the transaction.
    pub async fn approve_deposit(
        &self,
        tx_id: Uuid,
        actor: &str,
    ) -> Result<WalletTransaction, AppError> {
        let mut db_tx = self.pool.begin().await?;

        let tx = queries::get_transaction_for_update(&mut db_tx, tx_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", tx_id)))?;

        if tx.tx_type != TransactionType::Deposit {
            return Err(AppError::InvalidState(
                "only deposit transactions can be approved here".to_string(),
            ));
        }
        if tx.status != TransactionStatus::Pending {
            return Err(AppError::InvalidState(
                "transaction is not pending".to_string(),
            ));
        }

        let updated =
            queries::update_transaction_status(&mut db_tx, tx_id, TransactionStatus::Completed, None)
                .await?;
        audit::record_change(
            &mut db_tx,
            tx_id,
            ENTITY_TRANSACTION,
            "status",
            Some("pending".to_string()),
            Some("completed".to_string()),
            actor,
        )
        .await?;

        let wallet =
            queries::get_or_create_wallet(&mut db_tx, tx.user_id, &self.settings.deposit_code_prefix)
                .await?;
        let old_balance = wallet.balance.clone();
        let wallet =
            queries::apply_balance_delta(&mut db_tx, tx.user_id, &tx.amount, &BigDecimal::from(0))
                .await?;
        audit::record_change(
            &mut db_tx,
            tx.user_id,
            ENTITY_WALLET,
            "balance",
            Some(old_balance.to_string()),
            Some(wallet.balance.to_string()),
            actor,
        )
        .await?;

        db_tx.commit().await?;

        tracing::info!(tx_id = %tx_id, user_id = %tx.user_id, amount = %tx.amount, "deposit approved");
        self.log_activity(ActivityEntry {
            user_id: tx.user_id,
            action: "Deposit approved".to_string(),
            operation: "approve_deposit".to_string(),
            description: format!("Deposit of {} approved for user {}", tx.amount, tx.user_id),
            metadata: json!({ "transaction_id": tx_id, "amount": tx.amount.to_string(), "actor": actor }),
        })
        .await;

        Ok(updated)
    }

    /// Admin rejection of a deposit. Funds were never credited, so only the
    /// status and description change.
    pub async fn reject_deposit(
        &self,
        tx_id: Uuid,
        note: &str,
        actor: &str,
    ) -> Result<WalletTransaction, AppError> {
        let mut db_tx = self.pool.begin().await?;

        let tx = queries::get_transaction_for_update(&mut db_tx, tx_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", tx_id)))?;

        if tx.tx_type != TransactionType::Deposit {
            return Err(AppError::InvalidState(
                "only deposit transactions can be rejected here".to_string(),
            ));
        }
        if tx.status != TransactionStatus::Pending {
            return Err(AppError::InvalidState(
                "transaction is not pending".to_string(),
            ));
        }

        let description = format!(
            "{} - rejected: {}",
            tx.description.clone().unwrap_or_default(),
            note
        );
        let updated = queries::update_transaction_status(
            &mut db_tx,
            tx_id,
            TransactionStatus::Failed,
            Some(&description),
        )
        .await?;
        audit::record_change(
            &mut db_tx,
            tx_id,
            ENTITY_TRANSACTION,
            "status",
            Some("pending".to_string()),
            Some("failed".to_string()),
            actor,
        )
        .await?;

        db_tx.commit().await?;

        tracing::info!(tx_id = %tx_id, user_id = %tx.user_id, "deposit rejected");
        Ok(updated)
    }

    /// Pre-authorization hold: the balance is debited immediately at request
    /// time and only restored if an admin rejects the withdrawal.
    pub async fn request_withdrawal(
        &self,
        user_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
        account_number: String,
        account_name: String,
        bank_name: String,
    ) -> Result<WalletTransaction, AppError> {
        validation::validate_positive_amount(&amount)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        validation::validate_bank_account("account_number", &account_number)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        validation::validate_required("account_name", &account_name)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        validation::validate_max_len("account_name", &account_name, validation::ACCOUNT_NAME_MAX_LEN)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        validation::validate_required("bank_name", &bank_name)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        validation::validate_max_len("bank_name", &bank_name, validation::BANK_NAME_MAX_LEN)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        if let Some(desc) = &description {
            validation::validate_max_len("description", desc, validation::DESCRIPTION_MAX_LEN)
                .map_err(|e| AppError::InvalidInput(e.to_string()))?;
        }

        let mut db_tx = self.pool.begin().await?;

        let wallet =
            queries::get_or_create_wallet(&mut db_tx, user_id, &self.settings.deposit_code_prefix)
                .await?;
        if wallet.available_balance() < amount {
            return Err(AppError::InsufficientFunds(
                "available balance is lower than the requested amount".to_string(),
            ));
        }

        let old_balance = wallet.balance.clone();
        let wallet = queries::apply_balance_delta(
            &mut db_tx,
            user_id,
            &-amount.clone(),
            &BigDecimal::from(0),
        )
        .await?;

        let tx = WalletTransaction::new_withdrawal(
            user_id,
            amount.clone(),
            description,
            account_number.clone(),
            account_name,
            bank_name.clone(),
        );
        let saved = queries::insert_transaction(&mut db_tx, &tx).await?;
        audit::record_change(
            &mut db_tx,
            user_id,
            ENTITY_WALLET,
            "balance",
            Some(old_balance.to_string()),
            Some(wallet.balance.to_string()),
            &user_id.to_string(),
        )
        .await?;

        db_tx.commit().await?;

        tracing::info!(user_id = %user_id, tx_id = %saved.id, amount = %amount, "withdrawal requested");
        self.log_activity(ActivityEntry {
            user_id,
            action: "Withdraw".to_string(),
            operation: "request_withdrawal".to_string(),
            description: format!("Withdrawal request of {}", amount),
            metadata: json!({
                "transaction_id": saved.id,
                "amount": amount.to_string(),
                "account_number": account_number,
                "bank_name": bank_name,
            }),
        })
        .await;

        Ok(saved)
    }

    /// Admin approval of a withdrawal. The money already left the balance at
    /// request time, so this is a status change only.
    pub async fn approve_withdrawal(
        &self,
        tx_id: Uuid,
        actor: &str,
    ) -> Result<WalletTransaction, AppError> {
        let mut db_tx = self.pool.begin().await?;

        let tx = queries::get_transaction_for_update(&mut db_tx, tx_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", tx_id)))?;

        if tx.tx_type != TransactionType::Withdrawal {
            return Err(AppError::InvalidState(
                "only withdrawal transactions can be approved here".to_string(),
            ));
        }
        if tx.status != TransactionStatus::Pending {
            return Err(AppError::InvalidState(
                "transaction is not pending".to_string(),
            ));
        }

        let updated =
            queries::update_transaction_status(&mut db_tx, tx_id, TransactionStatus::Completed, None)
                .await?;
        audit::record_change(
            &mut db_tx,
            tx_id,
            ENTITY_TRANSACTION,
            "status",
            Some("pending".to_string()),
            Some("completed".to_string()),
            actor,
        )
        .await?;

        db_tx.commit().await?;

        tracing::info!(tx_id = %tx_id, user_id = %tx.user_id, "withdrawal approved");
        Ok(updated)
    }

    /// Admin rejection of a withdrawal: the pre-authorization hold is
    /// refunded in full.
    pub async fn reject_withdrawal(
        &self,
        tx_id: Uuid,
        note: &str,
        actor: &str,
    ) -> Result<WalletTransaction, AppError> {
        let mut db_tx = self.pool.begin().await?;

        let tx = queries::get_transaction_for_update(&mut db_tx, tx_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", tx_id)))?;

        if tx.tx_type != TransactionType::Withdrawal {
            return Err(AppError::InvalidState(
                "only withdrawal transactions can be rejected here".to_string(),
            ));
        }
        if tx.status != TransactionStatus::Pending {
            return Err(AppError::InvalidState(
                "transaction is not pending".to_string(),
            ));
        }

        let description = format!(
            "{} - rejected: {}",
            tx.description.clone().unwrap_or_default(),
            note
        );
        let updated = queries::update_transaction_status(
            &mut db_tx,
            tx_id,
            TransactionStatus::Failed,
            Some(&description),
        )
        .await?;
        audit::record_change(
            &mut db_tx,
            tx_id,
            ENTITY_TRANSACTION,
            "status",
            Some("pending".to_string()),
            Some("failed".to_string()),
            actor,
        )
        .await?;

        let wallet =
            queries::get_or_create_wallet(&mut db_tx, tx.user_id, &self.settings.deposit_code_prefix)
                .await?;
        let old_balance = wallet.balance.clone();
        let wallet =
            queries::apply_balance_delta(&mut db_tx, tx.user_id, &tx.amount, &BigDecimal::from(0))
                .await?;
        audit::record_change(
            &mut db_tx,
            tx.user_id,
            ENTITY_WALLET,
            "balance",
            Some(old_balance.to_string()),
            Some(wallet.balance.to_string()),
            actor,
        )
        .await?;

        db_tx.commit().await?;

        tracing::info!(tx_id = %tx_id, user_id = %tx.user_id, amount = %tx.amount, "withdrawal rejected, hold refunded");
        Ok(updated)
    }

    /// Purchase settles synchronously against the buyer: the amount leaves
    /// the spendable balance and is earmarked in pending_balance until the
    /// holdback window closes.
    pub async fn create_purchase(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
    ) -> Result<WalletTransaction, AppError> {
        validation::validate_positive_amount(&amount)
            .map_err(|e| AppError::InvalidInput(e.to_string()))?;

        let product = self.catalog.get_product(product_id).await?;

        let mut db_tx = self.pool.begin().await?;

        let wallet =
            queries::get_or_create_wallet(&mut db_tx, user_id, &self.settings.deposit_code_prefix)
                .await?;
        if wallet.available_balance() < amount {
            return Err(AppError::InsufficientFunds(
                "available balance is lower than the purchase amount".to_string(),
            ));
        }

        let old_balance = wallet.balance.clone();
        let old_pending = wallet.pending_balance.clone();
        let wallet =
            queries::apply_balance_delta(&mut db_tx, user_id, &-amount.clone(), &amount).await?;

        let tx = WalletTransaction::new_purchase(
            user_id,
            amount.clone(),
            Some(description.unwrap_or_else(|| format!("Purchase: {}", product.name))),
            product.seller_id,
            product.id,
            self.settings.holdback_days,
        );
        let saved = queries::insert_transaction(&mut db_tx, &tx).await?;

        audit::record_change(
            &mut db_tx,
            user_id,
            ENTITY_WALLET,
            "balance",
            Some(old_balance.to_string()),
            Some(wallet.balance.to_string()),
            &user_id.to_string(),
        )
        .await?;
        audit::record_change(
            &mut db_tx,
            user_id,
            ENTITY_WALLET,
            "pending_balance",
            Some(old_pending.to_string()),
            Some(wallet.pending_balance.to_string()),
            &user_id.to_string(),
        )
        .await?;

        db_tx.commit().await?;

        tracing::info!(
            user_id = %user_id,
            tx_id = %saved.id,
            product_id = %product_id,
            amount = %amount,
            "purchase created, funds held in escrow"
        );
        self.log_activity(ActivityEntry {
            user_id,
            action: "Purchase".to_string(),
            operation: "purchase".to_string(),
            description: format!("Purchase of {}: {}", product.name, amount),
            metadata: json!({
                "transaction_id": saved.id,
                "amount": amount.to_string(),
                "product_id": product.id,
                "product_name": product.name,
                "seller_id": product.seller_id,
            }),
        })
        .await;

        Ok(saved)
    }

    /// Releases the escrow hold of a purchase to its seller. Allowed once
    /// per purchase and only after the holdback deadline has passed.
    pub async fn settle_to_seller(
        &self,
        purchase_id: Uuid,
        actor: &str,
    ) -> Result<WalletTransaction, AppError> {
        let mut db_tx = self.pool.begin().await?;

        let purchase = queries::get_transaction_for_update(&mut db_tx, purchase_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Transaction {} not found", purchase_id)))?;

        if purchase.tx_type != TransactionType::Purchase {
            return Err(AppError::InvalidState(
                "only purchase transactions can be settled".to_string(),
            ));
        }
        if purchase.status != TransactionStatus::Completed {
            return Err(AppError::InvalidState(
                "purchase is not completed".to_string(),
            ));
        }
        let deadline = purchase.report_deadline.ok_or_else(|| {
            AppError::InvalidState("purchase has no report deadline".to_string())
        })?;
        if deadline > Utc::now() {
            return Err(AppError::NotYetEligible(format!(
                "holdback window runs until {}",
                deadline
            )));
        }
        if queries::find_transfer_for_purchase(&mut db_tx, purchase_id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateSettlement(format!(
                "purchase {} was already settled",
                purchase_id
            )));
        }

        let buyer_id = purchase.user_id;
        let seller_id = purchase
            .seller_id
            .ok_or_else(|| AppError::InvalidState("purchase has no seller".to_string()))?;

        // Lock wallet rows in user_id order; concurrent settlements touching
        // the same pair cannot deadlock.
        let prefix = &self.settings.deposit_code_prefix;
        let (buyer_wallet, seller_wallet) = if buyer_id <= seller_id {
            let buyer = queries::get_or_create_wallet(&mut db_tx, buyer_id, prefix).await?;
            let seller = queries::get_or_create_wallet(&mut db_tx, seller_id, prefix).await?;
            (buyer, seller)
        } else {
            let seller = queries::get_or_create_wallet(&mut db_tx, seller_id, prefix).await?;
            let buyer = queries::get_or_create_wallet(&mut db_tx, buyer_id, prefix).await?;
            (buyer, seller)
        };

        if buyer_wallet.pending_balance < purchase.amount {
            return Err(AppError::InsufficientFunds(
                "buyer pending balance is lower than the purchase amount".to_string(),
            ));
        }

        let old_buyer_pending = buyer_wallet.pending_balance.clone();
        let buyer_wallet = queries::apply_balance_delta(
            &mut db_tx,
            buyer_id,
            &BigDecimal::from(0),
            &-purchase.amount.clone(),
        )
        .await?;

        let old_seller_balance = seller_wallet.balance.clone();
        let seller_wallet = queries::apply_balance_delta(
            &mut db_tx,
            seller_id,
            &purchase.amount,
            &BigDecimal::from(0),
        )
        .await?;

        let transfer = WalletTransaction::new_transfer_to_seller(&purchase, seller_id);
        let saved = queries::insert_transaction(&mut db_tx, &transfer).await?;

        audit::record_change(
            &mut db_tx,
            buyer_id,
            ENTITY_WALLET,
            "pending_balance",
            Some(old_buyer_pending.to_string()),
            Some(buyer_wallet.pending_balance.to_string()),
            actor,
        )
        .await?;
        audit::record_change(
            &mut db_tx,
            seller_id,
            ENTITY_WALLET,
            "balance",
            Some(old_seller_balance.to_string()),
            Some(seller_wallet.balance.to_string()),
            actor,
        )
        .await?;

        db_tx.commit().await?;

        tracing::info!(
            purchase_id = %purchase_id,
            transfer_id = %saved.id,
            buyer_id = %buyer_id,
            seller_id = %seller_id,
            amount = %purchase.amount,
            "escrow released to seller"
        );
        self.log_activity(ActivityEntry {
            user_id: seller_id,
            action: "Settlement".to_string(),
            operation: "settle_to_seller".to_string(),
            description: format!(
                "Escrow of {} released to seller {} for purchase {}",
                purchase.amount, seller_id, purchase_id
            ),
            metadata: json!({
                "purchase_id": purchase_id,
                "transfer_id": saved.id,
                "amount": purchase.amount.to_string(),
                "actor": actor,
            }),
        })
        .await;

        Ok(saved)
    }

    pub async fn list_transactions(
        &self,
        user_id: Uuid,
        tx_type: Option<TransactionType>,
        status: Option<TransactionStatus>,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage, AppError> {
        let (page, page_size, limit, offset) = page_bounds(page, page_size);

        let transactions =
            queries::list_transactions(&self.pool, user_id, tx_type, status, limit, offset).await?;
        let total = queries::count_transactions(&self.pool, user_id, tx_type, status).await?;

        Ok(TransactionPage::new(transactions, total, page, page_size))
    }

    pub async fn list_pending(
        &self,
        tx_type: Option<TransactionType>,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage, AppError> {
        let (page, page_size, limit, offset) = page_bounds(page, page_size);

        let transactions = queries::list_pending(&self.pool, tx_type, limit, offset).await?;
        let total = queries::count_pending(&self.pool, tx_type).await?;

        Ok(TransactionPage::new(transactions, total, page, page_size))
    }

    pub async fn list_settlement_eligible(
        &self,
        page: i64,
        page_size: i64,
    ) -> Result<TransactionPage, AppError> {
        let (page, page_size, limit, offset) = page_bounds(page, page_size);
        let as_of = Utc::now();

        let transactions =
            queries::list_settlement_eligible(&self.pool, as_of, limit, offset).await?;
        let total = queries::count_settlement_eligible(&self.pool, as_of).await?;

        Ok(TransactionPage::new(transactions, total, page, page_size))
    }

    pub async fn audit_trail(
        &self,
        entity_id: Uuid,
        page: i64,
        page_size: i64,
    ) -> Result<Vec<AuditRecord>, AppError> {
        let (_, _, limit, offset) = page_bounds(page, page_size);
        let records = audit::list_for_entity(&self.pool, entity_id, limit, offset).await?;
        Ok(records)
    }

    async fn log_activity(&self, entry: ActivityEntry) {
        if let Err(e) = self.activity_log.record(entry).await {
            tracing::warn!(error = %e, "failed to record activity log entry");
        }
    }
}

fn page_bounds(page: i64, page_size: i64) -> (i64, i64, i64, i64) {
    let page = page.max(1);
    let page_size = page_size.clamp(1, MAX_PAGE_SIZE);
    // Saturating math: page is caller-supplied and may be absurdly large.
    let offset = page.saturating_sub(1).saturating_mul(page_size);
    (page, page_size, page_size, offset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_bounds_defaults_and_clamps() {
        assert_eq!(page_bounds(1, 20), (1, 20, 20, 0));
        assert_eq!(page_bounds(3, 20), (3, 20, 20, 40));
        assert_eq!(page_bounds(0, 20), (1, 20, 20, 0));
        assert_eq!(page_bounds(1, 0), (1, 1, 1, 0));
        assert_eq!(page_bounds(2, 500), (2, 100, 100, 100));
    }

    #[test]
    fn page_bounds_saturates_instead_of_overflowing() {
        let (page, _, _, offset) = page_bounds(i64::MAX, 100);
        assert_eq!(page, i64::MAX);
        assert_eq!(offset, i64::MAX);

        let (_, _, _, offset) = page_bounds(i64::MAX, 1);
        assert_eq!(offset, i64::MAX - 1);
    }
}
