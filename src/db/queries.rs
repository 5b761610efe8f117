//! Ledger store: durable wallets and append-only transaction records.
//!
//! Mutating helpers take an open sqlx transaction so a balance adjustment,
//! its status change and the audit rows land in one unit of work. Wallet
//! rows are locked with FOR UPDATE before any check-then-write, which is
//! what serializes concurrent operations on the same account.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Result, Transaction as SqlxTransaction};
use uuid::Uuid;

use crate::db::models::{
    TransactionStatus, TransactionType, Wallet, WalletTransaction, deposit_code_for,
};

// --- Wallet queries ---

/// Returns the caller's wallet, creating it with zero balances on first
/// access. The returned row is locked for the remainder of the transaction.
pub async fn get_or_create_wallet(
    executor: &mut SqlxTransaction<'_, Postgres>,
    user_id: Uuid,
    deposit_code_prefix: &str,
) -> Result<Wallet> {
    let now = Utc::now();
    sqlx::query(
        r#"
        INSERT INTO wallets (user_id, balance, pending_balance, deposit_code, created_at, updated_at)
        VALUES ($1, 0, 0, $2, $3, $3)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(deposit_code_for(deposit_code_prefix, user_id))
    .bind(now)
    .execute(&mut **executor)
    .await?;

    sqlx::query_as::<_, Wallet>("SELECT * FROM wallets WHERE user_id = $1 FOR UPDATE")
        .bind(user_id)
        .fetch_one(&mut **executor)
        .await
}

/// Applies a signed adjustment to both balance columns and returns the
/// updated row. Callers must hold the row lock (get_or_create_wallet).
pub async fn apply_balance_delta(
    executor: &mut SqlxTransaction<'_, Postgres>,
    user_id: Uuid,
    delta_balance: &BigDecimal,
    delta_pending: &BigDecimal,
) -> Result<Wallet> {
    sqlx::query_as::<_, Wallet>(
        r#"
        UPDATE wallets
        SET balance = balance + $2,
            pending_balance = pending_balance + $3,
            updated_at = $4
        WHERE user_id = $1
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(delta_balance)
    .bind(delta_pending)
    .bind(Utc::now())
    .fetch_one(&mut **executor)
    .await
}

// --- Transaction queries ---

pub async fn insert_transaction(
    executor: &mut SqlxTransaction<'_, Postgres>,
    tx: &WalletTransaction,
) -> Result<WalletTransaction> {
    sqlx::query_as::<_, WalletTransaction>(
        r#"
        INSERT INTO wallet_transactions (
            id, user_id, tx_type, status, amount, description,
            seller_id, product_id, related_transaction_id, report_deadline,
            admin_account_number, admin_account_name, admin_bank_name,
            withdrawal_account_number, withdrawal_account_name, withdrawal_bank_name,
            proof_image_url, created_at, updated_at
        ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10,
                  $11, $12, $13, $14, $15, $16, $17, $18, $19)
        RETURNING *
        "#,
    )
    .bind(tx.id)
    .bind(tx.user_id)
    .bind(tx.tx_type)
    .bind(tx.status)
    .bind(&tx.amount)
    .bind(&tx.description)
    .bind(tx.seller_id)
    .bind(tx.product_id)
    .bind(tx.related_transaction_id)
    .bind(tx.report_deadline)
    .bind(&tx.admin_account_number)
    .bind(&tx.admin_account_name)
    .bind(&tx.admin_bank_name)
    .bind(&tx.withdrawal_account_number)
    .bind(&tx.withdrawal_account_name)
    .bind(&tx.withdrawal_bank_name)
    .bind(&tx.proof_image_url)
    .bind(tx.created_at)
    .bind(tx.updated_at)
    .fetch_one(&mut **executor)
    .await
}

/// Locks the transaction row so concurrent approvals of the same record
/// serialize on the status check.
pub async fn get_transaction_for_update(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
) -> Result<Option<WalletTransaction>> {
    sqlx::query_as::<_, WalletTransaction>(
        "SELECT * FROM wallet_transactions WHERE id = $1 FOR UPDATE",
    )
    .bind(id)
    .fetch_optional(&mut **executor)
    .await
}

pub async fn update_transaction_status(
    executor: &mut SqlxTransaction<'_, Postgres>,
    id: Uuid,
    status: TransactionStatus,
    description: Option<&str>,
) -> Result<WalletTransaction> {
    sqlx::query_as::<_, WalletTransaction>(
        r#"
        UPDATE wallet_transactions
        SET status = $2,
            description = COALESCE($3, description),
            updated_at = $4
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(status)
    .bind(description)
    .bind(Utc::now())
    .fetch_one(&mut **executor)
    .await
}

pub async fn find_transfer_for_purchase(
    executor: &mut SqlxTransaction<'_, Postgres>,
    purchase_id: Uuid,
) -> Result<Option<WalletTransaction>> {
    sqlx::query_as::<_, WalletTransaction>(
        r#"
        SELECT * FROM wallet_transactions
        WHERE related_transaction_id = $1 AND tx_type = 'transfer_to_seller'
        "#,
    )
    .bind(purchase_id)
    .fetch_optional(&mut **executor)
    .await
}

// --- Read-side projections ---

/// Newest-first history for one user, optionally narrowed by type/status.
/// Ties on created_at break on id so pagination stays stable.
pub async fn list_transactions(
    pool: &PgPool,
    user_id: Uuid,
    tx_type: Option<TransactionType>,
    status: Option<TransactionStatus>,
    limit: i64,
    offset: i64,
) -> Result<Vec<WalletTransaction>> {
    sqlx::query_as::<_, WalletTransaction>(
        r#"
        SELECT * FROM wallet_transactions
        WHERE user_id = $1
          AND ($2::transaction_type IS NULL OR tx_type = $2)
          AND ($3::transaction_status IS NULL OR status = $3)
        ORDER BY created_at DESC, id DESC
        LIMIT $4 OFFSET $5
        "#,
    )
    .bind(user_id)
    .bind(tx_type)
    .bind(status)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_transactions(
    pool: &PgPool,
    user_id: Uuid,
    tx_type: Option<TransactionType>,
    status: Option<TransactionStatus>,
) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM wallet_transactions
        WHERE user_id = $1
          AND ($2::transaction_type IS NULL OR tx_type = $2)
          AND ($3::transaction_status IS NULL OR status = $3)
        "#,
    )
    .bind(user_id)
    .bind(tx_type)
    .bind(status)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Admin queue of transactions awaiting approval.
pub async fn list_pending(
    pool: &PgPool,
    tx_type: Option<TransactionType>,
    limit: i64,
    offset: i64,
) -> Result<Vec<WalletTransaction>> {
    sqlx::query_as::<_, WalletTransaction>(
        r#"
        SELECT * FROM wallet_transactions
        WHERE status = 'pending'
          AND ($1::transaction_type IS NULL OR tx_type = $1)
        ORDER BY created_at DESC, id DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(tx_type)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_pending(pool: &PgPool, tx_type: Option<TransactionType>) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM wallet_transactions
        WHERE status = 'pending'
          AND ($1::transaction_type IS NULL OR tx_type = $1)
        "#,
    )
    .bind(tx_type)
    .fetch_one(pool)
    .await?;

    Ok(count)
}

/// Completed purchases past their holdback deadline with no linked
/// transfer, oldest-due first. The pull-based settlement queue.
pub async fn list_settlement_eligible(
    pool: &PgPool,
    as_of: DateTime<Utc>,
    limit: i64,
    offset: i64,
) -> Result<Vec<WalletTransaction>> {
    sqlx::query_as::<_, WalletTransaction>(
        r#"
        SELECT t.* FROM wallet_transactions t
        WHERE t.tx_type = 'purchase'
          AND t.status = 'completed'
          AND t.report_deadline IS NOT NULL
          AND t.report_deadline <= $1
          AND NOT EXISTS (
              SELECT 1 FROM wallet_transactions x
              WHERE x.related_transaction_id = t.id
                AND x.tx_type = 'transfer_to_seller'
          )
        ORDER BY t.report_deadline ASC, t.id ASC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(as_of)
    .bind(limit)
    .bind(offset)
    .fetch_all(pool)
    .await
}

pub async fn count_settlement_eligible(pool: &PgPool, as_of: DateTime<Utc>) -> Result<i64> {
    let (count,): (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM wallet_transactions t
        WHERE t.tx_type = 'purchase'
          AND t.status = 'completed'
          AND t.report_deadline IS NOT NULL
          AND t.report_deadline <= $1
          AND NOT EXISTS (
              SELECT 1 FROM wallet_transactions x
              WHERE x.related_transaction_id = t.id
                AND x.tx_type = 'transfer_to_seller'
          )
        "#,
    )
    .bind(as_of)
    .fetch_one(pool)
    .await?;

    Ok(count)
}
