use bigdecimal::BigDecimal;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Purchase,
    TransferToSeller,
    // Declared for report/refund flows; no operation produces it yet.
    Refund,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "transaction_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Failed,
    Cancelled,
}

/// One wallet per user, created lazily on first access and never deleted.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Wallet {
    pub user_id: Uuid,
    pub balance: BigDecimal,
    pub pending_balance: BigDecimal,
    pub deposit_code: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    /// Spendable amount: balance minus funds held in escrow.
    pub fn available_balance(&self) -> BigDecimal {
        &self.balance - &self.pending_balance
    }
}

/// Stable per-user bank-transfer memo, generated once at wallet creation.
pub fn deposit_code_for(prefix: &str, user_id: Uuid) -> String {
    let hex = user_id.simple().to_string();
    format!("{}{}", prefix, hex[..8].to_uppercase())
}

/// Immutable financial record. Rows are never deleted; only status,
/// description and updated_at change after insert.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct WalletTransaction {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub status: TransactionStatus,
    pub amount: BigDecimal,
    pub description: Option<String>,
    pub seller_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub related_transaction_id: Option<Uuid>,
    pub report_deadline: Option<DateTime<Utc>>,
    pub admin_account_number: Option<String>,
    pub admin_account_name: Option<String>,
    pub admin_bank_name: Option<String>,
    pub withdrawal_account_number: Option<String>,
    pub withdrawal_account_name: Option<String>,
    pub withdrawal_bank_name: Option<String>,
    pub proof_image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WalletTransaction {
    fn base(user_id: Uuid, tx_type: TransactionType, amount: BigDecimal) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            tx_type,
            status: TransactionStatus::Pending,
            amount,
            description: None,
            seller_id: None,
            product_id: None,
            related_transaction_id: None,
            report_deadline: None,
            admin_account_number: None,
            admin_account_name: None,
            admin_bank_name: None,
            withdrawal_account_number: None,
            withdrawal_account_name: None,
            withdrawal_bank_name: None,
            proof_image_url: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn new_deposit(
        user_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
        proof_image_url: Option<String>,
    ) -> Self {
        let mut tx = Self::base(user_id, TransactionType::Deposit, amount);
        tx.description = Some(description.unwrap_or_else(|| "Wallet deposit".to_string()));
        tx.proof_image_url = proof_image_url;
        tx
    }

    pub fn new_withdrawal(
        user_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
        account_number: String,
        account_name: String,
        bank_name: String,
    ) -> Self {
        let mut tx = Self::base(user_id, TransactionType::Withdrawal, amount);
        tx.description = Some(description.unwrap_or_else(|| "Wallet withdrawal".to_string()));
        tx.withdrawal_account_number = Some(account_number);
        tx.withdrawal_account_name = Some(account_name);
        tx.withdrawal_bank_name = Some(bank_name);
        tx
    }

    /// Purchases settle against the buyer synchronously; the escrow hold is
    /// released later through the settlement path.
    pub fn new_purchase(
        user_id: Uuid,
        amount: BigDecimal,
        description: Option<String>,
        seller_id: Uuid,
        product_id: Uuid,
        holdback_days: i64,
    ) -> Self {
        let mut tx = Self::base(user_id, TransactionType::Purchase, amount);
        tx.status = TransactionStatus::Completed;
        tx.description = description;
        tx.seller_id = Some(seller_id);
        tx.product_id = Some(product_id);
        tx.report_deadline = Some(tx.created_at + Duration::days(holdback_days));
        tx
    }

    pub fn new_transfer_to_seller(purchase: &WalletTransaction, seller_id: Uuid) -> Self {
        let mut tx = Self::base(seller_id, TransactionType::TransferToSeller, purchase.amount.clone());
        tx.status = TransactionStatus::Completed;
        tx.description = Some(format!("Funds received from purchase {}", purchase.id));
        tx.seller_id = Some(seller_id);
        tx.product_id = purchase.product_id;
        tx.related_transaction_id = Some(purchase.id);
        tx
    }
}

/// Paginated envelope returned by every listing endpoint.
#[derive(Debug, Serialize, Deserialize)]
pub struct TransactionPage {
    pub transactions: Vec<WalletTransaction>,
    pub total_count: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl TransactionPage {
    pub fn new(
        transactions: Vec<WalletTransaction>,
        total_count: i64,
        page: i64,
        page_size: i64,
    ) -> Self {
        let total_pages = if total_count == 0 {
            0
        } else {
            (total_count + page_size - 1) / page_size
        };
        Self {
            transactions,
            total_count,
            page,
            page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn available_balance_subtracts_pending() {
        let wallet = Wallet {
            user_id: Uuid::new_v4(),
            balance: BigDecimal::from_str("1000000").unwrap(),
            pending_balance: BigDecimal::from_str("300000").unwrap(),
            deposit_code: "NAP0000000A".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        assert_eq!(
            wallet.available_balance(),
            BigDecimal::from_str("700000").unwrap()
        );
    }

    #[test]
    fn deposit_code_is_stable_and_prefixed() {
        let user_id = Uuid::new_v4();
        let code = deposit_code_for("NAP", user_id);

        assert!(code.starts_with("NAP"));
        assert_eq!(code.len(), 11);
        assert_eq!(code, deposit_code_for("NAP", user_id));
    }

    #[test]
    fn new_deposit_starts_pending_with_default_description() {
        let tx = WalletTransaction::new_deposit(
            Uuid::new_v4(),
            BigDecimal::from(500_000),
            None,
            None,
        );

        assert_eq!(tx.tx_type, TransactionType::Deposit);
        assert_eq!(tx.status, TransactionStatus::Pending);
        assert_eq!(tx.description.as_deref(), Some("Wallet deposit"));
        assert!(tx.report_deadline.is_none());
    }

    #[test]
    fn new_purchase_is_completed_with_deadline() {
        let tx = WalletTransaction::new_purchase(
            Uuid::new_v4(),
            BigDecimal::from(300_000),
            Some("Buy: test product".to_string()),
            Uuid::new_v4(),
            Uuid::new_v4(),
            3,
        );

        assert_eq!(tx.status, TransactionStatus::Completed);
        let deadline = tx.report_deadline.expect("purchase sets a deadline");
        assert_eq!(deadline, tx.created_at + Duration::days(3));
    }

    #[test]
    fn transfer_links_back_to_purchase() {
        let seller = Uuid::new_v4();
        let purchase = WalletTransaction::new_purchase(
            Uuid::new_v4(),
            BigDecimal::from(300_000),
            None,
            seller,
            Uuid::new_v4(),
            3,
        );
        let transfer = WalletTransaction::new_transfer_to_seller(&purchase, seller);

        assert_eq!(transfer.tx_type, TransactionType::TransferToSeller);
        assert_eq!(transfer.status, TransactionStatus::Completed);
        assert_eq!(transfer.user_id, seller);
        assert_eq!(transfer.related_transaction_id, Some(purchase.id));
        assert_eq!(transfer.amount, purchase.amount);
    }

    #[test]
    fn page_math_rounds_up() {
        let page = TransactionPage::new(Vec::new(), 41, 1, 20);
        assert_eq!(page.total_pages, 3);

        let empty = TransactionPage::new(Vec::new(), 0, 1, 20);
        assert_eq!(empty.total_pages, 0);
    }

    #[test]
    fn type_serializes_snake_case() {
        let json = serde_json::to_string(&TransactionType::TransferToSeller).unwrap();
        assert_eq!(json, r#""transfer_to_seller""#);

        let parsed: TransactionStatus = serde_json::from_str(r#""pending""#).unwrap();
        assert_eq!(parsed, TransactionStatus::Pending);
    }
}
