//! User-facing wallet endpoints.

use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use bigdecimal::BigDecimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::auth::AuthUser;
use crate::db::models::{TransactionStatus, TransactionType};
use crate::error::AppError;
use crate::services::wallet::DEFAULT_PAGE_SIZE;

#[derive(Debug, Deserialize)]
pub struct DepositRequest {
    pub amount: BigDecimal,
    pub description: Option<String>,
    pub proof_image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WithdrawRequest {
    pub amount: BigDecimal,
    pub description: Option<String>,
    pub account_number: String,
    pub account_name: String,
    pub bank_name: String,
}

#[derive(Debug, Deserialize)]
pub struct PurchaseRequest {
    pub product_id: Uuid,
    pub amount: BigDecimal,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(rename = "type")]
    pub tx_type: Option<TransactionType>,
    pub status: Option<TransactionStatus>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub async fn get_balance(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let balance = state.wallet.get_balance(user.user_id).await?;
    Ok(Json(balance))
}

pub async fn deposit_info(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<impl IntoResponse, AppError> {
    let info = state.wallet.deposit_info(user.user_id).await?;
    Ok(Json(info))
}

pub async fn request_deposit(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<DepositRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .wallet
        .request_deposit(user.user_id, req.amount, req.description, req.proof_image_url)
        .await?;
    Ok(Json(tx))
}

pub async fn request_withdrawal(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<WithdrawRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .wallet
        .request_withdrawal(
            user.user_id,
            req.amount,
            req.description,
            req.account_number,
            req.account_name,
            req.bank_name,
        )
        .await?;
    Ok(Json(tx))
}

pub async fn create_purchase(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<PurchaseRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .wallet
        .create_purchase(user.user_id, req.product_id, req.amount, req.description)
        .await?;
    Ok(Json(tx))
}

pub async fn list_transactions(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let history = state
        .wallet
        .list_transactions(user.user_id, query.tx_type, query.status, page, page_size)
        .await?;
    Ok(Json(history))
}
