//! Admin queues and approval endpoints. All of these require the forwarded
//! `admin` role.

use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;
use crate::auth::AdminUser;
use crate::db::models::TransactionType;
use crate::error::AppError;
use crate::services::wallet::DEFAULT_PAGE_SIZE;

#[derive(Debug, Deserialize)]
pub struct RejectRequest {
    pub note: String,
}

#[derive(Debug, Deserialize)]
pub struct QueueQuery {
    #[serde(rename = "type")]
    pub tx_type: Option<TransactionType>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct Pagination {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

pub async fn approve_deposit(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .wallet
        .approve_deposit(id, &admin.0.user_id.to_string())
        .await?;
    Ok(Json(tx))
}

pub async fn reject_deposit(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .wallet
        .reject_deposit(id, &req.note, &admin.0.user_id.to_string())
        .await?;
    Ok(Json(tx))
}

pub async fn approve_withdrawal(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .wallet
        .approve_withdrawal(id, &admin.0.user_id.to_string())
        .await?;
    Ok(Json(tx))
}

pub async fn reject_withdrawal(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(req): Json<RejectRequest>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .wallet
        .reject_withdrawal(id, &req.note, &admin.0.user_id.to_string())
        .await?;
    Ok(Json(tx))
}

pub async fn transfer_to_seller(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let tx = state
        .wallet
        .settle_to_seller(id, &admin.0.user_id.to_string())
        .await?;
    Ok(Json(tx))
}

pub async fn pending_transactions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<QueueQuery>,
) -> Result<impl IntoResponse, AppError> {
    let page = query.page.unwrap_or(1);
    let page_size = query.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let queue = state
        .wallet
        .list_pending(query.tx_type, page, page_size)
        .await?;
    Ok(Json(queue))
}

pub async fn pending_transfers(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let page = pagination.page.unwrap_or(1);
    let page_size = pagination.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let queue = state
        .wallet
        .list_settlement_eligible(page, page_size)
        .await?;
    Ok(Json(queue))
}

pub async fn audit_trail(
    State(state): State<AppState>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
    Query(pagination): Query<Pagination>,
) -> Result<impl IntoResponse, AppError> {
    let page = pagination.page.unwrap_or(1);
    let page_size = pagination.page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let records = state.wallet.audit_trail(id, page, page_size).await?;
    Ok(Json(records))
}
