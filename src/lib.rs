pub mod auth;
pub mod clients;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod services;
pub mod validation;

use axum::{
    Router,
    routing::{get, post},
};

use crate::services::WalletService;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub wallet: WalletService,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/wallet/balance", get(handlers::wallet::get_balance))
        .route("/wallet/deposit-info", get(handlers::wallet::deposit_info))
        .route("/wallet/deposit", post(handlers::wallet::request_deposit))
        .route("/wallet/withdraw", post(handlers::wallet::request_withdrawal))
        .route("/wallet/purchase", post(handlers::wallet::create_purchase))
        .route(
            "/wallet/transactions",
            get(handlers::wallet::list_transactions),
        )
        .route(
            "/admin/pending-transactions",
            get(handlers::admin::pending_transactions),
        )
        .route(
            "/admin/pending-transfers",
            get(handlers::admin::pending_transfers),
        )
        .route(
            "/admin/transactions/:id/approve-deposit",
            post(handlers::admin::approve_deposit),
        )
        .route(
            "/admin/transactions/:id/reject-deposit",
            post(handlers::admin::reject_deposit),
        )
        .route(
            "/admin/transactions/:id/approve-withdrawal",
            post(handlers::admin::approve_withdrawal),
        )
        .route(
            "/admin/transactions/:id/reject-withdrawal",
            post(handlers::admin::reject_withdrawal),
        )
        .route(
            "/admin/transactions/:id/transfer-to-seller",
            post(handlers::admin::transfer_to_seller),
        )
        .route(
            "/admin/transactions/:id/audit",
            get(handlers::admin::audit_trail),
        )
        .with_state(state)
}
