use dotenvy::dotenv;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub admin_account_number: String,
    pub admin_account_name: String,
    pub admin_bank_name: String,
    pub admin_bank_code: String,
    pub holdback_days: i64,
    pub deposit_code_prefix: String,
    pub catalog_base_url: String,
    pub activity_log_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv().ok(); // Load .env file if present

        Ok(Config {
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            database_url: env::var("DATABASE_URL")?,
            admin_account_number: env::var("ADMIN_ACCOUNT_NUMBER")?,
            admin_account_name: env::var("ADMIN_ACCOUNT_NAME")?,
            admin_bank_name: env::var("ADMIN_BANK_NAME")?,
            admin_bank_code: env::var("ADMIN_BANK_CODE")?,
            holdback_days: env::var("HOLDBACK_DAYS")
                .unwrap_or_else(|_| "3".to_string())
                .parse()?,
            deposit_code_prefix: env::var("DEPOSIT_CODE_PREFIX")
                .unwrap_or_else(|_| "NAP".to_string()),
            catalog_base_url: env::var("CATALOG_BASE_URL")?,
            activity_log_url: env::var("ACTIVITY_LOG_URL").ok(),
        })
    }
}
