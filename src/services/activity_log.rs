//! Best-effort activity log sink.
//!
//! Emission happens after the financial mutation commits and is never part
//! of the transactional boundary: a sink failure is logged and swallowed.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub user_id: Uuid,
    pub action: String,
    pub operation: String,
    pub description: String,
    pub metadata: serde_json::Value,
}

#[async_trait]
pub trait ActivityLog: Send + Sync {
    async fn record(&self, entry: ActivityEntry) -> anyhow::Result<()>;
}

/// Forwards entries to an external activity-log service.
#[derive(Clone)]
pub struct HttpActivityLog {
    client: reqwest::Client,
    url: String,
}

impl HttpActivityLog {
    pub fn new(url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("activity log http client");

        HttpActivityLog { client, url }
    }
}

#[async_trait]
impl ActivityLog for HttpActivityLog {
    async fn record(&self, entry: ActivityEntry) -> anyhow::Result<()> {
        let response = self.client.post(&self.url).json(&entry).send().await?;

        if !response.status().is_success() {
            anyhow::bail!("activity log returned status {}", response.status());
        }

        Ok(())
    }
}

/// Fallback sink used when no activity-log service is configured.
#[derive(Clone, Default)]
pub struct TracingActivityLog;

#[async_trait]
impl ActivityLog for TracingActivityLog {
    async fn record(&self, entry: ActivityEntry) -> anyhow::Result<()> {
        tracing::info!(
            user_id = %entry.user_id,
            action = %entry.action,
            operation = %entry.operation,
            description = %entry.description,
            "activity"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn tracing_sink_always_succeeds() {
        let sink = TracingActivityLog;
        let entry = ActivityEntry {
            user_id: Uuid::new_v4(),
            action: "Withdraw".to_string(),
            operation: "withdraw".to_string(),
            description: "Withdraw 100000 from wallet".to_string(),
            metadata: serde_json::json!({"amount": "100000"}),
        };

        assert!(sink.record(entry).await.is_ok());
    }

    #[tokio::test]
    async fn http_sink_posts_entry() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/activity")
            .with_status(201)
            .create_async()
            .await;

        let sink = HttpActivityLog::new(format!("{}/activity", server.url()));
        let entry = ActivityEntry {
            user_id: Uuid::new_v4(),
            action: "Purchase".to_string(),
            operation: "purchase".to_string(),
            description: "Purchase product".to_string(),
            metadata: serde_json::json!({}),
        };

        assert!(sink.record(entry).await.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn http_sink_reports_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/activity")
            .with_status(500)
            .create_async()
            .await;

        let sink = HttpActivityLog::new(format!("{}/activity", server.url()));
        let entry = ActivityEntry {
            user_id: Uuid::new_v4(),
            action: "Deposit".to_string(),
            operation: "deposit".to_string(),
            description: "Deposit request".to_string(),
            metadata: serde_json::json!({}),
        };

        assert!(sink.record(entry).await.is_err());
    }
}
