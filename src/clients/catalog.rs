//! HTTP client for the product catalog collaborator.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AppError;

/// Product details as served by the catalog service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductInfo {
    pub id: Uuid,
    pub name: String,
    pub seller_id: Uuid,
}

/// Resolves product ids to their catalog records. The wallet never owns
/// product data; purchases only need the product name and its seller.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get_product(&self, product_id: Uuid) -> Result<ProductInfo, AppError>;
}

#[derive(Clone)]
pub struct HttpCatalog {
    client: Client,
    base_url: String,
}

impl HttpCatalog {
    pub fn new(base_url: String) -> Self {
        // Builder failure means a broken TLS backend; fail at startup
        // rather than continue with a client that lost its timeout.
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("catalog http client");

        HttpCatalog { client, base_url }
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn get_product(&self, product_id: Uuid) -> Result<ProductInfo, AppError> {
        let url = format!(
            "{}/products/{}",
            self.base_url.trim_end_matches('/'),
            product_id
        );

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("catalog request failed: {}", e)))?;

        if response.status() == 404 {
            return Err(AppError::NotFound(format!(
                "Product {} not found",
                product_id
            )));
        }

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "catalog returned status {}",
                response.status()
            )));
        }

        response
            .json::<ProductInfo>()
            .await
            .map_err(|e| AppError::Upstream(format!("invalid catalog response: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_client_creation() {
        let client = HttpCatalog::new("http://catalog.internal".to_string());
        assert_eq!(client.base_url, "http://catalog.internal");
    }

    #[tokio::test]
    async fn test_get_product_with_mock() {
        let mut server = mockito::Server::new_async().await;

        let product_id = Uuid::new_v4();
        let seller_id = Uuid::new_v4();
        let body = format!(
            r#"{{"id":"{}","name":"Steam wallet 50k","seller_id":"{}"}}"#,
            product_id, seller_id
        );

        let _mock = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/products/.*".to_string()),
            )
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(body)
            .create_async()
            .await;

        let client = HttpCatalog::new(server.url());
        let product = client.get_product(product_id).await.unwrap();

        assert_eq!(product.id, product_id);
        assert_eq!(product.seller_id, seller_id);
        assert_eq!(product.name, "Steam wallet 50k");
    }

    #[tokio::test]
    async fn test_get_product_not_found() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/products/.*".to_string()),
            )
            .with_status(404)
            .create_async()
            .await;

        let client = HttpCatalog::new(server.url());
        let result = client.get_product(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_product_server_error() {
        let mut server = mockito::Server::new_async().await;

        let _mock = server
            .mock(
                "GET",
                mockito::Matcher::Regex(r"^/products/.*".to_string()),
            )
            .with_status(500)
            .create_async()
            .await;

        let client = HttpCatalog::new(server.url());
        let result = client.get_product(Uuid::new_v4()).await;

        assert!(matches!(result, Err(AppError::Upstream(_))));
    }
}
