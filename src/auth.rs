//! Request identity extractors.
//!
//! Authentication itself lives in the upstream gateway; it forwards the
//! verified identity as `x-user-id` / `x-user-role` headers and this
//! service only enforces the role gate for admin operations.

use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub role: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Unauthorized("missing x-user-id header".to_string()))?;

        let user_id = Uuid::parse_str(raw_id)
            .map_err(|_| AppError::Unauthorized("malformed x-user-id header".to_string()))?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("user")
            .to_string();

        Ok(AuthUser { user_id, role })
    }
}

/// Admin-gated identity. Rejects any caller whose forwarded role is not
/// `admin`.
#[derive(Debug, Clone)]
pub struct AdminUser(pub AuthUser);

#[async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;

        if user.role != ADMIN_ROLE {
            return Err(AppError::Unauthorized("admin role required".to_string()));
        }

        Ok(AdminUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with_headers(headers: &[(&str, &str)]) -> Parts {
        let mut builder = Request::builder().uri("/wallet/balance");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        let (parts, ()) = builder.body(()).unwrap().into_parts();
        parts
    }

    #[tokio::test]
    async fn extracts_user_from_headers() {
        let user_id = Uuid::new_v4();
        let mut parts = parts_with_headers(&[
            (USER_ID_HEADER, &user_id.to_string()),
            (USER_ROLE_HEADER, "seller"),
        ]);

        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.user_id, user_id);
        assert_eq!(user.role, "seller");
    }

    #[tokio::test]
    async fn defaults_role_to_user() {
        let user_id = Uuid::new_v4();
        let mut parts = parts_with_headers(&[(USER_ID_HEADER, &user_id.to_string())]);

        let user = AuthUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(user.role, "user");
    }

    #[tokio::test]
    async fn rejects_missing_user_id() {
        let mut parts = parts_with_headers(&[]);

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn rejects_malformed_user_id() {
        let mut parts = parts_with_headers(&[(USER_ID_HEADER, "not-a-uuid")]);

        let result = AuthUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn admin_gate_rejects_non_admin() {
        let user_id = Uuid::new_v4();
        let mut parts = parts_with_headers(&[
            (USER_ID_HEADER, &user_id.to_string()),
            (USER_ROLE_HEADER, "seller"),
        ]);

        let result = AdminUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn admin_gate_accepts_admin() {
        let user_id = Uuid::new_v4();
        let mut parts = parts_with_headers(&[
            (USER_ID_HEADER, &user_id.to_string()),
            (USER_ROLE_HEADER, "admin"),
        ]);

        let admin = AdminUser::from_request_parts(&mut parts, &()).await.unwrap();
        assert_eq!(admin.0.user_id, user_id);
    }
}
