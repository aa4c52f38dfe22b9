// handlers/public/auth/login.rs - POST /auth/login handler

use axum::extract::rejection::JsonRejection;
use axum::Json;
use serde::Serialize;

use super::{CredentialsRequest, UserInfo};
use crate::auth::{generate_jwt, Claims};
use crate::error::ApiError;
use crate::handlers::utils::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: UserInfo,
}

/// POST /auth/login - Authenticate user and receive JWT token
///
/// Input: `{ "username": "string", "password": "string" }`
///
/// The token goes in `Authorization: Bearer <token>` on every protected route.
pub async fn login_post(payload: Result<Json<CredentialsRequest>, JsonRejection>) -> ApiResult<LoginResponse> {
    let request = json_body(payload)?;

    let user = UserService::new()
        .await?
        .authenticate(&request.username, &request.password)
        .await?
        .ok_or_else(|| {
            tracing::warn!("Failed login for username '{}'", request.username.trim());
            ApiError::unauthorized("Invalid username or password")
        })?;

    let claims = Claims::new(user.username.clone(), user.id);
    let token = generate_jwt(&claims)?;

    tracing::info!("User {} logged in", user.id);

    Ok(ApiResponse::success(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: claims.expires_in(),
        user: UserInfo::from(user),
    }))
}
