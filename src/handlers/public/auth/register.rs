// handlers/public/auth/register.rs - POST /auth/register handler

use axum::extract::rejection::JsonRejection;
use axum::Json;

use super::{CredentialsRequest, UserInfo};
use crate::handlers::utils::json_body;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::UserService;

/// POST /auth/register - Create a user account
///
/// Input: `{ "username": "string", "password": "string" }`
///
/// Responds 201 with `{ "id", "username" }`, 400 with field errors for bad
/// credentials, or 409 when the username is taken.
pub async fn register_post(payload: Result<Json<CredentialsRequest>, JsonRejection>) -> ApiResult<UserInfo> {
    let request = json_body(payload)?;

    let user = UserService::new()
        .await?
        .register(&request.username, &request.password)
        .await?;

    Ok(ApiResponse::created(UserInfo::from(user)))
}
