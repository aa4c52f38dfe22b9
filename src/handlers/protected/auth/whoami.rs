use axum::Extension;
use serde::Serialize;
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult, ValidatedUser};

#[derive(Debug, Serialize)]
pub struct WhoamiResponse {
    pub id: Uuid,
    pub username: String,
}

/// GET /auth/whoami - The account behind the bearer token
pub async fn get(Extension(user): Extension<ValidatedUser>) -> ApiResult<WhoamiResponse> {
    Ok(ApiResponse::success(WhoamiResponse {
        id: user.id,
        username: user.username,
    }))
}
