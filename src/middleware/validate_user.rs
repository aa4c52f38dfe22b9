use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::error::ApiError;
use crate::services::UserService;
use super::auth::AuthUser;

/// The requesting user, confirmed to exist in the users table
#[derive(Clone, Debug)]
pub struct ValidatedUser {
    pub id: Uuid,
    pub username: String,
}

/// Middleware that validates the user from JWT claims against the users table.
/// A token for a user that no longer exists is treated as no credentials at all.
pub async fn validate_user_middleware(mut request: Request, next: Next) -> Result<Response, ApiError> {
    let auth_user = request
        .extensions()
        .get::<AuthUser>()
        .cloned()
        .ok_or_else(|| ApiError::forbidden("Authentication credentials were not provided."))?;

    let user = UserService::new()
        .await?
        .find(auth_user.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!(
                "User validation failed: user '{}' (ID: {}) not found",
                auth_user.user,
                auth_user.user_id
            );
            ApiError::forbidden("User not found or inactive")
        })?;

    let validated_user = ValidatedUser {
        id: user.id,
        username: user.username,
    };

    tracing::debug!("User validation successful: {} ({})", validated_user.username, validated_user.id);

    request.extensions_mut().insert(validated_user);

    Ok(next.run(request).await)
}
