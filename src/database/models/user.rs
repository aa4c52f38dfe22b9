use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `users` table; responses use `UserInfo`, never this.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}
