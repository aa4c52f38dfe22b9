use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::api::ValidationErrors;
use crate::auth::password::{hash_password, verify_password};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::User;
use crate::services::ServiceError;

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Account registration and credential checks
pub struct UserService {
    pool: PgPool,
}

impl UserService {
    pub async fn new() -> Result<Self, ServiceError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, ServiceError> {
        let username = username.trim();
        validate_credentials(username, password)?;

        let password_hash = hash_password(password).map_err(|e| {
            warn!("Password hashing failed: {}", e);
            ServiceError::Validation(ValidationErrors::single("password", "Password could not be processed."))
        })?;

        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(&password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let err = DatabaseError::Sqlx(e);
            if err.unique_violation().is_some() {
                ServiceError::Conflict(format!("Username '{}' is already taken", username))
            } else {
                ServiceError::Database(err)
            }
        })?;

        info!("Registered user {} ({})", user.username, user.id);
        Ok(user)
    }

    /// The user for these credentials, or `None` when they do not match
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, ServiceError> {
        let Some(user) = self.find_by_username(username.trim()).await? else {
            return Ok(None);
        };

        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(Some(user)),
            Ok(false) => Ok(None),
            Err(e) => {
                warn!("Stored password hash for user {} is unreadable: {}", user.id, e);
                Ok(None)
            }
        }
    }

    pub async fn find(&self, id: Uuid) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ServiceError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

/// Username: 3-150 of letters, digits and @ . + - _; password: at least 8 characters
pub fn validate_credentials(username: &str, password: &str) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let length = username.chars().count();
    if username.is_empty() {
        errors.add("username", "This field may not be blank.");
    } else if length < 3 {
        errors.add("username", "Username must be at least 3 characters.");
    } else if length > USERNAME_MAX_LENGTH {
        errors.add(
            "username",
            format!("Ensure this field has no more than {} characters.", USERNAME_MAX_LENGTH),
        );
    } else if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        errors.add(
            "username",
            "Username may contain only letters, numbers, and @/./+/-/_ characters.",
        );
    }

    if password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.add(
            "password",
            format!("Password must be at least {} characters.", PASSWORD_MIN_LENGTH),
        );
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
