// handlers/public/auth/mod.rs - Public authentication handlers

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::models::User;

pub mod login; // POST /auth/login - exchange credentials for a JWT
pub mod register; // POST /auth/register - create an account

pub use login::login_post as user_login;
pub use register::register_post as user_register;

/// Body shared by register and login. Missing fields read as empty and
/// fail validation like blank ones.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Public view of an account
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
        }
    }
}
