// handlers/public/mod.rs - Public handlers (no authentication)
//
// Token acquisition: account registration and login.
pub mod auth;

pub use auth::*;
