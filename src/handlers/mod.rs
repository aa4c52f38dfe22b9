// handlers/mod.rs - Two-tier handler layout
//
// Public (no auth) → Protected (JWT auth + validated user)
pub mod protected; // Bearer JWT required (/auth/whoami, /habits, /daily-records)
pub mod public; // No authentication required (/auth/register, /auth/login)
pub mod utils;
