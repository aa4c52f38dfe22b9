// handlers/protected/mod.rs - Protected handlers (JWT authentication required)
//
// Every handler here runs behind jwt_auth_middleware and
// validate_user_middleware and receives the requester as
// `Extension<ValidatedUser>`. Reads and writes are scoped to that user:
// another user's habits and records answer 404, and attaching a record to
// another user's habit answers 403.

pub mod auth; // GET /auth/whoami
pub mod daily_records; // /daily-records, /daily-records/:id
pub mod habits; // /habits, /habits/:id
