use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::{Extension, Json};
use serde_json::Value;

use crate::api::{HabitPatch, HabitView};
use crate::handlers::utils::{json_body, parse_id};
use crate::middleware::{ApiResponse, ApiResult, ValidatedUser};
use crate::services::HabitService;

/// GET /habits/:id
pub async fn get(
    Extension(user): Extension<ValidatedUser>,
    Path(id): Path<String>,
) -> ApiResult<HabitView> {
    let id = parse_id(&id, "Habit")?;
    let habit = HabitService::new().await?.get(user.id, id).await?;
    Ok(ApiResponse::success(habit.into()))
}

/// PUT /habits/:id - Replace every writable field
pub async fn put(
    Extension(user): Extension<ValidatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<HabitView> {
    update(user, id, payload, false).await
}

/// PATCH /habits/:id - Update the fields present in the body
pub async fn patch(
    Extension(user): Extension<ValidatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<HabitView> {
    update(user, id, payload, true).await
}

/// DELETE /habits/:id - Removes the habit and all of its records
pub async fn delete(
    Extension(user): Extension<ValidatedUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "Habit")?;
    HabitService::new().await?.delete(user.id, id).await?;
    Ok(ApiResponse::no_content())
}

async fn update(
    user: ValidatedUser,
    id: String,
    payload: Result<Json<Value>, JsonRejection>,
    partial: bool,
) -> ApiResult<HabitView> {
    let id = parse_id(&id, "Habit")?;
    let body = json_body(payload)?;
    let patch = HabitPatch::from_json(&body, partial)?;

    let habit = HabitService::new().await?.update(user.id, id, patch).await?;
    Ok(ApiResponse::success(habit.into()))
}
