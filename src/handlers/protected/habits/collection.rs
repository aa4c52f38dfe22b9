use axum::extract::rejection::JsonRejection;
use axum::{Extension, Json};
use serde_json::Value;

use crate::api::{HabitView, NewHabit};
use crate::handlers::utils::json_body;
use crate::middleware::{ApiResponse, ApiResult, ValidatedUser};
use crate::services::HabitService;

/// GET /habits - The requester's habits with aggregates and nested records
pub async fn get(Extension(user): Extension<ValidatedUser>) -> ApiResult<Vec<HabitView>> {
    let habits = HabitService::new().await?.list(user.id).await?;
    Ok(ApiResponse::success(habits.into_iter().map(HabitView::from).collect()))
}

/// POST /habits - Create a habit owned by the requester
///
/// Input: `{ "name", "description", "target", "unit" }`. Any `user`,
/// `success` or aggregate fields in the body are ignored.
pub async fn post(
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<HabitView> {
    let body = json_body(payload)?;
    let input = NewHabit::from_json(&body)?;

    let habit = HabitService::new().await?.create(user.id, input).await?;
    Ok(ApiResponse::created(habit.into()))
}
