use axum::extract::rejection::JsonRejection;
use axum::extract::Path;
use axum::{Extension, Json};
use serde_json::Value;

use crate::api::{DailyRecordPatch, DailyRecordView};
use crate::handlers::utils::{json_body, parse_id};
use crate::middleware::{ApiResponse, ApiResult, ValidatedUser};
use crate::services::DailyRecordService;

/// GET /daily-records/:id
pub async fn get(
    Extension(user): Extension<ValidatedUser>,
    Path(id): Path<String>,
) -> ApiResult<DailyRecordView> {
    let id = parse_id(&id, "Daily record")?;
    let record = DailyRecordService::new().await?.get(user.id, id).await?;
    Ok(ApiResponse::success(record.into()))
}

/// PUT /daily-records/:id
pub async fn put(
    Extension(user): Extension<ValidatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<DailyRecordView> {
    update(user, id, payload, false).await
}

/// PATCH /daily-records/:id
pub async fn patch(
    Extension(user): Extension<ValidatedUser>,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<DailyRecordView> {
    update(user, id, payload, true).await
}

/// DELETE /daily-records/:id
pub async fn delete(
    Extension(user): Extension<ValidatedUser>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let id = parse_id(&id, "Daily record")?;
    DailyRecordService::new().await?.delete(user.id, id).await?;
    Ok(ApiResponse::no_content())
}

async fn update(
    user: ValidatedUser,
    id: String,
    payload: Result<Json<Value>, JsonRejection>,
    partial: bool,
) -> ApiResult<DailyRecordView> {
    let id = parse_id(&id, "Daily record")?;
    let body = json_body(payload)?;
    let patch = DailyRecordPatch::from_json(&body, partial)?;

    let record = DailyRecordService::new().await?.update(user.id, id, patch).await?;
    Ok(ApiResponse::success(record.into()))
}
