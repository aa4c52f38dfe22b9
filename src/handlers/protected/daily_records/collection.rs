use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::{Extension, Json};
use serde_json::Value;

use crate::api::{DailyRecordView, NewDailyRecord};
use crate::handlers::utils::{json_body, query_params};
use crate::middleware::{ApiResponse, ApiResult, ValidatedUser};
use crate::services::{DailyRecordService, RecordFilter};

/// GET /daily-records - Records on the requester's habits
///
/// Optional query: `habit=<id>`, `from=YYYY-MM-DD`, `to=YYYY-MM-DD` (inclusive).
pub async fn get(
    Extension(user): Extension<ValidatedUser>,
    query: Result<Query<RecordFilter>, QueryRejection>,
) -> ApiResult<Vec<DailyRecordView>> {
    let filter = query_params(query)?;

    let records = DailyRecordService::new().await?.list(user.id, &filter).await?;
    Ok(ApiResponse::success(records.into_iter().map(DailyRecordView::from).collect()))
}

/// POST /daily-records - Log an amount for one habit on one date
///
/// Input: `{ "habit": "<habit id>", "date": "YYYY-MM-DD", "amount_achieved": 0 }`
pub async fn post(
    Extension(user): Extension<ValidatedUser>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<DailyRecordView> {
    let body = json_body(payload)?;
    let input = NewDailyRecord::from_json(&body)?;

    let record = DailyRecordService::new().await?.create(user.id, input).await?;
    Ok(ApiResponse::created(record.into()))
}
