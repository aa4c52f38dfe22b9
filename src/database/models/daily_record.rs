use chrono::NaiveDate;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A row from the `daily_records` table.
#[derive(Debug, Clone, FromRow)]
pub struct DailyRecord {
    pub id: Uuid,
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub amount_achieved: i32,
}

/// A record joined with the habit fields it is read with.
#[derive(Debug, Clone, FromRow)]
pub struct DailyRecordDetail {
    #[sqlx(flatten)]
    pub record: DailyRecord,
    pub target: i32,
    pub unit: String,
    pub owner_id: Uuid,
}

/// The reduced record shape nested under a habit.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct RecordSummary {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub habit_id: Uuid,
    pub date: NaiveDate,
    pub amount_achieved: i32,
}
