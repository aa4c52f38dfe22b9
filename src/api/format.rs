use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{DailyRecordDetail, HabitWithStats, RecordSummary};

/// Public wire format of a habit
#[derive(Debug, Clone, Serialize)]
pub struct HabitView {
    pub id: Uuid,
    /// Owner's username; ownership cannot be set through the API
    pub user: String,
    pub name: String,
    pub description: String,
    pub target: i32,
    pub unit: String,
    pub success: bool,
    pub total: Option<i64>,
    pub average: Option<f64>,
    pub best: Option<i32>,
    pub daily_records: Vec<RecordSummary>,
}

impl From<HabitWithStats> for HabitView {
    fn from(row: HabitWithStats) -> Self {
        let HabitWithStats {
            habit,
            username,
            total,
            average,
            best,
            records,
        } = row;

        Self {
            id: habit.id,
            user: username,
            name: habit.name,
            description: habit.description,
            target: habit.target,
            unit: habit.unit,
            success: habit.success,
            total,
            average,
            best,
            daily_records: records,
        }
    }
}

/// Public wire format of a daily record.
/// `target` and `unit` are copied from the parent habit at read time.
#[derive(Debug, Clone, Serialize)]
pub struct DailyRecordView {
    pub id: Uuid,
    pub habit: Uuid,
    pub date: NaiveDate,
    pub amount_achieved: i32,
    pub target: i32,
    pub unit: String,
}

impl From<DailyRecordDetail> for DailyRecordView {
    fn from(row: DailyRecordDetail) -> Self {
        Self {
            id: row.record.id,
            habit: row.record.habit_id,
            date: row.record.date,
            amount_achieved: row.record.amount_achieved,
            target: row.target,
            unit: row.unit,
        }
    }
}
