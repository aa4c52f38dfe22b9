use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::daily_record::RecordSummary;

/// A row from the `habits` table.
#[derive(Debug, Clone, FromRow)]
pub struct Habit {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub target: i32,
    pub unit: String,
    /// Maintained by the success recomputation, never by clients.
    pub success: bool,
    pub created_at: DateTime<Utc>,
}

/// A habit joined with its owner's username and the aggregates over its records.
///
/// The aggregates are `None` when the habit has no records.
#[derive(Debug, Clone, FromRow)]
pub struct HabitWithStats {
    #[sqlx(flatten)]
    pub habit: Habit,
    pub username: String,
    pub total: Option<i64>,
    pub average: Option<f64>,
    pub best: Option<i32>,
    #[sqlx(skip)]
    pub records: Vec<RecordSummary>,
}
