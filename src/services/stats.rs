//! Per-habit aggregates and nested record summaries for read responses.
//!
//! A request costs two statements no matter how many habits it returns: one
//! grouped aggregate over the caller's habits, then one batched fetch of the
//! records of every returned habit.

use sqlx::PgPool;
use std::collections::HashMap;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::database::models::{HabitWithStats, RecordSummary};

const HABITS_WITH_STATS: &str = r#"
    SELECT
        h.id, h.user_id, h.name, h.description, h.target, h.unit, h.success, h.created_at,
        u.username,
        SUM(r.amount_achieved)::BIGINT AS total,
        AVG(r.amount_achieved)::FLOAT8 AS average,
        MAX(r.amount_achieved) AS best
    FROM habits h
    JOIN users u ON u.id = h.user_id
    LEFT JOIN daily_records r ON r.habit_id = h.id
    WHERE h.user_id = $1
    AND ($2::UUID IS NULL OR h.id = $2)
    GROUP BY h.id, u.id
    ORDER BY h.created_at, h.id
"#;

const RECORD_SUMMARIES: &str = r#"
    SELECT id, habit_id, date, amount_achieved
    FROM daily_records
    WHERE habit_id = ANY($1)
    ORDER BY date, id
"#;

/// Habits of `owner` (optionally just one) with aggregates and records attached
pub async fn habits_with_stats(
    pool: &PgPool,
    owner: Uuid,
    only: Option<Uuid>,
) -> Result<Vec<HabitWithStats>, DatabaseError> {
    let mut habits = sqlx::query_as::<_, HabitWithStats>(HABITS_WITH_STATS)
        .bind(owner)
        .bind(only)
        .fetch_all(pool)
        .await?;

    if habits.is_empty() {
        return Ok(habits);
    }

    let ids: Vec<Uuid> = habits.iter().map(|h| h.habit.id).collect();
    let records = sqlx::query_as::<_, RecordSummary>(RECORD_SUMMARIES)
        .bind(&ids)
        .fetch_all(pool)
        .await?;

    attach_records(&mut habits, records);
    Ok(habits)
}

/// Distribute record summaries onto their habits, keeping record order
pub fn attach_records(habits: &mut [HabitWithStats], records: Vec<RecordSummary>) {
    let mut by_habit: HashMap<Uuid, Vec<RecordSummary>> = HashMap::with_capacity(habits.len());
    for record in records {
        by_habit.entry(record.habit_id).or_default().push(record);
    }

    for habit in habits.iter_mut() {
        habit.records = by_habit.remove(&habit.habit.id).unwrap_or_default();
    }
}
