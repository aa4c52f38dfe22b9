//! Keeps `habits.success` in step with the habit's records.
//!
//! A habit is successful when at least one of its records reached the target.
//! The record write path calls [`on_record_mutated`] on the same connection
//! (inside the same transaction) as the mutation, so the flag is current by
//! the time the mutation commits.

use sqlx::PgConnection;
use tracing::debug;
use uuid::Uuid;

use crate::database::manager::DatabaseError;
use crate::types::Operation;

/// Entry point for the record write path
pub async fn on_record_mutated(
    conn: &mut PgConnection,
    habit_id: Uuid,
    operation: Operation,
) -> Result<bool, DatabaseError> {
    debug!("Record {} on habit {}, recomputing success", operation, habit_id);
    recompute_success(conn, habit_id).await
}

/// Recompute and persist the success flag; writes only when it changed
pub async fn recompute_success(conn: &mut PgConnection, habit_id: Uuid) -> Result<bool, DatabaseError> {
    let row: Option<(bool, bool)> = sqlx::query_as(
        r#"
        SELECT
            h.success,
            EXISTS (
                SELECT 1 FROM daily_records r
                WHERE r.habit_id = h.id
                AND r.amount_achieved >= h.target
            )
        FROM habits h
        WHERE h.id = $1
        "#,
    )
    .bind(habit_id)
    .fetch_optional(&mut *conn)
    .await?;

    let (stored, has_success) =
        row.ok_or_else(|| DatabaseError::NotFound(format!("habit {}", habit_id)))?;

    if stored != has_success {
        sqlx::query("UPDATE habits SET success = $2 WHERE id = $1")
            .bind(habit_id)
            .bind(has_success)
            .execute(&mut *conn)
            .await?;
        debug!("Habit {} success changed to {}", habit_id, has_success);
    }

    Ok(has_success)
}
