use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::api::{HabitPatch, NewHabit, ValidationErrors};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::HabitWithStats;
use crate::services::{stats, success, ServiceError};

/// Owner-scoped reads and writes on habits
pub struct HabitService {
    pool: PgPool,
}

impl HabitService {
    pub async fn new() -> Result<Self, ServiceError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    /// Every habit of `owner`, with aggregates and nested records
    pub async fn list(&self, owner: Uuid) -> Result<Vec<HabitWithStats>, ServiceError> {
        Ok(stats::habits_with_stats(&self.pool, owner, None).await?)
    }

    /// A habit of `owner`; another user's habit is reported as missing
    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<HabitWithStats, ServiceError> {
        stats::habits_with_stats(&self.pool, owner, Some(id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::NotFound(format!("Habit {} not found", id)))
    }

    pub async fn create(&self, owner: Uuid, input: NewHabit) -> Result<HabitWithStats, ServiceError> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO habits (id, user_id, name, description, target, unit, success)
            VALUES ($1, $2, $3, $4, $5, $6, FALSE)
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.target)
        .bind(&input.unit)
        .execute(&self.pool)
        .await
        .map_err(write_error)?;

        info!("Created habit {} '{}' for user {}", id, input.name, owner);
        self.get(owner, id).await
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: HabitPatch,
    ) -> Result<HabitWithStats, ServiceError> {
        if patch.is_empty() {
            return self.get(owner, id).await;
        }

        let mut tx = self.pool.begin().await?;

        let updated: Option<(Uuid,)> = sqlx::query_as(
            r#"
            UPDATE habits SET
                name = COALESCE($3, name),
                description = COALESCE($4, description),
                target = COALESCE($5, target),
                unit = COALESCE($6, unit)
            WHERE id = $1 AND user_id = $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(&patch.name)
        .bind(&patch.description)
        .bind(patch.target)
        .bind(&patch.unit)
        .fetch_optional(&mut *tx)
        .await
        .map_err(write_error)?;

        if updated.is_none() {
            return Err(ServiceError::NotFound(format!("Habit {} not found", id)));
        }

        // A new target can make or break success without any record changing
        if patch.target.is_some() {
            success::recompute_success(&mut *tx, id).await?;
        }

        tx.commit().await?;
        info!("Updated habit {} for user {}", id, owner);
        self.get(owner, id).await
    }

    /// Delete a habit of `owner`; its records go with it
    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let result = sqlx::query("DELETE FROM habits WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::NotFound(format!("Habit {} not found", id)));
        }

        info!("Deleted habit {} for user {}", id, owner);
        Ok(())
    }
}

/// Constraint failures on habit writes are input problems, not server faults
fn write_error(err: sqlx::Error) -> ServiceError {
    let err = DatabaseError::Sqlx(err);
    if err.is_constraint_violation() {
        ServiceError::Validation(ValidationErrors::single(
            "non_field_errors",
            "The habit violates a data constraint.",
        ))
    } else {
        ServiceError::Database(err)
    }
}
