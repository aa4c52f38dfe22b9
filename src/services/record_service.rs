use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{PgConnection, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::api::input::{invalid_reference, UNIQUE_HABIT_DATE};
use crate::api::{DailyRecordPatch, NewDailyRecord, ValidationErrors};
use crate::auth::ensure_owner;
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{DailyRecordDetail, Habit};
use crate::services::{success, ServiceError};
use crate::types::Operation;

/// Name of the `(habit_id, date)` unique constraint in the migrations
const UNIQUE_DAILY_RECORD: &str = "unique_daily_record";

const RECORD_DETAIL_SELECT: &str = r#"
    SELECT r.id, r.habit_id, r.date, r.amount_achieved, h.target, h.unit, h.user_id AS owner_id
    FROM daily_records r
    JOIN habits h ON h.id = r.habit_id
"#;

/// Optional narrowing of `GET /daily-records`; date bounds are inclusive
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RecordFilter {
    pub habit: Option<Uuid>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Owner-scoped reads and writes on daily records.
/// Every write recomputes the success flag of the habits it touched.
pub struct DailyRecordService {
    pool: PgPool,
}

impl DailyRecordService {
    pub async fn new() -> Result<Self, ServiceError> {
        let pool = DatabaseManager::pool().await?;
        Ok(Self { pool })
    }

    pub async fn list(
        &self,
        owner: Uuid,
        filter: &RecordFilter,
    ) -> Result<Vec<DailyRecordDetail>, ServiceError> {
        let sql = format!(
            r#"{}
            WHERE h.user_id = $1
            AND ($2::UUID IS NULL OR r.habit_id = $2)
            AND ($3::DATE IS NULL OR r.date >= $3)
            AND ($4::DATE IS NULL OR r.date <= $4)
            ORDER BY r.date, r.id"#,
            RECORD_DETAIL_SELECT
        );

        let records = sqlx::query_as::<_, DailyRecordDetail>(&sql)
            .bind(owner)
            .bind(filter.habit)
            .bind(filter.from)
            .bind(filter.to)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    /// A record on one of `owner`'s habits; anything else is reported as missing
    pub async fn get(&self, owner: Uuid, id: Uuid) -> Result<DailyRecordDetail, ServiceError> {
        let mut conn = self.pool.acquire().await?;
        fetch_detail(&mut conn, owner, id, false)
            .await?
            .ok_or_else(|| record_not_found(id))
    }

    pub async fn create(
        &self,
        owner: Uuid,
        input: NewDailyRecord,
    ) -> Result<DailyRecordDetail, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let habit = referenced_habit(&mut tx, input.habit).await?;
        ensure_owner(owner, &habit, "You can only create records for your own habits.")?;

        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO daily_records (id, habit_id, date, amount_achieved)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id)
        .bind(habit.id)
        .bind(input.date)
        .bind(input.amount_achieved)
        .execute(&mut *tx)
        .await
        .map_err(write_error)?;

        success::on_record_mutated(&mut tx, habit.id, Operation::Create).await?;

        let detail = fetch_detail(&mut tx, owner, id, false)
            .await?
            .ok_or_else(|| record_not_found(id))?;
        tx.commit().await?;

        info!("Created record {} on habit {} for {}", id, habit.id, input.date);
        Ok(detail)
    }

    pub async fn update(
        &self,
        owner: Uuid,
        id: Uuid,
        patch: DailyRecordPatch,
    ) -> Result<DailyRecordDetail, ServiceError> {
        let mut tx = self.pool.begin().await?;

        let current = fetch_detail(&mut tx, owner, id, true)
            .await?
            .ok_or_else(|| record_not_found(id))?;
        let previous_habit = current.record.habit_id;

        // Moving a record is held to the same ownership rule as creating one
        let moved_to = match patch.habit {
            Some(habit_id) if habit_id != previous_habit => {
                let habit = referenced_habit(&mut tx, habit_id).await?;
                ensure_owner(owner, &habit, "You can only move records to your own habits.")?;
                Some(habit.id)
            }
            _ => None,
        };

        sqlx::query(
            r#"
            UPDATE daily_records SET
                habit_id = COALESCE($2, habit_id),
                date = COALESCE($3, date),
                amount_achieved = COALESCE($4, amount_achieved)
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(moved_to)
        .bind(patch.date)
        .bind(patch.amount_achieved)
        .execute(&mut *tx)
        .await
        .map_err(write_error)?;

        success::on_record_mutated(&mut tx, previous_habit, Operation::Update).await?;
        if let Some(habit_id) = moved_to {
            success::on_record_mutated(&mut tx, habit_id, Operation::Update).await?;
        }

        let detail = fetch_detail(&mut tx, owner, id, false)
            .await?
            .ok_or_else(|| record_not_found(id))?;
        tx.commit().await?;

        info!("Updated record {} on habit {}", id, detail.record.habit_id);
        Ok(detail)
    }

    pub async fn delete(&self, owner: Uuid, id: Uuid) -> Result<(), ServiceError> {
        let mut tx = self.pool.begin().await?;

        let deleted: Option<(Uuid,)> = sqlx::query_as(
            r#"
            DELETE FROM daily_records r
            USING habits h
            WHERE r.id = $1
            AND r.habit_id = h.id
            AND h.user_id = $2
            RETURNING r.habit_id
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        let (habit_id,) = deleted.ok_or_else(|| record_not_found(id))?;
        success::on_record_mutated(&mut tx, habit_id, Operation::Delete).await?;
        tx.commit().await?;

        info!("Deleted record {} from habit {}", id, habit_id);
        Ok(())
    }
}

async fn fetch_detail(
    conn: &mut PgConnection,
    owner: Uuid,
    id: Uuid,
    for_update: bool,
) -> Result<Option<DailyRecordDetail>, DatabaseError> {
    let sql = format!(
        "{} WHERE r.id = $1 AND h.user_id = $2{}",
        RECORD_DETAIL_SELECT,
        if for_update { " FOR UPDATE OF r" } else { "" }
    );

    let detail = sqlx::query_as::<_, DailyRecordDetail>(&sql)
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(detail)
}

/// Resolve the `habit` reference of a record body, whoever owns it
async fn referenced_habit(conn: &mut PgConnection, habit_id: Uuid) -> Result<Habit, ServiceError> {
    let habit = sqlx::query_as::<_, Habit>(
        r#"
        SELECT id, user_id, name, description, target, unit, success, created_at
        FROM habits
        WHERE id = $1
        "#,
    )
    .bind(habit_id)
    .fetch_optional(&mut *conn)
    .await?;

    habit.ok_or_else(|| {
        ServiceError::Validation(ValidationErrors::single(
            "habit",
            invalid_reference(format!("\"{}\"", habit_id)),
        ))
    })
}

fn record_not_found(id: Uuid) -> ServiceError {
    ServiceError::NotFound(format!("Daily record {} not found", id))
}

/// Map store rejections of a record write onto field errors.
/// The unique constraint also catches two requests racing for the same date.
fn write_error(err: sqlx::Error) -> ServiceError {
    let err = DatabaseError::Sqlx(err);
    if let Some(constraint) = err.unique_violation() {
        return unique_violation_error(constraint);
    }
    if err.is_constraint_violation() {
        return constraint_error();
    }
    ServiceError::Database(err)
}

fn unique_violation_error(constraint: &str) -> ServiceError {
    if constraint == UNIQUE_DAILY_RECORD {
        ServiceError::Validation(ValidationErrors::single("date", UNIQUE_HABIT_DATE))
    } else {
        constraint_error()
    }
}

fn constraint_error() -> ServiceError {
    ServiceError::Validation(ValidationErrors::single(
        "non_field_errors",
        "The record violates a data constraint.",
    ))
}
