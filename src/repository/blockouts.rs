//! Blockouts repository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::{is_undefined_table, is_unique_violation, AppError, AppResult},
    models::{Blockout, NewBlockout},
    repository::BlockoutStore,
};

#[derive(Clone)]
pub struct BlockoutsRepository {
    pool: Pool<Postgres>,
}

impl BlockoutsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Blockouts covering any of `dates`, filtered on `start_time` presence.
    ///
    /// Dedup reads for the bulk operations. Unlike `list`, a missing table is
    /// propagated here: writing against a store we could not read would break
    /// idempotence.
    async fn for_dates(
        &self,
        venue_id: Uuid,
        dates: &[NaiveDate],
        full_day: bool,
    ) -> AppResult<Vec<Blockout>> {
        if dates.is_empty() {
            return Ok(Vec::new());
        }

        let time_filter = if full_day {
            "start_time IS NULL"
        } else {
            "start_time IS NOT NULL"
        };
        let query = format!(
            r#"
            SELECT id, venue_id, start_date, end_date, start_time, end_time,
                   reason, block_type, created_by, created_at
            FROM blockouts
            WHERE venue_id = $1
              AND {}
              AND EXISTS (
                  SELECT 1 FROM UNNEST($2::date[]) AS d(day)
                  WHERE d.day BETWEEN start_date AND end_date
              )
            ORDER BY start_date, start_time
            "#,
            time_filter
        );

        let rows = sqlx::query_as::<_, Blockout>(&query)
            .bind(venue_id)
            .bind(dates)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl BlockoutStore for BlockoutsRepository {
    /// List blockouts overlapping the given window
    async fn list(
        &self,
        venue_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> AppResult<Vec<Blockout>> {
        let mut conditions = vec!["venue_id = $1".to_string()];
        let mut idx = 2;

        if from.is_some() {
            conditions.push(format!("end_date >= ${}", idx));
            idx += 1;
        }
        if to.is_some() {
            conditions.push(format!("start_date <= ${}", idx));
        }

        let query = format!(
            r#"
            SELECT id, venue_id, start_date, end_date, start_time, end_time,
                   reason, block_type, created_by, created_at
            FROM blockouts
            WHERE {}
            ORDER BY start_date, start_time
            "#,
            conditions.join(" AND ")
        );

        let mut builder = sqlx::query_as::<_, Blockout>(&query).bind(venue_id);
        if let Some(f) = from {
            builder = builder.bind(f);
        }
        if let Some(t) = to {
            builder = builder.bind(t);
        }

        match builder.fetch_all(&self.pool).await {
            Ok(rows) => Ok(rows),
            Err(e) if is_undefined_table(&e) => {
                tracing::warn!("Blockouts table missing, treating venue {} as unblocked", venue_id);
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn full_day_for_dates(
        &self,
        venue_id: Uuid,
        dates: &[NaiveDate],
    ) -> AppResult<Vec<Blockout>> {
        self.for_dates(venue_id, dates, true).await
    }

    async fn hour_level_for_dates(
        &self,
        venue_id: Uuid,
        dates: &[NaiveDate],
    ) -> AppResult<Vec<Blockout>> {
        self.for_dates(venue_id, dates, false).await
    }

    /// Insert a batch of blockouts in one statement.
    ///
    /// A single multi-row INSERT keeps the batch atomic. Unique-index
    /// violations surface as `Conflict` so a concurrent duplicate write is
    /// reported rather than half-applied.
    async fn insert_many(&self, blockouts: &[NewBlockout]) -> AppResult<u64> {
        if blockouts.is_empty() {
            return Ok(0);
        }

        let venue_ids: Vec<Uuid> = blockouts.iter().map(|b| b.venue_id).collect();
        let start_dates: Vec<NaiveDate> = blockouts.iter().map(|b| b.start_date).collect();
        let end_dates: Vec<NaiveDate> = blockouts.iter().map(|b| b.end_date).collect();
        let start_times: Vec<Option<chrono::NaiveTime>> =
            blockouts.iter().map(|b| b.start_time).collect();
        let end_times: Vec<Option<chrono::NaiveTime>> =
            blockouts.iter().map(|b| b.end_time).collect();
        let reasons: Vec<Option<String>> = blockouts.iter().map(|b| b.reason.clone()).collect();
        let block_types: Vec<i16> = blockouts.iter().map(|b| i16::from(b.block_type)).collect();
        let created_bys: Vec<Uuid> = blockouts.iter().map(|b| b.created_by).collect();

        let result = sqlx::query(
            r#"
            INSERT INTO blockouts (
                venue_id, start_date, end_date, start_time, end_time,
                reason, block_type, created_by
            )
            SELECT * FROM UNNEST(
                $1::uuid[], $2::date[], $3::date[], $4::time[], $5::time[],
                $6::text[], $7::smallint[], $8::uuid[]
            )
            "#,
        )
        .bind(&venue_ids)
        .bind(&start_dates)
        .bind(&end_dates)
        .bind(&start_times)
        .bind(&end_times)
        .bind(&reasons)
        .bind(&block_types)
        .bind(&created_bys)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::Conflict("A requested blockout was created concurrently".to_string())
            } else {
                AppError::from(e)
            }
        })?;

        Ok(result.rows_affected())
    }

    async fn delete_by_ids(&self, venue_id: Uuid, ids: &[Uuid]) -> AppResult<u64> {
        if ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM blockouts WHERE venue_id = $1 AND id = ANY($2)")
            .bind(venue_id)
            .bind(ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_all_for_date(&self, venue_id: Uuid, date: NaiveDate) -> AppResult<u64> {
        let result = sqlx::query(
            "DELETE FROM blockouts WHERE venue_id = $1 AND start_date <= $2 AND end_date >= $2",
        )
        .bind(venue_id)
        .bind(date)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}
