use sqlx::PgConnection;

use crate::pkg::internal::{
    adaptors::jobs::spec::{JOB_COLUMNS, JobEntry, JobFields, JobPatch, NewJob},
    error::{RecordError, RecordResult},
    sql::{SetClause, bind_all, sql_for_partial_update},
};

pub struct JobMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobMutator { pool }
    }

    /// Inserts unless the title is taken, in which case nothing is written
    /// and `None` comes back.
    pub async fn create(&mut self, job: NewJob) -> RecordResult<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(
            r#"
            INSERT INTO jobs (title, salary, equity, company_handle)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (title) DO NOTHING
            RETURNING id, title, salary, equity, company_handle
            "#,
        )
        .bind(&job.title)
        .bind(job.salary)
        .bind(&job.equity)
        .bind(&job.company_handle)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Applies `patch` and returns the new row, or `None` when `id` is unknown.
    /// Renaming onto a title another job holds is a `Duplicate`.
    pub async fn update(&mut self, id: i32, patch: JobPatch) -> RecordResult<Option<JobFields>> {
        let title = patch.title.clone();
        let clause = sql_for_partial_update(patch.into_fields(), &JOB_COLUMNS)?;
        let query = format!(
            "UPDATE jobs SET {} WHERE id = ${} RETURNING id, title, salary, equity",
            clause.set_cols,
            clause.next_placeholder()
        );
        let SetClause { values, .. } = clause;
        let row = bind_all(sqlx::query_as::<_, JobFields>(&query), values)
            .bind(id)
            .fetch_optional(&mut *self.pool)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(db) if db.is_unique_violation() => {
                    RecordError::Duplicate(title.unwrap_or_default())
                }
                e => RecordError::Persistence(e),
            })?;
        Ok(row)
    }

    pub async fn delete(&mut self, id: i32) -> RecordResult<bool> {
        let deleted: Option<i32> = sqlx::query_scalar("DELETE FROM jobs WHERE id = $1 RETURNING id")
            .bind(id)
            .fetch_optional(&mut *self.pool)
            .await?;
        Ok(deleted.is_some())
    }
}
