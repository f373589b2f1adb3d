use sqlx::PgPool;

use crate::pkg::internal::{
    adaptors::{
        companies::selectors::CompanySelector,
        jobs::{
            mutators::JobMutator,
            selectors::JobSelector,
            spec::{JobDetail, JobEntry, JobFields, JobFilter, JobListing, JobPatch, NewJob},
        },
    },
    error::{RecordError, RecordResult},
};

/// Job records: create, filter, fetch, patch and delete.
///
/// Every write is a single conditional statement, so a concurrent caller can
/// never slip in between an existence check and the mutation.
pub struct JobService<'a> {
    pool: &'a PgPool,
}

impl<'a> JobService<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        JobService { pool }
    }

    pub async fn create(&self, input: NewJob) -> RecordResult<JobEntry> {
        let mut conn = self.pool.acquire().await?;
        let title = input.title.clone();
        match JobMutator::new(&mut *conn).create(input).await? {
            Some(job) => {
                tracing::info!("created job {} ({})", job.id, &job.title);
                Ok(job)
            }
            None => {
                tracing::warn!("job title already taken: {}", &title);
                Err(RecordError::Duplicate(title))
            }
        }
    }

    pub async fn list(&self, filter: &JobFilter) -> RecordResult<Vec<JobListing>> {
        let mut conn = self.pool.acquire().await?;
        JobSelector::new(&mut *conn).list(filter).await
    }

    /// The job and its owning company, read in one transaction.
    pub async fn get(&self, id: i32) -> RecordResult<JobDetail> {
        let mut tx = self.pool.begin().await?;
        let job = JobSelector::new(&mut *tx)
            .get_by_id(id)
            .await?
            .ok_or(RecordError::NotFound(id))?;
        let company = CompanySelector::new(&mut *tx)
            .get_by_handle(&job.company_handle)
            .await?;
        tx.commit().await?;
        Ok(JobDetail { job, company })
    }

    pub async fn update(&self, id: i32, patch: JobPatch) -> RecordResult<JobFields> {
        let mut conn = self.pool.acquire().await?;
        let job = JobMutator::new(&mut *conn).update(id, patch).await?;
        match job {
            Some(job) => {
                tracing::info!("updated job {}", id);
                Ok(job)
            }
            None => {
                tracing::warn!("update on missing job {}", id);
                Err(RecordError::NotFound(id))
            }
        }
    }

    pub async fn remove(&self, id: i32) -> RecordResult<()> {
        let mut conn = self.pool.acquire().await?;
        if !JobMutator::new(&mut *conn).delete(id).await? {
            tracing::warn!("delete on missing job {}", id);
            return Err(RecordError::NotFound(id));
        }
        tracing::info!("deleted job {}", id);
        Ok(())
    }
}
