use sqlx::PgConnection;

use crate::pkg::internal::{adaptors::companies::spec::CompanyEntry, error::RecordResult};

pub struct CompanySelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> CompanySelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        CompanySelector { pool }
    }

    pub async fn get_by_handle(&mut self, handle: &str) -> RecordResult<Option<CompanyEntry>> {
        let row = sqlx::query_as::<_, CompanyEntry>(
            "SELECT handle, name, description, num_employees, logo_url
             FROM companies WHERE handle = $1",
        )
        .bind(handle)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }
}
