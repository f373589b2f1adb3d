use sqlx::PgConnection;

use crate::pkg::internal::{
    adaptors::jobs::spec::{JobEntry, JobFilter, JobListing},
    error::RecordResult,
    sql::{BuiltQuery, Predicates, bind_all},
};

const LIST_JOBS: &str = r#"
    SELECT j.id, j.title, j.salary, j.equity, j.company_handle, c.name AS company_name
    FROM jobs j
    LEFT JOIN companies c ON c.handle = j.company_handle
"#;

/// Listing query for `filter`. Conditions are added in a fixed order
/// (title, min salary, has equity) and results are always ordered by title.
pub fn filtered_query(filter: &JobFilter) -> BuiltQuery {
    let mut predicates = Predicates::new();
    if let Some(title) = &filter.title {
        predicates.bound("j.title ILIKE", format!("%{}%", title).into());
    }
    if let Some(min_salary) = filter.min_salary {
        predicates.bound("j.salary >=", min_salary.into());
    }
    if filter.has_equity.unwrap_or(false) {
        predicates.literal("j.equity > 0");
    }
    predicates.render(LIST_JOBS, "j.title")
}

pub struct JobSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> JobSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        JobSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> RecordResult<Option<JobEntry>> {
        let row = sqlx::query_as::<_, JobEntry>(
            "SELECT id, title, salary, equity, company_handle
             FROM jobs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list(&mut self, filter: &JobFilter) -> RecordResult<Vec<JobListing>> {
        let BuiltQuery { sql, values } = filtered_query(filter);
        let rows = bind_all(sqlx::query_as::<_, JobListing>(&sql), values)
            .fetch_all(&mut *self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use crate::pkg::internal::sql::{SqlValue, placeholders};

    use super::*;

    fn filter(title: bool, min_salary: bool, has_equity: bool) -> JobFilter {
        JobFilter {
            title: title.then(|| "er".to_string()),
            min_salary: min_salary.then_some(100000),
            has_equity: has_equity.then_some(true),
        }
    }

    #[test]
    fn test_no_filter_lists_everything_by_title() {
        let query = filtered_query(&JobFilter::default());
        assert!(!query.sql.contains("WHERE"));
        assert!(query.sql.ends_with(" ORDER BY j.title"));
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_every_filter_subset_numbers_contiguously() {
        for bits in 0..8u8 {
            let (title, min_salary, has_equity) = (bits & 1 != 0, bits & 2 != 0, bits & 4 != 0);
            let query = filtered_query(&filter(title, min_salary, has_equity));
            let carried = title as usize + min_salary as usize;
            assert_eq!(query.values.len(), carried, "subset {bits:03b}");
            assert_eq!(placeholders(&query.sql), (1..=carried).collect::<Vec<_>>(), "subset {bits:03b}");
            assert_eq!(query.sql.contains(" WHERE "), bits != 0, "subset {bits:03b}");
            assert_eq!(query.sql.contains("j.equity > 0"), has_equity, "subset {bits:03b}");
            assert!(query.sql.ends_with(" ORDER BY j.title"));
        }
    }

    #[test]
    fn test_min_salary_alone_takes_first_placeholder() {
        let query = filtered_query(&filter(false, true, true));
        assert!(query.sql.contains("WHERE j.salary >= $1 AND j.equity > 0 ORDER BY"));
        assert_eq!(query.values, vec![SqlValue::Int(Some(100000))]);
    }

    #[test]
    fn test_title_is_wrapped_and_never_inlined() {
        let query = filtered_query(&JobFilter {
            title: Some("'; drop table jobs; --".into()),
            ..Default::default()
        });
        assert!(query.sql.contains("j.title ILIKE $1"));
        assert!(!query.sql.contains("drop table"));
        assert_eq!(query.values, vec![SqlValue::from("%'; drop table jobs; --%")]);
    }

    #[test]
    fn test_has_equity_false_adds_nothing() {
        let query = filtered_query(&JobFilter {
            has_equity: Some(false),
            ..Default::default()
        });
        assert!(!query.sql.contains("WHERE"));
    }
}
