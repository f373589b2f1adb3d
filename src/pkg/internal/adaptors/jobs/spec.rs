use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, de::Error};
use serde_json::Value;
use sqlx::{FromRow, types::BigDecimal};
use validator::{Validate, ValidationError};

use crate::pkg::internal::{
    adaptors::companies::spec::CompanyEntry,
    sql::{ColumnMap, SqlValue},
};

/// Fields a job update may touch. `company_handle` is deliberately absent.
pub const JOB_COLUMNS: ColumnMap<'static> =
    ColumnMap::new(&[("title", "title"), ("salary", "salary"), ("equity", "equity")]);

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobEntry {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
}

/// Row shape returned by an update; the company reference never changes there.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct JobFields {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct JobListing {
    pub id: i32,
    pub title: String,
    pub salary: Option<i32>,
    pub equity: Option<BigDecimal>,
    pub company_handle: String,
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobDetail {
    #[serde(flatten)]
    pub job: JobEntry,
    pub company: Option<CompanyEntry>,
}

fn valid_equity(equity: &BigDecimal) -> Result<(), ValidationError> {
    if *equity < BigDecimal::from(0) || *equity > BigDecimal::from(1) {
        return Err(ValidationError::new("equity_range"));
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub title: String,
    #[validate(range(min = 0))]
    pub salary: Option<i32>,
    #[serde(default, deserialize_with = "decimal")]
    #[validate(custom(function = "valid_equity"))]
    pub equity: Option<BigDecimal>,
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub company_handle: String,
}

/// Reads a decimal from its JSON text, so `0.3` stays `0.3` instead of
/// going through `f64`.
fn decimal<'de, D>(deserializer: D) -> Result<Option<BigDecimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Value::deserialize(deserializer)? {
        Value::Null => return Ok(None),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s,
        other => return Err(D::Error::custom(format!("expected a decimal, got {}", other))),
    };
    BigDecimal::from_str(text.trim())
        .map(Some)
        .map_err(|e| D::Error::custom(format!("invalid decimal {:?}: {}", text, e)))
}

/// `Some(None)` for an explicit `null`, `None` when the key is missing.
fn present<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn present_decimal<'de, D>(deserializer: D) -> Result<Option<Option<BigDecimal>>, D::Error>
where
    D: Deserializer<'de>,
{
    decimal(deserializer).map(Some)
}

/// Partial update of a job. Unknown keys, `companyHandle` included, are
/// rejected when deserializing.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct JobPatch {
    #[validate(length(min = 1, message = "Field cannot be empty"))]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[validate(range(min = 0))]
    pub salary: Option<Option<i32>>,
    #[serde(default, deserialize_with = "present_decimal")]
    #[validate(custom(function = "valid_equity"))]
    pub equity: Option<Option<BigDecimal>>,
}

impl JobPatch {
    /// Fields that were supplied, in declaration order.
    pub fn into_fields(self) -> Vec<(&'static str, SqlValue)> {
        let mut fields = vec![];
        if let Some(title) = self.title {
            fields.push(("title", SqlValue::Text(Some(title))));
        }
        if let Some(salary) = self.salary {
            fields.push(("salary", SqlValue::Int(salary)));
        }
        if let Some(equity) = self.equity {
            fields.push(("equity", SqlValue::Decimal(equity)));
        }
        fields
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobFilter {
    pub title: Option<String>,
    pub min_salary: Option<i32>,
    pub has_equity: Option<bool>,
}
