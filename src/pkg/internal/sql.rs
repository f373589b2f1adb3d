//! Positional-parameter SQL assembly.
//!
//! Everything here produces SQL text containing only identifiers, fixed
//! fragments and `$n` placeholders. Values travel separately as
//! [`SqlValue`]s and are bound by position with [`bind_all`].

use sqlx::{Postgres, postgres::PgArguments, query::QueryAs, types::BigDecimal};

use super::error::{RecordError, RecordResult};

/// A bind parameter. Nulls keep their SQL type so Postgres can infer the
/// parameter type from the variant alone.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i32>),
    Decimal(Option<BigDecimal>),
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(Some(v.to_string()))
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(Some(v))
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(Some(v))
    }
}

impl From<BigDecimal> for SqlValue {
    fn from(v: BigDecimal) -> Self {
        SqlValue::Decimal(Some(v))
    }
}

/// Binds `values` in order, so the first value fills `$1`.
pub fn bind_all<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: Vec<SqlValue>,
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            SqlValue::Text(v) => query.bind(v),
            SqlValue::Int(v) => query.bind(v),
            SqlValue::Decimal(v) => query.bind(v),
        };
    }
    query
}

/// Logical field name to column name. Fields missing from the table are
/// used as their own column name.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMap<'a>(&'a [(&'a str, &'a str)]);

impl<'a> ColumnMap<'a> {
    pub const fn new(pairs: &'a [(&'a str, &'a str)]) -> Self {
        ColumnMap(pairs)
    }

    pub fn column<'s>(&'s self, field: &'s str) -> &'s str {
        self.0
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, column)| *column)
            .unwrap_or(field)
    }
}

#[derive(Debug, PartialEq)]
pub struct SetClause {
    pub set_cols: String,
    pub values: Vec<SqlValue>,
}

impl SetClause {
    /// Placeholder index free for whatever follows the `SET` list.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Builds the `SET` list of a partial update.
///
/// `{title: "Aliya", age: 32}` with `{title: "t_name"}` gives
/// `"t_name"=$1, "age"=$2` and values `["Aliya", 32]`.
pub fn sql_for_partial_update(
    data: Vec<(&str, SqlValue)>,
    columns: &ColumnMap,
) -> RecordResult<SetClause> {
    if data.is_empty() {
        return Err(RecordError::InvalidInput("no data".into()));
    }
    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());
    for (idx, (field, value)) in data.into_iter().enumerate() {
        cols.push(format!("{}=${}", quote_ident(columns.column(field)), idx + 1));
        values.push(value);
    }
    Ok(SetClause {
        set_cols: cols.join(", "),
        values,
    })
}

#[derive(Debug, Clone)]
enum Predicate {
    /// `lhs` is completed with the placeholder of `value`, e.g. `salary >=`.
    Bound { lhs: &'static str, value: SqlValue },
    Literal(&'static str),
}

/// Ordered `WHERE` conditions, joined with `AND` when rendered.
#[derive(Debug, Clone, Default)]
pub struct Predicates(Vec<Predicate>);

#[derive(Debug, PartialEq)]
pub struct BuiltQuery {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl Predicates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bound(&mut self, lhs: &'static str, value: SqlValue) -> &mut Self {
        self.0.push(Predicate::Bound { lhs, value });
        self
    }

    pub fn literal(&mut self, fragment: &'static str) -> &mut Self {
        self.0.push(Predicate::Literal(fragment));
        self
    }

    /// Appends the conditions and the ordering to `base`. Placeholders are
    /// numbered here, in insertion order, from the values actually pushed.
    pub fn render(self, base: &str, order_by: &str) -> BuiltQuery {
        let mut values = Vec::new();
        let mut conds = Vec::with_capacity(self.0.len());
        for predicate in self.0 {
            match predicate {
                Predicate::Bound { lhs, value } => {
                    values.push(value);
                    conds.push(format!("{} ${}", lhs, values.len()));
                }
                Predicate::Literal(fragment) => conds.push(fragment.to_string()),
            }
        }
        let mut sql = base.trim_end().to_string();
        if !conds.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conds.join(" AND "));
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(order_by);
        tracing::debug!(params = values.len(), "rendered query: {}", &sql);
        BuiltQuery { sql, values }
    }
}

#[cfg(test)]
pub(crate) fn placeholders(sql: &str) -> Vec<usize> {
    let mut found = vec![];
    for (i, _) in sql.match_indices('$') {
        let digits: String = sql[i + 1..].chars().take_while(|d| d.is_ascii_digit()).collect();
        if let Ok(n) = digits.parse() {
            found.push(n);
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use tracing_test::traced_test;

    use super::*;

    const PEOPLE: ColumnMap<'static> = ColumnMap::new(&[("firstName", "first_name"), ("age", "age")]);

    #[test]
    fn test_partial_update_translates_and_orders() {
        let clause = sql_for_partial_update(
            vec![("title", "Aliya".into()), ("age", SqlValue::Int(Some(32)))],
            &ColumnMap::new(&[("title", "t_name")]),
        )
        .unwrap();
        assert_eq!(clause.set_cols, r#""t_name"=$1, "age"=$2"#);
        assert_eq!(clause.values, vec![SqlValue::from("Aliya"), SqlValue::Int(Some(32))]);
        assert_eq!(clause.next_placeholder(), 3);
    }

    #[test]
    fn test_partial_update_keeps_value_types() {
        let clause = sql_for_partial_update(
            vec![("firstName", "Aliya".into()), ("age", "32".into())],
            &PEOPLE,
        )
        .unwrap();
        assert_eq!(clause.set_cols, r#""first_name"=$1, "age"=$2"#);
        assert_eq!(clause.values, vec![SqlValue::from("Aliya"), SqlValue::from("32")]);
        assert_ne!(clause.values[1], SqlValue::Int(Some(32)));
    }

    #[test]
    fn test_partial_update_nulls_and_untranslated_fields() {
        let clause = sql_for_partial_update(
            vec![("firstName", SqlValue::Text(None)), ("age", SqlValue::Int(None))],
            &ColumnMap::new(&[]),
        )
        .unwrap();
        assert_eq!(clause.set_cols, r#""firstName"=$1, "age"=$2"#);
        assert_eq!(clause.values, vec![SqlValue::Text(None), SqlValue::Int(None)]);
    }

    #[test]
    fn test_partial_update_rejects_empty_data() {
        for columns in [PEOPLE, ColumnMap::new(&[]), ColumnMap::new(&[("age", "age")])] {
            let err = sql_for_partial_update(vec![], &columns).unwrap_err();
            assert!(matches!(err, RecordError::InvalidInput(ref msg) if msg == "no data"));
        }
    }

    #[test]
    fn test_partial_update_placeholders_match_values() {
        let fields = ["a", "b", "c", "d", "e"];
        for n in 1..=fields.len() {
            let data = fields[..n].iter().map(|f| (*f, SqlValue::Int(Some(1)))).collect();
            let clause = sql_for_partial_update(data, &PEOPLE).unwrap();
            assert_eq!(placeholders(&clause.set_cols), (1..=n).collect::<Vec<_>>());
            assert_eq!(clause.values.len(), n);
        }
    }

    #[test]
    fn test_partial_update_quotes_identifiers() {
        let clause = sql_for_partial_update(
            vec![(r#"na"me"#, SqlValue::Text(None))],
            &ColumnMap::new(&[]),
        )
        .unwrap();
        assert_eq!(clause.set_cols, r#""na""me"=$1"#);
    }

    #[test]
    #[traced_test]
    fn test_predicates_render_in_insertion_order() {
        let mut predicates = Predicates::new();
        predicates
            .bound("name ILIKE", "%x%".into())
            .literal("active")
            .bound("rank >=", SqlValue::Int(Some(3)));
        let query = predicates.render("SELECT * FROM t", "name");
        assert_eq!(
            query.sql,
            "SELECT * FROM t WHERE name ILIKE $1 AND active AND rank >= $2 ORDER BY name"
        );
        assert_eq!(query.values, vec![SqlValue::from("%x%"), SqlValue::Int(Some(3))]);
        assert!(logs_contain("rendered query"));
    }

    #[test]
    fn test_empty_predicates_skip_where() {
        let query = Predicates::new().render("SELECT * FROM t\n", "name");
        assert_eq!(query.sql, "SELECT * FROM t ORDER BY name");
        assert!(query.values.is_empty());
    }

    #[test]
    fn test_decimal_values_compare_by_value() {
        let a = SqlValue::from(BigDecimal::from_str("0.5").unwrap());
        let b = SqlValue::Decimal(Some(BigDecimal::from_str("0.50").unwrap()));
        assert_eq!(a, b);
    }
}
