//! Shared helpers for dynamically-built list queries.
//!
//! Repositories build a `WHERE` clause from their query params as a
//! `Vec<String>` of numbered conditions plus a parallel `Vec<BindValue>`,
//! then bind the values in order. Every user-supplied value goes through
//! a bind parameter; no value is ever interpolated into SQL text.

use atrio_core::types::Timestamp;
use chrono::NaiveDate;

/// Typed bind value for dynamically-built queries.
pub(crate) enum BindValue {
    BigInt(i64),
    Text(String),
    Timestamp(Timestamp),
    Date(NaiveDate),
}

/// Join conditions into a `WHERE` clause, empty when there are none.
pub(crate) fn where_clause(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    }
}

/// Bind a slice of `BindValue` to a sqlx `QueryAs`.
pub(crate) fn bind_values<'q, O>(
    mut q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, sqlx::postgres::PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}

/// Bind a slice of `BindValue` to a sqlx `QueryScalar` returning a count.
pub(crate) fn bind_values_scalar<'q>(
    mut q: sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments>,
    values: &'q [BindValue],
) -> sqlx::query::QueryScalar<'q, sqlx::Postgres, i64, sqlx::postgres::PgArguments> {
    for val in values {
        match val {
            BindValue::BigInt(v) => q = q.bind(*v),
            BindValue::Text(v) => q = q.bind(v.as_str()),
            BindValue::Timestamp(v) => q = q.bind(*v),
            BindValue::Date(v) => q = q.bind(*v),
        }
    }
    q
}
