//! Storage seam for the query layer.
//!
//! Built statements carry their SQL text and bind values together; every
//! literal travels as a bound parameter, and identifiers inside the text come
//! only from validated candidate lists. Production runs on MySQL behind
//! `MySqlStore`; tests drive the same statements through an in-memory SQLite
//! implementation of `PostingStore`.

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

use crate::matching::MatchError;
use crate::models::posting::Posting;

/// One bound parameter of a built statement.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlArg {
    Text(String),
    Int(i64),
}

/// A fully built, parameterized statement: SQL text with `?` placeholders
/// plus its bind values in order.
#[derive(Debug, Clone)]
pub struct SqlQuery {
    pub sql: String,
    pub args: Vec<SqlArg>,
}

/// One row of a keyword scan: the raw blob columns, unparsed.
#[derive(Debug, Clone)]
pub struct BlobRow {
    pub keywords: Option<String>,
    pub tech: Option<String>,
}

/// Read-only storage handle injected into every query-layer call.
#[async_trait]
pub trait PostingStore: Send + Sync {
    /// Physical column names of `table`, read from the live schema.
    async fn table_columns(&self, table: &str) -> Result<BTreeSet<String>, MatchError>;

    async fn fetch_postings(&self, query: &SqlQuery) -> Result<Vec<Posting>, MatchError>;

    async fn fetch_blob_rows(&self, query: &SqlQuery) -> Result<Vec<BlobRow>, MatchError>;

    /// Runs a single-column query aliased `name` and returns it as strings.
    async fn fetch_names(&self, query: &SqlQuery) -> Result<Vec<String>, MatchError>;
}

/// Backtick-quotes an identifier taken from a validated candidate list.
pub(crate) fn quote_ident(ident: &str) -> String {
    format!("`{ident}`")
}

/// Production store over a MySQL pool.
pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

fn bind_args<'q>(
    query: sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments>,
    args: &'q [SqlArg],
) -> sqlx::query::Query<'q, sqlx::MySql, sqlx::mysql::MySqlArguments> {
    let mut query = query;
    for arg in args {
        query = match arg {
            SqlArg::Text(text) => query.bind(text),
            SqlArg::Int(value) => query.bind(value),
        };
    }
    query
}

fn posting_from_row(row: &MySqlRow) -> Result<Posting, MatchError> {
    Ok(Posting {
        id: row.try_get("id")?,
        category: row.try_get("category")?,
        title: row.try_get("title")?,
        company: row.try_get("company")?,
        url: row.try_get("url")?,
        keywords: row.try_get("keywords")?,
        tech: row.try_get("tech")?,
    })
}

#[async_trait]
impl PostingStore for MySqlStore {
    async fn table_columns(&self, table: &str) -> Result<BTreeSet<String>, MatchError> {
        let rows = sqlx::query(
            "SELECT column_name AS name FROM information_schema.columns \
             WHERE table_schema = DATABASE() AND table_name = ?",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<Result<BTreeSet<_>, _>>()
            .map_err(MatchError::from)
    }

    async fn fetch_postings(&self, query: &SqlQuery) -> Result<Vec<Posting>, MatchError> {
        let rows = bind_args(sqlx::query(&query.sql), &query.args)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(posting_from_row).collect()
    }

    async fn fetch_blob_rows(&self, query: &SqlQuery) -> Result<Vec<BlobRow>, MatchError> {
        let rows = bind_args(sqlx::query(&query.sql), &query.args)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| {
                Ok(BlobRow {
                    keywords: row.try_get("keywords")?,
                    tech: row.try_get("tech")?,
                })
            })
            .collect()
    }

    async fn fetch_names(&self, query: &SqlQuery) -> Result<Vec<String>, MatchError> {
        let rows = bind_args(sqlx::query(&query.sql), &query.args)
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name"))
            .collect::<Result<Vec<_>, _>>()
            .map_err(MatchError::from)
    }
}
