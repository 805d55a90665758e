//! Test-only storage backing: the query layer over in-memory SQLite.
//!
//! SQLite shares the `?` placeholder syntax with MySQL, so built statements
//! run unmodified; only the schema probe differs (`pragma_table_info` in
//! place of `information_schema`).

use std::collections::BTreeSet;

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use crate::matching::store::{BlobRow, PostingStore, SqlArg, SqlQuery};
use crate::matching::MatchError;
use crate::models::posting::Posting;

pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// A single-connection pool: each new `:memory:` connection would be a
    /// separate empty database.
    pub async fn connect() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory sqlite");
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn bind_args<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>>,
    args: &'q [SqlArg],
) -> sqlx::query::Query<'q, sqlx::Sqlite, sqlx::sqlite::SqliteArguments<'q>> {
    let mut query = query;
    for arg in args {
        query = match arg {
            SqlArg::Text(text) => query.bind(text),
            SqlArg::Int(value) => query.bind(value),
        };
    }
    query
}

fn posting_from_row(row: &SqliteRow) -> Result<Posting, MatchError> {
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
impl PostingStore for SqliteStore {
    async fn table_columns(&self, table: &str) -> Result<BTreeSet<String>, MatchError> {
        let rows = sqlx::query("SELECT name FROM pragma_table_info(?)")
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

/// The full postings schema plus the category vocabulary table.
pub async fn seed_schema(store: &SqliteStore) {
    sqlx::query(
        "CREATE TABLE recruit_posts (
            id INTEGER PRIMARY KEY,
            job_cat TEXT NOT NULL,
            job_title TEXT,
            job_company TEXT,
            job_url TEXT,
            job_keyword TEXT,
            job_tech TEXT
        )",
    )
    .execute(store.pool())
    .await
    .expect("create recruit_posts");

    sqlx::query("CREATE TABLE job_categories (jc_name TEXT)")
        .execute(store.pool())
        .await
        .expect("create job_categories");
}

/// One searchable posting with a title and a tech blob.
pub async fn insert_posting(store: &SqliteStore, id: i64, category: &str, title: &str, tech: &str) {
    sqlx::query("INSERT INTO recruit_posts (id, job_cat, job_title, job_tech) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(category)
        .bind(title)
        .bind(tech)
        .execute(store.pool())
        .await
        .expect("insert posting");
}

/// One posting carrying only the blob columns used by keyword aggregation.
pub async fn insert_blobs(
    store: &SqliteStore,
    id: i64,
    category: &str,
    keyword_blob: &str,
    tech_blob: &str,
) {
    sqlx::query("INSERT INTO recruit_posts (id, job_cat, job_keyword, job_tech) VALUES (?, ?, ?, ?)")
        .bind(id)
        .bind(category)
        .bind(keyword_blob)
        .bind(tech_blob)
        .execute(store.pool())
        .await
        .expect("insert blob posting");
}
