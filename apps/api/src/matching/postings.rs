//! Posting search: one parameterized statement per call.
//!
//! The category pin is an exact match; each free-text filter contributes an
//! AND-clause holding an OR-group of escaped `LIKE` comparisons over the
//! columns that actually exist. Filters whose columns are all absent drop
//! out silently — they never filter and never error.

use crate::matching::columns::{resolve_columns, ColumnBinding};
use crate::matching::profile::{
    TableProfile, FIELD_CATEGORY, FIELD_COMPANY, FIELD_ID, FIELD_KEYWORDS, FIELD_NAME, FIELD_TECH,
    FIELD_TITLE, FIELD_URL,
};
use crate::matching::store::{quote_ident, PostingStore, SqlArg, SqlQuery};
use crate::matching::MatchError;
use crate::models::posting::Posting;

/// Result cap applied when the caller sends no limit or a non-positive one.
pub const DEFAULT_LIMIT: i64 = 4;

/// Search filters for one posting query. Phrase lists come pre-extracted
/// (see `extract_phrases`); an empty list means "no filter on that field".
#[derive(Debug, Clone, Default)]
pub struct PostingFilter {
    pub category: String,
    pub role_phrases: Vec<String>,
    pub tech_phrases: Vec<String>,
    pub limit: Option<i64>,
}

/// Clamps a requested limit to a positive row count.
pub fn effective_limit(requested: Option<i64>) -> i64 {
    match requested {
        Some(n) if n > 0 => n,
        _ => DEFAULT_LIMIT,
    }
}

/// Backslash-escapes LIKE wildcards so a phrase matches itself literally.
/// Without this, `C_` would match `C#` and `50%` would match `50 rows`.
pub fn escape_like(phrase: &str) -> String {
    let mut escaped = String::with_capacity(phrase.len());
    for ch in phrase.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// The escape character is bound rather than written into the SQL text:
/// MySQL and SQLite quote a literal backslash differently, while `ESCAPE ?`
/// reads the same on both.
fn push_like_group(sql: &mut String, args: &mut Vec<SqlArg>, columns: &[&str], phrases: &[String]) {
    if columns.is_empty() || phrases.is_empty() {
        return;
    }
    let mut comparisons = Vec::new();
    for phrase in phrases {
        let pattern = format!("%{}%", escape_like(phrase));
        for column in columns {
            comparisons.push(format!("{} LIKE ? ESCAPE ?", quote_ident(column)));
            args.push(SqlArg::Text(pattern.clone()));
            args.push(SqlArg::Text("\\".to_string()));
        }
    }
    sql.push_str(" AND (");
    sql.push_str(&comparisons.join(" OR "));
    sql.push(')');
}

/// Projects every logical field, substituting a null placeholder for columns
/// the live table does not have.
fn projection(binding: &ColumnBinding) -> String {
    [
        FIELD_ID,
        FIELD_CATEGORY,
        FIELD_TITLE,
        FIELD_COMPANY,
        FIELD_URL,
        FIELD_KEYWORDS,
        FIELD_TECH,
    ]
    .iter()
    .map(|field| match binding.column(field) {
        Some(column) => format!("{} AS {}", quote_ident(column), quote_ident(field)),
        None => format!("CAST(NULL AS CHAR) AS {}", quote_ident(field)),
    })
    .collect::<Vec<_>>()
    .join(", ")
}

/// Composes the resolved columns, extracted phrases, and limit into one
/// statement. Role phrases search the title and keyword columns; tech
/// phrases search the tech column.
pub fn build_posting_query(
    profile: &TableProfile,
    binding: &ColumnBinding,
    filter: &PostingFilter,
) -> Result<SqlQuery, MatchError> {
    let missing = |field: &str| MatchError::SchemaMismatch {
        table: profile.postings_table.clone(),
        field: field.to_string(),
    };
    let id_col = binding.column(FIELD_ID).ok_or_else(|| missing(FIELD_ID))?;
    let category_col = binding
        .column(FIELD_CATEGORY)
        .ok_or_else(|| missing(FIELD_CATEGORY))?;

    let mut sql = format!(
        "SELECT {} FROM {} WHERE {} = ?",
        projection(binding),
        quote_ident(&profile.postings_table),
        quote_ident(category_col),
    );
    let mut args = vec![SqlArg::Text(filter.category.clone())];

    let role_columns: Vec<&str> = [FIELD_TITLE, FIELD_KEYWORDS]
        .iter()
        .filter_map(|field| binding.column(field))
        .collect();
    push_like_group(&mut sql, &mut args, &role_columns, &filter.role_phrases);

    let tech_columns: Vec<&str> = binding.column(FIELD_TECH).into_iter().collect();
    push_like_group(&mut sql, &mut args, &tech_columns, &filter.tech_phrases);

    sql.push_str(&format!(" ORDER BY {} DESC LIMIT ?", quote_ident(id_col)));
    args.push(SqlArg::Int(effective_limit(filter.limit)));

    Ok(SqlQuery { sql, args })
}

/// Runs a category-scoped posting search, most recent rows first.
///
/// An empty category is "nothing selected" from the UI and short-circuits to
/// an empty result without touching the store — callers rely on that.
pub async fn find_postings(
    store: &dyn PostingStore,
    profile: &TableProfile,
    filter: &PostingFilter,
) -> Result<Vec<Posting>, MatchError> {
    if filter.category.trim().is_empty() {
        return Ok(Vec::new());
    }
    let binding =
        resolve_columns(store, &profile.postings_table, &profile.posting_fields()).await?;
    let query = build_posting_query(profile, &binding, filter)?;
    store.fetch_postings(&query).await
}

/// Distinct category vocabulary, ascending by name.
pub async fn list_categories(
    store: &dyn PostingStore,
    profile: &TableProfile,
) -> Result<Vec<String>, MatchError> {
    let binding =
        resolve_columns(store, &profile.categories_table, &profile.category_fields()).await?;
    let name_col = binding
        .column(FIELD_NAME)
        .ok_or_else(|| MatchError::SchemaMismatch {
            table: profile.categories_table.clone(),
            field: FIELD_NAME.to_string(),
        })?;
    let name = quote_ident(name_col);
    let sql = format!(
        "SELECT DISTINCT {name} AS `name` FROM {} WHERE {name} IS NOT NULL AND {name} <> '' ORDER BY `name` ASC",
        quote_ident(&profile.categories_table),
    );
    store
        .fetch_names(&SqlQuery {
            sql,
            args: Vec::new(),
        })
        .await
}
