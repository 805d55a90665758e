//! Keyword aggregation over semi-structured blob columns.
//!
//! Scraped postings carry JSON-encoded text blobs whose shape varies by
//! source: the keyword blob is usually an object walked at configured paths,
//! sometimes a flat array; the tech blob is a flat array of tags. Rows that
//! fail to parse are expected and skipped — only table/column resolution
//! failures are fatal to a call.

use std::collections::HashSet;

use serde_json::Value;

use crate::matching::columns::{resolve_columns, ColumnBinding};
use crate::matching::profile::{TableProfile, FIELD_CATEGORY, FIELD_ID, FIELD_KEYWORDS, FIELD_TECH};
use crate::matching::store::{quote_ident, PostingStore, SqlArg, SqlQuery};
use crate::matching::MatchError;

/// Most-recent rows examined per aggregation call.
pub const DEFAULT_ROW_SCAN: i64 = 200;
/// Unique terms returned per aggregation call.
pub const DEFAULT_BAG_LIMIT: usize = 80;

/// Bounded unique-term accumulator. Insertion order is kept so repeated
/// scans over the same data produce the same chip list.
#[derive(Debug)]
pub struct KeywordBag {
    seen: HashSet<String>,
    terms: Vec<String>,
    cap: usize,
}

impl KeywordBag {
    pub fn new(cap: usize) -> Self {
        Self {
            seen: HashSet::new(),
            terms: Vec::new(),
            cap,
        }
    }

    pub fn insert(&mut self, term: &str) {
        let term = term.trim();
        if term.is_empty() || self.is_full() || self.seen.contains(term) {
            return;
        }
        self.seen.insert(term.to_owned());
        self.terms.push(term.to_owned());
    }

    pub fn is_full(&self) -> bool {
        self.terms.len() >= self.cap
    }

    pub fn into_terms(self) -> Vec<String> {
        self.terms
    }
}

/// Best-effort parse. Upstream scrapers write heterogeneous blobs, so a
/// failed parse is "no data here", never an error.
fn parse_blob(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

/// Adds every string element of an array value; anything else is ignored.
fn collect_terms(value: &Value, bag: &mut KeywordBag) {
    if let Some(items) = value.as_array() {
        for item in items {
            if let Some(term) = item.as_str() {
                bag.insert(term);
            }
        }
    }
}

/// Walks one dotted path and collects the array of terms at its end.
/// A missing or mismatched step yields nothing.
fn collect_path(root: &Value, path: &str, bag: &mut KeywordBag) {
    let mut node = root;
    for key in path.split('.') {
        match node.get(key) {
            Some(next) => node = next,
            None => return,
        }
    }
    collect_terms(node, bag);
}

/// Terms from one keyword blob: a flat array is collected directly, an
/// object is walked at the configured paths.
fn collect_keyword_blob(raw: &str, paths: &[String], bag: &mut KeywordBag) {
    let Some(parsed) = parse_blob(raw) else {
        return;
    };
    if parsed.is_array() {
        collect_terms(&parsed, bag);
        return;
    }
    for path in paths {
        collect_path(&parsed, path, bag);
    }
}

/// Terms from one tech blob: a flat JSON array of tags.
fn collect_tech_blob(raw: &str, bag: &mut KeywordBag) {
    if let Some(parsed) = parse_blob(raw) {
        collect_terms(&parsed, bag);
    }
}

fn build_scan_query(
    profile: &TableProfile,
    binding: &ColumnBinding,
    category: &str,
    scan_limit: i64,
) -> Result<SqlQuery, MatchError> {
    let missing = |field: &str| MatchError::SchemaMismatch {
        table: profile.postings_table.clone(),
        field: field.to_string(),
    };
    let id_col = binding.column(FIELD_ID).ok_or_else(|| missing(FIELD_ID))?;
    let category_col = binding
        .column(FIELD_CATEGORY)
        .ok_or_else(|| missing(FIELD_CATEGORY))?;

    let select_blob = |field: &str| match binding.column(field) {
        Some(column) => format!("{} AS {}", quote_ident(column), quote_ident(field)),
        None => format!("CAST(NULL AS CHAR) AS {}", quote_ident(field)),
    };
    let sql = format!(
        "SELECT {}, {} FROM {} WHERE {} = ? ORDER BY {} DESC LIMIT ?",
        select_blob(FIELD_KEYWORDS),
        select_blob(FIELD_TECH),
        quote_ident(&profile.postings_table),
        quote_ident(category_col),
        quote_ident(id_col),
    );
    Ok(SqlQuery {
        sql,
        args: vec![
            SqlArg::Text(category.to_string()),
            SqlArg::Int(scan_limit),
        ],
    })
}

/// Aggregates keyword/tech terms across a category's most recent postings.
/// Returns up to `out_limit` unique terms from a scan bounded at
/// `row_scan_limit` rows; non-positive or absent bounds mean the defaults.
pub async fn aggregate_keywords(
    store: &dyn PostingStore,
    profile: &TableProfile,
    category: &str,
    row_scan_limit: Option<i64>,
    out_limit: Option<usize>,
) -> Result<Vec<String>, MatchError> {
    let scan_limit = match row_scan_limit {
        Some(n) if n > 0 => n,
        _ => DEFAULT_ROW_SCAN,
    };
    let cap = match out_limit {
        Some(n) if n > 0 => n,
        _ => DEFAULT_BAG_LIMIT,
    };
    if category.trim().is_empty() {
        return Ok(Vec::new());
    }

    let binding =
        resolve_columns(store, &profile.postings_table, &profile.posting_fields()).await?;
    if binding.column(FIELD_KEYWORDS).is_none() && binding.column(FIELD_TECH).is_none() {
        return Ok(Vec::new());
    }

    let query = build_scan_query(profile, &binding, category, scan_limit)?;
    let rows = store.fetch_blob_rows(&query).await?;

    let mut bag = KeywordBag::new(cap);
    for row in &rows {
        if bag.is_full() {
            break;
        }
        if let Some(raw) = row.keywords.as_deref() {
            collect_keyword_blob(raw, &profile.keyword_paths, &mut bag);
        }
        if let Some(raw) = row.tech.as_deref() {
            collect_tech_blob(raw, &mut bag);
        }
    }
    Ok(bag.into_terms())
}
