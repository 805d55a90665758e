// Schema-adaptive posting query layer.
// Resolves logical fields against whatever columns the live table actually
// has, then builds and runs parameterized search/aggregation queries.
// Every call is stateless and read-only; the storage seam is PostingStore.

pub mod columns;
pub mod handlers;
pub mod keywords;
pub mod phrases;
pub mod postings;
pub mod profile;
pub mod store;

#[cfg(test)]
pub mod testing;

use thiserror::Error;

/// Failures the query layer surfaces to callers. Everything else — malformed
/// per-row JSON, empty filters, non-positive limits — is absorbed in place.
#[derive(Debug, Error)]
pub enum MatchError {
    /// A required logical field has no matching physical column on the probed
    /// table. Schema does not self-heal, so this is never retried.
    #[error("table `{table}` has no usable column for `{field}`")]
    SchemaMismatch { table: String, field: String },

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] sqlx::Error),
}
