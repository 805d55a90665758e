use std::sync::Arc;

use crate::matching::profile::TableProfile;
use crate::matching::store::PostingStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Storage seam for the query layer. Production wires `MySqlStore`;
    /// tests swap in an in-memory implementation behind the same trait.
    pub store: Arc<dyn PostingStore>,
    /// Candidate column lists and blob paths for the live postings schema.
    pub profile: TableProfile,
}
