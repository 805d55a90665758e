//! Column resolution against the live schema.
//!
//! One read-only probe per call, then a pure pass that picks the first
//! present candidate for every logical field. Bindings are never cached:
//! schema drift between deployments is the reason this layer exists.

use std::collections::{BTreeMap, BTreeSet};

use crate::matching::profile::FieldSpec;
use crate::matching::store::PostingStore;
use crate::matching::MatchError;

/// Resolved logical-field → physical-column mapping for one table, computed
/// at the start of a query call and discarded at its end.
#[derive(Debug, Clone, Default)]
pub struct ColumnBinding {
    bound: BTreeMap<&'static str, Option<String>>,
}

impl ColumnBinding {
    /// Physical column bound to `field`, or `None` when the field is absent
    /// from the live table (or was never requested).
    pub fn column(&self, field: &str) -> Option<&str> {
        self.bound.get(field).and_then(|column| column.as_deref())
    }
}

/// Binds every field spec against a probed column set. Required fields with
/// no present candidate fail the whole call; optional ones bind to absent.
pub fn bind_columns(
    table: &str,
    present: &BTreeSet<String>,
    specs: &[FieldSpec],
) -> Result<ColumnBinding, MatchError> {
    let mut bound = BTreeMap::new();
    for spec in specs {
        let hit = spec
            .candidates
            .iter()
            .find(|candidate| present.contains(candidate.as_str()))
            .cloned();
        if hit.is_none() && spec.required {
            return Err(MatchError::SchemaMismatch {
                table: table.to_string(),
                field: spec.field.to_string(),
            });
        }
        bound.insert(spec.field, hit);
    }
    Ok(ColumnBinding { bound })
}

/// Probes the live table once and binds every field spec against it.
pub async fn resolve_columns(
    store: &dyn PostingStore,
    table: &str,
    specs: &[FieldSpec],
) -> Result<ColumnBinding, MatchError> {
    let present = store.table_columns(table).await?;
    bind_columns(table, &present, specs)
}
