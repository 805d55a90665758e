use serde::Serialize;

/// One job posting as read by the query layer. The physical schema varies
/// between deployments, so every display field may be absent; absent columns
/// come back as `None`. Rows are never mutated after the read.
#[derive(Debug, Clone, Serialize)]
pub struct Posting {
    pub id: i64,
    pub category: String,
    pub title: Option<String>,
    pub company: Option<String>,
    pub url: Option<String>,
    /// Raw keyword blob, JSON-encoded text when present.
    pub keywords: Option<String>,
    /// Raw tech-stack blob, JSON-encoded text when present.
    pub tech: Option<String>,
}
