//! Physical-schema knobs for one deployment.
//!
//! The postings schema has drifted between deployments — different table
//! names, different column sets, different keyword JSON shapes — so candidate
//! column lists and blob paths travel as data instead of being baked into
//! query construction. `Default` covers every variant observed so far.

/// Logical field names shared between the profile and query construction.
pub const FIELD_ID: &str = "id";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_COMPANY: &str = "company";
pub const FIELD_URL: &str = "url";
pub const FIELD_KEYWORDS: &str = "keywords";
pub const FIELD_TECH: &str = "tech";
pub const FIELD_NAME: &str = "name";

/// Acceptable physical columns for one logical field, in priority order.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field: &'static str,
    pub candidates: Vec<String>,
    pub required: bool,
}

impl FieldSpec {
    pub fn required(field: &'static str, candidates: &[String]) -> Self {
        Self {
            field,
            candidates: candidates.to_vec(),
            required: true,
        }
    }

    pub fn optional(field: &'static str, candidates: &[String]) -> Self {
        Self {
            field,
            candidates: candidates.to_vec(),
            required: false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TableProfile {
    pub postings_table: String,
    pub categories_table: String,
    pub posting_id: Vec<String>,
    pub posting_category: Vec<String>,
    pub posting_title: Vec<String>,
    pub posting_company: Vec<String>,
    pub posting_url: Vec<String>,
    pub posting_keywords: Vec<String>,
    pub posting_tech: Vec<String>,
    /// Name column of the category vocabulary table.
    pub category_name: Vec<String>,
    /// Dotted paths into the keyword blob that hold arrays of terms.
    pub keyword_paths: Vec<String>,
}

impl Default for TableProfile {
    fn default() -> Self {
        Self {
            postings_table: "recruit_posts".to_string(),
            categories_table: "job_categories".to_string(),
            posting_id: cols(&["id", "recruit_id"]),
            posting_category: cols(&["job_cat", "job_big", "category"]),
            posting_title: cols(&["job_title", "title"]),
            posting_company: cols(&["job_company", "company"]),
            posting_url: cols(&["job_url", "url"]),
            posting_keywords: cols(&["job_keyword", "keywords"]),
            posting_tech: cols(&["job_tech", "tech_stack"]),
            category_name: cols(&["jc_name", "name", "job_cat", "job_big"]),
            keyword_paths: cols(&[
                "core_competencies",
                "requirements.qualification",
                "requirements.preferred",
                "required_tech_stack",
            ]),
        }
    }
}

impl TableProfile {
    /// Field specs for a posting search or keyword scan. Only the row
    /// identifier and the category pin are hard requirements; everything
    /// else degrades to a null projection when absent.
    pub fn posting_fields(&self) -> Vec<FieldSpec> {
        vec![
            FieldSpec::required(FIELD_ID, &self.posting_id),
            FieldSpec::required(FIELD_CATEGORY, &self.posting_category),
            FieldSpec::optional(FIELD_TITLE, &self.posting_title),
            FieldSpec::optional(FIELD_COMPANY, &self.posting_company),
            FieldSpec::optional(FIELD_URL, &self.posting_url),
            FieldSpec::optional(FIELD_KEYWORDS, &self.posting_keywords),
            FieldSpec::optional(FIELD_TECH, &self.posting_tech),
        ]
    }

    /// Field specs for the category vocabulary table.
    pub fn category_fields(&self) -> Vec<FieldSpec> {
        vec![FieldSpec::required(FIELD_NAME, &self.category_name)]
    }
}

fn cols(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}
