//! Wire types for the Specify-style record API
//!
//! Records travel as flat JSON objects; to-one relationships are
//! expressed as resource URIs like `/api/specify/taxon/123/`.

use serde::{Deserialize, Serialize};

/// Wrapper around list endpoints: `{"objects": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceList<T> {
    pub objects: Vec<T>,
}

/// Serialized taxon record as returned by the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxonResource {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(rename = "isaccepted", default = "default_true")]
    pub is_accepted: bool,
    #[serde(rename = "acceptedtaxon", default)]
    pub accepted_taxon: Option<String>,
    #[serde(default)]
    pub parent: Option<String>,
    #[serde(rename = "definitionitem")]
    pub definition_item: String,
    #[serde(rename = "rankid", default)]
    pub rank_id: Option<i64>,
    #[serde(default)]
    pub remarks: Option<String>,
    pub resource_uri: String,
}

fn default_true() -> bool {
    true
}

/// One rank definition in the taxon tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreeDefItemResource {
    pub id: i64,
    pub name: String,
    #[serde(rename = "rankid")]
    pub rank_id: i64,
    pub resource_uri: String,
}

/// Response body of `GET /context/login/`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginContext {
    pub collections: std::collections::HashMap<String, i64>,
}

/// Extract the trailing record id from a resource URI.
///
/// URIs have the form `/api/specify/{table}/{id}/`.
pub fn parse_resource_id(uri: &str) -> Option<i64> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|id| id.parse().ok())
}

/// Construct the resource URI for a record.
pub fn resource_uri(table: &str, id: i64) -> String {
    format!("/api/specify/{}/{}/", table.to_lowercase(), id)
}
