//! Search request and response types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ==================== Facet Filters ====================

/// One element of a facet filter expression.
///
/// Each element is either a single `"field:value"` token or an OR-group
/// of tokens; the surrounding sequence is AND-combined across elements.
/// `[["genre:action", "genre:comedy"], "year:2020"]` reads as
/// `(genre=action OR genre=comedy) AND year=2020`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FacetFilter {
    /// A single `field:value` token.
    Single(String),
    /// An OR-group of `field:value` tokens.
    Or(Vec<String>),
}

impl From<&str> for FacetFilter {
    fn from(token: &str) -> Self {
        FacetFilter::Single(token.to_string())
    }
}

impl From<String> for FacetFilter {
    fn from(token: String) -> Self {
        FacetFilter::Single(token)
    }
}

impl From<Vec<String>> for FacetFilter {
    fn from(group: Vec<String>) -> Self {
        FacetFilter::Or(group)
    }
}

impl From<&[&str]> for FacetFilter {
    fn from(group: &[&str]) -> Self {
        FacetFilter::Or(group.iter().map(|s| s.to_string()).collect())
    }
}

// ==================== Search Query ====================

/// Parameters for the search route.
///
/// Unset fields are omitted from the request body so the server applies
/// its own defaults.
///
/// # Example
///
/// ```rust,no_run
/// use meili::{FacetFilter, SearchQuery};
///
/// let query = SearchQuery {
///     limit: Some(5),
///     attributes_to_highlight: Some(vec!["title".to_string()]),
///     facet_filters: Some(vec![FacetFilter::from("genre:action")]),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
    /// Search terms. `None` is the placeholder search matching all
    /// documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,

    /// Number of hits to skip.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    /// Maximum number of hits to return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Attribute filter expression, e.g. `"release_date > 1590000000"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<String>,

    /// Fields to include in the returned documents.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_retrieve: Option<Vec<String>>,

    /// Fields to crop around the query terms in `_formatted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_crop: Option<Vec<String>>,

    /// Crop window length, in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop_length: Option<usize>,

    /// Fields to highlight in `_formatted`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attributes_to_highlight: Option<Vec<String>>,

    /// Include match position info in the hits.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches: Option<bool>,

    /// Facet filter expression; see [`FacetFilter`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facet_filters: Option<Vec<FacetFilter>>,

    /// Facets to count matching documents for.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facets_distribution: Option<Vec<String>>,
}

// ==================== Search Response ====================

/// Response from the search route.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse<T = serde_json::Value> {
    /// Matching documents.
    pub hits: Vec<T>,

    /// Offset applied by the server.
    #[serde(default)]
    pub offset: usize,

    /// Limit applied by the server.
    #[serde(default)]
    pub limit: usize,

    /// Number of matching documents.
    #[serde(default)]
    pub nb_hits: u64,

    /// Whether `nb_hits` is exact.
    #[serde(default)]
    pub exhaustive_nb_hits: bool,

    /// Server-side processing time, in milliseconds.
    #[serde(default)]
    pub processing_time_ms: u64,

    /// The query terms as processed.
    #[serde(default)]
    pub query: String,

    /// Facet value counts; present only when `facetsDistribution` was
    /// requested.
    #[serde(default)]
    pub facets_distribution: Option<HashMap<String, HashMap<String, u64>>>,

    /// Whether the facet counts are exact; present only alongside
    /// `facets_distribution`.
    #[serde(default)]
    pub exhaustive_facets_count: Option<bool>,
}
