//! Query and response types for the search read path.

use serde::{Deserialize, Serialize};

use crate::document::SearchDocument;

/// Default number of hits per page, matching the site's search page.
pub const DEFAULT_PER_PAGE: u32 = 12;

/// Default ordering: most viewed first.
pub const DEFAULT_SORT_BY: &str = "viewCount:desc";

/// Parameters for a faceted full-text search over the video collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    /// Text to search for; `*` matches everything.
    pub query: String,
    /// Optional filter expression, e.g. `isNde:=clear_nde`.
    pub filter_by: Option<String>,
    pub sort_by: String,
    /// 1-based page number.
    pub page: u32,
    pub per_page: u32,
}

impl SearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            filter_by: None,
            sort_by: DEFAULT_SORT_BY.to_string(),
            page: 1,
            per_page: DEFAULT_PER_PAGE,
        }
    }

    pub fn with_filter(mut self, filter_by: impl Into<String>) -> Self {
        self.filter_by = Some(filter_by.into());
        self
    }

    pub fn with_sort(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    pub fn with_page(mut self, page: u32, per_page: u32) -> Self {
        self.page = page;
        self.per_page = per_page;
        self
    }

    /// Whether this query matches every document.
    pub fn is_wildcard(&self) -> bool {
        self.query.trim() == "*"
    }
}

/// A single matching document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    pub document: SearchDocument,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_match: Option<u64>,
}

/// Count of documents sharing one facet value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetCount {
    pub value: String,
    pub count: u64,
}

/// Facet counts for one faceted field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetCounts {
    pub field_name: String,
    #[serde(default)]
    pub counts: Vec<FacetCount>,
}

/// Result page of a search.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    /// Total number of matching documents across all pages.
    #[serde(default)]
    pub found: u64,
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub facet_counts: Vec<FacetCounts>,
}

impl SearchResponse {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Facet counts for the given field, if it was faceted.
    pub fn facet(&self, field_name: &str) -> Option<&FacetCounts> {
        self.facet_counts
            .iter()
            .find(|facet| facet.field_name == field_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_defaults() {
        let query = SearchQuery::new("life review");

        assert_eq!(query.sort_by, "viewCount:desc");
        assert_eq!(query.page, 1);
        assert_eq!(query.per_page, 12);
        assert!(query.filter_by.is_none());
        assert!(!query.is_wildcard());
        assert!(SearchQuery::new(" * ").is_wildcard());
    }

    #[test]
    fn test_response_from_search_body() {
        let body = json!({
            "found": 2,
            "page": 1,
            "hits": [{
                "document": {
                    "id": "1",
                    "title": "Journey to the Other Side and Back",
                    "content": "The tunnel of light opened up before me",
                    "videoId": "video456",
                    "channelName": "NDE Stories",
                    "isNde": "clear_nde",
                    "viewCount": 75000,
                    "date": 1668902400,
                    "thumbnailUrl": "https://i.ytimg.com/vi/example2/hqdefault.jpg",
                    "url": "https://www.youtube.com/watch?v=example2",
                    "start_time": 302.1
                },
                "text_match": 578730123365187705_u64
            }],
            "facet_counts": [{
                "field_name": "isNde",
                "counts": [
                    { "count": 2, "value": "clear_nde" },
                    { "count": 8, "value": "possible_nde" }
                ]
            }]
        });

        let response: SearchResponse = serde_json::from_value(body).unwrap();

        assert_eq!(response.found, 2);
        assert_eq!(response.hits.len(), 1);
        assert_eq!(response.hits[0].document.video_id, "video456");
        assert_eq!(response.hits[0].document.view_count, 75000);
        let facet = response.facet("isNde").unwrap();
        assert_eq!(facet.counts[1].value, "possible_nde");
        assert_eq!(facet.counts[1].count, 8);
        assert!(response.facet("channelName").is_none());
    }
}
