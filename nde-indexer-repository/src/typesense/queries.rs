//! Typesense search parameter builders.
//!
//! This module turns a `SearchQuery` into the query-string parameters of the
//! documents search endpoint.

use crate::errors::SearchIndexError;
use crate::typesense::schema::{FACET_FIELDS, QUERY_BY_FIELDS};
use nde_indexer_shared::SearchQuery;

/// Largest page size the search endpoint accepts.
pub const MAX_PER_PAGE: u32 = 250;

/// Build the search parameters for a query.
///
/// The parameters:
/// - search `title` and `content`
/// - facet on `channelName` and `isNde`
/// - pass the filter through untouched when present
pub fn build_search_params(query: &SearchQuery) -> Result<Vec<(String, String)>, SearchIndexError> {
    validate_query(query)?;

    let mut params = vec![
        ("q".to_string(), query.query.trim().to_string()),
        ("query_by".to_string(), QUERY_BY_FIELDS.join(",")),
        ("facet_by".to_string(), FACET_FIELDS.join(",")),
        ("sort_by".to_string(), query.sort_by.clone()),
        ("page".to_string(), query.page.to_string()),
        ("per_page".to_string(), query.per_page.to_string()),
    ];

    if let Some(filter) = query.filter_by.as_deref().map(str::trim) {
        if !filter.is_empty() {
            params.push(("filter_by".to_string(), filter.to_string()));
        }
    }

    Ok(params)
}

fn validate_query(query: &SearchQuery) -> Result<(), SearchIndexError> {
    if query.query.trim().is_empty() {
        return Err(SearchIndexError::validation("Search term cannot be empty"));
    }
    if query.page == 0 {
        return Err(SearchIndexError::validation("page starts at 1"));
    }
    if query.per_page == 0 || query.per_page > MAX_PER_PAGE {
        return Err(SearchIndexError::validation(format!(
            "per_page must be between 1 and {}",
            MAX_PER_PAGE
        )));
    }
    if query.sort_by.trim().is_empty() {
        return Err(SearchIndexError::validation("sort_by cannot be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn param<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
        params
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[test]
    fn test_default_params() {
        let params = build_search_params(&SearchQuery::new(" life review ")).unwrap();

        assert_eq!(param(&params, "q"), Some("life review"));
        assert_eq!(param(&params, "query_by"), Some("title,content"));
        assert_eq!(param(&params, "facet_by"), Some("channelName,isNde"));
        assert_eq!(param(&params, "sort_by"), Some("viewCount:desc"));
        assert_eq!(param(&params, "page"), Some("1"));
        assert_eq!(param(&params, "per_page"), Some("12"));
        assert_eq!(param(&params, "filter_by"), None);
    }

    #[test]
    fn test_filter_and_paging() {
        let query = SearchQuery::new("*")
            .with_filter("isNde:=clear_nde")
            .with_sort("date:desc")
            .with_page(3, 50);

        let params = build_search_params(&query).unwrap();

        assert_eq!(param(&params, "q"), Some("*"));
        assert_eq!(param(&params, "filter_by"), Some("isNde:=clear_nde"));
        assert_eq!(param(&params, "sort_by"), Some("date:desc"));
        assert_eq!(param(&params, "page"), Some("3"));
        assert_eq!(param(&params, "per_page"), Some("50"));
    }

    #[test]
    fn test_blank_filter_is_dropped() {
        let params = build_search_params(&SearchQuery::new("light").with_filter("  ")).unwrap();
        assert_eq!(param(&params, "filter_by"), None);
    }

    #[test]
    fn test_validation() {
        assert!(build_search_params(&SearchQuery::new("  ")).is_err());
        assert!(build_search_params(&SearchQuery::new("light").with_page(0, 10)).is_err());
        assert!(build_search_params(&SearchQuery::new("light").with_page(1, 0)).is_err());
        assert!(build_search_params(&SearchQuery::new("light").with_page(1, 251)).is_err());
        assert!(build_search_params(&SearchQuery::new("light").with_sort("")).is_err());
    }
}
