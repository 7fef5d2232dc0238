//! Typesense collection schema for the video transcript collection.

use serde::{Deserialize, Serialize};

/// The name of the destination collection.
pub const COLLECTION_NAME: &str = "videos";

/// Field all results are ordered by unless a query says otherwise.
pub const DEFAULT_SORTING_FIELD: &str = "viewCount";

/// Fields searched by full-text queries.
pub const QUERY_BY_FIELDS: &[&str] = &["title", "content"];

/// Fields that carry facet counts.
pub const FACET_FIELDS: &[&str] = &["channelName", "isNde"];

/// One field of a collection schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub facet: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub sort: bool,
}

impl Field {
    fn new(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string(),
            facet: false,
            sort: false,
        }
    }

    fn faceted(mut self) -> Self {
        self.facet = true;
        self
    }

    fn sortable(mut self) -> Self {
        self.sort = true;
        self
    }
}

/// Body of a create-collection request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<Field>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sorting_field: Option<String>,
}

impl CollectionSchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Get the schema for the video transcript collection under the given name.
///
/// The layout is fixed:
/// - **Text fields**: `title`, `content` (searched), plus stored identifiers and URLs
/// - **Facets**: `channelName`, `isNde`
/// - **Sortable numbers**: `viewCount` (default sort), `date` in epoch seconds
pub fn video_collection_schema(name: &str) -> CollectionSchema {
    CollectionSchema {
        name: name.to_string(),
        fields: vec![
            Field::new("title", "string"),
            Field::new("content", "string"),
            Field::new("videoId", "string"),
            Field::new("channelName", "string").faceted(),
            Field::new("isNde", "string").faceted(),
            Field::new("viewCount", "int32").sortable(),
            Field::new("date", "int64").sortable(),
            Field::new("thumbnailUrl", "string"),
            Field::new("url", "string"),
            Field::new("start_time", "float"),
        ],
        default_sorting_field: Some(DEFAULT_SORTING_FIELD.to_string()),
    }
}
