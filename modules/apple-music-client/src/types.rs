use serde::{Deserialize, Serialize};

/// Response envelope for catalog search.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: SearchResults,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResults {
    /// Absent when the query matched nothing of the requested type.
    pub songs: Option<SongPage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongPage {
    #[serde(default)]
    pub data: Vec<CatalogSong>,
}

/// A catalog track, ranked by the service itself.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogSong {
    pub id: String,
    pub attributes: SongAttributes,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SongAttributes {
    pub name: String,
    #[serde(rename = "artistName")]
    pub artist_name: String,
}

/// Body for the library add endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct LibraryAddRequest {
    pub data: Vec<LibraryAddItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LibraryAddItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: String,
}

impl LibraryAddRequest {
    pub fn song(id: &str) -> Self {
        Self {
            data: vec![LibraryAddItem {
                id: id.to_string(),
                item_type: "songs".to_string(),
            }],
        }
    }
}

/// Outcome of the combined search-and-add operation. All failures fold into
/// a variant; the operation itself never errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAddOutcome {
    /// The track was resolved and added to the library.
    Added(String),
    /// The catalog had no match for the mention.
    NotFound(String),
    /// The track was resolved but the library add failed.
    Failed(String),
}

impl SearchAddOutcome {
    pub fn message(&self) -> &str {
        match self {
            SearchAddOutcome::Added(msg)
            | SearchAddOutcome::NotFound(msg)
            | SearchAddOutcome::Failed(msg) => msg,
        }
    }
}

/// Aggregate counts from a batch add.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchStats {
    pub success: u32,
    pub failed: u32,
}
