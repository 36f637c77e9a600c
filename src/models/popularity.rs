use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::Movie;

/// Hit counter for one search term, with a snapshot of the first movie it returned
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchPopularityRecord {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    pub movie_id: i64,
    pub title: String,
    pub count: i64,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl SearchPopularityRecord {
    /// Fields for a freshly created record with a count of one
    pub fn first_hit_fields(term: &str, movie: &Movie) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("searchTerm".to_string(), json!(term));
        fields.insert("movie_id".to_string(), json!(movie.id));
        fields.insert("title".to_string(), json!(movie.title));
        fields.insert("count".to_string(), json!(1));
        fields.insert("poster_url".to_string(), json!(movie.poster_url()));
        fields
    }
}

impl From<&SearchPopularityRecord> for Movie {
    fn from(record: &SearchPopularityRecord) -> Self {
        let mut movie = Movie::new(record.movie_id, record.title.clone());
        movie.poster_path = record
            .poster_url
            .as_deref()
            .and_then(|url| url.strip_prefix(super::TMDB_IMAGE_BASE))
            .map(str::to_string);
        movie
    }
}
