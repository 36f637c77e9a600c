use serde::{Deserialize, Serialize};

pub mod account;
pub mod document;
pub mod popularity;
pub mod saved_movie;

pub use account::{Session, User};
pub use document::{
    Document, DocumentId, DocumentQuery, Filter, FilterOp, Permission, Role, Sort, SortDirection,
};
pub use popularity::SearchPopularityRecord;
pub use saved_movie::SavedMovie;

pub const TMDB_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";
const POSTER_PLACEHOLDER: &str = "https://placehold.co/600x400/1a1a1a/ffffff.png?text=No+Image";

/// Movie as returned by the metadata API
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub popularity: Option<f64>,
    #[serde(default)]
    pub vote_count: Option<u64>,
    #[serde(default)]
    pub original_language: Option<String>,
    #[serde(default)]
    pub original_title: Option<String>,
    #[serde(default)]
    pub adult: Option<bool>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    #[serde(default)]
    pub video: Option<bool>,
}

impl Movie {
    /// Creates a movie with only the display fields set
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            vote_average: 0.0,
            release_date: String::new(),
            overview: None,
            popularity: None,
            vote_count: None,
            original_language: None,
            original_title: None,
            adult: None,
            backdrop_path: None,
            genre_ids: Vec::new(),
            video: None,
        }
    }

    /// Full w500 poster URL, if the movie has a poster
    pub fn poster_url(&self) -> Option<String> {
        self.poster_path
            .as_deref()
            .map(|path| format!("{}{}", TMDB_IMAGE_BASE, path))
    }

    /// Poster URL with a placeholder image for movies without one
    pub fn display_poster_url(&self) -> String {
        self.poster_url()
            .unwrap_or_else(|| POSTER_PLACEHOLDER.to_string())
    }

    /// Year part of the release date, or "Unknown"
    pub fn release_year(&self) -> &str {
        match self.release_date.split('-').next() {
            Some(year) if !year.is_empty() => year,
            _ => "Unknown",
        }
    }

    /// Rating on a five star scale; `None` when the movie has no votes
    pub fn star_rating(&self) -> Option<u8> {
        if self.vote_average <= 0.0 {
            return None;
        }
        Some((self.vote_average / 2.0).round() as u8)
    }
}

/// Paginated envelope returned by the TMDB list endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<Movie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_deserializes_tmdb_result() {
        let json = r#"{
            "id": 272,
            "title": "Batman Begins",
            "poster_path": "/8RW2runSEc34IwKN2D1aPcJd2UL.jpg",
            "vote_average": 7.7,
            "release_date": "2005-06-10",
            "genre_ids": [28, 80],
            "adult": false,
            "overview": "Driven by tragedy..."
        }"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.id, 272);
        assert_eq!(movie.genre_ids, vec![28, 80]);
        assert_eq!(movie.release_year(), "2005");
        assert_eq!(movie.star_rating(), Some(4));
        assert_eq!(
            movie.poster_url().as_deref(),
            Some("https://image.tmdb.org/t/p/w500/8RW2runSEc34IwKN2D1aPcJd2UL.jpg")
        );
    }

    #[test]
    fn test_movie_with_null_poster() {
        let json = r#"{"id": 1, "title": "Obscure", "poster_path": null, "vote_average": 0, "release_date": ""}"#;

        let movie: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(movie.poster_url(), None);
        assert!(movie.display_poster_url().contains("placehold.co"));
        assert_eq!(movie.release_year(), "Unknown");
        assert_eq!(movie.star_rating(), None);
    }

    #[test]
    fn test_tmdb_page_envelope() {
        let json = r#"{"page": 1, "results": [{"id": 5, "title": "Four Rooms"}], "total_pages": 3, "total_results": 42}"#;

        let page: TmdbPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 1);
        assert_eq!(page.total_results, 42);
    }
}
