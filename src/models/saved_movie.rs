use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::Movie;

/// A bookmark joining a user to a movie, with denormalized display fields
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SavedMovie {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "movieId")]
    pub movie_id: i64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub release_date: String,
    #[serde(rename = "savedAt")]
    pub saved_at: DateTime<Utc>,
}

impl SavedMovie {
    pub fn fields(user_id: &str, movie: &Movie, saved_at: DateTime<Utc>) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert("userId".to_string(), json!(user_id));
        fields.insert("movieId".to_string(), json!(movie.id));
        fields.insert("title".to_string(), json!(movie.title));
        fields.insert("poster_path".to_string(), json!(movie.poster_path));
        fields.insert("vote_average".to_string(), json!(movie.vote_average));
        fields.insert("release_date".to_string(), json!(movie.release_date));
        fields.insert(
            "savedAt".to_string(),
            json!(saved_at.to_rfc3339_opts(SecondsFormat::Millis, true)),
        );
        fields
    }

    /// Minimal movie view of the bookmark, for rendering with the same card as search results
    pub fn to_movie(&self) -> Movie {
        let mut movie = Movie::new(self.movie_id, self.title.clone());
        movie.poster_path = self.poster_path.clone();
        movie.vote_average = self.vote_average;
        movie.release_date = self.release_date.clone();
        movie
    }
}
