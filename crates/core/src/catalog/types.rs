//! Types for catalog API responses.

use serde::{Deserialize, Serialize};

/// Poster size segment used when deriving full image URLs.
pub const POSTER_SIZE: &str = "w500";

/// A movie returned by the catalog API.
///
/// Transient data: nothing here is persisted beyond what the count store
/// captures in a [`crate::store::SearchRecord`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CatalogMovie {
    /// Catalog movie ID.
    pub id: u32,
    /// Movie title.
    pub title: String,
    /// Original title (in original language).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Movie overview/synopsis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overview: Option<String>,
    /// Poster path (relative to the catalog image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    /// Backdrop path (relative to the catalog image base URL).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    /// Popularity score as reported by the catalog.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<f32>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
}

impl CatalogMovie {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }

    /// Derive the full poster URL from the image base URL.
    ///
    /// Returns `None` when the catalog reported no poster path.
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path.as_ref().map(|path| {
            format!(
                "{}/{}{}",
                image_base_url.trim_end_matches('/'),
                POSTER_SIZE,
                path
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(poster_path: Option<&str>) -> CatalogMovie {
        CatalogMovie {
            id: 438631,
            title: "Dune".to_string(),
            original_title: None,
            release_date: Some("2021-09-15".to_string()),
            overview: None,
            poster_path: poster_path.map(String::from),
            backdrop_path: None,
            popularity: Some(120.5),
            vote_average: Some(7.8),
        }
    }

    #[test]
    fn test_year_from_release_date() {
        assert_eq!(movie(None).year(), Some(2021));
    }

    #[test]
    fn test_poster_url_derivation() {
        let url = movie(Some("/x.jpg")).poster_url("https://image.tmdb.org/t/p");
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/x.jpg")
        );
    }

    #[test]
    fn test_poster_url_trailing_slash() {
        let url = movie(Some("/x.jpg")).poster_url("https://image.tmdb.org/t/p/");
        assert_eq!(
            url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/x.jpg")
        );
    }

    #[test]
    fn test_poster_url_missing_path() {
        assert_eq!(movie(None).poster_url("https://image.tmdb.org/t/p"), None);
    }
}
