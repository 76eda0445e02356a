/// TVMaze API response types for deserialization.
///
/// These structures mirror the JSON response format from the TVMaze API and
/// only carry the fields the widget uses.
use serde::Deserialize;
use serde_json::Value;

/// One entry of the `/search/shows` response.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeSearchResult {
    /// The matched show, nested inside the wrapper
    pub show: TvMazeShow,
}

/// A show record as embedded in search results.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeShow {
    pub id: u64,
    pub name: String,
    /// Summary in HTML format (may be null)
    pub summary: Option<String>,
    /// Artwork links (null for shows without artwork)
    pub image: Option<TvMazeImage>,
}

/// Artwork links of a show.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeImage {
    pub original: Option<String>,
}

/// A single episode from the `/shows/:id/episodes` endpoint.
#[derive(Debug, Deserialize)]
pub(super) struct TvMazeEpisode {
    pub id: u64,
    /// Episode title (may be null for episodes without a title)
    pub name: Option<String>,
    /// Season label, usually a number
    #[serde(default)]
    pub season: Value,
    /// Episode number within the season (null for specials)
    #[serde(default)]
    pub number: Value,
}
