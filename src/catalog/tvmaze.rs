/// TVMaze catalog implementation.
use super::tvmaze_types::{TvMazeEpisode, TvMazeSearchResult, TvMazeShow};
use super::{CatalogError, CatalogProvider, EpisodeLabel, EpisodeSummary, ShowSummary};
use reqwest::Url;
use reqwest::blocking::Response;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Default location of the public TVMaze API.
pub const DEFAULT_BASE_URL: &str = "https://api.tvmaze.com";

/// Catalog backed by the TVMaze REST API.
///
/// Shows are looked up through the `/search/shows` endpoint and episodes
/// through `/shows/:id/episodes`.
pub struct TvMazeCatalog {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl TvMazeCatalog {
    /// Creates a catalog talking to the public TVMaze API.
    pub fn new() -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Creates a catalog talking to a different TVMaze-compatible host.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute URL that request paths can be appended to.
    pub fn with_base_url(base_url: &str) -> Result<Self, CatalogError> {
        let catalog = Self {
            client: reqwest::blocking::Client::new(),
            base_url: base_url.to_string(),
        };

        // Fail early rather than on the first request
        catalog.endpoint(&[])?;

        Ok(catalog)
    }

    /// Builds the URL for a show search.
    ///
    /// `term` becomes the single `q` parameter, percent-encoded.
    pub fn search_url(&self, term: &str) -> Result<Url, CatalogError> {
        let mut url = self.endpoint(&["search", "shows"])?;
        url.query_pairs_mut().append_pair("q", term);
        Ok(url)
    }

    /// Builds the URL listing the episodes of a show.
    pub fn episodes_url(&self, show_id: u64) -> Result<Url, CatalogError> {
        self.endpoint(&["shows", &show_id.to_string(), "episodes"])
    }

    /// Appends path segments to the base URL.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, CatalogError> {
        let invalid = |reason: String| CatalogError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason,
        };

        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| invalid("URL cannot be used as a base".to_string()))?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    /// Sends a GET request and decodes the JSON body.
    fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| CatalogError::RequestError(e.to_string()))?;

        let response = ensure_success(response)?;

        response
            .json()
            .map_err(|e| CatalogError::ParseError(e.to_string()))
    }

    /// Converts a search wrapper to our internal show record.
    ///
    /// A null summary becomes an empty string rather than the text `null`.
    fn convert_search_result(result: TvMazeSearchResult) -> ShowSummary {
        let TvMazeShow {
            id,
            name,
            summary,
            image,
        } = result.show;

        ShowSummary::new(
            id,
            name,
            summary.unwrap_or_default(),
            image.and_then(|image| image.original),
        )
    }

    /// Converts a TVMaze episode to our internal episode record.
    ///
    /// A null name is blanked to an empty string. Null season and number
    /// values are kept as [`EpisodeLabel::Missing`] and display as `null`.
    fn convert_episode(episode: TvMazeEpisode) -> EpisodeSummary {
        EpisodeSummary {
            id: episode.id,
            name: episode.name.unwrap_or_default(),
            season: label_from_value(episode.season),
            number: label_from_value(episode.number),
        }
    }
}

impl Default for TvMazeCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogProvider for TvMazeCatalog {
    fn search_shows(&self, term: &str) -> Result<Vec<ShowSummary>, CatalogError> {
        let results: Vec<TvMazeSearchResult> = self.get_json(self.search_url(term)?)?;

        Ok(results
            .into_iter()
            .map(Self::convert_search_result)
            .collect())
    }

    fn episodes_of_show(&self, show_id: u64) -> Result<Vec<EpisodeSummary>, CatalogError> {
        let episodes: Vec<TvMazeEpisode> = self.get_json(self.episodes_url(show_id)?)?;

        Ok(episodes.into_iter().map(Self::convert_episode).collect())
    }
}

/// Rejects non-success HTTP responses.
fn ensure_success(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    Err(CatalogError::RequestError(format!(
        "HTTP {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Unknown")
    )))
}

/// Turns a loosely typed JSON season/number value into a display label.
fn label_from_value(value: Value) -> EpisodeLabel {
    match value {
        Value::Null => EpisodeLabel::Missing,
        Value::String(s) => EpisodeLabel::Text(s),
        Value::Number(n) => match n.as_i64() {
            Some(n) => EpisodeLabel::Number(n),
            None => EpisodeLabel::Text(n.to_string()),
        },
        other => EpisodeLabel::Text(other.to_string()),
    }
}
