/// Data structures and traits for TV catalog lookups.
///
/// This module provides the normalized show and episode records the widget
/// renders, as well as the trait catalog backends implement.
mod tvmaze;
mod tvmaze_types;

pub use tvmaze::TvMazeCatalog;

use std::fmt;
use thiserror::Error;

/// Image shown for shows the catalog has no artwork for.
pub const MISSING_IMAGE_URL: &str = "https://tinyurl.com/tv-missing";

/// Errors that can occur while talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Request to the catalog failed or returned a non-success status
    #[error("Request failed: {0}")]
    RequestError(String),

    /// Failed to parse the catalog's JSON response
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The configured base URL cannot be used to build request URLs
    #[error("Invalid catalog base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

/// A show as it appears in a search result set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShowSummary {
    /// Catalog-assigned identifier
    pub id: u64,
    /// The show title
    pub name: String,
    /// Short description, may contain HTML markup
    pub summary: String,
    /// Image URL, never empty
    pub image: String,
}

impl ShowSummary {
    /// Creates a show record, falling back to [`MISSING_IMAGE_URL`] when no
    /// usable image is given.
    pub fn new(id: u64, name: String, summary: String, image: Option<String>) -> Self {
        let image = image
            .filter(|url| !url.is_empty())
            .unwrap_or_else(|| MISSING_IMAGE_URL.to_string());

        Self {
            id,
            name,
            summary,
            image,
        }
    }
}

/// Season or episode number label as delivered by the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeLabel {
    Number(i64),
    Text(String),
    Missing,
}

impl fmt::Display for EpisodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EpisodeLabel::Number(n) => write!(f, "{}", n),
            EpisodeLabel::Text(s) => f.write_str(s),
            EpisodeLabel::Missing => f.write_str("null"),
        }
    }
}

impl From<i64> for EpisodeLabel {
    fn from(n: i64) -> Self {
        EpisodeLabel::Number(n)
    }
}

/// A single episode of a show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpisodeSummary {
    /// Catalog-assigned identifier, unique within the show
    pub id: u64,
    /// The episode title
    pub name: String,
    /// The season this episode belongs to
    pub season: EpisodeLabel,
    /// The episode index within its season
    pub number: EpisodeLabel,
}

/// Trait for catalogs the widget can search.
///
/// Both operations issue exactly one request and never retry.
pub trait CatalogProvider {
    /// Searches shows whose title matches `term`.
    ///
    /// The term is forwarded verbatim, the empty string included. Results
    /// keep the order the catalog returned them in.
    fn search_shows(&self, term: &str) -> Result<Vec<ShowSummary>, CatalogError>;

    /// Lists all episodes of the show with the given identifier, in
    /// catalog order.
    fn episodes_of_show(&self, show_id: u64) -> Result<Vec<EpisodeSummary>, CatalogError>;
}
