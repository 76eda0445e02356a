//! Rendering of catalog records into the page
//!
//! Every render call clears its container first and then appends one element
//! per record, keeping the input order.

use crate::catalog::{EpisodeSummary, ShowSummary};
use crate::page::{Element, Page, SHOW_ID_ATTRIBUTE};

/// Class of the control that requests the episodes of a card's show
pub const EPISODES_TRIGGER_CLASS: &str = "Show-getEpisodes";

/// Builds the card element for a single show
///
/// The card carries the show id in its `data-show-id` attribute so a click
/// on its episodes trigger can be traced back to the show.
pub fn show_card(show: &ShowSummary) -> Element {
    let body = Element::new("div")
        .with_class("media-body")
        .with_child(
            Element::new("h5")
                .with_class("text-primary")
                .with_text(&show.name),
        )
        .with_child(
            Element::new("div").with_child(Element::new("small").with_markup(&show.summary)),
        )
        .with_child(
            Element::new("button")
                .with_class("btn btn-outline-light btn-sm")
                .with_class(EPISODES_TRIGGER_CLASS)
                .with_text("Episodes"),
        );

    Element::new("div")
        .with_attribute(SHOW_ID_ATTRIBUTE, &show.id.to_string())
        .with_class("Show col-md-12 col-lg-6 mb-4")
        .with_child(
            Element::new("div")
                .with_class("media")
                .with_child(
                    Element::new("img")
                        .with_attribute("src", &show.image)
                        .with_attribute("alt", &show.name)
                        .with_class("w-25 me-3"),
                )
                .with_child(body),
        )
}

/// Path from a card to its episodes trigger: `.media` > `.media-body` > button
pub const CARD_TRIGGER_PATH: [usize; 3] = [0, 1, 2];

/// Path from a card to its image
pub const CARD_IMAGE_PATH: [usize; 2] = [0, 0];

/// Path from a card to its title heading
pub const CARD_TITLE_PATH: [usize; 3] = [0, 1, 0];

/// Path from a card to the element holding its summary
pub const CARD_SUMMARY_PATH: [usize; 4] = [0, 1, 1, 0];

/// Click target of the episodes trigger on the card at `card_index` of the
/// shows list
pub fn episodes_trigger_target(card_index: usize) -> Vec<usize> {
    let mut target = vec![card_index];
    target.extend_from_slice(&CARD_TRIGGER_PATH);
    target
}

/// Replaces the contents of the shows list with one card per show
pub fn populate_shows(shows_list: &mut Element, shows: &[ShowSummary]) {
    shows_list.empty();

    for show in shows {
        shows_list.append(show_card(show));
    }
}

/// Formats the list entry for an episode
pub fn episode_line(episode: &EpisodeSummary) -> String {
    format!(
        "{} (season {}, number {})",
        episode.name, episode.season, episode.number
    )
}

/// Replaces the episode list and reveals the episodes area
pub fn populate_episodes(page: &mut Page, episodes: &[EpisodeSummary]) {
    if let Some(list) = page.episodes_list_mut() {
        list.empty();
        for episode in episodes {
            list.append(Element::new("li").with_text(&episode_line(episode)));
        }
    }

    page.episodes_area.show();
}
