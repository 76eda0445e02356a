//! show_finder - Search a TV catalog for shows and browse their episodes
//!
//! This library provides the two pipelines of the show search widget: a
//! search that renders show cards, and an episode lookup triggered from a
//! card that renders the episode list. The page and the catalog are injected
//! into every handler, so both pipelines run against any [`CatalogProvider`].

mod catalog;
mod page;
mod render;

// Re-export catalog types
pub use catalog::{
    CatalogError, CatalogProvider, EpisodeLabel, EpisodeSummary, MISSING_IMAGE_URL, ShowSummary,
    TvMazeCatalog,
};

// Re-export page and rendering types
pub use page::{Element, Node, Page, PageError, SHOW_ID_ATTRIBUTE, escape_html};
pub use render::{
    CARD_IMAGE_PATH, CARD_SUMMARY_PATH, CARD_TITLE_PATH, CARD_TRIGGER_PATH, EPISODES_TRIGGER_CLASS,
    episode_line, episodes_trigger_target, populate_episodes, populate_shows, show_card,
};

use thiserror::Error;

/// Progress event emitted while handling user interactions
///
/// These events allow library users to trace what a handler did, display
/// status, or remain silent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// A search was submitted
    SearchStarted { term: String },

    /// The episodes panel was hidden ahead of a new search
    EpisodesPanelHidden,

    /// Search results arrived from the catalog
    ShowsFetched { count: usize },

    /// Show cards were written to the shows list
    ShowsRendered { count: usize },

    /// A click did not hit an episodes trigger
    ClickIgnored { target: Vec<usize> },

    /// Fetching the episodes of a show
    FetchingEpisodes { show_id: u64 },

    /// The episode list was written and the panel revealed
    EpisodesRendered { show_id: u64, count: usize },
}

/// Top-level error type for show_finder operations
#[derive(Debug, Error)]
pub enum ShowFinderError {
    /// Error while talking to the catalog
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Error while resolving an element on the page
    #[error("Page error: {0}")]
    Page(#[from] PageError),
}

/// Given a search term, searches the catalog for matching shows
///
/// The term is passed on unmodified; the empty string is a valid term.
/// Each returned show has an image, defaulted to [`MISSING_IMAGE_URL`].
pub fn search_shows_by_term<P>(
    provider: &P,
    term: &str,
) -> Result<Vec<ShowSummary>, CatalogError>
where
    P: CatalogProvider + ?Sized,
{
    provider.search_shows(term)
}

/// Given a show id, fetches its episodes from the catalog
pub fn get_episodes_of_show<P>(
    provider: &P,
    show_id: u64,
) -> Result<Vec<EpisodeSummary>, CatalogError>
where
    P: CatalogProvider + ?Sized,
{
    provider.episodes_of_show(show_id)
}

/// Handles a search submission: fetches shows and renders them
///
/// The episodes panel is hidden before the request is sent, so it ends up
/// hidden whether the search succeeds or not. The shows list is only
/// touched once results have arrived; a failed search leaves it as it was.
///
/// # Examples
///
/// ```no_run
/// use show_finder::{Page, TvMazeCatalog, search_for_show_and_display};
///
/// let catalog = TvMazeCatalog::new();
/// let mut page = Page::new();
///
/// let shows = search_for_show_and_display(&mut page, &catalog, "batman", |_| {}).unwrap();
/// println!("Found {} show(s)", shows.len());
/// println!("{}", page.to_html());
/// ```
pub fn search_for_show_and_display<P, F>(
    page: &mut Page,
    provider: &P,
    term: &str,
    mut progress_callback: F,
) -> Result<Vec<ShowSummary>, ShowFinderError>
where
    P: CatalogProvider + ?Sized,
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::SearchStarted {
        term: term.to_string(),
    });

    page.episodes_area.hide();
    progress_callback(ProgressEvent::EpisodesPanelHidden);

    let shows = search_shows_by_term(provider, term)?;
    progress_callback(ProgressEvent::ShowsFetched { count: shows.len() });

    populate_shows(&mut page.shows_list, &shows);
    progress_callback(ProgressEvent::ShowsRendered { count: shows.len() });

    Ok(shows)
}

/// Handles a click on an episodes trigger: fetches and renders episodes
///
/// `target` is the clicked element as a path of child element indices
/// starting at the shows list. The show is taken from the nearest enclosing
/// element carrying [`SHOW_ID_ATTRIBUTE`].
pub fn show_episodes<P, F>(
    page: &mut Page,
    provider: &P,
    target: &[usize],
    progress_callback: F,
) -> Result<Vec<EpisodeSummary>, ShowFinderError>
where
    P: CatalogProvider + ?Sized,
    F: FnMut(ProgressEvent),
{
    let show_id = page.show_id_for(target)?;

    display_episodes_of_show(page, provider, show_id, progress_callback)
}

/// Fetches the episodes of a known show and renders them
///
/// On failure the episode list and panel visibility are left untouched.
pub fn display_episodes_of_show<P, F>(
    page: &mut Page,
    provider: &P,
    show_id: u64,
    mut progress_callback: F,
) -> Result<Vec<EpisodeSummary>, ShowFinderError>
where
    P: CatalogProvider + ?Sized,
    F: FnMut(ProgressEvent),
{
    progress_callback(ProgressEvent::FetchingEpisodes { show_id });
    let episodes = get_episodes_of_show(provider, show_id)?;

    populate_episodes(page, &episodes);
    progress_callback(ProgressEvent::EpisodesRendered {
        show_id,
        count: episodes.len(),
    });

    Ok(episodes)
}

/// A user interaction with the widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetEvent {
    /// The search form was submitted with the given term
    Submit { term: String },
    /// Something inside the shows list was clicked
    Click { target: Vec<usize> },
}

/// The search widget: a page plus the catalog it is wired to
///
/// Each event source has exactly one handler: submissions go to
/// [`search_for_show_and_display`], clicks inside the shows list that hit an
/// episodes trigger go to [`show_episodes`].
pub struct Widget<P> {
    provider: P,
    page: Page,
}

impl<P> Widget<P>
where
    P: CatalogProvider,
{
    /// Creates a widget on a fresh page
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            page: Page::new(),
        }
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Routes an event to its handler
    ///
    /// Clicks that do not land on an episodes trigger are ignored.
    pub fn dispatch<F>(
        &mut self,
        event: WidgetEvent,
        mut progress_callback: F,
    ) -> Result<(), ShowFinderError>
    where
        F: FnMut(ProgressEvent),
    {
        match event {
            WidgetEvent::Submit { term } => {
                search_for_show_and_display(
                    &mut self.page,
                    &self.provider,
                    &term,
                    progress_callback,
                )?;
            }
            WidgetEvent::Click { target } => {
                let on_trigger = self
                    .page
                    .shows_list
                    .element_at(&target)
                    .is_some_and(|element| element.has_class(EPISODES_TRIGGER_CLASS));

                if !on_trigger {
                    progress_callback(ProgressEvent::ClickIgnored { target });
                    return Ok(());
                }

                show_episodes(&mut self.page, &self.provider, &target, progress_callback)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// In-memory catalog recording every request it receives
    #[derive(Default)]
    struct FakeCatalog {
        shows: Vec<ShowSummary>,
        episodes: Vec<EpisodeSummary>,
        fail: bool,
        search_terms: RefCell<Vec<String>>,
        episode_requests: RefCell<Vec<u64>>,
    }

    impl CatalogProvider for FakeCatalog {
        fn search_shows(&self, term: &str) -> Result<Vec<ShowSummary>, CatalogError> {
            self.search_terms.borrow_mut().push(term.to_string());
            if self.fail {
                return Err(CatalogError::RequestError("connection refused".to_string()));
            }
            Ok(self.shows.clone())
        }

        fn episodes_of_show(&self, show_id: u64) -> Result<Vec<EpisodeSummary>, CatalogError> {
            self.episode_requests.borrow_mut().push(show_id);
            if self.fail {
                return Err(CatalogError::ParseError("expected value".to_string()));
            }
            Ok(self.episodes.clone())
        }
    }

    fn batman_catalog() -> FakeCatalog {
        FakeCatalog {
            shows: vec![
                ShowSummary::new(
                    1,
                    "Batman".to_string(),
                    "<p>The caped crusader.</p>".to_string(),
                    Some("https://static.tvmaze.com/batman.jpg".to_string()),
                ),
                ShowSummary::new(2, "Batman Beyond".to_string(), String::new(), None),
            ],
            episodes: vec![
                episode(11, "Hi Diddle Riddle", 1, 1),
                episode(12, "Smack in the Middle", 1, 2),
                episode(21, "Shoot a Crooked Arrow", 2, 1),
            ],
            ..Default::default()
        }
    }

    fn episode(id: u64, name: &str, season: i64, number: i64) -> EpisodeSummary {
        EpisodeSummary {
            id,
            name: name.to_string(),
            season: season.into(),
            number: number.into(),
        }
    }

    fn card_ids(page: &Page) -> Vec<String> {
        page.shows_list
            .child_elements()
            .filter_map(|card| card.attribute(SHOW_ID_ATTRIBUTE))
            .map(str::to_string)
            .collect()
    }

    fn episode_items(page: &Page) -> Vec<String> {
        page.episodes_list()
            .map(|list| list.child_elements().map(Element::text).collect())
            .unwrap_or_default()
    }

    #[test]
    fn test_search_forwards_term_once() {
        let catalog = FakeCatalog::default();
        let mut page = Page::new();

        for term in ["batman", "", "  spaced  "] {
            catalog.search_terms.borrow_mut().clear();
            search_for_show_and_display(&mut page, &catalog, term, |_| {}).unwrap();
            assert_eq!(*catalog.search_terms.borrow(), vec![term.to_string()]);
        }
    }

    #[test]
    fn test_search_renders_cards_in_order() {
        let catalog = batman_catalog();
        let mut page = Page::new();

        let shows = search_for_show_and_display(&mut page, &catalog, "batman", |_| {}).unwrap();

        assert_eq!(shows.len(), 2);
        assert_eq!(card_ids(&page), vec!["1", "2"]);

        let second_image = page.shows_list.element_at(&[1, 0, 0]).unwrap();
        assert_eq!(second_image.attribute("src"), Some(MISSING_IMAGE_URL));
        let first_image = page.shows_list.element_at(&[0, 0, 0]).unwrap();
        assert_eq!(
            first_image.attribute("src"),
            Some("https://static.tvmaze.com/batman.jpg")
        );
    }

    #[test]
    fn test_search_progress_events() {
        let catalog = batman_catalog();
        let mut page = Page::new();
        let mut events = Vec::new();

        search_for_show_and_display(&mut page, &catalog, "batman", |e| events.push(e)).unwrap();

        assert_eq!(
            events,
            vec![
                ProgressEvent::SearchStarted {
                    term: "batman".to_string()
                },
                ProgressEvent::EpisodesPanelHidden,
                ProgressEvent::ShowsFetched { count: 2 },
                ProgressEvent::ShowsRendered { count: 2 },
            ]
        );
    }

    #[test]
    fn test_episodes_click_renders_list() {
        let mut widget = Widget::new(batman_catalog());
        widget
            .dispatch(
                WidgetEvent::Submit {
                    term: "batman".to_string(),
                },
                |_| {},
            )
            .unwrap();

        widget
            .dispatch(
                WidgetEvent::Click {
                    target: episodes_trigger_target(0),
                },
                |_| {},
            )
            .unwrap();

        assert_eq!(*widget.provider().episode_requests.borrow(), vec![1]);
        assert_eq!(
            episode_items(widget.page()),
            vec![
                "Hi Diddle Riddle (season 1, number 1)",
                "Smack in the Middle (season 1, number 2)",
                "Shoot a Crooked Arrow (season 2, number 1)",
            ]
        );
        assert!(widget.page().episodes_area.is_visible());
    }

    #[test]
    fn test_click_resolves_own_card() {
        let mut widget = Widget::new(batman_catalog());
        widget
            .dispatch(
                WidgetEvent::Submit {
                    term: "batman".to_string(),
                },
                |_| {},
            )
            .unwrap();

        widget
            .dispatch(
                WidgetEvent::Click {
                    target: episodes_trigger_target(1),
                },
                |_| {},
            )
            .unwrap();

        assert_eq!(*widget.provider().episode_requests.borrow(), vec![2]);
    }

    #[test]
    fn test_click_outside_trigger_is_ignored() {
        let mut widget = Widget::new(batman_catalog());
        widget
            .dispatch(
                WidgetEvent::Submit {
                    term: "batman".to_string(),
                },
                |_| {},
            )
            .unwrap();

        let mut events = Vec::new();
        // The card's image
        widget
            .dispatch(
                WidgetEvent::Click {
                    target: vec![0, 0, 0],
                },
                |e| events.push(e),
            )
            .unwrap();

        assert!(widget.provider().episode_requests.borrow().is_empty());
        assert_eq!(
            events,
            vec![ProgressEvent::ClickIgnored {
                target: vec![0, 0, 0]
            }]
        );
        assert!(!widget.page().episodes_area.is_visible());
    }

    #[test]
    fn test_new_search_hides_episodes_panel() {
        let mut widget = Widget::new(batman_catalog());
        widget
            .dispatch(
                WidgetEvent::Submit {
                    term: "batman".to_string(),
                },
                |_| {},
            )
            .unwrap();
        widget
            .dispatch(
                WidgetEvent::Click {
                    target: episodes_trigger_target(0),
                },
                |_| {},
            )
            .unwrap();
        assert!(widget.page().episodes_area.is_visible());

        widget
            .dispatch(
                WidgetEvent::Submit {
                    term: "superman".to_string(),
                },
                |_| {},
            )
            .unwrap();
        assert!(!widget.page().episodes_area.is_visible());
    }

    #[test]
    fn test_failed_search_hides_panel_and_keeps_shows() {
        let catalog = batman_catalog();
        let mut page = Page::new();
        search_for_show_and_display(&mut page, &catalog, "batman", |_| {}).unwrap();
        show_episodes(&mut page, &catalog, &episodes_trigger_target(0), |_| {}).unwrap();
        assert!(page.episodes_area.is_visible());

        let failing = FakeCatalog {
            fail: true,
            ..Default::default()
        };
        let result = search_for_show_and_display(&mut page, &failing, "superman", |_| {});

        assert!(matches!(
            result,
            Err(ShowFinderError::Catalog(CatalogError::RequestError(_)))
        ));
        assert!(!page.episodes_area.is_visible());
        assert_eq!(card_ids(&page), vec!["1", "2"]);
    }

    #[test]
    fn test_failed_episode_fetch_keeps_previous_list() {
        let catalog = batman_catalog();
        let mut page = Page::new();
        search_for_show_and_display(&mut page, &catalog, "batman", |_| {}).unwrap();
        show_episodes(&mut page, &catalog, &episodes_trigger_target(0), |_| {}).unwrap();

        let failing = FakeCatalog {
            fail: true,
            ..Default::default()
        };
        let result = show_episodes(&mut page, &failing, &episodes_trigger_target(1), |_| {});

        assert!(matches!(result, Err(ShowFinderError::Catalog(_))));
        assert_eq!(episode_items(&page).len(), 3);
        assert_eq!(*failing.episode_requests.borrow(), vec![2]);
    }

    #[test]
    fn test_empty_search_result_clears_cards() {
        let mut page = Page::new();
        search_for_show_and_display(&mut page, &batman_catalog(), "batman", |_| {}).unwrap();

        let shows =
            search_for_show_and_display(&mut page, &FakeCatalog::default(), "zzz", |_| {})
                .unwrap();

        assert!(shows.is_empty());
        assert!(page.shows_list.children().is_empty());
    }

    #[test]
    fn test_show_episodes_without_card() {
        let mut page = Page::new();
        let result = show_episodes(&mut page, &batman_catalog(), &[0], |_| {});
        assert!(matches!(
            result,
            Err(ShowFinderError::Page(PageError::NoEnclosingShow(_)))
        ));
    }

    #[test]
    fn test_display_episodes_of_show_by_id() {
        let catalog = batman_catalog();
        let mut page = Page::new();
        let mut events = Vec::new();

        let episodes =
            display_episodes_of_show(&mut page, &catalog, 2, |e| events.push(e)).unwrap();

        assert_eq!(episodes.len(), 3);
        assert_eq!(*catalog.episode_requests.borrow(), vec![2]);
        assert_eq!(
            events,
            vec![
                ProgressEvent::FetchingEpisodes { show_id: 2 },
                ProgressEvent::EpisodesRendered {
                    show_id: 2,
                    count: 3
                },
            ]
        );
        assert!(page.episodes_area.is_visible());
        assert_eq!(episode_items(&page).len(), 3);
    }

    #[test]
    fn test_display_episodes_of_show_failure_keeps_panel_hidden() {
        let failing = FakeCatalog {
            fail: true,
            ..Default::default()
        };
        let mut page = Page::new();

        let result = display_episodes_of_show(&mut page, &failing, 5, |_| {});

        assert!(matches!(result, Err(ShowFinderError::Catalog(_))));
        assert!(!page.episodes_area.is_visible());
        assert!(episode_items(&page).is_empty());
    }
}
