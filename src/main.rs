use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use show_finder::{
    CARD_IMAGE_PATH, CARD_SUMMARY_PATH, CARD_TITLE_PATH, Page, ProgressEvent, SHOW_ID_ATTRIBUTE,
    ShowFinderError, TvMazeCatalog, Widget, WidgetEvent, display_episodes_of_show,
    episodes_trigger_target,
};
use std::process;

/// Search the TVMaze catalog for shows and browse their episodes
#[derive(Parser)]
#[command(name = "show-finder")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Base URL of the TVMaze compatible API
    #[arg(long, global = true)]
    base_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactively search shows and list their episodes (default)
    Browse,

    /// Search shows matching a title
    Search {
        /// Title to search for, may be empty
        term: String,

        /// Print the rendered page markup instead of text
        #[arg(long)]
        html: bool,
    },

    /// List the episodes of a show
    Episodes {
        /// Catalog identifier of the show
        show_id: u64,

        /// Print the rendered page markup instead of text
        #[arg(long)]
        html: bool,
    },
}

/// Handles progress events and prints formatted output to stdout
fn handle_progress_event(event: ProgressEvent) {
    match event {
        ProgressEvent::SearchStarted { term } => {
            println!("Searching shows matching '{}'...", term);
        }
        ProgressEvent::EpisodesPanelHidden | ProgressEvent::ShowsRendered { .. } => {}
        ProgressEvent::ShowsFetched { count } => {
            println!("Found {} show(s)\n", count);
        }
        ProgressEvent::ClickIgnored { target } => {
            println!("Nothing to do for element {:?}", target);
        }
        ProgressEvent::FetchingEpisodes { show_id } => {
            println!("\nRetrieving episodes of show #{}...", show_id);
        }
        ProgressEvent::EpisodesRendered { count, .. } => {
            println!("Found {} episode(s)\n", count);
        }
    }
}

/// Prints the show cards currently on the page
fn print_shows(page: &Page) {
    let mut empty = true;

    for (index, card) in page.shows_list.child_elements().enumerate() {
        empty = false;
        let title = card
            .element_at(&CARD_TITLE_PATH)
            .map(|title| title.text())
            .unwrap_or_default();
        let summary = card
            .element_at(&CARD_SUMMARY_PATH)
            .map(|summary| summary.text())
            .unwrap_or_default();
        let image = card
            .element_at(&CARD_IMAGE_PATH)
            .and_then(|image| image.attribute("src"))
            .unwrap_or_default();

        println!(
            "#{} {} [id {}]",
            index + 1,
            title,
            card.attribute(SHOW_ID_ATTRIBUTE).unwrap_or("?")
        );
        println!("  Image: {}", image);
        if !summary.is_empty() {
            println!("  Summary: {}", summary);
        }
        println!();
    }

    if empty {
        println!("No shows found.");
    }
}

/// Prints the episode list if the episodes area is visible
fn print_episodes(page: &Page) {
    if !page.episodes_area.is_visible() {
        return;
    }

    let Some(list) = page.episodes_list() else {
        return;
    };

    for item in list.child_elements() {
        println!("  {}", item.text());
    }
    println!();
}

/// Titles of the cards on the page, in display order
fn card_titles(page: &Page) -> Vec<String> {
    page.shows_list
        .child_elements()
        .map(|card| {
            card.element_at(&CARD_TITLE_PATH)
                .map(|title| title.text())
                .unwrap_or_default()
        })
        .collect()
}

/// Runs the interactive search loop until the user quits
fn browse(mut widget: Widget<TvMazeCatalog>) -> Result<(), dialoguer::Error> {
    loop {
        let term: String = Input::new()
            .with_prompt("Search shows")
            .allow_empty(true)
            .interact_text()?;

        if let Err(e) = widget.dispatch(WidgetEvent::Submit { term }, handle_progress_event) {
            eprintln!("\nError during search: {}\n", e);
            continue;
        }
        print_shows(widget.page());

        loop {
            let titles = card_titles(widget.page());
            let mut items: Vec<String> = titles
                .iter()
                .map(|title| format!("Episodes of {}", title))
                .collect();
            items.push("New search".to_string());
            items.push("Quit".to_string());

            let selection = Select::new()
                .with_prompt("What next?")
                .items(&items)
                .default(0)
                .interact()?;

            if selection == titles.len() {
                break;
            }
            if selection > titles.len() {
                return Ok(());
            }

            let click = WidgetEvent::Click {
                target: episodes_trigger_target(selection),
            };
            match widget.dispatch(click, handle_progress_event) {
                Ok(()) => print_episodes(widget.page()),
                Err(e) => eprintln!("\nError while fetching episodes: {}\n", e),
            }
        }
    }
}

/// Runs a single search and prints the outcome
fn search_once(catalog: TvMazeCatalog, term: String, html: bool) -> Result<(), ShowFinderError> {
    let mut widget = Widget::new(catalog);

    widget.dispatch(WidgetEvent::Submit { term }, |event| {
        if !html {
            handle_progress_event(event)
        }
    })?;

    if html {
        print!("{}", widget.page().to_html());
    } else {
        print_shows(widget.page());
    }

    Ok(())
}

/// Lists the episodes of one show and prints the outcome
fn episodes_once(catalog: TvMazeCatalog, show_id: u64, html: bool) -> Result<(), ShowFinderError> {
    let mut page = Page::new();

    display_episodes_of_show(&mut page, &catalog, show_id, |event| {
        if !html {
            handle_progress_event(event)
        }
    })?;

    if html {
        print!("{}", page.to_html());
    } else {
        print_episodes(&page);
    }

    Ok(())
}

fn main() {
    let cli = Cli::parse();

    let catalog = match &cli.base_url {
        Some(url) => match TvMazeCatalog::with_base_url(url) {
            Ok(catalog) => catalog,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => TvMazeCatalog::new(),
    };

    match cli.command.unwrap_or(Commands::Browse) {
        Commands::Browse => {
            if let Err(e) = browse(Widget::new(catalog)) {
                eprintln!("\nError: {}", e);
                process::exit(1);
            }
        }
        Commands::Search { term, html } => {
            if let Err(e) = search_once(catalog, term, html) {
                eprintln!("\nError during search: {}", e);
                process::exit(1);
            }
        }
        Commands::Episodes { show_id, html } => {
            if let Err(e) = episodes_once(catalog, show_id, html) {
                eprintln!("\nError while fetching episodes: {}", e);
                process::exit(1);
            }
        }
    }
}
