use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::prelude::*;

mod app;
mod config;
mod error;
mod i18n;
mod models;
mod picker;
mod services;
mod tui;
mod util;
mod view;

use app::App;
use config::Config;
use error::Result;
use models::{Category, NewsItem};
use tui::{draw, handle_key_event};
use util::{sort_alphabetically_asc, sort_alphabetically_desc};
use view::NewsView;

fn init_logging() {
    // Stderr is hidden behind the alternate screen, so also append to a file
    use std::fs::OpenOptions;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;

    let log_path = std::env::temp_dir().join("newsdeck.log");
    let log_file = match OpenOptions::new().create(true).append(true).open(&log_path) {
        Ok(file) => Some(std::sync::Arc::new(std::sync::Mutex::new(file))),
        Err(err) => {
            eprintln!("Warning: unable to open {}: {err}", log_path.display());
            None
        }
    };

    struct DualWriter {
        file: Option<std::sync::Arc<std::sync::Mutex<std::fs::File>>>,
    }

    impl Write for DualWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            if let Some(file) = &self.file {
                if let Ok(mut file) = file.lock() {
                    let _ = file.write_all(buf);
                }
            }
            std::io::stderr().write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            if let Some(file) = &self.file {
                if let Ok(mut file) = file.lock() {
                    let _ = file.flush();
                }
            }
            std::io::stderr().flush()
        }
    }

    impl<'a> MakeWriter<'a> for DualWriter {
        type Writer = DualWriter;

        fn make_writer(&'a self) -> Self::Writer {
            DualWriter {
                file: self.file.clone(),
            }
        }
    }

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(DualWriter { file: log_file })
        .init();
}

/// What the command line asked for.
enum Mode {
    Interactive,
    Headlines(Category),
    Search(String),
}

fn parse_args(args: &[String]) -> Mode {
    match args.get(1).map(String::as_str) {
        Some("--headlines") => {
            let category = args
                .get(2)
                .and_then(|c| Category::from_param(c))
                .unwrap_or_default();
            Mode::Headlines(category)
        }
        Some("--search") if args.len() >= 3 => Mode::Search(args[2..].join(" ")),
        _ => Mode::Interactive,
    }
}

fn print_news(mut items: Vec<NewsItem>) {
    if items.is_empty() {
        println!("No news available.");
        return;
    }

    // Newest first; RFC 3339 UTC timestamps order lexically
    items.sort_by(|a, b| sort_alphabetically_desc(&a.published_at, &b.published_at));

    for item in &items {
        println!("{}  {}", item.published_local(), item.title);
        if !item.description.is_empty() {
            for line in textwrap::wrap(&item.description, 78) {
                println!("    {line}");
            }
        }
        println!("    - {}", item.source.name);
        if let Some(url) = &item.url {
            println!("    {url}");
        }
        println!();
    }

    let mut sources: Vec<&str> = items.iter().map(|i| i.source.name.as_str()).collect();
    sources.sort_by(|a, b| sort_alphabetically_asc(a, b));
    sources.dedup();
    println!("{} articles from {}", items.len(), sources.join(", "));
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Load configuration
    let config = Config::load()?;

    // Initialize app
    let mut app = App::new(&config)?;

    // Headless modes print one fetch and exit; errors go to the caller
    match parse_args(&args) {
        Mode::Headlines(category) => {
            let mut view = NewsView::new(config.ui.items_per_page);
            view.set_category(category);
            let items = app.fetch_blocking(&view.headlines_request()).await?;
            print_news(items);
            return Ok(());
        }
        Mode::Search(query) => {
            let mut view = NewsView::new(config.ui.items_per_page);
            view.set_search(query);
            let items = app.fetch_blocking(&view.search_request()).await?;
            print_news(items);
            return Ok(());
        }
        Mode::Interactive => {}
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        // Refetch headlines if any watched filter changed (also the initial load)
        app.watch_filters();

        terminal.draw(|frame| draw(frame, app))?;

        // Advance spinner animation
        app.tick_spinner();

        // Apply completed fetches
        app.poll_fetch_results();

        // Poll for events with timeout to allow async operations
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(action) = handle_key_event(key, app.mode) {
                    let should_quit = app.handle_action(action).await?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }
    }
}
