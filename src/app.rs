use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::Config;
use crate::error::Result;
use crate::i18n::Localizer;
use crate::models::{Language, NewsItem};
use crate::picker::DateRangePicker;
use crate::services::{GNewsClient, NewsSource};
use crate::tui::AppAction;
use crate::view::{FetchRequest, NewsView, Ticket};

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Calendar,
    Help,
}

type FetchResult = (Ticket, Result<Vec<NewsItem>>);

pub struct App {
    pub view: NewsView,
    pub picker: DateRangePicker,
    pub localizer: Localizer,
    pub mode: InputMode,
    pub spinner_frame: usize,
    pub status_message: Option<String>,
    source: Arc<dyn NewsSource>,
    fetch_tx: UnboundedSender<FetchResult>,
    fetch_rx: UnboundedReceiver<FetchResult>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

impl App {
    pub fn new(config: &Config) -> Result<Self> {
        let client = GNewsClient::new(config.api.clone())?;
        Ok(Self::with_source(Arc::new(client), config))
    }

    pub fn with_source(source: Arc<dyn NewsSource>, config: &Config) -> Self {
        let (fetch_tx, fetch_rx) = mpsc::unbounded_channel();
        Self {
            view: NewsView::new(config.ui.items_per_page),
            picker: DateRangePicker::new(today()),
            localizer: Localizer::new(config.ui.language),
            mode: InputMode::Normal,
            spinner_frame: 0,
            status_message: None,
            source,
            fetch_tx,
            fetch_rx,
        }
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        if self.view.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Starts a fetch in the background; the result arrives through
    /// `poll_fetch_results`.
    fn dispatch(&mut self, request: FetchRequest) {
        let ticket = self.view.begin();
        let source = Arc::clone(&self.source);
        let tx = self.fetch_tx.clone();
        tracing::debug!("Dispatching {:?} as {:?}", request, ticket);

        tokio::spawn(async move {
            let result = request.run(source.as_ref()).await;
            // The receiver only goes away when the app shuts down.
            let _ = tx.send((ticket, result));
        });
    }

    /// Refetches headlines when category, language or date range changed.
    pub fn watch_filters(&mut self) {
        if let Some(request) = self.view.watch() {
            self.dispatch(request);
        }
    }

    pub fn poll_fetch_results(&mut self) {
        while let Ok((ticket, result)) = self.fetch_rx.try_recv() {
            if self.view.apply(ticket, result) {
                self.status_message = self
                    .view
                    .last_error()
                    .map(|e| format!("{}: {}", self.localizer.t("fetchFailed"), e));
            }
        }
    }

    /// Runs one request to completion outside the event loop.
    pub async fn fetch_blocking(&self, request: &FetchRequest) -> Result<Vec<NewsItem>> {
        request.run(self.source.as_ref()).await
    }

    async fn change_language(&mut self, language: Language) {
        self.view.set_language(language);
        if let Err(e) = self.localizer.change_language(language.code()).await {
            tracing::warn!("Error changing language: {}", e);
        }
    }

    fn apply_date_change(&mut self, from: &str, to: &str) {
        if let Err(e) = self.view.handle_date_change(from, to) {
            tracing::warn!("Ignoring date range {from:?}..{to:?}: {e}");
            self.status_message = Some(e.to_string());
        }
    }

    fn open_in_browser(&mut self) {
        let Some(url) = self
            .view
            .current_news()
            .iter()
            .find_map(|item| item.url.clone())
        else {
            return;
        };
        if let Err(e) = open::that(&url) {
            tracing::warn!("Failed to open {}: {}", url, e);
            self.status_message = Some(format!("Could not open browser: {e}"));
        }
    }

    /// Returns `true` when the app should quit.
    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::NextPage => self.view.next_page(),
            AppAction::PrevPage => self.view.prev_page(),
            AppAction::GoToPage(page) => self.view.go_to_page(page),

            AppAction::NextCategory => self.view.cycle_category(true),
            AppAction::PrevCategory => self.view.cycle_category(false),
            AppAction::ToggleLanguage => {
                let next = Language::from_code(self.view.selected_language())
                    .map(Language::toggle)
                    .unwrap_or(self.localizer.active().toggle());
                self.change_language(next).await;
            }
            AppAction::Refresh => {
                let request = self.view.headlines_request();
                self.dispatch(request);
            }
            AppAction::OpenInBrowser => self.open_in_browser(),

            AppAction::ShowHelp => self.mode = InputMode::Help,
            AppAction::HideHelp => self.mode = InputMode::Normal,

            AppAction::SearchStart => self.mode = InputMode::Search,
            AppAction::SearchChar(c) => self.view.push_search_char(c),
            AppAction::SearchBackspace => self.view.pop_search_char(),
            AppAction::SearchSubmit => {
                self.mode = InputMode::Normal;
                let request = self.view.search_request();
                self.dispatch(request);
            }
            AppAction::SearchCancel => self.mode = InputMode::Normal,

            AppAction::CalendarToggle => {
                self.picker.toggle();
                self.mode = if self.picker.is_open {
                    InputMode::Calendar
                } else {
                    InputMode::Normal
                };
            }
            AppAction::CalendarClose => {
                self.picker.close();
                self.mode = InputMode::Normal;
            }
            AppAction::CalendarMove(days) => self.picker.move_cursor(days),
            AppAction::CalendarSelect => self.picker.select_cursor(),
            AppAction::CalendarPrevMonth => self.picker.prev_month(),
            AppAction::CalendarNextMonth => self.picker.next_month(today()),
            AppAction::CalendarPrevYear => {
                let year = self.picker.view_year() - 1;
                self.picker.set_view_year(year, today());
            }
            AppAction::CalendarNextYear => {
                let year = self.picker.view_year() + 1;
                self.picker.set_view_year(year, today());
            }
            AppAction::CalendarToday => self.picker.today(today()),
            AppAction::CalendarConfirm => {
                if let Some((from, to)) = self.picker.confirm() {
                    self.apply_date_change(&from, &to);
                }
                self.mode = InputMode::Normal;
            }
            AppAction::CalendarClear => {
                let (from, to) = self.picker.clear();
                self.apply_date_change(&from, &to);
            }
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::error::AppError;
    use crate::models::{Category, Source};
    use crate::services::{SearchQuery, TopHeadlinesQuery};

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Top(TopHeadlinesQuery),
        Search(SearchQuery),
    }

    #[derive(Default)]
    struct StubSource {
        calls: Mutex<Vec<Call>>,
        fail: bool,
        count: usize,
    }

    impl StubSource {
        fn returning(count: usize) -> Arc<Self> {
            Arc::new(Self {
                count,
                ..Default::default()
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                fail: true,
                ..Default::default()
            })
        }

        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn respond(&self) -> Result<Vec<NewsItem>> {
            if self.fail {
                return Err(AppError::NewsApi {
                    status: 503,
                    message: "unavailable".into(),
                });
            }
            Ok((0..self.count)
                .map(|n| NewsItem {
                    title: format!("Story {n}"),
                    description: String::new(),
                    content: None,
                    url: None,
                    image: None,
                    published_at: "2025-01-01T00:00:00Z".into(),
                    source: Source {
                        name: "Stub".into(),
                        url: None,
                    },
                })
                .collect())
        }
    }

    #[async_trait]
    impl NewsSource for StubSource {
        async fn fetch_top_headlines(&self, query: &TopHeadlinesQuery) -> Result<Vec<NewsItem>> {
            self.calls.lock().unwrap().push(Call::Top(query.clone()));
            self.respond()
        }

        async fn search_news(&self, query: &SearchQuery) -> Result<Vec<NewsItem>> {
            self.calls.lock().unwrap().push(Call::Search(query.clone()));
            self.respond()
        }
    }

    fn app_with(source: Arc<StubSource>) -> App {
        App::with_source(source, &Config::default())
    }

    /// Waits for the next background fetch and applies it.
    async fn settle(app: &mut App) {
        let (ticket, result) = app.fetch_rx.recv().await.unwrap();
        app.view.apply(ticket, result);
    }

    #[tokio::test]
    async fn mount_fetches_top_headlines() {
        let source = StubSource::returning(5);
        let mut app = app_with(source.clone());

        app.watch_filters();
        assert!(app.view.is_loading());
        settle(&mut app).await;

        assert_eq!(source.calls(), vec![Call::Top(TopHeadlinesQuery::default())]);
        assert_eq!(app.view.news_data().len(), 5);
        assert_eq!(app.view.total_pages(), 3);
        assert!(!app.view.is_loading());
    }

    #[tokio::test]
    async fn category_change_with_search_text_uses_headlines_path() {
        let source = StubSource::returning(1);
        let mut app = app_with(source.clone());
        app.watch_filters();
        settle(&mut app).await;

        app.handle_action(AppAction::SearchStart).await.unwrap();
        for c in "rust".chars() {
            app.handle_action(AppAction::SearchChar(c)).await.unwrap();
        }
        app.handle_action(AppAction::SearchCancel).await.unwrap();
        app.handle_action(AppAction::NextCategory).await.unwrap();
        app.watch_filters();
        settle(&mut app).await;

        let calls = source.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| matches!(c, Call::Top(_))));
        assert!(matches!(&calls[1], Call::Top(q) if q.category == Category::General));
    }

    #[tokio::test]
    async fn search_submit_dispatches_search() {
        let source = StubSource::returning(2);
        let mut app = app_with(source.clone());
        app.view.set_search("climate");
        app.handle_action(AppAction::SearchSubmit).await.unwrap();
        settle(&mut app).await;

        assert_eq!(app.mode, InputMode::Normal);
        assert!(matches!(
            source.calls().as_slice(),
            [Call::Search(q)] if q.query == "climate"
        ));
    }

    #[tokio::test]
    async fn failed_fetch_shows_empty_list() {
        let mut app = app_with(StubSource::failing());
        app.watch_filters();
        let (ticket, result) = app.fetch_rx.recv().await.unwrap();
        app.fetch_tx.send((ticket, result)).unwrap();
        app.poll_fetch_results();

        assert!(app.view.news_data().is_empty());
        assert!(!app.view.is_loading());
        assert!(app.status_message.as_deref().unwrap().contains("unavailable"));
    }

    #[tokio::test]
    async fn language_toggle_updates_filter_and_locale() {
        let source = StubSource::returning(0);
        let mut app = app_with(source.clone());
        app.watch_filters();
        settle(&mut app).await;

        app.handle_action(AppAction::ToggleLanguage).await.unwrap();
        assert_eq!(app.view.selected_language(), "zh");
        assert_eq!(app.localizer.active(), Language::Zh);

        app.watch_filters();
        settle(&mut app).await;
        assert!(matches!(&source.calls()[1], Call::Top(q) if q.language == "zh"));

        app.handle_action(AppAction::ToggleLanguage).await.unwrap();
        assert_eq!(app.view.selected_language(), "en");
        assert_eq!(app.localizer.active(), Language::En);
    }

    #[tokio::test]
    async fn confirmed_range_reaches_the_filter() {
        let source = StubSource::returning(0);
        let mut app = app_with(source.clone());
        app.watch_filters();
        settle(&mut app).await;

        app.handle_action(AppAction::CalendarToggle).await.unwrap();
        assert_eq!(app.mode, InputMode::Calendar);
        app.handle_action(AppAction::CalendarSelect).await.unwrap();
        app.handle_action(AppAction::CalendarMove(-3)).await.unwrap();
        app.handle_action(AppAction::CalendarSelect).await.unwrap();
        app.handle_action(AppAction::CalendarConfirm).await.unwrap();
        assert_eq!(app.mode, InputMode::Normal);
        assert!(!app.picker.is_open);

        let (from, to) = app.view.date_filter();
        assert!(from.ends_with("T00:00:00.000Z"));
        assert!(from < to);

        app.watch_filters();
        settle(&mut app).await;
        assert!(matches!(&source.calls()[1], Call::Top(q) if !q.from.is_empty()));
    }

    #[tokio::test]
    async fn partial_range_confirm_changes_nothing() {
        let mut app = app_with(StubSource::returning(0));
        app.handle_action(AppAction::CalendarToggle).await.unwrap();
        app.handle_action(AppAction::CalendarSelect).await.unwrap();
        app.handle_action(AppAction::CalendarConfirm).await.unwrap();
        assert_eq!(app.view.date_filter(), ("", ""));
        assert_eq!(app.mode, InputMode::Normal);
    }

    #[tokio::test]
    async fn clear_resets_filter_and_keeps_popover_open() {
        let mut app = app_with(StubSource::returning(0));
        app.view.handle_date_change("2025-01-01", "2025-01-05").unwrap();
        app.handle_action(AppAction::CalendarToggle).await.unwrap();
        app.handle_action(AppAction::CalendarClear).await.unwrap();
        assert_eq!(app.view.date_filter(), ("", ""));
        assert!(app.picker.is_open);
        assert_eq!(app.mode, InputMode::Calendar);
    }

    #[tokio::test]
    async fn quit_returns_true() {
        let mut app = app_with(StubSource::returning(0));
        assert!(app.handle_action(AppAction::Quit).await.unwrap());
        assert!(!app.handle_action(AppAction::NextPage).await.unwrap());
    }

    #[tokio::test]
    async fn spinner_only_moves_while_loading() {
        let mut app = app_with(StubSource::returning(0));
        app.tick_spinner();
        assert_eq!(app.spinner_frame, 0);
        app.watch_filters();
        app.tick_spinner();
        assert_eq!(app.spinner_frame, 1);
        settle(&mut app).await;
    }
}
