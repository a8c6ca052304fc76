use crate::config::DEFAULT_ITEMS_PER_PAGE;
use crate::error::Result;
use crate::models::{Category, Language, NewsItem};
use crate::services::{NewsSource, SearchQuery, TopHeadlinesQuery};
use crate::util::to_iso8601;

/// One fetch the view wants performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchRequest {
    TopHeadlines(TopHeadlinesQuery),
    Search(SearchQuery),
}

impl FetchRequest {
    pub async fn run(&self, source: &dyn NewsSource) -> Result<Vec<NewsItem>> {
        match self {
            FetchRequest::TopHeadlines(query) => source.fetch_top_headlines(query).await,
            FetchRequest::Search(query) => source.search_news(query).await,
        }
    }
}

/// Identifies an issued fetch. Only the newest ticket may update the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// The filters whose change triggers a headline refetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterKey {
    pub category: Category,
    pub language: String,
    pub from_date: String,
    pub to_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewStatus {
    Loading,
    Empty,
    Items,
}

#[derive(Debug)]
pub struct NewsView {
    search: String,
    category: Category,
    selected_language: String,
    from_date: String,
    to_date: String,
    news_data: Vec<NewsItem>,
    loading: bool,
    last_error: Option<String>,
    current_page: usize,
    items_per_page: usize,
    issued: u64,
    watched: Option<FilterKey>,
}

impl NewsView {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            search: String::new(),
            category: Category::All,
            selected_language: String::new(),
            from_date: String::new(),
            to_date: String::new(),
            news_data: Vec::new(),
            loading: false,
            last_error: None,
            current_page: 1,
            items_per_page: items_per_page.max(1),
            issued: 0,
            watched: None,
        }
    }

    // Filters

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn push_search_char(&mut self, c: char) {
        self.search.push(c);
    }

    pub fn pop_search_char(&mut self) {
        self.search.pop();
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn cycle_category(&mut self, forward: bool) {
        self.category = if forward {
            self.category.next()
        } else {
            self.category.prev()
        };
    }

    pub fn selected_language(&self) -> &str {
        &self.selected_language
    }

    pub fn set_language(&mut self, language: Language) {
        self.selected_language = language.code().to_string();
    }

    pub fn date_filter(&self) -> (&str, &str) {
        (&self.from_date, &self.to_date)
    }

    /// Stores a range reported by the picker as normalized instants.
    pub fn handle_date_change(&mut self, from: &str, to: &str) -> Result<()> {
        let from = to_iso8601(from)?;
        let to = to_iso8601(to)?;
        self.from_date = from;
        self.to_date = to;
        Ok(())
    }

    fn filter_key(&self) -> FilterKey {
        FilterKey {
            category: self.category,
            language: self.selected_language.clone(),
            from_date: self.from_date.clone(),
            to_date: self.to_date.clone(),
        }
    }

    // Fetching

    /// Returns a headline fetch the first time it is called and whenever the
    /// category, language or date range differ from the last call.
    pub fn watch(&mut self) -> Option<FetchRequest> {
        let key = self.filter_key();
        if self.watched.as_ref() == Some(&key) {
            return None;
        }
        self.watched = Some(key);
        Some(self.headlines_request())
    }

    pub fn headlines_request(&self) -> FetchRequest {
        FetchRequest::TopHeadlines(TopHeadlinesQuery {
            category: self.category,
            language: self.selected_language.clone(),
            from: self.from_date.clone(),
            to: self.to_date.clone(),
        })
    }

    /// The explicit search action. Category is not applied.
    pub fn search_request(&self) -> FetchRequest {
        FetchRequest::Search(SearchQuery {
            query: self.search.clone(),
            language: self.selected_language.clone(),
            from: self.from_date.clone(),
            to: self.to_date.clone(),
        })
    }

    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.loading = true;
        Ticket(self.issued)
    }

    /// Applies a finished fetch. Returns `false` when a newer fetch has been
    /// issued since, in which case the result is dropped.
    pub fn apply(&mut self, ticket: Ticket, outcome: Result<Vec<NewsItem>>) -> bool {
        if ticket != Ticket(self.issued) {
            tracing::debug!("Dropping stale fetch {:?} (latest {})", ticket, self.issued);
            return false;
        }

        match outcome {
            Ok(items) => {
                self.news_data = items;
                self.last_error = None;
            }
            Err(e) => {
                tracing::warn!("Error fetching news: {}", e);
                self.news_data = Vec::new();
                self.last_error = Some(e.to_string());
            }
        }
        self.loading = false;
        true
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn news_data(&self) -> &[NewsItem] {
        &self.news_data
    }

    pub fn status(&self) -> ViewStatus {
        if self.loading {
            ViewStatus::Loading
        } else if self.current_news().is_empty() {
            ViewStatus::Empty
        } else {
            ViewStatus::Items
        }
    }

    // Pagination

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.news_data.len().div_ceil(self.items_per_page)
    }

    /// The page window. Empty when the page lies past the data, which can
    /// happen after a refetch returns fewer items.
    pub fn current_news(&self) -> &[NewsItem] {
        let start = (self.current_page - 1) * self.items_per_page;
        if start >= self.news_data.len() {
            return &[];
        }
        let end = (start + self.items_per_page).min(self.news_data.len());
        &self.news_data[start..end]
    }

    pub fn next_page(&mut self) {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.current_page > 1 {
            self.current_page -= 1;
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        if (1..=self.total_pages()).contains(&page) {
            self.current_page = page;
        }
    }

    pub fn page_numbers(&self) -> Vec<usize> {
        (1..=self.total_pages()).collect()
    }
}

impl Default for NewsView {
    fn default() -> Self {
        Self::new(DEFAULT_ITEMS_PER_PAGE)
    }
}
