use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Request};
use serde::{Deserialize, Serialize};

use crate::config::NewsApiConfig;
use crate::error::{AppError, Result};
use crate::models::{Category, NewsItem};

const SORT_BY: &str = "publishedAt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopHeadlinesQuery {
    pub category: Category,
    pub language: String,
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchQuery {
    pub query: String,
    pub language: String,
    pub from: String,
    pub to: String,
}

/// Where headlines come from. The TUI only ever talks to this trait.
#[async_trait]
pub trait NewsSource: Send + Sync {
    async fn fetch_top_headlines(&self, query: &TopHeadlinesQuery) -> Result<Vec<NewsItem>>;

    async fn search_news(&self, query: &SearchQuery) -> Result<Vec<NewsItem>>;
}

fn is_empty(s: &&str) -> bool {
    s.is_empty()
}

#[derive(Debug, Serialize)]
struct QueryParams<'a> {
    #[serde(skip_serializing_if = "is_empty")]
    q: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    category: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    lang: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    from: &'a str,
    #[serde(skip_serializing_if = "is_empty")]
    to: &'a str,
    sortby: &'static str,
    max: u32,
    token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ArticlesResponse {
    #[serde(rename = "totalArticles", default)]
    total_articles: u64,
    #[serde(default)]
    articles: Vec<NewsItem>,
}

pub struct GNewsClient {
    client: Client,
    config: NewsApiConfig,
}

impl GNewsClient {
    pub fn new(config: NewsApiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("newsdeck/0.1")
            .build()?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn token(&self) -> Result<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or(AppError::MissingApiKey)
    }

    fn top_headlines_request(&self, query: &TopHeadlinesQuery) -> Result<Request> {
        let params = QueryParams {
            q: "",
            category: query.category.as_param(),
            lang: &query.language,
            from: &query.from,
            to: &query.to,
            sortby: SORT_BY,
            max: self.config.max_results,
            token: self.token()?,
        };
        Ok(self
            .client
            .get(self.endpoint("top-headlines"))
            .query(&params)
            .build()?)
    }

    fn search_request(&self, query: &SearchQuery) -> Result<Request> {
        let params = QueryParams {
            q: &query.query,
            category: "",
            lang: &query.language,
            from: &query.from,
            to: &query.to,
            sortby: SORT_BY,
            max: self.config.max_results,
            token: self.token()?,
        };
        Ok(self
            .client
            .get(self.endpoint("search"))
            .query(&params)
            .build()?)
    }

    async fn execute(&self, request: Request) -> Result<Vec<NewsItem>> {
        let response = self.client.execute(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await?;
            return Err(AppError::NewsApi {
                status: status.as_u16(),
                message: api_error_message(&body),
            });
        }

        let bytes = response.bytes().await?;
        let body: ArticlesResponse = serde_json::from_slice(&bytes)?;
        tracing::debug!(
            "GNews returned {} of {} articles",
            body.articles.len(),
            body.total_articles
        );
        Ok(body.articles)
    }
}

#[async_trait]
impl NewsSource for GNewsClient {
    async fn fetch_top_headlines(&self, query: &TopHeadlinesQuery) -> Result<Vec<NewsItem>> {
        let request = self.top_headlines_request(query)?;
        self.execute(request).await
    }

    async fn search_news(&self, query: &SearchQuery) -> Result<Vec<NewsItem>> {
        let request = self.search_request(query)?;
        self.execute(request).await
    }
}

/// GNews reports failures as `{"errors": [..]}` or `{"errors": {field: msg}}`.
fn api_error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return body.trim().to_string();
    };

    let messages: Vec<String> = match value.get("errors") {
        Some(serde_json::Value::Array(errors)) => errors
            .iter()
            .filter_map(|e| e.as_str().map(str::to_string))
            .collect(),
        Some(serde_json::Value::Object(errors)) => errors
            .values()
            .filter_map(|e| e.as_str().map(str::to_string))
            .collect(),
        _ => Vec::new(),
    };

    if messages.is_empty() {
        body.trim().to_string()
    } else {
        messages.join("; ")
    }
}
