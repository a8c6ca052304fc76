use crate::error::{AppError, Result};
use crate::models::Language;

const FALLBACK: Language = Language::En;

fn lookup(language: Language, key: &str) -> Option<&'static str> {
    let text = match (language, key) {
        (Language::En, "news") => "News",
        (Language::En, "search") => "Search",
        (Language::En, "categories") => "Categories",
        (Language::En, "dateRange") => "Select Date Range",
        (Language::En, "noNews") => "No news available.",
        (Language::En, "loading") => "Loading",
        (Language::En, "confirm") => "Confirm",
        (Language::En, "clear") => "Clear",
        (Language::En, "today") => "Today",
        (Language::En, "page") => "Page",
        (Language::En, "language") => "Language",
        (Language::En, "help") => "Press ? for help",
        (Language::En, "fetchFailed") => "Request failed",

        (Language::Zh, "news") => "新闻",
        (Language::Zh, "search") => "搜索",
        (Language::Zh, "categories") => "类别",
        (Language::Zh, "dateRange") => "選擇日期範圍",
        (Language::Zh, "noNews") => "暂无新闻。",
        (Language::Zh, "loading") => "加载中",
        (Language::Zh, "confirm") => "确认",
        (Language::Zh, "clear") => "清除",
        (Language::Zh, "today") => "今天",
        (Language::Zh, "page") => "页",
        (Language::Zh, "language") => "语言",
        (Language::Zh, "help") => "按 ? 查看帮助",
        (Language::Zh, "fetchFailed") => "请求失败",

        _ => return None,
    };
    Some(text)
}

/// Translated UI strings for the active locale.
#[derive(Debug, Clone)]
pub struct Localizer {
    active: Language,
}

impl Localizer {
    pub fn new(language: Language) -> Self {
        Self { active: language }
    }

    pub fn active(&self) -> Language {
        self.active
    }

    /// Active locale first, then English, then the key itself.
    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        lookup(self.active, key)
            .or_else(|| lookup(FALLBACK, key))
            .unwrap_or(key)
    }

    pub async fn change_language(&mut self, code: &str) -> Result<()> {
        let language = Language::from_code(code)
            .ok_or_else(|| AppError::UnsupportedLanguage(code.to_string()))?;
        self.active = language;
        tracing::debug!("UI language set to {}", language.code());
        Ok(())
    }
}

impl Default for Localizer {
    fn default() -> Self {
        Self::new(FALLBACK)
    }
}
