use chrono::{DateTime, Local};
use serde::{Deserialize, Deserializer, Serialize};

/// GNews sends `null` for text it doesn't have; treat it like a missing field.
fn null_to_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Source {
    #[serde(default, deserialize_with = "null_to_default")]
    pub name: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// One article as returned in the GNews `articles` array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    #[serde(default, deserialize_with = "null_to_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_to_default")]
    pub description: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    pub published_at: String,
    pub source: Source,
}

impl NewsItem {
    /// Publication time rendered in the local zone, or the raw string when
    /// the API sent something that isn't RFC 3339.
    pub fn published_local(&self) -> String {
        DateTime::parse_from_rfc3339(&self.published_at)
            .map(|dt| {
                dt.with_timezone(&Local)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_else(|_| self.published_at.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"{
        "title": "Rust 2024 ships",
        "description": "The new edition is out.",
        "content": "Long body...",
        "url": "https://example.com/rust",
        "image": "https://example.com/rust.png",
        "publishedAt": "2025-02-20T14:00:00Z",
        "source": { "name": "Example News", "url": "https://example.com" }
    }"#;

    #[test]
    fn deserializes_gnews_article() {
        let item: NewsItem = serde_json::from_str(ARTICLE).unwrap();
        assert_eq!(item.title, "Rust 2024 ships");
        assert_eq!(item.published_at, "2025-02-20T14:00:00Z");
        assert_eq!(item.source.name, "Example News");
        assert_eq!(item.image.as_deref(), Some("https://example.com/rust.png"));
    }

    #[test]
    fn optional_fields_may_be_missing() {
        let item: NewsItem = serde_json::from_str(
            r#"{"title": "t", "publishedAt": "x", "source": {"name": "s"}}"#,
        )
        .unwrap();
        assert!(item.description.is_empty());
        assert!(item.image.is_none());
        assert!(item.source.url.is_none());
    }

    #[test]
    fn null_text_fields_become_empty() {
        let item: NewsItem = serde_json::from_str(
            r#"{
                "title": null,
                "description": null,
                "image": null,
                "publishedAt": "2025-02-20T14:00:00Z",
                "source": {"name": null, "url": null}
            }"#,
        )
        .unwrap();
        assert!(item.title.is_empty());
        assert!(item.description.is_empty());
        assert!(item.source.name.is_empty());
        assert!(item.image.is_none());
    }

    #[test]
    fn one_null_description_keeps_its_siblings() {
        let items: Vec<NewsItem> = serde_json::from_str(&format!(
            r#"[{ARTICLE}, {{"title": "t", "description": null, "publishedAt": "x", "source": {{"name": "s"}}}}]"#
        ))
        .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Rust 2024 ships");
        assert!(items[1].description.is_empty());
    }

    #[test]
    fn unparseable_timestamp_is_shown_raw() {
        let mut item: NewsItem = serde_json::from_str(ARTICLE).unwrap();
        item.published_at = "yesterday".into();
        assert_eq!(item.published_local(), "yesterday");
    }
}
