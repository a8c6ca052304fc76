mod filter;
mod news;

pub use filter::{Category, Language};
pub use news::{NewsItem, Source};
