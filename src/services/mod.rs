mod gnews;

pub use gnews::{GNewsClient, NewsSource, SearchQuery, TopHeadlinesQuery};
