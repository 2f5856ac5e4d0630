mod client;
mod errors;
mod query;
pub mod types;
pub mod user_agent;
pub use self::client::{Client, DEFAULT_BASE_URL, LATEST_PATH, SEARCH_PATH};
pub use self::errors::Error;
pub use self::query::{fields, FormPayload, FormQuery, NextPageQuery, SearchQuery};
