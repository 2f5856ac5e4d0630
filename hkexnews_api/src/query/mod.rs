mod common;
pub use self::common::{FormPayload, FormQuery};
pub mod fields;

mod search;
pub use self::search::SearchQuery;

mod next_page;
pub use self::next_page::NextPageQuery;
