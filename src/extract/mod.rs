pub mod cache;
pub mod heuristic;
pub mod llm;
pub mod page;

pub use cache::{clear_cache, get_cache_path, CacheConfig, PageCache};
pub use llm::{ExtractError, LlmExtractor};
pub use page::{build_client, fetch_url, normalize_url, FetchError, FetchedPage};
