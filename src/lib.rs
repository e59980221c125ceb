//! # site-helpers
//!
//! Build-pipeline helpers for a static site:
//!
//! - [`site`]: file discovery, JSON data reading, HTML page loading
//! - [`checker`]: link extraction and a concurrency-limited HEAD link checker
//!
//! ```rust,no_run
//! use site_helpers::checker::{LinkChecker, DEFAULT_CONCURRENCY};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let checker = LinkChecker::new()?;
//!     let urls = vec!["https://www.rust-lang.org".to_string()];
//!     for result in checker.check_all(&urls, DEFAULT_CONCURRENCY).await? {
//!         println!("{} {:?}", result.url, result.status_code());
//!     }
//!     Ok(())
//! }
//! ```

pub mod checker;
pub mod site;
