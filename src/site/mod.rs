// src/site/mod.rs
// =============================================================================
// Helpers around the build output: finding files, reading JSON data and
// loading generated HTML pages.
// =============================================================================

mod discover;
mod error;
mod read;

pub use discover::{get_all_files, get_files, get_generate_files, is_file, touch, DEFAULT_EXTENSION};
pub use error::SiteError;
pub use read::{read_html_file, read_html_files, read_json, read_source_files, HtmlPage};
