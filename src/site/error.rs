// src/site/error.rs
// Errors raised while discovering or reading site files.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("failed to walk directory `{0}`")]
    Walk(PathBuf, #[source] walkdir::Error),

    #[error("IO error on `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid JSON in `{0}`")]
    Json(PathBuf, #[source] serde_json::Error),
}
