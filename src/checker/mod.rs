// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - http: HEAD requests, the Transport seam and the bounded batch runner
// - progress: per-run "N% TESTED" milestones
// - html: extracts links from generated HTML pages
// - error: per-link and per-batch error types
// =============================================================================

mod error;
mod html;
mod http;
mod progress;

pub use error::{CheckError, TransportError};
pub use html::{collect_external_links, extract_page_links, ExternalLinks, PageLinks};
pub use http::{
    CheckResult, HttpTransport, LinkChecker, LinkOutcome, Transport, CHECK_COOKIE, CHECK_USER_AGENT,
    DEFAULT_CONCURRENCY, NO_STATUS,
};
pub use progress::{ProgressEvent, ProgressTracker};
