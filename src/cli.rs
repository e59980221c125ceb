// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI structure is described by the structs
// and enums below, and clap generates the parser and --help output.
// =============================================================================

use clap::{Parser, Subcommand};
use site_helpers::checker::DEFAULT_CONCURRENCY;
use site_helpers::site::DEFAULT_EXTENSION;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "site-helpers",
    version,
    about = "Build-pipeline helpers for static sites",
    long_about = "site-helpers finds and reads the files of a generated static site and checks \
                  every external link in its HTML pages with HEAD requests."
)]
pub struct Cli {
    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check every external link found in the site's HTML pages
    ///
    /// Example: site-helpers check ./public --ignore 404.html --concurrency 20
    Check {
        /// Build output directory to scan
        dir: PathBuf,

        /// Extension of the pages to scan
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        ext: String,

        /// File names to skip (repeatable)
        #[arg(long = "ignore", value_name = "FILE_NAME")]
        ignore: Vec<String>,

        /// Maximum number of HEAD requests in flight
        #[arg(long, default_value_t = DEFAULT_CONCURRENCY, value_parser = parse_concurrency)]
        concurrency: usize,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// List files in a directory
    Files {
        dir: PathBuf,

        /// Only files with this extension
        #[arg(long, default_value = DEFAULT_EXTENSION, conflicts_with_all = ["all", "generate"])]
        ext: String,

        /// List every file
        #[arg(long, conflicts_with = "generate")]
        all: bool,

        /// List generator sources (.md and .html)
        #[arg(long)]
        generate: bool,
    },

    /// Validate JSON data files
    Json {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Create a file (and its parent directories) if it doesn't exist
    Touch { path: PathBuf },
}

// The limit must be a positive integer
fn parse_concurrency(value: &str) -> Result<usize, String> {
    match value.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(limit) => Ok(limit),
        Err(e) => Err(e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_check_defaults() {
        let cli = Cli::parse_from(["site-helpers", "check", "public"]);
        match cli.command {
            Commands::Check { dir, ext, ignore, concurrency, json } => {
                assert_eq!(dir, PathBuf::from("public"));
                assert_eq!(ext, ".html");
                assert!(ignore.is_empty());
                assert_eq!(concurrency, 50);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_check_rejects_zero_concurrency() {
        let parsed = Cli::try_parse_from(["site-helpers", "check", "public", "--concurrency", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_repeated_ignore() {
        let cli = Cli::parse_from([
            "site-helpers", "check", "public", "--ignore", "404.html", "--ignore", "drafts.html",
        ]);
        let Commands::Check { ignore, .. } = cli.command else {
            panic!("expected check");
        };
        assert_eq!(ignore, vec!["404.html", "drafts.html"]);
    }
}
