// src/main.rs
// =============================================================================
// This is the entry point of the site-helpers CLI.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging (tracing, to stderr)
// 3. Dispatch to the appropriate subcommand handler
// 4. Exit with proper code (0 = success, 1 = broken links, 2 = error)
// =============================================================================

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use site_helpers::checker::{collect_external_links, CheckResult, LinkChecker, LinkOutcome};
use site_helpers::site::{self, HtmlPage};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let exit_code = match run(cli.command).await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            error!("{e:#}");
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so that --json output on stdout stays clean
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// Returns:
//   Ok(0) = success / no broken links
//   Ok(1) = broken links found
//   Err   = unexpected error (exit code 2)
async fn run(command: Commands) -> Result<i32> {
    match command {
        Commands::Check { dir, ext, ignore, concurrency, json } => {
            handle_check(&dir, &ext, &ignore, concurrency, json).await
        }
        Commands::Files { dir, ext, all, generate } => handle_files(&dir, &ext, all, generate),
        Commands::Json { files } => handle_json(&files),
        Commands::Touch { path } => {
            site::touch(&path).with_context(|| format!("failed to touch {}", path.display()))?;
            Ok(0)
        }
    }
}

// Handles the 'check' subcommand: pages -> external links -> HEAD checks
async fn handle_check(dir: &Path, ext: &str, ignore: &[String], concurrency: usize, json: bool) -> Result<i32> {
    let files = site::get_files(dir, Some(ext), ignore)
        .with_context(|| format!("failed to list pages in {}", dir.display()))?;

    if files.is_empty() {
        warn!(dir = %dir.display(), ext, "no pages found");
        return Ok(0);
    }
    info!("found {} page(s) to scan", files.len());

    let mut pages = site::read_html_files(&files).context("failed to read pages")?;
    let urls = collect_external_links(pages.iter().map(|page| &page.links));

    if urls.is_empty() {
        info!("no external links found to check");
        return Ok(0);
    }

    let checker = LinkChecker::new().context("failed to build HTTP client")?;
    let results = checker
        .check_all(&urls, concurrency)
        .await
        .context("link check aborted")?;

    attach_page_errors(&mut pages, &results);
    print_results(&results, &pages, json)?;

    let broken_count = results.iter().filter(|r| !r.is_ok()).count();
    Ok(if broken_count > 0 { 1 } else { 0 })
}

// Records every broken external link on the pages that reference it
fn attach_page_errors(pages: &mut [HtmlPage], results: &[CheckResult]) {
    let by_url: HashMap<&str, &CheckResult> = results.iter().map(|r| (r.url.as_str(), r)).collect();

    for page in pages.iter_mut() {
        let external = &page.links.external;
        let broken: Vec<String> = external
            .links
            .iter()
            .chain(&external.images)
            .filter_map(|url| by_url.get(url.as_str()))
            .filter(|result| !result.is_ok())
            .map(|result| format!("{} ({})", result.url, format_status(result)))
            .collect();
        page.errors.extend(broken);
    }
}

fn print_results(results: &[CheckResult], pages: &[HtmlPage], json: bool) -> Result<()> {
    if json {
        let pages_with_errors: Vec<&HtmlPage> = pages.iter().filter(|p| !p.errors.is_empty()).collect();
        let output = serde_json::json!({
            "results": results,
            "pages": pages_with_errors,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_table(results);
        print_pages(pages);
    }
    Ok(())
}

fn print_table(results: &[CheckResult]) {
    println!("{:<60} {:<8} {:<30}", "URL", "STATUS", "ERROR");
    println!("{}", "=".repeat(100));

    for result in results {
        let error = result.error().map(ToString::to_string).unwrap_or_default();
        let status = result
            .status_code()
            .map(|code| code.to_string())
            .unwrap_or_else(|| "-".to_string());

        println!("{:<60} {:<8} {:<30}", truncate(&result.url, 57), status, error);
    }

    println!();

    let ok_count = results.iter().filter(|r| r.is_ok()).count();
    println!("Summary:");
    println!("   OK: {}", ok_count);
    println!("   Broken: {}", results.len() - ok_count);
    println!("   Total: {}", results.len());
}

fn print_pages(pages: &[HtmlPage]) {
    let broken_pages: Vec<&HtmlPage> = pages.iter().filter(|p| !p.errors.is_empty()).collect();
    if broken_pages.is_empty() {
        return;
    }

    println!();
    println!("Pages with broken links:");
    for page in broken_pages {
        println!("   {}", page.path.display());
        for error in &page.errors {
            println!("      {}", error);
        }
    }
}

fn format_status(result: &CheckResult) -> String {
    match &result.outcome {
        LinkOutcome::Status { code } => format!("HTTP {code}"),
        LinkOutcome::NoStatus => "no status".to_string(),
        LinkOutcome::Failed { error } => error.to_string(),
    }
}

// Cuts long URLs on a char boundary so the table stays aligned
fn truncate(url: &str, max: usize) -> String {
    if url.chars().count() > max {
        let cut: String = url.chars().take(max).collect();
        format!("{cut}...")
    } else {
        url.to_string()
    }
}

// Handles the 'files' subcommand
fn handle_files(dir: &Path, ext: &str, all: bool, generate: bool) -> Result<i32> {
    let files = if all {
        site::get_all_files(dir)
    } else if generate {
        site::get_generate_files(dir)
    } else {
        site::get_files(dir, Some(ext), &[])
    }
    .with_context(|| format!("failed to list files in {}", dir.display()))?;

    for file in files {
        println!("{}", file.display());
    }
    Ok(0)
}

// Handles the 'json' subcommand
fn handle_json(files: &[PathBuf]) -> Result<i32> {
    let values = site::read_json(files)?;
    info!("{} JSON file(s) are valid", values.len());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use site_helpers::checker::TransportError;
    use site_helpers::site::read_html_file;
    use std::fs;

    #[test]
    fn test_attach_page_errors_marks_only_broken_links() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        fs::write(
            &path,
            r#"<a href="https://ok.example/">ok</a><a href="https://down.example/">down</a>"#,
        )
        .unwrap();

        let mut pages = vec![read_html_file(&path).unwrap()];
        let results = vec![
            CheckResult::status("https://ok.example/", 200),
            CheckResult::failed("https://down.example/", TransportError::Timeout),
        ];

        attach_page_errors(&mut pages, &results);
        assert_eq!(pages[0].errors, vec!["https://down.example/ (request timed out)"]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("https://a.example/", 57), "https://a.example/");
        assert_eq!(truncate("abcdef", 3), "abc...");
    }

    #[test]
    fn test_format_status() {
        assert_eq!(format_status(&CheckResult::status("u", 404)), "HTTP 404");
    }
}
