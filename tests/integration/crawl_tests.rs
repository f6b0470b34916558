//! Integration tests for the crawl pipeline
//!
//! These tests drive the full runner (store, renderer, pagination) against
//! saved listing pages served by `SnapshotRenderer`, with the database on disk.

use quote_harvest::config::{parse_config, Config};
use quote_harvest::crawler::CrawlRunner;
use quote_harvest::renderer::SnapshotRenderer;
use quote_harvest::state::{CrawlState, DoneReason};
use quote_harvest::storage::{open_storage, QuoteRecord, SqliteStorage, Storage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn fixture_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/listing")
}

/// Creates a test configuration writing to a database inside `dir`
fn create_test_config(dir: &TempDir, max_pages: u32) -> Config {
    let toml = format!(
        r#"
[target]
url = "http://quotes.toscrape.com/js/"

[crawler]
max-pages = {}
wait-timeout-secs = 2
settle-delay-ms = 0

[output]
database-path = "{}"
"#,
        max_pages,
        dir.path().join("quotes.db").display()
    );
    parse_config(&toml).expect("test config should be valid")
}

fn quote_block(text: Option<&str>, author: Option<&str>) -> String {
    let text = text
        .map(|t| format!(r#"<span class="text">{}</span>"#, t))
        .unwrap_or_default();
    let author = author
        .map(|a| format!(r#"<span>by <small class="author">{}</small></span>"#, a))
        .unwrap_or_default();
    format!(r#"<div class="quote">{}{}</div>"#, text, author)
}

fn listing(blocks: &[String], next: Option<&str>) -> String {
    let pager = next
        .map(|href| {
            format!(
                r#"<nav><ul class="pager"><li class="next"><a href="{}">Next</a></li></ul></nav>"#,
                href
            )
        })
        .unwrap_or_default();
    format!("<html><body>{}{}</body></html>", blocks.concat(), pager)
}

async fn crawl(
    config: &Config,
    renderer: &mut SnapshotRenderer,
) -> (quote_harvest::CrawlReport, SqliteStorage) {
    let storage = open_storage(Path::new(&config.output.database_path))
        .expect("Failed to open storage");
    let mut runner = CrawlRunner::new(config.clone(), storage);
    let report = runner.run(renderer).await.expect("Crawl should not fail");
    (report, runner.into_storage())
}

#[tokio::test]
async fn test_full_crawl_follows_every_page() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir, 5);
    let mut renderer = SnapshotRenderer::from_dir(&fixture_dir()).expect("Failed to load fixtures");

    let (report, storage) = crawl(&config, &mut renderer).await;

    assert_eq!(report.final_state, Some(CrawlState::Done(DoneReason::NoNextPage)));
    assert_eq!(report.pages_processed, 3);
    assert_eq!(report.blocks_seen, 6);
    assert_eq!(report.blocks_skipped, 1);
    assert_eq!(report.records_stored, 5);
    assert_eq!(renderer.clicks(), 2);
    assert_eq!(renderer.close_calls(), 1);

    let quotes = storage.list().expect("Failed to list quotes");
    assert_eq!(quotes.len(), 5);

    // newest first, so the last page comes back first
    assert_eq!(quotes[0].author, "Albert Einstein");
    assert_eq!(quotes[0].tags, "adulthood,success,value");
    assert!(quotes.iter().all(|q| !q.author.is_empty()));

    let rowling = quotes
        .iter()
        .find(|q| q.author == "J.K. Rowling")
        .expect("Rowling quote should be stored");
    assert_eq!(rowling.tag_list(), vec!["abilities", "choices"]);
    assert!(rowling.text.starts_with("“It is our choices"));
}

#[tokio::test]
async fn test_max_pages_caps_crawl_with_next_control_remaining() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir, 2);
    let mut renderer = SnapshotRenderer::from_dir(&fixture_dir()).expect("Failed to load fixtures");

    let (report, storage) = crawl(&config, &mut renderer).await;

    assert_eq!(
        report.final_state,
        Some(CrawlState::Done(DoneReason::MaxPagesReached))
    );
    assert_eq!(report.pages_processed, 2);
    assert_eq!(renderer.clicks(), 1);
    assert_eq!(renderer.current_url(), None);
    assert_eq!(storage.count().unwrap(), 4);
}

#[tokio::test]
async fn test_single_page_with_one_authorless_block() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir, 1);

    let page = listing(
        &[
            quote_block(Some("“First.”"), Some("Ada")),
            quote_block(Some("“Orphaned.”"), None),
            quote_block(Some("“Second.”"), Some("Grace")),
        ],
        None,
    );
    let mut renderer = SnapshotRenderer::new()
        .with_page("index.html", page)
        .with_entry("index.html");

    let (report, storage) = crawl(&config, &mut renderer).await;

    assert!(report.is_success());
    assert!(report.final_state.map_or(false, |s| s.is_done()));
    assert_eq!(report.records_stored, 2);
    assert_eq!(report.blocks_skipped, 1);

    let authors: Vec<String> = storage.list().unwrap().into_iter().map(|q| q.author).collect();
    assert_eq!(authors, vec!["Grace", "Ada"]);
}

#[tokio::test(start_paused = true)]
async fn test_render_timeout_keeps_earlier_pages() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir, 5);

    let mut renderer = SnapshotRenderer::new()
        .with_page(
            "index.html",
            listing(&[quote_block(Some("“Kept.”"), Some("Ada"))], Some("page2.html")),
        )
        .with_page(
            "page2.html",
            listing(&[quote_block(Some("“Kept too.”"), Some("Grace"))], Some("page3.html")),
        )
        .with_page("page3.html", listing(&[], Some("page4.html")))
        .with_entry("index.html");

    let (report, storage) = crawl(&config, &mut renderer).await;

    assert_eq!(report.final_state, Some(CrawlState::Aborted { page: 3 }));
    assert!(!report.is_success());
    assert_eq!(report.pages_processed, 2);
    assert_eq!(renderer.close_calls(), 1);
    drop(storage);

    // committed rows survive a reopen of the file
    let reopened = open_storage(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(reopened.count().unwrap(), 2);
}

#[tokio::test]
async fn test_rerun_duplicates_records() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir, 5);

    for _ in 0..2 {
        let mut renderer =
            SnapshotRenderer::from_dir(&fixture_dir()).expect("Failed to load fixtures");
        crawl(&config, &mut renderer).await;
    }

    let storage = open_storage(Path::new(&config.output.database_path)).unwrap();
    assert_eq!(storage.count().unwrap(), 10);

    let quotes = storage.list().unwrap();
    let monroe = quotes
        .iter()
        .filter(|q| q.author == "Marilyn Monroe")
        .count();
    assert_eq!(monroe, 2);
}

#[tokio::test]
async fn test_crud_surface_manages_harvested_rows() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir, 1);
    let mut renderer = SnapshotRenderer::from_dir(&fixture_dir()).expect("Failed to load fixtures");

    let (_, mut storage) = crawl(&config, &mut renderer).await;
    let quotes = storage.list().unwrap();
    assert_eq!(quotes.len(), 3);

    let target = quotes[0].id;
    let edited = QuoteRecord::new("“Edited.”", "Editor", vec!["curated".to_string()]);
    storage.update(target, &edited).unwrap();
    assert_eq!(storage.get(target).unwrap().unwrap().author, "Editor");

    storage.delete(quotes[1].id).unwrap();
    assert_eq!(storage.count().unwrap(), 2);

    // a later crawl appends alongside the edited rows
    let mut renderer = SnapshotRenderer::from_dir(&fixture_dir()).expect("Failed to load fixtures");
    let (report, storage) = crawl(&config, &mut renderer).await;
    assert_eq!(report.records_stored, 3);
    assert_eq!(storage.count().unwrap(), 5);
}

#[tokio::test]
async fn test_unreachable_target_still_releases_renderer() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = create_test_config(&temp_dir, 3);

    // no entry document, so the target URL cannot be opened
    let mut renderer = SnapshotRenderer::new().with_page("elsewhere.html", listing(&[], None));

    let (report, storage) = crawl(&config, &mut renderer).await;

    assert!(report.final_state.is_none());
    assert!(report.failure.is_some());
    assert_eq!(renderer.open_calls(), 1);
    assert_eq!(renderer.close_calls(), 1);
    assert_eq!(storage.count().unwrap(), 0);
}
