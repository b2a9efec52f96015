//! Integration tests for paper-batch
//!
//! These tests drive a whole batch through the public API: read the table,
//! fetch every page from a local mock server, and write the batch file.

use std::path::{Path, PathBuf};

use paper_batch::batch::{render_text, write_json, BatchAssembler, BatchError, BatchWindow};
use paper_batch::config::FetchConfig;
use paper_batch::models::FetchStatus;
use paper_batch::resolver::AbstractResolver;
use paper_batch::sources::{SourceCapabilities, SourceRegistry};
use tempfile::tempdir;

fn expected_source_count() -> usize {
    let mut count = 0;

    if cfg!(feature = "source-arxiv") {
        count += 1;
    }
    if cfg!(feature = "source-neurips") {
        count += 1;
    }
    if cfg!(feature = "source-biorxiv") {
        // bioRxiv and medRxiv
        count += 2;
    }

    count
}

fn test_resolver(concurrency: usize) -> AbstractResolver {
    let config = FetchConfig {
        timeout_secs: 5,
        concurrency,
        ..FetchConfig::default()
    };
    AbstractResolver::from_config(&config).unwrap()
}

fn write_table(dir: &Path, rows: &[(&str, &str, &str)]) -> PathBuf {
    let path = dir.join("papers.csv");
    let mut csv = String::from("Cites,Authors,Title,Year,ArticleURL,Abstract\n");
    for (i, (title, url, abstract_text)) in rows.iter().enumerate() {
        csv.push_str(&format!(
            "{},A. Author,\"{}\",2021,{},\"{}\"\n",
            i + 1,
            title,
            url,
            abstract_text
        ));
    }
    std::fs::write(&path, csv).unwrap();
    path
}

#[test]
fn test_registry_has_builtin_sources() {
    let registry = SourceRegistry::new();
    assert_eq!(registry.len(), expected_source_count());

    let extractors = registry.with_capability(SourceCapabilities::EXTRACT);
    let rewriters = registry.with_capability(SourceCapabilities::REWRITE_URL);
    assert_eq!(extractors.len() + rewriters.len(), registry.len());
}

#[cfg(all(feature = "source-arxiv", feature = "source-neurips"))]
#[tokio::test]
async fn test_batch_end_to_end() {
    let mut server = mockito::Server::new_async().await;

    let _arxiv = server
        .mock("GET", "/arxiv.org/abs/2101.00001")
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(
            "<html><body><blockquote class=\"abstract\">\
             <span class=\"descriptor\">Abstract:</span> Transformers  <em>work</em>\n well.\
             </blockquote></body></html>",
        )
        .create_async()
        .await;
    let _neurips = server
        .mock("GET", "/proceedings.neurips.cc/paper/42-Abstract.html")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<h4>Abstract</h4>\n<p>Bandits &amp; regret.</p><p>Other text</p>")
        .create_async()
        .await;
    let _pdf = server
        .mock("GET", "/paper.pdf")
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body("%PDF-1.4")
        .create_async()
        .await;
    let _gone = server
        .mock("GET", "/gone")
        .with_status(404)
        .create_async()
        .await;
    let _plain = server
        .mock("GET", "/plain")
        .with_status(200)
        .with_header("content-type", "text/html")
        .with_body("<html><head><style>p{}</style></head><body><p>Just a page.</p></body></html>")
        .create_async()
        .await;

    let base = server.url();
    let arxiv_url = format!("{}/arxiv.org/abs/2101.00001", base);
    let neurips_url = format!("{}/proceedings.neurips.cc/paper/42-Abstract.html", base);
    let pdf_url = format!("{}/paper.pdf", base);
    let gone_url = format!("{}/gone", base);
    let plain_url = format!("{}/plain", base);

    let dir = tempdir().unwrap();
    let table = write_table(
        dir.path(),
        &[
            ("Attention", arxiv_url.as_str(), ""),
            ("Bandits", neurips_url.as_str(), ""),
            ("Scanned", pdf_url.as_str(), "From the table."),
            ("Missing", gone_url.as_str(), ""),
            ("Plain", plain_url.as_str(), ""),
            ("No link", "", "Only in the table."),
        ],
    );

    let assembler = BatchAssembler::new(test_resolver(2), &table);
    let window = BatchWindow::new(1, 20).unwrap();
    let mut resolved = 0;
    let records = assembler
        .assemble(window, |_| resolved += 1)
        .await
        .unwrap();

    assert_eq!(records.len(), 6);
    assert_eq!(resolved, 6);

    let indices: Vec<usize> = records.iter().map(|r| r.row_index).collect();
    assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);

    assert_eq!(records[0].fetch_status, FetchStatus::Ok);
    assert_eq!(
        records[0].fetched_abstract.as_deref(),
        Some("Transformers work well.")
    );
    assert_eq!(
        records[1].fetched_abstract.as_deref(),
        Some("Bandits & regret.")
    );
    assert_eq!(records[2].fetch_status.to_string(), "error:pdf-content");
    assert_eq!(records[2].best_abstract(), Some("From the table."));
    assert_eq!(records[3].fetch_status.to_string(), "error:http:404");
    assert!(records[3].fetched_abstract.is_none());
    assert_eq!(records[4].fetched_abstract.as_deref(), Some("Just a page."));
    assert_eq!(records[5].fetch_status.to_string(), "error:missing-url");

    let out_dir = dir.path().join("out").join("batches");
    let path = write_json(&records, &out_dir, window.index()).unwrap();
    assert_eq!(path, out_dir.join("batch_001.json"));

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let array = written.as_array().unwrap();
    assert_eq!(array.len(), 6);
    assert_eq!(array[0]["title"], "Attention");
    assert_eq!(array[0]["fetch_status"], "ok");
    assert_eq!(array[3]["fetched_abstract"], serde_json::Value::Null);
    assert_eq!(array[5]["csv_abstract"], "Only in the table.");

    let text = render_text(&records);
    assert!(text.starts_with("0001: Attention [ok]\nTransformers work well.\n"));
    assert!(text.contains("0004: Missing [error:http:404]\n<no abstract>\n"));
}

#[tokio::test]
async fn test_second_batch_window() {
    let dir = tempdir().unwrap();
    let titles: Vec<String> = (1..=25).map(|i| format!("Paper {}", i)).collect();
    let rows: Vec<(&str, &str, &str)> = titles.iter().map(|t| (t.as_str(), "", "")).collect();
    let table = write_table(dir.path(), &rows);

    let assembler = BatchAssembler::new(test_resolver(1), &table);
    let records = assembler
        .assemble(BatchWindow::new(2, 20).unwrap(), |_| {})
        .await
        .unwrap();

    assert_eq!(records.len(), 5);
    assert_eq!(records[0].row_index, 21);
    assert_eq!(records[0].title, "Paper 21");
    assert_eq!(records[4].row_index, 25);

    let err = assembler
        .assemble(BatchWindow::new(3, 20).unwrap(), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, BatchError::EmptyBatch { batch: 3 }));
    assert_eq!(err.to_string(), "No records found for the requested batch.");
}

#[tokio::test]
async fn test_missing_table() {
    let dir = tempdir().unwrap();
    let assembler = BatchAssembler::new(test_resolver(1), dir.path().join("absent.csv"));
    let err = assembler
        .assemble(BatchWindow::new(1, 20).unwrap(), |_| {})
        .await
        .unwrap_err();
    assert!(matches!(err, BatchError::InputMissing(_)));
}
