//! Contract Invariant Tests
//!
//! These tests verify the parsing and rendering guarantees end to end.

use chrono::{TimeZone, Utc};
use std::fs;

use sheetblog_core::{
    csv::{self, Record},
    generator::{ArtifactKind, BlogGenerator, GenerateError},
    templates::{render, ColorScheme, TemplateContext, TemplateSource, BUNDLED_TEMPLATE, FALLBACK_TEMPLATE},
    AppConfig, ConfigStore,
};

fn test_context(scheme: ColorScheme) -> TemplateContext {
    TemplateContext::new("Field Notes", "Writing from the sheet", "notes, sheets", scheme)
        .with_year("2025")
}

fn test_config() -> AppConfig {
    AppConfig {
        spreadsheet_id: "1sheetABC".to_string(),
        blog_title: "Field Notes".to_string(),
        blog_description: "Writing from the sheet".to_string(),
        blog_keywords: "notes, sheets".to_string(),
        ..AppConfig::default()
    }
}

/// Writes records as plain CSV. Values must not contain commas or quotes.
fn encode_csv(headers: &[&str], records: &[Record]) -> String {
    let mut out = headers.join(",");
    for record in records {
        out.push('\n');
        let row: Vec<&str> = headers
            .iter()
            .map(|h| record.get(h).unwrap_or(""))
            .collect();
        out.push_str(&row.join(","));
    }
    out
}

#[test]
fn invariant_matching_row_yields_one_record() {
    let records = csv::parse("Title,Category,Author\nFirst Post,News,Ann");
    assert_eq!(records.len(), 1);

    let record = &records[0];
    assert_eq!(record.get("title"), Some("First Post"));
    assert_eq!(record.get("category"), Some("News"));
    assert_eq!(record.get("author"), Some("Ann"));
}

#[test]
fn invariant_mismatched_row_dropped() {
    let header = "title,content";
    for bad in ["only-one", "a,b,c", "a,b,", ""] {
        assert_eq!(csv::parse(&format!("{}\n{}", header, bad)).len(), 0, "line {:?}", bad);
    }
}

#[test]
fn invariant_quoted_comma_kept_in_field() {
    let records = csv::parse("title,content\n\"Hello, World\",body text");
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].get("title"), Some("Hello, World"));
    assert_eq!(records[0].get("content"), Some("body text"));
}

#[test]
fn invariant_slug_derived_from_title() {
    let records = csv::parse("title\n\"Hello, World!\"");
    assert_eq!(records[0].slug(), Some("hello-world"));
}

#[test]
fn invariant_empty_input_yields_nothing() {
    assert!(csv::parse("").is_empty());
    assert!(csv::parse("title,content").is_empty());
}

#[test]
fn invariant_csv_round_trip() {
    let headers = ["id", "title", "slug", "category"];
    let original: Vec<Record> = vec![
        [("id", "1"), ("title", "First"), ("slug", "first"), ("category", "News")]
            .into_iter()
            .collect(),
        [("id", "7"), ("title", "Second Post"), ("slug", "second-post"), ("category", "Tech")]
            .into_iter()
            .collect(),
    ];

    let parsed = csv::parse(&encode_csv(&headers, &original));
    assert_eq!(parsed, original);
}

/// Cases where the Rust parser and the worker's `csvToRecords` must agree.
/// Expected output is what the worker produces for the same text.
#[test]
fn invariant_parser_agrees_with_worker_parser() {
    let cases = [
        (
            "title,content\n\"Hello, World\",body",
            r#"[{"title":"Hello, World","content":"body","id":"1","slug":"hello-world"}]"#,
        ),
        (
            "title,content\r\nA,B\r\nC,D\r\n",
            r#"[{"title":"A","content":"B","id":"1","slug":"a"},{"title":"C","content":"D","id":"2","slug":"c"}]"#,
        ),
        (
            "id,title\n,Hello\n9,World",
            r#"[{"id":"1","title":"Hello","slug":"hello"},{"id":"9","title":"World","slug":"world"}]"#,
        ),
        (
            "\u{feff}title,content\nHello There,body",
            r#"[{"title":"Hello There","content":"body","id":"1","slug":"hello-there"}]"#,
        ),
    ];

    for (input, expected) in cases {
        let json = serde_json::to_string(&csv::parse(input)).unwrap();
        assert_eq!(json, expected, "input {:?}", input);
    }

    // The worker implements the same rules in JavaScript
    let script = sheetblog_core::worker::WORKER_TEMPLATE;
    for rule in [
        "if (values.length !== headers.length) continue",
        "if (line.length === 0) return []",
        "if (!record.id) record.id = String(i)",
        "values.push(current.trim().replace(/\"/g, ''))",
    ] {
        assert!(script.contains(rule), "worker parser lacks {:?}", rule);
    }
}

#[test]
fn invariant_render_without_tokens_is_identity() {
    let template = "<html><body><p>{{ site_title }} {{author}}</p></body></html>";
    for scheme in ColorScheme::ALL {
        assert_eq!(render(template, &test_context(scheme)), template);
    }
}

#[test]
fn invariant_secondary_color_replaced_everywhere() {
    let out = render("a#1d4ed8 b#1d4ed8", &test_context(ColorScheme::Green));
    assert_eq!(out, "a#047857 b#047857");
}

#[test]
fn invariant_bundled_template_fully_rendered() {
    let template = TemplateSource::default().load();
    assert_eq!(template, BUNDLED_TEMPLATE);
    let out = render(&template, &test_context(ColorScheme::Orange));

    assert!(!out.contains("{{"));
    assert!(out.contains("--primary-color: #ea580c"));
    assert!(!out.contains("#1d4ed8"));
    assert!(out.contains("&copy; 2025 Field Notes"));
}

#[test]
fn invariant_missing_template_falls_back() {
    let generator = BlogGenerator::new(test_config(), TemplateSource::file("/no/such/template.html"));
    let artifact = generator.generate_html(ColorScheme::Blue).unwrap();

    assert_eq!(artifact.kind, ArtifactKind::Html);
    let expected = render(FALLBACK_TEMPLATE, &generator.context(ColorScheme::Blue));
    assert_eq!(artifact.content, expected);
    assert!(artifact.content.contains("<title>Field Notes</title>"));
}

#[test]
fn invariant_artifact_hashes_deterministic() {
    let at = Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap();
    let generator = BlogGenerator::new(test_config(), TemplateSource::default());

    let a = generator.generate_worker_script_at(at).unwrap();
    let b = generator.generate_worker_script_at(at).unwrap();

    assert_eq!(a.content_hash, b.content_hash);
    assert_eq!(a.manifest_hash, b.manifest_hash);
    assert_eq!(a.content_hash.len(), 64);
    assert_ne!(a.content_hash, a.manifest_hash);
}

#[test]
fn invariant_worker_requires_spreadsheet_id() {
    let generator = BlogGenerator::new(AppConfig::default(), TemplateSource::default());
    assert!(matches!(
        generator.generate_worker_script(),
        Err(GenerateError::MissingSpreadsheetId)
    ));
}

#[test]
fn invariant_worker_script_embeds_config() {
    let generator = BlogGenerator::new(test_config(), TemplateSource::default());
    let artifact = generator.generate_worker_script().unwrap();

    assert_eq!(artifact.kind, ArtifactKind::WorkerScript);
    assert!(artifact.content.contains("const SPREADSHEET_ID = '1sheetABC'"));
    assert!(artifact.content.contains("const SHEET_NAME = 'WEBSITE'"));
    assert!(artifact.content.contains("site_title: 'Field Notes'"));
}

#[test]
fn invariant_config_store_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path().join("app_config.json"));

    // Missing file loads defaults
    assert_eq!(store.load(), AppConfig::default());
    assert!(!store.clear().unwrap());

    let config = test_config();
    store.save(&config).unwrap();
    assert!(store.exists());
    assert_eq!(store.load(), config);

    let saved = fs::read_to_string(store.path()).unwrap();
    assert!(saved.contains("\n  \"spreadsheet_id\": \"1sheetABC\""));

    assert!(store.clear().unwrap());
    assert!(!store.exists());
}

#[test]
fn invariant_corrupt_config_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app_config.json");
    fs::write(&path, "{ not json").unwrap();

    assert_eq!(ConfigStore::new(path).load(), AppConfig::default());
}
