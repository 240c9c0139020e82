//! Worker Script Generator
//!
//! The worker source is a bundled template with its own placeholder schema,
//! rendered through the same literal substitution as the blog template.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::templates::substitute;

/// Bundled Cloudflare Worker source.
pub const WORKER_TEMPLATE: &str = include_str!("../assets/worker.js");

const DEFAULT_SHEET_NAME: &str = "Sheet1";
const DEFAULT_TITLE: &str = "Blog";
const DEFAULT_DESCRIPTION: &str = "Blog powered by Google Sheets";
const DEFAULT_KEYWORDS: &str = "blog, google sheets";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPlaceholder {
    GeneratedAt,
    SpreadsheetId,
    SheetName,
    SiteTitle,
    SiteDescription,
    SiteKeywords,
}

impl WorkerPlaceholder {
    pub const ALL: [WorkerPlaceholder; 6] = [
        WorkerPlaceholder::GeneratedAt,
        WorkerPlaceholder::SpreadsheetId,
        WorkerPlaceholder::SheetName,
        WorkerPlaceholder::SiteTitle,
        WorkerPlaceholder::SiteDescription,
        WorkerPlaceholder::SiteKeywords,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            WorkerPlaceholder::GeneratedAt => "{{generated_at}}",
            WorkerPlaceholder::SpreadsheetId => "{{spreadsheet_id}}",
            WorkerPlaceholder::SheetName => "{{sheet_name}}",
            WorkerPlaceholder::SiteTitle => "{{site_title}}",
            WorkerPlaceholder::SiteDescription => "{{site_description}}",
            WorkerPlaceholder::SiteKeywords => "{{site_keywords}}",
        }
    }
}

/// Values baked into the generated worker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    pub spreadsheet_id: String,
    #[serde(default)]
    pub sheet_name: String,
    #[serde(default)]
    pub blog_title: String,
    #[serde(default)]
    pub blog_description: String,
    #[serde(default)]
    pub blog_keywords: String,
}

impl WorkerConfig {
    /// Empty fields take their defaults, the spreadsheet id excepted.
    pub fn with_defaults(self) -> Self {
        fn or(value: String, default: &str) -> String {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value
            }
        }

        Self {
            spreadsheet_id: self.spreadsheet_id,
            sheet_name: or(self.sheet_name, DEFAULT_SHEET_NAME),
            blog_title: or(self.blog_title, DEFAULT_TITLE),
            blog_description: or(self.blog_description, DEFAULT_DESCRIPTION),
            blog_keywords: or(self.blog_keywords, DEFAULT_KEYWORDS),
        }
    }

    fn value(&self, placeholder: WorkerPlaceholder) -> Option<&str> {
        match placeholder {
            WorkerPlaceholder::GeneratedAt => None,
            WorkerPlaceholder::SpreadsheetId => Some(&self.spreadsheet_id),
            WorkerPlaceholder::SheetName => Some(&self.sheet_name),
            WorkerPlaceholder::SiteTitle => Some(&self.blog_title),
            WorkerPlaceholder::SiteDescription => Some(&self.blog_description),
            WorkerPlaceholder::SiteKeywords => Some(&self.blog_keywords),
        }
    }
}

/// Escape text for a single-quoted JavaScript string literal.
pub fn escape_js_string(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            _ => out.push(ch),
        }
    }
    out
}

pub fn render_worker_script(config: &WorkerConfig, generated_at: DateTime<Utc>) -> String {
    render_worker_template(WORKER_TEMPLATE, config, generated_at)
}

/// Render an arbitrary worker template against `config`.
pub fn render_worker_template(
    template: &str,
    config: &WorkerConfig,
    generated_at: DateTime<Utc>,
) -> String {
    let config = config.clone().with_defaults();
    let timestamp = generated_at.to_rfc3339_opts(SecondsFormat::Secs, true);

    let values: Vec<(&'static str, String)> = WorkerPlaceholder::ALL
        .iter()
        .map(|p| {
            let value = match config.value(*p) {
                Some(v) => escape_js_string(v),
                None => timestamp.clone(),
            };
            (p.token(), value)
        })
        .collect();

    substitute(template, values.iter().map(|(t, v)| (*t, v.as_str())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn config() -> WorkerConfig {
        WorkerConfig {
            spreadsheet_id: "abc123".to_string(),
            sheet_name: String::new(),
            blog_title: "Dev Notes".to_string(),
            blog_description: String::new(),
            blog_keywords: "rust".to_string(),
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 18, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_all_tokens_replaced() {
        let script = render_worker_script(&config(), at());
        for p in WorkerPlaceholder::ALL {
            assert!(!script.contains(p.token()), "{} left in script", p.token());
        }
        assert!(script.contains("const SPREADSHEET_ID = 'abc123'"));
        assert!(script.contains("// Generated at: 2025-01-18T09:30:00Z"));
    }

    #[test]
    fn test_defaults_applied() {
        let script = render_worker_script(&config(), at());
        assert!(script.contains("const SHEET_NAME = 'Sheet1'"));
        assert!(script.contains("site_description: 'Blog powered by Google Sheets'"));
        assert!(script.contains("site_title: 'Dev Notes'"));
    }

    #[test]
    fn test_values_escaped() {
        let mut cfg = config();
        cfg.blog_title = "Bob's\nBlog \\o/".to_string();
        let script = render_worker_script(&cfg, at());
        assert!(script.contains(r"site_title: 'Bob\'s\nBlog \\o/'"));
    }

    #[test]
    fn test_script_exposes_routes() {
        let script = render_worker_script(&config(), at());
        for route in ["'/api/posts'", "'/api/categories'", "'/api/tags'", "'/api/stats'", "'/health'", "'/post/'", "'/api/post/'"] {
            assert!(script.contains(route), "missing route {}", route);
        }
        assert!(script.contains("'Access-Control-Allow-Origin': '*'"));
    }

    #[test]
    fn test_stats_count_only_explicitly_published() {
        let script = render_worker_script(&config(), at());
        assert!(script.contains("publishedPosts: posts.filter(p => p.status === 'published').length"));
        assert!(!script.contains("publishedPosts: posts.filter(isPublished)"));
    }

    #[test]
    fn test_custom_template() {
        let out = render_worker_template("{{sheet_name}}|{{unknown}}", &config(), at());
        assert_eq!(out, "Sheet1|{{unknown}}");
    }
}
