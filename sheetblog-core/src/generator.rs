//! Generator - Single Entry Point for Output Artifacts
//!
//! Every artifact carries a content hash and a manifest hash over its metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::hashing::{compute_manifest_hash, sha256_hex};
use crate::templates::{render, ColorScheme, TemplateContext, TemplateSource};
use crate::worker::render_worker_script;
use crate::ENGINE_VERSION;

pub const HTML_FILENAME: &str = "blog_template.html";
pub const WORKER_FILENAME: &str = "worker.js";

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Spreadsheet ID is required to generate a worker script")]
    MissingSpreadsheetId,

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Html,
    WorkerScript,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedArtifact {
    pub kind: ArtifactKind,
    pub filename: String,
    pub content: String,
    pub content_hash: String,
    pub manifest_hash: String,
    pub generated_at: DateTime<Utc>,
    pub engine_version: String,
}

/// Fields covered by the manifest hash.
#[derive(Serialize)]
struct Manifest<'a> {
    kind: ArtifactKind,
    filename: &'a str,
    content_hash: &'a str,
    generated_at: &'a DateTime<Utc>,
    engine_version: &'a str,
}

impl GeneratedArtifact {
    fn build(
        kind: ArtifactKind,
        filename: &str,
        content: String,
        generated_at: DateTime<Utc>,
    ) -> Result<Self, GenerateError> {
        let content_hash = sha256_hex(content.as_bytes());
        let manifest_hash = compute_manifest_hash(&Manifest {
            kind,
            filename,
            content_hash: &content_hash,
            generated_at: &generated_at,
            engine_version: ENGINE_VERSION,
        })?;

        Ok(Self {
            kind,
            filename: filename.to_string(),
            content,
            content_hash,
            manifest_hash,
            generated_at,
            engine_version: ENGINE_VERSION.to_string(),
        })
    }

    /// Everything but the content, for reporting.
    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": self.kind,
            "filename": self.filename,
            "bytes": self.content.len(),
            "content_hash": self.content_hash,
            "manifest_hash": self.manifest_hash,
            "generated_at": self.generated_at,
            "engine_version": self.engine_version,
        })
    }
}

pub struct BlogGenerator {
    config: AppConfig,
    template_source: TemplateSource,
}

impl BlogGenerator {
    pub fn new(config: AppConfig, template_source: TemplateSource) -> Self {
        Self {
            config,
            template_source,
        }
    }

    pub fn context(&self, scheme: ColorScheme) -> TemplateContext {
        TemplateContext::new(
            self.config.blog_title.as_str(),
            self.config.blog_description.as_str(),
            self.config.blog_keywords.as_str(),
            scheme,
        )
    }

    pub fn generate_html(&self, scheme: ColorScheme) -> Result<GeneratedArtifact, GenerateError> {
        self.generate_html_at(scheme, Utc::now())
    }

    pub fn generate_html_at(
        &self,
        scheme: ColorScheme,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedArtifact, GenerateError> {
        let template = self.template_source.load();
        let html = render(&template, &self.context(scheme));
        log::info!("Rendered blog template with {} scheme", scheme);
        GeneratedArtifact::build(ArtifactKind::Html, HTML_FILENAME, html, generated_at)
    }

    pub fn generate_worker_script(&self) -> Result<GeneratedArtifact, GenerateError> {
        self.generate_worker_script_at(Utc::now())
    }

    pub fn generate_worker_script_at(
        &self,
        generated_at: DateTime<Utc>,
    ) -> Result<GeneratedArtifact, GenerateError> {
        if self.config.spreadsheet_id.trim().is_empty() {
            return Err(GenerateError::MissingSpreadsheetId);
        }

        let script = render_worker_script(&self.config.worker_config(), generated_at);
        log::info!("Rendered worker script for sheet {}", self.config.spreadsheet_id);
        GeneratedArtifact::build(ArtifactKind::WorkerScript, WORKER_FILENAME, script, generated_at)
    }
}
