//! SheetBlog Core - Blog Templates and Workers from Google Sheets
//!
//! # Pieces
//! 1. CSV parser for spreadsheet exports
//! 2. Literal placeholder renderer for the blog template
//! 3. Worker script generator sharing the same renderer
//! 4. Thin glue: config store, sheet fetcher, Cloudflare uploader

pub mod cloudflare;
pub mod config;
pub mod csv;
pub mod generator;
pub mod hashing;
pub mod http;
pub mod naming;
pub mod sheets;
pub mod templates;
pub mod worker;

pub use cloudflare::{CloudflareClient, DeployError, Deployment};
pub use config::{AppConfig, ConfigError, ConfigStore};
pub use csv::{parse, Record};
pub use generator::{ArtifactKind, BlogGenerator, GenerateError, GeneratedArtifact};
pub use hashing::{canonical_json, compute_manifest_hash, sha256_hex};
pub use naming::{generate_worker_name, resolve_worker_name};
pub use sheets::{FetchError, SheetsClient};
pub use templates::{render, ColorScheme, Placeholder, TemplateContext, TemplateSource};
pub use worker::{render_worker_script, WorkerConfig, WorkerPlaceholder};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
