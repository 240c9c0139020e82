//! SheetBlog CLI
//!
//! Commands: config, html, worker, parse, fetch, deploy
//! Outputs JSON to stdout
//! Returns non-zero on failure

use clap::{Parser, Subcommand};
use serde_json::json;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use sheetblog_core::{
    csv, resolve_worker_name, BlogGenerator, CloudflareClient, ColorScheme, ConfigStore,
    GeneratedArtifact, SheetsClient, TemplateSource,
};

#[derive(Parser)]
#[command(name = "sheetblog-cli")]
#[command(about = "SheetBlog CLI - Google Sheets blog template and worker generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the saved configuration
    #[arg(short, long, default_value = sheetblog_core::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Show, edit or delete the saved configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Render the HTML blog template
    Html {
        /// Color scheme (Blue, Green, Purple, Red, Orange)
        #[arg(short, long, default_value = "Blue")]
        scheme: String,

        /// Template file; defaults to the bundled template. An unreadable
        /// file falls back to the minimal built-in page
        #[arg(short, long)]
        template: Option<PathBuf>,

        /// Write the rendered file here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Render the Cloudflare Worker script
    Worker {
        /// Write the script here instead of stdout
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Parse a CSV export ("-" reads stdin)
    Parse {
        input: PathBuf,
    },

    /// Fetch the configured sheet and print its records
    Fetch,

    /// Render the worker script and upload it to Cloudflare
    Deploy {
        /// Worker name, used when auto naming is off
        #[arg(short, long)]
        name: Option<String>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the current configuration
    Show,

    /// Set one key and save
    Set { key: String, value: String },

    /// Delete the configuration file
    Clear,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(output) => {
            if let Some(output) = output {
                println!("{}", output);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            let output = json!({
                "success": false,
                "error": e,
            });
            println!("{}", output);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Option<String>, String> {
    let store = ConfigStore::new(&cli.config);

    match cli.command {
        Commands::Config { action } => config_command(&store, action).map(Some),

        Commands::Html { scheme, template, out } => {
            let source = template.map(TemplateSource::File).unwrap_or_default();
            let generator = BlogGenerator::new(store.load(), source);
            let artifact = generator
                .generate_html(ColorScheme::from_name(&scheme))
                .map_err(|e| e.to_string())?;
            emit(artifact, out.as_deref())
        }

        Commands::Worker { out } => {
            let generator = BlogGenerator::new(store.load(), TemplateSource::default());
            let artifact = generator.generate_worker_script().map_err(|e| e.to_string())?;
            emit(artifact, out.as_deref())
        }

        Commands::Parse { input } => {
            let text = read_input(&input)?;
            let records = csv::parse(&text);
            to_pretty(&records).map(Some)
        }

        Commands::Fetch => {
            let config = store.load();
            let client = SheetsClient::new().map_err(|e| e.to_string())?;
            let records = client
                .fetch_records(&config.spreadsheet_id)
                .map_err(|e| e.to_string())?;
            to_pretty(&json!({
                "success": true,
                "total": records.len(),
                "records": records,
            }))
            .map(Some)
        }

        Commands::Deploy { name } => {
            let config = store.load();
            let client = CloudflareClient::new(&config.cf_account_id, &config.cf_api_token)
                .map_err(|e| e.to_string())?;
            let artifact = BlogGenerator::new(config.clone(), TemplateSource::default())
                .generate_worker_script()
                .map_err(|e| e.to_string())?;

            let worker_name = resolve_worker_name(
                &config.worker_name_prefix,
                config.auto_generate_name,
                name.as_deref(),
                &mut rand::thread_rng(),
            );

            let deployment = client
                .upload_script(&worker_name, &artifact.content)
                .map_err(|e| e.to_string())?;
            to_pretty(&json!({
                "success": true,
                "deployment": deployment,
                "script": artifact.summary(),
            }))
            .map(Some)
        }
    }
}

fn config_command(store: &ConfigStore, action: ConfigAction) -> Result<String, String> {
    match action {
        ConfigAction::Show => to_pretty(&store.load()),
        ConfigAction::Set { key, value } => {
            let mut config = store.load();
            config.set(&key, &value).map_err(|e| e.to_string())?;
            store.save(&config).map_err(|e| e.to_string())?;
            to_pretty(&config)
        }
        ConfigAction::Clear => {
            let removed = store.clear().map_err(|e| e.to_string())?;
            Ok(json!({ "success": true, "removed": removed }).to_string())
        }
    }
}

/// Writes the artifact to `out` and prints its summary, or returns the raw content.
fn emit(artifact: GeneratedArtifact, out: Option<&Path>) -> Result<Option<String>, String> {
    match out {
        Some(path) => {
            fs::write(path, &artifact.content)
                .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
            to_pretty(&json!({
                "success": true,
                "path": path,
                "artifact": artifact.summary(),
            }))
            .map(Some)
        }
        None => Ok(Some(artifact.content)),
    }
}

fn read_input(path: &Path) -> Result<String, String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|e| format!("Failed to read stdin: {}", e))?;
        Ok(text)
    } else {
        fs::read_to_string(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
    }
}

fn to_pretty<T: serde::Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| e.to_string())
}
