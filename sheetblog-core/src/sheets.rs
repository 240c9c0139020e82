//! Google Sheets CSV export fetching
//!
//! One GET per call. No retry.

use reqwest::blocking::Client;
use thiserror::Error;
use url::Url;

use crate::csv::{self, Record};
use crate::http::build_default_client;

pub const SHEETS_BASE_URL: &str = "https://docs.google.com/";

/// Private sheets answer with an HTML login page instead of CSV.
const HTML_MARKER: &str = "<!DOCTYPE";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Spreadsheet ID is empty")]
    MissingSpreadsheetId,

    #[error("Sheet export returned HTTP {status} for {url}")]
    Status { url: Url, status: u16 },

    #[error("Spreadsheet is not public: export returned an HTML page")]
    NotPublic,

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

#[derive(Debug, Clone)]
pub struct SheetsClient {
    client: Client,
    base_url: Url,
}

impl SheetsClient {
    pub fn new() -> Result<Self, FetchError> {
        Ok(Self::with_client(build_default_client()?, Url::parse(SHEETS_BASE_URL)?))
    }

    /// Client against a custom base URL (used by tests with a mock server).
    pub fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// `<base>/spreadsheets/d/<id>/export?format=csv&gid=0`
    pub fn export_url(&self, spreadsheet_id: &str) -> Result<Url, FetchError> {
        let id = spreadsheet_id.trim();
        if id.is_empty() {
            return Err(FetchError::MissingSpreadsheetId);
        }

        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["spreadsheets", "d", id, "export"]);
        url.query_pairs_mut()
            .append_pair("format", "csv")
            .append_pair("gid", "0");
        Ok(url)
    }

    pub fn fetch_csv(&self, spreadsheet_id: &str) -> Result<String, FetchError> {
        let url = self.export_url(spreadsheet_id)?;
        log::debug!("Fetching sheet export {}", url);

        let response = self.client.get(url.as_str()).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let text = response.text()?;
        if text.trim_start().starts_with(HTML_MARKER) {
            return Err(FetchError::NotPublic);
        }

        log::info!("Fetched {} lines from sheet {}", text.lines().count(), spreadsheet_id);
        Ok(text)
    }

    pub fn fetch_records(&self, spreadsheet_id: &str) -> Result<Vec<Record>, FetchError> {
        let text = self.fetch_csv(spreadsheet_id)?;
        Ok(csv::parse(&text))
    }
}
