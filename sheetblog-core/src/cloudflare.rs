//! Cloudflare Workers script upload
//!
//! Single PUT per deploy. 200 and 201 are success; any other status is
//! surfaced with the response body verbatim.

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use thiserror::Error;
use url::Url;

use crate::http::build_default_client;

pub const CLOUDFLARE_API_BASE: &str = "https://api.cloudflare.com/client/v4/";

#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Cloudflare API token and account ID are required")]
    MissingCredentials,

    #[error("Worker name is empty")]
    MissingWorkerName,

    #[error("Deployment rejected with HTTP {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Result of a successful upload.
#[derive(Debug, Clone, Serialize)]
pub struct Deployment {
    pub worker_name: String,
    pub url: String,
    pub response: serde_json::Value,
}

#[derive(Debug, Clone)]
pub struct CloudflareClient {
    client: Client,
    base_url: Url,
    account_id: String,
    api_token: String,
}

impl CloudflareClient {
    pub fn new(account_id: &str, api_token: &str) -> Result<Self, DeployError> {
        Self::with_client(
            build_default_client()?,
            Url::parse(CLOUDFLARE_API_BASE)?,
            account_id,
            api_token,
        )
    }

    pub fn with_client(
        client: Client,
        base_url: Url,
        account_id: &str,
        api_token: &str,
    ) -> Result<Self, DeployError> {
        let account_id = account_id.trim();
        let api_token = api_token.trim();
        if account_id.is_empty() || api_token.is_empty() {
            return Err(DeployError::MissingCredentials);
        }

        Ok(Self {
            client,
            base_url,
            account_id: account_id.to_string(),
            api_token: api_token.to_string(),
        })
    }

    /// `<base>/accounts/<account>/workers/scripts/<name>`
    pub fn script_url(&self, worker_name: &str) -> Result<Url, DeployError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["accounts", self.account_id.as_str(), "workers", "scripts", worker_name]);
        Ok(url)
    }

    /// Public address of a deployed worker.
    pub fn worker_url(&self, worker_name: &str) -> String {
        format!("https://{}.{}.workers.dev", worker_name, self.account_id)
    }

    pub fn upload_script(&self, worker_name: &str, script: &str) -> Result<Deployment, DeployError> {
        let worker_name = worker_name.trim();
        if worker_name.is_empty() {
            return Err(DeployError::MissingWorkerName);
        }

        let url = self.script_url(worker_name)?;
        log::info!("Uploading worker '{}' ({} bytes)", worker_name, script.len());

        let response = self
            .client
            .put(url.as_str())
            .header(AUTHORIZATION, format!("Bearer {}", self.api_token))
            .header(CONTENT_TYPE, "application/javascript")
            .body(script.to_string())
            .send()?;

        let status = response.status().as_u16();
        let body = response.text()?;

        if status != 200 && status != 201 {
            log::warn!("Worker '{}' upload failed with HTTP {}", worker_name, status);
            return Err(DeployError::Rejected { status, body });
        }

        let response = serde_json::from_str(&body).unwrap_or(serde_json::Value::String(body));
        log::info!("Worker '{}' deployed", worker_name);

        Ok(Deployment {
            worker_name: worker_name.to_string(),
            url: self.worker_url(worker_name),
            response,
        })
    }
}
