//! HTTP client construction

use reqwest::blocking::Client;
use std::time::Duration;

/// Default timeout for outbound requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const USER_AGENT: &str = concat!("sheetblog/", env!("CARGO_PKG_VERSION"));

/// Builds a blocking client with the given timeout
///
/// # Errors
///
/// Returns error if client construction fails
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
}

pub fn build_default_client() -> Result<Client, reqwest::Error> {
    build_client(DEFAULT_TIMEOUT)
}
