//! Spreadsheet endpoint client.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{FetchTarget, Registration};
use crate::util::compact_text;

const FETCH_HTTP_TIMEOUT_SECS: u64 = 20;

/// Errors from the remote fetch path.
///
/// The background reconciler swallows these (best-effort sync); the manual
/// sync command surfaces them.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Fetch HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Fetch endpoint error: {0}")]
    Api(String),
    #[error("Invalid fetch payload: {0}")]
    InvalidPayload(String),
}

pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FetchAllRequest<'a> {
    action: &'a str,
    spreadsheet_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct FetchAllResponse {
    status: Option<String>,
    #[serde(default)]
    data: Option<serde_json::Value>,
}

/// HTTP client for the spreadsheet-backed script endpoint.
#[derive(Clone)]
pub struct SheetClient {
    client: reqwest::Client,
}

impl SheetClient {
    pub fn new() -> FetchResult<Self> {
        Ok(Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(FETCH_HTTP_TIMEOUT_SECS))
                .build()?,
        })
    }

    /// Fetch the full remote record set in one request.
    pub async fn fetch_all(&self, target: &FetchTarget) -> FetchResult<Vec<Registration>> {
        let response = self
            .client
            .post(&target.script_url)
            .json(&FetchAllRequest {
                action: "FETCH_ALL",
                spreadsheet_id: &target.spreadsheet_id,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Api(format!(
                "HTTP {}: {}",
                status.as_u16(),
                compact_text(&body)
            )));
        }

        let body = response.text().await?;
        parse_fetch_response(&body)
    }
}

/// Parse a FETCH_ALL response body into the remote record set.
///
/// Public for testability — callers can exercise parsing without network
/// access. Any shape other than `{"status": "success", "data": [...]}` with
/// well-formed rows is a failure.
pub fn parse_fetch_response(payload: &str) -> FetchResult<Vec<Registration>> {
    let response: FetchAllResponse = serde_json::from_str(payload)
        .map_err(|error| FetchError::InvalidPayload(format!("invalid response JSON: {error}")))?;

    match response.status.as_deref() {
        Some("success") => {}
        Some(other) => {
            return Err(FetchError::Api(format!(
                "endpoint returned status '{other}'"
            )))
        }
        None => {
            return Err(FetchError::InvalidPayload(
                "response did not include a status".to_string(),
            ))
        }
    }

    let Some(data) = response.data else {
        return Err(FetchError::InvalidPayload(
            "response did not include data".to_string(),
        ));
    };

    if !data.is_array() {
        return Err(FetchError::InvalidPayload(
            "response data is not an array".to_string(),
        ));
    }

    serde_json::from_value(data)
        .map_err(|error| FetchError::InvalidPayload(format!("malformed registration row: {error}")))
}
