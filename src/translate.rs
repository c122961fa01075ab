//! Translation wire format: request URL and response body.

use crate::consts::limits;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("HTTP: {0}")] Http(#[from] reqwest::Error),
    #[error("status {0}")] Status(reqwest::StatusCode),
    #[error("malformed response: {0}")] Malformed(#[from] serde_json::Error),
    #[error("response has no translatedText")] MissingField,
}

/// Identifies the most recent submit of a panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(pub u64);

impl Ticket {
    /// Process-wide unique, so results never match a remounted panel
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Ticket(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// One outbound translation
#[derive(Debug, Clone)]
pub struct TranslationRequest {
    pub text: String,
    pub source: &'static str,
    pub target: &'static str,
    pub ticket: Ticket,
}

impl TranslationRequest {
    pub fn url(&self, base: &str) -> String {
        request_url(base, &self.text, self.source, self.target)
    }
}

/// `{base}?q={escaped}!&langpair={source}|{target}`
///
/// Built by hand so the suffix and the `|` separator reach the endpoint as-is.
pub fn request_url(base: &str, text: &str, source: &str, target: &str) -> String {
    format!(
        "{}?q={}{}&langpair={}|{}",
        base,
        urlencoding::encode(text),
        limits::QUERY_SUFFIX,
        source,
        target
    )
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    response_data: Option<ResponseData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponseData {
    translated_text: Option<String>,
}

/// Extract `responseData.translatedText` from a response body
pub fn parse_response(body: &str) -> Result<String, TranslateError> {
    let envelope: Envelope = serde_json::from_str(body)?;
    envelope
        .response_data
        .and_then(|d| d.translated_text)
        .ok_or(TranslateError::MissingField)
}
