//! Translation engine: one GET per request, no retry.

use crate::consts::{headers, limits};
use crate::translate::{parse_response, TranslateError, TranslationRequest};
use reqwest::Client;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Seam between the panel host and the translation endpoint
pub trait Translate: Send + Sync {
    fn translate(
        &self,
        req: &TranslationRequest,
    ) -> impl Future<Output = Result<String, TranslateError>> + Send;
}

pub struct TranslateEngine {
    client: Client,
    base_url: String,
}

impl TranslateEngine {
    pub fn new(base_url: String) -> Result<Arc<Self>, TranslateError> {
        let client = Client::builder()
            .user_agent(headers::USER_AGENT)
            .timeout(Duration::from_secs(limits::REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Arc::new(Self { client, base_url }))
    }
}

impl Translate for TranslateEngine {
    async fn translate(&self, req: &TranslationRequest) -> Result<String, TranslateError> {
        let url = req.url(&self.base_url);
        log::debug!("GET {}", url);

        let res = self.client.get(&url).send().await?;
        if !res.status().is_success() {
            return Err(TranslateError::Status(res.status()));
        }

        let body = res.text().await?;
        parse_response(&body)
    }
}
