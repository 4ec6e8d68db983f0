//! HttpAskService - REST implementation of the assistant's ask endpoint.

use async_trait::async_trait;
use salesdash_core::service::AskService;
use salesdash_core::{DashError, Result};
use serde::Serialize;
use serde_json::Value;

use crate::backend_client::BackendClient;

pub const ASK_PATH: &str = "/api/ai";

#[derive(Debug, Serialize)]
struct AskRequest<'a> {
    question: &'a str,
}

/// Posts questions to `{base}/api/ai` and extracts the `answer` field.
#[derive(Debug, Clone)]
pub struct HttpAskService {
    backend: BackendClient,
}

impl HttpAskService {
    pub fn new(backend: BackendClient) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl AskService for HttpAskService {
    async fn ask(&self, question: &str) -> Result<String> {
        let response = self
            .backend
            .http()
            .post(self.backend.url(ASK_PATH))
            .json(&AskRequest { question })
            .send()
            .await
            .map_err(|e| self.backend.send_error(ASK_PATH, e))?;

        if !response.status().is_success() {
            return Err(BackendClient::status_error(ASK_PATH, response).await);
        }

        let body = self.backend.body_text(ASK_PATH, response).await?;
        parse_answer(&body)
    }
}

/// Extracts the `answer` string from an ask response body.
fn parse_answer(body: &str) -> Result<String> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|e| DashError::malformed(ASK_PATH, format!("invalid JSON: {}", e)))?;

    payload
        .get("answer")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| DashError::malformed(ASK_PATH, "response has no string `answer`"))
}
