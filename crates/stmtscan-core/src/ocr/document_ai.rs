//! Google Document AI `processors.process` REST client.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{DocumentProcessor, Result};
use crate::error::{OcrError, StmtError};
use crate::models::config::AppConfig;
use crate::models::document::Document;

/// Client for a single Document AI processor.
#[derive(Debug, Clone)]
pub struct DocumentAiClient {
    http: reqwest::Client,
    endpoint: String,
    processor_name: String,
    access_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProcessRequest<'a> {
    raw_document: RawDocument<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawDocument<'a> {
    content: String,
    mime_type: &'a str,
}

#[derive(Deserialize)]
struct ProcessResponse {
    document: Option<Document>,
}

impl DocumentAiClient {
    /// Build a client from configuration.
    ///
    /// Fails when project id, location or processor id is missing.
    pub fn from_config(config: &AppConfig) -> crate::Result<Self> {
        let processor_name = config.document_ai_processor_name()?;
        let location = config
            .document_ai
            .location
            .as_deref()
            .ok_or_else(|| StmtError::Config("missing Document AI location".to_string()))?;

        let endpoint = config
            .document_ai
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{location}-documentai.googleapis.com"));

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            processor_name,
            access_token: config.access_token.clone(),
        })
    }

    /// URL of the `:process` method for this processor.
    pub fn process_url(&self) -> String {
        format!(
            "{}/v1/{}:process",
            self.endpoint.trim_end_matches('/'),
            self.processor_name
        )
    }
}

#[async_trait]
impl DocumentProcessor for DocumentAiClient {
    async fn process(&self, content: &[u8], mime_type: &str) -> Result<Document> {
        let body = ProcessRequest {
            raw_document: RawDocument {
                content: BASE64_STANDARD.encode(content),
                mime_type,
            },
        };

        let url = self.process_url();
        debug!("Sending {} bytes to {}", content.len(), url);

        let mut request = self.http.post(&url).json(&body);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ProcessResponse = resp.json().await?;
        document_from_response(parsed)
    }
}

/// Take the document out of a response, with segment offsets converted to bytes.
fn document_from_response(resp: ProcessResponse) -> Result<Document> {
    let mut document = resp
        .document
        .ok_or_else(|| OcrError::MalformedResponse("response has no document".to_string()))?;
    document.char_offsets_to_bytes();
    Ok(document)
}
