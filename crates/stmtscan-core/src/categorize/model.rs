//! Text-classification model clients.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ModelError, StmtError};
use crate::models::config::AppConfig;

/// An external model that answers a text prompt with free-form text.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    /// Send `prompt` and return the raw response text.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}

/// Harm categories relaxed for financial text.
const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Vertex AI Gemini `generateContent` client.
#[derive(Debug, Clone)]
pub struct VertexGeminiClient {
    http: reqwest::Client,
    url: String,
    temperature: f32,
    access_token: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct ResponsePart {
    text: Option<String>,
}

impl VertexGeminiClient {
    /// Build a client from configuration.
    pub fn from_config(config: &AppConfig) -> crate::Result<Self> {
        let project = config.vertex_project_id().ok_or_else(|| {
            StmtError::Config("missing project id for Vertex AI".to_string())
        })?;
        let vertex = &config.vertex;
        let base = vertex
            .endpoint
            .clone()
            .unwrap_or_else(|| format!("https://{}-aiplatform.googleapis.com", vertex.location));

        let url = format!(
            "{}/v1/projects/{}/locations/{}/publishers/google/models/{}:generateContent",
            base.trim_end_matches('/'),
            project,
            vertex.location,
            vertex.model
        );

        Ok(Self {
            http: reqwest::Client::new(),
            url,
            temperature: vertex.temperature,
            access_token: config.access_token.clone(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn request_body<'a>(&self, prompt: &'a str) -> GenerateRequest<'a> {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.temperature,
            },
            safety_settings: HARM_CATEGORIES
                .iter()
                .copied()
                .map(|category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        }
    }
}

#[async_trait]
impl TextClassifier for VertexGeminiClient {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let mut request = self.http.post(&self.url).json(&self.request_body(prompt));
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp.json().await?;
        response_text(parsed)
    }
}

fn response_text(resp: GenerateResponse) -> Result<String, ModelError> {
    let Some(candidate) = resp.candidates.into_iter().next() else {
        return Err(ModelError::EmptyResponse(None));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(ModelError::EmptyResponse(candidate.finish_reason));
    }

    debug!("Model response: {:?}", text);
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn client() -> VertexGeminiClient {
        let mut config = AppConfig::default();
        config.document_ai.project_id = Some("acme".to_string());
        VertexGeminiClient::from_config(&config).unwrap()
    }

    #[test]
    fn test_url() {
        assert_eq!(
            client().url(),
            "https://us-central1-aiplatform.googleapis.com/v1/projects/acme/locations/us-central1/publishers/google/models/gemini-1.5-pro:generateContent"
        );
    }

    #[test]
    fn test_missing_project_is_config_error() {
        assert!(matches!(
            VertexGeminiClient::from_config(&AppConfig::default()),
            Err(StmtError::Config(_))
        ));
    }

    #[test]
    fn test_request_body() {
        let client = client();
        let body = serde_json::to_value(client.request_body("hi")).unwrap();

        assert_eq!(body["contents"], json!([{"role": "user", "parts": [{"text": "hi"}]}]));
        assert_eq!(body["generationConfig"]["temperature"].as_f64().map(|t| (t * 10.0).round()), Some(2.0));
        assert_eq!(body["safetySettings"].as_array().map(Vec::len), Some(4));
        assert_eq!(body["safetySettings"][0]["threshold"], "BLOCK_NONE");
    }

    #[test]
    fn test_response_text() {
        let resp: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"role": "model", "parts": [{"text": "Groceries"}, {"text": "\n"}]},
                "finishReason": "STOP"
            }]
        }))
        .unwrap();
        assert_eq!(response_text(resp).unwrap(), "Groceries\n");
    }

    #[test]
    fn test_blocked_response() {
        let resp: GenerateResponse = serde_json::from_value(json!({
            "candidates": [{"finishReason": "SAFETY"}]
        }))
        .unwrap();
        assert!(matches!(
            response_text(resp),
            Err(ModelError::EmptyResponse(Some(reason))) if reason == "SAFETY"
        ));

        let resp: GenerateResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(response_text(resp), Err(ModelError::EmptyResponse(None))));
    }
}
