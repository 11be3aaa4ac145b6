//! Configuration structures for the extraction and categorization pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StmtError};

/// Main configuration for the stmtscan pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Document AI (OCR) service configuration.
    pub document_ai: DocumentAiConfig,

    /// Vertex AI (categorization model) configuration.
    pub vertex: VertexConfig,

    /// Categorizer behavior.
    pub categorizer: CategorizerConfig,

    /// Header keywords used to recognize transaction tables.
    pub classifier: ClassifierConfig,

    /// OAuth bearer token sent to Google APIs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
}

/// Document AI processor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentAiConfig {
    /// GCP project id.
    pub project_id: Option<String>,

    /// Processor region (e.g. "us", "eu").
    pub location: Option<String>,

    /// Document AI processor id.
    pub processor_id: Option<String>,

    /// Override for the API endpoint base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// MIME type sent with the raw document.
    pub mime_type: String,
}

impl Default for DocumentAiConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            location: Some("us".to_string()),
            processor_id: None,
            endpoint: None,
            mime_type: "application/pdf".to_string(),
        }
    }
}

/// Vertex AI generative model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VertexConfig {
    /// GCP project id. Falls back to `document_ai.project_id` when unset.
    pub project_id: Option<String>,

    /// Model region.
    pub location: String,

    /// Model name.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Override for the API endpoint base URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for VertexConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            location: "us-central1".to_string(),
            model: "gemini-1.5-pro".to_string(),
            temperature: 0.2,
            endpoint: None,
        }
    }
}

/// Categorizer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CategorizerConfig {
    /// Fixed delay between successive model calls, in milliseconds.
    pub pacing_ms: u64,

    /// Description-bearing keys, in priority order (matched case-insensitively).
    pub description_keys: Vec<String>,
}

impl Default for CategorizerConfig {
    fn default() -> Self {
        Self {
            pacing_ms: 10_000,
            description_keys: strings(&[
                "page transaction details",
                "description",
                "details",
                "narrative",
                "transaction details",
            ]),
        }
    }
}

/// Keyword lists for the transaction-table header heuristic.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Keywords signalling a date column.
    pub date_keywords: Vec<String>,

    /// Keywords signalling a description column.
    pub description_keywords: Vec<String>,

    /// Keywords signalling an amount column.
    pub amount_keywords: Vec<String>,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            date_keywords: strings(&["date", "transaction date", "posting date"]),
            description_keywords: strings(&[
                "description",
                "details",
                "narrative",
                "transaction details",
            ]),
            amount_keywords: strings(&["amount", "debit", "credit"]),
        }
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

/// Environment variables read by [`AppConfig::apply_env`].
pub const ENV_PROJECT_ID: &str = "GCP_PROJECT_ID";
pub const ENV_LOCATION: &str = "GCP_LOCATION";
pub const ENV_PROCESSOR_ID: &str = "DOCUMENT_AI_PROCESSOR_ID";
pub const ENV_VERTEX_LOCATION: &str = "VERTEX_LOCATION";
pub const ENV_ACCESS_TOKEN: &str = "GOOGLE_ACCESS_TOKEN";

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> std::result::Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> std::result::Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Overlay values from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Overlay values from an arbitrary variable lookup. Empty values are ignored.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(project) = get(ENV_PROJECT_ID) {
            self.document_ai.project_id = Some(project);
        }
        if let Some(location) = get(ENV_LOCATION) {
            self.document_ai.location = Some(location);
        }
        if let Some(processor) = get(ENV_PROCESSOR_ID) {
            self.document_ai.processor_id = Some(processor);
        }
        if let Some(location) = get(ENV_VERTEX_LOCATION) {
            self.vertex.location = location;
        }
        if let Some(token) = get(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
    }

    /// Fully-qualified Document AI processor resource name.
    ///
    /// Fails when any of project id, location or processor id is missing.
    pub fn document_ai_processor_name(&self) -> Result<String> {
        let ai = &self.document_ai;
        let missing: Vec<&str> = [
            ("project_id", &ai.project_id),
            ("location", &ai.location),
            ("processor_id", &ai.processor_id),
        ]
        .iter()
        .filter(|(_, v)| v.as_deref().is_none_or(|s| s.trim().is_empty()))
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(StmtError::Config(format!(
                "missing Document AI settings: {}",
                missing.join(", ")
            )));
        }

        Ok(format!(
            "projects/{}/locations/{}/processors/{}",
            ai.project_id.as_deref().unwrap_or_default(),
            ai.location.as_deref().unwrap_or_default(),
            ai.processor_id.as_deref().unwrap_or_default(),
        ))
    }

    /// Project id used for Vertex AI calls.
    pub fn vertex_project_id(&self) -> Option<&str> {
        self.vertex
            .project_id
            .as_deref()
            .or(self.document_ai.project_id.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_processor_name_requires_all_values() {
        let mut config = AppConfig::default();
        let err = config.document_ai_processor_name().unwrap_err();
        assert!(err.to_string().contains("project_id"));
        assert!(err.to_string().contains("processor_id"));
        assert!(!err.to_string().contains("location"));

        config.document_ai.project_id = Some("acme".to_string());
        config.document_ai.processor_id = Some("abc123".to_string());
        assert_eq!(
            config.document_ai_processor_name().unwrap(),
            "projects/acme/locations/us/processors/abc123"
        );

        config.document_ai.location = Some("  ".to_string());
        assert!(config.document_ai_processor_name().is_err());
    }

    #[test]
    fn test_apply_env_overlays_values() {
        let vars = env(&[
            (ENV_PROJECT_ID, "acme"),
            (ENV_LOCATION, "eu"),
            (ENV_PROCESSOR_ID, "p-1"),
            (ENV_ACCESS_TOKEN, ""),
        ]);
        let mut config = AppConfig::default();
        config.apply_env_from(|k| vars.get(k).cloned());

        assert_eq!(config.document_ai.project_id.as_deref(), Some("acme"));
        assert_eq!(config.document_ai.location.as_deref(), Some("eu"));
        assert_eq!(config.document_ai.processor_id.as_deref(), Some("p-1"));
        assert_eq!(config.access_token, None);
        assert_eq!(config.vertex.location, "us-central1");
        assert_eq!(config.vertex_project_id(), Some("acme"));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: AppConfig =
            serde_json::from_str(r#"{"categorizer": {"pacing_ms": 0}}"#).unwrap();
        assert_eq!(config.categorizer.pacing_ms, 0);
        assert_eq!(config.categorizer.description_keys.len(), 5);
        assert_eq!(config.classifier.amount_keywords, vec!["amount", "debit", "credit"]);
        assert_eq!(config.vertex.model, "gemini-1.5-pro");
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = AppConfig::default();
        config.document_ai.processor_id = Some("p-9".to_string());
        config.save(&path).unwrap();

        let loaded = AppConfig::from_file(&path).unwrap();
        assert_eq!(loaded.document_ai.processor_id.as_deref(), Some("p-9"));
    }
}
