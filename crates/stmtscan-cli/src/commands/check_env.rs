//! Check-env command - report which service settings are available.

use console::style;

use stmtscan_core::models::config::{
    AppConfig, ENV_ACCESS_TOKEN, ENV_LOCATION, ENV_PROCESSOR_ID, ENV_PROJECT_ID,
    ENV_VERTEX_LOCATION,
};

use super::load_config;

struct Check {
    label: &'static str,
    source: &'static str,
    value: Option<String>,
}

fn checks(config: &AppConfig) -> Vec<Check> {
    vec![
        Check {
            label: "Project ID",
            source: ENV_PROJECT_ID,
            value: config.document_ai.project_id.clone(),
        },
        Check {
            label: "Document AI location",
            source: ENV_LOCATION,
            value: config.document_ai.location.clone(),
        },
        Check {
            label: "Document AI processor",
            source: ENV_PROCESSOR_ID,
            value: config.document_ai.processor_id.clone(),
        },
        Check {
            label: "Vertex AI location",
            source: ENV_VERTEX_LOCATION,
            value: Some(config.vertex.location.clone()),
        },
        Check {
            label: "Vertex AI model",
            source: "vertex.model",
            value: Some(config.vertex.model.clone()),
        },
        Check {
            label: "Access token",
            source: ENV_ACCESS_TOKEN,
            // Never echoed.
            value: config.access_token.as_ref().map(|_| "set".to_string()),
        },
    ]
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

pub fn run(config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    for check in checks(&config) {
        let marker = if is_present(&check.value) {
            style("✓").green()
        } else {
            style("✗").red()
        };
        println!(
            "{} {:<24} {:<28} {}",
            marker,
            check.label,
            style(check.source).dim(),
            check.value.as_deref().unwrap_or("-")
        );
    }

    println!();
    match config.document_ai_processor_name() {
        Ok(name) => println!("{} OCR processor: {}", style("✓").green(), name),
        Err(e) => println!("{} OCR unavailable: {}", style("✗").red(), e),
    }
    match config.vertex_project_id() {
        Some(project) => println!(
            "{} Categorization model: {} ({})",
            style("✓").green(),
            config.vertex.model,
            project
        ),
        None => println!(
            "{} Categorization unavailable: no project id",
            style("✗").red()
        ),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_value_is_masked() {
        let mut config = AppConfig::default();
        config.access_token = Some("ya29.secret".to_string());

        let token = checks(&config)
            .into_iter()
            .find(|c| c.source == ENV_ACCESS_TOKEN)
            .unwrap();
        assert_eq!(token.value.as_deref(), Some("set"));
    }

    #[test]
    fn test_missing_values_are_reported() {
        let config = AppConfig::default();
        let missing: Vec<&str> = checks(&config)
            .iter()
            .filter(|c| !is_present(&c.value))
            .map(|c| c.source)
            .collect();
        assert_eq!(
            missing,
            vec![ENV_PROJECT_ID, ENV_PROCESSOR_ID, ENV_ACCESS_TOKEN]
        );
    }
}
