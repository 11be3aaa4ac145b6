//! Transaction categorization through an external text model.
//!
//! Each transaction's description is sent to the model together with the
//! closed category list; answers outside that list are stored as
//! `Uncategorized`. Calls are sequential and paced by a [`RateLimiter`].

pub mod model;
pub mod pacing;

pub use model::{TextClassifier, VertexGeminiClient};
pub use pacing::{FixedIntervalGate, RateLimiter};

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::models::config::CategorizerConfig;
use crate::models::transaction::{Category, TransactionRecord, CATEGORY_KEY};

/// Build the classification prompt for one description.
pub fn build_prompt(description: &str) -> String {
    let categories: Vec<&str> = Category::ALL.iter().map(Category::as_str).collect();
    format!(
        "Analyze the following bank transaction description and categorize it into exactly ONE of the following categories.\n\
         Choose the single most appropriate category. If none fit well, choose 'Uncategorized'.\n\
         Respond with ONLY the category name.\n\
         \n\
         Allowed Categories:\n\
         {}\n\
         \n\
         Transaction Description:\n\
         \"{}\"\n\
         \n\
         Category:",
        categories.join(", "),
        description
    )
}

/// Assigns a [`Category`] to every transaction in a batch.
pub struct Categorizer<C: TextClassifier, R: RateLimiter> {
    classifier: C,
    limiter: R,
    description_keys: Vec<String>,
}

impl<C: TextClassifier, R: RateLimiter> Categorizer<C, R> {
    /// Create a categorizer with the default description key priority.
    pub fn new(classifier: C, limiter: R) -> Self {
        Self {
            classifier,
            limiter,
            description_keys: CategorizerConfig::default().description_keys,
        }
    }

    /// Set the description keys, in priority order.
    pub fn with_description_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.description_keys = keys.into_iter().map(|k| k.into().to_lowercase()).collect();
        self
    }

    /// Add a `category` key to every object in `items`.
    ///
    /// Order and length are preserved. Items that are not objects are left
    /// untouched. Model failures degrade the affected item to `Uncategorized`.
    pub async fn categorize(&self, mut items: Vec<Value>) -> Vec<Value> {
        if items.is_empty() {
            info!("Transaction list is empty; nothing to categorize");
            return items;
        }

        info!("Categorizing {} transactions", items.len());
        self.limiter.reset();

        let mut categorized = 0usize;
        for item in items.iter_mut() {
            let Value::Object(record) = item else {
                warn!("Skipping item, not an object: {}", item);
                continue;
            };

            let category = self.categorize_record(record).await;
            if category != Category::Uncategorized {
                categorized += 1;
            }
            record.insert(CATEGORY_KEY.to_string(), Value::from(category.as_str()));
        }

        info!(
            "Finished categorization; assigned categories to {} of {} transactions",
            categorized,
            items.len()
        );
        items
    }

    /// Categorize a single record without modifying it.
    pub async fn categorize_record(&self, record: &TransactionRecord) -> Category {
        let Some(description) = self.description(record) else {
            warn!(
                "Could not find a description key in transaction {:?}; assigning Uncategorized",
                record
            );
            return Category::Uncategorized;
        };

        if description.is_empty() {
            debug!("Empty description; assigning Uncategorized");
            return Category::Uncategorized;
        }

        self.classify(&description).await
    }

    /// Description text from the highest-priority key present in `record`.
    ///
    /// A JSON `null` reads as an empty description; other non-string values use their JSON text.
    pub fn description(&self, record: &TransactionRecord) -> Option<String> {
        let value = self.description_keys.iter().find_map(|wanted| {
            record
                .iter()
                .find(|(key, _)| key.to_lowercase() == *wanted)
                .map(|(_, value)| value)
        })?;

        Some(match value {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        })
    }

    async fn classify(&self, description: &str) -> Category {
        let prompt = build_prompt(description);

        self.limiter.acquire().await;
        match self.classifier.complete(&prompt).await {
            Ok(answer) => match Category::from_model_output(&answer) {
                Some(category) => {
                    debug!("Categorized {:?} as {}", description, category);
                    category
                }
                None => {
                    warn!(
                        "Model returned unexpected category {:?} for {:?}; defaulting to Uncategorized",
                        answer.trim(),
                        description
                    );
                    Category::Uncategorized
                }
            },
            Err(e) => {
                error!("Categorization call failed for {:?}: {}", description, e);
                Category::Uncategorized
            }
        }
    }
}
