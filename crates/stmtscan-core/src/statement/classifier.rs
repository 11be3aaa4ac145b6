//! Header-based recognition of transaction ledger tables.
//!
//! A table qualifies when its header row carries a date column, a description
//! column and an amount column. Matching is by substring so vendor phrasing
//! such as "Value Date" or "Withdrawal Amount (USD)" still counts. This also
//! lets through unrelated tables that share the vocabulary, e.g. fee
//! schedules.

use tracing::debug;

use crate::models::config::ClassifierConfig;

/// Decides whether a header row describes a transaction table.
#[derive(Debug, Clone)]
pub struct HeaderClassifier {
    date_keywords: Vec<String>,
    description_keywords: Vec<String>,
    amount_keywords: Vec<String>,
}

impl Default for HeaderClassifier {
    fn default() -> Self {
        Self::from_config(&ClassifierConfig::default())
    }
}

impl HeaderClassifier {
    /// Create a classifier with the default keyword lists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a classifier from configured keyword lists.
    pub fn from_config(config: &ClassifierConfig) -> Self {
        Self {
            date_keywords: normalize_all(&config.date_keywords),
            description_keywords: normalize_all(&config.description_keywords),
            amount_keywords: normalize_all(&config.amount_keywords),
        }
    }

    /// Replace the date keywords.
    pub fn with_date_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.date_keywords = keywords.into_iter().map(|k| normalize(k.as_ref())).collect();
        self
    }

    /// Replace the description keywords.
    pub fn with_description_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.description_keywords = keywords.into_iter().map(|k| normalize(k.as_ref())).collect();
        self
    }

    /// Replace the amount keywords.
    pub fn with_amount_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.amount_keywords = keywords.into_iter().map(|k| normalize(k.as_ref())).collect();
        self
    }

    /// True when the headers contain a date, a description and an amount signal.
    pub fn is_transaction_table<S: AsRef<str>>(&self, headers: &[S]) -> bool {
        if headers.is_empty() {
            debug!("Header check: received empty headers list");
            return false;
        }

        let normalized: Vec<String> = headers.iter().map(|h| normalize(h.as_ref())).collect();
        debug!("Header check: normalized headers = {:?}", normalized);

        let has_date = any_contains(&normalized, &self.date_keywords);
        let has_desc = any_contains(&normalized, &self.description_keywords);
        let has_amount = any_contains(&normalized, &self.amount_keywords);

        let result = has_date && has_desc && has_amount;
        debug!(
            "Header check: result = {} (date: {}, desc: {}, amount: {})",
            result, has_date, has_desc, has_amount
        );
        result
    }
}

/// Lowercase and trim a header or keyword.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

fn normalize_all(items: &[String]) -> Vec<String> {
    items.iter().map(|s| normalize(s)).collect()
}

fn any_contains(headers: &[String], keywords: &[String]) -> bool {
    headers
        .iter()
        .any(|h| keywords.iter().any(|kw| h.contains(kw.as_str())))
}
