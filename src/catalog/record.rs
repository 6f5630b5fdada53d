//! Scheme record types as served by the knowledge source

use serde::{Deserialize, Serialize};

/// Label used when a scheme carries no category restriction
pub const UNRESTRICTED_LABEL: &str = "citizens";

/// One government welfare scheme
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemeRecord {
    /// Stable identifier, unique across the catalog
    pub id: String,
    pub title: String,
    /// Benefit descriptions; the first entry is the canonical summary
    #[serde(default)]
    pub benefits: Vec<String>,
    #[serde(default)]
    pub criteria: Criteria,
    /// Application steps, in order
    #[serde(default)]
    pub process: Vec<String>,
}

/// Eligibility constraints attached to a scheme
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Criteria {
    /// Eligible citizen categories. `None` means no restriction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    /// Annual household income ceiling, in rupees
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_income: Option<f64>,
}

impl SchemeRecord {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            benefits: Vec::new(),
            criteria: Criteria::default(),
            process: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_benefit(mut self, benefit: impl Into<String>) -> Self {
        self.benefits.push(benefit.into());
        self
    }

    #[must_use]
    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.criteria.category = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_max_income(mut self, max_income: f64) -> Self {
        self.criteria.max_income = Some(max_income);
        self
    }

    #[must_use]
    pub fn with_step(mut self, step: impl Into<String>) -> Self {
        self.process.push(step.into());
        self
    }

    /// First benefit, or an empty string for records without benefits
    pub fn summary(&self) -> &str {
        self.benefits.first().map_or("", String::as_str)
    }

    /// Whether the record is missing the benefit list a summary needs
    pub fn is_malformed(&self) -> bool {
        self.benefits.is_empty()
    }

    /// Eligible categories joined for display
    pub fn categories_label(&self) -> String {
        match &self.criteria.category {
            Some(categories) => categories.join(", "),
            None => UNRESTRICTED_LABEL.to_string(),
        }
    }

    /// Substring match against title, id and benefits.
    ///
    /// `needle` must already be lower-cased. The id is compared as stored.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self.id.contains(needle)
            || self
                .benefits
                .iter()
                .any(|benefit| benefit.to_lowercase().contains(needle))
    }
}
