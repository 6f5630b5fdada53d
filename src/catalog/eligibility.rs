//! Profile-based scheme recommendations
//!
//! Hard eligibility filters only: income ceiling and category membership.
//! Surviving schemes keep catalog order.

use super::SchemeRecord;
use serde::{Deserialize, Serialize};

/// Category that opens a scheme to every applicant
const OPEN_CATEGORY: &str = "general";

const DEFAULT_STEP: &str = "visit the website";

/// Citizen details submitted for a recommendation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CitizenProfile {
    pub name: String,
    pub age: u32,
    /// Annual household income, in rupees
    pub income: f64,
    pub occupation: String,
    pub state: String,
    #[serde(default = "default_disability")]
    pub disability: String,
    /// e.g. student, farmer, general, woman
    pub category: String,
}

fn default_disability() -> String {
    "No".to_string()
}

impl CitizenProfile {
    /// Whether the profile passes a scheme's hard eligibility filters
    pub fn qualifies_for(&self, scheme: &SchemeRecord) -> bool {
        if let Some(ceiling) = scheme.criteria.max_income {
            if self.income > ceiling {
                return false;
            }
        }

        if let Some(allowed) = &scheme.criteria.category {
            let category = self.category.to_lowercase();
            let occupation = self.occupation.to_lowercase();
            let admitted = allowed.iter().map(|c| c.to_lowercase()).any(|c| {
                c == category || c == occupation || c == OPEN_CATEGORY
            });
            if !admitted {
                return false;
            }
        }

        true
    }
}

/// A scheme chosen for a profile, with a plain-language explanation
#[derive(Debug, Clone, Serialize)]
pub struct Recommendation {
    pub scheme_id: String,
    pub title: String,
    pub explanation: String,
    pub scheme: SchemeRecord,
}

impl Recommendation {
    pub fn new(scheme: SchemeRecord, user_name: &str) -> Self {
        Self {
            scheme_id: scheme.id.clone(),
            title: scheme.title.clone(),
            explanation: explain(&scheme, user_name),
            scheme,
        }
    }
}

/// Template explanation of why and how to apply for a scheme
pub fn explain(scheme: &SchemeRecord, user_name: &str) -> String {
    let benefits = scheme
        .benefits
        .iter()
        .take(2)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" and ");
    let step = scheme.process.first().map_or(DEFAULT_STEP, String::as_str);

    format!(
        "Hello {user_name}, based on your profile, we highly recommend the **{}**.\n\n\
         This scheme is a great match because it specifically targets your needs.\n\
         You can get {benefits}.\n\
         To apply, simply {step}.",
        scheme.title
    )
}
