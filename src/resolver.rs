//! Maps (persona, user input) to a bot response
//!
//! Pure over the catalog snapshot: no state is kept between calls.

pub mod rules;

use crate::catalog::{SchemeCatalog, SchemeRecord};
use crate::persona::Persona;
use rules::Ladder;

/// Resolves user input against the persona rule tables and the scheme catalog
#[derive(Clone, Default)]
pub struct ResponseResolver {
    catalog: SchemeCatalog,
}

impl ResponseResolver {
    pub fn new(catalog: SchemeCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &SchemeCatalog {
        &self.catalog
    }

    /// Produce the response for `raw` under `persona`.
    ///
    /// Input is lower-cased here; trimming is the caller's job.
    pub fn resolve(&self, persona: Persona, raw: &str) -> String {
        let input = raw.to_lowercase();
        match persona {
            Persona::General => rules::GENERAL.answer(&input).to_string(),
            Persona::Scheme => self.resolve_scheme(&input),
            Persona::Eligibility => rules::ELIGIBILITY.answer(&input).to_string(),
            Persona::Support => rules::SUPPORT.answer(&input).to_string(),
        }
    }

    fn resolve_scheme(&self, input: &str) -> String {
        match self.catalog.find(input) {
            Some(scheme) => describe_scheme(&scheme),
            None => rules::SCHEME.answer(input).to_string(),
        }
    }
}

/// Ladder used for `persona`, when it answers from rules alone
pub fn ladder_for(persona: Persona) -> Option<&'static Ladder> {
    match persona {
        Persona::General => Some(&rules::GENERAL),
        Persona::Scheme => None,
        Persona::Eligibility => Some(&rules::ELIGIBILITY),
        Persona::Support => Some(&rules::SUPPORT),
    }
}

/// One-line summary of a matched scheme
pub fn describe_scheme(scheme: &SchemeRecord) -> String {
    if scheme.is_malformed() {
        tracing::warn!(id = %scheme.id, "Describing scheme without benefits");
    }
    format!(
        "**{}**: {}. It is for {}",
        scheme.title,
        scheme.summary(),
        scheme.categories_label()
    )
}
