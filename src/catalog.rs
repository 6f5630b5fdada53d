//! In-memory scheme catalog
//!
//! Populated from a knowledge source, read-only between reloads. A reload swaps
//! the whole snapshot; readers never observe a half-loaded catalog.

mod eligibility;
mod record;
mod source;

pub use eligibility::{explain, CitizenProfile, Recommendation};
pub use record::{Criteria, SchemeRecord, UNRESTRICTED_LABEL};
pub use source::{
    parse_records, source_from_location, FileSource, HttpSource, KnowledgeSource, LoadError,
};

use std::collections::HashSet;
use std::sync::{Arc, PoisonError, RwLock};

/// Iteration order used by lookups when several records match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOrder {
    /// Order the knowledge source returned
    #[default]
    Source,
    /// Sorted by scheme id, independent of source order
    ById,
}

impl CatalogOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "source" => Some(Self::Source),
            "id" => Some(Self::ById),
            _ => None,
        }
    }
}

/// Shared handle to the current catalog snapshot
#[derive(Clone, Default)]
pub struct SchemeCatalog {
    records: Arc<RwLock<Arc<Vec<SchemeRecord>>>>,
    order: CatalogOrder,
}

impl SchemeCatalog {
    pub fn new(order: CatalogOrder) -> Self {
        Self {
            records: Arc::default(),
            order,
        }
    }

    /// Build a catalog directly from records (tests, fixtures)
    pub fn from_records(records: Vec<SchemeRecord>) -> Result<Self, LoadError> {
        let catalog = Self::default();
        catalog.replace(records)?;
        Ok(catalog)
    }

    /// Fetch from `source` and swap in the result.
    ///
    /// On failure the previous snapshot stays in place.
    pub async fn load(&self, source: &dyn KnowledgeSource) -> Result<usize, LoadError> {
        let records = source.fetch().await.inspect_err(|e| {
            tracing::error!(source = %source.describe(), error = %e, "Failed to load schemes");
        })?;
        let count = self.replace(records)?;
        tracing::info!(source = %source.describe(), count, "Scheme catalog loaded");
        Ok(count)
    }

    /// Validate and install a new record set wholesale
    pub fn replace(&self, mut records: Vec<SchemeRecord>) -> Result<usize, LoadError> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in &records {
            if !seen.insert(record.id.as_str()) {
                tracing::error!(id = %record.id, "Rejecting catalog with duplicate scheme id");
                return Err(LoadError::DuplicateId(record.id.clone()));
            }
            if record.is_malformed() {
                tracing::warn!(id = %record.id, "Scheme has no benefits listed");
            }
        }

        if self.order == CatalogOrder::ById {
            records.sort_by(|a, b| a.id.cmp(&b.id));
        }

        let count = records.len();
        *self.records.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(records);
        Ok(count)
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<Vec<SchemeRecord>> {
        Arc::clone(&self.records.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// First record whose title, id or any benefit contains `query`
    pub fn find(&self, query: &str) -> Option<SchemeRecord> {
        let needle = query.to_lowercase();
        if needle.trim().is_empty() {
            return None;
        }
        self.snapshot()
            .iter()
            .find(|record| record.matches(&needle))
            .cloned()
    }

    /// Schemes whose hard eligibility filters the profile passes, in catalog order
    pub fn eligible_for(&self, profile: &CitizenProfile) -> Vec<SchemeRecord> {
        self.snapshot()
            .iter()
            .filter(|scheme| profile.qualifies_for(scheme))
            .cloned()
            .collect()
    }
}
