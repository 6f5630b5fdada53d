//! HTTP host surface for the dialogue engine
//!
//! Inbound: user submissions and persona tab selections. Outbound: session
//! snapshots and an SSE stream of messages, typing and persona changes.

mod handlers;
mod sse;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::catalog::SchemeCatalog;
use crate::session::SessionManager;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionManager>,
    /// Location the catalog reloads from
    pub schemes_source: String,
}

impl AppState {
    pub fn new(sessions: Arc<SessionManager>, schemes_source: impl Into<String>) -> Self {
        Self {
            sessions,
            schemes_source: schemes_source.into(),
        }
    }

    /// Catalog shared with every session's resolver
    pub fn catalog(&self) -> &SchemeCatalog {
        self.sessions.resolver().catalog()
    }
}
