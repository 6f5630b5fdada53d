//! Seva Chat - dialogue engine for a citizen welfare-scheme assistant
//!
//! Free-text questions are answered by keyword rule tables scoped to the
//! active persona, with scheme lookups against a read-only knowledge base.

#![allow(clippy::missing_errors_doc, clippy::must_use_candidate, clippy::module_name_repetitions)]

pub mod api;
pub mod catalog;
pub mod config;
pub mod persona;
pub mod resolver;
pub mod session;

pub use catalog::{SchemeCatalog, SchemeRecord};
pub use config::ChatConfig;
pub use persona::{InvalidPersona, Persona, PersonaState};
pub use resolver::ResponseResolver;
pub use session::{DialogueHandle, SessionManager};
