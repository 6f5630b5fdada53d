//! Topic modes that scope which response rules apply

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A persona name outside the closed set
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown persona: {0:?} (expected general, scheme, eligibility or support)")]
pub struct InvalidPersona(pub String);

/// The active topic mode of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persona {
    #[default]
    General,
    Scheme,
    Eligibility,
    Support,
}

impl Persona {
    pub const ALL: [Persona; 4] = [
        Persona::General,
        Persona::Scheme,
        Persona::Eligibility,
        Persona::Support,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Persona::General => "general",
            Persona::Scheme => "scheme",
            Persona::Eligibility => "eligibility",
            Persona::Support => "support",
        }
    }

    /// Fixed greeting shown when the persona becomes active
    pub fn greeting(self) -> &'static str {
        match self {
            Persona::General => {
                "Namaste! I can help you navigate the portal and find information."
            }
            Persona::Scheme => {
                "I am the Scheme Expert. Ask me details about any government scheme."
            }
            Persona::Eligibility => {
                "Let's check your eligibility. Tell me your age, income, or category."
            }
            Persona::Support => "Application Support here. Need help with forms or documents?",
        }
    }
}

impl fmt::Display for Persona {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Persona {
    type Err = InvalidPersona;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        Persona::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| InvalidPersona(s.to_string()))
    }
}

/// Holder of the single active persona
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonaState {
    current: Persona,
}

impl PersonaState {
    pub fn current(&self) -> Persona {
        self.current
    }

    /// Make `persona` active and return its greeting
    pub fn switch_to(&mut self, persona: Persona) -> &'static str {
        self.current = persona;
        persona.greeting()
    }

    /// Switch by name, rejecting anything outside the closed set
    pub fn switch_to_named(&mut self, name: &str) -> Result<&'static str, InvalidPersona> {
        let persona = name.parse()?;
        Ok(self.switch_to(persona))
    }
}
