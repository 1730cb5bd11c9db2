// ─────────────────────────────────────────────────────────────────────
// Newton — Constraint Input Model
// ─────────────────────────────────────────────────────────────────────
//! The wire form of a single constraint as supplied by the upstream
//! constraint extractor: a named attempt/reality pair.

use serde::{Deserialize, Serialize};

/// A single constraint specification: `f` is what the request
/// attempts, `g` is what reality allows.
///
/// This is the unvalidated input form. Validation (`g > 0`, `f >= 0`)
/// happens when the spec is turned into a polytope boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConstraintSpec {
    pub name: String,
    /// Attempt dimension (numerator).
    pub f: f64,
    /// Reality dimension (denominator).
    pub g: f64,
    #[serde(default)]
    pub description: String,
}

impl ConstraintSpec {
    pub fn new(name: impl Into<String>, f: f64, g: f64) -> Self {
        Self {
            name: name.into(),
            f,
            g,
            description: String::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}
