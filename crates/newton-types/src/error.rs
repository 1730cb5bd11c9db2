// ─────────────────────────────────────────────────────────────────────
// Newton — Topology Kernel Error Hierarchy
// ─────────────────────────────────────────────────────────────────────

use thiserror::Error;

/// Root error type for all topology kernel failures.
///
/// The kernel is pure and total over well-formed inputs, so errors
/// fall into two families: malformed inputs rejected at construction
/// (fail fast, never silently clamped), and misconfigured graph
/// structures detected during routing.
#[derive(Error, Debug)]
pub enum NewtonError {
    /// Malformed value rejected at construction (invalid boundary,
    /// invalid barycentric point, score outside [0, 1], ...).
    #[error("validation error: {0}")]
    Validation(String),

    /// Computation graph misconfiguration (cycle, dead end in a
    /// custom graph, step limit exceeded).
    #[error("graph error: {0}")]
    Graph(String),

    /// No registered channel for a proposed module-to-module flow.
    /// The fields stay plain labels rather than `source`/`target`, so
    /// the derive does not mistake them for an error source chain.
    #[error("no channel from {from_module} to {to_module}")]
    Channel {
        from_module: String,
        to_module: String,
    },
}

pub type NewtonResult<T> = Result<T, NewtonError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_error_display() {
        let err = NewtonError::Channel {
            from_module: "VAULT".to_string(),
            to_module: "BRIDGE".to_string(),
        };
        assert_eq!(err.to_string(), "no channel from VAULT to BRIDGE");
    }

    #[test]
    fn test_error_variants_have_no_source_chain() {
        use std::error::Error;
        let err = NewtonError::Channel {
            from_module: "A".to_string(),
            to_module: "B".to_string(),
        };
        assert!(err.source().is_none());
    }
}
