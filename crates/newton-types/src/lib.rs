// ─────────────────────────────────────────────────────────────────────
// Newton — Topology Kernel Types
// (C) 2024-2026 Newton Research. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Closed enumerations, error hierarchy, and the constraint input
//! model for the Newton topology kernel — the deterministic
//! decision/governance engine.
//!
//! Every decision path in the kernel is a compile-time-checked match
//! arm over the enums defined here, never a runtime table lookup.

pub mod constraint;
pub mod decision;
pub mod error;
pub mod request;

pub use constraint::ConstraintSpec;
pub use decision::{Decision, RiskLevel, SafetyLevel};
pub use error::{NewtonError, NewtonResult};
pub use request::{ProcessingStage, RequestType};
