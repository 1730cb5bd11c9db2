// ─────────────────────────────────────────────────────────────────────
// Newton — Topology Kernel Geometry Engine
// (C) 2024-2026 Newton Research. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! The six geometric substructures of the Newton topology kernel and
//! the orchestrator that composes them into a single `locate()` /
//! `execute()` entry point.
//!
//! The engine is pure, synchronous, and performs no I/O: given a
//! request and a set of numeric constraints, it decides whether to
//! ANSWER, DEFER, ASK, or REFUSE through composed geometric and
//! algebraic formalisms rather than ad hoc branching.
//!
//! # Safety Invariants
//!
//! 1. **Monotonic safety**: the governance lattice `join` always
//!    returns the safer decision, so a fold of joins can never lower
//!    the safety level of any input. Escalation only moves up.
//!
//! 2. **Infeasibility forces refusal**: when any constraint ratio
//!    exceeds 1 beyond tolerance, `locate()` overrides the simplex
//!    decision with REFUSE and MAXIMUM safety, unconditionally.
//!
//! 3. **Ungrounded text never executes**: text that does not reduce
//!    to a registered constraint fiber is reported HALLUCINATED, a
//!    first-class negative result that blocks release.
//!
//! 4. **All traversals are bounded**: routing is capped at 100 steps
//!    with cycle detection, and hypergraph searches visit at most the
//!    fixed module set. No operation can hang.

pub mod graph;
pub mod hypergraph;
pub mod lattice;
pub mod lint;
pub mod manifold;
pub mod polytope;
pub mod simplex;
pub mod topology;

pub use graph::{ComputationGraph, GraphEdge, GraphNode, NodePayload, PathResult};
pub use hypergraph::{Channel, ChannelType, HyperEdge, Layer, ModuleHypergraph, NewtonModule};
pub use lattice::{GovernanceLattice, LatticeNode};
pub use lint::{
    analyze_glyphs, lint_batch, lint_constraint_name, BatchLintResult, GeometricFeatures,
    LintReport, LintWarning, SemanticType, Severity, VisualDensity,
};
pub use manifold::{
    ConstraintPoint, ExpandFn, ExpandReduceManifold, ExpandStrategy, Fiber, FiberBundle,
    FiberStatistics, ProjectionStatus, ReduceFn, ReduceStrategy, TextPoint,
};
pub use polytope::{Boundary, ConstraintPolytope, FeasibilityRegion, PolytopeEvaluation};
pub use simplex::{DecisionSimplex, SimplexPoint};
pub use topology::{NewtonTopology, TopologyRegion, TopologyState};
