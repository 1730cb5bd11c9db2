// ─────────────────────────────────────────────────────────────────────
// Newton — Topology Orchestrator
// ─────────────────────────────────────────────────────────────────────
//! The unified structure composing the six geometric substructures:
//! polytope (what is possible), simplex (how to decide), lattice
//! (safety ordering), manifold (text grounding), graph (execution
//! path), and hypergraph (system architecture).
//!
//! `locate()` is the main entry point: it evaluates one request
//! against all six structures and returns the full topological state.
//!
//! ```text
//!        IMPOSSIBLE (f/g > 1)
//!   ────────────────────────────  f/g = 1
//!        POSSIBLE   (f/g < 1)
//! ```

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use newton_types::{ConstraintSpec, Decision, NewtonResult, RequestType, RiskLevel, SafetyLevel};

use crate::graph::ComputationGraph;
use crate::hypergraph::ModuleHypergraph;
use crate::lattice::GovernanceLattice;
use crate::manifold::{ExpandReduceManifold, ProjectionStatus, TextPoint};
use crate::polytope::{ConstraintPolytope, FeasibilityRegion, RATIO_TOLERANCE};
use crate::simplex::{DecisionSimplex, SimplexPoint};

/// Regions of the complete topology at a single (f, g) point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopologyRegion {
    /// `f/g > 1` (or `g <= 0`): cannot exist.
    Impossible,
    /// `f/g = 1`: edge of possibility.
    Boundary,
    /// `f/g < 1`: valid execution space.
    Possible,
}

#[derive(Debug, Clone, Serialize)]
struct PolytopeSection {
    region: FeasibilityRegion,
    max_ratio: f64,
    violated: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
struct SimplexSection {
    point: SimplexPoint,
    decision: Decision,
    risk_level: RiskLevel,
}

#[derive(Debug, Clone, Serialize)]
struct LatticeSection {
    safety_level: SafetyLevel,
    can_execute: bool,
}

#[derive(Debug, Clone, Serialize)]
struct ManifoldSection {
    is_grounded: bool,
    projection_status: ProjectionStatus,
}

#[derive(Debug, Clone, Serialize)]
struct GraphSection {
    path: Vec<String>,
    valid: bool,
}

/// The complete state of a point in the Newton topology: one section
/// per geometric structure, unified into a single serializable view.
#[derive(Debug, Clone, Serialize)]
pub struct TopologyState {
    polytope: PolytopeSection,
    simplex: SimplexSection,
    lattice: LatticeSection,
    manifold: ManifoldSection,
    graph: GraphSection,
}

impl TopologyState {
    pub fn decision(&self) -> Decision {
        self.simplex.decision
    }

    pub fn can_execute(&self) -> bool {
        self.lattice.can_execute
    }

    pub fn safety_level(&self) -> SafetyLevel {
        self.lattice.safety_level
    }

    pub fn polytope_region(&self) -> FeasibilityRegion {
        self.polytope.region
    }

    pub fn max_ratio(&self) -> f64 {
        self.polytope.max_ratio
    }

    pub fn violated_constraints(&self) -> &[String] {
        &self.polytope.violated
    }

    pub fn simplex_point(&self) -> &SimplexPoint {
        &self.simplex.point
    }

    pub fn risk_level(&self) -> RiskLevel {
        self.simplex.risk_level
    }

    pub fn is_grounded(&self) -> bool {
        self.manifold.is_grounded
    }

    pub fn projection_status(&self) -> ProjectionStatus {
        self.manifold.projection_status
    }

    pub fn path(&self) -> &[String] {
        &self.graph.path
    }

    pub fn as_json(&self) -> NewtonResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| newton_types::NewtonError::Validation(e.to_string()))
    }
}

/// The complete Newton topology.
///
/// One instance serves a whole process: all methods take `&self`, and
/// the manifold's registration surface is internally locked.
pub struct NewtonTopology {
    simplex: DecisionSimplex,
    lattice: GovernanceLattice,
    manifold: ExpandReduceManifold,
    graph: ComputationGraph,
    hypergraph: ModuleHypergraph,
}

impl Default for NewtonTopology {
    fn default() -> Self {
        Self {
            simplex: DecisionSimplex::new(),
            lattice: GovernanceLattice::new(),
            manifold: ExpandReduceManifold::new(),
            graph: ComputationGraph::default_graph(),
            hypergraph: ModuleHypergraph::default_architecture(),
        }
    }
}

impl NewtonTopology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn manifold(&self) -> &ExpandReduceManifold {
        &self.manifold
    }

    pub fn graph(&self) -> &ComputationGraph {
        &self.graph
    }

    pub fn hypergraph(&self) -> &ModuleHypergraph {
        &self.hypergraph
    }

    pub fn lattice(&self) -> &GovernanceLattice {
        &self.lattice
    }

    pub fn simplex(&self) -> &DecisionSimplex {
        &self.simplex
    }

    /// Locate a point in the complete topology.
    ///
    /// Builds a polytope from the constraints, classifies the scores
    /// on the simplex, applies the infeasibility override, checks text
    /// grounding, and traces the routing path.
    pub fn locate(
        &self,
        constraints: &[ConstraintSpec],
        risk_score: f64,
        clarity_score: f64,
        capability_score: f64,
        request_type: RequestType,
        text: Option<&str>,
    ) -> NewtonResult<TopologyState> {
        let polytope = ConstraintPolytope::from_specs("query", constraints)?;
        let evaluation = polytope.evaluate();
        let violated: Vec<String> = polytope
            .violated_constraints()
            .iter()
            .map(|b| b.name().to_string())
            .collect();

        let simplex_point = self
            .simplex
            .classify(risk_score, clarity_score, capability_score)?;
        let mut decision = simplex_point.dominant_decision();
        let mut safety_level = decision.safety_level();

        // Infeasibility overrides whatever the simplex said.
        if !evaluation.feasible {
            log::error!(
                "infeasible constraint set (violated: {violated:?}); forcing REFUSE"
            );
            decision = Decision::Refuse;
            safety_level = SafetyLevel::Maximum;
        }

        let can_execute = evaluation.feasible && decision == Decision::Answer;

        let (is_grounded, projection_status) = match text {
            None => (true, ProjectionStatus::Grounded),
            Some(text) => {
                let point = TextPoint::formal(text);
                if self.manifold.is_hallucination(&point) {
                    (false, ProjectionStatus::Hallucinated)
                } else {
                    (true, ProjectionStatus::Grounded)
                }
            }
        };

        let path_result = self.graph.classify_and_route(request_type)?;

        Ok(TopologyState {
            polytope: PolytopeSection {
                region: evaluation.region,
                max_ratio: polytope.max_ratio(),
                violated,
            },
            simplex: SimplexSection {
                point: simplex_point,
                decision,
                risk_level: simplex_point.risk_level(),
            },
            lattice: LatticeSection {
                safety_level,
                can_execute,
            },
            manifold: ManifoldSection {
                is_grounded,
                projection_status,
            },
            graph: GraphSection {
                path: path_result.path,
                valid: true,
            },
        })
    }

    /// Evaluate and return `(can_execute, decision, full_state)`.
    pub fn execute(
        &self,
        constraints: &[ConstraintSpec],
        request_type: RequestType,
        risk_score: f64,
        clarity_score: f64,
        capability_score: f64,
    ) -> NewtonResult<(bool, Decision, Value)> {
        let state = self.locate(
            constraints,
            risk_score,
            clarity_score,
            capability_score,
            request_type,
            None,
        )?;
        let json = state.as_json()?;
        Ok((state.can_execute(), state.decision(), json))
    }

    /// Check that a constraint set is well-formed and satisfiable.
    pub fn validate_constraints(&self, constraints: &[ConstraintSpec]) -> NewtonResult<()> {
        let polytope = ConstraintPolytope::from_specs("validation", constraints)?;
        if !polytope.is_feasible() {
            let violated: Vec<&str> = polytope
                .violated_constraints()
                .iter()
                .map(|b| b.name())
                .collect();
            return Err(newton_types::NewtonError::Validation(format!(
                "constraints violated: {violated:?}"
            )));
        }
        Ok(())
    }

    /// Combine decisions with the lattice join: the safest wins.
    pub fn combine_decisions(&self, decisions: &[Decision]) -> Decision {
        self.lattice.governance_join(decisions)
    }

    /// Escalate a decision one level up the lattice.
    pub fn escalate_decision(&self, decision: Decision, reason: &str) -> Decision {
        self.lattice.escalate(decision, reason).0
    }

    /// The topology region at a single (f, g) point. A non-positive
    /// `g` is outside reality entirely.
    pub fn region_at_point(&self, f: f64, g: f64) -> TopologyRegion {
        if g <= 0.0 {
            return TopologyRegion::Impossible;
        }
        let ratio = f / g;
        if ratio > 1.0 + RATIO_TOLERANCE {
            TopologyRegion::Impossible
        } else if ratio > 1.0 - RATIO_TOLERANCE {
            TopologyRegion::Boundary
        } else {
            TopologyRegion::Possible
        }
    }

    /// True if every dimension of a multi-dimensional point is inside
    /// or on the shape.
    pub fn is_inside_shape(&self, point: &HashMap<String, (f64, f64)>) -> bool {
        point
            .values()
            .all(|&(f, g)| self.region_at_point(f, g) != TopologyRegion::Impossible)
    }
}
