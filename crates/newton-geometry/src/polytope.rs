// ─────────────────────────────────────────────────────────────────────
// Newton — Constraint Polytope (Feasibility Checking)
// ─────────────────────────────────────────────────────────────────────
//! The feasibility polytope: each constraint boundary is an
//! attempt/reality ratio `f/g`, and a state is executable iff every
//! ratio stays at or below 1.
//!
//! - `f/g < 1` → FIN (inside the polytope, fully allowed)
//! - `f/g = 1` → BOUNDARY (on the edge, marginal execution)
//! - `f/g > 1` → FINFR (outside the polytope, rejected)

use serde::Serialize;

use newton_types::{ConstraintSpec, NewtonError, NewtonResult};

/// Tolerance applied when comparing a ratio against 1.
pub const RATIO_TOLERANCE: f64 = 1e-10;

/// Margin below which a satisfied constraint counts as binding.
pub const BINDING_MARGIN: f64 = 0.1;

/// The three regions of possibility space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeasibilityRegion {
    /// `f/g < 1`: inside the polytope.
    Fin,
    /// `f/g = 1` within tolerance: on the edge.
    Boundary,
    /// `f/g > 1`: outside the polytope, impossible.
    Finfr,
}

impl FeasibilityRegion {
    /// Restrictiveness rank: FINFR dominates BOUNDARY dominates FIN.
    fn restrictiveness(self) -> u8 {
        match self {
            FeasibilityRegion::Fin => 0,
            FeasibilityRegion::Boundary => 1,
            FeasibilityRegion::Finfr => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeasibilityRegion::Fin => "FIN",
            FeasibilityRegion::Boundary => "BOUNDARY",
            FeasibilityRegion::Finfr => "FINFR",
        }
    }
}

impl std::fmt::Display for FeasibilityRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single boundary constraint in the polytope.
///
/// Construction validates the invariants `g > 0` and `f >= 0`;
/// a `Boundary` that exists is always well-formed.
#[derive(Debug, Clone, PartialEq)]
pub struct Boundary {
    name: String,
    f: f64,
    g: f64,
    description: String,
}

impl Boundary {
    pub fn new(
        name: impl Into<String>,
        f: f64,
        g: f64,
        description: impl Into<String>,
    ) -> NewtonResult<Self> {
        if g <= 0.0 {
            return Err(NewtonError::Validation(format!(
                "reality dimension g must be positive, got {g}"
            )));
        }
        if f < 0.0 {
            return Err(NewtonError::Validation(format!(
                "attempt dimension f must be non-negative, got {f}"
            )));
        }
        Ok(Self {
            name: name.into(),
            f,
            g,
            description: description.into(),
        })
    }

    pub fn from_spec(spec: &ConstraintSpec) -> NewtonResult<Self> {
        Self::new(spec.name.clone(), spec.f, spec.g, spec.description.clone())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn f(&self) -> f64 {
        self.f
    }

    pub fn g(&self) -> f64 {
        self.g
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The `f/g` ratio determining feasibility.
    pub fn ratio(&self) -> f64 {
        self.f / self.g
    }

    /// Which region this boundary places us in.
    pub fn region(&self) -> FeasibilityRegion {
        let r = self.ratio();
        if r < 1.0 - RATIO_TOLERANCE {
            FeasibilityRegion::Fin
        } else if r > 1.0 + RATIO_TOLERANCE {
            FeasibilityRegion::Finfr
        } else {
            FeasibilityRegion::Boundary
        }
    }

    /// How much margin remains (negative if over the boundary).
    pub fn margin(&self) -> f64 {
        1.0 - self.ratio()
    }

    /// True if we are inside or on the boundary.
    pub fn is_satisfied(&self) -> bool {
        self.region() != FeasibilityRegion::Finfr
    }
}

/// Per-boundary evaluation detail, serializable for audit consumers.
#[derive(Debug, Clone, Serialize)]
pub struct BoundaryReport {
    pub name: String,
    pub f: f64,
    pub g: f64,
    pub ratio: f64,
    pub margin: f64,
    pub region: FeasibilityRegion,
    pub satisfied: bool,
}

/// Aggregate evaluation detail for a polytope.
#[derive(Debug, Clone, Serialize)]
pub struct PolytopeDetails {
    pub dimension: usize,
    pub max_ratio: f64,
    pub min_margin: f64,
    pub binding_count: usize,
    pub violated_count: usize,
    pub boundaries: Vec<BoundaryReport>,
}

/// Full evaluation of a polytope state: can we execute, where are we,
/// and the per-boundary detail.
#[derive(Debug, Clone, Serialize)]
pub struct PolytopeEvaluation {
    pub feasible: bool,
    pub region: FeasibilityRegion,
    pub details: PolytopeDetails,
}

/// The complete constraint polytope.
///
/// The feasible region is the intersection of the half-spaces
/// `f/g <= 1`; a point outside ANY boundary is outside the polytope.
/// Once frozen, the boundary list is immutable.
#[derive(Debug, Clone)]
pub struct ConstraintPolytope {
    name: String,
    boundaries: Vec<Boundary>,
    frozen: bool,
}

impl ConstraintPolytope {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            boundaries: Vec::new(),
            frozen: false,
        }
    }

    /// Build a frozen polytope from constraint specifications.
    pub fn from_specs(name: impl Into<String>, specs: &[ConstraintSpec]) -> NewtonResult<Self> {
        let mut polytope = Self::new(name);
        for spec in specs {
            polytope.add_boundary(Boundary::from_spec(spec)?)?;
        }
        Ok(polytope.freeze())
    }

    /// Add a constraint boundary. Fails once the polytope is frozen.
    pub fn add_boundary(&mut self, boundary: Boundary) -> NewtonResult<()> {
        if self.frozen {
            return Err(NewtonError::Validation(format!(
                "cannot modify frozen polytope '{}'",
                self.name
            )));
        }
        self.boundaries.push(boundary);
        Ok(())
    }

    /// Freeze the polytope, preventing further modification.
    pub fn freeze(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn boundaries(&self) -> &[Boundary] {
        &self.boundaries
    }

    /// Number of constraint dimensions.
    pub fn dimension(&self) -> usize {
        self.boundaries.len()
    }

    /// The overall feasibility region: the most restrictive member
    /// region. No boundaries means always allowed.
    pub fn region(&self) -> FeasibilityRegion {
        self.boundaries
            .iter()
            .map(Boundary::region)
            .max_by_key(|r| r.restrictiveness())
            .unwrap_or(FeasibilityRegion::Fin)
    }

    /// The maximum `f/g` ratio across all boundaries (0.0 if empty).
    pub fn max_ratio(&self) -> f64 {
        self.boundaries
            .iter()
            .map(Boundary::ratio)
            .fold(0.0, f64::max)
    }

    /// The minimum margin across all boundaries (+inf if empty).
    pub fn min_margin(&self) -> f64 {
        self.boundaries
            .iter()
            .map(Boundary::margin)
            .fold(f64::INFINITY, f64::min)
    }

    /// Constraints at or near the boundary (margin < 0.1).
    pub fn binding_constraints(&self) -> Vec<&Boundary> {
        self.boundaries
            .iter()
            .filter(|b| b.margin() < BINDING_MARGIN)
            .collect()
    }

    /// Constraints that are violated (`f/g > 1`).
    pub fn violated_constraints(&self) -> Vec<&Boundary> {
        self.boundaries
            .iter()
            .filter(|b| b.region() == FeasibilityRegion::Finfr)
            .collect()
    }

    /// True if the current state is inside the polytope.
    pub fn is_feasible(&self) -> bool {
        self.region() != FeasibilityRegion::Finfr
    }

    /// Full evaluation of the polytope state.
    pub fn evaluate(&self) -> PolytopeEvaluation {
        let boundaries = self
            .boundaries
            .iter()
            .map(|b| BoundaryReport {
                name: b.name.clone(),
                f: b.f,
                g: b.g,
                ratio: b.ratio(),
                margin: b.margin(),
                region: b.region(),
                satisfied: b.is_satisfied(),
            })
            .collect();

        PolytopeEvaluation {
            feasible: self.is_feasible(),
            region: self.region(),
            details: PolytopeDetails {
                dimension: self.dimension(),
                max_ratio: self.max_ratio(),
                min_margin: self.min_margin(),
                binding_count: self.binding_constraints().len(),
                violated_count: self.violated_constraints().len(),
                boundaries,
            },
        }
    }

    /// How much `f` must decrease to bring a boundary back to
    /// `f/g = 1`. `None` if the boundary is unknown, `0.0` if it is
    /// already satisfied.
    pub fn project_to_boundary(&self, boundary_name: &str) -> Option<f64> {
        let b = self.boundaries.iter().find(|b| b.name == boundary_name)?;
        if b.is_satisfied() {
            Some(0.0)
        } else {
            // f/g > 1: reduce f to f' = g
            Some(b.f - b.g)
        }
    }

    /// Check if an ad hoc point (per-dimension `(f, g)` values keyed
    /// by boundary name) lies inside the polytope. A non-positive `g`
    /// is outside reality, hence outside the polytope. Dimensions not
    /// named by this polytope are ignored.
    pub fn contains_point(&self, point: &std::collections::HashMap<String, (f64, f64)>) -> bool {
        for b in &self.boundaries {
            if let Some(&(f, g)) = point.get(&b.name) {
                if g <= 0.0 || f / g > 1.0 + RATIO_TOLERANCE {
                    return false;
                }
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_boundary_creation() {
        let b = Boundary::new("budget", 50.0, 100.0, "").unwrap();
        assert!((b.ratio() - 0.5).abs() < 1e-9);
        assert_eq!(b.region(), FeasibilityRegion::Fin);
        assert!(b.is_satisfied());
    }

    #[test]
    fn test_boundary_at_limit() {
        let b = Boundary::new("exact", 100.0, 100.0, "").unwrap();
        assert_eq!(b.region(), FeasibilityRegion::Boundary);
        assert!(b.is_satisfied());
    }

    #[test]
    fn test_boundary_exceeded() {
        let b = Boundary::new("over", 150.0, 100.0, "").unwrap();
        assert_eq!(b.region(), FeasibilityRegion::Finfr);
        assert!(!b.is_satisfied());
        assert!(b.margin() < 0.0);
    }

    #[test]
    fn test_boundary_invalid_g() {
        assert!(Boundary::new("bad", 1.0, 0.0, "").is_err());
        assert!(Boundary::new("bad", 1.0, -1.0, "").is_err());
    }

    #[test]
    fn test_boundary_invalid_f() {
        assert!(Boundary::new("bad", -0.5, 1.0, "").is_err());
    }

    #[test]
    fn test_empty_polytope_always_feasible() {
        let p = ConstraintPolytope::new("empty");
        assert!(p.is_feasible());
        assert_eq!(p.region(), FeasibilityRegion::Fin);
        assert_eq!(p.max_ratio(), 0.0);
        assert_eq!(p.min_margin(), f64::INFINITY);
    }

    #[test]
    fn test_polytope_single_constraint_satisfied() {
        let mut p = ConstraintPolytope::new("test");
        p.add_boundary(Boundary::new("cpu", 3.0, 4.0, "").unwrap())
            .unwrap();
        assert!(p.is_feasible());
        assert_eq!(p.region(), FeasibilityRegion::Fin);
    }

    #[test]
    fn test_polytope_one_violation_dominates() {
        let mut p = ConstraintPolytope::new("test");
        p.add_boundary(Boundary::new("ok", 1.0, 2.0, "").unwrap())
            .unwrap();
        p.add_boundary(Boundary::new("over", 3.0, 2.0, "").unwrap())
            .unwrap();
        assert!(!p.is_feasible());
        assert_eq!(p.region(), FeasibilityRegion::Finfr);
        assert_eq!(p.violated_constraints().len(), 1);
        assert_eq!(p.violated_constraints()[0].name(), "over");
    }

    #[test]
    fn test_polytope_boundary_dominates_fin() {
        let mut p = ConstraintPolytope::new("test");
        p.add_boundary(Boundary::new("loose", 1.0, 2.0, "").unwrap())
            .unwrap();
        p.add_boundary(Boundary::new("tight", 2.0, 2.0, "").unwrap())
            .unwrap();
        assert_eq!(p.region(), FeasibilityRegion::Boundary);
        assert!(p.is_feasible());
    }

    #[test]
    fn test_polytope_freeze_rejects_mutation() {
        let mut p = ConstraintPolytope::new("test");
        p.add_boundary(Boundary::new("a", 1.0, 2.0, "").unwrap())
            .unwrap();
        let mut frozen = p.freeze();
        let err = frozen
            .add_boundary(Boundary::new("b", 1.0, 2.0, "").unwrap())
            .unwrap_err();
        assert!(err.to_string().contains("frozen"));
    }

    #[test]
    fn test_binding_constraints() {
        let mut p = ConstraintPolytope::new("test");
        p.add_boundary(Boundary::new("loose", 1.0, 10.0, "").unwrap())
            .unwrap();
        p.add_boundary(Boundary::new("tight", 95.0, 100.0, "").unwrap())
            .unwrap();
        let binding = p.binding_constraints();
        assert_eq!(binding.len(), 1);
        assert_eq!(binding[0].name(), "tight");
    }

    #[test]
    fn test_evaluate_details() {
        let p = ConstraintPolytope::from_specs(
            "query",
            &[
                ConstraintSpec::new("a", 1.0, 2.0),
                ConstraintSpec::new("b", 3.0, 2.0),
            ],
        )
        .unwrap();
        let eval = p.evaluate();
        assert!(!eval.feasible);
        assert_eq!(eval.details.dimension, 2);
        assert!((eval.details.max_ratio - 1.5).abs() < 1e-9);
        assert!((eval.details.min_margin - (-0.5)).abs() < 1e-9);
        assert_eq!(eval.details.violated_count, 1);
        assert_eq!(eval.details.boundaries.len(), 2);
    }

    #[test]
    fn test_from_specs_rejects_invalid() {
        let err =
            ConstraintPolytope::from_specs("query", &[ConstraintSpec::new("bad", 1.0, 0.0)])
                .unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    #[test]
    fn test_project_to_boundary() {
        let mut p = ConstraintPolytope::new("test");
        p.add_boundary(Boundary::new("ok", 1.0, 2.0, "").unwrap())
            .unwrap();
        p.add_boundary(Boundary::new("over", 5.0, 2.0, "").unwrap())
            .unwrap();
        assert_eq!(p.project_to_boundary("ok"), Some(0.0));
        assert_eq!(p.project_to_boundary("over"), Some(3.0));
        assert_eq!(p.project_to_boundary("missing"), None);
    }

    #[test]
    fn test_contains_point() {
        let mut p = ConstraintPolytope::new("test");
        p.add_boundary(Boundary::new("dim", 1.0, 2.0, "").unwrap())
            .unwrap();

        let inside: HashMap<String, (f64, f64)> = [("dim".to_string(), (1.0, 2.0))].into();
        assert!(p.contains_point(&inside));

        let outside: HashMap<String, (f64, f64)> = [("dim".to_string(), (3.0, 2.0))].into();
        assert!(!p.contains_point(&outside));
    }

    #[test]
    fn test_contains_point_rejects_degenerate_g() {
        let mut p = ConstraintPolytope::new("test");
        p.add_boundary(Boundary::new("dim", 1.0, 2.0, "").unwrap())
            .unwrap();

        let zero_g: HashMap<String, (f64, f64)> = [("dim".to_string(), (0.0, 0.0))].into();
        assert!(!p.contains_point(&zero_g));

        let negative_g: HashMap<String, (f64, f64)> = [("dim".to_string(), (1.0, -2.0))].into();
        assert!(!p.contains_point(&negative_g));
    }

    #[test]
    fn test_region_tolerance() {
        let just_under = Boundary::new("u", 1.0 - 1e-12, 1.0, "").unwrap();
        assert_eq!(just_under.region(), FeasibilityRegion::Boundary);
        let just_over = Boundary::new("o", 1.0 + 1e-12, 1.0, "").unwrap();
        assert_eq!(just_over.region(), FeasibilityRegion::Boundary);
        let clearly_over = Boundary::new("c", 1.0 + 1e-6, 1.0, "").unwrap();
        assert_eq!(clearly_over.region(), FeasibilityRegion::Finfr);
    }
}
