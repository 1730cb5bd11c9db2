// ─────────────────────────────────────────────────────────────────────
// Newton — Decision Simplex (Barycentric Classification)
// ─────────────────────────────────────────────────────────────────────
//! The 3-simplex (tetrahedron) whose four vertices are the decisions
//! ANSWER, DEFER, ASK, REFUSE. Every classification is a point in
//! barycentric coordinates: four non-negative affinities summing to 1.
//!
//! Classification is a fixed algebraic map from (risk, clarity,
//! capability) to affinities; there is no learned component, so the
//! same inputs always land on the same point.

use serde::Serialize;

use newton_types::{Decision, NewtonError, NewtonResult, RiskLevel};

/// Slack allowed below zero for individual coordinates.
const COORD_TOLERANCE: f64 = 1e-10;

/// Slack allowed around 1.0 for the coordinate sum.
const SUM_TOLERANCE: f64 = 1e-6;

/// A point inside the decision tetrahedron, in barycentric
/// coordinates over (ANSWER, DEFER, ASK, REFUSE).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SimplexPoint {
    pub answer: f64,
    pub defer: f64,
    pub ask: f64,
    pub refuse: f64,
}

impl SimplexPoint {
    /// Build a point, validating non-negativity and unit sum.
    pub fn new(answer: f64, defer: f64, ask: f64, refuse: f64) -> NewtonResult<Self> {
        for (name, v) in [
            ("answer", answer),
            ("defer", defer),
            ("ask", ask),
            ("refuse", refuse),
        ] {
            if v < -COORD_TOLERANCE {
                return Err(NewtonError::Validation(format!(
                    "barycentric coordinate {name} must be non-negative, got {v}"
                )));
            }
        }
        let sum = answer + defer + ask + refuse;
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(NewtonError::Validation(format!(
                "barycentric coordinates must sum to 1, got {sum}"
            )));
        }
        Ok(Self {
            answer,
            defer,
            ask,
            refuse,
        })
    }

    /// The pure vertex for a decision.
    pub fn vertex(decision: Decision) -> Self {
        match decision {
            Decision::Answer => Self {
                answer: 1.0,
                defer: 0.0,
                ask: 0.0,
                refuse: 0.0,
            },
            Decision::Defer => Self {
                answer: 0.0,
                defer: 1.0,
                ask: 0.0,
                refuse: 0.0,
            },
            Decision::Ask => Self {
                answer: 0.0,
                defer: 0.0,
                ask: 1.0,
                refuse: 0.0,
            },
            Decision::Refuse => Self {
                answer: 0.0,
                defer: 0.0,
                ask: 0.0,
                refuse: 1.0,
            },
        }
    }

    /// The centroid: maximal indecision.
    pub fn uniform() -> Self {
        Self {
            answer: 0.25,
            defer: 0.25,
            ask: 0.25,
            refuse: 0.25,
        }
    }

    /// The affinity for one decision.
    pub fn coordinate(&self, decision: Decision) -> f64 {
        match decision {
            Decision::Answer => self.answer,
            Decision::Defer => self.defer,
            Decision::Ask => self.ask,
            Decision::Refuse => self.refuse,
        }
    }

    /// The decision with the highest affinity. Exact ties resolve to
    /// the safer decision.
    pub fn dominant_decision(&self) -> Decision {
        let mut best = Decision::SAFEST_FIRST[0];
        let mut best_value = self.coordinate(best);
        for &d in &Decision::SAFEST_FIRST[1..] {
            let v = self.coordinate(d);
            if v > best_value {
                best = d;
                best_value = v;
            }
        }
        best
    }

    /// Safety height above the ANSWER face: REFUSE contributes fully,
    /// DEFER and ASK half, ANSWER nothing.
    pub fn height(&self) -> f64 {
        self.refuse + 0.5 * (self.defer + self.ask)
    }

    /// Risk banding of the safety height. A pure-DEFER or pure-ASK
    /// point sits at height 0.5 and therefore reads HIGH.
    pub fn risk_level(&self) -> RiskLevel {
        RiskLevel::from_score(self.height())
    }

    /// Confidence is the largest affinity: 0.25 at the centroid, 1.0
    /// at a vertex.
    pub fn confidence(&self) -> f64 {
        self.answer
            .max(self.defer)
            .max(self.ask)
            .max(self.refuse)
    }

    /// Normalized Shannon entropy of the affinities: 0.0 at a vertex,
    /// 1.0 at the centroid.
    pub fn ambiguity(&self) -> f64 {
        let entropy: f64 = [self.answer, self.defer, self.ask, self.refuse]
            .iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| -p * p.ln())
            .sum();
        entropy / 4.0_f64.ln()
    }

    /// Barycentric distance to a decision vertex.
    pub fn distance_to_vertex(&self, decision: Decision) -> f64 {
        1.0 - self.coordinate(decision)
    }

    /// Linear interpolation toward another point. `t` must lie in
    /// [0, 1]; the result is always a valid point since the simplex is
    /// convex.
    pub fn interpolate(&self, other: &SimplexPoint, t: f64) -> NewtonResult<SimplexPoint> {
        if !(0.0..=1.0).contains(&t) {
            return Err(NewtonError::Validation(format!(
                "interpolation parameter must be in [0, 1], got {t}"
            )));
        }
        let u = 1.0 - t;
        Ok(SimplexPoint {
            answer: u * self.answer + t * other.answer,
            defer: u * self.defer + t * other.defer,
            ask: u * self.ask + t * other.ask,
            refuse: u * self.refuse + t * other.refuse,
        })
    }
}

/// The classification engine over the decision tetrahedron.
#[derive(Debug, Clone, Default)]
pub struct DecisionSimplex;

impl DecisionSimplex {
    pub fn new() -> Self {
        Self
    }

    /// Map (risk, clarity, capability) to a point on the simplex.
    ///
    /// Raw affinities before normalization:
    /// - refuse grows quadratically with risk
    /// - ask grows with unclarity, suppressed when refusing
    /// - defer grows with incapability on clear requests
    /// - answer requires capability, clarity, and low risk together
    pub fn classify(&self, risk: f64, clarity: f64, capability: f64) -> NewtonResult<SimplexPoint> {
        for (name, v) in [("risk", risk), ("clarity", clarity), ("capability", capability)] {
            if !(0.0..=1.0).contains(&v) {
                return Err(NewtonError::Validation(format!(
                    "{name} must be in [0, 1], got {v}"
                )));
            }
        }

        let refuse = risk * risk;
        let ask = (1.0 - clarity) * (1.0 - refuse);
        let defer = (1.0 - capability) * (1.0 - refuse) * clarity;
        let answer = capability * clarity * (1.0 - risk);

        let sum = answer + defer + ask + refuse;
        if sum < 1e-10 {
            // All affinities collapsed; the only honest move is to ask.
            log::warn!(
                "degenerate classification (risk={risk}, clarity={clarity}, \
                 capability={capability}); defaulting to ASK vertex"
            );
            return Ok(SimplexPoint::vertex(Decision::Ask));
        }

        SimplexPoint::new(answer / sum, defer / sum, ask / sum, refuse / sum)
    }

    /// Classify and return the dominant decision.
    pub fn decide(&self, risk: f64, clarity: f64, capability: f64) -> NewtonResult<Decision> {
        Ok(self.classify(risk, clarity, capability)?.dominant_decision())
    }

    /// Move a point toward a safer vertex by transferring affinity
    /// mass. REFUSE absorbs everything; DEFER and ASK absorb only the
    /// ANSWER mass. ANSWER is not an escalation target.
    pub fn escalate(&self, point: &SimplexPoint, target: Decision) -> NewtonResult<SimplexPoint> {
        match target {
            Decision::Answer => Err(NewtonError::Validation(
                "cannot escalate toward ANSWER; escalation only increases safety".to_string(),
            )),
            Decision::Refuse => SimplexPoint::new(
                0.0,
                0.0,
                0.0,
                point.refuse + point.answer + point.defer + point.ask,
            ),
            Decision::Defer => SimplexPoint::new(
                0.0,
                point.defer + point.answer,
                point.ask,
                point.refuse,
            ),
            Decision::Ask => SimplexPoint::new(
                0.0,
                point.defer,
                point.ask + point.answer,
                point.refuse,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_points() {
        for d in Decision::ALL {
            let p = SimplexPoint::vertex(d);
            assert_eq!(p.dominant_decision(), d);
            assert!((p.coordinate(d) - 1.0).abs() < 1e-9);
            assert!((p.confidence() - 1.0).abs() < 1e-9);
            assert!(p.ambiguity().abs() < 1e-9);
        }
    }

    #[test]
    fn test_uniform_point() {
        let p = SimplexPoint::uniform();
        assert!((p.confidence() - 0.25).abs() < 1e-9);
        assert!((p.ambiguity() - 1.0).abs() < 1e-9);
        // At the centroid every affinity ties; the safest decision wins.
        assert_eq!(p.dominant_decision(), Decision::Refuse);
    }

    #[test]
    fn test_invalid_coordinates() {
        assert!(SimplexPoint::new(-0.5, 0.5, 0.5, 0.5).is_err());
        assert!(SimplexPoint::new(0.5, 0.5, 0.5, 0.5).is_err());
    }

    #[test]
    fn test_classify_safe_clear_capable() {
        let s = DecisionSimplex::new();
        let p = s.classify(0.0, 1.0, 1.0).unwrap();
        assert_eq!(p.dominant_decision(), Decision::Answer);
        assert!((p.answer - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_classify_high_risk_refuses() {
        let s = DecisionSimplex::new();
        let p = s.classify(0.9, 1.0, 1.0).unwrap();
        assert_eq!(p.dominant_decision(), Decision::Refuse);
        // refuse raw affinity is 0.81 before normalization, and only
        // answer competes (0.1), so refuse clearly dominates.
        assert!(p.refuse > 0.8);
        assert_eq!(p.risk_level(), RiskLevel::Critical);
    }

    #[test]
    fn test_classify_unclear_asks() {
        let s = DecisionSimplex::new();
        let p = s.classify(0.0, 0.1, 1.0).unwrap();
        assert_eq!(p.dominant_decision(), Decision::Ask);
    }

    #[test]
    fn test_classify_incapable_defers() {
        let s = DecisionSimplex::new();
        let p = s.classify(0.0, 1.0, 0.1).unwrap();
        assert_eq!(p.dominant_decision(), Decision::Defer);
    }

    #[test]
    fn test_classify_sums_to_one() {
        let s = DecisionSimplex::new();
        for &(r, c, k) in &[
            (0.0, 0.0, 0.0),
            (1.0, 1.0, 1.0),
            (0.5, 0.5, 0.5),
            (0.3, 0.9, 0.2),
            (0.0, 1.0, 0.0),
        ] {
            let p = s.classify(r, c, k).unwrap();
            let sum = p.answer + p.defer + p.ask + p.refuse;
            assert!((sum - 1.0).abs() < 1e-9, "sum {sum} for ({r}, {c}, {k})");
        }
    }

    #[test]
    fn test_classify_validates_range() {
        let s = DecisionSimplex::new();
        assert!(s.classify(1.5, 0.5, 0.5).is_err());
        assert!(s.classify(0.5, -0.1, 0.5).is_err());
        assert!(s.classify(0.5, 0.5, 2.0).is_err());
    }

    #[test]
    fn test_classify_deterministic() {
        let s = DecisionSimplex::new();
        let a = s.classify(0.3, 0.7, 0.6).unwrap();
        let b = s.classify(0.3, 0.7, 0.6).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_height_ordering() {
        assert!(SimplexPoint::vertex(Decision::Answer).height().abs() < 1e-9);
        assert!(
            (SimplexPoint::vertex(Decision::Defer).height() - 0.5).abs() < 1e-9
        );
        assert!(
            (SimplexPoint::vertex(Decision::Ask).height() - 0.5).abs() < 1e-9
        );
        assert!(
            (SimplexPoint::vertex(Decision::Refuse).height() - 1.0).abs() < 1e-9
        );
    }

    #[test]
    fn test_risk_level_follows_height_not_refuse() {
        // Pure DEFER: no refuse mass, but height 0.5.
        let p = SimplexPoint::vertex(Decision::Defer);
        assert_eq!(p.risk_level(), RiskLevel::High);
        let p = SimplexPoint::vertex(Decision::Ask);
        assert_eq!(p.risk_level(), RiskLevel::High);
        let p = SimplexPoint::vertex(Decision::Answer);
        assert_eq!(p.risk_level(), RiskLevel::Low);
        let p = SimplexPoint::vertex(Decision::Refuse);
        assert_eq!(p.risk_level(), RiskLevel::Critical);

        let s = DecisionSimplex::new();
        let p = s.classify(0.0, 1.0, 0.0).unwrap();
        assert_eq!(p.dominant_decision(), Decision::Defer);
        assert_eq!(p.risk_level(), RiskLevel::High);
    }

    #[test]
    fn test_escalate_to_refuse_absorbs_all() {
        let s = DecisionSimplex::new();
        let p = SimplexPoint::new(0.4, 0.3, 0.2, 0.1).unwrap();
        let e = s.escalate(&p, Decision::Refuse).unwrap();
        assert!((e.refuse - 1.0).abs() < 1e-9);
        assert_eq!(e.dominant_decision(), Decision::Refuse);
    }

    #[test]
    fn test_escalate_to_defer_absorbs_answer_only() {
        let s = DecisionSimplex::new();
        let p = SimplexPoint::new(0.4, 0.3, 0.2, 0.1).unwrap();
        let e = s.escalate(&p, Decision::Defer).unwrap();
        assert!(e.answer.abs() < 1e-9);
        assert!((e.defer - 0.7).abs() < 1e-9);
        assert!((e.ask - 0.2).abs() < 1e-9);
        assert!((e.refuse - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_escalate_to_answer_rejected() {
        let s = DecisionSimplex::new();
        let p = SimplexPoint::uniform();
        assert!(s.escalate(&p, Decision::Answer).is_err());
    }

    #[test]
    fn test_escalate_never_lowers_height() {
        let s = DecisionSimplex::new();
        let p = s.classify(0.2, 0.8, 0.9).unwrap();
        for target in [Decision::Ask, Decision::Defer, Decision::Refuse] {
            let e = s.escalate(&p, target).unwrap();
            assert!(e.height() >= p.height() - 1e-9);
        }
    }

    #[test]
    fn test_interpolate() {
        let a = SimplexPoint::vertex(Decision::Answer);
        let r = SimplexPoint::vertex(Decision::Refuse);
        let mid = a.interpolate(&r, 0.5).unwrap();
        assert!((mid.answer - 0.5).abs() < 1e-9);
        assert!((mid.refuse - 0.5).abs() < 1e-9);
        assert!(a.interpolate(&r, 1.5).is_err());
        assert!(a.interpolate(&r, -0.1).is_err());
    }

    #[test]
    fn test_distance_to_vertex() {
        let p = SimplexPoint::uniform();
        for d in Decision::ALL {
            assert!((p.distance_to_vertex(d) - 0.75).abs() < 1e-9);
        }
    }
}
