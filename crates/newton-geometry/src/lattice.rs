// ─────────────────────────────────────────────────────────────────────
// Newton — Governance Lattice (Monotonic Safety)
// ─────────────────────────────────────────────────────────────────────
//! The bounded lattice over the four decisions:
//!
//! ```text
//!         REFUSE (⊤)
//!        /        \
//!     DEFER      ASK
//!        \        /
//!         ANSWER (⊥)
//! ```
//!
//! `join` returns the safer decision, `meet` the less safe one. A fold
//! of joins therefore can never produce a decision less safe than any
//! input, which is the monotonicity property the whole kernel rests on.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use newton_types::{Decision, SafetyLevel};

/// A node in the governance lattice: a decision together with its
/// safety level and a human-readable description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatticeNode {
    pub decision: Decision,
    pub safety_level: SafetyLevel,
    pub description: &'static str,
}

impl LatticeNode {
    /// True if this node is immediately above `other`: strictly safer
    /// with no node strictly between them. REFUSE covers DEFER and
    /// ASK; DEFER and ASK each cover ANSWER.
    pub fn covers(&self, other: &LatticeNode) -> bool {
        if self.safety_level <= other.safety_level {
            return false;
        }
        !Decision::ALL.iter().any(|&d| {
            let mid = d.safety_level();
            mid > other.safety_level && mid < self.safety_level
        })
    }
}

/// The complete governance lattice. The structure is fixed, so the
/// type is zero-sized and all operations are pure.
#[derive(Debug, Clone, Copy, Default)]
pub struct GovernanceLattice;

impl GovernanceLattice {
    pub fn new() -> Self {
        Self
    }

    /// The top element (⊤): REFUSE.
    pub fn top(&self) -> LatticeNode {
        self.node(Decision::Refuse)
    }

    /// The bottom element (⊥): ANSWER.
    pub fn bottom(&self) -> LatticeNode {
        self.node(Decision::Answer)
    }

    /// The lattice node for a decision.
    pub fn node(&self, decision: Decision) -> LatticeNode {
        let description = match decision {
            Decision::Answer => "Generate a response (minimum safety)",
            Decision::Defer => "Redirect to authoritative source (high safety)",
            Decision::Ask => "Request clarification (high safety)",
            Decision::Refuse => "Decline to engage (maximum safety)",
        };
        LatticeNode {
            decision,
            safety_level: decision.safety_level(),
            description,
        }
    }

    /// Join (⊔): the safer of the two decisions. On equal safety the
    /// first operand wins, so DEFER ⊔ ASK = DEFER and ASK ⊔ DEFER =
    /// ASK.
    pub fn join(&self, a: Decision, b: Decision) -> Decision {
        if a.safety_level() >= b.safety_level() {
            a
        } else {
            b
        }
    }

    /// Meet (⊓): the less safe of the two decisions. Analysis only;
    /// governance never meets.
    pub fn meet(&self, a: Decision, b: Decision) -> Decision {
        if a.safety_level() <= b.safety_level() {
            a
        } else {
            b
        }
    }

    /// Fold a sequence of decisions with join. The result is at least
    /// as safe as every input. Empty input is the bottom element.
    pub fn governance_join(&self, decisions: &[Decision]) -> Decision {
        decisions
            .iter()
            .copied()
            .fold(Decision::Answer, |acc, d| self.join(acc, d))
    }

    /// True if moving from `from` to `to` strictly increases safety.
    pub fn can_escalate(&self, from: Decision, to: Decision) -> bool {
        to.safety_level() > from.safety_level()
    }

    /// Escalate a decision one level up the lattice, returning the new
    /// decision and a description of the move. ANSWER escalates to
    /// DEFER; REFUSE is already the top.
    pub fn escalate(&self, current: Decision, reason: &str) -> (Decision, String) {
        match current {
            Decision::Refuse => (Decision::Refuse, "Already at maximum safety".to_string()),
            Decision::Answer => (Decision::Defer, format!("ANSWER → DEFER: {reason}")),
            Decision::Defer | Decision::Ask => (
                Decision::Refuse,
                format!("{} → REFUSE: {reason}", current.as_str()),
            ),
        }
    }

    /// Safety ordering: `Less` if `a` is less safe than `b`, `Equal`
    /// if equally safe (including DEFER vs ASK), `Greater` if safer.
    pub fn compare(&self, a: Decision, b: Decision) -> Ordering {
        a.safety_level().cmp(&b.safety_level())
    }

    /// True if the transition maintains or increases safety.
    pub fn is_safe_transition(&self, from: Decision, to: Decision) -> bool {
        self.compare(from, to) != Ordering::Greater
    }

    /// All decisions strictly safer than the given one.
    pub fn all_above(&self, decision: Decision) -> BTreeSet<Decision> {
        Decision::ALL
            .iter()
            .copied()
            .filter(|d| d.safety_level() > decision.safety_level())
            .collect()
    }

    /// All decisions strictly less safe than the given one.
    pub fn all_below(&self, decision: Decision) -> BTreeSet<Decision> {
        Decision::ALL
            .iter()
            .copied()
            .filter(|d| d.safety_level() < decision.safety_level())
            .collect()
    }

    /// The covering relation: pairs `(a, b)` where `a` is immediately
    /// above `b` in the lattice.
    pub fn covering_relation(&self) -> Vec<(Decision, Decision)> {
        let mut relations = Vec::new();
        for &a in &Decision::ALL {
            for &b in &Decision::ALL {
                if self.node(a).covers(&self.node(b)) {
                    relations.push((a, b));
                }
            }
        }
        relations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_top_and_bottom() {
        let l = GovernanceLattice::new();
        assert_eq!(l.top().decision, Decision::Refuse);
        assert_eq!(l.top().safety_level, SafetyLevel::Maximum);
        assert_eq!(l.bottom().decision, Decision::Answer);
        assert_eq!(l.bottom().safety_level, SafetyLevel::Minimum);
    }

    #[test]
    fn test_join_picks_safer() {
        let l = GovernanceLattice::new();
        assert_eq!(l.join(Decision::Answer, Decision::Refuse), Decision::Refuse);
        assert_eq!(l.join(Decision::Defer, Decision::Answer), Decision::Defer);
        assert_eq!(l.join(Decision::Answer, Decision::Answer), Decision::Answer);
    }

    #[test]
    fn test_join_equal_safety_favors_first() {
        let l = GovernanceLattice::new();
        assert_eq!(l.join(Decision::Defer, Decision::Ask), Decision::Defer);
        assert_eq!(l.join(Decision::Ask, Decision::Defer), Decision::Ask);
    }

    #[test]
    fn test_meet_picks_less_safe() {
        let l = GovernanceLattice::new();
        assert_eq!(l.meet(Decision::Answer, Decision::Refuse), Decision::Answer);
        assert_eq!(l.meet(Decision::Refuse, Decision::Defer), Decision::Defer);
    }

    #[test]
    fn test_join_absorbing_and_identity() {
        let l = GovernanceLattice::new();
        for d in Decision::ALL {
            assert_eq!(l.join(Decision::Refuse, d), Decision::Refuse);
            assert_eq!(l.join(d, Decision::Answer), d);
            assert_eq!(l.join(d, d), d);
        }
    }

    #[test]
    fn test_join_associative_up_to_safety() {
        let l = GovernanceLattice::new();
        for a in Decision::ALL {
            for b in Decision::ALL {
                for c in Decision::ALL {
                    let left = l.join(l.join(a, b), c);
                    let right = l.join(a, l.join(b, c));
                    assert_eq!(left.safety_level(), right.safety_level());
                }
            }
        }
    }

    #[test]
    fn test_governance_join() {
        let l = GovernanceLattice::new();
        assert_eq!(
            l.governance_join(&[Decision::Answer, Decision::Defer, Decision::Answer]),
            Decision::Defer
        );
        assert_eq!(
            l.governance_join(&[Decision::Answer, Decision::Refuse]),
            Decision::Refuse
        );
        assert_eq!(l.governance_join(&[]), Decision::Answer);
    }

    #[test]
    fn test_governance_join_monotone() {
        let l = GovernanceLattice::new();
        let decisions = [Decision::Answer, Decision::Ask, Decision::Defer];
        let joined = l.governance_join(&decisions);
        for d in decisions {
            assert!(joined.safety_level() >= d.safety_level());
        }
    }

    #[test]
    fn test_escalate_paths() {
        let l = GovernanceLattice::new();
        let (d, reason) = l.escalate(Decision::Answer, "low confidence");
        assert_eq!(d, Decision::Defer);
        assert_eq!(reason, "ANSWER → DEFER: low confidence");

        let (d, reason) = l.escalate(Decision::Defer, "policy");
        assert_eq!(d, Decision::Refuse);
        assert_eq!(reason, "DEFER → REFUSE: policy");

        let (d, reason) = l.escalate(Decision::Ask, "policy");
        assert_eq!(d, Decision::Refuse);
        assert_eq!(reason, "ASK → REFUSE: policy");

        let (d, reason) = l.escalate(Decision::Refuse, "ignored");
        assert_eq!(d, Decision::Refuse);
        assert_eq!(reason, "Already at maximum safety");
    }

    #[test]
    fn test_can_escalate() {
        let l = GovernanceLattice::new();
        assert!(l.can_escalate(Decision::Answer, Decision::Refuse));
        assert!(l.can_escalate(Decision::Ask, Decision::Refuse));
        assert!(!l.can_escalate(Decision::Defer, Decision::Ask));
        assert!(!l.can_escalate(Decision::Refuse, Decision::Answer));
    }

    #[test]
    fn test_compare_and_safe_transition() {
        let l = GovernanceLattice::new();
        assert_eq!(
            l.compare(Decision::Answer, Decision::Refuse),
            Ordering::Less
        );
        assert_eq!(l.compare(Decision::Defer, Decision::Ask), Ordering::Equal);
        assert!(l.is_safe_transition(Decision::Answer, Decision::Ask));
        assert!(l.is_safe_transition(Decision::Defer, Decision::Ask));
        assert!(!l.is_safe_transition(Decision::Refuse, Decision::Answer));
    }

    #[test]
    fn test_all_above_below() {
        let l = GovernanceLattice::new();
        assert_eq!(
            l.all_above(Decision::Answer),
            [Decision::Defer, Decision::Ask, Decision::Refuse].into()
        );
        assert_eq!(l.all_above(Decision::Refuse), BTreeSet::new());
        assert_eq!(l.all_below(Decision::Answer), BTreeSet::new());
        assert_eq!(
            l.all_below(Decision::Ask),
            [Decision::Answer].into()
        );
    }

    #[test]
    fn test_covering_relation() {
        let l = GovernanceLattice::new();
        let relation = l.covering_relation();
        assert_eq!(relation.len(), 4);
        assert!(relation.contains(&(Decision::Refuse, Decision::Defer)));
        assert!(relation.contains(&(Decision::Refuse, Decision::Ask)));
        assert!(relation.contains(&(Decision::Defer, Decision::Answer)));
        assert!(relation.contains(&(Decision::Ask, Decision::Answer)));
        // REFUSE does not cover ANSWER; DEFER and ASK sit between.
        assert!(!relation.contains(&(Decision::Refuse, Decision::Answer)));
    }
}
