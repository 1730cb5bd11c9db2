// ─────────────────────────────────────────────────────────────────────
// Newton — Expand/Reduce Manifold (Text Grounding)
// ─────────────────────────────────────────────────────────────────────
//! The fiber bundle tying text space to constraint space.
//!
//! `expand` is a section σ: C → T picking one canonical phrasing per
//! constraint; `reduce` is the projection π: T → C recovering the
//! constraint a text expresses. The correctness property is
//! `reduce(expand(c)) = c`. Text that does not reduce to a registered
//! constraint is HALLUCINATED and must not be released.
//!
//! Identity in both spaces is content-addressed: a truncated SHA-256
//! of the canonical JSON form, so two constraints with the same
//! content are the same point regardless of their labels.

use std::collections::{HashMap, HashSet};

use parking_lot::RwLock;
use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

use newton_types::{NewtonError, NewtonResult};

/// Outcome of projecting a text point down to constraint space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectionStatus {
    /// The text reduces to a registered constraint.
    Grounded,
    /// The text has no constraint grounding.
    Hallucinated,
    /// The text reduces to more than one constraint.
    Ambiguous,
    /// The text only partially expresses its constraint.
    Partial,
}

/// Truncated SHA-256 content digest, 16 hex characters.
fn short_digest(bytes: &[u8]) -> String {
    let digest = Sha256::digest(bytes);
    digest.iter().take(8).map(|b| format!("{b:02x}")).collect()
}

/// A point in constraint space: the semantic ground truth that text
/// must faithfully represent. Identity is the content digest, so the
/// `id` label plays no part in equality.
#[derive(Debug, Clone, Serialize)]
pub struct ConstraintPoint {
    pub id: String,
    pub constraint_type: String,
    pub content: serde_json::Map<String, Value>,
    digest: String,
}

impl ConstraintPoint {
    pub fn new(
        id: impl Into<String>,
        constraint_type: impl Into<String>,
        content: serde_json::Map<String, Value>,
    ) -> NewtonResult<Self> {
        let canonical = serde_json::to_string(&Value::Object(content.clone()))
            .map_err(|e| NewtonError::Validation(format!("unserializable content: {e}")))?;
        Ok(Self {
            id: id.into(),
            constraint_type: constraint_type.into(),
            content,
            digest: short_digest(canonical.as_bytes()),
        })
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    /// Canonical JSON form with sorted keys: `{"content": ..., "type": ...}`.
    pub fn canonical_form(&self) -> NewtonResult<String> {
        let mut outer = serde_json::Map::new();
        outer.insert("content".to_string(), Value::Object(self.content.clone()));
        outer.insert(
            "type".to_string(),
            Value::String(self.constraint_type.clone()),
        );
        serde_json::to_string(&Value::Object(outer))
            .map_err(|e| NewtonError::Validation(format!("unserializable content: {e}")))
    }
}

impl PartialEq for ConstraintPoint {
    fn eq(&self, other: &Self) -> bool {
        self.digest == other.digest
    }
}

impl Eq for ConstraintPoint {}

impl std::hash::Hash for ConstraintPoint {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.digest.hash(state);
    }
}

/// A point in text space: a natural-language expression that may or
/// may not have constraint grounding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TextPoint {
    pub text: String,
    pub style: String,
}

impl TextPoint {
    pub fn new(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
        }
    }

    pub fn formal(text: impl Into<String>) -> Self {
        Self::new(text, "formal")
    }

    pub fn digest(&self) -> String {
        short_digest(self.text.as_bytes())
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Picks one canonical text representation per constraint.
pub trait ExpandStrategy: Send + Sync {
    fn expand(&self, constraint: &ConstraintPoint) -> NewtonResult<TextPoint>;
}

/// Recovers the constraint a text expresses, if any.
pub trait ReduceStrategy: Send + Sync {
    fn reduce(&self, text: &TextPoint) -> Option<ConstraintPoint>;
}

/// Default section: the constraint's canonical JSON form as formal text.
#[derive(Debug, Clone, Copy, Default)]
pub struct CanonicalExpand;

impl ExpandStrategy for CanonicalExpand {
    fn expand(&self, constraint: &ConstraintPoint) -> NewtonResult<TextPoint> {
        Ok(TextPoint::formal(constraint.canonical_form()?))
    }
}

/// Default projection: nothing reduces. Every text is treated as
/// ungrounded until a real reducer is installed.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReduce;

impl ReduceStrategy for NullReduce {
    fn reduce(&self, _text: &TextPoint) -> Option<ConstraintPoint> {
        None
    }
}

/// Adapter turning a closure into an [`ExpandStrategy`].
pub struct ExpandFn(Box<dyn Fn(&ConstraintPoint) -> NewtonResult<TextPoint> + Send + Sync>);

impl ExpandFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ConstraintPoint) -> NewtonResult<TextPoint> + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }
}

impl ExpandStrategy for ExpandFn {
    fn expand(&self, constraint: &ConstraintPoint) -> NewtonResult<TextPoint> {
        (self.0)(constraint)
    }
}

/// Adapter turning a closure into a [`ReduceStrategy`].
pub struct ReduceFn(Box<dyn Fn(&TextPoint) -> Option<ConstraintPoint> + Send + Sync>);

impl ReduceFn {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&TextPoint) -> Option<ConstraintPoint> + Send + Sync + 'static,
    {
        Self(Box::new(f))
    }
}

impl ReduceStrategy for ReduceFn {
    fn reduce(&self, text: &TextPoint) -> Option<ConstraintPoint> {
        (self.0)(text)
    }
}

/// The fiber over one constraint: every text registered as a valid
/// phrasing of it.
#[derive(Debug, Clone)]
pub struct Fiber {
    pub base_point: ConstraintPoint,
    text_points: HashSet<TextPoint>,
}

impl Fiber {
    pub fn new(base_point: ConstraintPoint) -> Self {
        Self {
            base_point,
            text_points: HashSet::new(),
        }
    }

    pub fn add_text(&mut self, text: TextPoint) {
        self.text_points.insert(text);
    }

    pub fn contains(&self, text: &TextPoint) -> bool {
        self.text_points.contains(text)
    }

    pub fn cardinality(&self) -> usize {
        self.text_points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text_points.is_empty()
    }

    pub fn text_points(&self) -> &HashSet<TextPoint> {
        &self.text_points
    }
}

/// The total fiber bundle: fibers keyed by constraint digest, plus
/// the installed expand and reduce strategies.
pub struct FiberBundle {
    fibers: HashMap<String, Fiber>,
    expand: Box<dyn ExpandStrategy>,
    reduce: Box<dyn ReduceStrategy>,
}

impl Default for FiberBundle {
    fn default() -> Self {
        Self {
            fibers: HashMap::new(),
            expand: Box::new(CanonicalExpand),
            reduce: Box::new(NullReduce),
        }
    }
}

impl FiberBundle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_fiber(&mut self, constraint: ConstraintPoint) {
        let digest = constraint.digest.clone();
        self.fibers
            .entry(digest)
            .or_insert_with(|| Fiber::new(constraint));
    }

    pub fn fiber(&self, constraint: &ConstraintPoint) -> Option<&Fiber> {
        self.fibers.get(&constraint.digest)
    }

    pub fn fiber_mut(&mut self, constraint: &ConstraintPoint) -> Option<&mut Fiber> {
        self.fibers.get_mut(&constraint.digest)
    }

    pub fn fiber_count(&self) -> usize {
        self.fibers.len()
    }

    pub fn set_expand(&mut self, strategy: impl ExpandStrategy + 'static) {
        self.expand = Box::new(strategy);
    }

    pub fn set_reduce(&mut self, strategy: impl ReduceStrategy + 'static) {
        self.reduce = Box::new(strategy);
    }

    pub fn expand(&self, constraint: &ConstraintPoint) -> NewtonResult<TextPoint> {
        self.expand.expand(constraint)
    }

    pub fn reduce(&self, text: &TextPoint) -> Option<ConstraintPoint> {
        self.reduce.reduce(text)
    }

    /// Projection with status: GROUNDED only when the text reduces to
    /// a constraint that has a registered fiber.
    pub fn project(&self, text: &TextPoint) -> (ProjectionStatus, Option<ConstraintPoint>) {
        match self.reduce(text) {
            None => (ProjectionStatus::Hallucinated, None),
            Some(constraint) => {
                if self.fiber(&constraint).is_none() {
                    (ProjectionStatus::Hallucinated, None)
                } else {
                    (ProjectionStatus::Grounded, Some(constraint))
                }
            }
        }
    }

    /// The fundamental identity: `reduce(expand(c)) == c`.
    pub fn verify_identity(&self, constraint: &ConstraintPoint) -> NewtonResult<bool> {
        let text = self.expand(constraint)?;
        Ok(self.reduce(&text).as_ref() == Some(constraint))
    }
}

/// Aggregate statistics over the bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FiberStatistics {
    pub total_constraints: usize,
    pub total_texts: usize,
    pub empty_fibers: usize,
    pub average_fiber_size: f64,
}

/// The manifold shared across the kernel. Registration and strategy
/// installation go through an interior lock so a single manifold can
/// serve concurrent evaluations behind `&self`.
pub struct ExpandReduceManifold {
    bundle: RwLock<FiberBundle>,
}

impl Default for ExpandReduceManifold {
    fn default() -> Self {
        Self {
            bundle: RwLock::new(FiberBundle::new()),
        }
    }
}

impl ExpandReduceManifold {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constraint, creating its (initially empty) fiber.
    pub fn register_constraint(&self, constraint: ConstraintPoint) {
        self.bundle.write().add_fiber(constraint);
    }

    /// Register a text as a valid phrasing of a constraint. Returns
    /// false if the constraint has no fiber yet.
    pub fn register_text(&self, text: TextPoint, constraint: &ConstraintPoint) -> bool {
        let mut bundle = self.bundle.write();
        match bundle.fiber_mut(constraint) {
            Some(fiber) => {
                fiber.add_text(text);
                true
            }
            None => false,
        }
    }

    pub fn set_expand(&self, strategy: impl ExpandStrategy + 'static) {
        self.bundle.write().set_expand(strategy);
    }

    pub fn set_reduce(&self, strategy: impl ReduceStrategy + 'static) {
        self.bundle.write().set_reduce(strategy);
    }

    pub fn expand(&self, constraint: &ConstraintPoint) -> NewtonResult<TextPoint> {
        self.bundle.read().expand(constraint)
    }

    pub fn reduce(&self, text: &TextPoint) -> Option<ConstraintPoint> {
        self.bundle.read().reduce(text)
    }

    pub fn project(&self, text: &TextPoint) -> (ProjectionStatus, Option<ConstraintPoint>) {
        self.bundle.read().project(text)
    }

    pub fn is_grounded(&self, text: &TextPoint) -> bool {
        self.project(text).0 == ProjectionStatus::Grounded
    }

    pub fn is_hallucination(&self, text: &TextPoint) -> bool {
        self.project(text).0 == ProjectionStatus::Hallucinated
    }

    /// Verify `reduce(expand(c)) == c` for a constraint.
    pub fn verify_roundtrip(&self, constraint: &ConstraintPoint) -> NewtonResult<bool> {
        self.bundle.read().verify_identity(constraint)
    }

    /// Every registered phrasing of a constraint.
    pub fn equivalent_texts(&self, constraint: &ConstraintPoint) -> HashSet<TextPoint> {
        self.bundle
            .read()
            .fiber(constraint)
            .map(|f| f.text_points().clone())
            .unwrap_or_default()
    }

    pub fn statistics(&self) -> FiberStatistics {
        let bundle = self.bundle.read();
        let total_constraints = bundle.fibers.len();
        let total_texts: usize = bundle.fibers.values().map(Fiber::cardinality).sum();
        let empty_fibers = bundle.fibers.values().filter(|f| f.is_empty()).count();
        FiberStatistics {
            total_constraints,
            total_texts,
            empty_fibers,
            average_fiber_size: if total_constraints > 0 {
                total_texts as f64 / total_constraints as f64
            } else {
                0.0
            },
        }
    }
}
