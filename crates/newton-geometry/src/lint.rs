// ─────────────────────────────────────────────────────────────────────
// Newton — Geometric Constraint Linting
// ─────────────────────────────────────────────────────────────────────
//! Human constraint verification happens geometrically before
//! semantically: the shape of a word carries cognitive load before its
//! meaning is parsed. This lint checks that constraint names align
//! their glyph geometry with their semantic intent.

use serde::Serialize;

// Glyph classification by geometric primitive.
const CLOSED_FORMS: &str = "oOQ0@abdegpq869";
const OPEN_CURVES: &str = "cCsS35(){}[]<>";
const STRAIGHT_LINES: &str = "lLiI1|_-=7/\\";
const INTERSECTIONS: &str = "xX+*tTkKfF4#";
const HOOKS_TERMINALS: &str = "fFrRjJgGyY";
const BRIDGES: &str = "nNmMhHuUwW";
const POINTS: &str = "iIjJ!?.:;";

/// Semantic categories for constraint names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticType {
    /// Must stay within bounds (quota, bound, pool).
    Containment,
    /// A then B then C (chain, when, flow).
    Sequential,
    /// Hard stop (halt, finfr, end).
    Terminal,
    /// Equality check (is, same, id).
    Identity,
    /// Branching decision (or, pick, switch).
    Choice,
    /// Lightweight check (if, when, has).
    Guard,
    /// Operation execution (run, exec, call).
    Action,
}

impl SemanticType {
    /// Recommended alternative names for this category.
    pub fn recommendations(self) -> &'static [&'static str] {
        match self {
            SemanticType::Containment => &["quota", "bound", "pool", "scope", "dome", "orbit"],
            SemanticType::Sequential => &["chain", "then", "when", "flow", "next", "through"],
            SemanticType::Terminal => &["halt", "stop", "finfr", "end", "freeze", "fail"],
            SemanticType::Identity => &["is", "same", "id", "one", "equals", "this"],
            SemanticType::Choice => &["or", "xor", "pick", "switch", "fork", "select"],
            SemanticType::Guard => &["if", "when", "has", "can", "may", "ok"],
            SemanticType::Action => &["run", "exec", "call", "do", "fire", "emit"],
        }
    }
}

/// Visual weight classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VisualDensity {
    /// 1-3 chars, lots of whitespace (i, is, if).
    Light,
    /// 4-6 chars, standard weight (when, then, check).
    Medium,
    /// 7+ chars or dense geometry (finfr, commit, transaction).
    Heavy,
}

/// Lint finding severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Geometric analysis of a word's glyph composition. Each ratio is
/// the fraction of alphabetic characters drawn with that primitive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeometricFeatures {
    pub word: String,
    pub closed_forms: f64,
    pub open_curves: f64,
    pub straight_lines: f64,
    pub intersections: f64,
    pub hooks_terminals: f64,
    pub bridges: f64,
    pub points: f64,
    pub visual_density: VisualDensity,
}

impl GeometricFeatures {
    /// The most prominent geometric feature.
    pub fn dominant_feature(&self) -> &'static str {
        let features = [
            ("closed_forms", self.closed_forms),
            ("open_curves", self.open_curves),
            ("straight_lines", self.straight_lines),
            ("intersections", self.intersections),
            ("hooks_terminals", self.hooks_terminals),
            ("bridges", self.bridges),
            ("points", self.points),
        ];
        features
            .iter()
            .fold(features[0], |best, &f| if f.1 > best.1 { f } else { best })
            .0
    }
}

/// A single lint finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LintWarning {
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
}

/// Complete lint report for one constraint name.
#[derive(Debug, Clone, Serialize)]
pub struct LintReport {
    pub name: String,
    pub semantic_type: SemanticType,
    pub features: GeometricFeatures,
    pub warnings: Vec<LintWarning>,
    pub passed: bool,
}

impl LintReport {
    pub fn has_errors(&self) -> bool {
        self.warnings.iter().any(|w| w.severity == Severity::Error)
    }

    pub fn has_warnings(&self) -> bool {
        self.warnings.iter().any(|w| w.severity == Severity::Warning)
    }
}

/// Aggregate result of linting a batch of constraint names.
#[derive(Debug, Clone, Serialize)]
pub struct BatchLintResult {
    pub reports: Vec<LintReport>,
    pub total: usize,
    pub passed: usize,
    pub warnings: usize,
    pub errors: usize,
}

/// Analyze the geometric composition of a word. Ratios are computed
/// over alphabetic characters only; density counts everything.
pub fn analyze_glyphs(word: &str) -> GeometricFeatures {
    let alpha: Vec<char> = word.chars().filter(|c| c.is_alphabetic()).collect();
    let total = alpha.len().max(1) as f64;

    let ratio = |set: &str| alpha.iter().filter(|c| set.contains(**c)).count() as f64 / total;

    let char_count = word.chars().count();
    let visual_density = if char_count <= 3 {
        VisualDensity::Light
    } else if char_count <= 6 {
        VisualDensity::Medium
    } else {
        VisualDensity::Heavy
    };

    GeometricFeatures {
        word: word.to_string(),
        closed_forms: ratio(CLOSED_FORMS),
        open_curves: ratio(OPEN_CURVES),
        straight_lines: ratio(STRAIGHT_LINES),
        intersections: ratio(INTERSECTIONS),
        hooks_terminals: ratio(HOOKS_TERMINALS),
        bridges: ratio(BRIDGES),
        points: ratio(POINTS),
        visual_density,
    }
}

fn suggest(semantic_type: SemanticType) -> Option<String> {
    let picks = &semantic_type.recommendations()[..3];
    Some(format!("Consider: {}", picks.join(", ")))
}

/// Lint one constraint name for geometric-semantic alignment. With
/// `strict` set, alignment warnings are reported as errors.
pub fn lint_constraint_name(name: &str, semantic_type: SemanticType, strict: bool) -> LintReport {
    let features = analyze_glyphs(name);
    let mut warnings = Vec::new();

    let severity = if strict { Severity::Error } else { Severity::Warning };

    match semantic_type {
        SemanticType::Containment => {
            if features.closed_forms < 0.25 {
                warnings.push(LintWarning {
                    severity,
                    message: format!(
                        "'{name}' suggests containment but lacks closed shapes (closed={:.2})",
                        features.closed_forms
                    ),
                    suggestion: suggest(semantic_type),
                });
            }
        }
        SemanticType::Terminal => {
            if features.hooks_terminals < 0.15 {
                warnings.push(LintWarning {
                    severity,
                    message: format!(
                        "'{name}' suggests termination but lacks terminal forms (hooks={:.2})",
                        features.hooks_terminals
                    ),
                    suggestion: suggest(semantic_type),
                });
            }
        }
        SemanticType::Sequential => {
            if features.bridges < 0.25 {
                warnings.push(LintWarning {
                    severity,
                    message: format!(
                        "'{name}' suggests sequence but lacks bridges (bridges={:.2})",
                        features.bridges
                    ),
                    suggestion: suggest(semantic_type),
                });
            }
        }
        SemanticType::Identity => {
            if features.straight_lines < 0.15 && features.points < 0.15 {
                warnings.push(LintWarning {
                    severity,
                    message: format!("'{name}' suggests identity but lacks linear/point forms"),
                    suggestion: suggest(semantic_type),
                });
            }
        }
        SemanticType::Choice => {
            if features.intersections < 0.15 {
                warnings.push(LintWarning {
                    severity,
                    message: format!(
                        "'{name}' suggests choice but lacks intersections (intersect={:.2})",
                        features.intersections
                    ),
                    suggestion: suggest(semantic_type),
                });
            }
        }
        SemanticType::Guard => {
            if features.visual_density == VisualDensity::Heavy {
                warnings.push(LintWarning {
                    severity: Severity::Info,
                    message: format!("'{name}' is visually heavy for a simple guard"),
                    suggestion: suggest(semantic_type),
                });
            }
        }
        SemanticType::Action => {
            if features.hooks_terminals < 0.1 && features.intersections < 0.1 {
                warnings.push(LintWarning {
                    severity: Severity::Info,
                    message: format!("'{name}' suggests action but lacks active forms"),
                    suggestion: suggest(semantic_type),
                });
            }
        }
    }

    warnings.extend(check_density_alignment(name, semantic_type, &features));
    warnings.extend(check_contradictions(name, semantic_type));

    let passed = !warnings
        .iter()
        .any(|w| matches!(w.severity, Severity::Warning | Severity::Error));

    LintReport {
        name: name.to_string(),
        semantic_type,
        features,
        warnings,
        passed,
    }
}

/// Visual density should match semantic complexity.
fn check_density_alignment(
    name: &str,
    semantic_type: SemanticType,
    features: &GeometricFeatures,
) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    if semantic_type == SemanticType::Guard && features.visual_density == VisualDensity::Heavy {
        warnings.push(LintWarning {
            severity: Severity::Warning,
            message: format!(
                "'{name}' is visually heavy ({} chars) for a guard constraint",
                name.chars().count()
            ),
            suggestion: Some("Guards should be light (1-3 chars): if, has, ok, can".to_string()),
        });
    }

    if semantic_type == SemanticType::Terminal && features.visual_density == VisualDensity::Light {
        warnings.push(LintWarning {
            severity: Severity::Info,
            message: format!("'{name}' is visually light for a terminal condition"),
            suggestion: Some(
                "Terminal conditions often benefit from more visual weight".to_string(),
            ),
        });
    }

    warnings
}

/// Known words whose shape contradicts their declared semantics.
fn check_contradictions(name: &str, semantic_type: SemanticType) -> Vec<LintWarning> {
    const CONTRADICTIONS: [(&str, SemanticType, &str); 4] = [
        ("open", SemanticType::Containment, "has closed loop in 'o'"),
        ("stop", SemanticType::Terminal, "'p' has continuation bridge"),
        ("flow", SemanticType::Sequential, "'f' has terminal hook"),
        ("close", SemanticType::Terminal, "'o' suggests openness"),
    ];

    let lower = name.to_lowercase();
    CONTRADICTIONS
        .iter()
        .filter(|(word, expected, _)| lower.contains(word) && semantic_type == *expected)
        .map(|(_, _, reason)| LintWarning {
            severity: Severity::Info,
            message: format!("Potential geometric contradiction in '{name}': {reason}"),
            suggestion: None,
        })
        .collect()
}

/// Lint a batch of constraint names.
pub fn lint_batch(constraints: &[(&str, SemanticType)], strict: bool) -> BatchLintResult {
    let reports: Vec<LintReport> = constraints
        .iter()
        .map(|&(name, semantic_type)| lint_constraint_name(name, semantic_type, strict))
        .collect();

    let passed = reports.iter().filter(|r| r.passed).count();
    let errors = reports.iter().filter(|r| r.has_errors()).count();
    let warnings = reports
        .iter()
        .filter(|r| r.has_warnings() && !r.has_errors())
        .count();

    BatchLintResult {
        total: reports.len(),
        passed,
        warnings,
        errors,
        reports,
    }
}
