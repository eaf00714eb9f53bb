//! # Violation Records
//!
//! One record per independently detectable mismatch, suitable for direct
//! surfacing in an API error body:
//!
//! ```json
//! {"path": "children[0]", "expected": "inline", "kind": "child_union_mismatch"}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Machine-readable class of a violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// The `type` tag matches no variant of the target.
    UnknownDiscriminant,
    /// A required field (or `type`, `data`, `children`) is absent.
    MissingRequiredField,
    /// A field holds a value of the wrong primitive type.
    WrongFieldType,
    /// A nested block is a known variant outside the slot's union.
    ChildUnionMismatch,
    /// A closed shape carries an undeclared key.
    UnexpectedField,
    /// The tree is nested deeper than the configured limit.
    DepthExceeded,
}

impl ViolationKind {
    /// The snake_case identifier, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnknownDiscriminant => "unknown_discriminant",
            Self::MissingRequiredField => "missing_required_field",
            Self::WrongFieldType => "wrong_field_type",
            Self::ChildUnionMismatch => "child_union_mismatch",
            Self::UnexpectedField => "unexpected_field",
            Self::DepthExceeded => "depth_exceeded",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single validation violation with structured context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Dotted/indexed path to the offending value (`children[2].data.content`).
    /// Empty for the root.
    pub path: String,
    /// Human-readable description of what was expected there.
    pub expected: String,
    /// Machine-readable class.
    pub kind: ViolationKind,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = if self.path.is_empty() { "(root)" } else { &self.path };
        write!(f, "  {path}: {} (expected {})", self.kind, self.expected)
    }
}

/// Collection of validation violations, in discovery order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Violations {
    violations: Vec<Violation>,
}

impl Violations {
    pub(crate) fn new(violations: Vec<Violation>) -> Self {
        Self { violations }
    }

    /// Number of violations found.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Always false for the violations of a rejected tree.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// The violations, in discovery order.
    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    /// Take ownership of the records.
    pub fn into_inner(self) -> Vec<Violation> {
        self.violations
    }
}

/// One record per line.
impl fmt::Display for Violations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut records = self.violations.iter();
        if let Some(first) = records.next() {
            write!(f, "{first}")?;
        }
        records.try_for_each(|v| write!(f, "\n{v}"))
    }
}

/// One step of a path into a candidate value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PathSegment<'a> {
    Key(&'a str),
    Index(usize),
}

/// Render a path stack as `children[2].data.content`.
pub(crate) fn render_path(segments: &[PathSegment<'_>]) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            PathSegment::Key(key) => {
                if !out.is_empty() {
                    out.push('.');
                }
                out.push_str(key);
            }
            PathSegment::Index(i) => {
                out.push('[');
                out.push_str(&i.to_string());
                out.push(']');
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_path() {
        let path = [
            PathSegment::Key("children"),
            PathSegment::Index(2),
            PathSegment::Key("data"),
            PathSegment::Key("content"),
        ];
        assert_eq!(render_path(&path), "children[2].data.content");
        assert_eq!(render_path(&[]), "");
        assert_eq!(
            render_path(&[PathSegment::Key("rows"), PathSegment::Index(0), PathSegment::Index(3)]),
            "rows[0][3]"
        );
    }

    #[test]
    fn test_violation_display_format() {
        let v = Violation {
            path: "data.size".to_string(),
            expected: "number".to_string(),
            kind: ViolationKind::MissingRequiredField,
        };
        let display = v.to_string();
        assert!(display.contains("data.size"));
        assert!(display.contains("missing_required_field"));
    }

    #[test]
    fn test_violation_display_root() {
        let v = Violation {
            path: String::new(),
            expected: "any".to_string(),
            kind: ViolationKind::UnknownDiscriminant,
        };
        assert!(v.to_string().contains("(root)"));
    }

    #[test]
    fn test_violations_display_one_per_line() {
        let record = |path: &str| Violation {
            path: path.to_string(),
            expected: "number".to_string(),
            kind: ViolationKind::WrongFieldType,
        };
        let all = Violations::new(vec![record("data.width"), record("data.height")]);
        let display = all.to_string();
        assert_eq!(display.lines().count(), 2);
        assert!(!display.ends_with('\n'));
        assert_eq!(Violations::default().to_string(), "");
    }

    #[test]
    fn test_serialized_record_shape() {
        let v = Violation {
            path: "children[0]".to_string(),
            expected: "inline".to_string(),
            kind: ViolationKind::ChildUnionMismatch,
        };
        let json = serde_json::to_value(Violations::new(vec![v])).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"path": "children[0]", "expected": "inline", "kind": "child_union_mismatch"}
            ])
        );
    }
}
