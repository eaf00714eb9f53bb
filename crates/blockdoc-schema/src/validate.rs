//! # Recursive Validation
//!
//! Checks an untrusted `serde_json::Value` against a root schema of a
//! [`CompiledSchemaSet`] and reports *every* independently detectable
//! violation, not just the first.
//!
//! ## Per-node order
//!
//! 1. Depth guard.
//! 2. The node must be an object.
//! 3. The `type` discriminant selects a member of the target union. Members
//!    are tried in declared order and the first match is committed. A node
//!    whose discriminant fails is not descended into.
//! 4. Top-level fields, then `data` fields, then undeclared keys of closed
//!    variants.
//! 5. Each entry of `children`, against the variant's child union.
//!
//! The walk keeps a path stack and a violation accumulator; nothing else
//! is mutable, so a compiled set can be shared by any number of concurrent
//! validations.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::compiled::{
    CompiledField, CompiledSchemaSet, CompiledType, CompiledVariant, Discriminant,
    DiscriminantRead, SchemaId,
};
use crate::error::ValidationError;
use crate::violation::{render_path, PathSegment, Violation, ViolationKind, Violations};

/// Default bound on block nesting.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Per-call validation settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOptions {
    /// Deepest block nesting accepted; the root block is depth 0.
    pub max_depth: usize,
}

impl Default for ValidationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Validate `value` against the schema named `root` with default options.
///
/// # Errors
///
/// `ValidationError::Rejected` with every violation found, or
/// `ValidationError::Schema` if `root` does not name a schema of `set`.
pub fn validate(set: &CompiledSchemaSet, root: &str, value: &Value) -> Result<(), ValidationError> {
    validate_with(set, root, value, &ValidationOptions::default())
}

/// Validate `value` against the schema named `root`.
pub fn validate_with(
    set: &CompiledSchemaSet,
    root: &str,
    value: &Value,
    options: &ValidationOptions,
) -> Result<(), ValidationError> {
    let target = set.resolve(root)?;
    let mut walker = Walker {
        set,
        max_depth: options.max_depth,
        path: Vec::new(),
        violations: Vec::new(),
    };
    walker.block(value, target, Position::Root, 0);

    if walker.violations.is_empty() {
        return Ok(());
    }
    tracing::trace!(
        version = %set.version(),
        root,
        violations = walker.violations.len(),
        "block tree rejected"
    );
    Err(ValidationError::Rejected {
        version: set.version(),
        root: root.to_string(),
        violations: Violations::new(walker.violations),
    })
}

impl CompiledSchemaSet {
    /// Validate `value` against `root` in this set with default options.
    pub fn validate(&self, root: &str, value: &Value) -> Result<(), ValidationError> {
        validate(self, root, value)
    }

    /// Validate `value` against `root` in this set.
    pub fn validate_with(
        &self,
        root: &str,
        value: &Value,
        options: &ValidationOptions,
    ) -> Result<(), ValidationError> {
        validate_with(self, root, value, options)
    }
}

/// Where a block sits, which decides how a known-but-disallowed
/// discriminant is classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Root,
    Child,
}

struct Walker<'a> {
    set: &'a CompiledSchemaSet,
    max_depth: usize,
    path: Vec<PathSegment<'a>>,
    violations: Vec<Violation>,
}

impl<'a> Walker<'a> {
    fn report(&mut self, kind: ViolationKind, expected: impl Into<String>) {
        self.violations.push(Violation {
            path: render_path(&self.path),
            expected: expected.into(),
            kind,
        });
    }

    fn report_at(&mut self, key: &'a str, kind: ViolationKind, expected: impl Into<String>) {
        self.path.push(PathSegment::Key(key));
        self.report(kind, expected);
        self.path.pop();
    }

    fn block(&mut self, value: &'a Value, target: SchemaId, position: Position, depth: usize) {
        if depth > self.max_depth {
            self.report(
                ViolationKind::DepthExceeded,
                format!("nesting depth at most {}", self.max_depth),
            );
            return;
        }
        let Value::Object(map) = value else {
            self.report(ViolationKind::WrongFieldType, "block object");
            return;
        };
        let Some(variant) = self.select(map, target, position) else {
            return;
        };

        self.fields(map, &variant.fields, depth);
        if let Some(data_fields) = &variant.data {
            self.data(map, variant, data_fields, depth);
        }
        if variant.closed {
            self.undeclared(map, variant);
        }
        if let Some(children) = variant.children {
            self.children(map, children.target, children.resolvable, depth);
        }
    }

    fn select(
        &mut self,
        map: &'a Map<String, Value>,
        target: SchemaId,
        position: Position,
    ) -> Option<&'a CompiledVariant> {
        let set = self.set;
        let discriminant = match Discriminant::read(map) {
            DiscriminantRead::Present(d) => d,
            DiscriminantRead::Missing => {
                self.report_at("type", ViolationKind::MissingRequiredField, "block type");
                return None;
            }
            DiscriminantRead::Malformed => {
                self.report_at("type", ViolationKind::WrongFieldType, "block type tag or code");
                return None;
            }
        };
        if let Some(id) = set.select(target, &discriminant) {
            return set.variant(id);
        }
        let known = set.variant_for_discriminant(&discriminant).is_some();
        let kind = match position {
            Position::Child if known => ViolationKind::ChildUnionMismatch,
            _ => ViolationKind::UnknownDiscriminant,
        };
        self.report(kind, set.name(target));
        None
    }

    fn fields(&mut self, map: &'a Map<String, Value>, fields: &'a [CompiledField], depth: usize) {
        for field in fields {
            self.path.push(PathSegment::Key(&field.name));
            match map.get(&field.name) {
                Some(value) => self.value(value, &field.ty, depth),
                None if field.required => {
                    let expected = self.set.describe_type(&field.ty);
                    self.report(ViolationKind::MissingRequiredField, expected);
                }
                None => {}
            }
            self.path.pop();
        }
    }

    fn data(
        &mut self,
        map: &'a Map<String, Value>,
        variant: &'a CompiledVariant,
        fields: &'a [CompiledField],
        depth: usize,
    ) {
        self.path.push(PathSegment::Key("data"));
        match map.get("data") {
            Some(Value::Object(data)) => {
                self.fields(data, fields, depth);
                if variant.closed {
                    let allowed = fields.iter().map(|f| f.name.as_str());
                    self.reject_extra(data, allowed.collect());
                }
            }
            Some(_) => self.report(ViolationKind::WrongFieldType, "data object"),
            None => self.report(ViolationKind::MissingRequiredField, "data object"),
        }
        self.path.pop();
    }

    fn undeclared(&mut self, map: &'a Map<String, Value>, variant: &'a CompiledVariant) {
        let mut allowed = vec!["type"];
        allowed.extend(variant.fields.iter().map(|f| f.name.as_str()));
        if variant.data.is_some() {
            allowed.push("data");
        }
        if variant.children.is_some() {
            allowed.push("children");
        }
        self.reject_extra(map, allowed);
    }

    fn reject_extra(&mut self, map: &'a Map<String, Value>, allowed: Vec<&str>) {
        for key in map.keys() {
            if !allowed.contains(&key.as_str()) {
                self.report_at(
                    key,
                    ViolationKind::UnexpectedField,
                    format!("one of: {}", allowed.join(", ")),
                );
            }
        }
    }

    fn children(
        &mut self,
        map: &'a Map<String, Value>,
        target: SchemaId,
        resolvable: bool,
        depth: usize,
    ) {
        self.path.push(PathSegment::Key("children"));
        match map.get("children") {
            Some(Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(i));
                    match item {
                        Value::String(_) if resolvable => {}
                        Value::Array(ids) if resolvable => self.identifiers(ids),
                        _ => self.block(item, target, Position::Child, depth + 1),
                    }
                    self.path.pop();
                }
            }
            Some(_) => {
                let expected = format!("list of {} blocks", self.set.name(target));
                self.report(ViolationKind::WrongFieldType, expected);
            }
            None => {
                let expected = format!("list of {} blocks", self.set.name(target));
                self.report(ViolationKind::MissingRequiredField, expected);
            }
        }
        self.path.pop();
    }

    fn identifiers(&mut self, ids: &'a [Value]) {
        for (j, id) in ids.iter().enumerate() {
            if !id.is_string() {
                self.path.push(PathSegment::Index(j));
                self.report(ViolationKind::WrongFieldType, "identifier");
                self.path.pop();
            }
        }
    }

    fn value(&mut self, value: &'a Value, ty: &'a CompiledType, depth: usize) {
        let ok = match (ty, value) {
            (CompiledType::String, Value::String(_)) => true,
            (CompiledType::Number, Value::Number(_)) => true,
            (CompiledType::Boolean, Value::Bool(_)) => true,
            (CompiledType::List(inner), Value::Array(items)) => {
                for (i, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(i));
                    self.value(item, inner, depth);
                    self.path.pop();
                }
                true
            }
            (CompiledType::Block(target), _) => {
                self.block(value, *target, Position::Child, depth + 1);
                true
            }
            _ => false,
        };
        if !ok {
            let expected = self.set.describe_type(ty);
            self.report(ViolationKind::WrongFieldType, expected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::compile_schemas;
    use blockdoc_core::TaxonomyVersion;
    use serde_json::json;

    fn v4() -> CompiledSchemaSet {
        compile_schemas(TaxonomyVersion::V4).unwrap()
    }

    fn text(content: &str) -> Value {
        json!({
            "type": "Text",
            "data": {
                "bold": false, "italic": false, "underline": false, "strikethrough": false,
                "content": content
            }
        })
    }

    fn rejected(result: Result<(), ValidationError>) -> Vec<Violation> {
        match result {
            Err(ValidationError::Rejected { violations, .. }) => violations.into_inner(),
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[test]
    fn test_heading_accepted() {
        let heading = json!({"type": "Heading", "data": {"content": "Hi", "size": 1}});
        assert!(v4().validate("heading", &heading).is_ok());
        assert!(v4().validate("any", &heading).is_ok());
    }

    #[test]
    fn test_heading_missing_size() {
        let heading = json!({"type": "Heading", "data": {"content": "Hi"}});
        let violations = rejected(v4().validate("any", &heading));
        assert_eq!(
            violations,
            vec![Violation {
                path: "data.size".to_string(),
                expected: "number".to_string(),
                kind: ViolationKind::MissingRequiredField,
            }]
        );
    }

    #[test]
    fn test_list_containing_heading() {
        let list = json!({
            "type": "List",
            "data": {"ordered": false},
            "children": [{"type": "Heading", "data": {"content": "Hi", "size": 1}}]
        });
        let violations = rejected(v4().validate("any", &list));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "children[0]");
        assert_eq!(violations[0].kind, ViolationKind::ChildUnionMismatch);
        assert_eq!(violations[0].expected, "inline");
    }

    #[test]
    fn test_unknown_tag_is_unknown_discriminant() {
        let violations = rejected(v4().validate("any", &json!({"type": "Alert"})));
        assert_eq!(violations[0].kind, ViolationKind::UnknownDiscriminant);
        assert_eq!(violations[0].path, "");
    }

    #[test]
    fn test_known_tag_outside_root_union() {
        let paragraph = json!({"type": "Paragraph", "children": []});
        let violations = rejected(v4().validate("inline", &paragraph));
        assert_eq!(violations[0].kind, ViolationKind::UnknownDiscriminant);
        assert_eq!(violations[0].expected, "inline");
    }

    #[test]
    fn test_missing_and_malformed_type() {
        let violations = rejected(v4().validate("any", &json!({"data": {}})));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "type");
        assert_eq!(violations[0].kind, ViolationKind::MissingRequiredField);

        let violations = rejected(v4().validate("any", &json!({"type": true})));
        assert_eq!(violations[0].kind, ViolationKind::WrongFieldType);
    }

    #[test]
    fn test_integral_float_code_selects_variant() {
        let heading = json!({"type": 5.0, "data": {"content": "Hi", "size": 1}});
        assert!(v4().validate("any", &heading).is_ok());

        let violations = rejected(v4().validate("any", &json!({"type": 5.5, "data": {}})));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "type");
        assert_eq!(violations[0].kind, ViolationKind::WrongFieldType);
    }

    #[test]
    fn test_non_object_root() {
        let violations = rejected(v4().validate("any", &json!("Heading")));
        assert_eq!(violations[0].kind, ViolationKind::WrongFieldType);
        assert_eq!(violations[0].expected, "block object");
    }

    #[test]
    fn test_missing_data_is_one_violation() {
        let violations = rejected(v4().validate("any", &json!({"type": "Image"})));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "data");
    }

    #[test]
    fn test_null_field_is_wrong_type() {
        let heading = json!({"type": "Heading", "data": {"content": null, "size": 1}});
        let violations = rejected(v4().validate("any", &heading));
        assert_eq!(violations[0].path, "data.content");
        assert_eq!(violations[0].kind, ViolationKind::WrongFieldType);
    }

    #[test]
    fn test_extra_keys_tolerated_unless_closed() {
        let heading = json!({"type": "Heading", "note": 1, "data": {"content": "Hi", "size": 1, "x": 2}});
        assert!(v4().validate("any", &heading).is_ok());

        let reference = json!({"type": "Ref", "note": 1, "data": {"id": "r1", "x": 2}});
        let violations = rejected(v4().validate("any", &reference));
        let paths: Vec<&str> = violations.iter().map(|v| v.path.as_str()).collect();
        assert_eq!(paths, vec!["data.x", "note"]);
        assert!(violations.iter().all(|v| v.kind == ViolationKind::UnexpectedField));
    }

    #[test]
    fn test_table_cells_validated() {
        let table = json!({
            "type": "Table",
            "data": {
                "columns": [text("a")],
                "rows": [[text("b"), {"type": "Image", "data": {"src": "x", "width": 1, "height": 1}}]]
            }
        });
        let violations = rejected(v4().validate("any", &table));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "data.rows[0][1]");
        assert_eq!(violations[0].kind, ViolationKind::ChildUnionMismatch);
    }

    #[test]
    fn test_resolvable_children() {
        let root = json!({
            "type": "Root",
            "id": "r",
            "children": ["b1", ["b2", "b3"], text("inline"), ["b4", 5]]
        });
        let violations = rejected(v4().validate("any", &root));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "children[3][1]");
        assert_eq!(violations[0].expected, "identifier");
    }

    #[test]
    fn test_identifiers_not_accepted_before_v4() {
        let set = compile_schemas(TaxonomyVersion::V3).unwrap();
        let group = json!({"type": "Group", "children": ["b1"]});
        let violations = rejected(set.validate("group", &group));
        assert_eq!(violations[0].path, "children[0]");
        assert_eq!(violations[0].kind, ViolationKind::WrongFieldType);
    }

    #[test]
    fn test_children_not_an_array() {
        let paragraph = json!({"type": "Paragraph", "children": {"0": "b1"}});
        let violations = rejected(v4().validate("any", &paragraph));
        assert_eq!(violations[0].path, "children");
        assert_eq!(violations[0].expected, "list of inline blocks");
    }

    #[test]
    fn test_depth_guard() {
        let mut tree = text("leaf");
        for _ in 0..4 {
            tree = json!({"type": "Group", "children": [tree]});
        }
        let options = ValidationOptions { max_depth: 2 };
        let violations = rejected(v4().validate_with("any", &tree, &options));
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].kind, ViolationKind::DepthExceeded);
        assert_eq!(violations[0].path, "children[0].children[0].children[0]");

        assert!(v4().validate("any", &tree).is_ok());
    }

    #[test]
    fn test_unknown_root_is_caller_error() {
        let err = v4().validate("document", &json!({})).unwrap_err();
        assert!(matches!(err, ValidationError::Schema(_)));
        assert!(err.violations().is_none());
    }
}
