//! Structural and lexical checks.
//!
//! The checker walks the raw tree once, recording a finding for every
//! problem and building the typed pieces of a [`Document`] as it goes. It
//! never stops early: a single run reports everything wrong with the input.

use dstk_schema::{
    LengthUnit, Node, TokenPath, TokenType, TokenValue, NON_TOKEN_SECTIONS, REQUIRED_META_FIELDS,
    REQUIRED_SECTIONS,
};

use crate::document::{Component, Document, Meta, PropertyValue, Token, TokenTree};
use crate::finding::Finding;
use crate::references;

/// What a section requires of the entries it holds.
struct Expectation {
    types: &'static [TokenType],
    px_only: bool,
}

const COLOR: Expectation = Expectation {
    types: &[TokenType::Color],
    px_only: false,
};
const PX_DIMENSION: Expectation = Expectation {
    types: &[TokenType::Dimension],
    px_only: true,
};
const DIMENSION: Expectation = Expectation {
    types: &[TokenType::Dimension],
    px_only: false,
};
const SHADOW: Expectation = Expectation {
    types: &[TokenType::Shadow],
    px_only: false,
};
const FONT_WEIGHT: Expectation = Expectation {
    types: &[TokenType::FontWeight],
    px_only: false,
};
const LINE_HEIGHT: Expectation = Expectation {
    types: &[TokenType::Number, TokenType::Dimension],
    px_only: false,
};
const FONT_SOURCE: Expectation = Expectation {
    types: &[TokenType::FontSource],
    px_only: false,
};
const FONT_FAMILY: Expectation = Expectation {
    types: &[TokenType::FontFamily],
    px_only: false,
};

/// Entry expectations by position, e.g. everything under `spacing` is a px dimension.
fn expectation(path: &TokenPath) -> Option<&'static Expectation> {
    let segments = path.segments();
    let section = segments.first()?.as_str();
    let key = segments.get(1)?.as_str();
    match (section, segments.len()) {
        ("color", 2) => Some(&COLOR),
        ("spacing" | "borderRadius", 2) => Some(&PX_DIMENSION),
        ("shadow", 2) => Some(&SHADOW),
        ("typography", 2) if key.starts_with("font-family") => Some(&FONT_FAMILY),
        ("typography", 3) => match key {
            "font-size" => Some(&PX_DIMENSION),
            "font-weight" => Some(&FONT_WEIGHT),
            "line-height" => Some(&LINE_HEIGHT),
            "letter-spacing" => Some(&DIMENSION),
            "font-source" => Some(&FONT_SOURCE),
            _ => None,
        },
        _ => None,
    }
}

fn describe(types: &[TokenType]) -> String {
    types
        .iter()
        .map(|t| format!("'{t}'"))
        .collect::<Vec<_>>()
        .join(" or ")
}

#[derive(Default)]
pub(crate) struct Checker {
    findings: Vec<Finding>,
}

impl Checker {
    /// Check `root`, returning the document when nothing was found.
    pub(crate) fn run(root: &Node) -> (Option<Document>, Vec<Finding>) {
        let mut checker = Checker::default();
        let parts = checker.check_root(root);
        let document = match parts {
            Some((meta, tokens, components)) if checker.findings.is_empty() => {
                Some(Document::new(meta, tokens, components))
            }
            _ => None,
        };
        (document, checker.findings)
    }

    fn error(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.findings.push(Finding::error(path, message));
    }

    fn warning(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.findings.push(Finding::warning(path, message));
    }

    fn check_duplicates(&mut self, path: &TokenPath, node: &Node) {
        for key in node.duplicate_keys() {
            self.warning(
                path.child(key).to_string(),
                format!("duplicate key '{key}'; only the last occurrence is used"),
            );
        }
    }

    fn check_root(&mut self, root: &Node) -> Option<(Meta, TokenTree, Vec<Component>)> {
        if !root.is_object() {
            self.error("", format!("document root must be a JSON object, found {}", root.kind()));
            return None;
        }
        self.check_duplicates(&TokenPath::new(Vec::new()), root);

        for section in REQUIRED_SECTIONS {
            if root.get(section).is_none() {
                self.error(*section, "missing required section");
            }
        }

        let meta = root.get("meta").and_then(|node| self.check_meta(node));

        let mut sections = Vec::new();
        for (key, node) in root.members() {
            if NON_TOKEN_SECTIONS.contains(&key) {
                continue;
            }
            if !node.is_object() {
                self.error(key, format!("section must be an object, found {}", node.kind()));
                continue;
            }
            let path = TokenPath::new(vec![key.to_string()]);
            sections.push((key.to_string(), TokenTree::Group(self.check_group(&path, node))));
        }

        let components = match root.get("components") {
            Some(node) => self.check_components(node),
            None => Vec::new(),
        };

        self.findings.extend(references::check(root, &components));

        Some((meta?, TokenTree::Group(sections), components))
    }

    fn check_meta(&mut self, node: &Node) -> Option<Meta> {
        if !node.is_object() {
            self.error("meta", format!("section must be an object, found {}", node.kind()));
            return None;
        }
        self.check_duplicates(&TokenPath::parse("meta"), node);

        let mut fields = Vec::with_capacity(REQUIRED_META_FIELDS.len());
        for field in REQUIRED_META_FIELDS {
            let path = format!("meta.{field}");
            match node.get(field) {
                None => self.error(path, "missing required meta field"),
                Some(Node::String(value)) => fields.push(value.clone()),
                Some(other) => self.error(path, format!("meta field must be a string, found {}", other.kind())),
            }
        }
        match fields.as_slice() {
            [name, source, version, generated] => Some(Meta {
                name: name.clone(),
                source: source.clone(),
                version: version.clone(),
                generated: generated.clone(),
            }),
            _ => None,
        }
    }

    fn check_group(&mut self, path: &TokenPath, node: &Node) -> Vec<(String, TokenTree)> {
        self.check_duplicates(path, node);
        let mut entries = Vec::new();
        for (key, child) in node.members() {
            let child_path = path.child(key);
            match child {
                Node::Object(_) if child.is_entry() => {
                    if let Some(token) = self.check_entry(&child_path, child) {
                        entries.push((key.to_string(), TokenTree::Token(token)));
                    }
                }
                Node::Object(_) => {
                    let group = self.check_group(&child_path, child);
                    entries.push((key.to_string(), TokenTree::Group(group)));
                }
                other => self.error(
                    child_path.to_string(),
                    format!("expected a token entry or group object, found {}", other.kind()),
                ),
            }
        }
        entries
    }

    fn check_entry(&mut self, path: &TokenPath, node: &Node) -> Option<Token> {
        let at = path.to_string();
        self.check_duplicates(path, node);

        let raw = match node.get("value") {
            None => {
                self.error(at.clone(), "missing 'value'");
                None
            }
            Some(Node::String(value)) => Some(value.as_str()),
            Some(other) => {
                self.error(at.clone(), format!("'value' must be a string, found {}", other.kind()));
                None
            }
        };

        let ty = match node.get("type") {
            None => {
                self.error(at.clone(), "missing 'type'");
                None
            }
            Some(Node::String(name)) => match name.parse::<TokenType>() {
                Ok(ty) => Some(ty),
                Err(e) => {
                    self.error(at.clone(), e.to_string());
                    None
                }
            },
            Some(other) => {
                self.error(at.clone(), format!("'type' must be a string, found {}", other.kind()));
                None
            }
        };

        let description = match node.get("description") {
            None => None,
            Some(Node::String(text)) => Some(text.clone()),
            Some(other) => {
                self.warning(at.clone(), format!("'description' must be a string, found {}", other.kind()));
                None
            }
        };

        let (raw, ty) = (raw?, ty?);
        let value = match TokenValue::parse(ty, raw) {
            Ok(value) => value,
            Err(e) => {
                self.error(at, e.to_string());
                return None;
            }
        };

        if let Some(expected) = expectation(path) {
            if !expected.types.contains(&ty) {
                self.warning(
                    at.clone(),
                    format!("expected a {} token here, found '{ty}'", describe(expected.types)),
                );
            } else if let TokenValue::Dimension(d) = &value {
                if expected.px_only && d.unit != LengthUnit::Px {
                    self.warning(at.clone(), format!("value '{raw}' should be in px"));
                }
            }
        }

        Some(Token { value, description })
    }

    fn check_components(&mut self, node: &Node) -> Vec<Component> {
        if !node.is_object() {
            self.error("components", format!("section must be an object, found {}", node.kind()));
            return Vec::new();
        }
        let base = TokenPath::parse("components");
        self.check_duplicates(&base, node);

        let mut components = Vec::new();
        for (name, props) in node.members() {
            let path = base.child(name);
            if !props.is_object() {
                self.error(
                    path.to_string(),
                    format!("component must be an object of style properties, found {}", props.kind()),
                );
                continue;
            }
            self.check_duplicates(&path, props);

            let mut properties = Vec::new();
            for (prop, value) in props.members() {
                let raw = match value {
                    Node::String(text) => text.clone(),
                    Node::Number(n) => n.to_string(),
                    other => {
                        self.error(
                            path.child(prop).to_string(),
                            format!("property value must be a string or number, found {}", other.kind()),
                        );
                        continue;
                    }
                };
                properties.push((prop.to_string(), PropertyValue::parse(&raw)));
            }
            components.push(Component {
                name: name.to_string(),
                properties,
            });
        }
        components
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;
    use pretty_assertions::assert_eq;

    fn findings(source: &str) -> Vec<Finding> {
        Checker::run(&Node::parse(source).unwrap()).1
    }

    fn messages(source: &str) -> Vec<String> {
        findings(source).iter().map(|f| f.to_string()).collect()
    }

    const META: &str = r#""meta": {"name": "N", "source": "S", "version": "1.0.0", "generated": "2026-01-01"}"#;

    fn with_sections(extra: &str) -> String {
        format!(
            r#"{{{META}, "color": {{}}, "typography": {{}}, "spacing": {{}}, "borderRadius": {{}}, "shadow": {{}}{extra}}}"#
        )
    }

    // =========================================================================
    // Document shape
    // =========================================================================

    #[test]
    fn test_minimal_document_is_clean() {
        let (doc, found) = Checker::run(&Node::parse(&with_sections("")).unwrap());
        assert!(found.is_empty(), "{found:?}");
        assert!(doc.is_some());
    }

    #[test]
    fn test_root_must_be_object() {
        assert_eq!(
            messages("[]"),
            vec!["error: document root must be a JSON object, found array"]
        );
    }

    #[test]
    fn test_every_missing_section_reported() {
        let found = findings("{}");
        let paths: Vec<&str> = found.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["meta", "color", "typography", "spacing", "borderRadius", "shadow"]
        );
        assert!(found.iter().all(|f| f.severity == Severity::Error));
    }

    #[test]
    fn test_missing_meta_fields() {
        let source = r#"{"meta": {"name": "N", "version": 1}, "color": {}, "typography": {}, "spacing": {}, "borderRadius": {}, "shadow": {}}"#;
        assert_eq!(
            messages(source),
            vec![
                "error: meta.source: missing required meta field",
                "error: meta.version: meta field must be a string, found number",
                "error: meta.generated: missing required meta field",
            ]
        );
    }

    #[test]
    fn test_section_must_be_object() {
        let source = with_sections("").replace(r#""spacing": {}"#, r#""spacing": [4, 8]"#);
        assert_eq!(messages(&source), vec!["error: spacing: section must be an object, found array"]);
    }

    // =========================================================================
    // Entries
    // =========================================================================

    #[test]
    fn test_invalid_color_value() {
        let source = with_sections("").replace(
            r#""color": {}"#,
            r##""color": {"primary": {"value": "#FFF", "type": "color"}}"##,
        );
        assert_eq!(
            messages(&source),
            vec!["error: color.primary: value '#FFF' is not a 6-digit hex color (#RRGGBB)"]
        );
    }

    #[test]
    fn test_value_must_be_string_and_type_required() {
        let source = with_sections("").replace(r#""color": {}"#, r#""color": {"primary": {"value": 5}}"#);
        assert_eq!(
            messages(&source),
            vec![
                "error: color.primary: 'value' must be a string, found number",
                "error: color.primary: missing 'type'",
            ]
        );
    }

    #[test]
    fn test_unknown_type() {
        let source = with_sections("").replace(
            r#""color": {}"#,
            r#""color": {"brand": {"value": "linear-gradient(red, blue)", "type": "gradient"}}"#,
        );
        let found = findings(&source);
        assert_eq!(found.len(), 1);
        assert!(found[0].message.starts_with("unknown token type 'gradient'"));
    }

    #[test]
    fn test_unsupported_font_weight() {
        let source = with_sections("").replace(
            r#""typography": {}"#,
            r#""typography": {"font-weight": {"light": {"value": "300", "type": "fontWeight"}}}"#,
        );
        assert_eq!(
            messages(&source),
            vec!["error: typography.font-weight.light: value '300' is not a supported font weight (400, 500, 600, 700)"]
        );
    }

    #[test]
    fn test_section_expectation_mismatch() {
        let source = with_sections("").replace(
            r#""spacing": {}"#,
            r#""spacing": {"4": {"value": "1em", "type": "dimension"}, "8": {"value": "2", "type": "number"}}"#,
        );
        assert_eq!(
            messages(&source),
            vec![
                "warning: spacing.4: value '1em' should be in px",
                "warning: spacing.8: expected a 'dimension' token here, found 'number'",
            ]
        );
    }

    #[test]
    fn test_line_height_accepts_number_or_dimension() {
        let source = with_sections("").replace(
            r#""typography": {}"#,
            r#""typography": {"line-height": {"tight": {"value": "1.25", "type": "number"}, "loose": {"value": "28px", "type": "dimension"}}}"#,
        );
        assert!(findings(&source).is_empty());
    }

    #[test]
    fn test_non_object_entry() {
        let source = with_sections("").replace(r#""color": {}"#, r##""color": {"primary": "#2563EB"}"##);
        assert_eq!(
            messages(&source),
            vec!["error: color.primary: expected a token entry or group object, found string"]
        );
    }

    #[test]
    fn test_duplicate_keys_reported() {
        let source = with_sections("").replace(
            r#""spacing": {}"#,
            r#""spacing": {"4": {"value": "16px", "type": "dimension"}, "4": {"value": "15px", "type": "dimension"}}"#,
        );
        assert_eq!(
            messages(&source),
            vec!["warning: spacing.4: duplicate key '4'; only the last occurrence is used"]
        );
    }

    // =========================================================================
    // Components
    // =========================================================================

    #[test]
    fn test_component_shapes() {
        let source = with_sections(r#", "components": {"card": "nope", "chip": {"padding": "4px", "flags": [1]}}"#);
        assert_eq!(
            messages(&source),
            vec![
                "error: components.card: component must be an object of style properties, found string",
                "error: components.chip.flags: property value must be a string or number, found array",
            ]
        );
    }

    #[test]
    fn test_numeric_component_property_is_literal() {
        let source = with_sections(r#", "components": {"chip": {"opacity": 0.5}}"#);
        let (doc, found) = Checker::run(&Node::parse(&source).unwrap());
        assert!(found.is_empty());
        let doc = doc.unwrap();
        assert_eq!(doc.components()[0].properties[0].1.raw(), "0.5");
    }
}
