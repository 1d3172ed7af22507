//! Reference integrity for the `components` section.
//!
//! Every `{path}` inside a component property must resolve to a token entry
//! or to another component property. References between component
//! properties form a graph that must be acyclic, and a property whose whole
//! value is one reference must point at a token of a compatible type.

use std::collections::{BTreeMap, BTreeSet};

use dstk_schema::{walk, Node, Reference, TokenType};

use crate::document::Component;
use crate::finding::Finding;

/// What a reference reached in the raw tree.
enum Target<'a> {
    Entry(&'a Node),
    /// A component property, keyed as `component.property`.
    Property(String),
}

/// Token types a style property accepts, by property name.
pub(crate) fn expected_types(property: &str) -> Option<&'static [TokenType]> {
    const COLOR: &[TokenType] = &[TokenType::Color];
    const DIMENSION: &[TokenType] = &[TokenType::Dimension];

    let p = property.to_ascii_lowercase();
    if p.contains("shadow") {
        Some(&[TokenType::Shadow])
    } else if p.contains("radius") {
        Some(DIMENSION)
    } else if p == "font-weight" {
        Some(&[TokenType::FontWeight])
    } else if p == "font-family" {
        Some(&[TokenType::FontFamily])
    } else if p == "line-height" {
        Some(&[TokenType::Number, TokenType::Dimension])
    } else if p == "font-size" || p == "letter-spacing" {
        Some(DIMENSION)
    } else if p.contains("color")
        || p.starts_with("background")
        || p.ends_with("-background")
        || p == "focus-border"
        || p == "fill"
        || p == "stroke"
    {
        Some(COLOR)
    } else if ["padding", "margin", "gap", "width", "height", "min-", "max-", "inset", "top", "right", "bottom", "left"]
        .iter()
        .any(|prefix| p.starts_with(prefix))
    {
        Some(DIMENSION)
    } else {
        None
    }
}

fn resolve<'a>(root: &'a Node, reference: &Reference) -> Result<Target<'a>, String> {
    let segments = reference.path.segments();
    let raw = &reference.raw;
    match segments.first().map(String::as_str) {
        Some("meta") => return Err(format!("reference '{raw}' points into meta, which holds no tokens")),
        Some("components") if segments.len() < 3 => {
            return Err(format!("reference '{raw}' must name a component property"));
        }
        _ => {}
    }

    let Some((node, canonical)) = walk(root, segments) else {
        return Err(unresolved_message(root, reference));
    };

    if canonical.first() == Some("components") {
        return match node {
            Node::String(_) | Node::Number(_) if canonical.len() == 3 => {
                Ok(Target::Property(canonical.segments()[1..].join(".")))
            }
            _ => Err(format!("reference '{raw}' must name a component property")),
        };
    }
    if node.is_object() && node.is_entry() {
        Ok(Target::Entry(node))
    } else {
        Err(format!("reference '{raw}' points at a group, not a token"))
    }
}

/// Name the first segment that could not be followed.
fn unresolved_message(root: &Node, reference: &Reference) -> String {
    let segments = reference.path.segments();
    let reached = (0..segments.len())
        .rev()
        .find(|k| walk(root, &segments[..*k]).is_some())
        .unwrap_or(0);
    let missing = &segments[reached];
    let raw = &reference.raw;
    if reached == 0 {
        format!("reference '{raw}' does not resolve: no section '{missing}'")
    } else {
        let parent = segments[..reached].join(".");
        format!("reference '{raw}' does not resolve: '{parent}' has no member '{missing}'")
    }
}

/// Where a single-reference property leads, one hop at a time.
enum Link {
    Entry(Option<TokenType>),
    Property(String),
}

/// A typed property whose single reference lands on another property; its
/// terminal token is checked once the whole graph is known.
struct Pending<'a> {
    at: String,
    property: &'a str,
    raw: &'a str,
    next: String,
}

fn declared_type(entry: &Node) -> Option<TokenType> {
    entry.get("type").and_then(Node::as_str).and_then(|t| t.parse::<TokenType>().ok())
}

fn type_mismatch(property: &str, raw: &str, actual: TokenType) -> Option<String> {
    let expected = expected_types(property)?;
    if expected.contains(&actual) {
        return None;
    }
    let wanted: Vec<&str> = expected.iter().map(TokenType::as_str).collect();
    Some(format!(
        "property '{property}' expects a {} token but '{raw}' is a '{actual}'",
        wanted.join(" or "),
    ))
}

/// Check every reference in `components`, returning one finding per problem.
pub(crate) fn check(root: &Node, components: &[Component]) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut edges: BTreeMap<String, Vec<String>> = BTreeMap::new();
    let mut links: BTreeMap<String, Link> = BTreeMap::new();
    let mut pending = Vec::new();

    for component in components {
        for (property, value) in &component.properties {
            let key = format!("{}.{property}", component.name);
            let at = format!("components.{key}");
            let single = value.as_single_reference().is_some();
            let targets = edges.entry(key.clone()).or_default();

            for reference in value.references() {
                let target = match resolve(root, reference) {
                    Ok(target) => target,
                    Err(message) => {
                        findings.push(Finding::error(at.clone(), message));
                        continue;
                    }
                };
                match target {
                    Target::Property(other) => {
                        if single {
                            if expected_types(property).is_some() {
                                pending.push(Pending {
                                    at: at.clone(),
                                    property: property.as_str(),
                                    raw: reference.raw.as_str(),
                                    next: other.clone(),
                                });
                            }
                            links.insert(key.clone(), Link::Property(other.clone()));
                        }
                        targets.push(other);
                    }
                    Target::Entry(entry) => {
                        let declared = declared_type(entry);
                        if single {
                            links.insert(key.clone(), Link::Entry(declared));
                            if let Some(message) = declared.and_then(|actual| type_mismatch(property, &reference.raw, actual)) {
                                findings.push(Finding::error(at.clone(), message));
                            }
                        }
                    }
                }
            }
        }
    }

    findings.extend(find_cycles(&edges));
    findings.extend(pending.iter().filter_map(|p| check_chain(p, &links)));
    findings
}

/// Follow a property chain to its terminal token and check that token's type.
/// Chains that end on a literal, a mixed value or a cycle are skipped.
fn check_chain(pending: &Pending<'_>, links: &BTreeMap<String, Link>) -> Option<Finding> {
    let mut seen = BTreeSet::new();
    let mut current = pending.next.as_str();
    loop {
        if !seen.insert(current) {
            return None;
        }
        match links.get(current)? {
            Link::Property(next) => current = next.as_str(),
            Link::Entry(declared) => {
                let message = type_mismatch(pending.property, pending.raw, (*declared)?)?;
                return Some(Finding::error(pending.at.clone(), message));
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Mark {
    Visiting,
    Done,
}

/// Depth-first search over property-to-property edges; one finding per cycle.
fn find_cycles(edges: &BTreeMap<String, Vec<String>>) -> Vec<Finding> {
    fn visit(
        node: &str,
        edges: &BTreeMap<String, Vec<String>>,
        marks: &mut BTreeMap<String, Mark>,
        stack: &mut Vec<String>,
        findings: &mut Vec<Finding>,
    ) {
        marks.insert(node.to_string(), Mark::Visiting);
        stack.push(node.to_string());
        for next in edges.get(node).map(Vec::as_slice).unwrap_or_default() {
            match marks.get(next.as_str()) {
                Some(Mark::Visiting) => {
                    let start = stack.iter().position(|n| n == next).unwrap_or(0);
                    let mut cycle: Vec<String> = stack[start..].iter().map(|n| format!("components.{n}")).collect();
                    cycle.push(format!("components.{next}"));
                    findings.push(Finding::error(
                        format!("components.{next}"),
                        format!("reference cycle: {}", cycle.join(" -> ")),
                    ));
                }
                Some(Mark::Done) => {}
                None => visit(next, edges, marks, stack, findings),
            }
        }
        stack.pop();
        marks.insert(node.to_string(), Mark::Done);
    }

    let mut marks = BTreeMap::new();
    let mut findings = Vec::new();
    for node in edges.keys() {
        if !marks.contains_key(node.as_str()) {
            visit(node, edges, &mut marks, &mut Vec::new(), &mut findings);
        }
    }
    findings
}
