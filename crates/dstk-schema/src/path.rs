//! Token paths and `{section.path}` references.
//!
//! Resolution is shared by the validator (over the raw [`Node`](crate::Node)
//! tree) and by emitters (over the conformant document), so both agree on
//! what a reference points at.

use std::fmt;
use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

static REFERENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([\w.-]+)\}").expect("reference pattern is valid"));

/// A tree that can be walked one key at a time.
pub trait PathTree {
    fn child(&self, key: &str) -> Option<&Self>;
}

/// A dot-separated path into a token document, e.g. `typography.font-size.sm`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TokenPath {
    segments: Vec<String>,
}

impl TokenPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self { segments }
    }

    /// Split on every dot. Keys that themselves contain dots are recovered
    /// during [`walk`], not here.
    pub fn parse(text: &str) -> Self {
        Self {
            segments: text.split('.').map(str::to_string).collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn first(&self) -> Option<&str> {
        self.segments.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// A new path with `key` appended.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }
}

impl fmt::Display for TokenPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

/// One `{path}` occurrence inside a string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    /// The literal text including braces, e.g. `{color.primary}`.
    pub raw: String,
    pub path: TokenPath,
    /// Byte range of `raw` within the containing string.
    pub span: Range<usize>,
}

/// Find every reference in `text`, in order of appearance.
pub fn find_references(text: &str) -> Vec<Reference> {
    REFERENCE_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(Reference {
                raw: whole.as_str().to_string(),
                path: TokenPath::parse(inner.as_str()),
                span: whole.range(),
            })
        })
        .collect()
}

/// Resolve `segments` below `root`, returning the node reached and the keys
/// actually matched (the canonical path).
///
/// At each level the longest run of remaining segments that names an
/// existing key is tried first, so a key such as `0.5` is reachable from the
/// segments `["0", "5"]`. Shorter runs are tried when the longer match does
/// not lead anywhere.
pub fn walk<'a, T: PathTree>(root: &'a T, segments: &[String]) -> Option<(&'a T, TokenPath)> {
    if segments.is_empty() {
        return Some((root, TokenPath::new(Vec::new())));
    }
    for take in (1..=segments.len()).rev() {
        let key = segments[..take].join(".");
        let Some(child) = root.child(&key) else {
            continue;
        };
        if let Some((node, rest)) = walk(child, &segments[take..]) {
            let mut keys = Vec::with_capacity(rest.len() + 1);
            keys.push(key);
            keys.extend(rest.segments);
            return Some((node, TokenPath::new(keys)));
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Node;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_and_display() {
        let path = TokenPath::parse("typography.font-size.sm");
        assert_eq!(path.len(), 3);
        assert_eq!(path.first(), Some("typography"));
        assert_eq!(path.last(), Some("sm"));
        assert_eq!(path.to_string(), "typography.font-size.sm");
    }

    #[test]
    fn test_find_single_reference() {
        let refs = find_references("{color.primary}");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].raw, "{color.primary}");
        assert_eq!(refs[0].path.to_string(), "color.primary");
        assert_eq!(refs[0].span, 0..15);
    }

    #[test]
    fn test_find_embedded_references() {
        let refs = find_references("{spacing.2} {spacing.4}");
        let raws: Vec<&str> = refs.iter().map(|r| r.raw.as_str()).collect();
        assert_eq!(raws, vec!["{spacing.2}", "{spacing.4}"]);
        assert_eq!(refs[1].span, 12..23);
    }

    #[test]
    fn test_literal_has_no_references() {
        assert!(find_references("1px solid #E5E7EB").is_empty());
        assert!(find_references("{ not a ref }").is_empty());
    }

    #[test]
    fn test_walk_nested() {
        let doc = Node::parse(r#"{"typography": {"font-size": {"sm": {"value": "14px", "type": "dimension"}}}}"#)
            .unwrap();
        let path = TokenPath::parse("typography.font-size.sm");
        let (node, canonical) = walk(&doc, path.segments()).unwrap();
        assert!(node.is_entry());
        assert_eq!(canonical, path);
    }

    #[test]
    fn test_walk_dotted_key() {
        let doc = Node::parse(r#"{"spacing": {"0.5": {"value": "2px", "type": "dimension"}}}"#).unwrap();
        let (node, canonical) = walk(&doc, TokenPath::parse("spacing.0.5").segments()).unwrap();
        assert!(node.is_entry());
        assert_eq!(canonical.segments(), &["spacing".to_string(), "0.5".to_string()]);
    }

    #[test]
    fn test_walk_missing() {
        let doc = Node::parse(r#"{"color": {}}"#).unwrap();
        assert!(walk(&doc, TokenPath::parse("color.primary").segments()).is_none());
    }

    #[test]
    fn test_walk_stops_at_entries() {
        let doc = Node::parse(r##"{"color": {"primary": {"value": "#2563EB", "type": "color"}}}"##).unwrap();
        assert!(walk(&doc, TokenPath::parse("color.primary.value").segments()).is_none());
    }
}
