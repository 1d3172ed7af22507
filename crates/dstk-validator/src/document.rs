//! The conformant token document.
//!
//! A [`Document`] can only be produced by [`conform`](crate::conform), so
//! holding one proves the validator found nothing wrong with its source.
//! Emitters take `&Document` and never re-check values.

use dstk_schema::{find_references, walk, PathTree, Reference, TokenPath, TokenValue};

/// Longest chain of component-to-component references followed by
/// [`Document::resolve_token`]. Cycles are rejected during validation.
const MAX_REFERENCE_DEPTH: usize = 32;

#[derive(Debug, Clone, PartialEq)]
pub struct Meta {
    pub name: String,
    pub source: String,
    pub version: String,
    pub generated: String,
}

/// A leaf token: a typed value plus its optional description.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub value: TokenValue,
    pub description: Option<String>,
}

/// A section or group of tokens, or a single token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenTree {
    Token(Token),
    Group(Vec<(String, TokenTree)>),
}

impl TokenTree {
    /// Members of a group in document order; empty for a token.
    pub fn entries(&self) -> &[(String, TokenTree)] {
        match self {
            TokenTree::Group(entries) => entries,
            TokenTree::Token(_) => &[],
        }
    }

    pub fn get(&self, key: &str) -> Option<&TokenTree> {
        self.entries().iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            TokenTree::Token(token) => Some(token),
            TokenTree::Group(_) => None,
        }
    }

    /// Direct children that are tokens, skipping nested groups.
    pub fn tokens(&self) -> impl Iterator<Item = (&str, &Token)> {
        self.entries()
            .iter()
            .filter_map(|(key, tree)| tree.as_token().map(|token| (key.as_str(), token)))
    }

    /// Every token below this tree, depth first, with paths relative to it.
    pub fn flatten(&self) -> Vec<(TokenPath, &Token)> {
        let mut out = Vec::new();
        flatten_into(self, &TokenPath::new(Vec::new()), &mut out);
        out
    }
}

fn flatten_into<'a>(tree: &'a TokenTree, prefix: &TokenPath, out: &mut Vec<(TokenPath, &'a Token)>) {
    match tree {
        TokenTree::Token(token) => out.push((prefix.clone(), token)),
        TokenTree::Group(entries) => {
            for (key, child) in entries {
                flatten_into(child, &prefix.child(key), out);
            }
        }
    }
}

impl PathTree for TokenTree {
    fn child(&self, key: &str) -> Option<&TokenTree> {
        self.get(key)
    }
}

/// One piece of a component property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    Literal(String),
    Reference(Reference),
}

/// A component property: literal text with zero or more embedded references.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyValue {
    raw: String,
    segments: Vec<Segment>,
}

impl PropertyValue {
    pub fn parse(raw: &str) -> Self {
        let mut segments = Vec::new();
        let mut cursor = 0;
        for reference in find_references(raw) {
            if reference.span.start > cursor {
                segments.push(Segment::Literal(raw[cursor..reference.span.start].to_string()));
            }
            cursor = reference.span.end;
            segments.push(Segment::Reference(reference));
        }
        if cursor < raw.len() {
            segments.push(Segment::Literal(raw[cursor..].to_string()));
        }
        Self {
            raw: raw.to_string(),
            segments,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.segments.iter().filter_map(|s| match s {
            Segment::Reference(r) => Some(r),
            Segment::Literal(_) => None,
        })
    }

    /// The reference, when the whole value is exactly one reference.
    pub fn as_single_reference(&self) -> Option<&Reference> {
        match self.segments.as_slice() {
            [Segment::Reference(r)] => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub name: String,
    pub properties: Vec<(String, PropertyValue)>,
}

/// What a reference points at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resolved<'a> {
    Token {
        path: &'a TokenPath,
        token: &'a Token,
    },
    Property {
        component: &'a str,
        property: &'a str,
        value: &'a PropertyValue,
    },
}

/// A token document with zero validator findings.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    meta: Meta,
    tokens: TokenTree,
    components: Vec<Component>,
    /// Canonical paths of every token, so `Resolved::Token` can borrow one.
    paths: Vec<TokenPath>,
}

impl Document {
    pub(crate) fn new(meta: Meta, tokens: TokenTree, components: Vec<Component>) -> Self {
        let paths = tokens.flatten().into_iter().map(|(path, _)| path).collect();
        Self {
            meta,
            tokens,
            components,
            paths,
        }
    }

    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// All token sections, in document order.
    pub fn tokens(&self) -> &TokenTree {
        &self.tokens
    }

    pub fn section(&self, name: &str) -> Option<&TokenTree> {
        self.tokens.get(name)
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    /// Resolve a path the same way the validator does: `meta` is never a
    /// target, `components.<name>.<property>` names a component property, and
    /// anything else must end on a token.
    pub fn resolve(&self, path: &TokenPath) -> Option<Resolved<'_>> {
        let segments = path.segments();
        match segments.first().map(String::as_str) {
            None | Some("meta") => None,
            Some("components") => self.resolve_property(&segments[1..]),
            Some(_) => {
                let (tree, canonical) = walk(&self.tokens, segments)?;
                let token = tree.as_token()?;
                let path = self.paths.iter().find(|p| **p == canonical)?;
                Some(Resolved::Token { path, token })
            }
        }
    }

    fn resolve_property(&self, segments: &[String]) -> Option<Resolved<'_>> {
        for split in (1..segments.len()).rev() {
            let name = segments[..split].join(".");
            let property = segments[split..].join(".");
            let Some(component) = self.components.iter().find(|c| c.name == name) else {
                continue;
            };
            if let Some((key, value)) = component.properties.iter().find(|(k, _)| *k == property) {
                return Some(Resolved::Property {
                    component: &component.name,
                    property: key,
                    value,
                });
            }
        }
        None
    }

    /// Follow component-to-component references until a token is reached.
    /// Returns `None` when the chain ends on a literal or mixed value.
    pub fn resolve_token(&self, path: &TokenPath) -> Option<(&TokenPath, &Token)> {
        let mut current = path.clone();
        for _ in 0..MAX_REFERENCE_DEPTH {
            match self.resolve(&current)? {
                Resolved::Token { path, token } => return Some((path, token)),
                Resolved::Property { value, .. } => {
                    current = value.as_single_reference()?.path.clone();
                }
            }
        }
        None
    }
}
