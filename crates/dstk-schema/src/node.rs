//! Raw JSON tree.
//!
//! `serde_json::Value` keeps only the last of two members with the same key,
//! so token documents are first read into [`Node`], which keeps every member
//! in source order. Lookups still follow serde_json semantics (last one wins);
//! the validator uses [`Node::duplicate_keys`] to report the rest.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};

use crate::path::PathTree;

/// A JSON value with order- and duplicate-preserving objects.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Node>),
    Object(Vec<(String, Node)>),
}

impl Node {
    /// Parse JSON text into a node tree.
    pub fn parse(source: &str) -> Result<Node, serde_json::Error> {
        serde_json::from_str(source)
    }

    /// Look up an object member. When the key repeats, the last occurrence wins.
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Object(members) => members
                .iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Node::Object(_))
    }

    /// Object members with duplicates collapsed: each key appears once, at the
    /// position of its first occurrence, carrying the value of its last.
    pub fn members(&self) -> Vec<(&str, &Node)> {
        let Node::Object(members) = self else {
            return Vec::new();
        };
        let mut unique: Vec<(&str, &Node)> = Vec::with_capacity(members.len());
        for (key, value) in members {
            match unique.iter_mut().find(|(k, _)| *k == key.as_str()) {
                Some(slot) => slot.1 = value,
                None => unique.push((key.as_str(), value)),
            }
        }
        unique
    }

    /// Keys that occur more than once in this object, each listed once.
    pub fn duplicate_keys(&self) -> Vec<&str> {
        let Node::Object(members) = self else {
            return Vec::new();
        };
        let mut seen: Vec<&str> = Vec::new();
        let mut duplicates: Vec<&str> = Vec::new();
        for (key, _) in members {
            if seen.contains(&key.as_str()) {
                if !duplicates.contains(&key.as_str()) {
                    duplicates.push(key);
                }
            } else {
                seen.push(key);
            }
        }
        duplicates
    }

    /// A token entry is an object that declares `value` or `type`.
    /// Anything else inside a token section is a group of entries.
    pub fn is_entry(&self) -> bool {
        self.get("value").is_some() || self.get("type").is_some()
    }

    /// Human-readable JSON kind, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "null",
            Node::Bool(_) => "boolean",
            Node::Number(_) => "number",
            Node::String(_) => "string",
            Node::Array(_) => "array",
            Node::Object(_) => "object",
        }
    }
}

impl PathTree for Node {
    /// Entries are leaves: a path never descends into `value` or `type`.
    fn child(&self, key: &str) -> Option<&Node> {
        if self.is_entry() {
            return None;
        }
        self.get(key)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("any JSON value")
    }

    fn visit_bool<E>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Bool(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Number(v.into()))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Number(v.into()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        serde_json::Number::from_f64(v)
            .map(Node::Number)
            .ok_or_else(|| E::custom("non-finite number"))
    }

    fn visit_str<E>(self, v: &str) -> Result<Node, E> {
        Ok(Node::String(v.to_string()))
    }

    fn visit_string<E>(self, v: String) -> Result<Node, E> {
        Ok(Node::String(v))
    }

    fn visit_unit<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_none<E>(self) -> Result<Node, E> {
        Ok(Node::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Node, D::Error>
    where
        D: Deserializer<'de>,
    {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Node, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::Array(items))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Node, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut members = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, Node>()? {
            members.push((key, value));
        }
        Ok(Node::Object(members))
    }
}
