//! dstk Token Schema
//!
//! The static data contract for design token documents: the raw JSON tree
//! (order- and duplicate-preserving), the lexical value types a token entry
//! may carry, token paths and `{section.path}` references, and input loading
//! from `.json` files or fenced blocks in Markdown.
//!
//! # Example
//!
//! ```
//! use dstk_schema::{Node, TokenType, TokenValue};
//!
//! let node = Node::parse(r##"{"color": {"primary": {"value": "#2563EB", "type": "color"}}}"##).unwrap();
//! let entry = node.get("color").and_then(|c| c.get("primary")).unwrap();
//! let value = TokenValue::parse(TokenType::Color, entry.get("value").unwrap().as_str().unwrap());
//! assert!(value.is_ok());
//! ```

pub mod node;
pub mod path;
pub mod source;
pub mod value;

use std::path::PathBuf;

pub use node::Node;
pub use path::{find_references, walk, PathTree, Reference, TokenPath};
pub use source::{extract_json_block, load, parse_source, SourceKind};
pub use value::{
    Dimension, FontSource, FontStack, FontWeight, Hex, LengthUnit, Number, Rgba, Shadow,
    ShadowLayer, TokenType, TokenValue, ValueError,
};

/// Top-level sections every token document must declare.
pub const REQUIRED_SECTIONS: &[&str] = &["meta", "color", "typography", "spacing", "borderRadius", "shadow"];

/// Fields every `meta` section must declare.
pub const REQUIRED_META_FIELDS: &[&str] = &["name", "source", "version", "generated"];

/// Token sections in the order emitters walk them.
pub const TOKEN_SECTIONS: &[&str] = &["color", "typography", "spacing", "borderRadius", "shadow"];

/// Sections that hold metadata or component definitions rather than tokens.
pub const NON_TOKEN_SECTIONS: &[&str] = &["meta", "components"];

/// Error raised while reading a token document from disk or text.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no fenced JSON code block found in {}", .0.display())]
    NoJsonBlock(PathBuf),

    #[error("token document must be a JSON object, found {0}")]
    NotAnObject(&'static str),
}
