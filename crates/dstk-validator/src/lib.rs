//! dstk Schema Validator
//!
//! Checks a raw token document for structural conformance, lexical value
//! forms and reference integrity, and turns a conformant one into a typed
//! [`Document`].
//!
//! ```text
//! Node → validate() → Vec<Finding>
//! Node → conform()  → Result<Document, Rejection>
//! ```
//!
//! Validation never fails on malformed input; every structural problem is a
//! [`Finding`]. A document with zero findings is conformant, and only a
//! conformant document can be handed to the emitters.

mod checker;
pub mod document;
pub mod finding;
mod references;

pub use document::{Component, Document, Meta, PropertyValue, Resolved, Segment, Token, TokenTree};
pub use finding::{Finding, Severity};

use checker::Checker;
use dstk_schema::Node;

/// A document that failed validation, with every finding.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("token document is not conformant ({} finding(s))", .findings.len())]
pub struct Rejection {
    pub findings: Vec<Finding>,
}

/// Report every problem in `root`. An empty result means conformant.
pub fn validate(root: &Node) -> Vec<Finding> {
    let (_, findings) = Checker::run(root);
    tracing::debug!(findings = findings.len(), "validation finished");
    findings
}

/// Validate `root` and, when conformant, build the typed document.
pub fn conform(root: &Node) -> Result<Document, Rejection> {
    let (document, findings) = Checker::run(root);
    tracing::debug!(findings = findings.len(), "validation finished");
    match document {
        Some(document) if findings.is_empty() => Ok(document),
        _ => Err(Rejection { findings }),
    }
}
