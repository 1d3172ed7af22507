//! Validator findings.

use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
        }
    }
}

/// One problem found in a token document.
///
/// Any finding, warning or error, makes the document non-conformant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub severity: Severity,
    /// Top-level section the problem belongs to; empty for the document root.
    pub section: String,
    /// Dotted path of the offending key, e.g. `components.button-primary.background`.
    pub path: String,
    pub message: String,
}

impl Finding {
    pub fn error(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Error, path.into(), message.into())
    }

    pub fn warning(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, path.into(), message.into())
    }

    fn new(severity: Severity, path: String, message: String) -> Self {
        let section = path.split('.').next().unwrap_or_default().to_string();
        Self {
            severity,
            section,
            path,
            message,
        }
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.severity, self.message)
        } else {
            write!(f, "{}: {}: {}", self.severity, self.path, self.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_section_is_first_segment() {
        let finding = Finding::error("components.card.padding", "bad");
        assert_eq!(finding.section, "components");
        assert_eq!(finding.path, "components.card.padding");
    }

    #[test]
    fn test_display() {
        let finding = Finding::warning("spacing.4", "duplicate key");
        assert_eq!(finding.to_string(), "warning: spacing.4: duplicate key");

        let root = Finding::error("", "document root must be a JSON object");
        assert_eq!(root.section, "");
        assert_eq!(root.to_string(), "error: document root must be a JSON object");
    }
}
