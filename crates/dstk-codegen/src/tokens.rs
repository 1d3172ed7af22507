//! Typed views over a [`Document`] shared by the native emitters.

use dstk_schema::{Dimension, FontSource, FontStack, FontWeight, LengthUnit, Shadow, TokenValue};
use dstk_validator::{Document, Token};

use crate::convert::{px_to_unit, Unit};
use crate::format_number;

/// Every token of a flat section, nested keys joined by `-`.
pub(crate) fn section_tokens<'a>(doc: &'a Document, section: &str) -> Vec<(String, &'a Token)> {
    doc.section(section)
        .map(|tree| {
            tree.flatten()
                .into_iter()
                .map(|(path, token)| (path.segments().join("-"), token))
                .collect()
        })
        .unwrap_or_default()
}

/// Color tokens as `(key, hex)`.
pub(crate) fn colors(doc: &Document) -> Vec<(String, &dstk_schema::Hex)> {
    section_tokens(doc, "color")
        .into_iter()
        .filter_map(|(key, token)| match &token.value {
            TokenValue::Color(hex) => Some((key, hex)),
            _ => None,
        })
        .collect()
}

/// Pixel dimension tokens of a section as `(key, px)`.
pub(crate) fn lengths(doc: &Document, section: &str) -> Vec<(String, f64)> {
    section_tokens(doc, section)
        .into_iter()
        .filter_map(|(key, token)| match &token.value {
            TokenValue::Dimension(d) if d.is_px() => Some((key, d.magnitude)),
            _ => None,
        })
        .collect()
}

/// Shadow tokens as `(key, shadow)`.
pub(crate) fn shadows(doc: &Document) -> Vec<(String, &Shadow)> {
    section_tokens(doc, "shadow")
        .into_iter()
        .filter_map(|(key, token)| match &token.value {
            TokenValue::Shadow(shadow) => Some((key, shadow)),
            _ => None,
        })
        .collect()
}

/// The `typography` section split by role.
#[derive(Default)]
pub(crate) struct Typography<'a> {
    /// `font-family-<role>` tokens as `(role, stack)`.
    pub families: Vec<(String, &'a FontStack)>,
    pub sources: Vec<(String, &'a FontSource)>,
    pub sizes: Vec<(String, &'a Dimension)>,
    pub weights: Vec<(String, FontWeight)>,
    pub line_heights: Vec<(String, &'a TokenValue)>,
    pub letter_spacings: Vec<(String, &'a Dimension)>,
}

impl<'a> Typography<'a> {
    pub fn of(doc: &'a Document) -> Self {
        let mut typography = Typography::default();
        let Some(tree) = doc.section("typography") else {
            return typography;
        };
        for (key, token) in tree.tokens() {
            if let TokenValue::FontFamily(stack) = &token.value {
                let role = key.strip_prefix("font-family-").unwrap_or(key);
                typography.families.push((role.to_string(), stack));
            }
        }
        let group = |name: &str| -> Vec<(String, &'a Token)> {
            tree.get(name)
                .map(|g| {
                    g.flatten()
                        .into_iter()
                        .map(|(path, token)| (path.segments().join("-"), token))
                        .collect()
                })
                .unwrap_or_default()
        };
        for (key, token) in group("font-source") {
            if let TokenValue::FontSource(source) = &token.value {
                typography.sources.push((key, source));
            }
        }
        for (key, token) in group("font-size") {
            if let TokenValue::Dimension(d) = &token.value {
                typography.sizes.push((key, d));
            }
        }
        for (key, token) in group("font-weight") {
            if let TokenValue::FontWeight(w) = &token.value {
                typography.weights.push((key, *w));
            }
        }
        for (key, token) in group("line-height") {
            typography.line_heights.push((key, &token.value));
        }
        for (key, token) in group("letter-spacing") {
            if let TokenValue::Dimension(d) = &token.value {
                typography.letter_spacings.push((key, d));
            }
        }
        typography
    }

    /// Primary family of a role, if declared.
    pub fn family(&self, role: &str) -> Option<&'a str> {
        self.families
            .iter()
            .find(|(r, _)| r == role)
            .map(|(_, stack)| stack.primary())
    }

    /// Pixel size of a `font-size` key, if declared.
    pub fn size_px(&self, key: &str) -> Option<f64> {
        self.sizes
            .iter()
            .find(|(k, d)| k == key && d.is_px())
            .map(|(_, d)| d.magnitude)
    }

    /// Font sources that must be bundled, as `(role, primary family, url)`.
    pub fn hosted_fonts(&self) -> Vec<(&str, &str, &str)> {
        self.sources
            .iter()
            .filter_map(|(role, source)| match source {
                FontSource::Url(url) => Some((role.as_str(), self.family(role).unwrap_or(role), url.as_str())),
                FontSource::System => None,
            })
            .collect()
    }

    /// Roles whose font ships with the platform.
    pub fn system_fonts(&self) -> Vec<&str> {
        self.sources
            .iter()
            .filter(|(_, source)| **source == FontSource::System)
            .map(|(role, _)| role.as_str())
            .collect()
    }
}

/// A line height as a bare number: ratios pass through, pixel heights are
/// converted to `unit`.
pub(crate) fn line_height(value: &TokenValue, unit: Unit) -> String {
    match value {
        TokenValue::Dimension(d) if d.unit == LengthUnit::Px => px_to_unit(d.magnitude, unit),
        TokenValue::Dimension(d) => format_number(d.magnitude),
        other => other.raw().to_string(),
    }
}
