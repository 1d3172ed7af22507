//! Unit and naming converters.
//!
//! Pure functions from the lexical forms the validator guarantees to
//! target-specific literals and identifiers. None of them can fail on a
//! conformant document.

use dstk_schema::{Dimension, FontWeight, Hex, LengthUnit};

use crate::format_number;

/// Pixels per `rem` / `em`.
pub const REM_BASE: f64 = 16.0;

/// The "fully rounded" radius. It is a shape marker, not a measurement, and
/// is never converted.
pub const PILL_PX: f64 = 9999.0;

/// Target length unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Rem,
    /// Apple points.
    Pt,
    /// Android density-independent pixels.
    Dp,
    /// Android scale-independent pixels (text).
    Sp,
    /// Logical pixels (React Native, Flutter).
    Px,
}

/// Convert a pixel length to `unit`. `rem` values carry their suffix;
/// pt/dp/sp/px values are bare numbers for the target to type.
pub fn px_to_unit(px: f64, unit: Unit) -> String {
    if px == PILL_PX {
        return match unit {
            Unit::Rem => "9999px".to_string(),
            _ => "9999".to_string(),
        };
    }
    match unit {
        Unit::Rem if px == 0.0 => "0".to_string(),
        Unit::Rem => format!("{}rem", format_number(px / REM_BASE)),
        Unit::Pt | Unit::Dp | Unit::Sp | Unit::Px => format_number(px),
    }
}

/// Convert an `em` ratio to logical pixels.
pub fn em_to_px(em: f64) -> f64 {
    em * REM_BASE
}

/// Render a dimension for `unit`. Pixel values are converted; `em` values
/// pass through unchanged (with their suffix for CSS, as a bare ratio elsewhere).
pub fn dimension_to(dimension: &Dimension, unit: Unit) -> String {
    match dimension.unit {
        LengthUnit::Px => px_to_unit(dimension.magnitude, unit),
        LengthUnit::Em if unit == Unit::Rem => dimension.raw().to_string(),
        LengthUnit::Em => format_number(dimension.magnitude),
    }
}

/// Target color literal syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorTarget {
    Css,
    SwiftUi,
    UiKit,
    Compose,
    AndroidXml,
    Flutter,
    TypeScript,
}

pub fn hex_to_color(hex: &Hex, target: ColorTarget) -> String {
    match target {
        ColorTarget::Css => hex.raw().to_string(),
        ColorTarget::SwiftUi => format!("Color(hex: \"{}\")", hex.raw()),
        ColorTarget::UiKit => format!("UIColor(hex: \"{}\")", hex.raw()),
        ColorTarget::Compose | ColorTarget::Flutter => format!("Color(0xFF{})", hex.rrggbb()),
        ColorTarget::AndroidXml => format!("#FF{}", hex.rrggbb()),
        ColorTarget::TypeScript => format!("'{}'", hex.raw()),
    }
}

/// Target font-weight identifier syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeightTarget {
    Css,
    Swift,
    Compose,
    Flutter,
    /// `android:textStyle`, which only knows normal and bold.
    AndroidXml,
    ReactNative,
}

pub fn font_weight_to(weight: FontWeight, target: WeightTarget) -> String {
    match target {
        WeightTarget::Css => weight.numeric().to_string(),
        WeightTarget::Swift => match weight {
            FontWeight::Regular => ".regular",
            FontWeight::Medium => ".medium",
            FontWeight::SemiBold => ".semibold",
            FontWeight::Bold => ".bold",
        }
        .to_string(),
        WeightTarget::Compose => match weight {
            FontWeight::Regular => "FontWeight.Normal",
            FontWeight::Medium => "FontWeight.Medium",
            FontWeight::SemiBold => "FontWeight.SemiBold",
            FontWeight::Bold => "FontWeight.Bold",
        }
        .to_string(),
        WeightTarget::Flutter => format!("FontWeight.w{}", weight.numeric()),
        WeightTarget::AndroidXml => match weight {
            FontWeight::Regular | FontWeight::Medium => "normal",
            FontWeight::SemiBold | FontWeight::Bold => "bold",
        }
        .to_string(),
        WeightTarget::ReactNative => format!("'{}'", weight.numeric()),
    }
}

/// Identifier casing convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Case {
    Camel,
    Pascal,
    Snake,
    Kebab,
}

fn words(key: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;
    for c in key.chars() {
        if c == '.' {
            current.push('_');
            prev_lower = false;
            continue;
        }
        if matches!(c, '-' | '_' | ' ') {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
            continue;
        }
        if c.is_uppercase() && prev_lower && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        prev_lower = c.is_lowercase() || c.is_ascii_digit();
        current.extend(c.to_lowercase());
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Re-case a token key. Keys that start with a digit (`4`, `2xl`, `0.5`) are
/// not words and keep their spelling, with `.` made identifier-safe.
pub fn identifier_case(key: &str, case: Case) -> String {
    if key.starts_with(|c: char| c.is_ascii_digit()) {
        return key.replace('.', "_");
    }
    let words = words(key);
    match case {
        Case::Camel => words
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { w.clone() } else { capitalize(w) })
            .collect(),
        Case::Pascal => words.iter().map(|w| capitalize(w)).collect(),
        Case::Snake => words.join("_"),
        Case::Kebab => words.join("-"),
    }
}

/// `identifier_case` of `{prefix}-{key}`, so numeric keys still yield a
/// valid identifier: `("space", "4")` → `space4`, `("radius", "md")` → `radiusMd`.
pub fn prefixed(prefix: &str, key: &str, case: Case) -> String {
    identifier_case(&format!("{prefix}-{key}"), case)
}

/// Target language for [`safe_identifier`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Swift,
    Kotlin,
    Dart,
}

const SWIFT_KEYWORDS: &[&str] = &[
    "associatedtype", "case", "class", "default", "defer", "deinit", "do", "else", "enum",
    "extension", "false", "for", "func", "guard", "if", "import", "in", "init", "inout",
    "internal", "is", "let", "nil", "operator", "private", "protocol", "public", "repeat",
    "return", "self", "static", "struct", "subscript", "super", "switch", "true", "try",
    "typealias", "var", "where", "while",
];

const KOTLIN_KEYWORDS: &[&str] = &[
    "as", "break", "class", "continue", "do", "else", "false", "for", "fun", "if", "in",
    "interface", "is", "null", "object", "package", "return", "super", "this", "throw", "true",
    "try", "typealias", "typeof", "val", "var", "when", "while",
];

const DART_KEYWORDS: &[&str] = &[
    "assert", "break", "case", "catch", "class", "const", "continue", "default", "do", "else",
    "enum", "extends", "false", "final", "finally", "for", "if", "in", "is", "new", "null",
    "rethrow", "return", "super", "switch", "this", "throw", "true", "try", "var", "void",
    "while", "with",
];

/// Make a converted name usable as an identifier: a leading digit gets an
/// underscore; reserved words are escaped (backticks) or suffixed (Dart).
pub fn safe_identifier(name: &str, language: Language) -> String {
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{name}");
    }
    match language {
        Language::Swift if SWIFT_KEYWORDS.contains(&name) => format!("`{name}`"),
        Language::Kotlin if KOTLIN_KEYWORDS.contains(&name) => format!("`{name}`"),
        Language::Dart if DART_KEYWORDS.contains(&name) => format!("{name}_"),
        _ => name.to_string(),
    }
}

/// A JavaScript string literal. Single-quoted unless the text itself
/// contains single quotes and no double quotes.
pub fn js_string(text: &str) -> String {
    let quote = if text.contains('\'') && !text.contains('"') { '"' } else { '\'' };
    let mut out = String::with_capacity(text.len() + 2);
    out.push(quote);
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push(quote);
    out
}
