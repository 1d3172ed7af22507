//! dstk Code Generator
//!
//! Turns a conformant token [`Document`] into platform theme files: CSS
//! custom properties, SCSS, Tailwind, SwiftUI, UIKit, Jetpack Compose,
//! Android XML resources, Flutter and TypeScript / React Native.
//!
//! ```text
//! Document → emit(target) → Vec<Artifact { filename, content }>
//! source   → compile()    → Vec<Artifact>   (parse + conform + emit)
//! ```
//!
//! Emitters are pure: the same document, target and options always produce
//! byte-identical artifacts. They never re-validate; a [`Document`] can only
//! exist once the validator has reported zero findings.

pub mod android;
pub mod convert;
pub mod css;
pub mod dart;
pub mod header;
pub mod kotlin;
pub mod swift;
pub mod tailwind;
mod tokens;
pub mod typescript;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use dstk_schema::{parse_source, LoadError, SourceKind, TokenPath};
use dstk_validator::{conform, Document, PropertyValue, Rejection, Resolved, Segment, Token};
use serde::Serialize;

/// Package used for generated Kotlin files unless overridden.
pub const DEFAULT_KOTLIN_PACKAGE: &str = "com.example.theme";

/// Deepest component-to-component chain followed when rendering a property.
const MAX_RENDER_DEPTH: usize = 32;

/// An output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Css,
    Scss,
    Tailwind,
    SwiftUi,
    UiKit,
    Compose,
    AndroidXml,
    Flutter,
    TypeScript,
    ReactNative,
}

impl Target {
    pub const ALL: [Target; 10] = [
        Target::Css,
        Target::Scss,
        Target::Tailwind,
        Target::SwiftUi,
        Target::UiKit,
        Target::Compose,
        Target::AndroidXml,
        Target::Flutter,
        Target::TypeScript,
        Target::ReactNative,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Css => "css",
            Target::Scss => "scss",
            Target::Tailwind => "tailwind",
            Target::SwiftUi => "swiftui",
            Target::UiKit => "uikit",
            Target::Compose => "compose",
            Target::AndroidXml => "android-xml",
            Target::Flutter => "flutter",
            Target::TypeScript => "typescript",
            Target::ReactNative => "react-native",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = CodegenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Target::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| CodegenError::UnknownTarget(s.to_string()))
    }
}

/// Settings that are not part of the token document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitOptions {
    /// Date written into every header. Fixed per run so output is idempotent.
    pub generated_on: NaiveDate,
    /// Package declaration for Compose files.
    pub kotlin_package: String,
    /// Emit component classes (CSS) or mixins (SCSS) after the variables.
    pub css_components: bool,
}

impl EmitOptions {
    pub fn for_date(generated_on: NaiveDate) -> Self {
        Self {
            generated_on,
            kotlin_package: DEFAULT_KOTLIN_PACKAGE.to_string(),
            css_components: false,
        }
    }

    /// Options dated with the local calendar day.
    pub fn today() -> Self {
        Self::for_date(chrono::Local::now().date_naive())
    }

    pub fn with_kotlin_package(mut self, package: impl Into<String>) -> Self {
        self.kotlin_package = package.into();
        self
    }

    pub fn with_css_components(mut self, enabled: bool) -> Self {
        self.css_components = enabled;
        self
    }
}

/// One generated file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub filename: String,
    pub content: String,
}

impl Artifact {
    pub(crate) fn new(filename: &str, content: String) -> Self {
        Self {
            filename: filename.to_string(),
            content,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Rejected(#[from] Rejection),

    #[error("unknown target '{0}'")]
    UnknownTarget(String),
}

/// Generate the artifacts of one target.
pub fn emit(doc: &Document, target: Target, options: &EmitOptions) -> Vec<Artifact> {
    let artifacts = match target {
        Target::Css => vec![css::generate_css(doc, options)],
        Target::Scss => vec![css::generate_scss(doc, options)],
        Target::Tailwind => vec![tailwind::generate(doc, options)],
        Target::SwiftUi => vec![swift::generate_swiftui(doc, options)],
        Target::UiKit => vec![swift::generate_uikit(doc, options)],
        Target::Compose => kotlin::generate(doc, options),
        Target::AndroidXml => android::generate(doc, options),
        Target::Flutter => vec![dart::generate(doc, options)],
        Target::TypeScript => vec![typescript::generate_web(doc, options)],
        Target::ReactNative => vec![typescript::generate_react_native(doc, options)],
    };
    tracing::debug!(%target, files = artifacts.len(), "emitted");
    artifacts
}

/// Parse, validate and emit in one step. Nothing is generated unless the
/// whole document is conformant.
pub fn compile(
    source: &str,
    kind: SourceKind,
    targets: &[Target],
    options: &EmitOptions,
) -> Result<Vec<Artifact>, CodegenError> {
    let root = parse_source(source, kind)?;
    let doc = conform(&root)?;
    Ok(targets
        .iter()
        .flat_map(|target| emit(&doc, *target, options))
        .collect())
}

/// Format a number without a trailing `.0` for integers.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.is_finite() {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Render a component property, substituting each reference with
/// `render(path, token)`: the target's own converted form of the token.
/// References to other component properties are rendered in place.
pub fn render_property(doc: &Document, value: &PropertyValue, render: &dyn Fn(&TokenPath, &Token) -> String) -> String {
    render_at_depth(doc, value, render, 0)
}

fn render_at_depth(
    doc: &Document,
    value: &PropertyValue,
    render: &dyn Fn(&TokenPath, &Token) -> String,
    depth: usize,
) -> String {
    let mut out = String::new();
    for segment in value.segments() {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Reference(reference) => match doc.resolve(&reference.path) {
                Some(Resolved::Token { path, token }) => out.push_str(&render(path, token)),
                Some(Resolved::Property { value, .. }) if depth < MAX_RENDER_DEPTH => {
                    out.push_str(&render_at_depth(doc, value, render, depth + 1));
                }
                _ => out.push_str(&reference.raw),
            },
        }
    }
    out
}

/// Fixture shared by the emitter tests.
#[cfg(test)]
pub(crate) mod fixture {
    use super::*;
    use dstk_schema::Node;

    pub const TOKENS: &str = r##"{
        "meta": {"name": "Acme Design", "source": "landing.png", "version": "1.0.0", "generated": "2026-03-01"},
        "color": {
            "primary": {"value": "#2563EB", "type": "color", "description": "Brand blue"},
            "primary-light": {"value": "#3B82F6", "type": "color"},
            "background": {"value": "#FFFFFF", "type": "color"},
            "text-primary": {"value": "#111827", "type": "color"}
        },
        "typography": {
            "font-family-heading": {"value": "'Inter', sans-serif", "type": "fontFamily"},
            "font-family-body": {"value": "'Inter', system-ui, sans-serif", "type": "fontFamily"},
            "font-source": {
                "heading": {"value": "https://fonts.googleapis.com/css2?family=Inter", "type": "fontSource"},
                "body": {"value": "system", "type": "fontSource"}
            },
            "font-size": {
                "sm": {"value": "14px", "type": "dimension"},
                "base": {"value": "16px", "type": "dimension"},
                "2xl": {"value": "24px", "type": "dimension"}
            },
            "font-weight": {
                "regular": {"value": "400", "type": "fontWeight"},
                "semibold": {"value": "600", "type": "fontWeight"}
            },
            "line-height": {"normal": {"value": "1.5", "type": "number"}},
            "letter-spacing": {"tight": {"value": "-0.025em", "type": "dimension"}}
        },
        "spacing": {
            "0": {"value": "0px", "type": "dimension"},
            "0.5": {"value": "2px", "type": "dimension"},
            "4": {"value": "16px", "type": "dimension"}
        },
        "borderRadius": {
            "md": {"value": "8px", "type": "dimension"},
            "full": {"value": "9999px", "type": "dimension"}
        },
        "shadow": {
            "sm": {"value": "0 1px 2px 0 rgba(0, 0, 0, 0.05)", "type": "shadow"},
            "none": {"value": "none", "type": "shadow"}
        },
        "components": {
            "button-primary": {
                "background": "{color.primary}",
                "color": "{color.background}",
                "padding": "{spacing.0.5} {spacing.4}",
                "border-radius": "{borderRadius.md}",
                "hover-background": "{color.primary-light}"
            },
            "link": {"color": "{components.button-primary.background}"}
        }
    }"##;

    pub fn doc() -> Document {
        conform(&Node::parse(TOKENS).unwrap()).unwrap()
    }

    pub fn options() -> EmitOptions {
        EmitOptions::for_date(NaiveDate::from_ymd_opt(2026, 3, 14).unwrap())
    }

    /// Content of the artifact named `filename`.
    pub fn file(artifacts: &[Artifact], filename: &str) -> String {
        artifacts
            .iter()
            .find(|a| a.filename == filename)
            .map(|a| a.content.clone())
            .unwrap_or_else(|| panic!("no artifact named {filename}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // =========================================================================
    // format_number
    // =========================================================================

    #[test]
    fn test_format_number_integer() {
        assert_eq!(format_number(16.0), "16");
        assert_eq!(format_number(-0.0), "0");
    }

    #[test]
    fn test_format_number_float() {
        assert_eq!(format_number(0.875), "0.875");
        assert_eq!(format_number(-0.4), "-0.4");
    }

    // =========================================================================
    // Targets
    // =========================================================================

    #[test]
    fn test_target_names_round_trip() {
        for target in Target::ALL {
            assert_eq!(target.as_str().parse::<Target>().unwrap(), target);
        }
        assert!(matches!("sass".parse::<Target>(), Err(CodegenError::UnknownTarget(_))));
    }

    // =========================================================================
    // emit / compile
    // =========================================================================

    #[test]
    fn test_every_header_leads_with_name() {
        let doc = fixture::doc();
        for target in Target::ALL {
            for artifact in emit(&doc, target, &fixture::options()) {
                let first = artifact.content.lines().next().unwrap_or_default();
                assert!(first.contains("Acme Design"), "{target} {}: {first}", artifact.filename);
                assert!(artifact.content.contains("2026-03-14"));
                assert!(artifact.content.contains("landing.png"));
            }
        }
    }

    #[test]
    fn test_emission_is_idempotent() {
        let doc = fixture::doc();
        for target in Target::ALL {
            assert_eq!(emit(&doc, target, &fixture::options()), emit(&doc, target, &fixture::options()));
        }
    }

    #[test]
    fn test_pill_radius_survives_every_target() {
        let doc = fixture::doc();
        for target in Target::ALL {
            let all: String = emit(&doc, target, &fixture::options())
                .into_iter()
                .map(|a| a.content)
                .collect();
            assert!(all.contains("9999"), "{target}");
            assert!(!all.contains("624.9375"), "{target}");
        }
    }

    #[test]
    fn test_compile_rejects_dangling_reference() {
        let source = fixture::TOKENS.replace("{color.primary-light}", "{color.primary-dark}");
        let err = compile(&source, SourceKind::Json, &Target::ALL, &fixture::options()).unwrap_err();
        let CodegenError::Rejected(rejection) = err else {
            panic!("expected rejection, got {err}");
        };
        assert_eq!(rejection.findings.len(), 1);
        assert_eq!(rejection.findings[0].path, "components.button-primary.hover-background");
    }

    #[test]
    fn test_compile_from_markdown() {
        let source = format!("# Tokens\n\n```json\n{}\n```\n", fixture::TOKENS);
        let artifacts = compile(&source, SourceKind::Markdown, &[Target::Css], &fixture::options()).unwrap();
        assert_eq!(artifacts.len(), 1);
        assert_eq!(artifacts[0].filename, "tokens.css");
    }

    #[test]
    fn test_render_property_follows_component_chain() {
        let doc = fixture::doc();
        let link = &doc.components()[1].properties[0].1;
        let rendered = render_property(&doc, link, &|path, _| format!("<{path}>"));
        assert_eq!(rendered, "<color.primary>");
    }
}
