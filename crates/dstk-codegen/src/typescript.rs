//! TypeScript token modules for the web (`tokens.ts`) and React Native (`theme.ts`).
//!
//! Both mirror the section/group structure of the document as a nested
//! `as const` object and append a `components` object whose references are
//! replaced by the values already emitted for the referenced tokens.

use std::collections::BTreeMap;

use dstk_schema::{Shadow, TokenPath, TokenValue, TOKEN_SECTIONS};
use dstk_validator::{Document, PropertyValue, Token, TokenTree};

use crate::convert::{dimension_to, em_to_px, hex_to_color, identifier_case, js_string, px_to_unit, Case, ColorTarget, Unit};
use crate::header::{self, CommentStyle};
use crate::{format_number, render_property, Artifact, EmitOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Web,
    ReactNative,
}

/// A token rendered for TypeScript.
#[derive(Debug, Clone)]
struct TsValue {
    /// Source text of the value (`'1rem'`, `16`, `{ ... }`).
    literal: String,
    /// Plain text used when the value is spliced into a larger string.
    text: String,
}

impl TsValue {
    fn string(text: String) -> Self {
        Self {
            literal: js_string(&text),
            text,
        }
    }

    fn number(text: String) -> Self {
        Self {
            literal: text.clone(),
            text,
        }
    }
}

/// Object key: camelCase when that is a plain identifier, otherwise the
/// token key quoted as written.
fn ts_key(key: &str) -> String {
    let camel = identifier_case(key, Case::Camel);
    let valid = camel.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && camel.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$');
    if valid {
        camel
    } else {
        js_string(key)
    }
}

fn native_shadow(shadow: &Shadow) -> String {
    match shadow.primary() {
        Some(layer) => format!(
            "{{ shadowColor: '#{:02X}{:02X}{:02X}', shadowOffset: {{ width: {}, height: {} }}, shadowOpacity: {}, shadowRadius: {}, elevation: {} }}",
            layer.color.r,
            layer.color.g,
            layer.color.b,
            format_number(layer.x),
            format_number(layer.y),
            format_number(layer.color.a),
            format_number(layer.blur),
            // Android elevation approximates half the blur radius.
            format_number((layer.blur / 2.0).round())
        ),
        None => "{ shadowColor: 'transparent', shadowOffset: { width: 0, height: 0 }, shadowOpacity: 0, shadowRadius: 0, elevation: 0 }"
            .to_string(),
    }
}

fn ts_value(token: &Token, flavor: Flavor) -> TsValue {
    match (&token.value, flavor) {
        (TokenValue::Color(hex), _) => TsValue {
            literal: hex_to_color(hex, ColorTarget::TypeScript),
            text: hex.raw().to_string(),
        },
        (TokenValue::Dimension(d), Flavor::Web) => TsValue::string(dimension_to(d, Unit::Rem)),
        (TokenValue::Dimension(d), Flavor::ReactNative) if d.is_px() => TsValue::number(px_to_unit(d.magnitude, Unit::Px)),
        (TokenValue::Dimension(d), Flavor::ReactNative) => TsValue::number(format_number(em_to_px(d.magnitude))),
        (TokenValue::FontFamily(stack), Flavor::ReactNative) => TsValue::string(stack.primary().to_string()),
        (TokenValue::FontWeight(w), Flavor::Web) => TsValue::number(w.numeric().to_string()),
        (TokenValue::FontWeight(w), Flavor::ReactNative) => TsValue::string(w.numeric().to_string()),
        (TokenValue::Number(n), _) => TsValue::number(n.raw().to_string()),
        (TokenValue::Shadow(shadow), Flavor::ReactNative) => TsValue {
            literal: native_shadow(shadow),
            text: shadow.raw().to_string(),
        },
        (value, _) => TsValue::string(value.raw().to_string()),
    }
}

struct Writer {
    flavor: Flavor,
    lines: Vec<String>,
    /// Emitted value of every token, by canonical path.
    rendered: BTreeMap<String, TsValue>,
}

impl Writer {
    fn group(&mut self, entries: &[(String, TokenTree)], prefix: &TokenPath, depth: usize) {
        let pad = "  ".repeat(depth);
        for (key, tree) in entries {
            let path = prefix.child(key);
            match tree {
                TokenTree::Token(token) => {
                    let value = ts_value(token, self.flavor);
                    self.lines.push(format!("{pad}{}: {},", ts_key(key), value.literal));
                    self.rendered.insert(path.to_string(), value);
                }
                TokenTree::Group(children) => {
                    self.lines.push(format!("{pad}{}: {{", ts_key(key)));
                    self.group(children, &path, depth + 1);
                    self.lines.push(format!("{pad}}},"));
                }
            }
        }
    }

    fn lookup(&self, path: &TokenPath, token: &Token) -> TsValue {
        self.rendered
            .get(&path.to_string())
            .cloned()
            .unwrap_or_else(|| ts_value(token, self.flavor))
    }

    fn property(&self, doc: &Document, value: &PropertyValue) -> String {
        if let Some(reference) = value.as_single_reference() {
            if let Some((path, token)) = doc.resolve_token(&reference.path) {
                return self.lookup(path, token).literal;
            }
        }
        let text = render_property(doc, value, &|path, token| self.lookup(path, token).text);
        let numeric = value.references().next().is_none() && text.parse::<f64>().is_ok();
        if numeric && self.flavor == Flavor::ReactNative {
            text
        } else {
            js_string(&text)
        }
    }
}

fn generate(doc: &Document, options: &EmitOptions, flavor: Flavor) -> String {
    let format = match flavor {
        Flavor::Web => "TypeScript",
        Flavor::ReactNative => "React Native",
    };
    let mut writer = Writer {
        flavor,
        lines: vec![
            header::render(doc.meta(), options, format, CommentStyle::Block),
            String::new(),
            "export const tokens = {".to_string(),
        ],
        rendered: BTreeMap::new(),
    };

    for name in TOKEN_SECTIONS {
        if let Some(tree) = doc.section(name) {
            writer.lines.push(format!("  {}: {{", ts_key(name)));
            writer.group(tree.entries(), &TokenPath::new(vec![name.to_string()]), 2);
            writer.lines.push("  },".to_string());
        }
    }
    writer.lines.push("} as const;".to_string());

    if !doc.components().is_empty() {
        let mut components = vec![String::new(), "export const components = {".to_string()];
        for component in doc.components() {
            components.push(format!("  {}: {{", ts_key(&component.name)));
            for (property, value) in &component.properties {
                components.push(format!("    {}: {},", ts_key(property), writer.property(doc, value)));
            }
            components.push("  },".to_string());
        }
        components.push("} as const;".to_string());
        writer.lines.extend(components);
    }

    writer.lines.push(String::new());
    writer.lines.push("export type Tokens = typeof tokens;".to_string());
    writer.lines.push(String::new());
    writer.lines.join("\n")
}

/// `tokens.ts`: CSS-ready strings (`rem`, font stacks, shadow shorthands).
pub fn generate_web(doc: &Document, options: &EmitOptions) -> Artifact {
    Artifact::new("tokens.ts", generate(doc, options, Flavor::Web))
}

/// `theme.ts`: unitless logical pixels, `em` converted to pixels, shadows as
/// React Native style objects.
pub fn generate_react_native(doc: &Document, options: &EmitOptions) -> Artifact {
    Artifact::new("theme.ts", generate(doc, options, Flavor::ReactNative))
}
