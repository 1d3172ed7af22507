//! CSS custom properties and SCSS variables.
//!
//! Both formats share one variable naming scheme: `color.primary` →
//! `color-primary`, `spacing.4` → `space-4`, `borderRadius.md` →
//! `radius-md`, `typography.font-family-heading` → `font-heading`,
//! `typography.font-size.sm` → `font-size-sm`. Pixel values become `rem`;
//! `em` values and the pill radius pass through.

use dstk_schema::{FontSource, TokenPath, TokenValue};
use dstk_validator::{Document, Token};

use crate::convert::{dimension_to, hex_to_color, identifier_case, Case, ColorTarget, Unit};
use crate::header::{self, CommentStyle};
use crate::{render_property, Artifact, EmitOptions};

/// Emitted sections: key, comment label, SCSS map name.
const SECTIONS: &[(&str, &str, &str)] = &[
    ("color", "Colors", "colors"),
    ("typography", "Typography", "typography"),
    ("spacing", "Spacing", "spacing"),
    ("borderRadius", "Border Radius", "radii"),
    ("shadow", "Shadows", "shadows"),
];

/// Component properties that style an interaction state rather than the
/// base rule: property → (selector with `&` for the component, CSS property).
const STATE_PROPERTIES: &[(&str, &str, &str)] = &[
    ("hover-background", "&:hover", "background"),
    ("hover-color", "&:hover", "color"),
    ("focus-border", "&:focus", "border-color"),
    ("active-color", "&.active, &[aria-current]", "color"),
    ("active-background", "&.active, &[aria-current]", "background"),
    ("placeholder-color", "&::placeholder", "color"),
];

struct Variable {
    name: String,
    value: String,
}

struct Section {
    label: &'static str,
    map: &'static str,
    variables: Vec<Variable>,
}

/// Variables grouped by section, plus `@import`s for hosted fonts.
struct Collected {
    imports: Vec<String>,
    sections: Vec<Section>,
}

fn section_prefix(section: &str) -> String {
    match section {
        "color" => "color".to_string(),
        "spacing" => "space".to_string(),
        "borderRadius" => "radius".to_string(),
        "shadow" => "shadow".to_string(),
        other => identifier_case(other, Case::Kebab),
    }
}

/// Variable name of a token, without the `--` or `$` sigil.
pub fn variable_name(path: &TokenPath) -> String {
    let segments = path.segments();
    let Some((section, rest)) = segments.split_first() else {
        return String::new();
    };
    let (prefix, tail) = match (section.as_str(), rest.split_first()) {
        ("typography", Some((key, tail))) => {
            let prefix = match key.strip_prefix("font-family-") {
                Some(role) => format!("font-{role}"),
                None => key.clone(),
            };
            (prefix, tail)
        }
        _ => (section_prefix(section), rest),
    };
    std::iter::once(prefix)
        .chain(tail.iter().map(|s| s.replace('.', "_")))
        .collect::<Vec<_>>()
        .join("-")
}

/// The CSS text of a token value.
pub fn css_value(token: &Token) -> String {
    match &token.value {
        TokenValue::Color(hex) => hex_to_color(hex, ColorTarget::Css),
        TokenValue::Dimension(d) => dimension_to(d, Unit::Rem),
        TokenValue::FontWeight(w) => w.numeric().to_string(),
        TokenValue::FontFamily(_) | TokenValue::Number(_) | TokenValue::Shadow(_) | TokenValue::FontSource(_) => {
            token.value.raw().to_string()
        }
    }
}

fn collect(doc: &Document) -> Collected {
    let mut imports = Vec::new();
    let mut sections = Vec::new();
    for &(key, label, map) in SECTIONS {
        let Some(tree) = doc.section(key) else {
            continue;
        };
        let mut variables = Vec::new();
        for (relative, token) in tree.flatten() {
            match &token.value {
                TokenValue::FontSource(FontSource::Url(url)) => {
                    let import = format!("@import url('{url}');");
                    if !imports.contains(&import) {
                        imports.push(import);
                    }
                    continue;
                }
                TokenValue::FontSource(FontSource::System) => continue,
                _ => {}
            }
            let path = TokenPath::new(std::iter::once(key.to_string()).chain(relative.segments().iter().cloned()).collect());
            variables.push(Variable {
                name: variable_name(&path),
                value: css_value(token),
            });
        }
        if !variables.is_empty() {
            sections.push(Section { label, map, variables });
        }
    }
    Collected { imports, sections }
}

/// A component split into its base declarations and per-state rules.
struct Rule {
    name: String,
    base: Vec<(String, String)>,
    states: Vec<(&'static str, Vec<(String, String)>)>,
}

/// Whether `collect` emits a variable for the token at `path`.
fn has_variable(path: &TokenPath, token: &Token) -> bool {
    let emitted_section = path.first().is_some_and(|section| SECTIONS.iter().any(|(key, _, _)| *key == section));
    emitted_section && !matches!(token.value, TokenValue::FontSource(_))
}

/// Tokens without a variable are inlined by value.
fn component_rules(doc: &Document, sigil: &str) -> Vec<Rule> {
    let reference = |path: &TokenPath, token: &Token| {
        if !has_variable(path, token) {
            return css_value(token);
        }
        match sigil {
            "$" => format!("${}", variable_name(path)),
            _ => format!("var(--{})", variable_name(path)),
        }
    };
    doc.components()
        .iter()
        .map(|component| {
            let mut rule = Rule {
                name: identifier_case(&component.name, Case::Kebab),
                base: Vec::new(),
                states: Vec::new(),
            };
            for (property, value) in &component.properties {
                let rendered = render_property(doc, value, &reference);
                match STATE_PROPERTIES.iter().find(|(p, _, _)| *p == property.as_str()) {
                    Some(&(_, selector, css)) => {
                        let decl = (css.to_string(), rendered);
                        match rule.states.iter_mut().find(|(s, _)| *s == selector) {
                            Some((_, decls)) => decls.push(decl),
                            None => rule.states.push((selector, vec![decl])),
                        }
                    }
                    None => {
                        let css = if property == "shadow" { "box-shadow" } else { property.as_str() };
                        rule.base.push((css.to_string(), rendered));
                    }
                }
            }
            rule
        })
        .collect()
}

fn css_components(doc: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    for rule in component_rules(doc, "--") {
        let class = format!(".{}", rule.name);
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("{class} {{"));
        lines.extend(rule.base.iter().map(|(p, v)| format!("  {p}: {v};")));
        lines.push("}".to_string());
        for (selector, decls) in &rule.states {
            lines.push(String::new());
            lines.push(format!("{} {{", selector.replace('&', &class)));
            lines.extend(decls.iter().map(|(p, v)| format!("  {p}: {v};")));
            lines.push("}".to_string());
        }
    }
    lines
}

fn scss_components(doc: &Document) -> Vec<String> {
    let mut lines = Vec::new();
    for rule in component_rules(doc, "$") {
        if !lines.is_empty() {
            lines.push(String::new());
        }
        lines.push(format!("@mixin {} {{", rule.name));
        lines.extend(rule.base.iter().map(|(p, v)| format!("  {p}: {v};")));
        for (selector, decls) in &rule.states {
            lines.push(String::new());
            lines.push(format!("  {selector} {{"));
            lines.extend(decls.iter().map(|(p, v)| format!("    {p}: {v};")));
            lines.push("  }".to_string());
        }
        lines.push("}".to_string());
    }
    lines
}

/// `tokens.css`: one `:root` block of custom properties.
pub fn generate_css(doc: &Document, options: &EmitOptions) -> Artifact {
    let collected = collect(doc);
    let mut lines = vec![
        header::render(doc.meta(), options, "CSS Custom Properties", CommentStyle::Block),
        String::new(),
    ];
    if !collected.imports.is_empty() {
        lines.extend(collected.imports.iter().cloned());
        lines.push(String::new());
    }

    lines.push(":root {".to_string());
    for (i, section) in collected.sections.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format!("  /* {} */", section.label));
        lines.extend(section.variables.iter().map(|v| format!("  --{}: {};", v.name, v.value)));
    }
    lines.push("}".to_string());

    if options.css_components {
        let components = css_components(doc);
        if !components.is_empty() {
            lines.push(String::new());
            lines.extend(components);
        }
    }
    lines.push(String::new());
    Artifact::new("tokens.css", lines.join("\n"))
}

/// `_tokens.scss`: `$` variables, one map per section, optional mixins.
pub fn generate_scss(doc: &Document, options: &EmitOptions) -> Artifact {
    let collected = collect(doc);
    let mut lines = vec![
        header::render(doc.meta(), options, "SCSS", CommentStyle::Block),
        String::new(),
    ];
    if !collected.imports.is_empty() {
        lines.extend(collected.imports.iter().cloned());
        lines.push(String::new());
    }

    for section in &collected.sections {
        lines.push(format!("// {}", section.label));
        lines.extend(section.variables.iter().map(|v| format!("${}: {};", v.name, v.value)));
        lines.push(String::new());
    }

    if !collected.sections.is_empty() {
        lines.push("// Maps".to_string());
        for section in &collected.sections {
            lines.push(format!("${}: (", section.map));
            lines.extend(section.variables.iter().map(|v| format!("  \"{0}\": ${0},", v.name)));
            lines.push(");".to_string());
        }
    }

    if options.css_components {
        let components = scss_components(doc);
        if !components.is_empty() {
            lines.push(String::new());
            lines.extend(components);
        }
    }
    lines.push(String::new());
    Artifact::new("_tokens.scss", lines.join("\n"))
}
