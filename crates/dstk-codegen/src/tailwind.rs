//! Tailwind CSS `theme.extend` configuration.

use dstk_schema::TokenValue;
use dstk_validator::{Document, TokenTree};

use crate::convert::js_string;
use crate::css::css_value;
use crate::header::{self, CommentStyle};
use crate::{Artifact, EmitOptions};

/// Typography groups and the theme key each extends.
const TYPOGRAPHY_GROUPS: &[(&str, &str)] = &[
    ("font-size", "fontSize"),
    ("font-weight", "fontWeight"),
    ("line-height", "lineHeight"),
    ("letter-spacing", "letterSpacing"),
];

/// Flat sections and the theme key each extends.
const SCALE_SECTIONS: &[(&str, &str)] = &[
    ("spacing", "spacing"),
    ("borderRadius", "borderRadius"),
    ("shadow", "boxShadow"),
];

/// Every token below `tree` as `'key': 'value'`, nested keys joined by `-`.
fn scale(tree: &TokenTree) -> Vec<(String, String)> {
    tree.flatten()
        .into_iter()
        .map(|(path, token)| (path.segments().join("-"), js_string(&css_value(token))))
        .collect()
}

fn theme(doc: &Document) -> Vec<(&'static str, Vec<(String, String)>)> {
    let mut groups = Vec::new();

    if let Some(color) = doc.section("color") {
        groups.push(("colors", scale(color)));
    }

    if let Some(typography) = doc.section("typography") {
        let families = typography
            .tokens()
            .filter_map(|(key, token)| match &token.value {
                TokenValue::FontFamily(stack) => {
                    let role = key.strip_prefix("font-family-").unwrap_or(key);
                    let list: Vec<String> = stack.families.iter().map(|f| js_string(f)).collect();
                    Some((role.to_string(), format!("[{}]", list.join(", "))))
                }
                _ => None,
            })
            .collect();
        groups.push(("fontFamily", families));
        for &(group, key) in TYPOGRAPHY_GROUPS {
            if let Some(tree) = typography.get(group) {
                groups.push((key, scale(tree)));
            }
        }
    }

    for &(section, key) in SCALE_SECTIONS {
        if let Some(tree) = doc.section(section) {
            groups.push((key, scale(tree)));
        }
    }

    groups.retain(|(_, entries)| !entries.is_empty());
    groups
}

/// `tailwind.config.js`.
pub fn generate(doc: &Document, options: &EmitOptions) -> Artifact {
    let mut out = header::render(doc.meta(), options, "Tailwind CSS", CommentStyle::Block);
    out.push_str("\n\n/** @type {import('tailwindcss').Config} */\n");
    out.push_str("module.exports = {\n  theme: {\n    extend: {\n");
    for (key, entries) in theme(doc) {
        out.push_str(&format!("      {key}: {{\n"));
        for (name, value) in entries {
            out.push_str(&format!("        {}: {value},\n", js_string(&name)));
        }
        out.push_str("      },\n");
    }
    out.push_str("    },\n  },\n};\n");
    Artifact::new("tailwind.config.js", out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture;

    fn config() -> String {
        generate(&fixture::doc(), &fixture::options()).content
    }

    #[test]
    fn test_filename_and_shape() {
        let artifact = generate(&fixture::doc(), &fixture::options());
        assert_eq!(artifact.filename, "tailwind.config.js");
        assert!(artifact.content.contains(" * Format: Tailwind CSS\n */\n\n/** @type"));
        assert!(artifact.content.contains("module.exports = {\n  theme: {\n    extend: {\n      colors: {\n"));
        assert!(artifact.content.ends_with("    },\n  },\n};\n"));
    }

    #[test]
    fn test_colors_and_scales() {
        let config = config();
        assert!(config.contains("        'primary-light': '#3B82F6',\n"));
        assert!(config.contains("      spacing: {\n        '0': '0',\n        '0.5': '0.125rem',\n        '4': '1rem',\n      },\n"));
        assert!(config.contains("        'full': '9999px',\n"));
        assert!(config.contains("        'sm': '0 1px 2px 0 rgba(0, 0, 0, 0.05)',\n"));
    }

    #[test]
    fn test_typography() {
        let config = config();
        assert!(config.contains("        'heading': ['Inter', 'sans-serif'],\n"));
        assert!(config.contains("        'body': ['Inter', 'system-ui', 'sans-serif'],\n"));
        assert!(config.contains("      fontSize: {\n        'sm': '0.875rem',\n"));
        assert!(config.contains("        'semibold': '600',\n"));
        assert!(config.contains("        'tight': '-0.025em',\n"));
        assert!(!config.contains("font-source"));
        assert!(!config.contains("googleapis"));
    }
}
