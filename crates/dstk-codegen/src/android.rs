//! Android XML resources: `colors.xml`, `dimens.xml`, `styles.xml`, `themes.xml`.

use dstk_validator::Document;

use crate::convert::{hex_to_color, identifier_case, prefixed, px_to_unit, Case, ColorTarget, Unit};
use crate::header::{self, CommentStyle};
use crate::tokens::{self, Typography};
use crate::{Artifact, EmitOptions};

/// Text appearances: (style, size key, fallback sp, textStyle).
const TEXT_APPEARANCES: &[(&str, &str, &str, &str)] = &[
    ("TextAppearance.Heading.Large", "3xl", "30", "bold"),
    ("TextAppearance.Heading.Medium", "2xl", "24", "bold"),
    ("TextAppearance.Heading.Small", "xl", "20", "bold"),
    ("TextAppearance.Body.Large", "base", "16", "normal"),
    ("TextAppearance.Body.Medium", "sm", "14", "normal"),
    ("TextAppearance.Body.Small", "xs", "12", "normal"),
    ("TextAppearance.Label.Large", "sm", "14", "bold"),
    ("TextAppearance.Label.Medium", "xs", "12", "bold"),
];

/// Theme attributes grouped under a comment: (attribute, color key).
const THEME_GROUPS: &[(&str, &[(&str, &str)])] = &[
    ("Primary", &[("colorPrimary", "primary"), ("colorPrimaryContainer", "primary-light")]),
    ("Secondary", &[("colorSecondary", "secondary")]),
    ("Tertiary", &[("colorTertiary", "accent")]),
    (
        "Background and Surface",
        &[
            ("android:colorBackground", "background"),
            ("colorSurface", "surface"),
            ("colorOnBackground", "text-primary"),
            ("colorOnSurface", "text-primary"),
            ("colorOnSurfaceVariant", "text-secondary"),
        ],
    ),
    ("Outline", &[("colorOutline", "border"), ("colorOutlineVariant", "border-light")]),
    ("Error", &[("colorError", "error")]),
];

/// Resource name of a color key, e.g. `primary_light`. Names must start
/// with a letter, so `50` becomes `color_50`.
pub fn resource_name(key: &str) -> String {
    let name = identifier_case(key, Case::Snake);
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        prefixed("color", key, Case::Snake)
    } else {
        name
    }
}

fn comment(text: &str) -> String {
    text.replace("--", "- -")
}

fn resources(doc: &Document, options: &EmitOptions, format: &str, body: Vec<String>) -> String {
    let mut lines = vec![header::render(doc.meta(), options, format, CommentStyle::Xml), "<resources>".to_string()];
    lines.extend(body);
    lines.push("</resources>".to_string());
    lines.push(String::new());
    lines.join("\n")
}

fn colors_xml(doc: &Document, options: &EmitOptions) -> Artifact {
    let body = tokens::colors(doc)
        .into_iter()
        .map(|(key, hex)| {
            format!(
                "    <color name=\"{}\">{}</color>",
                resource_name(&key),
                hex_to_color(hex, ColorTarget::AndroidXml)
            )
        })
        .collect();
    Artifact::new("colors.xml", resources(doc, options, "Android XML - Colors", body))
}

fn dimens_xml(doc: &Document, options: &EmitOptions) -> Artifact {
    let typography = Typography::of(doc);
    let mut body = vec!["    <!-- Spacing -->".to_string()];
    for (key, px) in tokens::lengths(doc, "spacing") {
        body.push(format!("    <dimen name=\"{}\">{}dp</dimen>", prefixed("space", &key, Case::Snake), px_to_unit(px, Unit::Dp)));
    }
    body.push(String::new());
    body.push("    <!-- Border Radius -->".to_string());
    for (key, px) in tokens::lengths(doc, "borderRadius") {
        body.push(format!("    <dimen name=\"{}\">{}dp</dimen>", prefixed("radius", &key, Case::Snake), px_to_unit(px, Unit::Dp)));
    }
    body.push(String::new());
    body.push("    <!-- Font Sizes -->".to_string());
    for (key, d) in &typography.sizes {
        if d.is_px() {
            body.push(format!(
                "    <dimen name=\"{}\">{}sp</dimen>",
                prefixed("font-size", key, Case::Snake),
                px_to_unit(d.magnitude, Unit::Sp)
            ));
        }
    }
    Artifact::new("dimens.xml", resources(doc, options, "Android XML - Dimensions", body))
}

fn style(name: &str, parent: &str, items: &[(&str, String)]) -> Vec<String> {
    let mut lines = vec![format!("    <style name=\"{name}\" parent=\"{parent}\">")];
    lines.extend(items.iter().map(|(item, value)| format!("        <item name=\"{item}\">{value}</item>")));
    lines.push("    </style>".to_string());
    lines
}

fn styles_xml(doc: &Document, options: &EmitOptions) -> Artifact {
    let typography = Typography::of(doc);
    let colors = tokens::colors(doc);
    let has_color = |key: &str| colors.iter().any(|(k, _)| k == key);
    let radii = tokens::lengths(doc, "borderRadius");
    let has_radius = |key: &str| radii.iter().any(|(k, _)| k == key);
    let spacing = tokens::lengths(doc, "spacing");
    let has_space = |key: &str| spacing.iter().any(|(k, _)| k == key);

    let mut body = Vec::new();
    let hosted = typography.hosted_fonts();
    if !hosted.is_empty() {
        body.push("    <!-- Font Sources -->".to_string());
        for (_, family, url) in hosted {
            body.push(format!("    <!-- {}: {} -->", comment(family), comment(url)));
            body.push("    <!-- Download .ttf files and place in res/font/ -->".to_string());
        }
        body.push(String::new());
    }

    for (name, key, fallback, text_style) in TEXT_APPEARANCES {
        let size = typography
            .size_px(key)
            .map(|px| px_to_unit(px, Unit::Sp))
            .unwrap_or_else(|| fallback.to_string());
        body.extend(style(
            name,
            "TextAppearance.Material3.BodyMedium",
            &[("android:textSize", format!("{size}sp")), ("android:textStyle", text_style.to_string())],
        ));
        body.push(String::new());
    }

    let mut button = Vec::new();
    if has_color("primary") {
        button.push(("backgroundTint", "@color/primary".to_string()));
    }
    if has_radius("md") {
        button.push(("cornerRadius", "@dimen/radius_md".to_string()));
    }
    if !button.is_empty() {
        body.extend(style("Widget.App.Button.Primary", "Widget.Material3.Button", &button));
        body.push(String::new());
    }

    let mut card = Vec::new();
    if has_radius("lg") {
        card.push(("cardCornerRadius", "@dimen/radius_lg".to_string()));
    }
    if has_space("6") {
        card.push(("contentPadding", "@dimen/space_6".to_string()));
    }
    if !card.is_empty() {
        body.extend(style("Widget.App.Card", "Widget.Material3.CardView.Elevated", &card));
    }
    while body.last().is_some_and(String::is_empty) {
        body.pop();
    }
    Artifact::new("styles.xml", resources(doc, options, "Android XML - Styles", body))
}

fn themes_xml(doc: &Document, options: &EmitOptions) -> Artifact {
    let colors = tokens::colors(doc);
    let has_color = |key: &str| colors.iter().any(|(k, _)| k == key);

    let mut body = vec![
        String::new(),
        "    <style name=\"Theme.App\" parent=\"Theme.Material3.Light.NoActionBar\">".to_string(),
    ];
    let mut first = true;
    for (label, attributes) in THEME_GROUPS {
        let mut items: Vec<String> = attributes
            .iter()
            .filter(|(_, key)| has_color(key))
            .map(|(attribute, key)| format!("        <item name=\"{attribute}\">@color/{}</item>", resource_name(key)))
            .collect();
        if *label == "Primary" && has_color("primary") {
            items.insert(1, "        <item name=\"colorOnPrimary\">#FFFFFF</item>".to_string());
        }
        if items.is_empty() {
            continue;
        }
        if !first {
            body.push(String::new());
        }
        first = false;
        body.push(format!("        <!-- {label} -->"));
        body.extend(items);
    }
    body.push("    </style>".to_string());
    body.push(String::new());
    Artifact::new("themes.xml", resources(doc, options, "Android XML - Theme", body))
}

/// All four resource files.
pub fn generate(doc: &Document, options: &EmitOptions) -> Vec<Artifact> {
    vec![
        colors_xml(doc, options),
        dimens_xml(doc, options),
        styles_xml(doc, options),
        themes_xml(doc, options),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::{self, file};
    use pretty_assertions::assert_eq;

    fn xml() -> Vec<Artifact> {
        generate(&fixture::doc(), &fixture::options())
    }

    #[test]
    fn test_file_set() {
        let names: Vec<String> = xml().into_iter().map(|a| a.filename).collect();
        assert_eq!(names, vec!["colors.xml", "dimens.xml", "styles.xml", "themes.xml"]);
    }

    #[test]
    fn test_header_is_first_line() {
        for artifact in xml() {
            assert!(artifact.content.starts_with("<!-- Acme Design\n"), "{}", artifact.filename);
            assert!(artifact.content.contains("-->\n<resources>\n"));
            assert!(artifact.content.ends_with("</resources>\n"));
        }
    }

    #[test]
    fn test_colors() {
        let xml = file(&xml(), "colors.xml");
        assert!(xml.contains("    <color name=\"primary\">#FF2563EB</color>\n"));
        assert!(xml.contains("    <color name=\"primary_light\">#FF3B82F6</color>\n"));
        assert!(xml.contains("    <color name=\"text_primary\">#FF111827</color>\n"));
    }

    #[test]
    fn test_numeric_color_key_gets_a_letter_prefix() {
        assert_eq!(resource_name("2xl"), "color_2xl");
        assert_eq!(resource_name("gray-50"), "gray_50");

        let source = fixture::TOKENS
            .replace("\"background\": {\"value\"", "\"50\": {\"value\"")
            .replace("{color.background}", "{color.50}");
        let doc = dstk_validator::conform(&dstk_schema::Node::parse(&source).unwrap()).unwrap();
        let xml = file(&generate(&doc, &fixture::options()), "colors.xml");
        assert!(xml.contains("    <color name=\"color_50\">#FFFFFFFF</color>\n"));
    }

    #[test]
    fn test_dimens() {
        let xml = file(&xml(), "dimens.xml");
        assert!(xml.contains("    <dimen name=\"space_4\">16dp</dimen>\n"));
        assert!(xml.contains("    <dimen name=\"space_0_5\">2dp</dimen>\n"));
        assert!(xml.contains("    <dimen name=\"radius_full\">9999dp</dimen>\n"));
        assert!(xml.contains("    <dimen name=\"font_size_2xl\">24sp</dimen>\n"));
    }

    #[test]
    fn test_styles() {
        let xml = file(&xml(), "styles.xml");
        assert!(xml.contains("    <!-- Inter: https://fonts.googleapis.com/css2?family=Inter -->\n"));
        assert!(xml.contains(
            "    <style name=\"TextAppearance.Heading.Medium\" parent=\"TextAppearance.Material3.BodyMedium\">\n        <item name=\"android:textSize\">24sp</item>\n        <item name=\"android:textStyle\">bold</item>\n    </style>\n"
        ));
        assert!(xml.contains("        <item name=\"backgroundTint\">@color/primary</item>\n        <item name=\"cornerRadius\">@dimen/radius_md</item>\n"));
        assert!(!xml.contains("Widget.App.Card"));
    }

    #[test]
    fn test_theme_only_maps_present_colors() {
        let xml = file(&xml(), "themes.xml");
        assert!(xml.contains(
            "        <!-- Primary -->\n        <item name=\"colorPrimary\">@color/primary</item>\n        <item name=\"colorOnPrimary\">#FFFFFF</item>\n        <item name=\"colorPrimaryContainer\">@color/primary_light</item>\n\n        <!-- Background and Surface -->\n"
        ));
        assert!(xml.contains("        <item name=\"colorOnSurface\">@color/text_primary</item>\n    </style>\n"));
        assert!(!xml.contains("@color/secondary"));
        assert!(!xml.contains("@color/error"));
    }
}
