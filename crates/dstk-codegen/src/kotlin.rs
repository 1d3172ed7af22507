//! Jetpack Compose theme: `Color.kt`, `Type.kt`, `Shape.kt`, `Theme.kt`, `Dimens.kt`.
//!
//! Material 3 typography, shape and color-scheme slots are filled from the
//! conventional token keys (`2xl`, `md`, `primary-light`, ...). A color-scheme
//! slot whose token is absent is left to the Material default.

use dstk_schema::LengthUnit;
use dstk_validator::Document;

use crate::convert::{
    font_weight_to, hex_to_color, identifier_case, prefixed, px_to_unit, safe_identifier, Case, ColorTarget,
    Language, Unit, WeightTarget,
};
use crate::header::{self, CommentStyle};
use crate::tokens::{self, Typography};
use crate::{format_number, Artifact, EmitOptions};

/// Material 3 text styles: (style, heading family?, size key, fallback sp, weight).
const TYPE_SCALE: &[(&str, bool, Option<&str>, &str, &str)] = &[
    ("displayLarge", true, Some("4xl"), "36", "FontWeight.Bold"),
    ("displayMedium", true, Some("3xl"), "30", "FontWeight.Bold"),
    ("displaySmall", true, Some("2xl"), "24", "FontWeight.Bold"),
    ("headlineLarge", true, Some("2xl"), "24", "FontWeight.SemiBold"),
    ("headlineMedium", true, Some("xl"), "20", "FontWeight.SemiBold"),
    ("headlineSmall", true, Some("lg"), "18", "FontWeight.SemiBold"),
    ("titleLarge", true, Some("lg"), "18", "FontWeight.Medium"),
    ("titleMedium", false, Some("base"), "16", "FontWeight.Medium"),
    ("titleSmall", false, Some("sm"), "14", "FontWeight.Medium"),
    ("bodyLarge", false, Some("base"), "16", "FontWeight.Normal"),
    ("bodyMedium", false, Some("sm"), "14", "FontWeight.Normal"),
    ("bodySmall", false, Some("xs"), "12", "FontWeight.Normal"),
    ("labelLarge", false, Some("sm"), "14", "FontWeight.Medium"),
    ("labelMedium", false, Some("xs"), "12", "FontWeight.Medium"),
    ("labelSmall", false, None, "11", "FontWeight.Medium"),
];

/// Material 3 shape slots: (slot, radius key, fallback dp).
const SHAPE_SCALE: &[(&str, &str, &str)] = &[
    ("extraSmall", "sm", "4"),
    ("small", "sm", "4"),
    ("medium", "md", "8"),
    ("large", "lg", "12"),
    ("extraLarge", "xl", "16"),
];

/// Material 3 color-scheme slots and the color key that fills each.
pub const COLOR_SCHEME: &[(&str, &str)] = &[
    ("primary", "primary"),
    ("primaryContainer", "primary-light"),
    ("secondary", "secondary"),
    ("tertiary", "accent"),
    ("background", "background"),
    ("surface", "surface"),
    ("onBackground", "text-primary"),
    ("onSurface", "text-primary"),
    ("onSurfaceVariant", "text-secondary"),
    ("outline", "border"),
    ("outlineVariant", "border-light"),
    ("error", "error"),
];

fn ident(name: String) -> String {
    safe_identifier(&name, Language::Kotlin)
}

fn preamble(doc: &Document, options: &EmitOptions, format: &str, imports: &[&str]) -> Vec<String> {
    let mut lines = vec![
        header::render(doc.meta(), options, format, CommentStyle::Block),
        String::new(),
        format!("package {}", options.kotlin_package),
        String::new(),
    ];
    lines.extend(imports.iter().map(|i| format!("import {i}")));
    lines.push(String::new());
    lines
}

/// Name of the Compose color value for a color key, e.g. `PrimaryLight`.
pub fn color_name(key: &str) -> String {
    ident(identifier_case(key, Case::Pascal))
}

fn color_kt(doc: &Document, options: &EmitOptions) -> Artifact {
    let mut lines = preamble(doc, options, "Jetpack Compose - Colors", &["androidx.compose.ui.graphics.Color"]);
    for (key, hex) in tokens::colors(doc) {
        lines.push(format!("val {} = {}", color_name(&key), hex_to_color(hex, ColorTarget::Compose)));
    }
    lines.push(String::new());
    Artifact::new("Color.kt", lines.join("\n"))
}

fn type_kt(doc: &Document, options: &EmitOptions) -> Artifact {
    let typography = Typography::of(doc);
    let uses_em = typography.letter_spacings.iter().any(|(_, d)| d.unit == LengthUnit::Em);
    let mut imports = vec![
        "androidx.compose.material3.Typography",
        "androidx.compose.ui.text.TextStyle",
        "androidx.compose.ui.text.font.FontFamily",
        "androidx.compose.ui.text.font.FontWeight",
    ];
    if uses_em {
        imports.push("androidx.compose.ui.unit.em");
    }
    imports.push("androidx.compose.ui.unit.sp");
    let mut lines = preamble(doc, options, "Jetpack Compose - Typography", &imports);

    for (role, stack) in &typography.families {
        let name = ident(format!("{}FontFamily", identifier_case(role, Case::Pascal)));
        let source = typography.sources.iter().find(|(r, _)| r == role).map(|(_, s)| s.raw());
        match source {
            Some("system") => lines.push(format!("val {name} = FontFamily.Default // System font, no setup needed")),
            Some(url) => {
                let resource = stack.primary().to_lowercase().replace(' ', "_");
                lines.push(format!("// Source: {url}"));
                lines.push(format!("// Download font files and place in res/font/ (e.g., {resource}_regular.ttf)"));
                lines.push("// Then replace FontFamily.Default with:".to_string());
                lines.push(format!("//   FontFamily(Font(R.font.{resource}_regular, FontWeight.Normal), ...)"));
                lines.push(format!("val {name} = FontFamily.Default"));
            }
            None => lines.push(format!("val {name} = FontFamily.Default // Replace with actual font resource")),
        }
    }
    if !typography.families.is_empty() {
        lines.push(String::new());
    }

    for (key, weight) in &typography.weights {
        lines.push(format!(
            "val {} = {}",
            ident(prefixed("font-weight", key, Case::Pascal)),
            font_weight_to(*weight, WeightTarget::Compose)
        ));
    }
    for (key, d) in &typography.letter_spacings {
        let value = match d.unit {
            LengthUnit::Em => format!("({}).em", format_number(d.magnitude)),
            LengthUnit::Px => format!("({}).sp", px_to_unit(d.magnitude, Unit::Sp)),
        };
        lines.push(format!("val {} = {value}", ident(prefixed("letter-spacing", key, Case::Pascal))));
    }
    if !typography.weights.is_empty() || !typography.letter_spacings.is_empty() {
        lines.push(String::new());
    }

    let has_role = |role: &str| typography.families.iter().any(|(r, _)| r == role);
    let heading = if has_role("heading") { "HeadingFontFamily" } else { "FontFamily.Default" };
    let body = if has_role("body") { "BodyFontFamily" } else { "FontFamily.Default" };

    lines.push("val AppTypography = Typography(".to_string());
    for (i, (style, is_heading, size_key, fallback, weight)) in TYPE_SCALE.iter().enumerate() {
        let size = size_key
            .and_then(|key| typography.size_px(key))
            .map(|px| px_to_unit(px, Unit::Sp))
            .unwrap_or_else(|| fallback.to_string());
        let comma = if i + 1 < TYPE_SCALE.len() { "," } else { "" };
        lines.push(format!("    {style} = TextStyle("));
        lines.push(format!("        fontFamily = {},", if *is_heading { heading } else { body }));
        lines.push(format!("        fontWeight = {weight},"));
        lines.push(format!("        fontSize = {size}.sp"));
        lines.push(format!("    ){comma}"));
    }
    lines.push(")".to_string());
    lines.push(String::new());
    Artifact::new("Type.kt", lines.join("\n"))
}

fn shape_kt(doc: &Document, options: &EmitOptions) -> Artifact {
    let mut lines = preamble(
        doc,
        options,
        "Jetpack Compose - Shapes",
        &[
            "androidx.compose.foundation.shape.RoundedCornerShape",
            "androidx.compose.material3.Shapes",
            "androidx.compose.ui.unit.dp",
        ],
    );
    let radii = tokens::lengths(doc, "borderRadius");
    for (key, px) in &radii {
        lines.push(format!(
            "val {} = RoundedCornerShape({}.dp)",
            ident(prefixed("radius", key, Case::Pascal)),
            px_to_unit(*px, Unit::Dp)
        ));
    }
    if !radii.is_empty() {
        lines.push(String::new());
    }

    lines.push("val AppShapes = Shapes(".to_string());
    for (i, (slot, key, fallback)) in SHAPE_SCALE.iter().enumerate() {
        let dp = radii
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, px)| px_to_unit(*px, Unit::Dp))
            .unwrap_or_else(|| fallback.to_string());
        let comma = if i + 1 < SHAPE_SCALE.len() { "," } else { "" };
        lines.push(format!("    {slot} = RoundedCornerShape({dp}.dp){comma}"));
    }
    lines.push(")".to_string());
    lines.push(String::new());
    Artifact::new("Shape.kt", lines.join("\n"))
}

fn theme_kt(doc: &Document, options: &EmitOptions) -> Artifact {
    let mut lines = preamble(
        doc,
        options,
        "Jetpack Compose - Theme",
        &[
            "androidx.compose.material3.MaterialTheme",
            "androidx.compose.material3.lightColorScheme",
            "androidx.compose.runtime.Composable",
        ],
    );
    let colors = tokens::colors(doc);
    let entries: Vec<String> = COLOR_SCHEME
        .iter()
        .filter(|(_, key)| colors.iter().any(|(k, _)| k == key))
        .map(|(slot, key)| format!("    {slot} = {}", color_name(key)))
        .collect();
    if entries.is_empty() {
        lines.push("private val LightColorScheme = lightColorScheme()".to_string());
    } else {
        lines.push("private val LightColorScheme = lightColorScheme(".to_string());
        lines.push(entries.join(",\n"));
        lines.push(")".to_string());
    }
    lines.push(String::new());
    lines.extend(
        [
            "@Composable",
            "fun AppTheme(content: @Composable () -> Unit) {",
            "    MaterialTheme(",
            "        colorScheme = LightColorScheme,",
            "        typography = AppTypography,",
            "        shapes = AppShapes,",
            "        content = content",
            "    )",
            "}",
            "",
        ]
        .map(String::from),
    );
    Artifact::new("Theme.kt", lines.join("\n"))
}

fn dimens_kt(doc: &Document, options: &EmitOptions) -> Artifact {
    let mut lines = preamble(doc, options, "Jetpack Compose - Dimensions", &["androidx.compose.ui.unit.dp"]);
    lines.push("object Dimens {".to_string());
    lines.push("    // Spacing".to_string());
    for (key, px) in tokens::lengths(doc, "spacing") {
        lines.push(format!("    val {} = {}.dp", ident(prefixed("space", &key, Case::Camel)), px_to_unit(px, Unit::Dp)));
    }
    lines.push(String::new());
    lines.push("    // Border Radius".to_string());
    for (key, px) in tokens::lengths(doc, "borderRadius") {
        lines.push(format!("    val {} = {}.dp", ident(prefixed("radius", &key, Case::Camel)), px_to_unit(px, Unit::Dp)));
    }
    lines.push("}".to_string());
    lines.push(String::new());
    Artifact::new("Dimens.kt", lines.join("\n"))
}

/// All five Compose files.
pub fn generate(doc: &Document, options: &EmitOptions) -> Vec<Artifact> {
    vec![
        color_kt(doc, options),
        type_kt(doc, options),
        shape_kt(doc, options),
        theme_kt(doc, options),
        dimens_kt(doc, options),
    ]
}
