//! Flutter `design_tokens.dart`.

use dstk_schema::{LengthUnit, ShadowLayer};
use dstk_validator::Document;

use crate::convert::{
    font_weight_to, hex_to_color, identifier_case, prefixed, px_to_unit, safe_identifier, Case, ColorTarget,
    Language, Unit, WeightTarget,
};
use crate::header::{self, CommentStyle};
use crate::tokens::{self, line_height, Typography};
use crate::{format_number, Artifact, EmitOptions};

fn ident(name: String) -> String {
    safe_identifier(&name, Language::Dart)
}

fn dart_string(text: &str) -> String {
    format!("'{}'", text.replace('\\', "\\\\").replace('\'', "\\'").replace('$', "\\$"))
}

fn box_shadow(layer: &ShadowLayer) -> String {
    let c = &layer.color;
    format!(
        "BoxShadow(color: Color.fromRGBO({}, {}, {}, {}), offset: Offset({}, {}), blurRadius: {}, spreadRadius: {})",
        c.r,
        c.g,
        c.b,
        format_number(c.a),
        format_number(layer.x),
        format_number(layer.y),
        format_number(layer.blur),
        format_number(layer.spread)
    )
}

/// `class Name { Name._(); ...members }`
fn class(name: &str, members: Vec<String>) -> Vec<String> {
    let mut lines = vec![format!("class {name} {{"), format!("  {name}._();")];
    if !members.is_empty() {
        lines.push(String::new());
        lines.extend(members.into_iter().map(|m| format!("  {m}")));
    }
    lines.push("}".to_string());
    lines
}

fn typography_members(typography: &Typography) -> Vec<String> {
    let mut members = Vec::new();
    for (role, stack) in &typography.families {
        members.push(format!(
            "static const String {} = {};",
            ident(prefixed("font-family", role, Case::Camel)),
            dart_string(stack.primary())
        ));
    }
    for (key, d) in &typography.sizes {
        if d.is_px() {
            members.push(format!(
                "static const double {} = {};",
                ident(prefixed("font-size", key, Case::Camel)),
                px_to_unit(d.magnitude, Unit::Px)
            ));
        }
    }
    for (key, weight) in &typography.weights {
        members.push(format!(
            "static const FontWeight {} = {};",
            ident(prefixed("font-weight", key, Case::Camel)),
            font_weight_to(*weight, WeightTarget::Flutter)
        ));
    }
    for (key, value) in &typography.line_heights {
        members.push(format!(
            "static const double {} = {};",
            ident(prefixed("line-height", key, Case::Camel)),
            line_height(value, Unit::Px)
        ));
    }
    for (key, d) in &typography.letter_spacings {
        let (value, unit) = match d.unit {
            LengthUnit::Em => (format_number(d.magnitude), "em"),
            LengthUnit::Px => (px_to_unit(d.magnitude, Unit::Px), "px"),
        };
        members.push(format!(
            "static const double {} = {value}; // {unit}",
            ident(prefixed("letter-spacing", key, Case::Camel))
        ));
    }
    members
}

/// `design_tokens.dart` with one class per section.
pub fn generate(doc: &Document, options: &EmitOptions) -> Artifact {
    let typography = Typography::of(doc);
    let mut lines = vec![
        header::render(doc.meta(), options, "Flutter", CommentStyle::Line),
        String::new(),
        "import 'package:flutter/material.dart';".to_string(),
        String::new(),
    ];

    let colors: Vec<String> = tokens::colors(doc)
        .into_iter()
        .map(|(key, hex)| {
            format!(
                "static const Color {} = {};",
                ident(identifier_case(&key, Case::Camel)),
                hex_to_color(hex, ColorTarget::Flutter)
            )
        })
        .collect();
    let spacing: Vec<String> = tokens::lengths(doc, "spacing")
        .into_iter()
        .map(|(key, px)| format!("static const double {} = {};", ident(prefixed("space", &key, Case::Camel)), px_to_unit(px, Unit::Px)))
        .collect();
    let radii: Vec<String> = tokens::lengths(doc, "borderRadius")
        .into_iter()
        .map(|(key, px)| format!("static const double {} = {};", ident(identifier_case(&key, Case::Camel)), px_to_unit(px, Unit::Px)))
        .collect();
    let shadows: Vec<String> = tokens::shadows(doc)
        .into_iter()
        .map(|(key, shadow)| {
            // Flutter has no inset box shadows.
            let layers: Vec<String> = shadow.layers.iter().filter(|l| !l.inset).map(box_shadow).collect();
            format!(
                "static const List<BoxShadow> {} = [{}];",
                ident(identifier_case(&key, Case::Camel)),
                layers.join(", ")
            )
        })
        .collect();

    let classes = [
        ("AppColors", colors),
        ("AppTypography", typography_members(&typography)),
        ("AppSpacing", spacing),
        ("AppRadius", radii),
        ("AppShadows", shadows),
    ];
    for (i, (name, members)) in classes.into_iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.extend(class(name, members));
    }
    lines.push(String::new());
    Artifact::new("design_tokens.dart", lines.join("\n"))
}
