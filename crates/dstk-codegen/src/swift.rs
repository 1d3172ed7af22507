//! SwiftUI `DesignTokens.swift` and UIKit `Theme.swift`.

use dstk_schema::{Rgba, ShadowLayer};
use dstk_validator::Document;

use crate::convert::{
    dimension_to, font_weight_to, hex_to_color, identifier_case, prefixed, px_to_unit, safe_identifier, Case,
    ColorTarget, Language, Unit, WeightTarget,
};
use crate::header::{self, CommentStyle};
use crate::tokens::{self, line_height, Typography};
use crate::{format_number, Artifact, EmitOptions};

const COLOR_HEX_EXTENSION: &str = r#"extension Color {
    init(hex: String) {
        let hex = hex.trimmingCharacters(in: CharacterSet.alphanumerics.inverted)
        var int: UInt64 = 0
        Scanner(string: hex).scanHexInt64(&int)
        let r = Double((int >> 16) & 0xFF) / 255.0
        let g = Double((int >> 8) & 0xFF) / 255.0
        let b = Double(int & 0xFF) / 255.0
        self.init(red: r, green: g, blue: b)
    }
}"#;

const UICOLOR_HEX_EXTENSION: &str = r#"extension UIColor {
    convenience init(hex: String) {
        let hex = hex.trimmingCharacters(in: CharacterSet.alphanumerics.inverted)
        var int: UInt64 = 0
        Scanner(string: hex).scanHexInt64(&int)
        let r = CGFloat((int >> 16) & 0xFF) / 255.0
        let g = CGFloat((int >> 8) & 0xFF) / 255.0
        let b = CGFloat(int & 0xFF) / 255.0
        self.init(red: r, green: g, blue: b, alpha: 1.0)
    }
}"#;

const SHADOW_MODIFIER: &str = r#"struct DSShadowModifier: ViewModifier {
    let shadow: DSShadow

    func body(content: Content) -> some View {
        content.shadow(color: shadow.color, radius: shadow.radius, x: shadow.x, y: shadow.y)
    }
}

extension View {
    func dsShadow(_ shadow: DSShadow) -> some View {
        modifier(DSShadowModifier(shadow: shadow))
    }
}"#;

fn ident(name: String) -> String {
    safe_identifier(&name, Language::Swift)
}

fn swift_rgba(color: &Rgba) -> String {
    format!(
        "Color(.sRGB, red: {}/255, green: {}/255, blue: {}/255, opacity: {})",
        color.r,
        color.g,
        color.b,
        format_number(color.a)
    )
}

fn swiftui_shadow(layer: Option<&ShadowLayer>) -> [String; 4] {
    match layer {
        Some(layer) => [
            swift_rgba(&layer.color),
            format_number(layer.blur),
            format_number(layer.x),
            format_number(layer.y),
        ],
        None => [".clear".to_string(), "0".to_string(), "0".to_string(), "0".to_string()],
    }
}

/// Comment block telling the reader which fonts must be bundled.
fn font_registration(typography: &Typography, indent: &str) -> Vec<String> {
    let hosted = typography.hosted_fonts();
    if hosted.is_empty() {
        return Vec::new();
    }
    let mut lines = vec![
        format!("{indent}// To use custom fonts, download the font files and add them to your Xcode project."),
        format!("{indent}// Register each font file in Info.plist under the \"UIAppFonts\" key."),
        format!("{indent}//"),
    ];
    for (_, family, url) in hosted {
        lines.push(format!("{indent}// Font: {family}"));
        lines.push(format!("{indent}//   Source: {url}"));
        lines.push(format!(
            "{indent}//   Add to Info.plist UIAppFonts: \"{family}-Regular.ttf\", \"{family}-Bold.ttf\", etc."
        ));
    }
    let system = typography.system_fonts();
    if !system.is_empty() {
        lines.push(format!("{indent}//"));
        for role in system {
            lines.push(format!("{indent}// Font: {role} - system font, no registration needed"));
        }
    }
    lines
}

/// Typography constants shared by both flavors, one per line without indent.
fn typography_constants(typography: &Typography, size_prefix: &str, weight_prefix: &str, weight_type: &str) -> Vec<Vec<String>> {
    let families = typography
        .families
        .iter()
        .map(|(role, stack)| format!("static let {} = \"{}\"", ident(prefixed("font-family", role, Case::Camel)), stack.primary()))
        .collect();
    let sizes = typography
        .sizes
        .iter()
        .map(|(key, d)| format!("static let {}: CGFloat = {}", ident(prefixed(size_prefix, key, Case::Camel)), dimension_to(d, Unit::Pt)))
        .collect();
    let weights = typography
        .weights
        .iter()
        .map(|(key, w)| {
            format!(
                "static let {}: {weight_type} = {}",
                ident(prefixed(weight_prefix, key, Case::Camel)),
                font_weight_to(*w, WeightTarget::Swift)
            )
        })
        .collect();
    let line_heights = typography
        .line_heights
        .iter()
        .map(|(key, value)| format!("static let {}: CGFloat = {}", ident(prefixed("line-height", key, Case::Camel)), line_height(value, Unit::Pt)))
        .collect();
    let letter_spacings = typography
        .letter_spacings
        .iter()
        .map(|(key, d)| {
            let unit = if d.is_px() { "pt" } else { "em" };
            format!(
                "static let {}: CGFloat = {} // {unit}",
                ident(prefixed("letter-spacing", key, Case::Camel)),
                dimension_to(d, Unit::Pt)
            )
        })
        .collect();
    vec![families, sizes, weights, line_heights, letter_spacings]
}

/// Push indented groups separated by blank lines, skipping empty groups.
fn push_groups(lines: &mut Vec<String>, groups: Vec<Vec<String>>, indent: &str) {
    let mut first = true;
    for group in groups.into_iter().filter(|g| !g.is_empty()) {
        if !first {
            lines.push(String::new());
        }
        first = false;
        lines.extend(group.into_iter().map(|line| format!("{indent}{line}")));
    }
}

/// `DesignTokens.swift` for SwiftUI.
pub fn generate_swiftui(doc: &Document, options: &EmitOptions) -> Artifact {
    let typography = Typography::of(doc);
    let mut lines = vec![
        header::render(doc.meta(), options, "SwiftUI", CommentStyle::Line),
        String::new(),
        "import SwiftUI".to_string(),
        String::new(),
        "// MARK: - Color Hex Extension".to_string(),
        String::new(),
        COLOR_HEX_EXTENSION.to_string(),
        String::new(),
        "// MARK: - Colors".to_string(),
        String::new(),
        "struct DSColors {".to_string(),
    ];
    for (key, hex) in tokens::colors(doc) {
        lines.push(format!(
            "    static let {} = {}",
            ident(identifier_case(&key, Case::Camel)),
            hex_to_color(hex, ColorTarget::SwiftUi)
        ));
    }
    lines.extend(["}".to_string(), String::new()]);

    lines.extend(["// MARK: - Typography".to_string(), String::new(), "struct DSTypography {".to_string()]);
    let mut groups = typography_constants(&typography, "font-size", "font-weight", "Font.Weight");
    groups.push(
        typography
            .families
            .iter()
            .flat_map(|(role, stack)| {
                [
                    format!(
                        "static func {}(_ size: CGFloat, weight: Font.Weight = .regular) -> Font {{",
                        ident(identifier_case(role, Case::Camel))
                    ),
                    format!("    .custom(\"{}\", size: size).weight(weight)", stack.primary()),
                    "}".to_string(),
                ]
            })
            .collect(),
    );
    push_groups(&mut lines, groups, "    ");
    lines.extend(["}".to_string(), String::new()]);

    let registration = font_registration(&typography, "");
    if !registration.is_empty() {
        lines.extend(["// MARK: - Font Registration".to_string(), String::new()]);
        lines.extend(registration);
        lines.push(String::new());
    }

    lines.extend(["// MARK: - Spacing".to_string(), String::new(), "enum DSSpacing {".to_string()]);
    for (key, px) in tokens::lengths(doc, "spacing") {
        lines.push(format!("    static let {}: CGFloat = {}", ident(prefixed("space", &key, Case::Camel)), px_to_unit(px, Unit::Pt)));
    }
    lines.extend(["}".to_string(), String::new()]);

    lines.extend(["// MARK: - Border Radius".to_string(), String::new(), "enum DSRadius {".to_string()]);
    for (key, px) in tokens::lengths(doc, "borderRadius") {
        lines.push(format!("    static let {}: CGFloat = {}", ident(identifier_case(&key, Case::Camel)), px_to_unit(px, Unit::Pt)));
    }
    lines.extend(["}".to_string(), String::new()]);

    lines.extend([
        "// MARK: - Shadows".to_string(),
        String::new(),
        "struct DSShadow {".to_string(),
        "    let color: Color".to_string(),
        "    let radius: CGFloat".to_string(),
        "    let x: CGFloat".to_string(),
        "    let y: CGFloat".to_string(),
    ]);
    for (key, shadow) in tokens::shadows(doc) {
        let [color, radius, x, y] = swiftui_shadow(shadow.primary());
        lines.push(String::new());
        lines.push(format!("    static let {} = DSShadow(", ident(identifier_case(&key, Case::Camel))));
        lines.push(format!("        color: {color},"));
        lines.push(format!("        radius: {radius},"));
        lines.push(format!("        x: {x},"));
        lines.push(format!("        y: {y}"));
        lines.push("    )".to_string());
    }
    lines.extend(["}".to_string(), String::new()]);

    lines.extend([
        "// MARK: - Shadow ViewModifier".to_string(),
        String::new(),
        SHADOW_MODIFIER.to_string(),
        String::new(),
    ]);
    Artifact::new("DesignTokens.swift", lines.join("\n"))
}

/// `Theme.swift` for UIKit.
pub fn generate_uikit(doc: &Document, options: &EmitOptions) -> Artifact {
    let typography = Typography::of(doc);
    let mut lines = vec![
        header::render(doc.meta(), options, "UIKit", CommentStyle::Line),
        String::new(),
        "import UIKit".to_string(),
        String::new(),
        "// MARK: - UIColor Hex Extension".to_string(),
        String::new(),
        UICOLOR_HEX_EXTENSION.to_string(),
        String::new(),
        "// MARK: - Theme".to_string(),
        String::new(),
        "enum Theme {".to_string(),
        String::new(),
        "    // MARK: Colors".to_string(),
        String::new(),
        "    enum Colors {".to_string(),
    ];
    for (key, hex) in tokens::colors(doc) {
        lines.push(format!(
            "        static let {} = {}",
            ident(identifier_case(&key, Case::Camel)),
            hex_to_color(hex, ColorTarget::UiKit)
        ));
    }
    lines.extend(["    }".to_string(), String::new()]);

    lines.extend(["    // MARK: Fonts".to_string(), String::new(), "    enum Fonts {".to_string()]);
    let mut groups = typography_constants(&typography, "size", "weight", "UIFont.Weight");
    groups.push(
        typography
            .families
            .iter()
            .flat_map(|(role, stack)| {
                [
                    format!(
                        "static func {}(_ size: CGFloat, weight: UIFont.Weight = .regular) -> UIFont {{",
                        ident(identifier_case(role, Case::Camel))
                    ),
                    format!("    if let font = UIFont(name: \"{}\", size: size) {{", stack.primary()),
                    "        return font".to_string(),
                    "    }".to_string(),
                    "    return UIFont.systemFont(ofSize: size, weight: weight)".to_string(),
                    "}".to_string(),
                ]
            })
            .collect(),
    );
    push_groups(&mut lines, groups, "        ");
    lines.extend(["    }".to_string(), String::new()]);

    let registration = font_registration(&typography, "    ");
    if !registration.is_empty() {
        lines.extend(["    // MARK: Font Registration".to_string(), String::new()]);
        lines.extend(registration);
        lines.push(String::new());
    }

    lines.extend(["    // MARK: Spacing".to_string(), String::new(), "    enum Spacing {".to_string()]);
    for (key, px) in tokens::lengths(doc, "spacing") {
        lines.push(format!("        static let {}: CGFloat = {}", ident(prefixed("space", &key, Case::Camel)), px_to_unit(px, Unit::Pt)));
    }
    lines.extend(["    }".to_string(), String::new()]);

    lines.extend(["    // MARK: Radius".to_string(), String::new(), "    enum Radius {".to_string()]);
    for (key, px) in tokens::lengths(doc, "borderRadius") {
        lines.push(format!("        static let {}: CGFloat = {}", ident(identifier_case(&key, Case::Camel)), px_to_unit(px, Unit::Pt)));
    }
    lines.extend(["    }".to_string(), "}".to_string(), String::new()]);
    Artifact::new("Theme.swift", lines.join("\n"))
}
