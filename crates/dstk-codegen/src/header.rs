//! Provenance header shared by every emitted file.

use dstk_validator::Meta;

use crate::EmitOptions;

/// Comment syntax of the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    /// `/* ... */` (CSS, SCSS, JS/TS, Kotlin)
    Block,
    /// `// ...` (Swift, Dart)
    Line,
    /// `<!-- ... -->` (Android resources)
    Xml,
}

/// Keep header fields on one line and unable to close the comment early.
fn sanitize(text: &str, style: CommentStyle) -> String {
    let flat = text.replace(['\r', '\n'], " ");
    match style {
        CommentStyle::Block => flat.replace("*/", "* /"),
        CommentStyle::Line => flat,
        CommentStyle::Xml => flat.replace("--", "- -"),
    }
}

/// Render the header. The first line carries the design system name, then
/// source, version and generation date, then the output format. No trailing
/// newline.
pub fn render(meta: &Meta, options: &EmitOptions, format: &str, style: CommentStyle) -> String {
    let generated = options.generated_on.format("%Y-%m-%d").to_string();
    let fields = [
        ("Source", meta.source.as_str()),
        ("Version", meta.version.as_str()),
        ("Generated", generated.as_str()),
        ("Format", format),
    ]
    .map(|(label, value)| format!("{label}: {}", sanitize(value, style)));
    let name = sanitize(&meta.name, style);

    let mut lines = Vec::with_capacity(fields.len() + 2);
    match style {
        CommentStyle::Block => {
            lines.push(format!("/* {name}"));
            lines.extend(fields.iter().map(|f| format!(" * {f}")));
            lines.push(" */".to_string());
        }
        CommentStyle::Line => {
            lines.push(format!("// {name}"));
            lines.extend(fields.iter().map(|f| format!("// {f}")));
        }
        CommentStyle::Xml => {
            lines.push(format!("<!-- {name}"));
            lines.extend(fields.iter().map(|f| format!("     {f}")));
            lines.push("-->".to_string());
        }
    }
    lines.join("\n")
}
