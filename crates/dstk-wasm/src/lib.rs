//! WASM bindings for dstk.
//!
//! Exposes `validate()` and `generate()` to JavaScript via wasm-bindgen.
//! Findings and artifacts cross the boundary as plain JS objects
//! (`{ severity, section, path, message }` and `{ filename, content }`).

use chrono::NaiveDate;
use dstk_codegen::{Artifact, CodegenError, EmitOptions, Target};
use dstk_schema::{parse_source, SourceKind};
use dstk_validator::Finding;
use wasm_bindgen::prelude::*;

/// Validate a JSON token document.
///
/// Returns an array of findings; an empty array means the document is
/// conformant. Throws only when the input is not a JSON object.
#[wasm_bindgen]
pub fn validate(source: &str) -> Result<JsValue, JsError> {
    let findings = validate_source(source)?;
    serde_wasm_bindgen::to_value(&findings).map_err(|e| JsError::new(&e.to_string()))
}

/// Generate the files of one target (`css`, `scss`, `tailwind`, `swiftui`,
/// `uikit`, `compose`, `android-xml`, `flutter`, `typescript`, `react-native`).
///
/// `date` is the `YYYY-MM-DD` generation date written into every header;
/// it defaults to today. Throws with every finding when the document is
/// not conformant.
#[wasm_bindgen]
pub fn generate(source: &str, target: &str, date: Option<String>) -> Result<JsValue, JsError> {
    let artifacts = generate_artifacts(source, target, date.as_deref())?;
    serde_wasm_bindgen::to_value(&artifacts).map_err(|e| JsError::new(&e.to_string()))
}

/// Get the generator version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn validate_source(source: &str) -> Result<Vec<Finding>, JsError> {
    let root = parse_source(source, SourceKind::Json).map_err(|e| JsError::new(&e.to_string()))?;
    Ok(dstk_validator::validate(&root))
}

fn generate_artifacts(source: &str, target: &str, date: Option<&str>) -> Result<Vec<Artifact>, JsError> {
    generate_native(source, target, date).map_err(|message| JsError::new(&message))
}

/// The `generate` pipeline with plain string errors, testable off-wasm.
fn generate_native(source: &str, target: &str, date: Option<&str>) -> Result<Vec<Artifact>, String> {
    let target: Target = target.parse().map_err(|e: CodegenError| e.to_string())?;
    let options = match date {
        Some(date) => EmitOptions::for_date(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| format!("invalid date '{date}': {e}"))?,
        ),
        None => EmitOptions::today(),
    };
    dstk_codegen::compile(source, SourceKind::Json, &[target], &options).map_err(|e| describe(&e))
}

/// Error text; a rejection lists every finding, one per line.
fn describe(error: &CodegenError) -> String {
    match error {
        CodegenError::Rejected(rejection) => {
            let mut lines = vec![rejection.to_string()];
            lines.extend(rejection.findings.iter().map(Finding::to_string));
            lines.join("\n")
        }
        other => other.to_string(),
    }
}
