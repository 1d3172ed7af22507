use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const TOKENS: &str = r##"{
    "meta": {"name": "Acme Design", "source": "landing.png", "version": "1.0.0", "generated": "2026-03-01"},
    "color": {
        "primary": {"value": "#2563EB", "type": "color"},
        "primary-light": {"value": "#3B82F6", "type": "color"}
    },
    "typography": {
        "font-family-body": {"value": "'Inter', sans-serif", "type": "fontFamily"},
        "font-size": {"base": {"value": "16px", "type": "dimension"}},
        "font-weight": {"bold": {"value": "700", "type": "fontWeight"}},
        "letter-spacing": {"tight": {"value": "-0.025em", "type": "dimension"}}
    },
    "spacing": {"4": {"value": "16px", "type": "dimension"}},
    "borderRadius": {
        "md": {"value": "8px", "type": "dimension"},
        "full": {"value": "9999px", "type": "dimension"}
    },
    "shadow": {"sm": {"value": "0 1px 2px 0 rgba(0, 0, 0, 0.05)", "type": "shadow"}},
    "components": {
        "button-primary": {
            "background": "{color.primary}",
            "hover-background": "{color.primary-light}",
            "border-radius": "{borderRadius.md}"
        }
    }
}"##;

fn write_tokens(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

fn dangling() -> String {
    TOKENS.replace("\"primary\": {\"value\": \"#2563EB\", \"type\": \"color\"},", "")
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// =============================================================================
// validate
// =============================================================================

#[test]
fn test_validate_conformant() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    cargo_bin_cmd!("dstk")
        .arg("validate")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_validate_reports_dangling_reference() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", &dangling());
    cargo_bin_cmd!("dstk")
        .arg("validate")
        .arg(&path)
        .assert()
        .code(1)
        .stdout(
            predicate::str::contains("Validation failed with 1 finding(s):")
                .and(predicate::str::contains("components.button-primary.background"))
                .and(predicate::str::contains("{color.primary}")),
        );
}

#[test]
fn test_validate_markdown_report() {
    let dir = TempDir::new().unwrap();
    let report = format!("# Extracted tokens\n\nFrom the landing page.\n\n```json\n{TOKENS}\n```\n");
    let path = write_tokens(&dir, "report.md", &report);
    cargo_bin_cmd!("dstk").arg("validate").arg(&path).assert().success();
}

#[test]
fn test_validate_missing_file() {
    cargo_bin_cmd!("dstk")
        .arg("validate")
        .arg("does-not-exist.json")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("file not found"));
}

#[test]
fn test_validate_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", "{\"meta\": ");
    cargo_bin_cmd!("dstk")
        .arg("validate")
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid JSON"));
}

// =============================================================================
// generate-css
// =============================================================================

#[test]
fn test_generate_css_to_stdout() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    cargo_bin_cmd!("dstk")
        .args(["generate-css", "--date", "2026-03-14"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::starts_with("/* Acme Design\n")
                .and(predicate::str::contains("Generated: 2026-03-14"))
                .and(predicate::str::contains("--space-4: 1rem;"))
                .and(predicate::str::contains("--radius-full: 9999px;"))
                .and(predicate::str::contains(".button-primary").not()),
        );
}

#[test]
fn test_generate_scss_with_components() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    cargo_bin_cmd!("dstk")
        .args(["generate-css", "--format", "scss", "--components"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("@mixin button-primary {").and(predicate::str::contains("&:hover {")));
}

#[test]
fn test_generate_css_to_file() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    let out = dir.path().join("styles").join("tokens.css");
    cargo_bin_cmd!("dstk")
        .args(["generate-css", "--components", "--output"])
        .arg(&out)
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
    let css = std::fs::read_to_string(&out).unwrap();
    assert!(css.contains(".button-primary:hover {"));
}

#[test]
fn test_rejected_document_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", &dangling());
    let out = dir.path().join("out");
    cargo_bin_cmd!("dstk")
        .args(["generate-kotlin", "--xml", "--output"])
        .arg(&out)
        .arg(&path)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("components.button-primary.background"));
    assert!(!out.exists());
}

// =============================================================================
// Mobile and JS targets
// =============================================================================

#[test]
fn test_generate_swift_defaults_to_swiftui() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    cargo_bin_cmd!("dstk")
        .arg("generate-swift")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("struct DSColors").and(predicate::str::contains("// ===").not()));
}

#[test]
fn test_generate_swift_both_to_stdout_has_banners() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    cargo_bin_cmd!("dstk")
        .args(["generate-swift", "--swiftui", "--uikit"])
        .arg(&path)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("// === DesignTokens.swift ===\n")
                .and(predicate::str::contains("// === Theme.swift ===\n")),
        );
}

#[test]
fn test_generate_kotlin_to_dir() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    let out = dir.path().join("theme");
    cargo_bin_cmd!("dstk")
        .args(["generate-kotlin", "--compose", "--xml", "--package", "com.acme.ui", "--output"])
        .arg(&out)
        .arg(&path)
        .assert()
        .success();
    assert_eq!(
        files_in(&out),
        vec![
            "Color.kt",
            "Dimens.kt",
            "Shape.kt",
            "Theme.kt",
            "Type.kt",
            "colors.xml",
            "dimens.xml",
            "styles.xml",
            "themes.xml",
        ]
    );
    let color = std::fs::read_to_string(out.join("Color.kt")).unwrap();
    assert!(color.contains("package com.acme.ui\n"));
    assert!(color.contains("Color(0xFF2563EB)"));
    let colors = std::fs::read_to_string(out.join("colors.xml")).unwrap();
    assert!(colors.contains("<color name=\"primary_light\">#FF3B82F6</color>"));
}

#[test]
fn test_generate_tailwind() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    cargo_bin_cmd!("dstk")
        .arg("generate-tailwind")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("module.exports = {").and(predicate::str::contains("'full': '9999px'")));
}

#[test]
fn test_generate_dart() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    cargo_bin_cmd!("dstk")
        .arg("generate-dart")
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("static const Color primaryLight = Color(0xFF3B82F6);"));
}

#[test]
fn test_generate_ts_react_native() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    let out = dir.path().join("src");
    cargo_bin_cmd!("dstk")
        .args(["generate-ts", "--react-native", "--output"])
        .arg(&out)
        .arg(&path)
        .assert()
        .success();
    assert_eq!(files_in(&out), vec!["theme.ts"]);
    let ts = std::fs::read_to_string(out.join("theme.ts")).unwrap();
    assert!(ts.contains("tight: -0.4,"));
    assert!(ts.contains("borderRadius: 8,"));
}

#[test]
fn test_output_is_reproducible_with_fixed_date() {
    let dir = TempDir::new().unwrap();
    let path = write_tokens(&dir, "tokens.json", TOKENS);
    let run = || {
        cargo_bin_cmd!("dstk")
            .args(["generate-ts", "--date", "2026-03-14"])
            .arg(&path)
            .output()
            .unwrap()
            .stdout
    };
    assert_eq!(run(), run());
}

#[test]
fn test_invalid_date_is_a_usage_error() {
    cargo_bin_cmd!("dstk")
        .args(["generate-css", "--date", "14/03/2026", "tokens.json"])
        .assert()
        .code(2);
}
