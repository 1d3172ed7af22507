//! Input loading.
//!
//! A token document arrives either as a `.json` file or embedded in a
//! Markdown report as a fenced code block.

use std::path::Path;

use crate::{LoadError, Node};

/// How to interpret input text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Json,
    Markdown,
}

impl SourceKind {
    /// Markdown for `.md` / `.markdown`, JSON for everything else.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("md") || ext.eq_ignore_ascii_case("markdown") => {
                SourceKind::Markdown
            }
            _ => SourceKind::Json,
        }
    }
}

/// Read and parse a token document from disk.
pub fn load(path: &Path) -> Result<Node, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let kind = SourceKind::from_path(path);
    tracing::debug!(path = %path.display(), ?kind, bytes = text.len(), "loading token document");
    match kind {
        SourceKind::Json => parse_source(&text, kind),
        SourceKind::Markdown => {
            let block = extract_json_block(&text).ok_or_else(|| LoadError::NoJsonBlock(path.to_path_buf()))?;
            parse_source(&block, SourceKind::Json)
        }
    }
}

/// Parse a token document from text. The root must be a JSON object.
pub fn parse_source(text: &str, kind: SourceKind) -> Result<Node, LoadError> {
    let json = match kind {
        SourceKind::Json => text.to_string(),
        SourceKind::Markdown => extract_json_block(text).ok_or_else(|| LoadError::NoJsonBlock("<markdown>".into()))?,
    };
    let node = Node::parse(&json)?;
    if !node.is_object() {
        return Err(LoadError::NotAnObject(node.kind()));
    }
    Ok(node)
}

struct Fence {
    marker: char,
    len: usize,
    info: String,
}

fn open_fence(line: &str) -> Option<Fence> {
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    if len < 3 {
        return None;
    }
    Some(Fence {
        marker,
        len,
        info: trimmed[len..].trim().to_lowercase(),
    })
}

fn closes(line: &str, fence: &Fence) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= fence.len && trimmed.chars().all(|c| c == fence.marker)
}

/// Extract the body of the first fenced block tagged `json`; failing that,
/// the first fenced block whose body is a JSON object.
pub fn extract_json_block(markdown: &str) -> Option<String> {
    let mut blocks: Vec<(String, String)> = Vec::new();
    let mut current: Option<(Fence, Vec<&str>)> = None;

    for line in markdown.lines() {
        match current.take() {
            None => {
                if let Some(fence) = open_fence(line) {
                    current = Some((fence, Vec::new()));
                }
            }
            Some((fence, mut body)) => {
                if closes(line, &fence) {
                    blocks.push((fence.info, body.join("\n")));
                } else {
                    body.push(line);
                    current = Some((fence, body));
                }
            }
        }
    }

    let tagged = blocks
        .iter()
        .find(|(info, _)| info.split_whitespace().next() == Some("json"));
    if let Some((_, body)) = tagged {
        return Some(body.clone());
    }
    blocks
        .into_iter()
        .map(|(_, body)| body)
        .find(|body| body.trim_start().starts_with('{') && Node::parse(body).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(SourceKind::from_path(Path::new("tokens.json")), SourceKind::Json);
        assert_eq!(SourceKind::from_path(Path::new("report.MD")), SourceKind::Markdown);
        assert_eq!(SourceKind::from_path(Path::new("tokens")), SourceKind::Json);
    }

    #[test]
    fn test_extract_tagged_block() {
        let md = "# Tokens\n\n```text\nnot this\n```\n\n```json\n{\"meta\": {}}\n```\n";
        assert_eq!(extract_json_block(md), Some("{\"meta\": {}}".to_string()));
    }

    #[test]
    fn test_extract_untagged_object_block() {
        let md = "```\n{\"color\": {}}\n```";
        assert_eq!(extract_json_block(md), Some("{\"color\": {}}".to_string()));
    }

    #[test]
    fn test_extract_tilde_fence() {
        let md = "~~~json\n{}\n~~~";
        assert_eq!(extract_json_block(md), Some("{}".to_string()));
    }

    #[test]
    fn test_extract_none() {
        assert_eq!(extract_json_block("no code here"), None);
        assert_eq!(extract_json_block("```sh\nls\n```"), None);
    }

    #[test]
    fn test_parse_source_rejects_non_object() {
        let err = parse_source("[1, 2]", SourceKind::Json).unwrap_err();
        assert!(matches!(err, LoadError::NotAnObject("array")));
    }

    #[test]
    fn test_parse_source_markdown() {
        let node = parse_source("```json\n{\"a\": 1}\n```", SourceKind::Markdown).unwrap();
        assert!(node.get("a").is_some());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn test_load_invalid_json() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Json(_)));
    }

    #[test]
    fn test_load_markdown_file() {
        let mut file = tempfile::Builder::new().suffix(".md").tempfile().unwrap();
        write!(file, "# Report\n\n```json\n{{\"meta\": {{\"name\": \"X\"}}}}\n```\n").unwrap();
        let node = load(file.path()).unwrap();
        assert!(node.get("meta").is_some());
    }
}
