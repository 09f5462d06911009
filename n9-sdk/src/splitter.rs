//! Document splitting: classifying a definition buffer as JSON or YAML
//! and extracting its independent documents.

use std::sync::LazyLock;

use regex::Regex;

/// The encoding of an extracted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Json,
    Yaml,
}

/// Whether a document holds an array of records or a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Single,
    Array,
}

/// A single self-contained document extracted from a definition buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDocument {
    /// The document text, byte-for-byte as it appeared in the buffer
    /// (nothing beyond the separator itself is trimmed).
    pub content: String,
    pub format: Format,
    pub shape: Shape,
}

// A buffer whose leading non-whitespace is `{` (optionally inside `[`)
// is JSON; everything else is treated as YAML. The pattern is a
// compile-time constant.
#[allow(clippy::unwrap_used)]
static JSON_BUFFER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\[?\s*\{").unwrap());

/// The YAML document separator: a `---` line. Requiring the leading
/// newline keeps `---` sequences inside block scalars intact.
const YAML_SEPARATOR: &str = "\n---";

/// Split a definition buffer into its independent documents, preserving
/// source order.
///
/// JSON buffers are always a single document. YAML buffers are split on
/// `---` separator lines; blank segments between separators are dropped.
#[must_use]
pub fn split_documents(content: &str) -> Vec<RawDocument> {
    if JSON_BUFFER_REGEX.is_match(content) || content.trim_start().starts_with('[') {
        let shape = if content.trim_start().starts_with('[') {
            Shape::Array
        } else {
            Shape::Single
        };
        return vec![RawDocument {
            content: content.to_owned(),
            format: Format::Json,
            shape,
        }];
    }

    split_yaml_stream(content)
        .into_iter()
        .filter(|doc| !doc.trim().is_empty())
        .map(|doc| RawDocument {
            shape: yaml_shape(doc),
            content: doc.to_owned(),
            format: Format::Yaml,
        })
        .collect()
}

// Scanner-style split on the `\n---` separator. The document before the
// separator is emitted as-is; the remainder of the separator line is
// discarded and the next document starts on the following line.
fn split_yaml_stream(content: &str) -> Vec<&str> {
    let mut documents = Vec::new();
    let mut rest = content;
    loop {
        match rest.find(YAML_SEPARATOR) {
            Some(idx) => {
                documents.push(&rest[..idx]);
                let after = &rest[idx + YAML_SEPARATOR.len()..];
                rest = match after.find('\n') {
                    Some(nl) => &after[nl + 1..],
                    None => "",
                };
            }
            None => {
                documents.push(rest);
                return documents;
            }
        }
    }
}

// Lightweight array-vs-single heuristic: the first non-blank,
// non-comment line starting with `[` or `- ` marks an array. A line
// consisting only of `---` is a document marker, not an array tag.
fn yaml_shape(document: &str) -> Shape {
    for line in document.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed == "---" {
            continue;
        }
        if trimmed.starts_with('[') || trimmed.starts_with("- ") {
            return Shape::Array;
        }
        return Shape::Single;
    }
    Shape::Single
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_object_buffer() {
        let docs = split_documents(r#"  {"kind": "Project"}"#);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].format, Format::Json);
        assert_eq!(docs[0].shape, Shape::Single);
    }

    #[test]
    fn test_json_array_buffer() {
        let docs = split_documents(r#"[{"kind": "Project"}, {"kind": "Service"}]"#);
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].shape, Shape::Array);
    }

    #[test]
    fn test_yaml_single_document() {
        let docs = split_documents("kind: Project\nmetadata:\n  name: a\n");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].format, Format::Yaml);
        assert_eq!(docs[0].shape, Shape::Single);
    }

    #[test]
    fn test_yaml_multi_document_split_preserves_order() {
        let buffer = "\
kind: Project
metadata:
  name: first
---
kind: Project
metadata:
  name: second
---
kind: Project
metadata:
  name: third
";
        let docs = split_documents(buffer);
        assert_eq!(docs.len(), 3);
        assert!(docs[0].content.contains("first"));
        assert!(docs[1].content.contains("second"));
        assert!(docs[2].content.contains("third"));
    }

    #[test]
    fn test_yaml_blank_trailing_segment_is_dropped() {
        let docs = split_documents("kind: Project\n---\n  \n");
        assert_eq!(docs.len(), 1);
    }

    #[test]
    fn test_yaml_document_content_is_not_trimmed() {
        let buffer = "kind: Project\n\nextra: value\n---\nkind: Service\n";
        let docs = split_documents(buffer);
        assert_eq!(docs[0].content, "kind: Project\n\nextra: value");
    }

    #[test]
    fn test_separator_line_trailing_content_is_discarded() {
        let docs = split_documents("a: 1\n--- extra\nb: 2\n");
        assert_eq!(docs.len(), 2);
        assert_eq!(docs[0].content, "a: 1");
        assert_eq!(docs[1].content, "b: 2\n");
    }

    #[test]
    fn test_separator_at_end_of_buffer_yields_no_extra_document() {
        let docs = split_documents("a: 1\n---");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].content, "a: 1");
    }

    #[test]
    fn test_yaml_array_document() {
        let docs = split_documents("- kind: Project\n- kind: Service\n");
        assert_eq!(docs[0].shape, Shape::Array);
    }

    #[test]
    fn test_leading_marker_line_is_not_an_array_tag() {
        let docs = split_documents("---\nkind: Project\n");
        assert_eq!(docs.len(), 1);
        assert_eq!(docs[0].shape, Shape::Single);
    }

    #[test]
    fn test_comment_lines_are_skipped_by_the_heuristic() {
        let docs = split_documents("# items below\n- kind: Project\n");
        assert_eq!(docs[0].shape, Shape::Array);
    }

    #[test]
    fn test_large_buffer_splits_without_truncation() {
        let one = format!("kind: Project\npadding: {}\n", "x".repeat(64 * 1024));
        let buffer = format!("{one}---\n{one}");
        let docs = split_documents(&buffer);
        assert_eq!(docs.len(), 2);
        assert!(docs[1].content.len() > 64 * 1024);
    }
}
