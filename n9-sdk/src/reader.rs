//! Definition reading: fetching bytes per source and deduplicating
//! identical content across overlapping sources.

use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::sync::LazyLock;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::error::ReadError;
use crate::resolver::{Source, SourceType};

/// One raw, undecoded document buffer, attributed to the source path it
/// was first accepted from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDefinition {
    /// The resolved source label (path, URL, or stream name).
    pub source: String,
    /// The raw byte content.
    pub content: Vec<u8>,
}

/// The result of an external URL fetch. Anything other than status 200 is
/// rejected by the reader.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Vec<u8>,
}

/// Externally supplied byte-fetch function for URL sources.
///
/// Timeouts, cancellation and retries are the implementation's
/// responsibility; the reader calls it once per URL and never retries.
pub trait Fetch {
    /// Fetch the bytes behind `url`.
    ///
    /// # Errors
    ///
    /// Implementations should return [`ReadError::Fetch`] for transport
    /// failures.
    fn fetch(&self, url: &str) -> Result<FetchResponse, ReadError>;
}

/// A [`Fetch`] that rejects every URL. Useful when no URL sources are
/// expected.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFetch;

impl Fetch for NoFetch {
    fn fetch(&self, url: &str) -> Result<FetchResponse, ReadError> {
        Err(ReadError::Fetch {
            url: url.to_owned(),
            message: "URL sources are not supported by this reader".to_owned(),
        })
    }
}

const FETCH_BODY_EXCERPT: usize = 256;

// Matches both the YAML (`apiVersion: n9/...`) and JSON
// (`"apiVersion": "n9/..."`) spellings. The pattern is a compile-time
// constant.
#[allow(clippy::unwrap_used)]
static API_VERSION_MARKER: LazyLock<regex::bytes::Regex> =
    LazyLock::new(|| regex::bytes::Regex::new(r#""?apiVersion"?\s*:\s*"?n9"#).unwrap());

/// Read every resolved source into deduplicated definitions.
///
/// Sources are sorted by their raw string in descending order before
/// processing; this ordering is the single source of truth for dedup
/// winner selection. Byte-identical content read from two different
/// paths collapses into one definition, attributed to whichever path was
/// accepted first. Output preserves first-acceptance order.
///
/// # Errors
///
/// Fails on I/O errors, absent Reader streams, non-200 fetches, and
/// explicitly named files missing the content marker. Bulk-discovered
/// files (directory or glob) missing the marker are skipped silently.
pub fn read_sources(
    mut sources: Vec<Source>,
    fetch: &dyn Fetch,
) -> Result<Vec<RawDefinition>, ReadError> {
    sources.sort_by(|a, b| b.raw.cmp(&a.raw));

    let mut seen: HashSet<[u8; 32]> = HashSet::new();
    let mut definitions = Vec::new();

    for mut source in sources {
        match source.source_type {
            SourceType::Reader => {
                let label = source
                    .paths
                    .first()
                    .unwrap_or(&source.raw)
                    .clone();
                let mut reader = source.reader.take().ok_or(ReadError::MissingReader {
                    raw: source.raw.clone(),
                })?;
                let mut content = Vec::new();
                reader
                    .read_to_end(&mut content)
                    .map_err(|err| ReadError::Io {
                        path: label.clone(),
                        source: err,
                    })?;
                accept(&mut definitions, &mut seen, label, content);
            }
            SourceType::Url => {
                for url in &source.paths {
                    let response = fetch.fetch(url)?;
                    if response.status != 200 {
                        return Err(ReadError::FetchStatus {
                            url: url.clone(),
                            status: response.status,
                            body: body_excerpt(&response.body),
                        });
                    }
                    accept(&mut definitions, &mut seen, url.clone(), response.body);
                }
            }
            SourceType::File | SourceType::Directory | SourceType::GlobPattern => {
                let bulk_discovered = source.source_type != SourceType::File;
                for path in &source.paths {
                    let content = fs::read(path).map_err(|err| ReadError::Io {
                        path: path.clone(),
                        source: err,
                    })?;
                    if !API_VERSION_MARKER.is_match(&content) {
                        // Bulk discovery tolerates foreign files; a file the
                        // caller named explicitly does not.
                        if bulk_discovered {
                            warn!(path = %path, "skipping file without the 'apiVersion: n9' marker");
                            continue;
                        }
                        return Err(ReadError::MissingMarker { path: path.clone() });
                    }
                    accept(&mut definitions, &mut seen, path.clone(), content);
                }
            }
        }
    }

    Ok(definitions)
}

fn accept(
    definitions: &mut Vec<RawDefinition>,
    seen: &mut HashSet<[u8; 32]>,
    source: String,
    content: Vec<u8>,
) {
    let hash: [u8; 32] = Sha256::digest(&content).into();
    if seen.insert(hash) {
        debug!(source = %source, bytes = content.len(), "accepted definition");
        definitions.push(RawDefinition { source, content });
    } else {
        debug!(source = %source, "dropping duplicate definition content");
    }
}

fn body_excerpt(body: &[u8]) -> String {
    let text = String::from_utf8_lossy(body);
    let mut excerpt: String = text.chars().take(FETCH_BODY_EXCERPT).collect();
    if text.chars().count() > FETCH_BODY_EXCERPT {
        excerpt.push_str("...");
    }
    excerpt
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Cursor;
    use tempfile::TempDir;

    const PROJECT: &str = "\
apiVersion: n9/v1alpha
kind: Project
metadata:
  name: default
";

    struct StaticFetch {
        status: u16,
        body: &'static str,
    }

    impl Fetch for StaticFetch {
        fn fetch(&self, _url: &str) -> Result<FetchResponse, ReadError> {
            Ok(FetchResponse {
                status: self.status,
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    #[test]
    fn test_reader_source_is_read_eagerly() {
        let source = Source::from_reader(Cursor::new(PROJECT.as_bytes().to_vec()), Some("mem"));
        let definitions = read_sources(vec![source], &NoFetch).unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].source, "mem");
        assert_eq!(definitions[0].content, PROJECT.as_bytes());
    }

    #[test]
    fn test_reader_source_without_stream_fails() {
        let mut source = Source::from_reader(Cursor::new(Vec::new()), Some("mem"));
        source.reader = None;
        let err = read_sources(vec![source], &NoFetch).unwrap_err();
        assert!(matches!(err, ReadError::MissingReader { .. }));
    }

    #[test]
    fn test_url_source_requires_status_200() {
        let source = Source::resolve("https://example.com/p.yaml").unwrap();
        let fetch = StaticFetch {
            status: 404,
            body: "not found",
        };
        let err = read_sources(vec![source], &fetch).unwrap_err();
        match err {
            ReadError::FetchStatus { status, body, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "not found");
            }
            other => panic!("expected FetchStatus, got: {other}"),
        }
    }

    #[test]
    fn test_url_source_accepts_200() {
        let source = Source::resolve("https://example.com/p.yaml").unwrap();
        let fetch = StaticFetch {
            status: 200,
            body: PROJECT,
        };
        let definitions = read_sources(vec![source], &fetch).unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].source, "https://example.com/p.yaml");
    }

    #[test]
    fn test_explicit_file_without_marker_hard_fails() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("foreign.yaml");
        fs::write(&path, "kind: SomethingElse\n").unwrap();

        let source = Source::resolve(path.to_str().unwrap()).unwrap();
        let err = read_sources(vec![source], &NoFetch).unwrap_err();
        assert!(matches!(err, ReadError::MissingMarker { .. }));
    }

    #[test]
    fn test_bulk_discovery_silently_skips_files_without_marker() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("project.yaml"), PROJECT).unwrap();
        fs::write(tmp.path().join("foreign.yaml"), "kind: SomethingElse\n").unwrap();

        let source = Source::resolve(tmp.path().to_str().unwrap()).unwrap();
        let definitions = read_sources(vec![source], &NoFetch).unwrap();
        assert_eq!(definitions.len(), 1);
        assert!(definitions[0].source.ends_with("project.yaml"));
    }

    #[test]
    fn test_marker_matches_json_spelling() {
        let tmp = TempDir::new().unwrap();
        let json = r#"{"apiVersion": "n9/v1alpha", "kind": "Project", "metadata": {"name": "p"}}"#;
        fs::write(tmp.path().join("p.json"), json).unwrap();

        let source = Source::resolve(tmp.path().to_str().unwrap()).unwrap();
        let definitions = read_sources(vec![source], &NoFetch).unwrap();
        assert_eq!(definitions.len(), 1);
    }

    #[test]
    fn test_identical_content_across_sources_collapses() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.yaml"), PROJECT).unwrap();
        fs::write(tmp.path().join("a.json"), PROJECT).unwrap();

        let source = Source::resolve(tmp.path().to_str().unwrap()).unwrap();
        let definitions = read_sources(vec![source], &NoFetch).unwrap();
        assert_eq!(definitions.len(), 1);
    }

    #[test]
    fn test_sources_are_processed_in_descending_raw_order() {
        let a = Source::from_reader(Cursor::new(PROJECT.as_bytes().to_vec()), Some("aaa"));
        let b = Source::from_reader(Cursor::new(PROJECT.as_bytes().to_vec()), Some("zzz"));

        // "zzz" sorts first under descending order and wins the dedup.
        let definitions = read_sources(vec![a, b], &NoFetch).unwrap();
        assert_eq!(definitions.len(), 1);
        assert_eq!(definitions[0].source, "zzz");
    }
}
