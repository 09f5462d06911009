//! Source resolution: classifying a raw location string into a typed,
//! path-expanded source descriptor.

use std::fmt;
use std::fs;
use std::io::Read;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::SourceError;

/// Extensions recognized during directory and glob discovery.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["yaml", "yml", "json"];

/// The raw-source sentinel for reading from standard input.
pub const STDIN_SENTINEL: &str = "-";

/// How a raw source string was classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum SourceType {
    /// An explicitly named single file.
    File,
    /// A directory; only its immediate children are considered.
    Directory,
    /// A glob pattern; `**` segments expand recursively.
    GlobPattern,
    /// A URL fetched through the externally supplied fetch function.
    Url,
    /// An in-memory stream.
    Reader,
}

/// A resolved source: its classification, the expanded path labels, the
/// original raw string, and (for Reader sources) the input stream.
pub struct Source {
    /// The source classification.
    pub source_type: SourceType,
    /// Ordered, canonicalized path labels. For URL sources this holds the
    /// URL itself; a Reader source carries at most one label.
    pub paths: Vec<String>,
    /// The original raw source string.
    pub raw: String,
    /// The input stream for Reader sources.
    pub reader: Option<Box<dyn Read + Send>>,
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Source")
            .field("source_type", &self.source_type)
            .field("paths", &self.paths)
            .field("raw", &self.raw)
            .field("reader", &self.reader.as_ref().map(|_| "<stream>"))
            .finish()
    }
}

impl Source {
    /// Classify and expand a raw location string.
    ///
    /// # Errors
    ///
    /// Fails when a directory or glob yields no supported files, when a
    /// pattern is malformed, or when a filesystem path cannot be resolved.
    pub fn resolve(raw: &str) -> Result<Self, SourceError> {
        if raw == STDIN_SENTINEL {
            return Ok(Self::from_reader(std::io::stdin(), None));
        }
        if raw.starts_with("http://") || raw.starts_with("https://") {
            return Ok(Self {
                source_type: SourceType::Url,
                paths: vec![raw.to_owned()],
                raw: raw.to_owned(),
                reader: None,
            });
        }
        if has_glob_meta(raw) {
            return Self::resolve_glob(raw);
        }
        Self::resolve_path(raw)
    }

    /// Wrap an in-memory stream as a source. `name` labels the resulting
    /// definition; at most one label may accompany a Reader source.
    #[must_use]
    pub fn from_reader(reader: impl Read + Send + 'static, name: Option<&str>) -> Self {
        let raw = name.unwrap_or(STDIN_SENTINEL).to_owned();
        Self {
            source_type: SourceType::Reader,
            paths: name.map(str::to_owned).into_iter().collect(),
            raw,
            reader: Some(Box::new(reader)),
        }
    }

    fn resolve_glob(raw: &str) -> Result<Self, SourceError> {
        let entries = glob::glob(raw).map_err(|source| SourceError::InvalidPattern {
            pattern: raw.to_owned(),
            source,
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| SourceError::Io {
                path: err.path().to_path_buf(),
                source: err.into(),
            })?;
            if path.is_file() && has_supported_extension(&path) {
                paths.push(canonical_label(&path)?);
            }
        }
        if paths.is_empty() {
            return Err(SourceError::NoFilesMatchingPattern {
                pattern: raw.to_owned(),
            });
        }
        paths.sort();
        paths.dedup();

        Ok(Self {
            source_type: SourceType::GlobPattern,
            paths,
            raw: raw.to_owned(),
            reader: None,
        })
    }

    fn resolve_path(raw: &str) -> Result<Self, SourceError> {
        let path = Path::new(raw);
        let metadata = fs::metadata(path).map_err(|source| SourceError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if metadata.is_dir() {
            return Self::resolve_directory(path, raw);
        }

        Ok(Self {
            source_type: SourceType::File,
            paths: vec![canonical_label(path)?],
            raw: raw.to_owned(),
            reader: None,
        })
    }

    // Immediate children only; recursive discovery requires an explicit
    // glob with a `**` segment.
    fn resolve_directory(dir: &Path, raw: &str) -> Result<Self, SourceError> {
        let mut paths = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| {
                let entry_path = err
                    .path()
                    .map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
                SourceError::Io {
                    path: entry_path.clone(),
                    source: err
                        .into_io_error()
                        .unwrap_or_else(|| io_other("directory traversal error")),
                }
            })?;
            let entry_path = entry.path();
            if entry_path.is_file() && has_supported_extension(entry_path) {
                paths.push(canonical_label(entry_path)?);
            }
        }
        if paths.is_empty() {
            return Err(SourceError::NoFilesInPath {
                path: dir.to_path_buf(),
            });
        }
        paths.sort();
        paths.dedup();

        Ok(Self {
            source_type: SourceType::Directory,
            paths,
            raw: raw.to_owned(),
            reader: None,
        })
    }
}

/// Resolve a list of raw source strings.
///
/// # Errors
///
/// Fails on the first raw string that cannot be resolved.
pub fn resolve_sources<I, S>(raw_sources: I) -> Result<Vec<Source>, SourceError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    raw_sources
        .into_iter()
        .map(|raw| Source::resolve(raw.as_ref()))
        .collect()
}

fn has_glob_meta(raw: &str) -> bool {
    let meta: &[char] = if cfg!(windows) {
        &['*', '?', '[']
    } else {
        &['*', '?', '[', '\\']
    };
    raw.contains(meta)
}

fn has_supported_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
}

// Canonicalize to an absolute, cleaned form so the same location reached
// two different ways collapses to one dedup/order key.
fn canonical_label(path: &Path) -> Result<String, SourceError> {
    let canonical = path.canonicalize().map_err(|source| SourceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(canonical.to_string_lossy().into_owned())
}

fn io_other(message: &str) -> std::io::Error {
    std::io::Error::other(message.to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_url_source() {
        let source = Source::resolve("https://example.com/project.yaml").unwrap();
        assert_eq!(source.source_type, SourceType::Url);
        assert_eq!(source.paths, vec!["https://example.com/project.yaml"]);
    }

    #[test]
    fn test_stdin_sentinel_is_a_reader() {
        let source = Source::resolve("-").unwrap();
        assert_eq!(source.source_type, SourceType::Reader);
        assert!(source.reader.is_some());
        assert!(source.paths.is_empty());
    }

    #[test]
    fn test_single_file() {
        let tmp = TempDir::new().unwrap();
        let file = touch(&tmp, "project.yaml", "apiVersion: n9/v1alpha\n");

        let source = Source::resolve(file.to_str().unwrap()).unwrap();
        assert_eq!(source.source_type, SourceType::File);
        assert_eq!(source.paths.len(), 1);
        assert_eq!(source.paths[0], file.canonicalize().unwrap().to_string_lossy());
    }

    #[test]
    fn test_missing_file_errors() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("missing.yaml");
        assert!(Source::resolve(missing.to_str().unwrap()).is_err());
    }

    #[test]
    fn test_directory_lists_immediate_children_only() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "a.yaml", "x");
        touch(&tmp, "b.json", "x");
        touch(&tmp, "ignored.txt", "x");
        touch(&tmp, "nested/c.yaml", "x");

        let source = Source::resolve(tmp.path().to_str().unwrap()).unwrap();
        assert_eq!(source.source_type, SourceType::Directory);
        assert_eq!(source.paths.len(), 2);
        assert!(source.paths.iter().all(|p| !p.contains("nested")));
    }

    #[test]
    fn test_empty_directory_errors() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "notes.txt", "x");

        let err = Source::resolve(tmp.path().to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("no files found in path"));
    }

    #[test]
    fn test_single_level_glob() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "a.yaml", "x");
        touch(&tmp, "nested/b.yaml", "x");

        let pattern = format!("{}/*.yaml", tmp.path().display());
        let source = Source::resolve(&pattern).unwrap();
        assert_eq!(source.source_type, SourceType::GlobPattern);
        assert_eq!(source.paths.len(), 1);
    }

    #[test]
    fn test_double_wildcard_glob_recurses() {
        let tmp = TempDir::new().unwrap();
        touch(&tmp, "a.yaml", "x");
        touch(&tmp, "nested/deeper/b.yml", "x");

        let pattern = format!("{}/**/*.y*ml", tmp.path().display());
        let source = Source::resolve(&pattern).unwrap();
        assert_eq!(source.paths.len(), 2);
    }

    #[test]
    fn test_glob_without_matches_errors() {
        let tmp = TempDir::new().unwrap();
        let pattern = format!("{}/*.yaml", tmp.path().display());
        let err = Source::resolve(&pattern).unwrap_err();
        assert!(err.to_string().contains("no files matching pattern"));
    }
}
