//! Error types for the source and decode pipeline.
//!
//! Resolution, read and decode errors abort processing of the offending
//! source or document immediately; the offending source or path is always
//! named in the error context.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use n9_manifest::DecodeError;

/// A source could not be resolved into readable paths.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SourceError {
    /// A directory contained no files with a supported extension.
    #[error("no files found in path: {}", path.display())]
    NoFilesInPath {
        /// The resolved directory.
        path: PathBuf,
    },

    /// A glob pattern matched no files with a supported extension.
    #[error("no files matching pattern: {pattern}")]
    NoFilesMatchingPattern {
        /// The raw pattern.
        pattern: String,
    },

    /// The glob pattern itself could not be parsed.
    #[error("invalid glob pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The raw pattern.
        pattern: String,
        /// The underlying pattern error.
        source: glob::PatternError,
    },

    /// A filesystem path could not be resolved.
    #[error("failed to resolve path '{}': {source}", path.display())]
    Io {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
}

/// A resolved source could not be read into a definition.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReadError {
    /// A Reader source had no stream handle attached.
    #[error("source '{raw}' has no input stream attached")]
    MissingReader {
        /// The raw source string.
        raw: String,
    },

    /// Reading a file or stream failed.
    #[error("failed to read '{path}': {source}")]
    Io {
        /// The path or label being read.
        path: String,
        /// The underlying I/O error.
        source: io::Error,
    },

    /// The fetch function failed at the transport level.
    #[error("GET {url} failed: {message}")]
    Fetch {
        /// The requested URL.
        url: String,
        /// Transport failure description.
        message: String,
    },

    /// The fetch function returned a non-200 status.
    #[error("GET {url} responded with status {status}: {body}")]
    FetchStatus {
        /// The requested URL.
        url: String,
        /// The HTTP status code.
        status: u16,
        /// An excerpt of the response body.
        body: String,
    },

    /// An explicitly named file is missing the required content marker.
    #[error("file '{path}' does not contain the required 'apiVersion: n9' marker")]
    MissingMarker {
        /// The offending file.
        path: String,
    },
}

/// Top-level pipeline error.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SdkError {
    /// Source resolution failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Definition reading failed.
    #[error(transparent)]
    Read(#[from] ReadError),

    /// A definition's bytes are not valid UTF-8.
    #[error("definition from '{definition}' is not valid UTF-8")]
    InvalidEncoding {
        /// The definition's source label.
        definition: String,
    },

    /// A document inside a definition could not be parsed.
    #[error("in '{definition}', document {index}: {message}")]
    Parse {
        /// The definition's source label.
        definition: String,
        /// Zero-based document index within the definition.
        index: usize,
        /// Parser failure description.
        message: String,
    },

    /// A parsed document failed envelope dispatch or decoding.
    #[error("in '{definition}', document {index}: {source}")]
    Decode {
        /// The definition's source label.
        definition: String,
        /// Zero-based document index within the definition.
        index: usize,
        /// The underlying decode error.
        source: DecodeError,
    },
}
