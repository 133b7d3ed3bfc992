//! Error types for manifest parsing, lookup, and verification.

use std::path::PathBuf;
use thiserror::Error;

use crate::manifest::ResourceKind;

/// Errors raised while reading a manifest into a [`crate::ResourceIndex`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The manifest file could not be read.
    #[error("I/O error reading {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document in the stream is not valid YAML.
    #[error("YAML syntax error in document {document}: {source}")]
    SyntaxError {
        /// 1-indexed position of the document in the stream.
        document: usize,
        #[source]
        source: serde_yaml::Error,
    },

    /// A document is valid YAML but not a usable Kubernetes object.
    #[error("Invalid K8s object in document {document}: {message}")]
    InvalidObject { document: usize, message: String },

    /// Two documents declare the same kind and name.
    #[error("Duplicate {kind} `{name}` in documents {first} and {second}")]
    DuplicateResource {
        kind: ResourceKind,
        name: String,
        first: usize,
        second: usize,
    },
}

/// Errors raised by strict lookups.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("No {kind} named `{name}` in manifest")]
    NotFound { kind: ResourceKind, name: String },

    /// A document with the requested name exists but declares another kind.
    #[error("`{name}` was requested as {requested} but is declared as {declared}")]
    TypeMismatch {
        name: String,
        requested: ResourceKind,
        declared: ResourceKind,
    },
}

/// A mismatch between what the manifest contains and what the inputs call for.
///
/// Every variant names the field (or resource) that failed so a single test
/// failure points straight at the offending part of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerifyError {
    #[error("Expected {kind} `{name}` to exist but it is absent")]
    Missing { kind: ResourceKind, name: String },

    #[error("Expected {kind} `{name}` to be absent but the manifest contains it")]
    UnexpectedResource { kind: ResourceKind, name: String },

    #[error("`{name}` should be a {expected} but is declared as {declared}")]
    WrongKind {
        name: String,
        expected: ResourceKind,
        declared: ResourceKind,
    },

    #[error("{field} is missing")]
    MissingField { field: String },

    #[error("{field}: expected {expected:?}, found {actual:?}")]
    Mismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("{field}: expected keys {expected:?} in any order, found {actual:?}")]
    KeySet {
        field: String,
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("{field}: expected {expected} entries, found {actual}")]
    Count {
        field: String,
        expected: usize,
        actual: usize,
    },
}

impl VerifyError {
    /// The field path or resource name this failure is about.
    pub fn field(&self) -> &str {
        match self {
            Self::Missing { name, .. }
            | Self::UnexpectedResource { name, .. }
            | Self::WrongKind { name, .. } => name,
            Self::MissingField { field }
            | Self::Mismatch { field, .. }
            | Self::KeySet { field, .. }
            | Self::Count { field, .. } => field,
        }
    }
}

/// Errors raised while loading [`crate::OperatorInputs`].
#[derive(Debug, Error)]
pub enum InputsError {
    #[error("I/O error reading {}: {source}", .path.display())]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse operator inputs: {0}")]
    ParsingFailed(#[from] serde_yaml::Error),
}

/// Top-level error for callers that mix parsing, lookup, and verification.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Verify(#[from] VerifyError),

    #[error(transparent)]
    Inputs(#[from] InputsError),
}

pub type Result<T> = std::result::Result<T, Error>;
