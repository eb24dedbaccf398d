//! Error types for volray.

use thiserror::Error;

/// Errors raised while parsing a structured-points volume file.
///
/// A format error is always fatal to the load attempt that produced it.
#[derive(Error, Debug)]
pub enum FormatError {
    /// The file could not be opened or read.
    #[error("cannot read volume file: {0}")]
    Io(#[from] std::io::Error),

    /// The header ended before the expected number of lines.
    #[error("cannot read header, missing line {line}")]
    MissingHeaderLine { line: usize },

    /// The first line does not carry the format signature.
    #[error("not a valid VTK file")]
    InvalidMagic,

    /// A required header directive is absent.
    #[error("missing {0} directive in header")]
    MissingDirective(&'static str),

    /// A header directive is present but its values cannot be read.
    #[error("cannot read volume {field} from header line {line:?}")]
    MalformedDirective { field: &'static str, line: String },

    /// The `SCALARS` directive names a type outside the supported vocabulary.
    #[error("unsupported volume data type '{0}'")]
    UnsupportedScalarType(String),

    /// Neither `BINARY` nor `ASCII` appears in the header.
    #[error("cannot read file format, expected BINARY or ASCII")]
    MissingEncoding,

    /// An ASCII sample token is not a valid literal of the declared type.
    #[error("invalid sample {token:?} at index {index}")]
    InvalidSample { index: usize, token: String },

    /// The file holds fewer samples than the header declares.
    #[error("truncated volume data: expected {expected} samples, read {read}")]
    TruncatedData { expected: usize, read: usize },

    /// The declared dimensions overflow the addressable size.
    #[error("volume dimensions {0:?} are too large")]
    SizeOverflow([u32; 3]),
}

/// The main error type for volray operations.
#[derive(Error, Debug)]
pub enum VolrayError {
    /// Parsing a volume file failed.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// A render mode name outside the fixed set.
    #[error("unknown render mode '{0}'")]
    UnknownMode(String),

    /// Data size mismatch.
    #[error("data size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for volume parsing.
pub type FormatResult<T> = std::result::Result<T, FormatError>;

/// A specialized Result type for volray operations.
pub type Result<T> = std::result::Result<T, VolrayError>;
