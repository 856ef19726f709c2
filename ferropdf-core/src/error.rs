use crate::objects::ObjectId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PdfError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed source data: bad rectangle source, bad date string,
    /// unknown filter name. Never silently recovered.
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    /// A typed accessor was asked for a value of the wrong structural type.
    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("Array index {index} out of range (length {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Object {0} already registered in the cross-reference table")]
    DuplicateObject(ObjectId),

    #[error("Broken reference chain: {0} has no live target")]
    BrokenReference(ObjectId),

    #[error("Reference chain exceeded the dereference limit")]
    ReferenceLimit,

    #[error("Document was opened read-only")]
    ReadOnly,

    #[error("Cannot save a document with no pages")]
    NoPages,

    #[error("Prepare-for-save did not reach a fixpoint")]
    PrepareDiverged,

    #[error("Invalid PDF structure: {0}")]
    InvalidStructure(String),

    #[error("Compression error: {0}")]
    CompressionError(String),
}

pub type Result<T> = std::result::Result<T, PdfError>;
