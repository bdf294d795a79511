// ─── Error ──────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BsonError {
    /// Document-level framing is wrong: the declared size does not fit the
    /// buffer, or the terminator byte is missing.
    #[error("malformed document: {0}")]
    MalformedDocument(&'static str),
    #[error("unknown element type tag: {0:#04x}")]
    UnknownTypeTag(u8),
    #[error("unexpected end of element data at offset {offset}")]
    UnexpectedEnd { offset: usize },
    #[error("invalid string length")]
    InvalidStringLength,
    #[error("invalid end of string")]
    InvalidStringTerminator,
    #[error("unterminated C string at offset {offset}")]
    MissingCStringTerminator { offset: usize },
    #[error("invalid UTF-8 in string data")]
    InvalidUtf8,
    #[error("invalid object length")]
    InvalidObjectLength,
    #[error("bad terminator in embedded document")]
    BadEmbeddedTerminator,
    #[error("invalid binary (subtype 2): lengths don't match")]
    InvalidBinaryLength,
    #[error("invalid code with scope length")]
    InvalidCodeWithScopeLength,
    #[error("invalid UUID length: expected 16, got {0}")]
    InvalidUuidLength(usize),
    #[error("maximum nesting depth of {0} exceeded")]
    NestingTooDeep(usize),
}

impl BsonError {
    pub(crate) const INVALID_OBJECT_SIZE: BsonError =
        BsonError::MalformedDocument("invalid object size");
    pub(crate) const BAD_TERMINATOR: BsonError = BsonError::MalformedDocument("bad terminator");

    /// True for document framing failures, false for element decode failures.
    #[inline]
    pub fn is_malformed_document(&self) -> bool {
        matches!(self, BsonError::MalformedDocument(_))
    }
}

pub type Result<T> = std::result::Result<T, BsonError>;
