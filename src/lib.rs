//! Lazy, read-through access to single encoded BSON documents.
//!
//! [`RawDocument`] keeps the raw bytes and decodes only when read: membership
//! tests and item iteration walk the elements one at a time, and operations
//! that need the whole document decode it once and cache the result.

pub mod codec_options;
pub mod decode;
pub mod document;
pub mod error;
pub mod raw_document;
pub mod types;
pub mod value;

#[cfg(test)]
pub(crate) mod test_util;

pub use codec_options::{CodecOptions, DEFAULT_CODEC_OPTIONS, UuidRepresentation};
pub use decode::{
    DocumentIter, FromBsonBytes, decode_all, decode_document, decode_element, decode_iter,
    is_valid,
};
pub use document::Document;
pub use error::{BsonError, Result};
pub use raw_document::{ElementScanner, RawDocument, ReadableDocument, scan};
pub use value::{Binary, BsonValue, Code, DateTime, DbRef, ObjectId, Regex, Timestamp, Uuid};
