//! Element and document decoding.
//!
//! Every read is bounds-checked against an explicit `limit`, so a corrupt
//! length field yields an error instead of a panic or an over-read.

use crate::codec_options::{CodecOptions, DEFAULT_CODEC_OPTIONS, UuidRepresentation};
use crate::document::Document;
use crate::error::{BsonError, Result};
use crate::types::*;
use crate::value::{Binary, BsonValue, Code, DateTime, DbRef, ObjectId, Regex, Timestamp, Uuid};
use bytes::Bytes;
use smol_str::SmolStr;
use std::marker::PhantomData;

// ─── Reader ─────────────────────────────────────────────────────────────────

/// Forward-only cursor over `buf[pos..limit]`.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    limit: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    fn new(buf: &'a [u8], pos: usize, limit: usize) -> Self {
        Self {
            buf,
            pos,
            limit: limit.min(buf.len()),
        }
    }

    #[inline]
    fn remaining(&self) -> usize {
        self.limit.saturating_sub(self.pos)
    }

    #[inline]
    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if n > self.remaining() {
            return Err(BsonError::UnexpectedEnd { offset: self.pos });
        }
        let slice = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    #[inline]
    fn array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let offset = self.pos;
        self.take(N)?
            .try_into()
            .map_err(|_| BsonError::UnexpectedEnd { offset })
    }

    #[inline]
    fn u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    #[inline]
    fn i32(&mut self) -> Result<i32> {
        self.array::<4>().map(i32::from_le_bytes)
    }

    #[inline]
    fn u32(&mut self) -> Result<u32> {
        self.array::<4>().map(u32::from_le_bytes)
    }

    #[inline]
    fn i64(&mut self) -> Result<i64> {
        self.array::<8>().map(i64::from_le_bytes)
    }

    #[inline]
    fn f64(&mut self) -> Result<f64> {
        self.array::<8>().map(f64::from_le_bytes)
    }

    /// Raw bytes of a 0-terminated name, terminator consumed but not returned.
    fn cstring_bytes(&mut self) -> Result<&'a [u8]> {
        let start = self.pos;
        let len = self.buf[start..self.limit.max(start)]
            .iter()
            .position(|&b| b == 0)
            .ok_or(BsonError::MissingCStringTerminator { offset: start })?;
        self.pos = start + len + 1;
        Ok(&self.buf[start..start + len])
    }

    fn cstring(&mut self) -> Result<&'a str> {
        std::str::from_utf8(self.cstring_bytes()?).map_err(|_| BsonError::InvalidUtf8)
    }

    /// Length-prefixed string: i32 length including the trailing 0.
    fn string(&mut self) -> Result<&'a str> {
        let len = self.i32()?;
        if len < 1 || len as usize > self.remaining() {
            return Err(BsonError::InvalidStringLength);
        }
        let bytes = self.take(len as usize)?;
        let (body, terminator) = bytes.split_at(bytes.len() - 1);
        if terminator != [0] {
            return Err(BsonError::InvalidStringTerminator);
        }
        std::str::from_utf8(body).map_err(|_| BsonError::InvalidUtf8)
    }

    fn object_id(&mut self) -> Result<ObjectId> {
        self.array::<OBJECT_ID_LEN>().map(ObjectId)
    }

    /// Validate an embedded document/array frame starting at the cursor.
    /// Returns `(body_start, body_end)`; the cursor is left past the frame.
    fn embedded_frame(&mut self) -> Result<(usize, usize)> {
        let start = self.pos;
        let size = self.i32()?;
        if size < MIN_DOCUMENT_SIZE as i32 || size as usize > self.limit - start {
            return Err(BsonError::InvalidObjectLength);
        }
        let end = start + size as usize;
        if self.buf[end - 1] != 0 {
            return Err(BsonError::BadEmbeddedTerminator);
        }
        self.pos = end;
        Ok((start + SIZE_PREFIX_LEN, end - 1))
    }
}

// ─── Single element ─────────────────────────────────────────────────────────

/// Decode the element starting at `offset`: type tag, name, value.
///
/// Returns the name, the value and the offset just past the element. Never
/// reads at or beyond `limit`.
pub fn decode_element(
    buf: &[u8],
    offset: usize,
    limit: usize,
    opts: &CodecOptions,
) -> Result<(SmolStr, BsonValue, usize)> {
    read_element(buf, offset, limit, opts, 0)
}

/// `depth` counts the embedded documents enclosing this element.
fn read_element(
    buf: &[u8],
    offset: usize,
    limit: usize,
    opts: &CodecOptions,
    depth: usize,
) -> Result<(SmolStr, BsonValue, usize)> {
    let mut reader = Reader::new(buf, offset, limit);
    let tag = reader.u8()?;
    let name = SmolStr::from(reader.cstring()?);
    let value = read_value(&mut reader, tag, opts, depth)?;
    Ok((name, value, reader.pos))
}

fn read_value(
    r: &mut Reader<'_>,
    tag: u8,
    opts: &CodecOptions,
    depth: usize,
) -> Result<BsonValue> {
    Ok(match tag {
        TAG_DOUBLE => BsonValue::Double(r.f64()?),
        TAG_STRING | TAG_SYMBOL => BsonValue::String(SmolStr::from(r.string()?)),
        TAG_DOCUMENT => {
            let doc = read_embedded_document(r, opts, depth)?;
            into_db_ref(doc)
        }
        TAG_ARRAY => BsonValue::Array(read_array(r, opts, depth)?),
        TAG_BINARY => read_binary(r, opts.uuid_representation)?,
        TAG_UNDEFINED | TAG_NULL => BsonValue::Null,
        TAG_OBJECT_ID => BsonValue::ObjectId(r.object_id()?),
        TAG_BOOLEAN => BsonValue::Boolean(r.u8()? == 1),
        TAG_DATETIME => BsonValue::DateTime(DateTime {
            millis: r.i64()?,
            tz_aware: opts.tz_aware,
        }),
        TAG_REGEX => {
            let pattern = SmolStr::from(r.cstring()?);
            let options = SmolStr::from(r.cstring()?);
            BsonValue::Regex(Regex { pattern, options })
        }
        TAG_DB_POINTER => {
            let collection = SmolStr::from(r.string()?);
            let oid = r.object_id()?;
            BsonValue::DbRef(DbRef {
                collection,
                id: Some(Box::new(BsonValue::ObjectId(oid))),
                database: None,
                extra: Document::new(),
            })
        }
        TAG_JAVASCRIPT => BsonValue::JavaScriptCode(Code {
            code: SmolStr::from(r.string()?),
            scope: None,
        }),
        TAG_JAVASCRIPT_WITH_SCOPE => {
            let start = r.pos;
            let total = r.i32()?;
            let code = SmolStr::from(r.string()?);
            let scope = read_embedded_document(r, opts, depth)?;
            if total < 0 || r.pos - start != total as usize {
                return Err(BsonError::InvalidCodeWithScopeLength);
            }
            BsonValue::JavaScriptCode(Code {
                code,
                scope: Some(scope),
            })
        }
        TAG_INT32 => BsonValue::Int32(r.i32()?),
        TAG_TIMESTAMP => {
            let increment = r.u32()?;
            let time = r.u32()?;
            BsonValue::Timestamp(Timestamp { time, increment })
        }
        TAG_INT64 => BsonValue::Int64(r.i64()?),
        TAG_MIN_KEY => BsonValue::MinKey,
        TAG_MAX_KEY => BsonValue::MaxKey,
        other => return Err(BsonError::UnknownTypeTag(other)),
    })
}

/// Depth of a container opened inside an element at `depth`.
#[inline]
fn nested(depth: usize) -> Result<usize> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(BsonError::NestingTooDeep(MAX_NESTING_DEPTH));
    }
    Ok(depth + 1)
}

fn read_embedded_document(
    r: &mut Reader<'_>,
    opts: &CodecOptions,
    depth: usize,
) -> Result<Document> {
    let depth = nested(depth)?;
    let (body_start, body_end) = r.embedded_frame()?;
    decode_elements(r.buf, body_start, body_end, opts, depth)
}

fn read_array(r: &mut Reader<'_>, opts: &CodecOptions, depth: usize) -> Result<Vec<BsonValue>> {
    let depth = nested(depth)?;
    let (body_start, body_end) = r.embedded_frame()?;
    let mut items = Reader::new(r.buf, body_start, body_end);
    let mut result = Vec::new();
    while items.pos < body_end {
        let tag = items.u8()?;
        // Array keys are positional; skip them.
        items.cstring_bytes()?;
        result.push(read_value(&mut items, tag, opts, depth)?);
    }
    Ok(result)
}

fn read_binary(r: &mut Reader<'_>, repr: UuidRepresentation) -> Result<BsonValue> {
    let len = r.i32()?;
    let subtype = r.u8()?;
    if len < 0 {
        return Err(BsonError::InvalidBinaryLength);
    }
    let mut len = len as usize;
    if subtype == SUBTYPE_OLD_BINARY {
        let inner = r.i32()?;
        if inner < 0 || inner as usize + 4 != len {
            return Err(BsonError::InvalidBinaryLength);
        }
        len = inner as usize;
    }
    let bytes = r.take(len)?;
    if subtype == SUBTYPE_UUID_OLD || subtype == SUBTYPE_UUID {
        return decode_uuid(bytes, repr).map(BsonValue::Uuid);
    }
    Ok(BsonValue::Binary(Binary {
        subtype,
        bytes: bytes.to_vec(),
    }))
}

/// Both UUID subtypes are reordered according to `repr`.
fn decode_uuid(bytes: &[u8], repr: UuidRepresentation) -> Result<Uuid> {
    let mut out: [u8; UUID_LEN] = bytes
        .try_into()
        .map_err(|_| BsonError::InvalidUuidLength(bytes.len()))?;
    match repr {
        UuidRepresentation::JavaLegacy => {
            out[0..8].reverse();
            out[8..16].reverse();
        }
        UuidRepresentation::CSharpLegacy => {
            out[0..4].reverse();
            out[4..6].reverse();
            out[6..8].reverse();
        }
        UuidRepresentation::PythonLegacy | UuidRepresentation::Standard => {}
    }
    Ok(Uuid(out))
}

/// A document carrying a string `$ref` becomes a [`DbRef`].
fn into_db_ref(mut doc: Document) -> BsonValue {
    let collection = match doc.get("$ref") {
        Some(BsonValue::String(s)) => s.clone(),
        _ => return BsonValue::Document(doc),
    };
    doc.remove("$ref");
    let id = doc.remove("$id").map(Box::new);
    let database = match doc.get("$db") {
        Some(BsonValue::String(s)) => {
            let db = s.clone();
            doc.remove("$db");
            Some(db)
        }
        _ => None,
    };
    BsonValue::DbRef(DbRef {
        collection,
        id,
        database,
        extra: doc,
    })
}

// ─── Whole documents ────────────────────────────────────────────────────────

/// Decode every element in `buf[start..end]`, where `end` is the offset of
/// the document's terminator byte.
fn decode_elements(
    buf: &[u8],
    start: usize,
    end: usize,
    opts: &CodecOptions,
    depth: usize,
) -> Result<Document> {
    let mut doc = Document::new();
    let mut pos = start;
    while pos < end {
        let (name, value, next) = read_element(buf, pos, end, opts, depth)?;
        doc.insert(name, value);
        pos = next;
    }
    Ok(doc)
}

/// Read and check the size prefix and terminator of the document at the
/// start of `buf`. Returns the declared size.
///
/// With `exact`, the declared size must equal `buf.len()`; otherwise it only
/// has to fit.
pub(crate) fn check_document_frame(buf: &[u8], exact: bool) -> Result<usize> {
    let prefix: [u8; 4] = buf
        .get(..SIZE_PREFIX_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or(BsonError::INVALID_OBJECT_SIZE)?;
    let declared = i32::from_le_bytes(prefix);
    if declared < MIN_DOCUMENT_SIZE as i32 {
        return Err(BsonError::INVALID_OBJECT_SIZE);
    }
    let size = declared as usize;
    if size > buf.len() || (exact && size != buf.len()) {
        return Err(BsonError::INVALID_OBJECT_SIZE);
    }
    if buf[size - 1] != 0 {
        return Err(BsonError::BAD_TERMINATOR);
    }
    Ok(size)
}

/// Fully decode one document into a plain [`Document`].
///
/// The buffer must hold exactly one document: its declared size must equal
/// the buffer length.
pub fn decode_document(buf: &[u8], opts: &CodecOptions) -> Result<Document> {
    let size = check_document_frame(buf, true)?;
    decode_elements(buf, SIZE_PREFIX_LEN, size - 1, opts, 0)
}

/// Check that `buf` is exactly one well-formed document.
pub fn is_valid(buf: &[u8]) -> bool {
    decode_document(buf, &DEFAULT_CODEC_OPTIONS).is_ok()
}

// ─── Multi-document decoding ────────────────────────────────────────────────

/// Target type for the multi-document decoders: eager ([`Document`]) or lazy
/// ([`crate::RawDocument`]).
pub trait FromBsonBytes: Sized {
    /// `bytes` holds exactly one document.
    fn from_bson_bytes(bytes: Bytes, opts: &CodecOptions) -> Result<Self>;
}

impl FromBsonBytes for Document {
    #[inline]
    fn from_bson_bytes(bytes: Bytes, opts: &CodecOptions) -> Result<Self> {
        decode_document(&bytes, opts)
    }
}

/// Decode a buffer of concatenated documents.
pub fn decode_all<D: FromBsonBytes>(data: Bytes, opts: &CodecOptions) -> Result<Vec<D>> {
    decode_iter(data, opts).collect()
}

/// Lazily decode a buffer of concatenated documents, one per pull.
pub fn decode_iter<D: FromBsonBytes>(data: Bytes, opts: &CodecOptions) -> DocumentIter<D> {
    DocumentIter {
        data,
        pos: 0,
        opts: *opts,
        failed: false,
        _target: PhantomData,
    }
}

pub struct DocumentIter<D> {
    data: Bytes,
    pos: usize,
    opts: CodecOptions,
    failed: bool,
    _target: PhantomData<fn() -> D>,
}

impl<D: FromBsonBytes> DocumentIter<D> {
    fn next_document(&mut self) -> Result<D> {
        let size = check_document_frame(&self.data[self.pos..], false)?;
        let doc = self.data.slice(self.pos..self.pos + size);
        self.pos += size;
        D::from_bson_bytes(doc, &self.opts)
    }
}

impl<D: FromBsonBytes> Iterator for DocumentIter<D> {
    type Item = Result<D>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed || self.pos >= self.data.len() {
            return None;
        }
        let item = self.next_document();
        self.failed = item.is_err();
        Some(item)
    }
}
