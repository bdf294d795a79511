use super::readable::ReadableDocument;
use super::scanner::{ElementScanner, scan};
use crate::codec_options::CodecOptions;
use crate::decode::{FromBsonBytes, decode_document};
use crate::document::Document;
use crate::error::{BsonError, Result};
use crate::value::BsonValue;
use bytes::Bytes;
use serde::ser::{Serialize, Serializer};
use smol_str::SmolStr;
use std::fmt;
use std::sync::OnceLock;

// ─── RawDocument ────────────────────────────────────────────────────────────

/// Read-through view over the bytes of one encoded document.
///
/// Construction never decodes. The view is either lazy (nothing cached) or
/// materialized (the whole document decoded once into a [`Document`] and kept
/// for the life of the view). A failed decode leaves it lazy.
///
/// | operation         | lazy                          | materialized |
/// |-------------------|-------------------------------|--------------|
/// | `get`             | materializes                  | cache lookup |
/// | `contains_key`    | scans, stops at first match   | cache lookup |
/// | `len` / `keys`    | materializes                  | cache        |
/// | `iter`            | scans, no caching             | cache        |
/// | `try_eq`          | materializes both sides       | cache        |
/// | `raw`             | no decode                     | no decode    |
#[derive(Clone)]
pub struct RawDocument {
    raw: Bytes,
    opts: CodecOptions,
    inflated: OnceLock<Document>,
}

impl RawDocument {
    /// Wrap `raw` without validating it. Problems surface on first read.
    pub fn new(raw: impl Into<Bytes>, opts: &CodecOptions) -> Self {
        Self {
            raw: raw.into(),
            // Own snapshot of the two decoding settings.
            opts: CodecOptions {
                tz_aware: opts.tz_aware,
                uuid_representation: opts.uuid_representation,
            },
            inflated: OnceLock::new(),
        }
    }

    /// The bytes this view was built from, untouched.
    #[inline]
    pub fn raw(&self) -> &Bytes {
        &self.raw
    }

    #[inline]
    pub fn codec_options(&self) -> &CodecOptions {
        &self.opts
    }

    #[inline]
    pub fn is_materialized(&self) -> bool {
        self.inflated.get().is_some()
    }

    /// A fresh element scanner over the raw bytes. Never touches the cache.
    pub fn scan(&self) -> Result<ElementScanner<'_>> {
        scan(&self.raw, &self.opts)
    }

    /// The fully decoded document, decoding and caching it on first use.
    ///
    /// Concurrent first calls may each decode, but only one result is
    /// published and every caller sees that one. Errors are not cached.
    pub fn materialize(&self) -> Result<&Document> {
        if let Some(doc) = self.inflated.get() {
            return Ok(doc);
        }
        let doc = decode_document(&self.raw, &self.opts)?;
        Ok(self.inflated.get_or_init(|| doc))
    }

    /// An owned copy of the fully decoded document.
    pub fn to_document(&self) -> Result<Document> {
        self.materialize().cloned()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Mapping operations
    // ════════════════════════════════════════════════════════════════════════

    /// Look up a top-level field. Materializes the document on first use.
    pub fn get(&self, name: &str) -> Result<Option<&BsonValue>> {
        Ok(self.materialize()?.get(name))
    }

    /// Membership test. While lazy this walks the elements and stops at the
    /// first match without populating the cache.
    pub fn contains_key(&self, name: &str) -> Result<bool> {
        if let Some(doc) = self.inflated.get() {
            return Ok(doc.contains_key(name));
        }
        for item in self.scan()? {
            let (field, _) = item?;
            if field == name {
                return Ok(true);
            }
        }
        Ok(false)
    }

    pub fn len(&self) -> Result<usize> {
        Ok(self.materialize()?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.materialize()?.is_empty())
    }

    /// Field names in encoded order. Materializes the document.
    pub fn keys(&self) -> Result<impl ExactSizeIterator<Item = &SmolStr> + '_> {
        Ok(self.materialize()?.keys())
    }

    /// Name/value pairs in encoded order.
    ///
    /// Reads from the cache when materialized; otherwise decodes lazily, one
    /// element per pull, and leaves the cache alone. Framing errors come out
    /// as the first item.
    pub fn iter(&self) -> Items<'_> {
        let state = match self.inflated.get() {
            Some(doc) => ItemsState::Cached(doc.entries().iter()),
            None => match self.scan() {
                Ok(scanner) => ItemsState::Scanning(scanner),
                Err(e) => ItemsState::Failed(Some(e)),
            },
        };
        Items { state }
    }

    /// Compare fully decoded forms. Materializes both sides.
    pub fn try_eq(&self, other: &RawDocument) -> Result<bool> {
        Ok(self.materialize()? == other.materialize()?)
    }

    pub fn eq_document(&self, other: &Document) -> Result<bool> {
        Ok(self.materialize()? == other)
    }
}

impl ReadableDocument for RawDocument {
    #[inline]
    fn get_value(&self, name: &str) -> Result<Option<&BsonValue>> {
        self.get(name)
    }

    #[inline]
    fn has_field(&self, name: &str) -> Result<bool> {
        self.contains_key(name)
    }

    #[inline]
    fn field_count(&self) -> Result<usize> {
        self.len()
    }
}

impl FromBsonBytes for RawDocument {
    #[inline]
    fn from_bson_bytes(bytes: Bytes, opts: &CodecOptions) -> Result<Self> {
        Ok(RawDocument::new(bytes, opts))
    }
}

/// Documents that fail to decode compare unequal.
impl PartialEq for RawDocument {
    fn eq(&self, other: &Self) -> bool {
        self.try_eq(other).unwrap_or(false)
    }
}

impl PartialEq<Document> for RawDocument {
    fn eq(&self, other: &Document) -> bool {
        self.eq_document(other).unwrap_or(false)
    }
}

/// Does not decode: shows the byte length and the cache state.
impl fmt::Debug for RawDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawDocument")
            .field("len_bytes", &self.raw.len())
            .field("materialized", &self.is_materialized())
            .finish()
    }
}

impl Serialize for RawDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.materialize()
            .map_err(<S::Error as serde::ser::Error>::custom)?
            .serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a RawDocument {
    type Item = Result<(SmolStr, BsonValue)>;
    type IntoIter = Items<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ─── Iterator ───────────────────────────────────────────────────────────────

pub struct Items<'a> {
    state: ItemsState<'a>,
}

enum ItemsState<'a> {
    Cached(std::slice::Iter<'a, (SmolStr, BsonValue)>),
    Scanning(ElementScanner<'a>),
    Failed(Option<BsonError>),
}

impl<'a> Iterator for Items<'a> {
    type Item = Result<(SmolStr, BsonValue)>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.state {
            ItemsState::Cached(entries) => entries.next().map(|(k, v)| Ok((k.clone(), v.clone()))),
            ItemsState::Scanning(scanner) => scanner.next(),
            ItemsState::Failed(err) => err.take().map(Err),
        }
    }
}
