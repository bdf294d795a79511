use crate::document::Document;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, SerializeStruct, Serializer};
use smol_str::SmolStr;
use std::fmt;

// ─── ObjectId ───────────────────────────────────────────────────────────────

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectId(pub [u8; 12]);

impl ObjectId {
    #[inline]
    pub fn bytes(&self) -> [u8; 12] {
        self.0
    }

    /// Seconds since the epoch, from the big-endian leading 4 bytes.
    #[inline]
    pub fn timestamp(&self) -> u32 {
        u32::from_be_bytes([self.0[0], self.0[1], self.0[2], self.0[3]])
    }

    pub fn to_hex(&self) -> String {
        to_hex(&self.0)
    }
}

impl fmt::Debug for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectId({})", self.to_hex())
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

// ─── Uuid ───────────────────────────────────────────────────────────────────

/// A UUID held in standard (RFC 4122) byte order.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Uuid(pub [u8; 16]);

impl Uuid {
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let hex = to_hex(&self.0);
        write!(
            f,
            "{}-{}-{}-{}-{}",
            &hex[0..8],
            &hex[8..12],
            &hex[12..16],
            &hex[16..20],
            &hex[20..32]
        )
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Uuid({})", self)
    }
}

// ─── DateTime ───────────────────────────────────────────────────────────────

/// Milliseconds since the Unix epoch, tagged with the awareness policy that
/// was in force when it was decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateTime {
    pub millis: i64,
    pub tz_aware: bool,
}

impl DateTime {
    #[inline]
    pub fn timestamp_millis(&self) -> i64 {
        self.millis
    }

    /// Whole seconds, rounded toward negative infinity.
    #[inline]
    pub fn timestamp_secs(&self) -> i64 {
        self.millis.div_euclid(1000)
    }

    /// Sub-second part in microseconds, always in `0..1_000_000`.
    #[inline]
    pub fn subsec_micros(&self) -> u32 {
        (self.millis.rem_euclid(1000) * 1000) as u32
    }
}

// ─── Small value types ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binary {
    pub subtype: u8,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Regex {
    pub pattern: SmolStr,
    pub options: SmolStr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timestamp {
    pub time: u32,
    pub increment: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub code: SmolStr,
    pub scope: Option<Document>,
}

/// A database reference, from either a `$ref` document or a DBPointer.
#[derive(Debug, Clone, PartialEq)]
pub struct DbRef {
    pub collection: SmolStr,
    pub id: Option<Box<BsonValue>>,
    pub database: Option<SmolStr>,
    /// Any fields besides `$ref`, `$id` and `$db`.
    pub extra: Document,
}

// ─── BsonValue ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum BsonValue {
    Double(f64),
    String(SmolStr),
    Document(Document),
    Array(Vec<BsonValue>),
    Binary(Binary),
    Uuid(Uuid),
    ObjectId(ObjectId),
    Boolean(bool),
    DateTime(DateTime),
    /// Null and the deprecated undefined both land here.
    Null,
    Regex(Regex),
    DbRef(DbRef),
    JavaScriptCode(Code),
    Int32(i32),
    Timestamp(Timestamp),
    Int64(i64),
    MinKey,
    MaxKey,
}

impl Default for BsonValue {
    fn default() -> Self {
        BsonValue::Null
    }
}

impl BsonValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            BsonValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            BsonValue::Int32(i) => Some(*i),
            _ => None,
        }
    }

    /// Either integer width, widened to i64.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            BsonValue::Int32(i) => Some(*i as i64),
            BsonValue::Int64(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            BsonValue::Double(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            BsonValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            BsonValue::Document(doc) => Some(doc),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[BsonValue]> {
        match self {
            BsonValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, BsonValue::Null)
    }
}

// ─── Serialize (JSON-friendly view) ─────────────────────────────────────────

impl Serialize for BsonValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            BsonValue::Double(f) => serializer.serialize_f64(*f),
            BsonValue::String(s) => serializer.serialize_str(s.as_str()),
            BsonValue::Document(doc) => doc.serialize(serializer),
            BsonValue::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for v in arr {
                    seq.serialize_element(v)?;
                }
                seq.end()
            }
            BsonValue::Binary(bin) => {
                let mut s = serializer.serialize_struct("Binary", 2)?;
                s.serialize_field("subtype", &bin.subtype)?;
                s.serialize_field("bytes", &to_hex(&bin.bytes))?;
                s.end()
            }
            BsonValue::Uuid(uuid) => serializer.collect_str(uuid),
            BsonValue::ObjectId(oid) => serializer.serialize_str(&oid.to_hex()),
            BsonValue::Boolean(b) => serializer.serialize_bool(*b),
            BsonValue::DateTime(dt) => {
                let mut m = serializer.serialize_map(Some(1))?;
                m.serialize_entry("$date", &dt.millis)?;
                m.end()
            }
            BsonValue::Null => serializer.serialize_none(),
            BsonValue::Regex(re) => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("$regex", re.pattern.as_str())?;
                m.serialize_entry("$options", re.options.as_str())?;
                m.end()
            }
            BsonValue::DbRef(dbref) => {
                let mut m = serializer.serialize_map(None)?;
                m.serialize_entry("$ref", dbref.collection.as_str())?;
                if let Some(id) = &dbref.id {
                    m.serialize_entry("$id", id.as_ref())?;
                }
                if let Some(db) = &dbref.database {
                    m.serialize_entry("$db", db.as_str())?;
                }
                for (k, v) in dbref.extra.iter() {
                    m.serialize_entry(k.as_str(), v)?;
                }
                m.end()
            }
            BsonValue::JavaScriptCode(code) => {
                let mut m = serializer.serialize_map(None)?;
                m.serialize_entry("$code", code.code.as_str())?;
                if let Some(scope) = &code.scope {
                    m.serialize_entry("$scope", scope)?;
                }
                m.end()
            }
            BsonValue::Int32(i) => serializer.serialize_i32(*i),
            BsonValue::Timestamp(ts) => {
                let mut m = serializer.serialize_map(Some(2))?;
                m.serialize_entry("t", &ts.time)?;
                m.serialize_entry("i", &ts.increment)?;
                m.end()
            }
            BsonValue::Int64(i) => serializer.serialize_i64(*i),
            BsonValue::MinKey => {
                let mut m = serializer.serialize_map(Some(1))?;
                m.serialize_entry("$minKey", &1)?;
                m.end()
            }
            BsonValue::MaxKey => {
                let mut m = serializer.serialize_map(Some(1))?;
                m.serialize_entry("$maxKey", &1)?;
                m.end()
            }
        }
    }
}

// ─── From impls ─────────────────────────────────────────────────────────────

impl From<f64> for BsonValue {
    fn from(n: f64) -> Self {
        BsonValue::Double(n)
    }
}

impl From<i32> for BsonValue {
    fn from(n: i32) -> Self {
        BsonValue::Int32(n)
    }
}

impl From<i64> for BsonValue {
    fn from(n: i64) -> Self {
        BsonValue::Int64(n)
    }
}

impl From<bool> for BsonValue {
    fn from(b: bool) -> Self {
        BsonValue::Boolean(b)
    }
}

impl From<&str> for BsonValue {
    fn from(s: &str) -> Self {
        BsonValue::String(SmolStr::from(s))
    }
}

impl From<String> for BsonValue {
    fn from(s: String) -> Self {
        BsonValue::String(SmolStr::from(s))
    }
}

impl From<Document> for BsonValue {
    fn from(doc: Document) -> Self {
        BsonValue::Document(doc)
    }
}

impl From<Vec<BsonValue>> for BsonValue {
    fn from(arr: Vec<BsonValue>) -> Self {
        BsonValue::Array(arr)
    }
}

impl From<ObjectId> for BsonValue {
    fn from(oid: ObjectId) -> Self {
        BsonValue::ObjectId(oid)
    }
}

// ─── From<serde_json::Value> ────────────────────────────────────────────────

/// Integers that fit in 32 bits become `Int32`, others `Int64`.
impl From<serde_json::Value> for BsonValue {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => BsonValue::Null,
            serde_json::Value::Bool(b) => BsonValue::Boolean(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => BsonValue::Int32(small),
                        Err(_) => BsonValue::Int64(i),
                    }
                } else {
                    BsonValue::Double(n.as_f64().unwrap_or(0.0))
                }
            }
            serde_json::Value::String(s) => BsonValue::String(SmolStr::from(s)),
            serde_json::Value::Array(arr) => {
                BsonValue::Array(arr.into_iter().map(BsonValue::from).collect())
            }
            serde_json::Value::Object(obj) => BsonValue::Document(
                obj.into_iter()
                    .map(|(k, v)| (SmolStr::from(k), BsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

fn to_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push(DIGITS[(b >> 4) as usize] as char);
        out.push(DIGITS[(b & 0x0f) as usize] as char);
    }
    out
}
