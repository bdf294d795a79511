//! Fixture builder for tests. Emits element bytes directly; the crate itself
//! has no encoder.

use crate::types::*;

#[derive(Default)]
pub(crate) struct DocBuilder {
    body: Vec<u8>,
}

impl DocBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Length-prefixed, 0-terminated string payload.
    pub(crate) fn string_payload(s: &str) -> Vec<u8> {
        let mut out = ((s.len() + 1) as i32).to_le_bytes().to_vec();
        out.extend_from_slice(s.as_bytes());
        out.push(0);
        out
    }

    pub(crate) fn raw_element(mut self, tag: u8, name: &str, payload: &[u8]) -> Self {
        self.body.push(tag);
        self.body.extend_from_slice(name.as_bytes());
        self.body.push(0);
        self.body.extend_from_slice(payload);
        self
    }

    pub(crate) fn double(self, name: &str, v: f64) -> Self {
        self.raw_element(TAG_DOUBLE, name, &v.to_le_bytes())
    }

    pub(crate) fn string(self, name: &str, v: &str) -> Self {
        self.raw_element(TAG_STRING, name, &Self::string_payload(v))
    }

    pub(crate) fn document(self, name: &str, doc: &[u8]) -> Self {
        self.raw_element(TAG_DOCUMENT, name, doc)
    }

    /// `arr` is a document whose keys are "0", "1", ...
    pub(crate) fn array(self, name: &str, arr: &[u8]) -> Self {
        self.raw_element(TAG_ARRAY, name, arr)
    }

    pub(crate) fn binary(self, name: &str, subtype: u8, bytes: &[u8]) -> Self {
        let mut payload = (bytes.len() as i32).to_le_bytes().to_vec();
        payload.push(subtype);
        payload.extend_from_slice(bytes);
        self.raw_element(TAG_BINARY, name, &payload)
    }

    pub(crate) fn old_binary(self, name: &str, bytes: &[u8]) -> Self {
        let mut payload = ((bytes.len() + 4) as i32).to_le_bytes().to_vec();
        payload.push(SUBTYPE_OLD_BINARY);
        payload.extend_from_slice(&(bytes.len() as i32).to_le_bytes());
        payload.extend_from_slice(bytes);
        self.raw_element(TAG_BINARY, name, &payload)
    }

    pub(crate) fn object_id(self, name: &str, oid: [u8; 12]) -> Self {
        self.raw_element(TAG_OBJECT_ID, name, &oid)
    }

    pub(crate) fn boolean(self, name: &str, v: bool) -> Self {
        self.raw_element(TAG_BOOLEAN, name, &[v as u8])
    }

    pub(crate) fn datetime(self, name: &str, millis: i64) -> Self {
        self.raw_element(TAG_DATETIME, name, &millis.to_le_bytes())
    }

    pub(crate) fn null(self, name: &str) -> Self {
        self.raw_element(TAG_NULL, name, &[])
    }

    pub(crate) fn regex(self, name: &str, pattern: &str, options: &str) -> Self {
        let mut payload = pattern.as_bytes().to_vec();
        payload.push(0);
        payload.extend_from_slice(options.as_bytes());
        payload.push(0);
        self.raw_element(TAG_REGEX, name, &payload)
    }

    pub(crate) fn code(self, name: &str, code: &str) -> Self {
        self.raw_element(TAG_JAVASCRIPT, name, &Self::string_payload(code))
    }

    pub(crate) fn code_with_scope(self, name: &str, code: &str, scope: &[u8]) -> Self {
        let code = Self::string_payload(code);
        let total = 4 + code.len() + scope.len();
        let mut payload = (total as i32).to_le_bytes().to_vec();
        payload.extend_from_slice(&code);
        payload.extend_from_slice(scope);
        self.raw_element(TAG_JAVASCRIPT_WITH_SCOPE, name, &payload)
    }

    pub(crate) fn int32(self, name: &str, v: i32) -> Self {
        self.raw_element(TAG_INT32, name, &v.to_le_bytes())
    }

    pub(crate) fn timestamp(self, name: &str, increment: u32, time: u32) -> Self {
        let mut payload = increment.to_le_bytes().to_vec();
        payload.extend_from_slice(&time.to_le_bytes());
        self.raw_element(TAG_TIMESTAMP, name, &payload)
    }

    pub(crate) fn int64(self, name: &str, v: i64) -> Self {
        self.raw_element(TAG_INT64, name, &v.to_le_bytes())
    }

    pub(crate) fn min_key(self, name: &str) -> Self {
        self.raw_element(TAG_MIN_KEY, name, &[])
    }

    pub(crate) fn max_key(self, name: &str) -> Self {
        self.raw_element(TAG_MAX_KEY, name, &[])
    }

    /// `{"a": {"a": ... {}}}` with `levels` embedded documents below the top.
    /// Written front to back so very deep fixtures stay cheap to build.
    pub(crate) fn nested_documents(levels: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(MIN_DOCUMENT_SIZE + 8 * levels);
        for i in 0..levels {
            let size = (MIN_DOCUMENT_SIZE + 8 * (levels - i)) as i32;
            out.extend_from_slice(&size.to_le_bytes());
            out.extend_from_slice(&[TAG_DOCUMENT, b'a', 0]);
        }
        out.extend_from_slice(&(MIN_DOCUMENT_SIZE as i32).to_le_bytes());
        out.resize(out.len() + levels + 1, 0);
        out
    }

    pub(crate) fn build(self) -> Vec<u8> {
        let size = (SIZE_PREFIX_LEN + self.body.len() + 1) as i32;
        let mut out = size.to_le_bytes().to_vec();
        out.extend_from_slice(&self.body);
        out.push(0);
        out
    }
}
