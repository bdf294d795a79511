use crate::document::Document;
use crate::error::Result;
use crate::value::BsonValue;

/// Read-only mapping surface shared by eager and lazy documents.
///
/// Lookups are fallible because a lazy document may only discover that its
/// bytes are corrupt when it is first read.
pub trait ReadableDocument {
    fn get_value(&self, name: &str) -> Result<Option<&BsonValue>>;
    fn has_field(&self, name: &str) -> Result<bool>;
    fn field_count(&self) -> Result<usize>;

    // ════════════════════════════════════════════════════════════════════════
    // Typed access
    // ════════════════════════════════════════════════════════════════════════

    /// Get a string field. `None` if absent or not a string.
    #[inline]
    fn get_str(&self, name: &str) -> Result<Option<&str>> {
        Ok(self.get_value(name)?.and_then(BsonValue::as_str))
    }

    #[inline]
    fn get_i32(&self, name: &str) -> Result<Option<i32>> {
        Ok(self.get_value(name)?.and_then(BsonValue::as_i32))
    }

    /// Get an integer field of either width.
    #[inline]
    fn get_i64(&self, name: &str) -> Result<Option<i64>> {
        Ok(self.get_value(name)?.and_then(BsonValue::as_i64))
    }

    #[inline]
    fn get_f64(&self, name: &str) -> Result<Option<f64>> {
        Ok(self.get_value(name)?.and_then(BsonValue::as_f64))
    }

    #[inline]
    fn get_bool(&self, name: &str) -> Result<Option<bool>> {
        Ok(self.get_value(name)?.and_then(BsonValue::as_bool))
    }

    fn get_document(&self, name: &str) -> Result<Option<&Document>> {
        Ok(self.get_value(name)?.and_then(BsonValue::as_document))
    }

    fn get_array(&self, name: &str) -> Result<Option<&[BsonValue]>> {
        Ok(self.get_value(name)?.and_then(BsonValue::as_array))
    }
}

impl ReadableDocument for Document {
    #[inline]
    fn get_value(&self, name: &str) -> Result<Option<&BsonValue>> {
        Ok(self.get(name))
    }

    #[inline]
    fn has_field(&self, name: &str) -> Result<bool> {
        Ok(self.contains_key(name))
    }

    #[inline]
    fn field_count(&self) -> Result<usize> {
        Ok(self.len())
    }
}
