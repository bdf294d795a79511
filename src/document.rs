use crate::value::BsonValue;
use rustc_hash::FxHashMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use smol_str::SmolStr;
use std::fmt;

// ─── Document ───────────────────────────────────────────────────────────────

/// A fully decoded document: entries in encoded order plus a name index.
///
/// Inserting an existing name replaces its value but keeps its original
/// position, so the later value wins and the first position is kept.
#[derive(Clone, Default)]
pub struct Document {
    entries: Vec<(SmolStr, BsonValue)>,
    index: FxHashMap<SmolStr, usize>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the previous value if `name` was already present.
    pub fn insert(&mut self, name: impl Into<SmolStr>, value: impl Into<BsonValue>) -> Option<BsonValue> {
        let name = name.into();
        let value = value.into();
        match self.index.get(&name) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<BsonValue> {
        let pos = self.index.remove(name)?;
        let (_, value) = self.entries.remove(pos);
        for slot in self.index.values_mut() {
            if *slot > pos {
                *slot -= 1;
            }
        }
        Some(value)
    }

    #[inline]
    pub fn get(&self, name: &str) -> Option<&BsonValue> {
        self.index.get(name).map(|&pos| &self.entries[pos].1)
    }

    #[inline]
    pub fn contains_key(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&SmolStr, &BsonValue)> + '_ {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl ExactSizeIterator<Item = &SmolStr> + '_ {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl ExactSizeIterator<Item = &BsonValue> + '_ {
        self.entries.iter().map(|(_, v)| v)
    }

    #[inline]
    pub(crate) fn entries(&self) -> &[(SmolStr, BsonValue)] {
        &self.entries
    }
}

/// Mapping equality: same names, equal values, order ignored.
impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .entries
                .iter()
                .all(|(k, v)| other.get(k.as_str()) == Some(v))
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<SmolStr>, V: Into<BsonValue>> FromIterator<(K, V)> for Document {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut doc = Document::new();
        for (k, v) in iter {
            doc.insert(k, v);
        }
        doc
    }
}

impl IntoIterator for Document {
    type Item = (SmolStr, BsonValue);
    type IntoIter = std::vec::IntoIter<(SmolStr, BsonValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Document {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut m = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            m.serialize_entry(k.as_str(), v)?;
        }
        m.end()
    }
}
