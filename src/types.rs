// ─── Element Type Tags ──────────────────────────────────────────────────────
pub const TAG_DOUBLE: u8 = 0x01;
pub const TAG_STRING: u8 = 0x02;
pub const TAG_DOCUMENT: u8 = 0x03;
pub const TAG_ARRAY: u8 = 0x04;
pub const TAG_BINARY: u8 = 0x05;
pub const TAG_UNDEFINED: u8 = 0x06; // Deprecated
pub const TAG_OBJECT_ID: u8 = 0x07;
pub const TAG_BOOLEAN: u8 = 0x08;
pub const TAG_DATETIME: u8 = 0x09;
pub const TAG_NULL: u8 = 0x0A;
pub const TAG_REGEX: u8 = 0x0B;
pub const TAG_DB_POINTER: u8 = 0x0C; // Deprecated
pub const TAG_JAVASCRIPT: u8 = 0x0D;
pub const TAG_SYMBOL: u8 = 0x0E; // Deprecated
pub const TAG_JAVASCRIPT_WITH_SCOPE: u8 = 0x0F;
pub const TAG_INT32: u8 = 0x10;
pub const TAG_TIMESTAMP: u8 = 0x11;
pub const TAG_INT64: u8 = 0x12;
pub const TAG_MAX_KEY: u8 = 0x7F;
pub const TAG_MIN_KEY: u8 = 0xFF;

// ─── Binary Subtypes ────────────────────────────────────────────────────────
pub const SUBTYPE_GENERIC: u8 = 0x00;
pub const SUBTYPE_OLD_BINARY: u8 = 0x02;
pub const SUBTYPE_UUID_OLD: u8 = 0x03;
pub const SUBTYPE_UUID: u8 = 0x04;

// ─── Binary Layout ──────────────────────────────────────────────────────────
//
//  ┌──────────────────────────────────────────────┐
//  │ total_size: i32 (LE)   ← includes itself     │
//  ├──────────────────────────────────────────────┤
//  │ Elements (repeated)                          │
//  │   type_tag: u8                               │
//  │   name:     C string (UTF-8, 0-terminated)   │
//  │   value:    tag-dependent payload            │
//  ├──────────────────────────────────────────────┤
//  │ terminator: 0x00       ← at total_size - 1   │
//  └──────────────────────────────────────────────┘

pub const SIZE_PREFIX_LEN: usize = 4;
/// Size prefix plus terminator: the smallest possible document.
pub const MIN_DOCUMENT_SIZE: usize = 5;
pub const OBJECT_ID_LEN: usize = 12;
pub const UUID_LEN: usize = 16;
/// Deepest embedded document/array accepted below the top-level document.
pub const MAX_NESTING_DEPTH: usize = 100;
