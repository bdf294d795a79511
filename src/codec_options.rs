use serde::{Deserialize, Serialize};

// ─── UuidRepresentation ─────────────────────────────────────────────────────

/// Byte order used when a legacy (subtype 3) binary is read as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UuidRepresentation {
    #[default]
    PythonLegacy,
    Standard,
    JavaLegacy,
    CSharpLegacy,
}

impl UuidRepresentation {
    pub fn code(self) -> u8 {
        match self {
            UuidRepresentation::PythonLegacy => 3,
            UuidRepresentation::Standard => 4,
            UuidRepresentation::JavaLegacy => 5,
            UuidRepresentation::CSharpLegacy => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            3 => Some(UuidRepresentation::PythonLegacy),
            4 => Some(UuidRepresentation::Standard),
            5 => Some(UuidRepresentation::JavaLegacy),
            6 => Some(UuidRepresentation::CSharpLegacy),
            _ => None,
        }
    }
}

// ─── CodecOptions ───────────────────────────────────────────────────────────

/// Decoding policy shared by every decoder in the crate.
///
/// The value is `Copy`: anything that keeps options around keeps its own
/// snapshot, so later changes to the caller's value never leak in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    /// Tag decoded datetimes as UTC-aware instead of naive.
    pub tz_aware: bool,
    pub uuid_representation: UuidRepresentation,
}

pub const DEFAULT_CODEC_OPTIONS: CodecOptions = CodecOptions {
    tz_aware: false,
    uuid_representation: UuidRepresentation::PythonLegacy,
};

impl CodecOptions {
    #[inline]
    pub fn with_tz_aware(mut self, tz_aware: bool) -> Self {
        self.tz_aware = tz_aware;
        self
    }

    #[inline]
    pub fn with_uuid_representation(mut self, uuid_representation: UuidRepresentation) -> Self {
        self.uuid_representation = uuid_representation;
        self
    }
}
