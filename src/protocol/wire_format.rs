//! Wire format constants and enumerations.
//!
//! Every field on the wire is a 4-byte big-endian unsigned integer or a raw
//! byte run whose length was announced by such an integer:
//!
//! ```text
//! request  = kind:u32  payload*  [sentinel]
//! response = status:u32  body    [sentinel]
//! payload  = length:u32  chunk0  (ready:u32 <- peer, chunkN)*
//! ```
//!
//! Sentinels are only present in protocol v3.

use std::fmt;

/// Size of every integer field (message kind, length, status, ready signal).
pub const U32_SIZE: usize = 4;

/// Exchange granularity for variable payloads, both directions.
pub const CHUNK_SIZE: usize = 1024;

/// Marks "logical message fully transmitted" in protocol v3.
///
/// This is also a structurally valid length/status value; the protocol relies
/// on it never occurring as one.
pub const RESYNC_SENTINEL: u32 = 0xFFFF_FFFF;

/// Value the receiver writes to pull the next chunk. The sender ignores it.
pub const READY_SIGNAL: u32 = 0;

/// Default maximum inbound payload size (1 GB).
pub const DEFAULT_MAX_PAYLOAD_SIZE: usize = 1_073_741_824;

/// Response status codes.
pub mod status {
    /// The request succeeded; a kind-specific body follows.
    pub const SUCCESS: u32 = 0;
    /// The request failed; a variable payload with diagnostic text follows.
    pub const ERROR: u32 = 1;
}

/// Closed set of request kinds the host may send.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum MessageKind {
    GetSchemaVersion = 0,
    GetPluginInfo = 1,
    GetLicenseText = 2,
    GetResolvedConfig = 3,
    SetGlobalConfig = 4,
    SetPluginConfig = 5,
    GetConfigDiagnostics = 6,
    Format = 7,
    Close = 8,
}

impl MessageKind {
    /// Decode a message kind from its wire value.
    pub fn from_u32(value: u32) -> Option<Self> {
        let kind = match value {
            0 => MessageKind::GetSchemaVersion,
            1 => MessageKind::GetPluginInfo,
            2 => MessageKind::GetLicenseText,
            3 => MessageKind::GetResolvedConfig,
            4 => MessageKind::SetGlobalConfig,
            5 => MessageKind::SetPluginConfig,
            6 => MessageKind::GetConfigDiagnostics,
            7 => MessageKind::Format,
            8 => MessageKind::Close,
            _ => return None,
        };
        Some(kind)
    }

    /// Wire value of this kind.
    #[inline]
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Number of variable payloads the host sends after the kind.
    pub fn payload_count(self) -> usize {
        match self {
            MessageKind::SetGlobalConfig | MessageKind::SetPluginConfig => 1,
            MessageKind::Format => 3,
            _ => 0,
        }
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} ({})", self, self.as_u32())
    }
}

/// Wire protocol revision.
///
/// The two revisions differ only in whether the resync sentinel trails every
/// request and response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProtocolVersion {
    /// Schema version 2: no sentinels.
    V2,
    /// Schema version 3: sentinel after every request and response.
    #[default]
    V3,
}

impl ProtocolVersion {
    /// Parse a schema version number.
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            2 => Some(ProtocolVersion::V2),
            3 => Some(ProtocolVersion::V3),
            _ => None,
        }
    }

    /// Schema version number reported by `GetSchemaVersion`.
    #[inline]
    pub fn as_u32(self) -> u32 {
        match self {
            ProtocolVersion::V2 => 2,
            ProtocolVersion::V3 => 3,
        }
    }

    /// Whether requests and responses are followed by [`RESYNC_SENTINEL`].
    #[inline]
    pub fn uses_sentinel(self) -> bool {
        matches!(self, ProtocolVersion::V3)
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.as_u32())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_kind_values() {
        assert_eq!(MessageKind::GetSchemaVersion.as_u32(), 0);
        assert_eq!(MessageKind::GetPluginInfo.as_u32(), 1);
        assert_eq!(MessageKind::GetLicenseText.as_u32(), 2);
        assert_eq!(MessageKind::GetResolvedConfig.as_u32(), 3);
        assert_eq!(MessageKind::SetGlobalConfig.as_u32(), 4);
        assert_eq!(MessageKind::SetPluginConfig.as_u32(), 5);
        assert_eq!(MessageKind::GetConfigDiagnostics.as_u32(), 6);
        assert_eq!(MessageKind::Format.as_u32(), 7);
        assert_eq!(MessageKind::Close.as_u32(), 8);
    }

    #[test]
    fn test_message_kind_from_u32() {
        for value in 0..=8 {
            let kind = MessageKind::from_u32(value).unwrap();
            assert_eq!(kind.as_u32(), value);
        }
        assert!(MessageKind::from_u32(9).is_none());
        assert!(MessageKind::from_u32(RESYNC_SENTINEL).is_none());
    }

    #[test]
    fn test_payload_counts() {
        assert_eq!(MessageKind::GetSchemaVersion.payload_count(), 0);
        assert_eq!(MessageKind::SetGlobalConfig.payload_count(), 1);
        assert_eq!(MessageKind::SetPluginConfig.payload_count(), 1);
        assert_eq!(MessageKind::Format.payload_count(), 3);
        assert_eq!(MessageKind::Close.payload_count(), 0);
    }

    #[test]
    fn test_protocol_version() {
        assert_eq!(ProtocolVersion::default(), ProtocolVersion::V3);
        assert!(ProtocolVersion::V3.uses_sentinel());
        assert!(!ProtocolVersion::V2.uses_sentinel());

        assert_eq!(ProtocolVersion::from_u32(2), Some(ProtocolVersion::V2));
        assert_eq!(ProtocolVersion::from_u32(3), Some(ProtocolVersion::V3));
        assert_eq!(ProtocolVersion::from_u32(4), None);
        assert_eq!(ProtocolVersion::V2.to_string(), "v2");
    }

    #[test]
    fn test_sentinel_is_all_bits_set() {
        assert_eq!(RESYNC_SENTINEL.to_be_bytes(), [0xFF; U32_SIZE]);
    }

    #[test]
    fn test_display_kind() {
        assert_eq!(MessageKind::Format.to_string(), "Format (7)");
    }
}
