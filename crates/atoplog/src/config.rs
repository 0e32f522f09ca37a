//! Decoder configuration.

use serde::{Deserialize, Serialize};

/// How to tell whether a stored blob is compressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// Every blob is compressed. atop always compresses with zlib.
    Always,
    /// Blobs are stored raw.
    Never,
    /// A blob is compressed when this bit is set in `Record.flags`.
    Flag(u16),
}

impl Compression {
    pub fn applies(self, flags: u16) -> bool {
        match self {
            Compression::Always => true,
            Compression::Never => false,
            Compression::Flag(mask) => flags & mask != 0,
        }
    }
}

/// Options for a decode session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeConfig {
    /// Reject files whose header magic is not atop's. Default: true.
    pub verify_magic: bool,
    /// Default: [`Compression::Always`].
    pub compression: Compression,
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self {
            verify_magic: true,
            compression: Compression::Always,
        }
    }
}

impl DecodeConfig {
    pub fn new(verify_magic: bool, compression: Compression) -> Self {
        Self {
            verify_magic,
            compression,
        }
    }
}
