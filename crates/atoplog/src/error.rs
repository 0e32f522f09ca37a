//! Error taxonomy for atop log decoding.

use std::fmt;
use std::io;

use thiserror::Error;

use crate::version::Version;

/// Which blob of a sample interval an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Blob {
    /// The system-level statistics following a record.
    SStat,
    /// The run of per-task statistics following the system blob.
    TStat,
}

impl fmt::Display for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Blob::SStat => write!(f, "sstat"),
            Blob::TStat => write!(f, "tstat"),
        }
    }
}

/// A header length field that disagrees with the layout compiled into the reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthMismatch {
    /// Name of the header field (`rawheadlen`, `rawreclen`, `sstatlen`, `tstatlen`).
    pub field: &'static str,
    pub declared: usize,
    pub expected: usize,
}

impl fmt::Display for LengthMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} is {} (expected {})",
            self.field, self.declared, self.expected
        )
    }
}

fn describe(mismatches: &[LengthMismatch]) -> String {
    mismatches
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid magic 0x{found:08x}, expected 0x{expected:08x}")]
    InvalidMagic { found: u32, expected: u32 },

    #[error("unsupported atop log version {0}")]
    UnsupportedVersion(Version),

    #[error("incompatible atop {version} log format: {}", describe(.mismatches))]
    IncompatibleFormat {
        version: Version,
        mismatches: Vec<LengthMismatch>,
    },

    #[error("truncated input at offset {offset}: need {needed} bytes, {available} available")]
    TruncatedInput {
        offset: u64,
        needed: usize,
        available: usize,
    },

    #[error("corrupt {blob} blob at offset {offset}: expected {expected} bytes, found {actual}")]
    CorruptBlob {
        blob: Blob,
        offset: u64,
        expected: usize,
        actual: usize,
    },

    #[error("cannot decompress {blob} blob at offset {offset}: {source}")]
    Decompression {
        blob: Blob,
        offset: u64,
        #[source]
        source: io::Error,
    },

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

impl DecodeError {
    /// True for errors that describe a damaged blob, including failed decompression.
    pub fn is_corrupt_blob(&self) -> bool {
        matches!(
            self,
            DecodeError::CorruptBlob { .. } | DecodeError::Decompression { .. }
        )
    }
}

pub type Result<T, E = DecodeError> = std::result::Result<T, E>;
