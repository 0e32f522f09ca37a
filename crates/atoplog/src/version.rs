//! atop version numbers as written in the raw log header.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// A `major.minor` atop version.
///
/// The minor number is an integer, not a decimal fraction: atop 2.3 has minor 3
/// and atop 1.26 has minor 26. Versions compare by exact equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Version {
    pub major: u8,
    pub minor: u8,
}

impl Version {
    pub const fn new(major: u8, minor: u8) -> Self {
        Self { major, minor }
    }

    /// Unpacks the header's `aversion` field. The most significant bit only
    /// marks a file written by atop itself and is ignored.
    pub const fn from_raw(aversion: u16) -> Self {
        Self {
            major: ((aversion >> 8) & 0x7f) as u8,
            minor: (aversion & 0xff) as u8,
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError(String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid atop version {:?}", self.0)
    }
}

impl std::error::Error for ParseVersionError {}

impl FromStr for Version {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_string());
        let (major, minor) = s.trim().split_once('.').ok_or_else(err)?;
        Ok(Self {
            major: major.parse().map_err(|_| err())?,
            minor: minor.parse().map_err(|_| err())?,
        })
    }
}
