use std::borrow::Cow;
use std::fmt;
use std::ops::{Deref, DerefMut};

use serde::{Serialize, Serializer};

#[cfg(test)]
use super::Writer;
use super::{Layout, Reader};
use crate::error::Result;

/// A C array of `N` records that is always decoded in full.
///
/// atop sizes arrays such as `cpu[MAXCPU]` for the largest machine it supports
/// and records how many entries are in use in a sibling count field. Only that
/// prefix is meaningful; use [`FixedArray::prefix`] to get it.
#[derive(Clone, PartialEq)]
pub struct FixedArray<T, const N: usize>(Box<[T]>);

impl<T, const N: usize> FixedArray<T, N> {
    /// The first `count` entries. Negative counts yield an empty slice and
    /// counts beyond `N` are clamped.
    pub fn prefix(&self, count: i64) -> &[T] {
        let count = usize::try_from(count).unwrap_or(0).min(N);
        &self.0[..count]
    }
}

impl<T: Default, const N: usize> Default for FixedArray<T, N> {
    fn default() -> Self {
        Self((0..N).map(|_| T::default()).collect())
    }
}

impl<T, const N: usize> Deref for FixedArray<T, N> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T, const N: usize> DerefMut for FixedArray<T, N> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.0
    }
}

impl<T, const N: usize> fmt::Debug for FixedArray<T, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedArray<{N}>")
    }
}

impl<T: Serialize, const N: usize> Serialize for FixedArray<T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter())
    }
}

impl<T: Layout, const N: usize> Layout for FixedArray<T, N> {
    const SIZE: usize = T::SIZE * N;
    const ALIGN: usize = T::ALIGN;

    fn read(r: &mut Reader<'_>) -> Result<Self> {
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(r.field::<T>()?);
        }
        Ok(Self(items.into_boxed_slice()))
    }

    #[cfg(test)]
    fn write(&self, w: &mut Writer) {
        for item in self.0.iter() {
            w.field(item);
        }
    }
}

/// A fixed-width, NUL-padded C string such as `char name[16]`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct FixedStr<const N: usize>([u8; N]);

impl<const N: usize> FixedStr<N> {
    /// Builds a string, truncating so that a terminating NUL always fits.
    pub fn new(s: &str) -> Self {
        let mut bytes = [0u8; N];
        let len = s.len().min(N.saturating_sub(1));
        bytes[..len].copy_from_slice(&s.as_bytes()[..len]);
        Self(bytes)
    }

    /// Raw bytes, NUL padding included.
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    /// Text up to the first NUL, lossily converted to UTF-8.
    pub fn as_str(&self) -> Cow<'_, str> {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(N);
        String::from_utf8_lossy(&self.0[..end])
    }
}

impl<const N: usize> Default for FixedStr<N> {
    fn default() -> Self {
        Self([0; N])
    }
}

impl<const N: usize> fmt::Debug for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl<const N: usize> fmt::Display for FixedStr<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}

impl<const N: usize> Serialize for FixedStr<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_str())
    }
}

impl<const N: usize> Layout for FixedStr<N> {
    const SIZE: usize = N;
    const ALIGN: usize = 1;

    fn read(r: &mut Reader<'_>) -> Result<Self> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(r.take(N)?);
        Ok(Self(bytes))
    }

    #[cfg(test)]
    fn write(&self, w: &mut Writer) {
        w.bytes(&self.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_clamps_count() {
        let mut array = FixedArray::<u32, 4>::default();
        array[0] = 10;
        array[1] = 11;

        assert_eq!(array.prefix(2), &[10, 11]);
        assert!(array.prefix(0).is_empty());
        assert!(array.prefix(-1).is_empty());
        assert_eq!(array.prefix(99).len(), 4);
    }

    #[test]
    fn test_array_always_decodes_full_length() {
        let mut array = FixedArray::<u16, 3>::default();
        array[2] = 0xbeef;
        let bytes = super::super::encode(&array);
        assert_eq!(bytes.len(), 6);

        let (decoded, consumed) = super::super::decode::<FixedArray<u16, 3>>(&bytes, 0).unwrap();
        assert_eq!(consumed, 6);
        assert_eq!(decoded.len(), 3);
        assert_eq!(decoded[2], 0xbeef);
    }

    #[test]
    fn test_str_stops_at_nul() {
        let mut raw = [0u8; 8];
        raw[..3].copy_from_slice(b"sda");
        raw[4] = b'x';
        let s = FixedStr(raw);
        assert_eq!(s.as_str(), "sda");
        assert_eq!(s.to_string(), "sda");
    }

    #[test]
    fn test_str_without_terminator_uses_all_bytes() {
        let s = FixedStr(*b"eth0");
        assert_eq!(s.as_str(), "eth0");
    }

    #[test]
    fn test_str_serializes_as_text() {
        let s = FixedStr::<16>::new("postgres");
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"postgres\"");
    }
}
