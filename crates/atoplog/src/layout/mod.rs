//! Fixed binary layouts decoded field by field.
//!
//! Every atop struct is described as an ordered field list. Offsets follow the
//! C natural-alignment rules of the writer's ABI: a field starts at the next
//! multiple of its own alignment and a struct is padded to the alignment of its
//! widest member. Nothing relies on Rust's own struct layout.
//!
//! ```text
//! struct rawheader            offset  size
//!   unsigned int   magic          0     4
//!   unsigned short aversion       4     2
//!   ...
//!   char           cfuture[8]   426     8
//!   <padding>                   434     2
//!   unsigned int   pagesize     436     4
//! ```

mod fixed;
mod macros;

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{DecodeError, Result};

pub use fixed::{FixedArray, FixedStr};
pub(crate) use macros::layout;

/// A record with a fixed on-disk size.
pub trait Layout: Sized {
    /// Encoded size in bytes, trailing padding included.
    const SIZE: usize;
    /// Alignment of the record within an enclosing record.
    const ALIGN: usize;

    /// Reads one value. The reader is already aligned for `Self`.
    fn read(r: &mut Reader<'_>) -> Result<Self>;

    #[cfg(test)]
    fn write(&self, w: &mut Writer);
}

/// Rounds `offset` up to the next multiple of `align`.
pub const fn align_up(offset: usize, align: usize) -> usize {
    offset.div_ceil(align) * align
}

/// Encoded size of a layout.
pub const fn size_of<L: Layout>() -> usize {
    L::SIZE
}

/// Decodes one `L` starting at `offset`.
///
/// Fails with [`DecodeError::TruncatedInput`] before reading anything when fewer
/// than `L::SIZE` bytes remain. On success exactly `L::SIZE` bytes are consumed.
pub fn decode<L: Layout>(bytes: &[u8], offset: usize) -> Result<(L, usize)> {
    let available = bytes.len().saturating_sub(offset);
    if available < L::SIZE {
        return Err(DecodeError::TruncatedInput {
            offset: offset as u64,
            needed: L::SIZE,
            available,
        });
    }

    let mut reader = Reader::new(&bytes[offset..offset + L::SIZE], offset as u64);
    let value = L::read(&mut reader)?;
    Ok((value, reader.position()))
}

/// Bounded cursor over the bytes of one outermost layout.
///
/// Positions are relative to the start of that layout, which is what C
/// alignment is computed against. `base` is only used to report absolute
/// offsets in errors.
pub struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: u64,
}

impl<'a> Reader<'a> {
    pub fn new(buf: &'a [u8], base: u64) -> Self {
        Self { buf, pos: 0, base }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.remaining() < n {
            return Err(DecodeError::TruncatedInput {
                offset: self.base + self.pos as u64,
                needed: n,
                available: self.remaining(),
            });
        }
        let bytes = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(bytes)
    }

    /// Skips padding up to `pos`. Never moves backwards.
    pub fn skip_to(&mut self, pos: usize) -> Result<()> {
        if pos > self.pos {
            self.take(pos - self.pos)?;
        }
        Ok(())
    }

    /// Aligns, then reads one field.
    pub fn field<T: Layout>(&mut self) -> Result<T> {
        self.skip_to(align_up(self.pos, T::ALIGN))?;
        T::read(self)
    }
}

/// Encoder used to build fixtures. Mirrors [`Reader`] padding rules.
#[cfg(test)]
#[derive(Default)]
pub struct Writer {
    buf: Vec<u8>,
}

#[cfg(test)]
impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn pad_to(&mut self, len: usize) {
        if len > self.buf.len() {
            self.buf.resize(len, 0);
        }
    }

    pub fn field<T: Layout>(&mut self, value: &T) {
        self.pad_to(align_up(self.buf.len(), T::ALIGN));
        value.write(self);
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

/// Encodes one value into a fresh buffer of exactly `L::SIZE` bytes.
#[cfg(test)]
pub fn encode<L: Layout>(value: &L) -> Vec<u8> {
    let mut w = Writer::new();
    value.write(&mut w);
    w.pad_to(L::SIZE);
    w.into_bytes()
}

impl Layout for u8 {
    const SIZE: usize = 1;
    const ALIGN: usize = 1;

    fn read(r: &mut Reader<'_>) -> Result<Self> {
        Ok(r.take(1)?[0])
    }

    #[cfg(test)]
    fn write(&self, w: &mut Writer) {
        w.bytes(&[*self]);
    }
}

macro_rules! scalar_layout {
    ($($ty:ty => $read:ident, $write:ident;)*) => {$(
        impl Layout for $ty {
            const SIZE: usize = std::mem::size_of::<$ty>();
            const ALIGN: usize = std::mem::size_of::<$ty>();

            fn read(r: &mut Reader<'_>) -> Result<Self> {
                Ok(LittleEndian::$read(r.take(Self::SIZE)?))
            }

            #[cfg(test)]
            fn write(&self, w: &mut Writer) {
                let mut buf = [0u8; std::mem::size_of::<$ty>()];
                LittleEndian::$write(&mut buf, *self);
                w.bytes(&buf);
            }
        }
    )*};
}

scalar_layout! {
    u16 => read_u16, write_u16;
    i32 => read_i32, write_i32;
    u32 => read_u32, write_u32;
    i64 => read_i64, write_i64;
    u64 => read_u64, write_u64;
    f32 => read_f32, write_f32;
}

/// Small inline arrays such as `cfuture[4]`.
impl<T: Layout + Copy + Default, const N: usize> Layout for [T; N] {
    const SIZE: usize = T::SIZE * N;
    const ALIGN: usize = T::ALIGN;

    fn read(r: &mut Reader<'_>) -> Result<Self> {
        let mut out = [T::default(); N];
        for slot in out.iter_mut() {
            *slot = r.field::<T>()?;
        }
        Ok(out)
    }

    #[cfg(test)]
    fn write(&self, w: &mut Writer) {
        for item in self {
            w.field(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    layout! {
        pub struct Mixed {
            pub tag: u8,
            pub count: i64,
            pub short: u16,
            pub name: FixedStr<3>,
            pub ratio: f32,
        }
    }

    layout! {
        pub struct Nested {
            pub flag: u8,
            pub inner: Mixed,
            pub tail: [u16; 3],
        }
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(0, 8), 0);
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(434, 4), 436);
        assert_eq!(align_up(7, 1), 7);
    }

    #[test]
    fn test_c_padding_rules() {
        // tag@0, count@8, short@16, name@18, ratio@24, end 28 -> 32
        assert_eq!(Mixed::ALIGN, 8);
        assert_eq!(Mixed::SIZE, 32);
        // flag@0, inner@8, tail@40, end 46 -> 48
        assert_eq!(Nested::SIZE, 48);
        assert_eq!(size_of::<[u16; 6]>(), 12);
    }

    #[test]
    fn test_fields_land_on_aligned_offsets() {
        let value = Mixed {
            tag: 0xaa,
            count: -2,
            short: 0x0102,
            name: FixedStr::new("ab"),
            ratio: 1.5,
        };
        let bytes = encode(&value);
        assert_eq!(bytes.len(), 32);
        assert_eq!(bytes[0], 0xaa);
        assert_eq!(&bytes[1..8], &[0; 7]);
        assert_eq!(LittleEndian::read_i64(&bytes[8..16]), -2);
        assert_eq!(LittleEndian::read_u16(&bytes[16..18]), 0x0102);
        assert_eq!(&bytes[18..21], b"ab\0");
        assert_eq!(LittleEndian::read_f32(&bytes[24..28]), 1.5);
    }

    #[test]
    fn test_decode_nested_at_offset() {
        let value = Nested {
            flag: 1,
            inner: Mixed {
                tag: 2,
                count: i64::MAX,
                short: 3,
                name: FixedStr::new("xyz"),
                ratio: -0.25,
            },
            tail: [7, 8, 9],
        };
        let mut bytes = vec![0xff; 5];
        bytes.extend(encode(&value));

        let (decoded, consumed) = decode::<Nested>(&bytes, 5).unwrap();
        assert_eq!(consumed, Nested::SIZE);
        assert_eq!(decoded, value);
        // truncated to two chars plus NUL
        assert_eq!(decoded.inner.name.as_str(), "xy");
    }

    #[test]
    fn test_decode_short_input_is_truncated() {
        let bytes = vec![0u8; Mixed::SIZE - 1];
        match decode::<Mixed>(&bytes, 0) {
            Err(DecodeError::TruncatedInput {
                offset,
                needed,
                available,
            }) => {
                assert_eq!(offset, 0);
                assert_eq!(needed, 32);
                assert_eq!(available, 31);
            }
            other => panic!("expected TruncatedInput, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_offset_past_end() {
        let bytes = vec![0u8; 4];
        assert!(matches!(
            decode::<u32>(&bytes, 10),
            Err(DecodeError::TruncatedInput { available: 0, .. })
        ));
    }
}
