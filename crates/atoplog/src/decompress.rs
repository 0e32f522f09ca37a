//! Blob decompression.
//!
//! atop compresses every sstat and tstat blob with zlib's `compress()`. The
//! stream decoder only depends on the [`Decompress`] trait so other transforms
//! can be plugged in.

use std::io::{self, Read};

use flate2::read::ZlibDecoder;

pub trait Decompress: Send + Sync {
    /// Expands `input`. `expected_len` is the size the caller will accept;
    /// implementations may stop producing output shortly after it.
    fn decompress(&self, input: &[u8], expected_len: usize) -> io::Result<Vec<u8>>;
}

/// zlib stream decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct Zlib;

impl Decompress for Zlib {
    fn decompress(&self, input: &[u8], expected_len: usize) -> io::Result<Vec<u8>> {
        // `expected_len` comes from the record and is not trusted for
        // allocation; one extra byte is enough to detect an oversized blob
        let mut out = Vec::new();
        ZlibDecoder::new(input)
            .take(expected_len as u64 + 1)
            .read_to_end(&mut out)?;
        Ok(out)
    }
}

/// Returns the input unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passthrough;

impl Decompress for Passthrough {
    fn decompress(&self, input: &[u8], _expected_len: usize) -> io::Result<Vec<u8>> {
        Ok(input.to_vec())
    }
}
