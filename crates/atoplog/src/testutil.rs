//! Fixture builders for tests.

use std::io::Write;

use flate2::write::ZlibEncoder;

use crate::header::MAGIC;
use crate::layout::{FixedStr, Layout, decode, encode};
use crate::versions::v1_26::{Header, Record};
use crate::versions::{Generation, LayoutName};

pub fn zlib(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(bytes).unwrap();
    encoder.finish().unwrap()
}

/// A header that passes validation for `G`.
pub fn header_for<G: Generation<Header = Header>>() -> Header {
    let version = G::VERSION;
    let mut header = Header {
        magic: MAGIC,
        aversion: 0x8000 | (u16::from(version.major) << 8) | u16::from(version.minor),
        rawheadlen: G::size_of(LayoutName::Header) as u16,
        rawreclen: G::size_of(LayoutName::Record) as u16,
        hertz: 100,
        sstatlen: G::size_of(LayoutName::SStat) as u32,
        tstatlen: G::size_of(LayoutName::TStat) as u32,
        pagesize: 4096,
        ..Header::default()
    };
    header.utsname.sysname = FixedStr::new("Linux");
    header.utsname.nodename = FixedStr::new("testhost");
    header.utsname.release = FixedStr::new("4.15.0");
    header.utsname.machine = FixedStr::new("x86_64");
    header
}

/// A value whose encoding has no zero byte, so that every field and every
/// entry of every fixed array differs from its default. Bytes stay below 0x7f,
/// which keeps every `f32` finite.
pub fn patterned<L: Layout>(seed: u32) -> L {
    let mut state = seed | 1;
    let bytes: Vec<u8> = (0..L::SIZE)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            1 + (state % 126) as u8
        })
        .collect();
    decode::<L>(&bytes, 0).unwrap().0
}

pub fn record(curtime: i64) -> Record {
    Record {
        curtime,
        interval: 10,
        ..Record::default()
    }
}

/// Builds an in-memory log file sample by sample.
pub struct LogBuilder {
    bytes: Vec<u8>,
}

impl LogBuilder {
    pub fn new(header: &Header) -> Self {
        Self {
            bytes: encode(header),
        }
    }

    /// Appends a sample with zlib-compressed blobs, filling in the lengths
    /// and task count of `record`.
    pub fn sample<G: Generation<Record = Record>>(
        self,
        record: Record,
        sstat: &G::SStat,
        tstats: &[G::TStat],
    ) -> Self {
        let mut raw_tstats = Vec::with_capacity(tstats.len() * G::TStat::SIZE);
        for tstat in tstats {
            raw_tstats.extend(encode(tstat));
        }
        let record = Record {
            ndeviat: tstats.len() as u32,
            ..record
        };
        self.blobs(record, zlib(&encode(sstat)), zlib(&raw_tstats))
    }

    /// Appends a record followed by pre-built blobs, filling in the lengths.
    pub fn blobs(mut self, record: Record, sstat_blob: Vec<u8>, tstat_blob: Vec<u8>) -> Self {
        let record = Record {
            scomplen: sstat_blob.len() as u32,
            pcomplen: tstat_blob.len() as u32,
            ..record
        };
        self.bytes.extend(encode(&record));
        self.bytes.extend(sstat_blob);
        self.bytes.extend(tstat_blob);
        self
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }
}
