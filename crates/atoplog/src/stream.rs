//! Lazy decoding of the samples that follow the header.
//!
//! ```text
//! [Header]
//! repeat:
//!   [Record]
//!   [scomplen bytes: sstat, compressed or raw]
//!   [pcomplen bytes: ndeviat × tstat, compressed or raw]
//! ```
//!
//! The stream ends cleanly when the input ends exactly on a record boundary.
//! Any error is terminal: the iterator yields it once and then stops, while
//! samples already yielded stay valid.

use std::fmt;
use std::io::{self, Read};
use std::marker::PhantomData;

use tracing::{trace, warn};

use crate::config::{Compression, DecodeConfig};
use crate::decompress::{Decompress, Zlib};
use crate::error::{Blob, DecodeError, Result};
use crate::layout::{Layout, decode};
use crate::versions::{Generation, RecordFields};

/// One sample interval: the record plus the statistics that follow it.
pub struct Sample<G: Generation> {
    pub record: G::Record,
    pub sstat: G::SStat,
    pub tstats: Vec<G::TStat>,
}

// The generation markers are uninhabited, so these are written out instead of
// derived to avoid a `G: Debug + Clone` bound.
impl<G: Generation> fmt::Debug for Sample<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sample")
            .field("record", &self.record)
            .field("sstat", &self.sstat)
            .field("tstats", &self.tstats)
            .finish()
    }
}

impl<G: Generation> Clone for Sample<G> {
    fn clone(&self) -> Self {
        Self {
            record: self.record.clone(),
            sstat: self.sstat.clone(),
            tstats: self.tstats.clone(),
        }
    }
}

pub struct RecordStream<G: Generation, R> {
    reader: R,
    header: G::Header,
    decompressor: Box<dyn Decompress>,
    compression: Compression,
    /// Absolute byte offset of the next unread byte.
    position: u64,
    finished: bool,
    _generation: PhantomData<G>,
}

impl<G: Generation, R: Read> RecordStream<G, R> {
    /// Wraps a reader positioned right after `header`, decompressing with zlib.
    pub fn new(reader: R, header: G::Header, config: &DecodeConfig) -> Self {
        Self::with_decompressor(reader, header, config, Box::new(Zlib))
    }

    pub fn with_decompressor(
        reader: R,
        header: G::Header,
        config: &DecodeConfig,
        decompressor: Box<dyn Decompress>,
    ) -> Self {
        Self {
            reader,
            header,
            decompressor,
            compression: config.compression,
            position: G::Header::SIZE as u64,
            finished: false,
            _generation: PhantomData,
        }
    }

    pub fn header(&self) -> &G::Header {
        &self.header
    }

    /// Absolute offset of the next record.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.reader
    }

    fn next_sample(&mut self) -> Result<Option<Sample<G>>> {
        let record_offset = self.position;
        let mut buf = vec![0u8; G::Record::SIZE];
        let n = read_full(&mut self.reader, &mut buf)?;
        self.position += n as u64;
        if n == 0 {
            return Ok(None);
        }
        if n < buf.len() {
            return Err(DecodeError::TruncatedInput {
                offset: record_offset,
                needed: buf.len(),
                available: n,
            });
        }
        let (record, _) = decode::<G::Record>(&buf, 0)?;

        trace!(
            offset = record_offset,
            curtime = record.curtime(),
            scomplen = record.scomplen(),
            pcomplen = record.pcomplen(),
            ndeviat = record.ndeviat(),
            "atop record"
        );

        let sstat_bytes = self.read_blob(
            Blob::SStat,
            record.scomplen() as usize,
            G::SStat::SIZE,
            record.flags(),
        )?;
        let (sstat, _) = decode::<G::SStat>(&sstat_bytes, 0)?;

        let ndeviat = record.ndeviat() as usize;
        let tstat_len = ndeviat.checked_mul(G::TStat::SIZE).ok_or(DecodeError::CorruptBlob {
            blob: Blob::TStat,
            offset: self.position,
            expected: usize::MAX,
            actual: record.pcomplen() as usize,
        })?;
        let tstat_bytes = self.read_blob(
            Blob::TStat,
            record.pcomplen() as usize,
            tstat_len,
            record.flags(),
        )?;
        let mut tstats = Vec::with_capacity(ndeviat);
        for i in 0..ndeviat {
            let (tstat, _) = decode::<G::TStat>(&tstat_bytes, i * G::TStat::SIZE)?;
            tstats.push(tstat);
        }

        Ok(Some(Sample {
            record,
            sstat,
            tstats,
        }))
    }

    /// Reads `stored_len` bytes, decompresses them if needed and checks that
    /// exactly `expected_len` bytes came out.
    fn read_blob(
        &mut self,
        blob: Blob,
        stored_len: usize,
        expected_len: usize,
        flags: u16,
    ) -> Result<Vec<u8>> {
        let offset = self.position;
        let mut stored = Vec::new();
        let n = self
            .reader
            .by_ref()
            .take(stored_len as u64)
            .read_to_end(&mut stored)?;
        self.position += n as u64;
        if n < stored_len {
            return Err(DecodeError::TruncatedInput {
                offset,
                needed: stored_len,
                available: n,
            });
        }

        let data = if self.compression.applies(flags) {
            self.decompressor
                .decompress(&stored, expected_len)
                .map_err(|source| DecodeError::Decompression {
                    blob,
                    offset,
                    source,
                })?
        } else {
            stored
        };

        if data.len() != expected_len {
            return Err(DecodeError::CorruptBlob {
                blob,
                offset,
                expected: expected_len,
                actual: data.len(),
            });
        }
        Ok(data)
    }
}

impl<G: Generation, R: Read> Iterator for RecordStream<G, R> {
    type Item = Result<Sample<G>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_sample() {
            Ok(Some(sample)) => Some(Ok(sample)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                warn!(position = self.position, error = %e, "atop stream terminated");
                Some(Err(e))
            }
        }
    }
}

/// Fills `buf` unless the input ends first; returns the number of bytes read.
pub(crate) fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
