//! Opening an atop log of any supported generation.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::Result;
use crate::header::{HeaderPrefix, LogHeader, MAGIC, decode_header_with};
use crate::layout::{Layout, decode};
use crate::registry::{GenerationId, resolve};
use crate::stream::{RecordStream, read_full};
use crate::version::Version;
use crate::versions::{LayoutName, V1_26, V2_3};

/// A validated log, positioned at its first record.
pub enum AtopLog<R> {
    V1_26(RecordStream<V1_26, R>),
    V2_3(RecordStream<V2_3, R>),
}

impl<R: Read> AtopLog<R> {
    pub fn open(reader: R) -> Result<Self> {
        Self::open_with(reader, &DecodeConfig::default())
    }

    /// Reads and validates the header, leaving `reader` at the first record.
    pub fn open_with(mut reader: R, config: &DecodeConfig) -> Result<Self> {
        let header = read_header(&mut reader, config)?;
        Ok(match header {
            LogHeader::V1_26(h) => AtopLog::V1_26(RecordStream::new(reader, h, config)),
            LogHeader::V2_3(h) => AtopLog::V2_3(RecordStream::new(reader, h, config)),
        })
    }

    pub fn generation(&self) -> GenerationId {
        match self {
            AtopLog::V1_26(_) => GenerationId::Atop1_26,
            AtopLog::V2_3(_) => GenerationId::Atop2_3,
        }
    }

    pub fn version(&self) -> Version {
        self.generation().version()
    }

    pub fn header(&self) -> LogHeader {
        match self {
            AtopLog::V1_26(s) => LogHeader::V1_26(s.header().clone()),
            AtopLog::V2_3(s) => LogHeader::V2_3(s.header().clone()),
        }
    }
}

impl AtopLog<BufReader<File>> {
    pub fn open_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let log = Self::open(BufReader::new(File::open(path)?))?;
        debug!(path = %path.display(), version = %log.version(), "opened atop log");
        Ok(log)
    }
}

/// Reads the bootstrap prefix, then as many more bytes as the resolved
/// generation's header needs. Anything that stops the prefix from resolving is
/// reported by `decode_header_with` from the bytes read so far.
fn read_header<R: Read>(reader: &mut R, config: &DecodeConfig) -> Result<LogHeader> {
    let mut bytes = vec![0u8; HeaderPrefix::SIZE];
    let n = read_full(reader, &mut bytes)?;
    bytes.truncate(n);

    if let Ok((prefix, _)) = decode::<HeaderPrefix>(&bytes, 0)
        && (!config.verify_magic || prefix.magic == MAGIC)
        && let Ok(generation) = resolve(Version::from_raw(prefix.aversion))
    {
        bytes.resize(generation.size_of(LayoutName::Header), 0);
        let n = read_full(reader, &mut bytes[HeaderPrefix::SIZE..])?;
        bytes.truncate(HeaderPrefix::SIZE + n);
    }
    decode_header_with(&bytes, config)
}

#[cfg(test)]
mod tests {
    use std::io::{Cursor, Write};

    use super::*;
    use crate::config::Compression;
    use crate::error::DecodeError;
    use crate::layout::encode;
    use crate::testutil::{LogBuilder, header_for, record};
    use crate::versions::{v1_26, v2_3};

    #[test]
    fn test_open_dispatches_on_version() {
        let bytes = LogBuilder::new(&header_for::<V1_26>())
            .sample::<V1_26>(record(10), &v1_26::SStat::default(), &[])
            .build();
        let log = AtopLog::open(Cursor::new(bytes)).unwrap();
        assert_eq!(log.generation(), GenerationId::Atop1_26);
        assert_eq!(log.version(), Version::new(1, 26));

        let AtopLog::V1_26(stream) = log else {
            panic!("expected a 1.26 stream");
        };
        assert_eq!(stream.position(), 480);
        let samples: Vec<_> = stream.collect::<Result<Vec<_>>>().unwrap();
        assert_eq!(samples.len(), 1);
    }

    #[test]
    fn test_open_reads_only_the_header() {
        let bytes = LogBuilder::new(&header_for::<V2_3>())
            .sample::<V2_3>(record(10), &v2_3::SStat::default(), &[])
            .build();
        let AtopLog::V2_3(stream) = AtopLog::open(Cursor::new(bytes)).unwrap() else {
            panic!("expected a 2.3 stream");
        };
        assert_eq!(stream.into_inner().position(), 480);
    }

    #[test]
    fn test_open_rejects_bad_magic() {
        let header = v2_3::Header {
            magic: 0x1234_5678,
            ..header_for::<V2_3>()
        };
        let result = AtopLog::open(Cursor::new(encode(&header)));
        assert!(matches!(result, Err(DecodeError::InvalidMagic { .. })));

        let lenient = DecodeConfig::new(false, Compression::Always);
        let log = AtopLog::open_with(Cursor::new(encode(&header)), &lenient).unwrap();
        assert_eq!(log.header().hertz(), 100);
    }

    #[test]
    fn test_open_short_header() {
        let bytes = encode(&header_for::<V2_3>());
        let result = AtopLog::open(Cursor::new(bytes[..200].to_vec()));
        assert!(matches!(
            result,
            Err(DecodeError::TruncatedInput {
                needed: 480,
                available: 200,
                ..
            })
        ));

        let result = AtopLog::open(Cursor::new(Vec::new()));
        assert!(matches!(
            result,
            Err(DecodeError::TruncatedInput { available: 0, .. })
        ));
    }

    #[test]
    fn test_open_unsupported_version() {
        let header = v2_3::Header {
            aversion: 0x8000 | (2 << 8) | 4,
            ..header_for::<V2_3>()
        };
        let result = AtopLog::open(Cursor::new(encode(&header)));
        assert!(matches!(
            result,
            Err(DecodeError::UnsupportedVersion(v)) if v == Version::new(2, 4)
        ));
    }

    #[test]
    fn test_open_path() {
        let bytes = LogBuilder::new(&header_for::<V2_3>())
            .sample::<V2_3>(record(100), &v2_3::SStat::default(), &[])
            .sample::<V2_3>(record(110), &v2_3::SStat::default(), &[])
            .build();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file.flush().unwrap();

        let log = AtopLog::open_path(file.path()).unwrap();
        assert_eq!(log.header().utsname().nodename.as_str(), "testhost");
        let AtopLog::V2_3(stream) = log else {
            panic!("expected a 2.3 stream");
        };
        let times: Vec<_> = stream.map(|s| s.unwrap().record.curtime).collect();
        assert_eq!(times, [100, 110]);
    }

    #[test]
    fn test_open_path_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AtopLog::open_path(dir.path().join("atop_20240101"));
        assert!(matches!(result, Err(DecodeError::Io(_))));
    }
}
