//! File header decoding and self-validation.
//!
//! The header is read twice: first through [`HeaderPrefix`], which only needs
//! the magic and version fields every generation shares, then through the
//! resolved generation's own header layout. The lengths the file declares for
//! its structs must equal the lengths this reader computes, otherwise every
//! blob boundary after the header would be wrong.

use tracing::debug;

use crate::config::DecodeConfig;
use crate::error::{DecodeError, LengthMismatch, Result};
use crate::layout::{decode, layout};
use crate::registry::{GenerationId, resolve};
use crate::versions::{
    DeclaredLengths, Generation, HeaderFields, LayoutName, V1_26, V2_3, v1_26, v2_3,
};
use crate::version::Version;

/// `MYMAGIC` from rawlog.c.
pub const MAGIC: u32 = 0xfeed_beef;

layout! {
    /// Version-agnostic start of every atop header.
    pub struct HeaderPrefix {
        pub magic: u32,
        pub aversion: u16,
    }
}

/// A validated header, tagged with its generation.
#[derive(Debug, Clone, PartialEq)]
pub enum LogHeader {
    V1_26(v1_26::Header),
    V2_3(v2_3::Header),
}

impl LogHeader {
    fn fields(&self) -> &dyn HeaderFields {
        match self {
            LogHeader::V1_26(h) => h,
            LogHeader::V2_3(h) => h,
        }
    }

    pub fn generation(&self) -> GenerationId {
        match self {
            LogHeader::V1_26(_) => GenerationId::Atop1_26,
            LogHeader::V2_3(_) => GenerationId::Atop2_3,
        }
    }

    pub fn version(&self) -> Version {
        self.fields().version()
    }

    /// Clock ticks per second on the recording host.
    pub fn hertz(&self) -> u16 {
        self.fields().hertz()
    }

    pub fn pagesize(&self) -> u32 {
        self.fields().pagesize()
    }

    pub fn supportflags(&self) -> i32 {
        self.fields().supportflags()
    }

    pub fn declared_lengths(&self) -> DeclaredLengths {
        self.fields().declared_lengths()
    }

    pub fn utsname(&self) -> &v1_26::UtsName {
        self.fields().utsname()
    }
}

/// Decodes and validates a header with the default configuration.
pub fn decode_header(bytes: &[u8]) -> Result<LogHeader> {
    decode_header_with(bytes, &DecodeConfig::default())
}

pub fn decode_header_with(bytes: &[u8], config: &DecodeConfig) -> Result<LogHeader> {
    let (prefix, _) = decode::<HeaderPrefix>(bytes, 0)?;
    if config.verify_magic && prefix.magic != MAGIC {
        return Err(DecodeError::InvalidMagic {
            found: prefix.magic,
            expected: MAGIC,
        });
    }

    let version = Version::from_raw(prefix.aversion);
    let header = match resolve(version)? {
        GenerationId::Atop1_26 => LogHeader::V1_26(decode_generation_header::<V1_26>(bytes)?),
        GenerationId::Atop2_3 => LogHeader::V2_3(decode_generation_header::<V2_3>(bytes)?),
    };

    debug!(
        version = %version,
        hertz = header.hertz(),
        nodename = %header.utsname().nodename,
        release = %header.utsname().release,
        "atop log header accepted"
    );
    Ok(header)
}

/// Decodes the header with a known generation's layout and validates it.
pub fn decode_generation_header<G: Generation>(bytes: &[u8]) -> Result<G::Header> {
    let (header, _) = decode::<G::Header>(bytes, 0)?;
    check_compatibility::<G>(&header)?;
    Ok(header)
}

/// Compares the four declared struct lengths against `G`'s layouts and
/// reports every field that disagrees.
pub fn check_compatibility<G: Generation>(header: &G::Header) -> Result<()> {
    let declared = header.declared_lengths();
    let mismatches: Vec<LengthMismatch> = [
        ("rawheadlen", declared.rawheadlen, LayoutName::Header),
        ("rawreclen", declared.rawreclen, LayoutName::Record),
        ("sstatlen", declared.sstatlen, LayoutName::SStat),
        ("tstatlen", declared.tstatlen, LayoutName::TStat),
    ]
    .into_iter()
    .filter_map(|(field, declared, layout)| {
        let expected = G::size_of(layout);
        (declared != expected).then_some(LengthMismatch {
            field,
            declared,
            expected,
        })
    })
    .collect();

    if mismatches.is_empty() {
        Ok(())
    } else {
        Err(DecodeError::IncompatibleFormat {
            version: G::VERSION,
            mismatches,
        })
    }
}
