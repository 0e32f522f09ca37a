//! One module per atop log generation.
//!
//! A generation declares every struct atop wrote for that release. When a
//! struct did not change between releases the later module re-exports the
//! earlier definition instead of declaring it again, so both generations share
//! one type and one field list:
//!
//! ```text
//! v1_26  Header Record UtsName NetStat Cpu Dsk DskStat ...   (canonical)
//!   └── v2_3  re-exports the above, redefines MemStat PerCpu PerIntf Gen Mem Net ...
//! ```

pub mod v1_26;
pub mod v2_3;

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::layout::{Layout, decode};
use crate::types::Time;
use crate::version::Version;

pub use v1_26::V1_26;
pub use v2_3::V2_3;

/// Bits of `rawrecord.flags`.
pub mod record_flags {
    /// First sample after boot.
    pub const RRBOOT: u16 = 0x0001;
    /// Last sample before atop stopped.
    pub const RRLAST: u16 = 0x0002;
    /// netatop module was active.
    pub const RRNETATOP: u16 = 0x0004;
    /// netatopd daemon was active.
    pub const RRNETATOPD: u16 = 0x0008;
    pub const RRACCTACTIVE: u16 = 0x0010;
    pub const RRIOSTAT: u16 = 0x0020;
    pub const RRCONTAINERSTAT: u16 = 0x0040;
}

/// Bits of `rawheader.supportflags`.
pub mod support_flags {
    /// Process accounting was active.
    pub const ACCTACTIVE: i32 = 0x0000_0001;
    /// Kernel carried the atop statistics patch.
    pub const PATCHSTAT: i32 = 0x0000_0002;
    /// Per-process disk I/O statistics were available.
    pub const IOSTAT: i32 = 0x0000_0004;
    /// Kernel carried the atop accounting patch.
    pub const PATCHACCT: i32 = 0x0000_0008;
}

/// The four top-level layouts of a generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutName {
    Header,
    Record,
    SStat,
    TStat,
}

/// Struct lengths a log declares about itself in its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeclaredLengths {
    pub rawheadlen: usize,
    pub rawreclen: usize,
    pub sstatlen: usize,
    pub tstatlen: usize,
}

/// Header fields every generation must expose.
pub trait HeaderFields {
    fn aversion(&self) -> u16;
    fn hertz(&self) -> u16;
    fn pagesize(&self) -> u32;
    fn supportflags(&self) -> i32;
    fn declared_lengths(&self) -> DeclaredLengths;
    fn utsname(&self) -> &v1_26::UtsName;

    fn version(&self) -> Version {
        Version::from_raw(self.aversion())
    }
}

/// Record fields the stream decoder needs to find the blobs that follow.
pub trait RecordFields {
    fn curtime(&self) -> Time;
    fn flags(&self) -> u16;
    /// Stored length of the sstat blob.
    fn scomplen(&self) -> u32;
    /// Stored length of the tstat blob.
    fn pcomplen(&self) -> u32;
    /// Number of tstat entries in the tstat blob.
    fn ndeviat(&self) -> u32;

    fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.curtime(), 0)
    }

    fn has_flag(&self, flag: u16) -> bool {
        self.flags() & flag != 0
    }
}

/// A log generation: its version and its top-level layouts.
pub trait Generation: 'static {
    const VERSION: Version;

    type Header: Layout + HeaderFields + Debug + Clone + Serialize;
    type Record: Layout + RecordFields + Debug + Clone + Serialize;
    type SStat: Layout + Debug + Clone + Serialize;
    type TStat: Layout + Debug + Clone + Serialize;

    /// Encoded size of one of the top-level layouts.
    fn size_of(name: LayoutName) -> usize {
        match name {
            LayoutName::Header => Self::Header::SIZE,
            LayoutName::Record => Self::Record::SIZE,
            LayoutName::SStat => Self::SStat::SIZE,
            LayoutName::TStat => Self::TStat::SIZE,
        }
    }

    /// Decodes the layout called `name` at `offset`, consuming exactly
    /// `size_of(name)` bytes.
    fn decode(name: LayoutName, bytes: &[u8], offset: usize) -> Result<(Decoded<Self>, usize)>
    where
        Self: Sized,
    {
        Ok(match name {
            LayoutName::Header => {
                let (v, n) = decode::<Self::Header>(bytes, offset)?;
                (Decoded::Header(v), n)
            }
            LayoutName::Record => {
                let (v, n) = decode::<Self::Record>(bytes, offset)?;
                (Decoded::Record(v), n)
            }
            LayoutName::SStat => {
                let (v, n) = decode::<Self::SStat>(bytes, offset)?;
                (Decoded::SStat(v), n)
            }
            LayoutName::TStat => {
                let (v, n) = decode::<Self::TStat>(bytes, offset)?;
                (Decoded::TStat(v), n)
            }
        })
    }
}

/// A top-level layout decoded by name.
pub enum Decoded<G: Generation> {
    Header(G::Header),
    Record(G::Record),
    SStat(G::SStat),
    TStat(G::TStat),
}

impl<G: Generation> Decoded<G> {
    pub fn name(&self) -> LayoutName {
        match self {
            Decoded::Header(_) => LayoutName::Header,
            Decoded::Record(_) => LayoutName::Record,
            Decoded::SStat(_) => LayoutName::SStat,
            Decoded::TStat(_) => LayoutName::TStat,
        }
    }
}

impl<G: Generation> Debug for Decoded<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decoded::Header(v) => f.debug_tuple("Header").field(v).finish(),
            Decoded::Record(v) => f.debug_tuple("Record").field(v).finish(),
            Decoded::SStat(v) => f.debug_tuple("SStat").field(v).finish(),
            Decoded::TStat(v) => f.debug_tuple("TStat").field(v).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecodeError;
    use crate::layout::encode;
    use crate::testutil::{patterned, record};

    fn assert_round_trip<L: Layout + PartialEq + Debug + Default>(seed: u32) -> L {
        let value = patterned::<L>(seed);
        assert_ne!(value, L::default());
        let bytes = encode(&value);
        assert_eq!(bytes.len(), L::SIZE);
        let (decoded, consumed) = decode::<L>(&bytes, 0).unwrap();
        assert_eq!(consumed, L::SIZE);
        assert_eq!(decoded, value);
        decoded
    }

    #[test]
    fn test_every_1_26_layout_round_trips() {
        use v1_26::*;

        assert_round_trip::<Header>(1);
        assert_round_trip::<Record>(2);
        assert_round_trip::<UtsName>(3);
        assert_round_trip::<MemStat>(4);
        assert_round_trip::<FreqCnt>(5);
        assert_round_trip::<PerCpu>(6);
        assert_round_trip::<CpuStat>(7);
        assert_round_trip::<PerDsk>(8);
        assert_round_trip::<DskStat>(9);
        assert_round_trip::<PerIntf>(10);
        assert_round_trip::<IntfStat>(11);
        assert_round_trip::<WwwStat>(12);
        assert_round_trip::<Ipv4Stats>(13);
        assert_round_trip::<Icmpv4Stats>(14);
        assert_round_trip::<Udpv4Stats>(15);
        assert_round_trip::<TcpStats>(16);
        assert_round_trip::<Ipv6Stats>(17);
        assert_round_trip::<Icmpv6Stats>(18);
        assert_round_trip::<Udpv6Stats>(19);
        assert_round_trip::<NetStat>(20);
        assert_round_trip::<Gen>(21);
        assert_round_trip::<Cpu>(22);
        assert_round_trip::<Dsk>(23);
        assert_round_trip::<Mem>(24);
        assert_round_trip::<Net>(25);
        assert_round_trip::<TStat>(26);

        let sstat = assert_round_trip::<SStat>(27);
        assert_ne!(sstat.cpu.cpu[MAXCPU - 1], PerCpu::default());
        assert_ne!(sstat.dsk.dsk[MAXDSK - 1], PerDsk::default());
        assert_ne!(sstat.dsk.mdd[MAXMDD - 1], PerDsk::default());
        assert_ne!(sstat.dsk.lvm[MAXLVM - 1], PerDsk::default());
        assert_ne!(sstat.intf.intf[MAXINTF - 1], PerIntf::default());
    }

    #[test]
    fn test_every_2_3_layout_round_trips() {
        use v2_3::*;

        assert_round_trip::<MemStat>(101);
        assert_round_trip::<PerCpu>(102);
        assert_round_trip::<CpuStat>(103);
        assert_round_trip::<PerIntf>(104);
        assert_round_trip::<IntfStat>(105);
        assert_round_trip::<PerNfsMount>(106);
        assert_round_trip::<NfsServer>(107);
        assert_round_trip::<NfsClient>(108);
        assert_round_trip::<NfsMounts>(109);
        assert_round_trip::<NfsStat>(110);
        assert_round_trip::<PerContainer>(111);
        assert_round_trip::<ContStat>(112);
        assert_round_trip::<Gen>(113);
        assert_round_trip::<Mem>(114);
        assert_round_trip::<Net>(115);
        assert_round_trip::<TStat>(116);

        let sstat = assert_round_trip::<SStat>(117);
        assert_ne!(sstat.cpu.cpu[MAXCPU - 1], PerCpu::default());
        assert_ne!(sstat.intf.intf[MAXINTF - 1], PerIntf::default());
        assert_ne!(
            sstat.nfs.nfsmounts.pernfsmount[MAXNFSMOUNT - 1],
            PerNfsMount::default()
        );
        assert_ne!(sstat.cfs.cont[MAXCONTAINER - 1], PerContainer::default());
    }

    #[test]
    fn test_decode_by_name() {
        let mut bytes = vec![0xaa; 3];
        bytes.extend(encode(&record(1_500_000_000)));

        let (decoded, consumed) = V2_3::decode(LayoutName::Record, &bytes, 3).unwrap();
        assert_eq!(consumed, 96);
        assert_eq!(decoded.name(), LayoutName::Record);
        match decoded {
            Decoded::Record(r) => assert_eq!(r.curtime, 1_500_000_000),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_decode_by_name_never_partial() {
        let bytes = vec![0u8; V1_26::size_of(LayoutName::TStat) - 1];
        assert!(matches!(
            V1_26::decode(LayoutName::TStat, &bytes, 0),
            Err(DecodeError::TruncatedInput {
                needed: 736,
                available: 735,
                ..
            })
        ));
    }
}
