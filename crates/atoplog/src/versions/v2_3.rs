//! Layouts written by atop 2.3.
//!
//! Structs that are byte-identical to 1.26 are re-exported from
//! [`v1_26`](super::v1_26) rather than declared again. Everything declared
//! here diverged: NFS and container statistics were added to `sstat`, and
//! several per-CPU, interface and per-task records grew fields.

use super::Generation;
use crate::layout::{FixedArray, FixedStr, layout};
use crate::types::{CLong, CULong, Count, Time};
use crate::version::Version;

pub use super::v1_26::{
    Cpu, Dsk, DskStat, FreqCnt, Header, Icmpv4Stats, Icmpv6Stats, Ipv4Stats, Ipv6Stats, NetStat,
    PerDsk, Record, TcpStats, Udpv4Stats, Udpv6Stats, UtsName, WwwStat,
};
pub use super::v1_26::{CMDLEN, MAXCPU, MAXDKNAM, MAXDSK, MAXINTF, MAXLVM, MAXMDD, PNAMLEN};

pub const MAXCONTAINER: usize = 128;
pub const MAXNFSMOUNT: usize = 64;

/// The atop 2.3 generation.
pub enum V2_3 {}

impl Generation for V2_3 {
    const VERSION: Version = Version::new(2, 3);

    type Header = Header;
    type Record = Record;
    type SStat = SStat;
    type TStat = TStat;
}

// ============================================================
// System statistics (sstat)
// ============================================================

layout! {
    pub struct MemStat {
        pub physmem: Count,
        pub freemem: Count,
        pub buffermem: Count,
        pub slabmem: Count,
        pub cachemem: Count,
        pub cachedrt: Count,

        pub totswap: Count,
        pub freeswap: Count,

        pub pgscans: Count,
        pub pgsteal: Count,
        pub allocstall: Count,
        pub swouts: Count,
        pub swins: Count,

        pub commitlim: Count,
        pub committed: Count,

        pub shmem: Count,
        pub shmrss: Count,
        pub shmswp: Count,

        pub slabreclaim: Count,

        pub tothugepage: Count,
        pub freehugepage: Count,
        pub hugepagesz: Count,

        /// Pages claimed by the VMware balloon driver.
        pub vmwballoon: Count,

        pub cfuture: [Count; 8],
    }
}

layout! {
    pub struct PerCpu {
        pub cpunr: i32,
        pub stime: Count,
        pub utime: Count,
        pub ntime: Count,
        pub itime: Count,
        pub wtime: Count,
        pub irqtime: Count,
        pub softirqtime: Count,
        pub steal: Count,
        pub guest: Count,
        pub freqcnt: FreqCnt,
        pub cfuture: [Count; 4],
    }
}

layout! {
    pub struct CpuStat {
        pub nrcpu: Count,
        pub devint: Count,
        pub csw: Count,
        pub nprocs: Count,
        pub lavg1: f32,
        pub lavg5: f32,
        pub lavg15: f32,
        pub cfuture: [Count; 4],

        pub all: PerCpu,
        pub cpu: FixedArray<PerCpu, MAXCPU>,
    }
}

impl CpuStat {
    pub fn cpus(&self) -> &[PerCpu] {
        self.cpu.prefix(self.nrcpu)
    }
}

layout! {
    pub struct PerIntf {
        pub name: FixedStr<16>,

        pub rbyte: Count,
        pub rpack: Count,
        pub rerrs: Count,
        pub rdrop: Count,
        pub rfifo: Count,
        pub rframe: Count,
        pub rcompr: Count,
        pub rmultic: Count,
        pub rfuture: [Count; 4],

        pub sbyte: Count,
        pub spack: Count,
        pub serrs: Count,
        pub sdrop: Count,
        pub sfifo: Count,
        pub scollis: Count,
        pub scarrier: Count,
        pub scompr: Count,
        pub sfuture: [Count; 4],

        /// `type` in atop: `e` ethernet, `w` wireless, `v` virtual, `?` unknown.
        pub kind: u8,
        /// Current speed in megabits per second.
        pub speed: CLong,
        /// Previous speed, used when the link renegotiated during the interval.
        pub speedp: CLong,
        pub duplex: u8,
        pub cfuture: [Count; 4],
    }
}

layout! {
    pub struct IntfStat {
        pub nrintf: i32,
        pub intf: FixedArray<PerIntf, MAXINTF>,
    }
}

impl IntfStat {
    pub fn interfaces(&self) -> &[PerIntf] {
        self.intf.prefix(self.nrintf.into())
    }
}

layout! {
    pub struct PerNfsMount {
        pub name: FixedStr<128>,
        /// Seconds since mount.
        pub age: Count,

        pub bytesread: Count,
        pub byteswrite: Count,
        pub bytesdread: Count,
        pub bytesdwrite: Count,
        pub bytestotread: Count,
        pub bytestotwrite: Count,
        pub pagesmread: Count,
        pub pagesmwrite: Count,

        pub future: [Count; 8],
    }
}

layout! {
    /// NFS server counters.
    pub struct NfsServer {
        pub netcnt: Count,
        pub netudpcnt: Count,
        pub nettcpcnt: Count,
        pub nettcpcon: Count,

        pub rpccnt: Count,
        pub rpcbadfmt: Count,
        pub rpcbadaut: Count,
        pub rpcbadcln: Count,

        pub rpcread: Count,
        pub rpcwrite: Count,

        /// Reply cache hits.
        pub rchits: Count,
        pub rcmiss: Count,
        pub rcnoca: Count,

        pub nrbytes: Count,
        pub nwbytes: Count,

        pub future: [Count; 8],
    }
}

layout! {
    /// NFS client counters.
    pub struct NfsClient {
        pub rpccnt: Count,
        pub rpcretrans: Count,
        pub rpcautrefresh: Count,

        pub rpcread: Count,
        pub rpcwrite: Count,

        pub future: [Count; 8],
    }
}

layout! {
    pub struct NfsMounts {
        pub nrmounts: i32,
        pub pernfsmount: FixedArray<PerNfsMount, MAXNFSMOUNT>,
    }
}

impl NfsMounts {
    pub fn mounts(&self) -> &[PerNfsMount] {
        self.pernfsmount.prefix(self.nrmounts.into())
    }
}

layout! {
    pub struct NfsStat {
        pub server: NfsServer,
        pub client: NfsClient,
        pub nfsmounts: NfsMounts,
    }
}

layout! {
    /// OpenVZ container counters.
    pub struct PerContainer {
        pub ctid: CULong,
        pub numproc: CULong,

        pub system: Count,
        pub user: Count,
        pub nice: Count,
        pub uptime: Count,

        pub physpages: Count,
    }
}

layout! {
    pub struct ContStat {
        pub nrcontainer: i32,
        pub cont: FixedArray<PerContainer, MAXCONTAINER>,
    }
}

impl ContStat {
    pub fn containers(&self) -> &[PerContainer] {
        self.cont.prefix(self.nrcontainer.into())
    }
}

layout! {
    pub struct SStat {
        pub cpu: CpuStat,
        pub mem: MemStat,
        pub net: NetStat,
        pub intf: IntfStat,
        pub dsk: DskStat,
        pub nfs: NfsStat,
        pub cfs: ContStat,

        pub www: WwwStat,
    }
}

// ============================================================
// Task statistics (tstat)
// ============================================================

layout! {
    pub struct Gen {
        pub tgid: i32,
        pub pid: i32,
        pub ppid: i32,
        pub ruid: i32,
        pub euid: i32,
        pub suid: i32,
        pub fsuid: i32,
        pub rgid: i32,
        pub egid: i32,
        pub sgid: i32,
        pub fsgid: i32,
        pub nthr: i32,
        pub name: FixedStr<{ PNAMLEN + 1 }>,
        pub isproc: u8,
        pub state: u8,
        pub excode: i32,
        pub btime: Time,
        pub elaps: Time,
        pub cmdline: FixedStr<{ CMDLEN + 1 }>,
        pub nthrslpi: i32,
        pub nthrslpu: i32,
        pub nthrrun: i32,

        /// OpenVZ container id.
        pub ctid: i32,
        /// Pid inside the OpenVZ container.
        pub vpid: i32,

        /// Non-zero when the task was inactive during the interval.
        pub wasinactive: i32,

        /// Docker container id, first 12 hex digits.
        pub container: FixedStr<16>,
    }
}

impl Gen {
    pub fn start_time(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(self.btime, 0)
    }
}

layout! {
    pub struct Mem {
        pub minflt: Count,
        pub majflt: Count,
        pub vexec: Count,
        pub vmem: Count,
        pub rmem: Count,
        /// Proportional set size.
        pub pmem: Count,
        pub vgrow: Count,
        pub rgrow: Count,
        pub vdata: Count,
        pub vstack: Count,
        pub vlibs: Count,
        pub vswap: Count,
        pub cfuture: [Count; 4],
    }
}

layout! {
    pub struct Net {
        pub tcpsnd: Count,
        pub tcpssz: Count,
        pub tcprcv: Count,
        pub tcprsz: Count,
        pub udpsnd: Count,
        pub udpssz: Count,
        pub udprcv: Count,
        pub udprsz: Count,
        pub avail1: Count,
        pub avail2: Count,
        pub cfuture: [Count; 4],
    }
}

layout! {
    pub struct TStat {
        pub general: Gen,
        pub cpu: Cpu,
        pub dsk: Dsk,
        pub mem: Mem,
        pub net: Net,
    }
}
