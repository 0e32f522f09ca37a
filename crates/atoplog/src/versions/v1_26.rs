//! Layouts written by atop 1.26.
//!
//! This is the canonical home of every struct later generations did not
//! change. Field names follow atop's C declarations (rawlog.c, photosyst.h,
//! photoproc.h, netstat.h) in snake_case.
//!
//! The 1.26-only structs are derived from the 2.3 layouts by removing the
//! fields 2.x added; the resulting sizes (sstat 636304, tstat 736) have not
//! been checked against a real 1.26 log.

use chrono::{DateTime, Utc};

use super::{DeclaredLengths, Generation, HeaderFields, RecordFields};
use crate::layout::{FixedArray, FixedStr, layout};
use crate::types::{CLong, Count, Time};
use crate::version::Version;

pub const PNAMLEN: usize = 15;
pub const CMDLEN: usize = 255;

pub const MAXCPU: usize = 2048;
pub const MAXDSK: usize = 1024;
pub const MAXLVM: usize = 2048;
pub const MAXMDD: usize = 256;
pub const MAXINTF: usize = 128;
pub const MAXDKNAM: usize = 32;

/// Length of each `struct utsname` member on Linux.
pub const UTSLEN: usize = 65;

/// The atop 1.26 generation.
pub enum V1_26 {}

impl Generation for V1_26 {
    const VERSION: Version = Version::new(1, 26);

    type Header = Header;
    type Record = Record;
    type SStat = SStat;
    type TStat = TStat;
}

// ============================================================
// File and record headers
// ============================================================

layout! {
    /// System identification (`struct utsname`, sys/utsname.h).
    pub struct UtsName {
        pub sysname: FixedStr<UTSLEN>,
        pub nodename: FixedStr<UTSLEN>,
        pub release: FixedStr<UTSLEN>,
        pub version: FixedStr<UTSLEN>,
        pub machine: FixedStr<UTSLEN>,
        pub domain: FixedStr<UTSLEN>,
    }
}

layout! {
    /// File header (`struct rawheader`, rawlog.c). Written once at offset 0.
    pub struct Header {
        pub magic: u32,

        /// Creator version, `major << 8 | minor`, MSB set by atop.
        pub aversion: u16,
        pub future1: u16,
        pub future2: u16,
        /// Length of `struct rawheader`.
        pub rawheadlen: u16,
        /// Length of `struct rawrecord`.
        pub rawreclen: u16,
        /// Clock interrupts per second.
        pub hertz: u16,
        pub sfuture: [u16; 6],
        /// Length of `struct sstat`.
        pub sstatlen: u32,
        /// Length of `struct tstat`.
        pub tstatlen: u32,
        pub utsname: UtsName,
        pub cfuture: FixedStr<8>,

        /// Size of a memory page in bytes.
        pub pagesize: u32,
        /// See [`support_flags`](super::support_flags).
        pub supportflags: i32,
        pub osrel: i32,
        pub osvers: i32,
        pub ossub: i32,
        pub ifuture: [i32; 6],
    }
}

impl HeaderFields for Header {
    fn aversion(&self) -> u16 {
        self.aversion
    }

    fn hertz(&self) -> u16 {
        self.hertz
    }

    fn pagesize(&self) -> u32 {
        self.pagesize
    }

    fn supportflags(&self) -> i32 {
        self.supportflags
    }

    fn declared_lengths(&self) -> DeclaredLengths {
        DeclaredLengths {
            rawheadlen: self.rawheadlen as usize,
            rawreclen: self.rawreclen as usize,
            sstatlen: self.sstatlen as usize,
            tstatlen: self.tstatlen as usize,
        }
    }

    fn utsname(&self) -> &UtsName {
        &self.utsname
    }
}

layout! {
    /// Per-sample record header (`struct rawrecord`, rawlog.c).
    pub struct Record {
        /// Sample time (epoch seconds).
        pub curtime: Time,

        /// See [`record_flags`](super::record_flags).
        pub flags: u16,
        pub sfuture: [u16; 3],

        /// Length of the compressed sstat.
        pub scomplen: u32,
        /// Length of the compressed tstats.
        pub pcomplen: u32,
        /// Interval in seconds.
        pub interval: u32,
        /// Number of tasks in the tstat list.
        pub ndeviat: u32,
        /// Number of processes in the tstat list.
        pub nactproc: u32,
        pub ntask: u32,
        pub totproc: u32,
        pub totrun: u32,
        pub totslpi: u32,
        pub totslpu: u32,
        pub totzomb: u32,
        pub nexit: u32,
        pub noverflow: u32,
        pub ifuture: [u32; 6],
    }
}

impl RecordFields for Record {
    fn curtime(&self) -> Time {
        self.curtime
    }

    fn flags(&self) -> u16 {
        self.flags
    }

    fn scomplen(&self) -> u32 {
        self.scomplen
    }

    fn pcomplen(&self) -> u32 {
        self.pcomplen
    }

    fn ndeviat(&self) -> u32 {
        self.ndeviat
    }
}

// ============================================================
// System statistics (sstat)
// ============================================================

layout! {
    /// Memory counters, in pages unless noted.
    pub struct MemStat {
        pub physmem: Count,
        pub freemem: Count,
        pub buffermem: Count,
        pub slabmem: Count,
        pub cachemem: Count,
        /// Dirty cache pages.
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
        /// Huge page size in bytes.
        pub hugepagesz: Count,

        pub cfuture: [Count; 8],
    }
}

layout! {
    /// CPU frequency scaling counters.
    pub struct FreqCnt {
        pub maxfreq: Count,
        pub cnt: Count,
        pub ticks: Count,
    }
}

layout! {
    /// Per-processor times in clock ticks.
    pub struct PerCpu {
        pub cpunr: i32,
        pub stime: Count,
        pub utime: Count,
        pub ntime: Count,
        pub itime: Count,
        pub wtime: Count,
        /// `Itime` in atop: time servicing interrupts.
        pub irqtime: Count,
        /// `Stime` in atop: time servicing softirqs.
        pub softirqtime: Count,
        pub steal: Count,
        pub guest: Count,
        pub freqcnt: FreqCnt,
        pub cfuture: [Count; 1],
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
    pub struct PerDsk {
        /// Empty for the last entry.
        pub name: FixedStr<MAXDKNAM>,
        pub nread: Count,
        pub nrsect: Count,
        pub nwrite: Count,
        pub nwsect: Count,
        pub io_ms: Count,
        pub avque: Count,
        pub cfuture: [Count; 4],
    }
}

layout! {
    /// Physical disks, multiple devices (software RAID) and logical volumes.
    pub struct DskStat {
        pub ndsk: i32,
        pub nmdd: i32,
        pub nlvm: i32,
        pub dsk: FixedArray<PerDsk, MAXDSK>,
        pub mdd: FixedArray<PerDsk, MAXMDD>,
        pub lvm: FixedArray<PerDsk, MAXLVM>,
    }
}

impl DskStat {
    pub fn disks(&self) -> &[PerDsk] {
        self.dsk.prefix(self.ndsk.into())
    }

    pub fn mdds(&self) -> &[PerDsk] {
        self.mdd.prefix(self.nmdd.into())
    }

    pub fn lvms(&self) -> &[PerDsk] {
        self.lvm.prefix(self.nlvm.into())
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

        /// Interface speed in megabits per second.
        pub speed: CLong,
        /// Full duplex when non-zero.
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
    /// Web server counters gathered from a local Apache status page.
    pub struct WwwStat {
        pub accesses: Count,
        pub totkbytes: Count,
        pub uptime: Count,
        /// Busy workers.
        pub bworkers: i32,
        /// Idle workers.
        pub iworkers: i32,
    }
}

layout! {
    pub struct Ipv4Stats {
        pub forwarding: Count,
        pub default_ttl: Count,
        pub in_receives: Count,
        pub in_hdr_errors: Count,
        pub in_addr_errors: Count,
        pub forw_datagrams: Count,
        pub in_unknown_protos: Count,
        pub in_discards: Count,
        pub in_delivers: Count,
        pub out_requests: Count,
        pub out_discards: Count,
        pub out_no_routes: Count,
        pub reasm_timeout: Count,
        pub reasm_reqds: Count,
        pub reasm_oks: Count,
        pub reasm_fails: Count,
        pub frag_oks: Count,
        pub frag_fails: Count,
        pub frag_creates: Count,
    }
}

layout! {
    pub struct Icmpv4Stats {
        pub in_msgs: Count,
        pub in_errors: Count,
        pub in_dest_unreachs: Count,
        pub in_time_excds: Count,
        pub in_parm_probs: Count,
        pub in_src_quenchs: Count,
        pub in_redirects: Count,
        pub in_echos: Count,
        pub in_echo_reps: Count,
        pub in_timestamps: Count,
        pub in_timestamp_reps: Count,
        pub in_addr_masks: Count,
        pub in_addr_mask_reps: Count,
        pub out_msgs: Count,
        pub out_errors: Count,
        pub out_dest_unreachs: Count,
        pub out_time_excds: Count,
        pub out_parm_probs: Count,
        pub out_src_quenchs: Count,
        pub out_redirects: Count,
        pub out_echos: Count,
        pub out_echo_reps: Count,
        pub out_timestamps: Count,
        pub out_timestamp_reps: Count,
        pub out_addr_masks: Count,
        pub out_addr_mask_reps: Count,
    }
}

layout! {
    pub struct Udpv4Stats {
        pub in_datagrams: Count,
        pub no_ports: Count,
        pub in_errors: Count,
        pub out_datagrams: Count,
    }
}

layout! {
    pub struct TcpStats {
        pub rto_algorithm: Count,
        pub rto_min: Count,
        pub rto_max: Count,
        pub max_conn: Count,
        pub active_opens: Count,
        pub passive_opens: Count,
        pub attempt_fails: Count,
        pub estab_resets: Count,
        pub curr_estab: Count,
        pub in_segs: Count,
        pub out_segs: Count,
        pub retrans_segs: Count,
        pub in_errs: Count,
        pub out_rsts: Count,
    }
}

layout! {
    pub struct Ipv6Stats {
        pub in_receives: Count,
        pub in_hdr_errors: Count,
        pub in_too_big_errors: Count,
        pub in_no_routes: Count,
        pub in_addr_errors: Count,
        pub in_unknown_protos: Count,
        pub in_truncated_pkts: Count,
        pub in_discards: Count,
        pub in_delivers: Count,
        pub out_forw_datagrams: Count,
        pub out_requests: Count,
        pub out_discards: Count,
        pub out_no_routes: Count,
        pub reasm_timeout: Count,
        pub reasm_reqds: Count,
        pub reasm_oks: Count,
        pub reasm_fails: Count,
        pub frag_oks: Count,
        pub frag_fails: Count,
        pub frag_creates: Count,
        pub in_mcast_pkts: Count,
        pub out_mcast_pkts: Count,
    }
}

layout! {
    pub struct Icmpv6Stats {
        pub in_msgs: Count,
        pub in_errors: Count,
        pub in_dest_unreachs: Count,
        pub in_pkt_too_bigs: Count,
        pub in_time_excds: Count,
        pub in_parm_problems: Count,
        pub in_echos: Count,
        pub in_echo_replies: Count,
        pub in_group_memb_queries: Count,
        pub in_group_memb_responses: Count,
        pub in_group_memb_reductions: Count,
        pub in_router_solicits: Count,
        pub in_router_advertisements: Count,
        pub in_neighbor_solicits: Count,
        pub in_neighbor_advertisements: Count,
        pub in_redirects: Count,
        pub out_msgs: Count,
        pub out_dest_unreachs: Count,
        pub out_pkt_too_bigs: Count,
        pub out_time_excds: Count,
        pub out_parm_problems: Count,
        pub out_echo_replies: Count,
        pub out_router_solicits: Count,
        pub out_neighbor_solicits: Count,
        pub out_neighbor_advertisements: Count,
        pub out_redirects: Count,
        pub out_group_memb_responses: Count,
        pub out_group_memb_reductions: Count,
    }
}

layout! {
    pub struct Udpv6Stats {
        pub in_datagrams: Count,
        pub no_ports: Count,
        pub in_errors: Count,
        pub out_datagrams: Count,
    }
}

layout! {
    /// Protocol counters from /proc/net/snmp and /proc/net/snmp6.
    pub struct NetStat {
        pub ipv4: Ipv4Stats,
        pub icmpv4: Icmpv4Stats,
        pub udpv4: Udpv4Stats,

        pub ipv6: Ipv6Stats,
        pub icmpv6: Icmpv6Stats,
        pub udpv6: Udpv6Stats,

        pub tcp: TcpStats,
    }
}

layout! {
    /// System-level statistics for one sample (`struct sstat`, photosyst.h).
    pub struct SStat {
        pub cpu: CpuStat,
        pub mem: MemStat,
        pub net: NetStat,
        pub intf: IntfStat,
        pub dsk: DskStat,

        pub www: WwwStat,
    }
}

// ============================================================
// Task statistics (tstat)
// ============================================================

layout! {
    /// Identity and state of a task.
    pub struct Gen {
        /// Thread group id.
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
        /// `'y'` for a process, `'n'` for a thread.
        pub isproc: u8,
        /// Process state character (`R`, `S`, `D`, `Z`, `E` for exited, ...).
        pub state: u8,
        pub excode: i32,
        /// Start time (epoch seconds).
        pub btime: Time,
        /// Elapsed time for exited tasks, in clock ticks.
        pub elaps: Time,
        pub cmdline: FixedStr<{ CMDLEN + 1 }>,
        pub nthrslpi: i32,
        pub nthrslpu: i32,
        pub nthrrun: i32,
        pub ifuture: [i32; 1],
    }
}

impl Gen {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.btime, 0)
    }
}

layout! {
    pub struct Cpu {
        pub utime: Count,
        pub stime: Count,
        pub nice: i32,
        pub prio: i32,
        pub rtprio: i32,
        pub policy: i32,
        pub curcpu: i32,
        pub sleepavg: i32,
        pub cfuture: [Count; 4],
    }
}

layout! {
    pub struct Dsk {
        pub rio: Count,
        pub rsz: Count,
        pub wio: Count,
        pub wsz: Count,
        /// Cancelled write size.
        pub cwsz: Count,
        pub cfuture: [Count; 4],
    }
}

layout! {
    /// Memory usage of a task, sizes in kilobytes.
    pub struct Mem {
        pub minflt: Count,
        pub majflt: Count,
        pub vexec: Count,
        pub vmem: Count,
        pub rmem: Count,
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
        pub rawsnd: Count,
        pub rawrcv: Count,
        pub cfuture: [Count; 4],
    }
}

layout! {
    /// Statistics of one task for one sample (`struct tstat`, photoproc.h).
    pub struct TStat {
        pub general: Gen,
        pub cpu: Cpu,
        pub dsk: Dsk,
        pub mem: Mem,
        pub net: Net,
    }
}
