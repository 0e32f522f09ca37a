//! Scalar aliases shared by every layout generation.
//!
//! atop writes its structs with the native LP64 Linux ABI (x86_64, aarch64):
//! `long` is 8 bytes and every scalar is aligned to its own width. The aliases
//! below pin that ABI so decoding never depends on the host running the reader.

/// `count_t` from atop.h (`long long`).
pub type Count = i64;

/// C `long` on LP64.
pub type CLong = i64;

/// C `unsigned long` on LP64.
pub type CULong = u64;

/// `time_t` from time.h.
pub type Time = CLong;
