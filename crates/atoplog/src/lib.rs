//! atoplog: decoder for atop binary performance logs.
//!
//! Provides:
//! - `layout`: C struct layout engine (natural alignment, fixed arrays and strings)
//! - `versions`: per-generation record layouts (`v1_26`, `v2_3`)
//! - `registry`: exact version to generation lookup
//! - `header`: header validation
//! - `stream`: lazy sample decoding
//! - `log`: `AtopLog`, opening a log of any supported generation
//!
//! ```no_run
//! use atoplog::AtopLog;
//!
//! # fn main() -> atoplog::Result<()> {
//! if let AtopLog::V2_3(stream) = AtopLog::open_path("/var/log/atop/atop_20240101")? {
//!     for sample in stream {
//!         let sample = sample?;
//!         println!("{} tasks", sample.tstats.len());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod decompress;
pub mod error;
pub mod header;
pub mod layout;
pub mod log;
pub mod registry;
pub mod stream;
pub mod types;
pub mod version;
pub mod versions;

#[cfg(test)]
mod testutil;

pub use config::{Compression, DecodeConfig};
pub use error::{Blob, DecodeError, LengthMismatch, Result};
pub use header::{LogHeader, MAGIC, decode_header, decode_header_with};
pub use log::AtopLog;
pub use registry::{GenerationId, resolve, supported_versions};
pub use stream::{RecordStream, Sample};
pub use version::Version;
pub use versions::{Generation, LayoutName, V1_26, V2_3};
