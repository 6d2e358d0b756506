//! # device-snapshot
//!
//! A lazily loaded, read-only snapshot of the device, operating system and
//! hardware the program is running on.
//!
//! ## Overview
//!
//! The snapshot is a tree of aggregators rooted at
//! [`DeviceSnapshot`](snapshot::DeviceSnapshot). The platform is picked once
//! when the snapshot is built, and nothing is read from the platform until an
//! accessor is called. Static values such as the OS version or Android build
//! properties are read once and then held. Volatile values such as uptime,
//! processes or memory are read again on every call. A failure in one query
//! is reported to that caller only and never poisons the other fields.
//!
//! ## Usage
//!
//! ```no_run
//! use device_snapshot::snapshot::DeviceSnapshot;
//!
//! # fn main() -> Result<(), device_snapshot::error::SnapshotError> {
//! let snapshot = DeviceSnapshot::new();
//!
//! if let Some(desktop) = snapshot.info().as_desktop() {
//!     let os = desktop.operating_system();
//!     println!("{} {}", os.family()?, os.version_info()?.version);
//!
//!     for process in os.processes()? {
//!         println!("{:>7} {}", process.process_id, process.name);
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ### Fault-tolerant report
//!
//! ```no_run
//! use device_snapshot::report::SnapshotReport;
//! use device_snapshot::snapshot::DeviceSnapshot;
//!
//! # fn main() -> anyhow::Result<()> {
//! let report = SnapshotReport::collect(&DeviceSnapshot::new());
//! for error in &report.errors {
//!     eprintln!("{}: {}", error.field, error.error);
//! }
//! println!("{}", report.to_json()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`snapshot`]: the aggregator tree and deferred fields
//! - [`models`]: public snapshot entities
//! - [`source`]: raw source adapters (`sysinfo`, procfs, sysfs, property files)
//! - [`translate`]: raw record to entity translators and collection loaders
//! - [`report`]: whole-snapshot report with per-field errors
//! - [`config`]: YAML configuration
//! - [`error`]: error types
//! - [`privileges`]: elevation checks
//! - [`constants`]: default paths and fixed values
//!
//! ## Safety
//!
//! `unsafe` is limited to single libc and Win32 calls (`sysconf`,
//! `geteuid`, `gettid`, `sysctlbyname`, `IsUserAnAdmin`) in the source and
//! privilege modules.

/// Configuration management
pub mod config;

/// Application constants and default paths
pub mod constants;

/// Error types for snapshot queries
pub mod error;

/// Public snapshot entities
pub mod models;

/// Platform-specific privilege checks
pub mod privileges;

/// Whole-snapshot report
pub mod report;

/// Lazily aggregated device snapshot
pub mod snapshot;

/// Raw source adapters
pub mod source;

/// Raw record translators
pub mod translate;

/// Test utilities and helpers
#[cfg(test)]
pub mod test_utils;

pub use config::SnapshotConfig;
pub use error::{Result, SnapshotError, SourceError};
pub use snapshot::{DeviceSnapshot, Platform, PlatformInfo};
pub use translate::LoadPolicy;
