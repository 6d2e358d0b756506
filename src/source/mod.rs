//! Raw source adapters.
//!
//! A [`RawSource`] is the only thing in the crate that touches the platform.
//! Every method is a blocking query that either returns raw records or a
//! [`SourceError`]; a failure in one method says nothing about the others.
//!
//! [`SystemSource`] is the production adapter. It maps `sysinfo` for the
//! cross-platform parts and reads `/proc`, `/sys` and property files where
//! `sysinfo` has no coverage. Hosts that already hold the data (for example
//! an Android app bridging `android.os.Build` through JNI) can implement the
//! trait themselves and hand it to
//! [`DeviceSnapshot::with_source`](crate::snapshot::DeviceSnapshot::with_source).

pub mod mobile;
pub mod procfs;
pub mod records;
pub mod sysfs;
mod system;

pub use records::*;
pub use system::SystemSource;

use crate::error::SourceError;

/// Blocking query surface over the platform's telemetry.
///
/// Methods without a default must be answered by every adapter. The
/// defaulted ones report [`SourceError::Unsupported`] unless the adapter
/// overrides them.
#[cfg_attr(test, mockall::automock)]
pub trait RawSource: Send + Sync {
    /// OS family, manufacturer, bitness and the caller's process id
    fn os_identity(&self) -> Result<RawOsIdentity, SourceError>;

    fn version_info(&self) -> Result<RawOsVersion, SourceError>;

    /// Seconds since boot
    fn system_uptime(&self) -> Result<u64, SourceError>;

    /// Boot time in seconds since the epoch
    fn system_boot_time(&self) -> Result<u64, SourceError>;

    fn is_elevated(&self) -> Result<bool, SourceError>;

    fn current_process(&self) -> Result<RawProcess, SourceError>;

    fn current_thread(&self) -> Result<RawThread, SourceError>;

    fn process_count(&self) -> Result<u32, SourceError>;

    fn thread_count(&self) -> Result<u32, SourceError>;

    /// Every process, in the adapter's native order
    fn processes(&self) -> Result<Vec<RawProcess>, SourceError>;

    /// Processes whose id is in `pids`, in the adapter's native order.
    /// Unknown ids are left out.
    fn processes_by_pid(&self, pids: &[u32]) -> Result<Vec<RawProcess>, SourceError>;

    /// `Ok(None)` when no process has this id
    fn process(&self, pid: u32) -> Result<Option<RawProcess>, SourceError>;

    fn file_system(&self) -> Result<RawFileSystem, SourceError>;

    fn network_params(&self) -> Result<RawNetworkParams, SourceError>;

    fn internet_protocol_stats(&self) -> Result<RawProtocolStats, SourceError>;

    fn memory(&self) -> Result<RawGlobalMemory, SourceError>;

    fn partitions(&self) -> Result<Vec<RawPartition>, SourceError>;

    fn network_interfaces(&self) -> Result<Vec<RawNetworkInterface>, SourceError>;

    fn services(&self) -> Result<Vec<RawService>, SourceError> {
        Err(SourceError::Unsupported)
    }

    fn sessions(&self) -> Result<Vec<RawSession>, SourceError> {
        Err(SourceError::Unsupported)
    }

    /// Desktop windows, filtered by the adapter when `visible_only` is set
    fn desktop_windows(&self, _visible_only: bool) -> Result<Vec<RawDesktopWindow>, SourceError> {
        Err(SourceError::Unsupported)
    }

    fn graphics_cards(&self) -> Result<Vec<RawGraphicsCard>, SourceError> {
        Err(SourceError::Unsupported)
    }

    fn android_build(&self) -> Result<RawAndroidBuild, SourceError> {
        Err(SourceError::Unsupported)
    }

    fn android_display(&self) -> Result<RawDisplayMetrics, SourceError> {
        Err(SourceError::Unsupported)
    }

    fn ios_device(&self) -> Result<RawIosDevice, SourceError> {
        Err(SourceError::Unsupported)
    }

    /// Raw `UIDeviceOrientation` value
    fn ios_orientation(&self) -> Result<i64, SourceError> {
        Err(SourceError::Unsupported)
    }
}
