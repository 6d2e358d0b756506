use std::sync::Arc;

use log::debug;
use serde::Serialize;

use crate::error::{QueryContext, Result, SnapshotError};
use crate::models::{
    FileSystem, InternetProtocolStats, NetworkParams, OSDesktopWindow, OSProcess, OSService,
    OSSession, OSThread, OSVersionInfo,
};
use crate::source::{RawOsIdentity, RawSource};
use crate::translate::{
    load_many, translate_desktop_window, translate_file_system, translate_network_params,
    translate_process, translate_protocol_stats, translate_service, translate_session,
    translate_thread, translate_version, LoadPolicy,
};

use super::deferred::Deferred;

/// Lifecycle of an aggregator.
///
/// There is no terminal state: an aggregator stays usable for as long as it
/// is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnapshotState {
    /// Nothing has been resolved yet
    Uninitialized,
    /// At least one deferred field holds its value
    PartiallyResolved,
}

impl SnapshotState {
    pub(crate) fn from_resolved(resolved: bool) -> Self {
        if resolved {
            SnapshotState::PartiallyResolved
        } else {
            SnapshotState::Uninitialized
        }
    }
}

/// Operating system view of the snapshot.
///
/// Three kinds of fields:
///
/// - permanent scalars (`family`, `manufacturer`, `process_id`, `bitness`)
///   come from one identity query on first access and are then held;
/// - deferred fields (`version_info`, `file_system`, `network_params`,
///   `internet_protocol_stats`) are built on first access and then borrowed
///   from the aggregator;
/// - everything else is queried again on every call.
///
/// Each call is independent. A failure is reported to that caller only and
/// leaves every other field usable.
pub struct OperatingSystem {
    source: Arc<dyn RawSource>,
    policy: LoadPolicy,
    identity: Deferred<RawOsIdentity>,
    version_info: Deferred<OSVersionInfo>,
    file_system: Deferred<FileSystem>,
    network_params: Deferred<NetworkParams>,
    internet_protocol_stats: Deferred<InternetProtocolStats>,
}

impl OperatingSystem {
    pub fn new(source: Arc<dyn RawSource>, policy: LoadPolicy) -> Self {
        Self {
            source,
            policy,
            identity: Deferred::new(),
            version_info: Deferred::new(),
            file_system: Deferred::new(),
            network_params: Deferred::new(),
            internet_protocol_stats: Deferred::new(),
        }
    }

    pub fn state(&self) -> SnapshotState {
        let resolved = self.identity.is_resolved()
            || self.version_info.is_resolved()
            || self.file_system.is_resolved()
            || self.network_params.is_resolved()
            || self.internet_protocol_stats.is_resolved();
        SnapshotState::from_resolved(resolved)
    }

    pub fn load_policy(&self) -> LoadPolicy {
        self.policy
    }

    fn identity(&self) -> Result<&RawOsIdentity> {
        self.identity.get_or_try_init(|| {
            debug!("Querying os_identity");
            self.source.os_identity().query("os_identity")
        })
    }

    pub fn family(&self) -> Result<&str> {
        Ok(&self.identity()?.family)
    }

    pub fn manufacturer(&self) -> Result<&str> {
        Ok(&self.identity()?.manufacturer)
    }

    /// Id of the process that built this snapshot
    pub fn process_id(&self) -> Result<u32> {
        Ok(self.identity()?.process_id)
    }

    pub fn bitness(&self) -> Result<u32> {
        Ok(self.identity()?.bitness)
    }

    pub fn version_info(&self) -> Result<&OSVersionInfo> {
        self.version_info.get_or_try_init(|| {
            debug!("Querying version_info");
            self.source
                .version_info()
                .query("version_info")
                .map(translate_version)
        })
    }

    pub fn file_system(&self) -> Result<&FileSystem> {
        self.file_system.get_or_try_init(|| {
            debug!("Querying file_system");
            let raw = self.source.file_system().query("file_system")?;
            translate_file_system(raw, self.policy)
        })
    }

    pub fn network_params(&self) -> Result<&NetworkParams> {
        self.network_params.get_or_try_init(|| {
            debug!("Querying network_params");
            self.source
                .network_params()
                .query("network_params")
                .map(translate_network_params)
        })
    }

    pub fn internet_protocol_stats(&self) -> Result<&InternetProtocolStats> {
        self.internet_protocol_stats.get_or_try_init(|| {
            debug!("Querying internet_protocol_stats");
            let raw = self
                .source
                .internet_protocol_stats()
                .query("internet_protocol_stats")?;
            translate_protocol_stats(raw, self.policy)
        })
    }

    /// Seconds since boot
    pub fn system_uptime(&self) -> Result<u64> {
        debug!("Querying system_uptime");
        self.source.system_uptime().query("system_uptime")
    }

    /// Boot time in seconds since the epoch
    pub fn system_boot_time(&self) -> Result<u64> {
        debug!("Querying system_boot_time");
        self.source.system_boot_time().query("system_boot_time")
    }

    pub fn is_elevated(&self) -> Result<bool> {
        debug!("Querying is_elevated");
        self.source.is_elevated().query("is_elevated")
    }

    pub fn current_process(&self) -> Result<OSProcess> {
        debug!("Querying current_process");
        let raw = self.source.current_process().query("current_process")?;
        translate_process(raw, self.policy)
    }

    pub fn current_thread(&self) -> Result<OSThread> {
        debug!("Querying current_thread");
        translate_thread(self.source.current_thread().query("current_thread")?)
    }

    /// Id of the calling thread, read again on every call
    pub fn thread_id(&self) -> Result<u32> {
        debug!("Querying thread_id");
        let raw = self.source.current_thread().query("thread_id")?;
        Ok(raw.thread_id)
    }

    pub fn process_count(&self) -> Result<u32> {
        debug!("Querying process_count");
        self.source.process_count().query("process_count")
    }

    pub fn thread_count(&self) -> Result<u32> {
        debug!("Querying thread_count");
        self.source.thread_count().query("thread_count")
    }

    pub fn services(&self) -> Result<Vec<OSService>> {
        debug!("Querying services");
        let raw = self.source.services().query("services")?;
        load_many(raw, self.policy, "OSService", translate_service)
    }

    pub fn sessions(&self) -> Result<Vec<OSSession>> {
        debug!("Querying sessions");
        let raw = self.source.sessions().query("sessions")?;
        load_many(raw, self.policy, "OSSession", translate_session)
    }

    /// Every process at the time of the call
    pub fn processes(&self) -> Result<Vec<OSProcess>> {
        debug!("Querying processes");
        let raw = self.source.processes().query("processes")?;
        let policy = self.policy;
        load_many(raw, policy, "OSProcess", |p| translate_process(p, policy))
    }

    /// Processes whose id is in `pids`, in the source's order. Ids with no
    /// process are left out.
    pub fn processes_by_pid(&self, pids: &[u32]) -> Result<Vec<OSProcess>> {
        debug!("Querying processes_by_pid for {} ids", pids.len());
        let raw = self
            .source
            .processes_by_pid(pids)
            .query("processes_by_pid")?;
        let policy = self.policy;
        load_many(raw, policy, "OSProcess", |p| translate_process(p, policy))
    }

    pub fn process(&self, pid: u32) -> Result<OSProcess> {
        debug!("Querying process {}", pid);
        match self.source.process(pid).query("process")? {
            Some(raw) => translate_process(raw, self.policy),
            None => Err(SnapshotError::NotFound { what: "process", id: pid }),
        }
    }

    /// Desktop windows. `visible_only` is applied by the source.
    pub fn desktop_windows(&self, visible_only: bool) -> Result<Vec<OSDesktopWindow>> {
        debug!("Querying desktop_windows (visible_only: {})", visible_only);
        let raw = self
            .source
            .desktop_windows(visible_only)
            .query("desktop_windows")?;
        load_many(raw, self.policy, "OSDesktopWindow", translate_desktop_window)
    }
}
