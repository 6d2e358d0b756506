//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use device_snapshot::source::*;
use device_snapshot::SourceError;

pub const OWN_PID: u32 = 4000;

pub fn thread(owning_pid: u32, thread_id: u32, state: &str) -> RawThread {
    RawThread {
        thread_id,
        owning_process_id: owning_pid,
        name: "main".to_string(),
        state: state.to_string(),
        start_time: 1_700_000_000_000,
        ..Default::default()
    }
}

pub fn process(pid: u32, name: &str, state: &str) -> RawProcess {
    RawProcess {
        process_id: pid,
        parent_process_id: 1,
        name: name.to_string(),
        path: format!("/usr/sbin/{}", name),
        command_line: name.to_string(),
        arguments: vec![name.to_string()],
        user: "root".to_string(),
        user_id: "0".to_string(),
        group: "root".to_string(),
        group_id: "0".to_string(),
        state: state.to_string(),
        bitness: 64,
        thread_count: 1,
        threads: vec![thread(pid, pid, "SLEEPING")],
        ..Default::default()
    }
}

pub fn interface(name: &str, index: u32) -> RawNetworkInterface {
    RawNetworkInterface {
        name: name.to_string(),
        index,
        display_name: name.to_string(),
        oper_status: "UP".to_string(),
        mtu: 1500,
        mac_addr: "00:50:56:01:02:03".to_string(),
        ipv4addr: vec!["172.16.0.10".to_string()],
        subnet_masks: vec![16],
        ..Default::default()
    }
}

/// Fixed-content source that counts how often each query runs.
///
/// Services, sessions, windows, graphics cards and the mobile queries keep
/// the trait defaults and report `Unsupported`.
pub struct StaticSource {
    pub processes: Vec<RawProcess>,
    pub interfaces: Vec<RawNetworkInterface>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self {
            processes: vec![
                process(1, "systemd", "SLEEPING"),
                process(OWN_PID, "device-snapshot-tests", "RUNNING"),
                process(4100, "nginx", "SLEEPING"),
            ],
            interfaces: vec![interface("lo", 1), interface("ens3", 2)],
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn calls(&self, query: &str) -> usize {
        self.calls.lock().unwrap().get(query).copied().unwrap_or(0)
    }

    fn record(&self, query: &'static str) {
        *self.calls.lock().unwrap().entry(query).or_insert(0) += 1;
    }
}

impl RawSource for StaticSource {
    fn os_identity(&self) -> Result<RawOsIdentity, SourceError> {
        self.record("os_identity");
        Ok(RawOsIdentity {
            family: "Ubuntu".to_string(),
            manufacturer: "GNU/Linux".to_string(),
            bitness: 64,
            process_id: OWN_PID,
        })
    }

    fn version_info(&self) -> Result<RawOsVersion, SourceError> {
        self.record("version_info");
        Ok(RawOsVersion {
            version: "24.04".to_string(),
            code_name: "noble".to_string(),
            build_number: "6.8.0-31-generic".to_string(),
        })
    }

    fn system_uptime(&self) -> Result<u64, SourceError> {
        self.record("system_uptime");
        Ok(86_400)
    }

    fn system_boot_time(&self) -> Result<u64, SourceError> {
        self.record("system_boot_time");
        Ok(1_700_000_000)
    }

    fn is_elevated(&self) -> Result<bool, SourceError> {
        self.record("is_elevated");
        Ok(true)
    }

    fn current_process(&self) -> Result<RawProcess, SourceError> {
        self.record("current_process");
        Ok(process(OWN_PID, "device-snapshot-tests", "RUNNING"))
    }

    fn current_thread(&self) -> Result<RawThread, SourceError> {
        self.record("current_thread");
        Ok(thread(OWN_PID, OWN_PID, "RUNNING"))
    }

    fn process_count(&self) -> Result<u32, SourceError> {
        self.record("process_count");
        Ok(self.processes.len() as u32)
    }

    fn thread_count(&self) -> Result<u32, SourceError> {
        self.record("thread_count");
        Ok(self.processes.len() as u32)
    }

    fn processes(&self) -> Result<Vec<RawProcess>, SourceError> {
        self.record("processes");
        Ok(self.processes.clone())
    }

    fn processes_by_pid(&self, pids: &[u32]) -> Result<Vec<RawProcess>, SourceError> {
        self.record("processes_by_pid");
        Ok(self
            .processes
            .iter()
            .filter(|p| pids.contains(&p.process_id))
            .cloned()
            .collect())
    }

    fn process(&self, pid: u32) -> Result<Option<RawProcess>, SourceError> {
        self.record("process");
        Ok(self.processes.iter().find(|p| p.process_id == pid).cloned())
    }

    fn file_system(&self) -> Result<RawFileSystem, SourceError> {
        self.record("file_system");
        Ok(RawFileSystem {
            file_stores: vec![
                RawFileStore {
                    name: "/dev/vda1".to_string(),
                    mount: "/".to_string(),
                    fs_type: "ext4".to_string(),
                    total_space: 20 << 30,
                    ..Default::default()
                },
                RawFileStore {
                    name: "/dev/vdb1".to_string(),
                    mount: "/data".to_string(),
                    fs_type: "xfs".to_string(),
                    total_space: 100 << 30,
                    ..Default::default()
                },
            ],
            open_file_descriptors: 1024,
            max_file_descriptors: 1 << 20,
        })
    }

    fn network_params(&self) -> Result<RawNetworkParams, SourceError> {
        self.record("network_params");
        Ok(RawNetworkParams {
            host_name: "web-01".to_string(),
            domain_name: "internal".to_string(),
            dns_servers: vec!["172.16.0.2".to_string()],
            ipv4_default_gateway: "172.16.0.1".to_string(),
            ipv6_default_gateway: String::new(),
        })
    }

    fn internet_protocol_stats(&self) -> Result<RawProtocolStats, SourceError> {
        self.record("internet_protocol_stats");
        Ok(RawProtocolStats {
            connections: vec![RawIpConnection {
                connection_type: "tcp4".to_string(),
                local_address: "0.0.0.0".to_string(),
                local_port: 80,
                foreign_address: "0.0.0.0".to_string(),
                state: "LISTEN".to_string(),
                owning_process_id: 4100,
                ..Default::default()
            }],
            ..Default::default()
        })
    }

    fn memory(&self) -> Result<RawGlobalMemory, SourceError> {
        self.record("memory");
        Ok(RawGlobalMemory {
            total: 16 << 30,
            available: 12 << 30,
            page_size: 4096,
            ..Default::default()
        })
    }

    fn partitions(&self) -> Result<Vec<RawPartition>, SourceError> {
        self.record("partitions");
        Ok(Vec::new())
    }

    fn network_interfaces(&self) -> Result<Vec<RawNetworkInterface>, SourceError> {
        self.record("network_interfaces");
        Ok(self.interfaces.clone())
    }
}
