//! Test utilities for device-snapshot
//!
//! Record generators and a counting [`FakeSource`] shared by the unit tests.

#![cfg(test)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use crate::error::SourceError;
use crate::source::*;

/// Test data generators for raw records
pub mod generators {
    use std::collections::HashMap;

    use crate::source::*;

    const TEST_START_TIME: i64 = 1_700_000_000_000;
    const TEST_RSS: i64 = 64 * 1024 * 1024; // 64MB

    /// A sleeping thread of `owning_pid`
    pub fn raw_thread(owning_pid: u32, thread_id: u32) -> RawThread {
        RawThread {
            thread_id,
            owning_process_id: owning_pid,
            name: format!("worker-{}", thread_id),
            state: "SLEEPING".to_string(),
            cpu_load_cumulative: 0.01,
            start_memory_address: 0x40_0000,
            context_switches: 12,
            minor_faults: 100,
            major_faults: 1,
            kernel_time: 20,
            user_time: 40,
            up_time: 60_000,
            start_time: TEST_START_TIME,
            priority: 20,
        }
    }

    /// A running process with two threads, ids `pid` and `pid + 1`
    pub fn raw_process(pid: u32, name: &str) -> RawProcess {
        RawProcess {
            process_id: pid,
            parent_process_id: 1,
            name: name.to_string(),
            path: format!("/usr/bin/{}", name),
            command_line: format!("/usr/bin/{} --test", name),
            arguments: vec![format!("/usr/bin/{}", name), "--test".to_string()],
            environment: vec![("PATH".to_string(), "/usr/bin".to_string())],
            current_working_directory: "/".to_string(),
            user: "root".to_string(),
            user_id: "0".to_string(),
            group: "root".to_string(),
            group_id: "0".to_string(),
            state: "RUNNING".to_string(),
            priority: 20,
            virtual_size: 4 * TEST_RSS,
            resident_set_size: TEST_RSS,
            kernel_time: 100,
            user_time: 300,
            start_time: TEST_START_TIME,
            up_time: 120_000,
            bytes_read: 4096,
            bytes_written: 1024,
            open_files: 8,
            soft_open_file_limit: 1024,
            hard_open_file_limit: 524_288,
            cpu_load_cumulative: 0.003,
            cpu_load_between_ticks: 0.01,
            bitness: 64,
            affinity_mask: 0b1111,
            minor_faults: 1000,
            major_faults: 3,
            context_switches: 250,
            thread_count: 2,
            threads: vec![raw_thread(pid, pid), raw_thread(pid, pid + 1)],
        }
    }

    /// A TCP connection from 10.0.0.5 in `state`
    pub fn raw_connection(local_port: u16, state: &str) -> RawIpConnection {
        RawIpConnection {
            connection_type: "tcp4".to_string(),
            local_address: "10.0.0.5".to_string(),
            local_port,
            foreign_address: "10.0.0.9".to_string(),
            foreign_port: 51_000,
            state: state.to_string(),
            transmit_queue: 0,
            receive_queue: 0,
            owning_process_id: 200,
        }
    }

    /// An interface that is up, with one IPv4 and one IPv6 address
    pub fn raw_network_interface(name: &str) -> RawNetworkInterface {
        RawNetworkInterface {
            name: name.to_string(),
            index: 2,
            display_name: name.to_string(),
            if_alias: String::new(),
            oper_status: "UP".to_string(),
            mtu: 1500,
            mac_addr: "3c:22:fb:12:34:56".to_string(),
            ipv4addr: vec!["192.168.1.20".to_string()],
            subnet_masks: vec![24],
            ipv6addr: vec!["fe80::1".to_string()],
            prefix_lengths: vec![64],
            bytes_recv: 1_000_000,
            bytes_sent: 500_000,
            packets_recv: 1000,
            packets_sent: 800,
            speed: 1_000_000_000,
            timestamp: TEST_START_TIME,
            if_type: 1,
            connector_present: true,
            ..Default::default()
        }
    }

    /// Build properties of a Pixel 8 on Android 14
    pub fn raw_android_build() -> RawAndroidBuild {
        let properties: HashMap<String, String> = [
            ("ro.product.model", "Pixel 8"),
            ("ro.product.manufacturer", "Google"),
            ("ro.product.device", "shiba"),
            ("ro.product.name", "shiba"),
            ("ro.product.board", "shiba"),
            ("ro.hardware", "shiba"),
            ("ro.build.id", "UD1A.230803.041"),
            ("ro.build.display.id", "UD1A.230803.041"),
            ("ro.build.fingerprint", "google/shiba/shiba:14/UD1A.230803.041/10808477:user/release-keys"),
            ("ro.build.version.sdk", "34"),
            ("ro.build.version.release", "14"),
            ("ro.build.version.codename", "REL"),
            ("ro.build.version.incremental", "10808477"),
            ("ro.build.version.security_patch", "2023-08-05"),
            ("ro.build.host", "abfarm-release"),
            ("ro.product.cpu.abilist", "arm64-v8a,armeabi-v7a,armeabi"),
            ("ro.product.cpu.abilist32", "armeabi-v7a,armeabi"),
            ("ro.product.cpu.abilist64", "arm64-v8a"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        RawAndroidBuild { properties }
    }
}

/// In-memory [`RawSource`] that counts every query.
///
/// Queries named in `failing` return [`SourceError::Unsupported`]. An
/// optional delay is applied to every query before it answers.
pub struct FakeSource {
    processes: Vec<RawProcess>,
    interfaces: Vec<RawNetworkInterface>,
    failing: Mutex<HashSet<&'static str>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    delay: Option<Duration>,
    ios_orientation: AtomicI64,
}

impl Default for FakeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSource {
    /// Process id the fake reports for the calling process
    pub const OWN_PID: u32 = 200;

    pub fn new() -> Self {
        Self {
            processes: vec![
                generators::raw_process(1, "init"),
                generators::raw_process(Self::OWN_PID, "devinfo"),
                generators::raw_process(300, "sshd"),
            ],
            interfaces: vec![
                generators::raw_network_interface("lo"),
                generators::raw_network_interface("eth0"),
            ],
            failing: Mutex::new(HashSet::new()),
            calls: Mutex::new(HashMap::new()),
            delay: None,
            ios_orientation: AtomicI64::new(1),
        }
    }

    pub fn failing(self, query: &'static str) -> Self {
        self.failing.lock().unwrap().insert(query);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_process(mut self, process: RawProcess) -> Self {
        self.processes.push(process);
        self
    }

    pub fn with_interface(mut self, interface: RawNetworkInterface) -> Self {
        self.interfaces.push(interface);
        self
    }

    /// Let a failing query succeed from now on
    pub fn recover(&self, query: &'static str) {
        self.failing.lock().unwrap().remove(query);
    }

    pub fn set_ios_orientation(&self, raw: i64) {
        self.ios_orientation.store(raw, Ordering::SeqCst);
    }

    /// Number of times `query` was invoked
    pub fn calls(&self, query: &str) -> usize {
        self.calls.lock().unwrap().get(query).copied().unwrap_or(0)
    }

    fn record(&self, query: &'static str) -> Result<(), SourceError> {
        *self.calls.lock().unwrap().entry(query).or_insert(0) += 1;
        if let Some(delay) = self.delay {
            thread::sleep(delay);
        }
        if self.failing.lock().unwrap().contains(query) {
            return Err(SourceError::Unsupported);
        }
        Ok(())
    }

    fn own_process(&self) -> Option<RawProcess> {
        self.processes
            .iter()
            .find(|p| p.process_id == Self::OWN_PID)
            .cloned()
    }
}

impl RawSource for FakeSource {
    fn os_identity(&self) -> Result<RawOsIdentity, SourceError> {
        self.record("os_identity")?;
        Ok(RawOsIdentity {
            family: "Linux".to_string(),
            manufacturer: "GNU/Linux".to_string(),
            bitness: 64,
            process_id: Self::OWN_PID,
        })
    }

    fn version_info(&self) -> Result<RawOsVersion, SourceError> {
        self.record("version_info")?;
        Ok(RawOsVersion {
            version: "22.04".to_string(),
            code_name: "jammy".to_string(),
            build_number: "6.5.0-41-generic".to_string(),
        })
    }

    fn system_uptime(&self) -> Result<u64, SourceError> {
        self.record("system_uptime")?;
        Ok(3600)
    }

    fn system_boot_time(&self) -> Result<u64, SourceError> {
        self.record("system_boot_time")?;
        Ok(1_700_000_000)
    }

    fn is_elevated(&self) -> Result<bool, SourceError> {
        self.record("is_elevated")?;
        Ok(false)
    }

    fn current_process(&self) -> Result<RawProcess, SourceError> {
        self.record("current_process")?;
        self.own_process().ok_or(SourceError::Unsupported)
    }

    fn current_thread(&self) -> Result<RawThread, SourceError> {
        self.record("current_thread")?;
        Ok(generators::raw_thread(Self::OWN_PID, Self::OWN_PID + 1))
    }

    fn process_count(&self) -> Result<u32, SourceError> {
        self.record("process_count")?;
        Ok(self.processes.len() as u32)
    }

    fn thread_count(&self) -> Result<u32, SourceError> {
        self.record("thread_count")?;
        Ok(self.processes.iter().map(|p| p.thread_count).sum())
    }

    fn processes(&self) -> Result<Vec<RawProcess>, SourceError> {
        self.record("processes")?;
        Ok(self.processes.clone())
    }

    fn processes_by_pid(&self, pids: &[u32]) -> Result<Vec<RawProcess>, SourceError> {
        self.record("processes_by_pid")?;
        Ok(self
            .processes
            .iter()
            .filter(|p| pids.contains(&p.process_id))
            .cloned()
            .collect())
    }

    fn process(&self, pid: u32) -> Result<Option<RawProcess>, SourceError> {
        self.record("process")?;
        Ok(self.processes.iter().find(|p| p.process_id == pid).cloned())
    }

    fn file_system(&self) -> Result<RawFileSystem, SourceError> {
        self.record("file_system")?;
        Ok(RawFileSystem {
            file_stores: vec![RawFileStore {
                name: "/dev/sda1".to_string(),
                volume: "/dev/sda1".to_string(),
                mount: "/".to_string(),
                description: "Local Disk".to_string(),
                fs_type: "ext4".to_string(),
                free_space: 50 * 1024 * 1024 * 1024,
                usable_space: 50 * 1024 * 1024 * 1024,
                total_space: 100 * 1024 * 1024 * 1024,
                ..Default::default()
            }],
            open_file_descriptors: 2048,
            max_file_descriptors: 65_536,
        })
    }

    fn network_params(&self) -> Result<RawNetworkParams, SourceError> {
        self.record("network_params")?;
        Ok(RawNetworkParams {
            host_name: "test-host".to_string(),
            domain_name: "example.com".to_string(),
            dns_servers: vec!["10.0.0.2".to_string()],
            ipv4_default_gateway: "10.0.0.1".to_string(),
            ipv6_default_gateway: String::new(),
        })
    }

    fn internet_protocol_stats(&self) -> Result<RawProtocolStats, SourceError> {
        self.record("internet_protocol_stats")?;
        Ok(RawProtocolStats {
            connections: vec![
                generators::raw_connection(22, "LISTEN"),
                generators::raw_connection(443, "ESTABLISHED"),
            ],
            ..Default::default()
        })
    }

    fn memory(&self) -> Result<RawGlobalMemory, SourceError> {
        self.record("memory")?;
        Ok(RawGlobalMemory {
            total: 8 * 1024 * 1024 * 1024,
            available: 4 * 1024 * 1024 * 1024,
            page_size: 4096,
            ..Default::default()
        })
    }

    fn partitions(&self) -> Result<Vec<RawPartition>, SourceError> {
        self.record("partitions")?;
        Ok(vec![RawPartition {
            identification: "/dev/sda1".to_string(),
            name: "sda1".to_string(),
            partition_type: "ext4".to_string(),
            size: 100 * 1024 * 1024 * 1024,
            major: 8,
            minor: 1,
            mount_point: "/".to_string(),
            ..Default::default()
        }])
    }

    fn network_interfaces(&self) -> Result<Vec<RawNetworkInterface>, SourceError> {
        self.record("network_interfaces")?;
        Ok(self.interfaces.clone())
    }

    fn services(&self) -> Result<Vec<RawService>, SourceError> {
        self.record("services")?;
        Ok(vec![RawService {
            name: "sshd".to_string(),
            process_id: 300,
            state: "RUNNING".to_string(),
        }])
    }

    fn sessions(&self) -> Result<Vec<RawSession>, SourceError> {
        self.record("sessions")?;
        Ok(vec![RawSession {
            user_name: "alice".to_string(),
            terminal_device: "pts/0".to_string(),
            login_time: 1_700_000_000_000,
            host: "10.0.0.9".to_string(),
        }])
    }

    fn desktop_windows(&self, visible_only: bool) -> Result<Vec<RawDesktopWindow>, SourceError> {
        self.record("desktop_windows")?;
        let windows = vec![
            RawDesktopWindow {
                window_id: 1,
                title: "Terminal".to_string(),
                command: "/usr/bin/xterm".to_string(),
                owning_process_id: 300,
                order: 0,
                visible: true,
            },
            RawDesktopWindow {
                window_id: 2,
                title: "Hidden".to_string(),
                command: "/usr/bin/daemon".to_string(),
                owning_process_id: 1,
                order: 1,
                visible: false,
            },
        ];
        Ok(windows
            .into_iter()
            .filter(|w| !visible_only || w.visible)
            .collect())
    }

    fn graphics_cards(&self) -> Result<Vec<RawGraphicsCard>, SourceError> {
        self.record("graphics_cards")?;
        Ok(vec![RawGraphicsCard {
            name: "card0".to_string(),
            device_id: "0x9a49".to_string(),
            vendor: "Intel Corporation (0x8086)".to_string(),
            version_info: "i915".to_string(),
            vram: 0,
        }])
    }

    fn android_build(&self) -> Result<RawAndroidBuild, SourceError> {
        self.record("android_build")?;
        Ok(generators::raw_android_build())
    }

    fn android_display(&self) -> Result<RawDisplayMetrics, SourceError> {
        self.record("android_display")?;
        Ok(RawDisplayMetrics {
            width_pixels: 1080,
            height_pixels: 2400,
            x_dpi: 420.0,
            y_dpi: 420.0,
        })
    }

    fn ios_device(&self) -> Result<RawIosDevice, SourceError> {
        self.record("ios_device")?;
        Ok(RawIosDevice {
            name: "Test iPhone".to_string(),
            system_name: "iOS".to_string(),
            system_version: "17.4".to_string(),
            model: "iPhone".to_string(),
            localized_model: "iPhone".to_string(),
            identifier_for_vendor: "00000000-0000-0000-0000-000000000000".to_string(),
            is_physical_device: true,
            is_multitasking_supported: true,
            is_generating_device_orientation_notifications: true,
        })
    }

    fn ios_orientation(&self) -> Result<i64, SourceError> {
        self.record("ios_orientation")?;
        Ok(self.ios_orientation.load(Ordering::SeqCst))
    }
}
