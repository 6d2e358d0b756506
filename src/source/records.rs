//! Raw records produced by a [`RawSource`](super::RawSource).
//!
//! These mirror what the platform hands back, before any validation. Enum-like
//! values stay in their raw form (upper-case names such as `"RUNNING"` or
//! `"ESTABLISHED"`, or integers for `UIDeviceOrientation`) so that the
//! translators can reject values they do not know.

use std::collections::HashMap;

/// Identity of the running OS plus the values that never change for the
/// life of this process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOsIdentity {
    pub family: String,
    pub manufacturer: String,
    pub bitness: u32,
    pub process_id: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawOsVersion {
    pub version: String,
    pub code_name: String,
    pub build_number: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawThread {
    pub thread_id: u32,
    pub owning_process_id: u32,
    pub name: String,
    pub state: String,
    pub cpu_load_cumulative: f64,
    pub start_memory_address: i64,
    pub context_switches: i64,
    pub minor_faults: i64,
    pub major_faults: i64,
    pub kernel_time: i64,
    pub user_time: i64,
    pub up_time: i64,
    pub start_time: i64,
    pub priority: i32,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawProcess {
    pub process_id: u32,
    pub parent_process_id: u32,
    pub name: String,
    pub path: String,
    pub command_line: String,
    pub arguments: Vec<String>,
    pub environment: Vec<(String, String)>,
    pub current_working_directory: String,
    pub user: String,
    pub user_id: String,
    pub group: String,
    pub group_id: String,
    pub state: String,
    pub priority: i32,
    pub virtual_size: i64,
    pub resident_set_size: i64,
    pub kernel_time: i64,
    pub user_time: i64,
    pub start_time: i64,
    pub up_time: i64,
    pub bytes_read: i64,
    pub bytes_written: i64,
    pub open_files: i64,
    pub soft_open_file_limit: i64,
    pub hard_open_file_limit: i64,
    pub cpu_load_cumulative: f64,
    pub cpu_load_between_ticks: f64,
    pub bitness: u32,
    pub affinity_mask: i64,
    pub minor_faults: i64,
    pub major_faults: i64,
    pub context_switches: i64,
    pub thread_count: u32,
    pub threads: Vec<RawThread>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawService {
    pub name: String,
    pub process_id: u32,
    pub state: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSession {
    pub user_name: String,
    pub terminal_device: String,
    pub login_time: i64,
    pub host: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDesktopWindow {
    pub window_id: i64,
    pub title: String,
    pub command: String,
    pub owning_process_id: i64,
    pub order: i32,
    pub visible: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFileStore {
    pub name: String,
    pub volume: String,
    pub label: String,
    pub mount: String,
    pub description: String,
    pub fs_type: String,
    pub uuid: String,
    pub free_space: i64,
    pub usable_space: i64,
    pub total_space: i64,
    pub removable: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawFileSystem {
    pub file_stores: Vec<RawFileStore>,
    pub open_file_descriptors: i64,
    pub max_file_descriptors: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawNetworkParams {
    pub host_name: String,
    pub domain_name: String,
    pub dns_servers: Vec<String>,
    pub ipv4_default_gateway: String,
    pub ipv6_default_gateway: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawTcpStats {
    pub connections_established: i64,
    pub connections_active: i64,
    pub connections_passive: i64,
    pub connection_failures: i64,
    pub connections_reset: i64,
    pub segments_sent: i64,
    pub segments_received: i64,
    pub segments_retransmitted: i64,
    pub in_errors: i64,
    pub out_resets: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawUdpStats {
    pub datagrams_sent: i64,
    pub datagrams_received: i64,
    pub datagrams_no_port: i64,
    pub datagrams_received_errors: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIpConnection {
    pub connection_type: String,
    pub local_address: String,
    pub local_port: u16,
    pub foreign_address: String,
    pub foreign_port: u16,
    pub state: String,
    pub transmit_queue: i64,
    pub receive_queue: i64,
    pub owning_process_id: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawProtocolStats {
    pub tcp_v4: RawTcpStats,
    pub tcp_v6: RawTcpStats,
    pub udp_v4: RawUdpStats,
    pub udp_v6: RawUdpStats,
    pub connections: Vec<RawIpConnection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPhysicalMemory {
    pub bank_label: String,
    pub capacity: i64,
    pub clock_speed: i64,
    pub manufacturer: String,
    pub memory_type: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGlobalMemory {
    pub total: i64,
    pub available: i64,
    pub page_size: i64,
    pub swap_total: i64,
    pub swap_used: i64,
    pub virtual_max: i64,
    pub virtual_in_use: i64,
    pub swap_pages_in: i64,
    pub swap_pages_out: i64,
    pub physical_memory: Vec<RawPhysicalMemory>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGraphicsCard {
    pub name: String,
    pub device_id: String,
    pub vendor: String,
    pub version_info: String,
    pub vram: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawPartition {
    pub identification: String,
    pub name: String,
    pub partition_type: String,
    pub uuid: String,
    pub size: i64,
    pub major: u32,
    pub minor: u32,
    pub mount_point: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawNetworkInterface {
    pub name: String,
    pub index: u32,
    pub display_name: String,
    pub if_alias: String,
    pub oper_status: String,
    pub mtu: i64,
    pub mac_addr: String,
    pub ipv4addr: Vec<String>,
    pub subnet_masks: Vec<u8>,
    pub ipv6addr: Vec<String>,
    pub prefix_lengths: Vec<u8>,
    pub bytes_recv: i64,
    pub bytes_sent: i64,
    pub packets_recv: i64,
    pub packets_sent: i64,
    pub in_errors: i64,
    pub out_errors: i64,
    pub in_drops: i64,
    pub collisions: i64,
    pub speed: i64,
    pub timestamp: i64,
    pub if_type: i32,
    pub ndis_physical_medium_type: i32,
    pub connector_present: bool,
}

/// Android build properties keyed by their `ro.*` property names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawAndroidBuild {
    pub properties: HashMap<String, String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RawDisplayMetrics {
    pub width_pixels: u32,
    pub height_pixels: u32,
    pub x_dpi: f32,
    pub y_dpi: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawIosDevice {
    pub name: String,
    pub system_name: String,
    pub system_version: String,
    pub model: String,
    pub localized_model: String,
    pub identifier_for_vendor: String,
    pub is_physical_device: bool,
    pub is_multitasking_supported: bool,
    pub is_generating_device_orientation_notifications: bool,
}
