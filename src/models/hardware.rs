//! Hardware descriptors and file system entities.

use serde::{Deserialize, Serialize};

/// Swap and commit accounting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VirtualMemory {
    pub swap_total: i64,
    pub swap_used: i64,
    pub virtual_max: i64,
    pub virtual_in_use: i64,
    pub swap_pages_in: i64,
    pub swap_pages_out: i64,
}

/// One installed memory module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalMemory {
    pub bank_label: String,
    pub capacity: i64,
    pub clock_speed: i64,
    pub manufacturer: String,
    pub memory_type: String,
}

/// System memory at the time it was read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlobalMemory {
    pub total: i64,
    pub available: i64,
    pub page_size: i64,
    pub virtual_memory: VirtualMemory,
    pub physical_memory: Vec<PhysicalMemory>,
}

/// A graphics adapter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsCard {
    pub name: String,
    pub device_id: String,
    pub vendor: String,
    pub version_info: String,
    /// Dedicated video memory in bytes, 0 when unknown
    pub vram: i64,
}

/// A partition of a block device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HWPartition {
    pub identification: String,
    pub name: String,
    pub partition_type: String,
    pub uuid: String,
    /// Size in bytes
    pub size: i64,
    pub major: u32,
    pub minor: u32,
    pub mount_point: String,
}

/// A mounted file system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OSFileStore {
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

/// File stores plus system-wide descriptor usage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileSystem {
    pub file_stores: Vec<OSFileStore>,
    pub open_file_descriptors: i64,
    pub max_file_descriptors: i64,
}
