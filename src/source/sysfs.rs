//! Readers for Linux `/sys` attributes: network interface state, DRM
//! graphics devices and block device UUIDs.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::debug;

use crate::source::records::RawGraphicsCard;

/// Raw oper status name for a `/sys/class/net/<if>/operstate` value
pub fn oper_status_name(operstate: &str) -> String {
    match operstate.trim() {
        "notpresent" => "NOT_PRESENT".to_string(),
        "lowerlayerdown" => "LOWER_LAYER_DOWN".to_string(),
        other => other.to_ascii_uppercase(),
    }
}

/// PCI vendor name for the common GPU vendors
pub fn pci_vendor_name(vendor_id: &str) -> &'static str {
    match vendor_id.trim().to_ascii_lowercase().as_str() {
        "0x10de" => "NVIDIA Corporation",
        "0x1002" => "Advanced Micro Devices, Inc. [AMD/ATI]",
        "0x8086" => "Intel Corporation",
        "0x1af4" => "Red Hat, Inc.",
        "0x15ad" => "VMware",
        "0x80ee" => "InnoTek Systemberatung GmbH",
        "0x1234" => "QEMU",
        _ => "unknown",
    }
}

/// Attributes of one network interface
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterfaceAttributes {
    pub index: u32,
    pub mtu: i64,
    pub oper_status: String,
    pub if_alias: String,
    /// Bits per second, 0 when the driver does not report it
    pub speed: i64,
    pub in_drops: i64,
    pub collisions: i64,
    /// `ARPHRD_*` hardware type, 0 when unreadable
    pub if_type: i32,
    pub connector_present: bool,
}

#[derive(Debug, Clone)]
pub struct SysFs {
    root: PathBuf,
}

impl SysFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn attr(&self, path: impl AsRef<Path>) -> Option<String> {
        fs::read_to_string(self.root.join(path))
            .ok()
            .map(|s| s.trim().to_string())
    }

    /// Interface attributes. Unreadable attributes keep their defaults;
    /// an interface without `operstate` reports `UNKNOWN`.
    pub fn interface(&self, name: &str) -> InterfaceAttributes {
        let base = PathBuf::from("class/net").join(name);
        let num = |attr: &str| self.attr(base.join(attr)).and_then(|v| v.parse::<i64>().ok());

        InterfaceAttributes {
            index: num("ifindex").unwrap_or(0) as u32,
            mtu: num("mtu").unwrap_or(0),
            oper_status: self
                .attr(base.join("operstate"))
                .map(|s| oper_status_name(&s))
                .unwrap_or_else(|| "UNKNOWN".to_string()),
            if_alias: self.attr(base.join("ifalias")).unwrap_or_default(),
            // Mbit/s, -1 when the link is down
            speed: num("speed").filter(|s| *s > 0).unwrap_or(0).saturating_mul(1_000_000),
            in_drops: num("statistics/rx_dropped").unwrap_or(0),
            collisions: num("statistics/collisions").unwrap_or(0),
            if_type: num("type").unwrap_or(0) as i32,
            // Reading carrier fails with EINVAL while the interface is down
            connector_present: num("carrier") == Some(1),
        }
    }

    /// Graphics devices under `/sys/class/drm`, ordered by card name
    pub fn graphics_cards(&self) -> Vec<RawGraphicsCard> {
        let Ok(entries) = fs::read_dir(self.root.join("class/drm")) else {
            return Vec::new();
        };
        let mut cards: Vec<String> = entries
            .flatten()
            .filter_map(|e| e.file_name().into_string().ok())
            // card0-HDMI-A-1 and friends are connectors
            .filter(|name| name.starts_with("card") && !name.contains('-'))
            .collect();
        cards.sort();

        cards
            .into_iter()
            .map(|card| {
                let device = PathBuf::from("class/drm").join(&card).join("device");
                let vendor_id = self.attr(device.join("vendor")).unwrap_or_default();
                let device_id = self.attr(device.join("device")).unwrap_or_default();
                let driver = fs::read_link(self.root.join(device.join("driver")))
                    .ok()
                    .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                    .unwrap_or_default();
                let vram = self
                    .attr(device.join("mem_info_vram_total"))
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                debug!("Found graphics device {} ({} {})", card, vendor_id, device_id);

                RawGraphicsCard {
                    name: card,
                    device_id,
                    vendor: format!("{} ({})", pci_vendor_name(&vendor_id), vendor_id),
                    version_info: driver,
                    vram,
                }
            })
            .collect()
    }
}

/// Map block device name -> filesystem UUID from a `by-uuid` directory of
/// symlinks
pub fn block_device_uuids(dir: &Path) -> HashMap<String, String> {
    let Ok(entries) = fs::read_dir(dir) else {
        return HashMap::new();
    };
    entries
        .flatten()
        .filter_map(|entry| {
            let uuid = entry.file_name().into_string().ok()?;
            let target = fs::read_link(entry.path()).ok()?;
            let device = target.file_name()?.to_string_lossy().into_owned();
            Some((device, uuid))
        })
        .collect()
}
