//! Whole-snapshot report.
//!
//! [`SnapshotReport::collect`] reads every field of a [`DeviceSnapshot`] once.
//! A field that fails is left empty and its error is listed under `errors`,
//! so one unavailable query never hides the rest of the report.

use anyhow::{Context, Result};
use chrono::Utc;
use log::{debug, warn};
use serde::Serialize;

use crate::error::SnapshotError;
use crate::models::{
    AndroidBuild, DeviceOrientation, DisplayMetrics, FileSystem, GlobalMemory, GraphicsCard,
    HWPartition, InternetProtocolStats, IosDevice, NetworkInterface, NetworkParams,
    OSVersionInfo, UIDeviceOrientation,
};
use crate::snapshot::{
    AndroidInfo, DeviceSnapshot, Hardware, IosInfo, OperatingSystem, Platform, PlatformInfo,
};

/// One field that could not be read
#[derive(Debug, Clone, Serialize)]
pub struct ReportError {
    pub field: &'static str,
    pub error: String,
    /// False when the failure is a mapping defect rather than missing data
    pub unavailable: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct OperatingSystemReport {
    pub family: Option<String>,
    pub manufacturer: Option<String>,
    pub bitness: Option<u32>,
    pub process_id: Option<u32>,
    pub version_info: Option<OSVersionInfo>,
    pub system_uptime: Option<u64>,
    pub system_boot_time: Option<u64>,
    pub is_elevated: Option<bool>,
    pub process_count: Option<u32>,
    pub thread_count: Option<u32>,
    pub file_system: Option<FileSystem>,
    pub network_params: Option<NetworkParams>,
    pub internet_protocol_stats: Option<InternetProtocolStats>,
}

#[derive(Debug, Default, Serialize)]
pub struct HardwareReport {
    pub memory: Option<GlobalMemory>,
    pub graphics_cards: Option<Vec<GraphicsCard>>,
    pub partitions: Option<Vec<HWPartition>>,
    pub network_interfaces: Option<Vec<NetworkInterface>>,
}

#[derive(Debug, Default, Serialize)]
pub struct AndroidReport {
    pub build: Option<AndroidBuild>,
    pub display: Option<DisplayMetrics>,
    pub orientation: Option<DeviceOrientation>,
}

#[derive(Debug, Default, Serialize)]
pub struct IosReport {
    pub device: Option<IosDevice>,
    pub orientation: Option<UIDeviceOrientation>,
}

/// Everything a snapshot could read at one point in time
#[derive(Debug, Serialize)]
pub struct SnapshotReport {
    pub generated_at: String,
    pub tool_version: &'static str,
    pub platform: Platform,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operating_system: Option<OperatingSystemReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<HardwareReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ios: Option<IosReport>,
    pub errors: Vec<ReportError>,
}

/// Collects per-field results, recording failures instead of returning them
#[derive(Default)]
struct Recorder {
    errors: Vec<ReportError>,
}

impl Recorder {
    fn take<T>(&mut self, field: &'static str, result: crate::error::Result<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                self.record(field, e);
                None
            }
        }
    }

    fn record(&mut self, field: &'static str, error: SnapshotError) {
        let unavailable = error.is_unavailable();
        if unavailable {
            debug!("{} not available: {}", field, error);
        } else {
            warn!("Failed to read {}: {}", field, error);
        }
        self.errors.push(ReportError {
            field,
            error: error.to_string(),
            unavailable,
        });
    }
}

impl SnapshotReport {
    /// Read every field of `snapshot` into a report.
    pub fn collect(snapshot: &DeviceSnapshot) -> Self {
        let mut recorder = Recorder::default();
        let mut report = SnapshotReport {
            generated_at: Utc::now().to_rfc3339(),
            tool_version: env!("CARGO_PKG_VERSION"),
            platform: snapshot.platform(),
            operating_system: None,
            hardware: None,
            android: None,
            ios: None,
            errors: Vec::new(),
        };

        match snapshot.info() {
            PlatformInfo::Desktop(desktop) => {
                report.operating_system = Some(OperatingSystemReport::read(
                    desktop.operating_system(),
                    &mut recorder,
                ));
                report.hardware = Some(HardwareReport::read(desktop.hardware(), &mut recorder));
            }
            PlatformInfo::Android(android) => {
                report.android = Some(AndroidReport::read(android, &mut recorder));
            }
            PlatformInfo::Ios(ios) => {
                report.ios = Some(IosReport::read(ios, &mut recorder));
            }
        }

        report.errors = recorder.errors;
        report
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize snapshot report to JSON")
    }
}

impl OperatingSystemReport {
    /// Read the operating system section on its own
    pub fn collect(os: &OperatingSystem) -> (Self, Vec<ReportError>) {
        let mut recorder = Recorder::default();
        let section = Self::read(os, &mut recorder);
        (section, recorder.errors)
    }

    fn read(os: &OperatingSystem, rec: &mut Recorder) -> Self {
        OperatingSystemReport {
            family: rec.take("family", os.family().map(str::to_string)),
            manufacturer: rec.take("manufacturer", os.manufacturer().map(str::to_string)),
            bitness: rec.take("bitness", os.bitness()),
            process_id: rec.take("process_id", os.process_id()),
            version_info: rec.take("version_info", os.version_info().cloned()),
            system_uptime: rec.take("system_uptime", os.system_uptime()),
            system_boot_time: rec.take("system_boot_time", os.system_boot_time()),
            is_elevated: rec.take("is_elevated", os.is_elevated()),
            process_count: rec.take("process_count", os.process_count()),
            thread_count: rec.take("thread_count", os.thread_count()),
            file_system: rec.take("file_system", os.file_system().cloned()),
            network_params: rec.take("network_params", os.network_params().cloned()),
            internet_protocol_stats: rec.take(
                "internet_protocol_stats",
                os.internet_protocol_stats().cloned(),
            ),
        }
    }
}

impl HardwareReport {
    pub fn collect(hardware: &Hardware) -> (Self, Vec<ReportError>) {
        let mut recorder = Recorder::default();
        let section = Self::read(hardware, &mut recorder);
        (section, recorder.errors)
    }

    fn read(hardware: &Hardware, rec: &mut Recorder) -> Self {
        HardwareReport {
            memory: rec.take("memory", hardware.memory()),
            graphics_cards: rec.take("graphics_cards", hardware.graphics_cards()),
            partitions: rec.take("partitions", hardware.partitions()),
            network_interfaces: rec.take("network_interfaces", hardware.network_interfaces()),
        }
    }
}

impl AndroidReport {
    pub fn collect(android: &AndroidInfo) -> (Self, Vec<ReportError>) {
        let mut recorder = Recorder::default();
        let section = Self::read(android, &mut recorder);
        (section, recorder.errors)
    }

    fn read(android: &AndroidInfo, rec: &mut Recorder) -> Self {
        let display = rec.take("display", android.display());
        AndroidReport {
            build: rec.take("build", android.build().cloned()),
            orientation: display.map(|d| d.orientation()),
            display,
        }
    }
}

impl IosReport {
    pub fn collect(ios: &IosInfo) -> (Self, Vec<ReportError>) {
        let mut recorder = Recorder::default();
        let section = Self::read(ios, &mut recorder);
        (section, recorder.errors)
    }

    fn read(ios: &IosInfo, rec: &mut Recorder) -> Self {
        IosReport {
            device: rec.take("device", ios.device().cloned()),
            orientation: rec.take("orientation", ios.orientation()),
        }
    }
}
