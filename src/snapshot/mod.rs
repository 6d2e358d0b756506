//! Lazily aggregated device snapshot.
//!
//! [`DeviceSnapshot`] picks the platform once and exposes the matching
//! [`PlatformInfo`] variant. Nothing is read from the platform until an
//! accessor is called; see [`OperatingSystem`] for which fields are held
//! after their first read and which are read on every call.

mod deferred;
mod hardware;
mod operating_system;

pub use deferred::Deferred;
pub use hardware::Hardware;
pub use operating_system::{OperatingSystem, SnapshotState};

use std::sync::Arc;

use log::{debug, info};
use serde::Serialize;

use crate::config::SnapshotConfig;
use crate::error::{QueryContext, Result};
use crate::models::{AndroidBuild, DeviceOrientation, DisplayMetrics, IosDevice, UIDeviceOrientation};
use crate::source::{RawSource, SystemSource};
use crate::translate::{
    translate_android_build, translate_display_metrics, translate_ios_device, ui_orientation,
};

/// Platform family the snapshot was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Platform {
    Android,
    Ios,
    Desktop,
}

impl Platform {
    /// The platform this binary was compiled for
    pub fn current() -> Self {
        if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Desktop
        }
    }
}

/// Android device details
pub struct AndroidInfo {
    source: Arc<dyn RawSource>,
    build: Deferred<AndroidBuild>,
}

impl AndroidInfo {
    pub fn new(source: Arc<dyn RawSource>) -> Self {
        Self {
            source,
            build: Deferred::new(),
        }
    }

    pub fn state(&self) -> SnapshotState {
        SnapshotState::from_resolved(self.build.is_resolved())
    }

    /// Build properties, read once
    pub fn build(&self) -> Result<&AndroidBuild> {
        self.build.get_or_try_init(|| {
            debug!("Querying android_build");
            translate_android_build(self.source.android_build().query("android_build")?)
        })
    }

    pub fn display(&self) -> Result<DisplayMetrics> {
        debug!("Querying android_display");
        self.source
            .android_display()
            .query("android_display")
            .map(translate_display_metrics)
    }

    /// Orientation implied by the current display size
    pub fn orientation(&self) -> Result<DeviceOrientation> {
        Ok(self.display()?.orientation())
    }
}

/// iOS device details
pub struct IosInfo {
    source: Arc<dyn RawSource>,
    device: Deferred<IosDevice>,
}

impl IosInfo {
    pub fn new(source: Arc<dyn RawSource>) -> Self {
        Self {
            source,
            device: Deferred::new(),
        }
    }

    pub fn state(&self) -> SnapshotState {
        SnapshotState::from_resolved(self.device.is_resolved())
    }

    pub fn device(&self) -> Result<&IosDevice> {
        self.device.get_or_try_init(|| {
            debug!("Querying ios_device");
            self.source
                .ios_device()
                .query("ios_device")
                .map(translate_ios_device)
        })
    }

    pub fn orientation(&self) -> Result<UIDeviceOrientation> {
        debug!("Querying ios_orientation");
        ui_orientation(self.source.ios_orientation().query("ios_orientation")?)
    }
}

/// Desktop operating system and hardware
pub struct DesktopInfo {
    operating_system: OperatingSystem,
    hardware: Hardware,
}

impl DesktopInfo {
    pub fn new(source: Arc<dyn RawSource>, config: &SnapshotConfig) -> Self {
        Self {
            operating_system: OperatingSystem::new(Arc::clone(&source), config.load_policy),
            hardware: Hardware::new(source, config.load_policy),
        }
    }

    pub fn operating_system(&self) -> &OperatingSystem {
        &self.operating_system
    }

    pub fn hardware(&self) -> &Hardware {
        &self.hardware
    }
}

/// Platform-specific view, fixed when the snapshot is built
pub enum PlatformInfo {
    Android(AndroidInfo),
    Ios(IosInfo),
    Desktop(DesktopInfo),
}

impl PlatformInfo {
    pub fn new(platform: Platform, source: Arc<dyn RawSource>, config: &SnapshotConfig) -> Self {
        match platform {
            Platform::Android => PlatformInfo::Android(AndroidInfo::new(source)),
            Platform::Ios => PlatformInfo::Ios(IosInfo::new(source)),
            Platform::Desktop => PlatformInfo::Desktop(DesktopInfo::new(source, config)),
        }
    }

    pub fn platform(&self) -> Platform {
        match self {
            PlatformInfo::Android(_) => Platform::Android,
            PlatformInfo::Ios(_) => Platform::Ios,
            PlatformInfo::Desktop(_) => Platform::Desktop,
        }
    }

    /// Resolution state of the variant's deferred fields. Desktop
    /// hardware holds nothing, so only the operating system view counts.
    pub fn state(&self) -> SnapshotState {
        match self {
            PlatformInfo::Android(info) => info.state(),
            PlatformInfo::Ios(info) => info.state(),
            PlatformInfo::Desktop(info) => info.operating_system().state(),
        }
    }

    pub fn as_android(&self) -> Option<&AndroidInfo> {
        match self {
            PlatformInfo::Android(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_ios(&self) -> Option<&IosInfo> {
        match self {
            PlatformInfo::Ios(info) => Some(info),
            _ => None,
        }
    }

    pub fn as_desktop(&self) -> Option<&DesktopInfo> {
        match self {
            PlatformInfo::Desktop(info) => Some(info),
            _ => None,
        }
    }
}

/// Root of the snapshot API
pub struct DeviceSnapshot {
    info: PlatformInfo,
}

impl Default for DeviceSnapshot {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceSnapshot {
    /// Snapshot of the current host with the default configuration
    pub fn new() -> Self {
        Self::from_config(&SnapshotConfig::default())
    }

    /// Snapshot of the current host backed by [`SystemSource`]
    pub fn from_config(config: &SnapshotConfig) -> Self {
        let source: Arc<dyn RawSource> = Arc::new(SystemSource::from_config(config));
        Self::with_source(Platform::current(), source, config)
    }

    /// Snapshot over a caller-provided source
    pub fn with_source(
        platform: Platform,
        source: Arc<dyn RawSource>,
        config: &SnapshotConfig,
    ) -> Self {
        info!(
            "Building {:?} snapshot (load policy: {:?})",
            platform, config.load_policy
        );
        Self {
            info: PlatformInfo::new(platform, source, config),
        }
    }

    pub fn platform(&self) -> Platform {
        self.info.platform()
    }

    pub fn info(&self) -> &PlatformInfo {
        &self.info
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SnapshotError;
    use crate::test_utils::FakeSource;

    fn snapshot(platform: Platform, source: &Arc<FakeSource>) -> DeviceSnapshot {
        DeviceSnapshot::with_source(
            platform,
            Arc::clone(source) as Arc<dyn RawSource>,
            &SnapshotConfig::default(),
        )
    }

    #[test]
    fn test_current_platform_matches_target() {
        let expected = if cfg!(target_os = "android") {
            Platform::Android
        } else if cfg!(target_os = "ios") {
            Platform::Ios
        } else {
            Platform::Desktop
        };
        assert_eq!(Platform::current(), expected);
    }

    #[test]
    fn test_platform_variant_is_selected_once() {
        let source = Arc::new(FakeSource::new());
        for platform in [Platform::Android, Platform::Ios, Platform::Desktop] {
            let snapshot = snapshot(platform, &source);
            assert_eq!(snapshot.platform(), platform);
        }
        assert!(snapshot(Platform::Desktop, &source).info().as_desktop().is_some());
        assert!(snapshot(Platform::Desktop, &source).info().as_android().is_none());
    }

    #[test]
    fn test_android_build_is_read_once() {
        let source = Arc::new(FakeSource::new());
        let snapshot = snapshot(Platform::Android, &source);
        let android = snapshot.info().as_android().unwrap();

        assert_eq!(android.build().unwrap().model, "Pixel 8");
        assert_eq!(android.build().unwrap().sdk_int, 34);
        assert_eq!(source.calls("android_build"), 1);

        android.display().unwrap();
        assert_eq!(android.orientation().unwrap(), DeviceOrientation::Portrait);
        assert_eq!(source.calls("android_display"), 2);
    }

    #[test]
    fn test_ios_orientation_mapping_and_errors() {
        let source = Arc::new(FakeSource::new());
        let snapshot = snapshot(Platform::Ios, &source);
        let ios = snapshot.info().as_ios().unwrap();

        assert_eq!(ios.device().unwrap().system_name, "iOS");
        ios.device().unwrap();
        assert_eq!(source.calls("ios_device"), 1);
        assert_eq!(ios.orientation().unwrap(), UIDeviceOrientation::Portrait);

        source.set_ios_orientation(9);
        assert!(matches!(
            ios.orientation().unwrap_err(),
            SnapshotError::Mapping { field: "IosDevice.orientation", .. }
        ));
    }

    #[test]
    fn test_mobile_views_report_resolution_state() {
        let source = Arc::new(FakeSource::new().failing("ios_device"));

        let android = snapshot(Platform::Android, &source);
        assert_eq!(android.info().state(), SnapshotState::Uninitialized);
        android.info().as_android().unwrap().display().unwrap();
        assert_eq!(android.info().state(), SnapshotState::Uninitialized);
        android.info().as_android().unwrap().build().unwrap();
        assert_eq!(android.info().state(), SnapshotState::PartiallyResolved);

        let ios = snapshot(Platform::Ios, &source);
        let info = ios.info().as_ios().unwrap();
        assert!(info.device().is_err());
        assert_eq!(info.state(), SnapshotState::Uninitialized);
        source.recover("ios_device");
        info.device().unwrap();
        assert_eq!(ios.info().state(), SnapshotState::PartiallyResolved);
    }

    #[test]
    fn test_desktop_shares_policy_with_both_views() {
        let source = Arc::new(FakeSource::new());
        let mut config = SnapshotConfig::default();
        config.load_policy = crate::translate::LoadPolicy::Lenient;
        let snapshot = DeviceSnapshot::with_source(
            Platform::Desktop,
            Arc::clone(&source) as Arc<dyn RawSource>,
            &config,
        );

        let desktop = snapshot.info().as_desktop().unwrap();
        assert_eq!(
            desktop.operating_system().load_policy(),
            crate::translate::LoadPolicy::Lenient
        );
        assert!(desktop.hardware().memory().is_ok());
    }

    #[test]
    fn test_aggregators_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DeviceSnapshot>();
        assert_send_sync::<OperatingSystem>();
        assert_send_sync::<Hardware>();
    }
}
