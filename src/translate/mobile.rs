use crate::constants::ANDROID_UNKNOWN;
use crate::error::{Result, SnapshotError};
use crate::models::{AndroidBuild, DisplayMetrics, IosDevice, UIDeviceOrientation};
use crate::source::{RawAndroidBuild, RawDisplayMetrics, RawIosDevice};

pub fn ui_orientation(raw: i64) -> Result<UIDeviceOrientation> {
    match raw {
        0 => Ok(UIDeviceOrientation::Unknown),
        1 => Ok(UIDeviceOrientation::Portrait),
        2 => Ok(UIDeviceOrientation::PortraitUpsideDown),
        3 => Ok(UIDeviceOrientation::LandscapeLeft),
        4 => Ok(UIDeviceOrientation::LandscapeRight),
        5 => Ok(UIDeviceOrientation::FaceUp),
        6 => Ok(UIDeviceOrientation::FaceDown),
        other => Err(SnapshotError::mapping("IosDevice.orientation", other)),
    }
}

struct Props<'a>(&'a RawAndroidBuild);

impl Props<'_> {
    fn text(&self, key: &str) -> String {
        self.0
            .properties
            .get(key)
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| ANDROID_UNKNOWN.to_string())
    }

    fn list(&self, key: &str) -> Vec<String> {
        self.0
            .properties
            .get(key)
            .map(|v| {
                v.split(',')
                    .map(str::trim)
                    .filter(|abi| !abi.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    fn int(&self, key: &str, field: &'static str) -> Result<i32> {
        let value = self
            .0
            .properties
            .get(key)
            .ok_or_else(|| SnapshotError::mapping(field, format!("{} is missing", key)))?;
        value
            .trim()
            .parse()
            .map_err(|_| SnapshotError::mapping(field, value))
    }

    /// Like [`Props::int`] but 0 when the property is absent
    fn int_or_zero(&self, key: &str, field: &'static str) -> Result<i32> {
        if self.0.properties.contains_key(key) {
            self.int(key, field)
        } else {
            Ok(0)
        }
    }
}

fn is_emulator(props: &Props<'_>, hardware: &str, fingerprint: &str) -> bool {
    props.0.properties.get("ro.kernel.qemu").map(String::as_str) == Some("1")
        || props.0.properties.get("ro.boot.qemu").map(String::as_str) == Some("1")
        || matches!(hardware, "goldfish" | "ranchu")
        || fingerprint.starts_with("generic")
}

/// Translate Android build properties.
///
/// Missing text properties become `"unknown"`, as on the device itself.
/// `ro.build.version.sdk` is required; a missing or non-numeric value is a
/// mapping error.
pub fn translate_android_build(source: RawAndroidBuild) -> Result<AndroidBuild> {
    let props = Props(&source);

    let sdk_int = props.int("ro.build.version.sdk", "AndroidBuild.sdk_int")?;
    let preview_sdk_int = props.int_or_zero("ro.build.version.preview_sdk", "AndroidBuild.preview_sdk_int")?;
    let media_performance_class = props.int_or_zero(
        "ro.odm.build.media_performance_class",
        "AndroidBuild.media_performance_class",
    )?;

    let release = props.text("ro.build.version.release");
    let release_or_code_name = match source.properties.get("ro.build.version.release_or_codename") {
        Some(value) if !value.is_empty() => value.clone(),
        _ => release.clone(),
    };
    let hardware = props.text("ro.hardware");
    let fingerprint = props.text("ro.build.fingerprint");
    let is_physical_device = !is_emulator(&props, &hardware, &fingerprint);

    Ok(AndroidBuild {
        device: props.text("ro.product.device"),
        base_os: source
            .properties
            .get("ro.build.version.base_os")
            .cloned()
            .unwrap_or_default(),
        release,
        security_patch: props.text("ro.build.version.security_patch"),
        preview_sdk_int,
        release_or_code_name,
        media_performance_class,
        incremental: props.text("ro.build.version.incremental"),
        code_name: props.text("ro.build.version.codename"),
        board: props.text("ro.product.board"),
        bootloader: props.text("ro.bootloader"),
        display: props.text("ro.build.display.id"),
        fingerprint,
        hardware,
        host: props.text("ro.build.host"),
        id: props.text("ro.build.id"),
        is_physical_device,
        manufacturer: props.text("ro.product.manufacturer"),
        model: props.text("ro.product.model"),
        product: props.text("ro.product.name"),
        sdk_int,
        supported_abis: props.list("ro.product.cpu.abilist"),
        supported_32_bit_abis: props.list("ro.product.cpu.abilist32"),
        supported_64_bit_abis: props.list("ro.product.cpu.abilist64"),
    })
}

pub fn translate_display_metrics(source: RawDisplayMetrics) -> DisplayMetrics {
    let inches = |pixels: u32, dpi: f32| if dpi > 0.0 { pixels as f32 / dpi } else { 0.0 };

    DisplayMetrics {
        width_pixels: source.width_pixels,
        height_pixels: source.height_pixels,
        x_dpi: source.x_dpi,
        y_dpi: source.y_dpi,
        width_inches: inches(source.width_pixels, source.x_dpi),
        height_inches: inches(source.height_pixels, source.y_dpi),
    }
}

pub fn translate_ios_device(source: RawIosDevice) -> IosDevice {
    IosDevice {
        name: source.name,
        system_name: source.system_name,
        system_version: source.system_version,
        model: source.model,
        localized_model: source.localized_model,
        identifier_for_vendor: source.identifier_for_vendor,
        is_physical_device: source.is_physical_device,
        is_multitasking_supported: source.is_multitasking_supported,
        is_generating_device_orientation_notifications: source
            .is_generating_device_orientation_notifications,
    }
}
