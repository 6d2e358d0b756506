//! Android and iOS device descriptors.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Build properties of an Android device (the `android.os.Build` values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AndroidBuild {
    pub device: String,
    pub base_os: String,
    pub release: String,
    pub security_patch: String,
    pub preview_sdk_int: i32,
    pub release_or_code_name: String,
    pub media_performance_class: i32,
    pub incremental: String,
    pub code_name: String,
    pub board: String,
    pub bootloader: String,
    pub display: String,
    pub fingerprint: String,
    pub hardware: String,
    pub host: String,
    pub id: String,
    pub is_physical_device: bool,
    pub manufacturer: String,
    pub model: String,
    pub product: String,
    pub sdk_int: i32,
    pub supported_abis: Vec<String>,
    pub supported_32_bit_abis: Vec<String>,
    pub supported_64_bit_abis: Vec<String>,
}

/// Size and density of the default display
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DisplayMetrics {
    pub width_pixels: u32,
    pub height_pixels: u32,
    pub x_dpi: f32,
    pub y_dpi: f32,
    pub width_inches: f32,
    pub height_inches: f32,
}

impl DisplayMetrics {
    /// Orientation implied by the current width and height.
    pub fn orientation(&self) -> DeviceOrientation {
        if self.width_pixels == 0 || self.height_pixels == 0 {
            DeviceOrientation::Unknown
        } else if self.height_pixels >= self.width_pixels {
            DeviceOrientation::Portrait
        } else {
            DeviceOrientation::Landscape
        }
    }
}

/// Coarse orientation of an Android display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceOrientation {
    Unknown,
    Portrait,
    Landscape,
}

impl DeviceOrientation {
    pub fn is_portrait(self) -> bool {
        self == DeviceOrientation::Portrait
    }

    pub fn is_landscape(self) -> bool {
        self == DeviceOrientation::Landscape
    }
}

impl fmt::Display for DeviceOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceOrientation::Unknown => write!(f, "UNKNOWN"),
            DeviceOrientation::Portrait => write!(f, "PORTRAIT"),
            DeviceOrientation::Landscape => write!(f, "LANDSCAPE"),
        }
    }
}

/// Identity of an iOS device (the `UIDevice` values)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IosDevice {
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

/// Physical orientation reported by `UIDevice`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UIDeviceOrientation {
    Unknown,
    Portrait,
    PortraitUpsideDown,
    LandscapeLeft,
    LandscapeRight,
    FaceUp,
    FaceDown,
}

impl fmt::Display for UIDeviceOrientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            UIDeviceOrientation::Unknown => "Unknown",
            UIDeviceOrientation::Portrait => "Portrait",
            UIDeviceOrientation::PortraitUpsideDown => "PortraitUpsideDown",
            UIDeviceOrientation::LandscapeLeft => "LandscapeLeft",
            UIDeviceOrientation::LandscapeRight => "LandscapeRight",
            UIDeviceOrientation::FaceUp => "FaceUp",
            UIDeviceOrientation::FaceDown => "FaceDown",
        };
        write!(f, "{}", name)
    }
}
