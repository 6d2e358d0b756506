//! Mobile platform readers.
//!
//! Android exposes its build identity through `build.prop` property files
//! and the framebuffer size through sysfs. iOS identity comes from `sysctl`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::constants::{ANDROID_DEFAULT_DENSITY, ANDROID_FB_VIRTUAL_SIZE};
use crate::error::SourceError;
use crate::source::records::{RawAndroidBuild, RawDisplayMetrics, RawIosDevice};

/// Parse `key=value` lines of a `build.prop` file
pub fn parse_build_prop(content: &str) -> HashMap<String, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let (key, value) = line.split_once('=')?;
            Some((key.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

/// Parse the framebuffer `virtual_size` file (`"<width>,<height>"`)
pub fn parse_virtual_size(content: &str) -> Option<(u32, u32)> {
    let (width, height) = content.trim().split_once(',')?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

/// Reader for Android property files and display information
#[derive(Debug, Clone)]
pub struct AndroidProps {
    files: Vec<PathBuf>,
    sys_root: PathBuf,
}

impl AndroidProps {
    pub fn new(files: Vec<PathBuf>, sys_root: impl Into<PathBuf>) -> Self {
        Self {
            files,
            sys_root: sys_root.into(),
        }
    }

    /// Merge the property files in order. A key keeps the value from the
    /// first file that defines it. Fails only when no file could be read.
    pub fn build(&self) -> Result<RawAndroidBuild, SourceError> {
        let mut properties = HashMap::new();
        let mut read_any = false;

        for file in &self.files {
            match fs::read_to_string(file) {
                Ok(content) => {
                    read_any = true;
                    for (key, value) in parse_build_prop(&content) {
                        properties.entry(key).or_insert(value);
                    }
                }
                Err(e) => debug!("Skipping property file {}: {}", file.display(), e),
            }
        }

        if !read_any {
            return Err(SourceError::Unsupported);
        }
        Ok(RawAndroidBuild { properties })
    }

    /// Display size from the framebuffer, density from `ro.sf.lcd_density`
    pub fn display(&self) -> Result<RawDisplayMetrics, SourceError> {
        let path = self.sys_root.join(ANDROID_FB_VIRTUAL_SIZE);
        let content = read_existing(&path)?;
        let (width_pixels, height_pixels) = parse_virtual_size(&content)
            .ok_or_else(|| SourceError::parse(format!("invalid virtual_size: {}", content.trim())))?;

        let density = self
            .build()
            .ok()
            .and_then(|build| {
                ["ro.sf.lcd_density", "qemu.sf.lcd_density"]
                    .iter()
                    .find_map(|key| build.properties.get(*key)?.parse::<f32>().ok())
            })
            .unwrap_or_else(|| {
                warn!("No display density property, assuming {}", ANDROID_DEFAULT_DENSITY);
                ANDROID_DEFAULT_DENSITY
            });

        Ok(RawDisplayMetrics {
            width_pixels,
            height_pixels,
            x_dpi: density,
            y_dpi: density,
        })
    }
}

fn read_existing(path: &Path) -> Result<String, SourceError> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(SourceError::Unsupported),
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            Err(SourceError::PermissionDenied(path.display().to_string()))
        }
        Err(e) => Err(SourceError::Io(e)),
    }
}

#[cfg(any(target_os = "ios", target_os = "macos"))]
fn sysctl_string(name: &str) -> Result<String, SourceError> {
    use std::ffi::CString;

    let name = CString::new(name).map_err(|e| SourceError::parse(e.to_string()))?;
    let mut len: libc::size_t = 0;
    // SAFETY: a null buffer asks sysctl for the value length only
    let rc = unsafe {
        libc::sysctlbyname(name.as_ptr(), std::ptr::null_mut(), &mut len, std::ptr::null_mut(), 0)
    };
    if rc != 0 {
        return Err(SourceError::Io(std::io::Error::last_os_error()));
    }

    let mut buf = vec![0u8; len];
    // SAFETY: buf holds len bytes
    let rc = unsafe {
        libc::sysctlbyname(
            name.as_ptr(),
            buf.as_mut_ptr() as *mut libc::c_void,
            &mut len,
            std::ptr::null_mut(),
            0,
        )
    };
    if rc != 0 {
        return Err(SourceError::Io(std::io::Error::last_os_error()));
    }
    buf.truncate(len);
    while buf.last() == Some(&0) {
        buf.pop();
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// iOS device identity from `sysctl`.
///
/// The vendor identifier and the orientation notification flag belong to
/// UIKit and are left empty here.
#[cfg(target_os = "ios")]
pub fn ios_device() -> Result<RawIosDevice, SourceError> {
    let machine = sysctl_string("hw.machine")?;
    let is_physical_device = !matches!(machine.as_str(), "x86_64" | "i386" | "arm64");
    let model = if machine.starts_with("iPad") {
        "iPad"
    } else if machine.starts_with("iPod") {
        "iPod touch"
    } else {
        "iPhone"
    };

    Ok(RawIosDevice {
        name: hostname::get()
            .map(|h| h.to_string_lossy().into_owned())
            .unwrap_or_default(),
        system_name: "iOS".to_string(),
        system_version: sysctl_string("kern.osproductversion")?,
        model: model.to_string(),
        localized_model: model.to_string(),
        identifier_for_vendor: String::new(),
        is_physical_device,
        is_multitasking_supported: true,
        is_generating_device_orientation_notifications: false,
    })
}

#[cfg(not(target_os = "ios"))]
pub fn ios_device() -> Result<RawIosDevice, SourceError> {
    Err(SourceError::Unsupported)
}

/// macOS product version, used for the desktop version string
#[cfg(target_os = "macos")]
pub fn macos_product_version() -> Option<String> {
    sysctl_string("kern.osproductversion").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const BUILD_PROP: &str = "\
# begin build properties
ro.build.id=UD1A.230803.041
ro.build.version.sdk=34
ro.build.version.release=14
ro.product.model=Pixel 8
ro.sf.lcd_density=420
";

    #[test]
    fn test_parse_build_prop() {
        let props = parse_build_prop(BUILD_PROP);
        assert_eq!(props.get("ro.build.version.sdk").map(String::as_str), Some("34"));
        assert_eq!(props.get("ro.product.model").map(String::as_str), Some("Pixel 8"));
        assert!(!props.keys().any(|k| k.starts_with('#')));
    }

    #[test]
    fn test_parse_virtual_size() {
        assert_eq!(parse_virtual_size("1080,2400\n"), Some((1080, 2400)));
        assert_eq!(parse_virtual_size("1080x2400"), None);
    }

    #[test]
    fn test_first_property_file_wins() {
        let dir = TempDir::new().unwrap();
        let system = dir.path().join("system.prop");
        let vendor = dir.path().join("vendor.prop");
        fs::write(&system, BUILD_PROP).unwrap();
        fs::write(&vendor, "ro.product.model=Other\nro.vendor.only=1\n").unwrap();

        let props = AndroidProps::new(
            vec![system, dir.path().join("missing.prop"), vendor],
            dir.path(),
        );
        let build = props.build().unwrap();
        assert_eq!(build.properties["ro.product.model"], "Pixel 8");
        assert_eq!(build.properties["ro.vendor.only"], "1");
    }

    #[test]
    fn test_no_property_files_is_unsupported() {
        let dir = TempDir::new().unwrap();
        let props = AndroidProps::new(vec![dir.path().join("none.prop")], dir.path());
        assert!(matches!(props.build(), Err(SourceError::Unsupported)));
        assert!(matches!(props.display(), Err(SourceError::Unsupported)));
    }

    #[test]
    fn test_display_uses_density_property() {
        let dir = TempDir::new().unwrap();
        let prop = dir.path().join("build.prop");
        fs::write(&prop, BUILD_PROP).unwrap();
        let fb = dir.path().join(ANDROID_FB_VIRTUAL_SIZE);
        fs::create_dir_all(fb.parent().unwrap()).unwrap();
        fs::write(&fb, "1080,2400\n").unwrap();

        let display = AndroidProps::new(vec![prop], dir.path()).display().unwrap();
        assert_eq!(display.width_pixels, 1080);
        assert_eq!(display.height_pixels, 2400);
        assert_eq!(display.x_dpi, 420.0);
        assert_eq!(display.y_dpi, 420.0);
    }

    #[cfg(not(target_os = "ios"))]
    #[test]
    fn test_ios_device_unsupported_elsewhere() {
        assert!(matches!(ios_device(), Err(SourceError::Unsupported)));
    }
}
