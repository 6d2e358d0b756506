//! Global constants for device-snapshot.
//!
//! This module centralizes hardcoded values: default platform paths,
//! fallbacks used when the platform does not report a value, and lookup
//! tables used by the translators.

// Platform paths
/// Root of the Linux process filesystem
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Root of the Linux sysfs tree
pub const DEFAULT_SYS_ROOT: &str = "/sys";

/// Resolver configuration (DNS servers and search domain)
pub const DEFAULT_RESOLV_CONF: &str = "/etc/resolv.conf";

/// Group database used to resolve process group names
pub const DEFAULT_GROUP_FILE: &str = "/etc/group";

/// Distribution identity (`VERSION_CODENAME` and friends)
pub const DEFAULT_OS_RELEASE: &str = "/etc/os-release";

/// Symlinks from filesystem UUIDs to block devices
pub const DEFAULT_DISK_BY_UUID: &str = "/dev/disk/by-uuid";

/// Android property files, read in order; later files do not override
/// earlier ones
pub const DEFAULT_ANDROID_BUILD_PROPS: [&str; 3] = [
    "/system/build.prop",
    "/vendor/build.prop",
    "/product/build.prop",
];

/// Framebuffer size on Android, `"<width>,<height>"`
pub const ANDROID_FB_VIRTUAL_SIZE: &str = "class/graphics/fb0/virtual_size";

// Configuration
/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = "device_snapshot.yaml";

/// Version written into newly created configuration files
pub const CONFIG_VERSION: &str = "1.0";

// Fallbacks
/// Clock ticks per second when `sysconf(_SC_CLK_TCK)` is unavailable
pub const DEFAULT_CLOCK_TICKS: i64 = 100;

/// Page size when `sysconf(_SC_PAGESIZE)` is unavailable
pub const DEFAULT_PAGE_SIZE: i64 = 4096;

/// Value Android reports for build properties it does not know
pub const ANDROID_UNKNOWN: &str = "unknown";

/// Android's default display density when `ro.sf.lcd_density` is absent
pub const ANDROID_DEFAULT_DENSITY: f32 = 160.0;

// Lookup tables
/// OUI prefixes assigned to hypervisor vendors (upper-case, colon separated)
pub const KNOWN_VM_MAC_PREFIXES: [&str; 11] = [
    "00:50:56", // VMware
    "00:0C:29", // VMware
    "00:05:69", // VMware
    "00:1C:14", // VMware
    "08:00:27", // VirtualBox
    "0A:00:27", // VirtualBox
    "00:15:5D", // Hyper-V
    "00:16:3E", // Xen
    "00:1C:42", // Parallels
    "00:03:FF", // Virtual PC
    "52:54:00", // QEMU/KVM
];
