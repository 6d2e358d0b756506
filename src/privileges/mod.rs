//! Elevation checks for the current process.

#[cfg(unix)]
mod unix;

#[cfg(target_os = "windows")]
mod windows;

/// Check if the process is running with elevated privileges
pub fn is_elevated() -> bool {
    #[cfg(unix)]
    {
        unix::is_root()
    }
    #[cfg(target_os = "windows")]
    {
        windows::is_admin()
    }
    #[cfg(not(any(unix, target_os = "windows")))]
    {
        false
    }
}

/// Get instructions for elevating privileges on the current platform
pub fn elevation_instructions() -> &'static str {
    #[cfg(target_os = "windows")]
    {
        "Run as Administrator by right-clicking the executable and selecting 'Run as administrator'"
    }
    #[cfg(any(target_os = "linux", target_os = "macos"))]
    {
        "Run with sudo: 'sudo devinfo'"
    }
    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        "Run with elevated privileges appropriate for your operating system"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[cfg(unix)]
    #[test]
    fn test_is_elevated_matches_euid() {
        assert_eq!(is_elevated(), unsafe { libc::geteuid() } == 0);
    }

    #[test]
    fn test_elevation_instructions_not_empty() {
        assert!(!elevation_instructions().is_empty());
    }
}
