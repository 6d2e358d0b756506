//! Smoke tests against the live host.
//!
//! The host running the tests may be a container with a minimal `/proc` or a
//! platform with no coverage for some queries, so these only check what must
//! hold wherever a value is returned.

use std::process;

use anyhow::Result;

use device_snapshot::error::Result as SnapshotResult;
use device_snapshot::report::SnapshotReport;
use device_snapshot::{DeviceSnapshot, Platform};

/// `Some(value)` on success, `None` when the platform cannot provide it.
/// Any other failure fails the test.
fn available<T>(result: SnapshotResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) if e.is_unavailable() => None,
        Err(e) => panic!("unexpected error: {e}"),
    }
}

#[test]
fn test_live_platform_is_desktop() {
    let snapshot = DeviceSnapshot::new();
    assert_eq!(snapshot.platform(), Platform::current());
    if cfg!(not(any(target_os = "android", target_os = "ios"))) {
        assert!(snapshot.info().as_desktop().is_some());
    }
}

#[test]
fn test_live_operating_system() -> Result<()> {
    let snapshot = DeviceSnapshot::new();
    let Some(desktop) = snapshot.info().as_desktop() else {
        return Ok(());
    };
    let os = desktop.operating_system();

    assert_eq!(os.process_id()?, process::id());
    assert!(matches!(os.bitness()?, 32 | 64));
    assert!(!os.family()?.is_empty());

    if let Some(current) = available(os.current_process()) {
        assert_eq!(current.process_id, process::id());
    }
    if let Some(thread) = available(os.current_thread()) {
        assert_eq!(thread.owning_process_id, process::id());
    }
    if let Some(count) = available(os.process_count()) {
        assert!(count >= 1);
    }
    Ok(())
}

#[test]
fn test_live_processes_contain_self() {
    let snapshot = DeviceSnapshot::new();
    let Some(desktop) = snapshot.info().as_desktop() else {
        return;
    };
    let os = desktop.operating_system();
    let own = process::id();

    if let Some(processes) = available(os.processes_by_pid(&[own, u32::MAX])) {
        assert_eq!(processes.len(), 1);
        assert_eq!(processes[0].process_id, own);
    }
    if let Some(process) = available(os.process(own)) {
        assert_eq!(process.process_id, own);
    }
}

#[test]
fn test_live_hardware() {
    let snapshot = DeviceSnapshot::new();
    let Some(desktop) = snapshot.info().as_desktop() else {
        return;
    };
    let hardware = desktop.hardware();

    if let Some(memory) = available(hardware.memory()) {
        assert!(memory.total > 0);
        assert!(memory.page_size > 0);
    }
    if let Some(interfaces) = available(hardware.network_interfaces()) {
        for interface in interfaces {
            assert_eq!(interface.ipv4addr.len(), interface.subnet_masks.len());
            assert_eq!(interface.ipv6addr.len(), interface.prefix_lengths.len());
        }
    }
}

#[test]
fn test_live_report_serializes() -> Result<()> {
    let report = SnapshotReport::collect(&DeviceSnapshot::new());
    let json: serde_json::Value = serde_json::from_str(&report.to_json()?)?;
    assert!(json["generated_at"].is_string());
    assert!(json["errors"].is_array());
    Ok(())
}
