use crate::error::{Result, SnapshotError};
use crate::models::{
    FileSystem, OSDesktopWindow, OSFileStore, OSService, OSSession, OSVersionInfo, ServiceState,
};
use crate::source::{
    RawDesktopWindow, RawFileStore, RawFileSystem, RawOsVersion, RawService, RawSession,
};

use super::{load_many, LoadPolicy};

pub fn service_state(raw: &str) -> Result<ServiceState> {
    match raw {
        "RUNNING" => Ok(ServiceState::Running),
        "STOPPED" => Ok(ServiceState::Stopped),
        "OTHER" => Ok(ServiceState::Other),
        other => Err(SnapshotError::mapping("OSService.state", other)),
    }
}

pub fn translate_version(source: RawOsVersion) -> OSVersionInfo {
    OSVersionInfo {
        version: source.version,
        code_name: source.code_name,
        build_number: source.build_number,
    }
}

pub fn translate_service(source: RawService) -> Result<OSService> {
    Ok(OSService {
        state: service_state(&source.state)?,
        name: source.name,
        process_id: source.process_id,
    })
}

pub fn translate_session(source: RawSession) -> Result<OSSession> {
    Ok(OSSession {
        user_name: source.user_name,
        terminal_device: source.terminal_device,
        login_time: source.login_time,
        host: source.host,
    })
}

pub fn translate_desktop_window(source: RawDesktopWindow) -> Result<OSDesktopWindow> {
    Ok(OSDesktopWindow {
        window_id: source.window_id,
        title: source.title,
        command: source.command,
        owning_process_id: source.owning_process_id,
        order: source.order,
        visible: source.visible,
    })
}

fn translate_file_store(source: RawFileStore) -> Result<OSFileStore> {
    Ok(OSFileStore {
        name: source.name,
        volume: source.volume,
        label: source.label,
        mount: source.mount,
        description: source.description,
        fs_type: source.fs_type,
        uuid: source.uuid,
        free_space: source.free_space,
        usable_space: source.usable_space,
        total_space: source.total_space,
        removable: source.removable,
    })
}

pub fn translate_file_system(source: RawFileSystem, policy: LoadPolicy) -> Result<FileSystem> {
    Ok(FileSystem {
        file_stores: load_many(source.file_stores, policy, "OSFileStore", translate_file_store)?,
        open_file_descriptors: source.open_file_descriptors,
        max_file_descriptors: source.max_file_descriptors,
    })
}
