use crate::error::{Result, SnapshotError};
use crate::models::{OSProcess, OSThread, State};
use crate::source::{RawProcess, RawThread};

use super::{load_many, LoadPolicy};

/// Map a raw scheduling state name.
pub fn process_state(field: &'static str, raw: &str) -> Result<State> {
    match raw {
        "NEW" => Ok(State::New),
        "RUNNING" => Ok(State::Running),
        "SLEEPING" => Ok(State::Sleeping),
        "WAITING" => Ok(State::Waiting),
        "ZOMBIE" => Ok(State::Zombie),
        "STOPPED" => Ok(State::Stopped),
        "OTHER" => Ok(State::Other),
        "INVALID" => Ok(State::Invalid),
        "SUSPENDED" => Ok(State::Suspended),
        other => Err(SnapshotError::mapping(field, other)),
    }
}

pub fn translate_thread(source: RawThread) -> Result<OSThread> {
    let state = process_state("OSThread.state", &source.state)?;

    Ok(OSThread {
        thread_id: source.thread_id,
        owning_process_id: source.owning_process_id,
        name: source.name,
        state,
        thread_cpu_load_cumulative: source.cpu_load_cumulative,
        start_memory_address: source.start_memory_address,
        context_switches: source.context_switches,
        minor_faults: source.minor_faults,
        major_faults: source.major_faults,
        kernel_time: source.kernel_time,
        user_time: source.user_time,
        up_time: source.up_time,
        start_time: source.start_time,
        priority: source.priority,
    })
}

/// Translate a process and its thread list.
///
/// The thread list goes through [`load_many`] with the same `policy` as the
/// enclosing load.
pub fn translate_process(source: RawProcess, policy: LoadPolicy) -> Result<OSProcess> {
    let state = process_state("OSProcess.state", &source.state)?;
    let thread_details = load_many(source.threads, policy, "OSThread", translate_thread)?;

    Ok(OSProcess {
        process_id: source.process_id,
        parent_process_id: source.parent_process_id,
        name: source.name,
        path: source.path,
        command_line: source.command_line,
        arguments: source.arguments,
        environment_variables: source.environment.into_iter().collect(),
        current_working_directory: source.current_working_directory,
        user: source.user,
        user_id: source.user_id,
        group: source.group,
        group_id: source.group_id,
        state,
        priority: source.priority,
        virtual_size: source.virtual_size,
        resident_set_size: source.resident_set_size,
        kernel_time: source.kernel_time,
        user_time: source.user_time,
        start_time: source.start_time,
        up_time: source.up_time,
        bytes_read: source.bytes_read,
        bytes_written: source.bytes_written,
        open_files: source.open_files,
        soft_open_file_limit: source.soft_open_file_limit,
        hard_open_file_limit: source.hard_open_file_limit,
        process_cpu_load_cumulative: source.cpu_load_cumulative,
        process_cpu_load_between_ticks: source.cpu_load_between_ticks,
        bitness: source.bitness,
        affinity_mask: source.affinity_mask,
        minor_faults: source.minor_faults,
        major_faults: source.major_faults,
        context_switches: source.context_switches,
        thread_count: source.thread_count,
        thread_details,
    })
}
