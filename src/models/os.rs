//! Operating system entities: processes, threads, services, sessions and
//! desktop windows.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Version details of the running operating system
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OSVersionInfo {
    pub version: String,
    pub code_name: String,
    pub build_number: String,
}

/// Scheduling state of a process or thread
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    /// Being created
    New,
    /// Currently executing
    Running,
    /// Interruptible sleep
    Sleeping,
    /// Uninterruptible wait, usually on I/O
    Waiting,
    /// Terminated but not reaped by its parent
    Zombie,
    /// Stopped by a signal or a tracer
    Stopped,
    /// Known to the OS in a state with no better match
    Other,
    /// No longer valid, e.g. the process exited while being read
    Invalid,
    /// Suspended (Windows)
    Suspended,
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            State::New => "New",
            State::Running => "Running",
            State::Sleeping => "Sleeping",
            State::Waiting => "Waiting",
            State::Zombie => "Zombie",
            State::Stopped => "Stopped",
            State::Other => "Other",
            State::Invalid => "Invalid",
            State::Suspended => "Suspended",
        };
        write!(f, "{}", name)
    }
}

/// A thread at the time it was read.
///
/// Counters are copied from the raw source as-is. A negative value coming
/// from the platform is passed through, not clamped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OSThread {
    pub thread_id: u32,
    pub owning_process_id: u32,
    pub name: String,
    pub state: State,
    pub thread_cpu_load_cumulative: f64,
    pub start_memory_address: i64,
    pub context_switches: i64,
    pub minor_faults: i64,
    pub major_faults: i64,
    /// Milliseconds spent in kernel mode
    pub kernel_time: i64,
    /// Milliseconds spent in user mode
    pub user_time: i64,
    /// Milliseconds since the thread started
    pub up_time: i64,
    /// Start time in milliseconds since the epoch
    pub start_time: i64,
    pub priority: i32,
}

/// A process at the time it was read.
///
/// `thread_details` is a copy taken while the process was read. It is not a
/// live view and is never refreshed. Counters follow the same pass-through
/// rule as [`OSThread`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OSProcess {
    pub process_id: u32,
    pub parent_process_id: u32,
    pub name: String,
    pub path: String,
    pub command_line: String,
    pub arguments: Vec<String>,
    pub environment_variables: BTreeMap<String, String>,
    pub current_working_directory: String,
    pub user: String,
    pub user_id: String,
    pub group: String,
    pub group_id: String,
    pub state: State,
    pub priority: i32,
    /// Virtual memory size in bytes
    pub virtual_size: i64,
    /// Resident set size in bytes
    pub resident_set_size: i64,
    pub kernel_time: i64,
    pub user_time: i64,
    pub start_time: i64,
    pub up_time: i64,
    pub bytes_read: i64,
    pub bytes_written: i64,
    pub open_files: i64,
    pub soft_open_file_limit: i64,
    pub hard_open_file_limit: i64,
    pub process_cpu_load_cumulative: f64,
    /// CPU load since the previous read of this process, or the cumulative
    /// load on its first read
    pub process_cpu_load_between_ticks: f64,
    pub bitness: u32,
    /// Bitmask of the processors the process may run on, lowest 64 only
    pub affinity_mask: i64,
    pub minor_faults: i64,
    pub major_faults: i64,
    pub context_switches: i64,
    pub thread_count: u32,
    pub thread_details: Vec<OSThread>,
}

/// Run state of an OS service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceState {
    Running,
    Stopped,
    Other,
}

impl fmt::Display for ServiceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceState::Running => write!(f, "Running"),
            ServiceState::Stopped => write!(f, "Stopped"),
            ServiceState::Other => write!(f, "Other"),
        }
    }
}

/// A service (daemon) registered with the OS service manager
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OSService {
    pub name: String,
    pub process_id: u32,
    pub state: ServiceState,
}

/// A logged-in user session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OSSession {
    pub user_name: String,
    pub terminal_device: String,
    /// Login time in milliseconds since the epoch
    pub login_time: i64,
    pub host: String,
}

/// A top-level desktop window
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OSDesktopWindow {
    pub window_id: i64,
    pub title: String,
    pub command: String,
    pub owning_process_id: i64,
    pub order: i32,
    pub visible: bool,
}
