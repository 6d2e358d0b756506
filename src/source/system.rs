use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fs;
use std::io;
use std::sync::{Mutex, MutexGuard};

use log::{debug, info};
use sysinfo::{
    DiskExt, NetworkExt, Pid, PidExt, Process, ProcessExt, ProcessStatus, System, SystemExt, Uid,
    UserExt,
};

use crate::config::{SnapshotConfig, SourcePaths};
use crate::constants::{DEFAULT_CLOCK_TICKS, DEFAULT_PAGE_SIZE};
use crate::error::SourceError;
use crate::privileges;
use crate::source::mobile::{self, parse_build_prop, AndroidProps};
use crate::source::procfs::{self, Clock, ProcFs};
use crate::source::records::*;
use crate::source::sysfs::{self, SysFs};
use crate::source::RawSource;

/// Whether the host exposes a Linux-style `/proc`
const HAS_PROCFS: bool = cfg!(any(target_os = "linux", target_os = "android"));

/// Production [`RawSource`] backed by `sysinfo` and platform files.
///
/// `sysinfo::System` needs `&mut self` to refresh, so it sits behind a
/// mutex; concurrent queries are serialised.
pub struct SystemSource {
    system: Mutex<System>,
    cpu_samples: Mutex<HashMap<u32, CpuSample>>,
    procfs: ProcFs,
    sysfs: SysFs,
    android: AndroidProps,
    paths: SourcePaths,
    thread_details: bool,
}

impl Default for SystemSource {
    fn default() -> Self {
        Self::new()
    }
}

/// Values shared by every process built during one query
struct ProcessContext {
    clock: Clock,
    groups: HashMap<u32, String>,
    os_bitness: u32,
}

/// CPU time used by one process as of one read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuSample {
    start_time: i64,
    busy_ms: i64,
    up_time: i64,
}

impl CpuSample {
    fn of(raw: &RawProcess) -> Self {
        Self {
            start_time: raw.start_time,
            busy_ms: raw.kernel_time.saturating_add(raw.user_time),
            up_time: raw.up_time,
        }
    }

    /// Load over the interval since `prior`. Falls back to `cumulative` when
    /// there is no earlier read of the same process (a reused pid has a
    /// different start time) or no time has passed.
    fn load_since(&self, prior: Option<&CpuSample>, cumulative: f64) -> f64 {
        match prior {
            Some(prior) if prior.start_time == self.start_time && self.up_time > prior.up_time => {
                (self.busy_ms - prior.busy_ms) as f64 / (self.up_time - prior.up_time) as f64
            }
            _ => cumulative,
        }
    }
}

/// Fill `cpu_load_between_ticks` from the previous sample of the same pid and
/// store the new one
fn record_cpu_load(samples: &mut HashMap<u32, CpuSample>, raw: &mut RawProcess) {
    let sample = CpuSample::of(raw);
    raw.cpu_load_between_ticks =
        sample.load_since(samples.get(&raw.process_id), raw.cpu_load_cumulative);
    samples.insert(raw.process_id, sample);
}

fn os_bitness() -> u32 {
    if cfg!(target_pointer_width = "64") {
        64
    } else {
        32
    }
}

fn now_ms() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

fn clock_ticks() -> i64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf only reads a configuration value
        let ticks = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
        if ticks > 0 {
            return ticks as i64;
        }
    }
    DEFAULT_CLOCK_TICKS
}

fn page_size() -> i64 {
    #[cfg(unix)]
    {
        // SAFETY: sysconf only reads a configuration value
        let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
        if size > 0 {
            return size as i64;
        }
    }
    DEFAULT_PAGE_SIZE
}

#[cfg(any(target_os = "linux", target_os = "android"))]
fn current_thread_id() -> u32 {
    // SAFETY: gettid takes no arguments and cannot fail
    unsafe { libc::syscall(libc::SYS_gettid) as u32 }
}

#[cfg(not(any(target_os = "linux", target_os = "android")))]
fn current_thread_id() -> u32 {
    0
}

#[cfg(unix)]
fn uid_string(uid: &Uid) -> String {
    (**uid).to_string()
}

#[cfg(not(unix))]
fn uid_string(uid: &Uid) -> String {
    format!("{:?}", uid)
}

/// Raw state name for a `sysinfo` status. Each variant lands on the same
/// name as its `/proc` state letter in [`procfs::state_name`].
fn process_state(status: ProcessStatus) -> &'static str {
    match status {
        ProcessStatus::Run | ProcessStatus::Waking => "RUNNING",
        ProcessStatus::Sleep
        | ProcessStatus::Idle
        | ProcessStatus::Parked
        | ProcessStatus::Wakekill => "SLEEPING",
        ProcessStatus::UninterruptibleDiskSleep | ProcessStatus::LockBlocked => "WAITING",
        ProcessStatus::Zombie => "ZOMBIE",
        ProcessStatus::Stop | ProcessStatus::Tracing => "STOPPED",
        ProcessStatus::Dead => "INVALID",
        // Same fallback as an unrecognised /proc state letter
        ProcessStatus::Unknown(_) => "OTHER",
    }
}

fn split_environment(environ: &[String]) -> Vec<(String, String)> {
    environ
        .iter()
        .filter_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

fn not_found(what: String) -> SourceError {
    SourceError::Io(io::Error::new(io::ErrorKind::NotFound, what))
}

impl SystemSource {
    pub fn new() -> Self {
        Self::from_config(&SnapshotConfig::default())
    }

    pub fn from_config(config: &SnapshotConfig) -> Self {
        info!("Initializing system source");
        let mut system = System::new();
        system.refresh_users_list();

        let paths = config.paths.clone();
        Self {
            system: Mutex::new(system),
            cpu_samples: Mutex::new(HashMap::new()),
            procfs: ProcFs::new(&paths.proc_root),
            sysfs: SysFs::new(&paths.sys_root),
            android: AndroidProps::new(paths.android_build_props.clone(), &paths.sys_root),
            paths,
            thread_details: config.thread_details,
        }
    }

    fn lock(&self) -> MutexGuard<'_, System> {
        // A panic mid-refresh leaves the tables stale, not inconsistent
        self.system.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn context(&self, system: &System) -> ProcessContext {
        let groups = if cfg!(unix) {
            fs::read_to_string(&self.paths.group_file)
                .map(|content| procfs::parse_group(&content))
                .unwrap_or_default()
        } else {
            HashMap::new()
        };
        ProcessContext {
            clock: Clock {
                ticks_per_second: clock_ticks(),
                boot_time_ms: system.boot_time() as i64 * 1000,
                now_ms: now_ms(),
            },
            groups,
            os_bitness: os_bitness(),
        }
    }

    fn build_process(&self, system: &System, process: &Process, ctx: &ProcessContext) -> RawProcess {
        let pid = process.pid().as_u32();
        let start_time = process.start_time() as i64 * 1000;
        let up_time = (ctx.clock.now_ms - start_time).max(0);
        let disk = process.disk_usage();

        let mut raw = RawProcess {
            process_id: pid,
            parent_process_id: process.parent().map(|p| p.as_u32()).unwrap_or(0),
            name: process.name().to_string(),
            path: process.exe().to_string_lossy().into_owned(),
            command_line: process.cmd().join(" "),
            arguments: process.cmd().to_vec(),
            environment: split_environment(process.environ()),
            current_working_directory: process.cwd().to_string_lossy().into_owned(),
            user: process
                .user_id()
                .and_then(|uid| system.get_user_by_id(uid))
                .map(|user| user.name().to_string())
                .unwrap_or_default(),
            user_id: process.user_id().map(uid_string).unwrap_or_default(),
            state: process_state(process.status()).to_string(),
            virtual_size: process.virtual_memory() as i64,
            resident_set_size: process.memory() as i64,
            start_time,
            up_time,
            bytes_read: disk.total_read_bytes as i64,
            bytes_written: disk.total_written_bytes as i64,
            soft_open_file_limit: -1,
            hard_open_file_limit: -1,
            bitness: ctx.os_bitness,
            ..Default::default()
        };

        if !HAS_PROCFS {
            return raw;
        }

        match self.procfs.process_extras(pid) {
            Ok(extras) => {
                raw.state = procfs::state_name(extras.stat.state).to_string();
                raw.priority = extras.stat.priority;
                raw.kernel_time = ctx.clock.ticks_to_ms(extras.stat.stime);
                raw.user_time = ctx.clock.ticks_to_ms(extras.stat.utime);
                raw.minor_faults = extras.stat.minflt;
                raw.major_faults = extras.stat.majflt;
                raw.thread_count = extras.stat.num_threads;
                raw.context_switches = extras.context_switches;
                raw.open_files = extras.open_files;
                if let Some((soft, hard)) = extras.open_file_limits {
                    raw.soft_open_file_limit = soft;
                    raw.hard_open_file_limit = hard;
                }
                if extras.bitness > 0 {
                    raw.bitness = extras.bitness;
                }
                if let Some(mask) = extras.affinity_mask {
                    raw.affinity_mask = mask;
                }
                if let Some(uid) = extras.uid {
                    raw.user_id = uid.to_string();
                }
                if let Some(gid) = extras.gid {
                    raw.group_id = gid.to_string();
                    raw.group = ctx.groups.get(&gid).cloned().unwrap_or_default();
                }
                if up_time > 0 {
                    raw.cpu_load_cumulative =
                        (raw.kernel_time + raw.user_time) as f64 / up_time as f64;
                }
            }
            Err(e) => debug!("No procfs details for process {}: {}", pid, e),
        }

        if self.thread_details {
            match self.procfs.threads(pid, &ctx.clock) {
                Ok(threads) => raw.threads = threads,
                Err(e) => debug!("No thread table for process {}: {}", pid, e),
            }
        }
        raw
    }

    /// Processes matching `filter`, ascending by pid
    fn collect_processes(&self, filter: impl Fn(u32) -> bool) -> Vec<RawProcess> {
        let mut system = self.lock();
        system.refresh_processes();
        let ctx = self.context(&system);

        let mut pids: Vec<Pid> = system
            .processes()
            .keys()
            .copied()
            .filter(|pid| filter(pid.as_u32()))
            .collect();
        pids.sort_by_key(|pid| pid.as_u32());

        let mut processes: Vec<RawProcess> = pids
            .into_iter()
            .filter_map(|pid| system.process(pid))
            .map(|process| self.build_process(&system, process, &ctx))
            .collect();

        let mut samples = self.samples();
        samples.retain(|pid, _| system.process(Pid::from_u32(*pid)).is_some());
        for raw in &mut processes {
            record_cpu_load(&mut samples, raw);
        }
        processes
    }

    fn samples(&self) -> MutexGuard<'_, HashMap<u32, CpuSample>> {
        self.cpu_samples.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn os_release_codename(&self) -> String {
        fs::read_to_string(&self.paths.os_release)
            .map(|content| parse_build_prop(&content))
            .ok()
            .and_then(|fields| fields.get("VERSION_CODENAME").cloned())
            .map(|name| name.trim_matches('"').to_string())
            .unwrap_or_default()
    }
}

impl RawSource for SystemSource {
    fn os_identity(&self) -> Result<RawOsIdentity, SourceError> {
        let system = self.lock();
        let (family, manufacturer) = match std::env::consts::OS {
            "linux" => (
                system.name().unwrap_or_else(|| "Linux".to_string()),
                "GNU/Linux",
            ),
            "android" => ("Android".to_string(), "Google"),
            "macos" => ("macOS".to_string(), "Apple"),
            "ios" => ("iOS".to_string(), "Apple"),
            "windows" => ("Windows".to_string(), "Microsoft"),
            "freebsd" => ("FreeBSD".to_string(), "The FreeBSD Project"),
            other => (other.to_string(), "unknown"),
        };

        Ok(RawOsIdentity {
            family,
            manufacturer: manufacturer.to_string(),
            bitness: os_bitness(),
            process_id: std::process::id(),
        })
    }

    fn version_info(&self) -> Result<RawOsVersion, SourceError> {
        let system = self.lock();
        #[cfg(target_os = "macos")]
        let version = mobile::macos_product_version().or_else(|| system.os_version());
        #[cfg(not(target_os = "macos"))]
        let version = system.os_version();

        Ok(RawOsVersion {
            version: version.ok_or(SourceError::Unsupported)?,
            code_name: if HAS_PROCFS {
                self.os_release_codename()
            } else {
                String::new()
            },
            build_number: system.kernel_version().unwrap_or_default(),
        })
    }

    fn system_uptime(&self) -> Result<u64, SourceError> {
        Ok(self.lock().uptime())
    }

    fn system_boot_time(&self) -> Result<u64, SourceError> {
        Ok(self.lock().boot_time())
    }

    fn is_elevated(&self) -> Result<bool, SourceError> {
        Ok(privileges::is_elevated())
    }

    fn current_process(&self) -> Result<RawProcess, SourceError> {
        let pid = std::process::id();
        self.process(pid)?
            .ok_or_else(|| not_found(format!("current process {} not in process table", pid)))
    }

    fn current_thread(&self) -> Result<RawThread, SourceError> {
        if !HAS_PROCFS {
            return Err(SourceError::Unsupported);
        }
        let clock = self.context(&self.lock()).clock;
        self.procfs
            .thread(std::process::id(), current_thread_id(), &clock)
    }

    fn process_count(&self) -> Result<u32, SourceError> {
        let mut system = self.lock();
        system.refresh_processes();
        Ok(system.processes().len() as u32)
    }

    fn thread_count(&self) -> Result<u32, SourceError> {
        if !HAS_PROCFS {
            return Err(SourceError::Unsupported);
        }
        let loadavg = self.procfs.read("loadavg")?;
        procfs::parse_loadavg_threads(&loadavg)
            .ok_or_else(|| SourceError::parse(format!("invalid loadavg: {}", loadavg.trim())))
    }

    fn processes(&self) -> Result<Vec<RawProcess>, SourceError> {
        Ok(self.collect_processes(|_| true))
    }

    fn processes_by_pid(&self, pids: &[u32]) -> Result<Vec<RawProcess>, SourceError> {
        let wanted: HashSet<u32> = pids.iter().copied().collect();
        Ok(self.collect_processes(|pid| wanted.contains(&pid)))
    }

    fn process(&self, pid: u32) -> Result<Option<RawProcess>, SourceError> {
        let mut system = self.lock();
        let sys_pid = Pid::from_u32(pid);
        if !system.refresh_process(sys_pid) {
            return Ok(None);
        }
        let ctx = self.context(&system);
        let Some(process) = system.process(sys_pid) else {
            return Ok(None);
        };
        let mut raw = self.build_process(&system, process, &ctx);
        record_cpu_load(&mut self.samples(), &mut raw);
        Ok(Some(raw))
    }

    fn file_system(&self) -> Result<RawFileSystem, SourceError> {
        let mut system = self.lock();
        system.refresh_disks_list();

        let file_stores = system
            .disks()
            .iter()
            .map(|disk| {
                let name = disk.name().to_string_lossy().into_owned();
                RawFileStore {
                    volume: name.clone(),
                    name,
                    label: String::new(),
                    mount: disk.mount_point().to_string_lossy().into_owned(),
                    description: if disk.is_removable() {
                        "Removable Disk".to_string()
                    } else {
                        "Local Disk".to_string()
                    },
                    fs_type: String::from_utf8_lossy(disk.file_system()).into_owned(),
                    uuid: String::new(),
                    free_space: disk.available_space() as i64,
                    usable_space: disk.available_space() as i64,
                    total_space: disk.total_space() as i64,
                    removable: disk.is_removable(),
                }
            })
            .collect();

        let (open, max) = if HAS_PROCFS {
            self.procfs
                .read("sys/fs/file-nr")
                .ok()
                .and_then(|content| procfs::parse_file_nr(&content))
                .unwrap_or((0, 0))
        } else {
            (0, 0)
        };

        Ok(RawFileSystem {
            file_stores,
            open_file_descriptors: open,
            max_file_descriptors: max,
        })
    }

    fn network_params(&self) -> Result<RawNetworkParams, SourceError> {
        let host_name = hostname::get()?.to_string_lossy().into_owned();
        let (domain_name, dns_servers) = if cfg!(unix) {
            fs::read_to_string(&self.paths.resolv_conf)
                .map(|content| procfs::parse_resolv_conf(&content))
                .unwrap_or_default()
        } else {
            (String::new(), Vec::new())
        };
        let (ipv4_default_gateway, ipv6_default_gateway) = if HAS_PROCFS {
            (
                self.procfs
                    .read("net/route")
                    .ok()
                    .and_then(|c| procfs::parse_ipv4_default_gateway(&c))
                    .unwrap_or_default(),
                self.procfs
                    .read("net/ipv6_route")
                    .ok()
                    .and_then(|c| procfs::parse_ipv6_default_gateway(&c))
                    .unwrap_or_default(),
            )
        } else {
            (String::new(), String::new())
        };

        Ok(RawNetworkParams {
            host_name,
            domain_name,
            dns_servers,
            ipv4_default_gateway,
            ipv6_default_gateway,
        })
    }

    fn internet_protocol_stats(&self) -> Result<RawProtocolStats, SourceError> {
        if !HAS_PROCFS {
            return Err(SourceError::Unsupported);
        }
        let (tcp_v4, udp_v4) = procfs::parse_snmp(&self.procfs.read("net/snmp")?);
        let udp_v6 = self
            .procfs
            .read("net/snmp6")
            .map(|content| procfs::parse_snmp6_udp(&content))
            .unwrap_or_default();
        let connections = self.procfs.connections()?;

        // The kernel keeps one TCP MIB for both families
        let tcp_v6 = RawTcpStats {
            connections_established: connections
                .iter()
                .filter(|c| c.connection_type == "tcp6" && c.state == "ESTABLISHED")
                .count() as i64,
            ..Default::default()
        };

        Ok(RawProtocolStats {
            tcp_v4,
            tcp_v6,
            udp_v4,
            udp_v6,
            connections,
        })
    }

    fn memory(&self) -> Result<RawGlobalMemory, SourceError> {
        let mut system = self.lock();
        system.refresh_memory();

        let total = system.total_memory() as i64;
        let swap_total = system.total_swap() as i64;
        let swap_used = system.used_swap() as i64;
        let mut memory = RawGlobalMemory {
            total,
            available: system.available_memory() as i64,
            page_size: page_size(),
            swap_total,
            swap_used,
            virtual_max: total + swap_total,
            virtual_in_use: system.used_memory() as i64 + swap_used,
            ..Default::default()
        };

        if HAS_PROCFS {
            if let Ok(content) = self.procfs.read("meminfo") {
                let meminfo = procfs::parse_meminfo(&content);
                if let Some(limit) = meminfo.get("CommitLimit") {
                    memory.virtual_max = *limit;
                }
                if let Some(committed) = meminfo.get("Committed_AS") {
                    memory.virtual_in_use = *committed;
                }
            }
            if let Ok(content) = self.procfs.read("vmstat") {
                let vmstat = procfs::parse_vmstat(&content);
                memory.swap_pages_in = vmstat.get("pswpin").copied().unwrap_or(0);
                memory.swap_pages_out = vmstat.get("pswpout").copied().unwrap_or(0);
            }
        }
        Ok(memory)
    }

    fn graphics_cards(&self) -> Result<Vec<RawGraphicsCard>, SourceError> {
        if !HAS_PROCFS {
            return Err(SourceError::Unsupported);
        }
        Ok(self.sysfs.graphics_cards())
    }

    fn partitions(&self) -> Result<Vec<RawPartition>, SourceError> {
        if !HAS_PROCFS {
            return Err(SourceError::Unsupported);
        }
        let entries = procfs::parse_partitions(&self.procfs.read("partitions")?);
        let uuids = sysfs::block_device_uuids(&self.paths.disk_by_uuid);

        let mut system = self.lock();
        system.refresh_disks_list();
        let mounts: HashMap<String, (String, String)> = system
            .disks()
            .iter()
            .map(|disk| {
                (
                    disk.name().to_string_lossy().into_owned(),
                    (
                        disk.mount_point().to_string_lossy().into_owned(),
                        String::from_utf8_lossy(disk.file_system()).into_owned(),
                    ),
                )
            })
            .collect();

        Ok(entries
            .into_iter()
            .map(|entry| {
                let identification = format!("/dev/{}", entry.name);
                let (mount_point, partition_type) =
                    mounts.get(&identification).cloned().unwrap_or_default();
                RawPartition {
                    uuid: uuids.get(&entry.name).cloned().unwrap_or_default(),
                    identification,
                    name: entry.name,
                    partition_type,
                    size: entry.blocks * 1024,
                    major: entry.major,
                    minor: entry.minor,
                    mount_point,
                }
            })
            .collect())
    }

    fn network_interfaces(&self) -> Result<Vec<RawNetworkInterface>, SourceError> {
        let addresses = if_addrs::get_if_addrs()?;
        let mut v4: BTreeMap<String, Vec<(String, u8)>> = BTreeMap::new();
        let mut v6: BTreeMap<String, Vec<(String, u8)>> = BTreeMap::new();
        for iface in addresses {
            match iface.addr {
                if_addrs::IfAddr::V4(addr) => v4.entry(iface.name).or_default().push((
                    addr.ip.to_string(),
                    u32::from(addr.netmask).count_ones() as u8,
                )),
                if_addrs::IfAddr::V6(addr) => v6.entry(iface.name).or_default().push((
                    addr.ip.to_string(),
                    u128::from(addr.netmask).count_ones() as u8,
                )),
            }
        }

        let mut system = self.lock();
        system.refresh_networks_list();
        let timestamp = now_ms();

        let mut names: BTreeSet<String> = v4.keys().chain(v6.keys()).cloned().collect();
        names.extend(system.networks().into_iter().map(|(name, _)| name.clone()));

        let mut interfaces: Vec<RawNetworkInterface> = names
            .into_iter()
            .map(|name| {
                let (ipv4addr, subnet_masks): (Vec<_>, Vec<_>) =
                    v4.remove(&name).unwrap_or_default().into_iter().unzip();
                let (ipv6addr, prefix_lengths): (Vec<_>, Vec<_>) =
                    v6.remove(&name).unwrap_or_default().into_iter().unzip();

                let mut raw = RawNetworkInterface {
                    display_name: name.clone(),
                    oper_status: if ipv4addr.is_empty() && ipv6addr.is_empty() {
                        "UNKNOWN".to_string()
                    } else {
                        "UP".to_string()
                    },
                    ipv4addr,
                    subnet_masks,
                    ipv6addr,
                    prefix_lengths,
                    timestamp,
                    ..Default::default()
                };

                if let Some((_, data)) = system.networks().into_iter().find(|(n, _)| **n == name) {
                    raw.mac_addr = data.mac_address().to_string();
                    raw.bytes_recv = data.total_received() as i64;
                    raw.bytes_sent = data.total_transmitted() as i64;
                    raw.packets_recv = data.total_packets_received() as i64;
                    raw.packets_sent = data.total_packets_transmitted() as i64;
                    raw.in_errors = data.total_errors_on_received() as i64;
                    raw.out_errors = data.total_errors_on_transmitted() as i64;
                }

                if HAS_PROCFS {
                    let attrs = self.sysfs.interface(&name);
                    raw.index = attrs.index;
                    raw.mtu = attrs.mtu;
                    raw.oper_status = attrs.oper_status;
                    raw.if_alias = attrs.if_alias;
                    raw.speed = attrs.speed;
                    raw.in_drops = attrs.in_drops;
                    raw.collisions = attrs.collisions;
                    raw.if_type = attrs.if_type;
                    raw.connector_present = attrs.connector_present;
                }
                raw.name = name;
                raw
            })
            .collect();

        interfaces.sort_by(|a, b| a.index.cmp(&b.index).then_with(|| a.name.cmp(&b.name)));
        Ok(interfaces)
    }

    fn android_build(&self) -> Result<RawAndroidBuild, SourceError> {
        self.android.build()
    }

    fn android_display(&self) -> Result<RawDisplayMetrics, SourceError> {
        self.android.display()
    }

    fn ios_device(&self) -> Result<RawIosDevice, SourceError> {
        mobile::ios_device()
    }
}
