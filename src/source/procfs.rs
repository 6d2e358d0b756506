//! Readers for Linux `/proc` files.
//!
//! `sysinfo` covers the cross-platform basics. Thread tables, protocol
//! counters, socket tables, routes and partitions come from here. The
//! parsers are pure functions over file content so they can be tested with
//! fixture strings; [`ProcFs`] does the file I/O relative to a configurable
//! root.

use std::collections::HashMap;
use std::fs;
use std::io::{self, Read};
use std::net::{Ipv4Addr, Ipv6Addr};
use std::path::{Path, PathBuf};

use log::debug;

use crate::error::SourceError;
use crate::source::records::{RawIpConnection, RawTcpStats, RawThread, RawUdpStats};

/// Fields of `/proc/[pid]/stat` and `/proc/[pid]/task/[tid]/stat` that the
/// adapter uses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcStat {
    pub pid: u32,
    pub comm: String,
    pub state: char,
    pub ppid: u32,
    pub minflt: i64,
    pub majflt: i64,
    pub utime: i64,
    pub stime: i64,
    pub priority: i32,
    pub num_threads: u32,
    pub starttime: i64,
    pub vsize: i64,
    pub startcode: i64,
}

/// Parse `/proc/[pid]/stat`.
///
/// The comm field may contain spaces and parentheses, so it is located by
/// the first `(` and the last `)`.
pub fn parse_proc_stat(content: &str) -> Result<ProcStat, SourceError> {
    let content = content.trim();
    let open = content
        .find('(')
        .ok_or_else(|| SourceError::parse("missing '(' in stat"))?;
    let close = content
        .rfind(')')
        .ok_or_else(|| SourceError::parse("missing ')' in stat"))?;
    if close <= open {
        return Err(SourceError::parse("invalid parentheses in stat"));
    }

    let pid = content[..open]
        .trim()
        .parse()
        .map_err(|_| SourceError::parse("invalid pid in stat"))?;
    let comm = content[open + 1..close].to_string();
    let fields: Vec<&str> = content[close + 1..].split_whitespace().collect();

    // fields[0] is the state (stat field 3)
    if fields.len() < 24 {
        return Err(SourceError::parse(format!(
            "not enough fields in stat: expected 24+, got {}",
            fields.len()
        )));
    }

    let num = |idx: usize, name: &str| -> Result<i64, SourceError> {
        fields[idx]
            .parse::<i64>()
            .or_else(|_| fields[idx].parse::<u64>().map(|v| v as i64))
            .map_err(|_| SourceError::parse(format!("invalid {} in stat", name)))
    };

    Ok(ProcStat {
        pid,
        comm,
        state: fields[0].chars().next().unwrap_or('?'),
        ppid: num(1, "ppid")? as u32,
        minflt: num(7, "minflt")?,
        majflt: num(9, "majflt")?,
        utime: num(11, "utime")?,
        stime: num(12, "stime")?,
        priority: num(15, "priority")? as i32,
        num_threads: num(17, "num_threads")? as u32,
        starttime: num(19, "starttime")?,
        vsize: num(20, "vsize")?,
        startcode: num(23, "startcode")?,
    })
}

/// Raw state name for a `/proc` state letter
pub fn state_name(state: char) -> &'static str {
    match state {
        'R' | 'W' => "RUNNING",
        'S' | 'I' | 'P' | 'K' => "SLEEPING",
        'D' => "WAITING",
        'Z' => "ZOMBIE",
        'T' | 't' => "STOPPED",
        'X' | 'x' => "INVALID",
        _ => "OTHER",
    }
}

/// Value of a `Key:\tvalue` line from `/proc/[pid]/status`
pub fn status_field<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        (k == key).then(|| v.trim())
    })
}

/// First column of a status id line (`Uid:` / `Gid:` hold real, effective,
/// saved and fs ids)
pub fn status_id(content: &str, key: &str) -> Option<u32> {
    status_field(content, key)?.split_whitespace().next()?.parse().ok()
}

/// Low 64 bits of a `Cpus_allowed` mask. The kernel prints comma-separated
/// 32-bit hex words, most significant first.
pub fn parse_cpus_allowed(value: &str) -> Option<i64> {
    let words: Vec<&str> = value.trim().split(',').collect();
    let low = &words[words.len().saturating_sub(2)..];
    let mut mask: u64 = 0;
    for word in low {
        mask = (mask << 32) | u64::from(u32::from_str_radix(word, 16).ok()?);
    }
    Some(mask as i64)
}

/// Soft and hard `Max open files` from `/proc/[pid]/limits`.
/// `unlimited` maps to `i64::MAX`.
pub fn parse_open_file_limits(content: &str) -> Option<(i64, i64)> {
    let line = content.lines().find(|l| l.starts_with("Max open files"))?;
    let mut values = line["Max open files".len()..].split_whitespace();
    let parse = |v: &str| {
        if v == "unlimited" {
            Some(i64::MAX)
        } else {
            v.parse().ok()
        }
    };
    let soft = parse(values.next()?)?;
    let hard = parse(values.next()?)?;
    Some((soft, hard))
}

/// Header/value line pairs from `/proc/net/snmp`, keyed by protocol
fn snmp_tables(content: &str) -> HashMap<&str, HashMap<&str, i64>> {
    let mut tables = HashMap::new();
    let mut lines = content.lines();

    while let (Some(header), Some(values)) = (lines.next(), lines.next()) {
        let (Some((proto, names)), Some((_, numbers))) =
            (header.split_once(':'), values.split_once(':'))
        else {
            continue;
        };
        let row = names
            .split_whitespace()
            .zip(numbers.split_whitespace())
            .filter_map(|(name, value)| value.parse().ok().map(|v| (name, v)))
            .collect();
        tables.insert(proto, row);
    }
    tables
}

/// TCP and UDP counters from `/proc/net/snmp`
pub fn parse_snmp(content: &str) -> (RawTcpStats, RawUdpStats) {
    let tables = snmp_tables(content);
    let empty = HashMap::new();
    let tcp = tables.get("Tcp").unwrap_or(&empty);
    let udp = tables.get("Udp").unwrap_or(&empty);
    let get = |table: &HashMap<&str, i64>, key: &str| table.get(key).copied().unwrap_or(0);

    (
        RawTcpStats {
            connections_established: get(tcp, "CurrEstab"),
            connections_active: get(tcp, "ActiveOpens"),
            connections_passive: get(tcp, "PassiveOpens"),
            connection_failures: get(tcp, "AttemptFails"),
            connections_reset: get(tcp, "EstabResets"),
            segments_sent: get(tcp, "OutSegs"),
            segments_received: get(tcp, "InSegs"),
            segments_retransmitted: get(tcp, "RetransSegs"),
            in_errors: get(tcp, "InErrs"),
            out_resets: get(tcp, "OutRsts"),
        },
        RawUdpStats {
            datagrams_sent: get(udp, "OutDatagrams"),
            datagrams_received: get(udp, "InDatagrams"),
            datagrams_no_port: get(udp, "NoPorts"),
            datagrams_received_errors: get(udp, "InErrors"),
        },
    )
}

/// UDP counters from `/proc/net/snmp6` (`Name value` lines)
pub fn parse_snmp6_udp(content: &str) -> RawUdpStats {
    let values: HashMap<&str, i64> = content
        .lines()
        .filter_map(|line| {
            let mut parts = line.split_whitespace();
            Some((parts.next()?, parts.next()?.parse().ok()?))
        })
        .collect();
    let get = |key: &str| values.get(key).copied().unwrap_or(0);

    RawUdpStats {
        datagrams_sent: get("Udp6OutDatagrams"),
        datagrams_received: get("Udp6InDatagrams"),
        datagrams_no_port: get("Udp6NoPorts"),
        datagrams_received_errors: get("Udp6InErrors"),
    }
}

/// Raw TCP state name for a kernel state code
pub fn tcp_state_name(code: u8) -> &'static str {
    match code {
        0x01 => "ESTABLISHED",
        0x02 => "SYN_SENT",
        0x03 | 0x0C => "SYN_RECV",
        0x04 => "FIN_WAIT_1",
        0x05 => "FIN_WAIT_2",
        0x06 => "TIME_WAIT",
        0x07 => "CLOSED",
        0x08 => "CLOSE_WAIT",
        0x09 => "LAST_ACK",
        0x0A => "LISTEN",
        0x0B => "CLOSING",
        _ => "UNKNOWN",
    }
}

/// Decode a `/proc/net/{tcp,udp}[6]` address.
///
/// The kernel prints each 32-bit word of the address in host byte order.
fn decode_socket_address(hex: &str) -> Option<(String, u16)> {
    let (addr, port) = hex.split_once(':')?;
    let port = u16::from_str_radix(port, 16).ok()?;

    let words = (0..addr.len() / 8)
        .map(|i| u32::from_str_radix(&addr[i * 8..i * 8 + 8], 16).map(u32::to_ne_bytes))
        .collect::<Result<Vec<_>, _>>()
        .ok()?;

    let ip = match words.len() {
        1 => Ipv4Addr::from(words[0]).to_string(),
        4 => {
            let mut octets = [0u8; 16];
            for (i, word) in words.iter().enumerate() {
                octets[i * 4..i * 4 + 4].copy_from_slice(word);
            }
            Ipv6Addr::from(octets).to_string()
        }
        _ => return None,
    };
    Some((ip, port))
}

/// One socket table row plus its inode, used to find the owning process
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocketEntry {
    pub connection: RawIpConnection,
    pub inode: u64,
}

/// Parse a socket table. `kind` is the connection type to record
/// (`tcp4`, `tcp6`, `udp4`, `udp6`); UDP rows get the `NONE` state.
pub fn parse_socket_table(content: &str, kind: &str) -> Vec<SocketEntry> {
    let is_tcp = kind.starts_with("tcp");

    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() < 10 {
                return None;
            }
            let (local_address, local_port) = decode_socket_address(fields[1])?;
            let (foreign_address, foreign_port) = decode_socket_address(fields[2])?;
            let state = if is_tcp {
                tcp_state_name(u8::from_str_radix(fields[3], 16).ok()?)
            } else {
                "NONE"
            };
            let (tx, rx) = fields[4].split_once(':')?;

            Some(SocketEntry {
                connection: RawIpConnection {
                    connection_type: kind.to_string(),
                    local_address,
                    local_port,
                    foreign_address,
                    foreign_port,
                    state: state.to_string(),
                    transmit_queue: i64::from_str_radix(tx, 16).ok()?,
                    receive_queue: i64::from_str_radix(rx, 16).ok()?,
                    owning_process_id: -1,
                },
                inode: fields[9].parse().ok()?,
            })
        })
        .collect()
}

/// Default IPv4 gateway from `/proc/net/route`
pub fn parse_ipv4_default_gateway(content: &str) -> Option<String> {
    content.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 || fields[1] != "00000000" || fields[7] != "00000000" {
            return None;
        }
        let gateway = u32::from_str_radix(fields[2], 16).ok()?;
        (gateway != 0).then(|| Ipv4Addr::from(gateway.to_ne_bytes()).to_string())
    })
}

/// Default IPv6 gateway from `/proc/net/ipv6_route`
pub fn parse_ipv6_default_gateway(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 10 || fields[1] != "00" || u128::from_str_radix(fields[0], 16).ok()? != 0 {
            return None;
        }
        let next_hop = u128::from_str_radix(fields[4], 16).ok()?;
        (next_hop != 0).then(|| Ipv6Addr::from(next_hop).to_string())
    })
}

/// Search domain and name servers from `resolv.conf`.
///
/// `domain` wins over the first `search` entry when both are present.
pub fn parse_resolv_conf(content: &str) -> (String, Vec<String>) {
    let mut domain = None;
    let mut search = None;
    let mut servers = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') {
            continue;
        }
        let mut parts = line.split_whitespace();
        match (parts.next(), parts.next()) {
            (Some("nameserver"), Some(server)) => servers.push(server.to_string()),
            (Some("domain"), Some(name)) => domain = Some(name.to_string()),
            (Some("search"), Some(name)) if search.is_none() => search = Some(name.to_string()),
            _ => {}
        }
    }

    (domain.or(search).unwrap_or_default(), servers)
}

/// A row of `/proc/partitions`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionEntry {
    pub major: u32,
    pub minor: u32,
    /// Size in 1 KiB blocks
    pub blocks: i64,
    pub name: String,
}

pub fn parse_partitions(content: &str) -> Vec<PartitionEntry> {
    content
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.len() != 4 {
                return None;
            }
            Some(PartitionEntry {
                major: fields[0].parse().ok()?,
                minor: fields[1].parse().ok()?,
                blocks: fields[2].parse().ok()?,
                name: fields[3].to_string(),
            })
        })
        .collect()
}

/// Parse `/etc/group` into a gid -> group name map.
///
/// Format: name:password:gid:members
pub fn parse_group(content: &str) -> HashMap<u32, String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let parts: Vec<&str> = line.split(':').collect();
            let gid = parts.get(2)?.parse().ok()?;
            Some((gid, parts[0].to_string()))
        })
        .collect()
}

/// `/proc/meminfo` values in bytes, keyed by field name
pub fn parse_meminfo(content: &str) -> HashMap<String, i64> {
    content
        .lines()
        .filter_map(|line| {
            let (key, rest) = line.split_once(':')?;
            let mut parts = rest.split_whitespace();
            let value: i64 = parts.next()?.parse().ok()?;
            let scale = if parts.next() == Some("kB") { 1024 } else { 1 };
            Some((key.to_string(), value * scale))
        })
        .collect()
}

/// `/proc/vmstat` counters
pub fn parse_vmstat(content: &str) -> HashMap<String, i64> {
    content
        .lines()
        .filter_map(|line| {
            let (key, value) = line.split_once(' ')?;
            Some((key.to_string(), value.trim().parse().ok()?))
        })
        .collect()
}

/// Allocated and maximum handles from `/proc/sys/fs/file-nr`
pub fn parse_file_nr(content: &str) -> Option<(i64, i64)> {
    let fields: Vec<i64> = content
        .split_whitespace()
        .filter_map(|v| v.parse().ok())
        .collect();
    match fields.as_slice() {
        [allocated, _, max] => Some((*allocated, *max)),
        _ => None,
    }
}

/// Total thread count from the `running/total` column of `/proc/loadavg`
pub fn parse_loadavg_threads(content: &str) -> Option<u32> {
    let field = content.split_whitespace().nth(3)?;
    field.split_once('/')?.1.parse().ok()
}

/// Bitness from the first bytes of an ELF image (`EI_CLASS`)
pub fn elf_bitness(header: &[u8]) -> u32 {
    match header {
        [0x7f, b'E', b'L', b'F', 1, ..] => 32,
        [0x7f, b'E', b'L', b'F', 2, ..] => 64,
        _ => 0,
    }
}

/// Per-process values not covered by `sysinfo`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessExtras {
    pub stat: ProcStat,
    pub uid: Option<u32>,
    pub gid: Option<u32>,
    pub context_switches: i64,
    pub open_files: i64,
    pub open_file_limits: Option<(i64, i64)>,
    pub bitness: u32,
    pub affinity_mask: Option<i64>,
}

/// Time conversion for `/proc` tick counters
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    pub ticks_per_second: i64,
    pub boot_time_ms: i64,
    pub now_ms: i64,
}

impl Clock {
    pub fn ticks_to_ms(&self, ticks: i64) -> i64 {
        ticks.saturating_mul(1000) / self.ticks_per_second.max(1)
    }

    /// Start time in epoch milliseconds for a `starttime` tick value
    pub fn start_time_ms(&self, starttime: i64) -> i64 {
        self.boot_time_ms.saturating_add(self.ticks_to_ms(starttime))
    }
}

fn to_source_error(path: &Path, e: io::Error) -> SourceError {
    if e.kind() == io::ErrorKind::PermissionDenied {
        SourceError::PermissionDenied(path.display().to_string())
    } else {
        SourceError::Io(e)
    }
}

/// File access to a `/proc`-like tree rooted at `root`
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
}

impl ProcFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn read(&self, relative: impl AsRef<Path>) -> Result<String, SourceError> {
        let path = self.root.join(relative);
        fs::read_to_string(&path).map_err(|e| to_source_error(&path, e))
    }

    pub fn stat(&self, pid: u32) -> Result<ProcStat, SourceError> {
        parse_proc_stat(&self.read(format!("{}/stat", pid))?)
    }

    /// Extras for one process. Only `stat` is required; the other files are
    /// often unreadable for processes of other users and fall back to empty
    /// values.
    pub fn process_extras(&self, pid: u32) -> Result<ProcessExtras, SourceError> {
        let stat = self.stat(pid)?;
        let status = self.read(format!("{}/status", pid)).unwrap_or_default();
        let context_switches = ["voluntary_ctxt_switches", "nonvoluntary_ctxt_switches"]
            .iter()
            .filter_map(|key| status_field(&status, key)?.parse::<i64>().ok())
            .sum();
        let open_files = fs::read_dir(self.root.join(format!("{}/fd", pid)))
            .map(|entries| entries.count() as i64)
            .unwrap_or(0);
        let open_file_limits = self
            .read(format!("{}/limits", pid))
            .ok()
            .and_then(|limits| parse_open_file_limits(&limits));
        let mut header = [0u8; 5];
        let bitness = fs::File::open(self.root.join(format!("{}/exe", pid)))
            .and_then(|mut exe| exe.read_exact(&mut header))
            .map(|_| elf_bitness(&header))
            .unwrap_or(0);

        Ok(ProcessExtras {
            stat,
            uid: status_id(&status, "Uid"),
            gid: status_id(&status, "Gid"),
            context_switches,
            open_files,
            open_file_limits,
            bitness,
            affinity_mask: status_field(&status, "Cpus_allowed").and_then(parse_cpus_allowed),
        })
    }

    /// One thread of `pid`
    pub fn thread(&self, pid: u32, tid: u32, clock: &Clock) -> Result<RawThread, SourceError> {
        let task = format!("{}/task/{}", pid, tid);
        let stat = parse_proc_stat(&self.read(format!("{}/stat", task))?)?;
        let status = self.read(format!("{}/status", task)).unwrap_or_default();
        let context_switches = ["voluntary_ctxt_switches", "nonvoluntary_ctxt_switches"]
            .iter()
            .filter_map(|key| status_field(&status, key)?.parse::<i64>().ok())
            .sum();
        let start_time = clock.start_time_ms(stat.starttime);
        let kernel_time = clock.ticks_to_ms(stat.stime);
        let user_time = clock.ticks_to_ms(stat.utime);
        let up_time = (clock.now_ms - start_time).max(0);
        let cpu_load_cumulative = if up_time > 0 {
            (kernel_time + user_time) as f64 / up_time as f64
        } else {
            0.0
        };

        Ok(RawThread {
            thread_id: stat.pid,
            owning_process_id: pid,
            name: stat.comm.clone(),
            state: state_name(stat.state).to_string(),
            cpu_load_cumulative,
            start_memory_address: stat.startcode,
            context_switches,
            minor_faults: stat.minflt,
            major_faults: stat.majflt,
            kernel_time,
            user_time,
            up_time,
            start_time,
            priority: stat.priority,
        })
    }

    /// Threads of `pid` in ascending thread id order. Threads that exit
    /// while the table is read are dropped.
    pub fn threads(&self, pid: u32, clock: &Clock) -> Result<Vec<RawThread>, SourceError> {
        let task_dir = self.root.join(format!("{}/task", pid));
        let mut tids: Vec<u32> = fs::read_dir(&task_dir)
            .map_err(|e| to_source_error(&task_dir, e))?
            .filter_map(|entry| entry.ok()?.file_name().to_str()?.parse().ok())
            .collect();
        tids.sort_unstable();

        Ok(tids
            .into_iter()
            .filter_map(|tid| match self.thread(pid, tid, clock) {
                Ok(thread) => Some(thread),
                Err(e) => {
                    debug!("Thread {} of process {} vanished: {}", tid, pid, e);
                    None
                }
            })
            .collect())
    }

    /// Map socket inode -> owning pid by walking `/proc/[pid]/fd`.
    /// Processes whose descriptors cannot be read are skipped.
    pub fn socket_owners(&self) -> HashMap<u64, u32> {
        let mut owners = HashMap::new();
        let Ok(entries) = fs::read_dir(&self.root) else {
            return owners;
        };

        for entry in entries.flatten() {
            let Some(pid) = entry.file_name().to_str().and_then(|n| n.parse::<u32>().ok()) else {
                continue;
            };
            let Ok(fds) = fs::read_dir(entry.path().join("fd")) else {
                continue;
            };
            for fd in fds.flatten() {
                let Ok(target) = fs::read_link(fd.path()) else {
                    continue;
                };
                let target = target.to_string_lossy();
                if let Some(inode) = target
                    .strip_prefix("socket:[")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .and_then(|inode| inode.parse().ok())
                {
                    owners.entry(inode).or_insert(pid);
                }
            }
        }
        owners
    }

    /// All four socket tables, tagged with their owning process
    pub fn connections(&self) -> Result<Vec<RawIpConnection>, SourceError> {
        let owners = self.socket_owners();
        let mut connections = Vec::new();

        for (file, kind) in [
            ("net/tcp", "tcp4"),
            ("net/tcp6", "tcp6"),
            ("net/udp", "udp4"),
            ("net/udp6", "udp6"),
        ] {
            let content = match self.read(file) {
                Ok(content) => content,
                // IPv6 may be disabled
                Err(SourceError::Io(e)) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e),
            };
            connections.extend(parse_socket_table(&content, kind).into_iter().map(|entry| {
                let mut connection = entry.connection;
                if let Some(pid) = owners.get(&entry.inode) {
                    connection.owning_process_id = i64::from(*pid);
                }
                connection
            }));
        }
        Ok(connections)
    }
}
