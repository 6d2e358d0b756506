//! Network entities: interfaces, host network parameters and protocol
//! statistics.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Operational status of a network interface (RFC 2863)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IfOperStatus {
    Up,
    Down,
    Testing,
    Unknown,
    Dormant,
    NotPresent,
    LowerLayerDown,
}

impl fmt::Display for IfOperStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IfOperStatus::Up => "Up",
            IfOperStatus::Down => "Down",
            IfOperStatus::Testing => "Testing",
            IfOperStatus::Unknown => "Unknown",
            IfOperStatus::Dormant => "Dormant",
            IfOperStatus::NotPresent => "NotPresent",
            IfOperStatus::LowerLayerDown => "LowerLayerDown",
        };
        write!(f, "{}", name)
    }
}

/// A network interface and its traffic counters.
///
/// `ipv4addr[i]` pairs with `subnet_masks[i]` and `ipv6addr[i]` with
/// `prefix_lengths[i]`; both pairs always have equal lengths. Counters are
/// passed through from the raw source without sign checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInterface {
    pub name: String,
    pub index: u32,
    pub display_name: String,
    pub if_alias: String,
    pub if_oper_status: IfOperStatus,
    pub mtu: i64,
    pub mac_addr: String,
    pub ipv4addr: Vec<String>,
    pub subnet_masks: Vec<u8>,
    pub ipv6addr: Vec<String>,
    pub prefix_lengths: Vec<u8>,
    pub bytes_recv: i64,
    pub bytes_sent: i64,
    pub packets_recv: i64,
    pub packets_sent: i64,
    pub in_errors: i64,
    pub out_errors: i64,
    pub in_drops: i64,
    pub collisions: i64,
    /// Link speed in bits per second
    pub speed: i64,
    /// When the counters were read, milliseconds since the epoch
    pub timestamp: i64,
    pub is_known_vm_mac_addr: bool,
    /// Hardware type (IANA ifType on Windows, ARPHRD_* on Linux)
    pub if_type: i32,
    /// NDIS physical medium, 0 outside Windows
    pub ndis_physical_medium_type: i32,
    /// Whether a cable or carrier is detected
    pub connector_present: bool,
}

/// Host-wide network configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkParams {
    pub host_name: String,
    pub domain_name: String,
    pub dns_servers: Vec<String>,
    pub ipv4_default_gateway: String,
    pub ipv6_default_gateway: String,
}

/// TCP counters for one IP version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TcpStats {
    pub connections_established: i64,
    pub connections_active: i64,
    pub connections_passive: i64,
    pub connection_failures: i64,
    pub connections_reset: i64,
    pub segments_sent: i64,
    pub segments_received: i64,
    pub segments_retransmitted: i64,
    pub in_errors: i64,
    pub out_resets: i64,
}

/// UDP counters for one IP version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UdpStats {
    pub datagrams_sent: i64,
    pub datagrams_received: i64,
    pub datagrams_no_port: i64,
    pub datagrams_received_errors: i64,
}

/// State of a TCP connection. UDP sockets report [`TcpState::None`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TcpState {
    Unknown,
    Closed,
    Listen,
    SynSent,
    SynRecv,
    Established,
    FinWait1,
    FinWait2,
    CloseWait,
    Closing,
    LastAck,
    TimeWait,
    None,
}

impl fmt::Display for TcpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TcpState::Unknown => "UNKNOWN",
            TcpState::Closed => "CLOSED",
            TcpState::Listen => "LISTEN",
            TcpState::SynSent => "SYN_SENT",
            TcpState::SynRecv => "SYN_RECV",
            TcpState::Established => "ESTABLISHED",
            TcpState::FinWait1 => "FIN_WAIT_1",
            TcpState::FinWait2 => "FIN_WAIT_2",
            TcpState::CloseWait => "CLOSE_WAIT",
            TcpState::Closing => "CLOSING",
            TcpState::LastAck => "LAST_ACK",
            TcpState::TimeWait => "TIME_WAIT",
            TcpState::None => "NONE",
        };
        write!(f, "{}", name)
    }
}

/// One socket from the kernel connection tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IPConnection {
    /// Protocol, e.g. `tcp4`, `tcp6`, `udp4`, `udp6`
    pub connection_type: String,
    pub local_address: String,
    pub local_port: u16,
    pub foreign_address: String,
    pub foreign_port: u16,
    pub state: TcpState,
    pub transmit_queue: i64,
    pub receive_queue: i64,
    /// Owning process, -1 when it could not be determined
    pub owning_process_id: i64,
}

/// Protocol counters plus the live connection list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternetProtocolStats {
    pub tcp_v4: TcpStats,
    pub tcp_v6: TcpStats,
    pub udp_v4: UdpStats,
    pub udp_v6: UdpStats,
    pub connections: Vec<IPConnection>,
}
