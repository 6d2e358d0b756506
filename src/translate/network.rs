use crate::constants::KNOWN_VM_MAC_PREFIXES;
use crate::error::{Result, SnapshotError};
use crate::models::{
    IPConnection, IfOperStatus, InternetProtocolStats, NetworkInterface, NetworkParams, TcpState,
    TcpStats, UdpStats,
};
use crate::source::{
    RawIpConnection, RawNetworkInterface, RawNetworkParams, RawProtocolStats, RawTcpStats,
    RawUdpStats,
};

use super::{load_many, LoadPolicy};

pub fn if_oper_status(raw: &str) -> Result<IfOperStatus> {
    match raw {
        "UP" => Ok(IfOperStatus::Up),
        "DOWN" => Ok(IfOperStatus::Down),
        "TESTING" => Ok(IfOperStatus::Testing),
        "UNKNOWN" => Ok(IfOperStatus::Unknown),
        "DORMANT" => Ok(IfOperStatus::Dormant),
        "NOT_PRESENT" => Ok(IfOperStatus::NotPresent),
        "LOWER_LAYER_DOWN" => Ok(IfOperStatus::LowerLayerDown),
        other => Err(SnapshotError::mapping("NetworkInterface.if_oper_status", other)),
    }
}

pub fn tcp_state(raw: &str) -> Result<TcpState> {
    match raw {
        "UNKNOWN" => Ok(TcpState::Unknown),
        "CLOSED" => Ok(TcpState::Closed),
        "LISTEN" => Ok(TcpState::Listen),
        "SYN_SENT" => Ok(TcpState::SynSent),
        "SYN_RECV" => Ok(TcpState::SynRecv),
        "ESTABLISHED" => Ok(TcpState::Established),
        "FIN_WAIT_1" => Ok(TcpState::FinWait1),
        "FIN_WAIT_2" => Ok(TcpState::FinWait2),
        "CLOSE_WAIT" => Ok(TcpState::CloseWait),
        "CLOSING" => Ok(TcpState::Closing),
        "LAST_ACK" => Ok(TcpState::LastAck),
        "TIME_WAIT" => Ok(TcpState::TimeWait),
        "NONE" => Ok(TcpState::None),
        other => Err(SnapshotError::mapping("IPConnection.state", other)),
    }
}

fn is_known_vm_mac(mac: &str) -> bool {
    let mac = mac.to_ascii_uppercase();
    KNOWN_VM_MAC_PREFIXES
        .iter()
        .any(|prefix| mac.starts_with(prefix))
}

/// Translate one interface.
///
/// Fails when an address list and its mask/prefix list differ in length.
pub fn translate_network_interface(source: RawNetworkInterface) -> Result<NetworkInterface> {
    if source.ipv4addr.len() != source.subnet_masks.len() {
        return Err(SnapshotError::mapping(
            "NetworkInterface.subnet_masks",
            format!(
                "{} masks for {} IPv4 addresses",
                source.subnet_masks.len(),
                source.ipv4addr.len()
            ),
        ));
    }
    if source.ipv6addr.len() != source.prefix_lengths.len() {
        return Err(SnapshotError::mapping(
            "NetworkInterface.prefix_lengths",
            format!(
                "{} prefixes for {} IPv6 addresses",
                source.prefix_lengths.len(),
                source.ipv6addr.len()
            ),
        ));
    }

    let if_oper_status = if_oper_status(&source.oper_status)?;
    let is_known_vm_mac_addr = is_known_vm_mac(&source.mac_addr);

    Ok(NetworkInterface {
        name: source.name,
        index: source.index,
        display_name: source.display_name,
        if_alias: source.if_alias,
        if_oper_status,
        mtu: source.mtu,
        mac_addr: source.mac_addr,
        ipv4addr: source.ipv4addr,
        subnet_masks: source.subnet_masks,
        ipv6addr: source.ipv6addr,
        prefix_lengths: source.prefix_lengths,
        bytes_recv: source.bytes_recv,
        bytes_sent: source.bytes_sent,
        packets_recv: source.packets_recv,
        packets_sent: source.packets_sent,
        in_errors: source.in_errors,
        out_errors: source.out_errors,
        in_drops: source.in_drops,
        collisions: source.collisions,
        speed: source.speed,
        timestamp: source.timestamp,
        is_known_vm_mac_addr,
        if_type: source.if_type,
        ndis_physical_medium_type: source.ndis_physical_medium_type,
        connector_present: source.connector_present,
    })
}

pub fn translate_network_params(source: RawNetworkParams) -> NetworkParams {
    NetworkParams {
        host_name: source.host_name,
        domain_name: source.domain_name,
        dns_servers: source.dns_servers,
        ipv4_default_gateway: source.ipv4_default_gateway,
        ipv6_default_gateway: source.ipv6_default_gateway,
    }
}

fn translate_tcp_stats(source: RawTcpStats) -> TcpStats {
    TcpStats {
        connections_established: source.connections_established,
        connections_active: source.connections_active,
        connections_passive: source.connections_passive,
        connection_failures: source.connection_failures,
        connections_reset: source.connections_reset,
        segments_sent: source.segments_sent,
        segments_received: source.segments_received,
        segments_retransmitted: source.segments_retransmitted,
        in_errors: source.in_errors,
        out_resets: source.out_resets,
    }
}

fn translate_udp_stats(source: RawUdpStats) -> UdpStats {
    UdpStats {
        datagrams_sent: source.datagrams_sent,
        datagrams_received: source.datagrams_received,
        datagrams_no_port: source.datagrams_no_port,
        datagrams_received_errors: source.datagrams_received_errors,
    }
}

pub fn translate_connection(source: RawIpConnection) -> Result<IPConnection> {
    Ok(IPConnection {
        state: tcp_state(&source.state)?,
        connection_type: source.connection_type,
        local_address: source.local_address,
        local_port: source.local_port,
        foreign_address: source.foreign_address,
        foreign_port: source.foreign_port,
        transmit_queue: source.transmit_queue,
        receive_queue: source.receive_queue,
        owning_process_id: source.owning_process_id,
    })
}

pub fn translate_protocol_stats(
    source: RawProtocolStats,
    policy: LoadPolicy,
) -> Result<InternetProtocolStats> {
    Ok(InternetProtocolStats {
        tcp_v4: translate_tcp_stats(source.tcp_v4),
        tcp_v6: translate_tcp_stats(source.tcp_v6),
        udp_v4: translate_udp_stats(source.udp_v4),
        udp_v6: translate_udp_stats(source.udp_v6),
        connections: load_many(source.connections, policy, "IPConnection", translate_connection)?,
    })
}
