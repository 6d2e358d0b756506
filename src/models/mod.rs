//! Public snapshot entities.
//!
//! Every type here is an immutable value built fresh by a query. Nothing in
//! this module talks to the platform; see [`crate::source`] for that and
//! [`crate::translate`] for the mapping between the two.

mod hardware;
mod mobile;
mod network;
mod os;

pub use hardware::{
    FileSystem, GlobalMemory, GraphicsCard, HWPartition, OSFileStore, PhysicalMemory,
    VirtualMemory,
};
pub use mobile::{
    AndroidBuild, DeviceOrientation, DisplayMetrics, IosDevice, UIDeviceOrientation,
};
pub use network::{
    IPConnection, IfOperStatus, InternetProtocolStats, NetworkInterface, NetworkParams,
    TcpState, TcpStats, UdpStats,
};
pub use os::{
    OSDesktopWindow, OSProcess, OSService, OSSession, OSThread, OSVersionInfo, ServiceState,
    State,
};
