use std::sync::Arc;

use log::debug;

use crate::error::{QueryContext, Result};
use crate::models::{GlobalMemory, GraphicsCard, HWPartition, NetworkInterface};
use crate::source::RawSource;
use crate::translate::{
    load_many, translate_graphics_card, translate_memory, translate_network_interface,
    translate_partition, LoadPolicy,
};

/// Hardware view of the snapshot. Every accessor reads the source again.
pub struct Hardware {
    source: Arc<dyn RawSource>,
    policy: LoadPolicy,
}

impl Hardware {
    pub fn new(source: Arc<dyn RawSource>, policy: LoadPolicy) -> Self {
        Self { source, policy }
    }

    pub fn memory(&self) -> Result<GlobalMemory> {
        debug!("Querying memory");
        translate_memory(self.source.memory().query("memory")?, self.policy)
    }

    pub fn graphics_cards(&self) -> Result<Vec<GraphicsCard>> {
        debug!("Querying graphics_cards");
        let raw = self.source.graphics_cards().query("graphics_cards")?;
        load_many(raw, self.policy, "GraphicsCard", translate_graphics_card)
    }

    pub fn partitions(&self) -> Result<Vec<HWPartition>> {
        debug!("Querying partitions");
        let raw = self.source.partitions().query("partitions")?;
        load_many(raw, self.policy, "HWPartition", translate_partition)
    }

    pub fn network_interfaces(&self) -> Result<Vec<NetworkInterface>> {
        debug!("Querying network_interfaces");
        let raw = self.source.network_interfaces().query("network_interfaces")?;
        load_many(raw, self.policy, "NetworkInterface", translate_network_interface)
    }
}
