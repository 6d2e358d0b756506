use crate::error::Result;
use crate::models::{GlobalMemory, GraphicsCard, HWPartition, PhysicalMemory, VirtualMemory};
use crate::source::{RawGlobalMemory, RawGraphicsCard, RawPartition, RawPhysicalMemory};

use super::{load_many, LoadPolicy};

fn translate_physical_memory(source: RawPhysicalMemory) -> Result<PhysicalMemory> {
    Ok(PhysicalMemory {
        bank_label: source.bank_label,
        capacity: source.capacity,
        clock_speed: source.clock_speed,
        manufacturer: source.manufacturer,
        memory_type: source.memory_type,
    })
}

pub fn translate_memory(source: RawGlobalMemory, policy: LoadPolicy) -> Result<GlobalMemory> {
    Ok(GlobalMemory {
        total: source.total,
        available: source.available,
        page_size: source.page_size,
        virtual_memory: VirtualMemory {
            swap_total: source.swap_total,
            swap_used: source.swap_used,
            virtual_max: source.virtual_max,
            virtual_in_use: source.virtual_in_use,
            swap_pages_in: source.swap_pages_in,
            swap_pages_out: source.swap_pages_out,
        },
        physical_memory: load_many(
            source.physical_memory,
            policy,
            "PhysicalMemory",
            translate_physical_memory,
        )?,
    })
}

pub fn translate_graphics_card(source: RawGraphicsCard) -> Result<GraphicsCard> {
    Ok(GraphicsCard {
        name: source.name,
        device_id: source.device_id,
        vendor: source.vendor,
        version_info: source.version_info,
        vram: source.vram,
    })
}

pub fn translate_partition(source: RawPartition) -> Result<HWPartition> {
    Ok(HWPartition {
        identification: source.identification,
        name: source.name,
        partition_type: source.partition_type,
        uuid: source.uuid,
        size: source.size,
        major: source.major,
        minor: source.minor,
        mount_point: source.mount_point,
    })
}
