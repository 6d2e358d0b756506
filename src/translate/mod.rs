//! Entity translators and collection loaders.
//!
//! A translator turns one raw record into one public entity. It copies
//! fields, re-maps raw enum values, and fails with
//! [`SnapshotError::Mapping`](crate::error::SnapshotError::Mapping) when a raw
//! value has no public counterpart. Translators never return a partially
//! filled entity and have no side effects.
//!
//! [`load_many`] applies a translator to a list of raw records, keeping the
//! source order.

mod hardware;
mod mobile;
mod network;
mod os;
mod process;

pub use hardware::{translate_graphics_card, translate_memory, translate_partition};
pub use mobile::{translate_android_build, translate_display_metrics, translate_ios_device, ui_orientation};
pub use network::{
    if_oper_status, tcp_state, translate_connection, translate_network_interface,
    translate_network_params, translate_protocol_stats,
};
pub use os::{
    service_state, translate_desktop_window, translate_file_system, translate_service,
    translate_session, translate_version,
};
pub use process::{process_state, translate_process, translate_thread};

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// What a loader does when one element fails to translate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadPolicy {
    /// Abort the whole load with the first error
    #[default]
    Strict,
    /// Skip the element, log it, and keep going
    Lenient,
}

/// Translate `records` in order.
///
/// `output[i]` comes from `records[i]` for every element that was kept. An
/// empty input yields an empty output under either policy.
pub fn load_many<R, T, F>(
    records: Vec<R>,
    policy: LoadPolicy,
    what: &'static str,
    mut translate: F,
) -> Result<Vec<T>>
where
    F: FnMut(R) -> Result<T>,
{
    let mut result = Vec::with_capacity(records.len());
    let mut skipped = 0usize;

    for (index, record) in records.into_iter().enumerate() {
        match translate(record) {
            Ok(entity) => result.push(entity),
            Err(e) if policy == LoadPolicy::Lenient => {
                warn!("Skipping {} #{}: {}", what, index, e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        warn!("Loaded {} {} records, skipped {}", result.len(), what, skipped);
    }

    Ok(result)
}
