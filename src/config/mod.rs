mod snapshot_config;

pub use snapshot_config::{load_or_create_config, SnapshotConfig, SourcePaths};
