pub mod record;
pub mod sector;
pub mod snapshot;
pub mod week;

pub use record::{EarningsRecord, RecordSource};
pub use sector::SectorFilter;
pub use snapshot::{Preview, Snapshot, SnapshotDocument};
pub use week::{WeekDescriptor, WeekRef};

use serde::{Deserialize, Deserializer};

/// Reads an explicit `null` as the field's default. Published snapshots emit
/// `null` for columns the generator had no value for.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
