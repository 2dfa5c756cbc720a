//! Identifiers, geometry and read-only level views.
//!
//! Live state is owned by the level and its managers; this module holds the
//! small value types they share and the snapshots they hand to observers.
mod snapshot;
pub mod types;

pub use snapshot::{
    ItemSnapshot, LevelSnapshot, ManagerSnapshot, PhaseSnapshot, SlotSnapshot,
};
pub use types::{Bounds, InstanceId, ItemId, ManagerId, SlotId, Vec2};
