pub mod common;

pub use common::{Bounds, InstanceId, ItemId, ManagerId, SlotId, Vec2};
