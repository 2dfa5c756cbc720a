//! Slot occupancy and the managers that own it.
mod board;
mod error;
mod manager;

pub use board::SlotBoard;
pub use error::OccupyError;
pub use manager::{CompletionRoute, CompletionSignal, PositionManager};
