//! Level phases: ordered sub-segments ended by a timer or an external signal.
mod error;
mod manager;
mod script;

pub use error::PhaseError;
pub use manager::{LevelPhaseManager, PhaseAdvance};
pub use script::{PhaseAction, PhaseDescriptor, PhaseKind, PhaseScript};
