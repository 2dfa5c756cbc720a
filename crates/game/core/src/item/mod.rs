//! Items: static records, spawned instances and their capabilities.
mod dialogue;
mod error;
mod instance;
mod motion;
mod record;
mod shake;
mod visual;

pub use dialogue::{DialogueCue, DialogueTimer};
pub use error::ItemConfigError;
pub use instance::{
    DragBeginOutcome, DragEndOutcome, DragMoveOutcome, ItemContext, ItemInstance, ItemPhase,
    ItemState, ItemTickReport, PrerequisiteGate,
};
pub use motion::WanderMotion;
pub use record::ItemRecord;
pub use shake::ShakeDetector;
pub use visual::{InstanceFlags, LegsState, SortingLayer};
