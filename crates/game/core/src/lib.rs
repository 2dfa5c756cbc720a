//! Deterministic placement rules shared by every front end.
//!
//! `snapfit-core` owns the item state machine, slot occupancy, level phases
//! and the [`Level`] aggregate that ties them together. It performs no I/O:
//! presentation side effects leave through the optional [`Ports`], and all
//! randomness comes from an [`RngOracle`] seeded per level.
pub mod config;
pub mod env;
pub mod error;
pub mod item;
pub mod level;
pub mod phase;
pub mod position;
pub mod state;
pub mod timing;

pub use config::{GameConfig, SettlePolicy};
pub use env::{
    AudioPort, CompletionPort, Dice, LabelPort, PcgRng, Ports, RngOracle, RollContext, SoundEffect,
    UiPort, compute_seed,
};
pub use error::{ErrorSeverity, GameError};
pub use item::{
    DragBeginOutcome, DragEndOutcome, DragMoveOutcome, InstanceFlags, ItemConfigError,
    ItemInstance, ItemPhase, ItemRecord, ItemState, LegsState, PrerequisiteGate, ShakeDetector,
    SortingLayer, WanderMotion,
};
pub use level::{
    DropFailure, InputEvent, Level, LevelDefinition, LevelError, LevelEvent, ManagerDefinition,
};
pub use phase::{
    LevelPhaseManager, PhaseAction, PhaseAdvance, PhaseDescriptor, PhaseError, PhaseKind,
    PhaseScript,
};
pub use position::{CompletionRoute, CompletionSignal, OccupyError, PositionManager, SlotBoard};
pub use state::{
    Bounds, InstanceId, ItemId, ItemSnapshot, LevelSnapshot, ManagerId, ManagerSnapshot,
    PhaseSnapshot, SlotId, SlotSnapshot, Vec2,
};
pub use timing::Countdown;
