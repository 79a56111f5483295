//! Strategy module for trade decision making
//!
//! A strategy is a pure decision state machine: each price observation
//! maps to exactly one [`Action`], and position state only ever changes
//! through [`Strategy::apply_confirmed`] after an execution confirms.
//! The orchestrator guarantees the two are never interleaved: no new
//! decision is evaluated while a previous action's confirmation is
//! outstanding, so at most one position transition is pending at any
//! time.

mod threshold;
mod traits;
mod types;

pub use threshold::ThresholdStrategy;
pub use traits::{BoxedStrategy, Strategy};
pub use types::{Action, Position, StrategyParams};
