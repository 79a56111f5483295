use rust_decimal::Decimal;

use super::types::{Action, Position};

/// Core strategy trait
///
/// # Contract
///
/// - `decide` is a pure function of current state and price: it never
///   errors and never mutates.
/// - `apply_confirmed` is the only mutator of position state and must
///   be called at most once per accepted action, only after execution
///   confirmed success. A failed or timed-out execution must not reach
///   it.
/// - Callers serialize the two: no `decide` for a new observation while
///   a previous action's confirmation is outstanding.
pub trait Strategy: Send {
    /// Unique identifier for this strategy
    fn name(&self) -> &str;

    /// Map a price observation to an action given current state
    fn decide(&self, price: Decimal) -> Action;

    /// Record a confirmed action, transitioning position state
    fn apply_confirmed(&mut self, action: Action);

    /// Current position state
    fn position(&self) -> Position;
}

/// Boxed strategy for dynamic dispatch
pub type BoxedStrategy = Box<dyn Strategy>;
