use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Decision for one price observation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Enter a position
    Buy,
    /// Exit the position
    Sell,
    /// Do nothing
    Hold,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Buy => write!(f, "BUY"),
            Action::Sell => write!(f, "SELL"),
            Action::Hold => write!(f, "HOLD"),
        }
    }
}

/// Position state owned by the strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    /// No position held
    NoPosition,
    /// One position is open
    OpenPosition,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::NoPosition => write!(f, "NONE"),
            Position::OpenPosition => write!(f, "OPEN"),
        }
    }
}

/// Immutable trigger parameters, set at construction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyParams {
    /// Reference price the triggers are offset from
    pub threshold_price: Decimal,
    /// Buy trigger offset below the threshold, in basis points
    pub buy_bps_below: u32,
    /// Sell trigger offset above the threshold, in basis points
    pub sell_bps_above: u32,
}

impl StrategyParams {
    pub fn new(threshold_price: Decimal, buy_bps_below: u32, sell_bps_above: u32) -> Self {
        Self {
            threshold_price,
            buy_bps_below,
            sell_bps_above,
        }
    }
}
