//! Basis-points threshold strategy

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::traits::Strategy;
use super::types::{Action, Position, StrategyParams};

/// Buys below, sells above a fixed threshold price
///
/// With no position open, a buy triggers when the price falls strictly
/// below `threshold * (1 - buy_bps_below/10000)`. With a position open,
/// a sell triggers when the price rises strictly above
/// `threshold * (1 + sell_bps_above/10000)`. A price exactly at either
/// trigger does nothing. The open/no-open guard makes the two triggers
/// mutually exclusive by construction.
pub struct ThresholdStrategy {
    params: StrategyParams,
    position: Position,
}

impl ThresholdStrategy {
    /// Create a strategy with no open position
    pub fn new(params: StrategyParams) -> Self {
        Self {
            params,
            position: Position::NoPosition,
        }
    }

    fn buy_trigger(&self) -> Decimal {
        self.params.threshold_price
            * (Decimal::ONE - Decimal::from(self.params.buy_bps_below) / dec!(10_000))
    }

    fn sell_trigger(&self) -> Decimal {
        self.params.threshold_price
            * (Decimal::ONE + Decimal::from(self.params.sell_bps_above) / dec!(10_000))
    }

    fn should_buy(&self, price: Decimal) -> bool {
        self.position == Position::NoPosition && price < self.buy_trigger()
    }

    fn should_sell(&self, price: Decimal) -> bool {
        self.position == Position::OpenPosition && price > self.sell_trigger()
    }
}

impl Strategy for ThresholdStrategy {
    fn name(&self) -> &str {
        "threshold"
    }

    fn decide(&self, price: Decimal) -> Action {
        if self.should_buy(price) {
            Action::Buy
        } else if self.should_sell(price) {
            Action::Sell
        } else {
            Action::Hold
        }
    }

    fn apply_confirmed(&mut self, action: Action) {
        match action {
            Action::Buy => self.position = Position::OpenPosition,
            Action::Sell => self.position = Position::NoPosition,
            Action::Hold => {}
        }
    }

    fn position(&self) -> Position {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn strategy() -> ThresholdStrategy {
        // threshold 100, 5% band on both sides
        ThresholdStrategy::new(StrategyParams::new(dec!(100), 500, 500))
    }

    fn open_strategy() -> ThresholdStrategy {
        let mut s = strategy();
        s.apply_confirmed(Action::Buy);
        s
    }

    #[test]
    fn test_buys_below_trigger_with_no_position() {
        assert_eq!(strategy().decide(dec!(94.99)), Action::Buy);
    }

    #[test]
    fn test_holds_above_buy_trigger() {
        assert_eq!(strategy().decide(dec!(95.01)), Action::Hold);
    }

    #[test]
    fn test_price_exactly_at_buy_trigger_does_not_trigger() {
        assert_eq!(strategy().decide(dec!(95)), Action::Hold);
    }

    #[test]
    fn test_never_buys_with_open_position() {
        assert_eq!(open_strategy().decide(dec!(94)), Action::Hold);
    }

    #[test]
    fn test_sells_above_trigger_with_open_position() {
        assert_eq!(open_strategy().decide(dec!(105.01)), Action::Sell);
    }

    #[test]
    fn test_holds_below_sell_trigger() {
        assert_eq!(open_strategy().decide(dec!(104.99)), Action::Hold);
    }

    #[test]
    fn test_price_exactly_at_sell_trigger_does_not_trigger() {
        assert_eq!(open_strategy().decide(dec!(105)), Action::Hold);
    }

    #[test]
    fn test_never_sells_with_no_position() {
        assert_eq!(strategy().decide(dec!(106)), Action::Hold);
    }

    #[test]
    fn test_starts_with_no_position() {
        assert_eq!(strategy().position(), Position::NoPosition);
    }

    #[test]
    fn test_apply_confirmed_transitions() {
        let mut s = strategy();
        s.apply_confirmed(Action::Buy);
        assert_eq!(s.position(), Position::OpenPosition);
        s.apply_confirmed(Action::Sell);
        assert_eq!(s.position(), Position::NoPosition);
    }

    #[test]
    fn test_hold_never_transitions() {
        let mut s = strategy();
        s.apply_confirmed(Action::Hold);
        assert_eq!(s.position(), Position::NoPosition);

        let mut s = open_strategy();
        s.apply_confirmed(Action::Hold);
        assert_eq!(s.position(), Position::OpenPosition);
    }

    #[test]
    fn test_decide_is_idempotent_without_confirmation() {
        let s = strategy();
        for _ in 0..5 {
            assert_eq!(s.decide(dec!(94.99)), Action::Buy);
            assert_eq!(s.position(), Position::NoPosition);
        }
    }

    #[test]
    fn test_buy_and_sell_are_mutually_exclusive() {
        // across the whole price range, no state ever yields both
        let closed = strategy();
        let open = open_strategy();
        let mut price = dec!(0);
        while price < dec!(200) {
            assert!(!(closed.should_buy(price) && closed.should_sell(price)));
            assert!(!(open.should_buy(price) && open.should_sell(price)));
            price += dec!(0.25);
        }
    }

    #[test]
    fn test_zero_bps_band() {
        // zero offsets degenerate to strict comparison against the
        // threshold itself
        let s = ThresholdStrategy::new(StrategyParams::new(dec!(100), 0, 0));
        assert_eq!(s.decide(dec!(100)), Action::Hold);
        assert_eq!(s.decide(dec!(99.99)), Action::Buy);
    }
}
