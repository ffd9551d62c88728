//! Per-ticker price memory and message text.

use serde::Serialize;

use crate::config::MarqueeConfig;
use crate::render::Rgb;

/// Which way a ticker moved on its last successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    Down,
    #[default]
    NoChange,
}

impl Direction {
    /// Compare a new price against the previous one. No previous price means
    /// no movement.
    pub fn between(previous: Option<f64>, current: f64) -> Self {
        match previous {
            Some(prev) if current > prev => Direction::Up,
            Some(prev) if current < prev => Direction::Down,
            _ => Direction::NoChange,
        }
    }

    /// Arrow shown in front of the symbol.
    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Down => '↓',
            Direction::NoChange => '-',
        }
    }

    /// Text colour for this direction.
    pub fn color(self, config: &MarqueeConfig) -> Rgb {
        match self {
            Direction::Up => config.color_up,
            Direction::Down => config.color_down,
            Direction::NoChange => config.color_neutral,
        }
    }
}

/// Last known quote for one configured ticker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickerState {
    pub symbol: String,
    /// `None` until the first successful fetch
    pub price: Option<f64>,
    pub direction: Direction,
}

impl TickerState {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            price: None,
            direction: Direction::NoChange,
        }
    }

    /// Record a fetch result. A missing price keeps the stored one and
    /// reports no movement.
    pub fn apply(&mut self, fetched: Option<f64>) -> Direction {
        self.direction = match fetched {
            Some(price) => {
                let direction = Direction::between(self.price, price);
                self.price = Some(price);
                direction
            }
            None => Direction::NoChange,
        };
        self.direction
    }

    /// Store a price without judging direction (startup seeding).
    pub fn seed(&mut self, fetched: Option<f64>) {
        if fetched.is_some() {
            self.price = fetched;
        }
        self.direction = Direction::NoChange;
    }

    pub fn arrow(&self) -> char {
        self.direction.arrow()
    }

    /// Marquee text, e.g. `↑ AAPL $150.00`, or `- AAPL` before any price is known.
    pub fn message(&self) -> String {
        match self.price {
            Some(price) => format!("{} {} ${:.2}", self.arrow(), self.symbol, price),
            None => format!("{} {}", self.arrow(), self.symbol),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_between() {
        assert_eq!(Direction::between(Some(1.0), 2.0), Direction::Up);
        assert_eq!(Direction::between(Some(2.0), 1.0), Direction::Down);
        assert_eq!(Direction::between(Some(2.0), 2.0), Direction::NoChange);
        assert_eq!(Direction::between(None, 2.0), Direction::NoChange);
    }

    #[test]
    fn test_direction_colors() {
        let config = MarqueeConfig::default();
        assert_eq!(Direction::Up.color(&config), Rgb::new(0, 255, 0));
        assert_eq!(Direction::Down.color(&config), Rgb::new(255, 0, 0));
        assert_eq!(Direction::NoChange.color(&config), Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_message_format() {
        let mut state = TickerState::new("AAPL");
        assert_eq!(state.message(), "- AAPL");

        state.seed(Some(149.5));
        assert_eq!(state.message(), "- AAPL $149.50");

        state.apply(Some(150.0));
        assert_eq!(state.message(), "↑ AAPL $150.00");

        state.apply(Some(99.999));
        assert_eq!(state.message(), "↓ AAPL $100.00");
    }

    #[test]
    fn test_failed_fetch_keeps_price() {
        let mut state = TickerState::new("MSFT");
        state.apply(Some(400.0));
        state.apply(Some(401.0));
        assert_eq!(state.direction, Direction::Up);

        assert_eq!(state.apply(None), Direction::NoChange);
        assert_eq!(state.price, Some(401.0));
        assert_eq!(state.message(), "- MSFT $401.00");
    }

    #[test]
    fn test_seed_failure_leaves_price_absent() {
        let mut state = TickerState::new("TSLA");
        state.seed(None);
        assert_eq!(state.price, None);
    }
}
