//! Data-driven game balance
//!
//! Every number that shapes play (slot odds, payouts, reel timing, pile sizes,
//! physics feel) lives in [`Tuning`]. Defaults reproduce the arcade cabinet;
//! pages can override any subset with a JSON blob.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::ms_to_ticks;

/// Slot reel symbols, ordered from lowest to highest payout
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Watermelon,
    Star,
    Diamond,
    Seven,
}

impl Symbol {
    /// Reel strip order
    pub const ALL: [Symbol; 7] = [
        Symbol::Cherry,
        Symbol::Lemon,
        Symbol::Orange,
        Symbol::Watermelon,
        Symbol::Star,
        Symbol::Diamond,
        Symbol::Seven,
    ];

    /// Glyph shown on the reel
    pub fn glyph(&self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Watermelon => "🍉",
            Symbol::Star => "⭐",
            Symbol::Diamond => "💎",
            Symbol::Seven => "7️⃣",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

/// Configuration problems caught before a game starts
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("symbol table is empty")]
    EmptySymbols,
    #[error("symbol {0:?} appears more than once")]
    DuplicateSymbol(Symbol),
    #[error("no coin reward configured for {0:?}")]
    MissingReward(Symbol),
    #[error("{name} must be within [0, 1], got {value}")]
    ChanceOutOfRange { name: &'static str, value: f32 },
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("{name} must be finite and non-negative, got {value}")]
    Negative { name: &'static str, value: f32 },
    #[error("{name} must be within [{min}, {max}] ms, got {value}")]
    DurationOutOfRange {
        name: &'static str,
        value: u32,
        min: u32,
        max: u32,
    },
    #[error("max_coins must be at least 1")]
    ZeroCoinCap,
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Longest accepted duration for any `*_ms` knob (one minute)
pub const MAX_DURATION_MS: u32 = 60_000;

/// Game balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Slot machine ===
    /// Symbols a reel can land on (uniform odds)
    pub symbols: Vec<Symbol>,
    /// Coins paid out for three of a kind
    pub rewards: BTreeMap<Symbol, u32>,
    /// Per-reel chance (reels 2 and 3) to roll for a match
    pub win_chance: f32,
    /// Chance a winning roll actually copies the first reel
    pub repeat_chance: f32,
    /// First reel stops after this long (ms)
    pub reel_stop_ms: u32,
    /// Each following reel stops this much later (ms)
    pub reel_stagger_ms: u32,
    /// Pause between the last reel stopping and the payout (ms)
    pub settle_ms: u32,
    /// Interval between reward coins (ms)
    pub reward_drip_ms: u32,
    /// How long the win banner stays up (ms)
    pub win_banner_ms: u32,

    // === Playfield ===
    /// Coins preloaded above the top pusher
    pub top_pile: u32,
    /// Coins preloaded above the bottom pusher
    pub bottom_pile: u32,
    /// Horizontal spread of a dropped coin (full width of the jitter band)
    pub drop_jitter: f32,
    /// Live coin limit; the oldest coin is removed past it
    pub max_coins: usize,

    // === Physics ===
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Fraction of velocity lost per 1/60 s
    pub air_drag: f32,
    pub coin_radius: f32,
    pub restitution: f32,
    pub friction: f32,
    /// Pusher travel speed (units/s)
    pub pusher_speed: f32,
    /// Maximum pusher offset from its rest line in either direction
    pub pusher_travel: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        let rewards = BTreeMap::from([
            (Symbol::Seven, 50),
            (Symbol::Diamond, 40),
            (Symbol::Star, 30),
            (Symbol::Watermelon, 25),
            (Symbol::Orange, 20),
            (Symbol::Lemon, 20),
            (Symbol::Cherry, 20),
        ]);

        Self {
            symbols: Symbol::ALL.to_vec(),
            rewards,
            win_chance: 0.3,
            repeat_chance: 0.8,
            reel_stop_ms: 1000,
            reel_stagger_ms: 500,
            settle_ms: 300,
            reward_drip_ms: 20,
            win_banner_ms: 3000,

            top_pile: 30,
            bottom_pile: 50,
            drop_jitter: 80.0,
            max_coins: 400,

            gravity: 2000.0,
            air_drag: 0.01,
            coin_radius: 12.0,
            restitution: 0.3,
            friction: 0.5,
            // 2 units per 16 ms frame
            pusher_speed: 125.0,
            pusher_travel: 80.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check every invariant the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.symbols.is_empty() {
            return Err(TuningError::EmptySymbols);
        }
        for (i, symbol) in self.symbols.iter().enumerate() {
            if self.symbols[..i].contains(symbol) {
                return Err(TuningError::DuplicateSymbol(*symbol));
            }
            if !self.rewards.contains_key(symbol) {
                return Err(TuningError::MissingReward(*symbol));
            }
        }

        for (name, value) in [
            ("win_chance", self.win_chance),
            ("repeat_chance", self.repeat_chance),
            ("air_drag", self.air_drag),
            ("restitution", self.restitution),
            ("friction", self.friction),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TuningError::ChanceOutOfRange { name, value });
            }
        }

        for (name, value) in [
            ("reel_stop_ms", self.reel_stop_ms),
            ("reel_stagger_ms", self.reel_stagger_ms),
            ("settle_ms", self.settle_ms),
            ("reward_drip_ms", self.reward_drip_ms),
            ("win_banner_ms", self.win_banner_ms),
        ] {
            if value > MAX_DURATION_MS {
                return Err(TuningError::DurationOutOfRange {
                    name,
                    value,
                    min: 0,
                    max: MAX_DURATION_MS,
                });
            }
        }
        // Reward coins are paced by this interval
        if self.reward_drip_ms == 0 {
            return Err(TuningError::DurationOutOfRange {
                name: "reward_drip_ms",
                value: 0,
                min: 1,
                max: MAX_DURATION_MS,
            });
        }

        if self.drop_jitter < 0.0 || !self.drop_jitter.is_finite() {
            return Err(TuningError::Negative {
                name: "drop_jitter",
                value: self.drop_jitter,
            });
        }
        if self.max_coins == 0 {
            return Err(TuningError::ZeroCoinCap);
        }

        for (name, value) in [
            ("coin_radius", self.coin_radius),
            ("gravity", self.gravity),
            ("pusher_speed", self.pusher_speed),
            ("pusher_travel", self.pusher_travel),
        ] {
            if value <= 0.0 || !value.is_finite() {
                return Err(TuningError::NonPositive { name, value });
            }
        }

        Ok(())
    }

    /// Coins paid for three of `symbol` (0 if unconfigured)
    pub fn reward_for(&self, symbol: Symbol) -> u32 {
        self.rewards.get(&symbol).copied().unwrap_or(0)
    }

    /// Ticks until reel `index` stops, counted from spin start
    pub fn reel_stop_ticks(&self, index: usize) -> u32 {
        let index = u32::try_from(index).unwrap_or(u32::MAX);
        let stagger = self.reel_stagger_ms.saturating_mul(index);
        ms_to_ticks(self.reel_stop_ms.saturating_add(stagger))
    }

    pub fn settle_ticks(&self) -> u32 {
        ms_to_ticks(self.settle_ms)
    }

    pub fn win_banner_ticks(&self) -> u32 {
        ms_to_ticks(self.win_banner_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.reward_for(Symbol::Seven), 50);
        assert_eq!(tuning.reward_for(Symbol::Diamond), 40);
        assert_eq!(tuning.reward_for(Symbol::Star), 30);
        assert_eq!(tuning.reward_for(Symbol::Watermelon), 25);
        assert_eq!(tuning.reward_for(Symbol::Cherry), 20);
    }

    #[test]
    fn test_reel_timing() {
        let tuning = Tuning::default();
        assert_eq!(tuning.reel_stop_ticks(0), 120);
        assert_eq!(tuning.reel_stop_ticks(1), 180);
        assert_eq!(tuning.reel_stop_ticks(2), 240);
        assert_eq!(tuning.settle_ticks(), 36);
    }

    #[test]
    fn test_partial_json_override() {
        let tuning = Tuning::from_json(r#"{ "win_chance": 0.5, "top_pile": 10 }"#).unwrap();
        assert_eq!(tuning.win_chance, 0.5);
        assert_eq!(tuning.top_pile, 10);
        // Untouched fields keep defaults
        assert_eq!(tuning.bottom_pile, 50);
        assert_eq!(tuning.reward_for(Symbol::Seven), 50);
    }

    #[test]
    fn test_reward_map_json_keys() {
        let tuning = Tuning::from_json(
            r#"{
                "symbols": ["cherry", "seven"],
                "rewards": { "cherry": 5, "seven": 100 }
            }"#,
        )
        .unwrap();
        assert_eq!(tuning.symbols, vec![Symbol::Cherry, Symbol::Seven]);
        assert_eq!(tuning.reward_for(Symbol::Seven), 100);
    }

    #[test]
    fn test_rejects_bad_chance() {
        let err = Tuning::from_json(r#"{ "win_chance": 1.5 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::ChanceOutOfRange { name: "win_chance", .. }
        ));
    }

    #[test]
    fn test_rejects_missing_reward() {
        let err = Tuning::from_json(r#"{ "symbols": ["cherry"], "rewards": {} }"#).unwrap_err();
        assert!(matches!(err, TuningError::MissingReward(Symbol::Cherry)));
    }

    #[test]
    fn test_rejects_duplicates_and_empty() {
        let mut tuning = Tuning::default();
        tuning.symbols.push(Symbol::Cherry);
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::DuplicateSymbol(Symbol::Cherry))
        ));

        tuning.symbols.clear();
        assert!(matches!(tuning.validate(), Err(TuningError::EmptySymbols)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            Tuning::from_json("{ not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_oversized_durations() {
        let err = Tuning::from_json(r#"{ "reel_stagger_ms": 4294967295 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::DurationOutOfRange { name: "reel_stagger_ms", .. }
        ));
        assert!(Tuning::from_json(r#"{ "win_banner_ms": 60001 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "reward_drip_ms": 0 }"#).is_err());
        assert!(Tuning::from_json(r#"{ "settle_ms": 60000 }"#).is_ok());
    }

    #[test]
    fn test_reel_stop_ticks_saturates() {
        let tuning = Tuning {
            reel_stop_ms: u32::MAX,
            reel_stagger_ms: u32::MAX,
            ..Tuning::default()
        };
        // Unvalidated extremes clamp instead of wrapping
        assert!(tuning.reel_stop_ticks(2) >= tuning.reel_stop_ticks(1));
        assert!(tuning.reel_stop_ticks(usize::MAX) > 0);
    }

    #[test]
    fn test_rejects_bad_jitter_and_cap() {
        let mut tuning = Tuning {
            drop_jitter: -1.0,
            ..Tuning::default()
        };
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::Negative { name: "drop_jitter", .. })
        ));
        tuning.drop_jitter = f32::NAN;
        assert!(tuning.validate().is_err());
        tuning.drop_jitter = 0.0;
        assert!(tuning.validate().is_ok());

        tuning.max_coins = 0;
        assert!(matches!(tuning.validate(), Err(TuningError::ZeroCoinCap)));
    }

    #[test]
    fn test_rejects_non_positive_radius() {
        let err = Tuning::from_json(r#"{ "coin_radius": 0.0 }"#).unwrap_err();
        assert!(matches!(
            err,
            TuningError::NonPositive { name: "coin_radius", .. }
        ));
    }
}
