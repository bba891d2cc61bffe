//! Three-reel slot machine driving the bonus payouts
//!
//! A spin starts when the player drops a coin. Reels stop one after another
//! on fixed timers; a short settle delay after the last reel the line is
//! evaluated. Three of a kind pays the symbol's reward in coins.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::tuning::{Symbol, Tuning};

/// Number of reels on the machine
pub const REEL_COUNT: usize = 3;

/// A single reel
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reel {
    /// Symbol currently on the payline (None before the first spin)
    pub symbol: Option<Symbol>,
    pub spinning: bool,
    /// Ticks until this reel stops (while spinning)
    pub stop_in: u32,
}

impl Default for Reel {
    fn default() -> Self {
        Self {
            symbol: None,
            spinning: false,
            stop_in: 0,
        }
    }
}

/// Final line of a spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpinOutcome {
    pub symbols: [Symbol; REEL_COUNT],
    /// Matching symbol when all reels agree
    pub winning_symbol: Option<Symbol>,
    /// Coins awarded (0 on a loss)
    pub payout: u32,
}

impl SpinOutcome {
    pub fn is_win(&self) -> bool {
        self.winning_symbol.is_some()
    }
}

/// What the result panel shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SlotDisplay {
    Idle,
    Spinning,
    Win(Symbol),
    Lose([Symbol; REEL_COUNT]),
}

impl SlotDisplay {
    /// Text for the result panel
    pub fn label(&self) -> String {
        match self {
            SlotDisplay::Idle => String::from("DROP A COIN"),
            SlotDisplay::Spinning => String::from("SPINNING..."),
            SlotDisplay::Win(s) => format!("🎉 WIN! {s}{s}{s}"),
            SlotDisplay::Lose([a, b, c]) => format!("{a} {b} {c} - Try Again!"),
        }
    }
}

/// Notifications produced while the machine advances
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotEvent {
    ReelStopped { reel: usize, symbol: Symbol },
    Resolved(SpinOutcome),
}

/// The slot machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlotMachine {
    pub reels: [Reel; REEL_COUNT],
    pub display: SlotDisplay,
    /// Ticks left between the last reel stopping and evaluation
    settle_in: Option<u32>,
    spinning: bool,
}

impl Default for SlotMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl SlotMachine {
    pub fn new() -> Self {
        Self {
            reels: [Reel::default(); REEL_COUNT],
            display: SlotDisplay::Idle,
            settle_in: None,
            spinning: false,
        }
    }

    /// True from spin start until the line is evaluated
    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    /// Begin a spin; returns false (and changes nothing) if one is in progress
    pub fn start_spin(&mut self, tuning: &Tuning) -> bool {
        if self.spinning {
            return false;
        }

        for (i, reel) in self.reels.iter_mut().enumerate() {
            reel.spinning = true;
            reel.stop_in = tuning.reel_stop_ticks(i);
        }
        self.settle_in = None;
        self.spinning = true;
        self.display = SlotDisplay::Spinning;
        true
    }

    /// Advance timers by one tick, stopping reels and evaluating when due
    pub fn advance<R: Rng>(
        &mut self,
        rng: &mut R,
        tuning: &Tuning,
        events: &mut Vec<SlotEvent>,
    ) {
        if !self.spinning {
            return;
        }

        if let Some(ticks) = self.settle_in.as_mut() {
            *ticks = ticks.saturating_sub(1);
            if *ticks == 0 {
                self.settle_in = None;
                let outcome = self.resolve(tuning);
                events.push(SlotEvent::Resolved(outcome));
            }
            return;
        }

        for i in 0..REEL_COUNT {
            if !self.reels[i].spinning {
                continue;
            }
            let reel = &mut self.reels[i];
            reel.stop_in = reel.stop_in.saturating_sub(1);
            if reel.stop_in > 0 {
                continue;
            }

            // Reels stop in index order, so reel 0 has always landed first
            let first = if i == 0 { None } else { self.reels[0].symbol };
            let symbol = roll_reel(first, rng, tuning);
            let reel = &mut self.reels[i];
            reel.symbol = Some(symbol);
            reel.spinning = false;
            events.push(SlotEvent::ReelStopped { reel: i, symbol });

            if i == REEL_COUNT - 1 {
                self.settle_in = Some(tuning.settle_ticks());
            }
        }
    }

    /// Evaluate the payline and finish the spin
    fn resolve(&mut self, tuning: &Tuning) -> SpinOutcome {
        let fallback = tuning.symbols[0];
        let symbols = self.reels.map(|r| r.symbol.unwrap_or(fallback));
        let outcome = evaluate(symbols, tuning);

        self.display = match outcome.winning_symbol {
            Some(symbol) => SlotDisplay::Win(symbol),
            None => SlotDisplay::Lose(symbols),
        };
        self.spinning = false;
        outcome
    }
}

/// Pick the symbol a reel lands on
///
/// The first reel (`first == None`) is uniform. Later reels roll against
/// `win_chance`; a winning roll copies the first reel with probability
/// `repeat_chance`, otherwise the reel is uniform again.
pub fn roll_reel<R: Rng>(first: Option<Symbol>, rng: &mut R, tuning: &Tuning) -> Symbol {
    let uniform = |rng: &mut R| tuning.symbols[rng.random_range(0..tuning.symbols.len())];

    match first {
        None => uniform(rng),
        Some(first) => {
            let is_win = rng.random::<f32>() < tuning.win_chance;
            if is_win && rng.random::<f32>() < tuning.repeat_chance {
                first
            } else {
                uniform(rng)
            }
        }
    }
}

/// Three of a kind pays the symbol's reward
pub fn evaluate(symbols: [Symbol; REEL_COUNT], tuning: &Tuning) -> SpinOutcome {
    let first = symbols[0];
    let all_match = symbols.iter().all(|&s| s == first);

    if all_match {
        SpinOutcome {
            symbols,
            winning_symbol: Some(first),
            payout: tuning.reward_for(first),
        }
    } else {
        SpinOutcome {
            symbols,
            winning_symbol: None,
            payout: 0,
        }
    }
}
