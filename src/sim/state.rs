//! Game state and core simulation types
//!
//! Everything the simulation touches lives in [`GameState`]: the cabinet
//! layout, both pushers, the coin pile, the slot machine and the seeded RNG.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::body::{Coin, CoinColor, Layout, Pusher, PusherKind, Wall};
use super::physics::PhysicsWorld;
use super::slot::{SlotMachine, SpinOutcome};
use crate::consts::*;
use crate::tuning::{Symbol, Tuning, TuningError};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Simulation running
    Running,
    /// Game is paused (tab hidden, key toggle)
    Paused,
}

/// Things that happened during a tick, for HUD/log consumers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Player coin entered the cabinet
    CoinDropped { pos: Vec2 },
    /// Drop ignored because the reels are still turning
    DropRejected,
    /// Slot spin began
    SpinStarted,
    /// A reel landed
    ReelStopped { reel: usize, symbol: Symbol },
    /// Spin evaluated
    SpinResolved(SpinOutcome),
    /// A coin went over the edge
    CoinScored { coin_id: u32 },
}

/// Winning banner currently on screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WinBanner {
    pub symbol: Symbol,
    pub reward: u32,
    pub ticks_left: u32,
}

impl WinBanner {
    pub fn title(&self) -> String {
        let s = self.symbol;
        format!("🎰 {s} {s} {s} 🎰")
    }

    pub fn message(&self) -> String {
        format!("You won {} coins!", self.reward)
    }
}

/// Reward coins still waiting to fall
///
/// `carry_ms` accumulates simulated time so the drip keeps its real interval
/// even when that interval is not a whole number of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RewardDrip {
    pub remaining: u32,
    pub carry_ms: f32,
}

/// Complete game state (deterministic)
#[derive(Debug)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Seeded RNG; the only randomness source
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub layout: Layout,
    /// Score (coins pushed over the edge)
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub pushers: [Pusher; 2],
    pub walls: Vec<Wall>,
    /// Active coins (sorted by id for determinism)
    pub coins: Vec<Coin>,
    pub slot: SlotMachine,
    pub reward_drip: RewardDrip,
    pub win_banner: Option<WinBanner>,
    /// Events since the caller last drained them
    pub events: Vec<GameEvent>,
    /// Rigid bodies for walls, pushers and coins
    pub physics: PhysicsWorld,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new cabinet with the default playfield size
    pub fn new(seed: u64, tuning: Tuning) -> Result<Self, TuningError> {
        Self::with_layout(seed, tuning, Layout::new(WORLD_WIDTH, WORLD_HEIGHT))
    }

    /// Create a new cabinet, build its fixtures and preload both piles
    pub fn with_layout(seed: u64, tuning: Tuning, layout: Layout) -> Result<Self, TuningError> {
        tuning.validate()?;

        let top = Pusher::new(
            PusherKind::Top,
            layout.top_pusher(),
            1.0,
            tuning.pusher_speed,
            tuning.pusher_travel,
        );
        let bottom = Pusher::new(
            PusherKind::Bottom,
            layout.bottom_pusher(),
            -1.0,
            tuning.pusher_speed,
            tuning.pusher_travel,
        );

        let walls = layout.walls();
        let pushers = [top, bottom];
        let physics = PhysicsWorld::new(&tuning, &walls, &pushers);

        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            walls,
            tuning,
            layout,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Running,
            pushers,
            coins: Vec::new(),
            slot: SlotMachine::new(),
            reward_drip: RewardDrip::default(),
            win_banner: None,
            events: Vec::new(),
            physics,
            next_id: 1,
        };

        state.fill_initial_coins();
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Random point inside `min..max`
    fn random_point(&mut self, min: Vec2, max: Vec2) -> Vec2 {
        Vec2::new(
            min.x + self.rng.random::<f32>() * (max.x - min.x),
            min.y + self.rng.random::<f32>() * (max.y - min.y),
        )
    }

    fn random_palette_color(&mut self) -> CoinColor {
        CoinColor::PALETTE[self.rng.random_range(0..CoinColor::PALETTE.len())]
    }

    /// Scatter the starting piles above both pushers
    fn fill_initial_coins(&mut self) {
        let (top_min, top_max) = self.layout.top_pile_area();
        for _ in 0..self.tuning.top_pile {
            let pos = self.random_point(top_min, top_max);
            let color = self.random_palette_color();
            self.spawn_coin(pos, color);
        }

        let (bottom_min, bottom_max) = self.layout.bottom_pile_area();
        for _ in 0..self.tuning.bottom_pile {
            let pos = self.random_point(bottom_min, bottom_max);
            let color = self.random_palette_color();
            self.spawn_coin(pos, color);
        }
    }

    /// Add a coin at rest; culls the oldest coin past `max_coins`
    pub fn spawn_coin(&mut self, pos: Vec2, color: CoinColor) -> u32 {
        let id = self.next_entity_id();
        let radius = self.tuning.coin_radius;
        let body = self.physics.add_coin(pos, radius);
        self.coins.push(Coin::new(id, pos, radius, color, body));

        if self.coins.len() > self.tuning.max_coins {
            // Lowest id is the oldest; ids are sorted
            let oldest = self.coins.remove(0);
            self.physics.remove_coin(oldest.body);
            log::warn!("Coin cap {} reached, removed coin {}", self.tuning.max_coins, oldest.id);
        }
        id
    }

    /// Drop every coin matching `remove` from the pile and the physics world
    pub fn remove_coins_where(&mut self, mut remove: impl FnMut(&Coin) -> bool) -> Vec<u32> {
        let mut removed = Vec::new();
        let physics = &mut self.physics;
        self.coins.retain(|coin| {
            if remove(coin) {
                physics.remove_coin(coin.body);
                removed.push(coin.id);
                false
            } else {
                true
            }
        });
        removed
    }

    /// Player drops a coin: spawn it at the chute and spin the reels
    ///
    /// Ignored while a spin is still in progress.
    pub fn drop_coin(&mut self) -> bool {
        if self.slot.is_spinning() {
            self.events.push(GameEvent::DropRejected);
            return false;
        }

        let jitter = (self.rng.random::<f32>() - 0.5) * self.tuning.drop_jitter;
        let pos = self.layout.drop_point() + Vec2::new(jitter, 0.0);
        self.spawn_coin(pos, CoinColor::Bright);
        self.events.push(GameEvent::CoinDropped { pos });
        log::debug!("Coin dropped at x={:.1}", pos.x);

        if self.slot.start_spin(&self.tuning) {
            self.events.push(GameEvent::SpinStarted);
        }
        true
    }

    /// Queue reward coins and raise the banner for a winning spin
    pub fn award(&mut self, outcome: &SpinOutcome) {
        let Some(symbol) = outcome.winning_symbol else {
            return;
        };

        log::info!("Slot win: {symbol}{symbol}{symbol} pays {} coins", outcome.payout);
        if self.reward_drip.remaining == 0 {
            // First coin falls immediately
            self.reward_drip.carry_ms = self.tuning.reward_drip_ms as f32;
        }
        self.reward_drip.remaining += outcome.payout;
        self.win_banner = Some(WinBanner {
            symbol,
            reward: outcome.payout,
            ticks_left: self.tuning.win_banner_ticks(),
        });
    }

    /// Drop one reward coin at a random spot in the reward band
    pub fn spawn_reward_coin(&mut self) -> u32 {
        let (x_min, x_max, y) = self.layout.reward_band();
        let x = x_min + self.rng.random::<f32>() * (x_max - x_min);
        self.spawn_coin(Vec2::new(x, y), CoinColor::Bright)
    }

    /// Ensure coins are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.coins.sort_by_key(|c| c.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_fills_piles_inside_areas() {
        let state = GameState::new(12345, Tuning::default()).unwrap();
        assert_eq!(state.coins.len(), 80);

        let (top_min, top_max) = state.layout.top_pile_area();
        let (bot_min, bot_max) = state.layout.bottom_pile_area();
        for (i, coin) in state.coins.iter().enumerate() {
            let (min, max) = if i < 30 { (top_min, top_max) } else { (bot_min, bot_max) };
            assert!(coin.pos.cmpge(min).all() && coin.pos.cmple(max).all());
            assert_ne!(coin.color, CoinColor::Bright);
        }
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_same_seed_same_pile() {
        let a = GameState::new(99, Tuning::default()).unwrap();
        let b = GameState::new(99, Tuning::default()).unwrap();
        let pa: Vec<_> = a.coins.iter().map(|c| c.pos).collect();
        let pb: Vec<_> = b.coins.iter().map(|c| c.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_drop_coin_spawns_and_spins() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let before = state.coins.len();

        assert!(state.drop_coin());
        assert_eq!(state.coins.len(), before + 1);
        assert!(state.slot.is_spinning());

        let dropped = state.coins.last().unwrap();
        assert_eq!(dropped.color, CoinColor::Bright);
        let drop = state.layout.drop_point();
        assert!((dropped.pos.x - drop.x).abs() <= 40.0);
        assert_eq!(dropped.pos.y, drop.y);
        assert!(state.events.contains(&GameEvent::SpinStarted));
    }

    #[test]
    fn test_drop_coin_ignored_while_spinning() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        assert!(state.drop_coin());
        let count = state.coins.len();

        assert!(!state.drop_coin());
        assert_eq!(state.coins.len(), count);
        assert_eq!(state.events.last(), Some(&GameEvent::DropRejected));
    }

    #[test]
    fn test_award_queues_reward() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let outcome = crate::sim::slot::evaluate([Symbol::Diamond; 3], &state.tuning);
        state.award(&outcome);

        assert_eq!(state.reward_drip.remaining, 40);
        let banner = state.win_banner.unwrap();
        assert_eq!(banner.symbol, Symbol::Diamond);
        assert_eq!(banner.reward, 40);
        assert_eq!(banner.ticks_left, 360);
        assert_eq!(banner.title(), "🎰 💎 💎 💎 🎰");
        assert_eq!(banner.message(), "You won 40 coins!");
    }

    #[test]
    fn test_award_ignores_loss() {
        let mut state = GameState::new(1, Tuning::default()).unwrap();
        let outcome = crate::sim::slot::evaluate(
            [Symbol::Cherry, Symbol::Lemon, Symbol::Cherry],
            &state.tuning,
        );
        state.award(&outcome);
        assert_eq!(state.reward_drip.remaining, 0);
        assert!(state.win_banner.is_none());
    }

    #[test]
    fn test_spawn_coin_culls_oldest_past_cap() {
        let tuning = Tuning {
            top_pile: 0,
            bottom_pile: 0,
            max_coins: 20,
            ..Tuning::default()
        };
        let mut state = GameState::new(3, tuning).unwrap();
        let fixtures = state.physics.body_count();
        for _ in 0..25 {
            state.spawn_reward_coin();
        }
        assert_eq!(state.coins.len(), 20);
        assert_eq!(state.coins[0].id, 6);
        // Culled coins leave the physics world too
        assert_eq!(state.physics.body_count(), fixtures + 20);
    }

    #[test]
    fn test_new_rejects_invalid_tuning() {
        let tuning = Tuning {
            symbols: vec![],
            ..Tuning::default()
        };
        assert!(matches!(
            GameState::new(1, tuning),
            Err(TuningError::EmptySymbols)
        ));

        let tuning = Tuning {
            reel_stagger_ms: u32::MAX,
            ..Tuning::default()
        };
        assert!(GameState::new(1, tuning).is_err());
    }

    #[test]
    fn test_reward_coins_spawn_in_band() {
        let tuning = Tuning {
            top_pile: 0,
            bottom_pile: 0,
            ..Tuning::default()
        };
        let mut state = GameState::new(21, tuning).unwrap();
        let (w, h) = (state.layout.width(), state.layout.height());

        for _ in 0..300 {
            let id = state.spawn_reward_coin();
            let coin = state.coins.iter().find(|c| c.id == id).unwrap();
            assert!(coin.pos.x >= 0.3 * w && coin.pos.x <= 0.7 * w);
            assert!((coin.pos.y - 0.05 * h).abs() < 1e-4);
            assert_eq!(coin.color, CoinColor::Bright);
        }
    }

    #[test]
    fn test_drop_jitter_stays_in_band() {
        let tuning = Tuning {
            top_pile: 0,
            bottom_pile: 0,
            ..Tuning::default()
        };
        let mut state = GameState::new(8, tuning).unwrap();
        let drop = state.layout.drop_point();

        let mut offsets = Vec::new();
        for _ in 0..300 {
            state.slot = SlotMachine::new();
            assert!(state.drop_coin());
            let coin = state.coins.last().unwrap();
            assert_eq!(coin.pos.y, drop.y);
            offsets.push(coin.pos.x - drop.x);
        }

        assert!(offsets.iter().all(|dx| (-40.0..40.0).contains(dx)));
        // Both sides of the chute get used
        assert!(offsets.iter().any(|dx| *dx < -20.0));
        assert!(offsets.iter().any(|dx| *dx > 20.0));
    }

    #[test]
    fn test_remove_coins_where_drops_bodies() {
        let mut state = GameState::new(2, Tuning::default()).unwrap();
        let fixtures = state.physics.body_count() - state.coins.len();

        let removed = state.remove_coins_where(|c| c.id % 2 == 0);
        assert_eq!(removed.len(), 40);
        assert!(state.coins.iter().all(|c| c.id % 2 == 1));
        assert_eq!(state.physics.body_count(), fixtures + state.coins.len());
    }
}
