//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - Rigid-body physics via rapier2d with enhanced determinism
//! - No rendering or platform dependencies

pub mod body;
pub mod physics;
pub mod slot;
pub mod state;
pub mod tick;

pub use body::{Coin, CoinColor, Layout, Pusher, PusherKind, Rect, Wall, WallKind};
pub use physics::PhysicsWorld;
pub use slot::{
    REEL_COUNT, Reel, SlotDisplay, SlotEvent, SlotMachine, SpinOutcome, evaluate, roll_reel,
};
pub use state::{GameEvent, GamePhase, GameState, RewardDrip, WinBanner};
pub use tick::{TickInput, tick};
