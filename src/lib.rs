//! Coin Pusher - an arcade coin pusher with a slot machine bonus
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pushers, coin physics, slot machine)
//! - `renderer`: WebGPU rendering pipeline
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Symbol, Tuning, TuningError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Playfield dimensions (world units, y grows downward).
    /// At this width the gap beside the bottom pusher fits a coin.
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 700.0;

    /// Side walls and floor
    pub const WALL_THICKNESS: f32 = 10.0;
    /// Pusher bar height
    pub const PUSHER_THICKNESS: f32 = 20.0;
    /// Barriers flanking the top pusher
    pub const BARRIER_WIDTH: f32 = 10.0;
    pub const BARRIER_HEIGHT: f32 = 100.0;
    /// Coins touching something below `height - SCORE_LINE_MARGIN` score
    pub const SCORE_LINE_MARGIN: f32 = 30.0;
}

/// Convert a duration in milliseconds to whole simulation ticks (at least 1)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u32 {
    ((ms as f32 / 1000.0) / consts::SIM_DT).round().max(1.0) as u32
}

/// Point `(fx * w, fy * h)` for fractional placement inside a `w x h` field
#[inline]
pub fn frac_point(size: Vec2, fx: f32, fy: f32) -> Vec2 {
    Vec2::new(size.x * fx, size.y * fy)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(1000), 120);
        assert_eq!(ms_to_ticks(500), 60);
        assert_eq!(ms_to_ticks(300), 36);
        // Sub-tick durations still take one tick
        assert_eq!(ms_to_ticks(1), 1);
        assert_eq!(ms_to_ticks(0), 1);
    }

    #[test]
    fn test_frac_point() {
        let p = frac_point(Vec2::new(400.0, 700.0), 0.5, 0.25);
        assert_eq!(p, Vec2::new(200.0, 175.0));
    }
}
