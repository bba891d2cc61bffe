//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically.

use super::slot::SlotEvent;
use super::state::{GameEvent, GamePhase, GameState};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Drop a coin (button/space)
    pub drop_coin: bool,
    /// Pause toggle
    pub pause: bool,
}

/// Advance the game state by one fixed timestep
///
/// Events accumulate in `state.events` until the caller drains them.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        state.phase = match state.phase {
            GamePhase::Running => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Running,
        };
        log::info!("Game {:?}", state.phase);
    }

    if state.phase == GamePhase::Paused {
        return;
    }

    state.time_ticks += 1;

    if input.drop_coin {
        state.drop_coin();
    }

    for pusher in &mut state.pushers {
        pusher.advance(dt);
    }

    state.physics.step(dt, &state.pushers, &mut state.coins);
    collect_scored(state);
    cull_escaped(state);
    advance_slot(state);
    drip_rewards(state, dt);

    if let Some(banner) = state.win_banner.as_mut() {
        banner.ticks_left = banner.ticks_left.saturating_sub(1);
        if banner.ticks_left == 0 {
            state.win_banner = None;
        }
    }

    state.normalize_order();
}

/// Coins touching anything past the score line go over the edge
fn collect_scored(state: &mut GameState) {
    let line = state.layout.score_line();
    let scored = state.remove_coins_where(|coin| coin.touching && coin.pos.y > line);
    if scored.is_empty() {
        return;
    }

    state
        .events
        .extend(scored.iter().map(|&coin_id| GameEvent::CoinScored { coin_id }));
    state.score += scored.len() as u64;
    log::debug!("Scored {} coin(s), total {}", scored.len(), state.score);
}

/// Remove coins that left the cabinet without scoring
fn cull_escaped(state: &mut GameState) {
    let bounds = state.layout.bounds();
    let lost = state.remove_coins_where(|coin| !bounds.contains(coin.pos));
    if !lost.is_empty() {
        log::warn!("Culled {} coin(s) outside the playfield", lost.len());
    }
}

/// Tick the reels and pay out resolved spins
fn advance_slot(state: &mut GameState) {
    let mut slot_events = Vec::new();
    state
        .slot
        .advance(&mut state.rng, &state.tuning, &mut slot_events);

    for event in slot_events {
        match event {
            SlotEvent::ReelStopped { reel, symbol } => {
                log::debug!("Reel {} stopped on {}", reel + 1, symbol);
                state.events.push(GameEvent::ReelStopped { reel, symbol });
            }
            SlotEvent::Resolved(outcome) => {
                if !outcome.is_win() {
                    let [a, b, c] = outcome.symbols;
                    log::info!("Slot: {a} {b} {c}, no win");
                }
                state.events.push(GameEvent::SpinResolved(outcome));
                state.award(&outcome);
            }
        }
    }
}

/// Release queued reward coins, one every `reward_drip_ms` of sim time
fn drip_rewards(state: &mut GameState, dt: f32) {
    if state.reward_drip.remaining == 0 {
        return;
    }

    let interval = state.tuning.reward_drip_ms as f32;
    state.reward_drip.carry_ms += dt * 1000.0;
    while state.reward_drip.remaining > 0 && state.reward_drip.carry_ms >= interval {
        state.spawn_reward_coin();
        state.reward_drip.remaining -= 1;
        state.reward_drip.carry_ms -= interval;
    }
    if state.reward_drip.remaining == 0 {
        state.reward_drip.carry_ms = 0.0;
    }
}
