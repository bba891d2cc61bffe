//! Builds the frame's vertex list from the simulation state

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::sim::{CoinColor, GameState, PusherKind, Rect, WallKind};

/// Segments per coin; coins are small so this stays cheap
const COIN_SEGMENTS: u32 = 20;
/// Rim width as a fraction of the coin radius
const RIM_FRACTION: f32 = 0.15;

pub fn coin_color(color: CoinColor) -> [f32; 4] {
    match color {
        CoinColor::Gold => colors::COIN_GOLD,
        CoinColor::Orange => colors::COIN_ORANGE,
        CoinColor::Lemon => colors::COIN_LEMON,
        CoinColor::Amber => colors::COIN_AMBER,
        CoinColor::Bright => colors::COIN_BRIGHT,
    }
}

fn wall_color(kind: WallKind) -> [f32; 4] {
    match kind {
        WallKind::SideWall => colors::SIDE_WALL,
        WallKind::Barrier => colors::BARRIER,
        WallKind::Floor => colors::FLOOR,
    }
}

/// Tessellate the cabinet in world coordinates, back to front
pub fn build(state: &GameState) -> Vec<Vertex> {
    let mut out = Vec::with_capacity(64 + state.coins.len() * COIN_SEGMENTS as usize * 9);

    // Faint marker where coins start to score
    let line = state.layout.score_line();
    let marker = Rect::new(
        Vec2::new(state.layout.width() / 2.0, line),
        Vec2::new(state.layout.width(), 2.0),
    );
    shapes::rect(&mut out, &marker, colors::SCORE_LINE);

    for wall in &state.walls {
        shapes::rect(&mut out, &wall.rect, wall_color(wall.kind));
    }

    for pusher in &state.pushers {
        let color = match pusher.kind {
            PusherKind::Top => colors::TOP_PUSHER,
            PusherKind::Bottom => colors::BOTTOM_PUSHER,
        };
        shapes::rect(&mut out, &pusher.rect, color);
    }

    for coin in &state.coins {
        let inner = coin.radius * (1.0 - RIM_FRACTION);
        shapes::circle(&mut out, coin.pos, inner, coin_color(coin.color), COIN_SEGMENTS);
        shapes::ring(
            &mut out,
            coin.pos,
            inner,
            coin.radius,
            colors::COIN_RIM,
            COIN_SEGMENTS,
        );
    }

    out
}
