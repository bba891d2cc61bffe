//! Playfield bodies: coins, walls and the two pushers
//!
//! World coordinates put the origin at the top-left corner with y growing
//! downward, matching the cabinet's screen layout. Every placement is a
//! fraction of the playfield size so the cabinet can be rebuilt at any size.

use glam::Vec2;
use rapier2d::prelude::RigidBodyHandle;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::frac_point;

/// Axis-aligned box (center + half extents)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half: Vec2,
}

impl Rect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half: size * 0.5,
        }
    }

    #[inline]
    pub fn min(&self) -> Vec2 {
        self.center - self.half
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.center + self.half
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let d = (p - self.center).abs();
        d.x <= self.half.x && d.y <= self.half.y
    }
}

/// What a static wall is for (drives its color)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WallKind {
    SideWall,
    /// Short posts beside the top pusher
    Barrier,
    Floor,
}

/// A static wall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Wall {
    pub kind: WallKind,
    pub rect: Rect,
}

/// Coin face color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoinColor {
    Gold,
    Orange,
    Lemon,
    Amber,
    /// Player-dropped and reward coins
    Bright,
}

impl CoinColor {
    /// Palette used for the preloaded piles
    pub const PALETTE: [CoinColor; 4] = [
        CoinColor::Gold,
        CoinColor::Orange,
        CoinColor::Lemon,
        CoinColor::Amber,
    ];
}

/// A coin (rigid disc)
///
/// `pos` and `vel` mirror the physics body after every step.
#[derive(Debug, Clone)]
pub struct Coin {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub color: CoinColor,
    /// Body in the physics world
    pub body: RigidBodyHandle,
    /// True when the coin had an active contact after the last step
    pub touching: bool,
}

impl Coin {
    pub fn new(
        id: u32,
        pos: Vec2,
        radius: f32,
        color: CoinColor,
        body: RigidBodyHandle,
    ) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            radius,
            color,
            body,
            touching: false,
        }
    }
}

/// Which pusher (for rendering and logs)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PusherKind {
    Top,
    Bottom,
}

/// A pusher bar oscillating vertically around its rest line
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pusher {
    pub kind: PusherKind,
    pub rect: Rect,
    /// Rest line (center y at zero offset)
    pub base_y: f32,
    /// Current offset from the rest line
    pub offset: f32,
    /// +1 moving down, -1 moving up
    pub direction: f32,
    /// Travel speed (units/s)
    pub speed: f32,
    /// Offset limit in either direction
    pub max_travel: f32,
}

impl Pusher {
    pub fn new(kind: PusherKind, rect: Rect, direction: f32, speed: f32, max_travel: f32) -> Self {
        Self {
            kind,
            rect,
            base_y: rect.center.y,
            offset: 0.0,
            direction,
            speed,
            max_travel,
        }
    }

    /// Move along y, bouncing between `-max_travel` and `max_travel`
    pub fn advance(&mut self, dt: f32) {
        let step = self.speed * dt;
        let mut next = self.offset + step * self.direction;

        if next.abs() >= self.max_travel {
            // Reflect the overshoot back inside the travel range
            let limit = self.max_travel * next.signum();
            next = (2.0 * limit - next).clamp(-self.max_travel, self.max_travel);
            self.direction = -self.direction;
        }

        self.offset = next;
        self.rect.center.y = self.base_y + self.offset;
    }
}

/// Derived placements for a playfield of a given size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub size: Vec2,
}

impl Layout {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    /// Narrow upper pusher
    pub fn top_pusher(&self) -> Rect {
        Rect::new(
            frac_point(self.size, 0.5, 0.25),
            Vec2::new(self.width() * 0.7, PUSHER_THICKNESS),
        )
    }

    /// Wide lower pusher
    pub fn bottom_pusher(&self) -> Rect {
        Rect::new(
            frac_point(self.size, 0.5, 0.7),
            Vec2::new(self.width() * 0.9, PUSHER_THICKNESS),
        )
    }

    /// Side walls, pusher barriers and floor
    pub fn walls(&self) -> Vec<Wall> {
        let (w, h) = (self.width(), self.height());
        let side = Vec2::new(WALL_THICKNESS, h);
        let barrier = Vec2::new(BARRIER_WIDTH, BARRIER_HEIGHT);

        vec![
            Wall {
                kind: WallKind::SideWall,
                rect: Rect::new(Vec2::new(WALL_THICKNESS / 2.0, h / 2.0), side),
            },
            Wall {
                kind: WallKind::SideWall,
                rect: Rect::new(Vec2::new(w - WALL_THICKNESS / 2.0, h / 2.0), side),
            },
            Wall {
                kind: WallKind::Barrier,
                rect: Rect::new(Vec2::new(w * 0.15 - 15.0, h * 0.25), barrier),
            },
            Wall {
                kind: WallKind::Barrier,
                rect: Rect::new(Vec2::new(w * 0.85 + 15.0, h * 0.25), barrier),
            },
            Wall {
                kind: WallKind::Floor,
                rect: Rect::new(
                    Vec2::new(w / 2.0, h - WALL_THICKNESS / 2.0),
                    Vec2::new(w, WALL_THICKNESS),
                ),
            },
        ]
    }

    /// Coins touching anything below this line are scored
    pub fn score_line(&self) -> f32 {
        self.height() - SCORE_LINE_MARGIN
    }

    /// Spawn band for the pile above the top pusher: (min, max)
    pub fn top_pile_area(&self) -> (Vec2, Vec2) {
        let min = frac_point(self.size, 0.15, 0.15);
        (min, Vec2::new(self.width() * 0.85, min.y + 60.0))
    }

    /// Spawn band for the pile above the bottom pusher: (min, max)
    pub fn bottom_pile_area(&self) -> (Vec2, Vec2) {
        let min = frac_point(self.size, 0.05, 0.5);
        (min, Vec2::new(self.width() * 0.95, min.y + 100.0))
    }

    /// Where a player's coin enters (before jitter)
    pub fn drop_point(&self) -> Vec2 {
        frac_point(self.size, 0.5, 0.15)
    }

    /// Horizontal band and height for reward coins: (x_min, x_max, y)
    pub fn reward_band(&self) -> (f32, f32, f32) {
        (self.width() * 0.3, self.width() * 0.7, self.height() * 0.05)
    }

    /// Coins outside this box are gone for good
    pub fn bounds(&self) -> Rect {
        let margin = Vec2::splat(100.0);
        Rect::new(self.size / 2.0, self.size + margin * 2.0)
    }
}
