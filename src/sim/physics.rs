//! Rigid-body world for the cabinet
//!
//! Coins are dynamic balls, walls are fixed cuboids and the pushers are
//! kinematic position-based cuboids that follow [`Pusher::advance`]. Bodies
//! are inserted and stepped in a fixed order; with rapier's
//! `enhanced-determinism` feature the same seed replays bit-for-bit.

use std::fmt;

use glam::Vec2;
use rapier2d::prelude::*;

use super::body::{Coin, Pusher, Rect, Wall};
use crate::tuning::Tuning;

#[inline]
fn to_vector(v: Vec2) -> Vector<Real> {
    vector![v.x, v.y]
}

#[inline]
fn to_vec2(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

/// Physics world plus the handles the simulation drives directly
pub struct PhysicsWorld {
    gravity: Vector<Real>,
    params: IntegrationParameters,
    pipeline: PhysicsPipeline,
    islands: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd: CCDSolver,
    pusher_bodies: Vec<RigidBodyHandle>,
    restitution: f32,
    friction: f32,
    /// Linear damping equivalent to the per-frame air drag
    linear_damping: f32,
}

impl fmt::Debug for PhysicsWorld {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhysicsWorld")
            .field("bodies", &self.bodies.len())
            .field("colliders", &self.colliders.len())
            .field("dt", &self.params.dt)
            .finish()
    }
}

/// Convert drag applied per 1/60 s frame into a continuous damping rate
pub fn drag_to_damping(air_drag: f32) -> f32 {
    -60.0 * (1.0 - air_drag.clamp(0.0, 0.999)).ln()
}

impl PhysicsWorld {
    /// Build the static cabinet: fixed walls and kinematic pushers
    pub fn new(tuning: &Tuning, walls: &[Wall], pushers: &[Pusher]) -> Self {
        let mut params = IntegrationParameters::default();
        // Lengths are in screen-sized units; scale solver tolerances to a coin
        params.length_unit = tuning.coin_radius * 2.0;

        let mut world = Self {
            gravity: vector![0.0, tuning.gravity],
            params,
            pipeline: PhysicsPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd: CCDSolver::new(),
            pusher_bodies: Vec::with_capacity(pushers.len()),
            restitution: tuning.restitution,
            friction: tuning.friction,
            linear_damping: drag_to_damping(tuning.air_drag),
        };

        for wall in walls {
            let body = RigidBodyBuilder::fixed()
                .translation(to_vector(wall.rect.center))
                .build();
            world.insert_box(body, &wall.rect);
        }

        for pusher in pushers {
            let body = RigidBodyBuilder::kinematic_position_based()
                .translation(to_vector(pusher.rect.center))
                .build();
            let handle = world.insert_box(body, &pusher.rect);
            world.pusher_bodies.push(handle);
        }

        world
    }

    fn insert_box(&mut self, body: RigidBody, rect: &Rect) -> RigidBodyHandle {
        let handle = self.bodies.insert(body);
        let collider = ColliderBuilder::cuboid(rect.half.x, rect.half.y)
            .restitution(self.restitution)
            .friction(self.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Add a resting coin body
    pub fn add_coin(&mut self, pos: Vec2, radius: f32) -> RigidBodyHandle {
        let body = RigidBodyBuilder::dynamic()
            .translation(to_vector(pos))
            .linear_damping(self.linear_damping)
            .ccd_enabled(true)
            .build();
        let handle = self.bodies.insert(body);

        let collider = ColliderBuilder::ball(radius)
            .restitution(self.restitution)
            .friction(self.friction)
            .build();
        self.colliders
            .insert_with_parent(collider, handle, &mut self.bodies);
        handle
    }

    /// Remove a coin body and its collider
    pub fn remove_coin(&mut self, handle: RigidBodyHandle) {
        self.bodies.remove(
            handle,
            &mut self.islands,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            true,
        );
    }

    /// Number of live bodies (cabinet fixtures included)
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    /// Whether any collider on `handle` has an active contact
    fn is_touching(&self, handle: RigidBodyHandle) -> bool {
        let Some(body) = self.bodies.get(handle) else {
            return false;
        };
        body.colliders().iter().any(|&collider| {
            self.narrow_phase
                .contact_pairs_with(collider)
                .any(|pair| pair.has_any_active_contact)
        })
    }

    /// Move the pushers, step the world and copy results back onto the coins
    pub fn step(&mut self, dt: f32, pushers: &[Pusher], coins: &mut [Coin]) {
        for (pusher, &handle) in pushers.iter().zip(&self.pusher_bodies) {
            if let Some(body) = self.bodies.get_mut(handle) {
                body.set_next_kinematic_translation(to_vector(pusher.rect.center));
            }
        }

        self.params.dt = dt;
        self.pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd,
            None,
            &(),
            &(),
        );

        for coin in coins.iter_mut() {
            let Some(body) = self.bodies.get(coin.body) else {
                continue;
            };
            coin.pos = to_vec2(body.translation());
            coin.vel = to_vec2(body.linvel());
            coin.touching = self.is_touching(coin.body);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::body::{CoinColor, Layout, PusherKind};

    fn cabinet() -> (Layout, Vec<Wall>, Vec<Pusher>, Tuning) {
        let tuning = Tuning::default();
        let layout = Layout::new(800.0, 700.0);
        let walls = layout.walls();
        let pushers = vec![
            Pusher::new(PusherKind::Top, layout.top_pusher(), 1.0, 125.0, 80.0),
            Pusher::new(PusherKind::Bottom, layout.bottom_pusher(), -1.0, 125.0, 80.0),
        ];
        (layout, walls, pushers, tuning)
    }

    #[test]
    fn test_drag_to_damping() {
        assert_eq!(drag_to_damping(0.0), 0.0);
        // 1% per frame is about 0.6 per second
        assert!((drag_to_damping(0.01) - 0.603).abs() < 1e-3);
    }

    #[test]
    fn test_new_builds_fixtures() {
        let (_, walls, pushers, tuning) = cabinet();
        let world = PhysicsWorld::new(&tuning, &walls, &pushers);
        assert_eq!(world.body_count(), walls.len() + pushers.len());
    }

    #[test]
    fn test_coin_falls_and_lands_on_floor() {
        let (layout, walls, pushers, tuning) = cabinet();
        let mut world = PhysicsWorld::new(&tuning, &walls, &pushers);
        let start = Vec2::new(400.0, 640.0);
        let body = world.add_coin(start, 12.0);
        let mut coins = vec![Coin::new(1, start, 12.0, CoinColor::Gold, body)];

        world.step(SIM_DT, &pushers, &mut coins);
        assert!(coins[0].pos.y > start.y);
        assert!(coins[0].vel.y > 0.0);

        for _ in 0..120 {
            world.step(SIM_DT, &pushers, &mut coins);
        }
        let floor_top = layout.height() - crate::consts::WALL_THICKNESS;
        assert!((coins[0].pos.y - (floor_top - 12.0)).abs() < 1.0);
        assert!(coins[0].touching);
    }

    #[test]
    fn test_free_coin_is_not_touching() {
        let (_, walls, pushers, tuning) = cabinet();
        let mut world = PhysicsWorld::new(&tuning, &walls, &pushers);
        let start = Vec2::new(400.0, 20.0);
        let body = world.add_coin(start, 12.0);
        let mut coins = vec![Coin::new(1, start, 12.0, CoinColor::Gold, body)];

        world.step(SIM_DT, &pushers, &mut coins);
        assert!(!coins[0].touching);
    }

    #[test]
    fn test_remove_coin_drops_body() {
        let (_, walls, pushers, tuning) = cabinet();
        let mut world = PhysicsWorld::new(&tuning, &walls, &pushers);
        let fixtures = world.body_count();
        let body = world.add_coin(Vec2::new(400.0, 20.0), 12.0);
        assert_eq!(world.body_count(), fixtures + 1);

        world.remove_coin(body);
        assert_eq!(world.body_count(), fixtures);
    }

    #[test]
    fn test_stacked_coins_do_not_sink_into_each_other() {
        let (_, walls, pushers, tuning) = cabinet();
        let mut world = PhysicsWorld::new(&tuning, &walls, &pushers);
        let mut coins = Vec::new();
        for i in 0..5 {
            let pos = Vec2::new(400.0, 670.0 - i as f32 * 26.0);
            let body = world.add_coin(pos, 12.0);
            coins.push(Coin::new(i + 1, pos, 12.0, CoinColor::Gold, body));
        }

        for _ in 0..240 {
            world.step(SIM_DT, &pushers, &mut coins);
        }
        for (i, a) in coins.iter().enumerate() {
            for b in &coins[i + 1..] {
                assert!(a.pos.distance(b.pos) > 24.0 - 2.0);
            }
        }
    }
}
