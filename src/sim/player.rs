//! Player ship controller
//!
//! Wraps the ship entity and its gun. Thrust accumulates while the thrust
//! input is held and bleeds off through friction otherwise, so the ship
//! drifts. A hit sends the ship through `Exploding` and `Spawning` before it
//! is controllable again.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::wrap_entity;
use super::entity::{Entity, EntityId, PhysicsRecord};
use super::events::{AsteroidHitInfo, ExplosionKind, GameEvent, GameEvents, HitCause, SaucerHitInfo};
use super::weapon::{Weapon, WeaponSpec};
use crate::audio::SoundCue;
use crate::tuning::PlayerTuning;
use crate::{Viewport, direction_to_heading, heading_to_direction};

/// How the input surface wants the ship to face
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum Aim {
    /// Keep the current rotation
    #[default]
    Hold,
    /// Face a point on the playfield (mouse, touch)
    Toward(Vec2),
    /// Face an absolute angle (dial)
    Angle(f32),
}

/// Ship lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PlayerPhase {
    /// Visible, controllable, collidable
    Alive,
    /// Hidden while the explosion plays
    Exploding { remaining: f32 },
    /// Hidden at the spawn point, waiting to become ready
    Spawning { remaining: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerController {
    ship: Entity,
    /// Accumulated thrust, used directly as velocity
    thrust: Vec2,
    thrusting: bool,
    weapon: Weapon,
    phase: PlayerPhase,
    tuning: PlayerTuning,
    max_lives: u32,
}

impl PlayerController {
    pub fn new(tuning: &PlayerTuning, max_lives: u32, viewport: &Viewport) -> Self {
        let physics = PhysicsRecord::new(tuning.radius, 0.0, heading_to_direction(0.0));
        let ship = Entity::new(EntityId(0), viewport.center(), max_lives, physics);
        let weapon = Weapon::new(WeaponSpec {
            cadence: tuning.shoot_delay,
            lifetime: tuning.bullet_lifetime,
            speed: tuning.bullet_speed,
            muzzle_offset: tuning.muzzle_offset,
            radius: tuning.bullet_radius,
        });

        Self {
            ship,
            thrust: Vec2::ZERO,
            thrusting: false,
            weapon,
            phase: PlayerPhase::Alive,
            tuning: tuning.clone(),
            max_lives,
        }
    }

    pub fn ship(&self) -> &Entity {
        &self.ship
    }

    pub fn ship_mut(&mut self) -> &mut Entity {
        &mut self.ship
    }

    pub fn weapon(&self) -> &Weapon {
        &self.weapon
    }

    pub fn phase(&self) -> PlayerPhase {
        self.phase
    }

    pub fn thrust(&self) -> Vec2 {
        self.thrust
    }

    pub fn is_thrusting(&self) -> bool {
        self.thrusting
    }

    pub fn lives(&self) -> u32 {
        self.ship.lives
    }

    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    /// Controllable and eligible for collisions
    pub fn is_ready(&self) -> bool {
        self.phase == PlayerPhase::Alive && self.ship.is_collidable()
    }

    /// Apply this tick's input. Ignored unless the ship is ready.
    pub fn apply_input(&mut self, aim: Aim, fire: bool, thrust: bool, out: &mut Vec<GameEvent>) {
        if !self.is_ready() {
            return;
        }

        match aim {
            Aim::Hold => {}
            Aim::Toward(target) => {
                let look = target - self.ship.position;
                if look.length_squared() > f32::EPSILON {
                    self.ship.rotation = direction_to_heading(look);
                }
            }
            Aim::Angle(angle) => self.ship.rotation = angle,
        }
        self.weapon.set_aim(self.ship.rotation);
        self.weapon.set_firing(fire);

        if thrust && !self.thrusting {
            self.start_thruster(out);
        } else if !thrust && self.thrusting {
            self.stop_thruster(out);
        }
    }

    /// Advance the ship one tick
    pub fn tick(&mut self, dt: f32, viewport: &Viewport, out: &mut Vec<GameEvent>) {
        match self.phase {
            PlayerPhase::Alive => {
                let report = self.weapon.update(dt, self.ship.position, viewport);
                for _ in 0..report.fired {
                    out.push(GameEvent::Sound(SoundCue::Fire));
                }
                self.update_thrust(dt);
            }
            PlayerPhase::Exploding { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.respawn(viewport);
                } else {
                    self.phase = PlayerPhase::Exploding { remaining };
                }
            }
            PlayerPhase::Spawning { remaining } => {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.ship.visible = true;
                    self.ship.ready = true;
                    self.phase = PlayerPhase::Alive;
                    log::debug!("Ship ready ({} lives)", self.ship.lives);
                } else {
                    self.phase = PlayerPhase::Spawning { remaining };
                }
            }
        }

        wrap_entity(&mut self.ship, viewport);
    }

    fn update_thrust(&mut self, dt: f32) {
        let direction = heading_to_direction(self.ship.rotation);
        self.ship.physics.direction = direction;

        if self.thrusting {
            self.thrust += self.tuning.acceleration * direction * dt;
        } else {
            // Exponential-ish decay; never exactly zero but close enough to count as stopped
            let keep = (1.0 - self.tuning.friction * dt).max(0.0);
            self.thrust *= keep;
        }

        self.ship.physics.speed = self.thrust.length();
        self.ship.physics.velocity = self.thrust;
        self.ship.position += self.thrust * dt;
    }

    fn start_thruster(&mut self, out: &mut Vec<GameEvent>) {
        self.thrusting = true;
        out.push(GameEvent::Sound(SoundCue::Thrust));
    }

    fn stop_thruster(&mut self, out: &mut Vec<GameEvent>) {
        if self.thrusting {
            self.thrusting = false;
            out.push(GameEvent::StopSound(SoundCue::Thrust));
        }
    }

    /// Take a hit. Returns the lives left. Hits outside `Alive` are ignored.
    pub fn hit(&mut self, out: &mut Vec<GameEvent>) -> u32 {
        if self.phase != PlayerPhase::Alive {
            return self.ship.lives;
        }

        self.ship.lives = self.ship.lives.saturating_sub(1);
        self.weapon.stop_firing();
        self.weapon.clear_all();
        self.stop_thruster(out);

        out.push(GameEvent::Explosion {
            position: self.ship.position,
            kind: ExplosionKind::Ship,
        });

        self.ship.ready = false;
        self.ship.visible = false;
        self.ship.rotation = 0.0;
        self.phase = PlayerPhase::Exploding {
            remaining: self.tuning.explosion_duration,
        };

        log::debug!("Ship hit, {} lives left", self.ship.lives);
        self.ship.lives
    }

    /// Back to the spawn point, hidden, waiting out the spawn delay
    fn respawn(&mut self, viewport: &Viewport) {
        self.thrust = Vec2::ZERO;
        self.thrusting = false;
        self.weapon.stop_firing();

        self.ship.position = viewport.center();
        self.ship.rotation = 0.0;
        self.ship.physics.set_kinematics(self.tuning.radius, 0.0, heading_to_direction(0.0));
        self.ship.visible = false;
        self.ship.ready = false;
        self.phase = PlayerPhase::Spawning {
            remaining: self.tuning.spawn_delay,
        };
    }

    /// Grant a life unless already at the cap. Returns whether one was added.
    pub fn add_life(&mut self) -> bool {
        if self.ship.lives < self.max_lives {
            self.ship.lives += 1;
            true
        } else {
            false
        }
    }
}

impl GameEvents for PlayerController {
    fn on_asteroid_hit(&mut self, hit: &AsteroidHitInfo, _out: &mut Vec<GameEvent>) {
        self.weapon.destroy_one(hit.projectile);
    }

    fn on_saucer_hit(&mut self, hit: &SaucerHitInfo, _out: &mut Vec<GameEvent>) {
        self.weapon.destroy_one(hit.projectile);
    }

    fn on_player_hit(&mut self, _cause: HitCause, out: &mut Vec<GameEvent>) {
        self.hit(out);
    }

    fn on_game_over(&mut self, out: &mut Vec<GameEvent>) {
        self.ship.lives = self.max_lives;
        self.stop_thruster(out);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn controller() -> (PlayerController, Viewport) {
        let vp = Viewport::new(800.0, 600.0);
        (PlayerController::new(&PlayerTuning::default(), 3, &vp), vp)
    }

    #[test]
    fn test_starts_ready_at_center() {
        let (player, vp) = controller();
        assert!(player.is_ready());
        assert_eq!(player.ship().position, vp.center());
        assert_eq!(player.lives(), 3);
    }

    #[test]
    fn test_thrust_accumulates_and_decays() {
        let (mut player, vp) = controller();
        let mut out = Vec::new();

        player.apply_input(Aim::Angle(0.0), false, true, &mut out);
        assert_eq!(out, vec![GameEvent::Sound(SoundCue::Thrust)]);
        for _ in 0..30 {
            player.tick(DT, &vp, &mut out);
        }
        let boosted = player.thrust().length();
        // Half a second at 360 px/s²
        assert!((boosted - 180.0).abs() < 1.0, "thrust {boosted}");
        assert!(player.thrust().y < 0.0, "thrusting up the screen");

        out.clear();
        player.apply_input(Aim::Hold, false, false, &mut out);
        assert_eq!(out, vec![GameEvent::StopSound(SoundCue::Thrust)]);
        for _ in 0..60 {
            player.tick(DT, &vp, &mut out);
        }
        let coasting = player.thrust().length();
        assert!(coasting < boosted);
        assert!(coasting > 0.0, "decay is asymptotic");
    }

    #[test]
    fn test_aim_toward_point() {
        let (mut player, vp) = controller();
        let mut out = Vec::new();
        let right_of_ship = vp.center() + Vec2::new(100.0, 0.0);
        player.apply_input(Aim::Toward(right_of_ship), false, false, &mut out);
        assert!((player.ship().rotation - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        assert!((player.weapon().aim() - player.ship().rotation).abs() < 1e-6);
    }

    #[test]
    fn test_fire_and_thrust_together() {
        let (mut player, vp) = controller();
        let mut out = Vec::new();
        player.apply_input(Aim::Hold, true, true, &mut out);
        player.tick(DT, &vp, &mut out);
        assert!(player.is_thrusting());
        assert_eq!(player.weapon().len(), 1);
        assert!(out.contains(&GameEvent::Sound(SoundCue::Fire)));
    }

    #[test]
    fn test_hit_respawn_cycle() {
        let (mut player, vp) = controller();
        let mut out = Vec::new();
        player.apply_input(Aim::Hold, true, true, &mut out);
        player.tick(DT, &vp, &mut out);
        assert!(!player.weapon().is_empty());

        let left = player.hit(&mut out);
        assert_eq!(left, 2);
        assert!(!player.is_ready());
        assert!(!player.ship().visible);
        assert!(player.weapon().is_empty());
        assert!(!player.is_thrusting());
        assert!(matches!(player.phase(), PlayerPhase::Exploding { .. }));

        // A second hit while exploding changes nothing
        assert_eq!(player.hit(&mut out), 2);

        // Input is ignored while not ready
        player.apply_input(Aim::Hold, true, false, &mut out);
        assert!(!player.weapon().is_firing());

        let mut t = 0.0;
        while !player.is_ready() {
            player.tick(DT, &vp, &mut out);
            t += DT;
            assert!(t < 5.0, "ship never respawned");
        }
        // Explosion (1.5 s) then spawn delay (1.0 s)
        assert!((t - 2.5).abs() < 0.05, "respawned after {t}");
        assert_eq!(player.ship().position, vp.center());
        assert_eq!(player.thrust(), Vec2::ZERO);
    }

    #[test]
    fn test_add_life_is_capped() {
        let (mut player, _) = controller();
        assert!(!player.add_life());
        let mut out = Vec::new();
        player.hit(&mut out);
        assert!(player.add_life());
        assert_eq!(player.lives(), 3);
    }

    #[test]
    fn test_ship_wraps() {
        let (mut player, vp) = controller();
        player.ship_mut().position = Vec2::new(vp.width + 100.0, 300.0);
        let mut out = Vec::new();
        player.tick(DT, &vp, &mut out);
        assert!(player.ship().position.x <= 0.0);
    }
}
