//! Deterministic simulation module
//!
//! All gameplay logic lives here. Given a seed and the same sequence of
//! inputs, contexts and `dt` values, a run replays identically:
//! - Seeded RNG only, one PCG stream per field
//! - Stable iteration order (spawn order)
//! - No rendering, audio or platform dependencies; those consume [`GameEvent`]s

pub mod asteroids;
pub mod collision;
pub mod entity;
pub mod events;
pub mod player;
pub mod saucer;
pub mod state;
pub mod tempo;
pub mod tick;
pub mod weapon;

pub use asteroids::AsteroidField;
pub use collision::{entities_intersect, intersects, screen_wrap, wrap_entity};
pub use entity::{Entity, EntityId, EntityIds, PhysicsRecord};
pub use events::{
    AsteroidHitInfo, ExplosionKind, GameEvent, GameEvents, HitCause, Notification, SaucerHitInfo,
};
pub use player::{Aim, PlayerController, PlayerPhase};
pub use saucer::{Saucer, SaucerField};
pub use state::{GameState, RngState, asteroid_points, saucer_points};
pub use tempo::Tempo;
pub use tick::{TickContext, TickInput, tick};
pub use weapon::{Projectile, VolleyReport, Weapon, WeaponSpec};
