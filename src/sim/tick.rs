//! Simulation tick
//!
//! Advances every subsystem in a fixed order, resolves collisions, then runs
//! the score, level and game-over bookkeeping. The order matters: collisions
//! see positions after everything has moved, and level completion is judged
//! after this tick's hits have been applied.

use serde::{Deserialize, Serialize};

use super::collision::entities_intersect;
use super::entity::EntityId;
use super::events::{
    AsteroidHitInfo, GameEvent, HitCause, Notification, SaucerHitInfo, deliver,
};
use super::player::Aim;
use super::state::{GameState, asteroid_points, saucer_points};
use crate::Viewport;
use crate::audio::SoundCue;

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TickInput {
    /// Ship facing (mouse/touch point or dial angle)
    pub aim: Aim,
    /// Fire held
    pub fire: bool,
    /// Thrust held
    pub thrust: bool,
}

/// Per-tick context supplied by the host
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickContext {
    /// Current playfield size; may change between ticks
    pub viewport: Viewport,
}

impl TickContext {
    pub fn new(viewport: Viewport) -> Self {
        Self { viewport }
    }
}

/// Advance the game by `dt` seconds and return what happened
pub fn tick(state: &mut GameState, input: &TickInput, ctx: &TickContext, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    state.time_ticks += 1;

    // Viewport sync
    state.viewport = ctx.viewport;
    let viewport = state.viewport;

    // Ship
    state
        .player
        .apply_input(input.aim, input.fire, input.thrust, &mut events);
    state.player.tick(dt, &viewport, &mut events);

    // Rocks (no new spawns during the game-over hold)
    state.asteroids.tick(dt, &viewport, !state.game_over);

    // Saucer
    let target = state.player_target();
    state.saucers.tick(dt, &viewport, target, &mut events);

    // Collisions: shots land first, so the ship only meets what survived them
    for note in detect_shot_hits(state) {
        resolve(state, &note, &mut events);
    }
    if let Some(note) = detect_player_hit(state) {
        resolve(state, &note, &mut events);
    }

    if !state.game_over && state.player.lives() < 1 {
        begin_game_over(state, &mut events);
    }

    if !state.game_over && state.asteroids.wave_complete() {
        complete_level(state, &mut events);
    }

    check_extra_life(state, &mut events);

    if !state.game_over {
        if let Some(cue) = state.tempo.update(dt) {
            events.push(GameEvent::Sound(cue));
        }
    } else {
        state.game_over_timer -= dt;
        if state.game_over_timer <= 0.0 {
            resume_round(state, &mut events);
        }
    }

    events
}

/// Find where player projectiles landed this tick.
///
/// Each rock registers at most one hit and each player projectile hits at
/// most one target.
fn detect_shot_hits(state: &GameState) -> Vec<Notification> {
    let mut notes = Vec::new();
    let mut spent: Vec<EntityId> = Vec::new();

    for asteroid in state.asteroids.asteroids().iter().filter(|a| a.is_collidable()) {
        let hit = state
            .player
            .weapon()
            .projectiles()
            .filter(|p| p.visible && !spent.contains(&p.id))
            .find(|p| entities_intersect(asteroid, p));

        if let Some(projectile) = hit {
            spent.push(projectile.id);
            notes.push(Notification::AsteroidHit(AsteroidHitInfo {
                asteroid: asteroid.id,
                projectile: projectile.id,
                lives: asteroid.lives,
                position: asteroid.position,
                points: asteroid_points(asteroid.lives),
            }));
        }
    }

    if let Some(saucer) = state.saucers.saucer() {
        let body = saucer.entity();
        if body.is_collidable() {
            let hit = state
                .player
                .weapon()
                .projectiles()
                .filter(|p| p.visible && !spent.contains(&p.id))
                .find(|p| entities_intersect(body, p));

            if let Some(projectile) = hit {
                notes.push(Notification::SaucerHit(SaucerHitInfo {
                    projectile: projectile.id,
                    iq: saucer.iq(),
                    position: body.position,
                    points: saucer_points(saucer.iq()),
                }));
            }
        }
    }

    notes
}

/// At most one ship hit per tick: rocks first, then saucer shots, then the
/// saucer body
fn detect_player_hit(state: &GameState) -> Option<Notification> {
    if !state.player.is_ready() {
        return None;
    }

    let ship = state.player.ship();
    state
        .asteroids
        .asteroids()
        .iter()
        .filter(|a| a.is_collidable())
        .find(|a| entities_intersect(a, ship))
        .map(|a| HitCause::Asteroid(a.id))
        .or_else(|| {
            let saucer = state.saucers.saucer()?;
            saucer
                .projectiles()
                .find(|p| entities_intersect(p, ship))
                .map(|p| HitCause::SaucerShot(p.id))
                .or_else(|| {
                    let body = saucer.entity();
                    (body.is_collidable() && entities_intersect(body, ship))
                        .then_some(HitCause::SaucerBody)
                })
        })
        .map(Notification::PlayerHit)
}

/// Fan a notification out to every subsystem
fn dispatch(state: &mut GameState, note: &Notification, events: &mut Vec<GameEvent>) {
    deliver(&mut state.player, note, events);
    deliver(&mut state.asteroids, note, events);
    deliver(&mut state.saucers, note, events);
}

/// Apply orchestrator bookkeeping for a hit, then notify the subsystems
fn resolve(state: &mut GameState, note: &Notification, events: &mut Vec<GameEvent>) {
    match note {
        Notification::AsteroidHit(hit) => {
            state.score += hit.points;
            events.push(GameEvent::AsteroidDestroyed {
                tier: hit.lives,
                points: hit.points,
                position: hit.position,
                split: hit.lives > 1,
            });
            events.push(GameEvent::ScoreChanged { score: state.score });
            log::debug!("Asteroid {} hit (tier {}), +{}", hit.asteroid.0, hit.lives, hit.points);
            dispatch(state, note, events);
        }
        Notification::SaucerHit(hit) => {
            state.score += hit.points;
            events.push(GameEvent::SaucerDestroyed {
                iq: hit.iq,
                points: hit.points,
            });
            events.push(GameEvent::ScoreChanged { score: state.score });
            dispatch(state, note, events);
        }
        Notification::PlayerHit(cause) => {
            dispatch(state, note, events);
            let lives_left = state.player.lives();
            events.push(GameEvent::PlayerHit { lives_left });
            log::info!("Ship hit by {cause:?}, {lives_left} lives left");
        }
        Notification::LevelComplete { .. } | Notification::GameOver => dispatch(state, note, events),
    }
}

fn complete_level(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.level += 1;
    state.tempo.reset();
    log::info!("Level complete, now level {} (score {})", state.level, state.score);

    events.push(GameEvent::LevelComplete { level: state.level });
    let note = Notification::LevelComplete { level: state.level };
    dispatch(state, &note, events);
}

fn begin_game_over(state: &mut GameState, events: &mut Vec<GameEvent>) {
    log::info!("Game over at level {} with {} points", state.level, state.score);
    events.push(GameEvent::GameOver {
        final_score: state.score,
        level: state.level,
    });
    dispatch(state, &Notification::GameOver, events);

    state.level = 1;
    state.score = 0;
    state.extra_life_accumulator = 0;
    state.game_over = true;
    state.game_over_timer = state.tuning.game_over_cooldown;
    state.tempo.reset();
    events.push(GameEvent::ScoreChanged { score: 0 });
}

fn resume_round(state: &mut GameState, events: &mut Vec<GameEvent>) {
    state.game_over = false;
    state.game_over_timer = 0.0;
    state.asteroids.reset(state.level);
    state.saucers.reset(state.level, events);
    state.tempo.reset();
    events.push(GameEvent::RoundResumed);
    log::info!("New round starting");
}

/// Grant a ship each time the score clears another interval.
///
/// The accumulator advances by exactly one interval per grant so points past
/// the threshold carry over.
fn check_extra_life(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let interval = state.tuning.extra_life_interval;
    if interval == 0 || state.score.saturating_sub(state.extra_life_accumulator) <= interval {
        return;
    }

    state.extra_life_accumulator += interval;
    if state.player.add_life() {
        let lives = state.player.lives();
        events.push(GameEvent::Sound(SoundCue::ExtraShip));
        events.push(GameEvent::ExtraLife { lives });
        log::info!("Extra ship at {} points ({lives} lives)", state.score);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::player::PlayerPhase;
    use crate::tuning::Tuning;
    use glam::Vec2;

    const DT: f32 = 1.0 / 60.0;

    fn setup() -> (GameState, TickContext) {
        let vp = Viewport::new(800.0, 600.0);
        (GameState::new(12345, vp), TickContext::new(vp))
    }

    /// Park a ready, motionless rock at `position`
    fn park_rock(state: &mut GameState, position: Vec2, lives: u32) {
        let vp = state.viewport;
        state.asteroids.spawn(&vp);
        let last = state.asteroids.len() - 1;
        let rock = &mut state.asteroids.asteroids_mut()[last];
        rock.position = position;
        rock.lives = lives;
        rock.ready = true;
        rock.physics.speed = 0.0;
        rock.physics.refresh_velocity();
    }

    fn count(events: &[GameEvent], pred: impl Fn(&GameEvent) -> bool) -> usize {
        events.iter().filter(|e| pred(e)).count()
    }

    fn tuned(tuning: Tuning) -> (GameState, TickContext) {
        let vp = Viewport::new(800.0, 600.0);
        (GameState::with_tuning(12345, vp, tuning), TickContext::new(vp))
    }

    /// Park a motionless saucer at `position`
    fn park_saucer(state: &mut GameState, position: Vec2) {
        let vp = state.viewport;
        let mut scratch = Vec::new();
        state.saucers.spawn(&vp, &mut scratch);
        if let Some(saucer) = state.saucers.saucer_mut() {
            let body = saucer.entity_mut();
            body.position = position;
            body.physics.speed = 0.0;
            body.physics.refresh_velocity();
        }
    }

    const FIRE_UP: TickInput = TickInput {
        aim: Aim::Angle(0.0),
        fire: true,
        thrust: false,
    };

    #[test]
    fn test_shot_scores_and_splits() {
        let (mut state, ctx) = setup();
        let center = state.viewport.center();
        park_rock(&mut state, center - Vec2::new(0.0, 100.0), 3);

        let fire = TickInput {
            aim: Aim::Angle(0.0),
            fire: true,
            thrust: false,
        };
        let mut events = tick(&mut state, &fire, &ctx, DT);
        let mut frames = 0;
        while !events.iter().any(|e| matches!(e, GameEvent::AsteroidDestroyed { .. })) {
            events = tick(&mut state, &TickInput::default(), &ctx, DT);
            frames += 1;
            assert!(frames < 60, "shot never landed");
        }

        assert_eq!(state.score, 20);
        assert!(events.contains(&GameEvent::ScoreChanged { score: 20 }));
        assert!(events.contains(&GameEvent::Sound(SoundCue::Bang { tier: 2 })));
        assert!(state.player.weapon().is_empty(), "projectile consumed");
        assert_eq!(
            state.asteroids.asteroids().iter().filter(|a| a.lives == 2).count(),
            2
        );
    }

    #[test]
    fn test_rock_hits_ship_once_per_tick() {
        let (mut state, ctx) = setup();
        let center = state.viewport.center();
        park_rock(&mut state, center, 3);
        park_rock(&mut state, center + Vec2::new(5.0, 0.0), 3);

        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerHit { .. })), 1);
        assert!(events.contains(&GameEvent::PlayerHit { lives_left: 2 }));
        // The rock that hit the ship is untouched
        assert_eq!(state.asteroids.len(), 2);
        assert!(state.asteroids.asteroids().iter().all(|a| a.lives == 3));
        assert!(matches!(state.player.phase(), PlayerPhase::Exploding { .. }));

        // No second hit while the ship is down
        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerHit { .. })), 0);
    }

    #[test]
    fn test_shot_rock_cannot_hit_ship() {
        let (mut state, ctx) = setup();
        let center = state.viewport.center();
        // Touching the ship, and inside the muzzle's reach
        park_rock(&mut state, center - Vec2::new(0.0, 30.0), 3);

        let events = tick(&mut state, &FIRE_UP, &ctx, DT);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::AsteroidDestroyed { .. })), 1);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerHit { .. })), 0);
        assert_eq!(state.lives(), 3);
        assert_eq!(state.player.phase(), PlayerPhase::Alive);
        // The fragments sit on the ship but are still spawn protected
        let fragments: Vec<_> = state.asteroids.asteroids().iter().filter(|a| a.lives == 2).collect();
        assert_eq!(fragments.len(), 2);
        assert!(fragments.iter().all(|a| !a.is_collidable()));
    }

    #[test]
    fn test_rock_takes_one_hit_per_tick() {
        let mut tuning = Tuning::default();
        tuning.player.shoot_delay = 0.01;
        let (mut state, ctx) = tuned(tuning);

        // Two shots leave the muzzle together and fly as one
        tick(&mut state, &FIRE_UP, &ctx, DT);
        assert_eq!(state.player.weapon().len(), 2);
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), &ctx, DT);
        }
        let shots: Vec<Vec2> = state.player.weapon().projectiles().map(|p| p.position).collect();
        assert_eq!(shots.len(), 2);
        assert!(shots[0].distance(shots[1]) < 1e-3);

        park_rock(&mut state, shots[0] - Vec2::new(0.0, 10.0), 3);
        let events = tick(&mut state, &TickInput::default(), &ctx, DT);

        assert_eq!(count(&events, |e| matches!(e, GameEvent::AsteroidDestroyed { .. })), 1);
        assert_eq!(state.score, 20);
        assert_eq!(state.player.weapon().len(), 1, "second shot flies on");
        assert_eq!(
            state.asteroids.asteroids().iter().filter(|a| a.lives == 2).count(),
            2
        );
    }

    #[test]
    fn test_saucer_shot_hits_ship() {
        let mut tuning = Tuning::default();
        tuning.saucer.aim_threshold = 0.0;
        let (mut state, ctx) = tuned(tuning);
        let center = state.viewport.center();
        park_saucer(&mut state, center - Vec2::new(0.0, 200.0));

        let mut hit = None;
        for _ in 0..120 {
            let events = tick(&mut state, &TickInput::default(), &ctx, DT);
            if count(&events, |e| matches!(e, GameEvent::PlayerHit { .. })) > 0 {
                hit = Some(events);
                break;
            }
        }
        let events = hit.expect("saucer shot never reached the ship");

        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerHit { .. })), 1);
        assert!(events.contains(&GameEvent::PlayerHit { lives_left: 2 }));
        assert_eq!(count(&events, |e| matches!(e, GameEvent::SaucerDestroyed { .. })), 0);

        // The shot is spent and the saucer stands down while the ship is out
        let saucer = state.saucers.saucer().expect("saucer survives");
        assert!(saucer.weapon().is_empty());
        assert!(!saucer.weapon().is_firing());

        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerHit { .. })), 0);
    }

    #[test]
    fn test_saucer_on_ship_hits_once() {
        let (mut state, ctx) = setup();
        let center = state.viewport.center();
        // Body and fresh muzzle shot both overlap the ship
        park_saucer(&mut state, center);

        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::PlayerHit { .. })), 1);
        assert_eq!(state.lives(), 2);
        let saucer = state.saucers.saucer().expect("body contact leaves the saucer");
        assert!(saucer.weapon().is_empty());
    }

    #[test]
    fn test_level_completes_exactly_once() {
        let (mut state, ctx) = setup();
        let vp = state.viewport;
        let mut scratch = Vec::new();
        assert_eq!(state.asteroids.target(), 2);

        for _ in 0..2 {
            let id = state.asteroids.spawn(&vp);
            let last = state.asteroids.len() - 1;
            state.asteroids.asteroids_mut()[last].lives = 1;
            state.asteroids.destroy(id, &mut scratch);
        }

        let mut completions = 0;
        for _ in 0..120 {
            let events = tick(&mut state, &TickInput::default(), &ctx, DT);
            completions += count(&events, |e| matches!(e, GameEvent::LevelComplete { .. }));
        }
        assert_eq!(completions, 1);
        assert_eq!(state.level, 2);
        assert_eq!(state.asteroids.target(), 3);
    }

    #[test]
    fn test_extra_life_keeps_overflow() {
        let (mut state, ctx) = setup();
        let mut scratch = Vec::new();
        state.player.hit(&mut scratch);
        assert_eq!(state.lives(), 2);

        state.score = 9_999;
        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert!(!events.contains(&GameEvent::Sound(SoundCue::ExtraShip)));

        state.score = 10_500;
        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::ExtraLife { .. })), 1);
        assert_eq!(state.lives(), 3);
        assert_eq!(state.extra_life_accumulator, 10_000);

        // Nothing more until another full interval is cleared
        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert_eq!(count(&events, |e| matches!(e, GameEvent::ExtraLife { .. })), 0);
    }

    #[test]
    fn test_extra_life_capped_still_advances() {
        let (mut state, ctx) = setup();
        state.score = 10_001;
        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert_eq!(state.lives(), 3);
        assert_eq!(state.extra_life_accumulator, 10_000);
        assert!(!events.contains(&GameEvent::Sound(SoundCue::ExtraShip)));
    }

    #[test]
    fn test_game_over_and_resume() {
        let (mut state, ctx) = setup();
        state.score = 1_230;
        state.level = 4;
        state.player.ship_mut().lives = 1;
        let center = state.viewport.center();
        park_rock(&mut state, center, 3);

        let events = tick(&mut state, &TickInput::default(), &ctx, DT);
        assert!(events.contains(&GameEvent::GameOver {
            final_score: 1_230,
            level: 4,
        }));
        assert!(state.game_over);
        assert_eq!(state.score, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.extra_life_accumulator, 0);
        assert!(state.asteroids.is_empty());
        assert_eq!(state.lives(), 3);

        // Nothing spawns during the hold
        let mut resumed = false;
        for _ in 0..(60 * 3 + 5) {
            let events = tick(&mut state, &TickInput::default(), &ctx, DT);
            if events.contains(&GameEvent::RoundResumed) {
                resumed = true;
                break;
            }
            assert!(state.asteroids.is_empty());
            assert_eq!(count(&events, |e| matches!(e, GameEvent::Sound(SoundCue::Beat { .. }))), 0);
        }
        assert!(resumed);
        assert!(!state.game_over);
        assert_eq!(state.asteroids.target(), 2);
    }

    #[test]
    fn test_saucer_shot_down() {
        let (mut state, ctx) = setup();
        let vp = state.viewport;
        let mut scratch = Vec::new();
        state.saucers.spawn(&vp, &mut scratch);
        let iq = state.saucers.saucer().unwrap().iq();

        let center = vp.center();
        let saucer = state.saucers.saucer_mut().unwrap();
        saucer.entity_mut().position = center - Vec2::new(0.0, 150.0);
        saucer.entity_mut().physics.speed = 0.0;

        let fire = TickInput {
            aim: Aim::Angle(0.0),
            fire: true,
            thrust: false,
        };
        let mut destroyed = None;
        for _ in 0..60 {
            let events = tick(&mut state, &fire, &ctx, DT);
            if let Some(e) = events.iter().find(|e| matches!(e, GameEvent::SaucerDestroyed { .. })) {
                destroyed = Some(e.clone());
                break;
            }
        }

        let expected = saucer_points(iq);
        assert_eq!(
            destroyed,
            Some(GameEvent::SaucerDestroyed { iq, points: expected })
        );
        assert!(state.saucers.saucer().is_none());
        assert!(state.score >= expected);
    }

    #[test]
    fn test_determinism() {
        let (mut a, ctx) = setup();
        let (mut b, _) = setup();
        let inputs = [
            TickInput {
                aim: Aim::Angle(0.5),
                fire: true,
                thrust: true,
            },
            TickInput::default(),
            TickInput {
                aim: Aim::Toward(Vec2::new(10.0, 10.0)),
                fire: true,
                thrust: false,
            },
        ];

        for step in 0..600 {
            let input = &inputs[step % inputs.len()];
            let ea = tick(&mut a, input, &ctx, DT);
            let eb = tick(&mut b, input, &ctx, DT);
            assert_eq!(ea, eb);
        }

        assert_eq!(a.score, b.score);
        assert_eq!(a.asteroids.len(), b.asteroids.len());
        for (x, y) in a.asteroids.asteroids().iter().zip(b.asteroids.asteroids()) {
            assert_eq!(x.position, y.position);
        }
    }
}
