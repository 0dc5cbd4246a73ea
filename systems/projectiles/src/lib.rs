#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that flies homing projectiles and resolves their fate.
//!
//! Every tick a projectile either connects with its target, expires, or
//! reports its new kinematic state. Steering is a pure function of the
//! current heading, the offset to the target and the turn limit.

use std::time::Duration;

use glam::Vec2;
use rampart_core::{
    config::ProjectileConfig, Command, EnemyView, ExpiryReason, FlightState, ProjectileView, Rect,
};
use tracing::trace;

/// Constants governing projectile flight.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightRules {
    /// Distance covered every tick.
    pub speed: f32,
    /// Projectile radius used for hit tests.
    pub projectile_radius: f32,
    /// Enemy radius used for hit tests.
    pub enemy_radius: f32,
    /// Distance after which a projectile expires.
    pub max_distance: f32,
    /// Time a projectile may fly without a target.
    pub lost_target_timeout: Duration,
    /// Maximum heading change per tick, in degrees.
    pub max_turn_degrees: f32,
    /// Region outside which a projectile expires.
    pub arena: Rect,
}

impl FlightRules {
    /// Derives the rules from configuration, an enemy radius and the playfield.
    #[must_use]
    pub fn new(config: &ProjectileConfig, enemy_radius: f32, playfield: Rect) -> Self {
        Self {
            speed: config.speed_per_tick,
            projectile_radius: config.collision_radius,
            enemy_radius,
            max_distance: config.max_distance,
            lost_target_timeout: config.lost_target_timeout(),
            max_turn_degrees: config.max_turn_degrees,
            arena: playfield.expanded(config.bounds_margin),
        }
    }
}

/// Projectile system that turns flight state into world commands.
#[derive(Debug)]
pub struct Projectiles {
    rules: FlightRules,
}

impl Projectiles {
    /// Creates a projectile system governed by `rules`.
    #[must_use]
    pub fn new(rules: FlightRules) -> Self {
        Self { rules }
    }

    /// Rules the system flies projectiles with.
    #[must_use]
    pub fn rules(&self) -> &FlightRules {
        &self.rules
    }

    /// Advances every projectile by one tick of length `dt`.
    pub fn handle(
        &self,
        dt: Duration,
        projectiles: &ProjectileView,
        enemies: &EnemyView,
        out: &mut Vec<Command>,
    ) {
        for projectile in projectiles.iter() {
            out.push(match fly(&self.rules, projectile.flight, dt, enemies) {
                Outcome::Hit(enemy) => Command::ResolveProjectileHit {
                    projectile: projectile.id,
                    enemy,
                },
                Outcome::Expired(reason) => {
                    trace!(projectile = ?projectile.id, ?reason, "projectile expired");
                    Command::ExpireProjectile {
                        projectile: projectile.id,
                        reason,
                    }
                }
                Outcome::Flying(flight) => Command::UpdateProjectile {
                    projectile: projectile.id,
                    flight,
                },
            });
        }
    }
}

/// Fate of a projectile after one tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Outcome {
    /// The projectile touched its target.
    Hit(rampart_core::EnemyId),
    /// The projectile left the simulation.
    Expired(ExpiryReason),
    /// The projectile is still in flight with the given state.
    Flying(FlightState),
}

/// Resolves one tick of flight for a single projectile.
#[must_use]
pub fn fly(rules: &FlightRules, mut flight: FlightState, dt: Duration, enemies: &EnemyView) -> Outcome {
    match flight.target.and_then(|id| enemies.living_enemy(id)) {
        None => {
            flight.target = None;
            flight.lost_for = flight.lost_for.saturating_add(dt);
            if flight.lost_for >= rules.lost_target_timeout {
                return Outcome::Expired(ExpiryReason::TargetLost);
            }
        }
        Some(enemy) => {
            let offset = enemy.position - flight.position;
            if offset.length() <= rules.enemy_radius + rules.projectile_radius {
                return Outcome::Hit(enemy.id);
            }
            match steer(flight.direction, offset, rules.max_turn_degrees) {
                Some(direction) => flight.direction = direction,
                None => {
                    flight.target = None;
                    flight.lost_for = Duration::ZERO;
                }
            }
        }
    }

    flight.position += flight.direction * rules.speed;
    flight.travelled += rules.speed;

    if flight.travelled >= rules.max_distance {
        return Outcome::Expired(ExpiryReason::MaxRange);
    }
    if !rules.arena.contains(flight.position) {
        return Outcome::Expired(ExpiryReason::OutOfBounds);
    }
    Outcome::Flying(flight)
}

/// Turns `heading` toward `desired` by at most `max_turn_degrees`.
///
/// Returns `None` when the target lies behind the projectile (more than 90°
/// off the heading). A zero `desired` keeps the heading unchanged.
#[must_use]
pub fn steer(heading: Vec2, desired: Vec2, max_turn_degrees: f32) -> Option<Vec2> {
    let desired = desired.normalize_or_zero();
    if desired == Vec2::ZERO {
        return Some(heading);
    }

    let dot = heading.dot(desired).clamp(-1.0, 1.0);
    if dot < 0.0 {
        return None;
    }

    let turn = dot.acos().min(max_turn_degrees.to_radians());
    let cross = heading.x * desired.y - heading.y * desired.x;
    let signed = if cross < 0.0 { -turn } else { turn };
    let (sin, cos) = signed.sin_cos();
    Some(
        Vec2::new(
            heading.x * cos - heading.y * sin,
            heading.x * sin + heading.y * cos,
        )
        .normalize_or_zero(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::{EnemyId, EnemyKind, EnemySnapshot, EnemyState, Health};
    use slotmap::KeyData;

    const TICK: Duration = Duration::from_millis(16);

    fn enemy_id(index: u32) -> EnemyId {
        KeyData::from_ffi(u64::from(index)).into()
    }

    fn rules() -> FlightRules {
        FlightRules::new(
            &ProjectileConfig::default(),
            15.0,
            Rect::from_min_size(Vec2::ZERO, Vec2::new(800.0, 600.0)),
        )
    }

    fn enemy_at(position: Vec2) -> EnemyView {
        EnemyView::from_snapshots(vec![EnemySnapshot {
            id: enemy_id(0),
            kind: EnemyKind::Goblin,
            position,
            health: Health::full(100),
            speed: 20.0,
            state: EnemyState::Walking,
            path_index: 1,
            highlighted: false,
        }])
    }

    fn flight(position: Vec2, direction: Vec2, target: Option<EnemyId>) -> FlightState {
        FlightState {
            position,
            direction,
            travelled: 0.0,
            lost_for: Duration::ZERO,
            target,
        }
    }

    #[test]
    fn steering_turns_exactly_the_limit_toward_the_target() {
        let heading = steer(Vec2::new(0.0, -1.0), Vec2::new(1.0, 0.0), 15.0).expect("in front");
        let expected = Vec2::new(15f32.to_radians().sin(), -15f32.to_radians().cos());
        assert!((heading - expected).length() < 1e-5);
    }

    #[test]
    fn steering_snaps_onto_small_corrections() {
        let desired = Vec2::new(5f32.to_radians().sin(), -5f32.to_radians().cos());
        let heading = steer(Vec2::new(0.0, -1.0), desired, 15.0).expect("in front");
        assert!((heading - desired).length() < 1e-5);
    }

    #[test]
    fn steering_turns_counter_clockwise_when_cross_is_negative() {
        let heading = steer(Vec2::new(0.0, -1.0), Vec2::new(-1.0, 0.0), 15.0).expect("in front");
        assert!(heading.x < 0.0);
    }

    #[test]
    fn target_behind_is_dropped() {
        assert_eq!(steer(Vec2::new(1.0, 0.0), Vec2::new(-1.0, 0.1), 15.0), None);
    }

    #[test]
    fn steering_is_deterministic() {
        let first = steer(Vec2::new(0.6, -0.8), Vec2::new(3.0, 1.0), 15.0);
        let second = steer(Vec2::new(0.6, -0.8), Vec2::new(3.0, 1.0), 15.0);
        assert_eq!(first, second);
    }

    #[test]
    fn contact_within_combined_radius_is_a_hit() {
        let enemies = enemy_at(Vec2::new(120.0, 100.0));
        let outcome = fly(
            &rules(),
            flight(Vec2::new(100.0, 100.0), Vec2::X, Some(enemy_id(0))),
            TICK,
            &enemies,
        );
        assert_eq!(outcome, Outcome::Hit(enemy_id(0)));
    }

    #[test]
    fn lost_projectile_expires_after_timeout() {
        let enemies = EnemyView::default();
        let mut state = flight(Vec2::new(400.0, 300.0), Vec2::X, Some(enemy_id(3)));
        for _ in 0..24 {
            match fly(&rules(), state, TICK, &enemies) {
                Outcome::Flying(next) => state = next,
                other => panic!("expired early: {other:?}"),
            }
        }
        assert_eq!(state.target, None);
        assert_eq!(
            fly(&rules(), state, TICK, &enemies),
            Outcome::Expired(ExpiryReason::TargetLost)
        );
    }

    #[test]
    fn travel_limit_expires_projectile() {
        let enemies = EnemyView::default();
        let mut state = flight(Vec2::new(400.0, 300.0), Vec2::X, None);
        state.travelled = 596.0;
        assert_eq!(
            fly(&rules(), state, TICK, &enemies),
            Outcome::Expired(ExpiryReason::MaxRange)
        );
    }

    #[test]
    fn leaving_the_margin_expires_projectile() {
        let enemies = EnemyView::default();
        let state = flight(Vec2::new(796.0, 300.0), Vec2::X, None);
        assert!(matches!(fly(&rules(), state, TICK, &enemies), Outcome::Flying(_)));

        let state = flight(Vec2::new(806.0, 300.0), Vec2::X, None);
        assert_eq!(
            fly(&rules(), state, TICK, &enemies),
            Outcome::Expired(ExpiryReason::OutOfBounds)
        );
    }

    #[test]
    fn dead_target_counts_as_lost() {
        let mut enemies = vec![];
        let mut snapshot = enemy_at(Vec2::new(300.0, 300.0)).iter().copied().next().expect("one");
        snapshot.state = EnemyState::Dead;
        enemies.push(snapshot);
        let view = EnemyView::from_snapshots(enemies);

        let outcome = fly(
            &rules(),
            flight(Vec2::new(295.0, 300.0), Vec2::X, Some(snapshot.id)),
            TICK,
            &view,
        );
        match outcome {
            Outcome::Flying(state) => {
                assert_eq!(state.target, None);
                assert_eq!(state.lost_for, TICK);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }
}
