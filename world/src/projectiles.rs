//! In-flight projectile state.

use glam::Vec2;
use rampart_core::{
    EnemyId, FlightState, ProjectileId, ProjectileKind, ProjectileSnapshot,
};

/// Projectile stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Projectile {
    pub(crate) kind: ProjectileKind,
    pub(crate) damage: u32,
    pub(crate) origin: Vec2,
    pub(crate) flight: FlightState,
}

impl Projectile {
    pub(crate) fn launch(
        kind: ProjectileKind,
        damage: u32,
        origin: Vec2,
        direction: Vec2,
        target: EnemyId,
    ) -> Self {
        Self {
            kind,
            damage,
            origin,
            flight: FlightState {
                position: origin,
                direction: direction.normalize_or_zero(),
                travelled: 0.0,
                lost_for: std::time::Duration::ZERO,
                target: Some(target),
            },
        }
    }

    pub(crate) fn snapshot(&self, id: ProjectileId) -> ProjectileSnapshot {
        ProjectileSnapshot {
            id,
            kind: self.kind,
            damage: self.damage,
            origin: self.origin,
            flight: self.flight,
        }
    }
}
