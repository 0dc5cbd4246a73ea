//! Seams through which the simulation reaches observers, audio and artwork.

use rampart_core::{
    EnemyId, EnemySnapshot, Event, ProjectileId, ProjectileKind, ProjectileSnapshot, TowerId,
    TowerSnapshot, VisualKey,
};

/// Observer notified of every world event in emission order.
pub trait EventSink {
    /// Receives a single event.
    fn on_event(&mut self, event: &Event);
}

impl<F> EventSink for F
where
    F: FnMut(&Event),
{
    fn on_event(&mut self, event: &Event) {
        self(event);
    }
}

/// Fire-and-forget audio output.
pub trait SoundPlayer {
    /// Plays the sound registered under `sound_id`.
    fn play(&mut self, sound_id: &str, volume: f32, looped: bool);
}

/// Sound player that discards every request.
#[derive(Clone, Copy, Debug, Default)]
pub struct Silence;

impl SoundPlayer for Silence {
    fn play(&mut self, _sound_id: &str, _volume: f32, _looped: bool) {}
}

/// Sounds the simulation triggers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// An arrow tower fired.
    ShootArrow,
    /// A cannon tower fired.
    ShootCannon,
    /// A magic tower fired.
    ShootMagic,
    /// A projectile struck an enemy.
    Hurt,
    /// An enemy died.
    Kill,
    /// A tower was built or upgraded.
    Build,
    /// A tower was demolished.
    Demolish,
}

impl SoundCue {
    /// Identifier the sound player resolves.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::ShootArrow => "shoot_arrow",
            Self::ShootCannon => "shoot_cannon",
            Self::ShootMagic => "shoot_magic",
            Self::Hurt => "hurt",
            Self::Kill => "kill",
            Self::Build => "build",
            Self::Demolish => "demolish",
        }
    }

    /// Playback volume in `0.0..=1.0`.
    #[must_use]
    pub const fn volume(self) -> f32 {
        match self {
            Self::Hurt => 0.8,
            _ => 1.0,
        }
    }

    /// Cue triggered by `event`, if any.
    #[must_use]
    pub fn for_event(event: &Event) -> Option<Self> {
        match event {
            Event::ProjectileFired { kind, .. } => Some(match kind {
                ProjectileKind::Arrow => Self::ShootArrow,
                ProjectileKind::Cannon => Self::ShootCannon,
                ProjectileKind::Magic => Self::ShootMagic,
            }),
            Event::ProjectileHit { .. } => Some(Self::Hurt),
            Event::EnemyDied { .. } => Some(Self::Kill),
            Event::TowerBuilt { .. } | Event::TowerUpgraded { .. } => Some(Self::Build),
            Event::TowerDemolished { .. } => Some(Self::Demolish),
            _ => None,
        }
    }
}

/// Resolves visual keys into renderer-specific handles.
pub trait AssetProvider {
    /// Opaque handle understood by the renderer.
    type Handle;

    /// Looks up the handle for `key`; unknown keys yield `None`.
    fn resolve(&mut self, key: VisualKey) -> Option<Self::Handle>;
}

/// Handles resolved for every visible entity during one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct VisualFrame<H> {
    /// Enemy handles in id order.
    pub enemies: Vec<(EnemyId, H)>,
    /// Tower handles in id order.
    pub towers: Vec<(TowerId, H)>,
    /// Projectile handles in id order.
    pub projectiles: Vec<(ProjectileId, H)>,
}

pub(crate) fn enemy_key(enemy: &EnemySnapshot) -> VisualKey {
    VisualKey::Enemy {
        kind: enemy.kind,
        state: enemy.state,
    }
}

pub(crate) fn tower_key(tower: &TowerSnapshot) -> VisualKey {
    VisualKey::Tower {
        kind: tower.kind,
        level: tower.kind.level(),
    }
}

pub(crate) fn projectile_key(projectile: &ProjectileSnapshot) -> VisualKey {
    VisualKey::Projectile {
        kind: projectile.kind,
    }
}
