#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Rampart engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and pure systems. Adapters and systems submit
//! [`Command`] values describing desired mutations, the world executes those
//! commands via its `apply` entry point, and then broadcasts [`Event`] values
//! for systems and observers to react to deterministically. Systems consume
//! event streams, query immutable views, and respond exclusively with new
//! command batches.

pub mod config;
pub mod geometry;
pub mod map;

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use slotmap::new_key_type;
use thiserror::Error;

pub use config::{ConfigError, GameConfig};
pub use geometry::{Circle, Rect};
pub use map::{EndPoint, GridPoint, MapDefinition, MapId};

new_key_type! {
    /// Generational handle to an enemy.
    ///
    /// Handles to removed enemies never resolve again, even when the slot is reused.
    pub struct EnemyId;

    /// Generational handle to a tower.
    pub struct TowerId;

    /// Generational handle to an in-flight projectile.
    pub struct ProjectileId;
}

/// Types of towers that can be purchased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TowerKind {
    /// Cheap, quick-firing tower with long reach.
    Arrow,
    /// Slow, heavy-hitting tower with short reach.
    Cannon,
    /// Expensive tower with the best damage and range.
    Magic,
}

/// Combat statistics associated with a [`TowerKind`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerStats {
    /// Damage carried by each projectile.
    pub damage: u32,
    /// Targeting radius in world units.
    pub range: f32,
    /// Gold required to build the tower.
    pub cost: u32,
    /// Minimum time between two shots.
    pub fire_rate: Duration,
    /// Turret turning speed in degrees per second.
    pub rotation_speed: f32,
}

impl TowerKind {
    /// Every tower kind in upgrade order.
    pub const ALL: [TowerKind; 3] = [TowerKind::Arrow, TowerKind::Cannon, TowerKind::Magic];

    /// Returns the combat statistics of the tower kind.
    #[must_use]
    pub const fn stats(self) -> TowerStats {
        match self {
            Self::Arrow => TowerStats {
                damage: 20,
                range: 150.0,
                cost: 100,
                fire_rate: Duration::from_millis(1_000),
                rotation_speed: 360.0,
            },
            Self::Cannon => TowerStats {
                damage: 50,
                range: 120.0,
                cost: 200,
                fire_rate: Duration::from_millis(2_000),
                rotation_speed: 180.0,
            },
            Self::Magic => TowerStats {
                damage: 80,
                range: 180.0,
                cost: 300,
                fire_rate: Duration::from_millis(1_500),
                rotation_speed: 270.0,
            },
        }
    }

    /// Kind the tower turns into when upgraded, if any.
    #[must_use]
    pub const fn upgrade(self) -> Option<TowerKind> {
        match self {
            Self::Arrow => Some(Self::Cannon),
            Self::Cannon => Some(Self::Magic),
            Self::Magic => None,
        }
    }

    /// Kind of projectile fired by the tower.
    #[must_use]
    pub const fn projectile(self) -> ProjectileKind {
        match self {
            Self::Arrow => ProjectileKind::Arrow,
            Self::Cannon => ProjectileKind::Cannon,
            Self::Magic => ProjectileKind::Magic,
        }
    }

    /// Visual tier used when resolving tower artwork.
    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Self::Arrow => 1,
            Self::Cannon => 2,
            Self::Magic => 3,
        }
    }
}

/// Projectile variants; each mirrors the tower that fired it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    /// Fired by [`TowerKind::Arrow`].
    Arrow,
    /// Fired by [`TowerKind::Cannon`].
    Cannon,
    /// Fired by [`TowerKind::Magic`].
    Magic,
}

/// Enemy catalog. Wave `n` spawns the `n`-th entry while the catalog lasts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EnemyKind {
    /// First-wave enemy.
    Slime,
    /// Second-wave enemy.
    Goblin,
    /// Third-wave enemy.
    Wolf,
    /// Fourth-wave enemy.
    Ogre,
}

impl EnemyKind {
    /// Catalog ordered by the wave that introduces each kind.
    pub const CATALOG: [EnemyKind; 4] = [
        EnemyKind::Slime,
        EnemyKind::Goblin,
        EnemyKind::Wolf,
        EnemyKind::Ogre,
    ];

    /// Gold awarded for killing the enemy.
    #[must_use]
    pub const fn reward(self) -> u32 {
        match self {
            Self::Slime => 15,
            Self::Goblin => 18,
            Self::Wolf => 20,
            Self::Ogre => 25,
        }
    }
}

/// Behavioural state of an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyState {
    /// Standing still.
    Idle,
    /// Following its path.
    Walking,
    /// Airborne animation state; moves like [`EnemyState::Walking`].
    Jumping,
    /// Terminal state; the enemy no longer moves and cannot be targeted.
    Dead,
}

/// Current and maximum health of an enemy.
///
/// The current value never exceeds the maximum and never drops below zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Creates a full health pool.
    #[must_use]
    pub const fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Remaining health.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Health at spawn time.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Returns the pool after subtracting `damage`, clamped at zero.
    #[must_use]
    pub const fn damaged(self, damage: u32) -> Self {
        Self {
            current: self.current.saturating_sub(damage),
            max: self.max,
        }
    }

    /// Reports whether no health remains.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// Reasons a projectile leaves the simulation without hitting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpiryReason {
    /// The projectile flew without a target for too long.
    TargetLost,
    /// The projectile exceeded its maximum travel distance.
    MaxRange,
    /// The projectile left the playfield.
    OutOfBounds,
}

/// Kinematic state of a projectile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FlightState {
    /// Current position in world units.
    pub position: Vec2,
    /// Unit heading.
    pub direction: Vec2,
    /// Distance flown since launch.
    pub travelled: f32,
    /// Time spent without a target.
    pub lost_for: Duration,
    /// Enemy being homed on, if any.
    pub target: Option<EnemyId>,
}

/// Reasons a tower build request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum PlacementError {
    /// Another tower already stands on the cell.
    #[error("cell already holds a tower")]
    Occupied,
    /// The player cannot afford the tower.
    #[error("insufficient gold: need {required}, have {available}")]
    InsufficientGold {
        /// Price of the tower.
        required: u32,
        /// Gold held by the player.
        available: u32,
    },
}

/// Reasons a tower upgrade request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum UpgradeError {
    /// No tower with the provided identifier exists.
    #[error("tower does not exist")]
    MissingTower,
    /// The tower is already at the top of the upgrade chain.
    #[error("tower is fully upgraded")]
    MaxLevel,
    /// The player cannot afford the upgrade.
    #[error("insufficient gold: need {required}, have {available}")]
    InsufficientGold {
        /// Price difference between the current and the upgraded kind.
        required: u32,
        /// Gold held by the player.
        available: u32,
    },
}

/// Reasons a demolish request may be rejected by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum DemolishError {
    /// No tower with the provided identifier exists.
    #[error("tower does not exist")]
    MissingTower,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Installs a map and resets the world around it.
    ConfigureMap {
        /// Map layout to play on.
        map: MapDefinition,
    },
    /// Starts the game clock if it is not already running.
    StartGame,
    /// Pauses or resumes a running game.
    SetPaused {
        /// Whether the game should be paused.
        paused: bool,
    },
    /// Stops the game and restores the initial economy and wave state.
    ResetGame,
    /// Advances the simulation clock, enemy movement and per-entity timers.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Spawns an enemy at the start of the map path.
    SpawnEnemy {
        /// Catalog entry to spawn.
        kind: EnemyKind,
        /// Health after wave scaling.
        health: u32,
        /// Speed after wave scaling, in world units per second.
        speed: f32,
    },
    /// Sets the advisory highlight flag on an enemy.
    HighlightEnemy {
        /// Enemy to update.
        enemy: EnemyId,
        /// Whether a tower currently targets the enemy.
        highlighted: bool,
    },
    /// Purchases a tower on the given cell.
    BuildTower {
        /// Kind of tower to build.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: GridPoint,
    },
    /// Replaces a tower with the next kind in the upgrade chain.
    UpgradeTower {
        /// Tower to upgrade.
        tower: TowerId,
    },
    /// Removes a tower and refunds part of its price.
    DemolishTower {
        /// Tower to demolish.
        tower: TowerId,
    },
    /// Updates the facing angle of a tower.
    AimTower {
        /// Tower to rotate.
        tower: TowerId,
        /// New facing angle in degrees.
        rotation: f32,
    },
    /// Launches a projectile from a tower whose cooldown has elapsed.
    FireProjectile {
        /// Tower firing the projectile.
        tower: TowerId,
        /// Enemy the projectile homes on.
        target: EnemyId,
        /// Muzzle position in world units.
        origin: Vec2,
        /// Initial unit heading.
        direction: Vec2,
    },
    /// Stores the kinematic state computed for a projectile this tick.
    UpdateProjectile {
        /// Projectile to update.
        projectile: ProjectileId,
        /// New kinematic state.
        flight: FlightState,
    },
    /// Applies a projectile's damage to an enemy and removes the projectile.
    ResolveProjectileHit {
        /// Projectile that connected.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
    },
    /// Removes a projectile that can no longer hit anything.
    ExpireProjectile {
        /// Projectile to remove.
        projectile: ProjectileId,
        /// Why the projectile expired.
        reason: ExpiryReason,
    },
    /// Marks depleted enemies as dead and awards their bounty.
    SweepCasualties,
    /// Advances to the next wave or completes the level when the wave is cleared.
    AdvanceWave,
    /// Ends the game once the player has run out of lives.
    EvaluateOutcome,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Confirms that a new map was installed.
    MapConfigured {
        /// Identifier of the installed map.
        map: MapId,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
    },
    /// Reports the player's gold after a change.
    GoldChanged {
        /// Gold now held.
        gold: u32,
    },
    /// Reports the player's lives after a change.
    LivesChanged {
        /// Lives remaining.
        lives: u32,
    },
    /// Announces the wave that is now active.
    WaveChanged {
        /// One-based wave number.
        wave: u32,
    },
    /// Reports the kill counter after a change.
    KillCountChanged {
        /// Total enemies killed this game.
        kills: u32,
    },
    /// Announces a change of the running or paused flags.
    GameStateChanged {
        /// Whether a game is in progress.
        running: bool,
        /// Whether the game is paused.
        paused: bool,
    },
    /// The player ran out of lives.
    GameOver,
    /// The final wave was cleared.
    LevelCompleted {
        /// Map that was completed.
        map: MapId,
        /// Last wave played.
        final_wave: u32,
    },
    /// Confirms that an enemy entered the map.
    EnemySpawned {
        /// Handle assigned to the enemy.
        enemy: EnemyId,
        /// Catalog entry of the enemy.
        kind: EnemyKind,
        /// Spawn position in world units.
        position: Vec2,
        /// Health after wave scaling.
        health: u32,
    },
    /// Announces that every enemy of the wave has been spawned.
    WaveSpawnCompleted {
        /// Wave whose spawning finished.
        wave: u32,
    },
    /// An enemy reached an end-point and was removed.
    EnemyReachedEnd {
        /// Enemy that escaped.
        enemy: EnemyId,
    },
    /// An enemy's health was depleted; its bounty has been awarded.
    EnemyDied {
        /// Enemy that died.
        enemy: EnemyId,
        /// Catalog entry of the enemy.
        kind: EnemyKind,
        /// Gold awarded.
        reward: u32,
    },
    /// A dead enemy's grace period elapsed and it left the world.
    EnemyRemoved {
        /// Enemy that was removed.
        enemy: EnemyId,
    },
    /// Confirms that a tower was built.
    TowerBuilt {
        /// Handle assigned to the tower.
        tower: TowerId,
        /// Kind of tower built.
        kind: TowerKind,
        /// Cell the tower occupies.
        cell: GridPoint,
    },
    /// Reports that a build request was rejected.
    TowerBuildRejected {
        /// Kind of tower requested.
        kind: TowerKind,
        /// Cell requested.
        cell: GridPoint,
        /// Specific reason the request failed.
        reason: PlacementError,
    },
    /// Confirms that a tower was replaced by its upgrade.
    TowerUpgraded {
        /// Handle of the superseded tower.
        old: TowerId,
        /// Handle of the new tower.
        new: TowerId,
        /// Kind of the new tower.
        kind: TowerKind,
    },
    /// Reports that an upgrade request was rejected.
    TowerUpgradeRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the request failed.
        reason: UpgradeError,
    },
    /// Confirms that a tower was demolished.
    TowerDemolished {
        /// Tower that was removed.
        tower: TowerId,
        /// Gold returned to the player.
        refund: u32,
    },
    /// Reports that a demolish request was rejected.
    TowerDemolishRejected {
        /// Tower targeted by the request.
        tower: TowerId,
        /// Specific reason the request failed.
        reason: DemolishError,
    },
    /// A tower fired a projectile.
    ProjectileFired {
        /// Tower that fired.
        tower: TowerId,
        /// Projectile that was launched.
        projectile: ProjectileId,
        /// Enemy the projectile homes on.
        target: EnemyId,
        /// Kind of projectile launched.
        kind: ProjectileKind,
    },
    /// A projectile struck an enemy.
    ProjectileHit {
        /// Projectile that connected.
        projectile: ProjectileId,
        /// Enemy that was struck.
        enemy: EnemyId,
        /// Damage dealt.
        damage: u32,
    },
    /// A projectile left the simulation without hitting.
    ProjectileExpired {
        /// Projectile that expired.
        projectile: ProjectileId,
        /// Why the projectile expired.
        reason: ExpiryReason,
    },
}

/// Immutable representation of a single enemy used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemySnapshot {
    /// Handle of the enemy.
    pub id: EnemyId,
    /// Catalog entry of the enemy.
    pub kind: EnemyKind,
    /// Centre position in world units.
    pub position: Vec2,
    /// Current and maximum health.
    pub health: Health,
    /// Movement speed in world units per second.
    pub speed: f32,
    /// Behavioural state.
    pub state: EnemyState,
    /// Index of the next waypoint on the path.
    pub path_index: usize,
    /// Whether a tower currently targets the enemy.
    pub highlighted: bool,
}

impl EnemySnapshot {
    /// Reports whether the enemy can still be targeted.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.state != EnemyState::Dead
    }
}

/// Read-only snapshot describing every enemy in the world.
#[derive(Clone, Debug, Default)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over enemies that have not died.
    pub fn living(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.is_alive())
    }

    /// Resolves a handle to a snapshot, if the enemy still exists.
    #[must_use]
    pub fn get(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }

    /// Resolves a handle to a living enemy; dead or removed enemies yield `None`.
    #[must_use]
    pub fn living_enemy(&self, id: EnemyId) -> Option<&EnemySnapshot> {
        self.get(id).filter(|snapshot| snapshot.is_alive())
    }

    /// Number of enemies captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no enemies.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Immutable representation of a single tower used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerSnapshot {
    /// Handle of the tower.
    pub id: TowerId,
    /// Kind of tower.
    pub kind: TowerKind,
    /// Cell the tower occupies.
    pub cell: GridPoint,
    /// Centre position in world units.
    pub position: Vec2,
    /// Facing angle in degrees.
    pub rotation: f32,
}

impl TowerSnapshot {
    /// Reports whether a point lies within the tower's targeting radius.
    #[must_use]
    pub fn is_in_range(&self, point: Vec2) -> bool {
        self.position.distance(point) <= self.kind.stats().range
    }
}

/// Read-only snapshot describing every tower in the world.
#[derive(Clone, Debug, Default)]
pub struct TowerView {
    snapshots: Vec<TowerSnapshot>,
}

impl TowerView {
    /// Creates a new tower view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &TowerSnapshot> {
        self.snapshots.iter()
    }

    /// Resolves a handle to a snapshot, if the tower still exists.
    #[must_use]
    pub fn get(&self, id: TowerId) -> Option<&TowerSnapshot> {
        self.snapshots
            .binary_search_by_key(&id, |snapshot| snapshot.id)
            .ok()
            .map(|index| &self.snapshots[index])
    }
}

/// Remaining cooldown of a single tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TowerCooldownSnapshot {
    /// Tower the cooldown belongs to.
    pub tower: TowerId,
    /// Kind of tower.
    pub kind: TowerKind,
    /// Time until the tower may fire again.
    pub ready_in: Duration,
}

/// Read-only snapshot of every tower's cooldown.
#[derive(Clone, Debug, Default)]
pub struct TowerCooldownView {
    snapshots: Vec<TowerCooldownSnapshot>,
}

impl TowerCooldownView {
    /// Creates a new cooldown view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<TowerCooldownSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.tower);
        Self { snapshots }
    }

    /// Time until `tower` may fire again, or `None` when the tower is unknown.
    #[must_use]
    pub fn ready_in(&self, tower: TowerId) -> Option<Duration> {
        self.snapshots
            .binary_search_by_key(&tower, |snapshot| snapshot.tower)
            .ok()
            .map(|index| self.snapshots[index].ready_in)
    }
}

/// Immutable representation of a single projectile used for queries.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProjectileSnapshot {
    /// Handle of the projectile.
    pub id: ProjectileId,
    /// Kind of projectile.
    pub kind: ProjectileKind,
    /// Damage dealt on hit.
    pub damage: u32,
    /// Launch position.
    pub origin: Vec2,
    /// Current kinematic state.
    pub flight: FlightState,
}

/// Read-only snapshot describing every in-flight projectile.
#[derive(Clone, Debug, Default)]
pub struct ProjectileView {
    snapshots: Vec<ProjectileSnapshot>,
}

impl ProjectileView {
    /// Creates a new projectile view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<ProjectileSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &ProjectileSnapshot> {
        self.snapshots.iter()
    }

    /// Number of projectiles captured by the view.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Reports whether the view holds no projectiles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}

/// Target chosen for a tower during the current tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TowerTarget {
    /// Tower holding the target.
    pub tower: TowerId,
    /// Enemy the tower is locked on.
    pub enemy: EnemyId,
    /// Muzzle position in world units.
    pub muzzle: Vec2,
    /// Unit vector along the tower's current facing.
    pub direction: Vec2,
}

/// Wave bookkeeping exposed to the spawning system.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaveStatus {
    /// Whether a game is in progress and not paused.
    pub active: bool,
    /// One-based wave number.
    pub wave: u32,
    /// Enemies spawned during the current wave.
    pub spawned: u32,
    /// Whether every enemy of the wave has been spawned.
    pub spawn_complete: bool,
}

/// Player resources.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    /// Gold held.
    pub gold: u32,
    /// Lives remaining.
    pub lives: u32,
    /// Enemies killed this game.
    pub kills: u32,
}

/// Values a persistence collaborator stores after a game ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// Map that was played.
    pub map: MapId,
    /// Wave reached.
    pub wave: u32,
    /// Enemies killed.
    pub kills: u32,
    /// Gold held at the end.
    pub gold: u32,
}

/// Key used by asset providers to resolve opaque visual handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VisualKey {
    /// Enemy artwork for a kind in a given state.
    Enemy {
        /// Catalog entry.
        kind: EnemyKind,
        /// Behavioural state.
        state: EnemyState,
    },
    /// Tower artwork for a kind at a visual tier.
    Tower {
        /// Kind of tower.
        kind: TowerKind,
        /// Visual tier, see [`TowerKind::level`].
        level: u8,
    },
    /// Projectile artwork.
    Projectile {
        /// Kind of projectile.
        kind: ProjectileKind,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{de::DeserializeOwned, Serialize};
    use slotmap::SlotMap;

    fn assert_round_trip<T>(value: &T)
    where
        T: Serialize + DeserializeOwned + PartialEq + std::fmt::Debug,
    {
        let bytes = bincode::serialize(value).expect("serialize");
        let restored: T = bincode::deserialize(&bytes).expect("deserialize");
        assert_eq!(&restored, value);
    }

    #[test]
    fn enemy_id_round_trips_through_bincode() {
        let mut enemies: SlotMap<EnemyId, ()> = SlotMap::with_key();
        let first = enemies.insert(());
        let _ = enemies.remove(first);
        let reused = enemies.insert(());
        assert_round_trip(&reused);
    }

    #[test]
    fn progress_report_round_trips_through_bincode() {
        assert_round_trip(&ProgressReport {
            map: MapId::DEFAULT,
            wave: 4,
            kills: 31,
            gold: 275,
        });
    }

    #[test]
    fn placement_error_round_trips_through_bincode() {
        assert_round_trip(&PlacementError::InsufficientGold {
            required: 100,
            available: 90,
        });
    }

    #[test]
    fn tower_stats_increase_along_upgrade_chain() {
        let costs: Vec<u32> = TowerKind::ALL.iter().map(|kind| kind.stats().cost).collect();
        let damage: Vec<u32> = TowerKind::ALL
            .iter()
            .map(|kind| kind.stats().damage)
            .collect();
        assert!(costs.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(damage.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(TowerKind::Magic.upgrade(), None);
    }

    #[test]
    fn health_is_clamped_at_zero() {
        let health = Health::full(30).damaged(20).damaged(20);
        assert_eq!(health.current(), 0);
        assert_eq!(health.max(), 30);
        assert!(health.is_depleted());
    }

    #[test]
    fn in_range_uses_inclusive_radius() {
        let tower = TowerSnapshot {
            id: TowerId::default(),
            kind: TowerKind::Arrow,
            cell: GridPoint::new(0, 0),
            position: Vec2::ZERO,
            rotation: 0.0,
        };
        assert!(tower.is_in_range(Vec2::new(150.0, 0.0)));
        assert!(!tower.is_in_range(Vec2::new(151.0, 0.0)));
    }

    #[test]
    fn placement_error_message_names_amounts() {
        let error = PlacementError::InsufficientGold {
            required: 100,
            available: 90,
        };
        assert_eq!(error.to_string(), "insufficient gold: need 100, have 90");
    }
}
