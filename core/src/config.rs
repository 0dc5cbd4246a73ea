//! Tunable simulation parameters.
//!
//! Every section falls back to its defaults when omitted, so adapters can load
//! partial TOML documents and only override what they care about.

use std::time::Duration;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Rect;

/// Reasons a configuration or map is unusable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The fixed tick interval must be positive.
    #[error("tick interval must be greater than zero")]
    ZeroTickInterval,
    /// Waves must contain at least one enemy.
    #[error("enemies per wave must be greater than zero")]
    EmptyWave,
    /// At least one wave must be configured.
    #[error("max waves must be greater than zero")]
    NoWaves,
    /// The spawn interval floor exceeds the starting interval.
    #[error("minimum spawn interval {min_ms}ms exceeds maximum {max_ms}ms")]
    SpawnIntervalInverted {
        /// Configured floor in milliseconds.
        min_ms: u64,
        /// Configured starting interval in milliseconds.
        max_ms: u64,
    },
    /// The playfield must have a positive area and grid size.
    #[error("playfield dimensions must be positive")]
    InvalidPlayfield,
    /// The spatial index needs room for at least one enemy per leaf.
    #[error("quadtree capacity must be greater than zero")]
    ZeroQuadtreeCapacity,
    /// A map must provide at least one waypoint.
    #[error("map path contains no waypoints")]
    EmptyPath,
    /// End-point radii must be positive.
    #[error("end-point radius must be positive")]
    InvalidEndPoint,
}

/// Complete set of simulation parameters.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed-step loop settings.
    pub tick: TickConfig,
    /// Starting resources and refunds.
    pub economy: EconomyConfig,
    /// Wave cadence and difficulty scaling.
    pub waves: WaveConfig,
    /// Base enemy statistics.
    pub enemies: EnemyConfig,
    /// Projectile flight parameters.
    pub projectiles: ProjectileConfig,
    /// Tower targeting hysteresis.
    pub targeting: TargetingConfig,
    /// Playfield bounds and spatial index tuning.
    pub playfield: PlayfieldConfig,
}

impl GameConfig {
    /// Checks the configuration for values the simulation cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick.interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.waves.enemies_per_wave == 0 {
            return Err(ConfigError::EmptyWave);
        }
        if self.waves.max_waves == 0 {
            return Err(ConfigError::NoWaves);
        }
        if self.waves.spawn_interval_min_ms > self.waves.spawn_interval_max_ms {
            return Err(ConfigError::SpawnIntervalInverted {
                min_ms: self.waves.spawn_interval_min_ms,
                max_ms: self.waves.spawn_interval_max_ms,
            });
        }
        if self.playfield.width <= 0.0
            || self.playfield.height <= 0.0
            || self.playfield.grid_size <= 0.0
        {
            return Err(ConfigError::InvalidPlayfield);
        }
        if self.playfield.quadtree_capacity == 0 {
            return Err(ConfigError::ZeroQuadtreeCapacity);
        }
        Ok(())
    }
}

/// Fixed-step loop settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TickConfig {
    /// Simulated time advanced by every tick, in milliseconds.
    pub interval_ms: u64,
}

impl TickConfig {
    /// Tick interval as a duration.
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for TickConfig {
    fn default() -> Self {
        Self { interval_ms: 16 }
    }
}

/// Starting resources and refunds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EconomyConfig {
    /// Gold available when a game starts.
    pub initial_gold: u32,
    /// Lives available when a game starts.
    pub initial_lives: u32,
    /// Percentage of a tower's price returned when it is demolished.
    pub demolish_refund_percent: u32,
}

impl EconomyConfig {
    /// Gold returned for demolishing a tower that cost `cost`.
    #[must_use]
    pub fn refund_for(&self, cost: u32) -> u32 {
        let refund = u64::from(cost) * u64::from(self.demolish_refund_percent.min(100)) / 100;
        refund as u32
    }
}

impl Default for EconomyConfig {
    fn default() -> Self {
        Self {
            initial_gold: 300,
            initial_lives: 20,
            demolish_refund_percent: 50,
        }
    }
}

/// Wave cadence and difficulty scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies spawned in every wave.
    pub enemies_per_wave: u32,
    /// Final wave; clearing it completes the level.
    pub max_waves: u32,
    /// Spawn interval of the first wave, in milliseconds.
    pub spawn_interval_max_ms: u64,
    /// Lower bound for the spawn interval, in milliseconds.
    pub spawn_interval_min_ms: u64,
    /// Reduction of the spawn interval per completed wave, in milliseconds.
    pub spawn_interval_step_ms: u64,
    /// Fractional health increase per wave after the first.
    pub health_growth_per_wave: f64,
    /// Fractional speed increase per wave after the first.
    pub speed_growth_per_wave: f64,
    /// Seed for enemy kind selection beyond the catalog.
    pub rng_seed: u64,
}

impl WaveConfig {
    /// Spawn interval used while `wave` is active.
    #[must_use]
    pub fn spawn_interval(&self, wave: u32) -> Duration {
        let reduction = self
            .spawn_interval_step_ms
            .saturating_mul(u64::from(wave.saturating_sub(1)));
        let interval = self
            .spawn_interval_max_ms
            .saturating_sub(reduction)
            .max(self.spawn_interval_min_ms);
        Duration::from_millis(interval)
    }

    /// Multiplier applied to base enemy health during `wave`.
    #[must_use]
    pub fn health_scale(&self, wave: u32) -> f64 {
        1.0 + self.health_growth_per_wave * f64::from(wave.saturating_sub(1))
    }

    /// Multiplier applied to base enemy speed during `wave`.
    #[must_use]
    pub fn speed_scale(&self, wave: u32) -> f64 {
        1.0 + self.speed_growth_per_wave * f64::from(wave.saturating_sub(1))
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            enemies_per_wave: 10,
            max_waves: 10,
            spawn_interval_max_ms: 2_000,
            spawn_interval_min_ms: 500,
            spawn_interval_step_ms: 200,
            health_growth_per_wave: 0.1,
            speed_growth_per_wave: 0.05,
            rng_seed: 0x5eed_7a11_0b57_ac1e,
        }
    }
}

/// Base enemy statistics before wave scaling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Health of a first-wave enemy.
    pub base_health: u32,
    /// Movement speed of a first-wave enemy, in world units per second.
    pub base_speed: f32,
    /// Collision radius used for projectile hits.
    pub collision_radius: f32,
    /// Time a dead enemy stays in the world before removal, in milliseconds.
    pub corpse_grace_ms: u64,
}

impl EnemyConfig {
    /// Corpse grace period as a duration.
    #[must_use]
    pub fn corpse_grace(&self) -> Duration {
        Duration::from_millis(self.corpse_grace_ms)
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            base_health: 100,
            base_speed: 20.0,
            collision_radius: 15.0,
            corpse_grace_ms: 500,
        }
    }
}

/// Projectile flight parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Distance covered every tick, in world units.
    pub speed_per_tick: f32,
    /// Collision radius of a projectile.
    pub collision_radius: f32,
    /// Distance after which a projectile expires.
    pub max_distance: f32,
    /// Time a projectile survives without a target, in milliseconds.
    pub lost_target_timeout_ms: u64,
    /// Maximum heading change per tick, in degrees.
    pub max_turn_degrees: f32,
    /// Distance outside the playfield a projectile may travel before expiring.
    pub bounds_margin: f32,
}

impl ProjectileConfig {
    /// Lost-target timeout as a duration.
    #[must_use]
    pub fn lost_target_timeout(&self) -> Duration {
        Duration::from_millis(self.lost_target_timeout_ms)
    }
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed_per_tick: 5.0,
            collision_radius: 5.0,
            max_distance: 600.0,
            lost_target_timeout_ms: 400,
            max_turn_degrees: 15.0,
            bounds_margin: 10.0,
        }
    }
}

/// Tower targeting hysteresis.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetingConfig {
    /// Delay after losing a target before searching again, in milliseconds.
    pub rescan_cooldown_ms: u64,
    /// Lifetime of a target lock, in milliseconds.
    pub lock_duration_ms: u64,
}

impl TargetingConfig {
    /// Re-scan cooldown as a duration.
    #[must_use]
    pub fn rescan_cooldown(&self) -> Duration {
        Duration::from_millis(self.rescan_cooldown_ms)
    }

    /// Lock lifetime as a duration.
    #[must_use]
    pub fn lock_duration(&self) -> Duration {
        Duration::from_millis(self.lock_duration_ms)
    }
}

impl Default for TargetingConfig {
    fn default() -> Self {
        Self {
            rescan_cooldown_ms: 200,
            lock_duration_ms: 400,
        }
    }
}

/// Playfield bounds and spatial index tuning.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayfieldConfig {
    /// Playfield width in world units.
    pub width: f32,
    /// Playfield height in world units.
    pub height: f32,
    /// Edge length of a grid cell in world units.
    pub grid_size: f32,
    /// Enemies a quadtree leaf holds before splitting.
    pub quadtree_capacity: usize,
    /// Smallest quadrant edge the quadtree will split down to.
    pub quadtree_min_extent: f32,
}

impl PlayfieldConfig {
    /// Playfield bounds anchored at the origin.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::new(self.width, self.height))
    }
}

impl Default for PlayfieldConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            grid_size: 40.0,
            quadtree_capacity: 4,
            quadtree_min_extent: 8.0,
        }
    }
}
