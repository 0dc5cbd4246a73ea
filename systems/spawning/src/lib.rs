#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for emitting enemy spawn commands.
//!
//! Spawns follow a per-wave cadence that shortens as waves progress, and
//! enemy statistics grow linearly with the wave number. Early waves walk the
//! enemy catalog in order; later waves draw kinds from a seeded generator so
//! that replays stay reproducible.

use std::time::Duration;

use rampart_core::{
    config::{EnemyConfig, WaveConfig},
    Command, EnemyKind, Event, WaveStatus,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::debug;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Debug)]
pub struct Config {
    waves: WaveConfig,
    base_health: u32,
    base_speed: f32,
}

impl Config {
    /// Creates a new configuration from the wave and enemy sections.
    #[must_use]
    pub fn new(waves: &WaveConfig, enemies: &EnemyConfig) -> Self {
        Self {
            waves: waves.clone(),
            base_health: enemies.base_health,
            base_speed: enemies.base_speed,
        }
    }

    /// Health of an enemy spawned during `wave`.
    #[must_use]
    pub fn health_for(&self, wave: u32) -> u32 {
        let scaled = f64::from(self.base_health) * self.waves.health_scale(wave);
        scaled.round().clamp(0.0, f64::from(u32::MAX)) as u32
    }

    /// Speed of an enemy spawned during `wave`, in world units per second.
    #[must_use]
    pub fn speed_for(&self, wave: u32) -> f32 {
        (f64::from(self.base_speed) * self.waves.speed_scale(wave)) as f32
    }
}

/// Pure system that deterministically emits spawn commands while a game runs.
#[derive(Debug)]
pub struct Spawning {
    config: Config,
    accumulator: Duration,
    wave: u32,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.waves.rng_seed);
        Self {
            config,
            accumulator: Duration::ZERO,
            wave: 1,
            rng,
        }
    }

    /// Restores the cadence and the random stream to their initial state.
    pub fn reset(&mut self) {
        self.accumulator = Duration::ZERO;
        self.wave = 1;
        self.rng = ChaCha8Rng::seed_from_u64(self.config.waves.rng_seed);
    }

    /// Spawn interval in force for the wave currently tracked.
    #[must_use]
    pub fn interval(&self) -> Duration {
        self.config.waves.spawn_interval(self.wave)
    }

    /// Consumes events and the wave status to emit spawn commands.
    ///
    /// Game state changes and wave changes restart the cadence, so no spawn
    /// is owed for time spent paused or between waves.
    pub fn handle(&mut self, events: &[Event], status: WaveStatus, out: &mut Vec<Command>) {
        let mut accumulated = Duration::ZERO;
        for event in events {
            match event {
                Event::TimeAdvanced { dt } => accumulated = accumulated.saturating_add(*dt),
                Event::GameStateChanged { .. } | Event::WaveChanged { .. } => {
                    self.accumulator = Duration::ZERO;
                    accumulated = Duration::ZERO;
                }
                _ => {}
            }
        }

        if status.wave != self.wave {
            self.wave = status.wave;
            self.accumulator = Duration::ZERO;
            debug!(
                wave = self.wave,
                interval_ms = self.interval().as_millis() as u64,
                "spawn cadence updated"
            );
        }

        if !status.active || status.spawn_complete {
            return;
        }

        self.accumulator = self.accumulator.saturating_add(accumulated);
        let attempts = self.resolve_spawn_attempts();
        let remaining = self.config.waves.enemies_per_wave.saturating_sub(status.spawned);

        for _ in 0..attempts.min(remaining) {
            let kind = self.select_kind();
            out.push(Command::SpawnEnemy {
                kind,
                health: self.config.health_for(self.wave),
                speed: self.config.speed_for(self.wave),
            });
        }
    }

    fn resolve_spawn_attempts(&mut self) -> u32 {
        let interval = self.interval();
        if interval.is_zero() {
            return 0;
        }

        let mut attempts = 0;
        while self.accumulator >= interval {
            self.accumulator -= interval;
            attempts += 1;
        }
        attempts
    }

    fn select_kind(&mut self) -> EnemyKind {
        let catalog = EnemyKind::CATALOG;
        match usize::try_from(self.wave.saturating_sub(1)) {
            Ok(index) if index < catalog.len() => catalog[index],
            _ => catalog[self.rng.gen_range(0..catalog.len())],
        }
    }
}
