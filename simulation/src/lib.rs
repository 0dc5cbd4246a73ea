#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-tick driver that wires the Rampart world to its systems.
//!
//! The driver owns the world together with every system and runs them in a
//! fixed pass order once per tick. Commands produced by a pass are applied
//! before the next pass starts, and every resulting event is forwarded to the
//! sound player and to subscribed observers as it happens.

mod providers;

use std::time::Duration;

use rampart_core::{
    Command, ConfigError, EnemyId, Event, GameConfig, GridPoint, MapDefinition, ProgressReport,
    TowerId, TowerKind, TowerTarget,
};
use rampart_system_projectiles::{FlightRules, Projectiles};
use rampart_system_spatial_index::Quadtree;
use rampart_system_spawning::{Config as SpawningConfig, Spawning};
use rampart_system_tower_combat::TowerCombat;
use rampart_system_tower_targeting::TowerTargeting;
use rampart_world::{query, World};
use tracing::{debug, info};

pub use providers::{AssetProvider, EventSink, Silence, SoundCue, SoundPlayer, VisualFrame};

/// Runs a Rampart game one fixed tick at a time.
pub struct Simulation {
    world: World,
    index: Quadtree,
    targeting: TowerTargeting,
    combat: TowerCombat,
    projectiles: Projectiles,
    spawning: Spawning,
    tick_interval: Duration,
    lag: Duration,
    ticks: u64,
    targets: Vec<TowerTarget>,
    commands: Vec<Command>,
    targeting_backlog: Vec<Event>,
    spawning_backlog: Vec<Event>,
    sinks: Vec<Box<dyn EventSink>>,
    sound: Box<dyn SoundPlayer>,
}

impl std::fmt::Debug for Simulation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Simulation")
            .field("world", &self.world)
            .field("tick_interval", &self.tick_interval)
            .field("ticks", &self.ticks)
            .field("sinks", &self.sinks.len())
            .finish_non_exhaustive()
    }
}

impl Simulation {
    /// Creates a stopped game on `map`.
    ///
    /// Fails when either the configuration or the map cannot be simulated.
    pub fn new(
        config: GameConfig,
        map: MapDefinition,
        sound: Box<dyn SoundPlayer>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        map.validate()?;

        let playfield = config.playfield.bounds();
        let index = Quadtree::new(
            playfield,
            config.playfield.quadtree_capacity,
            config.playfield.quadtree_min_extent,
        );
        let targeting =
            TowerTargeting::new(&config.targeting, config.playfield.grid_size * 0.5);
        let projectiles = Projectiles::new(FlightRules::new(
            &config.projectiles,
            config.enemies.collision_radius,
            playfield,
        ));
        let spawning = Spawning::new(SpawningConfig::new(&config.waves, &config.enemies));
        let tick_interval = config.tick.interval();

        let mut simulation = Self {
            world: World::with_config(config),
            index,
            targeting,
            combat: TowerCombat::new(),
            projectiles,
            spawning,
            tick_interval,
            lag: Duration::ZERO,
            ticks: 0,
            targets: Vec::new(),
            commands: Vec::new(),
            targeting_backlog: Vec::new(),
            spawning_backlog: Vec::new(),
            sinks: Vec::new(),
            sound,
        };
        let _ = simulation.execute(Command::ConfigureMap { map });
        info!(tick_ms = tick_interval.as_millis() as u64, "simulation ready");
        Ok(simulation)
    }

    /// Registers an observer for every event emitted from now on.
    pub fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Read-only access to the world for queries.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Simulated time advanced by every tick.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Number of ticks run since construction or the last reset.
    #[must_use]
    pub fn ticks_elapsed(&self) -> u64 {
        self.ticks
    }

    /// Enemy currently locked by `tower`, if any.
    #[must_use]
    pub fn target_of(&self, tower: TowerId) -> Option<EnemyId> {
        self.targeting.target_of(tower)
    }

    /// Progress figures handed to persistence collaborators.
    #[must_use]
    pub fn progress(&self) -> ProgressReport {
        let economy = query::economy(&self.world);
        ProgressReport {
            map: query::map(&self.world).id,
            wave: query::wave_status(&self.world).wave,
            kills: economy.kills,
            gold: economy.gold,
        }
    }

    /// Installs another map, which resets the game around it.
    pub fn configure_map(&mut self, map: MapDefinition) -> Result<(), ConfigError> {
        map.validate()?;
        let _ = self.execute(Command::ConfigureMap { map });
        self.reset_systems();
        Ok(())
    }

    /// Starts the game; ignored while one is running or after it has ended.
    pub fn start(&mut self) {
        let _ = self.execute(Command::StartGame);
    }

    /// Pauses or resumes a running game.
    pub fn set_paused(&mut self, paused: bool) {
        let _ = self.execute(Command::SetPaused { paused });
    }

    /// Flips the pause flag of a running game.
    pub fn toggle_pause(&mut self) {
        let paused = query::is_paused(&self.world);
        self.set_paused(!paused);
    }

    /// Stops the game and restores the initial economy, wave and collections.
    pub fn reset(&mut self) {
        let _ = self.execute(Command::ResetGame);
        self.reset_systems();
    }

    /// Buys a tower on `cell`, returning its handle when the purchase succeeds.
    pub fn build_tower(&mut self, kind: TowerKind, cell: GridPoint) -> Option<TowerId> {
        self.execute(Command::BuildTower { kind, cell })
            .into_iter()
            .find_map(|event| match event {
                Event::TowerBuilt { tower, .. } => Some(tower),
                _ => None,
            })
    }

    /// Upgrades `tower`, returning the handle of its replacement.
    pub fn upgrade_tower(&mut self, tower: TowerId) -> Option<TowerId> {
        self.execute(Command::UpgradeTower { tower })
            .into_iter()
            .find_map(|event| match event {
                Event::TowerUpgraded { new, .. } => Some(new),
                _ => None,
            })
    }

    /// Demolishes `tower`, reporting whether it existed.
    pub fn demolish_tower(&mut self, tower: TowerId) -> bool {
        self.execute(Command::DemolishTower { tower })
            .iter()
            .any(|event| matches!(event, Event::TowerDemolished { .. }))
    }

    /// Feeds wall-clock time into the fixed-step loop and returns the number
    /// of ticks that ran.
    ///
    /// Time that arrives while the game is stopped or paused is discarded.
    pub fn advance(&mut self, elapsed: Duration) -> u32 {
        if !self.is_active() {
            self.lag = Duration::ZERO;
            return 0;
        }

        self.lag = self.lag.saturating_add(elapsed);
        let mut ran = 0;
        while self.lag >= self.tick_interval {
            self.lag -= self.tick_interval;
            if !self.tick() {
                self.lag = Duration::ZERO;
                break;
            }
            ran += 1;
        }
        ran
    }

    /// Runs a single tick; returns `false` without doing anything when the
    /// game is stopped or paused.
    pub fn tick(&mut self) -> bool {
        if !self.is_active() {
            return false;
        }
        let dt = self.tick_interval;

        let _ = self.execute(Command::Tick { dt });

        let enemies = query::enemy_view(&self.world);
        self.index.rebuild(&enemies);

        let towers = query::tower_view(&self.world);
        let backlog = std::mem::take(&mut self.targeting_backlog);
        self.targeting.handle(
            &backlog,
            query::clock(&self.world),
            &towers,
            &enemies,
            &self.index,
            &mut self.targets,
            &mut self.commands,
        );
        self.flush_commands();

        self.combat.handle(
            &query::tower_cooldowns(&self.world),
            &self.targets,
            &mut self.commands,
        );
        self.flush_commands();

        let enemies = query::enemy_view(&self.world);
        self.projectiles.handle(
            dt,
            &query::projectile_view(&self.world),
            &enemies,
            &mut self.commands,
        );
        self.flush_commands();

        let _ = self.execute(Command::SweepCasualties);

        let backlog = std::mem::take(&mut self.spawning_backlog);
        self.spawning.handle(
            &backlog,
            query::wave_status(&self.world),
            &mut self.commands,
        );
        self.flush_commands();

        let _ = self.execute(Command::AdvanceWave);
        let _ = self.execute(Command::EvaluateOutcome);

        self.ticks += 1;
        true
    }

    /// Resolves the visual handle of every entity through `assets`.
    ///
    /// Entities whose key the provider does not know are left out.
    pub fn visuals<A: AssetProvider>(&self, assets: &mut A) -> VisualFrame<A::Handle> {
        let enemies = query::enemy_view(&self.world)
            .iter()
            .filter_map(|enemy| {
                assets
                    .resolve(providers::enemy_key(enemy))
                    .map(|handle| (enemy.id, handle))
            })
            .collect();
        let towers = query::tower_view(&self.world)
            .iter()
            .filter_map(|tower| {
                assets
                    .resolve(providers::tower_key(tower))
                    .map(|handle| (tower.id, handle))
            })
            .collect();
        let projectiles = query::projectile_view(&self.world)
            .iter()
            .filter_map(|projectile| {
                assets
                    .resolve(providers::projectile_key(projectile))
                    .map(|handle| (projectile.id, handle))
            })
            .collect();
        VisualFrame {
            enemies,
            towers,
            projectiles,
        }
    }

    fn is_active(&self) -> bool {
        query::is_running(&self.world) && !query::is_paused(&self.world)
    }

    fn reset_systems(&mut self) {
        self.index.clear();
        self.targeting.reset();
        self.spawning.reset();
        self.targets.clear();
        self.targeting_backlog.clear();
        self.spawning_backlog.clear();
        self.lag = Duration::ZERO;
        self.ticks = 0;
    }

    fn flush_commands(&mut self) {
        let commands = std::mem::take(&mut self.commands);
        for command in commands {
            let _ = self.execute(command);
        }
    }

    fn execute(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        rampart_world::apply(&mut self.world, command, &mut events);
        self.dispatch(&events);
        events
    }

    fn dispatch(&mut self, events: &[Event]) {
        for event in events {
            if let Some(cue) = SoundCue::for_event(event) {
                debug!(sound = cue.id(), "sound cue");
                self.sound.play(cue.id(), cue.volume(), false);
            }
            for sink in &mut self.sinks {
                sink.on_event(event);
            }
        }
        self.targeting_backlog.extend_from_slice(events);
        self.spawning_backlog.extend_from_slice(events);
    }
}
