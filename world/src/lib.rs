#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state management for Rampart.
//!
//! The world exclusively owns enemies, towers and projectiles. Every mutation
//! arrives as a [`Command`] through [`apply`], and every observable change is
//! reported back as an [`Event`]. Systems inspect the state through the
//! read-only [`query`] module.

mod enemies;
mod projectiles;
mod towers;

use std::time::Duration;

use glam::Vec2;
use rampart_core::{
    Circle, Command, DemolishError, Economy, EnemyId, Event, ExpiryReason, GameConfig,
    MapDefinition, PlacementError, ProjectileId, UpgradeError,
};
use slotmap::SlotMap;
use tracing::{debug, info, warn};

use crate::{
    enemies::{Enemy, Stride},
    projectiles::Projectile,
    towers::{TowerRegistry, TowerState},
};

/// Represents the authoritative Rampart world state.
#[derive(Debug)]
pub struct World {
    config: GameConfig,
    map: MapDefinition,
    path: Vec<Vec2>,
    end_points: Vec<Circle>,
    enemies: SlotMap<EnemyId, Enemy>,
    towers: TowerRegistry,
    projectiles: SlotMap<ProjectileId, Projectile>,
    economy: Economy,
    wave: u32,
    spawned_this_wave: u32,
    spawn_complete: bool,
    running: bool,
    paused: bool,
    finished: bool,
    clock: Duration,
}

impl World {
    /// Creates a world on the default map using default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(GameConfig::default())
    }

    /// Creates a world on the default map using the provided parameters.
    #[must_use]
    pub fn with_config(config: GameConfig) -> Self {
        let map = MapDefinition::default_map(config.playfield.grid_size);
        let economy = initial_economy(&config);
        let mut world = Self {
            path: Vec::new(),
            end_points: Vec::new(),
            enemies: SlotMap::with_key(),
            towers: TowerRegistry::new(),
            projectiles: SlotMap::with_key(),
            economy,
            wave: 1,
            spawned_this_wave: 0,
            spawn_complete: false,
            running: false,
            paused: false,
            finished: false,
            clock: Duration::ZERO,
            map,
            config,
        };
        world.install_map(world.map.clone());
        world
    }

    fn install_map(&mut self, map: MapDefinition) {
        self.path = map.world_path(self.config.playfield.grid_size);
        self.end_points = map.end_point_circles();
        self.map = map;
    }

    fn is_active(&self) -> bool {
        self.running && !self.paused
    }

    fn has_living_enemies(&self) -> bool {
        self.enemies.iter().any(|(_, enemy)| enemy.is_alive())
    }

    fn game_state_event(&self) -> Event {
        Event::GameStateChanged {
            running: self.running,
            paused: self.paused,
        }
    }

    fn reset(&mut self, out_events: &mut Vec<Event>) {
        self.enemies.clear();
        self.towers.clear();
        self.projectiles.clear();
        self.economy = initial_economy(&self.config);
        self.wave = 1;
        self.spawned_this_wave = 0;
        self.spawn_complete = false;
        self.running = false;
        self.paused = false;
        self.finished = false;
        self.clock = Duration::ZERO;

        out_events.push(Event::GoldChanged {
            gold: self.economy.gold,
        });
        out_events.push(Event::LivesChanged {
            lives: self.economy.lives,
        });
        out_events.push(Event::WaveChanged { wave: self.wave });
        out_events.push(Event::KillCountChanged {
            kills: self.economy.kills,
        });
        out_events.push(self.game_state_event());
    }

    fn advance_enemies(&mut self, dt: Duration, out_events: &mut Vec<Event>) {
        let grace = self.config.enemies.corpse_grace();
        let mut escaped: Vec<EnemyId> = Vec::new();
        let mut decayed: Vec<EnemyId> = Vec::new();

        for (id, enemy) in self.enemies.iter_mut() {
            if !enemy.is_alive() {
                enemy.dead_for = enemy.dead_for.saturating_add(dt);
                if enemy.dead_for >= grace {
                    decayed.push(id);
                }
                continue;
            }

            let stride = enemy.advance(&self.path, dt);
            let arrived = self
                .end_points
                .iter()
                .any(|end| end.contains(enemy.position));
            if arrived || stride == Stride::Exhausted {
                escaped.push(id);
            }
        }

        for enemy in decayed {
            if self.enemies.remove(enemy).is_some() {
                out_events.push(Event::EnemyRemoved { enemy });
            }
        }

        for enemy in escaped {
            if self.enemies.remove(enemy).is_none() {
                continue;
            }
            self.economy.lives = self.economy.lives.saturating_sub(1);
            debug!(?enemy, lives = self.economy.lives, "enemy reached an end-point");
            out_events.push(Event::EnemyReachedEnd { enemy });
            out_events.push(Event::LivesChanged {
                lives: self.economy.lives,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

fn initial_economy(config: &GameConfig) -> Economy {
    Economy {
        gold: config.economy.initial_gold,
        lives: config.economy.initial_lives,
        kills: 0,
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::ConfigureMap { map } => {
            if let Err(error) = map.validate() {
                warn!(%error, map = map.id.get(), "rejected map configuration");
                return;
            }
            let id = map.id;
            world.install_map(map);
            world.reset(out_events);
            info!(map = id.get(), "map configured");
            out_events.push(Event::MapConfigured { map: id });
        }
        Command::StartGame => {
            if world.running {
                return;
            }
            if world.finished {
                warn!("start requested for a finished game; reset first");
                return;
            }
            world.running = true;
            world.paused = false;
            info!(wave = world.wave, "game started");
            out_events.push(world.game_state_event());
        }
        Command::SetPaused { paused } => {
            if !world.running || world.paused == paused {
                return;
            }
            world.paused = paused;
            info!(paused, "pause toggled");
            out_events.push(world.game_state_event());
        }
        Command::ResetGame => {
            world.reset(out_events);
            info!("game reset");
        }
        Command::Tick { dt } => {
            if !world.is_active() {
                return;
            }
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced { dt });
            world.towers.count_down(dt);
            world.advance_enemies(dt, out_events);
        }
        Command::SpawnEnemy {
            kind,
            health,
            speed,
        } => {
            if !world.is_active() || world.spawn_complete {
                debug!(?kind, "spawn ignored outside an active spawning phase");
                return;
            }
            let enemy = Enemy::spawn(kind, &world.path, health, speed);
            let position = enemy.position;
            let id = world.enemies.insert(enemy);
            world.spawned_this_wave += 1;
            debug!(enemy = ?id, ?kind, health, "enemy spawned");
            out_events.push(Event::EnemySpawned {
                enemy: id,
                kind,
                position,
                health,
            });

            if world.spawned_this_wave >= world.config.waves.enemies_per_wave {
                world.spawn_complete = true;
                out_events.push(Event::WaveSpawnCompleted { wave: world.wave });
            }
        }
        Command::HighlightEnemy { enemy, highlighted } => {
            if let Some(state) = world.enemies.get_mut(enemy) {
                state.highlighted = highlighted && state.is_alive();
            }
        }
        Command::BuildTower { kind, cell } => {
            let cost = kind.stats().cost;
            let rejection = if world.towers.occupant(cell).is_some() {
                Some(PlacementError::Occupied)
            } else if world.economy.gold < cost {
                Some(PlacementError::InsufficientGold {
                    required: cost,
                    available: world.economy.gold,
                })
            } else {
                None
            };

            if let Some(reason) = rejection {
                warn!(?kind, ?cell, %reason, "tower build rejected");
                out_events.push(Event::TowerBuildRejected { kind, cell, reason });
                return;
            }

            world.economy.gold -= cost;
            let tower = world.towers.insert(TowerState::new(
                kind,
                cell,
                world.config.playfield.grid_size,
            ));
            debug!(?tower, ?kind, ?cell, "tower built");
            out_events.push(Event::GoldChanged {
                gold: world.economy.gold,
            });
            out_events.push(Event::TowerBuilt { tower, kind, cell });
        }
        Command::UpgradeTower { tower } => {
            let outcome = match world.towers.get(tower) {
                None => Err(UpgradeError::MissingTower),
                Some(state) => match state.kind.upgrade() {
                    None => Err(UpgradeError::MaxLevel),
                    Some(next) => {
                        let price = next.stats().cost.saturating_sub(state.kind.stats().cost);
                        if world.economy.gold < price {
                            Err(UpgradeError::InsufficientGold {
                                required: price,
                                available: world.economy.gold,
                            })
                        } else {
                            Ok((next, price))
                        }
                    }
                },
            };

            let (next, price) = match outcome {
                Ok(plan) => plan,
                Err(reason) => {
                    warn!(?tower, %reason, "tower upgrade rejected");
                    out_events.push(Event::TowerUpgradeRejected { tower, reason });
                    return;
                }
            };
            let Some(previous) = world.towers.remove(tower) else {
                return;
            };

            world.economy.gold -= price;
            let upgraded = world.towers.insert(TowerState::new(
                next,
                previous.cell,
                world.config.playfield.grid_size,
            ));
            debug!(old = ?tower, new = ?upgraded, kind = ?next, "tower upgraded");
            out_events.push(Event::GoldChanged {
                gold: world.economy.gold,
            });
            out_events.push(Event::TowerUpgraded {
                old: tower,
                new: upgraded,
                kind: next,
            });
        }
        Command::DemolishTower { tower } => {
            let Some(state) = world.towers.remove(tower) else {
                let reason = DemolishError::MissingTower;
                warn!(?tower, %reason, "tower demolish rejected");
                out_events.push(Event::TowerDemolishRejected { tower, reason });
                return;
            };

            let refund = world.config.economy.refund_for(state.kind.stats().cost);
            world.economy.gold = world.economy.gold.saturating_add(refund);
            debug!(?tower, refund, "tower demolished");
            out_events.push(Event::GoldChanged {
                gold: world.economy.gold,
            });
            out_events.push(Event::TowerDemolished { tower, refund });
        }
        Command::AimTower { tower, rotation } => {
            if let Some(state) = world.towers.get_mut(tower) {
                state.rotation = rotation;
            }
        }
        Command::FireProjectile {
            tower,
            target,
            origin,
            direction,
        } => {
            let Some(state) = world.towers.get_mut(tower) else {
                return;
            };
            if !state.ready_in.is_zero() {
                debug!(?tower, "fire ignored while cooling down");
                return;
            }
            if !world.enemies.get(target).is_some_and(Enemy::is_alive) {
                debug!(?tower, ?target, "fire ignored for a stale target");
                return;
            }

            let stats = state.kind.stats();
            let kind = state.kind.projectile();
            state.ready_in = stats.fire_rate;
            let projectile = world.projectiles.insert(Projectile::launch(
                kind,
                stats.damage,
                origin,
                direction,
                target,
            ));
            out_events.push(Event::ProjectileFired {
                tower,
                projectile,
                target,
                kind,
            });
        }
        Command::UpdateProjectile { projectile, flight } => {
            if let Some(state) = world.projectiles.get_mut(projectile) {
                state.flight = flight;
            }
        }
        Command::ResolveProjectileHit { projectile, enemy } => {
            let Some(payload) = world.projectiles.remove(projectile) else {
                return;
            };
            match world.enemies.get_mut(enemy) {
                Some(target) if target.is_alive() => {
                    target.health = target.health.damaged(payload.damage);
                    out_events.push(Event::ProjectileHit {
                        projectile,
                        enemy,
                        damage: payload.damage,
                    });
                }
                _ => out_events.push(Event::ProjectileExpired {
                    projectile,
                    reason: ExpiryReason::TargetLost,
                }),
            }
        }
        Command::ExpireProjectile { projectile, reason } => {
            if world.projectiles.remove(projectile).is_some() {
                out_events.push(Event::ProjectileExpired { projectile, reason });
            }
        }
        Command::SweepCasualties => {
            let mut fallen = Vec::new();
            for (id, enemy) in world.enemies.iter_mut() {
                if enemy.is_alive() && enemy.health.is_depleted() {
                    enemy.state = rampart_core::EnemyState::Dead;
                    enemy.highlighted = false;
                    enemy.dead_for = Duration::ZERO;
                    fallen.push((id, enemy.kind));
                }
            }

            for (enemy, kind) in fallen {
                let reward = kind.reward();
                world.economy.kills = world.economy.kills.saturating_add(1);
                world.economy.gold = world.economy.gold.saturating_add(reward);
                debug!(?enemy, ?kind, reward, "enemy died");
                out_events.push(Event::GoldChanged {
                    gold: world.economy.gold,
                });
                out_events.push(Event::KillCountChanged {
                    kills: world.economy.kills,
                });
                out_events.push(Event::EnemyDied {
                    enemy,
                    kind,
                    reward,
                });
            }
        }
        Command::AdvanceWave => {
            if !world.is_active()
                || world.economy.lives == 0
                || !world.spawn_complete
                || world.has_living_enemies()
            {
                return;
            }
            if world.wave >= world.config.waves.max_waves {
                world.running = false;
                world.finished = true;
                info!(wave = world.wave, map = world.map.id.get(), "level completed");
                out_events.push(world.game_state_event());
                out_events.push(Event::LevelCompleted {
                    map: world.map.id,
                    final_wave: world.wave,
                });
                return;
            }

            world.wave += 1;
            world.spawned_this_wave = 0;
            world.spawn_complete = false;
            info!(wave = world.wave, "wave advanced");
            out_events.push(Event::WaveChanged { wave: world.wave });
        }
        Command::EvaluateOutcome => {
            if !world.running || world.economy.lives > 0 {
                return;
            }
            world.running = false;
            world.paused = true;
            world.finished = true;
            info!(wave = world.wave, kills = world.economy.kills, "game over");
            out_events.push(world.game_state_event());
            out_events.push(Event::GameOver);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use glam::Vec2;
    use rampart_core::{
        Economy, EnemyView, GameConfig, GridPoint, MapDefinition, ProjectileView, TowerCooldownView,
        TowerId, TowerView, WaveStatus,
    };

    use super::World;

    /// Parameters the world was created with.
    #[must_use]
    pub fn config(world: &World) -> &GameConfig {
        &world.config
    }

    /// Map currently installed.
    #[must_use]
    pub fn map(world: &World) -> &MapDefinition {
        &world.map
    }

    /// Waypoints of the installed map in world units.
    #[must_use]
    pub fn path(world: &World) -> &[Vec2] {
        &world.path
    }

    /// Captures a read-only view of every enemy, dead ones included.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        EnemyView::from_snapshots(
            world
                .enemies
                .iter()
                .map(|(id, enemy)| enemy.snapshot(id))
                .collect(),
        )
    }

    /// Captures a read-only view of every tower.
    #[must_use]
    pub fn tower_view(world: &World) -> TowerView {
        TowerView::from_snapshots(world.towers.snapshots())
    }

    /// Captures the remaining cooldown of every tower.
    #[must_use]
    pub fn tower_cooldowns(world: &World) -> TowerCooldownView {
        TowerCooldownView::from_snapshots(world.towers.cooldowns())
    }

    /// Captures a read-only view of every in-flight projectile.
    #[must_use]
    pub fn projectile_view(world: &World) -> ProjectileView {
        ProjectileView::from_snapshots(
            world
                .projectiles
                .iter()
                .map(|(id, projectile)| projectile.snapshot(id))
                .collect(),
        )
    }

    /// Tower standing on the cell, if any.
    #[must_use]
    pub fn tower_at(world: &World, cell: GridPoint) -> Option<TowerId> {
        world.towers.occupant(cell)
    }

    /// Wave bookkeeping consumed by the spawning system.
    #[must_use]
    pub fn wave_status(world: &World) -> WaveStatus {
        WaveStatus {
            active: world.is_active(),
            wave: world.wave,
            spawned: world.spawned_this_wave,
            spawn_complete: world.spawn_complete,
        }
    }

    /// Current gold, lives and kill count.
    #[must_use]
    pub fn economy(world: &World) -> Economy {
        world.economy
    }

    /// Reports whether a game is in progress.
    #[must_use]
    pub fn is_running(world: &World) -> bool {
        world.running
    }

    /// Reports whether the game is paused.
    #[must_use]
    pub fn is_paused(world: &World) -> bool {
        world.paused
    }

    /// Reports whether the game ended through game over or level completion.
    #[must_use]
    pub fn is_finished(world: &World) -> bool {
        world.finished
    }

    /// Simulated time accumulated by ticks since the last reset.
    #[must_use]
    pub fn clock(world: &World) -> Duration {
        world.clock
    }
}
