use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use rampart_core::{Command, EnemyKind, Event, GameConfig};
use rampart_system_spawning::{Config, Spawning};
use rampart_world::{self as world, query, World};

fn config(enemies_per_wave: u32) -> GameConfig {
    let mut config = GameConfig::default();
    config.waves.enemies_per_wave = enemies_per_wave;
    config
}

fn spawning_for(config: &GameConfig) -> Spawning {
    Spawning::new(Config::new(&config.waves, &config.enemies))
}

#[test]
fn emits_one_spawn_per_elapsed_interval() {
    let config = config(10);
    let mut world = World::with_config(config.clone());
    let mut spawning = spawning_for(&config);
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);

    let mut commands = Vec::new();
    spawning.handle(&events, query::wave_status(&world), &mut commands);
    assert!(commands.is_empty(), "starting the game does not spawn");

    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(4_100),
        }],
        query::wave_status(&world),
        &mut commands,
    );

    assert_eq!(commands.len(), 2, "expected one spawn per 2s interval");
    for command in &commands {
        assert_eq!(
            command,
            &Command::SpawnEnemy {
                kind: EnemyKind::Slime,
                health: 100,
                speed: 20.0,
            }
        );
    }
}

#[test]
fn spawns_never_exceed_wave_size() {
    let config = config(3);
    let mut world = World::with_config(config.clone());
    let mut spawning = spawning_for(&config);
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);

    let mut commands = Vec::new();
    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(30),
        }],
        query::wave_status(&world),
        &mut commands,
    );
    assert_eq!(commands.len(), 3);

    for command in commands {
        world::apply(&mut world, command, &mut events);
    }
    let status = query::wave_status(&world);
    assert_eq!(status.spawned, 3);
    assert!(status.spawn_complete);

    let mut more = Vec::new();
    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_secs(30),
        }],
        status,
        &mut more,
    );
    assert!(more.is_empty());
}

#[test]
fn pause_restarts_the_cadence() {
    let config = config(10);
    let mut world = World::with_config(config.clone());
    let mut spawning = spawning_for(&config);
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);

    let mut commands = Vec::new();
    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(1_500),
        }],
        query::wave_status(&world),
        &mut commands,
    );
    assert!(commands.is_empty());

    let mut toggles = Vec::new();
    world::apply(&mut world, Command::SetPaused { paused: true }, &mut toggles);
    world::apply(&mut world, Command::SetPaused { paused: false }, &mut toggles);
    spawning.handle(&toggles, query::wave_status(&world), &mut commands);

    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(1_500),
        }],
        query::wave_status(&world),
        &mut commands,
    );
    assert!(commands.is_empty(), "time before the pause is not carried over");

    spawning.handle(
        &[Event::TimeAdvanced {
            dt: Duration::from_millis(500),
        }],
        query::wave_status(&world),
        &mut commands,
    );
    assert_eq!(commands.len(), 1);
}

#[test]
fn deterministic_replay_produces_identical_sequence() {
    let first = replay();
    let second = replay();

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.spawns.len(), 5);
}

fn replay() -> ReplayOutcome {
    let mut config = config(5);
    config.waves.spawn_interval_max_ms = 300;
    config.waves.spawn_interval_min_ms = 100;
    let mut world = World::with_config(config.clone());
    let mut spawning = spawning_for(&config);
    let mut log = Vec::new();

    let mut pending = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut pending);
    for _ in 0..200 {
        world::apply(
            &mut world,
            Command::Tick {
                dt: Duration::from_millis(16),
            },
            &mut pending,
        );
        let mut commands = Vec::new();
        spawning.handle(&pending, query::wave_status(&world), &mut commands);
        pending.clear();
        for command in commands {
            if let Command::SpawnEnemy {
                kind,
                health,
                speed,
            } = command
            {
                log.push(SpawnRecord {
                    kind,
                    health,
                    speed_bits: speed.to_bits(),
                });
            }
            world::apply(&mut world, command, &mut pending);
        }
    }

    ReplayOutcome { spawns: log }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct ReplayOutcome {
    spawns: Vec<SpawnRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct SpawnRecord {
    kind: EnemyKind,
    health: u32,
    speed_bits: u32,
}
