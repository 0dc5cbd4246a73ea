use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
    time::Duration,
};

use rampart_core::{Command, EnemyId, EnemyKind, Event, GridPoint, TowerId, TowerKind};
use rampart_system_spatial_index::Quadtree;
use rampart_system_tower_targeting::TowerTargeting;
use rampart_world::{self as world, query, World};

const TICK: Duration = Duration::from_millis(16);

#[test]
fn deterministic_replay_holds_the_earliest_spawned_enemy() {
    let first = replay(scripted_commands());
    let second = replay(scripted_commands());

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());

    let tower = first.towers.first().copied().expect("tower was built");
    let spawned = &first.spawned;
    assert_eq!(spawned.len(), 2, "expected exactly two spawn events");
    let earliest = spawned.iter().copied().min().expect("spawns recorded");

    assert!(first.assignments[0].is_empty());
    assert!(first.assignments[1].is_empty());
    for assignment in &first.assignments[2..] {
        assert_eq!(assignment, &vec![(tower, earliest)]);
    }
    assert_eq!(first.highlighted, vec![earliest]);
}

#[test]
fn resetting_the_world_clears_assignments() {
    let mut script = scripted_commands();
    script.push(Command::ResetGame);
    let outcome = replay(script);

    let last = outcome.assignments.last().expect("assignments recorded");
    assert!(last.is_empty());
    assert!(outcome.highlighted.is_empty());
}

fn scripted_commands() -> Vec<Command> {
    let mut commands = vec![
        Command::StartGame,
        Command::BuildTower {
            kind: TowerKind::Arrow,
            cell: GridPoint::new(15, 6),
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Slime,
            health: 100,
            speed: 20.0,
        },
        Command::SpawnEnemy {
            kind: EnemyKind::Goblin,
            health: 100,
            speed: 20.0,
        },
    ];
    commands.extend((0..40).map(|_| Command::Tick { dt: TICK }));
    commands
}

#[derive(Debug, PartialEq)]
struct ReplayOutcome {
    events: Vec<String>,
    assignments: Vec<Vec<(TowerId, EnemyId)>>,
    towers: Vec<TowerId>,
    spawned: Vec<EnemyId>,
    highlighted: Vec<EnemyId>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.events.hash(&mut hasher);
        self.assignments.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(commands: Vec<Command>) -> ReplayOutcome {
    let mut world = World::new();
    let config = query::config(&world).clone();
    let mut targeting =
        TowerTargeting::new(&config.targeting, config.playfield.grid_size / 2.0);
    let mut index = Quadtree::new(
        config.playfield.bounds(),
        config.playfield.quadtree_capacity,
        config.playfield.quadtree_min_extent,
    );

    let mut outcome = ReplayOutcome {
        events: Vec::new(),
        assignments: Vec::new(),
        towers: Vec::new(),
        spawned: Vec::new(),
        highlighted: Vec::new(),
    };
    let mut pending: Vec<Event> = Vec::new();
    let mut targets = Vec::new();

    for command in commands {
        if command == Command::ResetGame {
            targeting.reset();
        }
        apply(&mut world, command, &mut pending, &mut outcome);

        let enemies = query::enemy_view(&world);
        index.rebuild(&enemies);
        let mut generated = Vec::new();
        targeting.handle(
            &pending,
            query::clock(&world),
            &query::tower_view(&world),
            &enemies,
            &index,
            &mut targets,
            &mut generated,
        );
        pending.clear();

        for command in generated {
            apply(&mut world, command, &mut pending, &mut outcome);
        }
        outcome
            .assignments
            .push(targets.iter().map(|target| (target.tower, target.enemy)).collect());
    }

    outcome.highlighted = query::enemy_view(&world)
        .iter()
        .filter(|enemy| enemy.highlighted)
        .map(|enemy| enemy.id)
        .collect();
    outcome
}

fn apply(
    world: &mut World,
    command: Command,
    pending: &mut Vec<Event>,
    outcome: &mut ReplayOutcome,
) {
    let mut generated = Vec::new();
    world::apply(world, command, &mut generated);
    for event in &generated {
        match event {
            Event::TowerBuilt { tower, .. } => outcome.towers.push(*tower),
            Event::EnemySpawned { enemy, .. } => outcome.spawned.push(*enemy),
            _ => {}
        }
        outcome.events.push(format!("{event:?}"));
    }
    pending.extend(generated);
}
