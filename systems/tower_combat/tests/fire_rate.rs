use std::time::Duration;

use glam::Vec2;
use rampart_core::{Command, EnemyKind, Event, GridPoint, TowerKind, TowerTarget};
use rampart_system_tower_combat::TowerCombat;
use rampart_world::{self as world, query, World};

const TICK: Duration = Duration::from_millis(16);

fn armed_world() -> (World, TowerTarget) {
    let mut world = World::new();
    let mut events = Vec::new();
    world::apply(&mut world, Command::StartGame, &mut events);
    world::apply(
        &mut world,
        Command::BuildTower {
            kind: TowerKind::Arrow,
            cell: GridPoint::new(15, 6),
        },
        &mut events,
    );
    world::apply(
        &mut world,
        Command::SpawnEnemy {
            kind: EnemyKind::Slime,
            health: 100,
            speed: 0.0,
        },
        &mut events,
    );

    let tower = events
        .iter()
        .find_map(|event| match event {
            Event::TowerBuilt { tower, .. } => Some(*tower),
            _ => None,
        })
        .expect("tower built");
    let enemy = events
        .iter()
        .find_map(|event| match event {
            Event::EnemySpawned { enemy, .. } => Some(*enemy),
            _ => None,
        })
        .expect("enemy spawned");

    let target = TowerTarget {
        tower,
        enemy,
        muzzle: Vec2::new(620.0, 260.0),
        direction: Vec2::new(0.0, -1.0),
    };
    (world, target)
}

#[test]
fn held_target_is_shot_once_per_fire_rate_period() {
    let (mut world, target) = armed_world();
    let combat = TowerCombat::new();
    let mut volleys = Vec::new();

    for tick in 1..=200_u32 {
        let mut events = Vec::new();
        world::apply(&mut world, Command::Tick { dt: TICK }, &mut events);

        let mut commands = Vec::new();
        combat.handle(&query::tower_cooldowns(&world), &[target], &mut commands);
        for command in commands {
            world::apply(&mut world, command, &mut events);
        }
        if events
            .iter()
            .any(|event| matches!(event, Event::ProjectileFired { .. }))
        {
            volleys.push(tick);
        }
    }

    // 1000 ms at 16 ms per tick becomes ready on the 63rd tick.
    assert_eq!(volleys, vec![63, 126, 189]);
    assert_eq!(query::projectile_view(&world).len(), 3);
}

#[test]
fn fresh_tower_reports_its_full_period() {
    let (world, target) = armed_world();
    assert_eq!(
        query::tower_cooldowns(&world).ready_in(target.tower),
        Some(TowerKind::Arrow.stats().fire_rate)
    );
}
