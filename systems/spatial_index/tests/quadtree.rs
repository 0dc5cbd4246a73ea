use glam::Vec2;
use rampart_core::{EnemyKind, EnemySnapshot, EnemyState, EnemyView, Health, Rect};
use rampart_system_spatial_index::Quadtree;
use slotmap::KeyData;

fn playfield() -> Rect {
    Rect::from_min_size(Vec2::ZERO, Vec2::new(800.0, 600.0))
}

fn swarm() -> EnemyView {
    let mut snapshots = Vec::new();
    for index in 0..96_u32 {
        let column = (index % 12) as f32;
        let row = (index / 12) as f32;
        snapshots.push(EnemySnapshot {
            id: KeyData::from_ffi(u64::from(index)).into(),
            kind: EnemyKind::Goblin,
            position: Vec2::new(20.0 + column * 65.0, 15.0 + row * 72.0),
            health: Health::full(100),
            speed: 20.0,
            state: if index % 7 == 0 {
                EnemyState::Dead
            } else {
                EnemyState::Walking
            },
            path_index: 1,
            highlighted: false,
        });
    }
    EnemyView::from_snapshots(snapshots)
}

#[test]
fn range_queries_never_miss_an_enemy_inside_the_range() {
    let enemies = swarm();
    let mut tree = Quadtree::new(playfield(), 4, 8.0);
    tree.rebuild(&enemies);

    assert_eq!(tree.len(), enemies.living().count());
    assert!(tree.depth() > 0);

    for center in [
        Vec2::new(100.0, 100.0),
        Vec2::new(400.0, 300.0),
        Vec2::new(790.0, 590.0),
        Vec2::new(0.0, 300.0),
    ] {
        let range = Rect::around(center, 150.0);
        let mut found = tree.query(&range);
        found.sort_unstable();

        for enemy in enemies.living().filter(|enemy| range.contains(enemy.position)) {
            assert!(
                found.binary_search(&enemy.id).is_ok(),
                "enemy {:?} missing from query around {center}",
                enemy.id
            );
        }
        for id in &found {
            assert!(enemies.living_enemy(*id).is_some(), "dead enemy indexed");
        }
    }
}

#[test]
fn rebuilding_replaces_previous_content() {
    let enemies = swarm();
    let mut tree = Quadtree::new(playfield(), 4, 8.0);
    tree.rebuild(&enemies);
    tree.rebuild(&EnemyView::default());

    assert!(tree.is_empty());
    assert!(tree.query(&playfield()).is_empty());
}
