#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that acquires, holds and releases tower targets.
//!
//! Each tower remembers when every enemy entered its range and prefers the
//! enemy that has been inside the longest. A target is held for a fixed lock
//! period; losing it forces a short re-scan cooldown while an expired lock
//! lets the tower re-evaluate on the spot. Turrets turn toward their target
//! at a bounded angular speed and drift back to 0° when idle.

use std::{
    collections::{BTreeMap, BTreeSet},
    time::Duration,
};

use glam::Vec2;
use rampart_core::{
    config::TargetingConfig,
    geometry::{direction_from_degrees, facing_degrees, normalize_degrees},
    Command, EnemyId, EnemyView, Event, Rect, TowerId, TowerSnapshot, TowerTarget, TowerView,
};
use rampart_system_spatial_index::Quadtree;
use tracing::debug;

/// Tower targeting system that keeps per-tower lock state between ticks.
#[derive(Debug)]
pub struct TowerTargeting {
    rescan_cooldown: Duration,
    lock_duration: Duration,
    muzzle_offset: f32,
    clock: Duration,
    memory: BTreeMap<TowerId, TowerMemory>,
    highlighted: BTreeSet<EnemyId>,
    candidates: Vec<EnemyId>,
}

#[derive(Clone, Debug, Default)]
struct TowerMemory {
    entered: BTreeMap<EnemyId, Duration>,
    target: Option<EnemyId>,
    locked_at: Duration,
    lost_at: Option<Duration>,
}

impl TowerTargeting {
    /// Creates a targeting system.
    ///
    /// `muzzle_offset` is the distance from a tower's centre to the point
    /// where its projectiles appear, usually half a grid cell.
    #[must_use]
    pub fn new(config: &TargetingConfig, muzzle_offset: f32) -> Self {
        Self {
            rescan_cooldown: config.rescan_cooldown(),
            lock_duration: config.lock_duration(),
            muzzle_offset,
            clock: Duration::ZERO,
            memory: BTreeMap::new(),
            highlighted: BTreeSet::new(),
            candidates: Vec::new(),
        }
    }

    /// Forgets every lock, entry time and highlight.
    pub fn reset(&mut self) {
        self.clock = Duration::ZERO;
        self.memory.clear();
        self.highlighted.clear();
        self.candidates.clear();
    }

    /// Enemy currently locked by `tower`, if any.
    #[must_use]
    pub fn target_of(&self, tower: TowerId) -> Option<EnemyId> {
        self.memory.get(&tower).and_then(|memory| memory.target)
    }

    /// Evaluates every tower at simulation time `now`.
    ///
    /// `events` are the world events emitted since the previous call; fire
    /// events restart the firing tower's lock. Towers holding a valid target
    /// are written to `out_targets` (cleared first) and rotation and
    /// highlight changes are appended to `out_commands`.
    pub fn handle(
        &mut self,
        events: &[Event],
        now: Duration,
        towers: &TowerView,
        enemies: &EnemyView,
        index: &Quadtree,
        out_targets: &mut Vec<TowerTarget>,
        out_commands: &mut Vec<Command>,
    ) {
        out_targets.clear();

        for event in events {
            if let Event::ProjectileFired { tower, .. } = event {
                if let Some(memory) = self.memory.get_mut(tower) {
                    memory.locked_at = self.clock;
                }
            }
        }

        let dt = now.saturating_sub(self.clock);
        self.clock = now;
        self.memory.retain(|tower, _| towers.get(*tower).is_some());

        for tower in towers.iter() {
            self.collect_candidates(tower, enemies, index);
            let memory = self.memory.entry(tower.id).or_default();
            refresh_entries(memory, &self.candidates, now);
            update_lock(
                memory,
                tower.id,
                &self.candidates,
                now,
                self.rescan_cooldown,
                self.lock_duration,
            );

            let target = memory.target.and_then(|enemy| enemies.living_enemy(enemy));
            let desired = target.map_or(0.0, |enemy| facing_degrees(enemy.position - tower.position));
            let step = tower.kind.stats().rotation_speed * dt.as_secs_f32();
            let rotation = rotate_toward(tower.rotation, desired, step);
            if rotation != tower.rotation {
                out_commands.push(Command::AimTower {
                    tower: tower.id,
                    rotation,
                });
            }

            if let Some(enemy) = target {
                out_targets.push(TowerTarget {
                    tower: tower.id,
                    enemy: enemy.id,
                    muzzle: muzzle_position(tower.position, rotation, self.muzzle_offset),
                    direction: direction_from_degrees(rotation),
                });
            }
        }

        self.sync_highlights(out_commands);
    }

    fn collect_candidates(&mut self, tower: &TowerSnapshot, enemies: &EnemyView, index: &Quadtree) {
        self.candidates.clear();
        let range = tower.kind.stats().range;
        index.query_into(&Rect::around(tower.position, range), &mut self.candidates);
        self.candidates.retain(|id| {
            enemies
                .living_enemy(*id)
                .is_some_and(|enemy| tower.is_in_range(enemy.position))
        });
        self.candidates.sort_unstable();
    }

    fn sync_highlights(&mut self, out_commands: &mut Vec<Command>) {
        let targeted: BTreeSet<EnemyId> = self
            .memory
            .values()
            .filter_map(|memory| memory.target)
            .collect();

        for enemy in self.highlighted.difference(&targeted) {
            out_commands.push(Command::HighlightEnemy {
                enemy: *enemy,
                highlighted: false,
            });
        }
        for enemy in targeted.difference(&self.highlighted) {
            out_commands.push(Command::HighlightEnemy {
                enemy: *enemy,
                highlighted: true,
            });
        }
        self.highlighted = targeted;
    }
}

fn refresh_entries(memory: &mut TowerMemory, in_range: &[EnemyId], now: Duration) {
    memory
        .entered
        .retain(|enemy, _| in_range.binary_search(enemy).is_ok());
    for enemy in in_range {
        let _ = memory.entered.entry(*enemy).or_insert(now);
    }
}

fn update_lock(
    memory: &mut TowerMemory,
    tower: TowerId,
    in_range: &[EnemyId],
    now: Duration,
    rescan_cooldown: Duration,
    lock_duration: Duration,
) {
    if let Some(enemy) = memory.target {
        if in_range.binary_search(&enemy).is_err() {
            debug!(?tower, ?enemy, "target lost");
            memory.target = None;
            memory.lost_at = Some(now);
        } else if now.saturating_sub(memory.locked_at) >= lock_duration {
            debug!(?tower, ?enemy, "target lock expired");
            memory.target = None;
        }
    }

    if memory.target.is_some() {
        return;
    }

    let cooling = memory
        .lost_at
        .is_some_and(|lost| now.saturating_sub(lost) < rescan_cooldown);
    if cooling {
        return;
    }

    let earliest = memory
        .entered
        .iter()
        .min_by_key(|(enemy, entered)| (**entered, **enemy))
        .map(|(enemy, _)| *enemy);
    if let Some(enemy) = earliest {
        debug!(?tower, ?enemy, "target acquired");
        memory.target = Some(enemy);
        memory.locked_at = now;
        memory.lost_at = None;
    }
}

/// Turns `current` toward `desired` by at most `step` degrees, snapping when
/// the remaining difference is smaller than the step.
fn rotate_toward(current: f32, desired: f32, step: f32) -> f32 {
    let delta = normalize_degrees(desired - current);
    if delta.abs() <= step {
        return normalize_degrees(desired);
    }
    normalize_degrees(current + step * delta.signum())
}

/// Muzzle position of a tower facing `rotation` degrees.
fn muzzle_position(center: Vec2, rotation: f32, offset: f32) -> Vec2 {
    center + direction_from_degrees(rotation) * offset
}
