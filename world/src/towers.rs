//! Authoritative tower state management utilities.

use std::{collections::BTreeMap, time::Duration};

use glam::Vec2;
use rampart_core::{GridPoint, TowerCooldownSnapshot, TowerId, TowerKind, TowerSnapshot};
use slotmap::SlotMap;

/// Snapshot of a tower stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct TowerState {
    /// Kind of tower that was constructed.
    pub(crate) kind: TowerKind,
    /// Cell occupied by the tower.
    pub(crate) cell: GridPoint,
    /// Centre of the occupied cell in world units.
    pub(crate) position: Vec2,
    /// Facing angle in degrees.
    pub(crate) rotation: f32,
    /// Time until the tower may fire again.
    pub(crate) ready_in: Duration,
}

impl TowerState {
    /// Creates a tower whose first shot waits one full fire-rate period.
    pub(crate) fn new(kind: TowerKind, cell: GridPoint, grid_size: f32) -> Self {
        Self {
            kind,
            cell,
            position: cell.center(grid_size),
            rotation: 0.0,
            ready_in: kind.stats().fire_rate,
        }
    }
}

/// Registry that stores towers and the cells they occupy.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: SlotMap<TowerId, TowerState>,
    occupancy: BTreeMap<GridPoint, TowerId>,
}

impl TowerRegistry {
    /// Creates an empty tower registry.
    pub(crate) fn new() -> Self {
        Self {
            entries: SlotMap::with_key(),
            occupancy: BTreeMap::new(),
        }
    }

    pub(crate) fn occupant(&self, cell: GridPoint) -> Option<TowerId> {
        self.occupancy.get(&cell).copied()
    }

    pub(crate) fn get(&self, id: TowerId) -> Option<&TowerState> {
        self.entries.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut TowerState> {
        self.entries.get_mut(id)
    }

    /// Stores the tower and claims its cell.
    pub(crate) fn insert(&mut self, state: TowerState) -> TowerId {
        let cell = state.cell;
        let id = self.entries.insert(state);
        let _ = self.occupancy.insert(cell, id);
        id
    }

    /// Removes the tower and releases its cell.
    pub(crate) fn remove(&mut self, id: TowerId) -> Option<TowerState> {
        let state = self.entries.remove(id)?;
        if self.occupancy.get(&state.cell) == Some(&id) {
            let _ = self.occupancy.remove(&state.cell);
        }
        Some(state)
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.occupancy.clear();
    }

    pub(crate) fn count_down(&mut self, dt: Duration) {
        for (_, tower) in self.entries.iter_mut() {
            tower.ready_in = tower.ready_in.saturating_sub(dt);
        }
    }

    pub(crate) fn snapshots(&self) -> Vec<TowerSnapshot> {
        self.entries
            .iter()
            .map(|(id, tower)| TowerSnapshot {
                id,
                kind: tower.kind,
                cell: tower.cell,
                position: tower.position,
                rotation: tower.rotation,
            })
            .collect()
    }

    pub(crate) fn cooldowns(&self) -> Vec<TowerCooldownSnapshot> {
        self.entries
            .iter()
            .map(|(tower, state)| TowerCooldownSnapshot {
                tower,
                kind: state.kind,
                ready_in: state.ready_in,
            })
            .collect()
    }
}
