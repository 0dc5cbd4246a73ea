#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pulls the trigger for towers that hold a target.
//!
//! Targeting decides what a tower aims at; this system only decides whether
//! the shot happens on the current tick. The world restarts a tower's
//! fire-rate timer when it accepts the shot, so a tower holding the same
//! target fires once per fire-rate period and never more often.

use rampart_core::{Command, TowerCooldownView, TowerTarget};
use tracing::trace;

/// Stateless trigger that turns held targets into shots.
#[derive(Clone, Copy, Debug, Default)]
pub struct TowerCombat;

impl TowerCombat {
    /// Creates the combat system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Appends a `Command::FireProjectile` for every target whose tower has
    /// no cooldown left.
    ///
    /// Towers absent from `cooldowns` were removed after targeting ran and
    /// hold their fire.
    pub fn handle(
        &self,
        cooldowns: &TowerCooldownView,
        targets: &[TowerTarget],
        out: &mut Vec<Command>,
    ) {
        for target in targets {
            match cooldowns.ready_in(target.tower) {
                Some(remaining) if remaining.is_zero() => {
                    trace!(tower = ?target.tower, enemy = ?target.enemy, "tower fires");
                    out.push(shot(target));
                }
                Some(remaining) => trace!(
                    tower = ?target.tower,
                    remaining_ms = remaining.as_millis() as u64,
                    "tower cooling down"
                ),
                None => trace!(tower = ?target.tower, "target held by a vanished tower"),
            }
        }
    }
}

fn shot(target: &TowerTarget) -> Command {
    Command::FireProjectile {
        tower: target.tower,
        target: target.enemy,
        origin: target.muzzle,
        direction: target.direction,
    }
}
