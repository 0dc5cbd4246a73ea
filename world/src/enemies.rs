//! Enemy state and path following.

use std::time::Duration;

use glam::Vec2;
use rampart_core::{EnemyId, EnemyKind, EnemySnapshot, EnemyState, Health};

/// Enemy stored inside the world.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) kind: EnemyKind,
    pub(crate) position: Vec2,
    pub(crate) health: Health,
    pub(crate) speed: f32,
    pub(crate) state: EnemyState,
    pub(crate) path_index: usize,
    pub(crate) highlighted: bool,
    pub(crate) dead_for: Duration,
}

/// Result of moving an enemy for one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Stride {
    /// The enemy is still walking its path.
    EnRoute,
    /// The enemy consumed the final waypoint.
    Exhausted,
}

impl Enemy {
    /// Places a new enemy on the first waypoint, heading for the second.
    pub(crate) fn spawn(kind: EnemyKind, path: &[Vec2], health: u32, speed: f32) -> Self {
        Self {
            kind,
            position: path.first().copied().unwrap_or(Vec2::ZERO),
            health: Health::full(health),
            speed: speed.max(0.0),
            state: EnemyState::Walking,
            path_index: 1.min(path.len()),
            highlighted: false,
            dead_for: Duration::ZERO,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.state != EnemyState::Dead
    }

    fn is_moving(&self) -> bool {
        matches!(self.state, EnemyState::Walking | EnemyState::Jumping)
    }

    /// Walks `speed × dt` along the path, carrying leftover distance past
    /// each waypoint so that large ticks never stall on a corner.
    pub(crate) fn advance(&mut self, path: &[Vec2], dt: Duration) -> Stride {
        if !self.is_moving() {
            return Stride::EnRoute;
        }

        let mut budget = self.speed * dt.as_secs_f32();
        while let Some(&waypoint) = path.get(self.path_index) {
            let remaining = self.position.distance(waypoint);
            if remaining <= budget {
                self.position = waypoint;
                self.path_index += 1;
                budget -= remaining;
                continue;
            }
            let heading = (waypoint - self.position) / remaining;
            self.position += heading * budget;
            return Stride::EnRoute;
        }

        Stride::Exhausted
    }

    pub(crate) fn snapshot(&self, id: EnemyId) -> EnemySnapshot {
        EnemySnapshot {
            id,
            kind: self.kind,
            position: self.position,
            health: self.health,
            speed: self.speed,
            state: self.state,
            path_index: self.path_index,
            highlighted: self.highlighted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_path() -> Vec<Vec2> {
        vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ]
    }

    #[test]
    fn spawn_starts_on_first_waypoint() {
        let enemy = Enemy::spawn(EnemyKind::Slime, &square_path(), 100, 20.0);
        assert_eq!(enemy.position, Vec2::ZERO);
        assert_eq!(enemy.path_index, 1);
        assert_eq!(enemy.state, EnemyState::Walking);
        assert_eq!(enemy.health.current(), 100);
    }

    #[test]
    fn leftover_distance_carries_past_a_corner() {
        let path = square_path();
        let mut enemy = Enemy::spawn(EnemyKind::Slime, &path, 100, 15.0);
        let stride = enemy.advance(&path, Duration::from_secs(1));
        assert_eq!(stride, Stride::EnRoute);
        assert_eq!(enemy.path_index, 2);
        assert!((enemy.position - Vec2::new(10.0, 5.0)).length() < 1e-4);
    }

    #[test]
    fn consuming_final_waypoint_exhausts_the_path() {
        let path = square_path();
        let mut enemy = Enemy::spawn(EnemyKind::Ogre, &path, 100, 100.0);
        assert_eq!(enemy.advance(&path, Duration::from_secs(1)), Stride::Exhausted);
        assert_eq!(enemy.position, Vec2::new(10.0, 10.0));
    }

    #[test]
    fn dead_enemies_do_not_move() {
        let path = square_path();
        let mut enemy = Enemy::spawn(EnemyKind::Wolf, &path, 100, 50.0);
        enemy.state = EnemyState::Dead;
        let _ = enemy.advance(&path, Duration::from_secs(1));
        assert_eq!(enemy.position, Vec2::ZERO);
    }
}
