#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Quadtree over live enemy positions, rebuilt from scratch every tick.
//!
//! Range queries return every enemy stored in a quadrant that touches the
//! query rectangle. Callers apply their own exact distance test.

use glam::Vec2;
use rampart_core::{EnemyId, EnemyView, Rect};

/// Spatial index answering rectangular candidate queries.
#[derive(Debug)]
pub struct Quadtree {
    root: Node,
    capacity: usize,
    min_extent: f32,
}

impl Quadtree {
    /// Creates an empty tree covering `bounds`.
    ///
    /// Leaves split once they hold more than `capacity` enemies, unless the
    /// resulting quadrants would be narrower than `min_extent`.
    #[must_use]
    pub fn new(bounds: Rect, capacity: usize, min_extent: f32) -> Self {
        Self {
            root: Node::leaf(bounds),
            capacity: capacity.max(1),
            min_extent: min_extent.max(0.0),
        }
    }

    /// Bounds covered by the root quadrant.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.root.bounds
    }

    /// Indexes an enemy. Positions outside the root are clamped onto its edge.
    pub fn insert(&mut self, enemy: EnemyId, position: Vec2) {
        let position = self.root.bounds.clamp(position);
        self.root
            .insert(Entry { enemy, position }, self.capacity, self.min_extent);
    }

    /// Collects candidates whose quadrant intersects `range`.
    #[must_use]
    pub fn query(&self, range: &Rect) -> Vec<EnemyId> {
        let mut found = Vec::new();
        self.query_into(range, &mut found);
        found
    }

    /// Appends candidates whose quadrant intersects `range` to `out`.
    pub fn query_into(&self, range: &Rect, out: &mut Vec<EnemyId>) {
        self.root.query(range, out);
    }

    /// Releases every node and entry.
    pub fn clear(&mut self) {
        self.root = Node::leaf(self.root.bounds);
    }

    /// Replaces the index content with the living enemies of `enemies`.
    pub fn rebuild(&mut self, enemies: &EnemyView) {
        self.clear();
        for enemy in enemies.living() {
            self.insert(enemy.id, enemy.position);
        }
    }

    /// Number of indexed enemies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.root.len()
    }

    /// Reports whether no enemy is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Depth of the deepest quadrant; a lone root leaf has depth zero.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }
}

#[derive(Clone, Copy, Debug)]
struct Entry {
    enemy: EnemyId,
    position: Vec2,
}

#[derive(Debug)]
struct Node {
    bounds: Rect,
    entries: Vec<Entry>,
    children: Option<Box<[Node; 4]>>,
}

impl Node {
    fn leaf(bounds: Rect) -> Self {
        Self {
            bounds,
            entries: Vec::new(),
            children: None,
        }
    }

    fn insert(&mut self, entry: Entry, capacity: usize, min_extent: f32) {
        if let Some(children) = self.children.as_mut() {
            let quadrant = quadrant_of(&self.bounds, entry.position);
            children[quadrant].insert(entry, capacity, min_extent);
            return;
        }

        self.entries.push(entry);
        if self.entries.len() > capacity && self.can_split(min_extent) {
            self.split(capacity, min_extent);
        }
    }

    fn can_split(&self, min_extent: f32) -> bool {
        self.bounds.width() * 0.5 >= min_extent && self.bounds.height() * 0.5 >= min_extent
    }

    fn split(&mut self, capacity: usize, min_extent: f32) {
        let [nw, ne, sw, se] = self.bounds.quadrants();
        let mut children = Box::new([
            Node::leaf(nw),
            Node::leaf(ne),
            Node::leaf(sw),
            Node::leaf(se),
        ]);
        for entry in self.entries.drain(..) {
            let quadrant = quadrant_of(&self.bounds, entry.position);
            children[quadrant].insert(entry, capacity, min_extent);
        }
        self.children = Some(children);
    }

    fn query(&self, range: &Rect, out: &mut Vec<EnemyId>) {
        if !self.bounds.intersects(range) {
            return;
        }
        out.extend(self.entries.iter().map(|entry| entry.enemy));
        if let Some(children) = self.children.as_ref() {
            for child in children.iter() {
                child.query(range, out);
            }
        }
    }

    fn len(&self) -> usize {
        self.entries.len()
            + self
                .children
                .as_ref()
                .map_or(0, |children| children.iter().map(Node::len).sum::<usize>())
    }

    fn depth(&self) -> usize {
        self.children.as_ref().map_or(0, |children| {
            1 + children.iter().map(Node::depth).max().unwrap_or(0)
        })
    }
}

/// Index into `[NW, NE, SW, SE]`; a point on a split line goes east or south.
fn quadrant_of(bounds: &Rect, position: Vec2) -> usize {
    let center = bounds.center();
    let west = position.x < center.x;
    let north = position.y < center.y;
    match (west, north) {
        (true, true) => 0,
        (false, true) => 1,
        (true, false) => 2,
        (false, false) => 3,
    }
}

#[cfg(test)]
mod tests {
    use slotmap::KeyData;

    use super::*;

    fn playfield() -> Rect {
        Rect::from_min_size(Vec2::ZERO, Vec2::new(800.0, 600.0))
    }

    fn id(index: u32) -> EnemyId {
        KeyData::from_ffi(u64::from(index)).into()
    }

    #[test]
    fn leaf_splits_once_capacity_is_exceeded() {
        let mut tree = Quadtree::new(playfield(), 4, 8.0);
        for index in 0..4 {
            tree.insert(id(index), Vec2::new(10.0 + index as f32, 10.0));
        }
        assert_eq!(tree.depth(), 0);

        tree.insert(id(4), Vec2::new(700.0, 500.0));
        assert!(tree.depth() >= 1);
        assert_eq!(tree.len(), 5);
    }

    #[test]
    fn split_line_points_go_east_and_south() {
        let bounds = playfield();
        assert_eq!(quadrant_of(&bounds, Vec2::new(400.0, 300.0)), 3);
        assert_eq!(quadrant_of(&bounds, Vec2::new(399.9, 300.0)), 2);
        assert_eq!(quadrant_of(&bounds, Vec2::new(400.0, 299.9)), 1);
    }

    #[test]
    fn query_skips_distant_quadrants() {
        let mut tree = Quadtree::new(playfield(), 1, 8.0);
        tree.insert(id(0), Vec2::new(50.0, 50.0));
        tree.insert(id(1), Vec2::new(750.0, 550.0));

        let near = tree.query(&Rect::around(Vec2::new(60.0, 60.0), 30.0));
        assert_eq!(near, vec![id(0)]);
    }

    #[test]
    fn out_of_bounds_positions_are_clamped() {
        let mut tree = Quadtree::new(playfield(), 4, 8.0);
        tree.insert(id(3), Vec2::new(-50.0, 900.0));
        let found = tree.query(&Rect::around(Vec2::new(0.0, 600.0), 1.0));
        assert_eq!(found, vec![id(3)]);
    }

    #[test]
    fn coincident_points_stop_at_minimum_extent() {
        let mut tree = Quadtree::new(playfield(), 1, 100.0);
        for index in 0..10 {
            tree.insert(id(index), Vec2::new(123.0, 77.0));
        }
        assert_eq!(tree.len(), 10);
        assert!(tree.depth() <= 3);
    }

    #[test]
    fn clear_releases_all_entries() {
        let mut tree = Quadtree::new(playfield(), 1, 8.0);
        for index in 0..6 {
            tree.insert(id(index), Vec2::new(index as f32 * 100.0, 20.0));
        }
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(tree.depth(), 0);
        assert!(tree.query(&playfield()).is_empty());
    }
}
