//! Map layouts: waypoint paths, end-point regions and buildable cells.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{config::ConfigError, geometry::Circle};

/// Identifier of a playable map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MapId(u32);

impl MapId {
    /// The map shipped with the game.
    pub const DEFAULT: MapId = MapId(0);

    /// Creates a new map identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Location of a grid cell expressed as column and row.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPoint {
    column: u32,
    row: u32,
}

impl GridPoint {
    /// Creates a new grid coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// World-space centre of the cell for the given cell edge length.
    #[must_use]
    pub fn center(&self, grid_size: f32) -> Vec2 {
        Vec2::new(
            (self.column as f32 + 0.5) * grid_size,
            (self.row as f32 + 0.5) * grid_size,
        )
    }
}

/// Circular region that enemies attempt to reach, in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct EndPoint {
    /// Horizontal coordinate of the centre.
    pub x: f32,
    /// Vertical coordinate of the centre.
    pub y: f32,
    /// Radius of the region.
    pub radius: f32,
}

impl EndPoint {
    /// Converts the end-point into a geometric circle.
    #[must_use]
    pub fn circle(&self) -> Circle {
        Circle::new(Vec2::new(self.x, self.y), self.radius)
    }
}

/// Complete description of a map consumed by the world.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapDefinition {
    /// Identifier reported in level-completion events.
    pub id: MapId,
    /// Human-readable map name.
    pub name: String,
    /// Ordered waypoints, in grid coordinates, that enemies walk along.
    pub waypoints: Vec<GridPoint>,
    /// Regions that cost the player a life when an enemy enters them.
    pub end_points: Vec<EndPoint>,
    /// Cells on which an external placement validator allows towers.
    #[serde(default)]
    pub buildable: Vec<GridPoint>,
}

const DEFAULT_WAYPOINTS: [(u32, u32); 11] = [
    (16, 6),
    (16, 7),
    (11, 7),
    (11, 6),
    (4, 6),
    (4, 7),
    (7, 7),
    (7, 11),
    (9, 11),
    (9, 9),
    (16, 9),
];

const DEFAULT_BUILDABLE: [(u32, u32); 26] = [
    (13, 6),
    (14, 6),
    (15, 6),
    (8, 7),
    (9, 7),
    (10, 7),
    (8, 8),
    (9, 8),
    (4, 8),
    (5, 8),
    (6, 8),
    (6, 9),
    (6, 10),
    (11, 8),
    (12, 8),
    (13, 8),
    (14, 8),
    (15, 8),
    (16, 8),
    (10, 10),
    (11, 10),
    (12, 10),
    (13, 10),
    (14, 10),
    (15, 10),
    (16, 10),
];

impl MapDefinition {
    /// Builds the default map for a playfield divided into `grid_size` cells.
    ///
    /// A single end-point of half a cell radius sits on the final waypoint.
    #[must_use]
    pub fn default_map(grid_size: f32) -> Self {
        let waypoints: Vec<GridPoint> = DEFAULT_WAYPOINTS
            .iter()
            .map(|&(column, row)| GridPoint::new(column, row))
            .collect();
        let end_points = waypoints
            .last()
            .map(|last| {
                let center = last.center(grid_size);
                vec![EndPoint {
                    x: center.x,
                    y: center.y,
                    radius: grid_size / 2.0,
                }]
            })
            .unwrap_or_default();

        Self {
            id: MapId::DEFAULT,
            name: String::from("Meadow Run"),
            waypoints,
            end_points,
            buildable: DEFAULT_BUILDABLE
                .iter()
                .map(|&(column, row)| GridPoint::new(column, row))
                .collect(),
        }
    }

    /// Waypoints converted into world-space cell centres.
    #[must_use]
    pub fn world_path(&self, grid_size: f32) -> Vec<Vec2> {
        self.waypoints
            .iter()
            .map(|point| point.center(grid_size))
            .collect()
    }

    /// End-point regions as circles.
    #[must_use]
    pub fn end_point_circles(&self) -> Vec<Circle> {
        self.end_points.iter().map(EndPoint::circle).collect()
    }

    /// Reports whether the cell is listed as buildable.
    #[must_use]
    pub fn is_buildable(&self, cell: GridPoint) -> bool {
        self.buildable.contains(&cell)
    }

    /// Checks that the map can host a game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.waypoints.is_empty() {
            return Err(ConfigError::EmptyPath);
        }
        if self.end_points.iter().any(|end| end.radius <= 0.0) {
            return Err(ConfigError::InvalidEndPoint);
        }
        Ok(())
    }
}
