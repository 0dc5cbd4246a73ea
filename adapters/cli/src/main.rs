#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays a Rampart map headlessly.
//!
//! The runner buys the requested towers, starts the game, advances it for a
//! fixed number of ticks and prints a JSON summary of the outcome.

mod layout_transfer;

use std::{
    cell::Cell,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
    str::FromStr,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use rampart_core::{Event, GameConfig, GridPoint, MapDefinition, ProgressReport, TowerKind};
use rampart_simulation::{Silence, Simulation};
use rampart_world::query;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::layout_transfer::{LayoutTower, TowerLayout};

/// Plays a Rampart map for a fixed number of ticks.
#[derive(Debug, Parser)]
#[command(name = "rampart", version, about)]
struct Cli {
    /// TOML file overriding the default configuration.
    #[arg(long)]
    config: Option<PathBuf>,
    /// TOML file describing the map; the built-in map is used otherwise.
    #[arg(long)]
    map: Option<PathBuf>,
    /// Number of ticks to simulate.
    #[arg(long, default_value_t = 3_750)]
    ticks: u32,
    /// Seed for enemy kind selection, overriding the configuration.
    #[arg(long)]
    seed: Option<u64>,
    /// Tower to buy before the game starts, written as `kind@column,row`.
    #[arg(long = "build", value_name = "KIND@COLUMN,ROW")]
    builds: Vec<TowerOrder>,
    /// Layout string whose towers are bought before any `--build` order.
    #[arg(long)]
    layout: Option<String>,
    /// Log filter used when `RUST_LOG` is not set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

/// Request to buy a tower on a cell.
#[derive(Clone, Copy, Debug, PartialEq)]
struct TowerOrder {
    kind: TowerKind,
    cell: GridPoint,
}

impl FromStr for TowerOrder {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (kind, cell) = value
            .split_once('@')
            .ok_or_else(|| format!("expected `kind@column,row`, got '{value}'"))?;
        let kind = match kind.trim().to_ascii_lowercase().as_str() {
            "arrow" => TowerKind::Arrow,
            "cannon" => TowerKind::Cannon,
            "magic" => TowerKind::Magic,
            other => return Err(format!("unknown tower kind '{other}'")),
        };
        let (column, row) = cell
            .split_once(',')
            .ok_or_else(|| format!("expected `column,row`, got '{cell}'"))?;
        let column = column
            .trim()
            .parse::<u32>()
            .map_err(|error| format!("invalid column '{column}': {error}"))?;
        let row = row
            .trim()
            .parse::<u32>()
            .map_err(|error| format!("invalid row '{row}': {error}"))?;
        Ok(Self {
            kind,
            cell: GridPoint::new(column, row),
        })
    }
}

impl From<LayoutTower> for TowerOrder {
    fn from(tower: LayoutTower) -> Self {
        Self {
            kind: tower.kind,
            cell: tower.cell,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum Outcome {
    InProgress,
    GameOver,
    LevelCompleted,
}

#[derive(Debug, Serialize)]
struct Summary {
    outcome: Outcome,
    ticks: u64,
    lives: u32,
    progress: ProgressReport,
    towers_built: usize,
    orders_rejected: usize,
    enemies_alive: usize,
    layout: String,
}

/// Entry point for the Rampart command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .init();

    let mut config = match &cli.config {
        Some(path) => load_toml::<GameConfig>(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.waves.rng_seed = seed;
    }
    let map = match &cli.map {
        Some(path) => load_toml::<MapDefinition>(path)?,
        None => MapDefinition::default_map(config.playfield.grid_size),
    };

    let orders = collect_orders(&cli, &map)?;
    let mut simulation = Simulation::new(config, map.clone(), Box::new(Silence))
        .context("configuration cannot be simulated")?;

    let outcome = Rc::new(Cell::new(Outcome::InProgress));
    let observed = Rc::clone(&outcome);
    simulation.subscribe(Box::new(move |event: &Event| match event {
        Event::GameOver => observed.set(Outcome::GameOver),
        Event::LevelCompleted { .. } => observed.set(Outcome::LevelCompleted),
        _ => {}
    }));

    let mut built = Vec::new();
    let mut rejected = 0;
    for order in orders {
        if !map.buildable.is_empty() && !map.is_buildable(order.cell) {
            warn!(cell = ?order.cell, "cell is not buildable on this map");
            rejected += 1;
            continue;
        }
        match simulation.build_tower(order.kind, order.cell) {
            Some(_) => built.push(LayoutTower {
                kind: order.kind,
                cell: order.cell,
            }),
            None => rejected += 1,
        }
    }

    simulation.start();
    for _ in 0..cli.ticks {
        if !simulation.tick() {
            break;
        }
    }
    info!(ticks = simulation.ticks_elapsed(), "run finished");

    let world = simulation.world();
    let summary = Summary {
        outcome: outcome.get(),
        ticks: simulation.ticks_elapsed(),
        lives: query::economy(world).lives,
        progress: simulation.progress(),
        towers_built: built.len(),
        orders_rejected: rejected,
        enemies_alive: query::enemy_view(world).living().count(),
        layout: TowerLayout {
            map: map.id,
            towers: built,
        }
        .encode()?,
    };
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("failed to parse {}", path.display()))
}

fn collect_orders(cli: &Cli, map: &MapDefinition) -> Result<Vec<TowerOrder>> {
    let mut orders = Vec::new();
    if let Some(value) = &cli.layout {
        let layout = TowerLayout::decode(value).context("invalid layout string")?;
        if layout.map != map.id {
            bail!(
                "layout was built on map {} but map {} is loaded",
                layout.map.get(),
                map.id.get()
            );
        }
        orders.extend(layout.towers.into_iter().map(TowerOrder::from));
    }
    orders.extend(cli.builds.iter().copied());
    Ok(orders)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_tower_orders() {
        let order: TowerOrder = "Cannon@9,8".parse().expect("valid order");
        assert_eq!(
            order,
            TowerOrder {
                kind: TowerKind::Cannon,
                cell: GridPoint::new(9, 8),
            }
        );
    }

    #[test]
    fn rejects_malformed_orders() {
        assert!("arrow".parse::<TowerOrder>().is_err());
        assert!("laser@1,2".parse::<TowerOrder>().is_err());
        assert!("arrow@1;2".parse::<TowerOrder>().is_err());
        assert!("arrow@x,2".parse::<TowerOrder>().is_err());
    }

    #[test]
    fn layout_orders_precede_command_line_orders() {
        let map = MapDefinition::default_map(40.0);
        let layout = TowerLayout {
            map: map.id,
            towers: vec![LayoutTower {
                kind: TowerKind::Magic,
                cell: GridPoint::new(13, 6),
            }],
        }
        .encode()
        .expect("layout encodes");
        let cli = Cli::parse_from(["rampart", "--layout", &layout, "--build", "arrow@9,8"]);

        let orders = collect_orders(&cli, &map).expect("orders collected");
        let kinds: Vec<TowerKind> = orders.iter().map(|order| order.kind).collect();
        assert_eq!(kinds, vec![TowerKind::Magic, TowerKind::Arrow]);
    }

    #[test]
    fn layout_for_another_map_is_refused() {
        let map = MapDefinition::default_map(40.0);
        let layout = TowerLayout {
            map: rampart_core::MapId::new(9),
            towers: Vec::new(),
        }
        .encode()
        .expect("layout encodes");
        let cli = Cli::parse_from(["rampart", "--layout", &layout]);
        assert!(collect_orders(&cli, &map).is_err());
    }
}
