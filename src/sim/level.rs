/// Level maps.
///
/// A map is rows of single-character tokens, one per grid cell:
///   '0' → player spawn (exactly one per map)
///   '1' → wall
///   '2' → crate slot (reserved, nothing spawned)
///   anything else → empty
/// The grid is `world_width / object_width` by `world_height / object_height`
/// cells; map text beyond it is ignored and missing text is empty.

use std::path::Path;

use anyhow::{bail, Result};
use log::{debug, info};

use crate::domain::body::{Body, BodyKind};
use crate::domain::geometry::Size;
use crate::domain::object::GameObject;
use crate::sim::assets::ContentLoader;
use crate::sim::collision::{run_collisions, CollisionError};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MapTile {
    PlayerSpawn,
    Wall,
    CrateSlot,
}

impl MapTile {
    fn from_char(ch: char) -> Option<MapTile> {
        match ch {
            '0' => Some(MapTile::PlayerSpawn),
            '1' => Some(MapTile::Wall),
            '2' => Some(MapTile::CrateSlot),
            _ => None,
        }
    }
}

/// Grid geometry shared by the map, the bodies and the collision grid.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct GridSpec {
    /// Size of one grid cell (= one object) in screen cells.
    pub cell: Size,
    /// World (play area) size in screen cells.
    pub world: Size,
}

impl GridSpec {
    pub fn new(cell: Size, world: Size) -> Self {
        GridSpec {
            cell: Size::new(cell.width.max(1), cell.height.max(1)),
            world,
        }
    }

    pub fn cols(&self) -> usize {
        self.world.width / self.cell.width
    }

    pub fn rows(&self) -> usize {
        self.world.height / self.cell.height
    }
}

/// Non-empty tiles as `(col, row, tile)`, column-major.
pub fn parse_map(text: &str, cols: usize, rows: usize) -> Vec<(usize, usize, MapTile)> {
    let lines: Vec<Vec<char>> = text.lines().map(|l| l.chars().collect()).collect();
    let mut tiles = Vec::new();
    for col in 0..cols {
        for row in 0..rows {
            let ch = lines.get(row).and_then(|l| l.get(col)).copied();
            if let Some(tile) = ch.and_then(MapTile::from_char) {
                tiles.push((col, row, tile));
            }
        }
    }
    tiles
}

pub struct Level {
    pub bodies: Vec<Body>,
    player: usize,
    pub grid: GridSpec,
}

impl Level {
    /// Spawn bodies for `tiles`. Fails unless there is exactly one player.
    pub fn build(
        tiles: &[(usize, usize, MapTile)],
        grid: GridSpec,
        loader: &dyn ContentLoader,
    ) -> Result<Level> {
        let player_img = loader.load_image("Player");
        let wall_img = loader.load_image("Wall");

        let mut bodies = Vec::new();
        let mut player = None;
        for &(col, row, tile) in tiles {
            let x = (col * grid.cell.width) as i32;
            let y = (row * grid.cell.height) as i32;
            match tile {
                MapTile::PlayerSpawn => {
                    if player.is_some() {
                        bail!("map has more than one player spawn (second at {col},{row})");
                    }
                    player = Some(bodies.len());
                    bodies.push(Body::player(GameObject::new(player_img.clone(), x, y, true, grid.world)));
                }
                MapTile::Wall => {
                    bodies.push(Body::wall(GameObject::new(wall_img.clone(), x, y, true, grid.world)));
                }
                MapTile::CrateSlot => debug!("crate slot at {col},{row} left empty"),
            }
        }

        let Some(player) = player else {
            bail!("map has no player spawn");
        };
        Ok(Level { bodies, player, grid })
    }

    pub fn player(&self) -> &Body {
        &self.bodies[self.player]
    }

    pub fn player_mut(&mut self) -> &mut Body {
        &mut self.bodies[self.player]
    }

    pub fn count(&self, kind: BodyKind) -> usize {
        self.bodies.iter().filter(|b| b.kind == kind).count()
    }

    /// Snapshot every body's position before this tick's movement.
    pub fn begin_tick(&mut self) {
        for body in self.bodies.iter_mut() {
            body.begin_tick();
        }
    }

    pub fn collide(&mut self) -> Result<(), CollisionError> {
        run_collisions(&mut self.bodies, self.grid.cols(), self.grid.rows(), self.grid.cell)
    }
}

/// Read, parse and spawn the map at `path`.
pub fn load_map(path: &Path, grid: GridSpec, loader: &dyn ContentLoader) -> Result<Level> {
    let text = loader.load_map(path)?;
    let tiles = parse_map(&text, grid.cols(), grid.rows());
    let level = Level::build(&tiles, grid, loader)?;
    info!(
        "loaded {}: {}x{} grid, {} walls",
        path.display(),
        grid.cols(),
        grid.rows(),
        level.count(BodyKind::Wall)
    );
    Ok(level)
}
