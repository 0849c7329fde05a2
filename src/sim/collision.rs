/// Grid-based collision detection with kind-pair dispatch.
///
/// Each tick:
///   1. Bodies are bucketed into a uniform grid (position / cell size)
///   2. Grid cells are visited column-major (column outer, row inner)
///   3. Every body in a visited cell informs the other bodies in the same
///      cell, then the bodies in its Moore neighbourhood
///   4. A pair whose tight boxes intersect is resolved by the receiver's
///      handler, chosen by (receiver kind, informer kind)
///
/// Resolution moves bodies but the grid is not rebuilt mid-pass, so the
/// outcome with several overlapping bodies depends on traversal order.

use std::fmt;

use log::trace;

use crate::domain::body::{Body, BodyKind};
use crate::domain::geometry::{Point, Size};
use crate::domain::object::GameObject;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollisionError {
    /// No handler exists for this (receiver, informer) pair.
    NotImplemented { receiver: BodyKind, informer: BodyKind },
}

impl fmt::Display for CollisionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionError::NotImplemented { receiver, informer } => write!(
                f,
                "collision of {} with {} is not implemented",
                receiver.name(),
                informer.name()
            ),
        }
    }
}

impl std::error::Error for CollisionError {}

// ── Grid ──

/// Body indices bucketed by grid cell. Storage is column-major.
#[derive(Clone, Debug)]
pub struct CollisionGrid {
    cols: usize,
    rows: usize,
    cell: Size,
    buckets: Vec<Vec<usize>>,
}

impl CollisionGrid {
    pub fn new(cols: usize, rows: usize, cell: Size) -> Self {
        CollisionGrid {
            cols,
            rows,
            cell: Size::new(cell.width.max(1), cell.height.max(1)),
            buckets: vec![Vec::new(); cols * rows],
        }
    }

    /// Grid holding every body at its current position.
    pub fn build(bodies: &[Body], cols: usize, rows: usize, cell: Size) -> Self {
        let mut grid = CollisionGrid::new(cols, rows, cell);
        for (i, body) in bodies.iter().enumerate() {
            grid.insert(i, body.position());
        }
        grid
    }

    /// Grid cell containing world position `p`, if it lies on the grid.
    pub fn cell_of(&self, p: Point) -> Option<(usize, usize)> {
        if p.x < 0 || p.y < 0 {
            return None;
        }
        let col = p.x as usize / self.cell.width;
        let row = p.y as usize / self.cell.height;
        (col < self.cols && row < self.rows).then_some((col, row))
    }

    pub fn insert(&mut self, index: usize, p: Point) {
        if let Some((col, row)) = self.cell_of(p) {
            let slot = col * self.rows + row;
            self.buckets[slot].push(index);
        }
    }

    pub fn at(&self, col: usize, row: usize) -> &[usize] {
        if col < self.cols && row < self.rows {
            &self.buckets[col * self.rows + row]
        } else {
            &[]
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Non-empty cells, column-major.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        let rows = self.rows.max(1);
        self.buckets
            .iter()
            .enumerate()
            .filter(|(_, b)| !b.is_empty())
            .map(move |(i, _)| (i / rows, i % rows))
    }
}

/// The up-to-eight cells around `(col, row)` that lie on a `cols` x `rows`
/// grid, excluding the centre. Ordered column-major.
pub fn moore_neighbourhood(col: usize, row: usize, cols: usize, rows: usize) -> Vec<(usize, usize)> {
    let mut out = Vec::with_capacity(8);
    for c in col as i64 - 1..=col as i64 + 1 {
        for r in row as i64 - 1..=row as i64 + 1 {
            if c == col as i64 && r == row as i64 {
                continue;
            }
            if c < 0 || r < 0 || c >= cols as i64 || r >= rows as i64 {
                continue;
            }
            out.push((c as usize, r as usize));
        }
    }
    out
}

// ── Phases ──

/// Cheap pre-filter: do the tight boxes overlap?
pub fn broad_phase(a: &GameObject, b: &GameObject) -> bool {
    a.tight_box().intersects(&b.tight_box())
}

/// Exact test: is some world cell opaque in both objects?
pub fn pixel_intersects(a: &GameObject, b: &GameObject) -> bool {
    let Some(overlap) = a.full_box().intersection(&b.full_box()) else {
        return false;
    };
    let opaque = |obj: &GameObject, x: i32, y: i32| {
        let p = obj.position();
        let (row, col) = (y - p.y, x - p.x);
        row >= 0
            && col >= 0
            && obj
                .image()
                .get(row as usize, col as usize)
                .is_some_and(|c| !c.is_transparent())
    };
    (overlap.top()..overlap.bottom())
        .any(|y| (overlap.left()..overlap.right()).any(|x| opaque(a, x, y) && opaque(b, x, y)))
}

// ── Dispatch ──

/// `informer` tells `receiver` they collided; the receiver's handler decides.
pub fn resolve(bodies: &mut [Body], informer: usize, receiver: usize) -> Result<(), CollisionError> {
    let informer_kind = bodies[informer].kind;
    let receiver_kind = bodies[receiver].kind;
    trace!("{} informs {}", informer_kind.name(), receiver_kind.name());

    match (receiver_kind, informer_kind) {
        (BodyKind::Player, BodyKind::Wall) => {
            let wall_pos = bodies[informer].position();
            let wall_size = bodies[informer].object.size();
            resolve_player_wall(&mut bodies[receiver], wall_pos, wall_size);
            Ok(())
        }
        (BodyKind::Wall, _) => Ok(()),
        (BodyKind::Player, BodyKind::Player)
        | (BodyKind::Player, BodyKind::Crate)
        | (BodyKind::Crate, _) => Err(CollisionError::NotImplemented {
            receiver: receiver_kind,
            informer: informer_kind,
        }),
    }
}

/// Push the player out of the wall on each axis, toward the side it came from.
pub fn resolve_player_wall(player: &mut Body, wall_pos: Point, wall_size: Size) {
    let prev = player.prev_pos;
    let size = player.object.size();
    let mut pos = player.position();

    if prev.x < wall_pos.x {
        pos.x = wall_pos.x - size.width as i32;
        player.velocity.x = 0.0;
    } else if prev.x > wall_pos.x {
        pos.x = wall_pos.x + wall_size.width as i32;
        player.velocity.x = 0.0;
    }

    if prev.y < wall_pos.y {
        pos.y = wall_pos.y - size.height as i32;
        player.velocity.y = 0.0;
    } else if prev.y > wall_pos.y {
        pos.y = wall_pos.y + wall_size.height as i32;
        player.velocity.y = 0.0;
    }

    player.object.set_position(pos);
}

/// One full collision pass over `bodies`.
pub fn run_collisions(
    bodies: &mut [Body],
    cols: usize,
    rows: usize,
    cell: Size,
) -> Result<(), CollisionError> {
    let grid = CollisionGrid::build(bodies, cols, rows, cell);
    for (col, row) in grid.occupied() {
        for &center in grid.at(col, row) {
            for &other in grid.at(col, row) {
                if other != center && broad_phase(&bodies[center].object, &bodies[other].object) {
                    resolve(bodies, center, other)?;
                }
            }
            for (nc, nr) in moore_neighbourhood(col, row, grid.cols(), grid.rows()) {
                for &other in grid.at(nc, nr) {
                    if broad_phase(&bodies[center].object, &bodies[other].object) {
                        resolve(bodies, center, other)?;
                    }
                }
            }
        }
    }
    Ok(())
}
