/// Bodies: game objects that take part in collisions.
///
/// The kind set is closed. Kind-specific behaviour lives in free functions in
/// `sim::collision`, matched on the pair of kinds, not in methods here.

use super::geometry::{Point, Vec2};
use super::object::GameObject;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum BodyKind {
    Player,
    Wall,
    Crate,
}

impl BodyKind {
    pub fn name(self) -> &'static str {
        match self {
            BodyKind::Player => "player",
            BodyKind::Wall => "wall",
            BodyKind::Crate => "crate",
        }
    }
}

#[derive(Clone, Debug)]
pub struct Body {
    pub kind: BodyKind,
    pub object: GameObject,
    /// Integer position at the start of the current tick.
    pub prev_pos: Point,
    /// Cells per tick. Only the player moves on its own.
    pub velocity: Vec2,
}

impl Body {
    pub fn new(kind: BodyKind, object: GameObject) -> Self {
        let prev_pos = object.position();
        Body { kind, object, prev_pos, velocity: Vec2::ZERO }
    }

    pub fn player(object: GameObject) -> Self {
        Body::new(BodyKind::Player, object)
    }

    pub fn wall(object: GameObject) -> Self {
        Body::new(BodyKind::Wall, object)
    }

    pub fn crate_box(object: GameObject) -> Self {
        Body::new(BodyKind::Crate, object)
    }

    pub fn position(&self) -> Point {
        self.object.position()
    }

    /// Record the pre-move position. Call once per tick before integrating.
    pub fn begin_tick(&mut self) {
        self.prev_pos = self.object.position();
    }

    /// Advance by the current velocity.
    pub fn integrate(&mut self) {
        if !self.velocity.is_zero() {
            self.object.move_by_vec(self.velocity);
        }
    }

    /// True while the body sits between grid cells of the given size.
    pub fn in_transit(&self, cell_w: usize, cell_h: usize) -> bool {
        let p = self.object.true_position();
        let off_x = p.x.rem_euclid(cell_w.max(1) as f32);
        let off_y = p.y.rem_euclid(cell_h.max(1) as f32);
        off_x != 0.0 || off_y != 0.0
    }
}
