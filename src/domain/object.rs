/// GameObject: an image placed on a canvas.
///
/// Two positions are tracked:
///   - `pos`       : integer cell of the top-left corner (what gets drawn)
///   - `true_pos`  : real-valued position used for sub-cell movement
///
/// Every mutation clamps so that `pos + size <= bounds` on both axes, and
/// re-derives `pos` as the floor of `true_pos` (or resets `true_pos` to
/// `pos` when the integer position is set directly). Objects larger than the
/// canvas are pinned to 0 and clipped at composition time.

use super::geometry::{Point, Rect, Size, Vec2};
use super::image::Image;

#[derive(Clone, Debug)]
pub struct GameObject {
    image: Image,
    pos: Point,
    true_pos: Vec2,
    bounds: Size,
    pub visible: bool,
}

impl GameObject {
    pub fn new(image: Image, x: i32, y: i32, visible: bool, bounds: Size) -> Self {
        let mut obj = GameObject {
            image,
            pos: Point::ZERO,
            true_pos: Vec2::ZERO,
            bounds,
            visible,
        };
        obj.set_position(Point::new(x, y));
        obj
    }

    // ── Clamping ──

    fn max_x(&self) -> i32 {
        (self.bounds.width as i32 - self.image.width() as i32).max(0)
    }

    fn max_y(&self) -> i32 {
        (self.bounds.height as i32 - self.image.height() as i32).max(0)
    }

    fn clamp_point(&self, p: Point) -> Point {
        Point::new(p.x.clamp(0, self.max_x()), p.y.clamp(0, self.max_y()))
    }

    fn clamp_vec(&self, v: Vec2) -> Vec2 {
        Vec2::new(
            v.x.clamp(0.0, self.max_x() as f32),
            v.y.clamp(0.0, self.max_y() as f32),
        )
    }

    // ── Position ──

    pub fn position(&self) -> Point {
        self.pos
    }

    pub fn set_position(&mut self, p: Point) {
        self.pos = self.clamp_point(p);
        self.true_pos = self.pos.into();
    }

    pub fn true_position(&self) -> Vec2 {
        self.true_pos
    }

    pub fn set_true_position(&mut self, v: Vec2) {
        self.true_pos = self.clamp_vec(v);
        self.pos = self.true_pos.into();
    }

    /// Move relative to the precise position.
    pub fn move_by(&mut self, dx: f32, dy: f32) {
        let next = self.true_pos + Vec2::new(dx, dy);
        self.set_true_position(next);
    }

    pub fn move_by_vec(&mut self, v: Vec2) {
        self.move_by(v.x, v.y);
    }

    // ── Geometry ──

    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        self.image.size()
    }

    pub fn bounds(&self) -> Size {
        self.bounds
    }

    /// Bounding box shrunk by one per axis (broad phase).
    pub fn tight_box(&self) -> Rect {
        Rect::tight(self.pos, self.size())
    }

    /// Full bounding box (narrow phase).
    pub fn full_box(&self) -> Rect {
        Rect::full(self.pos, self.size())
    }

    // ── Image ──

    pub fn image(&self) -> &Image {
        &self.image
    }

    /// Swap the image and re-clamp, since the size may have changed.
    pub fn set_image(&mut self, image: Image) {
        self.image = image;
        let p = self.pos;
        self.set_position(p);
    }

    pub fn toggle_visibility(&mut self) {
        self.visible = !self.visible;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::Cell;
    use crate::domain::colour::Theme;

    fn block(w: usize, h: usize) -> Image {
        let t = Theme::default();
        Image::filled(Size::new(w, h), Cell::new('#', t.default_pair(), &t))
    }

    #[test]
    fn construction_clamps_each_axis() {
        let obj = GameObject::new(block(2, 2), 9, 4, true, Size::new(10, 5));
        assert_eq!(obj.position(), Point::new(8, 3));
        assert_eq!(obj.true_position(), Vec2::new(8.0, 3.0));
    }

    #[test]
    fn negative_positions_clamp_to_origin() {
        let obj = GameObject::new(block(1, 1), -3, -1, true, Size::new(10, 5));
        assert_eq!(obj.position(), Point::ZERO);
    }

    #[test]
    fn sub_cell_moves_accumulate() {
        let mut obj = GameObject::new(block(1, 1), 0, 0, true, Size::new(10, 5));
        obj.move_by(0.5, 0.0);
        assert_eq!(obj.position(), Point::new(0, 0));
        obj.move_by(0.5, 0.0);
        assert_eq!(obj.position(), Point::new(1, 0));
        assert_eq!(obj.true_position(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn precise_position_clamps_independently() {
        let mut obj = GameObject::new(block(2, 1), 0, 0, true, Size::new(10, 5));
        obj.set_true_position(Vec2::new(8.7, -2.0));
        assert_eq!(obj.true_position(), Vec2::new(8.0, 0.0));
        assert_eq!(obj.position(), Point::new(8, 0));
    }

    #[test]
    fn setting_integer_position_resets_precise_position() {
        let mut obj = GameObject::new(block(1, 1), 0, 0, true, Size::new(10, 5));
        obj.move_by(0.5, 0.25);
        obj.set_position(Point::new(3, 2));
        assert_eq!(obj.true_position(), Vec2::new(3.0, 2.0));
    }

    #[test]
    fn oversize_object_pins_to_origin() {
        let obj = GameObject::new(block(12, 1), 4, 0, true, Size::new(10, 5));
        assert_eq!(obj.position(), Point::ZERO);
    }

    #[test]
    fn growing_image_reclamps() {
        let mut obj = GameObject::new(block(1, 1), 9, 0, true, Size::new(10, 5));
        obj.set_image(block(3, 1));
        assert_eq!(obj.position(), Point::new(7, 0));
    }

    #[test]
    fn toggling_visibility_flips_only_the_flag() {
        let mut obj = GameObject::new(block(1, 1), 2, 1, true, Size::new(10, 5));
        obj.toggle_visibility();
        assert!(!obj.visible);
        assert_eq!(obj.position(), Point::new(2, 1));
        obj.toggle_visibility();
        assert!(obj.visible);
    }
}
