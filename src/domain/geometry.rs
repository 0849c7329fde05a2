/// Integer and real-valued 2D primitives.
///
/// `Rect` edges are inclusive: a rect at `x` with width `w` spans `x..=x+w`.
/// With that convention, a "tight" box (size minus one) covers exactly the
/// cells an object occupies, so two objects that merely touch do not intersect.

use std::ops::{Add, Mul, Sub};

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, o: Point) -> Point { Point::new(self.x + o.x, self.y + o.y) }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, o: Point) -> Point { Point::new(self.x - o.x, self.y - o.y) }
}

impl From<Vec2> for Point {
    /// Floor toward negative infinity (positions are clamped non-negative, so this is truncation).
    fn from(v: Vec2) -> Self {
        Point::new(v.x.floor() as i32, v.y.floor() as i32)
    }
}

/// Real-valued position or velocity.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len == 0.0 { Vec2::ZERO } else { Vec2::new(self.x / len, self.y / len) }
    }

    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, o: Vec2) -> Vec2 { Vec2::new(self.x + o.x, self.y + o.y) }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, o: Vec2) -> Vec2 { Vec2::new(self.x - o.x, self.y - o.y) }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, s: f32) -> Vec2 { Vec2::new(self.x * s, self.y * s) }
}

impl From<Point> for Vec2 {
    fn from(p: Point) -> Self {
        Vec2::new(p.x as f32, p.y as f32)
    }
}

/// Width/height of a canvas or object, in cells.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub struct Size {
    pub width: usize,
    pub height: usize,
}

impl Size {
    pub const fn new(width: usize, height: usize) -> Self {
        Size { width, height }
    }

    pub fn area(self) -> usize {
        self.width * self.height
    }
}

/// Axis-aligned rectangle with inclusive edges.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Rect { x, y, width, height }
    }

    /// Box reduced by one unit per axis.
    pub fn tight(pos: Point, size: Size) -> Self {
        Rect::new(pos.x, pos.y, size.width as i32 - 1, size.height as i32 - 1)
    }

    /// Full bounding box.
    pub fn full(pos: Point, size: Size) -> Self {
        Rect::new(pos.x, pos.y, size.width as i32, size.height as i32)
    }

    pub fn left(&self) -> i32 { self.x }
    pub fn right(&self) -> i32 { self.x + self.width }
    pub fn top(&self) -> i32 { self.y }
    pub fn bottom(&self) -> i32 { self.y + self.height }

    pub fn intersects(&self, other: &Rect) -> bool {
        !(self.right() < other.left()
            || self.left() > other.right()
            || self.bottom() < other.top()
            || self.top() > other.bottom())
    }

    /// Overlapping rectangle, if the two intersect at all.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        if !self.intersects(other) {
            return None;
        }
        let left = self.left().max(other.left());
        let right = self.right().min(other.right());
        let top = self.top().max(other.top());
        let bottom = self.bottom().min(other.bottom());
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x <= self.right() && p.y >= self.top() && p.y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tight_boxes_of_touching_objects_do_not_intersect() {
        // Two 4x2 objects side by side: [0,4) and [4,8)
        let a = Rect::tight(Point::new(0, 0), Size::new(4, 2));
        let b = Rect::tight(Point::new(4, 0), Size::new(4, 2));
        assert!(!a.intersects(&b));

        let c = Rect::tight(Point::new(3, 0), Size::new(4, 2));
        assert!(a.intersects(&c));
    }

    #[test]
    fn full_boxes_of_touching_objects_share_an_edge() {
        let a = Rect::full(Point::new(0, 0), Size::new(4, 2));
        let b = Rect::full(Point::new(4, 0), Size::new(4, 2));
        let overlap = a.intersection(&b).unwrap();
        assert_eq!(overlap.width, 0);
    }

    #[test]
    fn intersection_is_the_common_area() {
        let a = Rect::new(0, 0, 4, 4);
        let b = Rect::new(2, 1, 4, 4);
        assert_eq!(a.intersection(&b), Some(Rect::new(2, 1, 2, 3)));
        assert_eq!(a.intersection(&Rect::new(10, 10, 1, 1)), None);
    }

    #[test]
    fn vec_to_point_floors() {
        assert_eq!(Point::from(Vec2::new(2.9, 0.5)), Point::new(2, 0));
        assert_eq!(Point::from(Vec2::new(-0.5, 1.0)), Point::new(-1, 1));
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
        let n = Vec2::new(3.0, 4.0).normalized();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }
}
