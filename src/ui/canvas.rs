/// Canvas: a fixed-size grid of cells with a baseline snapshot.
///
/// Compositing stamps images over the current cells; `reset` restores the
/// baseline. The size is set at construction and never changes.

use crate::domain::cell::Cell;
use crate::domain::geometry::{Point, Size};
use crate::domain::image::Image;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Canvas {
    size: Size,
    cells: Vec<Cell>,
    baseline: Vec<Cell>,
}

impl Canvas {
    /// Canvas whose baseline is `fill` everywhere.
    pub fn new(size: Size, fill: Cell) -> Self {
        let cells = vec![fill; size.area()];
        Canvas { size, baseline: cells.clone(), cells }
    }

    /// Canvas whose baseline has a one-cell `border` frame around `fill`.
    pub fn with_border(size: Size, border: Cell, fill: Cell) -> Self {
        let mut canvas = Canvas::new(size, fill);
        for y in 0..size.height {
            for x in 0..size.width {
                if y == 0 || x == 0 || y + 1 == size.height || x + 1 == size.width {
                    canvas.set(x, y, border);
                }
            }
        }
        canvas.baseline = canvas.cells.clone();
        canvas
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    fn idx(&self, x: usize, y: usize) -> Option<usize> {
        if x < self.size.width && y < self.size.height {
            Some(y * self.size.width + x)
        } else {
            None
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Cell> {
        self.idx(x, y).map(|i| self.cells[i])
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if let Some(i) = self.idx(x, y) {
            self.cells[i] = cell;
        }
    }

    /// Draw `image` with its top-left at `pos`. Transparent cells are
    /// skipped; anything outside the canvas is clipped.
    pub fn stamp(&mut self, image: &Image, pos: Point) {
        for (row, col, cell) in image.iter() {
            if cell.is_transparent() {
                continue;
            }
            let x = pos.x + col as i32;
            let y = pos.y + row as i32;
            if x < 0 || y < 0 {
                continue;
            }
            self.set(x as usize, y as usize, cell);
        }
    }

    /// Copy every cell of `src` onto this canvas at `origin` (no transparency).
    pub fn blit(&mut self, src: &Canvas, origin: Point) {
        for y in 0..src.size.height {
            for x in 0..src.size.width {
                let dx = origin.x + x as i32;
                let dy = origin.y + y as i32;
                if dx < 0 || dy < 0 {
                    continue;
                }
                self.set(dx as usize, dy as usize, src.cells[y * src.size.width + x]);
            }
        }
    }

    pub fn reset(&mut self) {
        self.cells.copy_from_slice(&self.baseline);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::colour::{ColourPair, Theme};
    use crossterm::style::Color;

    #[test]
    fn border_is_part_of_baseline() {
        let t = Theme::default();
        let border = Cell::new('%', ColourPair::new(Color::Red, t.background), &t);
        let mut c = Canvas::with_border(Size::new(4, 3), border, Cell::blank(&t));
        assert_eq!(c.get(0, 0).unwrap().ch(), '%');
        assert_eq!(c.get(3, 2).unwrap().ch(), '%');
        assert_eq!(c.get(1, 1).unwrap().ch(), ' ');
        c.set(1, 1, border);
        c.reset();
        assert_eq!(c.get(1, 1).unwrap().ch(), ' ');
        assert_eq!(c.get(0, 1).unwrap().ch(), '%');
    }

    #[test]
    fn stamp_skips_transparent_and_clips() {
        let t = Theme::default();
        let mut c = Canvas::new(Size::new(3, 1), Cell::blank(&t));
        let x = Cell::new('x', t.default_pair(), &t);
        let img = Image::from_rows(vec![vec![Cell::clear(&t), x, x]], &t);
        c.stamp(&img, Point::new(1, 0));
        let row: String = c.cells().iter().map(|c| c.ch()).collect();
        assert_eq!(row, "  x");
    }

    #[test]
    fn blit_places_at_origin() {
        let t = Theme::default();
        let mut full = Canvas::new(Size::new(4, 2), Cell::blank(&t));
        let src = Canvas::new(Size::new(2, 1), Cell::new('#', t.default_pair(), &t));
        full.blit(&src, Point::new(2, 1));
        assert_eq!(full.get(2, 1).unwrap().ch(), '#');
        assert_eq!(full.get(3, 1).unwrap().ch(), '#');
        assert_eq!(full.get(1, 1).unwrap().ch(), ' ');
    }
}
