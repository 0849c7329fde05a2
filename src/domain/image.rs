/// Image: a row-major grid of cells owned by a game object.
///
/// Images are plain values; handing one to the compositor copies it.

use crossterm::style::Color;

use super::cell::Cell;
use super::colour::{ColourPair, Theme};
use super::geometry::Size;

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Image {
    size: Size,
    cells: Vec<Cell>,
}

impl Image {
    /// Build from rows. Short rows are padded with transparent cells so the
    /// grid stays rectangular.
    pub fn from_rows(rows: Vec<Vec<Cell>>, theme: &Theme) -> Self {
        let height = rows.len();
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        let mut cells = Vec::with_capacity(width * height);
        for mut row in rows {
            row.resize(width, Cell::clear(theme));
            cells.extend(row);
        }
        Image { size: Size::new(width, height), cells }
    }

    /// A `size` image where every cell is `cell`.
    pub fn filled(size: Size, cell: Cell) -> Self {
        Image { size, cells: vec![cell; size.area()] }
    }

    /// Single-cell image.
    pub fn single(ch: char, colours: ColourPair, theme: &Theme) -> Self {
        Image::filled(Size::new(1, 1), Cell::new(ch, colours, theme))
    }

    /// One line of text, every glyph in `colours`.
    pub fn text_line(text: &str, colours: ColourPair, theme: &Theme) -> Self {
        let row: Vec<Cell> = text.chars().map(|ch| Cell::new(ch, colours, theme)).collect();
        Image::from_rows(vec![row], theme)
    }

    /// Stand-in for an asset that failed to load: "BAD" / "IMG" in the warning colour.
    pub fn placeholder(theme: &Theme) -> Self {
        let colours = ColourPair::new(theme.warning(), theme.background);
        let rows = ["BAD", "IMG"]
            .iter()
            .map(|line| line.chars().map(|ch| Cell::new(ch, colours, theme)).collect())
            .collect();
        Image::from_rows(rows, theme)
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> usize {
        self.size.width
    }

    pub fn height(&self) -> usize {
        self.size.height
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    fn idx(&self, row: usize, col: usize) -> Option<usize> {
        if row < self.size.height && col < self.size.width {
            Some(row * self.size.width + col)
        } else {
            None
        }
    }

    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.idx(row, col).map(|i| self.cells[i])
    }

    /// Iterate `(row, col, cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        let w = self.size.width.max(1);
        self.cells.iter().enumerate().map(move |(i, c)| (i / w, i % w, *c))
    }

    /// Replace one cell; out-of-range coordinates are ignored.
    pub fn update_cell(&mut self, row: usize, col: usize, ch: char, colours: ColourPair, theme: &Theme) {
        if let Some(i) = self.idx(row, col) {
            self.cells[i] = Cell::new(ch, colours, theme);
        }
    }

    /// Recolour every cell, optionally leaving transparent cells alone.
    pub fn overlay_colours(&mut self, colours: ColourPair, keep_transparent: bool, theme: &Theme) {
        for cell in self.cells.iter_mut() {
            if keep_transparent && cell.is_transparent() {
                continue;
            }
            *cell = Cell::new(cell.ch(), colours, theme);
        }
    }

    /// Foreground at `(row, col)`, or the theme default outside the grid.
    pub fn fg_at(&self, row: usize, col: usize, theme: &Theme) -> Color {
        self.get(row, col).map_or(theme.foreground, |c| c.fg())
    }

    /// Background at `(row, col)`, or the theme default outside the grid.
    pub fn bg_at(&self, row: usize, col: usize, theme: &Theme) -> Color {
        self.get(row, col).map_or(theme.background, |c| c.bg())
    }
}
