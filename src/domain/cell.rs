/// Cell: one character plus its colour pair.
///
/// Transparency is derived once at construction from the theme:
/// a blank on the default background drawn in the invisible marker colour.
/// Cells are `Copy` and never change after construction; "editing" an image
/// means replacing a cell.

use crossterm::style::Color;

use super::colour::{ColourPair, Theme};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Cell {
    ch: char,
    colours: ColourPair,
    transparent: bool,
    default_coloured: bool,
}

impl Cell {
    pub fn new(ch: char, colours: ColourPair, theme: &Theme) -> Self {
        Cell {
            ch,
            colours,
            transparent: ch == ' '
                && colours.bg == theme.background
                && colours.fg == theme.invisible,
            default_coloured: colours == theme.default_pair(),
        }
    }

    /// Blank cell in the theme's default colours.
    pub fn blank(theme: &Theme) -> Self {
        Cell::new(' ', theme.default_pair(), theme)
    }

    /// Fully see-through cell.
    pub fn clear(theme: &Theme) -> Self {
        Cell::new(' ', theme.transparent_pair(), theme)
    }

    pub fn ch(&self) -> char {
        self.ch
    }

    pub fn colours(&self) -> ColourPair {
        self.colours
    }

    pub fn fg(&self) -> Color {
        self.colours.fg
    }

    pub fn bg(&self) -> Color {
        self.colours.bg
    }

    pub fn is_transparent(&self) -> bool {
        self.transparent
    }

    /// True when the colours equal the theme defaults.
    pub fn is_default(&self) -> bool {
        self.default_coloured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparency_needs_all_three_conditions() {
        let t = Theme::default();
        assert!(Cell::clear(&t).is_transparent());

        // Wrong glyph
        assert!(!Cell::new('x', t.transparent_pair(), &t).is_transparent());
        // Wrong background
        assert!(!Cell::new(' ', ColourPair::new(t.invisible, Color::Blue), &t).is_transparent());
        // Default foreground is visible (a drawn blank)
        assert!(!Cell::blank(&t).is_transparent());
    }

    #[test]
    fn default_flag_tracks_theme() {
        let t = Theme::default();
        assert!(Cell::blank(&t).is_default());
        assert!(!Cell::new(' ', ColourPair::new(Color::Red, t.background), &t).is_default());
    }

    #[test]
    fn theme_changes_transparency() {
        let t = Theme { foreground: Color::White, background: Color::DarkBlue, invisible: Color::Magenta };
        let c = Cell::new(' ', ColourPair::new(Color::Magenta, Color::DarkBlue), &t);
        assert!(c.is_transparent());
        let d = Cell::new(' ', ColourPair::new(Color::Black, Color::Black), &t);
        assert!(!d.is_transparent());
    }
}
