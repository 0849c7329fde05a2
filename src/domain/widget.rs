/// Text and progress-bar widgets.
///
/// Both wrap a `GameObject`, so they can be submitted to any layer. The only
/// difference between a UI widget and a play-area widget is the canvas size
/// they are clamped to and the right-hand margin (the UI canvas has a border).

use crossterm::style::Color;

use super::cell::Cell;
use super::colour::{ColourPair, Theme};
use super::geometry::Size;
use super::image::Image;
use super::object::GameObject;

const BAR_MIN_WIDTH: usize = 3;
const BAR_BORDER: usize = 2;

/// `min(max, max(min, v))`. Unlike `Ord::clamp`, tolerates `max < min`.
fn clamp_loose(v: usize, min: usize, max: usize) -> usize {
    v.max(min).min(max)
}

// ── Text ──

#[derive(Clone, Debug)]
pub struct TextWidget {
    object: GameObject,
    text: String,
    colour: Color,
    margin: usize,
    theme: Theme,
}

impl TextWidget {
    /// `margin` is the number of columns kept free at the right edge.
    pub fn new(
        text: &str,
        colour: Color,
        x: i32,
        y: i32,
        canvas: Size,
        margin: usize,
        theme: &Theme,
    ) -> Self {
        let empty = Image::text_line("", ColourPair::new(colour, theme.background), theme);
        let object = GameObject::new(empty, x, y, true, canvas);
        let mut w = TextWidget { object, text: String::new(), colour, margin, theme: *theme };
        w.set_text(text);
        w
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the text, truncating at the canvas edge.
    pub fn set_text(&mut self, text: &str) {
        let right = self.object.bounds().width as i32 - self.margin as i32;
        let room = (right - self.object.position().x).max(0) as usize;
        self.text = text.chars().take(room).collect();
        self.rebuild();
    }

    pub fn set_colour(&mut self, colour: Color) {
        self.colour = colour;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        let colours = ColourPair::new(self.colour, self.theme.background);
        self.object.set_image(Image::text_line(&self.text, colours, &self.theme));
    }

    pub fn object(&self) -> &GameObject {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut GameObject {
        &mut self.object
    }
}

// ── Progress bar ──

#[derive(Clone, Debug)]
pub struct BarWidget {
    object: GameObject,
    value: u32,
    max: u32,
    colour: Color,
    theme: Theme,
}

impl BarWidget {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        colour: Color,
        x: i32,
        y: i32,
        max: u32,
        start: u32,
        bar_width: usize,
        canvas: Size,
        theme: &Theme,
    ) -> Self {
        let room = (canvas.width as i32 - x - 1).max(0) as usize;
        let width = clamp_loose(bar_width, BAR_MIN_WIDTH, room);
        let blank = Image::filled(Size::new(width, 1), Cell::blank(theme));
        let max = max.max(1);
        let mut bar = BarWidget {
            object: GameObject::new(blank, x, y, true, canvas),
            value: start.min(max),
            max,
            colour,
            theme: *theme,
        };
        bar.rebuild();
        bar
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn fraction(&self) -> f64 {
        self.value as f64 / self.max as f64
    }

    /// Whole-number percentage, truncated.
    pub fn percentage(&self) -> u32 {
        (self.fraction() * 100.0) as u32
    }

    pub fn is_empty(&self) -> bool {
        self.value == 0
    }

    pub fn is_full(&self) -> bool {
        self.value == self.max
    }

    pub fn set_value(&mut self, value: u32) {
        self.value = value.min(self.max);
        self.rebuild();
    }

    pub fn change_value(&mut self, delta: i64) {
        let next = (self.value as i64 + delta).max(0) as u32;
        self.set_value(next);
    }

    pub fn set_max(&mut self, max: u32) {
        self.max = max.max(1);
        self.set_value(self.value);
    }

    pub fn set_colour(&mut self, colour: Color) {
        self.colour = colour;
        self.rebuild();
    }

    /// Cells between the caps that show the fill colour.
    pub fn fill_count(&self) -> usize {
        let inner = self.object.width().saturating_sub(BAR_BORDER);
        (inner as f64 * self.fraction()).ceil() as usize
    }

    fn rebuild(&mut self) {
        let t = &self.theme;
        let width = self.object.width();
        let fill = self.fill_count();
        let cap = Cell::new(' ', ColourPair::new(t.foreground, Color::White), t);
        let row = (0..width)
            .map(|i| {
                if i == 0 || i + 1 == width {
                    cap
                } else if i - 1 < fill {
                    Cell::new(' ', ColourPair::new(t.foreground, self.colour), t)
                } else {
                    Cell::new(' ', ColourPair::new(t.foreground, Color::DarkBlue), t)
                }
            })
            .collect();
        self.object.set_image(Image::from_rows(vec![row], t));
    }

    pub fn object(&self) -> &GameObject {
        &self.object
    }

    pub fn object_mut(&mut self) -> &mut GameObject {
        &mut self.object
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_truncates_before_border() {
        let t = Theme::default();
        let w = TextWidget::new("Enter: hello", Color::Blue, 1, 1, Size::new(10, 4), 1, &t);
        // 10 wide, starts at 1, one border column kept free
        assert_eq!(w.text(), "Enter: h");
        assert_eq!(w.object().width(), 8);
        assert_eq!(w.object().image().get(0, 0).unwrap().fg(), Color::Blue);
    }

    #[test]
    fn text_update_rebuilds_image() {
        let t = Theme::default();
        let mut w = TextWidget::new("", Color::Blue, 0, 0, Size::new(20, 1), 0, &t);
        assert_eq!(w.object().width(), 0);
        w.set_text("<<>>");
        assert_eq!(w.object().width(), 4);
        w.set_colour(Color::Green);
        assert_eq!(w.object().image().get(0, 3).unwrap().fg(), Color::Green);
    }

    #[test]
    fn bar_fill_rounds_up() {
        let t = Theme::default();
        // 12 wide -> 10 inner cells; 1/3 -> ceil(3.33) = 4
        let bar = BarWidget::new(Color::Green, 0, 0, 3, 1, 12, Size::new(40, 5), &t);
        assert_eq!(bar.object().width(), 12);
        assert_eq!(bar.fill_count(), 4);
        let img = bar.object().image();
        assert_eq!(img.get(0, 0).unwrap().bg(), Color::White);
        assert_eq!(img.get(0, 4).unwrap().bg(), Color::Green);
        assert_eq!(img.get(0, 5).unwrap().bg(), Color::DarkBlue);
        assert_eq!(img.get(0, 11).unwrap().bg(), Color::White);
    }

    #[test]
    fn bar_value_is_clamped() {
        let t = Theme::default();
        let mut bar = BarWidget::new(Color::Green, 0, 0, 10, 50, 8, Size::new(40, 5), &t);
        assert!(bar.is_full());
        bar.change_value(-25);
        assert!(bar.is_empty());
        assert_eq!(bar.fill_count(), 0);
        bar.set_max(0);
        assert_eq!(bar.max(), 1);
        bar.set_value(1);
        assert_eq!(bar.percentage(), 100);
    }

    #[test]
    fn bar_width_respects_min_and_room() {
        let t = Theme::default();
        let narrow = BarWidget::new(Color::Green, 0, 0, 1, 0, 1, Size::new(40, 5), &t);
        assert_eq!(narrow.object().width(), BAR_MIN_WIDTH);
        let wide = BarWidget::new(Color::Green, 30, 0, 1, 0, 50, Size::new(40, 5), &t);
        assert_eq!(wide.object().width(), 9);
    }
}
