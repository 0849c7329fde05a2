/// Screen layout: where the play area and the UI panel sit on the full screen.
///
/// Sizes are fixed once, at compositor construction:
///   - Left / Right : UI is a side panel, width clamped to [10, 30];
///                    both panels share the play height.
///   - Top / Bottom : UI is a strip, height clamped to [5, 30];
///                    both panels share the play width.
///   - None         : play area only.
/// The full screen never exceeds `max_width` x `max_height`.

use serde::Deserialize;

use crate::domain::geometry::{Point, Size};

const MAX_UI_SIZE: usize = 30;
const MIN_UI_SIZE: usize = 5;
const MIN_SIDE_UI_SIZE: usize = 10;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UiPlacement {
    Top,
    Bottom,
    Left,
    Right,
    None,
}

/// `min(max, max(min, v))`, tolerant of `max < min`.
fn clamp_loose(v: usize, min: usize, max: usize) -> usize {
    v.max(min).min(max)
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Layout {
    pub placement: UiPlacement,
    pub play: Size,
    pub ui: Size,
    pub full: Size,
    /// Top-left of the play canvas on the full screen.
    pub play_origin: Point,
    /// Top-left of the UI canvas on the full screen.
    pub ui_origin: Point,
}

impl Layout {
    pub fn new(
        placement: UiPlacement,
        ui_size: usize,
        game_width: usize,
        game_height: usize,
        max: Size,
    ) -> Self {
        match placement {
            UiPlacement::Left | UiPlacement::Right => {
                let ui_w = clamp_loose(ui_size, MIN_SIDE_UI_SIZE, MAX_UI_SIZE);
                let ui_h = game_height.min(max.height);
                let play_w = game_width.min(max.width.saturating_sub(ui_w));
                let play = Size::new(play_w, ui_h);
                let ui = Size::new(ui_w, ui_h);
                let (play_origin, ui_origin) = if placement == UiPlacement::Left {
                    (Point::new(ui_w as i32, 0), Point::ZERO)
                } else {
                    (Point::ZERO, Point::new(play_w as i32, 0))
                };
                Layout { placement, play, ui, full: Size::new(play_w + ui_w, ui_h), play_origin, ui_origin }
            }
            UiPlacement::Top | UiPlacement::Bottom => {
                let ui_w = game_width.min(max.width);
                let ui_h = clamp_loose(ui_size, MIN_UI_SIZE, MAX_UI_SIZE);
                let play_h = game_height.min(max.height.saturating_sub(ui_h));
                let play = Size::new(ui_w, play_h);
                let ui = Size::new(ui_w, ui_h);
                let (play_origin, ui_origin) = if placement == UiPlacement::Top {
                    (Point::new(0, ui_h as i32), Point::ZERO)
                } else {
                    (Point::ZERO, Point::new(0, play_h as i32))
                };
                Layout { placement, play, ui, full: Size::new(ui_w, play_h + ui_h), play_origin, ui_origin }
            }
            UiPlacement::None => {
                let play = Size::new(game_width.min(max.width), game_height.min(max.height));
                Layout {
                    placement,
                    play,
                    ui: Size::new(0, 0),
                    full: play,
                    play_origin: Point::ZERO,
                    ui_origin: Point::ZERO,
                }
            }
        }
    }

    pub fn has_ui(&self) -> bool {
        self.placement != UiPlacement::None
    }
}
