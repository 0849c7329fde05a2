/// Frame compositor: layered, diff-based redraw.
///
/// Per frame:
///   1. Game code submits objects to a play layer or to the UI
///   2. `draw` stamps the play layers (background, midground, foreground)
///      and then the UI submissions onto their canvases
///   3. Both canvases are merged into one full-screen buffer by placement
///   4. The buffer is diffed against what was drawn last time
///   5. Only changed cells are written; colours are set only when they differ
///   6. Canvases go back to baseline and submissions are cleared
///
/// Submissions copy the object's image, so the caller may mutate the object
/// right after submitting it.

use log::warn;

use crate::domain::cell::Cell;
use crate::domain::colour::{ColourPair, Theme};
use crate::domain::geometry::Point;
use crate::domain::image::Image;
use crate::domain::object::GameObject;
use crate::ui::canvas::Canvas;
use crate::ui::display::Display;
use crate::ui::layout::Layout;

const UI_BORDER_CHAR: char = '%';

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Layer {
    Background,
    Midground,
    Foreground,
}

impl Layer {
    pub const ALL: [Layer; 3] = [Layer::Background, Layer::Midground, Layer::Foreground];

    fn index(self) -> usize {
        self as usize
    }
}

/// One changed screen cell.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct UpdateElem {
    pub pos: Point,
    pub cell: Cell,
}

#[derive(Clone, Debug)]
struct Submission {
    image: Image,
    pos: Point,
    visible: bool,
}

impl Submission {
    fn of(object: &GameObject) -> Self {
        Submission {
            image: object.image().clone(),
            pos: object.position(),
            visible: object.visible,
        }
    }
}

pub struct Compositor<D: Display> {
    display: D,
    theme: Theme,
    layout: Layout,
    play: Canvas,
    ui: Canvas,
    /// Last buffer written to the display.
    screen: Canvas,
    pending: [Vec<Submission>; 3],
    pending_ui: Vec<Submission>,
    /// Colours the display is currently set to, if known.
    current: Option<ColourPair>,
}

impl<D: Display> Compositor<D> {
    pub fn new(display: D, layout: Layout, theme: Theme) -> Self {
        let blank = Cell::blank(&theme);
        let border = Cell::new(UI_BORDER_CHAR, ColourPair::new(theme.warning(), theme.background), &theme);
        Compositor {
            display,
            theme,
            layout,
            play: Canvas::new(layout.play, blank),
            ui: Canvas::with_border(layout.ui, border, blank),
            screen: Canvas::new(layout.full, blank),
            pending: [Vec::new(), Vec::new(), Vec::new()],
            pending_ui: Vec::new(),
            current: None,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// The buffer as last drawn.
    pub fn screen(&self) -> &Canvas {
        &self.screen
    }

    // ── Submission ──

    pub fn submit(&mut self, object: &GameObject, layer: Layer) {
        self.pending[layer.index()].push(Submission::of(object));
    }

    /// Route a widget (or any object) to the UI canvas.
    pub fn submit_ui(&mut self, object: &GameObject) {
        if !self.layout.has_ui() {
            return;
        }
        self.pending_ui.push(Submission::of(object));
    }

    pub fn pending_count(&self) -> usize {
        self.pending.iter().map(Vec::len).sum::<usize>() + self.pending_ui.len()
    }

    // ── Pipeline ──

    /// Stamp every visible submission onto the play and UI canvases.
    pub fn compose(&mut self) {
        for layer in Layer::ALL {
            for sub in &self.pending[layer.index()] {
                if sub.visible {
                    self.play.stamp(&sub.image, sub.pos);
                }
            }
        }
        for sub in &self.pending_ui {
            if sub.visible {
                self.ui.stamp(&sub.image, sub.pos);
            }
        }
    }

    /// Merge the play and UI canvases into a full-screen buffer.
    pub fn merge(&self) -> Canvas {
        let mut full = Canvas::new(self.layout.full, Cell::blank(&self.theme));
        full.blit(&self.play, self.layout.play_origin);
        if self.layout.has_ui() {
            full.blit(&self.ui, self.layout.ui_origin);
        }
        full
    }

    /// Changed cells of `next` relative to the last drawn buffer, row-major.
    pub fn diff(&self, next: &Canvas) -> Vec<UpdateElem> {
        let width = next.size().width.max(1);
        next.cells()
            .iter()
            .zip(self.screen.cells())
            .enumerate()
            .filter(|(_, (new, old))| new != old)
            .map(|(i, (new, _))| UpdateElem {
                pos: Point::new((i % width) as i32, (i / width) as i32),
                cell: *new,
            })
            .collect()
    }

    /// Compose, diff and write one frame. Returns the number of changed cells.
    pub fn draw(&mut self) -> usize {
        self.compose();
        let next = self.merge();
        let updates = self.diff(&next);
        let failed = self.apply(&updates);
        self.commit(next, &failed);
        self.end_frame();
        updates.len()
    }

    /// Paint every cell of the current scene, regardless of the last buffer.
    pub fn init(&mut self) {
        self.compose();
        let next = self.merge();
        let width = next.size().width.max(1);
        let updates: Vec<UpdateElem> = next
            .cells()
            .iter()
            .enumerate()
            .map(|(i, cell)| UpdateElem {
                pos: Point::new((i % width) as i32, (i / width) as i32),
                cell: *cell,
            })
            .collect();
        self.current = None;
        let failed = self.apply(&updates);
        self.commit(next, &failed);
        self.end_frame();
    }

    /// Adopt `next` as the drawn buffer, except for cells that never reached
    /// the display: those keep their old value so the next diff retries them.
    fn commit(&mut self, next: Canvas, failed: &[Point]) {
        let previous = std::mem::replace(&mut self.screen, next);
        for p in failed {
            let (x, y) = (p.x as usize, p.y as usize);
            if let Some(old) = previous.get(x, y) {
                self.screen.set(x, y, old);
            }
        }
    }

    fn end_frame(&mut self) {
        self.play.reset();
        self.ui.reset();
        for list in self.pending.iter_mut() {
            list.clear();
        }
        self.pending_ui.clear();
    }

    /// Write updates to the display and return the positions that failed.
    /// A failing cell is skipped and the rest of the frame still goes out;
    /// the frame logs one warning however many cells failed.
    fn apply(&mut self, updates: &[UpdateElem]) -> Vec<Point> {
        if updates.is_empty() {
            return Vec::new();
        }
        let mut failed = Vec::new();
        let mut first_error = None;
        // Cursor sits right after the last printed cell; contiguous runs skip MoveTo.
        let mut cursor: Option<Point> = None;
        for u in updates {
            match self.write_cell(u, cursor) {
                Ok(()) => cursor = Some(Point::new(u.pos.x + 1, u.pos.y)),
                Err(e) => {
                    first_error.get_or_insert(e);
                    failed.push(u.pos);
                    cursor = None;
                    self.current = None;
                }
            }
        }
        if let Err(e) = self.display.flush() {
            // nothing queued this frame is known to have arrived
            first_error.get_or_insert(e);
            failed = updates.iter().map(|u| u.pos).collect();
            self.current = None;
        }
        if let Some(e) = first_error {
            warn!("display write failed for {} of {} cells: {e}", failed.len(), updates.len());
        }
        failed
    }

    fn write_cell(&mut self, u: &UpdateElem, cursor: Option<Point>) -> std::io::Result<()> {
        if cursor != Some(u.pos) {
            self.display.move_to(u.pos.x as u16, u.pos.y as u16)?;
        }
        let colours = u.cell.colours();
        if self.current != Some(colours) {
            self.display.set_colours(colours)?;
            self.current = Some(colours);
        }
        self.display.print(u.cell.ch())?;
        if !u.cell.is_default() {
            self.display.reset_colours()?;
            self.current = Some(self.theme.default_pair());
        }
        Ok(())
    }
}
