/// Command-queue demo game.
///
/// Two stages:
///   - Input : keys are typed into the UI command line; Enter runs it
///   - Run   : the player executes one command at a time in half-cell steps
///             (`<` left, `>` right, `^` up, `V` down); other characters are
///             skipped. When the queue is empty the game returns to Input.
/// Walls stop the player and end the current command. Esc quits from either
/// stage. The UI shows the command line, a bar with the remaining queue and
/// the loop's measured rates.

use std::collections::VecDeque;
use std::path::PathBuf;

use anyhow::Result;
use crossterm::event::KeyCode;
use crossterm::style::Color;
use log::{debug, info};

use crate::domain::body::BodyKind;
use crate::domain::geometry::{Size, Vec2};
use crate::domain::widget::{BarWidget, TextWidget};
use crate::sim::assets::ContentLoader;
use crate::sim::game_loop::{Context, Game};
use crate::sim::level::{load_map, GridSpec, Level};
use crate::ui::compositor::Layer;
use crate::ui::display::Display;
use crate::ui::input::key_to_char;

/// Distance per tick, in screen cells.
const STEP: f32 = 0.5;
const PROMPT: &str = "Enter: ";
const UI_MARGIN: usize = 1;
const QUEUE_BAR_WIDTH: usize = 24;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Stage {
    Input,
    Run,
}

fn direction(command: char) -> Option<Vec2> {
    match command {
        '<' => Some(Vec2::new(-STEP, 0.0)),
        '>' => Some(Vec2::new(STEP, 0.0)),
        '^' => Some(Vec2::new(0.0, -STEP)),
        'V' => Some(Vec2::new(0.0, STEP)),
        _ => None,
    }
}

struct Hud {
    prompt: TextWidget,
    command_line: TextWidget,
    queue: BarWidget,
    rates: TextWidget,
}

pub struct CommandGame {
    loader: Box<dyn ContentLoader>,
    map: PathBuf,
    object_size: Size,
    level: Option<Level>,
    hud: Option<Hud>,
    stage: Stage,
    typed: String,
    commands: VecDeque<char>,
    moving: bool,
    shown_rates: (u32, u32),
}

impl CommandGame {
    pub fn new(loader: Box<dyn ContentLoader>, map: PathBuf, object_size: Size) -> Self {
        CommandGame {
            loader,
            map,
            object_size,
            level: None,
            hud: None,
            stage: Stage::Input,
            typed: String::new(),
            commands: VecDeque::new(),
            moving: false,
            shown_rates: (u32::MAX, u32::MAX),
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn typed(&self) -> &str {
        &self.typed
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    fn set_typed(&mut self, text: String) {
        self.typed = text;
        if let Some(hud) = self.hud.as_mut() {
            hud.command_line.set_text(&self.typed);
        }
    }

    fn read_command_line(&mut self, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                if self.typed.is_empty() {
                    return;
                }
                self.commands = self.typed.chars().collect();
                info!("running {} commands", self.commands.len());
                if let Some(hud) = self.hud.as_mut() {
                    hud.queue.set_max(self.commands.len() as u32);
                    hud.queue.set_value(self.commands.len() as u32);
                }
                self.stage = Stage::Run;
            }
            KeyCode::Backspace => {
                let mut text = self.typed.clone();
                text.pop();
                self.set_typed(text);
            }
            other => {
                let ch = key_to_char(other);
                if ch != '?' {
                    let text = format!("{}{ch}", self.typed);
                    self.set_typed(text);
                }
            }
        }
    }

    /// Start the next runnable command. Returns false when the queue is done.
    fn start_next(&mut self, level: &mut Level) -> bool {
        while let Some(cmd) = self.commands.pop_front() {
            if let Some(v) = direction(cmd) {
                level.player_mut().velocity = v;
                self.moving = true;
                return true;
            }
            debug!("skipping command {cmd:?}");
        }
        false
    }

    fn run_step(&mut self, mut level: Level) -> Result<Level> {
        if !self.moving && !self.start_next(&mut level) {
            self.stage = Stage::Input;
            self.set_typed(String::new());
            return Ok(level);
        }

        level.begin_tick();
        level.player_mut().integrate();
        level.collide()?;

        let cell = level.grid.cell;
        let player = level.player();
        if player.velocity.is_zero() || !player.in_transit(cell.width, cell.height) {
            level.player_mut().velocity = Vec2::ZERO;
            self.moving = false;
            if let Some(hud) = self.hud.as_mut() {
                hud.queue.set_value(self.commands.len() as u32);
            }
        }
        Ok(level)
    }

    fn refresh_rates(&mut self, fps: u32, ups: u32) {
        if self.shown_rates == (fps, ups) {
            return;
        }
        self.shown_rates = (fps, ups);
        if let Some(hud) = self.hud.as_mut() {
            hud.rates.set_text(&format!("FPS {fps}  UPS {ups}"));
        }
    }
}

impl Game for CommandGame {
    fn load_content<D: Display>(&mut self, ctx: &mut Context<D>) -> Result<()> {
        let theme = ctx.theme();
        let grid = GridSpec::new(self.object_size, ctx.play_size());
        self.level = Some(load_map(&self.map, grid, self.loader.as_ref())?);

        let ui = ctx.ui_size();
        let prompt = TextWidget::new(PROMPT, Color::Blue, 1, 1, ui, UI_MARGIN, &theme);
        let x = 1 + PROMPT.len() as i32;
        self.hud = Some(Hud {
            prompt,
            command_line: TextWidget::new("", Color::Blue, x, 1, ui, UI_MARGIN, &theme),
            queue: BarWidget::new(Color::Green, 1, 2, 1, 0, QUEUE_BAR_WIDTH, ui, &theme),
            rates: TextWidget::new("", Color::DarkGrey, 1, 3, ui, UI_MARGIN, &theme),
        });
        self.refresh_rates(0, 0);
        Ok(())
    }

    fn update<D: Display>(&mut self, ctx: &mut Context<D>, _delta_ms: f32) -> Result<()> {
        if ctx.input.is_key_down(KeyCode::Esc) {
            ctx.stop();
            return Ok(());
        }
        self.refresh_rates(ctx.stats.fps, ctx.stats.ups);

        match self.stage {
            Stage::Input => {
                if let Some(key) = ctx.input.last_key {
                    self.read_command_line(key);
                }
            }
            Stage::Run => {
                if let Some(level) = self.level.take() {
                    self.level = Some(self.run_step(level)?);
                }
            }
        }
        Ok(())
    }

    fn draw<D: Display>(&mut self, ctx: &mut Context<D>) {
        if let Some(level) = &self.level {
            for body in &level.bodies {
                let layer = match body.kind {
                    BodyKind::Player => Layer::Midground,
                    _ => Layer::Background,
                };
                ctx.compositor.submit(&body.object, layer);
            }
        }
        if let Some(hud) = &self.hud {
            ctx.compositor.submit_ui(hud.prompt.object());
            ctx.compositor.submit_ui(hud.command_line.object());
            ctx.compositor.submit_ui(hud.queue.object());
            ctx.compositor.submit_ui(hud.rates.object());
        }
    }
}
