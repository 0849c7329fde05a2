/// Fixed-timestep loop driver.
///
/// Per iteration:
///   1. Sample the clock once
///   2. While more than one interval is owed and fewer than `max_updates`
///      ran this iteration: poll input, update the game, advance the
///      update deadline by exactly one interval
///   3. If anything updated, draw once (game submits, compositor writes)
///   4. Otherwise idle
///
/// Backlog beyond the cap is dropped, not carried over. Actual updates and
/// frames per second are published once per elapsed second.

use std::time::Duration;

use anyhow::Result;
use log::{debug, info, warn};

use crate::domain::colour::Theme;
use crate::domain::geometry::Size;
use crate::sim::clock::{Clock, Idle};
use crate::ui::compositor::Compositor;
use crate::ui::display::Display;
use crate::ui::input::{InputSource, InputState};

pub const DEFAULT_UPDATE_HZ: u32 = 60;
pub const DEFAULT_MAX_UPDATES: u32 = 5;

const STATS_WINDOW: Duration = Duration::from_secs(1);

/// Interval for a target rate in updates per second.
pub fn interval_for(hz: u32) -> Duration {
    Duration::from_nanos(1_000_000_000 / u64::from(hz.max(1)))
}

/// A game driven by the engine.
pub trait Game {
    /// Called once before the first frame.
    fn load_content<D: Display>(&mut self, ctx: &mut Context<D>) -> Result<()>;

    /// One fixed simulation step. `delta_ms` is the time owed when the step ran.
    fn update<D: Display>(&mut self, ctx: &mut Context<D>, delta_ms: f32) -> Result<()>;

    /// Submit this frame's objects to the compositor.
    fn draw<D: Display>(&mut self, ctx: &mut Context<D>);
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopStats {
    /// Updates in the last full second.
    pub ups: u32,
    /// Frames in the last full second.
    pub fps: u32,
    pub total_updates: u64,
    pub total_frames: u64,
}

/// Everything a game may touch during update and draw.
pub struct Context<D: Display> {
    pub compositor: Compositor<D>,
    pub input: InputState,
    pub stats: LoopStats,
    stop_requested: bool,
}

impl<D: Display> Context<D> {
    pub fn new(compositor: Compositor<D>) -> Self {
        Context {
            compositor,
            input: InputState::new(),
            stats: LoopStats::default(),
            stop_requested: false,
        }
    }

    /// Ask the loop to end after the current update/render pass.
    pub fn stop(&mut self) {
        self.stop_requested = true;
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_requested
    }

    pub fn theme(&self) -> Theme {
        *self.compositor.theme()
    }

    pub fn play_size(&self) -> Size {
        self.compositor.layout().play
    }

    pub fn ui_size(&self) -> Size {
        self.compositor.layout().ui
    }
}

/// What one outer iteration did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Iteration {
    pub updates: u32,
    pub drew: bool,
}

pub struct Engine<C: Clock, I: InputSource> {
    clock: C,
    input: I,
    interval: Duration,
    max_updates: u32,
    idle: Idle,
    last_update: Duration,
    window_start: Duration,
    window_updates: u32,
    window_frames: u32,
}

impl<C: Clock, I: InputSource> Engine<C, I> {
    pub fn new(clock: C, input: I, interval: Duration, max_updates: u32, idle: Idle) -> Self {
        let now = clock.now();
        Engine {
            clock,
            input,
            interval,
            max_updates: max_updates.max(1),
            idle,
            last_update: now,
            window_start: now,
            window_updates: 0,
            window_frames: 0,
        }
    }

    /// Load content, paint the first frame in full, then iterate until stopped.
    pub fn run<G: Game, D: Display>(&mut self, game: &mut G, ctx: &mut Context<D>) -> Result<()> {
        game.load_content(ctx)?;
        game.draw(ctx);
        ctx.compositor.init();

        let start = self.clock.now();
        self.last_update = start;
        self.window_start = start;
        info!(
            "loop started: interval {:?}, max {} updates per render",
            self.interval, self.max_updates
        );

        while !ctx.is_stopped() {
            let it = self.iterate(game, ctx)?;
            if !it.drew {
                self.clock.idle(self.idle);
            }
        }
        info!(
            "loop stopped after {} updates, {} frames",
            ctx.stats.total_updates, ctx.stats.total_frames
        );
        Ok(())
    }

    /// One outer iteration: catch-up updates, then at most one render.
    pub fn iterate<G: Game, D: Display>(
        &mut self,
        game: &mut G,
        ctx: &mut Context<D>,
    ) -> Result<Iteration> {
        let now = self.clock.now();
        let mut it = Iteration::default();

        while now.saturating_sub(self.last_update) > self.interval && it.updates < self.max_updates {
            self.poll_input(ctx);
            let delta_ms = now.saturating_sub(self.last_update).as_secs_f32() * 1000.0;
            game.update(ctx, delta_ms)?;
            self.last_update += self.interval;
            it.updates += 1;
        }

        if it.updates == self.max_updates && now.saturating_sub(self.last_update) > self.interval {
            debug!("dropping {:?} of update backlog", now - self.last_update);
            self.last_update = now;
        }

        if it.updates > 0 {
            game.draw(ctx);
            ctx.compositor.draw();
            it.drew = true;
        }

        self.record(ctx, now, it);
        Ok(it)
    }

    fn poll_input<D: Display>(&mut self, ctx: &mut Context<D>) {
        let key = match self.input.poll() {
            Ok(key) => key,
            Err(e) => {
                warn!("input read failed: {e:#}");
                None
            }
        };
        ctx.input.update(key);
    }

    fn record<D: Display>(&mut self, ctx: &mut Context<D>, now: Duration, it: Iteration) {
        self.window_updates += it.updates;
        ctx.stats.total_updates += u64::from(it.updates);
        if it.drew {
            self.window_frames += 1;
            ctx.stats.total_frames += 1;
        }
        if now.saturating_sub(self.window_start) >= STATS_WINDOW {
            ctx.stats.ups = self.window_updates;
            ctx.stats.fps = self.window_frames;
            self.window_updates = 0;
            self.window_frames = 0;
            self.window_start = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::testing::ManualClock;
    use crate::ui::display::testing::RecordingDisplay;
    use crate::ui::input::testing::ScriptedInput;
    use crate::ui::layout::{Layout, UiPlacement};
    use crossterm::event::KeyCode;

    const TICK: Duration = Duration::from_millis(10);

    #[derive(Default)]
    struct Probe {
        loaded: bool,
        updates: u32,
        draws: u32,
        deltas: Vec<f32>,
        keys: Vec<Option<KeyCode>>,
        stop_after: Option<u32>,
        fail_at: Option<u32>,
    }

    impl Probe {
        fn rounded_deltas(&self) -> Vec<u32> {
            self.deltas.iter().map(|d| d.round() as u32).collect()
        }
    }

    impl Game for Probe {
        fn load_content<D: Display>(&mut self, _ctx: &mut Context<D>) -> Result<()> {
            self.loaded = true;
            Ok(())
        }

        fn update<D: Display>(&mut self, ctx: &mut Context<D>, delta_ms: f32) -> Result<()> {
            self.updates += 1;
            self.deltas.push(delta_ms);
            self.keys.push(ctx.input.last_key);
            if self.fail_at == Some(self.updates) {
                anyhow::bail!("update {} failed", self.updates);
            }
            if self.stop_after == Some(self.updates) {
                ctx.stop();
            }
            Ok(())
        }

        fn draw<D: Display>(&mut self, _ctx: &mut Context<D>) {
            self.draws += 1;
        }
    }

    fn context() -> Context<RecordingDisplay> {
        let layout = Layout::new(UiPlacement::None, 0, 4, 2, Size::new(80, 24));
        Context::new(Compositor::new(RecordingDisplay::default(), layout, Theme::default()))
    }

    fn engine(clock: &ManualClock, input: ScriptedInput) -> Engine<ManualClock, ScriptedInput> {
        Engine::new(clock.clone(), input, TICK, DEFAULT_MAX_UPDATES, Idle::Yield)
    }

    #[test]
    fn nothing_runs_until_a_full_interval_has_passed() {
        let clock = ManualClock::new(Duration::ZERO);
        let mut eng = engine(&clock, ScriptedInput::default());
        let (mut game, mut ctx) = (Probe::default(), context());

        clock.advance(TICK);
        let it = eng.iterate(&mut game, &mut ctx).unwrap();
        assert_eq!(it, Iteration { updates: 0, drew: false });

        clock.advance(Duration::from_millis(1));
        let it = eng.iterate(&mut game, &mut ctx).unwrap();
        assert_eq!(it, Iteration { updates: 1, drew: true });
        assert_eq!(game.rounded_deltas(), vec![11]);
    }

    #[test]
    fn catch_up_is_capped_and_backlog_dropped() {
        let clock = ManualClock::new(Duration::ZERO);
        let mut eng = engine(&clock, ScriptedInput::default());
        let (mut game, mut ctx) = (Probe::default(), context());

        clock.advance(Duration::from_secs(1));
        let it = eng.iterate(&mut game, &mut ctx).unwrap();
        assert_eq!(it.updates, DEFAULT_MAX_UPDATES);
        assert_eq!(game.draws, 1);

        // the remaining ~950ms are not replayed
        clock.advance(Duration::from_millis(5));
        let it = eng.iterate(&mut game, &mut ctx).unwrap();
        assert_eq!(it.updates, 0);
        assert_eq!(game.updates, DEFAULT_MAX_UPDATES);
    }

    #[test]
    fn catch_up_deltas_shrink_by_one_interval() {
        let clock = ManualClock::new(Duration::ZERO);
        let mut eng = engine(&clock, ScriptedInput::default());
        let (mut game, mut ctx) = (Probe::default(), context());

        clock.advance(Duration::from_millis(35));
        let it = eng.iterate(&mut game, &mut ctx).unwrap();
        assert_eq!(it.updates, 3);
        assert_eq!(game.rounded_deltas(), vec![35, 25, 15]);
        assert_eq!(game.draws, 1);
    }

    #[test]
    fn input_is_polled_once_per_update() {
        let clock = ManualClock::new(Duration::ZERO);
        let mut input = ScriptedInput::new([Some(KeyCode::Char('a')), None]);
        input.push_fault("tty gone");
        let mut eng = engine(&clock, input);
        let (mut game, mut ctx) = (Probe::default(), context());

        clock.advance(Duration::from_millis(45));
        eng.iterate(&mut game, &mut ctx).unwrap();
        assert_eq!(game.keys, vec![Some(KeyCode::Char('a')), None, None, None]);
        assert_eq!(eng.input.polls, 4);
    }

    #[test]
    fn stop_takes_effect_after_the_pass() {
        let clock = ManualClock::new(Duration::from_millis(1));
        let mut eng = engine(&clock, ScriptedInput::default());
        let mut game = Probe { stop_after: Some(1), ..Probe::default() };
        let mut ctx = context();

        eng.run(&mut game, &mut ctx).unwrap();

        assert!(game.loaded);
        assert_eq!(game.updates, 1);
        // one draw for the initial paint, one for the pass that stopped
        assert_eq!(game.draws, 2);
        assert!(clock.idles.get() > 0);
    }

    #[test]
    fn stop_does_not_cut_the_catch_up_short() {
        let clock = ManualClock::new(Duration::ZERO);
        let mut eng = engine(&clock, ScriptedInput::default());
        let mut game = Probe { stop_after: Some(1), ..Probe::default() };
        let mut ctx = context();

        clock.advance(Duration::from_millis(31));
        let it = eng.iterate(&mut game, &mut ctx).unwrap();
        assert_eq!(it.updates, 3);
        assert!(it.drew);
        assert!(ctx.is_stopped());
    }

    #[test]
    fn update_errors_propagate_without_drawing() {
        let clock = ManualClock::new(Duration::ZERO);
        let mut eng = engine(&clock, ScriptedInput::default());
        let mut game = Probe { fail_at: Some(2), ..Probe::default() };
        let mut ctx = context();

        clock.advance(Duration::from_millis(50));
        let err = eng.iterate(&mut game, &mut ctx).unwrap_err();
        assert_eq!(err.to_string(), "update 2 failed");
        assert_eq!(game.draws, 0);
    }

    #[test]
    fn rates_are_published_each_second() {
        let clock = ManualClock::new(Duration::ZERO);
        let mut eng = engine(&clock, ScriptedInput::default());
        let (mut game, mut ctx) = (Probe::default(), context());

        for _ in 0..100 {
            clock.advance(Duration::from_millis(10) + Duration::from_micros(1));
            eng.iterate(&mut game, &mut ctx).unwrap();
        }
        assert_eq!(ctx.stats.total_updates, 100);
        assert_eq!(ctx.stats.total_frames, 100);
        assert!(ctx.stats.ups >= 99 && ctx.stats.ups <= 100);
        assert_eq!(ctx.stats.fps, ctx.stats.ups);
    }

    #[test]
    fn interval_from_rate() {
        assert_eq!(interval_for(100), Duration::from_millis(10));
        assert_eq!(interval_for(0), Duration::from_secs(1));
    }
}
