/// Entry point: load config, start logging, run the demo game.

use std::process::ExitCode;

use anyhow::Result;
use log::{error, info, warn};

use cellgrid::config::EngineConfig;
use cellgrid::demo::CommandGame;
use cellgrid::logging::init_log;
use cellgrid::sim::assets::FileContentLoader;
use cellgrid::sim::clock::MonotonicClock;
use cellgrid::sim::collision::CollisionError;
use cellgrid::sim::game_loop::{Context, Engine};
use cellgrid::ui::compositor::Compositor;
use cellgrid::ui::display::TerminalDisplay;
use cellgrid::ui::input::{InputSources, KeyboardInput};

fn main() -> ExitCode {
    let config = EngineConfig::load();

    if let Err(e) = init_log(config.log.level, &config.log.file) {
        eprintln!("Logging disabled: {e:#}");
    }
    for w in &config.warnings {
        warn!("config: {w}");
    }

    match run(&config) {
        Ok(()) => {
            info!("clean exit");
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(c) = e.downcast_ref::<CollisionError>() {
                error!("collision dispatch failed: {c}");
            } else {
                error!("{e:#}");
            }
            eprintln!("Game error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn input_sources() -> InputSources {
    let sources = InputSources::new().with(Box::new(KeyboardInput::new()));
    #[cfg(feature = "gamepad")]
    let sources = match cellgrid::ui::gamepad::GamepadInput::new() {
        Ok(pad) => sources.with(Box::new(pad)),
        Err(e) => {
            warn!("gamepad unavailable: {e:#}");
            sources
        }
    };
    sources
}

fn run(config: &EngineConfig) -> Result<()> {
    let theme = config.theme;
    let layout = config.display.layout();
    let mut ctx = Context::new(Compositor::new(TerminalDisplay::new(theme), layout, theme));

    let loader = FileContentLoader::new(config.world.assets_dir.clone(), theme);
    let mut game = CommandGame::new(Box::new(loader), config.world.map.clone(), config.world.object_size);

    let timing = &config.timing;
    let mut engine = Engine::new(
        MonotonicClock::new(),
        input_sources(),
        timing.interval(),
        timing.max_updates_before_render,
        timing.idle,
    );
    info!(
        "starting: {} Hz, up to {} updates per frame, screen {}x{}",
        timing.update_hz, timing.max_updates_before_render, layout.full.width, layout.full.height
    );

    ctx.compositor.display_mut().init()?;
    let result = engine.run(&mut game, &mut ctx);

    if let Err(e) = ctx.compositor.display_mut().cleanup() {
        eprintln!("Terminal cleanup failed: {e:#}");
    }
    result
}
