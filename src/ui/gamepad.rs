/// Gamepad input via gilrs (feature `gamepad`).
///
/// Buttons are translated into the same key codes the keyboard produces, so
/// games never need to know where a key came from:
///   D-pad Left / Right  →  `,` / `.`  (command arrows)
///   D-pad Up / Down     →  Up / Down
///   A / South           →  Enter
///   B / East            →  Backspace
///   Start               →  Enter
///   Select              →  Esc

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use gilrs::{Button, EventType, Gilrs};
use log::{debug, info};

use crate::ui::input::InputSource;

pub struct GamepadInput {
    gilrs: Gilrs,
}

impl GamepadInput {
    pub fn new() -> Result<Self> {
        let gilrs = Gilrs::new().map_err(|e| anyhow!("gamepad init failed: {e}"))?;
        for (_, pad) in gilrs.gamepads() {
            info!("gamepad connected: {}", pad.name());
        }
        Ok(GamepadInput { gilrs })
    }
}

fn button_to_key(btn: Button) -> Option<KeyCode> {
    match btn {
        Button::DPadLeft => Some(KeyCode::Char(',')),
        Button::DPadRight => Some(KeyCode::Char('.')),
        Button::DPadUp => Some(KeyCode::Up),
        Button::DPadDown => Some(KeyCode::Down),
        Button::South | Button::Start => Some(KeyCode::Enter),
        Button::East => Some(KeyCode::Backspace),
        Button::Select => Some(KeyCode::Esc),
        _ => None,
    }
}

impl InputSource for GamepadInput {
    fn poll(&mut self) -> Result<Option<KeyCode>> {
        while let Some(event) = self.gilrs.next_event() {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    if let Some(key) = button_to_key(btn) {
                        return Ok(Some(key));
                    }
                }
                EventType::Disconnected => debug!("gamepad {} disconnected", event.id),
                _ => {}
            }
        }
        Ok(None)
    }
}
