/// Keyboard input.
///
/// The loop polls an `InputSource` exactly once per update tick and records
/// the result in `InputState`:
///   - `any_pressed` : did a key arrive this tick
///   - `last_key`    : which one
/// Polling never blocks. A failing source is the caller's problem to log;
/// the tick then sees no key.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

pub trait InputSource {
    /// The next pressed key, if one is waiting.
    fn poll(&mut self) -> Result<Option<KeyCode>>;
}

/// Terminal keyboard via crossterm's event queue.
#[derive(Default)]
pub struct KeyboardInput;

impl KeyboardInput {
    pub fn new() -> Self {
        KeyboardInput
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) -> Result<Option<KeyCode>> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                // Release / Repeat only show up with keyboard enhancement; ignore them
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                // Raw mode swallows SIGINT, so Ctrl+C arrives as a key
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
                {
                    return Ok(Some(KeyCode::Esc));
                }
                return Ok(Some(key.code));
            }
        }
        Ok(None)
    }
}

/// Several sources polled in order; the first one with a key wins.
#[derive(Default)]
pub struct InputSources {
    sources: Vec<Box<dyn InputSource>>,
}

impl InputSources {
    pub fn new() -> Self {
        InputSources { sources: Vec::new() }
    }

    pub fn with(mut self, source: Box<dyn InputSource>) -> Self {
        self.sources.push(source);
        self
    }
}

impl InputSource for InputSources {
    fn poll(&mut self) -> Result<Option<KeyCode>> {
        for source in self.sources.iter_mut() {
            if let Some(key) = source.poll()? {
                return Ok(Some(key));
            }
        }
        Ok(None)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub any_pressed: bool,
    pub last_key: Option<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        InputState::default()
    }

    /// Record this tick's poll result.
    pub fn update(&mut self, key: Option<KeyCode>) {
        self.any_pressed = key.is_some();
        self.last_key = key;
    }

    /// Was `code` the key pressed this tick?
    pub fn is_key_down(&self, code: KeyCode) -> bool {
        self.last_key == Some(code)
    }

    /// This tick's key as a command character.
    pub fn last_char(&self) -> Option<char> {
        self.last_key.map(key_to_char)
    }
}

/// Translate a key into the character typed into a command line.
///
/// Letters come out upper-case; `,` and `.` double as the `<` / `>` arrows,
/// the vertical arrow keys give `^` / `V`, Enter is `|` and anything without
/// a printable form is `?`.
pub fn key_to_char(code: KeyCode) -> char {
    match code {
        KeyCode::Char(',') | KeyCode::Left => '<',
        KeyCode::Char('.') | KeyCode::Right => '>',
        KeyCode::Up => '^',
        KeyCode::Down => 'V',
        KeyCode::Char(c) if c.is_ascii_alphabetic() => c.to_ascii_uppercase(),
        KeyCode::Char(c) if c.is_ascii_graphic() || c == ' ' => c,
        KeyCode::Backspace => ' ',
        KeyCode::Enter => '|',
        _ => '?',
    }
}
