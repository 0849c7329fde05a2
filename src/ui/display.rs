/// Display: the character-grid output device.
///
/// The compositor only talks to the `Display` trait, so it can be driven by
/// the real terminal or by a recorder in tests. `TerminalDisplay` batches all
/// commands with `queue!` into a `BufWriter` and pushes them out on `flush`.

use std::io::{self, BufWriter, Stdout, Write};

use anyhow::{Context, Result};
use crossterm::{
    cursor::{self, MoveTo},
    execute, queue,
    style::{Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::colour::{ColourPair, Theme};

pub trait Display {
    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()>;
    fn set_colours(&mut self, colours: ColourPair) -> io::Result<()>;
    fn print(&mut self, ch: char) -> io::Result<()>;
    /// Return to the theme's default colour pair.
    fn reset_colours(&mut self) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

pub struct TerminalDisplay {
    writer: BufWriter<Stdout>,
    theme: Theme,
}

impl TerminalDisplay {
    pub fn new(theme: Theme) -> Self {
        TerminalDisplay {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            theme,
        }
    }

    /// Raw mode, alternate screen, hidden cursor, cleared to the theme background.
    pub fn init(&mut self) -> Result<()> {
        terminal::enable_raw_mode().context("enabling raw mode")?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            SetForegroundColor(self.theme.foreground),
            SetBackgroundColor(self.theme.background),
            Clear(ClearType::All)
        )
        .context("entering alternate screen")?;
        Ok(())
    }

    pub fn cleanup(&mut self) -> Result<()> {
        execute!(
            self.writer,
            ResetColor,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )
        .context("leaving alternate screen")?;
        terminal::disable_raw_mode().context("disabling raw mode")
    }
}

impl Display for TerminalDisplay {
    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        queue!(self.writer, MoveTo(x, y))
    }

    fn set_colours(&mut self, colours: ColourPair) -> io::Result<()> {
        queue!(
            self.writer,
            SetForegroundColor(colours.fg),
            SetBackgroundColor(colours.bg)
        )
    }

    fn print(&mut self, ch: char) -> io::Result<()> {
        queue!(self.writer, Print(ch))
    }

    fn reset_colours(&mut self) -> io::Result<()> {
        // Not ResetColor: the terminal's native default may differ from the theme.
        let pair = self.theme.default_pair();
        self.set_colours(pair)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
