/// Colours: the fixed 16-entry console palette and the theme.
///
/// The palette index order matches the two-digit codes used by sprite files
/// (`00` = black .. `15` = white). A `Theme` carries the process default
/// foreground/background plus the "invisible" marker colour; it is built once
/// at startup and passed by reference to everything that creates cells.

use crossterm::style::Color;
use serde::Deserialize;

/// Console palette, indexed by the sprite file colour codes.
pub const PALETTE: [Color; 16] = [
    Color::Black,
    Color::DarkBlue,
    Color::DarkGreen,
    Color::DarkCyan,
    Color::DarkRed,
    Color::DarkMagenta,
    Color::DarkYellow,
    Color::Grey,
    Color::DarkGrey,
    Color::Blue,
    Color::Green,
    Color::Cyan,
    Color::Red,
    Color::Magenta,
    Color::Yellow,
    Color::White,
];

/// Look up a two-digit palette code such as `"07"`.
pub fn palette_index(code: &str) -> Option<Color> {
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let idx: usize = code.parse().ok()?;
    PALETTE.get(idx).copied()
}

/// Parse a palette colour by name (`"dark_blue"`, `"grey"`, `"gray"` ...).
pub fn colour_by_name(name: &str) -> Option<Color> {
    let key = name.trim().to_ascii_lowercase().replace(['-', ' '], "_");
    let c = match key.as_str() {
        "black" => Color::Black,
        "dark_blue" => Color::DarkBlue,
        "dark_green" => Color::DarkGreen,
        "dark_cyan" => Color::DarkCyan,
        "dark_red" => Color::DarkRed,
        "dark_magenta" => Color::DarkMagenta,
        "dark_yellow" => Color::DarkYellow,
        "gray" | "grey" => Color::Grey,
        "dark_gray" | "dark_grey" => Color::DarkGrey,
        "blue" => Color::Blue,
        "green" => Color::Green,
        "cyan" => Color::Cyan,
        "red" => Color::Red,
        "magenta" => Color::Magenta,
        "yellow" => Color::Yellow,
        "white" => Color::White,
        _ => return None,
    };
    Some(c)
}

/// A foreground/background pair.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub struct ColourPair {
    pub fg: Color,
    pub bg: Color,
}

impl ColourPair {
    pub const fn new(fg: Color, bg: Color) -> Self {
        ColourPair { fg, bg }
    }
}

/// Process-wide colour defaults, constructed once and threaded through
/// cell and canvas constructors.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Deserialize)]
#[serde(try_from = "ThemeNames")]
pub struct Theme {
    /// Default text colour.
    pub foreground: Color,
    /// Default background colour.
    pub background: Color,
    /// Foreground marker that, on a blank default-background cell, means "see-through".
    pub invisible: Color,
}

impl Theme {
    pub fn default_pair(&self) -> ColourPair {
        ColourPair::new(self.foreground, self.background)
    }

    /// The colour pair a transparent blank carries.
    pub fn transparent_pair(&self) -> ColourPair {
        ColourPair::new(self.invisible, self.background)
    }

    /// Colour used for diagnostics drawn on screen (placeholder images, UI border).
    pub fn warning(&self) -> Color {
        Color::Red
    }
}

impl Default for Theme {
    fn default() -> Self {
        Theme {
            foreground: Color::Grey,
            background: Color::Black,
            invisible: Color::Black,
        }
    }
}

// ── Config-facing names ──

#[derive(Deserialize)]
struct ThemeNames {
    #[serde(default = "default_foreground")]
    foreground: String,
    #[serde(default = "default_background")]
    background: String,
    #[serde(default = "default_invisible")]
    invisible: String,
}

fn default_foreground() -> String { "gray".into() }
fn default_background() -> String { "black".into() }
fn default_invisible() -> String { "black".into() }

impl TryFrom<ThemeNames> for Theme {
    type Error = String;

    fn try_from(names: ThemeNames) -> Result<Self, Self::Error> {
        let pick = |n: &str| colour_by_name(n).ok_or_else(|| format!("unknown colour `{n}`"));
        Ok(Theme {
            foreground: pick(&names.foreground)?,
            background: pick(&names.background)?,
            invisible: pick(&names.invisible)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_codes_cover_sixteen_entries() {
        assert_eq!(palette_index("00"), Some(Color::Black));
        assert_eq!(palette_index("07"), Some(Color::Grey));
        assert_eq!(palette_index("12"), Some(Color::Red));
        assert_eq!(palette_index("15"), Some(Color::White));
        assert_eq!(palette_index("16"), None);
        assert_eq!(palette_index("7"), None);
        assert_eq!(palette_index("x1"), None);
    }

    #[test]
    fn names_are_case_and_separator_tolerant() {
        assert_eq!(colour_by_name("Dark Blue"), Some(Color::DarkBlue));
        assert_eq!(colour_by_name("dark-grey"), Some(Color::DarkGrey));
        assert_eq!(colour_by_name("GRAY"), Some(Color::Grey));
        assert_eq!(colour_by_name("purple"), None);
    }

    #[test]
    fn theme_from_toml_names() {
        let t: Theme = toml::from_str("foreground = \"white\"\nbackground = \"dark_blue\"").unwrap();
        assert_eq!(t.foreground, Color::White);
        assert_eq!(t.background, Color::DarkBlue);
        assert_eq!(t.invisible, Color::Black);
    }

    #[test]
    fn theme_rejects_unknown_colour() {
        assert!(toml::from_str::<Theme>("foreground = \"chartreuse\"").is_err());
    }
}
