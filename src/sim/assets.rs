/// Sprite and map loading.
///
/// Sprite file format:
///   line 1       : "<height>,<width>"
///   next height  : "<c>,<c>,...| |<BBFF>,<BBFF>,..."
/// with `width` single-character glyphs, the `| |` separator, then `width`
/// four-digit colour tokens: two-digit background index followed by
/// two-digit foreground index into the 16-colour palette.
///
/// A sprite that cannot be read or parsed becomes the BAD/IMG placeholder
/// and a warning in the log; loading never fails the caller.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use log::{debug, warn};

use crate::domain::cell::Cell;
use crate::domain::colour::{palette_index, ColourPair, Theme};
use crate::domain::image::Image;

const ROW_SEPARATOR: &str = "| |";
const SPRITE_EXT: &str = "txt";

pub trait ContentLoader {
    /// Sprite by asset name, or the placeholder if it is unusable.
    fn load_image(&self, name: &str) -> Image;

    /// Raw map text.
    fn load_map(&self, path: &Path) -> Result<String>;
}

/// Loads sprites from `<assets_dir>/<name>.txt` and maps from disk.
pub struct FileContentLoader {
    assets_dir: PathBuf,
    theme: Theme,
}

impl FileContentLoader {
    pub fn new(assets_dir: impl Into<PathBuf>, theme: Theme) -> Self {
        FileContentLoader { assets_dir: assets_dir.into(), theme }
    }

    fn sprite_path(&self, name: &str) -> PathBuf {
        self.assets_dir.join(name).with_extension(SPRITE_EXT)
    }
}

impl ContentLoader for FileContentLoader {
    fn load_image(&self, name: &str) -> Image {
        let path = self.sprite_path(name);
        let parsed = std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))
            .and_then(|text| parse_sprite(&text, &self.theme));
        match parsed {
            Ok(img) => {
                debug!("loaded sprite {name} ({}x{})", img.width(), img.height());
                img
            }
            Err(e) => {
                warn!("sprite {name}: {e:#}; using placeholder");
                Image::placeholder(&self.theme)
            }
        }
    }

    fn load_map(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("reading map {}", path.display()))
    }
}

fn parse_dimension(s: Option<&str>, what: &str) -> Result<usize> {
    let s = s.with_context(|| format!("header is missing the {what}"))?;
    s.trim().parse().with_context(|| format!("bad {what} {s:?}"))
}

fn parse_colour_token(token: &str) -> Result<ColourPair> {
    let token = token.trim();
    if token.len() != 4 || !token.is_ascii() {
        bail!("colour token {token:?} is not four digits");
    }
    let bg = palette_index(&token[..2]).with_context(|| format!("no palette entry for {token:?}"))?;
    let fg = palette_index(&token[2..]).with_context(|| format!("no palette entry for {token:?}"))?;
    Ok(ColourPair::new(fg, bg))
}

/// Parse sprite text into an image.
pub fn parse_sprite(text: &str, theme: &Theme) -> Result<Image> {
    let mut lines = text.lines();
    let header = lines.next().context("empty sprite file")?;
    let mut dims = header.split(',');
    let height = parse_dimension(dims.next(), "height")?;
    let width = parse_dimension(dims.next(), "width")?;

    let mut rows = Vec::with_capacity(height);
    for r in 0..height {
        let line = lines.next().with_context(|| format!("missing row {}", r + 1))?;
        let (glyphs, colours) = line
            .split_once(ROW_SEPARATOR)
            .with_context(|| format!("row {} has no {ROW_SEPARATOR:?} separator", r + 1))?;
        let glyphs: Vec<&str> = glyphs.split(',').collect();
        let colours: Vec<&str> = colours.split(',').collect();
        if glyphs.len() < width || colours.len() < width {
            bail!("row {} is narrower than {width}", r + 1);
        }

        let mut row = Vec::with_capacity(width);
        for c in 0..width {
            let ch = glyphs[c]
                .chars()
                .next()
                .with_context(|| format!("row {} column {} has no glyph", r + 1, c + 1))?;
            row.push(Cell::new(ch, parse_colour_token(colours[c])?, theme));
        }
        rows.push(row);
    }
    Ok(Image::from_rows(rows, theme))
}

#[cfg(test)]
pub mod testing {
    use super::*;
    use std::collections::HashMap;

    /// Loader backed by in-memory strings.
    #[derive(Default)]
    pub struct MemoryLoader {
        pub theme: Theme,
        pub sprites: HashMap<String, String>,
        pub maps: HashMap<PathBuf, String>,
    }

    impl MemoryLoader {
        pub fn with_sprite(mut self, name: &str, text: &str) -> Self {
            self.sprites.insert(name.to_string(), text.to_string());
            self
        }

        pub fn with_map(mut self, path: &str, text: &str) -> Self {
            self.maps.insert(PathBuf::from(path), text.to_string());
            self
        }
    }

    impl ContentLoader for MemoryLoader {
        fn load_image(&self, name: &str) -> Image {
            self.sprites
                .get(name)
                .and_then(|text| parse_sprite(text, &self.theme).ok())
                .unwrap_or_else(|| Image::placeholder(&self.theme))
        }

        fn load_map(&self, path: &Path) -> Result<String> {
            self.maps
                .get(path)
                .cloned()
                .with_context(|| format!("no map at {}", path.display()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::style::Color;

    const CRATE: &str = "2,4\n\
                         [,=,=,]| |0006,0006,0006,0006\n\
                         [, ,_,]| |0006,0000,0014,0006\n";

    #[test]
    fn parses_glyphs_and_colours() {
        let t = Theme::default();
        let img = parse_sprite(CRATE, &t).unwrap();
        assert_eq!((img.width(), img.height()), (4, 2));
        let c = img.get(0, 1).unwrap();
        assert_eq!(c.ch(), '=');
        assert_eq!(c.bg(), Color::Black);
        assert_eq!(c.fg(), Color::DarkYellow);
        assert_eq!(img.get(1, 2).unwrap().fg(), Color::Yellow);
    }

    #[test]
    fn space_on_background_with_invisible_fg_is_transparent() {
        let t = Theme::default();
        let img = parse_sprite(CRATE, &t).unwrap();
        assert!(img.get(1, 1).unwrap().is_transparent());
        assert!(!img.get(0, 0).unwrap().is_transparent());
    }

    #[test]
    fn malformed_sprites_are_errors() {
        let t = Theme::default();
        for bad in [
            "",
            "2",
            "x,4\n",
            "1,2\na,b\n",
            "1,2\na,b| |0007\n",
            "1,2\na,b| |0007,0099\n",
            "1,2\na,b| |007,0007\n",
            "2,1\na| |0007\n",
        ] {
            assert!(parse_sprite(bad, &t).is_err(), "{bad:?} should fail");
        }
    }

    #[test]
    fn missing_file_falls_back_to_placeholder() {
        let t = Theme::default();
        let loader = FileContentLoader::new("/nonexistent/assets", t);
        assert_eq!(loader.load_image("Player"), Image::placeholder(&t));
        assert!(loader.load_map(Path::new("/nonexistent/map.txt")).is_err());
    }

    #[test]
    fn files_round_through_the_loader() {
        let dir = std::env::temp_dir().join(format!("cellgrid-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("Crate.txt"), CRATE).unwrap();

        let t = Theme::default();
        let loader = FileContentLoader::new(&dir, t);
        assert_eq!(loader.load_image("Crate"), parse_sprite(CRATE, &t).unwrap());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
