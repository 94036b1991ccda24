//! Editable text regions and glyph rasterization

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use anyhow::Context;
use image::RgbaImage;

use crate::domain::{Point, Rect, TextStyle};
use crate::render::geometry::text::CONTENT_MARGIN;
use crate::render::image::blend_pixel;

/// Turns lines of text into pixels
pub trait GlyphRasterizer {
    /// Distance between successive baselines at `size` points
    fn line_height(&self, size: f32) -> f32;
    /// Distance from the top of a line to its baseline
    fn ascent(&self, size: f32) -> f32;
    /// Horizontal extent of `text`
    fn advance(&self, text: &str, size: f32) -> f32;
    /// Draw `text` with its baseline starting at `origin`
    fn draw_line(&self, img: &mut RgbaImage, origin: (f32, f32), text: &str, size: f32, rgba: [u8; 4]);
}

/// Points to pixels at 96 dpi
const PT_TO_PX: f32 = 96.0 / 72.0;

/// Rasterizer backed by a TrueType/OpenType font
pub struct FontRasterizer {
    font: FontArc,
}

impl FontRasterizer {
    pub fn from_bytes(bytes: Vec<u8>) -> anyhow::Result<Self> {
        let font = FontArc::try_from_vec(bytes).context("not a usable font")?;
        Ok(Self { font })
    }

    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
        Self::from_bytes(bytes)
    }

    /// The configured font, else the first system font that loads
    pub fn load(configured: Option<&Path>) -> Option<Self> {
        if let Some(path) = configured {
            match Self::from_path(path) {
                Ok(font) => return Some(font),
                Err(err) => log::warn!("Configured font unusable, trying system fonts: {err:#}"),
            }
        }
        system_font_paths().find_map(|path| match Self::from_path(&path) {
            Ok(font) => {
                log::debug!("Using font {}", path.display());
                Some(font)
            }
            Err(err) => {
                log::debug!("Skipping font: {err:#}");
                None
            }
        })
    }

    fn scale(size: f32) -> PxScale {
        PxScale::from(size * PT_TO_PX)
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn line_height(&self, size: f32) -> f32 {
        let scaled = self.font.as_scaled(Self::scale(size));
        scaled.height() + scaled.line_gap()
    }

    fn ascent(&self, size: f32) -> f32 {
        self.font.as_scaled(Self::scale(size)).ascent()
    }

    fn advance(&self, text: &str, size: f32) -> f32 {
        let scaled = self.font.as_scaled(Self::scale(size));
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn draw_line(&self, img: &mut RgbaImage, origin: (f32, f32), text: &str, size: f32, rgba: [u8; 4]) {
        if text.is_empty() {
            return;
        }
        let scaled = self.font.as_scaled(Self::scale(size));
        let mut caret = point(origin.0, origin.1);
        let mut prev = None;
        for ch in text.chars() {
            let mut glyph = scaled.scaled_glyph(ch);
            if let Some(prev) = prev {
                caret.x += scaled.kern(prev, glyph.id);
            }
            glyph.position = caret;
            caret.x += scaled.h_advance(glyph.id);
            prev = Some(glyph.id);

            let Some(outlined) = scaled.outline_glyph(glyph) else {
                continue;
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = x as i32 + bounds.min.x as i32;
                let py = y as i32 + bounds.min.y as i32;
                if px < 0 || py < 0 {
                    return;
                }
                let alpha = (rgba[3] as f32 * coverage).round().clamp(0.0, 255.0) as u8;
                blend_pixel(img, px as u32, py as u32, [rgba[0], rgba[1], rgba[2], alpha]);
            });
        }
    }
}

/// Well-known sans-serif faces on Linux, macOS and Windows
const SYSTEM_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu-sans-fonts/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation-sans/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/noto/NotoSans-Regular.ttf",
    "/usr/share/fonts/google-noto/NotoSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Directories searched when none of [`SYSTEM_FONTS`] exist
fn font_dirs() -> Vec<PathBuf> {
    let mut roots: Vec<PathBuf> = dirs::font_dir().into_iter().collect();
    roots.extend(
        ["/usr/share/fonts", "/usr/local/share/fonts", "/System/Library/Fonts"]
            .into_iter()
            .map(PathBuf::from),
    );
    roots
}

const MAX_FONT_DIR_DEPTH: usize = 4;

/// First `.ttf`/`.otf` under `dir`, in sorted order
fn first_font_in(dir: &Path, depth: usize) -> Option<PathBuf> {
    let mut entries: Vec<PathBuf> = fs::read_dir(dir)
        .ok()?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .collect();
    entries.sort();
    let is_font = |p: &Path| {
        p.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("ttf") || e.eq_ignore_ascii_case("otf"))
    };
    if let Some(font) = entries.iter().find(|p| p.is_file() && is_font(p.as_path())) {
        return Some(font.clone());
    }
    if depth == 0 {
        return None;
    }
    entries
        .iter()
        .filter(|p| p.is_dir())
        .find_map(|p| first_font_in(p, depth - 1))
}

/// Candidate font files, well-known paths first
fn system_font_paths() -> impl Iterator<Item = PathBuf> {
    let known = SYSTEM_FONTS
        .iter()
        .copied()
        .map(PathBuf::from)
        .filter(|p| p.is_file());
    let scanned = std::iter::once_with(|| {
        font_dirs()
            .iter()
            .find_map(|dir| first_font_in(dir, MAX_FONT_DIR_DEPTH))
    })
    .flatten();
    known.chain(scanned)
}

/// A text region being typed into; nothing reaches the bitmap until commit
#[derive(Debug, Clone, PartialEq)]
pub struct TextSession {
    pub anchor: Point,
    pub style: TextStyle,
    content: String,
}

impl TextSession {
    pub fn new(anchor: Point, style: TextStyle) -> Self {
        Self {
            anchor,
            style,
            content: String::new(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn insert(&mut self, text: &str) {
        self.content.push_str(text);
    }

    pub fn newline(&mut self) {
        self.content.push('\n');
    }

    pub fn backspace(&mut self) {
        self.content.pop();
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Baseline origin of each line: anchor plus content margins, one line height apart
    pub fn line_origins(&self, rasterizer: &dyn GlyphRasterizer) -> Vec<(f32, f32)> {
        let size = self.style.size();
        let line_height = rasterizer.line_height(size);
        let x = self.anchor.x as f32 + CONTENT_MARGIN;
        let first_baseline = self.anchor.y as f32 + CONTENT_MARGIN + rasterizer.ascent(size);
        (0..self.lines().count())
            .map(|i| (x, first_baseline + i as f32 * line_height))
            .collect()
    }

    /// Region occupied by the editable box
    pub fn bounds(&self, rasterizer: &dyn GlyphRasterizer) -> Rect {
        let size = self.style.size();
        let widest = self
            .lines()
            .map(|line| rasterizer.advance(line, size))
            .fold(0.0_f32, f32::max);
        let lines = self.lines().count() as f32;
        let width = (widest + CONTENT_MARGIN * 2.0).ceil() as i32;
        let height = (lines * rasterizer.line_height(size) + CONTENT_MARGIN * 2.0).ceil() as i32;
        Rect::from_xywh(self.anchor.x, self.anchor.y, width, height)
    }

    /// Draw every line onto `img`
    pub fn render(&self, img: &mut RgbaImage, rasterizer: &dyn GlyphRasterizer) {
        let rgba = self.style.color.to_rgba_u8();
        let size = self.style.size();
        for (line, origin) in self.lines().zip(self.line_origins(rasterizer)) {
            rasterizer.draw_line(img, origin, line, size, rgba);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::config::StrokeColor;

    /// Draws one solid 1-pixel-tall bar per character, right on the baseline row
    pub(crate) struct BlockRasterizer;

    impl GlyphRasterizer for BlockRasterizer {
        fn line_height(&self, size: f32) -> f32 {
            size
        }

        fn ascent(&self, size: f32) -> f32 {
            size * 0.75
        }

        fn advance(&self, text: &str, size: f32) -> f32 {
            text.chars().count() as f32 * size * 0.5
        }

        fn draw_line(&self, img: &mut RgbaImage, origin: (f32, f32), text: &str, size: f32, rgba: [u8; 4]) {
            let width = self.advance(text, size) as u32;
            let (x0, y) = (origin.0 as u32, origin.1 as u32);
            for x in x0..x0 + width {
                blend_pixel(img, x, y, rgba);
            }
        }
    }

    fn session() -> TextSession {
        TextSession::new(Point::new(10, 20), TextStyle::new(StrokeColor::RED, 16.0))
    }

    #[test]
    fn test_editing() {
        let mut text = session();
        assert!(text.is_empty());
        text.insert("ab");
        text.newline();
        text.insert("cd");
        text.backspace();
        assert_eq!(text.content(), "ab\nc");
        assert_eq!(text.lines().collect::<Vec<_>>(), vec!["ab", "c"]);
    }

    #[test]
    fn test_line_origins_step_by_line_height() {
        let mut text = session();
        text.insert("one\ntwo\nthree");
        let origins = text.line_origins(&BlockRasterizer);
        let x = 10.0 + CONTENT_MARGIN;
        let first = 20.0 + CONTENT_MARGIN + 12.0;
        assert_eq!(
            origins,
            vec![(x, first), (x, first + 16.0), (x, first + 32.0)]
        );
    }

    #[test]
    fn test_bounds_fit_widest_line() {
        let mut text = session();
        text.insert("abcd\nab");
        let bounds = text.bounds(&BlockRasterizer);
        assert_eq!(bounds.top_left(), Point::new(10, 20));
        assert_eq!(bounds.width(), (32.0 + CONTENT_MARGIN * 2.0) as i32);
        assert_eq!(bounds.height(), (32.0 + CONTENT_MARGIN * 2.0) as i32);
    }

    #[test]
    fn test_render_draws_each_line() {
        let mut text = session();
        text.insert("a\nb");
        let mut img = RgbaImage::new(100, 100);
        text.render(&mut img, &BlockRasterizer);
        let origins = text.line_origins(&BlockRasterizer);
        let [(x, y1), (_, y2)] = origins[..] else {
            panic!("expected two lines");
        };
        assert_eq!(img.get_pixel(x as u32, y1 as u32).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(x as u32, y2 as u32).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(0, 0).0[3], 0);
    }

    #[test]
    fn test_font_rejects_invalid_bytes() {
        assert!(FontRasterizer::from_bytes(vec![0, 1, 2, 3]).is_err());
    }

    #[test]
    fn test_first_font_in_searches_subdirectories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("truetype").join("sans");
        fs::create_dir_all(&nested).unwrap();
        fs::write(dir.path().join("README"), b"").unwrap();
        fs::write(nested.join("Face.TTF"), b"").unwrap();
        assert_eq!(first_font_in(dir.path(), 2), Some(nested.join("Face.TTF")));
        assert_eq!(first_font_in(dir.path(), 1), None);
    }

    #[test]
    fn test_unusable_configured_font_falls_back_to_system() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("broken.ttf");
        fs::write(&bogus, b"not a font").unwrap();
        let font = FontRasterizer::load(Some(&bogus)).expect("a system font");
        assert!(font.line_height(16.0) > 0.0);
        assert!(font.advance("hello", 16.0) > 0.0);
    }
}
