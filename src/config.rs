//! Configuration persistence for screenme settings

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

/// Serializable color representation for config storage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrokeColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "default_alpha")]
    pub a: f32,
}

fn default_alpha() -> f32 {
    1.0
}

impl Default for StrokeColor {
    fn default() -> Self {
        Self::BLACK
    }
}

impl StrokeColor {
    pub const BLACK: Self = Self::rgb(0.0, 0.0, 0.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Convert to image crate RGBA format (0-255)
    pub fn to_rgba_u8(self) -> [u8; 4] {
        let channel = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        [channel(self.r), channel(self.g), channel(self.b), channel(self.a)]
    }

    pub fn from_rgba_u8([r, g, b, a]: [u8; 4]) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
            a: a as f32 / 255.0,
        }
    }
}

/// Application configuration persisted between sessions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Initial drawing color
    #[serde(default)]
    pub pen_color: StrokeColor,
    /// Initial stroke width in logical pixels (clamped to 1-20 on use)
    #[serde(default = "default_stroke_width")]
    pub stroke_width: u32,
    /// Initial text point size
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// TrueType/OpenType font for text annotations; a system font is used when unset or unusable
    #[serde(default)]
    pub font_path: Option<PathBuf>,
    /// Folder screenshots are saved to
    #[serde(default = "default_save_folder")]
    pub save_folder: PathBuf,
    /// File extension for saved screenshots (png, jpg, jpeg)
    #[serde(default = "default_file_extension")]
    pub file_extension: String,
    /// JPEG quality (0-100)
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Darkening applied outside the selection (0.0-1.0)
    #[serde(default = "default_dim_opacity")]
    pub dim_opacity: f32,
    /// Maximum undo snapshots kept (None = unbounded)
    #[serde(default)]
    pub undo_limit: Option<usize>,
}

fn default_stroke_width() -> u32 {
    5
}

fn default_font_size() -> f32 {
    16.0
}

fn default_save_folder() -> PathBuf {
    dirs::picture_dir()
        .or_else(|| dirs::home_dir().map(|h| h.join("Pictures")))
        .unwrap_or_else(|| PathBuf::from("."))
}

fn default_file_extension() -> String {
    "png".to_string()
}

fn default_jpeg_quality() -> u8 {
    90
}

fn default_dim_opacity() -> f32 {
    0.4
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pen_color: StrokeColor::default(),
            stroke_width: default_stroke_width(),
            font_size: default_font_size(),
            font_path: None,
            save_folder: default_save_folder(),
            file_extension: default_file_extension(),
            jpeg_quality: default_jpeg_quality(),
            dim_opacity: default_dim_opacity(),
            undo_limit: None,
        }
    }
}

impl Config {
    pub const FILE_NAME: &'static str = "config.json";

    /// `<config dir>/screenme/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("screenme").join(Self::FILE_NAME))
    }

    /// Load configuration from disk, or return defaults if unavailable
    pub fn load() -> Self {
        let Some(path) = Self::default_path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {:?}", err);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = serde_json::from_str(&data)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration to disk
    pub fn save(&self) {
        let Some(path) = Self::default_path() else {
            log::error!("Could not resolve config directory for saving");
            return;
        };
        if let Err(err) = self.save_to(&path) {
            log::error!("Failed to save config: {:?}", err);
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data).with_context(|| format!("writing {}", path.display()))?;
        Ok(())
    }
}
