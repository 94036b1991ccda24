//! Destinations for exported images

use std::fs::{self, File};
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use anyhow::Context;
use image::RgbaImage;
use image::codecs::jpeg::JpegEncoder;

use crate::config::Config;
use crate::domain::Rect;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("unsupported image format `{0}`, expected png, jpg or jpeg")]
    UnsupportedFormat(String),
    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
    #[error("JPEG encoding failed: {0}")]
    Jpeg(#[from] image::ImageError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Receives the flattened export; clipboard, print and upload hosts implement this
pub trait ExportSink {
    fn accept(&mut self, image: &RgbaImage, crop: Rect) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg { quality: u8 },
}

impl ImageFormat {
    pub fn from_extension(ext: &str, jpeg_quality: u8) -> Result<Self, ExportError> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg {
                quality: jpeg_quality.clamp(1, 100),
            }),
            other => Err(ExportError::UnsupportedFormat(other.to_string())),
        }
    }

    pub fn write<W: io::Write>(self, w: W, image: &RgbaImage) -> Result<(), ExportError> {
        match self {
            Self::Png => write_png(w, image)?,
            Self::Jpeg { quality } => {
                // JPEG has no alpha channel
                let rgb = image::DynamicImage::ImageRgba8(image.clone()).to_rgb8();
                JpegEncoder::new_with_quality(w, quality).encode_image(&rgb)?;
            }
        }
        Ok(())
    }
}

fn write_png<W: io::Write>(w: W, image: &RgbaImage) -> Result<(), png::EncodingError> {
    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(image.as_raw())
}

/// Writes each export to a file
#[derive(Debug, Clone)]
pub struct FileSink {
    path: PathBuf,
    format: ImageFormat,
}

impl FileSink {
    pub fn new(path: PathBuf, format: ImageFormat) -> Self {
        Self { path, format }
    }

    /// Format picked from the path's extension, quality from `config`
    pub fn for_path(path: PathBuf, config: &Config) -> Result<Self, ExportError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(config.file_extension.as_str())
            .to_string();
        let format = ImageFormat::from_extension(&ext, config.jpeg_quality)?;
        Ok(Self::new(path, format))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportSink for FileSink {
    fn accept(&mut self, image: &RgbaImage, crop: Rect) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let file = File::create(&self.path)
            .with_context(|| format!("creating {}", self.path.display()))?;
        self.format
            .write(BufWriter::new(file), image)
            .with_context(|| format!("writing {}", self.path.display()))?;
        log::info!(
            "Saved {}x{} crop {:?} to {}",
            image.width(),
            image.height(),
            crop,
            self.path.display()
        );
        Ok(())
    }
}

/// First of `base-1.ext`, `base-2.ext`, ... not present in `folder`
///
/// The folder is created when missing.
pub fn unique_file_path(folder: &Path, base: &str, extension: &str) -> io::Result<PathBuf> {
    fs::create_dir_all(folder)?;
    let mut i = 1u32;
    loop {
        let path = folder.join(format!("{base}-{i}.{extension}"));
        if !path.exists() {
            return Ok(path);
        }
        i += 1;
    }
}

/// Timestamped screenshot path inside `folder`
pub fn default_save_path(folder: &Path, extension: &str) -> PathBuf {
    let name = chrono::Local::now()
        .format("Screenshot_%Y-%m-%d_%H-%M-%S")
        .to_string();
    folder.join(format!("{name}.{extension}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn sample() -> RgbaImage {
        RgbaImage::from_fn(8, 4, |x, y| Rgba([x as u8 * 30, y as u8 * 60, 90, 255]))
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ImageFormat::from_extension("PNG", 90).unwrap(), ImageFormat::Png);
        assert_eq!(
            ImageFormat::from_extension("jpg", 0).unwrap(),
            ImageFormat::Jpeg { quality: 1 }
        );
        assert!(matches!(
            ImageFormat::from_extension("bmp", 90),
            Err(ExportError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_file_sink_writes_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.png");
        let mut sink = FileSink::new(path.clone(), ImageFormat::Png);
        sink.accept(&sample(), Rect::new(0, 0, 8, 4)).unwrap();

        let read = image::open(&path).unwrap().into_rgba8();
        assert_eq!(read, sample());
    }

    #[test]
    fn test_file_sink_writes_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");
        let config = Config::default();
        let mut sink = FileSink::for_path(path.clone(), &config).unwrap();
        sink.accept(&sample(), Rect::new(0, 0, 8, 4)).unwrap();
        let read = image::open(&path).unwrap();
        assert_eq!((read.width(), read.height()), (8, 4));
    }

    #[test]
    fn test_unique_file_path_skips_existing() {
        let dir = tempfile::tempdir().unwrap();
        let folder = dir.path().join("shots");
        let first = unique_file_path(&folder, "capture", "png").unwrap();
        assert_eq!(first, folder.join("capture-1.png"));
        fs::write(&first, b"").unwrap();
        fs::write(folder.join("capture-2.png"), b"").unwrap();
        assert_eq!(
            unique_file_path(&folder, "capture", "png").unwrap(),
            folder.join("capture-3.png")
        );
    }

    #[test]
    fn test_default_save_path_is_timestamped() {
        let path = default_save_path(Path::new("/tmp/pics"), "jpg");
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("Screenshot_"), "{name}");
        assert!(name.ends_with(".jpg"), "{name}");
        assert_eq!(path.parent(), Some(Path::new("/tmp/pics")));
    }
}
