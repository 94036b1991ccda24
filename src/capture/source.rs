//! Capture sources feeding the compositor

use std::path::PathBuf;
use std::str::FromStr;

use super::CaptureError;
use super::image::Capture;
use crate::domain::{DevicePixelRatio, Point};

/// Supplies one capture per monitor
pub trait CaptureSource {
    fn capture(&mut self) -> Result<Vec<Capture>, CaptureError>;
}

/// Captures decoded elsewhere (host integration)
#[derive(Debug, Default)]
pub struct StaticSource {
    captures: Vec<Capture>,
}

impl StaticSource {
    pub fn new(captures: Vec<Capture>) -> Self {
        Self { captures }
    }
}

impl CaptureSource for StaticSource {
    fn capture(&mut self) -> Result<Vec<Capture>, CaptureError> {
        if self.captures.is_empty() {
            return Err(CaptureError::unavailable("no monitors enumerated"));
        }
        Ok(self.captures.clone())
    }
}

/// One monitor described as `path[@x,y[@ratio]]`
#[derive(Debug, Clone, PartialEq)]
pub struct MonitorSpec {
    pub path: PathBuf,
    pub origin: Point,
    pub ratio: DevicePixelRatio,
}

impl FromStr for MonitorSpec {
    type Err = CaptureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CaptureError::InvalidSpec(s.to_string());
        let mut parts = s.split('@');
        let path = parts.next().filter(|p| !p.is_empty()).ok_or_else(invalid)?;

        let origin = match parts.next() {
            Some(xy) => {
                let (x, y) = xy.split_once(',').ok_or_else(invalid)?;
                Point::new(
                    x.trim().parse().map_err(|_| invalid())?,
                    y.trim().parse().map_err(|_| invalid())?,
                )
            }
            None => Point::default(),
        };

        let ratio = match parts.next() {
            Some(r) => r
                .trim()
                .parse::<f64>()
                .ok()
                .and_then(DevicePixelRatio::new)
                .ok_or_else(invalid)?,
            None => DevicePixelRatio::IDENTITY,
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            path: PathBuf::from(path),
            origin,
            ratio,
        })
    }
}

/// Reads each monitor from an image file on disk
#[derive(Debug, Clone)]
pub struct ImageFileSource {
    monitors: Vec<MonitorSpec>,
}

impl ImageFileSource {
    pub fn new(monitors: Vec<MonitorSpec>) -> Self {
        Self { monitors }
    }
}

impl CaptureSource for ImageFileSource {
    fn capture(&mut self) -> Result<Vec<Capture>, CaptureError> {
        if self.monitors.is_empty() {
            return Err(CaptureError::unavailable("no monitor images given"));
        }
        self.monitors
            .iter()
            .map(|spec| {
                let rgba = image::open(&spec.path)
                    .map_err(|source| CaptureError::Image {
                        path: spec.path.clone(),
                        source,
                    })?
                    .into_rgba8();
                Ok(Capture::new(rgba, spec.origin, spec.ratio))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_parse_full_spec() {
        let spec: MonitorSpec = "left.png@-1920,0@1.5".parse().unwrap();
        assert_eq!(spec.path, PathBuf::from("left.png"));
        assert_eq!(spec.origin, Point::new(-1920, 0));
        assert_eq!(spec.ratio.get(), 1.5);
    }

    #[test]
    fn test_parse_defaults() {
        let spec: MonitorSpec = "screen.png".parse().unwrap();
        assert_eq!(spec.origin, Point::default());
        assert_eq!(spec.ratio, DevicePixelRatio::IDENTITY);
    }

    #[test]
    fn test_parse_rejects_bad_specs() {
        for bad in ["", "a.png@10", "a.png@x,1", "a.png@0,0@0", "a.png@0,0@2@3"] {
            assert!(
                matches!(bad.parse::<MonitorSpec>(), Err(CaptureError::InvalidSpec(_))),
                "{bad}"
            );
        }
    }

    #[test]
    fn test_empty_static_source_is_unavailable() {
        let mut source = StaticSource::default();
        assert!(matches!(
            source.capture(),
            Err(CaptureError::CaptureUnavailable { .. })
        ));
    }

    #[test]
    fn test_file_source_loads_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("monitor.png");
        RgbaImage::new(4, 2).save(&path).unwrap();

        let spec = MonitorSpec {
            path,
            origin: Point::new(5, 6),
            ratio: DevicePixelRatio::IDENTITY,
        };
        let captures = ImageFileSource::new(vec![spec]).capture().unwrap();
        assert_eq!(captures.len(), 1);
        assert_eq!(captures[0].rgba.dimensions(), (4, 2));
        assert_eq!(captures[0].origin, Point::new(5, 6));
    }

    #[test]
    fn test_file_source_reports_missing_file() {
        let spec: MonitorSpec = "/nonexistent/monitor.png".parse().unwrap();
        let err = ImageFileSource::new(vec![spec]).capture().unwrap_err();
        assert!(matches!(err, CaptureError::Image { .. }));
    }
}
