use std::path::PathBuf;

use anyhow::{Context, bail};

use screenme::capture::{ImageFileSource, MonitorSpec, capture_desktop};
use screenme::config::Config;
use screenme::domain::Rect;
use screenme::export::{ExportSink, ExportTarget, FileSink, default_save_path};
use screenme::session::InteractionRouter;

const USAGE: &str =
    "usage: screenme <path[@x,y[@ratio]]>... [--select x,y,w,h] [--native] [--out path]";

struct Args {
    monitors: Vec<MonitorSpec>,
    select: Option<Rect>,
    native: bool,
    out: Option<PathBuf>,
}

fn parse_rect(s: &str) -> anyhow::Result<Rect> {
    let parts = s
        .split(',')
        .map(|v| v.trim().parse::<i32>())
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("invalid selection `{s}`"))?;
    let [x, y, w, h] = parts[..] else {
        bail!("selection `{s}` must be x,y,w,h");
    };
    if x.checked_add(w).is_none() || y.checked_add(h).is_none() {
        bail!("selection `{s}` is out of range");
    }
    Ok(Rect::from_xywh(x, y, w, h))
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        monitors: Vec::new(),
        select: None,
        native: false,
        out: None,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--select" => {
                let value = iter.next().context("--select needs x,y,w,h")?;
                args.select = Some(parse_rect(&value)?);
            }
            "--native" => args.native = true,
            "--out" => {
                args.out = Some(PathBuf::from(iter.next().context("--out needs a path")?));
            }
            "-h" | "--help" => {
                println!("{USAGE}");
                std::process::exit(0);
            }
            spec => args.monitors.push(spec.parse()?),
        }
    }
    if args.monitors.is_empty() {
        bail!("no monitor images given\n{USAGE}");
    }
    Ok(args)
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Config::load();
    let args = parse_args()?;

    let mut source = ImageFileSource::new(args.monitors);
    let canvas = capture_desktop(&mut source).context("cannot start capture session")?;
    let mut router = InteractionRouter::new(canvas, &config);

    if let Some(rect) = args.select {
        router.selection_mut().set_rect(rect);
    }

    let target = if args.native {
        ExportTarget::Native
    } else {
        ExportTarget::Canvas
    };
    let export = router.export(target);

    let path = args
        .out
        .unwrap_or_else(|| default_save_path(&config.save_folder, &config.file_extension));
    let mut sink = FileSink::for_path(path, &config)?;
    sink.accept(&export.image, export.crop)?;
    println!("{}", sink.path().display());

    router.close();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rect() {
        assert_eq!(parse_rect("10, 20,30,40").unwrap(), Rect::from_xywh(10, 20, 30, 40));
        assert!(parse_rect("1,2,3").is_err());
        assert!(parse_rect("a,b,c,d").is_err());
    }

    #[test]
    fn test_parse_rect_rejects_overflow() {
        assert!(parse_rect("2147483000,0,1000,10").is_err());
        assert!(parse_rect("0,-2147483000,10,-1000").is_err());
    }
}
