//! Background image preprocessing.
//!
//! Raster images under `[images].input` are converted to WebP under
//! `[images].output`, mirroring relative paths. Anything wider than
//! `max_width` is downscaled. Outputs newer than their source are skipped.
//!
//! The task runs on its own thread and never reports failure to the caller.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use image::{ImageFormat, imageops::FilterType};
use jwalk::WalkDir;
use rayon::prelude::*;

use crate::config::ConductorConfig;

/// Source extensions handled by the preprocessor.
const RASTER_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Outcome counts of one preprocessing run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImageStats {
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct ImageJob {
    input: PathBuf,
    output: PathBuf,
    max_width: u32,
}

impl ImageJob {
    pub fn new(config: &ConductorConfig) -> Self {
        Self {
            input: config.root_join(&config.images.input),
            output: config.root_join(&config.images.output),
            max_width: config.images.max_width,
        }
    }

    /// Start the run on a background thread, creating the input directory
    /// first. Returns `None` when preprocessing is disabled.
    pub fn spawn(config: &ConductorConfig) -> Option<JoinHandle<()>> {
        if !config.images.enable {
            return None;
        }

        let job = Self::new(config);
        if let Err(e) = fs::create_dir_all(&job.input) {
            crate::error!("images"; "failed to create {}: {}", job.input.display(), e);
        }

        let spawned = std::thread::Builder::new()
            .name("images".into())
            .spawn(move || match job.run() {
                Ok(stats) if stats.converted + stats.failed > 0 => {
                    crate::log!("images"; "converted {}, skipped {}, failed {}",
                        stats.converted, stats.skipped, stats.failed);
                }
                Ok(_) => crate::debug!("images"; "nothing to convert"),
                Err(e) => crate::error!("images"; "initial processing failed: {:#}", e),
            });
        match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                crate::error!("images"; "failed to start preprocessing: {}", e);
                None
            }
        }
    }

    /// Convert every stale image. Per-file failures are counted, not returned.
    pub fn run(&self) -> Result<ImageStats> {
        if !self.input.is_dir() {
            return Ok(ImageStats::default());
        }

        let sources = collect_sources(&self.input);
        let converted = AtomicUsize::new(0);
        let skipped = AtomicUsize::new(0);
        let failed = AtomicUsize::new(0);

        sources.par_iter().for_each(|src| {
            let dst = self.output_path(src);
            if is_up_to_date(src, &dst) {
                skipped.fetch_add(1, Ordering::Relaxed);
                return;
            }
            match convert(src, &dst, self.max_width) {
                Ok(()) => {
                    converted.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    crate::error!("images"; "{}: {:#}", src.display(), e);
                    failed.fetch_add(1, Ordering::Relaxed);
                }
            }
        });

        Ok(ImageStats {
            converted: converted.into_inner(),
            skipped: skipped.into_inner(),
            failed: failed.into_inner(),
        })
    }

    /// `<output>/<relative dir>/<stem>.webp`
    fn output_path(&self, src: &Path) -> PathBuf {
        let relative = src.strip_prefix(&self.input).unwrap_or(src);
        self.output.join(relative).with_extension("webp")
    }
}

fn collect_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| RASTER_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        })
        .collect()
}

fn is_up_to_date(src: &Path, dst: &Path) -> bool {
    let modified = |p: &Path| fs::metadata(p).and_then(|m| m.modified()).ok();
    match (modified(src), modified(dst)) {
        (Some(src), Some(dst)) => dst >= src,
        _ => false,
    }
}

fn convert(src: &Path, dst: &Path, max_width: u32) -> Result<()> {
    let mut img = image::open(src).with_context(|| format!("failed to decode {}", src.display()))?;
    if max_width > 0 && img.width() > max_width {
        img = img.resize(max_width, u32::MAX, FilterType::Lanczos3);
    }

    if let Some(parent) = dst.parent() {
        fs::create_dir_all(parent)?;
    }
    image::DynamicImage::ImageRgba8(img.to_rgba8())
        .save_with_format(dst, ImageFormat::WebP)
        .with_context(|| format!("failed to write {}", dst.display()))
}
