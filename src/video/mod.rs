//! # Frame Sources
//!
//! Sequential grayscale frame access for the shot segmenter. Video files are
//! decoded by an external FFmpeg process; directories are treated as ordered
//! still-image sequences.

pub mod types;
pub mod source;

mod ffmpeg;
mod images;

use std::path::Path;

pub use types::{Frame, VideoMetadata};
pub use source::{FrameSource, MemoryFrameSource};
pub use ffmpeg::FfmpegFrameSource;
pub use images::{is_image_file, ImageSequenceSource};

use crate::config::AnalysisConfig;
use crate::error::{InputError, Result};

/// Open the right frame source for `path`
///
/// Directories become image sequences declaring `fps` (if given); anything
/// else is handed to FFmpeg, whose declared rate wins unless `fps` overrides it.
pub fn open_source<P: AsRef<Path>>(
    path: P,
    fps: Option<f64>,
    config: &AnalysisConfig,
) -> Result<Box<dyn FrameSource + Send>> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(InputError::NotFound {
            path: path.display().to_string(),
        }.into());
    }

    if path.is_dir() {
        let source = ImageSequenceSource::open(path, fps, config.decode_chunk_size)?;
        return Ok(Box::new(source));
    }

    let source = FfmpegFrameSource::open(path)?;
    match fps {
        Some(fps) => Ok(Box::new(FixedRate { inner: source, fps })),
        None => Ok(Box::new(source)),
    }
}

/// Overrides the frame rate a source declares
struct FixedRate<S> {
    inner: S,
    fps: f64,
}

impl<S: FrameSource> FrameSource for FixedRate<S> {
    fn fps(&self) -> Option<f64> {
        Some(self.fps)
    }

    fn next_frame(&mut self) -> Result<Option<Frame>> {
        self.inner.next_frame()
    }
}
