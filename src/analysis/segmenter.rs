use tracing::{debug, info};

use crate::analysis::metrics::{brightness, motion, Histogram};
use crate::analysis::shot::{Shot, ShotAccumulator};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::video::{Frame, FrameSource};

/// Splits a frame stream into shots at sudden global appearance changes
///
/// A cut is declared when the histogram dissimilarity between consecutive
/// frames exceeds `cut_threshold` and the open shot has already collected
/// `min_shot_frames` frames. Brightness and motion are accumulated per shot.
#[derive(Debug, Clone, Default)]
pub struct ShotSegmenter {
    config: AnalysisConfig,
}

impl ShotSegmenter {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Drain `source` and return its shots in order
    ///
    /// An empty stream yields no shots. Errors come only from the source.
    pub fn segment<S: FrameSource + ?Sized>(&self, source: &mut S) -> Result<Vec<Shot>> {
        let mut scan = Scan::new(&self.config, source.fps());
        while let Some(frame) = source.next_frame()? {
            scan.push(frame);
        }
        Ok(scan.finish())
    }

    /// Segment frames that are already in memory
    pub fn segment_frames<I>(&self, frames: I, fps: Option<f64>) -> Vec<Shot>
    where
        I: IntoIterator<Item = Frame>,
    {
        let mut scan = Scan::new(&self.config, fps);
        for frame in frames {
            scan.push(frame);
        }
        scan.finish()
    }
}

/// Per-stream segmentation state
struct Scan {
    fps: f64,
    min_shot_frames: usize,
    cut_threshold: f64,
    bins: usize,
    shots: Vec<Shot>,
    current: Option<ShotAccumulator>,
    previous: Option<(Frame, Histogram)>,
    index: usize,
}

impl Scan {
    fn new(config: &AnalysisConfig, declared_fps: Option<f64>) -> Self {
        let fps = config.effective_fps(declared_fps);
        let min_shot_frames = config.min_shot_frames(fps);

        debug!("Segmenting at {:.3} fps, threshold {:.2}, minimum shot {} frames",
               fps, config.cut_threshold, min_shot_frames);

        Self {
            fps,
            min_shot_frames,
            cut_threshold: config.cut_threshold,
            bins: config.histogram_bins,
            shots: Vec::new(),
            current: None,
            previous: None,
            index: 0,
        }
    }

    fn push(&mut self, frame: Frame) {
        let histogram = Histogram::from_frame(&frame, self.bins);

        let Some((previous, previous_histogram)) = self.previous.take() else {
            // First frame opens the first shot; there is nothing to diff against yet
            let mut shot = ShotAccumulator::new(0, self.fps);
            shot.accumulate(brightness(&frame), 0.0);
            self.current = Some(shot);
            self.previous = Some((frame, histogram));
            return;
        };

        self.index += 1;
        let index = self.index;
        let fps = self.fps;
        let current = self.current.get_or_insert_with(|| ShotAccumulator::new(index, fps));
        current.accumulate(brightness(&frame), motion(&frame, &previous));

        let distance = histogram.dissimilarity(&previous_histogram);
        if distance > self.cut_threshold && current.frames() >= self.min_shot_frames {
            let closed = std::mem::replace(current, ShotAccumulator::new(index, fps));
            debug!("Cut at frame {} ({:.2}s), dissimilarity {:.3}",
                   index, index as f64 / fps, distance);
            self.shots.push(closed.finalize(index));
        }

        self.previous = Some((frame, histogram));
    }

    fn finish(mut self) -> Vec<Shot> {
        if let Some(current) = self.current.take() {
            self.shots.push(current.finalize(self.index + 1));
            info!("Detected {} shots over {} frames", self.shots.len(), self.index + 1);
        } else {
            info!("Frame stream was empty; no shots detected");
        }
        self.shots
    }
}
