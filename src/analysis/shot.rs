use serde::{Deserialize, Serialize};

use crate::units::{frame_to_seconds, round_to};

/// Running totals for the shot currently open in the segmenter
#[derive(Debug, Clone)]
pub struct ShotAccumulator {
    start_frame: usize,
    fps: f64,
    brightness_sum: f64,
    motion_sum: f64,
    frames: usize,
}

impl ShotAccumulator {
    pub fn new(start_frame: usize, fps: f64) -> Self {
        Self {
            start_frame,
            fps,
            brightness_sum: 0.0,
            motion_sum: 0.0,
            frames: 0,
        }
    }

    /// Fold one frame's measurements into the totals
    pub fn accumulate(&mut self, brightness: f64, motion: f64) {
        self.brightness_sum += brightness;
        self.motion_sum += motion;
        self.frames += 1;
    }

    /// Frames accumulated so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Close the shot at `end_frame` (exclusive)
    pub fn finalize(self, end_frame: usize) -> Shot {
        Shot {
            start_frame: self.start_frame,
            end_frame,
            fps: self.fps,
            brightness_sum: self.brightness_sum,
            motion_sum: self.motion_sum,
            frames: self.frames,
        }
    }
}

/// A closed shot: the half-open frame range `[start_frame, end_frame)` and its totals
#[derive(Debug, Clone, PartialEq)]
pub struct Shot {
    start_frame: usize,
    end_frame: usize,
    fps: f64,
    brightness_sum: f64,
    motion_sum: f64,
    frames: usize,
}

impl Shot {
    pub fn start_frame(&self) -> usize {
        self.start_frame
    }

    pub fn end_frame(&self) -> usize {
        self.end_frame
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Frames whose measurements went into this shot
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Start time in seconds
    pub fn start(&self) -> f64 {
        frame_to_seconds(self.start_frame, self.fps)
    }

    /// End time in seconds
    pub fn end(&self) -> f64 {
        frame_to_seconds(self.end_frame, self.fps)
    }

    /// Mean brightness over the accumulated frames (0.0-1.0)
    pub fn avg_brightness(&self) -> f64 {
        (self.brightness_sum / self.frames.max(1) as f64).clamp(0.0, 1.0)
    }

    /// Mean frame-to-frame motion, clamped to 1.0
    pub fn motion(&self) -> f64 {
        (self.motion_sum / self.frames.max(1) as f64).clamp(0.0, 1.0)
    }

    /// The persisted form handed to the edit rule engine
    pub fn to_record(&self) -> ShotRecord {
        ShotRecord {
            start: round_to(self.start(), 2),
            end: round_to(self.end(), 2),
            avg_brightness: round_to(self.avg_brightness(), 3),
            motion: round_to(self.motion(), 3),
        }
    }
}

/// One entry of a shots file
///
/// Times are seconds rounded to centiseconds; brightness and motion are
/// rounded to three decimals. Fields missing from a hand-edited file read as 0.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ShotRecord {
    pub start: f64,
    pub end: f64,
    pub avg_brightness: f64,
    pub motion: f64,
}

impl ShotRecord {
    pub fn new(start: f64, end: f64, avg_brightness: f64, motion: f64) -> Self {
        Self { start, end, avg_brightness, motion }
    }

    /// Length in seconds, never negative
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_and_finalize() {
        let mut acc = ShotAccumulator::new(24, 24.0);
        acc.accumulate(0.5, 0.0);
        acc.accumulate(0.7, 0.2);
        assert_eq!(acc.frames(), 2);

        let shot = acc.finalize(72);
        assert_eq!(shot.start(), 1.0);
        assert_eq!(shot.end(), 3.0);
        assert!((shot.avg_brightness() - 0.6).abs() < 1e-12);
        assert!((shot.motion() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_empty_accumulator_reports_zero() {
        let shot = ShotAccumulator::new(10, 24.0).finalize(11);
        assert_eq!(shot.frames(), 0);
        assert_eq!(shot.avg_brightness(), 0.0);
        assert_eq!(shot.motion(), 0.0);
    }

    #[test]
    fn test_motion_is_clamped() {
        let mut acc = ShotAccumulator::new(0, 24.0);
        acc.accumulate(0.2, 1.5);
        assert_eq!(acc.finalize(1).motion(), 1.0);
    }

    #[test]
    fn test_record_rounding() {
        let mut acc = ShotAccumulator::new(0, 30.0);
        acc.accumulate(0.123456, 0.654321);
        let record = acc.finalize(100).to_record();

        assert_eq!(record, ShotRecord::new(0.0, 3.33, 0.123, 0.654));
    }

    #[test]
    fn test_record_times_on_exact_ties() {
        // 15/24 = 0.625 and 27/24 = 1.125 are exact in binary
        let record = ShotAccumulator::new(15, 24.0).finalize(27).to_record();
        assert_eq!((record.start, record.end), (0.62, 1.12));
    }

    #[test]
    fn test_record_missing_fields_default_to_zero() {
        let record: ShotRecord = serde_json::from_str(r#"{ "start": 1.5 }"#).unwrap();
        assert_eq!(record, ShotRecord::new(1.5, 0.0, 0.0, 0.0));
        assert_eq!(record.duration(), 0.0);
    }
}
