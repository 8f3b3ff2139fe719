//! # Shot Analysis
//!
//! Turns a grayscale frame stream into shots annotated with brightness and
//! motion. Boundaries come from 32-bin histogram correlation between
//! consecutive frames; motion is the mean absolute pixel difference.
//!
//! ```rust
//! use deadcase_director::analysis::ShotSegmenter;
//! use deadcase_director::video::Frame;
//!
//! let frames = (0..48).map(|i| Frame::new_filled(16, 16, if i < 24 { 20 } else { 230 }));
//! let shots = ShotSegmenter::default().segment_frames(frames, Some(24.0));
//! assert_eq!(shots.len(), 2);
//! ```

pub mod metrics;
pub mod segmenter;
pub mod shot;

pub use metrics::Histogram;
pub use segmenter::ShotSegmenter;
pub use shot::{Shot, ShotAccumulator, ShotRecord};
