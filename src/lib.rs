//! # Deadcase Director
//!
//! Offline shot detection and heuristic edit-map generation for horror and
//! true-crime footage.
//!
//! The pipeline has two stages joined by a JSON shots file:
//!
//! 1. [`analysis`] reads frames from a [`video`] source and splits them into
//!    shots, measuring average brightness and motion for each.
//! 2. [`director`] applies a fixed set of editing heuristics to the shots and
//!    produces a time-sorted list of edit events (cuts, glitches, shakes,
//!    flashes and markers).
//!
//! [`timeline`] turns an edit map into coloured markers for an editing host.
//!
//! ## Quick Start
//!
//! ```rust
//! use deadcase_director::{
//!     analysis::ShotSegmenter,
//!     director::EditRuleEngine,
//!     styles::StylePreset,
//!     video::Frame,
//! };
//!
//! // Five dark seconds followed by a bright one, at 24 fps
//! let frames = (0..144).map(|i| Frame::new_filled(32, 18, if i < 120 { 15 } else { 220 }));
//! let shots: Vec<_> = ShotSegmenter::default()
//!     .segment_frames(frames, Some(24.0))
//!     .iter()
//!     .map(|shot| shot.to_record())
//!     .collect();
//!
//! let events = EditRuleEngine::default().generate(&shots, StylePreset::HorrorTruecrime);
//! assert!(events.windows(2).all(|pair| pair[0].time <= pair[1].time));
//! ```
//!
//! ## Architecture
//!
//! - [`video`] - Frame sources (FFmpeg, image sequences, memory)
//! - [`analysis`] - Frame metrics and shot segmentation
//! - [`director`] - Edit rules and the rule engine
//! - [`timeline`] - Timeline marker planning
//! - [`styles`] - Style presets
//! - [`config`] - Configuration management
//! - [`persist`] - Shots and edit map files
//! - [`pipeline`] - File-to-file stages behind the CLI

pub mod analysis;
pub mod config;
pub mod director;
pub mod error;
pub mod persist;
pub mod pipeline;
pub mod styles;
pub mod timeline;
pub mod units;
pub mod video;

// Re-export commonly used types for convenience
pub use crate::{
    analysis::{ShotRecord, ShotSegmenter},
    config::Config,
    director::{EditEvent, EditRuleEngine},
    error::{DirectorError, Result},
    styles::StylePreset,
    timeline::{plan_markers, TimelineMarker},
};
