//! Edit rule engine: shot statistics in, timed edit events out.

pub mod engine;
pub mod event;
pub mod rules;

pub use engine::EditRuleEngine;
pub use event::{EditAction, EditEvent, Intensity, MarkerLabel};
pub use rules::{BeatCursor, RuleContext};
