//! Turns an edit map into coloured markers for an editing timeline.
//!
//! Planning is pure data: the markers carry everything a host application
//! needs to place them (frame, colour, name and a note with the full event).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::persist::EventRecord;
use crate::units::seconds_to_frame;

/// Marker colours, named the way editing hosts name them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerColor {
    Red,
    Yellow,
    Green,
    Blue,
}

impl MarkerColor {
    /// Colour for an action name; anything unrecognized is blue
    pub fn for_action(action: &str) -> Self {
        match action {
            "glitch" | "shake" => Self::Red,
            "flash" => Self::Yellow,
            "cut" => Self::Green,
            _ => Self::Blue,
        }
    }
}

impl fmt::Display for MarkerColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Red => "Red",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Blue => "Blue",
        };
        f.write_str(name)
    }
}

/// One marker to place on the timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineMarker {
    pub frame: u64,
    pub color: MarkerColor,
    pub name: String,
    pub note: String,
}

/// Plan one marker per event at `project_fps`
pub fn plan_markers(events: &[EventRecord], project_fps: f64) -> Vec<TimelineMarker> {
    let markers: Vec<TimelineMarker> = events
        .iter()
        .map(|event| plan_marker(event, project_fps))
        .collect();

    debug!("Planned {} markers at {:.3} fps", markers.len(), project_fps);
    markers
}

fn plan_marker(event: &EventRecord, project_fps: f64) -> TimelineMarker {
    let time = event.get("time").and_then(Value::as_f64).unwrap_or(0.0);
    let action = event.get("action").and_then(Value::as_str).unwrap_or("marker");
    let name = event
        .get("label")
        .and_then(Value::as_str)
        .unwrap_or(action);

    TimelineMarker {
        frame: seconds_to_frame(time, project_fps),
        color: MarkerColor::for_action(action),
        name: name.to_string(),
        note: Value::Object(event.clone()).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> EventRecord {
        match value {
            Value::Object(map) => map,
            other => panic!("not an object: {other}"),
        }
    }

    #[test]
    fn test_colours_by_action() {
        assert_eq!(MarkerColor::for_action("glitch"), MarkerColor::Red);
        assert_eq!(MarkerColor::for_action("shake"), MarkerColor::Red);
        assert_eq!(MarkerColor::for_action("flash"), MarkerColor::Yellow);
        assert_eq!(MarkerColor::for_action("cut"), MarkerColor::Green);
        assert_eq!(MarkerColor::for_action("marker"), MarkerColor::Blue);
        assert_eq!(MarkerColor::for_action("zoom"), MarkerColor::Blue);
    }

    #[test]
    fn test_plan_from_engine_events() {
        let events = vec![
            record(json!({"time": 0.0, "action": "shake", "duration": 0.3, "intensity": "medium"})),
            record(json!({"time": 6.0, "action": "flash", "duration": 0.2, "color": "white"})),
            record(json!({"time": 10.0, "action": "marker", "label": "beat"})),
        ];

        let markers = plan_markers(&events, 24.0);

        assert_eq!(markers.len(), 3);
        assert_eq!((markers[0].frame, markers[0].color), (0, MarkerColor::Red));
        assert_eq!(markers[0].name, "shake");
        assert_eq!((markers[1].frame, markers[1].color), (144, MarkerColor::Yellow));
        assert_eq!((markers[2].frame, markers[2].color), (240, MarkerColor::Blue));
        assert_eq!(markers[2].name, "beat");

        let note: Value = serde_json::from_str(&markers[1].note).unwrap();
        assert_eq!(note["color"], "white");
    }

    #[test]
    fn test_frame_rounds_to_nearest() {
        let events = vec![record(json!({"time": 1.01, "action": "cut"}))];
        assert_eq!(plan_markers(&events, 29.97)[0].frame, 30);
    }

    #[test]
    fn test_missing_fields() {
        let markers = plan_markers(&[record(json!({}))], 24.0);

        assert_eq!(markers[0].frame, 0);
        assert_eq!(markers[0].color, MarkerColor::Blue);
        assert_eq!(markers[0].name, "marker");
        assert_eq!(markers[0].note, "{}");
    }

    #[test]
    fn test_negative_time_clamps_to_first_frame() {
        let markers = plan_markers(&[record(json!({"time": -2.0, "action": "cut"}))], 24.0);
        assert_eq!(markers[0].frame, 0);
    }
}
