use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::round_to;

/// What an edit event asks the editor to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditAction {
    Cut,
    Glitch,
    Shake,
    Flash,
    Marker,
}

impl EditAction {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Cut => "cut",
            Self::Glitch => "glitch",
            Self::Shake => "shake",
            Self::Flash => "flash",
            Self::Marker => "marker",
        }
    }
}

impl fmt::Display for EditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Strength of a shake or glitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    Medium,
    High,
}

/// Narrative label carried by marker events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerLabel {
    TensionPoint,
    Desync,
    Beat,
}

/// A timed editing instruction
///
/// `time` is seconds rounded to centiseconds when the event is created.
/// Optional fields are only present for the actions that use them and are
/// left out of the JSON entirely otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditEvent {
    pub time: f64,
    pub action: EditAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<Intensity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<MarkerLabel>,
}

impl EditEvent {
    fn at(time: f64, action: EditAction) -> Self {
        Self {
            time: round_to(time, 2),
            action,
            duration: None,
            intensity: None,
            color: None,
            label: None,
        }
    }

    pub fn cut(time: f64) -> Self {
        Self::at(time, EditAction::Cut)
    }

    pub fn glitch(time: f64) -> Self {
        Self {
            duration: Some(0.4),
            intensity: Some(Intensity::High),
            ..Self::at(time, EditAction::Glitch)
        }
    }

    pub fn shake(time: f64) -> Self {
        Self {
            duration: Some(0.3),
            intensity: Some(Intensity::Medium),
            ..Self::at(time, EditAction::Shake)
        }
    }

    /// A short white flash
    pub fn flash(time: f64) -> Self {
        Self {
            duration: Some(0.2),
            color: Some("white".to_string()),
            ..Self::at(time, EditAction::Flash)
        }
    }

    pub fn marker(time: f64, label: MarkerLabel) -> Self {
        Self {
            label: Some(label),
            ..Self::at(time, EditAction::Marker)
        }
    }
}
