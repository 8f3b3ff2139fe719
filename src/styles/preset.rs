use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{ConfigError, DirectorError};

/// Named heuristic preset selecting which style-specific rule variants fire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StylePreset {
    /// Slow dread: tension markers on dark, still shots and camera shakes on chaos
    #[default]
    HorrorTruecrime,

    /// Found-footage tape look: glitches on chaos and desync markers on dark motion
    AnalogHorror,
}

impl StylePreset {
    /// Every built-in preset, default first
    pub const ALL: [StylePreset; 2] = [StylePreset::HorrorTruecrime, StylePreset::AnalogHorror];

    /// The name used on the command line and in config files
    pub fn name(&self) -> &'static str {
        match self {
            Self::HorrorTruecrime => "horror_truecrime",
            Self::AnalogHorror => "analog_horror",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::HorrorTruecrime => "Shakes on dark chaotic shots, tension points on dark still shots",
            Self::AnalogHorror => "Glitches on dark chaotic shots, desync markers on dim moving shots",
        }
    }

    /// Resolve a preset name, falling back to the default for anything unrecognized
    pub fn from_name_lenient(name: &str) -> Self {
        name.parse().unwrap_or_else(|_| {
            let fallback = Self::default();
            warn!("Unknown style '{}', using {}", name, fallback.name());
            fallback
        })
    }

    /// Names of all presets, for help text and diagnostics
    pub fn available_styles() -> Vec<&'static str> {
        Self::ALL.iter().map(|style| style.name()).collect()
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StylePreset {
    type Err = DirectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|style| style.name() == s.trim())
            .ok_or_else(|| {
                ConfigError::InvalidValue {
                    key: "director.style".to_string(),
                    value: s.to_string(),
                }
                .into()
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_styles_available() {
        let styles = StylePreset::available_styles();
        assert_eq!(styles, vec!["horror_truecrime", "analog_horror"]);
    }

    #[test]
    fn test_descriptions_name_the_style_marker() {
        assert!(StylePreset::HorrorTruecrime.description().contains("tension"));
        assert!(StylePreset::AnalogHorror.description().contains("desync"));
    }

    #[test]
    fn test_strict_parse() {
        assert_eq!("analog_horror".parse::<StylePreset>().unwrap(), StylePreset::AnalogHorror);
        assert!("vhs".parse::<StylePreset>().is_err());
    }

    #[test]
    fn test_unknown_style_falls_back_to_default() {
        assert_eq!(StylePreset::from_name_lenient("vhs"), StylePreset::HorrorTruecrime);
        assert_eq!(StylePreset::from_name_lenient(""), StylePreset::HorrorTruecrime);
        assert_eq!(StylePreset::from_name_lenient("analog_horror"), StylePreset::AnalogHorror);
    }

    #[test]
    fn test_serde_uses_snake_case_names() {
        let json = serde_json::to_string(&StylePreset::AnalogHorror).unwrap();
        assert_eq!(json, "\"analog_horror\"");
    }
}
