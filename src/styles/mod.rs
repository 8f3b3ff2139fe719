//! # Style Presets
//!
//! A style selects which variant of the style-dependent edit rules fires.
//!
//! - **horror_truecrime** (default): camera shakes on dark chaotic shots and
//!   tension-point markers on dark, still shots
//! - **analog_horror**: glitches on dark chaotic shots and desync markers on
//!   dim shots with heavy motion
//!
//! ```rust
//! use deadcase_director::styles::StylePreset;
//!
//! assert_eq!(StylePreset::from_name_lenient("analog_horror"), StylePreset::AnalogHorror);
//! assert_eq!(StylePreset::from_name_lenient("vaporwave"), StylePreset::HorrorTruecrime);
//! ```

pub mod preset;

pub use preset::StylePreset;
