//! The independent heuristics that turn shot statistics into edit events.
//!
//! Every rule is a plain function of one shot (or one adjacent pair) and the
//! rule context. The only state carried across shots is the beat cursor.

use crate::analysis::ShotRecord;
use crate::config::DirectorConfig;
use crate::director::event::{EditEvent, MarkerLabel};
use crate::styles::StylePreset;

/// `horror_truecrime` tension points: dark and still
const TENSION_MAX_BRIGHTNESS: f64 = 0.35;
const TENSION_MAX_MOTION: f64 = 0.4;

/// `analog_horror` desync markers: dim and moving
const DESYNC_MAX_BRIGHTNESS: f64 = 0.5;
const DESYNC_MIN_MOTION: f64 = 0.5;
const DESYNC_OFFSET_RATIO: f64 = 0.7;
const DESYNC_MAX_OFFSET: f64 = 0.5;

/// Everything a rule may look at besides the shots themselves
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub style: StylePreset,
    pub config: &'a DirectorConfig,
}

/// A rule over a single shot
pub type ShotRule = fn(&ShotRecord, &RuleContext<'_>) -> Option<EditEvent>;

/// A rule over a shot and the one before it
pub type PairRule = fn(&ShotRecord, &ShotRecord, &RuleContext<'_>) -> Option<EditEvent>;

/// Per-shot rules in evaluation order
pub const SHOT_RULES: [(&str, ShotRule); 3] = [
    ("long_shot_cut", long_shot_cut),
    ("dark_chaotic", dark_chaotic),
    ("style_marker", style_marker),
];

/// Adjacent-pair rules, evaluated after the per-shot rules of the later shot
pub const PAIR_RULES: [(&str, PairRule); 1] = [
    ("brightness_flash", brightness_flash),
];

/// Long shots get a cut at their midpoint
pub fn long_shot_cut(shot: &ShotRecord, ctx: &RuleContext<'_>) -> Option<EditEvent> {
    let duration = shot.duration();
    (duration >= ctx.config.long_shot_min_duration)
        .then(|| EditEvent::cut(shot.start + duration / 2.0))
}

/// Dark, chaotic shots get a glitch (analog horror) or a camera shake
pub fn dark_chaotic(shot: &ShotRecord, ctx: &RuleContext<'_>) -> Option<EditEvent> {
    let dark_and_chaotic = shot.avg_brightness < ctx.config.dark_brightness
        && shot.motion > ctx.config.chaotic_motion;
    if !dark_and_chaotic {
        return None;
    }

    Some(match ctx.style {
        StylePreset::AnalogHorror => EditEvent::glitch(shot.start),
        StylePreset::HorrorTruecrime => EditEvent::shake(shot.start),
    })
}

/// Style-specific narrative marker
pub fn style_marker(shot: &ShotRecord, ctx: &RuleContext<'_>) -> Option<EditEvent> {
    match ctx.style {
        StylePreset::HorrorTruecrime => {
            (shot.avg_brightness < TENSION_MAX_BRIGHTNESS && shot.motion < TENSION_MAX_MOTION)
                .then(|| EditEvent::marker(shot.start, MarkerLabel::TensionPoint))
        }
        StylePreset::AnalogHorror => {
            (shot.motion > DESYNC_MIN_MOTION && shot.avg_brightness < DESYNC_MAX_BRIGHTNESS).then(|| {
                let offset = (shot.duration() * DESYNC_OFFSET_RATIO).min(DESYNC_MAX_OFFSET);
                EditEvent::marker(shot.start + offset, MarkerLabel::Desync)
            })
        }
    }
}

/// A sharp brightness increase from the previous shot gets a white flash
pub fn brightness_flash(
    previous: &ShotRecord,
    current: &ShotRecord,
    ctx: &RuleContext<'_>,
) -> Option<EditEvent> {
    let jump = current.avg_brightness - previous.avg_brightness;
    (jump > ctx.config.flash_jump).then(|| EditEvent::flash(current.start))
}

/// Monotonic cursor placing a beat marker at every multiple of the interval
///
/// Shots are offered in order; each multiple that falls inside a shot's
/// `[start, end)` range yields one marker and moves the cursor on. The cursor
/// never moves back, so no multiple is emitted twice.
#[derive(Debug, Clone)]
pub struct BeatCursor {
    next: f64,
    interval: f64,
}

impl BeatCursor {
    pub fn new(interval: f64) -> Self {
        Self { next: interval, interval }
    }

    /// Time of the next beat still to be placed
    pub fn next_beat(&self) -> f64 {
        self.next
    }

    /// Emit the beats that fall inside `shot` and advance past them
    pub fn advance(&mut self, shot: &ShotRecord) -> Vec<EditEvent> {
        let mut beats = Vec::new();
        if !(self.interval > 0.0) {
            return beats;
        }

        while shot.start <= self.next && self.next < shot.end {
            beats.push(EditEvent::marker(self.next, MarkerLabel::Beat));
            self.next += self.interval;
        }
        beats
    }
}

/// Fold the beat cursor over the whole shot sequence
pub fn beat_markers(shots: &[ShotRecord], interval: f64) -> Vec<EditEvent> {
    shots
        .iter()
        .fold((BeatCursor::new(interval), Vec::new()), |(mut cursor, mut events), shot| {
            events.extend(cursor.advance(shot));
            (cursor, events)
        })
        .1
}
