use tracing::{debug, info};

use crate::analysis::ShotRecord;
use crate::config::DirectorConfig;
use crate::director::event::EditEvent;
use crate::director::rules::{beat_markers, RuleContext, PAIR_RULES, SHOT_RULES};
use crate::styles::StylePreset;

/// Applies the editing heuristics to a shot list
///
/// Generation is a pure function of the shots, the style and the thresholds
/// in [`DirectorConfig`]; the same input always produces the same events.
#[derive(Debug, Clone, Default)]
pub struct EditRuleEngine {
    config: DirectorConfig,
}

impl EditRuleEngine {
    pub fn new(config: DirectorConfig) -> Self {
        Self { config }
    }

    /// Produce the time-sorted edit events for `shots`
    pub fn generate(&self, shots: &[ShotRecord], style: StylePreset) -> Vec<EditEvent> {
        let ctx = RuleContext { style, config: &self.config };
        let mut events = Vec::new();

        for (index, shot) in shots.iter().enumerate() {
            for (name, rule) in SHOT_RULES {
                if let Some(event) = rule(shot, &ctx) {
                    debug!("Shot {} [{:.2}-{:.2}]: {} -> {} at {:.2}s",
                           index, shot.start, shot.end, name, event.action, event.time);
                    events.push(event);
                }
            }

            if let Some(previous) = index.checked_sub(1).map(|i| &shots[i]) {
                for (name, rule) in PAIR_RULES {
                    if let Some(event) = rule(previous, shot, &ctx) {
                        debug!("Shot {} [{:.2}-{:.2}]: {} -> {} at {:.2}s",
                               index, shot.start, shot.end, name, event.action, event.time);
                        events.push(event);
                    }
                }
            }
        }

        let beats = beat_markers(shots, self.config.beat_interval);
        debug!("Placed {} beat markers every {:.2}s", beats.len(), self.config.beat_interval);
        events.extend(beats);

        // Stable: equal times keep emission order
        events.sort_by(|a, b| a.time.total_cmp(&b.time));

        info!("Generated {} edit events from {} shots ({} style)",
              events.len(), shots.len(), style);
        events
    }
}
