//! Time and precision helpers shared by the pipeline stages.

/// Round to a fixed number of decimal places, ties to even
///
/// Shot boundaries at common frame rates land on exact ties (frame 15 at
/// 24 fps is 0.625 s), so the tie rule decides the persisted value.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round_ties_even() / scale
}

/// Seconds at which a frame index starts
pub fn frame_to_seconds(frame_index: usize, fps: f64) -> f64 {
    if fps > 0.0 {
        frame_index as f64 / fps
    } else {
        0.0
    }
}

/// Nearest frame index for a point in time; times before zero map to frame 0
pub fn seconds_to_frame(seconds: f64, fps: f64) -> u64 {
    let frame = (seconds * fps).round_ties_even();
    if frame.is_finite() && frame > 0.0 {
        frame as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(3.14159, 2), 3.14);
        assert_eq!(round_to(0.6666, 3), 0.667);
        assert_eq!(round_to(-1.005, 0), -1.0);
    }

    #[test]
    fn test_round_to_ties_go_to_even() {
        assert_eq!(round_to(0.625, 2), 0.62);
        assert_eq!(round_to(1.125, 2), 1.12);
        assert_eq!(round_to(0.375, 2), 0.38);
        assert_eq!(round_to(2.5, 0), 2.0);
    }

    #[test]
    fn test_frame_seconds_conversion() {
        assert_eq!(frame_to_seconds(48, 24.0), 2.0);
        assert_eq!(frame_to_seconds(10, 0.0), 0.0);
        assert_eq!(seconds_to_frame(2.5, 24.0), 60);
        assert_eq!(seconds_to_frame(1.0, 29.97), 30);
        assert_eq!(seconds_to_frame(-3.0, 24.0), 0);
        assert_eq!(seconds_to_frame(0.5, 5.0), 2);
    }
}
