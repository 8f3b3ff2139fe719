use crate::video::Frame;

/// Mean intensity of a frame, normalized to 0.0-1.0
pub fn brightness(frame: &Frame) -> f64 {
    let pixels = frame.pixels();
    if pixels.is_empty() {
        return 0.0;
    }

    let sum: u64 = pixels.iter().map(|&p| p as u64).sum();
    sum as f64 / (pixels.len() as f64 * 255.0)
}

/// Mean absolute per-pixel difference between two frames, normalized to 0.0-1.0
///
/// Frames of different geometry cannot be compared pixel-wise and count as
/// a complete change.
pub fn motion(current: &Frame, previous: &Frame) -> f64 {
    if !current.same_size(previous) {
        return 1.0;
    }

    let pixels = current.pixels();
    if pixels.is_empty() {
        return 0.0;
    }

    let diff_sum: u64 = pixels
        .iter()
        .zip(previous.pixels())
        .map(|(&a, &b)| a.abs_diff(b) as u64)
        .sum();

    diff_sum as f64 / (pixels.len() as f64 * 255.0)
}

/// L2-normalized grayscale intensity histogram
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<f64>,
}

impl Histogram {
    /// Bin the frame's 0-255 intensities into `bins` equal-width buckets
    pub fn from_frame(frame: &Frame, bins: usize) -> Self {
        let bins = bins.clamp(1, 256);
        let mut counts = vec![0.0f64; bins];
        for &pixel in frame.pixels() {
            counts[pixel as usize * bins / 256] += 1.0;
        }

        let norm = counts.iter().map(|c| c * c).sum::<f64>().sqrt();
        if norm > 0.0 {
            for count in counts.iter_mut() {
                *count /= norm;
            }
        }

        Self { bins: counts }
    }

    pub fn bins(&self) -> &[f64] {
        &self.bins
    }

    /// Normalized cross-correlation of the two histograms (-1.0 to 1.0)
    ///
    /// Flat histograms have no variance to correlate; they are treated as a
    /// perfect match.
    pub fn correlation(&self, other: &Histogram) -> f64 {
        if self.bins == other.bins {
            return 1.0;
        }

        let n = self.bins.len().min(other.bins.len()) as f64;
        if n == 0.0 {
            return 1.0;
        }

        let (mut sum_a, mut sum_b) = (0.0, 0.0);
        let (mut sum_aa, mut sum_bb, mut sum_ab) = (0.0, 0.0, 0.0);
        for (&a, &b) in self.bins.iter().zip(&other.bins) {
            sum_a += a;
            sum_b += b;
            sum_aa += a * a;
            sum_bb += b * b;
            sum_ab += a * b;
        }

        let numerator = sum_ab - sum_a * sum_b / n;
        let variance = (sum_aa - sum_a * sum_a / n) * (sum_bb - sum_b * sum_b / n);
        if variance.abs() <= f64::EPSILON {
            return 1.0;
        }

        numerator / variance.sqrt()
    }

    /// `1 - correlation`: 0.0 for identical distributions, up to roughly 2.0
    pub fn dissimilarity(&self, other: &Histogram) -> f64 {
        1.0 - self.correlation(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Ramp over the lower half of the intensity range
    fn ramp_frame(offset: u8) -> Frame {
        let data: Vec<u8> = (0..64u8).map(|i| i * 2 + offset).collect();
        Frame::from_gray_bytes(8, 8, data).unwrap()
    }

    #[test]
    fn test_brightness_range() {
        assert_eq!(brightness(&Frame::new_filled(4, 4, 0)), 0.0);
        assert_eq!(brightness(&Frame::new_filled(4, 4, 255)), 1.0);
        assert!((brightness(&Frame::new_filled(4, 4, 51)) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_motion() {
        let dark = Frame::new_filled(4, 4, 0);
        let bright = Frame::new_filled(4, 4, 255);

        assert_eq!(motion(&dark, &dark), 0.0);
        assert_eq!(motion(&bright, &dark), 1.0);
        assert_eq!(motion(&Frame::new_filled(2, 2, 0), &dark), 1.0);
    }

    #[test]
    fn test_histogram_is_unit_length() {
        let hist = Histogram::from_frame(&ramp_frame(0), 32);
        let length: f64 = hist.bins().iter().map(|b| b * b).sum::<f64>().sqrt();

        assert_eq!(hist.bins().len(), 32);
        assert!((length - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_identical_frames_have_zero_dissimilarity() {
        let a = Histogram::from_frame(&ramp_frame(3), 32);
        let b = Histogram::from_frame(&ramp_frame(3), 32);
        assert_eq!(a.dissimilarity(&b), 0.0);

        let flat = Histogram::from_frame(&Frame::new_filled(8, 8, 128), 32);
        assert_eq!(flat.dissimilarity(&flat.clone()), 0.0);
    }

    #[test]
    fn test_disjoint_frames_are_maximally_dissimilar() {
        let dark = Histogram::from_frame(&Frame::new_filled(8, 8, 0), 32);
        let bright = Histogram::from_frame(&Frame::new_filled(8, 8, 255), 32);

        // Two single-bin histograms correlate at -1/(bins-1)
        let expected = 1.0 + 1.0 / 31.0;
        assert!((dark.dissimilarity(&bright) - expected).abs() < 1e-9);
        assert!(dark.dissimilarity(&bright) > 1.0);
    }

    #[test]
    fn test_small_shift_is_below_default_threshold() {
        let a = Histogram::from_frame(&ramp_frame(0), 32);
        let b = Histogram::from_frame(&ramp_frame(4), 32);
        assert!(a.dissimilarity(&b) > 0.0);
        assert!(a.dissimilarity(&b) < 0.45);
    }
}
