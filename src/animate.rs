//! Needle animation: a finite sequence of interpolation frames.
//!
//! The original dashboard animated by a callback that re-armed its own timer
//! until the step count ran out. Here "what value to show next" is an
//! explicit iterator and "when to show it" belongs to the app loop, which
//! sleeps [`FRAME_INTERVAL`] between frames. A newer observation simply
//! starts a new sequence from whatever value is currently displayed;
//! superseding an in-flight sequence mid-way is legal and needs no
//! cancellation machinery.

use std::time::Duration;

/// Number of interpolation steps per observed change (frames = steps + 1).
pub const FRAME_COUNT: u32 = 10;

/// Pause between interpolation frames; with [`FRAME_COUNT`] steps the whole
/// transition spans roughly half a second.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(50);

/// Linear interpolation from a displayed value to a newly observed target.
///
/// Yields `frames + 1` values: frame `k` of `N` is
/// `start + (end - start) * k / N`, beginning exactly at `start` and
/// terminating exactly at `end`.
#[derive(Debug, Clone)]
pub struct Interpolation {
    start: f64,
    end: f64,
    frames: u32,
    next: u32,
}

impl Interpolation {
    /// Creates a sequence of `frames + 1` values from `start` to `end`.
    #[must_use]
    pub fn new(start: f64, end: f64, frames: u32) -> Self {
        Self { start, end, frames: frames.max(1), next: 0 }
    }

    /// The target value this sequence terminates at.
    #[must_use]
    pub fn target(&self) -> f64 {
        self.end
    }
}

impl Iterator for Interpolation {
    type Item = f64;

    fn next(&mut self) -> Option<f64> {
        if self.next > self.frames {
            return None;
        }
        let k = self.next;
        self.next += 1;

        // The final frame lands on the target exactly, no float drift.
        if k == self.frames {
            return Some(self.end);
        }
        Some(self.start + (self.end - self.start) * f64::from(k) / f64::from(self.frames))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.frames + 1 - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Interpolation {}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_interpolation_boundary() {
        let values: Vec<f64> = Interpolation::new(20.0, 80.0, 10).collect();

        assert_eq!(values.len(), 11);
        assert_relative_eq!(values[0], 20.0);
        assert_relative_eq!(values[10], 80.0);
    }

    #[test]
    fn test_interpolation_monotone_ascending() {
        let values: Vec<f64> = Interpolation::new(20.0, 80.0, 10).collect();
        for pair in values.windows(2) {
            assert!(pair[1] >= pair[0], "sequence should move toward the target");
        }
    }

    #[test]
    fn test_interpolation_monotone_descending() {
        let values: Vec<f64> = Interpolation::new(80.0, 20.0, 10).collect();
        for pair in values.windows(2) {
            assert!(pair[1] <= pair[0]);
        }
    }

    #[test]
    fn test_interpolation_unchanged_value_is_flat() {
        // Gauge at 50% observes 50% again: 11 identical frames, no motion.
        let values: Vec<f64> = Interpolation::new(50.0, 50.0, 10).collect();

        assert_eq!(values.len(), 11);
        for v in values {
            assert_relative_eq!(v, 50.0);
        }
    }

    #[test]
    fn test_interpolation_midpoint() {
        let values: Vec<f64> = Interpolation::new(0.0, 100.0, 10).collect();
        assert_relative_eq!(values[5], 50.0);
    }

    #[test]
    fn test_interpolation_final_frame_exact() {
        // A target that does not land cleanly on binary fractions.
        let values: Vec<f64> = Interpolation::new(0.1, 0.3, 10).collect();
        assert_eq!(values[10].to_bits(), 0.3_f64.to_bits());
    }

    #[test]
    fn test_interpolation_exact_size() {
        let mut seq = Interpolation::new(0.0, 1.0, 10);
        assert_eq!(seq.len(), 11);
        seq.next();
        assert_eq!(seq.len(), 10);
    }

    #[test]
    fn test_interpolation_zero_frames_clamped() {
        // Degenerate frame count still yields start and end.
        let values: Vec<f64> = Interpolation::new(1.0, 2.0, 0).collect();
        assert_eq!(values.len(), 2);
        assert_relative_eq!(values[0], 1.0);
        assert_relative_eq!(values[1], 2.0);
    }

    #[test]
    fn test_supersede_starts_from_displayed_value() {
        // An interrupted sequence hands its last displayed value to the next
        // one, keeping motion visually continuous.
        let mut first = Interpolation::new(0.0, 100.0, 10);
        let displayed = first.nth(4).unwrap(); // interrupted at frame 4

        let second: Vec<f64> = Interpolation::new(displayed, 30.0, 10).collect();
        assert_relative_eq!(second[0], displayed);
        assert_relative_eq!(second[10], 30.0);
    }
}
