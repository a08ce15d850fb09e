//! Frame timing utilities.
//!
//! Frame rate is declared by the caller and never drives detection; it
//! only converts frame indices into human-readable timestamps.

/// Converts frame indices to seconds for a declared frame rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f64,
}

impl FrameClock {
    /// Create a clock. Returns `None` for non-finite or non-positive rates.
    pub fn new(fps: f64) -> Option<Self> {
        (fps.is_finite() && fps > 0.0).then_some(Self { fps })
    }

    /// Timestamp of the start of `frame_index`.
    pub fn frame_to_secs(&self, frame_index: usize) -> f64 {
        frame_index as f64 / self.fps
    }

    /// Format a frame's timestamp as `m:ss.mmm`.
    pub fn format_frame(&self, frame_index: usize) -> String {
        format_secs(self.frame_to_secs(frame_index))
    }
}

/// Format seconds as `m:ss.mmm`.
pub fn format_secs(secs: f64) -> String {
    let total_ms = (secs.max(0.0) * 1000.0).round() as u64;
    let minutes = total_ms / 60_000;
    let seconds = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;
    format!("{minutes}:{seconds:02}.{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_rates_rejected() {
        assert!(FrameClock::new(0.0).is_none());
        assert!(FrameClock::new(-30.0).is_none());
        assert!(FrameClock::new(f64::NAN).is_none());
        assert!(FrameClock::new(29.97).is_some());
    }

    #[test]
    fn test_frame_secs_conversion() {
        let clock = FrameClock::new(30.0).unwrap();
        assert!((clock.frame_to_secs(45) - 1.5).abs() < 1e-9);
    }

    #[test]
    fn test_format() {
        let clock = FrameClock::new(60.0).unwrap();
        assert_eq!(clock.format_frame(90), "0:01.500");
        assert_eq!(format_secs(75.25), "1:15.250");
    }
}
