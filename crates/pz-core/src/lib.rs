pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod frequency_response;
pub mod presets;

use std::fmt;

use num_complex::Complex64;

pub use config::EditorConfig;
pub use controller::{Button, Controller, DragState, InputEvent, Outcome};
pub use error::{Error, Result};
pub use filter::PoleZeroSet;
pub use frequency_response::{DisplayScale, FrequencyResponse, MagnitudeClip};
pub use presets::Preset;

// ---------------------------------------------------------------------------
// Shared interface types — the render crate and the CLI build against these
// ---------------------------------------------------------------------------

/// A pole or zero location in the z-plane.
pub type Point = Complex64;

/// Which of the two point sets a location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Pole,
    Zero,
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Kind::Pole => f.write_str("pole"),
            Kind::Zero => f.write_str("zero"),
        }
    }
}

/// Snapshot handed to the renderer after every state change: the current
/// points plus the evaluated response over the unit circle.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Pole positions, in set order.
    pub poles: Vec<Point>,
    /// Zero positions, in set order.
    pub zeros: Vec<Point>,
    /// Evaluated response (frequencies, H, |H|, unwrapped phase).
    pub response: FrequencyResponse,
    /// Scale the magnitude view should use.
    pub scale: DisplayScale,
    /// Floor/ceiling substituted for degenerate magnitude samples.
    pub clip: MagnitudeClip,
}

impl Frame {
    /// Magnitude sequence transformed for the current display scale, with
    /// zero/infinite samples replaced by the clip limits.
    pub fn display_magnitude(&self) -> Vec<f64> {
        self.scale.apply(&self.response.magnitude, &self.clip)
    }

    /// Half-width of the square z-plane view that keeps every point visible.
    pub fn view_limit(&self) -> f64 {
        filter::view_limit(self.poles.iter().chain(self.zeros.iter()))
    }
}

/// The rendering collaborator. Receives one frame per state change.
pub trait FrameSink {
    fn render(&mut self, frame: &Frame);
}

/// Recording sink: keeps every frame in order.
impl FrameSink for Vec<Frame> {
    fn render(&mut self, frame: &Frame) {
        self.push(frame.clone());
    }
}

/// Evaluate a pole/zero set once and package the result as a frame.
///
/// Used by the controller after each edit and by the one-shot CLI paths.
pub fn compute(filter: &PoleZeroSet, config: &EditorConfig, scale: DisplayScale) -> Frame {
    let response = frequency_response::evaluate(filter.poles(), filter.zeros(), config.num_samples);

    Frame {
        poles: filter.poles().to_vec(),
        zeros: filter.zeros().to_vec(),
        response,
        scale,
        clip: config.clip(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_empty_filter_is_identity() {
        let config = EditorConfig::default();
        let frame = compute(&PoleZeroSet::default(), &config, DisplayScale::Linear);

        assert_eq!(frame.response.frequencies.len(), config.num_samples);
        for (i, (&m, &p)) in frame
            .response
            .magnitude
            .iter()
            .zip(frame.response.phase.iter())
            .enumerate()
        {
            assert!((m - 1.0).abs() < 1e-12, "magnitude at {i} should be 1, got {m}");
            assert!(p.abs() < 1e-12, "phase at {i} should be 0, got {p}");
        }
    }

    #[test]
    fn test_display_magnitude_follows_scale() {
        let config = EditorConfig::default();
        let filter = PoleZeroSet::new(vec![Point::new(0.5, 0.0)], vec![]);

        let linear = compute(&filter, &config, DisplayScale::Linear);
        let log = compute(&filter, &config, DisplayScale::Log);

        let lin = linear.display_magnitude();
        let db = log.display_magnitude();
        for i in 0..lin.len() {
            let expected = 20.0 * lin[i].log10();
            assert!(
                (db[i] - expected).abs() < 1e-9,
                "dB mismatch at {i}: {} vs {expected}",
                db[i]
            );
        }
    }

    #[test]
    fn test_recording_sink_keeps_frames() {
        let config = EditorConfig::default();
        let mut sink: Vec<Frame> = Vec::new();
        let frame = compute(&PoleZeroSet::default(), &config, DisplayScale::Log);
        sink.render(&frame);
        sink.render(&frame);
        assert_eq!(sink.len(), 2);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(Kind::Pole.to_string(), "pole");
        assert_eq!(Kind::Zero.to_string(), "zero");
    }
}
