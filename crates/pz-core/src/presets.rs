use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::filter::PoleZeroSet;
use crate::Point;

/// Built-in example filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Zeros at ±j: notch at ω = ±π/2.
    Notch,
    /// Poles at ±0.9j: resonant peak at ω = ±π/2.
    Resonator,
    /// Pole at 0.8, zero at −1.
    Lowpass,
    /// Poles at 0.9·e^{±jπ/4}, zeros at ±1.
    Bandpass,
    /// Poles at 0.8·e^{±jπ/3}, zeros at ±1 and ±j.
    Composite,
    /// Starting layout of the interactive editor.
    Editor,
}

impl Preset {
    pub const ALL: [Preset; 6] = [
        Preset::Notch,
        Preset::Resonator,
        Preset::Lowpass,
        Preset::Bandpass,
        Preset::Composite,
        Preset::Editor,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Notch => "notch",
            Preset::Resonator => "resonator",
            Preset::Lowpass => "lowpass",
            Preset::Bandpass => "bandpass",
            Preset::Composite => "composite",
            Preset::Editor => "editor",
        }
    }

    pub fn filter(self) -> PoleZeroSet {
        let re = |x: f64| Point::new(x, 0.0);
        let im = |y: f64| Point::new(0.0, y);

        match self {
            Preset::Notch => PoleZeroSet::new(vec![], vec![im(1.0), im(-1.0)]),
            Preset::Resonator => PoleZeroSet::new(vec![im(0.9), im(-0.9)], vec![]),
            Preset::Lowpass => PoleZeroSet::new(vec![re(0.8)], vec![re(-1.0)]),
            Preset::Bandpass => PoleZeroSet::new(
                vec![Point::from_polar(0.9, PI / 4.0), Point::from_polar(0.9, -PI / 4.0)],
                vec![re(1.0), re(-1.0)],
            ),
            Preset::Composite => PoleZeroSet::new(
                vec![Point::from_polar(0.8, PI / 3.0), Point::from_polar(0.8, -PI / 3.0)],
                vec![re(1.0), re(-1.0), im(1.0), im(-1.0)],
            ),
            Preset::Editor => PoleZeroSet::new(
                vec![Point::new(0.5, 0.5), re(-0.8)],
                vec![im(1.0), im(-1.0)],
            ),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownPreset(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frequency_response::evaluate;

    #[test]
    fn test_names_round_trip() {
        for preset in Preset::ALL {
            assert_eq!(preset.name().parse::<Preset>().unwrap(), preset);
        }
        assert!(matches!("highshelf".parse::<Preset>(), Err(Error::UnknownPreset(_))));
    }

    #[test]
    fn test_notch_nulls_quarter_rate() {
        let n = 512;
        let filter = Preset::Notch.filter();
        let r = evaluate(filter.poles(), filter.zeros(), n);
        assert!(r.magnitude[n / 4] < 1e-12);
        assert!(r.magnitude[3 * n / 4] < 1e-12);
    }

    #[test]
    fn test_resonator_peaks_at_quarter_rate() {
        let n = 512;
        let filter = Preset::Resonator.filter();
        let r = evaluate(filter.poles(), filter.zeros(), n);
        let peak = r.magnitude.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        for i in [n / 4, 3 * n / 4] {
            assert!(
                (r.magnitude[i] - peak).abs() < 1e-9 * peak,
                "peak {peak} should sit at ω = ±π/2, got {} at {i}",
                r.magnitude[i]
            );
        }
    }

    #[test]
    fn test_lowpass_passes_dc_blocks_nyquist() {
        let n = 512;
        let filter = Preset::Lowpass.filter();
        let r = evaluate(filter.poles(), filter.zeros(), n);
        // (1 + 1) / (1 − 0.8) at DC
        assert!((r.magnitude[n / 2] - 10.0).abs() < 1e-9, "DC gain {}", r.magnitude[n / 2]);
        assert!(r.magnitude[0] < 1e-12, "Nyquist gain {}", r.magnitude[0]);
    }

    #[test]
    fn test_presets_are_finite() {
        for preset in Preset::ALL {
            let filter = preset.filter();
            assert!(
                PoleZeroSet::from_points(filter.poles().to_vec(), filter.zeros().to_vec()).is_ok(),
                "{preset} contains non-finite points"
            );
        }
    }
}
