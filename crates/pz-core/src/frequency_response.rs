use num_complex::Complex64;
use serde::Deserialize;
use std::f64::consts::{PI, TAU};

use crate::Point;

/// Sampled frequency response of a pole/zero filter along the unit circle.
#[derive(Debug, Clone, Default)]
pub struct FrequencyResponse {
    /// Angular frequencies in rad/sample, uniformly spaced over [−π, π).
    pub frequencies: Vec<f64>,
    /// Complex response H(e^{jω}) at each frequency.
    pub response: Vec<Complex64>,
    /// |H(e^{jω})|. `f64::INFINITY` where a pole sits exactly on the sample.
    pub magnitude: Vec<f64>,
    /// Unwrapped ∠H(e^{jω}) in radians.
    pub phase: Vec<f64>,
}

/// Angular frequencies `ω_k = −π + 2πk/n` for `k` in `0..n`.
pub fn sample_frequencies(n: usize) -> Vec<f64> {
    (0..n).map(|k| -PI + TAU * k as f64 / n as f64).collect()
}

/// Product of `(1 − r·e^{−jω})` over every root; 1 when there are none.
fn factor_product(roots: &[Point], e_minus_jw: Complex64) -> Complex64 {
    roots
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, &r| acc * (1.0 - r * e_minus_jw))
}

/// Sum of `arg(1 − r·e^{−jω})` over every root.
///
/// Each factor's angle is fixed by its own root, so the sum does not depend on
/// the order of `roots` beyond rounding. The angle of the accumulated product
/// does: it can land on either side of the ±π cut.
fn factor_angle(roots: &[Point], e_minus_jw: Complex64) -> f64 {
    roots.iter().map(|&r| (1.0 - r * e_minus_jw).arg()).sum()
}

/// Evaluate
///
/// ```text
///            ∏ (1 − z·e^{−jω})
/// H(e^{jω}) = ─────────────────
///            ∏ (1 − p·e^{−jω})
/// ```
///
/// at `n` frequencies over [−π, π).
///
/// A denominator that is exactly zero yields `INFINITY` as the magnitude and
/// `INFINITY + 0j` as the response value. The phase stays defined because it
/// is the sum of zero-factor angles minus the sum of pole-factor angles, and a
/// vanishing factor contributes `arg(0) = 0`.
pub fn evaluate(poles: &[Point], zeros: &[Point], n: usize) -> FrequencyResponse {
    let frequencies = sample_frequencies(n);

    let mut response = Vec::with_capacity(n);
    let mut magnitude = Vec::with_capacity(n);
    let mut phase = Vec::with_capacity(n);

    for &omega in &frequencies {
        let e_minus_jw = Complex64::from_polar(1.0, -omega);
        let num = factor_product(zeros, e_minus_jw);
        let den = factor_product(poles, e_minus_jw);

        let den_norm = den.norm();
        if den_norm == 0.0 {
            response.push(Complex64::new(f64::INFINITY, 0.0));
            magnitude.push(f64::INFINITY);
        } else {
            response.push(num / den);
            magnitude.push(num.norm() / den_norm);
        }

        phase.push(factor_angle(zeros, e_minus_jw) - factor_angle(poles, e_minus_jw));
    }

    unwrap_phase(&mut phase);

    FrequencyResponse {
        frequencies,
        response,
        magnitude,
        phase,
    }
}

/// Remove artificial 2π jumps from a phase sequence in place.
///
/// Whenever two consecutive samples differ by π or more, the multiple of 2π
/// that brings the difference back into [−π, π) is added to that sample and
/// every later one.
pub fn unwrap_phase(phase: &mut [f64]) {
    let Some(&first) = phase.first() else {
        return;
    };

    let mut prev = first;
    let mut correction = 0.0;

    for value in phase.iter_mut().skip(1) {
        let raw = *value;
        let delta = raw - prev;

        if delta.abs() >= PI {
            let mut folded = (delta + PI).rem_euclid(TAU) - PI;
            // keep the direction of an exact ±π jump
            if folded == -PI && delta > 0.0 {
                folded = PI;
            }
            correction += folded - delta;
        }

        prev = raw;
        *value = raw + correction;
    }
}

/// 20·log10(m). Zero maps to −∞ and infinity to +∞; neither panics.
pub fn magnitude_db(magnitude: f64) -> f64 {
    20.0 * magnitude.log10()
}

/// Display scale for the magnitude view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayScale {
    #[default]
    Log,
    Linear,
}

impl DisplayScale {
    pub fn toggled(self) -> Self {
        match self {
            DisplayScale::Log => DisplayScale::Linear,
            DisplayScale::Linear => DisplayScale::Log,
        }
    }

    /// Axis label for the magnitude view.
    pub fn label(self) -> &'static str {
        match self {
            DisplayScale::Log => "|H| (dB)",
            DisplayScale::Linear => "|H|",
        }
    }

    /// Transform a magnitude sequence for display.
    ///
    /// Finite values are passed through (or converted to dB) unchanged; only
    /// degenerate samples are replaced by the clip limits.
    pub fn apply(self, magnitude: &[f64], clip: &MagnitudeClip) -> Vec<f64> {
        match self {
            DisplayScale::Linear => magnitude
                .iter()
                .map(|&m| if m.is_finite() { m } else { clip.max_linear })
                .collect(),
            DisplayScale::Log => magnitude
                .iter()
                .map(|&m| {
                    let db = magnitude_db(m);
                    if db.is_finite() {
                        db
                    } else if db > 0.0 {
                        clip.max_db
                    } else {
                        clip.min_db
                    }
                })
                .collect(),
        }
    }
}

impl std::str::FromStr for DisplayScale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "log" | "db" => Ok(DisplayScale::Log),
            "linear" | "lin" => Ok(DisplayScale::Linear),
            other => Err(format!("unknown scale `{other}` (expected `log` or `linear`)")),
        }
    }
}

/// Values substituted for zero or infinite magnitudes before display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagnitudeClip {
    /// dB floor, used for |H| = 0.
    pub min_db: f64,
    /// dB ceiling, used for |H| = ∞.
    pub max_db: f64,
    /// Linear ceiling, used for |H| = ∞.
    pub max_linear: f64,
}

impl Default for MagnitudeClip {
    fn default() -> Self {
        Self {
            min_db: -60.0,
            max_db: 30.0,
            max_linear: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    const N: usize = 512;

    /// Fold an angle into (−π, π].
    fn wrap_phase(angle: f64) -> f64 {
        let wrapped = (angle + PI).rem_euclid(TAU) - PI;
        if wrapped == -PI {
            PI
        } else {
            wrapped
        }
    }

    #[test]
    fn test_frequencies_uniform_over_half_open_interval() {
        let w = sample_frequencies(N);
        assert_eq!(w.len(), N);
        assert_abs_diff_eq!(w[0], -PI, epsilon = 1e-15);
        assert!(*w.last().unwrap() < PI, "last sample must stay below π");

        let step = TAU / N as f64;
        for i in 1..w.len() {
            let spacing = w[i] - w[i - 1];
            assert!(
                (spacing - step).abs() < 1e-12,
                "spacing at {i} should be {step}, got {spacing}"
            );
        }
        assert_eq!(w[N / 2], 0.0, "ω = 0 must be sampled exactly");
    }

    #[test]
    fn test_empty_sets_are_identity() {
        let r = evaluate(&[], &[], N);
        for i in 0..N {
            assert_abs_diff_eq!(r.response[i].re, 1.0, epsilon = 1e-15);
            assert_abs_diff_eq!(r.response[i].im, 0.0, epsilon = 1e-15);
            assert_abs_diff_eq!(r.magnitude[i], 1.0, epsilon = 1e-15);
            assert_abs_diff_eq!(r.phase[i], 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_zero_at_origin_is_noop() {
        let r = evaluate(&[], &[Point::new(0.0, 0.0)], N);
        for (i, &m) in r.magnitude.iter().enumerate() {
            assert!((m - 1.0).abs() < 1e-15, "magnitude at {i} = {m}");
        }
    }

    #[test]
    fn test_single_real_pole() {
        let r = evaluate(&[Point::new(0.5, 0.0)], &[], N);

        // ω = 0 → 1/(1 − 0.5)
        assert_abs_diff_eq!(r.magnitude[N / 2], 2.0, epsilon = 1e-12);
        // ω = −π (same as π for a real pole) → 1/(1 + 0.5)
        assert_abs_diff_eq!(r.magnitude[0], 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_conjugate_zeros_notch_at_quarter_rate() {
        let r = evaluate(&[], &[Point::new(0.0, 1.0), Point::new(0.0, -1.0)], N);
        // ω = ±π/2 lands on indices N/4 and 3N/4
        assert!(r.magnitude[N / 4] < 1e-12, "notch at −π/2: {}", r.magnitude[N / 4]);
        assert!(r.magnitude[3 * N / 4] < 1e-12, "notch at π/2: {}", r.magnitude[3 * N / 4]);
        assert_abs_diff_eq!(r.magnitude[N / 2], 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_pole_on_sample_gives_infinite_sentinel() {
        let r = evaluate(&[Point::new(1.0, 0.0)], &[], N);
        assert_eq!(r.magnitude[N / 2], f64::INFINITY);
        assert!(r.response[N / 2].re.is_infinite());
        assert!(r.phase.iter().all(|p| p.is_finite()), "phase must stay finite");

        let others_finite = r
            .magnitude
            .iter()
            .enumerate()
            .filter(|&(i, _)| i != N / 2)
            .all(|(_, m)| m.is_finite());
        assert!(others_finite, "only the sample on the pole may be infinite");
    }

    #[test]
    fn test_pole_and_zero_coincide_on_sample_pole_wins() {
        let one = Point::new(1.0, 0.0);
        let r = evaluate(&[one], &[one], N);
        assert_eq!(r.magnitude[N / 2], f64::INFINITY);
        assert_abs_diff_eq!(r.magnitude[0], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_zero_on_sample_gives_exact_zero() {
        let r = evaluate(&[], &[Point::new(1.0, 0.0)], N);
        assert_eq!(r.magnitude[N / 2], 0.0);
        assert_eq!(magnitude_db(r.magnitude[N / 2]), f64::NEG_INFINITY);
    }

    #[test]
    fn test_unwrapped_phase_is_continuous() {
        // A zero outside the unit circle winds the phase once around.
        let r = evaluate(&[], &[Point::new(2.0, 0.0)], N);
        for i in 1..N {
            let d = (r.phase[i] - r.phase[i - 1]).abs();
            assert!(d < PI, "phase jump of {d} between {} and {i}", i - 1);
        }
        let span = r.phase[N - 1] - r.phase[0];
        assert!(
            (span.abs() - TAU).abs() < 0.1,
            "phase should wind by about 2π, spans {span}"
        );
    }

    #[test]
    fn test_phase_does_not_depend_on_pole_order() {
        // The accumulated product for these poles sits on the ±π cut at
        // ω = −π, and which side it lands on depends on the order.
        let poles = [Point::new(-2.0, 0.0), Point::new(0.7, 0.1), Point::new(0.7, -0.1)];
        let mut reversed = poles;
        reversed.reverse();

        let a = evaluate(&poles, &[], N);
        let b = evaluate(&reversed, &[], N);
        for i in 0..N {
            assert!(
                (a.phase[i] - b.phase[i]).abs() < 1e-9,
                "phase at {i}: {} vs {}",
                a.phase[i],
                b.phase[i]
            );
        }
    }

    #[test]
    fn test_phase_of_single_pole_matches_angle_of_response() {
        // one pole inside the circle never crosses the cut, so no unwrapping
        let r = evaluate(&[Point::new(0.5, 0.3)], &[], N);
        for i in 0..N {
            assert_abs_diff_eq!(r.phase[i], r.response[i].arg(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_unwrap_recovers_linear_ramp() {
        let truth: Vec<f64> = (0..200).map(|i| -0.3 * i as f64).collect();
        let mut wrapped: Vec<f64> = truth.iter().map(|&p| wrap_phase(p)).collect();
        unwrap_phase(&mut wrapped);
        for (i, (&got, &want)) in wrapped.iter().zip(truth.iter()).enumerate() {
            assert!((got - want).abs() < 1e-9, "sample {i}: {got} vs {want}");
        }
    }

    #[test]
    fn test_unwrap_empty_and_single() {
        let mut empty: Vec<f64> = vec![];
        unwrap_phase(&mut empty);
        let mut one = vec![3.0];
        unwrap_phase(&mut one);
        assert_eq!(one, vec![3.0]);
    }

    #[rstest]
    #[case(3.0 * PI, PI)]
    #[case(-PI, PI)]
    #[case(PI, PI)]
    #[case(0.5, 0.5)]
    #[case(-TAU - 0.25, -0.25)]
    fn test_wrap_phase(#[case] input: f64, #[case] expected: f64) {
        assert_abs_diff_eq!(wrap_phase(input), expected, epsilon = 1e-12);
    }

    #[rstest]
    #[case(1.0, 0.0)]
    #[case(10.0, 20.0)]
    #[case(0.1, -20.0)]
    #[case(0.0, f64::NEG_INFINITY)]
    #[case(f64::INFINITY, f64::INFINITY)]
    fn test_magnitude_db(#[case] magnitude: f64, #[case] expected: f64) {
        let db = magnitude_db(magnitude);
        if expected.is_finite() {
            assert_abs_diff_eq!(db, expected, epsilon = 1e-12);
        } else {
            assert_eq!(db, expected);
        }
    }

    #[test]
    fn test_log_scale_clips_only_degenerate_samples() {
        let clip = MagnitudeClip::default();
        let mags = [0.0, 1e-5, 1.0, 2.0, 1e6, f64::INFINITY];
        let db = DisplayScale::Log.apply(&mags, &clip);

        assert_eq!(db[0], clip.min_db);
        assert_eq!(db[5], clip.max_db);
        for i in 1..5 {
            assert_abs_diff_eq!(db[i], 20.0 * mags[i].log10(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linear_scale_clips_infinity() {
        let clip = MagnitudeClip::default();
        let lin = DisplayScale::Linear.apply(&[0.0, 2.5, f64::INFINITY], &clip);
        assert_eq!(lin, vec![0.0, 2.5, clip.max_linear]);
    }

    #[test]
    fn test_scale_toggle_round_trips() {
        assert_eq!(DisplayScale::Log.toggled(), DisplayScale::Linear);
        assert_eq!(DisplayScale::Linear.toggled(), DisplayScale::Log);
        assert_eq!(DisplayScale::Log.toggled().toggled(), DisplayScale::Log);
    }

    #[test]
    fn test_scale_from_str() {
        assert_eq!("LOG".parse::<DisplayScale>(), Ok(DisplayScale::Log));
        assert_eq!("linear".parse::<DisplayScale>(), Ok(DisplayScale::Linear));
        assert!("cubic".parse::<DisplayScale>().is_err());
    }
}
