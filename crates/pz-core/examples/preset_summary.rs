//! Prints DC gain, Nyquist gain and the peak of every built-in preset.
//!
//! Run with:
//!   cargo run -p pz-core --example preset_summary

use pz_core::frequency_response::magnitude_db;
use pz_core::{compute, DisplayScale, EditorConfig, Preset};

fn main() {
    let config = EditorConfig::default();
    let n = config.num_samples;

    println!("{:<10} {:>10} {:>12} {:>10} {:>10}", "preset", "DC (dB)", "Nyquist (dB)", "peak (dB)", "at ω");

    for preset in Preset::ALL {
        let frame = compute(&preset.filter(), &config, DisplayScale::Log);
        let r = &frame.response;

        let (peak_index, peak) = r
            .magnitude
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, m)| if m > best.1 { (i, m) } else { best });

        println!(
            "{:<10} {:>10.2} {:>12.2} {:>10.2} {:>10.3}",
            preset.name(),
            magnitude_db(r.magnitude[n / 2]),
            magnitude_db(r.magnitude[0]),
            magnitude_db(peak),
            r.frequencies[peak_index],
        );
    }
}
