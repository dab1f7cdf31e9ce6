// One-shot PNG of the three views, drawn with plotters.

use std::f64::consts::{PI, TAU};
use std::ops::Range;
use std::path::Path;

use anyhow::Result;
use plotters::coord::Shift;
use plotters::prelude::*;
use pz_core::{DisplayScale, Frame};

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

pub fn draw(frame: &Frame, path: &Path, size: (u32, u32)) -> Result<()> {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let panels = root.split_evenly((1, 3));
    draw_plane(&panels[0], frame)?;

    let magnitude = frame.display_magnitude();
    let magnitude_range = match frame.scale {
        DisplayScale::Log => frame.clip.min_db..frame.clip.max_db,
        DisplayScale::Linear => value_range(&magnitude),
    };
    draw_curve(
        &panels[1],
        "Magnitude",
        frame.scale.label(),
        &frame.response.frequencies,
        &magnitude,
        magnitude_range,
    )?;

    let phase_range = value_range(&frame.response.phase);
    draw_curve(
        &panels[2],
        "Phase",
        "phase (rad)",
        &frame.response.frequencies,
        &frame.response.phase,
        phase_range,
    )?;

    root.present()?;
    Ok(())
}

fn draw_plane(area: &Area<'_>, frame: &Frame) -> Result<()> {
    let lim = frame.view_limit();
    let mut chart = ChartBuilder::on(area)
        .caption("Pole-Zero Plot", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(40)
        .build_cartesian_2d(-lim..lim, -lim..lim)?;

    chart.configure_mesh().x_desc("Real").y_desc("Imaginary").draw()?;

    chart.draw_series(LineSeries::new(
        (0..=100).map(|i| {
            let theta = TAU * i as f64 / 100.0;
            (theta.cos(), theta.sin())
        }),
        &BLACK,
    ))?;
    chart.draw_series(
        frame
            .poles
            .iter()
            .map(|p| Cross::new((p.re, p.im), 6, RED.stroke_width(2))),
    )?;
    chart.draw_series(
        frame
            .zeros
            .iter()
            .map(|z| Circle::new((z.re, z.im), 6, BLUE.stroke_width(2))),
    )?;
    Ok(())
}

fn draw_curve(
    area: &Area<'_>,
    title: &str,
    y_desc: &str,
    xs: &[f64],
    ys: &[f64],
    y_range: Range<f64>,
) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption(title, ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(-PI..PI, y_range.clone())?;

    chart
        .configure_mesh()
        .x_desc("Frequency (rad/sample)")
        .y_desc(y_desc)
        .draw()?;

    // keep out-of-range samples on the frame edge
    let (lo, hi) = (y_range.start, y_range.end);
    chart.draw_series(LineSeries::new(
        xs.iter().zip(ys.iter()).map(|(&x, &y)| (x, y.clamp(lo, hi))),
        &BLUE,
    ))?;
    Ok(())
}

/// Finite min..max of `values`, padded so a flat curve still gets an axis.
fn value_range(values: &[f64]) -> Range<f64> {
    let (lo, hi) = values
        .iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));

    if !lo.is_finite() {
        return -1.0..1.0;
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    (lo - pad)..(hi + pad)
}
