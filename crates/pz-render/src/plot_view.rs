// Magnitude and phase plots via egui_plot.

use egui_plot::{Line, Plot, PlotBounds};
use pz_core::{DisplayScale, Frame};
use std::f64::consts::PI;

fn series(xs: &[f64], ys: &[f64]) -> Vec<[f64; 2]> {
    xs.iter().zip(ys.iter()).map(|(&x, &y)| [x, y]).collect()
}

/// Draw magnitude (top) and unwrapped phase (bottom) in the central panel.
pub fn draw_response(ctx: &egui::Context, frame: &Frame) {
    egui::CentralPanel::default().show(ctx, |ui| {
        let w = &frame.response.frequencies;
        let half = (ui.available_height() / 2.0 - 30.0).max(120.0);

        ui.heading("Magnitude");
        let magnitude = frame.display_magnitude();
        Plot::new("magnitude_plot")
            .height(half)
            .x_axis_label("Frequency (rad/sample)")
            .y_axis_label(frame.scale.label())
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                if frame.scale == DisplayScale::Log {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                        [-PI, frame.clip.min_db],
                        [PI, frame.clip.max_db],
                    ));
                }
                plot_ui.line(Line::new(series(w, &magnitude)).name(frame.scale.label()));
            });

        ui.heading("Phase");
        Plot::new("phase_plot")
            .height(half)
            .x_axis_label("Frequency (rad/sample)")
            .y_axis_label("∠H (rad)")
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.line(Line::new(series(w, &frame.response.phase)).name("phase"));
            });
    });
}
