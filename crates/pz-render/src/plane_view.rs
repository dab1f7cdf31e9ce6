// Pole-zero plane drawn with egui_plot; also the source of pointer input.

use std::f64::consts::TAU;

use egui::{Color32, PointerButton};
use egui_plot::{Line, MarkerShape, Plot, PlotBounds, Points};
use pz_core::{Button, Frame, Point};

use crate::input::PointerSample;

const POLE_COLOR: Color32 = Color32::from_rgb(220, 60, 60);
const ZERO_COLOR: Color32 = Color32::from_rgb(70, 110, 230);

fn unit_circle() -> Vec<[f64; 2]> {
    (0..=100)
        .map(|i| {
            let theta = TAU * i as f64 / 100.0;
            [theta.cos(), theta.sin()]
        })
        .collect()
}

fn to_xy(points: &[Point]) -> Vec<[f64; 2]> {
    points.iter().map(|p| [p.re, p.im]).collect()
}

/// Draw the z-plane in the left panel and report what the pointer did
/// over it this frame.
pub fn draw_plane(ctx: &egui::Context, frame: &Frame) -> PointerSample {
    let mut sample = PointerSample::default();

    egui::SidePanel::left("pole_zero_plane")
        .min_width(460.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Pole-Zero Plot");
            ui.label("Left click: pole · Right click: zero · Click a marker to remove · Drag to move");

            let limit = frame.view_limit();

            let plot = Plot::new("z_plane")
                .data_aspect(1.0)
                .x_axis_label("Real")
                .y_axis_label("Imaginary")
                .allow_drag(false)
                .allow_zoom(false)
                .allow_scroll(false)
                .allow_boxed_zoom(false)
                .allow_double_click_reset(false)
                .legend(egui_plot::Legend::default())
                .show(ui, |plot_ui| {
                    plot_ui.set_plot_bounds(PlotBounds::from_min_max([-limit, -limit], [limit, limit]));
                    plot_ui.line(Line::new(unit_circle()).color(Color32::GRAY).width(0.75));
                    plot_ui.points(
                        Points::new(to_xy(&frame.poles))
                            .shape(MarkerShape::Cross)
                            .radius(7.0)
                            .color(POLE_COLOR)
                            .name("Poles"),
                    );
                    plot_ui.points(
                        Points::new(to_xy(&frame.zeros))
                            .shape(MarkerShape::Circle)
                            .filled(false)
                            .radius(7.0)
                            .color(ZERO_COLOR)
                            .name("Zeros"),
                    );
                    plot_ui.pointer_coordinate()
                });

            let hovered = plot.response.hovered();
            sample = ui.input(|i| PointerSample {
                position: plot.inner.map(|c| Point::new(c.x, c.y)),
                hovered,
                pressed: if i.pointer.button_pressed(PointerButton::Primary) {
                    Some(Button::Left)
                } else if i.pointer.button_pressed(PointerButton::Secondary) {
                    Some(Button::Right)
                } else {
                    None
                },
                released: i.pointer.any_released(),
            });
        });

    sample
}
