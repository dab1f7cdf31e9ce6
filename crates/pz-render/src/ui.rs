// egui control panel: scale toggle, clear, presets, readouts.

use pz_core::{DisplayScale, EditorConfig, Frame, Preset};

/// Commands issued from the control panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    ToggleScale,
    Clear,
    LoadPreset(Preset),
}

/// Extra UI-only state that doesn't belong to the editing session.
#[derive(Debug, Default)]
pub struct UiState {
    /// Last rejected input, shown until the next successful edit.
    pub status: Option<String>,
}

/// Draw the right-side control panel. Returns the commands clicked this
/// frame.
pub fn draw_controls(
    ctx: &egui::Context,
    frame: &Frame,
    config: &EditorConfig,
    ui_state: &UiState,
) -> Vec<UiAction> {
    let mut actions = Vec::new();

    egui::SidePanel::right("controls")
        .min_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Filter");
            ui.separator();

            ui.label(format!("Poles: {}", frame.poles.len()));
            ui.label(format!("Zeros: {}", frame.zeros.len()));

            ui.separator();

            let scale_text = match frame.scale {
                DisplayScale::Log => "Show linear magnitude",
                DisplayScale::Linear => "Show magnitude in dB",
            };
            if ui
                .button(scale_text)
                .on_hover_text(format!("[{}]", config.toggle_scale_key))
                .clicked()
            {
                actions.push(UiAction::ToggleScale);
            }
            if ui
                .button("Clear all")
                .on_hover_text(format!("[{}]", config.clear_key))
                .clicked()
            {
                actions.push(UiAction::Clear);
            }

            ui.separator();
            ui.label("Presets");
            for preset in Preset::ALL {
                if ui.button(preset.name()).clicked() {
                    actions.push(UiAction::LoadPreset(preset));
                }
            }

            if let Some(status) = &ui_state.status {
                ui.separator();
                ui.colored_label(egui::Color32::YELLOW, status);
            }
        });

    actions
}

/// Characters typed this frame, for the controller's key bindings.
pub fn typed_keys(ctx: &egui::Context) -> Vec<char> {
    ctx.input(|i| {
        i.events
            .iter()
            .filter_map(|event| match event {
                egui::Event::Text(text) => Some(text.chars().collect::<Vec<_>>()),
                _ => None,
            })
            .flatten()
            .collect()
    })
}
