// ApplicationHandler, event loop, editing-session orchestration.

use egui_winit_vulkano::{Gui, GuiConfig};
use pz_core::{Controller, EditorConfig, Frame, FrameSink, InputEvent, Outcome, PoleZeroSet};
use vulkano::sync::GpuFuture;
use winit::{application::ApplicationHandler, event::WindowEvent, event_loop::ActiveEventLoop, window::WindowId};

use crate::error::RenderError;
use crate::input::{PointerSample, PointerTracker};
use crate::ui::{UiAction, UiState};
use crate::{plane_view, plot_view, renderer::Renderer, ui};

/// Sink that keeps only the most recent frame; the window redraws from it.
#[derive(Debug, Default)]
pub struct LatestFrame {
    frame: Option<Frame>,
    renders: usize,
}

impl LatestFrame {
    pub fn current(&self) -> Option<&Frame> {
        self.frame.as_ref()
    }

    /// Number of frames received so far.
    pub fn renders(&self) -> usize {
        self.renders
    }
}

impl FrameSink for LatestFrame {
    fn render(&mut self, frame: &Frame) {
        self.frame = Some(frame.clone());
        self.renders += 1;
    }
}

pub struct App {
    renderer: Option<Renderer>,
    gui: Option<Gui>,
    controller: Controller<LatestFrame>,
    tracker: PointerTracker,
    ui_state: UiState,
    /// Fatal error that ended the event loop, reported by `run`.
    fatal: Option<RenderError>,
}

impl App {
    pub fn new(config: EditorConfig, filter: PoleZeroSet) -> Self {
        Self {
            renderer: None,
            gui: None,
            controller: Controller::with_filter(config, filter, LatestFrame::default()),
            tracker: PointerTracker::new(),
            ui_state: UiState::default(),
            fatal: None,
        }
    }

    pub fn take_error(&mut self) -> Option<RenderError> {
        self.fatal.take()
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: RenderError) {
        tracing::error!(%error, "renderer failed");
        self.fatal = Some(error);
        event_loop.exit();
    }

    /// Feed one frame's worth of UI commands and input into the controller.
    /// Returns `true` if anything changed and another frame is needed.
    fn apply_input(&mut self, actions: Vec<UiAction>, sample: PointerSample, keys: Vec<char>) -> bool {
        let mut changed = false;

        for action in actions {
            match action {
                UiAction::ToggleScale => self.controller.toggle_scale(),
                UiAction::Clear => self.controller.clear(),
                UiAction::LoadPreset(preset) => self.controller.load(preset.filter()),
            };
            self.tracker.reset();
            changed = true;
        }

        let events = self
            .tracker
            .translate(&sample)
            .into_iter()
            .chain(keys.into_iter().map(InputEvent::KeyPress));

        for event in events {
            match self.controller.handle(event) {
                Ok(Outcome::Ignored) => {}
                Ok(_) => {
                    self.ui_state.status = None;
                    changed = true;
                }
                Err(error) => {
                    tracing::warn!(%error, ?event, "input rejected");
                    self.ui_state.status = Some(error.to_string());
                    changed = true;
                }
            }
        }

        changed
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        let renderer = match Renderer::new(event_loop) {
            Ok(r) => r,
            Err(error) => return self.fail(event_loop, error),
        };

        let gui = Gui::new(
            event_loop,
            renderer.surface.clone(),
            renderer.queue.clone(),
            renderer.swapchain_format(),
            GuiConfig {
                is_overlay: false,
                ..Default::default()
            },
        );

        renderer.window.request_redraw();
        self.renderer = Some(renderer);
        self.gui = Some(gui);
        tracing::info!("editor window ready");
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        // Let egui process the event first.
        if let Some(gui) = self.gui.as_mut() {
            gui.update(&event);
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(_) => {
                if let Some(renderer) = self.renderer.as_mut() {
                    renderer.recreate_swapchain = true;
                }
            }
            WindowEvent::Focused(false) => {
                // a release outside the window never reaches us
                if self.controller.cancel_drag() != Outcome::Ignored {
                    tracing::debug!("drag cancelled on focus loss");
                }
                self.tracker.reset();
            }
            WindowEvent::RedrawRequested => {
                self.render_frame(event_loop);
                return;
            }
            _ => {}
        }

        if let Some(renderer) = self.renderer.as_ref() {
            renderer.window.request_redraw();
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Only repaint in response to window events so the loop sleeps when idle.
    }
}

impl App {
    fn render_frame(&mut self, event_loop: &ActiveEventLoop) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        let (image_index, acquire_future) = match renderer.begin_frame() {
            Ok(Some(r)) => r,
            Ok(None) => return,
            Err(error) => return self.fail(event_loop, error),
        };
        let before_future = renderer.take_previous_frame_end().join(acquire_future);

        let mut actions = Vec::new();
        let mut sample = PointerSample::default();
        let mut keys = Vec::new();
        {
            let Some(gui) = self.gui.as_mut() else {
                return;
            };
            let frame = self.controller.sink().current();
            let config = self.controller.config();
            let ui_state = &self.ui_state;

            gui.immediate_ui(|gui| {
                let ctx = gui.context();
                if let Some(frame) = frame {
                    actions = ui::draw_controls(&ctx, frame, config, ui_state);
                    sample = plane_view::draw_plane(&ctx, frame);
                    plot_view::draw_response(&ctx, frame);
                }
                keys = ui::typed_keys(&ctx);
            });
        }

        // The views were drawn from the previous frame; schedule one more so
        // the edit shows up without waiting for further input.
        if self.apply_input(actions, sample, keys) {
            if let Some(r) = self.renderer.as_ref() {
                r.window.request_redraw();
            }
        }

        let (Some(renderer), Some(gui)) = (self.renderer.as_mut(), self.gui.as_mut()) else {
            return;
        };
        let image_view = renderer.image_views[image_index as usize].clone();
        let after_future = gui.draw_on_image(before_future, image_view);
        let final_future = renderer.present(after_future, image_index);
        renderer.end_frame(final_future);
    }
}
