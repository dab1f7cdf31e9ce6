// Turns per-frame pointer state from egui into controller events.

use pz_core::{Button, InputEvent, Point};

/// Pointer state observed over the pole-zero plane during one UI frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSample {
    /// Pointer position in z-plane coordinates, if it is over the plot.
    pub position: Option<Point>,
    /// Whether the plane widget is hovered.
    pub hovered: bool,
    /// Button pressed this frame, if any.
    pub pressed: Option<Button>,
    /// Whether any button was released this frame.
    pub released: bool,
}

/// Tracks an in-progress press across frames so that a release is always
/// paired with the press that started it, even outside the plane.
#[derive(Debug, Default)]
pub struct PointerTracker {
    active: bool,
    last: Option<Point>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press that started on the plane is still held.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Translate one frame's sample into zero or more events, in order.
    pub fn translate(&mut self, sample: &PointerSample) -> Vec<InputEvent> {
        let mut events = Vec::new();

        if let (Some(button), Some(position), false) = (sample.pressed, sample.position, self.active) {
            if sample.hovered {
                events.push(InputEvent::PointerDown { button, position });
                self.active = true;
                self.last = Some(position);
            }
        } else if self.active {
            if let Some(position) = sample.position {
                if self.last != Some(position) {
                    events.push(InputEvent::PointerMove { position });
                    self.last = Some(position);
                }
            }
        }

        if sample.released && self.active {
            if let Some(position) = sample.position.or(self.last) {
                events.push(InputEvent::PointerUp { position });
            }
            self.active = false;
            self.last = None;
        }

        events
    }

    /// Forget a held press, e.g. when the window loses focus.
    pub fn reset(&mut self) {
        self.active = false;
        self.last = None;
    }
}
