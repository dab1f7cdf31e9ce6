// Pointer/keyboard state machine that edits a pole/zero set.

use crate::config::EditorConfig;
use crate::error::{Error, Result};
use crate::filter::PoleZeroSet;
use crate::frequency_response::DisplayScale;
use crate::{Frame, FrameSink, Kind, Point};

/// Pointer button. Left adds poles, right adds zeros.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    Left,
    Right,
}

impl Button {
    /// Kind of point a press with this button creates on empty space.
    pub fn kind(self) -> Kind {
        match self {
            Button::Left => Kind::Pole,
            Button::Right => Kind::Zero,
        }
    }
}

/// Raw input delivered by the rendering collaborator. Positions are in
/// z-plane coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { button: Button, position: Point },
    PointerMove { position: Point },
    PointerUp { position: Point },
    KeyPress(char),
}

/// In-progress interaction.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        kind: Kind,
        index: usize,
        /// Where the point was when the press landed on it.
        origin: Point,
        moved: bool,
    },
}

/// What an event did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Added { kind: Kind, index: usize },
    DragStarted { kind: Kind, index: usize },
    Moved { kind: Kind, index: usize },
    Committed { kind: Kind, index: usize },
    Removed { kind: Kind, index: usize, point: Point },
    Cancelled,
    ScaleToggled(DisplayScale),
    Cleared,
    Loaded,
    Ignored,
}

/// One editing session: owns the filter, the drag state, the display scale
/// and the renderer it reports to.
///
/// Every state change re-evaluates the response and calls
/// [`FrameSink::render`] exactly once. Events that change nothing render
/// nothing.
pub struct Controller<S: FrameSink> {
    filter: PoleZeroSet,
    drag: DragState,
    scale: DisplayScale,
    config: EditorConfig,
    sink: S,
}

impl<S: FrameSink> Controller<S> {
    /// Start an empty session. Renders the initial (identity) response.
    pub fn new(config: EditorConfig, sink: S) -> Self {
        Self::with_filter(config, PoleZeroSet::default(), sink)
    }

    /// Start a session from an existing filter. Renders once.
    pub fn with_filter(config: EditorConfig, filter: PoleZeroSet, sink: S) -> Self {
        let mut controller = Self {
            filter,
            drag: DragState::Idle,
            scale: config.initial_scale,
            config,
            sink,
        };
        controller.refresh();
        controller
    }

    pub fn filter(&self) -> &PoleZeroSet {
        &self.filter
    }

    pub fn poles(&self) -> &[Point] {
        self.filter.poles()
    }

    pub fn zeros(&self) -> &[Point] {
        self.filter.zeros()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn scale(&self) -> DisplayScale {
        self.scale
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Evaluate the current state without notifying the sink.
    pub fn frame(&self) -> Frame {
        crate::compute(&self.filter, &self.config, self.scale)
    }

    /// Re-evaluate and push a frame to the sink.
    pub fn refresh(&mut self) {
        let frame = self.frame();
        self.sink.render(&frame);
    }

    /// Dispatch one input event.
    pub fn handle(&mut self, event: InputEvent) -> Result<Outcome> {
        let outcome = match event {
            InputEvent::PointerDown { button, position } => self.pointer_down(button, position)?,
            InputEvent::PointerMove { position } => self.pointer_move(position)?,
            InputEvent::PointerUp { position } => self.pointer_up(position)?,
            InputEvent::KeyPress(key) => self.key_press(key),
        };
        if outcome != Outcome::Ignored {
            tracing::debug!(?event, ?outcome, "handled input");
        }
        Ok(outcome)
    }

    /// Press: grab the nearest point within the hit radius, or add a new
    /// point (pole for left, zero for right) on empty space.
    pub fn pointer_down(&mut self, button: Button, position: Point) -> Result<Outcome> {
        check_position(position)?;

        if let DragState::Dragging { .. } = self.drag {
            return Ok(Outcome::Ignored);
        }

        match self.filter.hit_test(position, self.config.hit_radius) {
            Some(hit) => {
                let origin = self.filter.get(hit.kind, hit.index).unwrap_or(position);
                self.drag = DragState::Dragging {
                    kind: hit.kind,
                    index: hit.index,
                    origin,
                    moved: false,
                };
                Ok(Outcome::DragStarted {
                    kind: hit.kind,
                    index: hit.index,
                })
            }
            None => {
                let kind = button.kind();
                let index = self.filter.push(kind, position);
                self.refresh();
                Ok(Outcome::Added { kind, index })
            }
        }
    }

    /// Move the dragged point to `position`. Each move is evaluated.
    pub fn pointer_move(&mut self, position: Point) -> Result<Outcome> {
        check_position(position)?;

        let DragState::Dragging {
            kind,
            index,
            origin,
            ..
        } = self.drag
        else {
            return Ok(Outcome::Ignored);
        };

        if !self.filter.set(kind, index, position) {
            tracing::warn!(%kind, index, "drag target vanished; dropping drag");
            self.drag = DragState::Idle;
            return Ok(Outcome::Ignored);
        }

        self.drag = DragState::Dragging {
            kind,
            index,
            origin,
            moved: true,
        };
        self.refresh();
        Ok(Outcome::Moved { kind, index })
    }

    /// Release: a press that never moved removes the point, otherwise the
    /// final position is committed.
    pub fn pointer_up(&mut self, position: Point) -> Result<Outcome> {
        check_position(position)?;

        let DragState::Dragging {
            kind, index, moved, ..
        } = std::mem::take(&mut self.drag)
        else {
            return Ok(Outcome::Ignored);
        };

        if moved {
            if !self.filter.set(kind, index, position) {
                tracing::warn!(%kind, index, "release on a point that no longer exists");
                return Ok(Outcome::Ignored);
            }
            self.refresh();
            return Ok(Outcome::Committed { kind, index });
        }

        match self.filter.remove(kind, index) {
            Some(point) => {
                self.refresh();
                Ok(Outcome::Removed { kind, index, point })
            }
            None => {
                tracing::warn!(%kind, index, "release on a point that no longer exists");
                Ok(Outcome::Ignored)
            }
        }
    }

    /// Abandon an in-progress drag, putting the point back where it started.
    pub fn cancel_drag(&mut self) -> Outcome {
        let DragState::Dragging {
            kind,
            index,
            origin,
            moved,
        } = std::mem::take(&mut self.drag)
        else {
            return Outcome::Ignored;
        };

        if moved {
            self.filter.set(kind, index, origin);
            self.refresh();
        }
        Outcome::Cancelled
    }

    /// Map a typed key to an editor command. Unbound keys are ignored.
    pub fn key_press(&mut self, key: char) -> Outcome {
        if key.eq_ignore_ascii_case(&self.config.toggle_scale_key) {
            self.toggle_scale()
        } else if key.eq_ignore_ascii_case(&self.config.clear_key) {
            self.clear()
        } else {
            Outcome::Ignored
        }
    }

    pub fn toggle_scale(&mut self) -> Outcome {
        self.scale = self.scale.toggled();
        tracing::info!(scale = ?self.scale, "display scale toggled");
        self.refresh();
        Outcome::ScaleToggled(self.scale)
    }

    /// Remove every pole and zero and drop any in-progress drag.
    pub fn clear(&mut self) -> Outcome {
        self.filter.clear();
        self.drag = DragState::Idle;
        tracing::info!("cleared all poles and zeros");
        self.refresh();
        Outcome::Cleared
    }

    /// Replace the whole filter and drop any in-progress drag.
    pub fn load(&mut self, filter: PoleZeroSet) -> Outcome {
        tracing::info!(
            poles = filter.poles().len(),
            zeros = filter.zeros().len(),
            "loading filter"
        );
        self.filter = filter;
        self.drag = DragState::Idle;
        self.refresh();
        Outcome::Loaded
    }
}

fn check_position(position: Point) -> Result<()> {
    if position.is_finite() {
        Ok(())
    } else {
        tracing::warn!(%position, "rejected non-finite pointer position");
        Err(Error::NonFinitePosition(position))
    }
}
