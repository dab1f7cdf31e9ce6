pub mod app;
pub mod error;
pub mod input;
pub mod plane_view;
pub mod plot_view;
pub mod renderer;
pub mod ui;

use app::App;
use pz_core::{EditorConfig, PoleZeroSet};
use winit::event_loop::EventLoop;

pub use error::{RenderError, Result};

/// Open the editor window on `filter` and run until it is closed.
pub fn run(config: EditorConfig, filter: PoleZeroSet) -> Result<()> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, filter);
    event_loop.run_app(&mut app)?;

    match app.take_error() {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
