use thiserror::Error;

/// Failure to bring up or drive the window and its Vulkan swapchain.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("{what}: {detail}")]
    Vulkan { what: &'static str, detail: String },

    #[error("no Vulkan device supports presenting to this window")]
    NoDevice,
}

impl RenderError {
    /// Adapter for `map_err` on the many distinct vulkano error types.
    pub(crate) fn vulkan<E: std::fmt::Debug>(what: &'static str) -> impl FnOnce(E) -> Self {
        move |e| RenderError::Vulkan {
            what,
            detail: format!("{e:?}"),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;
