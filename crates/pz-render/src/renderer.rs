// Vulkan instance, device and swapchain for the editor window.

use std::sync::Arc;
use vulkano::{
    device::{
        physical::{PhysicalDevice, PhysicalDeviceType},
        Device, DeviceCreateInfo, DeviceExtensions, Queue, QueueCreateInfo, QueueFlags,
    },
    image::{view::ImageView, Image, ImageUsage},
    instance::{Instance, InstanceCreateFlags, InstanceCreateInfo},
    swapchain::{self, Surface, Swapchain, SwapchainCreateInfo, SwapchainPresentInfo},
    sync::{self, GpuFuture},
    Validated, VulkanError, VulkanLibrary,
};
use winit::{dpi::LogicalSize, event_loop::ActiveEventLoop, window::Window};

use crate::error::{RenderError, Result};

pub const WINDOW_TITLE: &str = "Pole-Zero Editor";

pub struct Renderer {
    pub device: Arc<Device>,
    pub queue: Arc<Queue>,
    pub surface: Arc<Surface>,
    pub swapchain: Arc<Swapchain>,
    pub image_views: Vec<Arc<ImageView>>,
    pub window: Arc<Window>,
    pub recreate_swapchain: bool,
    previous_frame_end: Option<Box<dyn GpuFuture>>,
}

/// Rank device types so discrete GPUs are tried first.
fn device_rank(device_type: PhysicalDeviceType) -> u8 {
    match device_type {
        PhysicalDeviceType::DiscreteGpu => 0,
        PhysicalDeviceType::IntegratedGpu => 1,
        PhysicalDeviceType::VirtualGpu => 2,
        PhysicalDeviceType::Cpu => 3,
        PhysicalDeviceType::Other => 4,
        _ => 5,
    }
}

fn views_of(images: &[Arc<Image>]) -> Result<Vec<Arc<ImageView>>> {
    images
        .iter()
        .map(|image| {
            ImageView::new_default(image.clone()).map_err(RenderError::vulkan("swapchain image view"))
        })
        .collect()
}

impl Renderer {
    pub fn new(event_loop: &ActiveEventLoop) -> Result<Self> {
        let library = VulkanLibrary::new().map_err(RenderError::vulkan("loading Vulkan library"))?;
        let required_extensions = Surface::required_extensions(event_loop)
            .map_err(RenderError::vulkan("querying surface extensions"))?;
        let instance = Instance::new(
            library,
            InstanceCreateInfo {
                flags: InstanceCreateFlags::ENUMERATE_PORTABILITY,
                enabled_extensions: required_extensions,
                ..Default::default()
            },
        )
        .map_err(RenderError::vulkan("creating Vulkan instance"))?;

        let window = Arc::new(
            event_loop.create_window(
                Window::default_attributes()
                    .with_title(WINDOW_TITLE)
                    .with_inner_size(LogicalSize::new(1280u32, 760u32)),
            )?,
        );
        let surface = Surface::from_window(instance.clone(), window.clone())
            .map_err(RenderError::vulkan("creating window surface"))?;

        let device_extensions = DeviceExtensions {
            khr_swapchain: true,
            ..DeviceExtensions::empty()
        };
        let (physical_device, queue_family_index) = instance
            .enumerate_physical_devices()
            .map_err(RenderError::vulkan("enumerating physical devices"))?
            .filter(|p| p.supported_extensions().contains(&device_extensions))
            .filter_map(|p| {
                let index = graphics_queue_family(&p, &surface)?;
                Some((p, index))
            })
            .min_by_key(|(p, _)| device_rank(p.properties().device_type))
            .ok_or(RenderError::NoDevice)?;

        tracing::info!(
            device = %physical_device.properties().device_name,
            kind = ?physical_device.properties().device_type,
            "selected Vulkan device"
        );

        let (device, mut queues) = Device::new(
            physical_device.clone(),
            DeviceCreateInfo {
                queue_create_infos: vec![QueueCreateInfo {
                    queue_family_index,
                    ..Default::default()
                }],
                enabled_extensions: device_extensions,
                ..Default::default()
            },
        )
        .map_err(RenderError::vulkan("creating logical device"))?;
        let queue = queues.next().ok_or(RenderError::NoDevice)?;

        let surface_capabilities = physical_device
            .surface_capabilities(&surface, Default::default())
            .map_err(RenderError::vulkan("querying surface capabilities"))?;
        let image_format = physical_device
            .surface_formats(&surface, Default::default())
            .map_err(RenderError::vulkan("querying surface formats"))?
            .first()
            .map(|(format, _)| *format)
            .ok_or(RenderError::NoDevice)?;
        let composite_alpha = surface_capabilities
            .supported_composite_alpha
            .into_iter()
            .next()
            .ok_or(RenderError::NoDevice)?;

        let window_size = window.inner_size();
        let (swapchain, images) = Swapchain::new(
            device.clone(),
            surface.clone(),
            SwapchainCreateInfo {
                min_image_count: surface_capabilities.min_image_count.max(2),
                image_format,
                image_extent: [window_size.width, window_size.height],
                image_usage: ImageUsage::COLOR_ATTACHMENT,
                composite_alpha,
                ..Default::default()
            },
        )
        .map_err(RenderError::vulkan("creating swapchain"))?;

        let image_views = views_of(&images)?;
        let previous_frame_end = Some(sync::now(device.clone()).boxed());

        Ok(Renderer {
            device,
            queue,
            surface,
            swapchain,
            image_views,
            window,
            recreate_swapchain: false,
            previous_frame_end,
        })
    }

    pub fn swapchain_format(&self) -> vulkano::format::Format {
        self.swapchain.image_format()
    }

    fn rebuild_swapchain(&mut self) -> Result<()> {
        let window_size = self.window.inner_size();
        if window_size.width == 0 || window_size.height == 0 {
            // minimised; try again on the next resize
            return Ok(());
        }
        let (swapchain, images) = self
            .swapchain
            .recreate(SwapchainCreateInfo {
                image_extent: [window_size.width, window_size.height],
                ..self.swapchain.create_info()
            })
            .map_err(RenderError::vulkan("recreating swapchain"))?;

        self.swapchain = swapchain;
        self.image_views = views_of(&images)?;
        self.recreate_swapchain = false;
        Ok(())
    }

    /// Acquire the next swapchain image. `Ok(None)` means the swapchain is
    /// out of date and the frame should be skipped.
    pub fn begin_frame(&mut self) -> Result<Option<(u32, swapchain::SwapchainAcquireFuture)>> {
        if let Some(future) = self.previous_frame_end.as_mut() {
            future.cleanup_finished();
        }

        if self.recreate_swapchain {
            self.rebuild_swapchain()?;
        }

        let (image_index, suboptimal, acquire_future) =
            match swapchain::acquire_next_image(self.swapchain.clone(), None).map_err(Validated::unwrap) {
                Ok(r) => r,
                Err(VulkanError::OutOfDate) => {
                    self.recreate_swapchain = true;
                    return Ok(None);
                }
                Err(e) => return Err(RenderError::vulkan("acquiring swapchain image")(e)),
            };
        if suboptimal {
            self.recreate_swapchain = true;
        }
        Ok(Some((image_index, acquire_future)))
    }

    pub fn end_frame(&mut self, after_future: Box<dyn GpuFuture>) {
        self.previous_frame_end = Some(after_future);
    }

    pub fn take_previous_frame_end(&mut self) -> Box<dyn GpuFuture> {
        self.previous_frame_end
            .take()
            .unwrap_or_else(|| sync::now(self.device.clone()).boxed())
    }

    /// Present the rendered image. A failed flush is logged and the frame is
    /// dropped; the next frame starts from a fresh future.
    pub fn present(&mut self, after_future: Box<dyn GpuFuture>, image_index: u32) -> Box<dyn GpuFuture> {
        let future = after_future
            .then_swapchain_present(
                self.queue.clone(),
                SwapchainPresentInfo::swapchain_image_index(self.swapchain.clone(), image_index),
            )
            .then_signal_fence_and_flush();

        match future.map_err(Validated::unwrap) {
            Ok(future) => future.boxed(),
            Err(VulkanError::OutOfDate) => {
                self.recreate_swapchain = true;
                sync::now(self.device.clone()).boxed()
            }
            Err(e) => {
                tracing::warn!(error = ?e, "failed to flush frame");
                sync::now(self.device.clone()).boxed()
            }
        }
    }
}

fn graphics_queue_family(device: &Arc<PhysicalDevice>, surface: &Surface) -> Option<u32> {
    device
        .queue_family_properties()
        .iter()
        .enumerate()
        .position(|(i, q)| {
            q.queue_flags.intersects(QueueFlags::GRAPHICS)
                && device.surface_support(i as u32, surface).unwrap_or(false)
        })
        .map(|i| i as u32)
}
