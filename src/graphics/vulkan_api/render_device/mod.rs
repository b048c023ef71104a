mod api;
mod queue;

use ash::{
    extensions::{ext::DebugUtils, khr},
    vk,
};

pub use self::queue::Queue;

/// The Vulkan logical device, swapchain, and queues needed to drive frames.
///
/// Everything here is created by the window/device setup code and is only
/// borrowed by the RenderDevice. None of it is destroyed on drop.
pub struct RenderDevice {
    graphics_queue: Queue,
    present_queue: Queue,
    swapchain: vk::SwapchainKHR,
    swapchain_loader: khr::Swapchain,
    debug_utils: Option<DebugUtils>,
    logical_device: ash::Device,
}

impl RenderDevice {
    /// Bundle up the externally-created Vulkan objects used to render frames.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - every handle must outlive this RenderDevice and anything created
    ///     through it
    ///   - `swapchain` must have been created with `swapchain_loader` for
    ///     `logical_device`
    ///   - the graphics queue must support graphics operations and the
    ///     present queue must support presentation to the swapchain's surface
    pub unsafe fn new(
        logical_device: ash::Device,
        swapchain_loader: khr::Swapchain,
        swapchain: vk::SwapchainKHR,
        graphics_queue: Queue,
        present_queue: Queue,
        debug_utils: Option<DebugUtils>,
    ) -> Self {
        if graphics_queue.is_same(&present_queue) {
            log::debug!(
                "render device graphics and present share {}",
                graphics_queue
            );
        } else {
            log::debug!(
                "render device using graphics {} and present {}",
                graphics_queue,
                present_queue
            );
        }
        Self {
            graphics_queue,
            present_queue,
            swapchain,
            swapchain_loader,
            debug_utils,
            logical_device,
        }
    }

    /// The raw ash device.
    pub fn device(&self) -> &ash::Device {
        &self.logical_device
    }

    pub fn graphics_queue(&self) -> &Queue {
        &self.graphics_queue
    }

    pub fn present_queue(&self) -> &Queue {
        &self.present_queue
    }
}

impl std::fmt::Debug for RenderDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderDevice")
            .field("graphics_queue", &self.graphics_queue)
            .field("present_queue", &self.present_queue)
            .field("swapchain", &self.swapchain)
            .field("debug_utils", &self.debug_utils.is_some())
            .finish()
    }
}
