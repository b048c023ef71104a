//! Swapchain image bookkeeping plus the logic for acquiring and presenting
//! images.
//!
//! It's nice to bundle the acquire/present result handling up into one spot
//! because it ends up being so verbose.

use {
    crate::graphics::{
        vulkan_api::{FrameDevice, TimeoutPolicy, VulkanError},
        FrameError,
    },
    ash::vk,
};

/// Indicates that the swapchain needs a rebuild, or that the operation
/// completed with the given image.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum SwapchainStatus {
    /// Completed the operation with the given swapchain image index.
    Index(u32),

    /// Completed the operation with the given image index, but the swapchain
    /// no longer matches the surface exactly.
    Suboptimal(u32),

    /// The swapchain is out of date and nothing was acquired or presented.
    NeedsRebuild,
}

/// The presentable images for a swapchain, represented by the framebuffers
/// which target each image.
///
/// Framebuffer `i` targets swapchain image `i`. The set is owned by the
/// presentation layer: the render pass and framebuffers are borrowed and are
/// never destroyed here.
#[derive(Debug, Clone)]
pub struct SwapchainImageSet {
    render_pass: vk::RenderPass,
    extent: vk::Extent2D,
    framebuffers: Vec<vk::Framebuffer>,
}

// Public API
// ----------

impl SwapchainImageSet {
    /// Describe the swapchain images which can be rendered to.
    ///
    /// # Params
    ///
    /// * `render_pass` - the render pass every framebuffer is compatible with
    /// * `extent` - the size of every swapchain image
    /// * `framebuffers` - one framebuffer per swapchain image, in swapchain
    ///   image order
    pub fn new(
        render_pass: vk::RenderPass,
        extent: vk::Extent2D,
        framebuffers: Vec<vk::Framebuffer>,
    ) -> Result<Self, VulkanError> {
        if framebuffers.is_empty() {
            return Err(VulkanError::NoSwapchainFramebuffers);
        }
        Ok(Self {
            render_pass,
            extent,
            framebuffers,
        })
    }

    pub fn image_count(&self) -> usize {
        self.framebuffers.len()
    }

    pub fn extent(&self) -> vk::Extent2D {
        self.extent
    }

    pub fn render_pass(&self) -> vk::RenderPass {
        self.render_pass
    }

    /// The framebuffer targeting the given swapchain image.
    pub fn framebuffer(
        &self,
        image_index: u32,
    ) -> Result<vk::Framebuffer, FrameError> {
        self.framebuffers
            .get(image_index as usize)
            .copied()
            .ok_or(FrameError::ImageIndexOutOfRange {
                index: image_index,
                image_count: self.framebuffers.len(),
            })
    }

    /// Acquire the next swapchain image.
    ///
    /// # Params
    ///
    /// * `semaphore` - signaled when the swapchain image is available. It is
    ///   only signaled when an index is returned.
    /// * `timeout` - how long to block waiting for an image
    ///
    /// # Safety
    ///
    /// The semaphore must be unsignaled with no pending signal operation.
    pub unsafe fn acquire_next_image<D: FrameDevice>(
        &self,
        device: &D,
        timeout: TimeoutPolicy,
        semaphore: vk::Semaphore,
    ) -> Result<SwapchainStatus, FrameError> {
        let result =
            device.acquire_next_image(timeout.as_vk_timeout(), semaphore);
        let status = match result {
            // index acquired and the swapchain is optimal
            Ok((index, false)) => SwapchainStatus::Index(index),

            // index acquired but the swapchain is suboptimal for the surface
            Ok((index, true)) => {
                log::debug!("Acquire Image: Swapchain suboptimal.");
                SwapchainStatus::Suboptimal(index)
            }

            // the swapchain is lost and needs to be rebuilt
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::debug!("Acquire Image: Swapchain lost, needs rebuild.");
                return Ok(SwapchainStatus::NeedsRebuild);
            }

            Err(vk::Result::TIMEOUT) | Err(vk::Result::NOT_READY) => {
                return Err(FrameError::AcquireTimeout(timeout));
            }

            Err(vk::Result::ERROR_DEVICE_LOST) => {
                return Err(FrameError::DeviceLost);
            }

            Err(err) => return Err(FrameError::AcquireFailed(err)),
        };

        // make sure the index can be used to pick a framebuffer
        match status {
            SwapchainStatus::Index(index)
            | SwapchainStatus::Suboptimal(index) => {
                self.framebuffer(index)?;
            }
            SwapchainStatus::NeedsRebuild => (),
        }
        Ok(status)
    }

    /// Present a swapchain image to the screen.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - `image_index` must have been acquired and not yet presented
    ///   - rendering must transition the image to the present layout.
    ///     Typically this is done with the render pass.
    pub unsafe fn present_image<D: FrameDevice>(
        &self,
        device: &D,
        wait_semaphore: vk::Semaphore,
        image_index: u32,
    ) -> Result<SwapchainStatus, FrameError> {
        let result = device.queue_present(wait_semaphore, image_index);
        match result {
            // presentation succeeded and the swapchain is still optimal
            Ok(false) => Ok(SwapchainStatus::Index(image_index)),

            // presentation succeeded but the swapchain is suboptimal
            Ok(true) => {
                log::debug!("Present Image: Swapchain is suboptimal");
                Ok(SwapchainStatus::Suboptimal(image_index))
            }

            // the swapchain is lost and needs to be rebuilt
            Err(vk::Result::ERROR_OUT_OF_DATE_KHR) => {
                log::debug!("Present Image: Swapchain lost, needs rebuild.");
                Ok(SwapchainStatus::NeedsRebuild)
            }

            Err(vk::Result::ERROR_DEVICE_LOST) => Err(FrameError::DeviceLost),

            Err(source) => Err(FrameError::PresentFailed {
                image_index,
                source,
            }),
        }
    }
}
