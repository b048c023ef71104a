use {
    crate::graphics::vulkan_api::{TimeoutPolicy, VulkanError},
    ash::vk,
    thiserror::Error,
};

/// Everything that can go wrong while rendering a frame.
///
/// Use `is_fatal()` to decide whether the frame loop can keep running.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    VulkanError(#[from] VulkanError),

    #[error("Timed out after {} waiting for the previous frame to finish", .0)]
    FenceTimeout(TimeoutPolicy),

    #[error("Timed out after {} waiting for a swapchain image", .0)]
    AcquireTimeout(TimeoutPolicy),

    #[error("Unable to acquire the next swapchain image {:?}", .0)]
    AcquireFailed(#[source] vk::Result),

    #[error(
        "The swapchain returned image {} but only has {} framebuffers",
        .index,
        .image_count
    )]
    ImageIndexOutOfRange { index: u32, image_count: usize },

    #[error("Unable to record commands for swapchain image {}", .image_index)]
    RecordingFailed {
        image_index: u32,
        #[source]
        source: VulkanError,
    },

    #[error("Unable to submit graphics commands for frame {}", .frame_index)]
    SubmissionFailed {
        frame_index: u64,
        #[source]
        source: vk::Result,
    },

    #[error("Unable to present swapchain image {} {:?}", .image_index, .source)]
    PresentFailed {
        image_index: u32,
        #[source]
        source: vk::Result,
    },

    #[error("The Vulkan device was lost")]
    DeviceLost,

    #[error("The frame loop halted after a fatal error and cannot render")]
    LoopHalted,
}

impl FrameError {
    /// Fatal errors leave the frame loop's synchronization state unusable.
    /// The loop refuses to render any more frames after one occurs.
    ///
    /// Non-fatal errors abandon the current frame only. The next call to
    /// `render_frame` can proceed normally.
    pub fn is_fatal(&self) -> bool {
        match self {
            FrameError::FenceTimeout(_)
            | FrameError::AcquireTimeout(_)
            | FrameError::AcquireFailed(_)
            | FrameError::PresentFailed { .. } => false,

            FrameError::VulkanError(_)
            | FrameError::ImageIndexOutOfRange { .. }
            | FrameError::RecordingFailed { .. }
            | FrameError::SubmissionFailed { .. }
            | FrameError::DeviceLost
            | FrameError::LoopHalted => true,
        }
    }
}
