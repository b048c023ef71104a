/// Where the frame loop is within the current iteration.
///
/// Every successful or non-fatally failed iteration returns to `Idle`. A
/// fatal failure moves the loop to `Halted`, which is terminal.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    Idle,

    /// Blocked until the previous submission's fence is signaled.
    WaitFence,

    /// Waiting on the presentation engine for a swapchain image.
    Acquiring,

    /// Resetting the command buffer and recording the frame's commands.
    Recording,

    /// Handing the recorded commands to the graphics queue.
    Submitted,

    /// Queueing the rendered image for presentation.
    Presenting,

    /// A fatal error left the synchronization state unusable.
    Halted,
}

/// The outcome of a single call to `FrameLoop::render_frame`.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameStatus {
    /// The frame was rendered and queued for presentation.
    Presented { frame_index: u64, image_index: u32 },

    /// The frame was rendered and presented, but the swapchain reported that
    /// it no longer matches the surface. Swapchain recreation is not
    /// supported so rendering simply continues.
    SwapchainStale { frame_index: u64, image_index: u32 },

    /// The swapchain was out of date when acquiring an image. Nothing was
    /// recorded or submitted.
    Skipped,
}

impl FrameStatus {
    /// The swapchain image used by the frame, if one was acquired.
    pub fn image_index(&self) -> Option<u32> {
        match *self {
            FrameStatus::Presented { image_index, .. }
            | FrameStatus::SwapchainStale { image_index, .. } => {
                Some(image_index)
            }
            FrameStatus::Skipped => None,
        }
    }

    /// The frame counter value for the frame, if it was submitted.
    pub fn frame_index(&self) -> Option<u64> {
        match *self {
            FrameStatus::Presented { frame_index, .. }
            | FrameStatus::SwapchainStale { frame_index, .. } => {
                Some(frame_index)
            }
            FrameStatus::Skipped => None,
        }
    }
}
