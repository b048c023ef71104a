use {crate::graphics::vulkan_api::CommandBufferState, ash::vk, thiserror::Error};

#[derive(Debug, Error)]
pub enum VulkanError {
    #[error("Unable to create a semaphore {:?}", .0)]
    UnableToCreateSemaphore(#[source] vk::Result),

    #[error("Unable to create a fence {:?}", .0)]
    UnableToCreateFence(#[source] vk::Result),

    #[error("Unable to create a command pool {:?}", .0)]
    UnableToCreateCommandPool(#[source] vk::Result),

    #[error("Unable to allocate a command buffer {:?}", .0)]
    UnableToAllocateCommandBuffer(#[source] vk::Result),

    #[error("Unexpected error while waiting for a fence {:?}", .0)]
    UnexpectedFenceWaitError(#[source] vk::Result),

    #[error("Unexpected error while resetting a fence {:?}", .0)]
    UnexpectedFenceResetError(#[source] vk::Result),

    #[error("Unable to reset the command buffer {:?}", .0)]
    UnableToResetCommandBuffer(#[source] vk::Result),

    #[error("Unable to begin the command buffer {:?}", .0)]
    UnableToBeginCommandBuffer(#[source] vk::Result),

    #[error("Unable to end the command buffer {:?}", .0)]
    UnableToEndCommandBuffer(#[source] vk::Result),

    #[error("Cannot {} a command buffer in the {:?} state", .operation, .actual)]
    InvalidCommandBufferState {
        operation: &'static str,
        actual: CommandBufferState,
    },

    #[error("Unable to wait for the device to idle {:?}", .0)]
    UnableToWaitForDeviceToIdle(#[source] vk::Result),

    #[error("The swapchain has no framebuffers")]
    NoSwapchainFramebuffers,
}
