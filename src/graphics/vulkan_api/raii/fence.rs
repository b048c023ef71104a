use {
    crate::graphics::vulkan_api::{FrameDevice, VulkanError},
    ash::{prelude::VkResult, vk, vk::Handle},
    std::sync::Arc,
};

/// RAII Vulkan Fence.
pub struct Fence<D: FrameDevice> {
    fence: vk::Fence,
    device: Arc<D>,
}

impl<D: FrameDevice> Fence<D> {
    /// Create a new Vulkan fence.
    ///
    /// # Params
    ///
    /// * `signaled` - create the fence in the signaled state so the first
    ///   wait returns immediately.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - The fence must be dropped before the device is destroyed.
    pub unsafe fn new(
        device: Arc<D>,
        signaled: bool,
    ) -> Result<Self, VulkanError> {
        let fence = device
            .create_fence(signaled)
            .map_err(VulkanError::UnableToCreateFence)?;
        Ok(Self { fence, device })
    }

    /// Set the name which shows up in Vulkan debug logs for this resource.
    pub fn set_debug_name(&self, name: impl AsRef<str>) {
        self.device.set_debug_name(
            vk::ObjectType::FENCE,
            self.fence.as_raw(),
            name.as_ref(),
        );
    }

    /// Block until the fence is signaled or the timeout elapses.
    ///
    /// The raw result is returned so callers can tell a timeout
    /// (`vk::Result::TIMEOUT`) apart from a lost device.
    pub fn wait(&self, timeout: u64) -> VkResult<()> {
        unsafe { self.device.wait_for_fence(self.fence, timeout) }
    }

    /// Return the fence to the unsignaled state.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - the fence must not be referenced by a pending queue submission.
    pub unsafe fn reset(&self) -> Result<(), VulkanError> {
        self.device
            .reset_fence(self.fence)
            .map_err(VulkanError::UnexpectedFenceResetError)
    }

    /// Get the Vulkan fence handle.
    pub fn raw(&self) -> vk::Fence {
        self.fence
    }
}

impl<D: FrameDevice> Drop for Fence<D> {
    /// # DANGER
    ///
    /// There is no internal synchronization for this type. Unexpected behavior
    /// can occur if this instance is still in-use by the GPU when it is
    /// dropped.
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_fence(self.fence);
        }
    }
}

impl<D: FrameDevice> std::fmt::Debug for Fence<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fence").field("fence", &self.fence).finish()
    }
}
