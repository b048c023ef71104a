use {
    super::CommandBuffer,
    crate::graphics::vulkan_api::{FrameDevice, VulkanError},
    ash::{vk, vk::Handle},
    std::sync::Arc,
};

/// RAII Vulkan CommandPool.
///
/// Buffers allocated from the pool are freed along with it.
pub struct CommandPool<D: FrameDevice> {
    command_pool: vk::CommandPool,
    device: Arc<D>,
}

impl<D: FrameDevice> CommandPool<D> {
    /// Create a new Vulkan command pool on the graphics queue family.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - command pools must be destroyed before the Vulkan device is
    ///     dropped.
    pub unsafe fn new(device: Arc<D>) -> Result<Self, VulkanError> {
        let command_pool = device
            .create_command_pool()
            .map_err(VulkanError::UnableToCreateCommandPool)?;
        Ok(Self {
            command_pool,
            device,
        })
    }

    /// Set the name which shows up in Vulkan debug logs for this resource.
    pub fn set_debug_name(&self, name: impl AsRef<str>) {
        self.device.set_debug_name(
            vk::ObjectType::COMMAND_POOL,
            self.command_pool.as_raw(),
            name.as_ref(),
        );
    }

    /// Allocate a primary command buffer from this pool.
    ///
    /// Note: The command pool destroys all allocated buffers when it is
    /// dropped. The caller must ensure that no command buffers are kept around
    /// after the pool is dropped.
    pub fn allocate_primary_command_buffer(
        &self,
    ) -> Result<CommandBuffer, VulkanError> {
        let raw = unsafe {
            self.device
                .allocate_primary_command_buffer(self.command_pool)
                .map_err(VulkanError::UnableToAllocateCommandBuffer)?
        };
        Ok(CommandBuffer::new(raw))
    }

    /// Get the raw Vulkan command pool handle.
    pub fn raw(&self) -> vk::CommandPool {
        self.command_pool
    }
}

impl<D: FrameDevice> Drop for CommandPool<D> {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_command_pool(self.command_pool);
        }
    }
}

impl<D: FrameDevice> std::fmt::Debug for CommandPool<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandPool")
            .field("command_pool", &self.command_pool)
            .finish()
    }
}
