use {
    crate::graphics::vulkan_api::{FrameDevice, VulkanError},
    ash::{vk, vk::Handle},
    std::sync::Arc,
};

/// RAII Vulkan Semaphore.
pub struct Semaphore<D: FrameDevice> {
    semaphore: vk::Semaphore,
    device: Arc<D>,
}

impl<D: FrameDevice> Semaphore<D> {
    /// Create a new binary Vulkan semaphore.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - The semaphore must be dropped before the device is destroyed.
    pub unsafe fn new(device: Arc<D>) -> Result<Self, VulkanError> {
        let semaphore = device
            .create_semaphore()
            .map_err(VulkanError::UnableToCreateSemaphore)?;
        Ok(Self { semaphore, device })
    }

    /// Set the name which shows up in Vulkan debug logs for this resource.
    pub fn set_debug_name(&self, name: impl AsRef<str>) {
        self.device.set_debug_name(
            vk::ObjectType::SEMAPHORE,
            self.semaphore.as_raw(),
            name.as_ref(),
        );
    }

    /// Get the Vulkan semaphore handle.
    pub fn raw(&self) -> vk::Semaphore {
        self.semaphore
    }
}

impl<D: FrameDevice> Drop for Semaphore<D> {
    fn drop(&mut self) {
        unsafe {
            self.device.destroy_semaphore(self.semaphore);
        }
    }
}

impl<D: FrameDevice> std::fmt::Debug for Semaphore<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Semaphore")
            .field("semaphore", &self.semaphore)
            .finish()
    }
}
