//! The synchronization primitives for a single frame in flight.

use {
    crate::graphics::vulkan_api::{Fence, FrameDevice, Semaphore, VulkanError},
    std::sync::Arc,
};

/// One "image available" semaphore, one "render finished" semaphore, and the
/// fence which tells the CPU when the frame's GPU work has completed.
///
/// All three are destroyed when the set is dropped. If construction fails
/// part way through, whatever was already created is destroyed too.
pub struct SyncPrimitiveSet<D: FrameDevice> {
    /// Signaled by the presentation engine when the acquired image can be
    /// rendered to.
    pub image_available: Semaphore<D>,

    /// Signaled by the graphics queue when rendering is done. Presentation
    /// waits on it.
    pub render_finished: Semaphore<D>,

    /// Signaled by the graphics queue when the frame's submission completes.
    /// Starts signaled so the very first frame does not wait.
    pub in_flight: Fence<D>,
}

impl<D: FrameDevice> SyncPrimitiveSet<D> {
    /// Create the frame's semaphores and fence.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - the set must be dropped before the device is destroyed
    ///   - the set must not be dropped while the GPU still references it
    pub unsafe fn new(device: Arc<D>) -> Result<Self, VulkanError> {
        let image_available = Semaphore::new(device.clone())?;
        image_available.set_debug_name("Frame Image Available");

        let render_finished = Semaphore::new(device.clone())?;
        render_finished.set_debug_name("Frame Render Finished");

        let in_flight = Fence::new(device, true)?;
        in_flight.set_debug_name("Frame In Flight");

        Ok(Self {
            image_available,
            render_finished,
            in_flight,
        })
    }
}

impl<D: FrameDevice> std::fmt::Debug for SyncPrimitiveSet<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncPrimitiveSet")
            .field("image_available", &self.image_available.raw())
            .field("render_finished", &self.render_finished.raw())
            .field("in_flight", &self.in_flight.raw())
            .finish()
    }
}
