mod error;
mod frame_device;
mod raii;
mod render_device;
mod sync;
mod timeout;

#[cfg(test)]
pub(crate) mod mock_device;

pub use self::{
    error::VulkanError,
    frame_device::{FrameDevice, FrameSubmission},
    raii::{CommandBuffer, CommandBufferState, CommandPool, Fence, Semaphore},
    render_device::{Queue, RenderDevice},
    sync::SyncPrimitiveSet,
    timeout::TimeoutPolicy,
};
