mod command_buffer;
mod command_pool;
mod fence;
mod semaphore;

pub use self::{
    command_buffer::{CommandBuffer, CommandBufferState},
    command_pool::CommandPool,
    fence::Fence,
    semaphore::Semaphore,
};
