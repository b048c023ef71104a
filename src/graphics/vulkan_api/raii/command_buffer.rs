use {
    crate::graphics::vulkan_api::{FrameDevice, VulkanError},
    ash::{vk, vk::Handle},
};

/// The lifecycle of a primary command buffer, as tracked on the CPU.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CommandBufferState {
    /// Freshly allocated or reset. Ready to begin recording.
    Initial,

    /// Between begin and end.
    Recording,

    /// Recorded and ready to submit.
    Executable,

    /// Submitted and possibly still executing on the GPU.
    Pending,
}

/// A primary command buffer along with its lifecycle state.
///
/// The buffer is owned by the CommandPool it was allocated from and is freed
/// when that pool is dropped.
#[derive(Debug)]
pub struct CommandBuffer {
    command_buffer: vk::CommandBuffer,
    state: CommandBufferState,
}

// Public API
// ----------

impl CommandBuffer {
    /// Get the raw Vulkan command buffer handle.
    pub fn raw(&self) -> vk::CommandBuffer {
        self.command_buffer
    }

    pub fn state(&self) -> CommandBufferState {
        self.state
    }

    /// Set the name which shows up in Vulkan debug logs for this resource.
    pub fn set_debug_name<D: FrameDevice>(
        &self,
        device: &D,
        name: impl AsRef<str>,
    ) {
        device.set_debug_name(
            vk::ObjectType::COMMAND_BUFFER,
            self.command_buffer.as_raw(),
            name.as_ref(),
        );
    }

    /// Return the buffer to the initial state, discarding any commands.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - the GPU must be done with the buffer. The state check only knows
    ///     about submissions which were never marked complete.
    pub unsafe fn reset<D: FrameDevice>(
        &mut self,
        device: &D,
    ) -> Result<(), VulkanError> {
        self.require("reset", |state| state != CommandBufferState::Pending)?;
        device
            .reset_command_buffer(self.command_buffer)
            .map_err(VulkanError::UnableToResetCommandBuffer)?;
        self.state = CommandBufferState::Initial;
        Ok(())
    }

    /// Begin recording.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - the device must be the one which allocated this buffer.
    pub unsafe fn begin<D: FrameDevice>(
        &mut self,
        device: &D,
    ) -> Result<(), VulkanError> {
        self.require("begin", |state| state == CommandBufferState::Initial)?;
        device
            .begin_command_buffer(self.command_buffer)
            .map_err(VulkanError::UnableToBeginCommandBuffer)?;
        self.state = CommandBufferState::Recording;
        Ok(())
    }

    /// Finish recording.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - every render pass begun in this buffer must have been ended.
    pub unsafe fn end<D: FrameDevice>(
        &mut self,
        device: &D,
    ) -> Result<(), VulkanError> {
        self.require("end", |state| state == CommandBufferState::Recording)?;
        device
            .end_command_buffer(self.command_buffer)
            .map_err(VulkanError::UnableToEndCommandBuffer)?;
        self.state = CommandBufferState::Executable;
        Ok(())
    }

    /// True when commands can be recorded into the buffer.
    pub fn is_recording(&self) -> bool {
        self.state == CommandBufferState::Recording
    }
}

// Private API
// -----------

impl CommandBuffer {
    pub(super) fn new(command_buffer: vk::CommandBuffer) -> Self {
        Self {
            command_buffer,
            state: CommandBufferState::Initial,
        }
    }

    /// Record that the buffer was handed to the queue.
    pub(crate) fn mark_submitted(&mut self) -> Result<(), VulkanError> {
        self.require("submit", |state| {
            state == CommandBufferState::Executable
        })?;
        self.state = CommandBufferState::Pending;
        Ok(())
    }

    /// Record that the fence guarding the last submission was observed
    /// signaled.
    pub(crate) fn mark_completed(&mut self) {
        if self.state == CommandBufferState::Pending {
            self.state = CommandBufferState::Executable;
        }
    }

    fn require(
        &self,
        operation: &'static str,
        allowed: impl Fn(CommandBufferState) -> bool,
    ) -> Result<(), VulkanError> {
        if allowed(self.state) {
            Ok(())
        } else {
            Err(VulkanError::InvalidCommandBufferState {
                operation,
                actual: self.state,
            })
        }
    }
}
