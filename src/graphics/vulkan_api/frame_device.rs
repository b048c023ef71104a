use ash::{prelude::VkResult, vk};

/// The parameters of a single frame's queue submission.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FrameSubmission {
    pub command_buffer: vk::CommandBuffer,

    /// Waited on before `wait_stage` executes.
    pub wait_semaphore: vk::Semaphore,
    pub wait_stage: vk::PipelineStageFlags,

    /// Signaled when the command buffer finishes executing.
    pub signal_semaphore: vk::Semaphore,

    /// Signaled when the command buffer finishes executing.
    pub fence: vk::Fence,
}

/// Every Vulkan call made while driving frames.
///
/// The frame loop only ever talks to the GPU through this trait. Results are
/// passed through untouched so callers can classify driver status codes like
/// `TIMEOUT` or `ERROR_OUT_OF_DATE_KHR` themselves.
///
/// # Safety
///
/// All methods are unsafe because they mirror raw Vulkan entrypoints. Callers
/// are responsible for the usual Vulkan valid-usage rules: handles must have
/// been created by this device, must not be destroyed while in use by the
/// GPU, and command buffer methods must be called in a legal order.
pub trait FrameDevice {
    unsafe fn create_semaphore(&self) -> VkResult<vk::Semaphore>;

    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore);

    unsafe fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence>;

    unsafe fn destroy_fence(&self, fence: vk::Fence);

    /// Block until the fence is signaled or `timeout` nanoseconds elapse.
    /// A timeout is reported as `Err(vk::Result::TIMEOUT)`.
    unsafe fn wait_for_fence(
        &self,
        fence: vk::Fence,
        timeout: u64,
    ) -> VkResult<()>;

    unsafe fn reset_fence(&self, fence: vk::Fence) -> VkResult<()>;

    /// Create a command pool on the graphics queue family whose buffers can
    /// be individually reset.
    unsafe fn create_command_pool(&self) -> VkResult<vk::CommandPool>;

    /// Destroys the pool and every buffer allocated from it.
    unsafe fn destroy_command_pool(&self, command_pool: vk::CommandPool);

    unsafe fn allocate_primary_command_buffer(
        &self,
        command_pool: vk::CommandPool,
    ) -> VkResult<vk::CommandBuffer>;

    unsafe fn reset_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> VkResult<()>;

    unsafe fn begin_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> VkResult<()>;

    unsafe fn end_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> VkResult<()>;

    unsafe fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_values: &[vk::ClearValue],
    );

    unsafe fn cmd_bind_graphics_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    );

    unsafe fn cmd_set_viewport(
        &self,
        command_buffer: vk::CommandBuffer,
        viewport: vk::Viewport,
    );

    unsafe fn cmd_set_scissor(
        &self,
        command_buffer: vk::CommandBuffer,
        scissor: vk::Rect2D,
    );

    unsafe fn cmd_bind_vertex_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
    );

    unsafe fn cmd_bind_index_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
    );

    unsafe fn cmd_draw_indexed(
        &self,
        command_buffer: vk::CommandBuffer,
        index_count: u32,
        instance_count: u32,
    );

    unsafe fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer);

    /// Submit to the graphics queue.
    unsafe fn queue_submit(
        &self,
        submission: &FrameSubmission,
    ) -> VkResult<()>;

    /// Acquire the next swapchain image, signaling `semaphore` once the
    /// presentation engine is done with it.
    ///
    /// Returns the image index and whether the swapchain is suboptimal.
    unsafe fn acquire_next_image(
        &self,
        timeout: u64,
        semaphore: vk::Semaphore,
    ) -> VkResult<(u32, bool)>;

    /// Present on the presentation queue once `wait_semaphore` is signaled.
    ///
    /// Returns true when the swapchain is suboptimal.
    unsafe fn queue_present(
        &self,
        wait_semaphore: vk::Semaphore,
        image_index: u32,
    ) -> VkResult<bool>;

    unsafe fn device_wait_idle(&self) -> VkResult<()>;

    /// Give a Vulkan object a name which shows up in validation messages.
    /// Devices without debug utils can ignore this.
    fn set_debug_name(
        &self,
        _object_type: vk::ObjectType,
        _raw_handle: u64,
        _name: &str,
    ) {
    }
}
