use ash::{prelude::VkResult, vk};

use super::RenderDevice;
use crate::graphics::vulkan_api::{FrameDevice, FrameSubmission};

impl FrameDevice for RenderDevice {
    unsafe fn create_semaphore(&self) -> VkResult<vk::Semaphore> {
        let create_info = vk::SemaphoreCreateInfo::default();
        self.logical_device.create_semaphore(&create_info, None)
    }

    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        self.logical_device.destroy_semaphore(semaphore, None)
    }

    unsafe fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence> {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let create_info = vk::FenceCreateInfo {
            flags,
            ..Default::default()
        };
        self.logical_device.create_fence(&create_info, None)
    }

    unsafe fn destroy_fence(&self, fence: vk::Fence) {
        self.logical_device.destroy_fence(fence, None)
    }

    unsafe fn wait_for_fence(
        &self,
        fence: vk::Fence,
        timeout: u64,
    ) -> VkResult<()> {
        self.logical_device.wait_for_fences(&[fence], true, timeout)
    }

    unsafe fn reset_fence(&self, fence: vk::Fence) -> VkResult<()> {
        self.logical_device.reset_fences(&[fence])
    }

    unsafe fn create_command_pool(&self) -> VkResult<vk::CommandPool> {
        let create_info = vk::CommandPoolCreateInfo {
            flags: vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER,
            queue_family_index: self.graphics_queue.family_index(),
            ..Default::default()
        };
        self.logical_device.create_command_pool(&create_info, None)
    }

    unsafe fn destroy_command_pool(&self, command_pool: vk::CommandPool) {
        self.logical_device.destroy_command_pool(command_pool, None)
    }

    unsafe fn allocate_primary_command_buffer(
        &self,
        command_pool: vk::CommandPool,
    ) -> VkResult<vk::CommandBuffer> {
        let allocate_info = vk::CommandBufferAllocateInfo {
            command_pool,
            level: vk::CommandBufferLevel::PRIMARY,
            command_buffer_count: 1,
            ..Default::default()
        };
        let mut buffers =
            self.logical_device.allocate_command_buffers(&allocate_info)?;
        buffers
            .pop()
            .ok_or(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY)
    }

    unsafe fn reset_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> VkResult<()> {
        self.logical_device.reset_command_buffer(
            command_buffer,
            vk::CommandBufferResetFlags::empty(),
        )
    }

    unsafe fn begin_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> VkResult<()> {
        let begin_info = vk::CommandBufferBeginInfo::default();
        self.logical_device
            .begin_command_buffer(command_buffer, &begin_info)
    }

    unsafe fn end_command_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
    ) -> VkResult<()> {
        self.logical_device.end_command_buffer(command_buffer)
    }

    unsafe fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_values: &[vk::ClearValue],
    ) {
        let begin_info = vk::RenderPassBeginInfo {
            render_pass,
            framebuffer,
            render_area,
            clear_value_count: clear_values.len() as u32,
            p_clear_values: clear_values.as_ptr(),
            ..Default::default()
        };
        self.logical_device.cmd_begin_render_pass(
            command_buffer,
            &begin_info,
            vk::SubpassContents::INLINE,
        );
    }

    unsafe fn cmd_bind_graphics_pipeline(
        &self,
        command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    ) {
        self.logical_device.cmd_bind_pipeline(
            command_buffer,
            vk::PipelineBindPoint::GRAPHICS,
            pipeline,
        );
    }

    unsafe fn cmd_set_viewport(
        &self,
        command_buffer: vk::CommandBuffer,
        viewport: vk::Viewport,
    ) {
        self.logical_device
            .cmd_set_viewport(command_buffer, 0, &[viewport]);
    }

    unsafe fn cmd_set_scissor(
        &self,
        command_buffer: vk::CommandBuffer,
        scissor: vk::Rect2D,
    ) {
        self.logical_device
            .cmd_set_scissor(command_buffer, 0, &[scissor]);
    }

    unsafe fn cmd_bind_vertex_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
    ) {
        self.logical_device.cmd_bind_vertex_buffers(
            command_buffer,
            0,
            &[buffer],
            &[offset],
        );
    }

    unsafe fn cmd_bind_index_buffer(
        &self,
        command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        offset: vk::DeviceSize,
        index_type: vk::IndexType,
    ) {
        self.logical_device.cmd_bind_index_buffer(
            command_buffer,
            buffer,
            offset,
            index_type,
        );
    }

    unsafe fn cmd_draw_indexed(
        &self,
        command_buffer: vk::CommandBuffer,
        index_count: u32,
        instance_count: u32,
    ) {
        self.logical_device.cmd_draw_indexed(
            command_buffer,
            index_count,
            instance_count,
            0,
            0,
            0,
        );
    }

    unsafe fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer) {
        self.logical_device.cmd_end_render_pass(command_buffer);
    }

    unsafe fn queue_submit(
        &self,
        submission: &FrameSubmission,
    ) -> VkResult<()> {
        let submit_info = vk::SubmitInfo {
            wait_semaphore_count: 1,
            p_wait_semaphores: &submission.wait_semaphore,
            p_wait_dst_stage_mask: &submission.wait_stage,
            command_buffer_count: 1,
            p_command_buffers: &submission.command_buffer,
            signal_semaphore_count: 1,
            p_signal_semaphores: &submission.signal_semaphore,
            ..Default::default()
        };
        self.logical_device.queue_submit(
            self.graphics_queue.raw(),
            &[submit_info],
            submission.fence,
        )
    }

    unsafe fn acquire_next_image(
        &self,
        timeout: u64,
        semaphore: vk::Semaphore,
    ) -> VkResult<(u32, bool)> {
        self.swapchain_loader.acquire_next_image(
            self.swapchain,
            timeout,
            semaphore,
            vk::Fence::null(),
        )
    }

    unsafe fn queue_present(
        &self,
        wait_semaphore: vk::Semaphore,
        image_index: u32,
    ) -> VkResult<bool> {
        let present_info = vk::PresentInfoKHR {
            wait_semaphore_count: 1,
            p_wait_semaphores: &wait_semaphore,
            swapchain_count: 1,
            p_swapchains: &self.swapchain,
            p_image_indices: &image_index,
            ..Default::default()
        };
        self.swapchain_loader
            .queue_present(self.present_queue.raw(), &present_info)
    }

    unsafe fn device_wait_idle(&self) -> VkResult<()> {
        self.logical_device.device_wait_idle()
    }

    fn set_debug_name(
        &self,
        object_type: vk::ObjectType,
        raw_handle: u64,
        name: &str,
    ) {
        let debug_utils = match &self.debug_utils {
            Some(debug_utils) => debug_utils,
            None => return,
        };
        let cname = match std::ffi::CString::new(name) {
            Ok(cname) => cname,
            Err(err) => {
                log::warn!("invalid debug name {:?}: {}", name, err);
                return;
            }
        };
        let name_info = vk::DebugUtilsObjectNameInfoEXT {
            object_type,
            object_handle: raw_handle,
            p_object_name: cname.as_ptr(),
            ..Default::default()
        };
        let result = unsafe {
            debug_utils.set_debug_utils_object_name(
                self.logical_device.handle(),
                &name_info,
            )
        };
        if let Err(err) = result {
            log::warn!("unable to name {:?} {:?}: {:?}", object_type, name, err);
        }
    }
}
