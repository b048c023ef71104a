use {
    crate::graphics::{
        vulkan_api::{CommandBuffer, FrameDevice, VulkanError},
        FrameError, SwapchainImageSet,
    },
    ash::vk,
};

/// The GPU resources used to draw each frame. They are created and uploaded
/// by the caller and must outlive the FrameRecorder.
#[derive(Debug, Copy, Clone)]
pub struct DrawResources {
    /// A graphics pipeline compatible with the swapchain render pass, with
    /// dynamic viewport and scissor state.
    pub pipeline: vk::Pipeline,
    pub vertex_buffer: vk::Buffer,
    pub index_buffer: vk::Buffer,
    pub index_count: u32,
    pub index_type: vk::IndexType,
}

impl DrawResources {
    /// Draw resources for a mesh with 16 bit indices.
    pub fn new(
        pipeline: vk::Pipeline,
        vertex_buffer: vk::Buffer,
        index_buffer: vk::Buffer,
        index_count: u32,
    ) -> Self {
        Self {
            pipeline,
            vertex_buffer,
            index_buffer,
            index_count,
            index_type: vk::IndexType::UINT16,
        }
    }

    pub fn with_index_type(self, index_type: vk::IndexType) -> Self {
        Self { index_type, ..self }
    }
}

/// Records the commands which draw a single frame into a swapchain image.
#[derive(Debug, Clone)]
pub struct FrameRecorder {
    draw: DrawResources,
    clear_color: [f32; 4],
}

impl FrameRecorder {
    pub fn new(draw: DrawResources, clear_color: [f32; 4]) -> Self {
        Self { draw, clear_color }
    }

    pub fn clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    /// Record the frame's render pass into the command buffer.
    ///
    /// The command buffer is begun and ended here, so it must be in the
    /// initial state. If anything fails the error is returned and the buffer
    /// must be reset before it is used again. It must never be submitted.
    ///
    /// # Params
    ///
    /// * `image_index` - the swapchain image returned by acquire. It selects
    ///   which framebuffer the render pass targets.
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - the command buffer must have been allocated by `device`
    ///   - every handle in the draw resources and image set must be valid
    pub unsafe fn record<D: FrameDevice>(
        &self,
        device: &D,
        command_buffer: &mut CommandBuffer,
        images: &SwapchainImageSet,
        image_index: u32,
    ) -> Result<(), FrameError> {
        let framebuffer = images.framebuffer(image_index)?;
        let as_recording_error = |source: VulkanError| {
            FrameError::RecordingFailed {
                image_index,
                source,
            }
        };

        command_buffer.begin(device).map_err(as_recording_error)?;

        let cmd = command_buffer.raw();
        let extent = images.extent();
        let full_image = vk::Rect2D {
            offset: vk::Offset2D { x: 0, y: 0 },
            extent,
        };
        let clear_values = [vk::ClearValue {
            color: vk::ClearColorValue {
                float32: self.clear_color,
            },
        }];
        device.cmd_begin_render_pass(
            cmd,
            images.render_pass(),
            framebuffer,
            full_image,
            &clear_values,
        );

        device.cmd_bind_graphics_pipeline(cmd, self.draw.pipeline);

        // viewport and scissor are dynamic pipeline state
        device.cmd_set_viewport(
            cmd,
            vk::Viewport {
                x: 0.0,
                y: 0.0,
                width: extent.width as f32,
                height: extent.height as f32,
                min_depth: 0.0,
                max_depth: 1.0,
            },
        );
        device.cmd_set_scissor(cmd, full_image);

        device.cmd_bind_vertex_buffer(cmd, self.draw.vertex_buffer, 0);
        device.cmd_bind_index_buffer(
            cmd,
            self.draw.index_buffer,
            0,
            self.draw.index_type,
        );
        device.cmd_draw_indexed(cmd, self.draw.index_count, 1);

        device.cmd_end_render_pass(cmd);

        command_buffer.end(device).map_err(as_recording_error)?;
        Ok(())
    }
}
