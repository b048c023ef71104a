mod frame_state;


use {
    crate::{
        config::FrameLoopConfig,
        graphics::{
            vulkan_api::{
                CommandBuffer, CommandPool, FrameDevice, FrameSubmission,
                SyncPrimitiveSet, VulkanError,
            },
            DrawResources, FrameError, FrameRecorder, SwapchainImageSet,
            SwapchainStatus,
        },
    },
    ash::vk,
    indoc::indoc,
    std::sync::Arc,
};

pub use self::frame_state::{FrameState, FrameStatus};

/// Drives the acquire -> record -> submit -> present cycle with exactly one
/// frame in flight.
///
/// Each call to `render_frame` blocks until the GPU has finished the previous
/// frame, so the CPU never runs ahead of the GPU. This keeps the resource
/// tracking trivial at the cost of throughput: every frame pays the full
/// CPU/GPU round trip.
pub struct FrameLoop<D: FrameDevice> {
    state: FrameState,
    frame_index: u64,
    reported_stale_swapchain: bool,
    config: FrameLoopConfig,
    images: SwapchainImageSet,
    recorder: FrameRecorder,

    // Dropped in declaration order, after the device is idle. The command
    // buffer is freed along with the pool.
    command_buffer: CommandBuffer,
    sync: SyncPrimitiveSet<D>,
    command_pool: CommandPool<D>,
    device: Arc<D>,
}

// Public API
// ----------

impl<D: FrameDevice> FrameLoop<D> {
    /// Create the command buffer and synchronization primitives used to
    /// render frames.
    ///
    /// # Params
    ///
    /// * `device` - used to create all Vulkan resources and to submit work
    /// * `images` - the framebuffers for each swapchain image
    /// * `draw` - the pipeline and buffers drawn every frame
    /// * `config` - timeouts and the clear color
    ///
    /// # Safety
    ///
    /// Unsafe because:
    ///   - every handle in `images` and `draw` must outlive the FrameLoop
    ///   - the FrameLoop must be dropped before the device is destroyed
    pub unsafe fn new(
        device: Arc<D>,
        images: SwapchainImageSet,
        draw: DrawResources,
        config: FrameLoopConfig,
    ) -> Result<Self, VulkanError> {
        let sync = SyncPrimitiveSet::new(device.clone())?;

        let command_pool = CommandPool::new(device.clone())?;
        command_pool.set_debug_name("Frame Command Pool");

        let command_buffer = command_pool.allocate_primary_command_buffer()?;
        command_buffer.set_debug_name(device.as_ref(), "Frame Command Buffer");

        log::info!(
            indoc!(
                "
                Created frame loop
                  - swapchain images: {}
                  - extent: {}x{}
                  - fence timeout: {}
                  - acquire timeout: {}"
            ),
            images.image_count(),
            images.extent().width,
            images.extent().height,
            config.fence_timeout,
            config.acquire_timeout,
        );

        Ok(Self {
            state: FrameState::Idle,
            frame_index: 0,
            reported_stale_swapchain: false,
            recorder: FrameRecorder::new(draw, config.clear_color),
            config,
            images,
            command_buffer,
            sync,
            command_pool,
            device,
        })
    }

    /// Render and present a single frame.
    ///
    /// Non-fatal errors abandon the current frame and leave the loop ready
    /// for the next call. After a fatal error every later call returns
    /// `FrameError::LoopHalted` without touching the GPU.
    pub fn render_frame(&mut self) -> Result<FrameStatus, FrameError> {
        if self.state == FrameState::Halted {
            return Err(FrameError::LoopHalted);
        }

        let result = self.try_render_frame();
        match &result {
            Ok(status) => {
                log::trace!("frame complete {:?}", status);
                self.state = FrameState::Idle;
            }
            Err(err) if err.is_fatal() => {
                log::error!(
                    "Fatal error in {:?} on frame {}: {}",
                    self.state,
                    self.frame_index,
                    err
                );
                self.state = FrameState::Halted;
            }
            Err(err) => {
                log::warn!(
                    "Abandoned frame {} in {:?}: {}",
                    self.frame_index,
                    self.state,
                    err
                );
                self.state = FrameState::Idle;
            }
        }
        result
    }

    /// Render frames until `should_close` returns true or a fatal error
    /// occurs.
    ///
    /// `should_close` is checked before every frame. Non-fatal frame errors
    /// are logged and the loop continues. The device is idle when this
    /// returns.
    pub fn run(
        &mut self,
        mut should_close: impl FnMut() -> bool,
    ) -> Result<(), FrameError> {
        while !should_close() {
            match self.render_frame() {
                Err(err) if err.is_fatal() => {
                    if let Err(idle_err) = self.wait_idle() {
                        log::error!("{}", idle_err);
                    }
                    return Err(err);
                }
                _ => (),
            }
        }
        log::info!("Waiting for device to become idle...");
        self.wait_idle()?;
        Ok(())
    }

    /// Block until the device has finished all submitted work.
    pub fn wait_idle(&self) -> Result<(), VulkanError> {
        unsafe {
            self.device
                .device_wait_idle()
                .map_err(VulkanError::UnableToWaitForDeviceToIdle)
        }
    }

    /// The number of frames submitted so far. Also the index the next
    /// submitted frame will get.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub fn is_halted(&self) -> bool {
        self.state == FrameState::Halted
    }

    pub fn images(&self) -> &SwapchainImageSet {
        &self.images
    }

    pub fn config(&self) -> &FrameLoopConfig {
        &self.config
    }
}

// Private API
// -----------

impl<D: FrameDevice> FrameLoop<D> {
    fn try_render_frame(&mut self) -> Result<FrameStatus, FrameError> {
        self.state = FrameState::WaitFence;
        self.wait_for_previous_frame()?;

        self.state = FrameState::Acquiring;
        let acquired = unsafe {
            // SAFE because the previous frame's submission, which waited on
            // the semaphore, has completed.
            self.images.acquire_next_image(
                self.device.as_ref(),
                self.config.acquire_timeout,
                self.sync.image_available.raw(),
            )?
        };
        let (image_index, acquired_suboptimal) = match acquired {
            SwapchainStatus::Index(index) => (index, false),
            SwapchainStatus::Suboptimal(index) => (index, true),
            SwapchainStatus::NeedsRebuild => {
                log::warn!(
                    "Skipping frame {}, the swapchain is out of date",
                    self.frame_index
                );
                return Ok(FrameStatus::Skipped);
            }
        };

        self.state = FrameState::Recording;
        unsafe {
            // SAFE because the fence wait above guarantees the GPU is done
            // with the command buffer.
            self.command_buffer
                .reset(self.device.as_ref())
                .map_err(|source| FrameError::RecordingFailed {
                    image_index,
                    source,
                })?;
            self.recorder.record(
                self.device.as_ref(),
                &mut self.command_buffer,
                &self.images,
                image_index,
            )?;
        }

        self.state = FrameState::Submitted;
        self.submit()?;
        let frame_index = self.frame_index;
        self.frame_index = self.frame_index.wrapping_add(1);

        self.state = FrameState::Presenting;
        let presented = unsafe {
            // SAFE because the image was acquired this frame and rendering
            // signals the semaphore the presentation waits on.
            self.images.present_image(
                self.device.as_ref(),
                self.sync.render_finished.raw(),
                image_index,
            )?
        };

        let stale = acquired_suboptimal
            || !matches!(presented, SwapchainStatus::Index(_));
        if stale {
            self.report_stale_swapchain();
            Ok(FrameStatus::SwapchainStale {
                frame_index,
                image_index,
            })
        } else {
            Ok(FrameStatus::Presented {
                frame_index,
                image_index,
            })
        }
    }

    /// Block until the fence from the last submission is signaled. The fence
    /// starts signaled so this returns immediately on the first frame.
    fn wait_for_previous_frame(&mut self) -> Result<(), FrameError> {
        let timeout = self.config.fence_timeout;
        match self.sync.in_flight.wait(timeout.as_vk_timeout()) {
            Ok(()) => {
                self.command_buffer.mark_completed();
                Ok(())
            }
            Err(vk::Result::TIMEOUT) => Err(FrameError::FenceTimeout(timeout)),
            Err(vk::Result::ERROR_DEVICE_LOST) => Err(FrameError::DeviceLost),
            Err(err) => Err(VulkanError::UnexpectedFenceWaitError(err).into()),
        }
    }

    /// Submit the recorded command buffer.
    ///
    /// The fence is reset here, immediately before submission, so every
    /// earlier failure leaves it signaled and the next wait cannot block.
    /// If the submission itself fails the fence will never be signaled; the
    /// error is fatal so the loop never waits on it again.
    fn submit(&mut self) -> Result<(), FrameError> {
        unsafe {
            // SAFE because the fence was observed signaled at the start of
            // this frame and nothing has been submitted with it since.
            self.sync.in_flight.reset()?;
        }

        let submission = FrameSubmission {
            command_buffer: self.command_buffer.raw(),
            wait_semaphore: self.sync.image_available.raw(),
            // vertex work can start before the image is actually available
            wait_stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            signal_semaphore: self.sync.render_finished.raw(),
            fence: self.sync.in_flight.raw(),
        };
        unsafe {
            self.device.queue_submit(&submission).map_err(|source| {
                FrameError::SubmissionFailed {
                    frame_index: self.frame_index,
                    source,
                }
            })?;
        }
        self.command_buffer.mark_submitted()?;
        Ok(())
    }

    fn report_stale_swapchain(&mut self) {
        if self.reported_stale_swapchain {
            log::debug!(
                "Swapchain still stale on frame {}",
                self.frame_index
            );
        } else {
            log::warn!(
                "The swapchain no longer matches the surface. Rendering \
                 continues without recreating it."
            );
            self.reported_stale_swapchain = true;
        }
    }
}

impl<D: FrameDevice> Drop for FrameLoop<D> {
    fn drop(&mut self) {
        if let Err(err) = self.wait_idle() {
            log::error!("Error while waiting for the device to idle {}", err);
        }
        log::debug!("Destroying frame synchronization primitives...");
    }
}

impl<D: FrameDevice> std::fmt::Debug for FrameLoop<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameLoop")
            .field("state", &self.state)
            .field("frame_index", &self.frame_index)
            .field("config", &self.config)
            .field("images", &self.images)
            .field("command_buffer", &self.command_buffer)
            .field("sync", &self.sync)
            .field("command_pool", &self.command_pool)
            .finish()
    }
}
