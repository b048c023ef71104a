//! A scripted, in-memory FrameDevice used by the unit tests.
//!
//! The mock keeps an ordered log of every call, tracks which handles are
//! alive, and simulates fence state so tests can check ordering and
//! lifetime rules without a GPU.

use {
    crate::graphics::vulkan_api::{FrameDevice, FrameSubmission},
    ash::{prelude::VkResult, vk, vk::Handle},
    std::{
        cell::RefCell,
        collections::{HashMap, HashSet, VecDeque},
    },
};

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    WaitFence { fence: vk::Fence, signaled: bool },
    ResetFence(vk::Fence),
    ResetCommandBuffer,
    BeginCommandBuffer,
    EndCommandBuffer,
    BeginRenderPass {
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        extent: (u32, u32),
        clear_color: [f32; 4],
    },
    BindPipeline(vk::Pipeline),
    SetViewport { width: f32, height: f32, depth: (f32, f32) },
    SetScissor { extent: (u32, u32) },
    BindVertexBuffer(vk::Buffer),
    BindIndexBuffer(vk::Buffer, vk::IndexType),
    DrawIndexed { index_count: u32, instance_count: u32 },
    EndRenderPass,
    Submit(FrameSubmission),
    SubmitRejected(vk::Result),
    Acquire(vk::Semaphore),
    Present { wait_semaphore: vk::Semaphore, image_index: u32 },
    WaitIdle,
}

#[derive(Debug, Default)]
struct MockFence {
    signaled: bool,
    observed_signaled: bool,
}

#[derive(Debug, Default)]
struct MockState {
    next_handle: u64,
    image_count: u32,
    next_image: u32,
    events: Vec<Event>,
    violations: Vec<String>,

    /// Live semaphores and whether each has a signal nobody waited on yet.
    semaphores: HashMap<vk::Semaphore, bool>,
    fences: HashMap<vk::Fence, MockFence>,
    command_pools: HashSet<vk::CommandPool>,

    creation_count: usize,
    fail_creation_at: Option<usize>,
    fail_next_begin: Option<vk::Result>,
    fail_next_end: Option<vk::Result>,
    acquire_script: VecDeque<VkResult<(u32, bool)>>,
    submit_script: VecDeque<VkResult<()>>,
    present_script: VecDeque<VkResult<bool>>,

    gpu_is_stalled: bool,
    pending_fences: Vec<vk::Fence>,
}

/// A fake device whose GPU finishes work as soon as it is submitted, unless
/// told to stall. Waiting for the device to idle always drains pending work.
#[derive(Debug)]
pub struct MockDevice {
    state: RefCell<MockState>,
}

// Test controls
// -------------

impl MockDevice {
    /// Create a mock whose swapchain has `image_count` images. Without a
    /// script, acquire hands out images round-robin.
    pub fn new(image_count: u32) -> Self {
        Self {
            state: RefCell::new(MockState {
                next_handle: 1,
                image_count,
                ..Default::default()
            }),
        }
    }

    /// The number of images in the mock swapchain.
    pub fn image_count(&self) -> u32 {
        self.state.borrow().image_count
    }

    /// Queue up results for the next calls to acquire_next_image.
    pub fn script_acquires(
        &self,
        results: impl IntoIterator<Item = VkResult<(u32, bool)>>,
    ) {
        self.state.borrow_mut().acquire_script.extend(results);
    }

    pub fn script_submits(
        &self,
        results: impl IntoIterator<Item = VkResult<()>>,
    ) {
        self.state.borrow_mut().submit_script.extend(results);
    }

    pub fn script_presents(
        &self,
        results: impl IntoIterator<Item = VkResult<bool>>,
    ) {
        self.state.borrow_mut().present_script.extend(results);
    }

    /// Fail the n'th (zero based) object creation or allocation.
    pub fn fail_creation_at(&self, index: usize) {
        self.state.borrow_mut().fail_creation_at = Some(index);
    }

    pub fn fail_next_begin(&self, result: vk::Result) {
        self.state.borrow_mut().fail_next_begin = Some(result);
    }

    pub fn fail_next_end(&self, result: vk::Result) {
        self.state.borrow_mut().fail_next_end = Some(result);
    }

    /// While stalled, submitted work never completes on its own.
    pub fn stall_gpu(&self, stalled: bool) {
        self.state.borrow_mut().gpu_is_stalled = stalled;
    }

    /// Finish all submitted work, signaling the fences.
    pub fn complete_gpu_work(&self) {
        let mut state = self.state.borrow_mut();
        let pending = std::mem::take(&mut state.pending_fences);
        for fence in pending {
            if let Some(mock_fence) = state.fences.get_mut(&fence) {
                mock_fence.signaled = true;
            }
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.borrow().events.clone()
    }

    pub fn clear_events(&self) {
        self.state.borrow_mut().events.clear();
    }

    /// Every broken synchronization rule observed so far.
    pub fn violations(&self) -> Vec<String> {
        self.state.borrow().violations.clone()
    }

    /// The number of semaphores, fences, and command pools not yet destroyed.
    pub fn live_object_count(&self) -> usize {
        let state = self.state.borrow();
        state.semaphores.len() + state.fences.len() + state.command_pools.len()
    }

    /// The number of live semaphores whose signal was never waited on.
    pub fn unconsumed_semaphore_signals(&self) -> usize {
        self.state
            .borrow()
            .semaphores
            .values()
            .filter(|&&signaled| signaled)
            .count()
    }

    pub fn live_semaphore_count(&self) -> usize {
        self.state.borrow().semaphores.len()
    }

    pub fn live_fence_count(&self) -> usize {
        self.state.borrow().fences.len()
    }
}

impl MockState {
    fn next_raw(&mut self) -> VkResult<u64> {
        let index = self.creation_count;
        self.creation_count += 1;
        if self.fail_creation_at == Some(index) {
            return Err(vk::Result::ERROR_OUT_OF_DEVICE_MEMORY);
        }
        let raw = self.next_handle;
        self.next_handle += 1;
        Ok(raw)
    }

    fn violation(&mut self, message: String) {
        self.violations.push(message);
    }

    /// A binary semaphore may only be signaled when it is unsignaled.
    fn signal_semaphore(&mut self, semaphore: vk::Semaphore, by: &str) {
        match self.semaphores.get(&semaphore).copied() {
            Some(false) => {
                self.semaphores.insert(semaphore, true);
            }
            Some(true) => self.violation(format!(
                "{} signaled {:?} which already had a pending signal",
                by, semaphore
            )),
            None => {
                self.violation(format!("{} signaled unknown {:?}", by, semaphore))
            }
        }
    }

    /// Every wait must consume exactly one earlier signal.
    fn wait_semaphore(&mut self, semaphore: vk::Semaphore, by: &str) {
        match self.semaphores.get(&semaphore).copied() {
            Some(true) => {
                self.semaphores.insert(semaphore, false);
            }
            Some(false) => self.violation(format!(
                "{} waited on {:?} with no pending signal",
                by, semaphore
            )),
            None => {
                self.violation(format!("{} waited on unknown {:?}", by, semaphore))
            }
        }
    }
}

impl FrameDevice for MockDevice {
    unsafe fn create_semaphore(&self) -> VkResult<vk::Semaphore> {
        let mut state = self.state.borrow_mut();
        let semaphore = vk::Semaphore::from_raw(state.next_raw()?);
        state.semaphores.insert(semaphore, false);
        Ok(semaphore)
    }

    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        let mut state = self.state.borrow_mut();
        if state.semaphores.remove(&semaphore).is_none() {
            state.violation(format!("double destroy of {:?}", semaphore));
        }
    }

    unsafe fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence> {
        let mut state = self.state.borrow_mut();
        let fence = vk::Fence::from_raw(state.next_raw()?);
        state.fences.insert(
            fence,
            MockFence {
                signaled,
                observed_signaled: false,
            },
        );
        Ok(fence)
    }

    unsafe fn destroy_fence(&self, fence: vk::Fence) {
        let mut state = self.state.borrow_mut();
        if state.pending_fences.contains(&fence) {
            state.violation(format!("{:?} destroyed while pending", fence));
        }
        if state.fences.remove(&fence).is_none() {
            state.violation(format!("double destroy of {:?}", fence));
        }
    }

    unsafe fn wait_for_fence(
        &self,
        fence: vk::Fence,
        timeout: u64,
    ) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        let signaled = match state.fences.get_mut(&fence) {
            Some(mock_fence) => {
                if mock_fence.signaled {
                    mock_fence.observed_signaled = true;
                }
                mock_fence.signaled
            }
            None => {
                state.violation(format!("wait on unknown {:?}", fence));
                return Err(vk::Result::ERROR_DEVICE_LOST);
            }
        };
        state.events.push(Event::WaitFence { fence, signaled });
        if signaled {
            return Ok(());
        }
        let will_never_signal = !state.pending_fences.contains(&fence);
        if timeout == u64::MAX {
            drop(state);
            if will_never_signal {
                panic!("deadlock: infinite wait on a fence with no pending work");
            }
            panic!("infinite wait on a fence the stalled GPU never signals");
        }
        Err(vk::Result::TIMEOUT)
    }

    unsafe fn reset_fence(&self, fence: vk::Fence) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::ResetFence(fence));
        let observed = match state.fences.get_mut(&fence) {
            Some(mock_fence) => {
                let observed = mock_fence.observed_signaled;
                mock_fence.signaled = false;
                mock_fence.observed_signaled = false;
                observed
            }
            None => {
                state.violation(format!("reset of unknown {:?}", fence));
                return Err(vk::Result::ERROR_DEVICE_LOST);
            }
        };
        if !observed {
            state.violation(format!(
                "{:?} reset without being observed signaled",
                fence
            ));
        }
        if state.pending_fences.contains(&fence) {
            state.violation(format!("{:?} reset while pending", fence));
        }
        Ok(())
    }

    unsafe fn create_command_pool(&self) -> VkResult<vk::CommandPool> {
        let mut state = self.state.borrow_mut();
        let command_pool = vk::CommandPool::from_raw(state.next_raw()?);
        state.command_pools.insert(command_pool);
        Ok(command_pool)
    }

    unsafe fn destroy_command_pool(&self, command_pool: vk::CommandPool) {
        let mut state = self.state.borrow_mut();
        if !state.command_pools.remove(&command_pool) {
            state.violation(format!("double destroy of {:?}", command_pool));
        }
    }

    unsafe fn allocate_primary_command_buffer(
        &self,
        command_pool: vk::CommandPool,
    ) -> VkResult<vk::CommandBuffer> {
        let mut state = self.state.borrow_mut();
        if !state.command_pools.contains(&command_pool) {
            state.violation(format!("allocate from unknown {:?}", command_pool));
        }
        Ok(vk::CommandBuffer::from_raw(state.next_raw()?))
    }

    unsafe fn reset_command_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
    ) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        if !state.pending_fences.is_empty() {
            state.violation(
                "command buffer reset while GPU work is pending".to_owned(),
            );
        }
        state.events.push(Event::ResetCommandBuffer);
        Ok(())
    }

    unsafe fn begin_command_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
    ) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(result) = state.fail_next_begin.take() {
            return Err(result);
        }
        state.events.push(Event::BeginCommandBuffer);
        Ok(())
    }

    unsafe fn end_command_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
    ) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(result) = state.fail_next_end.take() {
            return Err(result);
        }
        state.events.push(Event::EndCommandBuffer);
        Ok(())
    }

    unsafe fn cmd_begin_render_pass(
        &self,
        _command_buffer: vk::CommandBuffer,
        render_pass: vk::RenderPass,
        framebuffer: vk::Framebuffer,
        render_area: vk::Rect2D,
        clear_values: &[vk::ClearValue],
    ) {
        let clear_color = clear_values
            .first()
            .map(|value| value.color.float32)
            .unwrap_or_default();
        self.state.borrow_mut().events.push(Event::BeginRenderPass {
            render_pass,
            framebuffer,
            extent: (render_area.extent.width, render_area.extent.height),
            clear_color,
        });
    }

    unsafe fn cmd_bind_graphics_pipeline(
        &self,
        _command_buffer: vk::CommandBuffer,
        pipeline: vk::Pipeline,
    ) {
        self.state
            .borrow_mut()
            .events
            .push(Event::BindPipeline(pipeline));
    }

    unsafe fn cmd_set_viewport(
        &self,
        _command_buffer: vk::CommandBuffer,
        viewport: vk::Viewport,
    ) {
        self.state.borrow_mut().events.push(Event::SetViewport {
            width: viewport.width,
            height: viewport.height,
            depth: (viewport.min_depth, viewport.max_depth),
        });
    }

    unsafe fn cmd_set_scissor(
        &self,
        _command_buffer: vk::CommandBuffer,
        scissor: vk::Rect2D,
    ) {
        self.state.borrow_mut().events.push(Event::SetScissor {
            extent: (scissor.extent.width, scissor.extent.height),
        });
    }

    unsafe fn cmd_bind_vertex_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        _offset: vk::DeviceSize,
    ) {
        self.state
            .borrow_mut()
            .events
            .push(Event::BindVertexBuffer(buffer));
    }

    unsafe fn cmd_bind_index_buffer(
        &self,
        _command_buffer: vk::CommandBuffer,
        buffer: vk::Buffer,
        _offset: vk::DeviceSize,
        index_type: vk::IndexType,
    ) {
        self.state
            .borrow_mut()
            .events
            .push(Event::BindIndexBuffer(buffer, index_type));
    }

    unsafe fn cmd_draw_indexed(
        &self,
        _command_buffer: vk::CommandBuffer,
        index_count: u32,
        instance_count: u32,
    ) {
        self.state.borrow_mut().events.push(Event::DrawIndexed {
            index_count,
            instance_count,
        });
    }

    unsafe fn cmd_end_render_pass(&self, _command_buffer: vk::CommandBuffer) {
        self.state.borrow_mut().events.push(Event::EndRenderPass);
    }

    unsafe fn queue_submit(
        &self,
        submission: &FrameSubmission,
    ) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        if let Some(Err(result)) = state.submit_script.pop_front() {
            state.events.push(Event::SubmitRejected(result));
            return Err(result);
        }
        let already_signaled = state
            .fences
            .get(&submission.fence)
            .map(|fence| fence.signaled)
            .unwrap_or(false);
        if already_signaled {
            state.violation(format!(
                "submitted with {:?} still signaled",
                submission.fence
            ));
        }
        state.events.push(Event::Submit(*submission));
        state.wait_semaphore(submission.wait_semaphore, "submit");
        state.signal_semaphore(submission.signal_semaphore, "submit");
        if state.gpu_is_stalled {
            state.pending_fences.push(submission.fence);
        } else if let Some(fence) = state.fences.get_mut(&submission.fence) {
            fence.signaled = true;
        }
        Ok(())
    }

    unsafe fn acquire_next_image(
        &self,
        _timeout: u64,
        semaphore: vk::Semaphore,
    ) -> VkResult<(u32, bool)> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Acquire(semaphore));
        let result = match state.acquire_script.pop_front() {
            Some(result) => result,
            None => {
                let index = state.next_image % state.image_count.max(1);
                state.next_image = state.next_image.wrapping_add(1);
                Ok((index, false))
            }
        };
        // only a successful acquire signals the semaphore
        if result.is_ok() {
            state.signal_semaphore(semaphore, "acquire");
        }
        result
    }

    unsafe fn queue_present(
        &self,
        wait_semaphore: vk::Semaphore,
        image_index: u32,
    ) -> VkResult<bool> {
        let mut state = self.state.borrow_mut();
        state.events.push(Event::Present {
            wait_semaphore,
            image_index,
        });
        state.wait_semaphore(wait_semaphore, "present");
        state.present_script.pop_front().unwrap_or(Ok(false))
    }

    unsafe fn device_wait_idle(&self) -> VkResult<()> {
        self.state.borrow_mut().events.push(Event::WaitIdle);
        self.complete_gpu_work();
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn acquiring_twice_without_a_wait_is_a_violation() {
        let device = MockDevice::new(2);
        unsafe {
            let semaphore = device.create_semaphore().unwrap();
            device.acquire_next_image(u64::MAX, semaphore).unwrap();
            assert_eq!(device.unconsumed_semaphore_signals(), 1);

            device.acquire_next_image(u64::MAX, semaphore).unwrap();

            device.destroy_semaphore(semaphore);
        }
        assert_eq!(device.violations().len(), 1, "{:?}", device.violations());
    }

    #[test]
    fn presenting_without_a_rendered_signal_is_a_violation() {
        let device = MockDevice::new(2);
        unsafe {
            let semaphore = device.create_semaphore().unwrap();
            device.queue_present(semaphore, 0).unwrap();
            device.destroy_semaphore(semaphore);
        }
        assert_eq!(device.violations().len(), 1, "{:?}", device.violations());
    }

    #[test]
    fn a_failed_acquire_signals_nothing() {
        let device = MockDevice::new(2);
        device.script_acquires([Err(vk::Result::TIMEOUT)]);
        unsafe {
            let semaphore = device.create_semaphore().unwrap();
            assert!(device.acquire_next_image(0, semaphore).is_err());
            assert_eq!(device.unconsumed_semaphore_signals(), 0);
            device.destroy_semaphore(semaphore);
        }
        assert!(device.violations().is_empty());
    }
}
