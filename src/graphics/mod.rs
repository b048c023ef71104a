mod error;
mod frame_loop;
mod frame_recorder;
mod swapchain_images;

pub mod vulkan_api;

pub use self::{
    error::FrameError,
    frame_loop::{FrameLoop, FrameState, FrameStatus},
    frame_recorder::{DrawResources, FrameRecorder},
    swapchain_images::{SwapchainImageSet, SwapchainStatus},
};
