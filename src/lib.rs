//! The frame loop for a single-frame-in-flight Vulkan renderer.
//!
//! Each frame waits for the previous frame's GPU work, acquires a swapchain
//! image, records a draw into a single command buffer, submits it, and
//! presents the result. Device, swapchain, and pipeline creation happen
//! elsewhere; the loop only borrows those handles through a `FrameDevice`.

pub mod config;
pub mod graphics;
pub mod logging;

pub use self::{
    config::FrameLoopConfig,
    graphics::{FrameError, FrameLoop, FrameStatus},
};
