//! Runtime configuration for the frame loop.

use {
    crate::graphics::vulkan_api::TimeoutPolicy,
    anyhow::{Context, Result},
    serde::{Deserialize, Serialize},
    std::path::Path,
};

/// Tunables for the frame loop.
///
/// Configuration files use RON, for example:
///
/// ```ron
/// (
///     fence_timeout: Milliseconds(1000),
///     acquire_timeout: Infinite,
///     clear_color: (0.0, 0.0, 0.0, 1.0),
/// )
/// ```
///
/// Any omitted field takes its default value.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameLoopConfig {
    /// How long to wait for the previous frame's GPU work to finish.
    pub fence_timeout: TimeoutPolicy,

    /// How long to wait for the presentation engine to hand out an image.
    pub acquire_timeout: TimeoutPolicy,

    /// The color each frame's render pass clears to.
    pub clear_color: [f32; 4],
}

impl Default for FrameLoopConfig {
    fn default() -> Self {
        Self {
            fence_timeout: TimeoutPolicy::Infinite,
            acquire_timeout: TimeoutPolicy::Infinite,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl FrameLoopConfig {
    /// Parse a config from a RON string.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        let config = ron::from_str(source)
            .context("Unable to parse the frame loop config")?;
        Ok(config)
    }

    /// Load a config from a RON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).with_context(|| {
            format!("Unable to read frame loop config at {:?}", path)
        })?;
        Self::from_ron_str(&source)
            .with_context(|| format!("Invalid frame loop config at {:?}", path))
    }

    /// Render the config as pretty-printed RON.
    pub fn to_ron_string(&self) -> Result<String> {
        let pretty = ron::ser::PrettyConfig::default();
        ron::ser::to_string_pretty(self, pretty)
            .context("Unable to serialize the frame loop config")
    }
}
