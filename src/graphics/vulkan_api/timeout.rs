use {
    serde::{Deserialize, Serialize},
    std::time::Duration,
};

/// How long a blocking Vulkan call (fence waits, swapchain acquisition) may
/// block before reporting a timeout.
#[derive(
    Debug, Copy, Clone, Default, Eq, PartialEq, Serialize, Deserialize,
)]
pub enum TimeoutPolicy {
    /// Block until the operation completes, no matter how long it takes.
    #[default]
    Infinite,

    /// Block for at most this many milliseconds.
    Milliseconds(u64),
}

impl TimeoutPolicy {
    /// The timeout in nanoseconds, as expected by the Vulkan api.
    ///
    /// `u64::MAX` is Vulkan's sentinel for "wait forever", so very large
    /// millisecond values saturate into an infinite wait.
    pub fn as_vk_timeout(&self) -> u64 {
        match *self {
            TimeoutPolicy::Infinite => u64::MAX,
            TimeoutPolicy::Milliseconds(ms) => ms.saturating_mul(1_000_000),
        }
    }

    /// The timeout as a duration. `None` for infinite waits.
    pub fn as_duration(&self) -> Option<Duration> {
        match *self {
            TimeoutPolicy::Infinite => None,
            TimeoutPolicy::Milliseconds(ms) => Some(Duration::from_millis(ms)),
        }
    }

    pub fn is_infinite(&self) -> bool {
        self.as_vk_timeout() == u64::MAX
    }
}

impl From<Duration> for TimeoutPolicy {
    fn from(duration: Duration) -> Self {
        let ms = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
        TimeoutPolicy::Milliseconds(ms)
    }
}

impl std::fmt::Display for TimeoutPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeoutPolicy::Infinite => write!(f, "infinite"),
            TimeoutPolicy::Milliseconds(ms) => write!(f, "{}ms", ms),
        }
    }
}
