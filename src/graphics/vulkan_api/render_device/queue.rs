use ash::vk;

/// A Vulkan device queue and the family it belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Queue {
    family_index: u32,
    index: u32,
    queue: vk::Queue,
}

// Public API
// ----------

impl Queue {
    /// Wrap a queue fetched from the logical device with
    /// `get_device_queue(family_index, index)`.
    pub fn from_raw(queue: vk::Queue, family_index: u32, index: u32) -> Self {
        Self {
            family_index,
            index,
            queue,
        }
    }

    /// The queue family index for this queue.
    pub fn family_index(&self) -> u32 {
        self.family_index
    }

    /// The raw Vulkan queue handle.
    pub fn raw(&self) -> vk::Queue {
        self.queue
    }

    /// True when both values refer to the same device queue.
    pub fn is_same(&self, other: &Queue) -> bool {
        self.family_index == other.family_index && self.index == other.index
    }
}

impl std::fmt::Display for Queue {
    fn fmt(&self, format: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        format.write_fmt(format_args!(
            "Queue {}:{}",
            self.family_index, self.index,
        ))
    }
}
