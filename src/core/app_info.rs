//! Exposes all structs needed to store initialization parameters.

use ash::vk;

/// Application settings used to drive the acquisition sequence.
///
/// The application and engine strings are purely informational. They end up in the
/// [`VkApplicationInfo`](vk::ApplicationInfo) and may show up in debugging tools.
#[derive(Debug, Clone)]
pub struct AppSettings {
    /// Application name.
    pub name: String,
    /// Application version.
    pub version: (u32, u32, u32),
    /// Engine name.
    pub engine_name: String,
    /// Engine version.
    pub engine_version: (u32, u32, u32),
    /// Vulkan API version requested from the instance, as `(major, minor, patch)`.
    pub api_version: (u32, u32, u32),
    /// Enable the `VK_LAYER_KHRONOS_validation` layer, and forward its messages to the logger.
    /// If the layer is not installed, instance creation fails.
    pub enable_validation: bool,
    /// Whether to create a logical device and obtain the video decode queue. When disabled the
    /// sequence stops after a capable physical device was selected.
    pub logical_device: bool,
    /// Priority of the single video decode queue, between `0.0` and `1.0`. Device creation rejects
    /// anything else.
    pub queue_priority: f32,
    /// Vulkan device extensions that should be enabled on the logical device.
    pub device_extensions: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            name: String::from(""),
            version: (0, 0, 0),
            engine_name: String::from("No Engine"),
            engine_version: (1, 0, 0),
            api_version: (1, 0, 0),
            enable_validation: false,
            logical_device: true,
            queue_priority: 1.0,
            device_extensions: Vec::new(),
        }
    }
}

impl AppSettings {
    pub(crate) fn vk_version(version: (u32, u32, u32)) -> u32 {
        vk::make_api_version(0, version.0, version.1, version.2)
    }
}

/// The app builder is a convenience struct to easily create [`AppSettings`](crate::AppSettings).
///
/// For information about each of the fields, see [`AppSettings`](crate::AppSettings)
/// # Example
/// ```
/// # use video_decode::prelude::*;
/// let settings = AppBuilder::new()
///     .name("Video Decode")
///     .version((1, 0, 0))
///     .validation(true)
///     .build();
/// assert!(settings.logical_device);
/// ```
#[derive(Debug, Default)]
pub struct AppBuilder {
    inner: AppSettings,
}

impl AppBuilder {
    /// Create a new app builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.inner.name = name.into();
        self
    }

    /// Sets the application version.
    pub fn version(mut self, ver: impl Into<(u32, u32, u32)>) -> Self {
        self.inner.version = ver.into();
        self
    }

    /// Sets the engine name.
    pub fn engine_name(mut self, name: impl Into<String>) -> Self {
        self.inner.engine_name = name.into();
        self
    }

    /// Sets the engine version.
    pub fn engine_version(mut self, ver: impl Into<(u32, u32, u32)>) -> Self {
        self.inner.engine_version = ver.into();
        self
    }

    /// Sets the requested Vulkan API version.
    pub fn api_version(mut self, ver: impl Into<(u32, u32, u32)>) -> Self {
        self.inner.api_version = ver.into();
        self
    }

    /// Enable the Vulkan validation layers.
    pub fn validation(mut self, val: bool) -> Self {
        self.inner.enable_validation = val;
        self
    }

    /// Create a logical device and queue after device selection.
    pub fn logical_device(mut self, val: bool) -> Self {
        self.inner.logical_device = val;
        self
    }

    /// Priority for the video decode queue. Clamped to `[0.0, 1.0]`, NaN falls back to `1.0`.
    pub fn queue_priority(mut self, priority: f32) -> Self {
        self.inner.queue_priority = if priority.is_nan() {
            1.0
        } else {
            priority.clamp(0.0, 1.0)
        };
        self
    }

    /// Add a device extension to enable on the logical device.
    pub fn device_extension(mut self, name: impl Into<String>) -> Self {
        self.inner.device_extensions.push(name.into());
        self
    }

    /// Build the resulting application settings.
    pub fn build(self) -> AppSettings {
        self.inner
    }
}
