use std::sync::Arc;

use anyhow::Result;
use ash::vk;

use crate::core::runtime::Runtime;
use crate::{Error, Instance};

/// A physical device abstracts away an actual device, like a graphics card or integrated graphics
/// card.
///
/// Physical devices are enumerated, never created. This struct keeps the instance it was found on
/// alive.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct PhysicalDevice<R: Runtime> {
    #[derivative(Debug = "ignore")]
    instance: Arc<Instance<R>>,
    handle: R::PhysicalDevice,
    name: String,
    /// List of [`VkQueueFamilyProperties`](vk::QueueFamilyProperties) with properties of each queue
    /// family on the device.
    queue_families: Vec<vk::QueueFamilyProperties>,
    /// Index of the first queue family with video decode support.
    video_decode_family: u32,
}

impl<R: Runtime> PhysicalDevice<R> {
    /// Selects the first physical device exposing a queue family with
    /// `VK_QUEUE_VIDEO_DECODE_BIT_KHR`. Devices are visited in enumeration order, and the first
    /// matching queue family on a device wins.
    /// # Errors
    /// * [`Error::NoCapableDevice`] if no device is present, or none of them can decode video.
    pub fn select(instance: &Arc<Instance<R>>) -> Result<Self> {
        let runtime = instance.runtime();
        let devices = runtime.enumerate_physical_devices(instance.raw()).map_err(|result| {
            error!("Failed to enumerate physical devices: {}", result);
            Error::NoCapableDevice(Some(result))
        })?;
        if devices.is_empty() {
            error!("Failed to find GPUs with Vulkan support");
            return Err(Error::NoCapableDevice(None).into());
        }

        devices
            .iter()
            .find_map(|&device| -> Option<PhysicalDevice<R>> {
                let queue_families = runtime.queue_family_properties(instance.raw(), device);
                let name = runtime.physical_device_name(instance.raw(), device);
                let Some(index) = find_video_decode_family(queue_families.as_slice()) else {
                    debug!("Rejected physical device {:?}: no video decode queue family.", name);
                    return None;
                };

                info!("Picked physical device {:?}, video decode queue family {}.", name, index);
                Some(PhysicalDevice {
                    instance: instance.clone(),
                    handle: device,
                    name,
                    queue_families,
                    video_decode_family: index,
                })
            })
            .ok_or_else(|| {
                error!("Failed to find GPUs with VK_QUEUE_VIDEO_DECODE_BIT_KHR support");
                anyhow::Error::from(Error::NoCapableDevice(None))
            })
    }

    /// Get all queue families available on this device
    pub fn queue_families(&self) -> &[vk::QueueFamilyProperties] {
        self.queue_families.as_slice()
    }

    /// Index of the queue family that will be used for video decode.
    pub fn video_decode_family(&self) -> u32 {
        self.video_decode_family
    }

    /// Device name as reported by the driver.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The instance this device was enumerated from.
    pub fn instance(&self) -> &Arc<Instance<R>> {
        &self.instance
    }

    /// Get access to the raw physical device handle
    pub fn handle(&self) -> R::PhysicalDevice {
        self.handle
    }
}

/// Index of the first queue family that advertises video decode support.
pub fn find_video_decode_family(families: &[vk::QueueFamilyProperties]) -> Option<u32> {
    families
        .iter()
        .position(|family| family.queue_flags.contains(vk::QueueFlags::VIDEO_DECODE_KHR))
        .map(|index| index as u32)
}
