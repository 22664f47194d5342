use std::ffi::{CString, NulError};
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::sync::Arc;

use anyhow::Result;
use ash::vk;

use crate::core::runtime::{DeviceRequest, Runtime};
use crate::{AppSettings, Error, Instance, PhysicalDevice, Queue};

#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
struct DeviceInner<R: Runtime> {
    #[derivative(Debug = "ignore")]
    handle: ManuallyDrop<R::Device>,
    queue_family: u32,
    extensions: Vec<String>,
    // Declared last so the instance outlives the device handle.
    #[derivative(Debug = "ignore")]
    instance: Arc<Instance<R>>,
}

/// Wrapper around a logical device. Internal state is wrapped in an `Arc<DeviceInner>`, so this is
/// safe to clone. The device is destroyed when the last clone is dropped, and always before its
/// instance.
#[derive(Derivative)]
#[derivative(Debug(bound = ""), Clone(bound = ""))]
pub struct Device<R: Runtime> {
    inner: Arc<DeviceInner<R>>,
}

impl<R: Runtime> Device<R> {
    /// Create a logical device with a single queue on the video decode queue family of
    /// `physical_device`. No device features are enabled, only the extensions listed in the
    /// settings.
    /// # Errors
    /// * [`Error::InvalidString`] if an extension name contains a null byte.
    /// * [`Error::DeviceCreationFailed`] if the queue priority is outside `[0.0, 1.0]`, or the
    ///   runtime rejects the device.
    pub fn new(physical_device: &PhysicalDevice<R>, settings: &AppSettings) -> Result<Self> {
        let priority = settings.queue_priority;
        if !(0.0..=1.0).contains(&priority) {
            error!("Queue priority {} is outside of [0.0, 1.0]", priority);
            return Err(Error::DeviceCreationFailed(vk::Result::ERROR_INITIALIZATION_FAILED).into());
        }

        let instance = physical_device.instance();
        let extensions = settings
            .device_extensions
            .iter()
            .map(|ext| CString::new(ext.clone()))
            .collect::<Result<Vec<CString>, NulError>>()
            .map_err(Error::from)?;

        info!("Enabled device extensions:");
        for ext in &extensions {
            info!("{:?}", ext);
        }

        let request = DeviceRequest {
            queue_family_index: physical_device.video_decode_family(),
            queue_priorities: vec![priority],
            extensions,
        };

        let handle = instance
            .runtime()
            .create_device(instance.raw(), physical_device.handle(), &request)
            .map_err(|result| {
                error!("Failed to create logical device: {}", result);
                Error::DeviceCreationFailed(result)
            })?;
        #[cfg(feature = "log-objects")]
        trace!("Created new VkDevice on queue family {}", request.queue_family_index);

        Ok(Device {
            inner: Arc::new(DeviceInner {
                handle: ManuallyDrop::new(handle),
                queue_family: request.queue_family_index,
                extensions: settings.device_extensions.clone(),
                instance: instance.clone(),
            }),
        })
    }

    /// Obtain the video decode queue. This is always queue 0 of the selected family.
    pub fn video_decode_queue(&self) -> Queue<R> {
        Queue::new(self.clone(), self.inner.queue_family, 0)
    }

    /// Queue family the device was created with.
    pub fn queue_family(&self) -> u32 {
        self.inner.queue_family
    }

    /// Device extensions enabled on this device.
    pub fn extensions(&self) -> &[String] {
        self.inner.extensions.as_slice()
    }

    /// The instance this device was created from.
    pub fn instance(&self) -> &Arc<Instance<R>> {
        &self.inner.instance
    }

    /// The raw runtime device handle.
    pub fn raw(&self) -> &R::Device {
        &self.inner.handle
    }
}

impl<R: Runtime> Deref for Device<R> {
    type Target = R::Device;

    fn deref(&self) -> &Self::Target {
        &self.inner.handle
    }
}

impl<R: Runtime> Drop for DeviceInner<R> {
    fn drop(&mut self) {
        #[cfg(feature = "log-objects")]
        trace!("Destroying VkDevice");
        // SAFETY: Queues hold a clone of the device, so nothing references the handle anymore.
        unsafe {
            let handle = ManuallyDrop::take(&mut self.handle);
            self.instance.runtime().destroy_device(handle);
        }
    }
}
