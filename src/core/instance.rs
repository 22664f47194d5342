//! Exposes the instance, which represents the connection to the graphics runtime.

use std::ffi::CString;
use std::mem::ManuallyDrop;
use std::ops::Deref;
use std::sync::Arc;

use anyhow::Result;

use crate::core::runtime::{InstanceRequest, Runtime};
use crate::{AppSettings, Error};

/// Name of the Khronos validation layer.
pub const VALIDATION_LAYER: &str = "VK_LAYER_KHRONOS_validation";

/// Represents a live instance of the runtime. This is the first resource acquired, and the last one
/// released: every other object keeps the instance alive through an `Arc`.
///
/// The instance is destroyed exactly once, when this value is dropped.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct Instance<R: Runtime> {
    #[derivative(Debug = "ignore")]
    runtime: Arc<R>,
    #[derivative(Debug = "ignore")]
    handle: ManuallyDrop<R::Instance>,
}

impl<R: Runtime> Instance<R> {
    /// Creates the runtime instance.
    /// # Errors
    /// * [`Error::InvalidString`] if the application or engine name contains a null byte.
    /// * [`Error::InitializationFailed`] if the runtime cannot be created. This can happen when
    ///   validation is enabled through [`AppSettings`], but the Vulkan SDK is not installed.
    pub fn new(runtime: Arc<R>, settings: &AppSettings) -> Result<Self> {
        let request = instance_request(settings)?;

        info!("Enabled instance layers:");
        for layer in &request.layers {
            info!("{:?}", layer);
        }
        info!("Enabled instance extensions:");
        for ext in &request.extensions {
            info!("{:?}", ext);
        }

        let handle = runtime.create_instance(&request).map_err(|result| {
            error!("Failed to create VkInstance: {}", result);
            Error::InitializationFailed(result)
        })?;
        #[cfg(feature = "log-objects")]
        trace!("Created new VkInstance");

        Ok(Instance {
            runtime,
            handle: ManuallyDrop::new(handle),
        })
    }

    /// The runtime this instance was created from.
    pub fn runtime(&self) -> &Arc<R> {
        &self.runtime
    }

    /// The raw runtime instance handle.
    pub fn raw(&self) -> &R::Instance {
        &self.handle
    }
}

impl<R: Runtime> Deref for Instance<R> {
    type Target = R::Instance;

    fn deref(&self) -> &Self::Target {
        &self.handle
    }
}

impl<R: Runtime> Drop for Instance<R> {
    fn drop(&mut self) {
        #[cfg(feature = "log-objects")]
        trace!("Destroying VkInstance");
        // SAFETY: Devices hold an Arc to their instance, so none can be alive here. The handle is
        // never touched again after being taken.
        unsafe {
            let handle = ManuallyDrop::take(&mut self.handle);
            self.runtime.destroy_instance(handle);
        }
    }
}

fn instance_request(settings: &AppSettings) -> Result<InstanceRequest> {
    let mut layers = Vec::<CString>::new();
    let mut extensions = Vec::<CString>::new();

    if settings.enable_validation {
        layers.push(CString::new(VALIDATION_LAYER).map_err(Error::from)?);
        extensions.push(CString::from(ash::extensions::ext::DebugUtils::name()));
    }

    Ok(InstanceRequest {
        application_name: CString::new(settings.name.clone()).map_err(Error::from)?,
        application_version: AppSettings::vk_version(settings.version),
        engine_name: CString::new(settings.engine_name.clone()).map_err(Error::from)?,
        engine_version: AppSettings::vk_version(settings.engine_version),
        api_version: AppSettings::vk_version(settings.api_version),
        layers,
        extensions,
        debug_messenger: settings.enable_validation,
    })
}
