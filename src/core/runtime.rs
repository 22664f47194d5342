//! The boundary between the acquisition sequence and the native graphics runtime.
//!
//! Everything above this module only talks to a [`Runtime`]. The [`VulkanRuntime`]
//! implementation forwards to the Vulkan loader through `ash`, but any type that can hand out
//! instances, physical devices, logical devices and queues can drive the sequence.

use std::ffi::CString;
use std::fmt::Debug;
use std::ops::Deref;

use anyhow::Result;
use ash::prelude::VkResult;
use ash::vk;

use crate::core::debug::DebugMessenger;
use crate::util::string::{unwrap_to_raw_strings, wrap_c_str};
use crate::Error;

/// Everything needed to create an instance. Built by [`Instance::new`](crate::Instance::new) from
/// the [`AppSettings`](crate::AppSettings).
#[derive(Debug, Clone)]
pub struct InstanceRequest {
    pub application_name: CString,
    pub application_version: u32,
    pub engine_name: CString,
    pub engine_version: u32,
    pub api_version: u32,
    /// Instance layers to enable.
    pub layers: Vec<CString>,
    /// Instance extensions to enable.
    pub extensions: Vec<CString>,
    /// Install a messenger that forwards validation output to the logger.
    pub debug_messenger: bool,
}

/// Everything needed to create a logical device with a single queue family.
#[derive(Debug, Clone)]
pub struct DeviceRequest {
    pub queue_family_index: u32,
    /// One priority per queue to create in the family.
    pub queue_priorities: Vec<f32>,
    /// Device extensions to enable.
    pub extensions: Vec<CString>,
}

/// A native graphics runtime that can create and destroy the objects of the acquisition sequence.
///
/// Handles returned from this trait are raw: they are not destroyed automatically. The guards in
/// [`core`](crate::core) take ownership of them and release them through the `destroy_*` functions.
pub trait Runtime {
    /// Owned connection to the runtime.
    type Instance;
    /// Non-owned descriptor of a hardware unit, valid while its instance is alive.
    type PhysicalDevice: Copy + Debug;
    /// Owned logical device.
    type Device;
    /// Non-owned queue, valid while its device is alive.
    type Queue: Copy + Debug;

    /// Create a new instance.
    fn create_instance(&self, request: &InstanceRequest) -> VkResult<Self::Instance>;

    /// Destroy an instance.
    /// # Safety
    /// No object created from this instance may still be alive.
    unsafe fn destroy_instance(&self, instance: Self::Instance);

    /// List all physical devices visible to the instance, in enumeration order.
    fn enumerate_physical_devices(
        &self,
        instance: &Self::Instance,
    ) -> VkResult<Vec<Self::PhysicalDevice>>;

    /// Human readable name of a physical device.
    fn physical_device_name(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
    ) -> String;

    /// Properties of all queue families on a physical device. The index into the returned
    /// vector is the queue family index.
    fn queue_family_properties(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties>;

    /// Create a logical device on a physical device.
    fn create_device(
        &self,
        instance: &Self::Instance,
        physical_device: Self::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<Self::Device>;

    /// Obtain a queue from a logical device.
    fn device_queue(&self, device: &Self::Device, family_index: u32, queue_index: u32)
        -> Self::Queue;

    /// Destroy a logical device.
    /// # Safety
    /// No object created from this device may still be in use.
    unsafe fn destroy_device(&self, device: Self::Device);
}

/// Instance handle of the [`VulkanRuntime`]. Bundles the instance function table with the optional
/// debug messenger installed on it.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct VulkanInstance {
    #[derivative(Debug = "ignore")]
    instance: ash::Instance,
    debug_messenger: Option<DebugMessenger>,
}

impl VulkanInstance {
    /// Whether a debug messenger is forwarding validation output.
    pub fn has_debug_messenger(&self) -> bool {
        self.debug_messenger.is_some()
    }
}

impl Deref for VulkanInstance {
    type Target = ash::Instance;

    fn deref(&self) -> &Self::Target {
        &self.instance
    }
}

/// [`Runtime`] backed by the system Vulkan loader.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct VulkanRuntime {
    #[derivative(Debug = "ignore")]
    entry: ash::Entry,
}

impl VulkanRuntime {
    /// Loads the Vulkan library.
    /// # Errors
    /// * Fails with [`Error::LoadFailed`] if the Vulkan loader was not found. Check for valid
    ///   Vulkan drivers.
    pub fn load() -> Result<Self> {
        let entry = unsafe { ash::Entry::load().map_err(Error::from)? };
        Ok(VulkanRuntime {
            entry,
        })
    }

    /// Get unsafe access to the vulkan entry point.
    /// # Safety
    /// Any vulkan calls that modify the system's state may put the system in an undefined state.
    pub unsafe fn loader(&self) -> &ash::Entry {
        &self.entry
    }
}

impl Runtime for VulkanRuntime {
    type Instance = VulkanInstance;
    type PhysicalDevice = vk::PhysicalDevice;
    type Device = ash::Device;
    type Queue = vk::Queue;

    fn create_instance(&self, request: &InstanceRequest) -> VkResult<VulkanInstance> {
        let app_info = vk::ApplicationInfo::builder()
            .application_name(&request.application_name)
            .application_version(request.application_version)
            .engine_name(&request.engine_name)
            .engine_version(request.engine_version)
            .api_version(request.api_version);

        let layers_raw = unwrap_to_raw_strings(request.layers.as_slice());
        let extensions_raw = unwrap_to_raw_strings(request.extensions.as_slice());

        let instance_info = vk::InstanceCreateInfo::builder()
            .application_info(&app_info)
            .enabled_layer_names(layers_raw.as_slice())
            .enabled_extension_names(extensions_raw.as_slice());

        let instance = unsafe { self.entry.create_instance(&instance_info, None)? };

        let debug_messenger = if request.debug_messenger {
            match DebugMessenger::new(&self.entry, &instance) {
                Ok(messenger) => Some(messenger),
                Err(err) => {
                    // The caller never sees this instance, so it has to go here.
                    unsafe { instance.destroy_instance(None) };
                    return Err(err);
                }
            }
        } else {
            None
        };

        Ok(VulkanInstance {
            instance,
            debug_messenger,
        })
    }

    unsafe fn destroy_instance(&self, instance: VulkanInstance) {
        let VulkanInstance {
            instance,
            debug_messenger,
        } = instance;
        drop(debug_messenger);
        instance.destroy_instance(None);
    }

    fn enumerate_physical_devices(
        &self,
        instance: &VulkanInstance,
    ) -> VkResult<Vec<vk::PhysicalDevice>> {
        unsafe { instance.enumerate_physical_devices() }
    }

    fn physical_device_name(
        &self,
        instance: &VulkanInstance,
        physical_device: vk::PhysicalDevice,
    ) -> String {
        // SAFETY: physical_device was enumerated from this instance.
        let properties = unsafe { instance.get_physical_device_properties(physical_device) };
        // SAFETY: Vulkan guarantees device_name is a null terminated string.
        unsafe { wrap_c_str(properties.device_name.as_ptr()) }
    }

    fn queue_family_properties(
        &self,
        instance: &VulkanInstance,
        physical_device: vk::PhysicalDevice,
    ) -> Vec<vk::QueueFamilyProperties> {
        unsafe { instance.get_physical_device_queue_family_properties(physical_device) }
    }

    fn create_device(
        &self,
        instance: &VulkanInstance,
        physical_device: vk::PhysicalDevice,
        request: &DeviceRequest,
    ) -> VkResult<ash::Device> {
        let queue_info = vk::DeviceQueueCreateInfo::builder()
            .queue_family_index(request.queue_family_index)
            .queue_priorities(request.queue_priorities.as_slice())
            .build();
        let features = vk::PhysicalDeviceFeatures::default();
        let extensions_raw = unwrap_to_raw_strings(request.extensions.as_slice());

        let info = vk::DeviceCreateInfo::builder()
            .queue_create_infos(std::slice::from_ref(&queue_info))
            .enabled_extension_names(extensions_raw.as_slice())
            .enabled_features(&features);

        unsafe { instance.create_device(physical_device, &info, None) }
    }

    fn device_queue(&self, device: &ash::Device, family_index: u32, queue_index: u32) -> vk::Queue {
        unsafe { device.get_device_queue(family_index, queue_index) }
    }

    unsafe fn destroy_device(&self, device: ash::Device) {
        device.destroy_device(None);
    }
}
