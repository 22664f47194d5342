pub use ash::vk;

pub use crate::core::app_info::*;
pub use crate::core::error::Error;

pub use crate::core::runtime::{
    DeviceRequest, InstanceRequest, Runtime, VulkanInstance, VulkanRuntime,
};
pub use crate::core::instance::{Instance, VALIDATION_LAYER};
pub use crate::core::physical_device::{find_video_decode_family, PhysicalDevice};
pub use crate::core::device::Device;
pub use crate::core::queue::Queue;
pub use crate::core::debug::{message_level, DebugMessenger};

pub use crate::video_decode::{run, AcquisitionState, VideoDecode, EXIT_FAILURE, EXIT_SUCCESS};
