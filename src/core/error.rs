//! Exposes the video decode error type

use std::ffi::NulError;

use ash::vk;
use thiserror::Error;

use crate::video_decode::AcquisitionState;

/// Error type that the acquisition sequence can return.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to load the Vulkan library.
    #[error("Failed to load Vulkan: `{0}`")]
    LoadFailed(ash::LoadingError),
    /// Could not convert rust string to C-String because it has null bytes
    #[error("Invalid C string")]
    InvalidString(NulError),
    /// The runtime refused to create an instance. Usually there is no compatible driver, or the
    /// validation layer was requested but is not installed.
    #[error("Failed to create VkInstance: `{0}`")]
    InitializationFailed(vk::Result),
    /// No physical device exposes a queue family with video decode support.
    /// Holds the runtime error if enumeration itself failed.
    #[error(
        "Failed to find a GPU with VK_QUEUE_VIDEO_DECODE_BIT_KHR support{}",
        enumeration_cause(.0)
    )]
    NoCapableDevice(Option<vk::Result>),
    /// The runtime rejected logical device creation for the selected physical device and queue
    /// family.
    #[error("Failed to create logical device: `{0}`")]
    DeviceCreationFailed(vk::Result),
    /// An acquisition record was used outside of its single initialization attempt.
    #[error("Operation not allowed in acquisition state `{0:?}`")]
    InvalidState(AcquisitionState),
}

impl From<ash::LoadingError> for Error {
    fn from(value: ash::LoadingError) -> Self {
        Error::LoadFailed(value)
    }
}

impl From<NulError> for Error {
    fn from(value: NulError) -> Self {
        Error::InvalidString(value)
    }
}

fn enumeration_cause(result: &Option<vk::Result>) -> String {
    match result {
        Some(result) => format!(": enumeration failed with `{}`", result),
        None => String::new(),
    }
}
