//! The core module holds all functionality that is minimally required to address a video decode
//! capable device.

pub mod app_info;
pub mod runtime;
pub mod instance;
pub mod physical_device;
pub mod device;
pub mod queue;
pub mod debug;
pub mod error;
