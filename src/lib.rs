//! Vulkan bring-up for hardware video decode.
//!
//! This crate acquires the minimal set of Vulkan objects needed to talk to a GPU that can decode
//! video: an instance, a physical device exposing a queue family with
//! `VK_QUEUE_VIDEO_DECODE_BIT_KHR`, and optionally a logical device with a queue on that family.
//! It does not decode anything.
//!
//! To get started, the easiest way is to simply
//! ```
//! use video_decode::prelude::*;
//! ```
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use video_decode::prelude::*;
//!
//! let settings = AppBuilder::new()
//!     .name("Video Decode")
//!     .version((1, 0, 0))
//!     .validation(true)
//!     .build();
//! // Load the system Vulkan library.
//! let runtime = Arc::new(VulkanRuntime::load()?);
//! // Create the instance. Dropping it destroys the VkInstance.
//! let instance = Arc::new(Instance::new(runtime, &settings)?);
//! // Pick the first device that can decode video.
//! let physical_device = PhysicalDevice::select(&instance)?;
//! // Create the logical device. It keeps the instance alive until it is destroyed itself.
//! let device = Device::new(&physical_device, &settings)?;
//! let queue = device.video_decode_queue();
//! assert_eq!(queue.family_index(), physical_device.video_decode_family());
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! The [`VideoDecode`] record wraps these steps into a single-use state machine, see
//! [`video_decode`].
//!
//! All Vulkan calls go through the [`Runtime`] trait, implemented for the system loader by
//! [`VulkanRuntime`].

#[macro_use]
extern crate derivative;
#[macro_use]
extern crate log;

pub mod prelude;
pub use crate::prelude::*;

pub mod core;
pub mod util;
pub mod video_decode;
