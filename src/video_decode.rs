//! The acquisition record that brings up everything needed to address a video decode capable GPU.
//!
//! Acquisition happens in a fixed order:
//! 1. [`Instance`] — the connection to the runtime.
//! 2. [`PhysicalDevice`] — the first device with a video decode queue family.
//! 3. [`Device`] and [`Queue`] — a logical device with one queue on that family (optional, see
//!    [`AppSettings::logical_device`]).
//!
//! Every step hands back a guard that releases its resource on drop, so a failure at any step
//! releases exactly what was acquired before it, in reverse order.
//!
//! # Example
//! ```no_run
//! # use std::sync::Arc;
//! # use video_decode::prelude::*;
//! let runtime = Arc::new(VulkanRuntime::load()?);
//! let settings = AppBuilder::new().name("Video Decode").validation(true).build();
//! let mut vd = VideoDecode::new(runtime);
//! vd.initialize(&settings)?;
//! println!("decode queue family: {:?}", vd.video_decode_queue_index());
//! vd.teardown()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::sync::Arc;

use anyhow::Result;

use crate::core::runtime::Runtime;
use crate::{AppSettings, Device, Error, Instance, PhysicalDevice, Queue};

/// Process exit code after a successful run.
pub const EXIT_SUCCESS: i32 = 0;
/// Process exit code after any acquisition step failed.
pub const EXIT_FAILURE: i32 = -1;

/// Lifecycle of a [`VideoDecode`] record. States only ever move forward.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum AcquisitionState {
    Uninitialized,
    InstanceCreated,
    DeviceSelected,
    LogicalDeviceCreated,
    Ready,
    Failed,
    TornDown,
}

impl AcquisitionState {
    /// Whether the state machine allows moving from `self` to `next`.
    pub fn can_advance_to(self, next: AcquisitionState) -> bool {
        use AcquisitionState::*;
        match (self, next) {
            (Uninitialized, InstanceCreated) => true,
            (InstanceCreated, DeviceSelected) => true,
            (DeviceSelected, LogicalDeviceCreated) => true,
            // Selection-only runs skip the logical device.
            (DeviceSelected, Ready) => true,
            (LogicalDeviceCreated, Ready) => true,
            (Uninitialized | InstanceCreated | DeviceSelected | LogicalDeviceCreated, Failed) => {
                true
            }
            (Ready | Failed, TornDown) => true,
            _ => false,
        }
    }

    fn advance(&mut self, next: AcquisitionState) {
        debug_assert!(self.can_advance_to(next), "illegal transition {:?} -> {:?}", self, next);
        debug!("VideoDecode state {:?} -> {:?}", self, next);
        *self = next;
    }
}

/// Owns every resource of a single acquisition attempt.
///
/// A record is single-use: [`initialize`](Self::initialize) may be called once, and
/// [`teardown`](Self::teardown) consumes it. Dropping a record without calling `teardown` releases
/// the same resources in the same order.
#[derive(Derivative)]
#[derivative(Debug(bound = ""))]
pub struct VideoDecode<R: Runtime> {
    state: AcquisitionState,
    #[derivative(Debug = "ignore")]
    runtime: Arc<R>,
    // Fields are released in declaration order, which is the reverse of acquisition order.
    queue: Option<Queue<R>>,
    device: Option<Device<R>>,
    physical_device: Option<PhysicalDevice<R>>,
    instance: Option<Arc<Instance<R>>>,
}

impl<R: Runtime> VideoDecode<R> {
    /// Create an empty record. Nothing is acquired until [`initialize`](Self::initialize) is
    /// called.
    pub fn new(runtime: Arc<R>) -> Self {
        VideoDecode {
            state: AcquisitionState::Uninitialized,
            runtime,
            queue: None,
            device: None,
            physical_device: None,
            instance: None,
        }
    }

    /// Run the acquisition sequence. On failure, everything acquired so far is released before the
    /// error is returned, and the record ends up in [`AcquisitionState::Failed`].
    /// # Errors
    /// * [`Error::InvalidState`] if this record was already initialized.
    /// * [`Error::InitializationFailed`], [`Error::NoCapableDevice`] or
    ///   [`Error::DeviceCreationFailed`] from the failing step.
    pub fn initialize(&mut self, settings: &AppSettings) -> Result<()> {
        if self.state != AcquisitionState::Uninitialized {
            return Err(Error::InvalidState(self.state).into());
        }

        match self.acquire(settings) {
            Ok(()) => {
                self.state.advance(AcquisitionState::Ready);
                info!("VideoDecode struct initialized successfully");
                Ok(())
            }
            Err(err) => {
                self.release();
                self.state.advance(AcquisitionState::Failed);
                Err(err)
            }
        }
    }

    fn acquire(&mut self, settings: &AppSettings) -> Result<()> {
        info!("Creating Vulkan instance...");
        let instance = Instance::new(self.runtime.clone(), settings)?;
        let instance = self.instance.insert(Arc::new(instance));
        self.state.advance(AcquisitionState::InstanceCreated);

        info!("Selecting physical device...");
        let physical_device = self.physical_device.insert(PhysicalDevice::select(instance)?);
        self.state.advance(AcquisitionState::DeviceSelected);

        if settings.logical_device {
            info!("Creating logical device...");
            let device = self.device.insert(Device::new(physical_device, settings)?);
            self.state.advance(AcquisitionState::LogicalDeviceCreated);
            self.queue = Some(device.video_decode_queue());
        }

        Ok(())
    }

    /// Drops every held resource, most recently acquired first.
    fn release(&mut self) {
        drop(self.queue.take());
        drop(self.device.take());
        drop(self.physical_device.take());
        drop(self.instance.take());
    }

    /// Release all resources. Allowed from [`AcquisitionState::Ready`] and
    /// [`AcquisitionState::Failed`].
    /// # Errors
    /// * [`Error::InvalidState`] when called on a record that was never initialized. The record is
    ///   dropped either way.
    pub fn teardown(mut self) -> Result<()> {
        match self.state {
            AcquisitionState::Ready | AcquisitionState::Failed => {
                self.release();
                self.state.advance(AcquisitionState::TornDown);
                Ok(())
            }
            state => Err(Error::InvalidState(state).into()),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AcquisitionState {
        self.state
    }

    /// The instance, if it is currently held.
    pub fn instance(&self) -> Option<&Arc<Instance<R>>> {
        self.instance.as_ref()
    }

    /// The selected physical device, if any.
    pub fn physical_device(&self) -> Option<&PhysicalDevice<R>> {
        self.physical_device.as_ref()
    }

    /// The logical device, if one was created.
    pub fn device(&self) -> Option<&Device<R>> {
        self.device.as_ref()
    }

    /// The video decode queue, if a logical device was created.
    pub fn video_decode_queue(&self) -> Option<&Queue<R>> {
        self.queue.as_ref()
    }

    /// Queue family index used for video decode, once a physical device is selected.
    pub fn video_decode_queue_index(&self) -> Option<u32> {
        self.physical_device.as_ref().map(PhysicalDevice::video_decode_family)
    }
}

/// Run one complete acquisition and teardown, and return the process exit code:
/// [`EXIT_SUCCESS`] if every step succeeded, [`EXIT_FAILURE`] otherwise.
pub fn run<R: Runtime>(runtime: Arc<R>, settings: &AppSettings) -> i32 {
    let mut vd = VideoDecode::new(runtime);
    let mut ret = EXIT_SUCCESS;

    info!("Initializing VideoDecode struct");
    if let Err(err) = vd.initialize(settings) {
        error!("Error initializing VideoDecode struct: {:#}", err);
        ret = EXIT_FAILURE;
    }

    info!("Destroying VideoDecode struct");
    if let Err(err) = vd.teardown() {
        error!("Error destroying VideoDecode struct: {:#}", err);
        ret = EXIT_FAILURE;
    }

    ret
}
