use crate::core::runtime::Runtime;
use crate::Device;

/// A queue obtained from a logical device. Queues are owned by the device and need no explicit
/// release; this struct keeps the device alive while the queue is.
#[derive(Derivative)]
#[derivative(Debug(bound = ""), Clone(bound = ""))]
pub struct Queue<R: Runtime> {
    #[derivative(Debug = "ignore")]
    device: Device<R>,
    handle: R::Queue,
    family_index: u32,
    queue_index: u32,
}

impl<R: Runtime> Queue<R> {
    pub(crate) fn new(device: Device<R>, family_index: u32, queue_index: u32) -> Self {
        let handle = device
            .instance()
            .runtime()
            .device_queue(device.raw(), family_index, queue_index);
        Queue {
            device,
            handle,
            family_index,
            queue_index,
        }
    }

    /// Obtain the raw handle of the queue.
    pub fn handle(&self) -> R::Queue {
        self.handle
    }

    /// The queue family index.
    pub fn family_index(&self) -> u32 {
        self.family_index
    }

    /// Index of this queue within its family.
    pub fn queue_index(&self) -> u32 {
        self.queue_index
    }

    /// The device this queue belongs to.
    pub fn device(&self) -> &Device<R> {
        &self.device
    }
}
