#![allow(dead_code)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use ash::prelude::VkResult;
use ash::vk;

use video_decode::prelude::*;

/// Every call the acquisition sequence made into the runtime, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    CreateInstance(u64),
    DestroyInstance(u64),
    EnumeratePhysicalDevices,
    QueueFamilyProperties(usize),
    PhysicalDeviceName(usize),
    CreateDevice { physical_device: usize, queue_family: u32, device: u64 },
    DeviceQueue { device: u64, family: u32, index: u32 },
    DestroyDevice(u64),
}

/// Owned instance handle. Deliberately not `Clone` so a double destroy cannot happen by accident.
#[derive(Debug)]
pub struct MockInstance(pub u64);

/// Owned device handle.
#[derive(Debug)]
pub struct MockDevice(pub u64);

#[derive(Debug, Clone)]
struct MockPhysicalDevice {
    name: String,
    queue_families: Vec<vk::QueueFlags>,
}

/// A [`Runtime`] that records every call and can be scripted to fail at any step.
#[derive(Debug, Default)]
pub struct MockRuntime {
    devices: Vec<MockPhysicalDevice>,
    fail_instance: Option<vk::Result>,
    fail_enumerate: Option<vk::Result>,
    fail_device: Option<vk::Result>,
    next_handle: AtomicU64,
    calls: Mutex<Vec<Call>>,
    instance_requests: Mutex<Vec<InstanceRequest>>,
    device_requests: Mutex<Vec<DeviceRequest>>,
}

impl MockRuntime {
    pub fn new() -> Self {
        init_logger();
        Self::default()
    }

    /// Add a physical device with the given queue families.
    pub fn with_device(mut self, name: &str, queue_families: &[vk::QueueFlags]) -> Self {
        self.devices.push(MockPhysicalDevice {
            name: name.to_owned(),
            queue_families: queue_families.to_vec(),
        });
        self
    }

    pub fn fail_instance(mut self, result: vk::Result) -> Self {
        self.fail_instance = Some(result);
        self
    }

    pub fn fail_enumerate(mut self, result: vk::Result) -> Self {
        self.fail_enumerate = Some(result);
        self
    }

    pub fn fail_device(mut self, result: vk::Result) -> Self {
        self.fail_device = Some(result);
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| pred(call)).count()
    }

    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.calls().iter().position(|call| pred(call))
    }

    pub fn instances_destroyed(&self) -> usize {
        self.count(|call| matches!(call, Call::DestroyInstance(_)))
    }

    pub fn devices_destroyed(&self) -> usize {
        self.count(|call| matches!(call, Call::DestroyDevice(_)))
    }

    /// True if every created instance and device was destroyed exactly once.
    pub fn no_leaks(&self) -> bool {
        let calls = self.calls();
        let balanced = |created: fn(&Call) -> Option<u64>, destroyed: fn(&Call) -> Option<u64>| {
            let mut created = calls.iter().filter_map(created).collect::<Vec<_>>();
            let mut destroyed = calls.iter().filter_map(destroyed).collect::<Vec<_>>();
            created.sort();
            destroyed.sort();
            created == destroyed
        };
        balanced(
            |call| match call {
                Call::CreateInstance(id) => Some(*id),
                _ => None,
            },
            |call| match call {
                Call::DestroyInstance(id) => Some(*id),
                _ => None,
            },
        ) && balanced(
            |call| match call {
                Call::CreateDevice { device, .. } => Some(*device),
                _ => None,
            },
            |call| match call {
                Call::DestroyDevice(id) => Some(*id),
                _ => None,
            },
        )
    }

    pub fn instance_requests(&self) -> Vec<InstanceRequest> {
        self.instance_requests.lock().unwrap().clone()
    }

    pub fn device_requests(&self) -> Vec<DeviceRequest> {
        self.device_requests.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn handle(&self) -> u64 {
        self.next_handle.fetch_add(1, Ordering::Relaxed) + 1
    }
}

impl Runtime for MockRuntime {
    type Instance = MockInstance;
    type PhysicalDevice = usize;
    type Device = MockDevice;
    type Queue = (u64, u32, u32);

    fn create_instance(&self, request: &InstanceRequest) -> VkResult<MockInstance> {
        self.instance_requests.lock().unwrap().push(request.clone());
        if let Some(result) = self.fail_instance {
            return Err(result);
        }
        let id = self.handle();
        self.record(Call::CreateInstance(id));
        Ok(MockInstance(id))
    }

    unsafe fn destroy_instance(&self, instance: MockInstance) {
        self.record(Call::DestroyInstance(instance.0));
    }

    fn enumerate_physical_devices(&self, _instance: &MockInstance) -> VkResult<Vec<usize>> {
        self.record(Call::EnumeratePhysicalDevices);
        if let Some(result) = self.fail_enumerate {
            return Err(result);
        }
        Ok((0..self.devices.len()).collect())
    }

    fn physical_device_name(&self, _instance: &MockInstance, physical_device: usize) -> String {
        self.record(Call::PhysicalDeviceName(physical_device));
        self.devices[physical_device].name.clone()
    }

    fn queue_family_properties(
        &self,
        _instance: &MockInstance,
        physical_device: usize,
    ) -> Vec<vk::QueueFamilyProperties> {
        self.record(Call::QueueFamilyProperties(physical_device));
        self.devices[physical_device]
            .queue_families
            .iter()
            .map(|&queue_flags| vk::QueueFamilyProperties {
                queue_flags,
                queue_count: 1,
                ..Default::default()
            })
            .collect()
    }

    fn create_device(
        &self,
        _instance: &MockInstance,
        physical_device: usize,
        request: &DeviceRequest,
    ) -> VkResult<MockDevice> {
        self.device_requests.lock().unwrap().push(request.clone());
        if let Some(result) = self.fail_device {
            return Err(result);
        }
        let id = self.handle();
        self.record(Call::CreateDevice {
            physical_device,
            queue_family: request.queue_family_index,
            device: id,
        });
        Ok(MockDevice(id))
    }

    fn device_queue(
        &self,
        device: &MockDevice,
        family_index: u32,
        queue_index: u32,
    ) -> (u64, u32, u32) {
        self.record(Call::DeviceQueue {
            device: device.0,
            family: family_index,
            index: queue_index,
        });
        (device.0, family_index, queue_index)
    }

    unsafe fn destroy_device(&self, device: MockDevice) {
        self.record(Call::DestroyDevice(device.0));
    }
}

pub fn init_logger() {
    let _ = pretty_env_logger::try_init();
}

/// Settings for automated tests: no validation, full sequence.
pub fn settings() -> AppSettings {
    AppBuilder::new()
        .name("video decode test framework")
        .version((0, 0, 1))
        .validation(false)
        .build()
}

/// A runtime with a single device exposing one video decode queue family.
pub fn capable_runtime() -> Arc<MockRuntime> {
    MockRuntime::new()
        .with_device("Mock GPU", &[vk::QueueFlags::VIDEO_DECODE_KHR])
        .build()
}
