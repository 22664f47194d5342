use video_decode::prelude::*;

use AcquisitionState::*;

const ALL: [AcquisitionState; 7] = [
    Uninitialized,
    InstanceCreated,
    DeviceSelected,
    LogicalDeviceCreated,
    Ready,
    Failed,
    TornDown,
];

#[test]
pub fn forward_transitions() {
    assert!(Uninitialized.can_advance_to(InstanceCreated));
    assert!(InstanceCreated.can_advance_to(DeviceSelected));
    assert!(DeviceSelected.can_advance_to(LogicalDeviceCreated));
    assert!(LogicalDeviceCreated.can_advance_to(Ready));
    assert!(DeviceSelected.can_advance_to(Ready));
    assert!(Ready.can_advance_to(TornDown));
    assert!(Failed.can_advance_to(TornDown));
}

#[test]
pub fn failure_reachable_from_every_step() {
    for state in [Uninitialized, InstanceCreated, DeviceSelected, LogicalDeviceCreated] {
        assert!(state.can_advance_to(Failed), "{state:?} -> Failed");
    }
    assert!(!Ready.can_advance_to(Failed));
    assert!(!TornDown.can_advance_to(Failed));
}

#[test]
pub fn no_state_reenters_earlier_state() {
    for (i, from) in ALL.iter().enumerate() {
        for to in &ALL[..=i] {
            assert!(!from.can_advance_to(*to), "{from:?} -> {to:?} should be rejected");
        }
    }
}

#[test]
pub fn torn_down_is_terminal() {
    for to in ALL {
        assert!(!TornDown.can_advance_to(to));
    }
}

#[test]
pub fn builder_defaults() {
    let settings = AppBuilder::new().build();
    assert_eq!(settings.engine_name, "No Engine");
    assert_eq!(settings.api_version, (1, 0, 0));
    assert!(!settings.enable_validation);
    assert!(settings.logical_device);
    assert_eq!(settings.queue_priority, 1.0);
    assert!(settings.device_extensions.is_empty());
}

#[test]
pub fn builder_clamps_queue_priority() {
    assert_eq!(AppBuilder::new().queue_priority(3.0).build().queue_priority, 1.0);
    assert_eq!(AppBuilder::new().queue_priority(-1.0).build().queue_priority, 0.0);
    assert_eq!(AppBuilder::new().queue_priority(0.5).build().queue_priority, 0.5);
    assert_eq!(AppBuilder::new().queue_priority(f32::NAN).build().queue_priority, 1.0);
    assert_eq!(AppBuilder::new().queue_priority(f32::NEG_INFINITY).build().queue_priority, 0.0);
}

#[test]
pub fn validation_messages_map_to_log_levels() {
    use log::Level;
    use video_decode::vk::DebugUtilsMessageSeverityFlagsEXT as Severity;

    assert_eq!(message_level(Severity::ERROR), Level::Error);
    assert_eq!(message_level(Severity::WARNING), Level::Warn);
    assert_eq!(message_level(Severity::WARNING | Severity::ERROR), Level::Error);
}
