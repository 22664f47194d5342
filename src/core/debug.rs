use ash::prelude::VkResult;
use ash::vk;

use crate::util::string::wrap_c_str;

/// Vulkan debug messenger. Forwards messages from the validation layers to the logger.
#[derive(Derivative)]
#[derivative(Debug)]
pub struct DebugMessenger {
    handle: vk::DebugUtilsMessengerEXT,
    #[derivative(Debug = "ignore")]
    functions: ash::extensions::ext::DebugUtils,
}

impl DebugMessenger {
    /// Creates a new debug messenger. Requires `VK_EXT_debug_utils` to be enabled on the instance.
    pub fn new(entry: &ash::Entry, instance: &ash::Instance) -> VkResult<Self> {
        let functions = ash::extensions::ext::DebugUtils::new(entry, instance);
        let info = vk::DebugUtilsMessengerCreateInfoEXT {
            s_type: vk::StructureType::DEBUG_UTILS_MESSENGER_CREATE_INFO_EXT,
            p_next: std::ptr::null(),
            flags: Default::default(),
            message_severity: vk::DebugUtilsMessageSeverityFlagsEXT::WARNING
                | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            message_type: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            pfn_user_callback: Some(vk_debug_callback),
            p_user_data: std::ptr::null_mut(),
        };
        let handle = unsafe { functions.create_debug_utils_messenger(&info, None)? };
        #[cfg(feature = "log-objects")]
        trace!("Created new VkDebugUtilsMessengerEXT {:?}", handle);
        Ok(DebugMessenger {
            handle,
            functions,
        })
    }
}

impl Drop for DebugMessenger {
    fn drop(&mut self) {
        #[cfg(feature = "log-objects")]
        trace!("Destroying VkDebugUtilsMessengerEXT {:?}", self.handle);
        unsafe {
            self.functions.destroy_debug_utils_messenger(self.handle, None);
        }
    }
}

/// Log level a validation message is forwarded at. The messenger only subscribes to warnings and
/// errors, so everything that is not an error is logged as a warning.
pub fn message_level(severity: vk::DebugUtilsMessageSeverityFlagsEXT) -> log::Level {
    if severity.contains(vk::DebugUtilsMessageSeverityFlagsEXT::ERROR) {
        log::Level::Error
    } else {
        log::Level::Warn
    }
}

extern "system" fn vk_debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    msg_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    if p_callback_data.is_null() {
        return vk::FALSE;
    }

    let callback_data = unsafe { *p_callback_data };
    let message_id_number = callback_data.message_id_number;
    let message_id_name = unsafe { wrap_c_str(callback_data.p_message_id_name) };
    let message = unsafe { wrap_c_str(callback_data.p_message) };

    log!(
        message_level(severity),
        "[{:?}]: {} ({}): {}",
        msg_type,
        message_id_name,
        message_id_number,
        message
    );

    vk::FALSE
}
