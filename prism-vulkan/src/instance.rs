use ash::{Entry, vk};
use gpu_allocator::vulkan::{Allocator, AllocatorCreateDesc};
use gpu_allocator::{AllocationSizes, AllocatorDebugSettings};
use log::{error, info, warn};
use prism_core::{DeviceLimits, Instance, InstanceDescriptor, PrismError, PrismResult};
use std::ffi::{CStr, CString};
use std::sync::Arc;

use crate::VulkanDevice;

const VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

pub struct VulkanInstanceInner {
    debug: Option<(ash::ext::debug_utils::Instance, vk::DebugUtilsMessengerEXT)>,
    pub instance: ash::Instance,
    _entry: Entry,
}

impl Drop for VulkanInstanceInner {
    fn drop(&mut self) {
        unsafe {
            if let Some((loader, messenger)) = self.debug.take() {
                loader.destroy_debug_utils_messenger(messenger, None);
            }
            info!("Destroying Vulkan Instance");
            self.instance.destroy_instance(None);
        }
    }
}

/// Headless Vulkan instance. Devices created from it keep it alive.
pub struct VulkanInstance {
    inner: Arc<VulkanInstanceInner>,
}

unsafe extern "system" fn vulkan_debug_callback(
    message_severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    message_type: vk::DebugUtilsMessageTypeFlagsEXT,
    p_callback_data: *const vk::DebugUtilsMessengerCallbackDataEXT<'_>,
    _user_data: *mut std::os::raw::c_void,
) -> vk::Bool32 {
    let callback_data = unsafe { *p_callback_data };

    let message_id_name = if callback_data.p_message_id_name.is_null() {
        std::borrow::Cow::from("")
    } else {
        unsafe { CStr::from_ptr(callback_data.p_message_id_name).to_string_lossy() }
    };

    let message = if callback_data.p_message.is_null() {
        std::borrow::Cow::from("")
    } else {
        unsafe { CStr::from_ptr(callback_data.p_message).to_string_lossy() }
    };

    let log_level = match message_severity {
        vk::DebugUtilsMessageSeverityFlagsEXT::VERBOSE => log::Level::Debug,
        vk::DebugUtilsMessageSeverityFlagsEXT::WARNING => log::Level::Warn,
        vk::DebugUtilsMessageSeverityFlagsEXT::ERROR => log::Level::Error,
        _ => log::Level::Info,
    };

    log::log!(
        log_level,
        "[Vulkan] {:?} [{} ({})]: {}",
        message_type,
        message_id_name,
        callback_data.message_id_number,
        message
    );

    vk::FALSE
}

fn validation_layer_available(entry: &Entry) -> bool {
    let layers = unsafe { entry.enumerate_instance_layer_properties() }.unwrap_or_default();
    layers
        .iter()
        .any(|layer| layer.layer_name_as_c_str().is_ok_and(|name| name == VALIDATION_LAYER))
}

impl Instance for VulkanInstance {
    type Device = VulkanDevice;

    fn new(descriptor: InstanceDescriptor) -> PrismResult<Self> {
        info!("Initializing Vulkan Instance for application: {}", descriptor.name);

        let entry = unsafe {
            Entry::load().map_err(|e| PrismError::InstanceCreationFailed(format!("Failed to load Vulkan Entry: {}", e)))?
        };

        let app_name = CString::new(descriptor.name)
            .map_err(|_| PrismError::InvalidArgument("Application name contains a NUL byte".to_string()))?;

        let app_info = vk::ApplicationInfo {
            p_application_name: app_name.as_ptr(),
            application_version: 0,
            p_engine_name: c"Prism".as_ptr(),
            engine_version: 0,
            api_version: vk::API_VERSION_1_2,
            ..Default::default()
        };

        let validation = descriptor.validation && {
            let available = validation_layer_available(&entry);
            if !available {
                warn!("Validation requested but VK_LAYER_KHRONOS_validation is not installed");
            }
            available
        };

        let mut extension_names = Vec::new();
        let mut layer_names = Vec::new();
        if validation {
            extension_names.push(ash::ext::debug_utils::NAME.as_ptr());
            layer_names.push(VALIDATION_LAYER.as_ptr());
        }

        let debug_create_info = vk::DebugUtilsMessengerCreateInfoEXT {
            message_severity: vk::DebugUtilsMessageSeverityFlagsEXT::WARNING | vk::DebugUtilsMessageSeverityFlagsEXT::ERROR,
            message_type: vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION,
            pfn_user_callback: Some(vulkan_debug_callback),
            ..Default::default()
        };

        let create_info = vk::InstanceCreateInfo {
            p_application_info: &app_info,
            pp_enabled_extension_names: extension_names.as_ptr(),
            enabled_extension_count: extension_names.len() as u32,
            pp_enabled_layer_names: layer_names.as_ptr(),
            enabled_layer_count: layer_names.len() as u32,
            ..Default::default()
        };

        let instance = unsafe {
            entry.create_instance(&create_info, None).map_err(|e| {
                error!("Instance creation error: {:?}", e);
                PrismError::InstanceCreationFailed(format!("Failed to create Vulkan Instance: {}", e))
            })?
        };

        let debug = if validation {
            let loader = ash::ext::debug_utils::Instance::new(&entry, &instance);
            match unsafe { loader.create_debug_utils_messenger(&debug_create_info, None) } {
                Ok(messenger) => Some((loader, messenger)),
                Err(e) => {
                    warn!("Failed to create debug messenger: {:?}", e);
                    None
                }
            }
        } else {
            None
        };

        info!("Vulkan Instance created successfully (validation: {})", debug.is_some());

        Ok(Self {
            inner: Arc::new(VulkanInstanceInner {
                debug,
                instance,
                _entry: entry,
            }),
        })
    }

    fn request_device(&self) -> PrismResult<Self::Device> {
        let instance = &self.inner.instance;
        let pdevices = unsafe {
            instance.enumerate_physical_devices().map_err(|e| {
                PrismError::DeviceCreationFailed(format!("Failed to enumerate physical devices: {}", e))
            })?
        };

        info!("Found {} physical devices", pdevices.len());

        let candidates: Vec<(vk::PhysicalDevice, u32, vk::PhysicalDeviceProperties)> = pdevices
            .iter()
            .filter_map(|&pdevice| {
                let props = unsafe { instance.get_physical_device_properties(pdevice) };
                let queue_families = unsafe { instance.get_physical_device_queue_family_properties(pdevice) };
                queue_families
                    .iter()
                    .position(|q| q.queue_flags.contains(vk::QueueFlags::GRAPHICS))
                    .map(|index| (pdevice, index as u32, props))
            })
            .collect();

        let (pdevice, queue_family_index, props) = candidates
            .iter()
            .find(|(_, _, props)| props.device_type == vk::PhysicalDeviceType::DISCRETE_GPU)
            .or_else(|| candidates.first())
            .copied()
            .ok_or_else(|| PrismError::DeviceCreationFailed("No suitable physical device found".to_string()))?;

        info!("Selected GPU: {:?} ({:?})", props.device_name_as_c_str().unwrap_or(c"?"), props.device_type);

        let supported = unsafe { instance.get_physical_device_features(pdevice) };
        let supports_wireframe = supported.fill_mode_non_solid == vk::TRUE;
        if !supports_wireframe {
            warn!("Physical device lacks fillModeNonSolid; wireframe pipelines will render filled");
        }
        let enabled_features = vk::PhysicalDeviceFeatures {
            fill_mode_non_solid: supported.fill_mode_non_solid,
            ..Default::default()
        };

        let priorities = [1.0];
        let queue_create_info = vk::DeviceQueueCreateInfo {
            queue_family_index,
            p_queue_priorities: priorities.as_ptr(),
            queue_count: 1,
            ..Default::default()
        };

        let device_create_info = vk::DeviceCreateInfo {
            p_queue_create_infos: &queue_create_info,
            queue_create_info_count: 1,
            p_enabled_features: &enabled_features,
            ..Default::default()
        };

        let device = unsafe {
            instance.create_device(pdevice, &device_create_info, None).map_err(|e| {
                error!("Failed to create logical device: {:?}", e);
                PrismError::DeviceCreationFailed(format!("Failed to create logical device: {}", e))
            })?
        };

        let allocator = match Allocator::new(&AllocatorCreateDesc {
            instance: instance.clone(),
            device: device.clone(),
            physical_device: pdevice,
            debug_settings: AllocatorDebugSettings::default(),
            buffer_device_address: false,
            allocation_sizes: AllocationSizes::default(),
        }) {
            Ok(allocator) => allocator,
            Err(e) => {
                unsafe { device.destroy_device(None) };
                return Err(PrismError::DeviceCreationFailed(format!("Failed to create allocator: {}", e)));
            }
        };

        let limits = DeviceLimits {
            min_uniform_buffer_offset_alignment: props.limits.min_uniform_buffer_offset_alignment,
        };
        info!(
            "Vulkan Device created successfully (uniform offset alignment: {})",
            limits.min_uniform_buffer_offset_alignment
        );

        VulkanDevice::new(
            Arc::clone(&self.inner),
            device,
            pdevice,
            queue_family_index,
            allocator,
            limits,
            supports_wireframe,
        )
    }
}
