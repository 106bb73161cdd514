pub mod instance;
mod device;
mod pipeline;
mod buffer;

pub use instance::VulkanInstance;
pub use device::{VulkanBindGroup, VulkanBindGroupLayout, VulkanDevice};
pub use pipeline::*;
pub use buffer::VulkanBuffer;
