pub mod device;
pub mod error;
pub mod instance;
pub mod shader;

pub use device::{Device, DeviceLimits};
pub use error::{PrismError, PrismResult};
pub use instance::{Instance, InstanceDescriptor};
