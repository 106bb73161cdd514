pub struct InstanceDescriptor<'a> {
    pub name: &'a str,
    /// Install the validation layer and forward its messages to `log`.
    pub validation: bool,
}

pub trait Instance: Sized {
    type Device: crate::Device;

    /// Create a new instance of the rendering backend.
    fn new(descriptor: InstanceDescriptor) -> crate::PrismResult<Self>;

    /// Pick a physical device with a graphics queue and open a logical device on it.
    /// No presentation surface is involved.
    fn request_device(&self) -> crate::PrismResult<Self::Device>;
}
