use std::fmt;

#[derive(Debug)]
pub enum PrismError {
    InstanceCreationFailed(String),
    DeviceCreationFailed(String),
    ResourceCreationFailed(String),
    PipelineCreationFailed(String),
    ShaderCompilation(String),
    InvalidMesh(String),
    InvalidArgument(String),
    Config(String),
    BackendError(String),
    OutOfMemory,
}

impl fmt::Display for PrismError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PrismError::InstanceCreationFailed(msg) => write!(f, "Instance Creation Failed: {}", msg),
            PrismError::DeviceCreationFailed(msg) => write!(f, "Device Creation Failed: {}", msg),
            PrismError::ResourceCreationFailed(msg) => write!(f, "Resource Creation Failed: {}", msg),
            PrismError::PipelineCreationFailed(msg) => write!(f, "Pipeline Creation Failed: {}", msg),
            PrismError::ShaderCompilation(msg) => write!(f, "Shader Compilation Failed: {}", msg),
            PrismError::InvalidMesh(msg) => write!(f, "Invalid Mesh: {}", msg),
            PrismError::InvalidArgument(msg) => write!(f, "Invalid Argument: {}", msg),
            PrismError::Config(msg) => write!(f, "Configuration Error: {}", msg),
            PrismError::BackendError(msg) => write!(f, "Backend Error: {}", msg),
            PrismError::OutOfMemory => write!(f, "Out of Memory"),
        }
    }
}

impl std::error::Error for PrismError {}

pub type PrismResult<T> = Result<T, PrismError>;
