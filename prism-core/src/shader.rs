use naga::back::spv;
use naga::front::glsl;

use crate::{PrismError, PrismResult};

pub use naga::ShaderStage;

pub enum ShaderSource<'a> {
    Glsl {
        source: &'a str,
        stage: ShaderStage,
        defines: naga::FastHashMap<String, String>,
    },
    Wgsl(&'a str),
}

impl<'a> ShaderSource<'a> {
    /// GLSL source without preprocessor defines.
    pub fn glsl(source: &'a str, stage: ShaderStage) -> Self {
        ShaderSource::Glsl {
            source,
            stage,
            defines: Default::default(),
        }
    }
}

/// Parses, validates and lowers a shader to SPIR-V words.
pub fn compile_shader(source: ShaderSource) -> PrismResult<Vec<u32>> {
    let module = match source {
        ShaderSource::Wgsl(src) => naga::front::wgsl::Frontend::new()
            .parse(src)
            .map_err(|e| PrismError::ShaderCompilation(format!("WGSL parse error: {:?}", e)))?,
        ShaderSource::Glsl { source, stage, defines } => {
            let mut parser = glsl::Frontend::default();
            let options = glsl::Options { stage, defines };
            parser
                .parse(&options, source)
                .map_err(|e| PrismError::ShaderCompilation(format!("GLSL parse error: {:?}", e)))?
        }
    };

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| PrismError::ShaderCompilation(format!("validation error: {:?}", e)))?;

    let words = spv::write_vec(&module, &info, &spv::Options::default(), None)
        .map_err(|e| PrismError::ShaderCompilation(format!("SPIR-V write error: {:?}", e)))?;

    log::debug!("Compiled shader module ({} SPIR-V words)", words.len());
    Ok(words)
}
