//! Shader program compilation.
//!
//! WGSL is parsed and validated with naga before it reaches the device, so a
//! broken program fails with a readable diagnostic instead of a device-lost
//! panic deep inside pipeline creation.

use std::borrow::Cow;

use anyhow::anyhow;

/// Source of the instanced shapes program.
pub const SHAPES_WGSL: &str = include_str!("shaders/shapes.wgsl");

/// Parses and validates WGSL into naga IR.
pub fn parse_module(label: &str, source: &str) -> anyhow::Result<naga::Module> {
    let module = naga::front::wgsl::parse_str(source).map_err(|e| {
        let diagnostic = e.emit_to_string(source);
        log::error!("shader '{label}' failed to parse:\n{diagnostic}");
        anyhow!("shader '{label}' failed to parse: {diagnostic}")
    })?;

    let mut validator = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::empty(),
    );
    validator.validate(&module).map_err(|e| {
        let diagnostic = e.emit_to_string(source);
        log::error!("shader '{label}' failed validation:\n{diagnostic}");
        anyhow!("shader '{label}' failed validation: {diagnostic}")
    })?;

    Ok(module)
}

/// Compiles and links a program into a device shader module.
pub fn compile_program(
    device: &wgpu::Device,
    label: &str,
    source: &str,
) -> anyhow::Result<wgpu::ShaderModule> {
    let module = parse_module(label, source)?;
    log::debug!("compiled shader '{label}'");
    Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shapes_program_validates() {
        let module = parse_module("shapes", SHAPES_WGSL)
            .unwrap_or_else(|e| panic!("shapes.wgsl failed to compile: {e}"));
        let entries: Vec<&str> = module.entry_points.iter().map(|e| e.name.as_str()).collect();
        for name in ["vs_main", "fs_main", "fs_wire"] {
            assert!(entries.contains(&name), "missing entry point {name}");
        }
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = parse_module("broken", "@vertex fn vs_main( -> {}").unwrap_err();
        assert!(err.to_string().contains("broken"));
    }

    #[test]
    fn type_error_is_reported() {
        let source = "@fragment fn fs_main() -> @location(0) vec4<f32> { return 1.0; }";
        assert!(parse_module("mistyped", source).is_err());
    }
}
