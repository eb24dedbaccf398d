//! Shader management.
//!
//! Every raycasting program is the shared prelude (bindings, vertex stage,
//! ray setup) followed by one fragment stage per [`RenderMode`].

use volray_core::RenderMode;

use crate::error::{RenderError, RenderResult};

/// Bindings, vertex stage and ray helpers shared by all modes.
pub const RAYCAST_COMMON: &str = include_str!("shaders/raycast_common.wgsl");

/// Fragment stage source for a render mode.
#[must_use]
pub fn fragment_source(mode: RenderMode) -> &'static str {
    match mode {
        RenderMode::Isosurface => include_str!("shaders/isosurface.wgsl"),
        RenderMode::AlphaBlending => include_str!("shaders/alpha_blending.wgsl"),
        RenderMode::MaximumIntensityProjection => include_str!("shaders/mip.wgsl"),
    }
}

/// Builder for creating shader modules.
pub struct ShaderBuilder {
    vertex_source: Option<String>,
    fragment_source: Option<String>,
    label: Option<String>,
}

impl ShaderBuilder {
    /// Creates a new shader builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            vertex_source: None,
            fragment_source: None,
            label: None,
        }
    }

    /// Builder preloaded with the program for `mode`.
    #[must_use]
    pub fn for_mode(mode: RenderMode) -> Self {
        Self::new()
            .with_label(format!("{mode} raycast shader"))
            .with_vertex(RAYCAST_COMMON)
            .with_fragment(fragment_source(mode))
    }

    /// Sets the vertex shader source (WGSL).
    pub fn with_vertex(mut self, source: impl Into<String>) -> Self {
        self.vertex_source = Some(source.into());
        self
    }

    /// Sets the fragment shader source (WGSL).
    pub fn with_fragment(mut self, source: impl Into<String>) -> Self {
        self.fragment_source = Some(source.into());
        self
    }

    /// Sets the shader label for debugging.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Label the module is created with.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Builds the shader module (does not create pipeline).
    pub fn build_module(&self, device: &wgpu::Device) -> RenderResult<wgpu::ShaderModule> {
        let source = self.combined_source()?;

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: self.label.as_deref(),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        Ok(module)
    }

    /// The full WGSL source the module is built from.
    pub fn combined_source(&self) -> RenderResult<String> {
        let vertex = self
            .vertex_source
            .as_ref()
            .ok_or_else(|| RenderError::ShaderCompilationFailed("missing vertex shader".into()))?;

        let fragment = self.fragment_source.as_ref().ok_or_else(|| {
            RenderError::ShaderCompilationFailed("missing fragment shader".into())
        })?;

        Ok(format!("{vertex}\n\n{fragment}"))
    }
}

impl Default for ShaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_stage() {
        let builder = ShaderBuilder::new().with_vertex(RAYCAST_COMMON);
        assert!(matches!(
            builder.combined_source(),
            Err(RenderError::ShaderCompilationFailed(_))
        ));
    }

    #[test]
    fn test_every_mode_has_one_fragment_entry() {
        for mode in RenderMode::ALL {
            let source = ShaderBuilder::for_mode(mode).combined_source().unwrap();
            assert_eq!(source.matches("fn vs_main").count(), 1, "{mode}");
            assert_eq!(source.matches("fn fs_main").count(), 1, "{mode}");
            assert!(source.contains("struct RaycastUniforms"));
        }
    }

    #[test]
    fn test_threshold_read_only_by_isosurface() {
        assert!(fragment_source(RenderMode::Isosurface).contains("u.threshold"));
        assert!(!fragment_source(RenderMode::AlphaBlending).contains("u.threshold"));
        assert!(!fragment_source(RenderMode::MaximumIntensityProjection).contains("u.threshold"));
    }

    #[test]
    fn test_prelude_precedes_fragment() {
        for mode in RenderMode::ALL {
            let source = ShaderBuilder::for_mode(mode).combined_source().unwrap();
            assert!(source.starts_with(RAYCAST_COMMON), "{mode}");
            assert!(source.ends_with(fragment_source(mode)), "{mode}");
        }
    }

    #[test]
    fn test_labels() {
        let builder = ShaderBuilder::for_mode(RenderMode::MaximumIntensityProjection);
        assert_eq!(builder.label(), Some("MIP raycast shader"));
    }
}
