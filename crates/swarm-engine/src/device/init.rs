/// Initialization parameters for the GPU layer.
#[derive(Debug, Clone)]
pub struct GpuInit {
    /// Prefer an sRGB surface format when available.
    pub prefer_srgb: bool,

    /// Present mode (swap behavior).
    ///
    /// Defaults to `AutoNoVsync` so the frame rate is uncapped; use
    /// [`GpuInit::vsync`] to lock to the display.
    pub present_mode: wgpu::PresentMode,

    /// Optional alpha mode preference for the surface.
    ///
    /// If provided but unsupported on the current surface, a supported mode is selected.
    pub alpha_mode: Option<wgpu::CompositeAlphaMode>,

    /// Required wgpu features.
    pub required_features: wgpu::Features,

    /// Limits requested from the adapter/device.
    pub required_limits: wgpu::Limits,

    /// Desired maximum frame latency for the surface.
    ///
    /// This value is a hint; support depends on platform/backend.
    pub desired_maximum_frame_latency: u32,
}

impl GpuInit {
    /// Presentation locked to the display refresh.
    pub fn vsync(mut self) -> Self {
        self.present_mode = wgpu::PresentMode::Fifo;
        self
    }

    /// Surface setup for a see-through window: premultiplied alpha when the
    /// compositor supports it, and a linear format so cleared alpha is exact.
    pub fn transparent(mut self) -> Self {
        self.alpha_mode = Some(wgpu::CompositeAlphaMode::PreMultiplied);
        self.prefer_srgb = false;
        self
    }
}

impl Default for GpuInit {
    fn default() -> Self {
        Self {
            prefer_srgb: true,
            present_mode: wgpu::PresentMode::AutoNoVsync,
            alpha_mode: None,
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            desired_maximum_frame_latency: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_uncapped() {
        let init = GpuInit::default();
        assert_eq!(init.present_mode, wgpu::PresentMode::AutoNoVsync);
        assert_eq!(init.vsync().present_mode, wgpu::PresentMode::Fifo);
    }

    #[test]
    fn transparent_requests_premultiplied_alpha() {
        let init = GpuInit::default().transparent();
        assert_eq!(init.alpha_mode, Some(wgpu::CompositeAlphaMode::PreMultiplied));
        assert!(!init.prefer_srgb);
    }
}
