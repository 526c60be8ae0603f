/// Format and compositing of the surface a renderer draws into.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SurfaceInfo {
    pub format: wgpu::TextureFormat,
    pub alpha_mode: wgpu::CompositeAlphaMode,
}

impl SurfaceInfo {
    /// Blend state matching how the compositor reads the surface.
    ///
    /// A premultiplied surface shows the desktop through cleared pixels, so
    /// shapes blend premultiplied. Anything else gets plain alpha blending.
    pub fn blend(self) -> wgpu::BlendState {
        match self.alpha_mode {
            wgpu::CompositeAlphaMode::PreMultiplied => wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING,
            _ => wgpu::BlendState::ALPHA_BLENDING,
        }
    }
}

/// Device handles and surface info a renderer builds resources from.
#[derive(Copy, Clone)]
pub struct RenderCtx<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub surface: SurfaceInfo,
}

/// The frame being recorded: its encoder and the surface view it ends up on.
pub struct RenderTarget<'a> {
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub color_view: &'a wgpu::TextureView,
}

impl<'a> RenderTarget<'a> {
    #[inline]
    pub fn new(encoder: &'a mut wgpu::CommandEncoder, color_view: &'a wgpu::TextureView) -> Self {
        Self { encoder, color_view }
    }

    /// Opens a pass over the surface view. `clear: None` keeps what earlier
    /// passes drew.
    pub fn pass(&mut self, label: &str, clear: Option<wgpu::Color>) -> wgpu::RenderPass<'_> {
        let load = match clear {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        };
        self.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: self.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blend_follows_surface_alpha_mode() {
        let mut info = SurfaceInfo {
            format: wgpu::TextureFormat::Bgra8Unorm,
            alpha_mode: wgpu::CompositeAlphaMode::PreMultiplied,
        };
        assert_eq!(info.blend(), wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING);

        info.alpha_mode = wgpu::CompositeAlphaMode::Opaque;
        assert_eq!(info.blend(), wgpu::BlendState::ALPHA_BLENDING);
    }
}
