use wgpu::util::DeviceExt;

use crate::instances::InstanceRaw;

use super::mirror::{DirtyAttrs, MirrorLayout, StagingMirror};

/// Device instance buffers plus their CPU mirror.
///
/// Buffers are sized once, to capacity, and never grow.
pub struct InstanceBuffers {
    mirror: StagingMirror,
    gpu: Vec<wgpu::Buffer>,
}

impl InstanceBuffers {
    /// Creates one device buffer per layout slot, initialized from `raw`.
    pub fn new(device: &wgpu::Device, layout: MirrorLayout, raw: &[InstanceRaw]) -> Self {
        let mirror = StagingMirror::new(layout, raw);
        let gpu = (0..mirror.buffer_count())
            .map(|b| {
                device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("swarm instance vbo"),
                    contents: mirror.bytes(b),
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                })
            })
            .collect();
        log::debug!(
            "instance buffers: {:?} layout, {} buffer(s), capacity {}",
            layout,
            mirror.buffer_count(),
            mirror.capacity()
        );
        Self { mirror, gpu }
    }

    #[inline]
    pub fn buffers(&self) -> &[wgpu::Buffer] {
        &self.gpu
    }

    /// Writes every dirty attribute of the packed store, one whole buffer at a
    /// time. Returns the number of buffer writes issued.
    pub fn sync(&mut self, queue: &wgpu::Queue, raw: &[InstanceRaw], dirty: DirtyAttrs) -> usize {
        let pending = self.mirror.pending(raw, dirty);
        for (buffer, bytes) in &pending {
            self.mirror.write(*buffer, bytes, 0);
            queue.write_buffer(&self.gpu[*buffer], 0, bytes);
        }
        pending.len()
    }
}
