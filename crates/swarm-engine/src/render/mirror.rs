//! CPU side of the GPU Buffer Mirror.
//!
//! Describes how instance attributes are laid out across device buffers and
//! keeps a byte-exact shadow of what was last written to each one.

use crate::instances::InstanceRaw;

/// Per-instance attribute streamed to the vertex stage.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum InstanceAttr {
    Position,
    Scale,
    Color,
    Angle,
}

impl InstanceAttr {
    pub const ALL: [InstanceAttr; 4] = [
        InstanceAttr::Position,
        InstanceAttr::Scale,
        InstanceAttr::Color,
        InstanceAttr::Angle,
    ];

    /// `@location` in `shapes.wgsl`. Location 0 is the base quad corner.
    pub const fn shader_location(self) -> u32 {
        match self {
            InstanceAttr::Position => 1,
            InstanceAttr::Color => 2,
            InstanceAttr::Scale => 3,
            InstanceAttr::Angle => 4,
        }
    }

    pub const fn format(self) -> wgpu::VertexFormat {
        match self {
            InstanceAttr::Position | InstanceAttr::Scale => wgpu::VertexFormat::Float32x2,
            InstanceAttr::Color => wgpu::VertexFormat::Float32x3,
            InstanceAttr::Angle => wgpu::VertexFormat::Float32,
        }
    }

    /// Tightly packed size in bytes.
    pub const fn size(self) -> u64 {
        self.format().size()
    }

    /// Byte offset inside `InstanceRaw`.
    pub const fn struct_offset(self) -> u64 {
        match self {
            InstanceAttr::Position => 0,
            InstanceAttr::Scale => 8,
            InstanceAttr::Color => 16,
            InstanceAttr::Angle => 28,
        }
    }

    const fn index(self) -> usize {
        match self {
            InstanceAttr::Position => 0,
            InstanceAttr::Scale => 1,
            InstanceAttr::Color => 2,
            InstanceAttr::Angle => 3,
        }
    }
}

/// How instance attributes map onto device buffers.
///
/// One layout is used for every attribute of a program.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum MirrorLayout {
    /// One buffer of `InstanceRaw`, read by four views at different offsets.
    #[default]
    Interleaved,
    /// One tightly packed buffer per attribute.
    Separate,
}

/// One attribute view into a buffer.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttrView {
    pub attr: InstanceAttr,
    pub offset: u64,
}

/// One device buffer of the mirror.
#[derive(Debug, Clone, PartialEq)]
pub struct BufferSpec {
    pub stride: u64,
    pub views: Vec<AttrView>,
    attributes: Vec<wgpu::VertexAttribute>,
}

impl BufferSpec {
    fn new(stride: u64, views: Vec<AttrView>) -> Self {
        let attributes = views
            .iter()
            .map(|v| wgpu::VertexAttribute {
                format: v.attr.format(),
                offset: v.offset,
                shader_location: v.attr.shader_location(),
            })
            .collect();
        Self { stride, views, attributes }
    }

    /// Vertex layout advancing once per instance.
    pub fn vertex_layout(&self) -> wgpu::VertexBufferLayout<'_> {
        wgpu::VertexBufferLayout {
            array_stride: self.stride,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &self.attributes,
        }
    }
}

impl MirrorLayout {
    pub fn buffers(self) -> Vec<BufferSpec> {
        match self {
            MirrorLayout::Interleaved => vec![BufferSpec::new(
                InstanceRaw::SIZE,
                InstanceAttr::ALL
                    .iter()
                    .map(|&attr| AttrView { attr, offset: attr.struct_offset() })
                    .collect(),
            )],
            MirrorLayout::Separate => InstanceAttr::ALL
                .iter()
                .map(|&attr| BufferSpec::new(attr.size(), vec![AttrView { attr, offset: 0 }]))
                .collect(),
        }
    }

    /// Index of the buffer backing `attr`.
    pub fn buffer_of(self, attr: InstanceAttr) -> usize {
        match self {
            MirrorLayout::Interleaved => 0,
            MirrorLayout::Separate => attr.index(),
        }
    }
}

/// Attributes that changed this frame and must be uploaded.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct DirtyAttrs {
    pub position: bool,
    pub scale: bool,
    pub color: bool,
    pub angle: bool,
}

impl DirtyAttrs {
    pub const NONE: DirtyAttrs = DirtyAttrs { position: false, scale: false, color: false, angle: false };
    pub const ALL: DirtyAttrs = DirtyAttrs { position: true, scale: true, color: true, angle: true };
    /// Position and angle: what a physics sync touches.
    pub const POSE: DirtyAttrs = DirtyAttrs { position: true, scale: false, color: false, angle: true };

    #[inline]
    pub fn contains(self, attr: InstanceAttr) -> bool {
        match attr {
            InstanceAttr::Position => self.position,
            InstanceAttr::Scale => self.scale,
            InstanceAttr::Color => self.color,
            InstanceAttr::Angle => self.angle,
        }
    }

    #[inline]
    pub fn any(self) -> bool {
        self.position || self.scale || self.color || self.angle
    }
}

impl std::ops::BitOr for DirtyAttrs {
    type Output = DirtyAttrs;

    fn bitor(self, rhs: DirtyAttrs) -> DirtyAttrs {
        DirtyAttrs {
            position: self.position || rhs.position,
            scale: self.scale || rhs.scale,
            color: self.color || rhs.color,
            angle: self.angle || rhs.angle,
        }
    }
}

impl std::ops::BitOrAssign for DirtyAttrs {
    fn bitor_assign(&mut self, rhs: DirtyAttrs) {
        *self = *self | rhs;
    }
}

/// Byte image of one attribute across all instances, tightly packed.
pub fn attr_bytes(raw: &[InstanceRaw], attr: InstanceAttr) -> Vec<u8> {
    match attr {
        InstanceAttr::Position => {
            bytemuck::cast_slice(&raw.iter().map(|r| r.position).collect::<Vec<_>>()).to_vec()
        }
        InstanceAttr::Scale => {
            bytemuck::cast_slice(&raw.iter().map(|r| r.scale).collect::<Vec<_>>()).to_vec()
        }
        InstanceAttr::Color => {
            bytemuck::cast_slice(&raw.iter().map(|r| r.color).collect::<Vec<_>>()).to_vec()
        }
        InstanceAttr::Angle => {
            bytemuck::cast_slice(&raw.iter().map(|r| r.angle).collect::<Vec<_>>()).to_vec()
        }
    }
}

/// Shadow copy of the device buffers, sized to capacity at creation.
///
/// Writes never resize. Every write replaces a whole buffer: anything other
/// than the byte length the buffer was created with is a programming error.
#[derive(Debug, Clone)]
pub struct StagingMirror {
    layout: MirrorLayout,
    capacity: usize,
    specs: Vec<BufferSpec>,
    buffers: Vec<Vec<u8>>,
}

impl StagingMirror {
    /// Creates the mirror from the initial contents; `raw.len()` is the capacity.
    pub fn new(layout: MirrorLayout, raw: &[InstanceRaw]) -> Self {
        assert!(!raw.is_empty(), "mirror capacity must be positive");
        let specs = layout.buffers();
        let buffers = match layout {
            MirrorLayout::Interleaved => vec![bytemuck::cast_slice(raw).to_vec()],
            MirrorLayout::Separate => InstanceAttr::ALL.iter().map(|&a| attr_bytes(raw, a)).collect(),
        };
        for (spec, bytes) in specs.iter().zip(&buffers) {
            debug_assert_eq!(bytes.len() as u64, spec.stride * raw.len() as u64);
        }
        Self {
            layout,
            capacity: raw.len(),
            specs,
            buffers,
        }
    }

    #[inline]
    pub fn layout(&self) -> MirrorLayout {
        self.layout
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn specs(&self) -> &[BufferSpec] {
        &self.specs
    }

    #[inline]
    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    #[inline]
    pub fn bytes(&self, buffer: usize) -> &[u8] {
        &self.buffers[buffer]
    }

    /// Replaces the contents of the buffer backing `attr`. Returns that buffer's index.
    ///
    /// # Panics
    /// If `byte_offset` is not zero or `data` is not exactly the buffer's length.
    pub fn upload(&mut self, attr: InstanceAttr, data: &[u8], byte_offset: u64) -> usize {
        let buffer = self.layout.buffer_of(attr);
        self.write(buffer, data, byte_offset);
        buffer
    }

    /// Buffer images to send for `dirty`, as `(buffer index, bytes)`.
    ///
    /// Interleaved layouts re-send their single buffer when anything changed;
    /// separate layouts send only the dirty attributes.
    pub fn pending(&self, raw: &[InstanceRaw], dirty: DirtyAttrs) -> Vec<(usize, Vec<u8>)> {
        assert_eq!(
            raw.len(),
            self.capacity,
            "packed instances must match mirror capacity"
        );
        match self.layout {
            MirrorLayout::Interleaved if dirty.any() => vec![(0, bytemuck::cast_slice(raw).to_vec())],
            MirrorLayout::Interleaved => Vec::new(),
            MirrorLayout::Separate => InstanceAttr::ALL
                .iter()
                .filter(|&&a| dirty.contains(a))
                .map(|&a| (self.layout.buffer_of(a), attr_bytes(raw, a)))
                .collect(),
        }
    }

    pub(crate) fn write(&mut self, buffer: usize, data: &[u8], byte_offset: u64) {
        let len = self.buffers[buffer].len();
        assert!(
            byte_offset == 0 && data.len() == len,
            "upload size mismatch: {} bytes at offset {byte_offset} into buffer {buffer} of {len} bytes",
            data.len()
        );
        self.buffers[buffer].copy_from_slice(data);
    }
}
