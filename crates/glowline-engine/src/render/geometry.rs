use crate::device::{capture_errors, checked};
use crate::error::RenderError;

use super::line::{LineQuad, OutlineVertex};

pub const VERTICES_PER_LINE: usize = 4;
pub const INDICES_PER_LINE: usize = 6;

/// Largest frame addressable with 16-bit indices.
pub const MAX_LINES_PER_FRAME: usize = (u16::MAX as usize + 1) / VERTICES_PER_LINE;

/// Initial GPU capacity, in lines.
pub const DEFAULT_LINE_CAPACITY: usize = 128;

const VERTEX_BYTES_PER_LINE: u64 = (std::mem::size_of::<OutlineVertex>() * VERTICES_PER_LINE) as u64;
const INDEX_BYTES_PER_LINE: u64 = (std::mem::size_of::<u16>() * INDICES_PER_LINE) as u64;

// ── host side ─────────────────────────────────────────────────────────────

/// This frame's rasterized lines, rebuilt from scratch every frame.
#[derive(Debug, Default)]
pub struct HostGeometry {
    vertices: Vec<OutlineVertex>,
    indices: Vec<u16>,
    line_count: usize,
    warned_full: bool,
}

impl HostGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empties the arrays, keeping their allocations.
    pub fn begin_frame(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.line_count = 0;
    }

    /// Base index for the next quad, or `None` once 16-bit indices are exhausted.
    pub fn next_base(&self) -> Option<u16> {
        if self.line_count >= MAX_LINES_PER_FRAME {
            return None;
        }
        u16::try_from(self.vertices.len()).ok()
    }

    /// Appends a quad produced with `next_base()` as its base.
    ///
    /// Returns `false` (and drops the quad) when the frame is full.
    pub fn push_line(&mut self, quad: LineQuad) -> bool {
        if self.next_base().is_none() {
            if !self.warned_full {
                log::warn!("frame exceeds {MAX_LINES_PER_FRAME} lines; extra lines are dropped");
                self.warned_full = true;
            }
            return false;
        }
        debug_assert_eq!(Some(quad.indices[0]), self.next_base());

        self.vertices.extend_from_slice(&quad.vertices);
        self.indices.extend_from_slice(&quad.indices);
        self.line_count += 1;
        true
    }

    pub fn line_count(&self) -> usize {
        self.line_count
    }

    pub fn vertices(&self) -> &[OutlineVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u16] {
        &self.indices
    }

    /// Indices to draw for this frame.
    pub fn index_count(&self) -> u32 {
        (self.line_count * INDICES_PER_LINE) as u32
    }
}

// ── GPU side ──────────────────────────────────────────────────────────────

/// Which of the two mirror buffers is being allocated.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BufferRole {
    Vertex,
    Index,
}

impl BufferRole {
    fn label(self) -> &'static str {
        match self {
            BufferRole::Vertex => "vertex",
            BufferRole::Index => "index",
        }
    }
}

/// Buffer allocation and upload capability used by [`GeometryBuffers`].
///
/// Implemented for wgpu by [`WgpuGeometryBackend`]; tests substitute an
/// in-memory backend.
pub trait GeometryBackend {
    type Buffer;

    /// Allocates a buffer of `size` bytes. Failure is reported as
    /// [`RenderError::Allocation`].
    fn create_buffer(&self, role: BufferRole, size: u64) -> Result<Self::Buffer, RenderError>;

    /// Copies `data` to the start of `buffer`.
    fn write_buffer(&self, buffer: &Self::Buffer, data: &[u8]);
}

/// GPU-resident mirror of the host arrays.
#[derive(Debug)]
pub struct GpuBufferPair<B> {
    pub capacity_lines: usize,
    pub vertex_buffer: B,
    pub index_buffer: B,
}

impl<B> GpuBufferPair<B> {
    /// Allocates both buffers; either both succeed or neither replaces anything.
    fn allocate<D>(backend: &D, capacity_lines: usize) -> Result<Self, RenderError>
    where
        D: GeometryBackend<Buffer = B>,
    {
        let lines = capacity_lines as u64;
        let vertex_buffer = backend.create_buffer(BufferRole::Vertex, lines * VERTEX_BYTES_PER_LINE)?;
        let index_buffer = backend.create_buffer(BufferRole::Index, lines * INDEX_BYTES_PER_LINE)?;
        Ok(Self {
            capacity_lines,
            vertex_buffer,
            index_buffer,
        })
    }
}

/// Host arrays plus their growable GPU mirror.
///
/// Growth replaces the buffer pair by value. Buffers referenced by already
/// submitted work stay alive through wgpu's own reference counting, so nothing
/// is ever overwritten while the GPU may still read it.
pub struct GeometryBuffers<B> {
    host: HostGeometry,
    gpu: GpuBufferPair<B>,
}

impl<B> GeometryBuffers<B> {
    pub fn new<D>(backend: &D, initial_capacity_lines: usize) -> Result<Self, RenderError>
    where
        D: GeometryBackend<Buffer = B>,
    {
        Ok(Self {
            host: HostGeometry::new(),
            gpu: GpuBufferPair::allocate(backend, initial_capacity_lines.max(1))?,
        })
    }

    pub fn begin_frame(&mut self) {
        self.host.begin_frame();
    }

    pub fn host(&self) -> &HostGeometry {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut HostGeometry {
        &mut self.host
    }

    pub fn gpu(&self) -> &GpuBufferPair<B> {
        &self.gpu
    }

    pub fn capacity_lines(&self) -> usize {
        self.gpu.capacity_lines
    }

    /// Grows the GPU buffers if needed (to twice the host line count), then
    /// re-uploads the whole frame at offset zero.
    ///
    /// On allocation failure the previous buffers are kept and nothing is uploaded.
    pub fn sync<D>(&mut self, backend: &D) -> Result<(), RenderError>
    where
        D: GeometryBackend<Buffer = B>,
    {
        let needed = self.host.line_count();
        if self.gpu.capacity_lines < needed {
            let new_capacity = needed * 2;
            self.gpu = GpuBufferPair::allocate(backend, new_capacity)?;
            log::debug!("geometry buffers grown to {new_capacity} lines ({needed} in frame)");
        }

        if needed == 0 {
            return Ok(());
        }

        backend.write_buffer(&self.gpu.vertex_buffer, bytemuck::cast_slice(self.host.vertices()));
        backend.write_buffer(&self.gpu.index_buffer, bytemuck::cast_slice(self.host.indices()));
        Ok(())
    }
}

// ── wgpu backend ──────────────────────────────────────────────────────────

/// [`GeometryBackend`] over a wgpu device and queue.
pub struct WgpuGeometryBackend<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
}

impl<'a> WgpuGeometryBackend<'a> {
    pub fn new(device: &'a wgpu::Device, queue: &'a wgpu::Queue) -> Self {
        Self { device, queue }
    }
}

impl GeometryBackend for WgpuGeometryBackend<'_> {
    type Buffer = wgpu::Buffer;

    fn create_buffer(&self, role: BufferRole, size: u64) -> Result<wgpu::Buffer, RenderError> {
        let limit = self.device.limits().max_buffer_size;
        if size > limit {
            return Err(allocation_error(role, size, limit));
        }

        let usage = match role {
            BufferRole::Vertex => wgpu::BufferUsages::VERTEX,
            BufferRole::Index => wgpu::BufferUsages::INDEX,
        };

        let (buffer, error) = capture_errors(self.device, || {
            self.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(match role {
                    BufferRole::Vertex => "glowline outline vbo",
                    BufferRole::Index => "glowline outline ibo",
                }),
                size,
                usage: usage | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            })
        });
        device_checked(role, size, limit, buffer, error)
    }

    fn write_buffer(&self, buffer: &wgpu::Buffer, data: &[u8]) {
        self.queue.write_buffer(buffer, 0, data);
    }
}

/// Maps an error the device reported while creating `buffer` to an
/// allocation failure for `role`.
fn device_checked<B>(
    role: BufferRole,
    size: u64,
    limit: u64,
    buffer: B,
    error: Option<impl std::fmt::Display>,
) -> Result<B, RenderError> {
    checked(buffer, error, |e| {
        log::warn!("{} buffer of {size} bytes rejected by device: {e}", role.label());
        allocation_error(role, size, limit)
    })
}

fn allocation_error(role: BufferRole, size: u64, limit: u64) -> RenderError {
    let per_line = match role {
        BufferRole::Vertex => VERTEX_BYTES_PER_LINE,
        BufferRole::Index => INDEX_BYTES_PER_LINE,
    };
    RenderError::Allocation {
        what: role.label(),
        capacity_lines: (size / per_line) as usize,
        requested_bytes: size,
        limit_bytes: limit,
    }
}
