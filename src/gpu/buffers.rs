use wgpu::{Buffer, BufferUsages, Device, Queue};

use crate::render::Vertex;

/// Logical surface size passed to the shape shader (16 bytes, aligned to 16)
#[repr(C)]
#[derive(Clone, Copy, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ViewParams {
    pub width: f32,
    pub height: f32,
    /// 1.0 when the target is sRGB and vertex colors must be linearized
    pub linearize: f32,
    pub _padding: f32,
}

/// Per-frame vertex stream plus the view uniform
pub struct ShapeBuffers {
    pub vertex_buffer: Buffer,
    pub view_buffer: Buffer,
    /// Vertices that fit in `vertex_buffer`
    capacity: usize,
    /// Vertices written this frame
    vertex_count: u32,
}

impl ShapeBuffers {
    pub fn new(device: &Device, capacity: usize) -> Self {
        let view_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("view-params-buffer"),
            size: std::mem::size_of::<ViewParams>() as u64,
            usage: BufferUsages::UNIFORM | BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        Self {
            vertex_buffer: create_vertex_buffer(device, capacity),
            view_buffer,
            capacity,
            vertex_count: 0,
        }
    }

    /// Upload this frame's vertices, growing the buffer when they do not fit
    pub fn upload(&mut self, device: &Device, queue: &Queue, vertices: &[Vertex]) {
        if vertices.len() > self.capacity {
            let capacity = vertices.len().next_power_of_two();
            log::debug!("Growing vertex buffer to {} vertices", capacity);
            self.vertex_buffer = create_vertex_buffer(device, capacity);
            self.capacity = capacity;
        }

        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.vertex_count = vertices.len() as u32;
    }

    pub fn update_view(&self, queue: &Queue, width: f32, height: f32, srgb_target: bool) {
        let params = ViewParams {
            width,
            height,
            linearize: if srgb_target { 1.0 } else { 0.0 },
            _padding: 0.0,
        };
        queue.write_buffer(&self.view_buffer, 0, bytemuck::bytes_of(&params));
    }

    /// Vertices written by the last upload
    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}

fn create_vertex_buffer(device: &Device, capacity: usize) -> Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("shape-vertex-buffer"),
        size: (capacity.max(1) * std::mem::size_of::<Vertex>()) as u64,
        usage: BufferUsages::VERTEX | BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
