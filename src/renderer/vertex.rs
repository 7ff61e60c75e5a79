//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// `0xRRGGBB` literal to RGBA
pub const fn hex(rgb: u32, alpha: f32) -> [f32; 4] {
    [
        ((rgb >> 16) & 0xff) as f32 / 255.0,
        ((rgb >> 8) & 0xff) as f32 / 255.0,
        (rgb & 0xff) as f32 / 255.0,
        alpha,
    ]
}

/// Colors for game elements
pub mod colors {
    use super::hex;

    pub const BACKGROUND: [f32; 4] = hex(0x190d24, 1.0);
    pub const GRID: [f32; 4] = hex(0x201e51, 1.0);
    pub const STATIC_1: [f32; 4] = hex(0x0c4c45, 1.0);
    pub const STATIC_2: [f32; 4] = hex(0x1c8350, 1.0);
    pub const STATIC_3: [f32; 4] = hex(0x364374, 1.0);
    pub const STATIC_4: [f32; 4] = hex(0x392c4e, 1.0);
    pub const WIN: [f32; 4] = hex(0xffe271, 1.0);
    pub const LOSE: [f32; 4] = hex(0xbc0048, 1.0);
    pub const GROW_ITEM: [f32; 4] = hex(0x21cd40, 1.0);
    pub const SHRINK_ITEM: [f32; 4] = hex(0xff7f86, 1.0);
    pub const CAT_BODY: [f32; 4] = hex(0xff7200, 1.0);
    pub const CAT_HEAD: [f32; 4] = hex(0xffb42a, 1.0);
    pub const CAT_EYE: [f32; 4] = hex(0x190d24, 1.0);
    pub const PARTICLE: [f32; 4] = hex(0xfffadc, 1.0);
    pub const FADE: [f32; 4] = hex(0x201e51, 1.0);
    pub const TOUCH_BUTTON: [f32; 4] = hex(0x2ce8f5, 0.6);
    pub const TOUCH_PRESSED: [f32; 4] = hex(0xfffadc, 1.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex() {
        assert_eq!(hex(0xff0000, 1.0), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x00ff00, 0.5)[1], 1.0);
        assert_eq!(hex(0x000000, 0.5)[3], 0.5);
    }
}
