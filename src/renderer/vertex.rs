//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Colors for game elements
pub mod colors {
    /// `0xRRGGBB` to an opaque color
    pub const fn hex(rgb: u32) -> [f32; 4] {
        rgba(
            ((rgb >> 16) & 0xff) as u8,
            ((rgb >> 8) & 0xff) as u8,
            (rgb & 0xff) as u8,
            1.0,
        )
    }

    /// 8-bit channels plus alpha
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> [f32; 4] {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a]
    }

    /// Same color, different alpha
    pub const fn with_alpha(color: [f32; 4], a: f32) -> [f32; 4] {
        [color[0], color[1], color[2], a]
    }

    pub const CLEAR_LIGHT: [f32; 4] = hex(0xdde6ef);
    pub const CLEAR_DARK: [f32; 4] = hex(0x111111);

    pub const WINDOW_LIGHT: [f32; 4] = rgba(100, 180, 255, 0.6);
    pub const SILL_LIGHT: [f32; 4] = rgba(255, 255, 255, 0.3);
    pub const WINDOW_DARK: [f32; 4] = rgba(0, 0, 0, 0.6);
    pub const SILL_DARK: [f32; 4] = rgba(255, 255, 255, 0.05);

    pub const PLAYER: [f32; 4] = hex(0x00ff88);

    /// Spawn-time tints for light theme obstacles
    pub const LIGHT_OBSTACLE_PALETTE: [[f32; 4]; 6] = [
        hex(0xff3366),
        hex(0xff9933),
        hex(0xffd700),
        hex(0xff66cc),
        hex(0x9933ff),
        hex(0x33cc33),
    ];

    pub const DEBRIS: [f32; 4] = hex(0x888888);
    pub const GLASS: [f32; 4] = rgba(200, 240, 255, 0.6);
    pub const GLASS_EDGE: [f32; 4] = hex(0xffffff);
    pub const POT: [f32; 4] = hex(0xd2691e);
    pub const PLANT: [f32; 4] = hex(0x228b22); // forestgreen

    pub const HEART: [f32; 4] = hex(0xff3366);
    pub const SCORE_COIN: [f32; 4] = hex(0xffd700);
    pub const SPEED_COIN: [f32; 4] = hex(0xc71585);
    pub const WARP: [f32; 4] = hex(0x4b0082);
    pub const ITEM_MARK: [f32; 4] = hex(0xffffff);

    pub const DAMAGE_FLASH: [f32; 4] = rgba(255, 0, 0, 0.3);
}

#[cfg(test)]
mod tests {
    use super::colors::*;

    #[test]
    fn test_hex_channels() {
        assert_eq!(hex(0xff0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(hex(0x00ff88)[1], 1.0);
        assert!((hex(0x00ff88)[2] - 136.0 / 255.0).abs() < 1e-6);
        assert_eq!(with_alpha(PLAYER, 0.5)[3], 0.5);
    }
}
