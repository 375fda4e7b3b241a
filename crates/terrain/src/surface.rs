//! The synthesized terrain surface consumed by rendering.

use bytemuck::{Pod, Zeroable};
use engine_core::{SURFACE_CELLS, SURFACE_VERTICES};

/// Color of every cell before the first colorization, and of flat or sunken extents.
/// Equal to the gradient's value at height 0.
pub const NEUTRAL_COLOR: [u8; 3] = [60, 125, 60];

/// Vertex for the terrain mesh upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    /// Height-gradient color, alpha always 1.
    pub color: [f32; 4],
}

/// Dense `433 × 433` grid of heights, colors and normals covering the 3×3 tile
/// neighborhood. Created once per scene; synthesis overwrites contents in place and
/// never resizes it. Cell `(x, y)` sits at world offset `(x * unit_size, height, y * unit_size)`.
#[derive(Debug, Clone)]
pub struct TerrainSurface {
    unit_size: f32,
    heights: Vec<f32>,
    colors: Vec<[u8; 3]>,
    normals: Vec<[f32; 3]>,
}

impl TerrainSurface {
    /// Flat surface at height 0 with neutral colors and upward normals.
    pub fn new(unit_size: f32) -> Self {
        let count = SURFACE_VERTICES * SURFACE_VERTICES;
        Self {
            unit_size,
            heights: vec![0.0; count],
            colors: vec![NEUTRAL_COLOR; count],
            normals: vec![[0.0, 1.0, 0.0]; count],
        }
    }

    /// Vertices per axis.
    #[inline]
    pub fn dimension(&self) -> usize {
        SURFACE_VERTICES
    }

    /// Distance between neighboring vertices in world units.
    pub fn unit_size(&self) -> f32 {
        self.unit_size
    }

    #[inline]
    fn index(x: usize, y: usize) -> usize {
        y * SURFACE_VERTICES + x
    }

    #[inline]
    pub fn height(&self, x: usize, y: usize) -> f32 {
        self.heights[Self::index(x, y)]
    }

    #[inline]
    pub fn set_height(&mut self, x: usize, y: usize, height: f32) {
        self.heights[Self::index(x, y)] = height;
    }

    #[inline]
    pub fn color(&self, x: usize, y: usize) -> [u8; 3] {
        self.colors[Self::index(x, y)]
    }

    #[inline]
    pub fn set_color(&mut self, x: usize, y: usize, color: [u8; 3]) {
        self.colors[Self::index(x, y)] = color;
    }

    #[inline]
    pub fn normal(&self, x: usize, y: usize) -> [f32; 3] {
        self.normals[Self::index(x, y)]
    }

    /// All heights, row-major (`y` outer).
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn colors(&self) -> &[[u8; 3]] {
        &self.colors
    }

    pub fn normals(&self) -> &[[f32; 3]] {
        &self.normals
    }

    pub(crate) fn colors_mut(&mut self) -> &mut [[u8; 3]] {
        &mut self.colors
    }

    pub(crate) fn heights_and_colors_mut(&mut self) -> (&[f32], &mut [[u8; 3]]) {
        (&self.heights, &mut self.colors)
    }

    pub(crate) fn normals_mut(&mut self) -> &mut [[f32; 3]] {
        &mut self.normals
    }

    /// Local position of vertex `(x, y)`.
    #[inline]
    pub fn position(&self, x: usize, y: usize) -> [f32; 3] {
        [
            x as f32 * self.unit_size,
            self.height(x, y),
            y as f32 * self.unit_size,
        ]
    }

    /// Sample height at a local position (`x` along grid x, `z` along grid y).
    /// Positions off the surface clamp to its border cells.
    pub fn sample_height(&self, x: f32, z: f32) -> f32 {
        let res = SURFACE_VERTICES;
        let gx = x / self.unit_size;
        let gz = z / self.unit_size;

        let x0 = (gx.floor().max(0.0) as usize).min(res - 2);
        let z0 = (gz.floor().max(0.0) as usize).min(res - 2);

        let fx = (gx - x0 as f32).clamp(0.0, 1.0);
        let fz = (gz - z0 as f32).clamp(0.0, 1.0);

        let h00 = self.height(x0, z0);
        let h10 = self.height(x0 + 1, z0);
        let h01 = self.height(x0, z0 + 1);
        let h11 = self.height(x0 + 1, z0 + 1);

        // Same split as `indices`: diagonal from (x0, z1) to (x1, z0).
        if fx + fz <= 1.0 {
            h00 + fx * (h10 - h00) + fz * (h01 - h00)
        } else {
            h11 + (1.0 - fx) * (h01 - h11) + (1.0 - fz) * (h10 - h11)
        }
    }

    /// Mesh vertices, row-major, ready for upload.
    pub fn to_vertices(&self) -> Vec<TerrainVertex> {
        let res = SURFACE_VERTICES;
        let mut vertices = Vec::with_capacity(res * res);
        for y in 0..res {
            for x in 0..res {
                let [r, g, b] = self.color(x, y);
                vertices.push(TerrainVertex {
                    position: self.position(x, y),
                    normal: self.normal(x, y),
                    uv: [x as f32 / SURFACE_CELLS as f32, y as f32 / SURFACE_CELLS as f32],
                    color: [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0],
                });
            }
        }
        vertices
    }

    /// Triangle list over the grid; matches the vertex order of `to_vertices`.
    pub fn indices(&self) -> Vec<u32> {
        let res = SURFACE_VERTICES;
        let mut indices = Vec::with_capacity((res - 1) * (res - 1) * 6);
        for y in 0..(res - 1) {
            for x in 0..(res - 1) {
                let top_left = (y * res + x) as u32;
                let top_right = top_left + 1;
                let bottom_left = ((y + 1) * res + x) as u32;
                let bottom_right = bottom_left + 1;

                indices.push(top_left);
                indices.push(bottom_left);
                indices.push(top_right);

                indices.push(top_right);
                indices.push(bottom_left);
                indices.push(bottom_right);
            }
        }
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::UNIT_SIZE;

    #[test]
    fn new_surface_is_flat_and_neutral() {
        let surface = TerrainSurface::new(UNIT_SIZE);
        assert_eq!(surface.dimension(), 433);
        assert_eq!(surface.heights().len(), 433 * 433);
        assert_eq!(surface.height(432, 432), 0.0);
        assert_eq!(surface.color(10, 20), NEUTRAL_COLOR);
        assert_eq!(surface.normal(0, 0), [0.0, 1.0, 0.0]);
    }

    #[test]
    fn sample_height_matches_vertices_and_interpolates() {
        let mut surface = TerrainSurface::new(2.0);
        surface.set_height(3, 4, 10.0);
        surface.set_height(4, 4, 20.0);
        assert_eq!(surface.sample_height(6.0, 8.0), 10.0);
        assert_eq!(surface.sample_height(8.0, 8.0), 20.0);
        assert!((surface.sample_height(7.0, 8.0) - 15.0).abs() < 1e-5);
    }

    #[test]
    fn sample_height_clamps_off_surface() {
        let mut surface = TerrainSurface::new(1.0);
        surface.set_height(0, 0, 3.0);
        assert_eq!(surface.sample_height(-50.0, -50.0), 3.0);
        assert_eq!(surface.sample_height(1e6, 1e6), surface.height(432, 432));
    }

    #[test]
    fn mesh_buffers_cover_grid() {
        let mut surface = TerrainSurface::new(1.5);
        surface.set_height(2, 1, 7.0);
        let vertices = surface.to_vertices();
        let indices = surface.indices();
        assert_eq!(vertices.len(), 433 * 433);
        assert_eq!(indices.len(), 432 * 432 * 6);
        assert_eq!(vertices[433 + 2].position, [3.0, 7.0, 1.5]);
        assert!(indices.iter().all(|&i| (i as usize) < vertices.len()));
        let bytes: &[u8] = bytemuck::cast_slice(&vertices[..1]);
        assert_eq!(bytes.len(), std::mem::size_of::<TerrainVertex>());
    }
}
