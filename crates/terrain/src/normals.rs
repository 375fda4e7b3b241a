//! Smoothed vertex normals over the whole surface.

use engine_core::SURFACE_VERTICES;
use glam::Vec3;

use crate::surface::TerrainSurface;

/// Recompute every vertex normal as the normalized sum of the face normals of the
/// triangles sharing it. Depends only on heights, so repeated runs give identical normals.
pub fn smooth_normals(surface: &mut TerrainSurface) {
    let res = SURFACE_VERTICES;
    let mut normals: Vec<Vec3> = vec![Vec3::ZERO; res * res];

    for y in 0..(res - 1) {
        for x in 0..(res - 1) {
            let i0 = y * res + x;
            let i1 = i0 + 1;
            let i2 = (y + 1) * res + x;
            let i3 = i2 + 1;

            let v0: Vec3 = surface.position(x, y).into();
            let v1: Vec3 = surface.position(x + 1, y).into();
            let v2: Vec3 = surface.position(x, y + 1).into();
            let v3: Vec3 = surface.position(x + 1, y + 1).into();

            // First triangle
            let n1 = (v2 - v0).cross(v1 - v0).normalize_or_zero();
            normals[i0] += n1;
            normals[i2] += n1;
            normals[i1] += n1;

            // Second triangle
            let n2 = (v2 - v1).cross(v3 - v1).normalize_or_zero();
            normals[i1] += n2;
            normals[i2] += n2;
            normals[i3] += n2;
        }
    }

    for (out, n) in surface.normals_mut().iter_mut().zip(normals) {
        let n = n.try_normalize().unwrap_or(Vec3::Y);
        *out = n.to_array();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::UNIT_SIZE;

    fn sloped_surface() -> TerrainSurface {
        let mut surface = TerrainSurface::new(UNIT_SIZE);
        for y in 0..SURFACE_VERTICES {
            for x in 0..SURFACE_VERTICES {
                let h = ((x as f32) * 0.07).sin() * 12.0 + (y as f32) * 0.3;
                surface.set_height(x, y, h);
            }
        }
        surface
    }

    #[test]
    fn flat_surface_points_up() {
        let mut surface = TerrainSurface::new(UNIT_SIZE);
        smooth_normals(&mut surface);
        for n in surface.normals() {
            assert!((n[1] - 1.0).abs() < 1e-6);
            assert!(n[0].abs() < 1e-6 && n[2].abs() < 1e-6);
        }
    }

    #[test]
    fn smoothing_is_idempotent() {
        let mut surface = sloped_surface();
        smooth_normals(&mut surface);
        let first = surface.normals().to_vec();
        smooth_normals(&mut surface);
        assert_eq!(first, surface.normals());
    }

    #[test]
    fn normals_are_unit_length_and_face_upward() {
        let mut surface = sloped_surface();
        smooth_normals(&mut surface);
        for n in surface.normals() {
            let len = Vec3::from_array(*n).length();
            assert!((len - 1.0).abs() < 1e-4);
            assert!(n[1] > 0.0);
        }
    }

    #[test]
    fn slope_tilts_normal_against_rising_axis() {
        let mut surface = TerrainSurface::new(1.0);
        for y in 0..SURFACE_VERTICES {
            for x in 0..SURFACE_VERTICES {
                surface.set_height(x, y, x as f32);
            }
        }
        smooth_normals(&mut surface);
        let n = surface.normal(100, 100);
        // Height rises along +x at 45 degrees.
        assert!((n[0] + std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-4);
        assert!((n[1] - std::f32::consts::FRAC_1_SQRT_2).abs() < 1e-4);
        assert!(n[2].abs() < 1e-4);
    }
}
