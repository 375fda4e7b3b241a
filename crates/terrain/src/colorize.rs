//! Height-gradient vertex colors.
//!
//! Each channel is `height / highest * 120` plus a channel offset (green 125, red and
//! blue 60), clamped to `0..=255`. Normalization uses `highest` alone, not the
//! `highest - lowest` span, so a surface whose lowest point is far above zero only uses
//! the top of the gradient.

use crate::surface::{TerrainSurface, NEUTRAL_COLOR};

/// A `highest` at or below this is treated as a flat or sunken extent.
pub const COLOR_EPSILON: f32 = 1e-4;

const GRADIENT_SCALE: f32 = 120.0;
const GREEN_OFFSET: f32 = 125.0;
const RED_BLUE_OFFSET: f32 = 60.0;

/// Height range of one synthesis pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub highest: f32,
    pub lowest: f32,
}

impl Extent {
    /// Height span. Reported only; the gradient does not use it.
    pub fn span(&self) -> f32 {
        self.highest - self.lowest
    }

    /// Scan every cell of the surface, including the unwritten last row and column.
    pub fn of(surface: &TerrainSurface) -> Self {
        let heights = surface.heights();
        let first = heights.first().copied().unwrap_or(0.0);
        heights.iter().fold(
            Self {
                highest: first,
                lowest: first,
            },
            |e, &h| Self {
                highest: e.highest.max(h),
                lowest: e.lowest.min(h),
            },
        )
    }
}

/// Outcome of a colorization pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colorization {
    pub extent: Extent,
    /// `highest` was within epsilon of zero or below; every cell got [`NEUTRAL_COLOR`].
    pub degenerate: bool,
}

#[inline]
fn channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0) as u8
}

/// Gradient color `[r, g, b]` for `height` relative to `highest`.
/// Returns [`NEUTRAL_COLOR`] when `highest <= epsilon`.
pub fn gradient_color(height: f32, highest: f32, epsilon: f32) -> [u8; 3] {
    if highest <= epsilon {
        return NEUTRAL_COLOR;
    }
    let t = height / highest * GRADIENT_SCALE;
    [
        channel(t + RED_BLUE_OFFSET),
        channel(t + GREEN_OFFSET),
        channel(t + RED_BLUE_OFFSET),
    ]
}

/// Recolor the whole surface from its current heights.
pub fn colorize(surface: &mut TerrainSurface, epsilon: f32) -> Colorization {
    let extent = Extent::of(surface);
    let degenerate = extent.highest <= epsilon;
    if degenerate {
        log::warn!(
            "Terrain: highest point {} is not above zero, using neutral color",
            extent.highest
        );
        surface.colors_mut().fill(NEUTRAL_COLOR);
    } else {
        let highest = extent.highest;
        let (heights, colors) = surface.heights_and_colors_mut();
        for (color, &h) in colors.iter_mut().zip(heights) {
            *color = gradient_color(h, highest, epsilon);
        }
    }
    Colorization { extent, degenerate }
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine_core::{SURFACE_VERTICES, UNIT_SIZE};

    fn surface_with(f: impl Fn(usize, usize) -> f32) -> TerrainSurface {
        let mut surface = TerrainSurface::new(UNIT_SIZE);
        for y in 0..SURFACE_VERTICES {
            for x in 0..SURFACE_VERTICES {
                surface.set_height(x, y, f(x, y));
            }
        }
        surface
    }

    #[test]
    fn gradient_at_highest_point() {
        // 50 / 50 * 120 = 120 -> g = 120 + 125, r = b = 120 + 60
        assert_eq!(gradient_color(50.0, 50.0, COLOR_EPSILON), [180, 245, 180]);
    }

    #[test]
    fn extent_and_colors_for_mixed_heights() {
        // Heights in [-10, 50]
        let mut surface = surface_with(|x, y| if (x + y) % 2 == 0 { 50.0 } else { -10.0 });
        let result = colorize(&mut surface, COLOR_EPSILON);
        assert!(!result.degenerate);
        assert_eq!(result.extent.highest, 50.0);
        assert_eq!(result.extent.lowest, -10.0);
        assert_eq!(result.extent.span(), 60.0);
        assert_eq!(surface.color(0, 0), gradient_color(50.0, 50.0, COLOR_EPSILON));
        // -10 / 50 * 120 = -24 -> r = b = 36, g = 101
        assert_eq!(surface.color(1, 0), [36, 101, 36]);
    }

    #[test]
    fn channels_clamp_to_valid_range() {
        assert_eq!(gradient_color(-1000.0, 10.0, COLOR_EPSILON), [0, 0, 0]);
        // Exceeding highest cannot happen after a scan, but the clamp still holds.
        assert_eq!(gradient_color(100.0, 10.0, COLOR_EPSILON), [255, 255, 255]);
    }

    #[test]
    fn flat_or_sunken_extent_uses_neutral_color() {
        for level in [0.0, -5.0, COLOR_EPSILON / 2.0] {
            let mut surface = surface_with(|_, _| level);
            let result = colorize(&mut surface, COLOR_EPSILON);
            assert!(result.degenerate);
            assert!(surface.colors().iter().all(|&c| c == NEUTRAL_COLOR));
        }
    }

    #[test]
    fn neutral_color_is_gradient_at_zero_height() {
        assert_eq!(gradient_color(0.0, 80.0, COLOR_EPSILON), NEUTRAL_COLOR);
    }

    /// The gradient divides by `highest` only. A surface spanning 100..110 therefore
    /// renders entirely in the upper band instead of using the full gradient.
    #[test]
    fn highest_only_normalization_compresses_raised_terrain() {
        let mut surface = surface_with(|x, _| 100.0 + (x % 11) as f32);
        let result = colorize(&mut surface, COLOR_EPSILON);
        assert_eq!(result.extent.highest, 110.0);
        assert_eq!(result.extent.lowest, 100.0);
        let lowest_green = surface.color(0, 0)[1];
        let highest_green = surface.color(10, 0)[1];
        assert_eq!(highest_green, 245);
        // Span-based normalization would put the lowest cell at the bottom of the gradient (125).
        assert_eq!(lowest_green, 234);
        assert!(highest_green - lowest_green < 12);
    }
}
