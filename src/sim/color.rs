//! Cell colors: HSV interpolation, HSV to RGB, packing into the renderer's
//! pixel layout

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::Grid;
use super::material::{HsvColor, Material, MaterialSpec};
use super::rules::MaterialTable;
use crate::consts::EMPTY_COLOR;

/// Packed 32-bit pixel layouts a renderer may ask for (named high byte to low)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PixelFormat {
    #[default]
    Argb8888,
    Rgba8888,
    Abgr8888,
    Bgra8888,
}

impl PixelFormat {
    /// Pack an RGBA color
    #[inline]
    pub fn pack(self, [r, g, b, a]: [u8; 4]) -> u32 {
        let (r, g, b, a) = (r as u32, g as u32, b as u32, a as u32);
        match self {
            PixelFormat::Argb8888 => (a << 24) | (r << 16) | (g << 8) | b,
            PixelFormat::Rgba8888 => (r << 24) | (g << 16) | (b << 8) | a,
            PixelFormat::Abgr8888 => (a << 24) | (b << 16) | (g << 8) | r,
            PixelFormat::Bgra8888 => (b << 24) | (g << 16) | (r << 8) | a,
        }
    }

    /// Unpack to RGBA
    pub fn unpack(self, pixel: u32) -> [u8; 4] {
        let [hi, mid_hi, mid_lo, lo] = pixel.to_be_bytes();
        match self {
            PixelFormat::Argb8888 => [mid_hi, mid_lo, lo, hi],
            PixelFormat::Rgba8888 => [hi, mid_hi, mid_lo, lo],
            PixelFormat::Abgr8888 => [lo, mid_lo, mid_hi, hi],
            PixelFormat::Bgra8888 => [mid_lo, mid_hi, hi, lo],
        }
    }
}

/// Sector-based integer HSV to RGB (opaque)
pub fn hsv_to_rgb(hsv: HsvColor) -> [u8; 4] {
    let HsvColor { h, s, v } = hsv;
    if s == 0 {
        return [v, v, v, 255];
    }

    let (h, s, v) = (h as u32, s as u32, v as u32);
    let region = h / 43;
    let remainder = (h - region * 43) * 6;

    let p = ((v * (255 - s)) >> 8) as u8;
    let q = ((v * (255 - ((s * remainder) >> 8))) >> 8) as u8;
    let t = ((v * (255 - ((s * (255 - remainder)) >> 8))) >> 8) as u8;
    let v = v as u8;

    match region {
        0 => [v, t, p, 255],
        1 => [q, v, p, 255],
        2 => [p, v, t, 255],
        3 => [p, q, v, 255],
        4 => [t, p, v, 255],
        _ => [v, p, q, 255],
    }
}

/// Derives randomized placement colors
#[derive(Debug, Clone)]
pub struct Palette {
    rng: Pcg32,
    format: PixelFormat,
}

impl Palette {
    pub fn new(rng: Pcg32, format: PixelFormat) -> Self {
        Self { rng, format }
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Packed color of an EMPTY cell
    #[inline]
    pub fn empty_color(&self) -> u32 {
        self.format.pack(EMPTY_COLOR)
    }

    /// Interpolate each HSV channel independently between the material's color
    /// bounds
    pub fn placement_color(&mut self, spec: &MaterialSpec) -> u32 {
        let mut lerp = |min: u8, max: u8| {
            let span = max as f64 - min as f64;
            (min as f64 + (span * self.rng.random::<f64>()).round()).clamp(0.0, 255.0) as u8
        };
        let hsv = HsvColor {
            h: lerp(spec.min_color.h, spec.max_color.h),
            s: lerp(spec.min_color.s, spec.max_color.s),
            v: lerp(spec.min_color.v, spec.max_color.v),
        };
        self.format.pack(hsv_to_rgb(hsv))
    }

    /// Color for a newly placed material
    pub fn color_for(&mut self, rules: &MaterialTable, material: Material) -> u32 {
        if material.is_empty() {
            self.empty_color()
        } else {
            self.placement_color(rules.spec(material))
        }
    }

    /// Place a material with a fresh color and mark the cell dirty
    #[inline]
    pub fn paint(&mut self, grid: &mut Grid, rules: &MaterialTable, index: usize, material: Material) {
        let color = self.color_for(rules, material);
        grid.set_cell(index, material, color);
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn test_hsv_grey_when_unsaturated() {
        assert_eq!(hsv_to_rgb(HsvColor { h: 100, s: 0, v: 77 }), [77, 77, 77, 255]);
    }

    #[test]
    fn test_hsv_primary_sectors() {
        // Red
        assert_eq!(hsv_to_rgb(HsvColor { h: 0, s: 255, v: 255 }), [255, 0, 0, 255]);
        // Region 1 start: yellow-ish (q = v at remainder 0)
        let [r, g, b, _] = hsv_to_rgb(HsvColor { h: 43, s: 255, v: 255 });
        assert_eq!((r, g, b), (254, 255, 0));
        // Region 3 start: cyan towards blue
        let [r, g, b, _] = hsv_to_rgb(HsvColor { h: 129, s: 255, v: 255 });
        assert_eq!((r, g, b), (0, 254, 255));
        // Value scales the result
        let [r, _, _, _] = hsv_to_rgb(HsvColor { h: 0, s: 255, v: 100 });
        assert_eq!(r, 100);
    }

    #[test]
    fn test_pack_unpack() {
        let rgba = [0x11, 0x22, 0x33, 0x44];
        assert_eq!(PixelFormat::Argb8888.pack(rgba), 0x4411_2233);
        assert_eq!(PixelFormat::Rgba8888.pack(rgba), 0x1122_3344);
        assert_eq!(PixelFormat::Abgr8888.pack(rgba), 0x4433_2211);
        assert_eq!(PixelFormat::Bgra8888.pack(rgba), 0x3322_1144);
        for format in [
            PixelFormat::Argb8888,
            PixelFormat::Rgba8888,
            PixelFormat::Abgr8888,
            PixelFormat::Bgra8888,
        ] {
            assert_eq!(format.unpack(format.pack(rgba)), rgba);
        }
    }

    #[test]
    fn test_placement_color_within_bounds() {
        let spec = MaterialSpec {
            min_color: HsvColor { h: 0, s: 0, v: 100 },
            max_color: HsvColor { h: 0, s: 0, v: 140 },
            ..MaterialSpec::empty()
        };
        let mut palette = Palette::new(Pcg32::seed_from_u64(1), PixelFormat::Rgba8888);
        let mut seen = std::collections::BTreeSet::new();
        for _ in 0..500 {
            let [r, g, b, a] = PixelFormat::Rgba8888.unpack(palette.placement_color(&spec));
            assert_eq!((r, g, a), (b, b, 255));
            assert!((100..=140).contains(&r));
            seen.insert(r);
        }
        // Colors actually vary
        assert!(seen.len() > 10);
    }

    #[test]
    fn test_empty_color_is_opaque_black() {
        let palette = Palette::new(Pcg32::seed_from_u64(1), PixelFormat::Argb8888);
        assert_eq!(palette.empty_color(), 0xFF00_0000);
    }
}
