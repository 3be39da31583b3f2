//! Brush stamping: single cells, discs and thick lines
//!
//! Stamps never overwrite occupied cells unless the stamped material is
//! EMPTY (erasing). Points outside the grid are skipped per cell.

use glam::{DVec2, IVec2};

use super::material::Material;
use super::state::Simulation;

/// Place `material` at `point` if it lands in the grid on an empty cell (or
/// erases)
pub fn stamp_cell(sim: &mut Simulation, point: IVec2, material: Material) {
    let Some(index) = sim.grid.index(point.x, point.y) else {
        return;
    };
    if material.is_empty() || sim.grid.material(index).is_empty() {
        sim.palette.paint(&mut sim.grid, &sim.rules, index, material);
    }
}

/// Fill a disc slice by slice; each row's half-width comes from the circle
/// equation. Only rows and columns inside the grid are visited.
pub fn stamp_circle(sim: &mut Simulation, center: IVec2, radius: u16, material: Material) {
    let r = radius as i64;
    let (cx, cy) = (center.x as i64, center.y as i64);
    let (width, height) = (sim.grid.width() as i64, sim.grid.height() as i64);
    let top = cy - r;

    for y in top.max(0)..(cy + r).min(height) {
        let dy = (r - (y - top)).abs();
        let half = ((r * r - dy * dy) as f64).sqrt() as i64;
        for x in (cx - half).max(0)..(cx + half).min(width) {
            stamp_cell(sim, IVec2::new(x as i32, y as i32), material);
        }
    }
}

/// Fill the capsule swept by a brush of `radius` moving from `start` to
/// `end`, so fast cursor motion leaves a contiguous stroke.
///
/// Both ends get a disc. The body is filled by translating one tangent edge
/// (parallel to the stroke, offset by the radius) along a thick rasterized
/// cross-section.
pub fn stamp_line(sim: &mut Simulation, start: IVec2, end: IVec2, radius: u16, material: Material) {
    stamp_circle(sim, start, radius, material);
    if start == end {
        return;
    }
    stamp_circle(sim, end, radius, material);

    // Only the part of the stroke within reach of the grid can paint anything
    let margin = radius as f64 + 1.0;
    let min = DVec2::splat(-margin);
    let max = DVec2::new(
        sim.grid.width() as f64 + margin,
        sim.grid.height() as f64 + margin,
    );
    let Some((start, end)) = clip_segment(start.as_dvec2(), end.as_dvec2(), min, max) else {
        return;
    };
    if start == end {
        return;
    }

    let delta = (end - start).as_vec2();
    let angle = -delta.x.atan2(delta.y);
    let r = radius as f32;
    let tangent = IVec2::new(
        (angle.cos() * r).round() as i32,
        (angle.sin() * r).round() as i32,
    );

    let edge = start + tangent;
    let across = raster_line(edge, start - tangent, true);
    let along = raster_line(edge, end + tangent, false);
    let (Some(&head), Some(&tail)) = (along.first(), along.last()) else {
        return;
    };

    // `along` advances exactly one cell per point on its major axis, so the
    // part of each translated copy that lands on the grid is a contiguous run
    let stroke = end - start;
    let horizontal = stroke.x.abs() >= stroke.y.abs();
    let axes = |p: IVec2| if horizontal { (p.x, p.y) } else { (p.y, p.x) };
    let extent = |n: usize| i32::try_from(n).unwrap_or(i32::MAX);
    let (major_extent, minor_extent) = axes(IVec2::new(
        extent(sim.grid.width()),
        extent(sim.grid.height()),
    ));
    let (major_head, minor_head) = axes(head);
    let (_, minor_tail) = axes(tail);
    let (minor_lo, minor_hi) = (minor_head.min(minor_tail), minor_head.max(minor_tail));

    for &offset in &across {
        let shift = edge - offset;
        let (shift_major, shift_minor) = axes(shift);
        if minor_hi - shift_minor < 0 || minor_lo - shift_minor >= minor_extent {
            continue;
        }
        let from = (shift_major - major_head).max(0) as usize;
        let to = ((major_extent + shift_major - major_head).max(0) as usize).min(along.len());
        for &point in along.get(from..to).unwrap_or_default() {
            stamp_cell(sim, point - shift, material);
        }
    }
}

/// Liang-Barsky clip of segment `a`-`b` to the box `min`..`max`, rounded to
/// cells. `None` when the segment misses the box.
fn clip_segment(a: DVec2, b: DVec2, min: DVec2, max: DVec2) -> Option<(IVec2, IVec2)> {
    let d = b - a;
    let (mut t0, mut t1) = (0.0f64, 1.0f64);
    for (p, q) in [
        (-d.x, a.x - min.x),
        (d.x, max.x - a.x),
        (-d.y, a.y - min.y),
        (d.y, max.y - a.y),
    ] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some((
        (a + d * t0).round().as_ivec2(),
        (a + d * t1).round().as_ivec2(),
    ))
}

/// Bresenham-style line from `from` towards `to` (end point excluded).
///
/// With `fill`, every minor-axis step also emits the cell one major step
/// ahead on the old minor coordinate, so the result is 4-connected and can
/// be swept without leaving holes.
pub fn raster_line(from: IVec2, to: IVec2, fill: bool) -> Vec<IVec2> {
    let (mut a, mut b) = (from, to);
    let mut delta = b - a;
    let horizontal = delta.x.abs() >= delta.y.abs();
    if (horizontal && delta.x < 0) || (!horizontal && delta.y < 0) {
        std::mem::swap(&mut a, &mut b);
        delta = -delta;
    }

    // Walk the major axis `i`, stepping the minor axis `j` when the error
    // term goes positive
    let (major, mut minor, i0, i1, j0) = if horizontal {
        (delta.x, delta.y, a.x, b.x, a.y)
    } else {
        (delta.y, delta.x, a.y, b.y, a.x)
    };
    let step = if minor < 0 {
        minor = -minor;
        -1
    } else {
        1
    };
    let point = |i: i32, j: i32| {
        if horizontal {
            IVec2::new(i, j)
        } else {
            IVec2::new(j, i)
        }
    };

    let mut out = Vec::with_capacity((major + if fill { minor } else { 0 }) as usize);
    let mut error = 2 * minor - major;
    let mut j = j0;
    for i in i0..i1 {
        out.push(point(i, j));
        if error > 0 {
            if fill && i != i1 - 1 {
                out.push(point(i + 1, j));
            }
            j += step;
            error -= 2 * major;
        }
        error += 2 * minor;
    }
    out
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::settings::Settings;
    use crate::sim::MaterialTable;

    fn sim(width: u32, height: u32) -> Simulation {
        let settings = Settings {
            width,
            height,
            seed: Some(1),
            ..Default::default()
        };
        Simulation::new(&settings, MaterialTable::builtin().unwrap()).unwrap()
    }

    fn filled(sim: &Simulation, material: Material) -> Vec<IVec2> {
        sim.materials()
            .iter()
            .enumerate()
            .filter(|(_, m)| **m == material)
            .map(|(i, _)| IVec2::new((i % sim.width()) as i32, (i / sim.width()) as i32))
            .collect()
    }

    fn segment_distance(p: IVec2, a: IVec2, b: IVec2) -> f32 {
        let (p, a, b) = (p.as_vec2(), a.as_vec2(), b.as_vec2());
        let ab = b - a;
        let t = ((p - a).dot(ab) / ab.length_squared()).clamp(0.0, 1.0);
        p.distance(a + ab * t)
    }

    #[test]
    fn test_raster_line_thin() {
        let line = raster_line(IVec2::new(0, 0), IVec2::new(4, 2), false);
        assert_eq!(
            line,
            vec![
                IVec2::new(0, 0),
                IVec2::new(1, 0),
                IVec2::new(2, 1),
                IVec2::new(3, 1),
            ]
        );
        // Reversed direction rasterizes from the other end
        let rev = raster_line(IVec2::new(4, 2), IVec2::new(0, 0), false);
        assert_eq!(rev, line);
        assert!(raster_line(IVec2::new(3, 3), IVec2::new(3, 3), true).is_empty());
    }

    #[test]
    fn test_raster_line_fill_is_four_connected() {
        let line = raster_line(IVec2::new(0, 0), IVec2::new(6, 6), true);
        for pair in line.windows(2) {
            let step = (pair[1] - pair[0]).abs();
            assert_eq!(step.x + step.y, 1, "diagonal step {:?} -> {:?}", pair[0], pair[1]);
        }
        let thin = raster_line(IVec2::new(0, 0), IVec2::new(6, 6), false);
        assert_eq!(thin.len(), 6);
        assert!(line.len() > thin.len());
    }

    #[test]
    fn test_raster_line_steep() {
        let line = raster_line(IVec2::new(1, 0), IVec2::new(2, 5), false);
        assert_eq!(line.len(), 5);
        assert!(line.iter().enumerate().all(|(i, p)| p.y == i as i32));
        assert!(line.iter().all(|p| (1..=2).contains(&p.x)));
    }

    #[test]
    fn test_stamp_circle_radius_five() {
        let mut sim = sim(40, 40);
        let center = IVec2::new(20, 20);
        sim.stamp_circle(center, 5, Material::Sand);
        let cells = filled(&sim, Material::Sand);
        assert!(!cells.is_empty());
        for cell in &cells {
            assert!(cell.as_vec2().distance(center.as_vec2()) <= 5.0, "{cell:?} outside radius");
        }
        for y in 0..40 {
            for x in 0..40 {
                let p = IVec2::new(x, y);
                if p.as_vec2().distance(center.as_vec2()) <= 4.0 {
                    assert_eq!(sim.material_at(p), Some(Material::Sand), "{p:?} not filled");
                }
            }
        }
    }

    #[test]
    fn test_stamp_only_fills_empty_cells() {
        let mut sim = sim(20, 20);
        sim.stamp_cell(IVec2::new(10, 10), Material::Rock);
        let rock_color = sim.draw_buffer()[10 + 10 * 20];
        sim.stamp_circle(IVec2::new(10, 10), 4, Material::Water);
        assert_eq!(sim.material_at(IVec2::new(10, 10)), Some(Material::Rock));
        assert_eq!(sim.draw_buffer()[10 + 10 * 20], rock_color);
        assert_eq!(sim.material_at(IVec2::new(9, 10)), Some(Material::Water));
    }

    #[test]
    fn test_eraser_clears_everything() {
        let mut sim = sim(20, 20);
        sim.reset(Material::Sand);
        sim.stamp_circle(IVec2::new(10, 10), 3, Material::Empty);
        assert_eq!(sim.material_at(IVec2::new(10, 10)), Some(Material::Empty));
        assert_eq!(sim.draw_buffer()[10 + 10 * 20], 0xFF00_0000);
        assert_eq!(sim.material_at(IVec2::new(0, 0)), Some(Material::Sand));
    }

    #[test]
    fn test_stamp_clips_at_edges() {
        let mut sim = sim(10, 10);
        sim.stamp_circle(IVec2::new(0, 0), 5, Material::Sand);
        sim.stamp_circle(IVec2::new(-20, 50), 5, Material::Sand);
        sim.stamp_line(IVec2::new(-10, 5), IVec2::new(30, 5), 2, Material::Water);
        sim.stamp_cell(IVec2::new(10, 0), Material::Rock);
        assert!(sim.count(Material::Sand) > 0);
        assert!(sim.count(Material::Water) > 0);
        assert_eq!(sim.count(Material::Rock), 0);
        assert_eq!(sim.materials().len(), 100);
    }

    #[test]
    fn test_max_radius_fills_small_grid() {
        let mut sim = sim(8, 8);
        sim.stamp_circle(IVec2::new(4, 4), u16::MAX, Material::Sand);
        assert_eq!(sim.count(Material::Sand), 64);

        sim.reset(Material::Empty);
        sim.stamp_line(IVec2::new(0, 0), IVec2::new(7, 7), u16::MAX, Material::Water);
        assert_eq!(sim.count(Material::Water), 64);
    }

    #[test]
    fn test_extreme_coordinates_are_ignored() {
        let mut sim = sim(10, 10);
        sim.stamp_circle(IVec2::new(i32::MAX, i32::MIN), 40, Material::Sand);
        sim.stamp_line(IVec2::MIN, IVec2::new(i32::MIN, 0), 5, Material::Sand);
        assert_eq!(sim.count(Material::Sand), 0);

        // A stroke spanning the whole coordinate range still crosses the grid
        sim.stamp_line(IVec2::MIN, IVec2::MAX, 3, Material::Sand);
        assert_eq!(sim.material_at(IVec2::new(5, 5)), Some(Material::Sand));
        assert_eq!(sim.material_at(IVec2::new(9, 0)), Some(Material::Empty));
    }

    #[test]
    fn test_far_off_grid_stroke_matches_near_stroke() {
        let mut far = sim(10, 10);
        let mut near = sim(10, 10);
        far.stamp_line(
            IVec2::new(-1_000_000_000, 5),
            IVec2::new(1_000_000_000, 5),
            2,
            Material::Water,
        );
        near.stamp_line(IVec2::new(-10, 5), IVec2::new(20, 5), 2, Material::Water);
        assert_eq!(far.materials(), near.materials());
        assert!((0..10).all(|x| far.material_at(IVec2::new(x, 5)) == Some(Material::Water)));
        assert!((0..10).all(|x| far.material_at(IVec2::new(x, 0)) == Some(Material::Empty)));
    }

    #[test]
    fn test_clip_segment() {
        let (min, max) = (DVec2::splat(-3.0), DVec2::splat(13.0));
        // Inside the box: untouched
        assert_eq!(
            clip_segment(DVec2::new(1.0, 2.0), DVec2::new(8.0, 9.0), min, max),
            Some((IVec2::new(1, 2), IVec2::new(8, 9)))
        );
        // Crossing: cut at the box edges
        assert_eq!(
            clip_segment(DVec2::new(-100.0, 5.0), DVec2::new(100.0, 5.0), min, max),
            Some((IVec2::new(-3, 5), IVec2::new(13, 5)))
        );
        // Missing the box entirely
        assert_eq!(
            clip_segment(DVec2::new(-100.0, 50.0), DVec2::new(100.0, 50.0), min, max),
            None
        );
        assert_eq!(
            clip_segment(DVec2::new(20.0, 0.0), DVec2::new(30.0, 10.0), min, max),
            None
        );
    }

    #[test]
    fn test_stamp_line_same_point_is_circle() {
        let mut a = sim(30, 30);
        let mut b = sim(30, 30);
        a.stamp_line(IVec2::new(15, 15), IVec2::new(15, 15), 4, Material::Sand);
        b.stamp_circle(IVec2::new(15, 15), 4, Material::Sand);
        assert_eq!(a.materials(), b.materials());
    }

    #[test]
    fn test_stamp_line_horizontal_band() {
        let mut sim = sim(40, 20);
        sim.stamp_line(IVec2::new(5, 10), IVec2::new(25, 10), 3, Material::Sand);
        for x in 5..=25 {
            for y in 8..=12 {
                assert_eq!(sim.material_at(IVec2::new(x, y)), Some(Material::Sand), "({x}, {y})");
            }
        }
        assert_eq!(sim.material_at(IVec2::new(15, 4)), Some(Material::Empty));
        assert_eq!(sim.material_at(IVec2::new(35, 10)), Some(Material::Empty));
    }

    proptest! {
        #[test]
        fn prop_stamp_line_fills_capsule_without_gaps(
            sx in 10i32..50, sy in 10i32..50,
            ex in 10i32..50, ey in 10i32..50,
            radius in 3u16..8,
        ) {
            let mut sim = sim(60, 60);
            let (start, end) = (IVec2::new(sx, sy), IVec2::new(ex, ey));
            sim.stamp_line(start, end, radius, Material::Sand);
            let r = radius as f32;
            for y in 0..60 {
                for x in 0..60 {
                    let p = IVec2::new(x, y);
                    let d = if start == end {
                        p.as_vec2().distance(start.as_vec2())
                    } else {
                        segment_distance(p, start, end)
                    };
                    let is_sand = sim.material_at(p) == Some(Material::Sand);
                    if d <= r - 2.5 {
                        prop_assert!(is_sand, "gap at {:?} (distance {})", p, d);
                    }
                    if d > r + 2.0 {
                        prop_assert!(!is_sand, "overfill at {:?} (distance {})", p, d);
                    }
                }
            }
        }

        #[test]
        fn prop_circle_within_radius(radius in 1u16..12, cx in 0i32..30, cy in 0i32..30) {
            let mut sim = sim(30, 30);
            let center = IVec2::new(cx, cy);
            sim.stamp_circle(center, radius, Material::Water);
            for cell in filled(&sim, Material::Water) {
                prop_assert!(cell.as_vec2().distance(center.as_vec2()) <= radius as f32);
            }
        }
    }
}
