//! Grid state: material buffer, packed color buffer, dirty markers
//!
//! Both buffers are flat, index-aligned and addressed by `x + y * width`.
//! A cell's color only ever changes together with its material.

use super::bitset::DirtySet;
use super::material::{Direction, Material};

#[derive(Debug, Clone)]
pub struct Grid {
    width: usize,
    height: usize,
    materials: Vec<Material>,
    colors: Vec<u32>,
    dirty: DirtySet,
}

impl Grid {
    /// Grid filled with `material` drawn in `color`. Dimensions must be
    /// non-zero (checked by the simulation constructor).
    pub fn new(width: usize, height: usize, material: Material, color: u32) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            materials: vec![material; size],
            colors: vec![color; size],
            dirty: DirtySet::new(size),
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of cells
    #[inline]
    pub fn size(&self) -> usize {
        self.materials.len()
    }

    #[inline]
    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    #[inline]
    pub fn colors(&self) -> &[u32] {
        &self.colors
    }

    #[inline]
    pub fn material(&self, index: usize) -> Material {
        self.materials[index]
    }

    #[inline]
    pub fn color(&self, index: usize) -> u32 {
        self.colors[index]
    }

    /// Linear index of an in-bounds coordinate
    #[inline]
    pub fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(x as usize + y as usize * self.width)
    }

    /// Coordinate of a linear index
    #[inline]
    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index % self.width, index / self.width)
    }

    /// Neighbor of `index` one step in `dir`, or `None` when the step leaves
    /// the grid. Horizontal wrap is detected by the row changing; vertical
    /// exits by the index leaving `0..size`.
    #[inline]
    pub fn relative(&self, index: usize, dir: Direction) -> Option<usize> {
        let (dx, dy) = dir.offset();
        let mut moved = index as isize;

        if dx != 0 {
            moved += dx;
            if moved < 0 || moved as usize / self.width != index / self.width {
                return None;
            }
        }
        if dy != 0 {
            moved += dy * self.width as isize;
            if moved < 0 || moved as usize >= self.size() {
                return None;
            }
        }
        Some(moved as usize)
    }

    /// Whether the cell was already finalized this tick
    #[inline]
    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty.contains(index)
    }

    /// Number of cells finalized this tick
    pub fn dirty_count(&self) -> usize {
        self.dirty.count()
    }

    /// Start of a tick: no cell is finalized
    #[inline]
    pub fn clear_dirty(&mut self) {
        self.dirty.clear();
    }

    /// Assign material and color together and mark the cell dirty
    #[inline]
    pub fn set_cell(&mut self, index: usize, material: Material, color: u32) {
        self.materials[index] = material;
        self.colors[index] = color;
        self.dirty.insert(index);
    }

    /// Exchange two cells (material and color) and mark the destination dirty
    #[inline]
    pub fn swap_cell(&mut self, current: usize, next: usize) {
        self.materials.swap(current, next);
        self.colors.swap(current, next);
        self.dirty.insert(next);
    }

    /// Fill every cell with one material and color
    pub fn reset(&mut self, material: Material, color: u32) {
        self.materials.fill(material);
        self.colors.fill(color);
        self.dirty.clear();
    }

    /// Number of cells holding `material`
    pub fn count(&self, material: Material) -> usize {
        self.materials.iter().filter(|&&m| m == material).count()
    }
}
