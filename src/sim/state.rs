//! Simulation aggregate
//!
//! Owns the grid, the rule table and the entropy artifacts for its whole
//! lifetime. External callers read the draw buffer and write only through the
//! stamping entry points.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::color::{Palette, PixelFormat};
use super::entropy::{Entropy, EntropyMode};
use super::error::SimError;
use super::grid::Grid;
use super::material::Material;
use super::rules::MaterialTable;
use super::stamp;
use super::tick::{TickStats, tick};
use crate::settings::Settings;

#[derive(Debug, Clone)]
pub struct Simulation {
    pub(crate) grid: Grid,
    pub(crate) rules: MaterialTable,
    pub(crate) entropy: Entropy,
    pub(crate) palette: Palette,
    seed: u64,
    ticks: u64,
}

impl Simulation {
    /// Build an empty grid with the given rules. Fails on zero-sized or
    /// overflowing dimensions.
    pub fn new(settings: &Settings, rules: MaterialTable) -> Result<Self, SimError> {
        let (width, height) = (settings.width, settings.height);
        let size = (width as u64) * (height as u64);
        if width == 0 || height == 0 || size > u32::MAX as u64 {
            return Err(SimError::InvalidDimensions { width, height });
        }
        let size = size as usize;

        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut rng = Pcg32::seed_from_u64(seed);
        let entropy = Entropy::new(size, settings.entropy, &mut rng);
        let palette = Palette::new(Pcg32::from_rng(&mut rng), settings.pixel_format);
        let grid = Grid::new(
            width as usize,
            height as usize,
            Material::Empty,
            palette.empty_color(),
        );

        log::info!(
            "Simulation {}x{} initialized with seed: {} ({:?} entropy, {:?})",
            width,
            height,
            seed,
            settings.entropy,
            settings.pixel_format
        );

        Ok(Self {
            grid,
            rules,
            entropy,
            palette,
            seed,
            ticks: 0,
        })
    }

    /// Build from settings, loading the configured rule file or the builtin
    /// rules
    pub fn from_settings(settings: &Settings) -> Result<Self, SimError> {
        let rules = match &settings.materials_path {
            Some(path) => {
                log::info!("Loading material rules from {}", path.display());
                MaterialTable::load(path)?
            }
            None => MaterialTable::builtin()?,
        };
        Self::new(settings, rules)
    }

    /// Advance one tick
    pub fn update(&mut self) -> TickStats {
        let stats = tick(self);
        self.ticks += 1;
        stats
    }

    /// Fill the whole grid with one material. Non-empty fills share a single
    /// placement color.
    pub fn reset(&mut self, material: Material) {
        let color = self.palette.color_for(&self.rules, material);
        self.grid.reset(material, color);
        log::debug!("Grid reset to {}", material.name());
    }

    /// Place a material in one cell. Only empty cells are filled unless
    /// erasing; out-of-grid points are ignored.
    pub fn stamp_cell(&mut self, point: IVec2, material: Material) {
        stamp::stamp_cell(self, point, material);
    }

    /// Fill a disc
    pub fn stamp_circle(&mut self, center: IVec2, radius: u16, material: Material) {
        stamp::stamp_circle(self, center, radius, material);
    }

    /// Fill the capsule between two brush positions
    pub fn stamp_line(&mut self, start: IVec2, end: IVec2, radius: u16, material: Material) {
        stamp::stamp_line(self, start, end, radius, material);
    }

    /// Packed pixels, `width * height` long, in the configured pixel format
    #[inline]
    pub fn draw_buffer(&self) -> &[u32] {
        self.grid.colors()
    }

    /// The draw buffer as raw bytes (native endianness) for texture upload
    pub fn draw_buffer_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(self.grid.colors())
    }

    /// Display names of the concrete materials, in order
    pub fn material_names(&self) -> Vec<&str> {
        self.rules.material_names()
    }

    /// Padded name listing, three per line
    pub fn formatted_names(&self) -> String {
        self.rules.formatted_names()
    }

    /// Material at a coordinate, `None` outside the grid
    pub fn material_at(&self, point: IVec2) -> Option<Material> {
        self.grid
            .index(point.x, point.y)
            .map(|i| self.grid.material(i))
    }

    #[inline]
    pub fn materials(&self) -> &[Material] {
        self.grid.materials()
    }

    /// Number of cells holding `material`
    pub fn count(&self, material: Material) -> usize {
        self.grid.count(material)
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rules(&self) -> &MaterialTable {
        &self.rules
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Ticks advanced since construction
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.palette.format()
    }

    pub fn entropy_mode(&self) -> EntropyMode {
        self.entropy.stream.mode()
    }
}
