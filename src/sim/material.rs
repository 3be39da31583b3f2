//! Material identities, compass directions and per-material rule records

use serde::{Deserialize, Serialize};

/// A substance occupying a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[repr(u8)]
pub enum Material {
    /// Inert, never processed by the update engine
    #[default]
    Empty = 0,
    Rock,
    Sand,
    Water,
    Fire,
    Lava,
    Oil,
    Ice,
    Gas,
    Steam,
    Gravel,
    Wood,
    Plasma,
}

impl Material {
    /// Number of materials including EMPTY
    pub const COUNT: usize = 13;

    /// Every concrete (non-empty) material in display order
    pub const CONCRETE: [Material; Self::COUNT - 1] = [
        Material::Rock,
        Material::Sand,
        Material::Water,
        Material::Fire,
        Material::Lava,
        Material::Oil,
        Material::Ice,
        Material::Gas,
        Material::Steam,
        Material::Gravel,
        Material::Wood,
        Material::Plasma,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self == Material::Empty
    }

    /// Display name, also the key used in rule sources
    pub fn name(self) -> &'static str {
        match self {
            Material::Empty => "Empty",
            Material::Rock => "Rock",
            Material::Sand => "Sand",
            Material::Water => "Water",
            Material::Fire => "Fire",
            Material::Lava => "Lava",
            Material::Oil => "Oil",
            Material::Ice => "Ice",
            Material::Gas => "Gas",
            Material::Steam => "Steam",
            Material::Gravel => "Gravel",
            Material::Wood => "Wood",
            Material::Plasma => "Plasma",
        }
    }

    /// Look up a material by name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        std::iter::once(Material::Empty)
            .chain(Self::CONCRETE)
            .find(|m| m.name().eq_ignore_ascii_case(name))
    }

    /// Material by numeric id (0 = EMPTY)
    pub fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Material::Empty),
            i => Self::CONCRETE.get(i - 1).copied(),
        }
    }
}

/// One of the 8 compass directions.
///
/// The ordering is significant: the three northern directions come before
/// `East` and are "backward" for the density tie-break in the update engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    NorthWest = 0,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Direction {
    pub const COUNT: usize = 8;

    pub const ALL: [Direction; Self::COUNT] = [
        Direction::NorthWest,
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
    ];

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Directions ordered before `East`. A denser, non-solid neighbor may be
    /// displaced only when it is hit while moving in a backward direction.
    #[inline]
    pub fn is_backward(self) -> bool {
        self < Direction::East
    }

    /// Column/row step (y grows downward)
    pub fn offset(self) -> (isize, isize) {
        match self {
            Direction::NorthWest => (-1, -1),
            Direction::North => (0, -1),
            Direction::NorthEast => (1, -1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, 1),
            Direction::South => (0, 1),
            Direction::SouthWest => (-1, 1),
            Direction::West => (-1, 0),
        }
    }
}

/// Hue/saturation/value triple, 0-255 per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct HsvColor {
    pub h: u8,
    pub s: u8,
    pub v: u8,
}

/// Immutable rule record for one material
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MaterialSpec {
    pub name: String,
    /// Placement colors are interpolated per channel between these
    pub min_color: HsvColor,
    pub max_color: HsvColor,
    /// Inclusive range of cells one movement attempt may traverse
    pub min_speed: u8,
    pub max_speed: u8,
    pub density: u8,
    /// Inverse decay probability per behavior attempt (0 = never decays)
    pub death_chance: u16,
    pub solid: bool,
    pub flaming: bool,
    pub flammable: bool,
    pub melting: bool,
    pub meltable: bool,
    /// Behavior sets in priority order; each lists the directions tried
    pub behavior: Vec<Vec<Direction>>,
    /// Leading spaces in the formatted name listing
    pub text_padding: u8,
}

impl MaterialSpec {
    /// Spec used for EMPTY: non-solid, density 0, no behaviors
    pub fn empty() -> Self {
        Self {
            name: Material::Empty.name().to_string(),
            ..Default::default()
        }
    }

    /// Materials without behavior sets never attempt movement
    #[inline]
    pub fn is_immovable(&self) -> bool {
        self.behavior.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backward_split() {
        let backward: Vec<_> = Direction::ALL.iter().filter(|d| d.is_backward()).collect();
        assert_eq!(
            backward,
            vec![&Direction::NorthWest, &Direction::North, &Direction::NorthEast]
        );
        assert!(!Direction::East.is_backward());
        assert!(!Direction::West.is_backward());
    }

    #[test]
    fn test_direction_index_round_trip() {
        for (i, dir) in Direction::ALL.iter().enumerate() {
            assert_eq!(dir.index(), i);
            assert_eq!(Direction::from_index(i), Some(*dir));
        }
        assert_eq!(Direction::from_index(8), None);
    }

    #[test]
    fn test_offsets_are_unit_steps() {
        for dir in Direction::ALL {
            let (dx, dy) = dir.offset();
            assert!(dx.abs() <= 1 && dy.abs() <= 1);
            assert!(dx != 0 || dy != 0);
        }
        // Opposites cancel
        for i in 0..4 {
            let (ax, ay) = Direction::ALL[i].offset();
            let (bx, by) = Direction::ALL[i + 4].offset();
            assert_eq!((ax + bx, ay + by), (0, 0));
        }
    }

    #[test]
    fn test_material_lookup() {
        assert_eq!(Material::from_name("sand"), Some(Material::Sand));
        assert_eq!(Material::from_name("PLASMA"), Some(Material::Plasma));
        assert_eq!(Material::from_name("mud"), None);
        assert_eq!(Material::from_index(0), Some(Material::Empty));
        assert_eq!(Material::from_index(12), Some(Material::Plasma));
        assert_eq!(Material::from_index(13), None);
        for (i, m) in Material::CONCRETE.iter().enumerate() {
            assert_eq!(m.index(), i + 1);
        }
    }
}
