//! Material rule table
//!
//! Rules come from a JSON object keyed by material name. Every concrete
//! material must be present and well formed before the simulation starts;
//! the table is immutable afterwards.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use super::error::RuleError;
use super::material::{Direction, HsvColor, Material, MaterialSpec};
use crate::consts::{MAX_BEHAVIORS_PER_SET, MAX_BEHAVIOR_SETS};

/// Rules shipped with the crate
pub const BUILTIN_RULES: &str = include_str!("../../assets/materials.json");

/// One record of the rule source, as written on disk
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MaterialRecord {
    #[serde(default)]
    text_padding: u8,
    min_color: HsvColor,
    max_color: HsvColor,
    min_speed: u8,
    max_speed: u8,
    density: u8,
    death_chance: u16,
    solid: bool,
    flaming: bool,
    flammable: bool,
    melting: bool,
    meltable: bool,
    behavior: Vec<Vec<u8>>,
}

impl MaterialRecord {
    fn into_spec(self, material: Material) -> Result<MaterialSpec, RuleError> {
        let name = material.name();

        if self.min_speed > self.max_speed {
            return Err(RuleError::SpeedRange {
                material: name,
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if self.behavior.len() > MAX_BEHAVIOR_SETS {
            return Err(RuleError::TooManyBehaviorSets {
                material: name,
                count: self.behavior.len(),
                max: MAX_BEHAVIOR_SETS,
            });
        }

        let mut behavior = Vec::with_capacity(self.behavior.len());
        for (set, raw) in self.behavior.into_iter().enumerate() {
            if raw.is_empty() {
                return Err(RuleError::EmptyBehaviorSet { material: name, set });
            }
            if raw.len() > MAX_BEHAVIORS_PER_SET {
                return Err(RuleError::TooManyDirections {
                    material: name,
                    set,
                    count: raw.len(),
                    max: MAX_BEHAVIORS_PER_SET,
                });
            }
            let directions = raw
                .into_iter()
                .map(|value| {
                    Direction::from_index(value as usize)
                        .ok_or(RuleError::InvalidDirection { material: name, value })
                })
                .collect::<Result<Vec<_>, _>>()?;
            behavior.push(directions);
        }

        Ok(MaterialSpec {
            name: name.to_string(),
            min_color: self.min_color,
            max_color: self.max_color,
            min_speed: self.min_speed,
            max_speed: self.max_speed,
            density: self.density,
            death_chance: self.death_chance,
            solid: self.solid,
            flaming: self.flaming,
            flammable: self.flammable,
            melting: self.melting,
            meltable: self.meltable,
            behavior,
            text_padding: self.text_padding,
        })
    }
}

/// Immutable lookup from material to its rules
#[derive(Debug, Clone)]
pub struct MaterialTable {
    /// Indexed by `Material::index`; slot 0 holds the inert EMPTY rules
    specs: Vec<MaterialSpec>,
}

impl MaterialTable {
    /// Parse the rules embedded in the crate
    pub fn builtin() -> Result<Self, RuleError> {
        Self::from_json(BUILTIN_RULES)
    }

    /// Read and parse a rule file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RuleError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let table = Self::from_json(&json)?;
        log::debug!("Loaded material rules from {}", path.display());
        Ok(table)
    }

    /// Parse a rule source. Fails on unknown, missing or duplicated materials
    /// and on malformed behavior sets.
    pub fn from_json(json: &str) -> Result<Self, RuleError> {
        let records: BTreeMap<String, MaterialRecord> = serde_json::from_str(json)?;

        // Normalize keys so lookups are case-insensitive
        let mut by_material = BTreeMap::new();
        for (key, record) in records {
            match Material::from_name(&key) {
                Some(material) if !material.is_empty() => {
                    if by_material.insert(material, record).is_some() {
                        return Err(RuleError::DuplicateMaterial(key));
                    }
                }
                _ => return Err(RuleError::UnknownMaterial(key)),
            }
        }

        let mut specs = Vec::with_capacity(Material::COUNT);
        specs.push(MaterialSpec::empty());
        for material in Material::CONCRETE {
            let record = by_material
                .remove(&material)
                .ok_or(RuleError::MissingMaterial(material.name()))?;
            specs.push(record.into_spec(material)?);
        }

        Ok(Self { specs })
    }

    /// Rules for a material
    #[inline]
    pub fn spec(&self, material: Material) -> &MaterialSpec {
        &self.specs[material.index()]
    }

    /// Concrete materials with their rules, in display order
    pub fn iter(&self) -> impl Iterator<Item = (Material, &MaterialSpec)> {
        Material::CONCRETE.into_iter().map(|m| (m, self.spec(m)))
    }

    /// Display names of all concrete materials, in order
    pub fn material_names(&self) -> Vec<&str> {
        self.iter().map(|(_, spec)| spec.name.as_str()).collect()
    }

    /// Names laid out three per line, each preceded by its text padding
    pub fn formatted_names(&self) -> String {
        let mut out = String::new();
        for (i, (_, spec)) in self.iter().enumerate() {
            out.extend(std::iter::repeat_n(' ', spec.text_padding as usize));
            out.push_str(&spec.name);
            if (i + 1) % 3 == 0 {
                out.push('\n');
            }
        }
        out
    }
}
