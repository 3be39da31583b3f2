//! Per-tick update engine
//!
//! Visits every cell once in the fixed shuffled order and resolves decay,
//! movement, reactions and density mixing against the current grid. A cell
//! finalized earlier in the tick (dirty) is skipped as a mover and treated as
//! an obstacle by everyone else.

use super::color::Palette;
use super::entropy::CellRandom;
use super::grid::Grid;
use super::material::{Direction, Material, MaterialSpec};
use super::rules::MaterialTable;
use super::state::Simulation;

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Cells that got a turn (non-empty, not dirty, able to move or decay)
    pub processed: u32,
    /// Cells that walked in one of their behavior directions
    pub moved: u32,
    /// Cells swapped with an equal-density neighbor
    pub jittered: u32,
    /// Cells that decayed to empty
    pub decayed: u32,
    /// Cells that ignited or melted a neighbor without moving
    pub reacted: u32,
    /// Water cells turned to steam
    pub quenched: u32,
}

impl TickStats {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Skipped => return,
            Outcome::Unmoved => {}
            Outcome::Moved => self.moved += 1,
            Outcome::Jittered => self.jittered += 1,
            Outcome::Decayed => self.decayed += 1,
            Outcome::Reacted => self.reacted += 1,
            Outcome::Quenched => self.quenched += 1,
        }
        self.processed += 1;
    }
}

/// Terminal state of a cell for one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Skipped,
    Decayed,
    Quenched,
    Reacted,
    Moved,
    Jittered,
    Unmoved,
}

/// Result of walking one direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    /// Reached a new position (possibly after igniting or melting what
    /// stopped it)
    Advanced(usize),
    /// The mover itself was destroyed
    Quenched,
    Stayed { reacted: bool },
}

/// Advance the simulation by one tick
pub fn tick(sim: &mut Simulation) -> TickStats {
    let Simulation {
        grid,
        rules,
        entropy,
        palette,
        ..
    } = sim;

    entropy.stream.refresh();
    grid.clear_dirty();

    let mut stats = TickStats::default();
    for &index in entropy.noise.iteration_order() {
        let index = index as usize;
        let mut random = entropy.stream.cell(entropy.noise.bucket(index));
        let outcome = step_cell(grid, rules, palette, &mut random, index);
        stats.record(outcome);
    }

    log::trace!(
        "tick: {} processed, {} moved, {} jittered, {} decayed, {} reacted, {} quenched",
        stats.processed,
        stats.moved,
        stats.jittered,
        stats.decayed,
        stats.reacted,
        stats.quenched
    );
    stats
}

fn step_cell(
    grid: &mut Grid,
    rules: &MaterialTable,
    palette: &mut Palette,
    random: &mut CellRandom<'_>,
    index: usize,
) -> Outcome {
    let material = grid.material(index);
    if material.is_empty() || grid.is_dirty(index) {
        return Outcome::Skipped;
    }
    let spec = rules.spec(material);

    // Immovable cells still decay
    if spec.is_immovable() {
        if spec.death_chance > 0 && decays(spec, random) {
            palette.paint(grid, rules, index, Material::Empty);
            return Outcome::Decayed;
        }
        return Outcome::Skipped;
    }

    let speed = random.range(spec.min_speed as u32, spec.max_speed as u32);
    let mut reacted = false;

    for set in &spec.behavior {
        if spec.death_chance > 0 && decays(spec, random) {
            palette.paint(grid, rules, index, Material::Empty);
            return Outcome::Decayed;
        }

        let len = set.len();
        let start = random.range(0, len as u32 - 1) as usize;
        for k in 0..len {
            let dir = set[(start + k) % len];
            match walk(grid, rules, palette, random, index, material, dir, speed) {
                Walk::Advanced(last) => {
                    grid.swap_cell(index, last);
                    return Outcome::Moved;
                }
                Walk::Quenched => return Outcome::Quenched,
                Walk::Stayed { reacted: true } => reacted = true,
                Walk::Stayed { reacted: false } => {}
            }
        }
    }

    if reacted {
        return Outcome::Reacted;
    }
    if !spec.solid && jitter(grid, rules, random, index, spec) {
        return Outcome::Jittered;
    }
    Outcome::Unmoved
}

#[inline]
fn decays(spec: &MaterialSpec, random: &mut CellRandom<'_>) -> bool {
    random.range(1, spec.death_chance as u32) == 1
}

/// Walk up to `speed` steps from `index` towards `dir`, resolving whatever
/// stops the walk
#[allow(clippy::too_many_arguments)]
fn walk(
    grid: &mut Grid,
    rules: &MaterialTable,
    palette: &mut Palette,
    random: &mut CellRandom<'_>,
    index: usize,
    material: Material,
    dir: Direction,
    speed: u32,
) -> Walk {
    let spec = rules.spec(material);
    let mut last = index;
    let mut reacted = false;

    for _ in 0..speed {
        let Some(next) = grid.relative(last, dir) else {
            break;
        };
        if grid.is_dirty(next) {
            break;
        }
        let target = grid.material(next);
        if target.is_empty() {
            last = next;
            continue;
        }

        let other = rules.spec(target);
        if spec.flaming && other.flammable {
            palette.paint(grid, rules, next, Material::Fire);
            reacted = true;
        } else if spec.melting && other.meltable {
            palette.paint(grid, rules, next, Material::Lava);
            reacted = true;
        } else if material == Material::Water && (other.flaming || other.melting) {
            palette.paint(grid, rules, index, Material::Steam);
            let residue = if target == Material::Lava && random.range(0, 1) == 0 {
                Material::Gravel
            } else {
                Material::Empty
            };
            palette.paint(grid, rules, next, residue);
            return Walk::Quenched;
        } else if !other.solid
            && (other.density < spec.density
                || (other.density > spec.density && dir.is_backward()))
        {
            last = next;
        }
        break;
    }

    if last != index {
        Walk::Advanced(last)
    } else {
        Walk::Stayed { reacted }
    }
}

/// Swap with the first equal-density, non-solid neighbor found scanning all
/// 8 directions from a random start
fn jitter(
    grid: &mut Grid,
    rules: &MaterialTable,
    random: &mut CellRandom<'_>,
    index: usize,
    spec: &MaterialSpec,
) -> bool {
    let start = random.range(0, Direction::COUNT as u32 - 1) as usize;
    for k in 0..Direction::COUNT {
        let dir = Direction::ALL[(start + k) % Direction::COUNT];
        let Some(next) = grid.relative(index, dir) else {
            continue;
        };
        if grid.is_dirty(next) {
            continue;
        }
        let other = rules.spec(grid.material(next));
        if !other.solid && other.density == spec.density {
            grid.swap_cell(index, next);
            return true;
        }
    }
    false
}
