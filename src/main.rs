//! Cellular Automata entry point
//!
//! Native builds run the kernel headless: load settings, pour a demo scene and
//! advance a fixed number of ticks against the frame budget, logging progress.
//! The web build drives the kernel through the `wasm` bindings instead.
//!
//! Usage: `cellular-automata [settings.json] [ticks]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::process::ExitCode;
    use std::time::{Duration, Instant};

    use cellular_automata::{Material, Settings, Simulation, TickStats};
    use glam::IVec2;

    const DEFAULT_TICKS: u64 = 600;
    const REPORT_INTERVAL: u64 = 100;

    pub fn run() -> ExitCode {
        env_logger::init();
        log::info!("Cellular Automata (native) starting...");

        let mut args = std::env::args().skip(1);
        let settings = match args.next() {
            Some(path) => Settings::load_from(path),
            None => Settings::default(),
        };
        let ticks = match args.next().map(|arg| arg.parse::<u64>()) {
            None => DEFAULT_TICKS,
            Some(Ok(ticks)) => ticks,
            Some(Err(e)) => {
                log::error!("Invalid tick count: {}", e);
                return ExitCode::FAILURE;
            }
        };

        let mut sim = match Simulation::from_settings(&settings) {
            Ok(sim) => sim,
            Err(e) => {
                log::error!("Failed to start simulation: {}", e);
                return ExitCode::FAILURE;
            }
        };
        pour_scene(&mut sim, settings.effective_brush_radius());

        let budget = settings.frame_budget();
        let mut totals = TickStats::default();
        let mut slowest = Duration::ZERO;
        let mut over_budget = 0u64;
        let started = Instant::now();

        for _ in 0..ticks {
            let frame = Instant::now();
            let stats = sim.update();
            let elapsed = frame.elapsed();

            slowest = slowest.max(elapsed);
            if elapsed > budget {
                over_budget += 1;
            }
            totals.processed += stats.processed;
            totals.moved += stats.moved;
            totals.jittered += stats.jittered;
            totals.decayed += stats.decayed;
            totals.reacted += stats.reacted;
            totals.quenched += stats.quenched;

            if sim.ticks() % REPORT_INTERVAL == 0 {
                log::info!(
                    "tick {}: {} moved, {} jittered, {} decayed ({:.2?})",
                    sim.ticks(),
                    stats.moved,
                    stats.jittered,
                    stats.decayed,
                    elapsed
                );
            }
        }

        log::info!(
            "Ran {} ticks in {:.2?} (slowest {:.2?}, {} over the {:?} budget)",
            ticks,
            started.elapsed(),
            slowest,
            over_budget,
            budget
        );
        log::info!(
            "Totals: {} moved, {} jittered, {} decayed, {} reacted, {} quenched",
            totals.moved,
            totals.jittered,
            totals.decayed,
            totals.reacted,
            totals.quenched
        );
        for (material, spec) in sim.rules().iter() {
            let cells = sim.count(material);
            if cells > 0 {
                log::info!("{:>8}: {} cells", spec.name, cells);
            }
        }

        println!("{}", sim.formatted_names());
        ExitCode::SUCCESS
    }

    /// Strokes a small test scene scaled to the grid
    fn pour_scene(sim: &mut Simulation, radius: u16) {
        let (w, h) = (sim.width() as i32, sim.height() as i32);
        let at = |fx: f32, fy: f32| IVec2::new((w as f32 * fx) as i32, (h as f32 * fy) as i32);
        let small = (radius / 2).max(1);

        // Basin
        sim.stamp_line(at(0.05, 0.9), at(0.95, 0.9), small, Material::Rock);
        sim.stamp_line(at(0.05, 0.6), at(0.05, 0.9), small, Material::Rock);
        sim.stamp_line(at(0.95, 0.6), at(0.95, 0.9), small, Material::Rock);
        sim.stamp_line(at(0.55, 0.7), at(0.7, 0.7), small, Material::Wood);

        // Falling material
        sim.stamp_circle(at(0.2, 0.2), radius, Material::Sand);
        sim.stamp_line(at(0.35, 0.1), at(0.5, 0.25), radius, Material::Water);
        sim.stamp_circle(at(0.6, 0.15), radius, Material::Oil);
        sim.stamp_circle(at(0.8, 0.2), small, Material::Lava);
        sim.stamp_circle(at(0.62, 0.6), small, Material::Fire);
        sim.stamp_circle(at(0.3, 0.5), small, Material::Gas);

        log::debug!(
            "Scene poured: {} sand, {} water, {} oil",
            sim.count(Material::Sand),
            sim.count(Material::Water),
            sim.count(Material::Oil)
        );
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The web entry point is `wasm::start` in the library
}
