//! satbox - headless rigid-body collision test harness
//!
//! Loads a named test scene, steps the simulation at its fixed rate, and
//! logs the contact manifolds produced each tick.

use satbox::config::AppConfig;
use satbox::scene;
use satbox::systems::{InputSnapshot, SimulationSystem};

fn main() {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });

    let mut world = scene::build_scene(&config.scene.name, &config.physics.to_physics_config())
        .unwrap_or_else(|e| {
            // A scene that cannot be built has broken invariants; there is
            // nothing sensible to simulate
            log::error!("Failed to build scene '{}': {}", config.scene.name, e);
            std::process::exit(1);
        });

    let mut sim = SimulationSystem::new(config.harness.start_paused);
    let mut contact_ticks = 0u32;

    for tick in 0..config.harness.steps {
        let outcome = sim.update(&mut world, InputSnapshot::default());
        if !outcome.stepped {
            continue;
        }

        let manifolds = world.manifolds();
        if manifolds.is_empty() {
            continue;
        }
        contact_ticks += 1;

        if config.harness.log_contacts {
            for manifold in manifolds {
                log::info!(
                    "tick {}: {} contact point(s), normal ({:.3}, {:.3}, {:.3}), max depth {:.4}",
                    tick,
                    manifold.points.len(),
                    manifold.normal.x,
                    manifold.normal.y,
                    manifold.normal.z,
                    manifold.max_depth()
                );
            }
        }
    }

    let stats = world.last_stats();
    log::info!(
        "finished {} ticks: {} with contacts, {} pair tests in the final tick",
        config.harness.steps,
        contact_ticks,
        stats.pair_tests
    );
}
