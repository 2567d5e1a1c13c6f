//! GraviScore entry point
//!
//! Native builds run a headless demo: load a catalog level, drop a couple
//! of planets, launch, and step at 60 Hz until the run ends. The wasm build
//! only initializes logging; a rendering host drives the library directly.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use graviscore::leaderboard::LocalBoard;
    use graviscore::sim::{RunController, RunPhase, SimEvent, Simulation};
    use graviscore::{levels, Settings, WorldConfig};
    use rand::SeedableRng;

    env_logger::init();
    log::info!("GraviScore headless demo starting");

    let (width, height) = (1280.0, 720.0);
    let settings = Settings::load();
    let level = levels::builtin(0, width, height).expect("catalog level 0 exists");
    log::info!("level: {}", level.name);

    let mut sim = Simulation::new(WorldConfig::new(width, height), level);
    sim.apply_options(&settings.physics_options());
    let mut controller = RunController::new(sim, levels::builtin_seed_key(0), settings.identity());
    controller.set_board(Box::new(LocalBoard::load()));

    // Deterministic demo setup: seed the mass rolls
    let mut rng = rand_pcg::Pcg32::seed_from_u64(42);
    controller.place_planet(Vec2::new(520.0, 260.0), &mut rng);
    controller.place_planet(Vec2::new(760.0, 480.0), &mut rng);

    controller.launch();
    let dt = 1.0 / 60.0;
    let mut events = Vec::new();
    // Bail out after 60 simulated seconds if the puck never settles
    for _ in 0..3600 {
        controller.tick(dt, &mut events);
        for event in events.drain(..) {
            match event {
                SimEvent::NoteCaptured { index } => log::info!("note {} captured", index),
                SimEvent::Crashed => log::info!("crashed into a planet"),
                SimEvent::OutOfBounds => log::info!("out of bounds"),
                SimEvent::GoalReached { score } => log::info!("goal! score {}", score),
            }
        }
        if controller.phase() == RunPhase::Terminal {
            break;
        }
    }

    let sim = controller.sim();
    log::info!(
        "done after {:.2}s: puck at ({:.1}, {:.1}), {}/{} notes",
        sim.elapsed(),
        sim.puck().pos.x,
        sim.puck().pos.y,
        sim.next_note(),
        sim.level().note_count()
    );
    for (i, row) in controller.fetch_top(10).iter().enumerate() {
        log::info!(
            "#{} {} {} ({} planets)",
            i + 1,
            row.name.as_deref().unwrap_or("-"),
            row.score,
            row.planets
        );
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);
    log::info!("GraviScore library loaded; drive it from the host page");
}
