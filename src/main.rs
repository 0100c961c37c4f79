//! Glowhop headless driver
//!
//! Runs a scripted session on a generated course with a jittered frame clock
//! and logs what happens. Usage: `glowhop [settings.json]`
//! (`RUST_LOG=debug` for per-event and telemetry output).

#[cfg(not(target_arch = "wasm32"))]
use glowhop::{
    ConfigError, Settings,
    sim::{Control, Course, CourseAssets, Engine, GameEvent, GamePhase, instance_bytes},
};

/// Length of the scripted session in host seconds
#[cfg(not(target_arch = "wasm32"))]
const SESSION_SECS: f32 = 30.0;

/// Seconds between scripted jump presses
#[cfg(not(target_arch = "wasm32"))]
const JUMP_EVERY: f32 = 0.9;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Glowhop (native) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The wasm host drives `Engine::display` directly
}

#[cfg(not(target_arch = "wasm32"))]
fn run() -> Result<(), ConfigError> {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    let settings = match std::env::args().nth(1) {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };

    let course = Course::generated(settings.seed, CourseAssets::default());
    let mut engine = Engine::new(course, &settings)?;
    // Frame jitter has its own stream so it never perturbs the course layout
    let mut clock = Pcg32::seed_from_u64(settings.seed.wrapping_add(1));

    let mut host_time = 0.0f32;
    let mut next_jump = JUMP_EVERY;
    let mut pause_script = [10.0f32, 10.5].into_iter().peekable();

    engine.input_mut().press(Control::Forward);
    while host_time < SESSION_SECS {
        let mut frame = clock.random_range(0.012..0.022);
        // Occasional stall, as when the window is dragged
        if clock.random_bool(0.005) {
            frame = 0.4;
        }

        if host_time >= next_jump {
            engine.input_mut().press(Control::Jump);
            next_jump += JUMP_EVERY;
        } else {
            engine.input_mut().release(Control::Jump);
        }
        if pause_script.next_if(|&at| host_time >= at).is_some() {
            engine.input_mut().press(Control::Pause);
        } else {
            engine.input_mut().release(Control::Pause);
        }

        engine.simulate(frame);
        host_time += frame;

        for event in engine.drain_events() {
            match event {
                GameEvent::Completed => log::info!(
                    "Course completed after {:.2}s of play",
                    engine.world().game.elapsed_time(settings.dt)
                ),
                other => log::debug!("{:?}", other),
            }
        }
        if engine.phase() == GamePhase::Completed {
            break;
        }
    }

    let normal = engine.render_scene_normal();
    let blurred = engine.render_scene_blurred();
    log::info!(
        "Final frame: {} normal / {} blurred drawables, {} instance bytes",
        normal.len(),
        blurred.len(),
        instance_bytes(&normal).len()
    );
    log::info!(
        "Session: {:.1}s host time, {} ticks, {} clamped frames, {} resets, phase {:?}",
        host_time,
        engine.stepper().steps_taken(),
        engine.stepper().clamped_frames(),
        engine.world().game.resets,
        engine.phase()
    );
    Ok(())
}
