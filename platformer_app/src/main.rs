//! Headless platformer demo
//!
//! Plays the configured levels for a few seconds with a scripted keyboard,
//! recording draw calls instead of opening a window. Configuration is read
//! from `platformer.toml` and levels from `levels.ron` when present; both
//! paths and the log filter can be overridden on the command line.

use clap::{Arg, ArgMatches, Command};
use platformer_core::prelude::*;
use platformer_core::ecs::components::{MovementComponent, PlayerInputComponent, StateComponent};
use platformer_core::foundation::time::Timer;

const CONFIG_PATH: &str = "platformer.toml";
const LEVELS_PATH: &str = "levels.ron";

/// Simulated frame rate of the host
const FRAME_TIME: f32 = 1.0 / 30.0;
/// Simulated run length in seconds
const RUN_SECONDS: f32 = 12.0;

#[derive(Debug, thiserror::Error)]
enum DemoError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Settings(#[from] platformer_core::config::ConfigError),
}

/// Audio sink that only reports what it would play
struct LoggedAudio;

impl AudioSink for LoggedAudio {
    fn play_music(&mut self, track: &str) {
        log::info!("now playing '{track}'");
    }

    fn stop(&mut self) {
        log::debug!("music stopped");
    }
}

/// Keys held during `[from, until)` seconds of the run
struct ScriptedKeys {
    from: f32,
    until: f32,
    keys: &'static [KeyCode],
}

const SCRIPT: &[ScriptedKeys] = &[
    ScriptedKeys { from: 1.5, until: 3.0, keys: &[KeyCode::Right] },
    ScriptedKeys { from: 2.4, until: 2.6, keys: &[KeyCode::Space] },
    ScriptedKeys { from: 3.0, until: 3.2, keys: &[KeyCode::Space] },
    ScriptedKeys { from: 3.5, until: 5.0, keys: &[KeyCode::Left] },
    ScriptedKeys { from: 6.0, until: 9.0, keys: &[KeyCode::D] },
];

fn apply_script(keyboard: &KeyboardState, time: f32) {
    keyboard.release_all();
    for entry in SCRIPT.iter().filter(|entry| (entry.from..entry.until).contains(&time)) {
        for &key in entry.keys {
            keyboard.press(key);
        }
    }
}

/// Two small levels used when no level file is present
fn builtin_levels() -> LevelCatalog {
    let mut first = platformer_core::assets::ObstacleLayers::new();
    first.insert(
        "solid".to_string(),
        vec![Rect::new(0, 336, 640, 32), Rect::new(480, 240, 32, 96)],
    );
    first.insert("float".to_string(), vec![Rect::new(192, 272, 96, 8)]);

    let mut second = platformer_core::assets::ObstacleLayers::new();
    second.insert("solid".to_string(), vec![Rect::new(0, 336, 640, 32)]);

    LevelCatalog::new()
        .with_level(
            "Level1",
            LevelData {
                music: Some("Overworld".to_string()),
                obstacles: first,
                spawns: vec![
                    Spawn::Background {
                        texture: "Blue".to_string(),
                        velocity: Vec2::new(0.0, 20.0),
                    },
                    Spawn::Player {
                        position: Vec2::new(64.0, 280.0),
                    },
                    Spawn::Fruit {
                        position: Vec2::new(220.0, 230.0),
                        texture: "Apple".to_string(),
                    },
                    Spawn::RegularEnemy {
                        position: Vec2::new(360.0, 280.0),
                        faces_left: true,
                        left_range: 64.0,
                        right_range: 64.0,
                    },
                    Spawn::Portal {
                        position: Vec2::new(600.0, 304.0),
                    },
                ],
            },
        )
        .with_level(
            "Level2",
            LevelData {
                music: Some("Caves".to_string()),
                obstacles: second,
                spawns: vec![
                    Spawn::Player {
                        position: Vec2::new(64.0, 280.0),
                    },
                    Spawn::Timer {
                        position: Vec2::new(580.0, 8.0),
                        duration: Some(5.0),
                        active: true,
                    },
                ],
            },
        )
        .with_texture("Blue", 64, 64)
        .with_texture("Collected", 192, 32)
}

fn log_player(world: &World) {
    let registry = world.registry();
    for player in registry.entities().filter(|&entity| registry.has::<PlayerInputComponent>(entity)) {
        if let (Ok(movement), Ok(state)) = (
            registry.get::<MovementComponent>(player),
            registry.get::<StateComponent>(player),
        ) {
            let position = movement.position();
            log::info!(
                "player at ({:.1}, {:.1}) {:?}/{:?}",
                position.x,
                position.y,
                state.super_state(),
                state.state()
            );
        }
    }
}

fn cli() -> Command {
    Command::new("platformer_demo")
        .about("Plays the platformer levels headless with a scripted keyboard")
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Game configuration file")
                .default_value(CONFIG_PATH),
        )
        .arg(
            Arg::new("levels")
                .short('l')
                .long("levels")
                .value_name("PATH")
                .help("Level catalog file")
                .default_value(LEVELS_PATH),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("FILTER")
                .help("Log filter used when RUST_LOG is not set"),
        )
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(mut config: GameConfig, matches: &ArgMatches) -> GameConfig {
    if let Some(level) = matches.get_one::<String>("log-level") {
        config.engine = config.engine.with_log_level(level.as_str());
    }
    config
}

fn run(config: GameConfig, levels_path: &str) -> Result<(), DemoError> {
    config.validate().map_err(DemoError::Config)?;

    let mut levels = LevelCatalog::load_or_default(levels_path)?;
    if levels.levels.is_empty() {
        log::info!("no level file, using the built-in levels");
        levels = builtin_levels();
    }

    let keyboard = KeyboardState::new();
    let mut timestep = FixedTimestep::new(config.physics.steps_per_second);
    let mut surface = RecordingSurface::new().with_texture("Blue", 64, 64);
    let mut world = World::new(config, levels)
        .with_input(keyboard.clone())
        .with_audio(LoggedAudio);
    world.load_level(0)?;

    let mut wall_clock = Timer::new();
    let mut last_level = world.current_level().map(|(index, _)| index);
    let mut elapsed = 0.0;
    while elapsed < RUN_SECONDS {
        apply_script(&keyboard, elapsed);
        for _ in 0..timestep.accumulate(FRAME_TIME) {
            if let Err(error) = world.advance(timestep.step()) {
                log::error!("step failed, keeping the current level: {error}");
            }
        }

        surface.clear();
        world.render(&mut surface);

        let level = world.current_level().map(|(index, _)| index);
        if level != last_level {
            if let Some((index, name)) = world.current_level() {
                log::info!("switched to level {index} '{name}'");
            }
            last_level = level;
        }
        if timestep.step_count() % 60 == 0 {
            log::debug!("{} draw call(s), {} entities", surface.commands().len(), world.registry().len());
            log_player(&world);
        }
        elapsed += FRAME_TIME;
    }

    log::info!(
        "simulated {:.1}s in {} steps ({:.3}s wall time)",
        timestep.total_time(),
        timestep.step_count(),
        wall_clock.update()
    );
    Ok(())
}

fn main() {
    let matches = cli().get_matches();
    let config_path = matches.get_one::<String>("config").map_or(CONFIG_PATH, String::as_str);
    let levels_path = matches.get_one::<String>("levels").map_or(LEVELS_PATH, String::as_str);

    let config = GameConfig::load_or_default(config_path).map(|config| apply_overrides(config, &matches));
    let filter = match &config {
        Ok(config) => config.engine.log_level.as_str(),
        Err(_) => matches.get_one::<String>("log-level").map_or("info", String::as_str),
    };
    platformer_core::foundation::logging::init_with_level(filter);
    log::info!("Starting platformer demo");

    let result = config
        .map_err(DemoError::from)
        .and_then(|config| run(config, levels_path));
    if let Err(error) = result {
        log::error!("Demo failed: {error}");
        std::process::exit(1);
    }
    log::info!("Platformer demo finished successfully");
}
