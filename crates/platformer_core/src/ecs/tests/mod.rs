//! Scenario tests driving a whole [`World`] tick by tick
//!
//! Every scenario builds its levels from a [`LevelCatalog`] with a floor
//! spanning the screen at y = 128 and steps the world at 60 Hz.


use std::cell::RefCell;
use std::rc::Rc;

use crate::assets::{LevelCatalog, LevelData, ObstacleLayers, Spawn};
use crate::audio::AudioSink;
use crate::core::{GameConfig, LevelConfig};
use crate::ecs::components::{AnimationComponent, StateComponent};
use crate::ecs::{Entity, World};
use crate::events::{Message, MessageKind};
use crate::foundation::math::{Rect, Vec2};

pub(super) const STEP: f32 = 1.0 / 60.0;

pub(super) fn floor() -> ObstacleLayers {
    let mut obstacles = ObstacleLayers::new();
    obstacles.insert("solid".to_string(), vec![Rect::new(0, 128, 640, 32)]);
    obstacles
}

pub(super) fn level(spawns: Vec<Spawn>) -> LevelData {
    LevelData {
        music: None,
        obstacles: floor(),
        spawns,
    }
}

pub(super) fn config(levels: &[&str]) -> GameConfig {
    GameConfig::new().with_levels(LevelConfig::new().with_levels(levels.iter().copied()).with_respawn_delay(0.5))
}

/// World playing the first of `levels`, all taken from `catalog`
pub(super) fn world(levels: &[&str], catalog: LevelCatalog) -> World {
    let mut world = World::new(config(levels), catalog);
    world.load_level(0).unwrap();
    world
}

pub(super) fn player_at(x: f32, y: f32) -> Spawn {
    Spawn::Player {
        position: Vec2::new(x, y),
    }
}

/// Advance `ticks` steps, checking after each that animations follow states
///
/// Intents without a strip fall back to the default action and are not checked.
pub(super) fn run(world: &mut World, ticks: usize) {
    for _ in 0..ticks {
        world.advance(STEP).unwrap();
        assert_intents_in_sync(world);
    }
}

/// Advance until `done` holds, at most `limit` steps; returns the steps taken
pub(super) fn run_until(world: &mut World, limit: usize, mut done: impl FnMut(&World) -> bool) -> usize {
    for tick in 0..limit {
        if done(world) {
            return tick;
        }
        world.advance(STEP).unwrap();
        assert_intents_in_sync(world);
    }
    assert!(done(world), "condition not reached within {limit} ticks");
    limit
}

pub(super) fn assert_intents_in_sync(world: &World) {
    let registry = world.registry();
    for entity in registry.entities().filter(|&entity| registry.is_active(entity)) {
        let (Ok(state), Ok(animation)) = (
            registry.get::<StateComponent>(entity),
            registry.get::<AnimationComponent>(entity),
        ) else {
            continue;
        };
        if animation.has_strip(state.animation()) {
            assert_eq!(animation.current_action(), state.animation(), "{entity:?} animation out of sync");
        }
    }
}

/// Entities of `world` carrying component `T`
pub(super) fn with_component<T: crate::ecs::Component>(world: &World) -> Vec<Entity> {
    let registry = world.registry();
    registry.entities().filter(|&entity| registry.has::<T>(entity)).collect()
}

/// Records every message of `kind` published on the world's bus
pub(super) fn record(world: &World, kind: MessageKind) -> Rc<RefCell<Vec<Message>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&log);
    world.bus().subscribe(kind, move |message| sink.borrow_mut().push(*message));
    log
}

/// Audio sink writing its calls to a shared log
#[derive(Debug, Clone, Default)]
pub(super) struct Jukebox {
    pub calls: Rc<RefCell<Vec<String>>>,
}

impl AudioSink for Jukebox {
    fn play_music(&mut self, track: &str) {
        self.calls.borrow_mut().push(format!("play {track}"));
    }

    fn stop(&mut self) {
        self.calls.borrow_mut().push("stop".to_string());
    }
}
