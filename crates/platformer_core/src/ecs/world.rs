//! ECS World implementation
//!
//! The world owns the registry, the message bus and the system scheduler of
//! the level being played, and applies every structural change at a tick
//! boundary:
//!
//! 1. entities announced with `EntityAdded` are offered to the systems,
//! 2. the systems tick in their fixed order,
//! 3. entities named by `DestroyEntity` leave the systems and the registry,
//! 4. a pending level request (reload, next, previous) loads a level.
//!
//! Loading populates the new level next to the old one and only drops the
//! old entities once population succeeded; a failed load removes what was
//! created and leaves the previous level running.

use std::collections::HashSet;
use std::fmt;

use crate::assets::LevelSource;
use crate::audio::{AudioSink, SilentAudio};
use crate::core::{CoreError, GameConfig};
use crate::ecs::factory::EntityFactory;
use crate::ecs::scheduler::SystemScheduler;
use crate::ecs::system::TickContext;
use crate::ecs::{Entity, EntityRegistry};
use crate::events::{EventBus, Mailbox, Message, MessageKind, SubscriptionSet};
use crate::input::{InputSource, NoInput};
use crate::render::RenderSurface;

/// Level change asked for by a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelRequest {
    /// Restart the current level
    Reload,
    /// Go to the next level, wrapping after the last
    Next,
    /// Go to the previous level, wrapping before the first
    Previous,
}

impl LevelRequest {
    /// Index of the requested level among `count` levels
    pub const fn resolve(self, current: usize, count: usize) -> usize {
        match self {
            Self::Reload => current,
            Self::Next => (current + 1) % count,
            Self::Previous => (current + count - 1) % count,
        }
    }

    /// Message that carries this request
    pub const fn message(self) -> Message {
        match self {
            Self::Reload => Message::ReloadLevel,
            Self::Next => Message::NextLevel,
            Self::Previous => Message::PreviousLevel,
        }
    }
}

/// ECS World containing the level being played
pub struct World {
    config: GameConfig,
    registry: EntityRegistry,
    bus: EventBus,
    scheduler: SystemScheduler,

    subscriptions: SubscriptionSet,
    added: Mailbox<Entity>,
    destroyed: Mailbox<Entity>,
    level_requests: Mailbox<LevelRequest>,

    current_level: Option<(usize, String)>,

    levels: Box<dyn LevelSource>,
    input: Box<dyn InputSource>,
    audio: Box<dyn AudioSink>,
}

impl World {
    /// Create a world reading levels from `levels`; no level is loaded yet
    pub fn new(config: GameConfig, levels: impl LevelSource + 'static) -> Self {
        let bus = EventBus::new();
        let added = Mailbox::new();
        let destroyed = Mailbox::new();
        let level_requests = Mailbox::new();

        let mut subscriptions = SubscriptionSet::new();
        subscriptions.forward_entities(&bus, MessageKind::EntityAdded, &added);
        subscriptions.forward_entities(&bus, MessageKind::DestroyEntity, &destroyed);
        for (kind, request) in [
            (MessageKind::ReloadLevel, LevelRequest::Reload),
            (MessageKind::NextLevel, LevelRequest::Next),
            (MessageKind::PreviousLevel, LevelRequest::Previous),
        ] {
            let requests = level_requests.clone();
            subscriptions.subscribe(&bus, kind, move |_| requests.push(request));
        }

        Self {
            config,
            registry: EntityRegistry::new(),
            bus,
            scheduler: SystemScheduler::new(),
            subscriptions,
            added,
            destroyed,
            level_requests,
            current_level: None,
            levels: Box::new(levels),
            input: Box::new(NoInput),
            audio: Box::new(SilentAudio),
        }
    }

    /// Read keys from `input` (builder form)
    #[must_use]
    pub fn with_input(mut self, input: impl InputSource + 'static) -> Self {
        self.input = Box::new(input);
        self
    }

    /// Play music through `audio` (builder form)
    #[must_use]
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Game configuration
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Entity registry of the current level
    pub const fn registry(&self) -> &EntityRegistry {
        &self.registry
    }

    /// Message bus
    pub const fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Systems of the current level
    pub const fn scheduler(&self) -> &SystemScheduler {
        &self.scheduler
    }

    /// Index and name of the level being played
    pub fn current_level(&self) -> Option<(usize, &str)> {
        self.current_level.as_ref().map(|(index, name)| (*index, name.as_str()))
    }

    /// Factory for adding entities to the current level
    ///
    /// Systems see the new entities from the next tick on.
    pub fn factory(&mut self) -> EntityFactory<'_> {
        EntityFactory::new(&mut self.registry, &self.bus, &self.config)
    }

    /// Ask for a level change; it is applied at the end of the next tick
    pub fn request_level(&self, request: LevelRequest) {
        self.bus.publish(&request.message());
    }

    /// Replace the current level with configured level `index`
    pub fn load_level(&mut self, index: usize) -> Result<(), CoreError> {
        let name = self
            .config
            .levels
            .levels
            .get(index)
            .cloned()
            .ok_or_else(|| CoreError::UnknownLevel(format!("#{index}")))?;
        log::info!("loading level '{name}'");
        let obstacles = self.levels.obstacle_layers(&name)?;

        self.scheduler.unsubscribe(&self.bus);
        let previous_scheduler = std::mem::replace(
            &mut self.scheduler,
            SystemScheduler::for_level(&name, obstacles, &self.config),
        );
        let previous_entities: HashSet<Entity> = self.registry.entities().collect();
        let previous_added = self.added.drain();
        self.scheduler.subscribe(&self.bus);

        let populated = {
            let mut factory = EntityFactory::new(&mut self.registry, &self.bus, &self.config);
            self.levels.populate(&name, &mut factory)
        };
        if let Err(error) = populated {
            log::error!("failed to load level '{name}': {error}");
            self.scheduler.unsubscribe(&self.bus);
            self.scheduler = previous_scheduler;
            self.despawn_where(|entity| !previous_entities.contains(&entity));
            self.added.clear();
            for entity in previous_added {
                self.added.push(entity);
            }
            self.scheduler.subscribe(&self.bus);
            return Err(error);
        }
        self.despawn_where(|entity| previous_entities.contains(&entity));

        self.destroyed.clear();
        self.level_requests.clear();
        self.audio.stop();
        if let Some(track) = self.levels.background_music(&name) {
            self.audio.play_music(&track);
        }
        log::info!("level '{name}' loaded with {} entities", self.registry.len());
        self.current_level = Some((index, name));
        Ok(())
    }

    /// Despawn every entity matching `condition`
    fn despawn_where(&mut self, condition: impl Fn(Entity) -> bool) {
        let doomed: Vec<Entity> = self.registry.entities().filter(|&entity| condition(entity)).collect();
        for entity in doomed {
            self.registry.despawn(entity);
        }
    }

    /// Advance the simulation by `delta_time` seconds
    pub fn advance(&mut self, delta_time: f32) -> Result<(), CoreError> {
        for entity in self.added.drain() {
            if self.registry.is_alive(entity) {
                self.scheduler.add_entity(entity, &self.registry);
            }
        }

        let mut context = TickContext {
            registry: &mut self.registry,
            bus: &self.bus,
            input: self.input.as_ref(),
            config: &self.config,
        };
        self.scheduler.tick(&mut context, delta_time);

        for entity in self.destroyed.drain() {
            if self.registry.is_alive(entity) {
                self.scheduler.remove_entity(entity);
                self.registry.despawn(entity);
                log::debug!("destroyed {entity:?}");
            }
        }

        let requests = self.level_requests.drain();
        if let Some(&request) = requests.first() {
            if requests.len() > 1 {
                log::debug!("{} level requests in one tick, applying {request:?}", requests.len());
            }
            let count = self.config.levels.levels.len();
            let current = self.current_level.as_ref().map_or(0, |(index, _)| *index);
            if count == 0 {
                return Err(CoreError::UnknownLevel(format!("{request:?} with no levels configured")));
            }
            self.load_level(request.resolve(current, count))?;
        }
        Ok(())
    }

    /// Describe the current frame to `surface`
    pub fn render(&self, surface: &mut dyn RenderSurface) {
        self.scheduler.draw(&self.registry, surface);
    }

    /// Drop the current level: systems, entities and queued changes
    pub fn reset(&mut self) {
        self.scheduler.unsubscribe(&self.bus);
        self.scheduler = SystemScheduler::new();
        self.registry.clear();
        self.added.clear();
        self.destroyed.clear();
        self.level_requests.clear();
        self.audio.stop();
        self.current_level = None;
    }
}

impl Drop for World {
    fn drop(&mut self) {
        self.subscriptions.revoke_all(&self.bus);
    }
}

impl fmt::Debug for World {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("World")
            .field("current_level", &self.current_level)
            .field("entities", &self.registry.len())
            .field("scheduler", &self.scheduler)
            .field("bus", &self.bus)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_cursor_wraps() {
        assert_eq!(LevelRequest::Reload.resolve(1, 3), 1);
        assert_eq!(LevelRequest::Next.resolve(2, 3), 0);
        assert_eq!(LevelRequest::Previous.resolve(0, 3), 2);
        assert_eq!(LevelRequest::Next.resolve(0, 1), 0);
    }

    #[test]
    fn test_request_messages() {
        assert_eq!(LevelRequest::Next.message(), Message::NextLevel);
        assert_eq!(LevelRequest::Previous.message().kind(), MessageKind::PreviousLevel);
    }
}
