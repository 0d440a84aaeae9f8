//! System scheduling
//!
//! Systems run one after another in registration order, which must never go
//! back to an earlier [`SystemPhase`]. Per-level systems (obstacle collision,
//! level rendering) are rebuilt with the scheduler on every level load.

use crate::assets::ObstacleLayers;
use crate::core::GameConfig;
use crate::ecs::system::{System, SystemPhase, TickContext};
use crate::ecs::systems::{
    ActorCollisionSystem, AnimationSystem, AppearSystem, DeathSystem, EnemyPatrolSystem, LevelRenderSystem,
    MovementSystem, ObstacleCollisionSystem, ParallaxSystem, PlayerInputSystem, RespawnSystem, TimerSystem,
};
use crate::ecs::{Entity, EntityRegistry};
use crate::events::EventBus;
use crate::render::RenderSurface;

/// Ordered list of systems with fan-out of every lifecycle call
#[derive(Default)]
pub struct SystemScheduler {
    systems: Vec<Box<dyn System>>,
}

impl SystemScheduler {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the full system set for `level`
    pub fn for_level(level: &str, obstacles: ObstacleLayers, config: &GameConfig) -> Self {
        let mut scheduler = Self::new();
        scheduler.add_system(PlayerInputSystem::new());
        scheduler.add_system(EnemyPatrolSystem::new());
        scheduler.add_system(MovementSystem::new());
        scheduler.add_system(ActorCollisionSystem::new());
        scheduler.add_system(ObstacleCollisionSystem::new(obstacles, &config.levels));
        scheduler.add_system(RespawnSystem::new());
        scheduler.add_system(AppearSystem::new());
        scheduler.add_system(ParallaxSystem::new());
        scheduler.add_system(LevelRenderSystem::new(level));
        scheduler.add_system(TimerSystem::new());
        scheduler.add_system(AnimationSystem::new());
        scheduler.add_system(DeathSystem::new());
        log::debug!("scheduled {} systems for '{level}'", scheduler.len());
        scheduler
    }

    /// Append a system; it runs after every system already added
    pub fn add_system(&mut self, system: impl System + 'static) {
        if let Some(last) = self.systems.last() {
            if system.phase() < last.phase() {
                log::warn!(
                    "system '{}' ({:?}) scheduled after '{}' ({:?})",
                    system.name(),
                    system.phase(),
                    last.name(),
                    last.phase()
                );
            }
        }
        self.systems.push(Box::new(system));
    }

    /// System names in execution order
    pub fn names(&self) -> Vec<&'static str> {
        self.systems.iter().map(|system| system.name()).collect()
    }

    /// Phases in execution order
    pub fn phases(&self) -> Vec<SystemPhase> {
        self.systems.iter().map(|system| system.phase()).collect()
    }

    /// Number of systems
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    /// Whether no system is scheduled
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Offer `entity` to every system
    pub fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        for system in &mut self.systems {
            system.add_entity(entity, registry);
        }
    }

    /// Withdraw `entity` from every system
    pub fn remove_entity(&mut self, entity: Entity) {
        for system in &mut self.systems {
            system.remove_entity(entity);
        }
    }

    /// Register every system's message handlers
    pub fn subscribe(&mut self, bus: &EventBus) {
        for system in &mut self.systems {
            system.subscribe(bus);
        }
    }

    /// Revoke every system's message handlers
    pub fn unsubscribe(&mut self, bus: &EventBus) {
        for system in &mut self.systems {
            system.unsubscribe(bus);
        }
    }

    /// Run one tick of every system in order
    pub fn tick(&mut self, context: &mut TickContext<'_>, delta_time: f32) {
        for system in &mut self.systems {
            log::trace!("tick {}", system.name());
            system.tick(context, delta_time);
        }
    }

    /// Let every system describe what it draws
    pub fn draw(&self, registry: &EntityRegistry, surface: &mut dyn RenderSurface) {
        for system in &self.systems {
            system.draw(registry, surface);
        }
    }
}

impl std::fmt::Debug for SystemScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemScheduler").field("systems", &self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_systems_run_in_fixed_order() {
        let scheduler = SystemScheduler::for_level("Level1", ObstacleLayers::new(), &GameConfig::default());
        assert_eq!(
            scheduler.names(),
            vec![
                "player_input",
                "enemy_patrol",
                "movement",
                "actor_collision",
                "obstacle_collision",
                "respawn",
                "appear",
                "parallax",
                "level_render",
                "timer",
                "animation",
                "death",
            ]
        );
    }

    #[test]
    fn test_phases_never_go_backwards() {
        let scheduler = SystemScheduler::for_level("Level1", ObstacleLayers::new(), &GameConfig::default());
        let phases = scheduler.phases();
        assert!(phases.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn test_subscribe_and_unsubscribe_fan_out() {
        use crate::events::MessageKind;

        let bus = EventBus::new();
        let mut scheduler = SystemScheduler::for_level("Level1", ObstacleLayers::new(), &GameConfig::default());
        scheduler.subscribe(&bus);
        assert_eq!(bus.subscriber_count(MessageKind::EntityDied), 1);
        assert_eq!(bus.subscriber_count(MessageKind::EntityReappeared), 1);
        assert_eq!(bus.subscriber_count(MessageKind::GameTimerStarted), 1);

        scheduler.unsubscribe(&bus);
        assert_eq!(bus.subscriber_count(MessageKind::EntityDied), 0);
        assert_eq!(bus.subscriber_count(MessageKind::GameTimerStarted), 0);
    }
}
