//! Level countdown
//!
//! The most recently announced timer entity is the level clock. While it is
//! active it counts down, and the level ends once when it reaches zero.

use crate::ecs::components::TimerComponent;
use crate::ecs::system::{System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::events::{EventBus, Mailbox, Message, MessageKind, SubscriptionSet};
use crate::render::RenderSurface;

/// Counts down and draws the level clock
#[derive(Debug, Default)]
pub struct TimerSystem {
    eligible: WorkingSet,
    clock: Option<Entity>,
    started: Mailbox<Entity>,
    subscriptions: SubscriptionSet,
}

impl TimerSystem {
    /// Create the system without a clock
    pub fn new() -> Self {
        Self::default()
    }

    /// Timer entity currently used as the level clock
    pub const fn clock(&self) -> Option<Entity> {
        self.clock
    }
}

impl System for TimerSystem {
    fn name(&self) -> &'static str {
        "timer"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Presentation
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        if registry.has::<TimerComponent>(entity) {
            self.eligible.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.eligible.remove(entity);
        if self.clock == Some(entity) {
            self.clock = None;
        }
    }

    fn subscribe(&mut self, bus: &EventBus) {
        self.subscriptions
            .forward_entities(bus, MessageKind::GameTimerStarted, &self.started);
    }

    fn unsubscribe(&mut self, bus: &EventBus) {
        self.subscriptions.revoke_all(bus);
        self.started.clear();
    }

    fn tick(&mut self, context: &mut TickContext<'_>, delta_time: f32) {
        for entity in self.started.drain() {
            if self.eligible.contains(entity) {
                self.clock = Some(entity);
            }
        }

        let Some(clock) = self.clock else {
            return;
        };
        if !context.registry.is_active(clock) {
            return;
        }
        match context.registry.get_mut::<TimerComponent>(clock) {
            Ok(timer) => {
                if timer.advance(delta_time) {
                    log::info!("level timer expired");
                    context.bus.publish(&Message::NextLevel);
                }
            }
            Err(error) => log::warn!("{}: {error}", self.name()),
        }
    }

    fn draw(&self, registry: &EntityRegistry, surface: &mut dyn RenderSurface) {
        let Some(clock) = self.clock.filter(|&clock| registry.is_active(clock)) else {
            return;
        };
        if let Ok(timer) = registry.get::<TimerComponent>(clock) {
            surface.draw_text(&timer.label(), timer.position());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::foundation::math::Vec2;
    use crate::input::NoInput;
    use crate::render::{DrawCommand, RecordingSurface};
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_counts_down_and_fires_once() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let fired = Rc::new(Cell::new(0));
        let counter = Rc::clone(&fired);
        bus.subscribe(MessageKind::NextLevel, move |_| counter.set(counter.get() + 1));

        let mut system = TimerSystem::new();
        system.subscribe(&bus);
        let timer = registry.spawn(true);
        registry.add(timer, TimerComponent::new(1.0, Vec2::new(600.0, 8.0))).unwrap();
        bus.publish(&Message::GameTimerStarted(timer));
        system.add_entity(timer, &registry);

        let config = GameConfig::default();
        for _ in 0..4 {
            let mut context = TickContext {
                registry: &mut registry,
                bus: &bus,
                input: &NoInput,
                config: &config,
            };
            system.tick(&mut context, 0.5);
        }
        assert_eq!(system.clock(), Some(timer));
        assert_eq!(fired.get(), 1);

        let mut surface = RecordingSurface::new();
        system.draw(&registry, &mut surface);
        assert_eq!(
            surface.commands(),
            &[DrawCommand::Text {
                text: "00:00".to_string(),
                position: Vec2::new(600.0, 8.0),
            }]
        );
    }

    #[test]
    fn test_inactive_timer_is_frozen() {
        let mut registry = EntityRegistry::new();
        let bus = EventBus::new();
        let mut system = TimerSystem::new();
        system.subscribe(&bus);
        let timer = registry.spawn(false);
        registry.add(timer, TimerComponent::new(1.0, Vec2::zeros())).unwrap();
        bus.publish(&Message::GameTimerStarted(timer));
        system.add_entity(timer, &registry);

        let config = GameConfig::default();
        let mut context = TickContext {
            registry: &mut registry,
            bus: &bus,
            input: &NoInput,
            config: &config,
        };
        system.tick(&mut context, 5.0);
        assert_eq!(registry.get::<TimerComponent>(timer).unwrap().remaining(), 1.0);
    }
}
