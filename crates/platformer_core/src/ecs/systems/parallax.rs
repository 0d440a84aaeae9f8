//! Scrolling backgrounds

use crate::ecs::components::ParallaxComponent;
use crate::ecs::system::{System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::foundation::math::{truncate, Rect};
use crate::render::RenderSurface;

/// Scrolls and tiles background layers
#[derive(Debug, Default)]
pub struct ParallaxSystem {
    entities: WorkingSet,
}

impl ParallaxSystem {
    /// Create the system with an empty working set
    pub fn new() -> Self {
        Self::default()
    }
}

impl System for ParallaxSystem {
    fn name(&self) -> &'static str {
        "parallax"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Presentation
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        if registry.has::<ParallaxComponent>(entity) {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn tick(&mut self, context: &mut TickContext<'_>, delta_time: f32) {
        for entity in self.entities.iter() {
            if !context.registry.is_active(entity) {
                continue;
            }
            match context.registry.get_mut::<ParallaxComponent>(entity) {
                Ok(layer) => layer.scroll(delta_time),
                Err(error) => log::warn!("{}: {error}", self.name()),
            }
        }
    }

    fn draw(&self, registry: &EntityRegistry, surface: &mut dyn RenderSurface) {
        for entity in self.entities.iter().filter(|&entity| registry.is_active(entity)) {
            let Ok(layer) = registry.get::<ParallaxComponent>(entity) else {
                continue;
            };
            let size = layer.size();
            let source = Rect::new(0, 0, truncate(size.x), truncate(size.y));
            for position in layer.tile_positions() {
                surface.draw_sprite(layer.texture(), source, position, false);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameConfig;
    use crate::events::EventBus;
    use crate::foundation::math::Vec2;
    use crate::input::NoInput;
    use crate::render::{DrawCommand, RecordingSurface};

    #[test]
    fn test_scrolls_and_tiles_screen() {
        let mut registry = EntityRegistry::new();
        let background = registry.spawn(true);
        registry
            .add(
                background,
                ParallaxComponent::new("Sky", (64, 64), Vec2::new(-16.0, 0.0), Vec2::zeros(), (128, 64)),
            )
            .unwrap();
        let mut system = ParallaxSystem::new();
        system.add_entity(background, &registry);

        let bus = EventBus::new();
        let config = GameConfig::default();
        let mut context = TickContext {
            registry: &mut registry,
            bus: &bus,
            input: &NoInput,
            config: &config,
        };
        system.tick(&mut context, 0.5);
        assert_eq!(registry.get::<ParallaxComponent>(background).unwrap().position(), Vec2::new(-8.0, 0.0));

        let mut surface = RecordingSurface::new();
        system.draw(&registry, &mut surface);
        let (tiles_x, tiles_y) = registry.get::<ParallaxComponent>(background).unwrap().tile_counts();
        assert_eq!(surface.commands().len(), ((tiles_x + 1) * (tiles_y + 1)) as usize);
        assert!(surface.commands().iter().all(|command| matches!(
            command,
            DrawCommand::Sprite { texture, source, .. } if texture == "Sky" && *source == Rect::new(0, 0, 64, 64)
        )));
    }
}
