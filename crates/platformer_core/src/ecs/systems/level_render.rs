//! Level tile layers

use crate::ecs::system::{System, SystemPhase, TickContext};
use crate::ecs::{Entity, EntityRegistry};
use crate::render::RenderSurface;

/// Asks the surface to draw the current level's tiles
#[derive(Debug, Clone)]
pub struct LevelRenderSystem {
    level: String,
}

impl LevelRenderSystem {
    /// Create the system for `level`
    pub fn new(level: impl Into<String>) -> Self {
        Self { level: level.into() }
    }

    /// Level being drawn
    pub fn level(&self) -> &str {
        &self.level
    }
}

impl System for LevelRenderSystem {
    fn name(&self) -> &'static str {
        "level_render"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Presentation
    }

    fn add_entity(&mut self, _entity: Entity, _registry: &EntityRegistry) {}

    fn remove_entity(&mut self, _entity: Entity) {}

    fn tick(&mut self, _context: &mut TickContext<'_>, _delta_time: f32) {}

    fn draw(&self, _registry: &EntityRegistry, surface: &mut dyn RenderSurface) {
        surface.draw_level(&self.level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{DrawCommand, RecordingSurface};

    #[test]
    fn test_draws_its_level() {
        let system = LevelRenderSystem::new("Level2");
        let mut surface = RecordingSurface::new();
        system.draw(&EntityRegistry::new(), &mut surface);
        assert_eq!(surface.commands(), &[DrawCommand::Level("Level2".to_string())]);
    }
}
