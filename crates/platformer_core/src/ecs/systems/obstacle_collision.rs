//! Character versus level geometry
//!
//! Each tick the hitbox of every character is tested against the obstacle
//! rectangles of the current level. The hitbox is captured once before the
//! rectangles are visited, while the super-state is re-read per rectangle, so
//! a landing on one rectangle changes how the next one is resolved.
//!
//! Layers are visited in configured order (solid before float); any other
//! layer a level defines is visited afterwards and treated as solid. Float
//! platforms can be jumped through from below and never block sideways.

use crate::assets::ObstacleLayers;
use crate::core::LevelConfig;
use crate::ecs::component::ComponentKind;
use crate::ecs::components::{CollisionBoxComponent, MovementComponent, State, StateComponent, SuperState};
use crate::ecs::system::{warn_missing, System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::foundation::math::{Rect, Vec2};

/// Gap left between a resolved character and the surface it touches
const CONTACT_GAP: f32 = 0.1;

/// Resolves characters against static obstacles
#[derive(Debug)]
pub struct ObstacleCollisionSystem {
    entities: WorkingSet,
    layers: Vec<(String, Vec<Rect>)>,
    float_layer: String,
}

impl ObstacleCollisionSystem {
    /// Create the system for one level's obstacles
    pub fn new(mut obstacles: ObstacleLayers, levels: &LevelConfig) -> Self {
        let mut layers = Vec::with_capacity(obstacles.len());
        for name in levels.obstacle_layers() {
            if let Some(rects) = obstacles.remove(name) {
                layers.push((name.to_string(), rects));
            }
        }
        layers.extend(obstacles);

        log::debug!(
            "obstacle layers: {:?}",
            layers.iter().map(|(name, rects)| (name.as_str(), rects.len())).collect::<Vec<_>>()
        );
        Self {
            entities: WorkingSet::new(),
            layers,
            float_layer: levels.float_layer.clone(),
        }
    }

    /// Number of obstacle rectangles across all layers
    pub fn obstacle_count(&self) -> usize {
        self.layers.iter().map(|(_, rects)| rects.len()).sum()
    }
}

impl System for ObstacleCollisionSystem {
    fn name(&self) -> &'static str {
        "obstacle_collision"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Physics
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        if registry.has::<StateComponent>(entity)
            && registry.has::<MovementComponent>(entity)
            && registry.has::<CollisionBoxComponent>(entity)
        {
            self.entities.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.entities.remove(entity);
    }

    fn tick(&mut self, context: &mut TickContext<'_>, _delta_time: f32) {
        for entity in self.entities.iter() {
            if !context.registry.is_active(entity) {
                continue;
            }
            let store = context.registry.components_mut();
            let Some(state) = store.state.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::State);
                continue;
            };
            if matches!(state.super_state(), SuperState::Appearing | SuperState::Dead) {
                continue;
            }
            let Some(movement) = store.movement.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::Movement);
                continue;
            };
            let Some(collision_box) = store.collision_box.get_mut(entity) else {
                warn_missing(self.name(), entity, ComponentKind::CollisionBox);
                continue;
            };

            let mut contact = Contact {
                hitbox: collision_box.bounds(),
                position: movement.position(),
                state,
                movement,
                collision_box,
            };
            contact.state.set_can_move_left(true);
            contact.state.set_can_move_right(true);

            let hitbox = contact.hitbox;
            for (layer, rects) in &self.layers {
                let floating = *layer == self.float_layer;
                for rect in rects.iter().filter(|rect| hitbox.intersects(rect)) {
                    contact.resolve(rect, floating);
                }
            }
            contact.finish();
        }
    }
}

/// One character being resolved against the obstacles it overlaps
struct Contact<'c> {
    hitbox: Rect,
    position: Vec2,
    state: &'c mut StateComponent,
    movement: &'c mut MovementComponent,
    collision_box: &'c mut CollisionBoxComponent,
}

impl Contact<'_> {
    fn resolve(&mut self, rect: &Rect, floating: bool) {
        match self.state.super_state() {
            SuperState::Falling => self.land(rect, floating),
            SuperState::OnGround => self.block_on_ground(rect),
            SuperState::Jumping | SuperState::DoubleJumping if !floating => self.bump_head(rect),
            _ => {}
        }
    }

    fn land(&mut self, rect: &Rect, floating: bool) {
        self.state.set_state(State::Idle);
        let height = self.collision_box.original_height() as f32;
        let bottom_offset = self.collision_box.offsets().bottom as f32;
        let trailing_bottom = self.movement.last_position().y + height - bottom_offset;

        if trailing_bottom <= (rect.top() + 1) as f32 {
            self.state.set_super_state(SuperState::OnGround);
            self.position.y = rect.top() as f32 - height + bottom_offset - CONTACT_GAP;
            self.collision_box.set_ground_location(rect.left(), rect.right());
        } else if !floating {
            self.hit_wall_in_air(rect);
        }
    }

    fn bump_head(&mut self, rect: &Rect) {
        let top_offset = self.collision_box.offsets().top as f32;
        let trailing_top = self.movement.last_position().y + top_offset;

        if trailing_top >= (rect.bottom() - 1) as f32 {
            self.position.y = rect.bottom() as f32 - top_offset + CONTACT_GAP;
            self.state.set_super_state(SuperState::Falling);
            self.movement.velocity = Vec2::zeros();
        } else {
            self.hit_wall_in_air(rect);
        }
    }

    fn block_on_ground(&mut self, rect: &Rect) {
        if self.state.state() == State::Slide {
            self.state.set_state(State::Idle);
        }
        let width = self.collision_box.original_width() as f32;
        let right_offset = self.collision_box.offsets().right as f32;

        if self.movement.velocity.x > 0.0 && self.hitbox.left() <= rect.left() {
            self.position.x = rect.left() as f32 - width + right_offset - CONTACT_GAP;
            self.state.set_can_move_right(false);
        }
        if self.movement.velocity.x < 0.0 && self.hitbox.right() >= rect.right() {
            self.position.x = rect.right() as f32 - right_offset + CONTACT_GAP;
            self.state.set_can_move_left(false);
        }
    }

    fn hit_wall_in_air(&mut self, rect: &Rect) {
        let width = self.collision_box.original_width() as f32;
        let right_offset = self.collision_box.offsets().right as f32;

        if self.movement.velocity.x > 0.0 && self.hitbox.left() <= rect.left() {
            self.position.x = rect.left() as f32 - width + right_offset;
            self.state.set_can_move_right(false);
            self.start_slide(rect);
        }
        if self.movement.velocity.x < 0.0 && self.hitbox.right() >= rect.right() {
            self.position.x = rect.right() as f32 - right_offset;
            self.state.set_can_move_left(false);
            self.start_slide(rect);
        }
    }

    fn start_slide(&mut self, rect: &Rect) {
        self.collision_box.set_sliding_location(rect.bottom());
        self.state.set_super_state(SuperState::Falling);
        self.movement.velocity = Vec2::zeros();
    }

    /// Commit the corrected position and leave ground or wall if it is gone
    fn finish(self) {
        let direction = self.state.horizontal_direction;
        self.movement.set_position(self.position);
        self.collision_box.update_position(self.position, direction);

        if self.state.super_state() == SuperState::OnGround
            && self.collision_box.is_off_ground(self.position.x, direction)
        {
            self.state.set_super_state(SuperState::Falling);
        }
        if self.state.state() == State::Slide && self.collision_box.is_below_slide_floor(self.position.y) {
            self.state.set_state(State::Idle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, ScreenConfig};
    use crate::ecs::components::BoxOffsets;
    use crate::events::EventBus;
    use crate::input::NoInput;
    use approx::assert_relative_eq;

    fn system_with(layers: &[(&str, Rect)]) -> ObstacleCollisionSystem {
        let mut obstacles = ObstacleLayers::new();
        for (name, rect) in layers {
            obstacles.entry((*name).to_string()).or_default().push(*rect);
        }
        ObstacleCollisionSystem::new(obstacles, &GameConfig::default().levels)
    }

    /// Character whose last position is `from` and current position is `to`
    fn spawn(registry: &mut EntityRegistry, from: Vec2, to: Vec2, super_state: SuperState) -> Entity {
        let mut movement = MovementComponent::new(from);
        movement.set_position(to);
        let mut collision_box =
            CollisionBoxComponent::new(32, 32, BoxOffsets::new(8, 0, 4, 6), &ScreenConfig::default());
        collision_box.update_position(to, 1);

        let entity = registry.spawn(true);
        registry.add(entity, movement).unwrap();
        registry.add(entity, collision_box).unwrap();
        registry
            .add(entity, StateComponent::with_current(State::Idle, SuperState::Falling, State::Idle, super_state))
            .unwrap();
        entity
    }

    fn run(system: &mut ObstacleCollisionSystem, registry: &mut EntityRegistry) {
        let bus = EventBus::new();
        let config = GameConfig::default();
        let mut context = TickContext {
            registry,
            bus: &bus,
            input: &NoInput,
            config: &config,
        };
        system.tick(&mut context, 1.0 / 60.0);
    }

    #[test]
    fn test_layer_order() {
        let system = system_with(&[
            ("decor", Rect::new(0, 0, 1, 1)),
            ("float", Rect::new(0, 0, 1, 1)),
            ("solid", Rect::new(0, 0, 1, 1)),
        ]);
        let names: Vec<_> = system.layers.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["solid", "float", "decor"]);
        assert_eq!(system.obstacle_count(), 3);
    }

    #[test]
    fn test_landing_snaps_onto_platform() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(100.0, 90.0), Vec2::new(100.0, 100.0), SuperState::Falling);
        let mut system = system_with(&[("solid", Rect::new(0, 128, 640, 32))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        assert_relative_eq!(registry.get::<MovementComponent>(player).unwrap().position().y, 95.9, epsilon = 1e-4);
        let state = registry.get::<StateComponent>(player).unwrap();
        assert_eq!(state.super_state(), SuperState::OnGround);
        assert_eq!(state.state(), State::Idle);
        assert_eq!(registry.get::<CollisionBoxComponent>(player).unwrap().ground_span(), (0, 640));
    }

    #[test]
    fn test_resting_is_idempotent() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(100.0, 90.0), Vec2::new(100.0, 100.0), SuperState::Falling);
        let mut system = system_with(&[("solid", Rect::new(0, 128, 640, 32))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        let settled = registry.get::<MovementComponent>(player).unwrap().position();
        run(&mut system, &mut registry);
        run(&mut system, &mut registry);

        assert_eq!(registry.get::<MovementComponent>(player).unwrap().position(), settled);
        assert_eq!(registry.get::<StateComponent>(player).unwrap().super_state(), SuperState::OnGround);
    }

    #[test]
    fn test_wall_hit_in_air_starts_slide() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(98.0, 100.0), Vec2::new(100.0, 100.0), SuperState::Falling);
        registry.get_mut::<MovementComponent>(player).unwrap().velocity = Vec2::new(100.0, 50.0);
        let mut system = system_with(&[("solid", Rect::new(120, 0, 32, 368))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        let movement = registry.get::<MovementComponent>(player).unwrap();
        assert_relative_eq!(movement.position().x, 94.0);
        assert_eq!(movement.velocity, Vec2::zeros());
        let state = registry.get::<StateComponent>(player).unwrap();
        assert_eq!(state.state(), State::Slide);
        assert_eq!(state.super_state(), SuperState::Falling);
        assert!(!state.can_move_right());
        assert_eq!(registry.get::<CollisionBoxComponent>(player).unwrap().ground_bottom(), 368);
    }

    #[test]
    fn test_jump_into_wall_side_slides_instead_of_bumping() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(98.0, 100.0), Vec2::new(100.0, 100.0), SuperState::Jumping);
        registry.get_mut::<MovementComponent>(player).unwrap().velocity = Vec2::new(100.0, -50.0);
        let mut system = system_with(&[("solid", Rect::new(120, 0, 32, 368))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        let movement = registry.get::<MovementComponent>(player).unwrap();
        assert_relative_eq!(movement.position().x, 94.0);
        assert_relative_eq!(movement.position().y, 100.0);
        assert_eq!(movement.velocity, Vec2::zeros());
        let state = registry.get::<StateComponent>(player).unwrap();
        assert_eq!(state.state(), State::Slide);
        assert_eq!(state.super_state(), SuperState::Falling);
        assert!(!state.can_move_right());
        assert_eq!(registry.get::<CollisionBoxComponent>(player).unwrap().ground_bottom(), 368);
    }

    #[test]
    fn test_wall_hit_moving_left_snaps_to_right_edge() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(102.0, 100.0), Vec2::new(100.0, 100.0), SuperState::Falling);
        registry.get_mut::<MovementComponent>(player).unwrap().velocity = Vec2::new(-100.0, 50.0);
        registry.get_mut::<StateComponent>(player).unwrap().horizontal_direction = -1;
        registry
            .get_mut::<CollisionBoxComponent>(player)
            .unwrap()
            .update_position(Vec2::new(100.0, 100.0), -1);
        let mut system = system_with(&[("solid", Rect::new(80, 0, 30, 368))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        let movement = registry.get::<MovementComponent>(player).unwrap();
        assert_relative_eq!(movement.position().x, 104.0);
        assert_eq!(movement.velocity, Vec2::zeros());
        let state = registry.get::<StateComponent>(player).unwrap();
        assert_eq!(state.state(), State::Slide);
        assert_eq!(state.super_state(), SuperState::Falling);
        assert!(!state.can_move_left());
        assert!(state.can_move_right());
        assert_eq!(state.horizontal_direction, -1);
        assert_eq!(registry.get::<CollisionBoxComponent>(player).unwrap().bounds().left(), 110);
    }

    #[test]
    fn test_falling_beside_float_platform_is_not_stopped() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(98.0, 100.0), Vec2::new(100.0, 100.0), SuperState::Falling);
        registry.get_mut::<MovementComponent>(player).unwrap().velocity = Vec2::new(100.0, 50.0);
        let mut system = system_with(&[("float", Rect::new(110, 110, 96, 8))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        let movement = registry.get::<MovementComponent>(player).unwrap();
        assert_relative_eq!(movement.position().x, 100.0);
        assert_relative_eq!(movement.position().y, 100.0);
        assert_eq!(movement.velocity, Vec2::new(100.0, 50.0));
        let state = registry.get::<StateComponent>(player).unwrap();
        assert_eq!(state.super_state(), SuperState::Falling);
        assert_ne!(state.state(), State::Slide);
        assert!(state.can_move_right());
        assert!(state.can_move_left());
    }

    #[test]
    fn test_head_bump_starts_fall() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(100.0, 50.0), Vec2::new(100.0, 40.0), SuperState::Jumping);
        registry.get_mut::<MovementComponent>(player).unwrap().velocity = Vec2::new(0.0, -400.0);
        let mut system = system_with(&[("solid", Rect::new(0, 0, 640, 50))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        let movement = registry.get::<MovementComponent>(player).unwrap();
        assert_relative_eq!(movement.position().y, 42.1, epsilon = 1e-4);
        assert_eq!(movement.velocity, Vec2::zeros());
        assert_eq!(registry.get::<StateComponent>(player).unwrap().super_state(), SuperState::Falling);
    }

    #[test]
    fn test_float_platform_passes_jumps() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(100.0, 50.0), Vec2::new(100.0, 40.0), SuperState::Jumping);
        let mut system = system_with(&[("float", Rect::new(0, 0, 640, 50))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        assert_relative_eq!(registry.get::<MovementComponent>(player).unwrap().position().y, 40.0);
        assert_eq!(registry.get::<StateComponent>(player).unwrap().super_state(), SuperState::Jumping);
    }

    #[test]
    fn test_grounded_walk_into_wall_is_blocked() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(98.0, 95.9), Vec2::new(100.0, 95.9), SuperState::OnGround);
        registry.get_mut::<MovementComponent>(player).unwrap().velocity = Vec2::new(100.0, 0.0);
        let mut system = system_with(&[("solid", Rect::new(120, 90, 32, 40))]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        assert_relative_eq!(registry.get::<MovementComponent>(player).unwrap().position().x, 93.9, epsilon = 1e-4);
        assert!(!registry.get::<StateComponent>(player).unwrap().can_move_right());
    }

    #[test]
    fn test_walking_off_platform_starts_fall() {
        let mut registry = EntityRegistry::new();
        let player = spawn(&mut registry, Vec2::new(100.0, 95.9), Vec2::new(100.0, 95.9), SuperState::OnGround);
        registry
            .get_mut::<CollisionBoxComponent>(player)
            .unwrap()
            .set_ground_location(0, 64);
        let mut system = system_with(&[]);
        system.add_entity(player, &registry);

        run(&mut system, &mut registry);
        assert_eq!(registry.get::<StateComponent>(player).unwrap().super_state(), SuperState::Falling);
    }
}
