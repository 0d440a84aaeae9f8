//! Player versus other actors
//!
//! Overlaps between the player and any other live actor are dispatched on
//! the other actor's [`EntityKind`] through a resolver table. Kinds without a
//! resolver are ignored, so adding a new interaction means registering one
//! function.

use std::collections::HashMap;
use std::fmt;

use crate::core::CoreError;
use crate::ecs::components::{
    CollisionBoxComponent, EntityKind, MovementComponent, PlayerInputComponent, State, StateComponent, SuperState,
};
use crate::ecs::system::{System, SystemPhase, TickContext, WorkingSet};
use crate::ecs::{Entity, EntityRegistry};
use crate::events::Message;
use crate::foundation::math::Vec2;

/// Resolution for one player/actor overlap
pub type Resolver = fn(&mut TickContext<'_>, Entity, Entity) -> Result<(), CoreError>;

/// Upward kick given to a stomped enemy
const STOMPED_LIFT: f32 = -20.0;

/// Gravity applied to a stomped enemy while it plays its death
const STOMPED_GRAVITY: f32 = 100.0;

/// Resolves overlaps between players and other actors
pub struct ActorCollisionSystem {
    players: WorkingSet,
    actors: WorkingSet,
    resolvers: HashMap<EntityKind, Resolver>,
}

impl ActorCollisionSystem {
    /// Create the system with the built-in resolvers
    pub fn new() -> Self {
        let mut system = Self {
            players: WorkingSet::new(),
            actors: WorkingSet::new(),
            resolvers: HashMap::new(),
        };
        system.register(EntityKind::Coin, collect_coin);
        system.register(EntityKind::RegularEnemy, fight_enemy);
        system.register(EntityKind::PortalToNextLevel, enter_portal);
        system
    }

    /// Install or replace the resolver for `kind`
    pub fn register(&mut self, kind: EntityKind, resolver: Resolver) {
        self.resolvers.insert(kind, resolver);
    }

    fn is_blocked(registry: &EntityRegistry, entity: Entity) -> bool {
        !registry.is_active(entity)
            || registry
                .get::<StateComponent>(entity)
                .map_or(true, |state| matches!(state.super_state(), SuperState::Dead | SuperState::Appearing))
    }

    fn overlapping(registry: &EntityRegistry, player: Entity, actor: Entity) -> Result<bool, CoreError> {
        let player_box = registry.get::<CollisionBoxComponent>(player)?.bounds();
        let actor_box = registry.get::<CollisionBoxComponent>(actor)?.bounds();
        Ok(player_box.intersects(&actor_box))
    }

    fn encounter(&self, context: &mut TickContext<'_>, player: Entity, actor: Entity) -> Result<(), CoreError> {
        if !Self::overlapping(context.registry, player, actor)? {
            return Ok(());
        }
        let kind = *context.registry.get::<EntityKind>(actor)?;
        let Some(resolver) = self.resolvers.get(&kind) else {
            return Ok(());
        };
        log::debug!("{player:?} touched {kind:?} {actor:?}");
        resolver(context, player, actor)?;

        refresh_box(context.registry, player)?;
        refresh_box(context.registry, actor)
    }
}

impl fmt::Debug for ActorCollisionSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActorCollisionSystem")
            .field("players", &self.players)
            .field("actors", &self.actors)
            .field("resolvers", &self.resolvers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for ActorCollisionSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for ActorCollisionSystem {
    fn name(&self) -> &'static str {
        "actor_collision"
    }

    fn phase(&self) -> SystemPhase {
        SystemPhase::Physics
    }

    fn add_entity(&mut self, entity: Entity, registry: &EntityRegistry) {
        let collidable = registry.has::<CollisionBoxComponent>(entity)
            && registry.has::<StateComponent>(entity)
            && registry.has::<MovementComponent>(entity);
        if !collidable {
            return;
        }
        if registry.has::<PlayerInputComponent>(entity) {
            self.players.insert(entity);
        } else if registry.has::<EntityKind>(entity) {
            self.actors.insert(entity);
        }
    }

    fn remove_entity(&mut self, entity: Entity) {
        self.players.remove(entity);
        self.actors.remove(entity);
    }

    fn tick(&mut self, context: &mut TickContext<'_>, _delta_time: f32) {
        for player in self.players.snapshot() {
            for actor in self.actors.snapshot() {
                if Self::is_blocked(context.registry, player) {
                    break;
                }
                if Self::is_blocked(context.registry, actor) {
                    continue;
                }
                if let Err(error) = self.encounter(context, player, actor) {
                    log::warn!("{}: skipping {player:?}/{actor:?}: {error}", self.name());
                }
            }
        }
    }
}

fn refresh_box(registry: &mut EntityRegistry, entity: Entity) -> Result<(), CoreError> {
    let position = registry.get::<MovementComponent>(entity)?.position();
    let direction = registry.get::<StateComponent>(entity)?.horizontal_direction;
    registry
        .get_mut::<CollisionBoxComponent>(entity)?
        .update_position(position, direction);
    Ok(())
}

/// The coin is collected
fn collect_coin(context: &mut TickContext<'_>, _player: Entity, coin: Entity) -> Result<(), CoreError> {
    context
        .registry
        .get_mut::<StateComponent>(coin)?
        .set_super_state(SuperState::Dead);
    context.bus.publish(&Message::EntityDied(coin));
    Ok(())
}

/// The level is finished
fn enter_portal(context: &mut TickContext<'_>, _player: Entity, _portal: Entity) -> Result<(), CoreError> {
    context.bus.publish(&Message::NextLevel);
    Ok(())
}

/// A falling player landing on top of the enemy stomps it; any other touch kills the player
fn fight_enemy(context: &mut TickContext<'_>, player: Entity, enemy: Entity) -> Result<(), CoreError> {
    let physics = &context.config.physics;
    let registry = &mut *context.registry;

    let enemy_top = registry.get::<CollisionBoxComponent>(enemy)?.bounds().top();
    let (height, bottom_offset) = {
        let collision_box = registry.get::<CollisionBoxComponent>(player)?;
        (collision_box.original_height() as f32, collision_box.offsets().bottom as f32)
    };
    let falling = registry.get::<StateComponent>(player)?.super_state() == SuperState::Falling;
    let trailing_bottom = registry.get::<MovementComponent>(player)?.last_position().y + height - bottom_offset;

    if falling && trailing_bottom <= (enemy_top + 1) as f32 {
        let enemy_movement = registry.get_mut::<MovementComponent>(enemy)?;
        enemy_movement.velocity = Vec2::new(0.0, STOMPED_LIFT);
        enemy_movement.acceleration = Vec2::new(0.0, STOMPED_GRAVITY);
        let enemy_state = registry.get_mut::<StateComponent>(enemy)?;
        enemy_state.set_super_state(SuperState::Dead);
        enemy_state.set_state(State::Idle);

        let player_state = registry.get_mut::<StateComponent>(player)?;
        let direction = player_state.horizontal_direction as f32;
        player_state.set_super_state(SuperState::Jumping);
        player_state.set_state(State::Idle);
        player_state.jumps_performed = 1;

        let player_movement = registry.get_mut::<MovementComponent>(player)?;
        let x = player_movement.position().x;
        player_movement.set_position(Vec2::new(x, enemy_top as f32 - height + bottom_offset - 0.1));
        player_movement.acceleration = Vec2::zeros();
        player_movement.velocity = Vec2::new(physics.stomp_bounce_x * direction, -physics.stomp_bounce_y);

        context.bus.publish(&Message::EntityDied(enemy));
    } else {
        let player_state = registry.get_mut::<StateComponent>(player)?;
        player_state.set_super_state(SuperState::Dead);
        player_state.set_state(State::Idle);

        let player_movement = registry.get_mut::<MovementComponent>(player)?;
        player_movement.velocity = Vec2::new(0.0, physics.jump_speed / 2.0);
        player_movement.acceleration = Vec2::new(0.0, physics.gravity / 2.0);

        context.bus.publish(&Message::EntityDied(player));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{GameConfig, ScreenConfig};
    use crate::ecs::components::BoxOffsets;
    use crate::events::{EventBus, Mailbox, MessageKind, SubscriptionSet};
    use crate::input::NoInput;
    use approx::assert_relative_eq;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Fixture {
        registry: EntityRegistry,
        bus: EventBus,
        died: Mailbox<Entity>,
        next_level: Rc<Cell<u32>>,
        _subscriptions: SubscriptionSet,
        system: ActorCollisionSystem,
    }

    impl Fixture {
        fn new() -> Self {
            let bus = EventBus::new();
            let died = Mailbox::new();
            let next_level = Rc::new(Cell::new(0));
            let mut subscriptions = SubscriptionSet::new();
            subscriptions.forward_entities(&bus, MessageKind::EntityDied, &died);
            let requests = Rc::clone(&next_level);
            subscriptions.subscribe(&bus, MessageKind::NextLevel, move |_| requests.set(requests.get() + 1));
            Self {
                registry: EntityRegistry::new(),
                bus,
                died,
                next_level,
                _subscriptions: subscriptions,
                system: ActorCollisionSystem::new(),
            }
        }

        fn spawn(&mut self, kind: Option<EntityKind>, from: Vec2, to: Vec2, super_state: SuperState) -> Entity {
            let mut movement = MovementComponent::new(from);
            movement.set_position(to);
            let mut collision_box =
                CollisionBoxComponent::new(32, 32, BoxOffsets::new(8, 0, 4, 6), &ScreenConfig::default());
            collision_box.update_position(to, 1);

            let entity = self.registry.spawn(true);
            self.registry.add(entity, movement).unwrap();
            self.registry.add(entity, collision_box).unwrap();
            self.registry
                .add(entity, StateComponent::with_current(State::Idle, SuperState::Falling, State::Idle, super_state))
                .unwrap();
            match kind {
                Some(kind) => self.registry.add(entity, kind).unwrap(),
                None => self.registry.add(entity, PlayerInputComponent::default()).unwrap(),
            }
            self.system.add_entity(entity, &self.registry);
            entity
        }

        fn run(&mut self) {
            let config = GameConfig::default();
            let mut context = TickContext {
                registry: &mut self.registry,
                bus: &self.bus,
                input: &NoInput,
                config: &config,
            };
            self.system.tick(&mut context, 1.0 / 60.0);
        }

        fn super_state(&self, entity: Entity) -> SuperState {
            self.registry.get::<StateComponent>(entity).unwrap().super_state()
        }
    }

    #[test]
    fn test_coin_dies_once() {
        let mut fixture = Fixture::new();
        let player = fixture.spawn(None, Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0), SuperState::OnGround);
        let coin = fixture.spawn(
            Some(EntityKind::Coin),
            Vec2::new(110.0, 100.0),
            Vec2::new(110.0, 100.0),
            SuperState::OnGround,
        );

        fixture.run();
        fixture.run();
        assert_eq!(fixture.super_state(coin), SuperState::Dead);
        assert_eq!(fixture.died.drain(), vec![coin]);
        assert_eq!(fixture.super_state(player), SuperState::OnGround);
    }

    #[test]
    fn test_portal_requests_next_level() {
        let mut fixture = Fixture::new();
        fixture.spawn(None, Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0), SuperState::OnGround);
        fixture.spawn(
            Some(EntityKind::PortalToNextLevel),
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 100.0),
            SuperState::OnGround,
        );

        fixture.run();
        assert_eq!(fixture.next_level.get(), 1);
    }

    #[test]
    fn test_stomp_kills_enemy_and_bounces_player() {
        let mut fixture = Fixture::new();
        let player = fixture.spawn(None, Vec2::new(100.0, 70.0), Vec2::new(100.0, 80.0), SuperState::Falling);
        let enemy = fixture.spawn(
            Some(EntityKind::RegularEnemy),
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 100.0),
            SuperState::OnGround,
        );

        fixture.run();
        assert_eq!(fixture.super_state(enemy), SuperState::Dead);
        assert_eq!(fixture.died.drain(), vec![enemy]);

        let state = fixture.registry.get::<StateComponent>(player).unwrap();
        assert_eq!(state.super_state(), SuperState::Jumping);
        assert_eq!(state.jumps_performed, 1);
        let movement = fixture.registry.get::<MovementComponent>(player).unwrap();
        assert_relative_eq!(movement.position().y, 75.9, epsilon = 1e-4);
        assert_relative_eq!(movement.velocity.x, -50.0);
        assert_relative_eq!(movement.velocity.y, -300.0);

        let enemy_movement = fixture.registry.get::<MovementComponent>(enemy).unwrap();
        assert_relative_eq!(enemy_movement.velocity.y, STOMPED_LIFT);
    }

    #[test]
    fn test_side_touch_kills_player() {
        let mut fixture = Fixture::new();
        let player = fixture.spawn(None, Vec2::new(90.0, 100.0), Vec2::new(95.0, 100.0), SuperState::OnGround);
        let enemy = fixture.spawn(
            Some(EntityKind::RegularEnemy),
            Vec2::new(110.0, 100.0),
            Vec2::new(110.0, 100.0),
            SuperState::OnGround,
        );

        fixture.run();
        assert_eq!(fixture.super_state(player), SuperState::Dead);
        assert_eq!(fixture.super_state(enemy), SuperState::OnGround);
        assert_eq!(fixture.died.drain(), vec![player]);
        let movement = fixture.registry.get::<MovementComponent>(player).unwrap();
        assert_relative_eq!(movement.velocity.y, -250.0);
        assert_relative_eq!(movement.acceleration.y, 1000.0);
    }

    #[test]
    fn test_dead_player_stops_checks() {
        let mut fixture = Fixture::new();
        fixture.spawn(None, Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0), SuperState::Dead);
        let coin = fixture.spawn(
            Some(EntityKind::Coin),
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 100.0),
            SuperState::OnGround,
        );

        fixture.run();
        assert_eq!(fixture.super_state(coin), SuperState::OnGround);
        assert!(fixture.died.is_empty());
    }

    #[test]
    fn test_custom_resolver() {
        fn ignore(_: &mut TickContext<'_>, _: Entity, _: Entity) -> Result<(), CoreError> {
            Ok(())
        }
        let mut fixture = Fixture::new();
        fixture.system.register(EntityKind::Coin, ignore);
        fixture.spawn(None, Vec2::new(100.0, 100.0), Vec2::new(100.0, 100.0), SuperState::OnGround);
        let coin = fixture.spawn(
            Some(EntityKind::Coin),
            Vec2::new(100.0, 100.0),
            Vec2::new(100.0, 100.0),
            SuperState::OnGround,
        );

        fixture.run();
        assert_eq!(fixture.super_state(coin), SuperState::OnGround);
    }
}
