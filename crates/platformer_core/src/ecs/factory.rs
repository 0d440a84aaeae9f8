//! Entity factory
//!
//! The only sanctioned way to introduce entities. Each constructor assembles
//! a component set in the registry and announces it with
//! [`Message::EntityAdded`]; systems only see the entity once the world has
//! drained that message at the start of the next tick.

use crate::assets::TextureSource;
use crate::core::{CoreError, GameConfig};
use crate::ecs::components::{
    AnimationComponent, AnimationId, BoxOffsets, CollisionBoxComponent, EnemyPatrolComponent, EntityKind,
    FrameStrip, MovementComponent, ParallaxComponent, PlayerInputComponent, RespawnComponent, State,
    StateComponent, SuperState, TimerComponent,
};
use crate::ecs::{Entity, EntityRegistry};
use crate::events::{EventBus, Message};
use crate::foundation::math::Vec2;

/// Sprite cell size shared by every character sheet
const CELL: i32 = 32;

/// Player and enemy hitbox trim
const CHARACTER_OFFSETS: BoxOffsets = BoxOffsets::new(8, 0, 4, 6);

/// Fruit hitbox trim
const FRUIT_OFFSETS: BoxOffsets = BoxOffsets::new(7, 11, 10, 10);

/// Sprite sheet keys
pub mod textures {
    /// Player idle strip
    pub const PLAYER_IDLE: &str = "PlayerIdle";
    /// Player walk strip
    pub const PLAYER_WALK: &str = "PlayerWalk";
    /// Player jump frame
    pub const PLAYER_JUMP: &str = "PlayerJump";
    /// Player double jump strip
    pub const PLAYER_DOUBLE_JUMP: &str = "PlayerDoubleJump";
    /// Player fall frame
    pub const PLAYER_FALL: &str = "PlayerFall";
    /// Player wall slide strip
    pub const PLAYER_SLIDE: &str = "PlayerSlide";
    /// Player hit strip
    pub const PLAYER_HIT: &str = "PlayerHit";
    /// Sparkle shared by appear and collect effects
    pub const COLLECTED: &str = "Collected";
    /// Enemy walk strip
    pub const ENEMY_WALK: &str = "MaskedWalk";
    /// Enemy hit strip
    pub const ENEMY_HIT: &str = "MaskedHit";
    /// Level exit
    pub const PORTAL: &str = "Portal";
}

/// Start `animation` on the strip matching the initial state
fn synced(mut animation: AnimationComponent, state: &StateComponent) -> AnimationComponent {
    animation.set_current_action(state.animation());
    animation
}

/// Assembles entities into a registry and announces them on a bus
pub struct EntityFactory<'a> {
    registry: &'a mut EntityRegistry,
    bus: &'a EventBus,
    config: &'a GameConfig,
}

impl<'a> EntityFactory<'a> {
    /// Create a factory writing into `registry`
    pub fn new(registry: &'a mut EntityRegistry, bus: &'a EventBus, config: &'a GameConfig) -> Self {
        Self { registry, bus, config }
    }

    fn strip(&self, texture: &str, rows: u32, columns: u32) -> FrameStrip {
        FrameStrip::new(texture, rows, columns, self.config.animation.frames_per_second)
    }

    fn collision_box(&self, offsets: BoxOffsets, position: Vec2, direction: i32) -> CollisionBoxComponent {
        let mut collision_box = CollisionBoxComponent::new(CELL, CELL, offsets, &self.config.screen);
        collision_box.update_position(position, direction);
        collision_box
    }

    /// Spawn an entity, let `build` attach its components and announce it
    ///
    /// A failed build despawns the entity again; nothing is announced.
    fn assemble(
        &mut self,
        kind: &str,
        active: bool,
        build: impl FnOnce(&mut EntityRegistry, Entity) -> Result<(), CoreError>,
    ) -> Result<Entity, CoreError> {
        let entity = self.registry.spawn(active);
        if let Err(error) = build(&mut *self.registry, entity) {
            log::warn!("discarding partly built {kind} {entity:?}: {error}");
            self.registry.despawn(entity);
            return Err(error);
        }
        log::debug!("created {kind} {entity:?}");
        self.bus.publish(&Message::EntityAdded(entity));
        Ok(entity)
    }

    /// Controlled character, appearing at `position`
    pub fn create_player(&mut self, position: Vec2) -> Result<Entity, CoreError> {
        use textures::{COLLECTED, PLAYER_DOUBLE_JUMP, PLAYER_FALL, PLAYER_HIT, PLAYER_IDLE, PLAYER_JUMP, PLAYER_SLIDE, PLAYER_WALK};

        let animation = AnimationComponent::new(AnimationId::Idle)
            .with_strip(AnimationId::Idle, self.strip(PLAYER_IDLE, 1, 11))
            .with_strip(AnimationId::Walk, self.strip(PLAYER_WALK, 1, 12))
            .with_strip(AnimationId::Jump, self.strip(PLAYER_JUMP, 1, 1))
            .with_strip(AnimationId::DoubleJump, self.strip(PLAYER_DOUBLE_JUMP, 1, 6))
            .with_strip(AnimationId::Fall, self.strip(PLAYER_FALL, 1, 1))
            .with_strip(AnimationId::Slide, self.strip(PLAYER_SLIDE, 1, 5))
            .with_strip(AnimationId::Death, self.strip(PLAYER_HIT, 1, 7))
            .with_strip(AnimationId::Appear, self.strip(COLLECTED, 1, 6));
        let collision_box = self.collision_box(CHARACTER_OFFSETS, position, 1);

        let state = StateComponent::default();

        self.assemble("player", true, |registry, entity| {
            registry.add(entity, EntityKind::Player)?;
            registry.add(entity, synced(animation, &state))?;
            registry.add(entity, state)?;
            registry.add(entity, PlayerInputComponent::default())?;
            registry.add(entity, MovementComponent::new(position))?;
            registry.add(entity, collision_box)
        })
    }

    /// Collectible that respawns after the configured delay
    pub fn create_fruit(&mut self, position: Vec2, texture: &str) -> Result<Entity, CoreError> {
        let animation = AnimationComponent::new(AnimationId::Idle)
            .with_strip(AnimationId::Idle, self.strip(texture, 1, 17))
            .with_strip(AnimationId::Death, self.strip(textures::COLLECTED, 1, 6))
            .with_strip(AnimationId::Appear, self.strip(textures::COLLECTED, 1, 6));
        let collision_box = self.collision_box(FRUIT_OFFSETS, position, 1);

        let state = StateComponent::new(State::Idle, SuperState::OnGround);
        let respawn = RespawnComponent::new(position, self.config.levels.respawn_delay);

        self.assemble("fruit", true, |registry, entity| {
            registry.add(entity, EntityKind::Coin)?;
            registry.add(entity, synced(animation, &state))?;
            registry.add(entity, state)?;
            registry.add(entity, MovementComponent::new(position))?;
            registry.add(entity, collision_box)?;
            registry.add(entity, respawn)
        })
    }

    /// Enemy patrolling `left_range`/`right_range` around its start
    pub fn create_regular_enemy(
        &mut self,
        position: Vec2,
        faces_left: bool,
        left_range: f32,
        right_range: f32,
    ) -> Result<Entity, CoreError> {
        let animation = AnimationComponent::new(AnimationId::Walk)
            .with_strip(AnimationId::Walk, self.strip(textures::ENEMY_WALK, 1, 12))
            .with_strip(AnimationId::Death, self.strip(textures::ENEMY_HIT, 1, 7))
            .with_strip(AnimationId::Appear, self.strip(textures::COLLECTED, 1, 6));
        let heading = if faces_left { State::WalkLeft } else { State::WalkRight };
        let collision_box = self.collision_box(CHARACTER_OFFSETS, position, 1);

        let state = StateComponent::new(heading, SuperState::Falling);
        let respawn = RespawnComponent::new(position, self.config.levels.respawn_delay);

        self.assemble("regular enemy", true, |registry, entity| {
            registry.add(entity, EntityKind::RegularEnemy)?;
            registry.add(entity, synced(animation, &state))?;
            registry.add(entity, state)?;
            registry.add(entity, EnemyPatrolComponent::new(position.x, left_range, right_range))?;
            registry.add(entity, MovementComponent::new(position))?;
            registry.add(entity, collision_box)?;
            registry.add(entity, respawn)
        })
    }

    /// Exit that advances to the next level on touch
    pub fn create_portal(&mut self, position: Vec2) -> Result<Entity, CoreError> {
        let animation = AnimationComponent::new(AnimationId::Idle)
            .with_strip(AnimationId::Idle, self.strip(textures::PORTAL, 1, 1));
        let collision_box = self.collision_box(BoxOffsets::default(), position, 1);
        let state = StateComponent::with_current(State::Idle, SuperState::OnGround, State::Idle, SuperState::OnGround);

        self.assemble("portal", true, |registry, entity| {
            registry.add(entity, EntityKind::PortalToNextLevel)?;
            registry.add(entity, synced(animation, &state))?;
            registry.add(entity, state)?;
            registry.add(entity, MovementComponent::new(position))?;
            registry.add(entity, collision_box)
        })
    }

    /// Scrolling background covering the screen
    pub fn create_parallax_background(
        &mut self,
        textures: &dyn TextureSource,
        texture: &str,
        velocity: Vec2,
    ) -> Result<Entity, CoreError> {
        let size = textures.texture_size(texture)?;
        let view = (self.config.screen.width, self.config.screen.height);
        let layer = ParallaxComponent::new(texture, size, velocity, Vec2::zeros(), view);

        self.assemble("parallax background", true, |registry, entity| registry.add(entity, layer))
    }

    /// Level countdown; `duration` falls back to the configured default
    pub fn create_timer(&mut self, position: Vec2, duration: Option<f32>, active: bool) -> Result<Entity, CoreError> {
        let duration = duration.unwrap_or(self.config.levels.timer_duration);

        let entity = self.assemble("timer", active, |registry, entity| {
            registry.add(entity, TimerComponent::new(duration, position))
        })?;
        self.bus.publish(&Message::GameTimerStarted(entity));
        Ok(entity)
    }
}
