//! Component trait and the per-kind component columns
//!
//! Each component kind lives in its own dense `SecondaryMap` keyed by
//! [`Entity`]. The [`Component`] trait maps a Rust type to its column so the
//! registry can offer typed `add`/`get`/`remove` without boxing or runtime
//! type lookups.

use slotmap::SecondaryMap;

use crate::ecs::components::{
    AnimationComponent, CollisionBoxComponent, EnemyPatrolComponent, EntityKind, MovementComponent,
    ParallaxComponent, PlayerInputComponent, RespawnComponent, StateComponent, TimerComponent,
};
use crate::ecs::Entity;

/// Discriminant of every component kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    /// [`MovementComponent`]
    Movement,
    /// [`CollisionBoxComponent`]
    CollisionBox,
    /// [`StateComponent`]
    State,
    /// [`AnimationComponent`]
    Animation,
    /// [`PlayerInputComponent`]
    Input,
    /// [`EnemyPatrolComponent`]
    Patrol,
    /// [`RespawnComponent`]
    Respawn,
    /// [`EntityKind`]
    Kind,
    /// [`ParallaxComponent`]
    Parallax,
    /// [`TimerComponent`]
    Timer,
}

/// Typed access to one component column
pub trait Component: Clone + Sized + 'static {
    /// Kind tag used in diagnostics and errors
    const KIND: ComponentKind;

    /// Column holding every instance of this kind
    fn column(store: &ComponentStore) -> &SecondaryMap<Entity, Self>;

    /// Mutable column holding every instance of this kind
    fn column_mut(store: &mut ComponentStore) -> &mut SecondaryMap<Entity, Self>;
}

/// Owned copy of one component, tagged by kind
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentSnapshot {
    /// Movement
    Movement(MovementComponent),
    /// Collision box
    CollisionBox(CollisionBoxComponent),
    /// State machine
    State(StateComponent),
    /// Animation strips
    Animation(AnimationComponent),
    /// Player input
    Input(PlayerInputComponent),
    /// Enemy patrol
    Patrol(EnemyPatrolComponent),
    /// Respawn point
    Respawn(RespawnComponent),
    /// Entity kind tag
    Kind(EntityKind),
    /// Parallax layer
    Parallax(ParallaxComponent),
    /// Level timer
    Timer(TimerComponent),
}

impl ComponentSnapshot {
    /// Kind of the wrapped component
    pub const fn kind(&self) -> ComponentKind {
        match self {
            Self::Movement(_) => ComponentKind::Movement,
            Self::CollisionBox(_) => ComponentKind::CollisionBox,
            Self::State(_) => ComponentKind::State,
            Self::Animation(_) => ComponentKind::Animation,
            Self::Input(_) => ComponentKind::Input,
            Self::Patrol(_) => ComponentKind::Patrol,
            Self::Respawn(_) => ComponentKind::Respawn,
            Self::Kind(_) => ComponentKind::Kind,
            Self::Parallax(_) => ComponentKind::Parallax,
            Self::Timer(_) => ComponentKind::Timer,
        }
    }
}

/// Column-per-kind component storage
///
/// Fields are public so a system can borrow several columns of one entity
/// mutably at the same time.
#[derive(Debug, Default)]
pub struct ComponentStore {
    /// Movement column
    pub movement: SecondaryMap<Entity, MovementComponent>,
    /// Collision box column
    pub collision_box: SecondaryMap<Entity, CollisionBoxComponent>,
    /// State machine column
    pub state: SecondaryMap<Entity, StateComponent>,
    /// Animation column
    pub animation: SecondaryMap<Entity, AnimationComponent>,
    /// Player input column
    pub input: SecondaryMap<Entity, PlayerInputComponent>,
    /// Enemy patrol column
    pub patrol: SecondaryMap<Entity, EnemyPatrolComponent>,
    /// Respawn column
    pub respawn: SecondaryMap<Entity, RespawnComponent>,
    /// Entity kind column
    pub kind: SecondaryMap<Entity, EntityKind>,
    /// Parallax column
    pub parallax: SecondaryMap<Entity, ParallaxComponent>,
    /// Timer column
    pub timer: SecondaryMap<Entity, TimerComponent>,
}

macro_rules! impl_component {
    ($type:ty, $kind:ident, $column:ident) => {
        impl Component for $type {
            const KIND: ComponentKind = ComponentKind::$kind;

            fn column(store: &ComponentStore) -> &SecondaryMap<Entity, Self> {
                &store.$column
            }

            fn column_mut(store: &mut ComponentStore) -> &mut SecondaryMap<Entity, Self> {
                &mut store.$column
            }
        }
    };
}

impl_component!(MovementComponent, Movement, movement);
impl_component!(CollisionBoxComponent, CollisionBox, collision_box);
impl_component!(StateComponent, State, state);
impl_component!(AnimationComponent, Animation, animation);
impl_component!(PlayerInputComponent, Input, input);
impl_component!(EnemyPatrolComponent, Patrol, patrol);
impl_component!(RespawnComponent, Respawn, respawn);
impl_component!(EntityKind, Kind, kind);
impl_component!(ParallaxComponent, Parallax, parallax);
impl_component!(TimerComponent, Timer, timer);

impl ComponentStore {
    /// Drop every component of `entity`
    pub fn remove_all(&mut self, entity: Entity) {
        self.movement.remove(entity);
        self.collision_box.remove(entity);
        self.state.remove(entity);
        self.animation.remove(entity);
        self.input.remove(entity);
        self.patrol.remove(entity);
        self.respawn.remove(entity);
        self.kind.remove(entity);
        self.parallax.remove(entity);
        self.timer.remove(entity);
    }

    /// Drop every component of every entity
    pub fn clear(&mut self) {
        self.movement.clear();
        self.collision_box.clear();
        self.state.clear();
        self.animation.clear();
        self.input.clear();
        self.patrol.clear();
        self.respawn.clear();
        self.kind.clear();
        self.parallax.clear();
        self.timer.clear();
    }

    /// Copy out every component of `entity`, ordered by kind
    pub fn snapshot(&self, entity: Entity) -> Vec<ComponentSnapshot> {
        let mut components = Vec::new();
        if let Some(c) = self.movement.get(entity) {
            components.push(ComponentSnapshot::Movement(*c));
        }
        if let Some(c) = self.collision_box.get(entity) {
            components.push(ComponentSnapshot::CollisionBox(c.clone()));
        }
        if let Some(c) = self.state.get(entity) {
            components.push(ComponentSnapshot::State(c.clone()));
        }
        if let Some(c) = self.animation.get(entity) {
            components.push(ComponentSnapshot::Animation(c.clone()));
        }
        if let Some(c) = self.input.get(entity) {
            components.push(ComponentSnapshot::Input(*c));
        }
        if let Some(c) = self.patrol.get(entity) {
            components.push(ComponentSnapshot::Patrol(*c));
        }
        if let Some(c) = self.respawn.get(entity) {
            components.push(ComponentSnapshot::Respawn(*c));
        }
        if let Some(c) = self.kind.get(entity) {
            components.push(ComponentSnapshot::Kind(*c));
        }
        if let Some(c) = self.parallax.get(entity) {
            components.push(ComponentSnapshot::Parallax(c.clone()));
        }
        if let Some(c) = self.timer.get(entity) {
            components.push(ComponentSnapshot::Timer(*c));
        }
        components
    }
}
