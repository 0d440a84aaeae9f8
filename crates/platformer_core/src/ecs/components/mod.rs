//! ECS Components module
//!
//! Plain data attached to entities. Behavior lives in the systems.

pub mod animation;
pub mod collision;
pub mod input;
pub mod kind;
pub mod lifecycle;
pub mod movement;
pub mod parallax;
pub mod patrol;
pub mod state;
pub mod timer;

pub use animation::{AnimationComponent, FrameStrip};
pub use collision::{BoxOffsets, CollisionBoxComponent};
pub use input::PlayerInputComponent;
pub use kind::EntityKind;
pub use lifecycle::RespawnComponent;
pub use movement::MovementComponent;
pub use parallax::ParallaxComponent;
pub use patrol::EnemyPatrolComponent;
pub use state::{animation_intent, AnimationId, State, StateComponent, SuperState};
pub use timer::TimerComponent;
