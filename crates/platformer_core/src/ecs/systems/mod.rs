//! ECS Systems module
//!
//! One file per behavior. The scheduler runs them in a fixed order each
//! tick; see [`crate::ecs::scheduler`].

pub mod actor_collision;
pub mod animation;
pub mod appear;
pub mod death;
pub mod enemy_patrol;
pub mod level_render;
pub mod movement;
pub mod obstacle_collision;
pub mod parallax;
pub mod player_input;
pub mod respawn;
pub mod timer;

pub use actor_collision::{ActorCollisionSystem, Resolver};
pub use animation::AnimationSystem;
pub use appear::AppearSystem;
pub use death::DeathSystem;
pub use enemy_patrol::EnemyPatrolSystem;
pub use level_render::LevelRenderSystem;
pub use movement::MovementSystem;
pub use obstacle_collision::ObstacleCollisionSystem;
pub use parallax::ParallaxSystem;
pub use player_input::PlayerInputSystem;
pub use respawn::RespawnSystem;
pub use timer::TimerSystem;
