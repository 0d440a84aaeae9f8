//! Character state machine component
//!
//! Two nested enums describe a character: the super-state is the physical
//! regime (on ground, rising, falling, dead, appearing) and the primary state
//! is the behavior inside it (idle, walking, sliding, a pending jump).
//!
//! The animation intent is never set directly. Every write to either state
//! goes through a setter that records the previous value and recomputes the
//! intent from [`animation_intent`], so no caller can observe a stale pair.

use serde::{Deserialize, Serialize};

/// Fine-grained behavioral state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum State {
    /// Standing still
    #[default]
    Idle,
    /// Walking toward negative X
    WalkLeft,
    /// Walking toward positive X
    WalkRight,
    /// A jump was requested this tick
    Jump,
    /// A second, mid-air jump was requested this tick
    DoubleJump,
    /// Blocked by a wall on the facing side
    Slide,
}

/// Coarse physical regime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SuperState {
    /// Standing on a platform
    OnGround,
    /// Airborne and descending
    #[default]
    Falling,
    /// Airborne after a jump, still rising
    Jumping,
    /// Airborne after a double jump, still rising
    DoubleJumping,
    /// Playing the death animation
    Dead,
    /// Clinging to a wall
    Sliding,
    /// Playing the spawn animation; ignored by physics
    Appearing,
}

/// What should be playing, derived from the state pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AnimationId {
    /// Standing still
    Idle,
    /// Walking
    Walk,
    /// Rising after a jump
    Jump,
    /// Rising after a double jump
    DoubleJump,
    /// Descending
    Fall,
    /// Sliding down a wall
    Slide,
    /// Dying
    Death,
    /// Spawning
    Appear,
}

/// Central transition table from (super-state, state) to animation intent
pub const fn animation_intent(super_state: SuperState, state: State) -> AnimationId {
    match (super_state, state) {
        (SuperState::OnGround, State::WalkLeft | State::WalkRight) => AnimationId::Walk,
        (SuperState::OnGround, _) => AnimationId::Idle,
        (SuperState::Falling, State::Slide) | (SuperState::Sliding, _) => AnimationId::Slide,
        (SuperState::Falling, _) => AnimationId::Fall,
        (SuperState::Jumping, _) => AnimationId::Jump,
        (SuperState::DoubleJumping, _) => AnimationId::DoubleJump,
        (SuperState::Dead, _) => AnimationId::Death,
        (SuperState::Appearing, _) => AnimationId::Appear,
    }
}

/// State machine data for a character
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateComponent {
    state: State,
    previous_state: State,
    super_state: SuperState,
    previous_super_state: SuperState,
    animation: AnimationId,

    /// Facing, -1 for left and 1 for right
    pub horizontal_direction: i32,

    /// Jumps performed since the entity last stood on ground
    pub jumps_performed: u8,

    can_move_left: bool,
    can_move_right: bool,

    default_state: State,
    default_super_state: SuperState,
    default_direction: i32,
}

impl StateComponent {
    /// Create a state machine that starts in the `Appearing` regime
    ///
    /// Once the spawn animation finishes the entity switches to the given
    /// defaults. A default of `WalkLeft` makes the default facing left.
    pub fn new(default_state: State, default_super_state: SuperState) -> Self {
        Self::with_current(default_state, default_super_state, State::Idle, SuperState::Appearing)
    }

    /// Create a state machine with an explicit starting pair
    pub fn with_current(
        default_state: State,
        default_super_state: SuperState,
        state: State,
        super_state: SuperState,
    ) -> Self {
        let default_direction = if default_state == State::WalkLeft { -1 } else { 1 };
        Self {
            state,
            previous_state: state,
            super_state,
            previous_super_state: super_state,
            animation: animation_intent(super_state, state),
            horizontal_direction: 1,
            jumps_performed: 0,
            can_move_left: true,
            can_move_right: true,
            default_state,
            default_super_state,
            default_direction,
        }
    }

    /// Current primary state
    pub const fn state(&self) -> State {
        self.state
    }

    /// Primary state before the last write
    pub const fn previous_state(&self) -> State {
        self.previous_state
    }

    /// Current super-state
    pub const fn super_state(&self) -> SuperState {
        self.super_state
    }

    /// Super-state before the last write
    pub const fn previous_super_state(&self) -> SuperState {
        self.previous_super_state
    }

    /// Current animation intent
    pub const fn animation(&self) -> AnimationId {
        self.animation
    }

    /// Primary state restored after appearing
    pub const fn default_state(&self) -> State {
        self.default_state
    }

    /// Super-state restored after appearing
    pub const fn default_super_state(&self) -> SuperState {
        self.default_super_state
    }

    /// Facing restored on respawn
    pub const fn default_direction(&self) -> i32 {
        self.default_direction
    }

    /// Whether left movement is unobstructed
    pub const fn can_move_left(&self) -> bool {
        self.can_move_left
    }

    /// Whether right movement is unobstructed
    pub const fn can_move_right(&self) -> bool {
        self.can_move_right
    }

    /// Set the primary state
    pub fn set_state(&mut self, state: State) {
        self.previous_state = self.state;
        self.state = state;
        self.refresh_animation();
    }

    /// Set the super-state; entering `OnGround` resets the jump count
    pub fn set_super_state(&mut self, super_state: SuperState) {
        self.previous_super_state = self.super_state;
        self.super_state = super_state;
        if super_state == SuperState::OnGround {
            self.jumps_performed = 0;
        }
        self.refresh_animation();
    }

    /// Allow or block movement to the left
    ///
    /// Blocking starts a wall slide facing the wall.
    pub fn set_can_move_left(&mut self, allowed: bool) {
        self.can_move_left = allowed;
        if !allowed {
            self.set_state(State::Slide);
            self.horizontal_direction = -1;
        }
    }

    /// Allow or block movement to the right
    ///
    /// Blocking starts a wall slide facing the wall.
    pub fn set_can_move_right(&mut self, allowed: bool) {
        self.can_move_right = allowed;
        if !allowed {
            self.set_state(State::Slide);
            self.horizontal_direction = 1;
        }
    }

    /// Restore the default pair with both directions unblocked
    pub fn restore_defaults(&mut self) {
        self.set_can_move_left(true);
        self.set_can_move_right(true);
        self.set_super_state(self.default_super_state);
        self.set_state(self.default_state);
    }

    fn refresh_animation(&mut self) {
        let next = animation_intent(self.super_state, self.state);
        if next != self.animation {
            log::trace!("animation intent {:?} -> {:?}", self.animation, next);
        }
        self.animation = next;
    }
}

impl Default for StateComponent {
    fn default() -> Self {
        Self::new(State::Idle, SuperState::Falling)
    }
}
