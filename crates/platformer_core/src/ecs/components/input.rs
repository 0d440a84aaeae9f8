//! Player input component, refreshed from the input collaborator once per tick

/// Key-down snapshot for the controlled character
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PlayerInputComponent {
    /// Left key is held
    pub left: bool,
    /// Right key is held
    pub right: bool,
    /// Jump key is held
    pub jump: bool,
}

impl PlayerInputComponent {
    /// Both or neither of the horizontal keys are held
    pub const fn horizontal_cancels(&self) -> bool {
        self.left == self.right
    }
}
