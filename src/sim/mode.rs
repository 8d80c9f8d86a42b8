/// Which interaction currently owns the shared state. Handlers must win
/// [`InteractionMode::try_enter`] before mutating anything.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum InteractionMode {
    #[default]
    Idle,
    CameraGesture,
    NodeDrag,
    Painting,
}

impl InteractionMode {
    /// Check-and-set. Succeeds from `Idle` or when `next` already holds the token.
    pub fn try_enter(&mut self, next: InteractionMode) -> bool {
        if *self == InteractionMode::Idle || *self == next {
            *self = next;
            true
        } else {
            false
        }
    }

    /// Back to `Idle`, but only if `held` is the current owner.
    pub fn release(&mut self, held: InteractionMode) -> bool {
        if *self == held {
            *self = InteractionMode::Idle;
            true
        } else {
            false
        }
    }
}
