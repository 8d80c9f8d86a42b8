//! Gesture recognizers as small state machines. Each `transition` is pure: it
//! takes the current phase plus the live value and returns the next phase and
//! what the session should do about it.

mod pan;
mod pinch;
mod touch;

pub use pan::{CameraPanGesture, ScreenPanGesture};
pub use pinch::PinchGesture;
pub use touch::{SelectedNode, TouchAction, TouchEvent, TouchTracker, TouchView};

/// Host recognizer callbacks. `T` is the gesture's reading (scale factor or
/// translation) relative to where it began.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEvent<T> {
    Began,
    Changed(T),
    Ended(T),
    Cancelled,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum GesturePhase<S> {
    #[default]
    Idle,
    /// Holds the value captured when the gesture began.
    Active(S),
    Cancelled,
}

impl<S> GesturePhase<S> {
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }
}

/// What a transition asks of the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureEffect<S> {
    None,
    /// Take the camera token.
    Engage,
    Apply(S),
    /// Apply and give the token back.
    Finish(S),
    /// Put the snapshot back and give the token back.
    Restore(S),
}

/// Shared skeleton of the snapshot-and-offset gestures.
fn advance<S, T>(
    phase: GesturePhase<S>,
    event: GestureEvent<T>,
    current: S,
    apply: impl Fn(S, T) -> S,
) -> (GesturePhase<S>, GestureEffect<S>)
where
    S: Copy,
{
    match (phase, event) {
        (_, GestureEvent::Began) => (GesturePhase::Active(current), GestureEffect::Engage),
        (GesturePhase::Active(snapshot), GestureEvent::Changed(reading)) => (
            GesturePhase::Active(snapshot),
            GestureEffect::Apply(apply(snapshot, reading)),
        ),
        (GesturePhase::Active(snapshot), GestureEvent::Ended(reading)) => {
            (GesturePhase::Idle, GestureEffect::Finish(apply(snapshot, reading)))
        }
        (GesturePhase::Active(snapshot), GestureEvent::Cancelled) => {
            (GesturePhase::Cancelled, GestureEffect::Restore(snapshot))
        }
        (phase, _) => (phase, GestureEffect::None),
    }
}
