use super::{GestureEffect, GestureEvent, GesturePhase, advance};

/// Two-finger pinch. Spreading the fingers (factor > 1) zooms in, which
/// shrinks the camera scale.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PinchGesture {
    phase: GesturePhase<f32>,
}

impl PinchGesture {
    pub fn phase(&self) -> GesturePhase<f32> {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn transition(
        self,
        event: GestureEvent<f32>,
        camera_scale: f32,
    ) -> (Self, GestureEffect<f32>) {
        let (phase, effect) = advance(self.phase, event, camera_scale, zoomed);
        (Self { phase }, effect)
    }
}

fn zoomed(snapshot: f32, factor: f32) -> f32 {
    // A collapsed or garbage reading keeps the scale where it started.
    if !factor.is_finite() || factor <= 0.0 {
        return snapshot;
    }
    snapshot * (1.0 / factor)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn changed_divides_the_snapshot() {
        let (pinch, effect) = PinchGesture::default().transition(GestureEvent::Began, 2.0);
        assert_eq!(effect, GestureEffect::Engage);
        let (pinch, effect) = pinch.transition(GestureEvent::Changed(4.0), 2.0);
        assert_eq!(effect, GestureEffect::Apply(0.5));
        // Later readings still start from the snapshot, not the applied value.
        let (_, effect) = pinch.transition(GestureEvent::Changed(0.5), 0.5);
        assert_eq!(effect, GestureEffect::Apply(4.0));
    }

    #[test]
    fn cancel_restores_the_snapshot() {
        let (pinch, _) = PinchGesture::default().transition(GestureEvent::Began, 1.5);
        let (pinch, _) = pinch.transition(GestureEvent::Changed(3.0), 1.5);
        let (pinch, effect) = pinch.transition(GestureEvent::Cancelled, 0.5);
        assert_eq!(effect, GestureEffect::Restore(1.5));
        assert_eq!(pinch.phase(), GesturePhase::Cancelled);
    }

    #[test]
    fn ended_applies_and_finishes() {
        let (pinch, _) = PinchGesture::default().transition(GestureEvent::Began, 1.0);
        let (pinch, effect) = pinch.transition(GestureEvent::Ended(3.0), 1.0);
        match effect {
            GestureEffect::Finish(scale) => assert_relative_eq!(scale, 1.0 / 3.0),
            other => panic!("expected finish, got {other:?}"),
        }
        assert!(!pinch.is_active());
    }

    #[test]
    fn zero_factor_is_ignored() {
        assert_eq!(zoomed(1.25, 0.0), 1.25);
        assert_eq!(zoomed(1.25, f32::NAN), 1.25);
    }
}
