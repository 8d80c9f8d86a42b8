use eframe::egui::{Pos2, Vec2, pos2};

use super::{GestureEffect, GestureEvent, GesturePhase, advance};

/// Two-finger pan that moves the camera. Screen y grows downwards and world y
/// upwards, so the vertical component flips.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CameraPanGesture {
    phase: GesturePhase<Pos2>,
}

impl CameraPanGesture {
    pub fn phase(&self) -> GesturePhase<Pos2> {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn transition(
        self,
        event: GestureEvent<Vec2>,
        camera_position: Pos2,
    ) -> (Self, GestureEffect<Pos2>) {
        let (phase, effect) = advance(self.phase, event, camera_position, |snapshot, moved| {
            pos2(snapshot.x - moved.x, snapshot.y + moved.y)
        });
        (Self { phase }, effect)
    }
}

/// Three-finger pan that slides the whole view. Ignored while disabled.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPanGesture {
    phase: GesturePhase<Vec2>,
}

impl ScreenPanGesture {
    pub fn phase(&self) -> GesturePhase<Vec2> {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase.is_active()
    }

    pub fn transition(
        self,
        event: GestureEvent<Vec2>,
        view_offset: Vec2,
        enabled: bool,
    ) -> (Self, GestureEffect<Vec2>) {
        if !enabled && !self.is_active() {
            return (self, GestureEffect::None);
        }
        let (phase, effect) = advance(self.phase, event, view_offset, |snapshot, moved| {
            snapshot + moved
        });
        (Self { phase }, effect)
    }
}
