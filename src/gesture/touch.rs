use eframe::egui::Pos2;

use crate::build::{BACKGROUND_Z, BodyKind};
use crate::engine::BodyId;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TouchEvent {
    Began(Pos2),
    Moved(Pos2),
    Ended(Pos2),
    Cancelled,
}

/// The node a touch currently holds, as the host sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SelectedNode {
    pub id: BodyId,
    pub z_position: f32,
    pub kind: BodyKind,
}

impl SelectedNode {
    pub fn is_background(&self) -> bool {
        self.z_position == BACKGROUND_Z
    }
}

/// Everything a single-touch decision reads, gathered before the transition.
#[derive(Clone, Debug, Default)]
pub struct TouchView {
    /// Front-most first.
    pub hits: Vec<BodyId>,
    pub front_z: Option<f32>,
    pub selected: Option<SelectedNode>,
    pub camera_active: bool,
    pub erase: bool,
    pub painting: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TouchAction {
    None,
    /// Finger went down: the hit list becomes the selection and `node`, when
    /// present, the selected node.
    Select {
        hits: Vec<BodyId>,
        node: Option<BodyId>,
        remove: bool,
    },
    /// Finger lifted over empty space.
    Drop { location: Pos2, erase: bool },
    /// Finger lifted over a node.
    Pick {
        hits: Vec<BodyId>,
        node: BodyId,
        remove: bool,
    },
    Drag { node: BodyId, to: Pos2 },
    BreakBars { node: BodyId },
    Paint { location: Pos2 },
    /// Give back whatever mode the touch held.
    Release,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum TouchPhase {
    #[default]
    Idle,
    Down,
}

/// Single-finger select / drag / drop / paint / erase.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchTracker {
    phase: TouchPhase,
}

impl TouchTracker {
    pub fn is_down(&self) -> bool {
        self.phase == TouchPhase::Down
    }

    pub fn transition(self, event: TouchEvent, view: TouchView) -> (Self, TouchAction) {
        if view.camera_active {
            // A camera gesture owns the state; the touch never reaches it.
            let phase = match event {
                TouchEvent::Ended(_) | TouchEvent::Cancelled => TouchPhase::Idle,
                _ => self.phase,
            };
            return (Self { phase }, TouchAction::None);
        }

        match event {
            TouchEvent::Began(_) => {
                let node = view
                    .hits
                    .first()
                    .copied()
                    .filter(|_| view.front_z != Some(BACKGROUND_Z));
                let action = TouchAction::Select {
                    remove: view.erase && node.is_some(),
                    hits: view.hits,
                    node,
                };
                (Self { phase: TouchPhase::Down }, action)
            }
            TouchEvent::Moved(location) => {
                if self.phase != TouchPhase::Down {
                    return (self, TouchAction::None);
                }
                (self, moved(location, &view))
            }
            TouchEvent::Ended(location) => {
                let action = match view.hits.first().copied() {
                    None => TouchAction::Drop {
                        location,
                        erase: view.erase,
                    },
                    Some(node) => TouchAction::Pick {
                        remove: view.erase,
                        hits: view.hits,
                        node,
                    },
                };
                (Self::default(), action)
            }
            TouchEvent::Cancelled => (Self::default(), TouchAction::Release),
        }
    }
}

fn moved(location: Pos2, view: &TouchView) -> TouchAction {
    if view.painting {
        return TouchAction::Paint { location };
    }

    match view.selected {
        Some(node) if node.is_background() => TouchAction::None,
        Some(node) if node.kind == BodyKind::ChartBar => TouchAction::BreakBars { node: node.id },
        Some(node) => TouchAction::Drag {
            node: node.id,
            to: location,
        },
        None => TouchAction::None,
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn down(view: TouchView) -> (TouchTracker, TouchAction) {
        TouchTracker::default().transition(TouchEvent::Began(pos2(1.0, 1.0)), view)
    }

    #[test]
    fn began_selects_the_front_hit() {
        let (tracker, action) = down(TouchView {
            hits: vec![BodyId(4), BodyId(2)],
            front_z: Some(0.0),
            ..TouchView::default()
        });
        assert!(tracker.is_down());
        assert_eq!(
            action,
            TouchAction::Select {
                hits: vec![BodyId(4), BodyId(2)],
                node: Some(BodyId(4)),
                remove: false,
            }
        );
    }

    #[test]
    fn background_nodes_are_never_selected_or_erased() {
        let (_, action) = down(TouchView {
            hits: vec![BodyId(1)],
            front_z: Some(BACKGROUND_Z),
            erase: true,
            ..TouchView::default()
        });
        assert_eq!(
            action,
            TouchAction::Select {
                hits: vec![BodyId(1)],
                node: None,
                remove: false,
            }
        );
    }

    #[test]
    fn moving_drags_unless_painting_or_a_bar() {
        let (tracker, _) = down(TouchView::default());
        let node = SelectedNode {
            id: BodyId(3),
            z_position: 0.0,
            kind: BodyKind::Glyph,
        };
        let view = TouchView {
            selected: Some(node),
            ..TouchView::default()
        };
        let (_, action) = tracker.transition(TouchEvent::Moved(pos2(9.0, 9.0)), view.clone());
        assert_eq!(
            action,
            TouchAction::Drag {
                node: BodyId(3),
                to: pos2(9.0, 9.0),
            }
        );

        let painting = TouchView {
            painting: true,
            ..view.clone()
        };
        let (_, action) = tracker.transition(TouchEvent::Moved(pos2(9.0, 9.0)), painting);
        assert_eq!(
            action,
            TouchAction::Paint {
                location: pos2(9.0, 9.0),
            }
        );

        let bar = TouchView {
            selected: Some(SelectedNode {
                kind: BodyKind::ChartBar,
                ..node
            }),
            ..view
        };
        let (_, action) = tracker.transition(TouchEvent::Moved(pos2(9.0, 9.0)), bar);
        assert_eq!(action, TouchAction::BreakBars { node: BodyId(3) });
    }

    #[test]
    fn background_selection_does_not_drag() {
        let (tracker, _) = down(TouchView::default());
        let view = TouchView {
            selected: Some(SelectedNode {
                id: BodyId(8),
                z_position: BACKGROUND_Z,
                kind: BodyKind::Rectangle,
            }),
            ..TouchView::default()
        };
        let (_, action) = tracker.transition(TouchEvent::Moved(pos2(0.0, 0.0)), view);
        assert_eq!(action, TouchAction::None);
    }

    #[test]
    fn ended_drops_on_empty_space_and_picks_otherwise() {
        let (tracker, _) = down(TouchView::default());
        let (tracker, action) = tracker.transition(TouchEvent::Ended(pos2(5.0, 6.0)), TouchView::default());
        assert_eq!(
            action,
            TouchAction::Drop {
                location: pos2(5.0, 6.0),
                erase: false,
            }
        );
        assert!(!tracker.is_down());

        let (tracker, _) = down(TouchView::default());
        let view = TouchView {
            hits: vec![BodyId(2)],
            erase: true,
            ..TouchView::default()
        };
        let (_, action) = tracker.transition(TouchEvent::Ended(pos2(5.0, 6.0)), view);
        assert_eq!(
            action,
            TouchAction::Pick {
                hits: vec![BodyId(2)],
                node: BodyId(2),
                remove: true,
            }
        );
    }

    #[test]
    fn camera_gestures_mute_the_touch() {
        let view = TouchView {
            camera_active: true,
            ..TouchView::default()
        };
        let (tracker, action) = down(view.clone());
        assert_eq!(action, TouchAction::None);
        let (_, action) = tracker.transition(TouchEvent::Ended(pos2(1.0, 1.0)), view);
        assert_eq!(action, TouchAction::None);
    }
}
