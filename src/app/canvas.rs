use eframe::egui::{
    self, Align2, Color32, FontFamily, FontId, PointerButton, Rect, Sense, Shape, Stroke,
    StrokeKind, Ui, Vec2, vec2,
};
use physics_charts::engine::HostEngine;
use physics_charts::gesture::{GestureEvent, TouchEvent};
use physics_charts::session::InputEvent;

use super::ViewModel;
use super::render_utils::{draw_background, screen_to_world, world_rect_to_screen, world_to_screen};

const MIN_FRAME_SECONDS: f32 = 1.0 / 240.0;
const MAX_FRAME_SECONDS: f32 = 1.0 / 20.0;

/// Turns egui pointer and touch input into gesture events.
#[derive(Debug, Default)]
pub(super) struct CanvasInput {
    touch_down: bool,
    mouse_pan: Option<Vec2>,
    fingers: Option<FingerGesture>,
}

#[derive(Clone, Copy, Debug)]
struct FingerGesture {
    /// Three or more fingers slide the view instead of the camera.
    screen_pan: bool,
    zoom: f32,
    moved: Vec2,
}

impl FingerGesture {
    fn began(screen_pan: bool) -> (Self, Vec<InputEvent>) {
        let events = if screen_pan {
            vec![InputEvent::ScreenPan(GestureEvent::Began)]
        } else {
            vec![
                InputEvent::Pinch(GestureEvent::Began),
                InputEvent::CameraPan(GestureEvent::Began),
            ]
        };
        let gesture = Self {
            screen_pan,
            zoom: 1.0,
            moved: Vec2::ZERO,
        };
        (gesture, events)
    }

    fn changed(&self) -> Vec<InputEvent> {
        if self.screen_pan {
            vec![InputEvent::ScreenPan(GestureEvent::Changed(self.moved))]
        } else {
            vec![
                InputEvent::Pinch(GestureEvent::Changed(self.zoom)),
                InputEvent::CameraPan(GestureEvent::Changed(self.moved)),
            ]
        }
    }

    fn ended(&self) -> Vec<InputEvent> {
        if self.screen_pan {
            vec![InputEvent::ScreenPan(GestureEvent::Ended(self.moved))]
        } else {
            vec![
                InputEvent::Pinch(GestureEvent::Ended(self.zoom)),
                InputEvent::CameraPan(GestureEvent::Ended(self.moved)),
            ]
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_canvas(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        self.session.resize(rect.width(), rect.height());
        if !self.framed {
            let home = self.session.state().home_camera();
            self.session.state_mut().camera = home;
            self.framed = true;
        }

        let mut events = self.finger_events(ui);
        events.extend(self.scroll_events(ui, &response));
        events.extend(self.mouse_pan_events(&response));
        events.extend(self.touch_events(ui, rect, &response));
        for event in events {
            self.session.dispatch(event);
        }

        if self.simulate {
            let dt = ui
                .ctx()
                .input(|input| input.stable_dt)
                .clamp(MIN_FRAME_SECONDS, MAX_FRAME_SECONDS);
            self.session.step(dt);
            ui.ctx().request_repaint();
        }

        self.paint_scene(ui, rect);
    }

    fn finger_events(&mut self, ui: &Ui) -> Vec<InputEvent> {
        let touch = ui.input(|input| input.multi_touch());
        let mut events = Vec::new();

        match (touch, self.input.fingers) {
            (Some(touch), current) => {
                let screen_pan = touch.num_touches >= 3;
                let mut gesture = match current {
                    Some(gesture) if gesture.screen_pan == screen_pan => gesture,
                    other => {
                        if let Some(previous) = other {
                            events.extend(previous.ended());
                        }
                        // A second finger turns the single touch into a camera gesture.
                        if self.input.touch_down {
                            self.input.touch_down = false;
                            events.push(InputEvent::Touch(TouchEvent::Cancelled));
                        }
                        let (gesture, began) = FingerGesture::began(screen_pan);
                        events.extend(began);
                        gesture
                    }
                };
                gesture.zoom *= touch.zoom_delta;
                gesture.moved += touch.translation_delta;
                events.extend(gesture.changed());
                self.input.fingers = Some(gesture);
            }
            (None, Some(gesture)) => {
                events.extend(gesture.ended());
                self.input.fingers = None;
            }
            (None, None) => {}
        }

        events
    }

    /// One wheel notch is a whole pinch.
    fn scroll_events(&self, ui: &Ui, response: &egui::Response) -> Vec<InputEvent> {
        if !response.hovered() || self.input.fingers.is_some() {
            return Vec::new();
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return Vec::new();
        }

        let factor = (1.0 + (scroll * 0.0018)).clamp(0.85, 1.15);
        vec![
            InputEvent::Pinch(GestureEvent::Began),
            InputEvent::Pinch(GestureEvent::Ended(factor)),
        ]
    }

    fn mouse_pan_events(&mut self, response: &egui::Response) -> Vec<InputEvent> {
        let dragging = response.dragged_by(PointerButton::Secondary)
            || response.dragged_by(PointerButton::Middle);

        match (dragging, self.input.mouse_pan) {
            (true, None) => {
                let moved = response.drag_delta();
                self.input.mouse_pan = Some(moved);
                vec![
                    InputEvent::CameraPan(GestureEvent::Began),
                    InputEvent::CameraPan(GestureEvent::Changed(moved)),
                ]
            }
            (true, Some(moved)) => {
                let moved = moved + response.drag_delta();
                self.input.mouse_pan = Some(moved);
                vec![InputEvent::CameraPan(GestureEvent::Changed(moved))]
            }
            (false, Some(moved)) => {
                self.input.mouse_pan = None;
                vec![InputEvent::CameraPan(GestureEvent::Ended(moved))]
            }
            (false, None) => Vec::new(),
        }
    }

    fn touch_events(&mut self, ui: &Ui, rect: Rect, response: &egui::Response) -> Vec<InputEvent> {
        if self.input.fingers.is_some() {
            return Vec::new();
        }

        let (pressed, released, moved, pointer) = ui.input(|input| {
            (
                input.pointer.primary_pressed(),
                input.pointer.primary_released(),
                input.pointer.delta() != Vec2::ZERO,
                input.pointer.interact_pos(),
            )
        });
        let Some(pointer) = pointer else {
            return Vec::new();
        };

        let state = self.session.state();
        let world = screen_to_world(rect, state.camera, state.view_offset, pointer);

        if !self.input.touch_down {
            if pressed && response.hovered() {
                self.input.touch_down = true;
                return vec![InputEvent::Touch(TouchEvent::Began(world))];
            }
            return Vec::new();
        }

        if released {
            self.input.touch_down = false;
            vec![InputEvent::Touch(TouchEvent::Ended(world))]
        } else if moved {
            vec![InputEvent::Touch(TouchEvent::Moved(world))]
        } else {
            Vec::new()
        }
    }

    fn paint_scene(&self, ui: &Ui, rect: Rect) {
        let painter = ui.painter_at(rect);
        let state = self.session.state();
        let scene = self.session.engine();
        let camera = state.camera;
        let offset = state.view_offset;
        let zoom = 1.0 / camera.scale.max(f32::EPSILON);

        draw_background(
            &painter,
            rect,
            state.background_color().into(),
            camera,
            offset,
        );

        let world = world_rect_to_screen(rect, camera, offset, scene.bounds());
        painter.rect_stroke(
            world,
            0.0,
            Stroke::new(1.5, Color32::from_gray(90)),
            StrokeKind::Outside,
        );

        let joint_stroke = Stroke::new(
            (1.2 * zoom.sqrt()).clamp(0.6, 3.0),
            Color32::from_rgba_unmultiplied(40, 40, 40, 200),
        );
        for joint in scene.joints() {
            if let Some((a, b)) = scene.joint_anchors(joint) {
                painter.line_segment(
                    [
                        world_to_screen(rect, camera, offset, a),
                        world_to_screen(rect, camera, offset, b),
                    ],
                    joint_stroke,
                );
            }
        }

        for body in scene.bodies() {
            let bounds = world_rect_to_screen(rect, camera, offset, body.world_bounds());
            if !rect.intersects(bounds) {
                continue;
            }

            let descriptor = &body.descriptor;
            let fill = Color32::from(descriptor.fill);
            if let Some(label) = &descriptor.label {
                let family = if label.font.is_monospace() {
                    FontFamily::Monospace
                } else {
                    FontFamily::Proportional
                };
                painter.text(
                    world_to_screen(rect, camera, offset, body.position),
                    Align2::CENTER_CENTER,
                    &label.text,
                    FontId::new((label.font_size * zoom).max(1.0), family),
                    fill,
                );
            } else if descriptor.outline.len() >= 3 {
                let points = descriptor
                    .outline
                    .iter()
                    .map(|point| world_to_screen(rect, camera, offset, body.position + *point))
                    .collect();
                painter.add(Shape::convex_polygon(
                    points,
                    fill,
                    Stroke::new(1.0, Color32::from(descriptor.stroke)),
                ));
            } else {
                painter.rect_filled(bounds, 0.0, fill);
            }
        }

        for wave in self.session.shockwaves() {
            let progress = wave.progress();
            let alpha = ((1.0 - progress) * 200.0) as u8;
            painter.circle_stroke(
                world_to_screen(rect, camera, offset, wave.position),
                (12.0 + progress * 60.0) * zoom,
                Stroke::new(2.0, Color32::from_rgba_unmultiplied(255, 255, 255, alpha)),
            );
        }

        if let Some(body) = state.selected_node.and_then(|id| scene.body(id))
            && body.in_scene
        {
            let bounds = world_rect_to_screen(rect, camera, offset, body.world_bounds());
            painter.rect_stroke(
                bounds.expand(3.0),
                2.0,
                Stroke::new(1.6, Color32::from_rgb(245, 206, 93)),
                StrokeKind::Outside,
            );
            painter.text(
                rect.left_top() + vec2(10.0, 10.0),
                Align2::LEFT_TOP,
                format!(
                    "{}  |  {:?}  |  z {}",
                    body.id,
                    body.descriptor.kind,
                    scene.z_position(body.id).unwrap_or_default()
                ),
                FontId::proportional(13.0),
                Color32::from_gray(240),
            );
        }
    }
}
