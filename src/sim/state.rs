use eframe::egui::{Pos2, Vec2, pos2, vec2};

use crate::build::{GlyphFont, JoinStyle, PhysicsParams, ShapeKind};
use crate::engine::BodyId;
use crate::render::RowBodies;

use super::color::{Rgb, Rgba};
use super::mode::InteractionMode;

pub const DEFAULT_SCREEN_SIDE: f32 = 428.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTransform {
    pub position: Pos2,
    pub scale: f32,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            position: Pos2::ZERO,
            scale: 1.0,
        }
    }
}

/// Everything the sliders, pickers, gestures and renderers share. Owned by the
/// session and lent out by reference; there is exactly one writer at a time.
#[derive(Clone, Debug)]
pub struct SimulationState {
    pub selected_shape: ShapeKind,
    pub join_style: JoinStyle,
    pub row_bodies: RowBodies,
    /// Percent of `scale_pixels`.
    pub box_width: f32,
    pub box_height: f32,
    pub density: f32,
    pub linear_damping: f32,
    pub static_node: bool,
    pub screen_width: f32,
    pub screen_height: f32,
    pub scale_pixels: f32,
    /// World side length as a multiple of the screen side.
    pub physics_env_scale: f32,
    pub camera: CameraTransform,
    /// Three-finger pan moves the whole view, not the camera.
    pub view_offset: Vec2,
    pub screen_pan_enabled: bool,
    mode: InteractionMode,
    pub node_count: usize,
    pub selected_node: Option<BodyId>,
    pub selected_nodes: Vec<BodyId>,
    pub last_node: Option<BodyId>,
    pub erase: bool,
    pub painting: bool,
    pub pour: bool,
    pub drop: bool,
    /// Outcome the next chart bar counts.
    pub data_cursor: f32,
    pub letter_text: String,
    pub letter_font: GlyphFont,
    pub paint_color: Rgb,
    pub jump_strength: f32,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            selected_shape: ShapeKind::Rectangle,
            join_style: JoinStyle::Pin,
            row_bodies: RowBodies::Glyphs,
            box_width: 6.0,
            box_height: 6.0,
            density: 1.0,
            linear_damping: 0.1,
            static_node: false,
            screen_width: DEFAULT_SCREEN_SIDE,
            screen_height: DEFAULT_SCREEN_SIDE,
            scale_pixels: 1.0,
            physics_env_scale: 8.0,
            camera: CameraTransform::default(),
            view_offset: Vec2::ZERO,
            screen_pan_enabled: true,
            mode: InteractionMode::Idle,
            node_count: 0,
            selected_node: None,
            selected_nodes: Vec::new(),
            last_node: None,
            erase: false,
            painting: false,
            pour: false,
            drop: true,
            data_cursor: 1.0,
            letter_text: "B".to_owned(),
            letter_font: GlyphFont::Menlo,
            paint_color: Rgb::new(0.0, 0.43, 0.83),
            jump_strength: 0.25,
        }
    }
}

impl SimulationState {
    /// Stores the screen size; the smaller side becomes the sizing unit.
    pub fn set_screen_size(&mut self, width: f32, height: f32) {
        self.screen_width = width;
        self.screen_height = height;
        self.scale_pixels = width.min(height);
    }

    /// Side of the square world the bodies live in.
    pub fn world_side(&self) -> f32 {
        DEFAULT_SCREEN_SIDE * self.physics_env_scale
    }

    /// Camera start: over the middle of the floor, half a screen up.
    pub fn home_camera(&self) -> CameraTransform {
        CameraTransform {
            position: pos2(self.world_side() / 2.0, self.screen_height / 2.0),
            scale: 1.0,
        }
    }

    pub fn base_box_size(&self) -> Vec2 {
        vec2(
            (self.box_width / 100.0 * self.scale_pixels).round(),
            (self.box_height / 100.0 * self.scale_pixels).round(),
        )
    }

    pub fn physics_snapshot(&self) -> PhysicsParams {
        PhysicsParams {
            density: self.density,
            linear_damping: self.linear_damping,
            is_static: self.static_node,
        }
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn try_enter(&mut self, mode: InteractionMode) -> bool {
        self.mode.try_enter(mode)
    }

    pub fn release(&mut self, mode: InteractionMode) -> bool {
        self.mode.release(mode)
    }

    pub fn camera_gesture_active(&self) -> bool {
        self.mode == InteractionMode::CameraGesture
    }

    pub fn select(&mut self, hits: Vec<BodyId>) {
        self.selected_nodes = hits;
    }

    pub fn clear_selection(&mut self) {
        self.selected_node = None;
        self.selected_nodes.clear();
        self.last_node = None;
    }

    /// Drop a removed body from every selection slot.
    pub fn forget(&mut self, body: BodyId) {
        self.selected_nodes.retain(|id| *id != body);
        if self.selected_node == Some(body) {
            self.selected_node = None;
        }
        if self.last_node == Some(body) {
            self.last_node = None;
        }
    }

    pub fn note_body_created(&mut self) {
        self.node_count += 1;
    }

    pub fn background_color(&self) -> Rgba {
        self.paint_color.complement().with_alpha(0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_size_picks_the_smaller_side() {
        let mut state = SimulationState::default();
        state.set_screen_size(1170.0, 2532.0);
        assert_eq!(state.scale_pixels, 1170.0);
        state.set_screen_size(900.0, 600.0);
        assert_eq!(state.scale_pixels, 600.0);
    }

    #[test]
    fn box_size_rounds_percent_of_scale() {
        let mut state = SimulationState::default();
        state.set_screen_size(428.0, 900.0);
        // 6% of 428 = 25.68
        assert_eq!(state.base_box_size(), vec2(26.0, 26.0));
        state.box_height = 10.0;
        assert_eq!(state.base_box_size().y, 43.0);
    }

    #[test]
    fn sliders_accept_any_value() {
        let mut state = SimulationState::default();
        state.linear_damping = -3.0;
        state.density = 0.0;
        let snapshot = state.physics_snapshot();
        assert_eq!(snapshot.linear_damping, -3.0);
        assert_eq!(snapshot.density, 0.0);
    }

    #[test]
    fn home_camera_sits_over_the_floor() {
        let mut state = SimulationState::default();
        state.set_screen_size(1000.0, 600.0);
        let home = state.home_camera();
        assert_eq!(home.position, pos2(1712.0, 300.0));
        assert_eq!(home.scale, 1.0);
    }

    #[test]
    fn background_is_complementary() {
        let mut state = SimulationState::default();
        state.paint_color = Rgb::new(0.0, 0.25, 1.0);
        let background = state.background_color();
        assert_eq!(background.rgb, Rgb::new(1.0, 0.75, 0.0));
        assert_eq!(background.alpha, 0.5);
    }
}
