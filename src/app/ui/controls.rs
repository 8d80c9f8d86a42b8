use std::ops::RangeInclusive;

use eframe::egui::{self, Key, Response, Ui};
use physics_charts::build::{GlyphFont, JoinStyle, ShapeKind};
use physics_charts::render::RowBodies;
use physics_charts::session::JumpDirection;
use tracing::{debug, warn};

use super::super::ViewModel;

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn default_slider_key_step(min: f32, max: f32) -> f32 {
    ((max - min) / 200.0).max(0.0005)
}

/// Holding an arrow key moves a focused slider faster the longer it is held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    min: f32,
    max: f32,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * default_slider_key_step(min, max) * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(min, max);
    ui.ctx().request_repaint();
    (*value - old_value).abs() > f32::EPSILON
}

fn tuned_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: RangeInclusive<f32>,
    text: &str,
    hover: &str,
) -> bool {
    let (min, max) = (*range.start(), *range.end());
    let slider = ui
        .add(
            egui::Slider::new(value, range)
                .text(text)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hover);
    if slider.hovered() {
        slider.request_focus();
    }
    let changed = slider.changed();
    changed | apply_slider_arrow_acceleration(ui, &slider, value, min, max)
}

impl ViewModel {
    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.heading("Bodies");
        ui.separator();
        ui.add_space(4.0);

        self.draw_shape_pickers(ui);
        ui.separator();
        self.draw_body_sliders(ui);
        ui.separator();
        self.draw_color_sliders(ui);
        ui.separator();
        self.draw_tool_toggles(ui);
        ui.separator();
        self.draw_commands(ui);
    }

    fn draw_shape_pickers(&mut self, ui: &mut Ui) {
        let state = self.session.state_mut();

        ui.label("Tap on empty space drops")
            .on_hover_text("Shape produced by a tap that hits nothing.");
        ui.horizontal_wrapped(|ui| {
            for kind in ShapeKind::ALL {
                ui.selectable_value(&mut state.selected_shape, kind, kind.label());
            }
        });

        ui.label("Row bodies");
        ui.horizontal_wrapped(|ui| {
            for bodies in RowBodies::ALL {
                ui.selectable_value(&mut state.row_bodies, bodies, bodies.label())
                    .on_hover_text("Glyph rows spell each feature, shape rows scale a box.");
            }
        });

        egui::ComboBox::from_label("Join style")
            .selected_text(state.join_style.label())
            .show_ui(ui, |ui| {
                for style in JoinStyle::ALL {
                    ui.selectable_value(&mut state.join_style, style, style.label());
                }
            });

        ui.horizontal(|ui| {
            ui.label("Letter");
            ui.add(egui::TextEdit::singleline(&mut state.letter_text).desired_width(60.0))
                .on_hover_text("Text of glyph bodies dropped on their own.");
        });
        egui::ComboBox::from_label("Font")
            .selected_text(state.letter_font.label())
            .show_ui(ui, |ui| {
                for font in GlyphFont::ALL {
                    ui.selectable_value(&mut state.letter_font, font, font.label());
                }
            });

        ui.horizontal(|ui| {
            ui.label("Chart bar counts");
            ui.selectable_value(&mut state.data_cursor, 0.0, "non-diabetic");
            ui.selectable_value(&mut state.data_cursor, 1.0, "diabetic");
        });
    }

    fn draw_body_sliders(&mut self, ui: &mut Ui) {
        let state = self.session.state_mut();
        let mut changed = false;

        changed |= tuned_slider(
            ui,
            &mut state.box_width,
            1.0..=100.0,
            "Box width %",
            "Body width as a percent of the smaller screen side.",
        );
        changed |= tuned_slider(
            ui,
            &mut state.box_height,
            1.0..=100.0,
            "Box height %",
            "Body height as a percent of the smaller screen side.",
        );
        changed |= tuned_slider(
            ui,
            &mut state.density,
            0.0..=10.0,
            "Density",
            "Mass per area of new bodies.",
        );
        changed |= tuned_slider(
            ui,
            &mut state.linear_damping,
            0.0..=1.0,
            "Linear damping",
            "How quickly new bodies lose speed.",
        );
        tuned_slider(
            ui,
            &mut state.jump_strength,
            0.0..=2.0,
            "Jump strength",
            "Impulse scale of the jump buttons.",
        );

        ui.checkbox(&mut state.static_node, "Static bodies")
            .on_hover_text("New bodies collide but never move.");

        if changed {
            debug!(
                box_width = state.box_width,
                box_height = state.box_height,
                density = state.density,
                damping = state.linear_damping,
                "body parameters changed"
            );
        }
    }

    fn draw_color_sliders(&mut self, ui: &mut Ui) {
        let state = self.session.state_mut();
        let color = &mut state.paint_color;

        ui.label("Paint color");
        tuned_slider(ui, &mut color.red, 0.0..=1.0, "Red", "Red channel.");
        tuned_slider(ui, &mut color.green, 0.0..=1.0, "Green", "Green channel.");
        tuned_slider(ui, &mut color.blue, 0.0..=1.0, "Blue", "Blue channel.");
    }

    fn draw_tool_toggles(&mut self, ui: &mut Ui) {
        let state = self.session.state_mut();

        ui.checkbox(&mut state.erase, "Erase")
            .on_hover_text("Touching a body removes it.");
        ui.checkbox(&mut state.painting, "Paint")
            .on_hover_text("Dragging leaves a trail of bodies.");
        ui.checkbox(&mut state.pour, "Pour")
            .on_hover_text("Holding a touch keeps dropping bodies.");
        ui.checkbox(&mut state.screen_pan_enabled, "Three-finger screen pan")
            .on_hover_text("Three fingers slide the whole view instead of the camera.");
        ui.checkbox(&mut self.simulate, "Run simulation")
            .on_hover_text("Step the physics every frame.");
        ui.checkbox(&mut self.show_fps, "FPS Display")
            .on_hover_text("Show a live FPS readout in the header.");
    }

    fn draw_commands(&mut self, ui: &mut Ui) {
        let target = self.session.state().camera.position;

        ui.horizontal_wrapped(|ui| {
            if ui
                .button("Drop row")
                .on_hover_text("Drop a random record as a jointed chain.")
                .clicked()
                && let Err(error) = self.session.render_row(target)
            {
                warn!(%error, "could not drop row");
            }
            if ui.button("Drop chart").clicked() {
                self.session.render_chart(target);
            }
            if ui.button("Drop scale").clicked() {
                self.session.render_scale(target);
            }
        });

        ui.horizontal_wrapped(|ui| {
            if ui.button("Jump left").clicked() {
                self.session.jump(JumpDirection::Left);
            }
            if ui.button("Jump right").clicked() {
                self.session.jump(JumpDirection::Right);
            }
        });

        ui.horizontal_wrapped(|ui| {
            if ui.button("Home camera").clicked() {
                let state = self.session.state_mut();
                state.camera = state.home_camera();
                state.view_offset = egui::Vec2::ZERO;
            }
            if ui.button("Clear scene").clicked() {
                self.session.clear_scene();
            }
        });
    }
}
