use eframe::egui::{Pos2, Vec2, vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info, trace, warn};

use crate::build::{FeatureNodeFactory, ShapeKind};
use crate::data::Dataset;
use crate::engine::{BodyId, Contact, HostEngine};
use crate::error::Result;
use crate::gesture::{
    CameraPanGesture, GestureEffect, GestureEvent, PinchGesture, ScreenPanGesture, SelectedNode,
    TouchAction, TouchEvent, TouchTracker, TouchView,
};
use crate::render::{ChartBars, ChartRenderer, RowChain, RowRenderer, ScaleBodies};
use crate::sim::{InteractionMode, SimulationState};

/// Collisions harder than this leave a shockwave.
pub const SHOCKWAVE_IMPULSE: f32 = 5.0;
pub const SHOCKWAVE_SECONDS: f32 = 0.5;
/// Seconds between bodies while pouring.
pub const POUR_INTERVAL: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    Pinch(GestureEvent<f32>),
    CameraPan(GestureEvent<Vec2>),
    ScreenPan(GestureEvent<Vec2>),
    Touch(TouchEvent),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JumpDirection {
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shockwave {
    pub position: Pos2,
    pub remaining: f32,
}

impl Shockwave {
    /// 0 when fresh, 1 when about to vanish.
    pub fn progress(&self) -> f32 {
        1.0 - (self.remaining / SHOCKWAVE_SECONDS).clamp(0.0, 1.0)
    }
}

/// Owns the state, the dataset and the host, and applies every input and
/// command one at a time.
pub struct Session<E: HostEngine> {
    state: SimulationState,
    dataset: Dataset,
    engine: E,
    rng: StdRng,
    pinch: PinchGesture,
    camera_pan: CameraPanGesture,
    screen_pan: ScreenPanGesture,
    touch: TouchTracker,
    shockwaves: Vec<Shockwave>,
    pour_point: Option<Pos2>,
    pour_elapsed: f32,
    last_paint: Option<Pos2>,
}

impl<E: HostEngine> Session<E> {
    pub fn new(engine: E, dataset: Dataset, state: SimulationState, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        info!(rows = dataset.len(), seeded = seed.is_some(), "session started");
        Self {
            state,
            dataset,
            engine,
            rng,
            pinch: PinchGesture::default(),
            camera_pan: CameraPanGesture::default(),
            screen_pan: ScreenPanGesture::default(),
            touch: TouchTracker::default(),
            shockwaves: Vec::new(),
            pour_point: None,
            pour_elapsed: 0.0,
            last_paint: None,
        }
    }

    pub fn state(&self) -> &SimulationState {
        &self.state
    }

    /// Sliders and pickers write here directly.
    pub fn state_mut(&mut self) -> &mut SimulationState {
        &mut self.state
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn set_dataset(&mut self, dataset: Dataset) {
        info!(rows = dataset.len(), "dataset replaced");
        self.dataset = dataset;
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn shockwaves(&self) -> &[Shockwave] {
        &self.shockwaves
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        if width != self.state.screen_width || height != self.state.screen_height {
            debug!(width, height, "screen resized");
            self.state.set_screen_size(width, height);
        }
    }

    pub fn dispatch(&mut self, event: InputEvent) {
        match event {
            InputEvent::Pinch(event) => {
                let (next, effect) = self.pinch.transition(event, self.state.camera.scale);
                self.pinch = next;
                if !self.apply_camera_effect(effect, |state, scale| state.camera.scale = scale) {
                    self.pinch = PinchGesture::default();
                }
            }
            InputEvent::CameraPan(event) => {
                let (next, effect) = self.camera_pan.transition(event, self.state.camera.position);
                self.camera_pan = next;
                if !self.apply_camera_effect(effect, |state, position| {
                    state.camera.position = position;
                }) {
                    self.camera_pan = CameraPanGesture::default();
                }
            }
            InputEvent::ScreenPan(event) => {
                let (next, effect) = self.screen_pan.transition(
                    event,
                    self.state.view_offset,
                    self.state.screen_pan_enabled,
                );
                self.screen_pan = next;
                if !self.apply_camera_effect(effect, |state, offset| state.view_offset = offset) {
                    self.screen_pan = ScreenPanGesture::default();
                }
            }
            InputEvent::Touch(event) => self.dispatch_touch(event),
        }
    }

    /// Returns false when the gesture could not take the camera token.
    fn apply_camera_effect<S>(
        &mut self,
        effect: GestureEffect<S>,
        write: impl FnOnce(&mut SimulationState, S),
    ) -> bool {
        match effect {
            GestureEffect::None => {}
            GestureEffect::Engage => {
                if !self.state.try_enter(InteractionMode::CameraGesture) {
                    debug!(mode = ?self.state.mode(), "camera gesture blocked");
                    return false;
                }
            }
            GestureEffect::Apply(value) => write(&mut self.state, value),
            GestureEffect::Finish(value) | GestureEffect::Restore(value) => {
                write(&mut self.state, value);
                self.release_camera();
            }
        }
        true
    }

    /// Two fingers drive pinch and pan together; the token stays held until
    /// the last of them ends.
    fn release_camera(&mut self) {
        if !self.pinch.is_active() && !self.camera_pan.is_active() && !self.screen_pan.is_active()
        {
            self.state.release(InteractionMode::CameraGesture);
        }
    }

    fn dispatch_touch(&mut self, event: TouchEvent) {
        let location = match event {
            TouchEvent::Began(point) | TouchEvent::Moved(point) | TouchEvent::Ended(point) => {
                Some(point)
            }
            TouchEvent::Cancelled => None,
        };
        let view = self.touch_view(location);
        let (next, action) = self.touch.transition(event, view);
        self.touch = next;
        trace!(?event, ?action, "touch");

        self.track_pour(event);
        self.apply_touch(action);
        if matches!(event, TouchEvent::Ended(_)) {
            self.release_touch_modes();
        }
    }

    fn touch_view(&self, location: Option<Pos2>) -> TouchView {
        let hits = location
            .map(|point| self.engine.hit_test(point))
            .unwrap_or_default();
        let front_z = hits.first().and_then(|id| self.engine.z_position(*id));
        let selected = self
            .state
            .selected_node
            .filter(|_| !self.state.selected_nodes.is_empty())
            .and_then(|id| {
                Some(SelectedNode {
                    id,
                    z_position: self.engine.z_position(id)?,
                    kind: self.engine.body_kind(id)?,
                })
            });

        TouchView {
            hits,
            front_z,
            selected,
            camera_active: self.state.camera_gesture_active(),
            erase: self.state.erase,
            painting: self.state.painting,
        }
    }

    fn track_pour(&mut self, event: TouchEvent) {
        match event {
            TouchEvent::Began(point) | TouchEvent::Moved(point) if self.touch.is_down() => {
                self.pour_point = Some(point);
            }
            _ => {
                self.pour_point = None;
                self.pour_elapsed = 0.0;
            }
        }
    }

    fn apply_touch(&mut self, action: TouchAction) {
        match action {
            TouchAction::None => {}
            TouchAction::Select { hits, node, remove } => {
                self.state.select(hits);
                if let Some(node) = node {
                    self.state.selected_node = Some(node);
                    if remove {
                        self.remove_body(node);
                    }
                }
            }
            TouchAction::Drop { location, erase } => {
                self.state.select(Vec::new());
                self.state.drop = true;
                if !erase {
                    self.drop_at(location);
                }
            }
            TouchAction::Pick { hits, node, remove } => {
                self.state.select(hits);
                self.state.selected_node = Some(node);
                self.state.last_node = Some(node);
                self.state.drop = false;
                if remove {
                    self.remove_body(node);
                }
            }
            TouchAction::Drag { node, to } => {
                if self.state.try_enter(InteractionMode::NodeDrag) {
                    self.engine.set_body_position(node, to);
                    self.state.drop = false;
                }
            }
            TouchAction::BreakBars { node } => self.break_bars(node),
            TouchAction::Paint { location } => {
                if self.state.try_enter(InteractionMode::Painting) {
                    self.paint_at(location);
                }
            }
            TouchAction::Release => self.release_touch_modes(),
        }
    }

    fn release_touch_modes(&mut self) {
        self.state.release(InteractionMode::NodeDrag);
        self.state.release(InteractionMode::Painting);
        self.last_paint = None;
    }

    /// Leaves a body every box-width along the stroke.
    fn paint_at(&mut self, location: Pos2) {
        let spacing = self.state.base_box_size().x.max(1.0);
        if self
            .last_paint
            .is_some_and(|last| last.distance(location) < spacing)
        {
            return;
        }
        if self.drop_body(location).is_ok() {
            self.last_paint = Some(location);
        }
    }

    /// Splitting a bar into unit blocks is not supported yet.
    fn break_bars(&mut self, node: BodyId) {
        trace!(body = %node, "break bars requested");
    }

    fn drop_at(&mut self, location: Pos2) {
        match self.state.selected_shape {
            ShapeKind::Data => {
                self.render_chart(location);
            }
            ShapeKind::Scale => {
                self.render_scale(location);
            }
            ShapeKind::Rectangle | ShapeKind::Glyph => {
                if let Err(error) = self.drop_body(location) {
                    warn!(%error, "could not drop body");
                }
            }
        }
    }

    /// One opaque body of the selected shape in the paint color. A balance
    /// scale is not a single body, so it drops a rectangle instead.
    pub fn drop_body(&mut self, location: Pos2) -> Result<BodyId> {
        let kind = match self.state.selected_shape {
            ShapeKind::Scale => ShapeKind::Rectangle,
            other => other,
        };
        let color = self.state.paint_color;
        let descriptor =
            FeatureNodeFactory::new(&self.state, &self.dataset).build(kind, 1.0, color, location, true)?;
        let id = crate::render::place(&mut self.engine, &mut self.state, descriptor).id;
        self.state.last_node = Some(id);
        Ok(id)
    }

    pub fn render_row(&mut self, location: Pos2) -> Result<RowChain> {
        let join_style = self.state.join_style;
        let row_bodies = self.state.row_bodies;
        RowRenderer::render_row(
            &mut self.engine,
            &mut self.state,
            &self.dataset,
            &mut self.rng,
            location,
            join_style,
            row_bodies,
        )
    }

    pub fn render_chart(&mut self, location: Pos2) -> ChartBars {
        ChartRenderer::render_chart(&mut self.engine, &mut self.state, &self.dataset, location)
    }

    pub fn render_scale(&mut self, location: Pos2) -> ScaleBodies {
        ChartRenderer::render_scale(&mut self.engine, &mut self.state, &self.dataset, location)
    }

    /// Kicks the last touched body. Returns false when there is none.
    pub fn jump(&mut self, direction: JumpDirection) -> bool {
        let Some(node) = self.state.last_node else {
            return false;
        };
        let strength = self.state.jump_strength;
        let sideways = match direction {
            JumpDirection::Left => -10.0,
            JumpDirection::Right => 10.0,
        };
        self.engine
            .apply_impulse(node, vec2(sideways * strength, 30.0 * strength));
        true
    }

    pub fn remove_body(&mut self, body: BodyId) -> bool {
        let removed = self.engine.remove_from_scene(body);
        self.state.forget(body);
        removed
    }

    pub fn clear_scene(&mut self) {
        self.engine.clear();
        self.state.clear_selection();
        self.state.node_count = 0;
        self.shockwaves.clear();
        info!("scene cleared");
    }

    pub fn handle_collision(&mut self, contact: Contact) {
        if contact.impulse > SHOCKWAVE_IMPULSE {
            trace!(impulse = contact.impulse, a = %contact.body_a, b = %contact.body_b, "shockwave");
            self.shockwaves.push(Shockwave {
                position: contact.point,
                remaining: SHOCKWAVE_SECONDS,
            });
        }
    }

    pub fn step(&mut self, dt: f32) {
        self.pour(dt);

        for contact in self.engine.step(dt) {
            self.handle_collision(contact);
        }

        for wave in &mut self.shockwaves {
            wave.remaining -= dt;
        }
        self.shockwaves.retain(|wave| wave.remaining > 0.0);
    }

    fn pour(&mut self, dt: f32) {
        let Some(point) = self.pour_point.filter(|_| self.state.pour) else {
            self.pour_elapsed = 0.0;
            return;
        };
        if self.state.camera_gesture_active() {
            return;
        }

        self.pour_elapsed += dt;
        while self.pour_elapsed >= POUR_INTERVAL {
            self.pour_elapsed -= POUR_INTERVAL;
            if let Err(error) = self.drop_body(point) {
                warn!(%error, "pour stopped");
                self.pour_elapsed = 0.0;
                break;
            }
        }
    }
}
