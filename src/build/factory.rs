use eframe::egui::{Pos2, Vec2, vec2};

use crate::data::{Dataset, is_face_glyph};
use crate::error::{ChartError, Result};
use crate::sim::{Rgb, SimulationState};

use super::shape::{
    BodyDescriptor, BodyKind, CollisionProxy, GlyphLabel, PhysicsBody, ShapeKind,
    bottom_anchored_box, centered_box,
};

/// Rendered glyph width as a fraction of its font size.
pub const GLYPH_WIDTH_RATIO: f32 = 0.6;
/// Background and grid nodes sit at this z and are never dragged.
pub const BACKGROUND_Z: f32 = -5.0;

const PLANK_SIZE: Vec2 = vec2(200.0, 10.0);
const FULCRUM_HALF_BASE: f32 = 50.0;
const FULCRUM_HEIGHT: f32 = 50.0;
const FULCRUM_ALPHA: f32 = 0.75;

/// Turns one scaled value into a body descriptor, reading sizes and physics
/// parameters from the state as they are right now.
pub struct FeatureNodeFactory<'a> {
    state: &'a SimulationState,
    dataset: &'a Dataset,
}

impl<'a> FeatureNodeFactory<'a> {
    pub fn new(state: &'a SimulationState, dataset: &'a Dataset) -> Self {
        Self { state, dataset }
    }

    pub fn build(
        &self,
        kind: ShapeKind,
        scale: f32,
        color: Rgb,
        position: Pos2,
        is_physical: bool,
    ) -> Result<BodyDescriptor> {
        match kind {
            ShapeKind::Rectangle => Ok(self.build_rectangle(scale, color, position, is_physical)),
            ShapeKind::Glyph => Ok(self.build_glyph(
                &self.state.letter_text,
                scale,
                color,
                position,
                is_physical,
            )),
            ShapeKind::Data => Ok(self.build_chart_bar(scale, color, position, is_physical)),
            ShapeKind::Scale => Err(ChartError::InvalidShapeKind(kind.label().to_owned())),
        }
    }

    pub fn build_rectangle(
        &self,
        scale: f32,
        color: Rgb,
        position: Pos2,
        is_physical: bool,
    ) -> BodyDescriptor {
        let size = self.state.base_box_size();
        self.path_body(BodyKind::Rectangle, size, scale, color, position, is_physical)
    }

    /// Bar height encodes the share of rows whose outcome matches the data cursor.
    pub fn build_chart_bar(
        &self,
        scale: f32,
        color: Rgb,
        position: Pos2,
        is_physical: bool,
    ) -> BodyDescriptor {
        let base = self.state.base_box_size();
        let share = self.dataset.outcome_share(self.state.data_cursor);
        let size = vec2(
            (base.x / 3.0).trunc(),
            (share * self.state.screen_height).trunc(),
        );
        self.path_body(BodyKind::ChartBar, size, scale, color, position, is_physical)
    }

    pub fn build_glyph(
        &self,
        text: &str,
        scale: f32,
        color: Rgb,
        position: Pos2,
        is_physical: bool,
    ) -> BodyDescriptor {
        let base_width = self.state.base_box_size().x;
        let is_face = is_face_glyph(text);
        let font_size = if is_face { base_width * 2.0 } else { base_width };
        let glyph_width = font_size * GLYPH_WIDTH_RATIO;

        // Faces are drawn twice as large, so their proxy uses half the enlarged
        // width to land near the size of a regular glyph body.
        let radius = if is_face {
            glyph_width / 2.0
        } else {
            glyph_width
        };

        let fill = color.with_alpha(scale);
        BodyDescriptor {
            kind: BodyKind::Glyph,
            position,
            size: vec2(glyph_width, font_size),
            fill,
            stroke: fill,
            outline: Vec::new(),
            physics: self.physics(CollisionProxy::Circle { radius }, is_physical),
            z_position: 0.0,
            label: Some(GlyphLabel {
                text: text.to_owned(),
                font: self.state.letter_font,
                font_size,
            }),
        }
    }

    pub fn build_plank(&self, color: Rgb, position: Pos2) -> BodyDescriptor {
        let outline = centered_box(PLANK_SIZE);
        BodyDescriptor {
            kind: BodyKind::Plank,
            position,
            size: PLANK_SIZE,
            fill: color.opaque(),
            stroke: color.opaque(),
            physics: self.physics(CollisionProxy::Polygon(outline.clone()), true),
            outline,
            z_position: 0.0,
            label: None,
        }
    }

    pub fn build_fulcrum(&self, color: Rgb, position: Pos2) -> BodyDescriptor {
        let outline = vec![
            vec2(-FULCRUM_HALF_BASE, 0.0),
            vec2(FULCRUM_HALF_BASE, 0.0),
            vec2(0.0, FULCRUM_HEIGHT),
        ];
        let paint = color.with_alpha(FULCRUM_ALPHA);
        BodyDescriptor {
            kind: BodyKind::Fulcrum,
            position,
            size: vec2(FULCRUM_HALF_BASE * 2.0, FULCRUM_HEIGHT),
            fill: paint,
            stroke: paint,
            physics: self.physics(CollisionProxy::Polygon(outline.clone()), true),
            outline,
            z_position: 0.0,
            label: None,
        }
    }

    fn path_body(
        &self,
        kind: BodyKind,
        size: Vec2,
        scale: f32,
        color: Rgb,
        position: Pos2,
        is_physical: bool,
    ) -> BodyDescriptor {
        let outline = bottom_anchored_box(size);
        BodyDescriptor {
            kind,
            position,
            size,
            fill: color.with_alpha(scale),
            stroke: color.opaque(),
            physics: self.physics(CollisionProxy::Polygon(outline.clone()), is_physical),
            outline,
            z_position: 0.0,
            label: None,
        }
    }

    fn physics(&self, proxy: CollisionProxy, is_physical: bool) -> Option<PhysicsBody> {
        is_physical.then(|| PhysicsBody {
            proxy,
            params: self.state.physics_snapshot(),
        })
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use crate::data::{HAPPY_FACE, Record, SAD_FACE};

    use super::*;

    fn state() -> SimulationState {
        let mut state = SimulationState::default();
        state.set_screen_size(428.0, 428.0);
        state
    }

    fn record(id: i64, outcome: f32) -> Record {
        Record {
            id,
            pregnancies: 1.0,
            glucose: 100.0,
            blood_pressure: 70.0,
            skin_thickness: 20.0,
            insulin: 0.0,
            bmi: 30.0,
            diabetes_pedigree: 0.5,
            age: 40.0,
            outcome,
        }
    }

    #[test]
    fn rectangle_size_and_alpha_follow_state_and_scale() {
        let state = state();
        let dataset = Dataset::empty();
        let factory = FeatureNodeFactory::new(&state, &dataset);
        let color = Rgb::new(0.2, 0.4, 0.6);

        let body = factory
            .build(ShapeKind::Rectangle, 0.3, color, pos2(10.0, 20.0), true)
            .expect("rectangles build");
        assert_eq!(body.size, vec2(26.0, 26.0));
        assert_eq!(body.fill, color.with_alpha(0.3));
        assert_eq!(body.stroke.alpha, 1.0);
        assert_eq!(body.position, pos2(10.0, 20.0));

        let loud = factory
            .build(ShapeKind::Rectangle, 4.0, color, Pos2::ZERO, true)
            .expect("rectangles build");
        assert_eq!(loud.fill.alpha, 1.0);
        let faint = factory
            .build(ShapeKind::Rectangle, f32::NAN, color, Pos2::ZERO, true)
            .expect("rectangles build");
        assert_eq!(faint.fill.alpha, 0.0);
    }

    #[test]
    fn identical_inputs_build_identical_bodies() {
        let state = state();
        let dataset = Dataset::new(vec![record(1, 0.0), record(2, 1.0)]);
        let factory = FeatureNodeFactory::new(&state, &dataset);
        let color = Rgb::new(0.9, 0.1, 0.1);

        for kind in [ShapeKind::Rectangle, ShapeKind::Glyph, ShapeKind::Data] {
            let first = factory.build(kind, 0.5, color, pos2(3.0, 4.0), true);
            let second = factory.build(kind, 0.5, color, pos2(3.0, 4.0), true);
            assert_eq!(first.ok(), second.ok(), "{kind}");
        }
    }

    #[test]
    fn scale_is_not_a_single_body() {
        let state = state();
        let dataset = Dataset::empty();
        let factory = FeatureNodeFactory::new(&state, &dataset);
        let result = factory.build(
            ShapeKind::Scale,
            1.0,
            Rgb::new(0.0, 0.0, 0.0),
            Pos2::ZERO,
            true,
        );
        assert!(matches!(result, Err(ChartError::InvalidShapeKind(_))));
    }

    #[test]
    fn faces_double_the_font_but_keep_a_glyph_sized_proxy() {
        let state = state();
        let dataset = Dataset::empty();
        let factory = FeatureNodeFactory::new(&state, &dataset);
        let color = Rgb::new(0.5, 0.5, 0.5);

        let letter = factory.build_glyph("G", 1.0, color, Pos2::ZERO, true);
        let face = factory.build_glyph(SAD_FACE, 1.0, color, Pos2::ZERO, true);
        let other_face = factory.build_glyph(HAPPY_FACE, 1.0, color, Pos2::ZERO, true);

        let letter_size = letter.label.as_ref().map(|label| label.font_size);
        let face_size = face.label.as_ref().map(|label| label.font_size);
        assert_eq!(letter_size, Some(26.0));
        assert_eq!(face_size, Some(52.0));
        assert_eq!(other_face.label.map(|label| label.font_size), Some(52.0));

        let radius = |body: &BodyDescriptor| match body.physics.as_ref().map(|p| &p.proxy) {
            Some(CollisionProxy::Circle { radius }) => *radius,
            other => panic!("expected circle proxy, got {other:?}"),
        };
        approx::assert_relative_eq!(radius(&letter), 26.0 * GLYPH_WIDTH_RATIO);
        approx::assert_relative_eq!(radius(&face), 52.0 * GLYPH_WIDTH_RATIO / 2.0);
    }

    #[test]
    fn chart_bar_height_is_the_outcome_share_of_the_screen() {
        let mut state = state();
        let dataset = Dataset::new(vec![
            record(1, 0.0),
            record(2, 1.0),
            record(3, 1.0),
            record(4, 1.0),
        ]);
        state.data_cursor = 1.0;
        let bar = FeatureNodeFactory::new(&state, &dataset).build_chart_bar(
            1.0,
            Rgb::new(0.0, 0.0, 0.0),
            Pos2::ZERO,
            true,
        );
        assert_eq!(bar.kind, BodyKind::ChartBar);
        assert_eq!(bar.size, vec2(8.0, 321.0));

        state.data_cursor = 0.0;
        let bar = FeatureNodeFactory::new(&state, &dataset).build_chart_bar(
            1.0,
            Rgb::new(0.0, 0.0, 0.0),
            Pos2::ZERO,
            true,
        );
        assert_eq!(bar.size.y, 107.0);
    }

    #[test]
    fn empty_dataset_gives_flat_bars() {
        let state = state();
        let dataset = Dataset::empty();
        let bar = FeatureNodeFactory::new(&state, &dataset)
            .build(ShapeKind::Data, 1.0, Rgb::new(0.0, 0.0, 0.0), Pos2::ZERO, true)
            .expect("data bars build");
        assert_eq!(bar.size.y, 0.0);
    }

    #[test]
    fn physics_is_a_snapshot() {
        let mut state = state();
        let dataset = Dataset::empty();
        state.density = 0.0;
        let built = FeatureNodeFactory::new(&state, &dataset).build_rectangle(
            1.0,
            Rgb::new(0.0, 0.0, 0.0),
            Pos2::ZERO,
            true,
        );
        state.density = 7.0;
        let density = built.physics.map(|body| body.params.density);
        assert_eq!(density, Some(0.0));
    }

    #[test]
    fn decorative_bodies_have_no_proxy() {
        let state = state();
        let dataset = Dataset::empty();
        let body = FeatureNodeFactory::new(&state, &dataset).build_rectangle(
            1.0,
            Rgb::new(0.0, 0.0, 0.0),
            Pos2::ZERO,
            false,
        );
        assert!(!body.has_physics());
    }
}
