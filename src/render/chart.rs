use eframe::egui::{Pos2, vec2};
use tracing::debug;

use crate::build::FeatureNodeFactory;
use crate::data::Dataset;
use crate::engine::{BodyId, HostEngine};
use crate::sim::SimulationState;

use super::place;

/// Half the distance between the two bars.
const BAR_OFFSET: f32 = 75.0 / 2.0;
const FULCRUM_DROP: f32 = 55.0;
const CHART_LIFT: f32 = 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChartBars {
    pub negative: BodyId,
    pub positive: BodyId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScaleBodies {
    pub plank: BodyId,
    pub fulcrum: BodyId,
    pub chart: ChartBars,
}

pub struct ChartRenderer;

impl ChartRenderer {
    /// Two outcome bars either side of `location`. Leaves the data cursor at 1.
    pub fn render_chart<E: HostEngine + ?Sized>(
        engine: &mut E,
        state: &mut SimulationState,
        dataset: &Dataset,
        location: Pos2,
    ) -> ChartBars {
        let negative = Self::render_bar(engine, state, dataset, 0.0, location - vec2(BAR_OFFSET, 0.0));
        let positive = Self::render_bar(engine, state, dataset, 1.0, location + vec2(BAR_OFFSET, 0.0));
        state.last_node = Some(positive);

        debug!(x = location.x, y = location.y, "chart rendered");
        ChartBars { negative, positive }
    }

    /// A plank on a fulcrum with a chart resting on top.
    pub fn render_scale<E: HostEngine + ?Sized>(
        engine: &mut E,
        state: &mut SimulationState,
        dataset: &Dataset,
        location: Pos2,
    ) -> ScaleBodies {
        let color = state.paint_color;
        let plank = FeatureNodeFactory::new(state, dataset).build_plank(color, location);
        let plank = place(engine, state, plank).id;

        let fulcrum = FeatureNodeFactory::new(state, dataset)
            .build_fulcrum(color, location - vec2(0.0, FULCRUM_DROP));
        let fulcrum = place(engine, state, fulcrum).id;

        let chart = Self::render_chart(engine, state, dataset, location + vec2(0.0, CHART_LIFT));
        ScaleBodies {
            plank,
            fulcrum,
            chart,
        }
    }

    fn render_bar<E: HostEngine + ?Sized>(
        engine: &mut E,
        state: &mut SimulationState,
        dataset: &Dataset,
        outcome: f32,
        position: Pos2,
    ) -> BodyId {
        state.data_cursor = outcome;
        let color = state.paint_color;
        let bar = FeatureNodeFactory::new(state, dataset).build_chart_bar(1.0, color, position, true);
        place(engine, state, bar).id
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use crate::build::BodyKind;
    use crate::data::Record;
    use crate::engine::Scene;

    use super::*;

    fn record(id: i64, outcome: f32) -> Record {
        Record {
            id,
            pregnancies: 2.0,
            glucose: 120.0,
            blood_pressure: 70.0,
            skin_thickness: 30.0,
            insulin: 0.0,
            bmi: 33.0,
            diabetes_pedigree: 0.4,
            age: 50.0,
            outcome,
        }
    }

    fn fixture() -> (Scene, SimulationState) {
        let mut state = SimulationState::default();
        state.set_screen_size(428.0, 428.0);
        (Scene::new(state.world_side()), state)
    }

    #[test]
    fn bars_mirror_the_location_and_split_the_outcomes() {
        let (mut scene, mut state) = fixture();
        let dataset = Dataset::new(vec![record(1, 0.0), record(2, 0.0), record(3, 0.0), record(4, 1.0)]);
        state.data_cursor = 0.0;

        let bars = ChartRenderer::render_chart(&mut scene, &mut state, &dataset, pos2(200.0, 300.0));

        let negative = scene.body(bars.negative).expect("negative bar placed");
        let positive = scene.body(bars.positive).expect("positive bar placed");
        assert_eq!(negative.descriptor.position, pos2(162.5, 300.0));
        assert_eq!(positive.descriptor.position, pos2(237.5, 300.0));
        assert_eq!(negative.descriptor.size.y, 321.0);
        assert_eq!(positive.descriptor.size.y, 107.0);
        assert_eq!(state.data_cursor, 1.0);
        assert_eq!(state.last_node, Some(bars.positive));
        assert_eq!(state.node_count, 2);
    }

    #[test]
    fn even_split_at_the_origin_gives_matching_bars() {
        let (mut scene, mut state) = fixture();
        let dataset = Dataset::new(vec![record(1, 0.0), record(2, 1.0)]);

        let bars = ChartRenderer::render_chart(&mut scene, &mut state, &dataset, pos2(0.0, 0.0));

        let negative = scene.body(bars.negative).expect("negative bar placed");
        let positive = scene.body(bars.positive).expect("positive bar placed");
        assert_eq!(negative.descriptor.position, pos2(-37.5, 0.0));
        assert_eq!(positive.descriptor.position, pos2(37.5, 0.0));
        assert_eq!(negative.descriptor.size, positive.descriptor.size);
        assert_eq!(negative.descriptor.size.y, 214.0);
        assert_eq!(state.data_cursor, 1.0);
    }

    #[test]
    fn scale_stacks_plank_fulcrum_and_chart() {
        let (mut scene, mut state) = fixture();
        let dataset = Dataset::new(vec![record(1, 0.0), record(2, 1.0)]);

        let scale = ChartRenderer::render_scale(&mut scene, &mut state, &dataset, pos2(400.0, 400.0));

        assert_eq!(scene.body_count(), 4);
        assert_eq!(state.node_count, 4);
        assert_eq!(scene.body_kind(scale.plank), Some(BodyKind::Plank));
        assert_eq!(scene.body_kind(scale.fulcrum), Some(BodyKind::Fulcrum));
        assert_eq!(scene.body_position(scale.fulcrum), Some(pos2(400.0, 345.0)));
        assert_eq!(scene.body_position(scale.chart.negative), Some(pos2(362.5, 460.0)));
        assert_eq!(scene.body_position(scale.chart.positive), Some(pos2(437.5, 460.0)));
        assert_eq!(state.last_node, Some(scale.chart.positive));
    }
}
