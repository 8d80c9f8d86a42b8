use eframe::egui::Pos2;
use rand::Rng;
use tracing::debug;

use crate::build::{FeatureNodeFactory, JoinStyle, JointBinder, JointSpec, PlacedBody};
use crate::data::{Dataset, Field, NormalizedSample, Record};
use crate::engine::{BodyId, HostEngine};
use crate::error::Result;
use crate::sim::{Rgb, SimulationState};

use super::{RowBodies, place};

/// Bodies and joints of one rendered row, in chain order.
#[derive(Clone, Debug)]
pub struct RowChain {
    pub record_id: i64,
    pub color: Rgb,
    pub bodies: Vec<BodyId>,
    pub joints: Vec<JointSpec>,
}

impl RowChain {
    pub fn outcome_body(&self) -> Option<BodyId> {
        self.bodies.last().copied()
    }
}

pub struct RowRenderer;

impl RowRenderer {
    /// Samples one row and drops it at `location` as a jointed chain:
    /// id, the eight features, then the outcome.
    pub fn render_row<E, R>(
        engine: &mut E,
        state: &mut SimulationState,
        dataset: &Dataset,
        rng: &mut R,
        location: Pos2,
        join_style: JoinStyle,
        row_bodies: RowBodies,
    ) -> Result<RowChain>
    where
        E: HostEngine + ?Sized,
        R: Rng + ?Sized,
    {
        let (record, sample) = dataset.sample(rng)?;
        let color = Rgb::random(rng);

        let mut placed: Vec<PlacedBody> = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            let descriptor = {
                let factory = FeatureNodeFactory::new(state, dataset);
                match row_bodies {
                    RowBodies::Glyphs => {
                        let (text, scale) = glyph_for(&record, &sample, field);
                        factory.build_glyph(text, scale, color, location, true)
                    }
                    RowBodies::Shapes => {
                        factory.build_rectangle(sample.scale(field), color, location, true)
                    }
                }
            };
            placed.push(place(engine, state, descriptor));
        }

        let last_link = placed.len() - 2;
        let mut joints = Vec::with_capacity(placed.len() - 1);
        for (link, pair) in placed.windows(2).enumerate() {
            // Both chain ends slide so the head and the face stay on under load.
            let style = if link == 0 || link == last_link {
                JoinStyle::Sliding
            } else {
                join_style
            };
            joints.push(JointBinder::bind_and_attach(engine, &pair[0], &pair[1], style)?);
        }

        let bodies: Vec<BodyId> = placed.iter().map(|body| body.id).collect();
        state.last_node = bodies.last().copied();
        debug!(
            record = record.id,
            bodies = bodies.len(),
            joints = joints.len(),
            style = %join_style,
            "row rendered"
        );

        Ok(RowChain {
            record_id: record.id,
            color,
            bodies,
            joints,
        })
    }
}

fn glyph_for(record: &Record, sample: &NormalizedSample, field: Field) -> (&'static str, f32) {
    match field {
        Field::Outcome => (record.outcome_glyph(), 1.0),
        other => (other.glyph(), sample.scale(other)),
    }
}
