//! Builds whole structures (a data row, a two-bar chart, a balance scale) out
//! of factory bodies and binder joints.

mod chart;
mod row;

use tracing::trace;

use crate::build::{BodyDescriptor, PlacedBody};
use crate::engine::HostEngine;
use crate::sim::SimulationState;

pub use chart::{ChartBars, ChartRenderer, ScaleBodies};
pub use row::{RowChain, RowRenderer};

/// How a data row is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowBodies {
    /// Field glyphs with an outcome face at the end.
    #[default]
    Glyphs,
    /// Rectangles of the selected size.
    Shapes,
}

impl RowBodies {
    pub const ALL: [RowBodies; 2] = [RowBodies::Glyphs, RowBodies::Shapes];

    pub fn label(self) -> &'static str {
        match self {
            Self::Glyphs => "glyphs",
            Self::Shapes => "shapes",
        }
    }
}

/// Creates the body, adds it to the scene and counts it.
pub(crate) fn place<E: HostEngine + ?Sized>(
    engine: &mut E,
    state: &mut SimulationState,
    descriptor: BodyDescriptor,
) -> PlacedBody {
    let id = engine.create_body(&descriptor);
    engine.add_to_scene(id);
    state.note_body_created();
    trace!(body = %id, kind = ?descriptor.kind, "body placed");
    PlacedBody { id, descriptor }
}
