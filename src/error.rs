use thiserror::Error;

use crate::data::Field;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("dataset payload could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("dataset source could not be read: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot sample from an empty dataset")]
    EmptyDataset,

    #[error("field {0:?} has a degenerate range (min == max)")]
    DegenerateRange(Field),

    #[error("shape kind {0:?} cannot be built as a single body")]
    InvalidShapeKind(String),

    #[error("body {0} has no physics proxy to attach a joint to")]
    MissingPhysicsBody(String),
}

pub type Result<T> = std::result::Result<T, ChartError>;
