mod parse;
mod record;
mod repository;

pub use record::{Field, HAPPY_FACE, Record, SAD_FACE, is_face_glyph};
pub use repository::{DataRepository, Dataset, FieldRange, NormalizedSample};

/// Sample of the record set shipped with the application, keeping the full
/// set's outcome split. `--data` loads the complete file.
pub const BUNDLED_DATASET: &str = include_str!("../../data/diabetes.json");
