mod factory;
mod joints;
mod shape;

pub use factory::{BACKGROUND_Z, FeatureNodeFactory, GLYPH_WIDTH_RATIO};
pub use joints::{JoinStyle, JointBinder, JointSpec, PlacedBody, SLIDING_AXIS};
pub use shape::{
    BodyDescriptor, BodyKind, CollisionProxy, GlyphFont, GlyphLabel, PhysicsBody, PhysicsParams,
    ShapeKind,
};
