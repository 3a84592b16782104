//! Diff engine configuration (`redline.toml`)

pub mod consts;
mod model;

pub use model::{
    AlignmentConfig, DiffConfig, Engine, LineAwareConfig, ParserConfig, SimilarityConfig,
    UnmappedPolicy,
};
