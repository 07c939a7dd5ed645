//! Structural rewriting of extracted aggregation files.

mod pipeline;
mod record;
mod strategy;

pub use pipeline::FileTransformPipeline;
pub use record::SyncRecord;
pub use strategy::{SUB_AGGREGATIONS, Strategy};
