//! Project management: directory layout, generated files and the full run.

mod emit;
mod updater;
mod workspace;

pub use emit::{CodeEmitter, LookupTableEmitter};
pub use updater::{PackageUpdater, UpdateReport};
pub use workspace::{copy_dependencies, extract_files, list_matching, list_sources, promote_build};
