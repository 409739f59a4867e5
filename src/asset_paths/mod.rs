//! String helpers for taking media references apart and putting them back together.
//!
//! Each submodule handles one concern so the classification rules and the resolver can
//! share them: filtering out references that are not site media, detecting and appending
//! the cache-busting marker, splitting filenames from their directories, and expanding a
//! category name into the path segments it may appear as.

mod filename;
mod filters;
mod marker;
mod segments;

pub use filename::{extract_filename, is_flat_under, join_base};
pub use filters::is_external_reference;
pub use marker::{append_marker, has_marker};
pub use segments::category_segments;
