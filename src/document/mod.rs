//! Rendered page handling: locating media attributes and rewriting them in place.

mod rewrite;
mod scanner;

pub use rewrite::{PageRewriter, collect_html_files, page_path_for};
pub use scanner::{AttributeRole, MediaAttribute, scan_media_attributes};
