#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod asset_paths;
pub mod classify;
pub mod config;
pub mod dev;
pub mod document;
pub mod logging;
pub mod models;
pub mod resolver;

pub use classify::Classifier;
pub use config::{ConfigError, MediaConfig};
pub use document::PageRewriter;
pub use models::{Category, ElementContext, MediaKind, Resolution, RewriteReport};
pub use resolver::{LookupError, MediaPathResolver};
