//! Core rewriting for esmify.
//!
//! Turns legacy module idioms in JavaScript source into import/export syntax:
//! - `define([deps], factory)` is rewrapped to resolve each dependency in the body
//! - `define(factory)` is flattened into the program, its returns becoming `module.exports`
//! - top-level `require` declarations become hoisted import declarations
//! - `module.exports = value` becomes `export default value`
//!
//! Also carries the helpers the migration tool needs around it: parsing and
//! printing, source file collection and root discovery.

mod collector;
mod config;
mod constants;
mod error;
mod parser;
mod passes;
mod template;
mod transform;
mod types;

// Re-export public API
pub use collector::{SourceCollectorConfig, collect_sources};
pub use config::find_git_root;
pub use constants::JS_EXTENSIONS;
pub use error::TransformError;
pub use parser::{default_source_type, parse, print, verify_output};
pub use passes::{
    DefineFactory, DefineWithDeps, ModuleExports, PASSES, RequireToImport, RewritePass,
};
pub use transform::{TransformContext, transform, transform_with};
pub use types::TransformResult;
