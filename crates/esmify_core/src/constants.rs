//! Names and file extensions the rewriter keys on.
//!
//! The legacy idioms are recognised purely by identifier name, so the
//! well-known globals live here in one place:
//!
//! - `define(...)`: module registration, with or without a dependency array
//! - `require(...)`: synchronous dependency resolution
//! - `module.exports = ...`: export assignment

/// Callee name of a module definition call
pub const DEFINE_CALLEE: &str = "define";

/// Callee name of a resolver call, also the parameter name of rewritten factories
pub const RESOLVER_CALLEE: &str = "require";

/// Object half of the export assignment target (`module.exports`)
pub const MODULE_OBJECT: &str = "module";

/// Property half of the export assignment target (`module.exports`)
pub const EXPORTS_PROPERTY: &str = "exports";

/// Property read off a resolver call in the default-shorthand form
pub const DEFAULT_PROPERTY: &str = "default";

/// File extensions of JavaScript sources that are candidates for rewriting
pub const JS_EXTENSIONS: &[&str] = &[
    "js",  // JavaScript
    "jsx", // JavaScript with JSX
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
];
