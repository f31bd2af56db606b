use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::AstBuilder;
use oxc_span::SourceType;

use crate::{
    error::Result,
    parser::{default_source_type, parse, print},
    passes::PASSES,
    types::TransformResult,
};

/// State shared by the passes of one transform invocation.
pub struct TransformContext<'a> {
    pub allocator: &'a Allocator,
    pub ast: AstBuilder<'a>,
    /// Set when a resolver call is found inside any function body
    pub has_inner_requires: bool,
}

impl<'a> TransformContext<'a> {
    pub fn new(allocator: &'a Allocator) -> Self {
        Self { allocator, ast: AstBuilder::new(allocator), has_inner_requires: false }
    }
}

/// Rewrite legacy module idioms in `source` to import/export syntax.
pub fn transform(source: &str) -> Result<TransformResult> {
    transform_with(source, default_source_type())
}

/// Parse once, run every pass over the same tree, and print only if a pass
/// rewrote something. Both flags are reported either way.
pub fn transform_with(source: &str, source_type: SourceType) -> Result<TransformResult> {
    let allocator = Allocator::default();
    let mut program = parse(&allocator, source, source_type)?;
    let mut ctx = TransformContext::new(&allocator);

    let mut is_changed = false;
    for pass in PASSES {
        let rewrote = pass.run(&mut program, &mut ctx)?;
        trace!("Pass {} rewrote: {}", pass.name(), rewrote);
        is_changed |= rewrote;
    }

    let code = is_changed.then(|| print(&program));
    debug!("Transform finished: changed={}, inner_requires={}", is_changed, ctx.has_inner_requires);

    Ok(TransformResult { code, is_changed, has_inner_requires: ctx.has_inner_requires })
}
