//! The four rewrite passes, run in a fixed order over one shared program.
//!
//! Every pass only inspects statements sitting directly in the program body;
//! the same shapes nested in functions or blocks are never rewritten.

mod define_deps;
mod define_factory;
mod module_exports;
mod require_imports;

use oxc_ast::{Comment, ast::*};

pub use define_deps::DefineWithDeps;
pub use define_factory::DefineFactory;
pub use module_exports::ModuleExports;
pub use require_imports::RequireToImport;

use crate::{error::Result, transform::TransformContext};

/// A single rewrite over the program body.
pub trait RewritePass {
    fn name(&self) -> &'static str;

    /// Returns whether at least one site was rewritten.
    fn run<'a>(&self, program: &mut Program<'a>, ctx: &mut TransformContext<'a>) -> Result<bool>;
}

/// Passes in the order later ones depend on: the factory pass finishes what the
/// dependency-array pass produces, and the export pass finishes the factory pass.
pub const PASSES: [&dyn RewritePass; 4] =
    [&DefineWithDeps, &DefineFactory, &RequireToImport, &ModuleExports];

pub(crate) fn is_identifier(expr: &Expression<'_>, name: &str) -> bool {
    matches!(expr, Expression::Identifier(ident) if ident.name.as_str() == name)
}

/// The call held by a top-level expression statement, if its callee is `callee`.
pub(crate) fn top_level_call_mut<'b, 'a>(
    stmt: &'b mut Statement<'a>,
    callee: &str,
) -> Option<&'b mut CallExpression<'a>> {
    let Statement::ExpressionStatement(es) = stmt else {
        return None;
    };
    let Expression::CallExpression(call) = without_parens_mut(&mut es.expression) else {
        return None;
    };
    if call.optional || !is_identifier(&call.callee, callee) {
        return None;
    }
    Some(&mut **call)
}

/// `((expr))` is matched the same as `expr`.
fn without_parens_mut<'b, 'a>(expr: &'b mut Expression<'a>) -> &'b mut Expression<'a> {
    let mut expr = expr;
    while let Expression::ParenthesizedExpression(paren) = expr {
        expr = &mut paren.expression;
    }
    expr
}

/// Leading comments attached at `from` now lead the statement starting at `to`.
pub(crate) fn move_comments(comments: &mut [Comment], from: u32, to: u32) {
    for comment in comments.iter_mut().filter(|c| c.attached_to == from) {
        comment.attached_to = to;
    }
}

/// Factories must be plain functions with a body to be inlined or rewrapped.
pub(crate) fn is_plain_factory(func: &Function<'_>) -> bool {
    func.body.is_some() && !func.generator && !func.r#async
}
