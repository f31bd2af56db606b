use log::{debug, trace};
use oxc_allocator::TakeIn;
use oxc_ast::ast::*;
use oxc_span::{GetSpan, GetSpanMut};
use oxc_syntax::operator::AssignmentOperator;

use super::{RewritePass, is_identifier};
use crate::{
    constants::{EXPORTS_PROPERTY, MODULE_OBJECT},
    error::Result,
    template,
    transform::TransformContext,
};

/// Top-level `module.exports = value;` becomes `export default value;`.
///
/// Every right-hand side, object literals included, is a single default export.
pub struct ModuleExports;

impl RewritePass for ModuleExports {
    fn name(&self) -> &'static str {
        "module-exports"
    }

    fn run<'a>(&self, program: &mut Program<'a>, ctx: &mut TransformContext<'a>) -> Result<bool> {
        let mut rewritten = 0;

        for stmt in program.body.iter_mut() {
            let Some(value) = take_exported_value(ctx, stmt) else {
                continue;
            };
            trace!("Converting export assignment to default export");
            let span = stmt.span();
            *stmt = template::export_default(ctx.allocator, value)?;
            // Comments leading the assignment lead the export
            *stmt.span_mut() = span;
            rewritten += 1;
        }

        debug!("Converted {} export assignments", rewritten);
        Ok(rewritten > 0)
    }
}

fn take_exported_value<'a>(
    ctx: &TransformContext<'a>,
    stmt: &mut Statement<'a>,
) -> Option<Expression<'a>> {
    let Statement::ExpressionStatement(es) = stmt else {
        return None;
    };
    let Expression::AssignmentExpression(assign) = &mut es.expression else {
        return None;
    };
    if assign.operator != AssignmentOperator::Assign {
        return None;
    }
    let AssignmentTarget::StaticMemberExpression(member) = &assign.left else {
        return None;
    };
    if !is_identifier(&member.object, MODULE_OBJECT)
        || member.property.name.as_str() != EXPORTS_PROPERTY
    {
        return None;
    }
    Some(assign.right.take_in(ctx.allocator))
}
