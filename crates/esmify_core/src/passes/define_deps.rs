use log::{debug, trace};
use oxc_ast::ast::*;
use std::mem;

use super::{RewritePass, is_plain_factory, top_level_call_mut};
use crate::{constants::DEFINE_CALLEE, error::Result, template, transform::TransformContext};

/// `define([deps], function (a, b) { ... })` becomes
/// `define(function (require) { const a = require(dep0); const b = require(dep1); ... })`.
pub struct DefineWithDeps;

impl RewritePass for DefineWithDeps {
    fn name(&self) -> &'static str {
        "define-with-deps"
    }

    fn run<'a>(&self, program: &mut Program<'a>, ctx: &mut TransformContext<'a>) -> Result<bool> {
        let mut rewritten = 0;

        for stmt in program.body.iter_mut() {
            let Some(call) = top_level_call_mut(stmt, DEFINE_CALLEE) else {
                continue;
            };
            if rewrap_define_call(ctx, call)? {
                rewritten += 1;
            }
        }

        debug!("Rewrapped {} define calls with dependency arrays", rewritten);
        Ok(rewritten > 0)
    }
}

/// Rewrap a `define([deps], function (...) {...})` call in place, leaving
/// `define(function (require) {...})`. Returns false when the call does not qualify.
pub(super) fn rewrap_define_call<'a>(
    ctx: &TransformContext<'a>,
    call: &mut CallExpression<'a>,
) -> Result<bool> {
    if call.arguments.len() != 2 {
        trace!("Skipping define call with {} arguments", call.arguments.len());
        return Ok(false);
    }
    let Some(deps) = dependency_paths(&call.arguments[0]) else {
        trace!("Skipping define call without a literal dependency array");
        return Ok(false);
    };
    let Argument::FunctionExpression(func) = &mut call.arguments[1] else {
        trace!("Skipping define call whose factory is not a function expression");
        return Ok(false);
    };
    if !is_plain_factory(func) || !has_simple_params(&func.params) {
        trace!("Skipping define call with an unsupported factory signature");
        return Ok(false);
    }

    trace!("Rewrapping define factory with {} dependencies", deps.len());
    rewrap_factory(ctx, func, &deps)?;
    call.arguments.remove(0);
    Ok(true)
}

fn dependency_paths(arg: &Argument<'_>) -> Option<Vec<String>> {
    let Argument::ArrayExpression(array) = arg else {
        return None;
    };
    array
        .elements
        .iter()
        .map(|element| match element {
            ArrayExpressionElement::StringLiteral(lit) => Some(lit.value.to_string()),
            _ => None,
        })
        .collect()
}

/// Parameters that can stand alone as the binding of a `const` declaration.
fn has_simple_params(params: &FormalParameters<'_>) -> bool {
    params.rest.is_none()
        && params
            .items
            .iter()
            .all(|param| !matches!(param.pattern.kind, BindingPatternKind::AssignmentPattern(_)))
}

/// Turn positional parameters into resolver bindings at the top of the body and
/// give the factory the single `require` parameter. Bindings are created for
/// `min(params, deps)` pairs.
fn rewrap_factory<'a>(
    ctx: &TransformContext<'a>,
    func: &mut Function<'a>,
    deps: &[String],
) -> Result<()> {
    let params = mem::replace(&mut func.params.items, ctx.ast.vec());
    let mut statements = ctx.ast.vec();
    for (param, dep) in params.into_iter().zip(deps) {
        statements.push(template::resolver_binding(ctx.allocator, param.pattern, dep)?);
    }

    template::use_resolver_param(ctx.allocator, func)?;
    func.id = None;

    if let Some(body) = func.body.as_mut() {
        let original = mem::replace(&mut body.statements, statements);
        body.statements.extend(original);
    }
    Ok(())
}
