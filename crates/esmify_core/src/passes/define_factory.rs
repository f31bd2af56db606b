use log::{debug, trace};
use oxc_ast::ast::*;
use oxc_span::{GetSpan, GetSpanMut};
use std::{collections::VecDeque, mem};

use super::{
    RewritePass, define_deps::rewrap_define_call, is_plain_factory, move_comments,
    top_level_call_mut,
};
use crate::{constants::DEFINE_CALLEE, error::Result, template, transform::TransformContext};

/// `define(function () { ...; return value; })` is replaced in place by the
/// factory's statements, with its top-level returns turned into
/// `module.exports = value;`.
pub struct DefineFactory;

impl RewritePass for DefineFactory {
    fn name(&self) -> &'static str {
        "define-factory"
    }

    fn run<'a>(&self, program: &mut Program<'a>, ctx: &mut TransformContext<'a>) -> Result<bool> {
        // Each statement carries whether it was spliced in by flattening
        let body = mem::replace(&mut program.body, ctx.ast.vec());
        let mut queue: VecDeque<(Statement<'a>, bool)> = body
            .into_iter()
            .map(|stmt| (stmt, false))
            .collect();
        let mut flattened = 0;

        // Spliced statements go back to the front of the queue so a factory that
        // only becomes top-level after flattening is handled as well. A dependency-array
        // define exposed that way is rewrapped first, then flattened.
        while let Some((mut stmt, exposed)) = queue.pop_front() {
            if exposed
                && let Some(call) = top_level_call_mut(&mut stmt, DEFINE_CALLEE)
                && call.arguments.len() == 2
                && rewrap_define_call(ctx, call)?
            {
                trace!("Rewrapped define exposed by flattening");
            }
            let inlined = match factory_mut(&mut stmt) {
                Some(func) => Some(inline_factory(ctx, func)?),
                None => None,
            };
            match inlined {
                Some(statements) => {
                    trace!("Flattening define factory with {} statements", statements.len());
                    if let Some(first) = statements.first() {
                        let (from, to) = (stmt.span().start, first.span().start);
                        move_comments(&mut program.comments, from, to);
                    }
                    for inner in statements.into_iter().rev() {
                        queue.push_front((inner, true));
                    }
                    flattened += 1;
                }
                None => program.body.push(stmt),
            }
        }

        debug!("Flattened {} define factories", flattened);
        Ok(flattened > 0)
    }
}

fn factory_mut<'b, 'a>(stmt: &'b mut Statement<'a>) -> Option<&'b mut Function<'a>> {
    let call = top_level_call_mut(stmt, DEFINE_CALLEE)?;
    if call.arguments.len() != 1 {
        return None;
    }
    let Some(Argument::FunctionExpression(func)) = call.arguments.first_mut() else {
        return None;
    };
    if !is_plain_factory(func) {
        return None;
    }
    Some(&mut **func)
}

/// Convert the factory's own returns and hand back its statements. Returns
/// nested in blocks, conditionals or loops are left as they are.
fn inline_factory<'a>(
    ctx: &TransformContext<'a>,
    func: &mut Function<'a>,
) -> Result<Vec<Statement<'a>>> {
    let Some(body) = func.body.as_mut() else {
        return Ok(Vec::new());
    };

    for stmt in body.statements.iter_mut() {
        let Statement::ReturnStatement(ret) = stmt else {
            continue;
        };
        let span = ret.span;
        let value = ret.argument.take();
        *stmt = template::export_assignment(ctx.allocator, value)?;
        // Comments leading the return lead the assignment
        *stmt.span_mut() = span;
    }

    if !body.directives.is_empty() {
        trace!("Dropping {} factory directives", body.directives.len());
    }
    Ok(mem::replace(&mut body.statements, ctx.ast.vec()).into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{compact, run_pass};

    #[test]
    fn test_flattens_factory_in_place() {
        let out = run_pass(
            &DefineFactory,
            "before(); define(function(){ var z = 1; return z; }); after();",
        );
        assert!(out.rewrote);
        assert_eq!(out.code, compact("before(); var z = 1; module.exports = z; after();"));
    }

    #[test]
    fn test_nested_returns_are_left_unconverted() {
        let out = run_pass(
            &DefineFactory,
            "define(function(){ if (ready) { return a; } function f(){ return 1; } return b; })",
        );
        assert!(out.rewrote);
        assert_eq!(
            out.code,
            compact(
                "if (ready) { return a; }
                 function f() { return 1; }
                 module.exports = b;"
            )
        );
    }

    #[test]
    fn test_changed_without_any_return() {
        let out = run_pass(&DefineFactory, "define(function(){ setup(); })");
        assert!(out.rewrote);
        assert_eq!(out.code, compact("setup();"));
    }

    #[test]
    fn test_bare_return_exports_undefined() {
        let out = run_pass(&DefineFactory, "define(function(){ init(); return; })");
        assert_eq!(out.code, compact("init(); module.exports = undefined;"));
    }

    #[test]
    fn test_factory_with_resolver_param_is_flattened() {
        let out = run_pass(
            &DefineFactory,
            r#"define(function(require){ const a = require("a"); return a; })"#,
        );
        assert_eq!(out.code, compact(r#"const a = require("a"); module.exports = a;"#));
    }

    #[test]
    fn test_directive_prologue_is_dropped() {
        let out = run_pass(&DefineFactory, r#"define(function(){ "use strict"; return 1; })"#);
        assert_eq!(out.code, compact("module.exports = 1;"));
    }

    #[test]
    fn test_factory_exposed_by_flattening_is_flattened() {
        let out = run_pass(
            &DefineFactory,
            "define(function(){ define(function(){ return inner; }); outer(); })",
        );
        assert_eq!(out.code, compact("module.exports = inner; outer();"));
    }

    #[test]
    fn test_parenthesized_call_is_flattened() {
        let out = run_pass(&DefineFactory, "(define(function(){ return 1; }));");
        assert!(out.rewrote);
        assert_eq!(out.code, compact("module.exports = 1;"));
    }

    #[test]
    fn test_dependency_define_exposed_by_flattening_is_rewrapped_and_flattened() {
        let out = run_pass(
            &DefineFactory,
            r#"define(function(){ define(["a"], function(a){ use(a); }); })"#,
        );
        assert!(out.rewrote);
        assert_eq!(out.code, compact(r#"const a = require("a"); use(a);"#));
    }

    #[test]
    fn test_comments_survive_flattening() {
        let out = run_pass(
            &DefineFactory,
            "/* header */\ndefine(function(){\n  init();\n  // the value\n  return value;\n});",
        );
        assert_eq!(
            out.code,
            compact("/* header */ init(); // the value\n module.exports = value;")
        );
    }

    #[test]
    fn test_non_top_level_and_mismatched_calls_are_left_alone() {
        for source in [
            "function f(){ define(function(){ return 1; }); }",
            "if (x) { define(function(){ return 1; }); }",
            "define(factory);",
            "define(() => 1);",
            r#"define(["a"], function(a){ return a; });"#,
            "const m = define(function(){ return 1; });",
        ] {
            let out = run_pass(&DefineFactory, source);
            assert!(!out.rewrote, "unexpected rewrite of {source}");
            assert!(!out.code.contains("module.exports"), "unexpected rewrite of {source}");
        }
    }
}
