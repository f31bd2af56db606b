use log::{debug, trace};
use oxc_ast::ast::*;
use oxc_ast_visit::{Visit, walk};
use oxc_span::{GetSpan, GetSpanMut};
use oxc_syntax::scope::ScopeFlags;
use std::mem;

use super::{RewritePass, is_identifier};
use crate::{
    constants::{DEFAULT_PROPERTY, RESOLVER_CALLEE},
    error::Result,
    template,
    transform::TransformContext,
};

/// Top-level `const x = require("m")` style declarations become import
/// declarations, hoisted to the front of the program in discovery order.
///
/// - `const a = require("./a").default;` becomes `import a from "./a";`
/// - `const a = require("./a");` becomes `import a from "./a";`
/// - `const { x, y } = require("./m");` becomes `import { x, y } from "./m";`
///
/// Resolver calls inside any function body are reported through
/// [`TransformContext::has_inner_requires`] and never rewritten.
pub struct RequireToImport;

impl RewritePass for RequireToImport {
    fn name(&self) -> &'static str {
        "require-to-import"
    }

    fn run<'a>(&self, program: &mut Program<'a>, ctx: &mut TransformContext<'a>) -> Result<bool> {
        let body = mem::replace(&mut program.body, ctx.ast.vec());
        let mut pending: Vec<Statement<'a>> = Vec::new();

        for stmt in body {
            match import_for(ctx, &stmt)? {
                Some(mut import) => {
                    // Comments leading the declaration lead its import
                    *import.span_mut() = stmt.span();
                    pending.push(import);
                }
                None => program.body.push(stmt),
            }
        }

        if InnerRequireScan::detect(program) {
            debug!("Found resolver calls inside function bodies");
            ctx.has_inner_requires = true;
        }

        if pending.is_empty() {
            return Ok(false);
        }

        debug!("Hoisting {} generated imports", pending.len());
        let rest = mem::replace(&mut program.body, ctx.ast.vec_from_iter(pending));
        program.body.extend(rest);
        Ok(true)
    }
}

/// The import replacing `stmt`, when it is a single-binding resolver declaration.
fn import_for<'a>(
    ctx: &TransformContext<'a>,
    stmt: &Statement<'a>,
) -> Result<Option<Statement<'a>>> {
    let Statement::VariableDeclaration(decl) = stmt else {
        return Ok(None);
    };
    if decl.declarations.len() != 1 {
        return Ok(None);
    }
    let declarator = &decl.declarations[0];
    let Some(init) = &declarator.init else {
        return Ok(None);
    };

    match init {
        Expression::StaticMemberExpression(member)
            if !member.optional && member.property.name.as_str() == DEFAULT_PROPERTY =>
        {
            let Some(source) = resolver_source(&member.object) else {
                return Ok(None);
            };
            let BindingPatternKind::BindingIdentifier(ident) = &declarator.id.kind else {
                trace!("Skipping default-shorthand require with a destructured binding");
                return Ok(None);
            };
            trace!("Default-shorthand require of '{}' as {}", source, ident.name);
            template::default_import(ctx.allocator, &ident.name, source).map(Some)
        }
        Expression::CallExpression(_) => {
            let Some(source) = resolver_source(init) else {
                return Ok(None);
            };
            match &declarator.id.kind {
                BindingPatternKind::BindingIdentifier(ident) => {
                    trace!("Require of '{}' as {}", source, ident.name);
                    template::default_import(ctx.allocator, &ident.name, source).map(Some)
                }
                BindingPatternKind::ObjectPattern(pattern) => {
                    let Some(names) = shorthand_keys(pattern) else {
                        trace!("Skipping destructured require of '{}' with renames", source);
                        return Ok(None);
                    };
                    trace!("Destructured require of '{}': {:?}", source, names);
                    template::named_import(ctx.allocator, &names, source).map(Some)
                }
                _ => Ok(None),
            }
        }
        _ => Ok(None),
    }
}

/// The module path of `require("path")`.
fn resolver_source<'b>(expr: &'b Expression<'_>) -> Option<&'b str> {
    let Expression::CallExpression(call) = expr else {
        return None;
    };
    if call.optional || !is_identifier(&call.callee, RESOLVER_CALLEE) || call.arguments.len() != 1
    {
        return None;
    }
    match &call.arguments[0] {
        Argument::StringLiteral(lit) => Some(lit.value.as_str()),
        _ => None,
    }
}

/// Keys of `{ a, b }`; `None` for renames, defaults, computed keys or rest elements.
fn shorthand_keys<'b>(pattern: &'b ObjectPattern<'_>) -> Option<Vec<&'b str>> {
    if pattern.rest.is_some() {
        return None;
    }
    pattern
        .properties
        .iter()
        .map(|prop| {
            if prop.computed || !prop.shorthand {
                return None;
            }
            let PropertyKey::StaticIdentifier(key) = &prop.key else {
                return None;
            };
            match &prop.value.kind {
                BindingPatternKind::BindingIdentifier(_) => Some(key.name.as_str()),
                _ => None,
            }
        })
        .collect()
}

/// Looks for resolver calls whose nearest enclosing function is not the program.
/// Class field initializers and static blocks count as functions.
#[derive(Default)]
struct InnerRequireScan {
    function_depth: usize,
    found: bool,
}

impl InnerRequireScan {
    fn detect(program: &Program<'_>) -> bool {
        let mut scan = Self::default();
        scan.visit_program(program);
        scan.found
    }
}

impl<'a> Visit<'a> for InnerRequireScan {
    fn visit_function(&mut self, func: &Function<'a>, flags: ScopeFlags) {
        self.function_depth += 1;
        walk::walk_function(self, func, flags);
        self.function_depth -= 1;
    }

    fn visit_arrow_function_expression(&mut self, arrow: &ArrowFunctionExpression<'a>) {
        self.function_depth += 1;
        walk::walk_arrow_function_expression(self, arrow);
        self.function_depth -= 1;
    }

    fn visit_property_definition(&mut self, prop: &PropertyDefinition<'a>) {
        self.function_depth += 1;
        walk::walk_property_definition(self, prop);
        self.function_depth -= 1;
    }

    fn visit_static_block(&mut self, block: &StaticBlock<'a>) {
        self.function_depth += 1;
        walk::walk_static_block(self, block);
        self.function_depth -= 1;
    }

    fn visit_call_expression(&mut self, call: &CallExpression<'a>) {
        if self.function_depth > 0 && is_identifier(&call.callee, RESOLVER_CALLEE) {
            trace!("Resolver call nested in a function");
            self.found = true;
        }
        walk::walk_call_expression(self, call);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::test_support::{compact, run_pass};

    #[test]
    fn test_default_shorthand_require() {
        let out = run_pass(&RequireToImport, r#"const a = require("./a").default;"#);
        assert!(out.rewrote);
        assert_eq!(out.code, compact(r#"import a from "./a";"#));
    }

    #[test]
    fn test_plain_require_becomes_default_import() {
        let out = run_pass(&RequireToImport, r#"var fs = require("fs");"#);
        assert!(out.rewrote);
        assert_eq!(out.code, compact(r#"import fs from "fs";"#));
    }

    #[test]
    fn test_destructured_require_becomes_named_import() {
        let out = run_pass(&RequireToImport, r#"const {x, y} = require("./m");"#);
        assert!(out.rewrote);
        assert_eq!(out.code, compact(r#"import { x, y } from "./m";"#));
    }

    #[test]
    fn test_imports_are_hoisted_in_discovery_order() {
        let out = run_pass(
            &RequireToImport,
            r#"
            start();
            const b = require("./b");
            middle();
            const { a } = require("./a");
            let c = require("./c").default;
            end();
            "#,
        );
        assert_eq!(
            out.code,
            compact(
                r#"
                import b from "./b";
                import { a } from "./a";
                import c from "./c";
                start();
                middle();
                end();
                "#
            )
        );
    }

    #[test]
    fn test_unsupported_shapes_are_left_alone() {
        for source in [
            r#"const { x: renamed } = require("./m");"#,
            r#"const { x = 1 } = require("./m");"#,
            r#"const { x, ...rest } = require("./m");"#,
            r#"const [first] = require("./m");"#,
            r#"const { x } = require("./m").default;"#,
            r#"const a = require("./a"), b = require("./b");"#,
            r#"const a = require(name);"#,
            r#"const a = require("./a", extra);"#,
            r#"const a = require("./a").other;"#,
            r#"const a = load("./a");"#,
            r#"for (const a = require("./a"); a; ) {}"#,
            r#"export const a = require("./a");"#,
        ] {
            let out = run_pass(&RequireToImport, source);
            assert!(!out.rewrote, "unexpected rewrite of {source}");
            assert!(!out.code.contains("import"), "unexpected rewrite of {source}");
        }
    }

    #[test]
    fn test_nested_require_sets_flag_without_blocking_top_level() {
        let out = run_pass(
            &RequireToImport,
            r#"
            const a = require("./a");
            function lazy() { return require("./b"); }
            "#,
        );
        assert!(out.rewrote);
        assert!(out.has_inner_requires);
        assert!(out.code.starts_with(&compact(r#"import a from "./a";"#)));
        assert!(out.code.contains(&compact(r#"require("./b")"#)));
    }

    #[test]
    fn test_inner_require_detected_at_any_depth() {
        for source in [
            r#"const f = () => require("./x");"#,
            r#"class C { load() { return require("./x"); } }"#,
            r#"run(function () { if (ok) { [1].map(() => require("./x")); } });"#,
        ] {
            let out = run_pass(&RequireToImport, source);
            assert!(out.has_inner_requires, "missed nested require in {source}");
            assert!(!out.rewrote);
        }
    }

    #[test]
    fn test_class_field_and_static_block_requires_are_flagged() {
        for source in [
            r#"class A { x = require("./a"); }"#,
            r#"class B { static { require("./b"); } }"#,
            r#"const C = class { static y = require("./c"); };"#,
        ] {
            let out = run_pass(&RequireToImport, source);
            assert!(out.has_inner_requires, "missed class-scoped require in {source}");
        }
    }

    #[test]
    fn test_comment_moves_with_hoisted_import() {
        let out = run_pass(
            &RequireToImport,
            "start();\n// the a module\nconst a = require(\"./a\");\n",
        );
        let comment = out.code.find("//theamodule").unwrap();
        let import = out.code.find("importafrom").unwrap();
        let start = out.code.find("start();").unwrap();
        assert!(comment < import && import < start, "unexpected layout: {}", out.code);
    }

    #[test]
    fn test_top_level_block_require_is_neither_rewritten_nor_flagged() {
        let out = run_pass(&RequireToImport, r#"if (dev) { const a = require("./a"); }"#);
        assert!(!out.rewrote);
        assert!(!out.has_inner_requires);
    }
}
