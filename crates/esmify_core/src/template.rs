//! Synthetic statements built from small source templates.
//!
//! Each template is parsed into the caller's arena and the original nodes are
//! spliced into its holes afterwards. Template spans are cleared so comments
//! of the file being rewritten never attach to synthetic nodes.

use log::trace;
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_ast_visit::VisitMut;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::{SPAN, SourceType, Span};
use std::mem;

use crate::{
    constants::{DEFINE_CALLEE, EXPORTS_PROPERTY, MODULE_OBJECT, RESOLVER_CALLEE},
    error::{Result, TransformError},
};

struct ClearSpans;

impl<'a> VisitMut<'a> for ClearSpans {
    fn visit_span(&mut self, span: &mut Span) {
        *span = SPAN;
    }
}

fn statement<'a>(allocator: &'a Allocator, text: &str) -> Result<Statement<'a>> {
    trace!("Building template: {}", text);
    let text: &'a str = allocator.alloc_str(text);
    let ParserReturn { mut program, errors, .. } =
        OxcParser::new(allocator, text, SourceType::mjs()).parse();

    if let Some(err) = errors.first() {
        return Err(TransformError::template(text, err.to_string()));
    }
    let mut stmt = match program.body.pop() {
        Some(stmt) if program.body.is_empty() => stmt,
        _ => return Err(TransformError::template(text, "expected exactly one statement")),
    };

    ClearSpans.visit_statement(&mut stmt);
    Ok(stmt)
}

fn string_literal(value: &str) -> Result<String> {
    serde_json::to_string(value).map_err(|e| TransformError::template(value, e.to_string()))
}

fn shape_error(template: &str) -> TransformError {
    TransformError::template(template, "unexpected template shape")
}

/// `const <pattern> = require("<source>");`
pub fn resolver_binding<'a>(
    allocator: &'a Allocator,
    pattern: BindingPattern<'a>,
    source: &str,
) -> Result<Statement<'a>> {
    let text = format!("const __dep = {}({});", RESOLVER_CALLEE, string_literal(source)?);
    let mut stmt = statement(allocator, &text)?;

    let Statement::VariableDeclaration(decl) = &mut stmt else {
        return Err(shape_error(&text));
    };
    let Some(declarator) = decl.declarations.first_mut() else {
        return Err(shape_error(&text));
    };
    declarator.id = pattern;
    Ok(stmt)
}

/// Replace the parameter list of `func` with the single `require` parameter.
pub fn use_resolver_param<'a>(allocator: &'a Allocator, func: &mut Function<'a>) -> Result<()> {
    let text = format!("{}(function ({}) {{}});", DEFINE_CALLEE, RESOLVER_CALLEE);
    let mut stmt = statement(allocator, &text)?;

    if let Statement::ExpressionStatement(es) = &mut stmt
        && let Expression::CallExpression(call) = &mut es.expression
        && let Some(Argument::FunctionExpression(template_fn)) = call.arguments.first_mut()
    {
        mem::swap(&mut func.params, &mut template_fn.params);
        return Ok(());
    }
    Err(shape_error(&text))
}

/// `module.exports = <value>;`, with `undefined` standing in for a missing value.
pub fn export_assignment<'a>(
    allocator: &'a Allocator,
    value: Option<Expression<'a>>,
) -> Result<Statement<'a>> {
    let text = format!("{}.{} = undefined;", MODULE_OBJECT, EXPORTS_PROPERTY);
    let mut stmt = statement(allocator, &text)?;

    let Some(value) = value else {
        return Ok(stmt);
    };
    if let Statement::ExpressionStatement(es) = &mut stmt
        && let Expression::AssignmentExpression(assign) = &mut es.expression
    {
        assign.right = value;
        return Ok(stmt);
    }
    Err(shape_error(&text))
}

/// `export default <value>;`
pub fn export_default<'a>(
    allocator: &'a Allocator,
    value: Expression<'a>,
) -> Result<Statement<'a>> {
    let text = "export default undefined;";
    let mut stmt = statement(allocator, text)?;

    let Statement::ExportDefaultDeclaration(decl) = &mut stmt else {
        return Err(shape_error(text));
    };
    decl.declaration = ExportDefaultDeclarationKind::from(value);
    Ok(stmt)
}

/// `import <local> from "<source>";`
pub fn default_import<'a>(
    allocator: &'a Allocator,
    local: &str,
    source: &str,
) -> Result<Statement<'a>> {
    statement(allocator, &format!("import {} from {};", local, string_literal(source)?))
}

/// `import { a, b } from "<source>";`, each name imported under itself.
pub fn named_import<'a, S: AsRef<str>>(
    allocator: &'a Allocator,
    names: &[S],
    source: &str,
) -> Result<Statement<'a>> {
    let specifiers = names.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(", ");
    let text = format!("import {{ {} }} from {};", specifiers, string_literal(source)?);
    statement(allocator, &text)
}
