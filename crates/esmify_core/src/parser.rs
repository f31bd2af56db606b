use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::Program;
use oxc_codegen::Codegen;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;

use crate::error::{Result, TransformError};

/// Parse `source` into a program living in `allocator`.
///
/// Any diagnostic is treated as a hard failure; no partial tree is returned.
pub fn parse<'a>(
    allocator: &'a Allocator,
    source: &'a str,
    source_type: SourceType,
) -> Result<Program<'a>> {
    trace!("Parsing {} bytes", source.len());
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(allocator, source, source_type).parse();

    if let Some(err) = errors.first() {
        debug!("Parse failed with {} diagnostics", errors.len());
        return Err(TransformError::parse(err.to_string()));
    }
    if panicked {
        return Err(TransformError::parse("parser aborted"));
    }

    Ok(program)
}

pub fn print(program: &Program<'_>) -> String {
    Codegen::new().build(program).code
}

/// Check that emitted text still parses under the same source type.
pub fn verify_output(code: &str, source_type: SourceType) -> Result<()> {
    let allocator = Allocator::default();
    parse(&allocator, code, source_type)
        .map(|_| ())
        .map_err(|e| match e {
            TransformError::Parse { message } => TransformError::invalid_output(message),
            other => other,
        })
}

/// Module-mode JavaScript with JSX. CommonJS sources are parsed the same way
/// since the rewritten output is ESM.
pub fn default_source_type() -> SourceType {
    SourceType::mjs().with_jsx(true)
}
