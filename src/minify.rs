//! Worker script minification.
//!
//! Uses oxc: parse, compress + mangle, then print without comments.

use oxc::allocator::Allocator;
use oxc::codegen::{Codegen, CodegenOptions, CommentOptions};
use oxc::mangler::MangleOptions;
use oxc::minifier::{CompressOptions, MinifierOptions};
use oxc::parser::Parser;
use oxc::span::SourceType;
use std::path::Path;
use thiserror::Error;

/// Shrinks generated script text. The filename selects the source type.
pub trait Minifier: Send + Sync {
    fn minify(&self, filename: &str, source: &str) -> Result<String, MinificationError>;
}

#[derive(Debug, Error)]
pub enum MinificationError {
    #[error("failed to parse {filename}: {message}")]
    Parse { filename: String, message: String },
}

/// oxc-based JavaScript minifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct OxcMinifier;

impl Minifier for OxcMinifier {
    fn minify(&self, filename: &str, source: &str) -> Result<String, MinificationError> {
        let source_type = source_type(filename);

        let allocator = Allocator::default();
        let ret = Parser::new(&allocator, source, source_type).parse();
        if ret.panicked || !ret.errors.is_empty() {
            let message = ret
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(MinificationError::Parse {
                filename: filename.to_string(),
                message,
            });
        }

        let mut program = ret.program;
        let options = MinifierOptions {
            mangle: Some(MangleOptions::default()),
            compress: Some(CompressOptions::smallest()),
        };
        let ret = oxc::minifier::Minifier::new(options).minify(&allocator, &mut program);
        let code = Codegen::new()
            .with_options(CodegenOptions {
                minify: true,
                comments: CommentOptions::disabled(),
                ..CodegenOptions::default()
            })
            .with_scoping(ret.scoping)
            .build(&program)
            .code;
        Ok(code)
    }
}

/// Workers are classic scripts unless the file is `.mjs`.
fn source_type(filename: &str) -> SourceType {
    match Path::new(filename).extension().and_then(|ext| ext.to_str()) {
        Some("mjs") => SourceType::mjs(),
        _ => SourceType::cjs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minify_shrinks_and_strips_comments() {
        let source = r#"
            // install handler
            self.addEventListener('install', function (event) {
                var longVariableName = 'precache';
                console.log(longVariableName);
            });
        "#;
        let out = OxcMinifier.minify("service-worker.js", source).unwrap();
        assert!(out.len() < source.len());
        assert!(!out.contains("install handler"));
        assert!(out.contains("addEventListener"));
    }

    #[test]
    fn test_minify_rejects_syntax_errors() {
        let err = OxcMinifier
            .minify("service-worker.js", "function (")
            .unwrap_err();
        assert!(matches!(err, MinificationError::Parse { .. }));
    }

    #[test]
    fn test_unknown_extension_parses_as_script() {
        let source = "var longVariableName = 1; console.log(longVariableName);";
        for name in ["sw.txt", "service-worker"] {
            let out = OxcMinifier.minify(name, source).unwrap();
            assert!(out.contains("console.log"));
        }
    }

    #[test]
    fn test_mjs_parses_as_module() {
        let out = OxcMinifier
            .minify("sw.mjs", "import a from './a.mjs';\nexport default a;\n")
            .unwrap();
        assert!(out.contains("import"));
    }
}
