//! Parser backend seam for the analyzer.
//!
//! The analyzer performs one pre-order walk over a tree-sitter tree; which
//! grammar produced that tree is injected here so the walk is portable
//! across TSX/TS/JS backends.

use tree_sitter::{Language, Parser, Tree};

/// Narrow parsing capability: source text in, syntax tree out.
pub trait ParserBackend: Send {
    /// Parse source text. `None` means the backend could not produce a
    /// tree; callers degrade rather than fail.
    fn parse(&mut self, source: &str) -> Option<Tree>;
}

/// TSX grammar backend (also covers plain TypeScript component files).
pub struct TsxBackend {
    parser: Parser,
}

impl TsxBackend {
    pub fn new() -> Self {
        let mut parser = Parser::new();
        let language: Language = tree_sitter_typescript::LANGUAGE_TSX.into();
        // A grammar ABI mismatch leaves the parser without a language;
        // parse() then yields None and analysis degrades to an empty model.
        let _ = parser.set_language(&language);
        Self { parser }
    }
}

impl Default for TsxBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ParserBackend for TsxBackend {
    fn parse(&mut self, source: &str) -> Option<Tree> {
        self.parser.parse(source, None)
    }
}
