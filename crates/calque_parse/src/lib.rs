//! Permissive HTML parser for Calque.
//!
//! Turns template source text into a mutable [`calque_dom::Document`]. The
//! parser is deliberately forgiving: templates are developer-authored, so it
//! never fails: unterminated constructs are consumed as-is, unmatched end
//! tags are dropped, and anything still open at end of input is implicitly
//! closed.
//!
//! This is NOT an HTML5-conformant parser. Entities are left undecoded,
//! no implied `<html>`/`<head>`/`<body>` structure is synthesized, and there
//! is no foster parenting. The converter only needs a faithful tree of what
//! the author wrote.

mod parser;

pub use parser::parse;
