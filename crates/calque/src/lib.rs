//! # calque
//!
//! Rewrite a client-side-templated HTML document into an equivalent
//! server-side template, so search engines and non-JS clients see fully
//! rendered markup.
//!
//! This crate is the gateway to the Calque workspace: it re-exports the
//! document model, the parser and the converter core, and offers a one-call
//! string-to-string conversion.
//!
//! ```
//! use calque::{ng_module, noscript_module, Converter};
//!
//! let converter = Converter::new([ng_module(), noscript_module()]);
//! let out = calque::convert_str(r#"<p ng-cloak>{{ $greeting }}</p>"#, &converter);
//! assert_eq!(out, "<p>{{ _greeting }}</p>");
//! ```

pub use calque_core::{
    ng_module, noscript_module, Converter, Directive, DirectiveError, DirectiveStyle,
    ExpressionTranslator, Invocation, Module, Restrict,
};
pub use calque_dom::{serialize, Document, NodeId};
pub use calque_parse::parse;

/// Parse, convert and re-serialize a template in one call.
pub fn convert_str(input: &str, converter: &Converter) -> String {
    let mut doc = parse(input);
    converter.convert_document(&mut doc);
    serialize(&doc)
}
