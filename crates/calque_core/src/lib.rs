//! Calque converter core.
//!
//! Rewrites a parsed client-side template tree into a server-side template,
//! in place. The pieces:
//!
//! - **normalize**: canonical directive-name folding (`data-ng-if` → `ngIf`)
//! - **expr**: best-effort expression translation into the destination
//!   template language, including the filter-pipeline rewrite
//! - **directive**: the registry types: [`Directive`], [`Module`],
//!   [`Restrict`], and the fixed per-invocation context [`Invocation`]
//! - **convert**: the [`Converter`] dispatcher that walks the tree and
//!   applies directives in priority order
//! - **modules**: the built-in `ng` and `noscript` directive sets
//!
//! Parsing and serialization are external collaborators; this crate only
//! consumes and mutates [`calque_dom::Document`] trees.

pub mod convert;
pub mod directive;
pub mod errors;
pub mod expr;
pub mod modules;
pub mod normalize;

pub use convert::Converter;
pub use directive::{
    AttrMap, Directive, DirectiveConfig, DirectiveStyle, Invocation, Module, Restrict,
};
pub use errors::DirectiveError;
pub use expr::ExpressionTranslator;
pub use modules::{ng_module, noscript_module};
pub use normalize::normalize_name;
