//! Built-in directive modules.

pub mod ng;
pub mod noscript;

pub use ng::ng_module;
pub use noscript::noscript_module;
