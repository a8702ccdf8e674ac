//! Converter error types.
//!
//! Nothing here ever aborts a conversion: the dispatcher logs a failed
//! directive and moves on, leaving that subtree untouched.

use compact_str::CompactString;
use thiserror::Error;

/// A recoverable failure reported by a directive invocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    /// Scope bindings only implement direct `=`-prefixed attribute aliases;
    /// any other source shape is rejected explicitly rather than silently
    /// ignored.
    #[error("unsupported scope source `{source_expr}` for `{target}`: sources must begin with `=`")]
    UnsupportedScopeSource {
        target: CompactString,
        source_expr: CompactString,
    },

    /// Free-form failure from a third-party directive.
    #[error("{0}")]
    Failed(CompactString),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = DirectiveError::UnsupportedScopeSource {
            target: "item".into(),
            source_expr: "&expr".into(),
        };
        assert!(err.to_string().contains("`&expr`"));
        assert_eq!(DirectiveError::Failed("nope".into()).to_string(), "nope");
    }
}
