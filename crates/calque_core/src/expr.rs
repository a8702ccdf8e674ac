//! Best-effort expression translation.
//!
//! Rewrites a source-template expression into the destination template
//! language with documented token-level substitutions. This is NOT an
//! expression parser: operators inside string literals, or `|` and `:`
//! inside strings, are not detected. Unrecognized syntax passes through
//! with only the literal rewrites applied; translation never fails.

use compact_str::CompactString;

/// Translates source-template expressions into destination-engine syntax.
///
/// Stateless; a single shared instance is handed to every directive
/// invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressionTranslator;

impl ExpressionTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Translate one expression.
    ///
    /// Literal rewrites run first, in a fixed order: `null` → `none`,
    /// `$` → `_`, `&&` → ` and `, `||` → ` or `, `===` → `==`, `!==` → `!=`,
    /// then `!` → ` not `. Negation must run after the equality collapses:
    /// a naive `!` pass would shatter `!=`, so the sequence ` not =` that it
    /// produces is folded back to `!=` as the final step.
    ///
    /// A `|`-separated filter pipeline is then rewritten: the base
    /// expression is kept as-is when there are no filters; with filters,
    /// segments are trimmed, `orderBy` becomes `sort` with `attribute=` and
    /// `reverse=` named arguments, other filter names pass through, and
    /// argumentful segments are re-emitted as `name(arg1,arg2,...)`.
    pub fn translate(&self, text: &str) -> CompactString {
        let text = text
            .replace("null", "none")
            .replace('$', "_")
            .replace("&&", " and ")
            .replace("||", " or ")
            .replace("===", "==")
            .replace("!==", "!=")
            .replace('!', " not ")
            .replace(" not =", "!=");

        if !text.contains('|') {
            return text.into();
        }

        let mut parts = text.split('|');
        let mut out = CompactString::default();
        if let Some(base) = parts.next() {
            out.push_str(base.trim());
        }
        for filter in parts {
            out.push('|');
            out.push_str(&rewrite_filter(filter));
        }
        out
    }
}

/// Rewrite one `name:arg:arg` filter segment into call syntax.
fn rewrite_filter(filter: &str) -> CompactString {
    let mut args = filter.split(':').map(str::trim);
    let name = args.next().unwrap_or_default();
    let mut args: Vec<CompactString> = args.map(CompactString::from).collect();

    let name = if name == "orderBy" {
        if let Some(first) = args.first_mut() {
            *first = format_named("attribute", first);
        }
        if let Some(second) = args.get_mut(1) {
            *second = format_named("reverse", second);
        }
        "sort"
    } else {
        name
    };

    if args.is_empty() {
        return name.into();
    }
    let mut out = CompactString::from(name);
    out.push('(');
    out.push_str(&args.join(","));
    out.push(')');
    out
}

fn format_named(key: &str, value: &str) -> CompactString {
    let mut out = CompactString::from(key);
    out.push('=');
    out.push_str(value);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn translate(text: &str) -> CompactString {
        ExpressionTranslator::new().translate(text)
    }

    #[test]
    fn test_logical_operators() {
        assert_eq!(translate("a && b"), "a  and  b");
        assert_eq!(translate("a||b"), "a or b");
        assert_eq!(translate("a&&b || c"), "a and b  or  c");
    }

    #[test]
    fn test_scope_marker_and_null() {
        assert_eq!(translate("$visible"), "_visible");
        assert_eq!(translate("x === null"), "x == none");
    }

    #[test]
    fn test_equality_collapse() {
        assert_eq!(translate("a === b"), "a == b");
        assert_eq!(translate("a !== b"), "a != b");
        assert_eq!(translate("a != b"), "a != b");
    }

    #[test]
    fn test_negation_runs_after_equality() {
        // A naive left-to-right `!` pass would turn `!==` into ` not ==`.
        assert_eq!(translate("a !== b"), "a != b");
        assert_eq!(translate("!done"), " not done");
        assert_eq!(translate("!a && !b"), " not a  and   not b");
    }

    #[test]
    fn test_filter_rename_and_named_args() {
        assert_eq!(translate("x | orderBy:'name'"), "x|sort(attribute='name')");
        assert_eq!(
            translate("x | orderBy:'name':true"),
            "x|sort(attribute='name',reverse=true)"
        );
        assert_eq!(translate("x | orderBy"), "x|sort");
    }

    #[test]
    fn test_unknown_filters_pass_through() {
        assert_eq!(translate("items | limitTo:5"), "items|limitTo(5)");
        assert_eq!(translate("name | uppercase"), "name|uppercase");
        assert_eq!(
            translate("items | filter:query | orderBy:'age'"),
            "items|filter(query)|sort(attribute='age')"
        );
    }

    #[test]
    fn test_no_pipeline_preserves_spacing() {
        // Interpolation rewriting re-wraps the translated text verbatim, so
        // surrounding whitespace must survive when there is no pipeline.
        assert_eq!(translate(" $name "), " _name ");
        assert_eq!(translate("plain"), "plain");
    }

    #[test]
    fn test_translation_never_fails_on_odd_input() {
        assert_eq!(translate(""), "");
        assert_eq!(translate("|"), "|");
        assert_eq!(translate("a |"), "a|");
        assert_eq!(translate("::"), "::");
    }
}
