//! Canonical directive-name folding.

use compact_str::CompactString;

/// Normalize a raw tag or attribute name to its canonical directive-lookup
/// form: strip one case-insensitive `x-` or `data-` prefix, then camel-fold
/// the separators `:`, `-` and `_` (the separator is dropped and the next
/// character upper-cased).
///
/// `data-ng-if`, `ng-if`, `x-ng:if` and `ngIf` all fold to `ngIf`. The fold
/// preserves camel humps already present in the input (an upper-case letter
/// directly after a lower-case one), so the function is idempotent:
/// canonical output passes through unchanged. Everything else lower-cases.
/// Never fails; characters it does not recognize pass through.
pub fn normalize_name(name: &str) -> CompactString {
    let stripped = strip_prefix(name);
    let mut out = CompactString::default();
    let mut next_upper = false;
    let mut prev: Option<char> = None;
    for c in stripped.chars() {
        if matches!(c, ':' | '-' | '_') {
            next_upper = true;
            prev = Some(c);
            continue;
        }
        if next_upper {
            out.extend(c.to_uppercase());
        } else if c.is_uppercase() && prev.is_some_and(char::is_lowercase) {
            out.push(c);
        } else {
            out.extend(c.to_lowercase());
        }
        prev = Some(c);
        next_upper = false;
    }
    out
}

fn strip_prefix(name: &str) -> &str {
    if name.get(..2).is_some_and(|p| p.eq_ignore_ascii_case("x-")) {
        &name[2..]
    } else if name.get(..5).is_some_and(|p| p.eq_ignore_ascii_case("data-")) {
        &name[5..]
    } else {
        name
    }
}
