//! The built-in `ng` directive set.
//!
//! Rewrites the stock client-side directives into destination-engine
//! control flow: conditionals become `{% if %}` blocks around the element,
//! repeats become `{% for %}` loops with auxiliary loop variables, includes
//! become `{% include %}` markers. Every directive here is a pure mutation
//! recipe over the invocation context; malformed input is logged and
//! skipped, never fatal.

use compact_str::{format_compact, CompactString};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::directive::{Directive, DirectiveStyle, Invocation, Module, Restrict};
use crate::errors::DirectiveError;

/// Build the `ng` module.
pub fn ng_module() -> Module {
    Module::new("ng")
        .directive(Directive::new("ngHide", ng_hide))
        .directive(Directive::new("ngShow", ng_show))
        .directive(Directive::new("ngIf", ng_hide))
        .directive(Directive::new("ngCloak", ng_cloak))
        .directive(
            Directive::new("ngInclude", ng_include)
                .restrict(Restrict::ATTRIBUTE | Restrict::ELEMENT),
        )
        .directive(Directive::new("ngView", ng_view).restrict(Restrict::ELEMENT))
        .directive(Directive::new("ngRepeat", ng_repeat))
        .directive(Directive::new("select", select).restrict(Restrict::ELEMENT))
}

/// Wrap the element in an `{% if %}` block, with a debug comment exposing
/// the runtime value of the condition.
fn ng_show(inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
    let expr = inv.translator.translate(inv.value.unwrap_or_default());
    let open = format_compact!("{{% if {expr} %}}");
    wrap_in_condition(inv, &expr, &open);
    Ok(())
}

/// Wrap the element in an `{% if %}` block with the condition negated.
/// Also registered under the `ngIf` alias.
fn ng_hide(inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
    let expr = inv.translator.translate(inv.value.unwrap_or_default());
    let open = format_compact!("{{% if not ({expr}) %}}");
    wrap_in_condition(inv, &expr, &open);
    Ok(())
}

fn wrap_in_condition(inv: &mut Invocation<'_>, expr: &str, open: &str) {
    let Some(parent) = inv.doc.parent(inv.element) else {
        return;
    };
    // TODO: gate the debug comment behind directive config.
    let comment = inv
        .doc
        .create_comment(format_compact!("{expr} = {{{{ ({expr}).__repr__() }}}}"));
    let open_tag = inv.doc.create_text(open);
    let close_tag = inv.doc.create_text("{% endif %}");
    let next = inv.doc.next_sibling(inv.element);
    inv.doc.insert_before(parent, comment, Some(inv.element));
    inv.doc.insert_before(parent, open_tag, Some(inv.element));
    inv.doc.insert_before(parent, close_tag, next);
}

/// Remove the triggering attribute. Purely cosmetic.
fn ng_cloak(inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
    if inv.style == DirectiveStyle::Attribute {
        if let Some(raw) = inv.attrs.get("ngCloak").cloned() {
            inv.doc.remove_attr(inv.element, &raw);
        }
    }
    Ok(())
}

/// Replace the element's content with an include marker: a translated
/// expression in attribute form, the literal `src` attribute in element
/// form.
fn ng_include(inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
    inv.doc.remove_children(inv.element);
    let target: Option<CompactString> = match inv.style {
        DirectiveStyle::Attribute => inv
            .value
            .map(|value| inv.translator.translate(value)),
        DirectiveStyle::Element => inv
            .attr_by_canonical_name("src")
            .map(CompactString::from),
    };
    let Some(target) = target else {
        debug!("include: no target - leaving element empty");
        return Ok(());
    };
    let marker = inv
        .doc
        .create_text(format_compact!("{{% include {target} %}}"));
    inv.doc.append_child(inv.element, marker);
    Ok(())
}

/// Replace the element's content with an include marker driven by two
/// well-known template variables the embedding application must provide at
/// render time: `ngViewRoutes` (route name → template) and `ngViewRoute`
/// (the current route name).
fn ng_view(inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
    inv.doc.remove_children(inv.element);
    let marker = inv
        .doc
        .create_text("{% include ngViewRoutes[ngViewRoute] %}");
    inv.doc.append_child(inv.element, marker);
    Ok(())
}

/// Auxiliary loop bindings, in emission order.
const LOOP_VARS: [(&str, &str); 6] = [
    ("_index", "loop.index0"),
    ("_first", "loop.first"),
    ("_last", "loop.last"),
    ("_middle", "(not loop.first and not loop.last)"),
    ("_even", "loop.cycle(True, False)"),
    ("_odd", "loop.cycle(False, True)"),
];

/// Wrap the element in a `{% for %}` block and prepend a prelude binding
/// the auxiliary loop variables. The prelude must precede all original
/// content.
fn ng_repeat(inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
    let Some(parent) = inv.doc.parent(inv.element) else {
        return Ok(());
    };
    let expr = inv.translator.translate(inv.value.unwrap_or_default());
    let open_tag = inv.doc.create_text(format_compact!("{{% for {expr} %}}"));
    let mut prelude = String::new();
    for (name, value) in LOOP_VARS {
        prelude.push_str(&format!("{{% set {name} = {value} %}}"));
    }
    let setup_tag = inv.doc.create_text(prelude);
    let close_tag = inv.doc.create_text("{% endfor %}");

    let next = inv.doc.next_sibling(inv.element);
    inv.doc.insert_before(parent, open_tag, Some(inv.element));
    let first_child = inv.doc.children(inv.element).first().copied();
    inv.doc.insert_before(inv.element, setup_tag, first_child);
    inv.doc.insert_before(parent, close_tag, next);
    Ok(())
}

/// The fixed option-list pattern: `label as value for entry in collection`.
static OPTIONS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\A([\w.]+) as ([\w.]+) for ([\w.]+) in ([\w.]+)\z")
        .expect("options pattern compiles")
});

/// Expand a `select` element's companion `ngOptions` attribute into a loop
/// of synthesized `<option>` elements. Unrecognized patterns are logged and
/// leave the element untouched.
fn select(inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
    let Some(options) = inv.attr_by_canonical_name("ngOptions").map(CompactString::from)
    else {
        debug!("select: ngOptions not found - do nothing");
        return Ok(());
    };
    let Some(captures) = OPTIONS_RE.captures(&options) else {
        debug!(options = %options, "select: unrecognized ngOptions format - do nothing");
        return Ok(());
    };
    let (label, value, entry, collection) = (
        &captures[1],
        &captures[2],
        &captures[3],
        &captures[4],
    );

    let value_expr = inv.translator.translate(value);
    let start_loop = inv
        .doc
        .create_text(format_compact!("{{% for {entry} in {collection} %}}"));
    let loop_body = inv.doc.create_element("option");
    inv.doc
        .set_attr(loop_body, "value", format_compact!("{{{{{value_expr}}}}}"));
    let label_text = inv.doc.create_text(format_compact!("{{{{{label}}}}}"));
    inv.doc.append_child(loop_body, label_text);
    let end_loop = inv.doc.create_text("{% endfor %}");

    inv.doc.append_child(inv.element, start_loop);
    inv.doc.append_child(inv.element, loop_body);
    inv.doc.append_child(inv.element, end_loop);
    Ok(())
}
