//! Registry types: directives, modules, and the invocation context.

use bitflags::bitflags;
use calque_dom::{Document, NodeId};
use compact_str::CompactString;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::errors::DirectiveError;
use crate::expr::ExpressionTranslator;

bitflags! {
    /// Where a directive may match: on an attribute name, an element tag
    /// name, or both.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Restrict: u8 {
        const ATTRIBUTE = 1 << 0;
        const ELEMENT = 1 << 1;
    }
}

/// How the current invocation matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveStyle {
    Attribute,
    Element,
}

/// Canonical attribute name → raw attribute name, snapshotted once per
/// element visit before any directive runs.
pub type AttrMap = FxHashMap<CompactString, CompactString>;

/// Auxiliary configuration for one directive, set on the converter before
/// conversion begins. Unset keys read as absent.
pub type DirectiveConfig = FxHashMap<CompactString, CompactString>;

/// The fixed context passed to every directive invocation. Each directive
/// reads the fields it needs; there is no reflection over callbacks.
pub struct Invocation<'a> {
    pub doc: &'a mut Document,
    /// The matched element.
    pub element: NodeId,
    pub translator: &'a ExpressionTranslator,
    pub attrs: &'a AttrMap,
    pub style: DirectiveStyle,
    pub config: &'a DirectiveConfig,
    /// Raw value of the matching attribute; `None` for element-style
    /// invocations.
    pub value: Option<&'a str>,
}

impl Invocation<'_> {
    /// Raw attribute value looked up by canonical name.
    pub fn attr_by_canonical_name(&self, canonical: &str) -> Option<&str> {
        let raw = self.attrs.get(canonical)?;
        self.doc.attr(self.element, raw)
    }
}

/// A directive callback. Errors are recoverable: the dispatcher logs them
/// and leaves the subtree untouched.
pub type DirectiveFn = fn(&mut Invocation<'_>) -> Result<(), DirectiveError>;

/// A named, prioritized rewrite rule. Immutable once registered.
pub struct Directive {
    pub name: CompactString,
    /// Higher priorities run first; ties run in registration order.
    pub priority: i32,
    pub restrict: Restrict,
    /// A terminal directive stops dispatch of subsequent directives for the
    /// matched element. Children are still visited.
    pub terminal: bool,
    template_path: Option<CompactString>,
    scope: Vec<(CompactString, CompactString)>,
    callback: DirectiveFn,
}

impl Directive {
    /// An attribute directive with default priority.
    pub fn new(name: impl Into<CompactString>, callback: DirectiveFn) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            restrict: Restrict::ATTRIBUTE,
            terminal: false,
            template_path: None,
            scope: Vec::new(),
            callback,
        }
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn restrict(mut self, restrict: Restrict) -> Self {
        self.restrict = restrict;
        self
    }

    pub fn terminal(mut self) -> Self {
        self.terminal = true;
        self
    }

    /// Template file to reference from an include marker appended to the
    /// element before the callback runs.
    pub fn template_path(mut self, path: impl Into<CompactString>) -> Self {
        self.template_path = Some(path.into());
        self
    }

    /// Bind `target` to an attribute-backed expression before the callback
    /// runs. `source` must be `=` (alias the attribute named `target`) or
    /// `=attrName` (alias a differently named attribute); a missing
    /// attribute binds the null literal.
    pub fn scope_binding(
        mut self,
        target: impl Into<CompactString>,
        source: impl Into<CompactString>,
    ) -> Self {
        self.scope.push((target.into(), source.into()));
        self
    }

    /// Run the directive against one element: scope bindings first, then the
    /// template include, then the callback.
    pub(crate) fn invoke(&self, inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
        if !self.scope.is_empty() {
            self.apply_scope(inv)?;
        }
        if let Some(path) = &self.template_path {
            let marker = inv
                .doc
                .create_text(format!("{{% include '{path}' %}}"));
            inv.doc.append_child(inv.element, marker);
        }
        (self.callback)(inv)
    }

    fn apply_scope(&self, inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
        let mut text = String::new();
        for (target, source) in &self.scope {
            let alias = source.strip_prefix('=').ok_or_else(|| {
                DirectiveError::UnsupportedScopeSource {
                    target: target.clone(),
                    source_expr: source.clone(),
                }
            })?;
            let alias = if alias.is_empty() {
                target.as_str()
            } else {
                alias
            };
            let source_expr = inv.attr_by_canonical_name(alias).unwrap_or("null");
            let expr = inv.translator.translate(source_expr);
            text.push_str(&format!("{{% set {target} = {expr} %}}"));
        }
        if !text.is_empty() {
            let assignment = inv.doc.create_text(text);
            inv.doc.append_child(inv.element, assignment);
        }
        Ok(())
    }
}

impl std::fmt::Debug for Directive {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Directive")
            .field("name", &self.name)
            .field("priority", &self.priority)
            .field("restrict", &self.restrict)
            .field("terminal", &self.terminal)
            .finish_non_exhaustive()
    }
}

/// A named, ordered collection of directives. Modules are created by
/// extension authors and merged into a converter once; they only ever grow.
#[derive(Debug)]
pub struct Module {
    pub name: CompactString,
    directives: Vec<Directive>,
}

impl Module {
    pub fn new(name: impl Into<CompactString>) -> Self {
        Self {
            name: name.into(),
            directives: Vec::new(),
        }
    }

    pub fn directive(mut self, directive: Directive) -> Self {
        self.directives.push(directive);
        self
    }

    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    pub(crate) fn into_directives(self) -> Vec<Directive> {
        self.directives
    }
}
