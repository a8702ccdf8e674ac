//! The tree transformer / dispatcher.

use calque_dom::{is_void_tag, Document, NodeId, NodeType};
use compact_str::CompactString;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use tracing::{debug, warn};

use crate::directive::{
    AttrMap, Directive, DirectiveConfig, DirectiveStyle, Invocation, Module, Restrict,
};
use crate::expr::ExpressionTranslator;
use crate::normalize::normalize_name;

static EMPTY_CONFIG: Lazy<DirectiveConfig> = Lazy::new(DirectiveConfig::default);

/// Applies registered directives to documents, in place.
///
/// A converter is built from an explicit list of initial modules; there is
/// no implicit default registry. It may be reused across any number of
/// sequential conversions; nothing in a conversion mutates converter state.
pub struct Converter {
    module_names: Vec<CompactString>,
    /// All merged directives, sorted by descending priority. The sort is
    /// stable, so ties keep registration order.
    directives: Vec<Directive>,
    config: FxHashMap<CompactString, DirectiveConfig>,
    translator: ExpressionTranslator,
}

impl Converter {
    pub fn new(modules: impl IntoIterator<Item = Module>) -> Self {
        let mut converter = Self {
            module_names: Vec::new(),
            directives: Vec::new(),
            config: FxHashMap::default(),
            translator: ExpressionTranslator::new(),
        };
        for module in modules {
            converter.register(module);
        }
        converter
    }

    /// Merge a module's directives into the registry. Registries only grow;
    /// there is no removal.
    pub fn register(&mut self, module: Module) {
        debug!(module = %module.name, "registering module");
        self.module_names.push(module.name.clone());
        self.directives.extend(module.into_directives());
        self.directives
            .sort_by_key(|d| std::cmp::Reverse(d.priority));
    }

    /// Store one auxiliary configuration value, readable by the named
    /// directive at invocation time.
    pub fn configure(
        &mut self,
        directive: impl Into<CompactString>,
        key: impl Into<CompactString>,
        value: impl Into<CompactString>,
    ) {
        self.config
            .entry(directive.into())
            .or_default()
            .insert(key.into(), value.into());
    }

    pub fn modules(&self) -> &[CompactString] {
        &self.module_names
    }

    pub fn translator(&self) -> &ExpressionTranslator {
        &self.translator
    }

    /// Rewrite a whole document: every top-level element is transformed and
    /// top-level text receives interpolation rewriting.
    pub fn convert_document(&self, doc: &mut Document) {
        let root = doc.root();
        for child in doc.children(root).to_vec() {
            if doc.parent(child) != Some(root) {
                continue;
            }
            match doc.node_type(child) {
                NodeType::Element => self.convert_element(doc, child),
                NodeType::Text => self.convert_text_node(doc, child),
                _ => {}
            }
        }
    }

    /// Recursively rewrite one element and its descendants in place.
    pub fn convert_element(&self, doc: &mut Document, element: NodeId) {
        let tag_name = doc
            .tag_name(element)
            .map(normalize_name)
            .unwrap_or_default();
        // Snapshot before any directive runs; restrict-A lookups use the
        // pre-mutation attribute set.
        let attrs = attribute_map(doc, element);

        for directive in &self.directives {
            let mut invoked = false;
            if directive.restrict.contains(Restrict::ATTRIBUTE) {
                if let Some(raw_name) = attrs.get(directive.name.as_str()) {
                    debug!(
                        directive = %directive.name,
                        element = %tag_name,
                        "applying directive for attribute"
                    );
                    let value: CompactString =
                        doc.attr(element, raw_name).unwrap_or_default().into();
                    self.dispatch(
                        doc,
                        element,
                        directive,
                        &attrs,
                        DirectiveStyle::Attribute,
                        Some(&value),
                    );
                    invoked = true;
                    // The directive may have replaced or deleted the
                    // element; the subtree is gone.
                    if doc.parent(element).is_none() {
                        return;
                    }
                }
            }
            if directive.restrict.contains(Restrict::ELEMENT) && directive.name == tag_name {
                debug!(directive = %directive.name, "applying directive for element");
                self.dispatch(doc, element, directive, &attrs, DirectiveStyle::Element, None);
                invoked = true;
                if doc.parent(element).is_none() {
                    return;
                }
            }
            if invoked && directive.terminal {
                break;
            }
        }

        // Children may be removed or relocated by the recursive calls below;
        // iterate a snapshot and skip anything no longer attached here.
        for child in doc.children(element).to_vec() {
            if doc.parent(child) != Some(element) {
                continue;
            }
            match doc.node_type(child) {
                NodeType::Text => self.convert_text_node(doc, child),
                NodeType::Element => self.convert_element(doc, child),
                _ => {}
            }
        }

        // A generic serializer may emit an empty non-void element as
        // self-closing, which HTML5 only honors in foreign content. A
        // zero-width comment forces distinct open and close tags.
        if !is_void_tag(&tag_name) && doc.children(element).is_empty() {
            let comment = doc.create_comment("");
            doc.append_child(element, comment);
        }
    }

    /// Rewrite every `{{ ... }}` span in a text node, left to right. Text
    /// outside spans is copied verbatim; an unterminated `{{` stops the
    /// scan and the remainder passes through untouched.
    fn convert_text_node(&self, doc: &mut Document, node: NodeId) {
        let Some(data) = doc.text(node) else { return };
        let data = data.to_owned();
        let mut out = String::with_capacity(data.len());
        let mut i = 0;
        while let Some(open) = data[i..].find("{{") {
            let start = i + open;
            let Some(close) = data[start..].find("}}") else {
                break;
            };
            let end = start + close;
            out.push_str(&data[i..start]);
            out.push_str("{{");
            out.push_str(&self.translator.translate(&data[start + 2..end]));
            out.push_str("}}");
            i = end + 2;
        }
        out.push_str(&data[i..]);
        doc.set_text(node, out);
    }

    fn dispatch(
        &self,
        doc: &mut Document,
        element: NodeId,
        directive: &Directive,
        attrs: &AttrMap,
        style: DirectiveStyle,
        value: Option<&str>,
    ) {
        let config = self
            .config
            .get(&directive.name)
            .unwrap_or_else(|| &*EMPTY_CONFIG);
        let mut invocation = Invocation {
            doc,
            element,
            translator: &self.translator,
            attrs,
            style,
            config,
            value,
        };
        if let Err(err) = directive.invoke(&mut invocation) {
            warn!(
                directive = %directive.name,
                error = %err,
                "directive failed; subtree left untouched"
            );
        }
    }
}

/// Canonical attribute name → raw name for the element's current attributes.
fn attribute_map(doc: &Document, element: NodeId) -> AttrMap {
    doc.attrs(element)
        .iter()
        .map(|attr| (normalize_name(&attr.name), attr.name.clone()))
        .collect()
}
