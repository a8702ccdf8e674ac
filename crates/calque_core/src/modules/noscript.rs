//! Script removal for non-JS output.

use crate::directive::{Directive, Invocation, Module, Restrict};
use crate::errors::DirectiveError;

/// Build the `noscript` module: deletes every `script` element outright.
pub fn noscript_module() -> Module {
    Module::new("noscript")
        .directive(Directive::new("script", delete_scripts).restrict(Restrict::ELEMENT))
}

fn delete_scripts(inv: &mut Invocation<'_>) -> Result<(), DirectiveError> {
    inv.doc.detach(inv.element);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Converter;
    use calque_dom::Document;

    #[test]
    fn test_script_elements_are_deleted() {
        let mut doc = Document::new();
        let root = doc.root();
        let div = doc.create_element("div");
        let script = doc.create_element("script");
        let code = doc.create_text("alert(1)");
        let p = doc.create_element("p");
        let text = doc.create_text("kept");
        doc.append_child(root, div);
        doc.append_child(div, script);
        doc.append_child(script, code);
        doc.append_child(div, p);
        doc.append_child(p, text);

        let converter = Converter::new([noscript_module()]);
        converter.convert_document(&mut doc);

        assert_eq!(doc.parent(script), None);
        assert_eq!(doc.children(div), &[p]);
    }
}
