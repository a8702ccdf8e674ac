//! Static HTML tag classification.

use phf::phf_set;

/// The conventional HTML5 void elements. A void element never has children
/// and is always serialized without a closing tag.
pub static VOID_TAGS: phf::Set<&'static str> = phf_set! {
    "area",
    "base",
    "br",
    "col",
    "embed",
    "hr",
    "img",
    "input",
    "keygen",
    "link",
    "menuitem",
    "meta",
    "param",
    "source",
    "track",
    "wbr",
};

/// Elements whose content is raw text: no tags or comments are parsed inside.
pub static RAW_TEXT_TAGS: phf::Set<&'static str> = phf_set! {
    "script",
    "style",
};

/// Check if a tag is an HTML5 void element (ASCII case-insensitive)
pub fn is_void_tag(tag: &str) -> bool {
    VOID_TAGS.contains(tag.to_ascii_lowercase().as_str())
}

/// Check if a tag has raw-text content (ASCII case-insensitive)
pub fn is_raw_text_tag(tag: &str) -> bool {
    RAW_TEXT_TAGS.contains(tag.to_ascii_lowercase().as_str())
}
