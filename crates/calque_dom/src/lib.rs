//! Document tree model for Calque.
//!
//! This crate provides the mutable markup tree that the converter rewrites in
//! place: an arena-backed [`Document`] holding element, text and comment
//! nodes addressed by copyable [`NodeId`] handles. All structural mutation
//! goes through `Document` methods so that parent links stay consistent
//! while directives remove and insert nodes mid-traversal.
//!
//! # Modules
//!
//! - **tree**: the node arena and its mutation/query operations
//! - **tag_config**: static HTML5 tag classification (void and raw-text tags)
//! - **serialize**: markup text output
//!
//! ## Name Origin
//!
//! **Calque** (/kælk/) is a tracing made by laying translucent paper over an
//! original, and, in linguistics, a word borrowed by literal translation.
//! Calque traces a client-side template onto server-side template syntax.

pub mod serialize;
pub mod tag_config;
pub mod tree;

pub use serialize::{serialize, serialize_node};
pub use tag_config::{is_raw_text_tag, is_void_tag};
pub use tree::{Attribute, Document, NodeId, NodeType};
