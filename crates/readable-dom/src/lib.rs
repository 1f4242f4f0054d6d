//! # readable-dom
//!
//! A mutable document tree shared by an HTML tree builder and a
//! readability-style content extractor.
//!
//! The tree is built incrementally through the [`TreeAdapter`] callbacks a
//! tree builder drives while it consumes markup. Once construction is done,
//! the very same nodes are handed to the extractor, which reads and rewrites
//! them through the browser-like surface on [`NodeRef`] and [`Document`].
//! There is no intermediate copy between the two phases.
//!
//! ## Design
//!
//! - **One handle type**: every node is a [`NodeRef`], a cheap `Rc` handle.
//!   Children are owned by their parent's child list; the parent link is weak.
//! - **Capability traits**: [`ParentNode`] and [`ChildNode`] split the
//!   operations by what a node can be. [`Document`] only implements the
//!   former.
//! - **Tolerant mutation**: inserting relative to a missing reference node
//!   falls back to appending, and removing a non-child is a no-op. Both are
//!   reported through the `log` facade.
//!
//! ## Example (adapter-driven)
//!
//! ```rust
//! use readable_dom::{
//!     Attribute, ChildNode, DomTreeAdapter, ParentNode, TreeAdapter, HTML_NAMESPACE,
//! };
//!
//! let adapter = DomTreeAdapter;
//! let document = adapter.create_document();
//! let html = adapter.create_element("html", HTML_NAMESPACE, vec![]);
//! let p = adapter.create_element("p", HTML_NAMESPACE, vec![Attribute::new("class", "lead")]);
//! adapter.append_child(&document, &html);
//! adapter.append_child(&html, &p);
//! adapter.insert_text(&p, "Hello ");
//! adapter.insert_text(&p, "World");
//!
//! assert_eq!(p.child_nodes().len(), 1);
//! assert_eq!(html.inner_html(), r#"<p class="lead">Hello World</p>"#);
//! assert!(p.owner_document().is_ok());
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! # #[cfg(feature = "html")]
//! # {
//! use readable_dom::{parse_document, ParentNode};
//!
//! let document = parse_document("<title>Hi</title><p>x</p>");
//! assert_eq!(document.title(), "Hi");
//! assert_eq!(document.body().unwrap().inner_html(), "<p>x</p>");
//! # }
//! ```

mod adapter;
mod attributes;
#[cfg(feature = "html")]
pub mod html;
mod location;
mod mutation;
pub mod node;
mod options;
mod reflect;
mod serialize;
mod traverse;
mod utilities;

pub use adapter::{DomTreeAdapter, TreeAdapter};
pub use attributes::{Attribute, Attributes};
#[cfg(feature = "html")]
pub use html::{parse_document, parse_document_with, parse_fragment, parse_fragment_with};
pub use location::SourceCodeLocation;
pub use node::{
    ChildNode, Document, DocumentMode, ElementData, NodeData, NodeRef, NodeType, ParentNode,
};
pub use options::ParseOptions;
pub use reflect::{Reflection, ReflectedProperty};
pub use serialize::{escape_attribute, escape_text, Markup};
pub use traverse::Descendants;
pub use utilities::*;

/// Error type for document tree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    #[error("Node is detached: no owning document could be reached")]
    Detached,

    #[error("Node belongs to a document fragment, which has no owning document")]
    FragmentOwner,

    #[error("Node of type {0:?} cannot have a parent")]
    NotAChildNode(NodeType),

    #[error("Expected a document node, got {0:?}")]
    NotADocument(NodeType),

    #[error("Document has no <html> document element")]
    MissingDocumentElement,

    #[error("Document has no <head> element")]
    MissingHead,

    #[error("Document has no <body> element")]
    MissingBody,
}

pub type Result<T> = std::result::Result<T, DomError>;
