//! The callback surface a tree builder uses to construct a tree.
//!
//! [`TreeAdapter`] is shaped after the calls an HTML tree builder makes while
//! it consumes markup. [`DomTreeAdapter`] implements it directly on
//! [`NodeRef`]: every call mutates the shared tree right away, nothing is
//! buffered.

use crate::attributes::Attribute;
use crate::location::SourceCodeLocation;
use crate::node::{ChildNode, DocumentMode, NodeRef, ParentNode};

/// Tree construction callbacks
pub trait TreeAdapter {
    type Node: Clone;

    // Node construction
    fn create_document(&self) -> Self::Node;
    fn create_document_fragment(&self) -> Self::Node;
    fn create_element(
        &self,
        tag_name: &str,
        namespace_uri: &str,
        attrs: Vec<Attribute>,
    ) -> Self::Node;
    fn create_comment_node(&self, data: &str) -> Self::Node;

    // Tree mutation
    fn append_child(&self, parent: &Self::Node, child: &Self::Node);
    fn insert_before(&self, parent: &Self::Node, new_node: &Self::Node, reference: &Self::Node);
    fn set_template_content(&self, template: &Self::Node, content: &Self::Node);
    fn get_template_content(&self, template: &Self::Node) -> Option<Self::Node>;
    fn set_document_type(
        &self,
        document: &Self::Node,
        name: &str,
        public_id: &str,
        system_id: &str,
    );
    fn set_document_mode(&self, document: &Self::Node, mode: DocumentMode);
    fn get_document_mode(&self, document: &Self::Node) -> DocumentMode;
    fn detach_node(&self, node: &Self::Node);
    fn insert_text(&self, parent: &Self::Node, text: &str);
    fn insert_text_before(&self, parent: &Self::Node, text: &str, reference: &Self::Node);
    fn adopt_attributes(&self, recipient: &Self::Node, attrs: Vec<Attribute>);

    // Tree traversal
    fn get_first_child(&self, node: &Self::Node) -> Option<Self::Node>;
    fn get_child_nodes(&self, node: &Self::Node) -> Vec<Self::Node>;
    fn get_parent_node(&self, node: &Self::Node) -> Option<Self::Node>;
    fn get_attr_list(&self, element: &Self::Node) -> Vec<Attribute>;

    // Node data
    fn get_tag_name(&self, element: &Self::Node) -> Option<String>;
    fn get_namespace_uri(&self, element: &Self::Node) -> Option<String>;
    fn get_text_node_content(&self, text_node: &Self::Node) -> Option<String>;
    fn get_comment_node_content(&self, comment_node: &Self::Node) -> Option<String>;
    fn get_document_type_node_name(&self, doctype_node: &Self::Node) -> Option<String>;
    fn get_document_type_node_public_id(&self, doctype_node: &Self::Node) -> Option<String>;
    fn get_document_type_node_system_id(&self, doctype_node: &Self::Node) -> Option<String>;

    // Node types
    fn is_text_node(&self, node: &Self::Node) -> bool;
    fn is_comment_node(&self, node: &Self::Node) -> bool;
    fn is_document_type_node(&self, node: &Self::Node) -> bool;
    fn is_element_node(&self, node: &Self::Node) -> bool;

    // Source code location
    fn set_node_source_code_location(
        &self,
        node: &Self::Node,
        location: Option<SourceCodeLocation>,
    );
    fn get_node_source_code_location(&self, node: &Self::Node) -> Option<SourceCodeLocation>;
    fn update_node_source_code_location(&self, node: &Self::Node, update: &SourceCodeLocation);
}

/// [`TreeAdapter`] building [`NodeRef`] trees
#[derive(Debug, Clone, Copy, Default)]
pub struct DomTreeAdapter;

impl TreeAdapter for DomTreeAdapter {
    type Node = NodeRef;

    fn create_document(&self) -> NodeRef {
        NodeRef::new_document()
    }

    fn create_document_fragment(&self) -> NodeRef {
        NodeRef::new_document_fragment()
    }

    fn create_element(
        &self,
        tag_name: &str,
        namespace_uri: &str,
        attrs: Vec<Attribute>,
    ) -> NodeRef {
        NodeRef::new_element(tag_name, namespace_uri, attrs)
    }

    fn create_comment_node(&self, data: &str) -> NodeRef {
        NodeRef::new_comment(data)
    }

    fn append_child(&self, parent: &NodeRef, child: &NodeRef) {
        parent.append_child(child);
    }

    fn insert_before(&self, parent: &NodeRef, new_node: &NodeRef, reference: &NodeRef) {
        parent.insert_before(new_node, Some(reference));
    }

    fn set_template_content(&self, template: &NodeRef, content: &NodeRef) {
        match template.as_element() {
            Some(element) => element.set_template_content(content),
            None => log::warn!("template content set on {} node", template.node_name()),
        }
    }

    fn get_template_content(&self, template: &NodeRef) -> Option<NodeRef> {
        template.as_element().and_then(|element| element.template_content())
    }

    fn set_document_type(
        &self,
        document: &NodeRef,
        name: &str,
        public_id: &str,
        system_id: &str,
    ) {
        let existing = document.child_nodes().into_iter().find(NodeRef::is_doctype);
        match existing {
            Some(doctype) => doctype.set_doctype_ids(name, public_id, system_id),
            None => document.append_child(&NodeRef::new_doctype(name, public_id, system_id)),
        }
    }

    fn set_document_mode(&self, document: &NodeRef, mode: DocumentMode) {
        document.set_document_mode(mode);
    }

    fn get_document_mode(&self, document: &NodeRef) -> DocumentMode {
        document.document_mode().unwrap_or_default()
    }

    fn detach_node(&self, node: &NodeRef) {
        node.detach();
    }

    fn insert_text(&self, parent: &NodeRef, text: &str) {
        parent.insert_text(text);
    }

    fn insert_text_before(&self, parent: &NodeRef, text: &str, reference: &NodeRef) {
        parent.insert_text_before(text, reference);
    }

    fn adopt_attributes(&self, recipient: &NodeRef, attrs: Vec<Attribute>) {
        if let Some(element) = recipient.as_element() {
            element.attributes.borrow_mut().adopt(attrs);
        }
    }

    fn get_first_child(&self, node: &NodeRef) -> Option<NodeRef> {
        node.first_child()
    }

    fn get_child_nodes(&self, node: &NodeRef) -> Vec<NodeRef> {
        node.child_nodes()
    }

    fn get_parent_node(&self, node: &NodeRef) -> Option<NodeRef> {
        node.parent_node()
    }

    fn get_attr_list(&self, element: &NodeRef) -> Vec<Attribute> {
        element
            .as_element()
            .map(|element| element.attributes())
            .unwrap_or_default()
    }

    fn get_tag_name(&self, element: &NodeRef) -> Option<String> {
        element
            .as_element()
            .map(|element| element.local_name().to_string())
    }

    fn get_namespace_uri(&self, element: &NodeRef) -> Option<String> {
        element
            .as_element()
            .map(|element| element.namespace_uri().to_string())
    }

    fn get_text_node_content(&self, text_node: &NodeRef) -> Option<String> {
        text_node.is_text().then(|| text_node.value()).flatten()
    }

    fn get_comment_node_content(&self, comment_node: &NodeRef) -> Option<String> {
        comment_node.is_comment().then(|| comment_node.value()).flatten()
    }

    fn get_document_type_node_name(&self, doctype_node: &NodeRef) -> Option<String> {
        doctype_node.doctype_ids().map(|(name, _, _)| name)
    }

    fn get_document_type_node_public_id(&self, doctype_node: &NodeRef) -> Option<String> {
        doctype_node.doctype_ids().map(|(_, public_id, _)| public_id)
    }

    fn get_document_type_node_system_id(&self, doctype_node: &NodeRef) -> Option<String> {
        doctype_node.doctype_ids().map(|(_, _, system_id)| system_id)
    }

    fn is_text_node(&self, node: &NodeRef) -> bool {
        node.is_text()
    }

    fn is_comment_node(&self, node: &NodeRef) -> bool {
        node.is_comment()
    }

    fn is_document_type_node(&self, node: &NodeRef) -> bool {
        node.is_doctype()
    }

    fn is_element_node(&self, node: &NodeRef) -> bool {
        node.is_element()
    }

    fn set_node_source_code_location(
        &self,
        node: &NodeRef,
        location: Option<SourceCodeLocation>,
    ) {
        node.set_source_code_location(location);
    }

    fn get_node_source_code_location(&self, node: &NodeRef) -> Option<SourceCodeLocation> {
        node.source_code_location()
    }

    fn update_node_source_code_location(&self, node: &NodeRef, update: &SourceCodeLocation) {
        node.update_source_code_location(update);
    }
}
