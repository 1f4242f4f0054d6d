//! Depth-first traversal, tag queries and sibling navigation.

use crate::node::{ChildNode, Document, NodeData, NodeRef, NodeType, ParentNode};
use crate::{DomError, Result};

/// Pre-order, depth-first walk over the descendants of a node.
///
/// Children are only expanded below elements. The walk is lazy and not
/// restartable; mutating the tree while it runs gives unspecified results.
pub struct Descendants {
    stack: Vec<NodeRef>,
}

impl Descendants {
    fn new(root: &NodeRef) -> Self {
        let mut stack = root.child_nodes();
        stack.reverse();
        Self { stack }
    }
}

impl Iterator for Descendants {
    type Item = NodeRef;

    fn next(&mut self) -> Option<NodeRef> {
        let node = self.stack.pop()?;
        if node.is_element() {
            let children = node.0.children.borrow();
            self.stack.extend(children.iter().rev().cloned());
        }
        Some(node)
    }
}

impl NodeRef {
    /// Walk the subtree below this node in document order
    pub fn descendants(&self) -> Descendants {
        Descendants::new(self)
    }

    pub(crate) fn elements_by_tag_name(&self, name: &str) -> impl Iterator<Item = NodeRef> {
        let wanted = (name != "*").then(|| name.to_ascii_uppercase());
        self.descendants().filter(move |node| match node.tag_name() {
            Some(tag) => wanted.as_deref().is_none_or(|wanted| tag == wanted),
            None => false,
        })
    }

    pub(crate) fn collect_text(&self) -> String {
        match self.data() {
            NodeData::Text(value) | NodeData::Comment(value) => value.borrow().clone(),
            NodeData::Document { .. } | NodeData::DocumentType { .. } => String::new(),
            NodeData::Element(_) | NodeData::DocumentFragment => {
                let mut text = String::new();
                for node in self.descendants() {
                    if let NodeData::Text(value) = node.data() {
                        text.push_str(&value.borrow());
                    }
                }
                text
            }
        }
    }

    fn following_siblings(&self) -> impl Iterator<Item = NodeRef> {
        let siblings = match self.parent_link() {
            Some(parent) => {
                let children = parent.child_nodes();
                match children.iter().position(|c| c == self) {
                    Some(index) => children.into_iter().skip(index + 1).collect(),
                    None => Vec::new(),
                }
            }
            None => Vec::new(),
        };
        siblings.into_iter()
    }
}

impl ChildNode for NodeRef {
    fn parent_node(&self) -> Option<NodeRef> {
        self.parent_link()
    }

    fn next_sibling(&self) -> Option<NodeRef> {
        self.following_siblings().next()
    }

    fn next_element_sibling(&self) -> Option<NodeRef> {
        self.following_siblings().find(NodeRef::is_element)
    }

    fn owner_document(&self) -> Result<Document> {
        if !self.node_type().is_child_node() {
            return Err(DomError::NotAChildNode(self.node_type()));
        }
        let mut current = self.clone();
        loop {
            let next = current
                .parent_link()
                .or_else(|| current.provisional_owner())
                .ok_or(DomError::Detached)?;
            match next.node_type() {
                NodeType::Element => current = next,
                NodeType::Document => return Document::from_node(next),
                NodeType::DocumentFragment => return Err(DomError::FragmentOwner),
                NodeType::Text | NodeType::Comment | NodeType::DocumentType => {
                    return Err(DomError::Detached)
                }
            }
        }
    }

    fn detach(&self) {
        self.unlink();
    }
}
