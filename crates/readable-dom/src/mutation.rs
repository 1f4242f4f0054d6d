//! Structural mutation: keeps child lists and parent links in step.
//!
//! Every operation is tolerant. A missing reference node turns an insertion
//! into an append and a removal into a no-op; neither is an error.

use crate::node::{NodeData, NodeRef, ParentNode};

impl NodeRef {
    fn position_of(&self, child: &NodeRef) -> Option<usize> {
        self.0.children.borrow().iter().position(|c| c == child)
    }

    /// Reject insertions that would break the tree shape
    fn accepts_child(&self, child: &NodeRef) -> bool {
        if !self.node_type().is_parent_node() {
            log::warn!("{} node cannot have children", self.node_name());
            return false;
        }
        if !child.node_type().is_child_node() {
            log::warn!("{} node cannot be inserted as a child", child.node_name());
            return false;
        }
        if child.is_inclusive_ancestor_of(self) {
            log::warn!("refusing to insert {} into its own subtree", child.node_name());
            return false;
        }
        true
    }

    /// Unlink from the current parent. Clears the parent link even when the
    /// parent's child list does not contain this node.
    pub(crate) fn unlink(&self) {
        if let Some(parent) = self.parent_link() {
            let index = parent.position_of(self);
            if let Some(index) = index {
                parent.0.children.borrow_mut().remove(index);
            }
        }
        self.set_parent(None);
    }

    /// Append text, merging into the last child when it is a text node
    pub fn insert_text(&self, text: &str) {
        if let Some(last) = self.last_child() {
            if let NodeData::Text(value) = last.data() {
                value.borrow_mut().push_str(text);
                return;
            }
        }
        self.append_child(&NodeRef::new_text(text));
    }

    /// Insert text before `reference`, merging into the preceding text node
    pub fn insert_text_before(&self, text: &str, reference: &NodeRef) {
        let previous = self.position_of(reference).and_then(|index| {
            index
                .checked_sub(1)
                .map(|prev| self.0.children.borrow()[prev].clone())
        });
        if let Some(previous) = previous {
            if let NodeData::Text(value) = previous.data() {
                value.borrow_mut().push_str(text);
                return;
            }
        }
        self.insert_before(&NodeRef::new_text(text), Some(reference));
    }
}

impl ParentNode for NodeRef {
    fn child_nodes(&self) -> Vec<NodeRef> {
        self.0.children.borrow().clone()
    }

    fn append_child(&self, child: &NodeRef) {
        if !self.accepts_child(child) {
            return;
        }
        child.unlink();
        child.set_parent(Some(self));
        self.0.children.borrow_mut().push(child.clone());
    }

    fn insert_before(&self, new_child: &NodeRef, reference: Option<&NodeRef>) {
        if !self.accepts_child(new_child) {
            return;
        }
        new_child.unlink();
        let index = reference.and_then(|reference| self.position_of(reference));
        if index.is_none() && reference.is_some() {
            log::debug!(
                "insert_before: reference is not a child of {}, appending",
                self.node_name()
            );
        }
        new_child.set_parent(Some(self));
        let mut children = self.0.children.borrow_mut();
        match index {
            Some(index) => children.insert(index, new_child.clone()),
            None => children.push(new_child.clone()),
        }
    }

    fn replace_child(&self, replacement: &NodeRef, existing: &NodeRef) {
        if !self.accepts_child(replacement) {
            return;
        }
        replacement.unlink();
        let index = self.position_of(existing);
        if index.is_some() {
            existing.set_parent(None);
        } else {
            log::debug!(
                "replace_child: node is not a child of {}, appending replacement",
                self.node_name()
            );
        }
        replacement.set_parent(Some(self));
        let mut children = self.0.children.borrow_mut();
        match index {
            Some(index) => children[index] = replacement.clone(),
            None => children.push(replacement.clone()),
        }
    }

    fn remove_child(&self, child: &NodeRef) {
        match self.position_of(child) {
            Some(index) => {
                self.0.children.borrow_mut().remove(index);
                child.set_parent(None);
            }
            None => log::debug!(
                "remove_child: node is not a child of {}, ignoring",
                self.node_name()
            ),
        }
    }

    fn get_elements_by_tag_name(&self, name: &str) -> Vec<NodeRef> {
        self.elements_by_tag_name(name).collect()
    }

    fn inner_html(&self) -> String {
        self.inner_markup().collect()
    }

    fn text_content(&self) -> String {
        self.collect_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ChildNode;

    fn names(parent: &NodeRef) -> Vec<String> {
        parent
            .child_nodes()
            .iter()
            .map(|child| match child.value() {
                Some(value) => value,
                None => child.node_name(),
            })
            .collect()
    }

    /// Every child points back at its parent exactly once
    fn assert_consistent(parent: &NodeRef) {
        let children = parent.child_nodes();
        for child in &children {
            assert_eq!(child.parent_node().as_ref(), Some(parent));
            assert_eq!(children.iter().filter(|c| *c == child).count(), 1);
        }
    }

    /// Each node sits in at most one child list, and its parent link names
    /// exactly that list's owner
    fn assert_single_parent(containers: &[NodeRef], nodes: &[NodeRef]) {
        for node in nodes {
            let holders: Vec<&NodeRef> = containers
                .iter()
                .filter(|container| container.child_nodes().contains(node))
                .collect();
            assert!(holders.len() <= 1, "{:?} has several parents", node);
            assert_eq!(node.parent_node().as_ref(), holders.first().copied());
            for holder in holders {
                assert_consistent(holder);
            }
        }
    }

    #[test]
    fn test_mixed_mutation_sequence_keeps_parent_links() {
        let containers: Vec<NodeRef> = (0..4)
            .map(|_| NodeRef::new_html_element("div"))
            .collect();
        let mut nodes = containers.clone();
        nodes.extend((0..3).map(|_| NodeRef::new_html_element("span")));
        nodes.extend(["a", "b", "c"].into_iter().map(NodeRef::new_text));

        let mut state: u64 = 0x2545_f491_4f6c_dd1d;
        let mut pick = |bound: usize| {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            (state % bound as u64) as usize
        };

        for _ in 0..2_000 {
            let parent = &containers[pick(containers.len())];
            let node = &nodes[pick(nodes.len())];
            let other = &nodes[pick(nodes.len())];
            match pick(6) {
                0 => parent.append_child(node),
                1 => parent.insert_before(node, Some(other)),
                2 => parent.insert_before(node, None),
                3 => parent.replace_child(node, other),
                4 => parent.remove_child(other),
                _ => node.detach(),
            }
            assert_single_parent(&containers, &nodes);
        }
    }

    #[test]
    fn test_append_child() {
        let div = NodeRef::new_html_element("div");
        let p = NodeRef::new_html_element("p");
        div.append_child(&p);

        assert_eq!(div.child_nodes(), vec![p.clone()]);
        assert_eq!(p.parent_node(), Some(div.clone()));
        assert_consistent(&div);
    }

    #[test]
    fn test_append_child_reparents() {
        let p = NodeRef::new_html_element("p");
        let q = NodeRef::new_html_element("q");
        let c = NodeRef::new_html_element("span");
        let other = NodeRef::new_html_element("b");
        q.append_child(&other);
        q.append_child(&c);
        p.append_child(&NodeRef::new_html_element("i"));

        p.append_child(&c);

        assert_eq!(q.child_nodes().len(), 1);
        assert_eq!(p.child_nodes().last(), Some(&c));
        assert_eq!(c.parent_node(), Some(p.clone()));
        assert_consistent(&p);
        assert_consistent(&q);
    }

    #[test]
    fn test_append_to_same_parent_moves_to_end() {
        let div = NodeRef::new_html_element("div");
        let a = NodeRef::new_html_element("a");
        let b = NodeRef::new_html_element("b");
        div.append_child(&a);
        div.append_child(&b);
        div.append_child(&a);

        assert_eq!(names(&div), vec!["B", "A"]);
        assert_consistent(&div);
    }

    #[test]
    fn test_insert_before() {
        let div = NodeRef::new_html_element("div");
        let a = NodeRef::new_html_element("a");
        let b = NodeRef::new_html_element("b");
        let i = NodeRef::new_html_element("i");
        div.append_child(&a);
        div.append_child(&b);

        div.insert_before(&i, Some(&b));
        assert_eq!(names(&div), vec!["A", "I", "B"]);

        div.insert_before(&b, Some(&a));
        assert_eq!(names(&div), vec!["B", "A", "I"]);
        assert_consistent(&div);
    }

    #[test]
    fn test_insert_before_missing_reference_appends() {
        let div = NodeRef::new_html_element("div");
        let a = NodeRef::new_html_element("a");
        let stranger = NodeRef::new_html_element("em");
        let i = NodeRef::new_html_element("i");
        div.append_child(&a);

        div.insert_before(&i, Some(&stranger));
        assert_eq!(names(&div), vec!["A", "I"]);

        let b = NodeRef::new_html_element("b");
        div.insert_before(&b, None);
        assert_eq!(names(&div), vec!["A", "I", "B"]);
        assert_consistent(&div);
    }

    #[test]
    fn test_replace_child() {
        let div = NodeRef::new_html_element("div");
        let a = NodeRef::new_html_element("a");
        let b = NodeRef::new_html_element("b");
        let i = NodeRef::new_html_element("i");
        div.append_child(&a);
        div.append_child(&b);

        div.replace_child(&i, &a);
        assert_eq!(names(&div), vec!["I", "B"]);
        assert_eq!(a.parent_node(), None);
        assert_consistent(&div);
    }

    #[test]
    fn test_replace_child_moves_replacement() {
        let div = NodeRef::new_html_element("div");
        let other = NodeRef::new_html_element("section");
        let a = NodeRef::new_html_element("a");
        let i = NodeRef::new_html_element("i");
        div.append_child(&a);
        other.append_child(&i);

        div.replace_child(&i, &a);
        assert!(other.child_nodes().is_empty());
        assert_eq!(names(&div), vec!["I"]);
        assert_consistent(&div);
    }

    #[test]
    fn test_replace_missing_child_appends() {
        let div = NodeRef::new_html_element("div");
        let a = NodeRef::new_html_element("a");
        let stranger = NodeRef::new_html_element("em");
        let i = NodeRef::new_html_element("i");
        div.append_child(&a);

        div.replace_child(&i, &stranger);
        assert_eq!(names(&div), vec!["A", "I"]);
        assert_consistent(&div);
    }

    #[test]
    fn test_remove_child() {
        let div = NodeRef::new_html_element("div");
        let a = NodeRef::new_html_element("a");
        div.append_child(&a);

        div.remove_child(&a);
        assert!(div.child_nodes().is_empty());
        assert_eq!(a.parent_node(), None);

        div.remove_child(&a);
        assert!(div.child_nodes().is_empty());
    }

    #[test]
    fn test_remove_child_of_other_parent_is_noop() {
        let div = NodeRef::new_html_element("div");
        let other = NodeRef::new_html_element("section");
        let a = NodeRef::new_html_element("a");
        other.append_child(&a);

        div.remove_child(&a);
        assert_eq!(a.parent_node(), Some(other.clone()));
        assert_consistent(&other);
    }

    #[test]
    fn test_detach() {
        let div = NodeRef::new_html_element("div");
        let a = NodeRef::new_html_element("a");
        div.append_child(&a);

        a.detach();
        assert!(div.child_nodes().is_empty());
        assert_eq!(a.parent_node(), None);

        a.detach();
        assert_eq!(a.parent_node(), None);
    }

    #[test]
    fn test_detach_with_stale_parent_link() {
        let div = NodeRef::new_html_element("div");
        let a = NodeRef::new_html_element("a");
        a.set_parent(Some(&div));

        a.detach();
        assert_eq!(a.parent_node(), None);
        assert!(div.child_nodes().is_empty());
    }

    #[test]
    fn test_insert_text_coalesces() {
        let p = NodeRef::new_html_element("p");
        p.insert_text("Hello, ");
        p.insert_text("World!");
        assert_eq!(names(&p), vec!["Hello, World!"]);

        p.append_child(&NodeRef::new_html_element("br"));
        p.insert_text("again");
        assert_eq!(names(&p), vec!["Hello, World!", "BR", "again"]);
        assert_consistent(&p);
    }

    #[test]
    fn test_insert_text_before() {
        let p = NodeRef::new_html_element("p");
        let b = NodeRef::new_html_element("b");
        p.append_child(&b);

        p.insert_text_before("one ", &b);
        p.insert_text_before("two ", &b);
        assert_eq!(names(&p), vec!["one two ", "B"]);

        let stranger = NodeRef::new_html_element("em");
        p.insert_text_before("tail", &stranger);
        assert_eq!(names(&p), vec!["one two ", "B", "tail"]);
        assert_consistent(&p);
    }

    #[test]
    fn test_leaf_nodes_reject_children() {
        let text = NodeRef::new_text("leaf");
        text.append_child(&NodeRef::new_html_element("p"));
        assert!(text.child_nodes().is_empty());
    }

    #[test]
    fn test_cycles_are_rejected() {
        let outer = NodeRef::new_html_element("div");
        let inner = NodeRef::new_html_element("span");
        outer.append_child(&inner);

        inner.append_child(&outer);
        outer.append_child(&outer);

        assert_eq!(outer.parent_node(), None);
        assert_eq!(outer.child_nodes(), vec![inner.clone()]);
        assert!(inner.child_nodes().is_empty());
    }

    #[test]
    fn test_documents_cannot_be_children() {
        let div = NodeRef::new_html_element("div");
        div.append_child(&NodeRef::new_document());
        div.append_child(&NodeRef::new_document_fragment());
        assert!(div.child_nodes().is_empty());
    }
}
