//! Node taxonomy of the document tree.
//!
//! Every node lives behind a [`NodeRef`], a reference-counted handle. A
//! parent owns its children through its child list; a child only holds a
//! weak link back to its parent. The child list is the single source of truth
//! for structure: siblings are found by scanning it.

use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::attributes::{Attribute, Attributes};
use crate::location::SourceCodeLocation;
use crate::reflect::{self, ReflectedProperty, ScratchProperties};
use crate::utilities::{normalize_tag_name, HTML_NAMESPACE};
use crate::{DomError, Result};

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document type node (nodeType = 10)
    DocumentType = 10,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl NodeType {
    /// Whether nodes of this type own a child list
    pub fn is_parent_node(self) -> bool {
        match self {
            NodeType::Document | NodeType::DocumentFragment | NodeType::Element => true,
            NodeType::Text | NodeType::Comment | NodeType::DocumentType => false,
        }
    }

    /// Whether nodes of this type can be placed in a child list
    pub fn is_child_node(self) -> bool {
        match self {
            NodeType::Element | NodeType::Text | NodeType::Comment | NodeType::DocumentType => {
                true
            }
            NodeType::Document | NodeType::DocumentFragment => false,
        }
    }
}

/// Quirks mode the tree builder settled on for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DocumentMode {
    #[default]
    NoQuirks,
    Quirks,
    LimitedQuirks,
}

/// Per-kind payload of a node
pub enum NodeData {
    Document { mode: Cell<DocumentMode> },
    DocumentFragment,
    Element(ElementData),
    Text(RefCell<String>),
    Comment(RefCell<String>),
    DocumentType {
        name: RefCell<String>,
        public_id: RefCell<String>,
        system_id: RefCell<String>,
    },
}

impl NodeData {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeData::Document { .. } => NodeType::Document,
            NodeData::DocumentFragment => NodeType::DocumentFragment,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text(_) => NodeType::Text,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::DocumentType { .. } => NodeType::DocumentType,
        }
    }
}

/// Element payload: name, namespace, attributes and reflected properties
pub struct ElementData {
    local_name: String,
    tag_name: String,
    namespace_uri: String,
    pub(crate) attributes: RefCell<Attributes>,
    pub(crate) scratch: RefCell<ScratchProperties>,
    pub(crate) template_content: RefCell<Option<NodeRef>>,
}

impl ElementData {
    fn new(local_name: &str, namespace_uri: &str, attributes: Attributes) -> Self {
        Self {
            local_name: local_name.to_string(),
            tag_name: normalize_tag_name(local_name),
            namespace_uri: namespace_uri.to_string(),
            attributes: RefCell::new(attributes),
            scratch: RefCell::new(ScratchProperties::default()),
            template_content: RefCell::new(None),
        }
    }

    /// Upper-cased tag name, e.g. `DIV`
    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Name as the element was created with, e.g. `div` or `foreignObject`
    pub fn local_name(&self) -> &str {
        &self.local_name
    }

    pub fn namespace_uri(&self) -> &str {
        &self.namespace_uri
    }

    pub fn get_attribute(&self, name: &str) -> Option<String> {
        self.attributes.borrow().get(name).map(str::to_string)
    }

    pub fn set_attribute(&self, name: &str, value: &str) {
        self.attributes.borrow_mut().set(name, value);
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.borrow().has(name)
    }

    pub fn remove_attribute(&self, name: &str) {
        self.attributes.borrow_mut().remove(name);
    }

    /// Snapshot of the attribute list, names unique
    pub fn attributes(&self) -> Vec<Attribute> {
        self.attributes.borrow().to_list()
    }

    /// Borrow the attribute store directly
    pub fn attribute_store(&self) -> Ref<'_, Attributes> {
        self.attributes.borrow()
    }

    pub fn id(&self) -> String {
        self.get_attribute("id").unwrap_or_default()
    }

    pub fn set_id(&self, value: &str) {
        self.set_attribute("id", value);
    }

    /// Reflects the `class` attribute
    pub fn class_name(&self) -> String {
        self.get_attribute("class").unwrap_or_default()
    }

    pub fn set_class_name(&self, value: &str) {
        self.set_attribute("class", value);
    }

    /// The `src` property. `None` stands for an unset (undefined) value.
    pub fn src(&self) -> Option<String> {
        reflect::read(self, ReflectedProperty::Src)
    }

    pub fn set_src(&self, value: Option<&str>) {
        reflect::write(self, ReflectedProperty::Src, value);
    }

    /// The `srcset` property. `None` stands for an unset (undefined) value.
    pub fn srcset(&self) -> Option<String> {
        reflect::read(self, ReflectedProperty::Srcset)
    }

    pub fn set_srcset(&self, value: Option<&str>) {
        reflect::write(self, ReflectedProperty::Srcset, value);
    }

    /// Contents fragment of a `template` element, if one was associated
    pub fn template_content(&self) -> Option<NodeRef> {
        self.template_content.borrow().clone()
    }

    pub fn set_template_content(&self, content: &NodeRef) {
        *self.template_content.borrow_mut() = Some(content.clone());
    }
}

/// A node of the tree. Reach it through a [`NodeRef`].
pub struct Node {
    pub(crate) parent: RefCell<Option<Weak<Node>>>,
    /// Document that created this element while it is not attached anywhere.
    pub(crate) provisional_owner: RefCell<Option<Weak<Node>>>,
    pub(crate) children: RefCell<Vec<NodeRef>>,
    pub(crate) location: RefCell<Option<SourceCodeLocation>>,
    data: NodeData,
}

impl Drop for Node {
    fn drop(&mut self) {
        // Iterative teardown; nodes still referenced elsewhere keep their children.
        let mut stack = std::mem::take(self.children.get_mut());
        if let NodeData::Element(element) = &mut self.data {
            stack.extend(element.template_content.get_mut().take());
        }
        while let Some(node) = stack.pop() {
            if let Ok(mut inner) = Rc::try_unwrap(node.0) {
                stack.append(inner.children.get_mut());
                if let NodeData::Element(element) = &mut inner.data {
                    stack.extend(element.template_content.get_mut().take());
                }
            }
        }
    }
}

/// Shared handle to a node. Equality is node identity.
#[derive(Clone)]
pub struct NodeRef(pub(crate) Rc<Node>);

impl NodeRef {
    fn from_data(data: NodeData) -> Self {
        NodeRef(Rc::new(Node {
            parent: RefCell::new(None),
            provisional_owner: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            location: RefCell::new(None),
            data,
        }))
    }

    /// Create a new, empty document node
    pub fn new_document() -> Self {
        Self::from_data(NodeData::Document {
            mode: Cell::new(DocumentMode::NoQuirks),
        })
    }

    /// Create a document fragment node
    pub fn new_document_fragment() -> Self {
        Self::from_data(NodeData::DocumentFragment)
    }

    /// Create a detached element
    pub fn new_element(local_name: &str, namespace_uri: &str, attrs: Vec<Attribute>) -> Self {
        let attributes = attrs.into_iter().collect();
        Self::from_data(NodeData::Element(ElementData::new(
            local_name,
            namespace_uri,
            attributes,
        )))
    }

    /// Create a detached HTML element without attributes
    pub fn new_html_element(local_name: &str) -> Self {
        Self::new_element(local_name, HTML_NAMESPACE, Vec::new())
    }

    /// Create a new text node
    pub fn new_text(content: &str) -> Self {
        Self::from_data(NodeData::Text(RefCell::new(content.to_string())))
    }

    /// Create a new comment node
    pub fn new_comment(content: &str) -> Self {
        Self::from_data(NodeData::Comment(RefCell::new(content.to_string())))
    }

    /// Create a document type node
    pub fn new_doctype(name: &str, public_id: &str, system_id: &str) -> Self {
        Self::from_data(NodeData::DocumentType {
            name: RefCell::new(name.to_string()),
            public_id: RefCell::new(public_id.to_string()),
            system_id: RefCell::new(system_id.to_string()),
        })
    }

    pub fn data(&self) -> &NodeData {
        &self.0.data
    }

    pub fn node_type(&self) -> NodeType {
        self.0.data.node_type()
    }

    /// Conventional node name: `#document`, `#text`, an upper-case tag, ...
    pub fn node_name(&self) -> String {
        match &self.0.data {
            NodeData::Document { .. } => "#document".to_string(),
            NodeData::DocumentFragment => "#document-fragment".to_string(),
            NodeData::Element(element) => element.tag_name().to_string(),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::DocumentType { name, .. } => name.borrow().clone(),
        }
    }

    pub fn is_element(&self) -> bool {
        matches!(self.0.data, NodeData::Element(_))
    }

    pub fn is_text(&self) -> bool {
        matches!(self.0.data, NodeData::Text(_))
    }

    pub fn is_comment(&self) -> bool {
        matches!(self.0.data, NodeData::Comment(_))
    }

    pub fn is_doctype(&self) -> bool {
        matches!(self.0.data, NodeData::DocumentType { .. })
    }

    pub fn is_document(&self) -> bool {
        matches!(self.0.data, NodeData::Document { .. })
    }

    pub fn is_document_fragment(&self) -> bool {
        matches!(self.0.data, NodeData::DocumentFragment)
    }

    /// Element payload, if this is an element
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.0.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Upper-cased tag name, if this is an element
    pub fn tag_name(&self) -> Option<&str> {
        self.as_element().map(ElementData::tag_name)
    }

    /// Payload of a text or comment node
    pub fn value(&self) -> Option<String> {
        match &self.0.data {
            NodeData::Text(value) | NodeData::Comment(value) => Some(value.borrow().clone()),
            _ => None,
        }
    }

    /// Replace the payload of a text or comment node
    pub fn set_value(&self, content: &str) {
        match &self.0.data {
            NodeData::Text(value) | NodeData::Comment(value) => {
                *value.borrow_mut() = content.to_string();
            }
            _ => log::warn!("set_value on {} node ignored", self.node_name()),
        }
    }

    /// `(name, public_id, system_id)` of a document type node
    pub fn doctype_ids(&self) -> Option<(String, String, String)> {
        match &self.0.data {
            NodeData::DocumentType {
                name,
                public_id,
                system_id,
            } => Some((
                name.borrow().clone(),
                public_id.borrow().clone(),
                system_id.borrow().clone(),
            )),
            _ => None,
        }
    }

    pub(crate) fn set_doctype_ids(&self, new_name: &str, new_public: &str, new_system: &str) {
        if let NodeData::DocumentType {
            name,
            public_id,
            system_id,
        } = &self.0.data
        {
            *name.borrow_mut() = new_name.to_string();
            *public_id.borrow_mut() = new_public.to_string();
            *system_id.borrow_mut() = new_system.to_string();
        }
    }

    pub(crate) fn document_mode(&self) -> Option<DocumentMode> {
        match &self.0.data {
            NodeData::Document { mode } => Some(mode.get()),
            _ => None,
        }
    }

    pub(crate) fn set_document_mode(&self, new_mode: DocumentMode) {
        if let NodeData::Document { mode } = &self.0.data {
            mode.set(new_mode);
        }
    }

    pub(crate) fn parent_link(&self) -> Option<NodeRef> {
        self.0
            .parent
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(NodeRef)
    }

    pub(crate) fn provisional_owner(&self) -> Option<NodeRef> {
        self.0
            .provisional_owner
            .borrow()
            .as_ref()
            .and_then(Weak::upgrade)
            .map(NodeRef)
    }

    /// Point the parent link at `parent`. Attaching clears the provisional owner.
    pub(crate) fn set_parent(&self, parent: Option<&NodeRef>) {
        *self.0.parent.borrow_mut() = parent.map(|p| Rc::downgrade(&p.0));
        if parent.is_some() {
            *self.0.provisional_owner.borrow_mut() = None;
        }
    }

    /// Whether `self` is `other` or one of its ancestors
    pub(crate) fn is_inclusive_ancestor_of(&self, other: &NodeRef) -> bool {
        if self != other && self.0.children.borrow().is_empty() {
            return false;
        }
        let mut current = Some(other.clone());
        while let Some(node) = current {
            if node == *self {
                return true;
            }
            current = node.parent_link();
        }
        false
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for NodeRef {}

impl fmt::Debug for NodeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let children = self.0.children.try_borrow().map(|c| c.len()).ok();
        f.debug_struct("NodeRef")
            .field("node_name", &self.node_name())
            .field("children", &children)
            .finish()
    }
}

/// Operations of nodes that own a child list (document, fragment, element).
pub trait ParentNode {
    /// Snapshot of the child list in document order
    fn child_nodes(&self) -> Vec<NodeRef>;

    /// Element children only
    fn children(&self) -> Vec<NodeRef> {
        self.child_nodes()
            .into_iter()
            .filter(NodeRef::is_element)
            .collect()
    }

    fn first_child(&self) -> Option<NodeRef> {
        self.child_nodes().into_iter().next()
    }

    fn last_child(&self) -> Option<NodeRef> {
        self.child_nodes().pop()
    }

    fn first_element_child(&self) -> Option<NodeRef> {
        self.child_nodes().into_iter().find(NodeRef::is_element)
    }

    /// Append `child`, moving it out of its current parent first
    fn append_child(&self, child: &NodeRef);

    /// Insert `new_child` before `reference`; appends when `reference` is not a child
    fn insert_before(&self, new_child: &NodeRef, reference: Option<&NodeRef>);

    /// Put `replacement` in the slot of `existing`; appends when `existing` is not a child
    fn replace_child(&self, replacement: &NodeRef, existing: &NodeRef);

    /// Remove `child` if it is one of ours
    fn remove_child(&self, child: &NodeRef);

    /// Elements of the subtree with the given tag name (`*` matches all)
    fn get_elements_by_tag_name(&self, name: &str) -> Vec<NodeRef>;

    /// Markup of the children. On a `template` with content, markup of the
    /// content fragment instead.
    fn inner_html(&self) -> String;

    /// Concatenated text of every text descendant
    fn text_content(&self) -> String;
}

/// Operations of nodes that can sit in a child list (element, text, comment, doctype).
pub trait ChildNode {
    fn parent_node(&self) -> Option<NodeRef>;

    fn next_sibling(&self) -> Option<NodeRef>;

    fn next_element_sibling(&self) -> Option<NodeRef>;

    /// The document this node belongs to, resolved through element ancestors
    fn owner_document(&self) -> Result<Document>;

    /// Remove the node from its parent, if any
    fn detach(&self);
}

/// A document root. Wraps a [`NodeRef`] whose type is [`NodeType::Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document(NodeRef);

impl Document {
    /// Create a new, empty document
    pub fn new() -> Self {
        Document(NodeRef::new_document())
    }

    /// Wrap a document node
    pub fn from_node(node: NodeRef) -> Result<Self> {
        match node.node_type() {
            NodeType::Document => Ok(Document(node)),
            other => Err(DomError::NotADocument(other)),
        }
    }

    pub fn as_node(&self) -> &NodeRef {
        &self.0
    }

    pub fn into_node(self) -> NodeRef {
        self.0
    }

    pub fn mode(&self) -> DocumentMode {
        self.0.document_mode().unwrap_or_default()
    }

    pub fn set_mode(&self, mode: DocumentMode) {
        self.0.set_document_mode(mode);
    }

    /// The document type child, if any
    pub fn doctype(&self) -> Option<NodeRef> {
        self.0.child_nodes().into_iter().find(NodeRef::is_doctype)
    }

    /// The first child element named `html`
    pub fn document_element(&self) -> Result<NodeRef> {
        self.0
            .child_nodes()
            .into_iter()
            .find(|node| node.tag_name() == Some("HTML"))
            .ok_or(DomError::MissingDocumentElement)
    }

    /// The first `head` element under the document element
    pub fn head(&self) -> Result<NodeRef> {
        let root = self.document_element()?;
        root.descendants()
            .find(|node| node.tag_name() == Some("HEAD"))
            .ok_or(DomError::MissingHead)
    }

    /// The first `body` element under the document element
    pub fn body(&self) -> Result<NodeRef> {
        let root = self.document_element()?;
        root.descendants()
            .find(|node| node.tag_name() == Some("BODY"))
            .ok_or(DomError::MissingBody)
    }

    /// Text of the first `title` under `head`. Empty when anything is missing.
    pub fn title(&self) -> String {
        let Ok(head) = self.head() else {
            return String::new();
        };
        head.descendants()
            .find(|node| node.tag_name() == Some("TITLE"))
            .map(|title| title.text_content())
            .unwrap_or_default()
    }

    /// Create an HTML element owned by this document.
    ///
    /// The element is not attached anywhere, yet `owner_document` resolves to
    /// this document until it is attached somewhere else.
    pub fn create_element(&self, tag_name: &str) -> NodeRef {
        let element = NodeRef::new_html_element(&tag_name.to_ascii_lowercase());
        *element.0.provisional_owner.borrow_mut() = Some(Rc::downgrade(&self.0 .0));
        element
    }

    /// First element in document order whose `id` attribute equals `id`
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeRef> {
        self.0.descendants().find(|node| {
            node.as_element()
                .is_some_and(|element| element.get_attribute("id").as_deref() == Some(id))
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl ParentNode for Document {
    fn child_nodes(&self) -> Vec<NodeRef> {
        self.0.child_nodes()
    }

    fn append_child(&self, child: &NodeRef) {
        self.0.append_child(child);
    }

    fn insert_before(&self, new_child: &NodeRef, reference: Option<&NodeRef>) {
        self.0.insert_before(new_child, reference);
    }

    fn replace_child(&self, replacement: &NodeRef, existing: &NodeRef) {
        self.0.replace_child(replacement, existing);
    }

    fn remove_child(&self, child: &NodeRef) {
        self.0.remove_child(child);
    }

    fn get_elements_by_tag_name(&self, name: &str) -> Vec<NodeRef> {
        self.0.get_elements_by_tag_name(name)
    }

    fn inner_html(&self) -> String {
        self.0.inner_html()
    }

    fn text_content(&self) -> String {
        String::new()
    }
}
