//! HTML parsing support.
//!
//! html5ever's tree builder drives tree construction here through
//! [`HtmlSink`], which forwards every callback to a [`TreeAdapter`]. The sink
//! holds no tree state of its own besides the document handle.

use std::borrow::Cow;
use std::cell::Cell;

use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tokenizer::TokenizerOpts;
use html5ever::tree_builder::{
    ElemName, ElementFlags, NodeOrText, QuirksMode, TreeBuilderOpts, TreeSink,
};
use html5ever::{Attribute as HtmlAttribute, LocalName, Namespace, ParseOpts, QualName};

use crate::adapter::{DomTreeAdapter, TreeAdapter};
use crate::attributes::Attribute;
use crate::location::SourceCodeLocation;
use crate::node::{Document, DocumentMode, NodeRef, ParentNode};
use crate::options::ParseOptions;
use crate::utilities::HTML_NAMESPACE;

/// Parse a complete HTML document.
///
/// # Example
///
/// ```rust
/// use readable_dom::{parse_document, ParentNode};
///
/// let document = parse_document("<!doctype html><title>T</title><p>x</p>");
/// assert_eq!(document.title(), "T");
/// assert_eq!(document.get_elements_by_tag_name("p").len(), 1);
/// ```
pub fn parse_document(html: &str) -> Document {
    parse_document_with(html, &ParseOptions::default())
}

/// Parse a complete HTML document with custom options
pub fn parse_document_with(html: &str, options: &ParseOptions) -> Document {
    let document = Document::new();
    let sink = HtmlSink::new(DomTreeAdapter, document.as_node().clone(), options);
    html5ever::parse_document(sink, parse_opts(options)).one(html);
    document
}

/// Parse partial markup, as found inside a `<body>`, into a document fragment.
///
/// Nodes of the fragment have no owning document.
pub fn parse_fragment(html: &str) -> NodeRef {
    parse_fragment_with(html, &ParseOptions::default())
}

/// Parse partial markup with custom options
pub fn parse_fragment_with(html: &str, options: &ParseOptions) -> NodeRef {
    let document = Document::new();
    let sink = HtmlSink::new(DomTreeAdapter, document.as_node().clone(), options);
    let context = QualName::new(
        None,
        Namespace::from(HTML_NAMESPACE),
        LocalName::from("body"),
    );
    html5ever::parse_fragment(sink, parse_opts(options), context, Vec::new()).one(html);

    // The tree builder parks fragment content under a synthetic <html> root.
    let fragment = NodeRef::new_document_fragment();
    if let Some(root) = document.first_element_child() {
        for child in root.child_nodes() {
            fragment.append_child(&child);
        }
    }
    fragment
}

fn parse_opts(options: &ParseOptions) -> ParseOpts {
    ParseOpts {
        tokenizer: TokenizerOpts {
            exact_errors: options.exact_errors,
            ..TokenizerOpts::default()
        },
        tree_builder: TreeBuilderOpts {
            exact_errors: options.exact_errors,
            scripting_enabled: options.scripting_enabled,
            ..TreeBuilderOpts::default()
        },
    }
}

/// Owned element name handed back to the tree builder
#[derive(Debug, Clone)]
pub struct ElementName(QualName);

impl ElemName for ElementName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

/// html5ever `TreeSink` that builds through a [`TreeAdapter`]
pub struct HtmlSink<A: TreeAdapter> {
    adapter: A,
    document: A::Node,
    track_locations: bool,
    current_line: Cell<u64>,
}

impl<A: TreeAdapter> HtmlSink<A> {
    pub fn new(adapter: A, document: A::Node, options: &ParseOptions) -> Self {
        Self {
            adapter,
            document,
            track_locations: options.source_code_location_info,
            current_line: Cell::new(1),
        }
    }

    /// Record where a node starts. Closing positions are not tracked.
    fn annotate_start(&self, node: &A::Node) {
        if self.track_locations {
            let location = SourceCodeLocation::starting_at_line(self.current_line.get());
            self.adapter
                .set_node_source_code_location(node, Some(location));
        }
    }

    fn convert_attributes(attrs: Vec<HtmlAttribute>) -> Vec<Attribute> {
        attrs
            .into_iter()
            .map(|attr| {
                let name = match &attr.name.prefix {
                    Some(prefix) => format!("{}:{}", &**prefix, &*attr.name.local),
                    None => attr.name.local.to_string(),
                };
                Attribute::new(name, attr.value.to_string())
            })
            .collect()
    }
}

impl<A> TreeSink for HtmlSink<A>
where
    A: TreeAdapter,
    A::Node: PartialEq,
{
    type Handle = A::Node;
    type Output = A::Node;
    type ElemName<'a>
        = ElementName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::debug!(
            "html parse error at line {}: {}",
            self.current_line.get(),
            msg
        );
    }

    fn get_document(&self) -> Self::Handle {
        self.document.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> ElementName {
        let local = self.adapter.get_tag_name(target).unwrap_or_default();
        let ns = self.adapter.get_namespace_uri(target).unwrap_or_default();
        ElementName(QualName::new(
            None,
            Namespace::from(ns),
            LocalName::from(local),
        ))
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<HtmlAttribute>,
        flags: ElementFlags,
    ) -> Self::Handle {
        let element = self
            .adapter
            .create_element(&name.local, &name.ns, Self::convert_attributes(attrs));
        if flags.template {
            let content = self.adapter.create_document_fragment();
            self.adapter.set_template_content(&element, &content);
        }
        self.annotate_start(&element);
        element
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        let comment = self.adapter.create_comment_node(&text);
        self.annotate_start(&comment);
        comment
    }

    fn create_pi(&self, target: StrTendril, data: StrTendril) -> Self::Handle {
        let comment = self
            .adapter
            .create_comment_node(&format!("?{} {}", &*target, &*data));
        self.annotate_start(&comment);
        comment
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => self.adapter.append_child(parent, &node),
            NodeOrText::AppendText(text) => self.adapter.insert_text(parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if self.adapter.get_parent_node(element).is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        name: StrTendril,
        public_id: StrTendril,
        system_id: StrTendril,
    ) {
        self.adapter
            .set_document_type(&self.document, &name, &public_id, &system_id);
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        match self.adapter.get_template_content(target) {
            Some(content) => content,
            None => {
                let content = self.adapter.create_document_fragment();
                self.adapter.set_template_content(target, &content);
                content
            }
        }
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, mode: QuirksMode) {
        let mode = match mode {
            QuirksMode::Quirks => DocumentMode::Quirks,
            QuirksMode::LimitedQuirks => DocumentMode::LimitedQuirks,
            QuirksMode::NoQuirks => DocumentMode::NoQuirks,
        };
        self.adapter.set_document_mode(&self.document, mode);
    }

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let Some(parent) = self.adapter.get_parent_node(sibling) else {
            log::warn!("append_before_sibling: sibling has no parent, dropping node");
            return;
        };
        match new_node {
            NodeOrText::AppendNode(node) => self.adapter.insert_before(&parent, &node, sibling),
            NodeOrText::AppendText(text) => {
                self.adapter.insert_text_before(&parent, &text, sibling)
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<HtmlAttribute>) {
        self.adapter
            .adopt_attributes(target, Self::convert_attributes(attrs));
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        self.adapter.detach_node(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        for child in self.adapter.get_child_nodes(node) {
            self.adapter.append_child(new_parent, &child);
        }
    }

    fn set_current_line(&self, line_number: u64) {
        self.current_line.set(line_number);
    }
}
