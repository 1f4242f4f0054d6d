//! Markup serialization.
//!
//! [`Markup`] produces the markup of a subtree as a lazy sequence of text
//! pieces; callers concatenate them. Tags are lower-cased, attribute values
//! only escape `"`, text escapes `<`, `>` and `&`, and childless void
//! elements self-close.
//!
//! A `template` element with a content fragment serializes that fragment in
//! place of its own child list. Children attached directly to the template
//! element are not part of its markup.

use crate::attributes::Attributes;
use crate::node::{NodeData, NodeRef, ParentNode};
use crate::utilities::is_void;

enum Step {
    Node(NodeRef),
    EndTag(String),
}

/// Lazy, non-restartable sequence of markup pieces
pub struct Markup {
    stack: Vec<Step>,
}

impl Markup {
    /// Markup of the children of `node` (`innerHTML`)
    pub fn inner(node: &NodeRef) -> Self {
        let mut markup = Self { stack: Vec::new() };
        markup.push_children(serialized_children(node));
        markup
    }

    /// Markup of `node` itself (`outerHTML`)
    pub fn outer(node: &NodeRef) -> Self {
        Self {
            stack: vec![Step::Node(node.clone())],
        }
    }

    fn push_children(&mut self, children: Vec<NodeRef>) {
        self.stack
            .extend(children.into_iter().rev().map(Step::Node));
    }
}

impl Iterator for Markup {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let node = match self.stack.pop()? {
                Step::EndTag(tag) => return Some(format!("</{}>", tag)),
                Step::Node(node) => node,
            };

            match node.data() {
                NodeData::Element(element) => {
                    let tag = element.tag_name().to_ascii_lowercase();
                    let attrs = attributes_string(&element.attribute_store());
                    let children = serialized_children(&node);

                    if children.is_empty() && is_void(&tag) {
                        return Some(format!("<{}{}/>", tag, attrs));
                    }

                    let open = format!("<{}{}>", tag, attrs);
                    self.stack.push(Step::EndTag(tag));
                    self.push_children(children);
                    return Some(open);
                }
                NodeData::Text(value) => return Some(escape_text(&value.borrow())),
                NodeData::Comment(value) => return Some(format!("<!--{}-->", value.borrow())),
                NodeData::DocumentType { name, .. } => {
                    return Some(format!("<!doctype {}>", name.borrow()))
                }
                NodeData::Document { .. } | NodeData::DocumentFragment => {
                    self.push_children(node.child_nodes());
                }
            }
        }
    }
}

/// Children to serialize: a template's content fragment stands in for its children
fn serialized_children(node: &NodeRef) -> Vec<NodeRef> {
    match node.as_element().and_then(|element| element.template_content()) {
        Some(content) => content.child_nodes(),
        None => node.child_nodes(),
    }
}

/// Attributes as a string for markup output, with a leading space per attribute
fn attributes_string(attrs: &Attributes) -> String {
    let mut result = String::new();
    for (name, value) in attrs.iter() {
        result.push(' ');
        result.push_str(name);
        if !value.is_empty() {
            result.push_str("=\"");
            result.push_str(&escape_attribute(value));
            result.push('"');
        }
    }
    result
}

/// Escape an attribute value. Only `"` is replaced.
pub fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}

/// Escape a text payload
pub fn escape_text(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

impl NodeRef {
    pub(crate) fn inner_markup(&self) -> Markup {
        Markup::inner(self)
    }

    /// Markup of this node including itself
    pub fn outer_html(&self) -> String {
        Markup::outer(self).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Document;
    use crate::utilities::HTML_NAMESPACE;
    use crate::Attribute;

    fn element_with_attrs(tag: &str, attrs: Vec<(&str, &str)>) -> NodeRef {
        NodeRef::new_element(
            tag,
            HTML_NAMESPACE,
            attrs
                .into_iter()
                .map(|(name, value)| Attribute::new(name, value))
                .collect(),
        )
    }

    #[test]
    fn test_outer_html() {
        let a = element_with_attrs("a", vec![("href", "https://example.com")]);
        a.append_child(&NodeRef::new_text("Link"));
        assert_eq!(a.outer_html(), "<a href=\"https://example.com\">Link</a>");
    }

    #[test]
    fn test_inner_html_nested() {
        let div = NodeRef::new_html_element("div");
        let p = element_with_attrs("p", vec![("class", "lead")]);
        p.append_child(&NodeRef::new_text("Hello "));
        let b = NodeRef::new_html_element("b");
        b.append_child(&NodeRef::new_text("World"));
        p.append_child(&b);
        div.append_child(&p);
        div.append_child(&NodeRef::new_comment(" note "));

        assert_eq!(
            div.inner_html(),
            "<p class=\"lead\">Hello <b>World</b></p><!-- note -->"
        );
    }

    #[test]
    fn test_void_element_html() {
        let br = NodeRef::new_html_element("br");
        assert_eq!(br.outer_html(), "<br/>");

        let img = element_with_attrs("img", vec![("src", "test.png"), ("alt", "Test")]);
        assert_eq!(img.outer_html(), "<img src=\"test.png\" alt=\"Test\"/>");
    }

    #[test]
    fn test_void_element_with_children_is_not_self_closed() {
        let br = NodeRef::new_html_element("br");
        br.append_child(&NodeRef::new_text("odd"));
        assert_eq!(br.outer_html(), "<br>odd</br>");
    }

    #[test]
    fn test_empty_attribute_value() {
        let input = element_with_attrs("input", vec![("disabled", ""), ("type", "text")]);
        assert_eq!(input.outer_html(), "<input disabled type=\"text\"/>");
    }

    #[test]
    fn test_attribute_escaping() {
        let div = element_with_attrs("div", vec![("data-test", "<\">")]);
        assert_eq!(div.outer_html(), "<div data-test=\"<&quot;>\"></div>");
    }

    #[test]
    fn test_text_escaping() {
        assert_eq!(escape_text("<H&M>"), "&lt;H&amp;M&gt;");
        let p = NodeRef::new_html_element("p");
        p.append_child(&NodeRef::new_text("a < b & c"));
        assert_eq!(p.inner_html(), "a &lt; b &amp; c");
    }

    #[test]
    fn test_doctype_and_document() {
        let document = Document::new();
        document.append_child(&NodeRef::new_doctype(
            "html",
            "-//W3C//DTD HTML 4.01//EN",
            "",
        ));
        let html = NodeRef::new_html_element("html");
        document.append_child(&html);

        assert_eq!(document.inner_html(), "<!doctype html><html></html>");
    }

    #[test]
    fn test_template_content_is_serialized() {
        let template = NodeRef::new_html_element("template");
        let content = NodeRef::new_document_fragment();
        let p = NodeRef::new_html_element("p");
        content.append_child(&p);
        template
            .as_element()
            .unwrap()
            .set_template_content(&content);

        assert_eq!(template.outer_html(), "<template><p></p></template>");
    }

    #[test]
    fn test_template_content_replaces_direct_children() {
        let template = NodeRef::new_html_element("template");
        template.append_child(&NodeRef::new_html_element("span"));
        assert_eq!(template.inner_html(), "<span></span>");

        let content = NodeRef::new_document_fragment();
        content.append_child(&NodeRef::new_text("inside"));
        template
            .as_element()
            .unwrap()
            .set_template_content(&content);

        assert_eq!(template.inner_html(), "inside");
        assert_eq!(template.outer_html(), "<template>inside</template>");
        assert_eq!(template.child_nodes().len(), 1);
    }

    #[test]
    fn test_markup_is_lazy() {
        let div = NodeRef::new_html_element("div");
        div.append_child(&NodeRef::new_html_element("span"));
        let pieces: Vec<String> = Markup::outer(&div).collect();
        assert_eq!(pieces, vec!["<div>", "<span>", "</span>", "</div>"]);
    }
}
