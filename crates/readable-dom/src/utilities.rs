//! Tag tables and namespace constants shared by the tree and the serializer.

/// The HTML namespace URI
pub const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

/// The SVG namespace URI
pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

/// The MathML namespace URI
pub const MATHML_NAMESPACE: &str = "http://www.w3.org/1998/Math/MathML";

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Elements whose `src`/`srcset` properties reflect real attributes
pub const MEDIA_ELEMENTS: &[&str] = &["IMG", "PICTURE", "FIGURE"];

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(tag))
}

/// Check if a tag is a media element
pub fn is_media(tag: &str) -> bool {
    MEDIA_ELEMENTS
        .iter()
        .any(|media| media.eq_ignore_ascii_case(tag))
}

/// Normalize a tag name to the upper-case form stored on elements
pub fn normalize_tag_name(tag: &str) -> String {
    tag.to_ascii_uppercase()
}
