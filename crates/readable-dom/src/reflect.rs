//! Tag-dependent storage of the `src` and `srcset` properties.
//!
//! On media elements the properties reflect the attributes of the same name.
//! Everywhere else they are plain scratch slots that never touch the
//! attribute list, so generic property probing on any element is harmless.

use crate::node::ElementData;
use crate::utilities::is_media;

/// What a written unset value turns into on attribute-backed properties
pub const UNDEFINED: &str = "undefined";

/// Properties whose storage depends on the tag name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectedProperty {
    Src,
    Srcset,
}

impl ReflectedProperty {
    pub fn attribute_name(self) -> &'static str {
        match self {
            ReflectedProperty::Src => "src",
            ReflectedProperty::Srcset => "srcset",
        }
    }
}

/// Where a reflected property is stored for a given tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reflection {
    /// Read and written through the attribute list
    Attribute,
    /// Kept in a private per-element slot
    Scratch,
}

impl Reflection {
    /// Look up the strategy for an upper-cased tag name
    pub fn for_tag(tag_name: &str) -> Self {
        if is_media(tag_name) {
            Reflection::Attribute
        } else {
            Reflection::Scratch
        }
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ScratchProperties {
    src: Option<String>,
    srcset: Option<String>,
}

impl ScratchProperties {
    fn slot(&mut self, property: ReflectedProperty) -> &mut Option<String> {
        match property {
            ReflectedProperty::Src => &mut self.src,
            ReflectedProperty::Srcset => &mut self.srcset,
        }
    }
}

pub(crate) fn read(element: &ElementData, property: ReflectedProperty) -> Option<String> {
    match Reflection::for_tag(element.tag_name()) {
        Reflection::Attribute => Some(
            element
                .get_attribute(property.attribute_name())
                .unwrap_or_default(),
        ),
        Reflection::Scratch => element.scratch.borrow_mut().slot(property).clone(),
    }
}

pub(crate) fn write(element: &ElementData, property: ReflectedProperty, value: Option<&str>) {
    match Reflection::for_tag(element.tag_name()) {
        Reflection::Attribute => {
            element.set_attribute(property.attribute_name(), value.unwrap_or(UNDEFINED));
        }
        Reflection::Scratch => {
            *element.scratch.borrow_mut().slot(property) = value.map(str::to_string);
        }
    }
}
