//! Configuration for building a tree from markup

/// Options for HTML parsing
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Parse as if scripting were enabled (`<noscript>` content stays raw text)
    pub scripting_enabled: bool,

    /// Annotate nodes with the source lines they were built from
    pub source_code_location_info: bool,

    /// Ask the tokenizer and tree builder for detailed error messages
    pub exact_errors: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            scripting_enabled: true,
            source_code_location_info: false,
            exact_errors: false,
        }
    }
}

impl ParseOptions {
    /// Default options with source locations switched on
    pub fn with_source_locations() -> Self {
        Self {
            source_code_location_info: true,
            ..Self::default()
        }
    }
}
